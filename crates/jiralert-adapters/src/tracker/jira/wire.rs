//! Request and response bodies of the Jira REST API v2.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub jql: &'a str,
    pub fields: [&'static str; 3],
    #[serde(rename = "maxResults")]
    pub max_results: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<IssueBody>,
}

#[derive(Debug, Deserialize)]
pub struct IssueBody {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateRequest<'a> {
    pub fields: CreateFields<'a>,
}

#[derive(Debug, Serialize)]
pub struct CreateFields<'a> {
    pub project: ProjectRef<'a>,
    pub summary: &'a str,
    pub description: &'a str,
    pub issuetype: IssueTypeRef<'a>,
    pub labels: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct ProjectRef<'a> {
    pub key: &'a str,
}

#[derive(Debug, Serialize)]
pub struct IssueTypeRef<'a> {
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreateResponse {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateRequest<'a> {
    pub fields: UpdateFields<'a>,
}

#[derive(Debug, Serialize)]
pub struct UpdateFields<'a> {
    pub summary: &'a str,
    pub description: &'a str,
    pub labels: &'a [String],
}

#[derive(Debug, Deserialize)]
pub struct TransitionsResponse {
    #[serde(default)]
    pub transitions: Vec<TransitionBody>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionBody {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DoTransitionRequest<'a> {
    pub transition: TransitionRef<'a>,
}

#[derive(Debug, Serialize)]
pub struct TransitionRef<'a> {
    pub id: &'a str,
}
