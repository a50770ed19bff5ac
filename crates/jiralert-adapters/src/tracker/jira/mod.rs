mod jql;
mod wire;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use jiralert_core::ticket::{Ticket, Transition};
use jiralert_ports::error::PortError;
use jiralert_ports::outbound::TicketStore;
use jiralert_ports::types::{NewTicket, TicketQuery, TicketUpdate};

pub use jql::{quote, search_jql};

use wire::{
    CreateFields, CreateRequest, CreateResponse, DoTransitionRequest, IssueTypeRef, ProjectRef,
    SearchRequest, SearchResponse, TransitionRef, TransitionsResponse, UpdateFields,
    UpdateRequest,
};

const SEARCH_FIELDS: [&str; 3] = ["summary", "description", "labels"];
const SEARCH_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

/// Jira REST API v2 over basic auth.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self, PortError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PortError::Connection(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username,
            password: config.password,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn permalink(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.base_url)
    }

    fn api(&self, path: &str) -> String {
        format!("{}/rest/api/2/{path}", self.base_url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }

    async fn send(
        &self,
        action: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, PortError> {
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| PortError::Request {
                action,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(PortError::Request {
            action,
            message: format!("HTTP {status}: {body}"),
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        action: &'static str,
        request: RequestBuilder,
    ) -> Result<T, PortError> {
        self.send(action, request)
            .await?
            .json()
            .await
            .map_err(|e| PortError::InvalidResponse {
                action,
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl TicketStore for JiraClient {
    async fn connect(&self) -> Result<(), PortError> {
        debug!(server = %self.base_url, "connecting to jira");
        self.send("connect", self.http.get(self.api("serverInfo")))
            .await
            .map_err(|e| PortError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn search(&self, query: &TicketQuery) -> Result<Vec<Ticket>, PortError> {
        let jql = search_jql(query);
        debug!(%jql, "searching tickets");
        let body = SearchRequest {
            jql: &jql,
            fields: SEARCH_FIELDS,
            max_results: SEARCH_LIMIT,
        };
        let found: SearchResponse = self
            .send_json("search", self.http.post(self.api("search")).json(&body))
            .await?;

        Ok(found
            .issues
            .into_iter()
            .map(|issue| Ticket {
                permalink: self.permalink(&issue.key),
                key: issue.key,
                summary: issue.fields.summary,
                description: issue.fields.description,
                labels: issue.fields.labels,
            })
            .collect())
    }

    async fn create(&self, ticket: &NewTicket) -> Result<Ticket, PortError> {
        let body = CreateRequest {
            fields: CreateFields {
                project: ProjectRef {
                    key: &ticket.project,
                },
                summary: &ticket.summary,
                description: &ticket.description,
                issuetype: IssueTypeRef {
                    name: &ticket.issue_type,
                },
                labels: &ticket.labels,
            },
        };
        let created: CreateResponse = self
            .send_json("create", self.http.post(self.api("issue")).json(&body))
            .await?;

        Ok(Ticket {
            permalink: self.permalink(&created.key),
            key: created.key,
            summary: ticket.summary.clone(),
            description: Some(ticket.description.clone()),
            labels: ticket.labels.clone(),
        })
    }

    async fn update(&self, key: &str, update: &TicketUpdate) -> Result<(), PortError> {
        let body = UpdateRequest {
            fields: UpdateFields {
                summary: &update.summary,
                description: &update.description,
                labels: &update.labels,
            },
        };
        self.send(
            "update",
            self.http.put(self.api(&format!("issue/{key}"))).json(&body),
        )
        .await?;
        Ok(())
    }

    async fn transitions(&self, key: &str) -> Result<Vec<Transition>, PortError> {
        let listed: TransitionsResponse = self
            .send_json(
                "transitions",
                self.http.get(self.api(&format!("issue/{key}/transitions"))),
            )
            .await?;
        Ok(listed
            .transitions
            .into_iter()
            .map(|t| Transition {
                id: t.id,
                name: t.name,
            })
            .collect())
    }

    async fn transition(&self, key: &str, transition_id: &str) -> Result<(), PortError> {
        let body = DoTransitionRequest {
            transition: TransitionRef { id: transition_id },
        };
        self.send(
            "close",
            self.http
                .post(self.api(&format!("issue/{key}/transitions")))
                .json(&body),
        )
        .await?;
        Ok(())
    }
}
