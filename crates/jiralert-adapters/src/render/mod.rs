//! Ticket text rendered with handlebars.
//!
//! Templates see the webhook payload under its wire names (`commonLabels`,
//! `commonAnnotations`, ...) plus `alertCount`, `groupFilter` (the group
//! labels as an Alertmanager matcher) and an `alerts` list in content-hash
//! order. `{{urlencode x}}` percent-encodes a query value. Rendering is strict: a variable missing from the
//! payload fails the render instead of leaving a blank.

mod templates;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use handlebars::{handlebars_helper, Handlebars};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use jiralert_core::alert::{AlertGroupPayload, Status};
use jiralert_ports::error::RenderError;
use jiralert_ports::outbound::ContentRenderer;

const SUMMARY: &str = "summary";
const DESCRIPTION: &str = "description";

// Unreserved characters stay as they are, everything else is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

handlebars_helper!(urlencode: |value: String| {
    utf8_percent_encode(&value, QUERY_VALUE).to_string()
});

/// `{k1="v1",k2="v2"}`, the matcher Alertmanager's UI filters on.
fn group_filter(labels: &BTreeMap<String, String>) -> String {
    let matchers: Vec<_> = labels
        .iter()
        .map(|(k, v)| {
            let v = v.replace('\\', "\\\\").replace('"', "\\\"");
            format!("{k}=\"{v}\"")
        })
        .collect();
    format!("{{{}}}", matchers.join(","))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateData<'a> {
    version: &'a str,
    group_key: &'a str,
    status: Status,
    receiver: &'a str,
    group_labels: &'a BTreeMap<String, String>,
    group_filter: String,
    common_labels: &'a BTreeMap<String, String>,
    common_annotations: &'a BTreeMap<String, String>,
    #[serde(rename = "externalURL")]
    external_url: &'a str,
    alert_count: usize,
    alerts: Vec<AlertData<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertData<'a> {
    hash: String,
    status: Option<Status>,
    labels: &'a BTreeMap<String, String>,
    annotations: &'a BTreeMap<String, String>,
    // Per-alert annotations are optional, so these default to empty.
    summary: &'a str,
    documentation: &'a str,
    #[serde(rename = "generatorURL")]
    generator_url: &'a str,
}

impl<'a> TemplateData<'a> {
    fn from_payload(payload: &'a AlertGroupPayload) -> Self {
        let annotation = |a: &'a BTreeMap<String, String>, key: &str| {
            a.get(key).map(String::as_str).unwrap_or_default()
        };
        let alerts: Vec<_> = payload
            .alerts_by_hash()
            .into_iter()
            .map(|(hash, alert)| AlertData {
                hash,
                status: alert.status,
                labels: &alert.labels,
                annotations: &alert.annotations,
                summary: annotation(&alert.annotations, "summary"),
                documentation: annotation(&alert.annotations, "documentation"),
                generator_url: &alert.generator_url,
            })
            .collect();

        Self {
            version: &payload.version,
            group_key: &payload.group_key,
            status: payload.status,
            receiver: &payload.receiver,
            group_labels: &payload.group_labels,
            group_filter: group_filter(&payload.group_labels),
            common_labels: &payload.common_labels,
            common_annotations: &payload.common_annotations,
            external_url: &payload.external_url,
            alert_count: alerts.len(),
            alerts,
        }
    }
}

pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Renderer with the built-in Jira wiki templates.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_templates(templates::SUMMARY, templates::DESCRIPTION)
    }

    pub fn with_templates(summary: &str, description: &str) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_helper("urlencode", Box::new(urlencode));

        for (name, source) in [(SUMMARY, summary), (DESCRIPTION, description)] {
            registry
                .register_template_string(name, source)
                .map_err(|e| RenderError::Template {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(Self { registry })
    }

    /// Loads `summary.hbs` and `description.hbs` from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, RenderError> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(format!("{name}.hbs"));
            fs::read_to_string(&path).map_err(|e| RenderError::Template {
                name: name.to_string(),
                message: format!("{}: {e}", path.display()),
            })
        };
        Self::with_templates(&read(SUMMARY)?, &read(DESCRIPTION)?)
    }

    fn render(&self, name: &str, payload: &AlertGroupPayload) -> Result<String, RenderError> {
        self.registry
            .render(name, &TemplateData::from_payload(payload))
            .map_err(|e| RenderError::Render {
                name: name.to_string(),
                message: e.to_string(),
            })
    }
}

impl ContentRenderer for HandlebarsRenderer {
    fn render_summary(&self, payload: &AlertGroupPayload) -> Result<String, RenderError> {
        Ok(self.render(SUMMARY, payload)?.trim().to_string())
    }

    fn render_description(&self, payload: &AlertGroupPayload) -> Result<String, RenderError> {
        self.render(DESCRIPTION, payload)
    }
}
