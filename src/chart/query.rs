//! Submitting NRQL queries to the NerdGraph endpoint.

use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::core::{Configuration, Result, error::ChartErrorKind};

/// The NRQL string and chart parameters travel as variables, never spliced
/// into the document text.
const NRQL_CHART_QUERY: &str = r#"query NrqlChart($accountId: Int!, $nrql: Nrql!, $chartType: ChartImageType!, $format: ChartFormatType!, $width: Int!, $height: Int!) {
  actor {
    account(id: $accountId) {
      id
      nrql(query: $nrql) {
        results
        staticChartUrl(chartType: $chartType, format: $format, width: $width, height: $height)
      }
    }
  }
}"#;

/// Rendering parameters for `staticChartUrl`. These are fixed.
const CHART_TYPE: &str = "LINE";
const CHART_FORMAT: &str = "PNG";
const CHART_WIDTH: u32 = 400;
const CHART_HEIGHT: u32 = 200;

/// Longest provider message that makes it into an error.
const MAX_MESSAGE_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub nrql: String,
    pub account_id: u64,
}

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'static str,
    pub variables: Variables<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variables<'a> {
    pub account_id: u64,
    pub nrql: &'a str,
    pub chart_type: &'static str,
    pub format: &'static str,
    pub width: u32,
    pub height: u32,
}

impl QueryRequest {
    pub fn new(nrql: &str, config: &Configuration) -> Self {
        Self {
            nrql: nrql.to_string(),
            account_id: config.account_id,
        }
    }

    /// The GraphQL document and variables sent as the request body.
    pub fn body(&self) -> GraphQlRequest<'_> {
        GraphQlRequest {
            query: NRQL_CHART_QUERY,
            variables: Variables {
                account_id: self.account_id,
                nrql: &self.nrql,
                chart_type: CHART_TYPE,
                format: CHART_FORMAT,
                width: CHART_WIDTH,
                height: CHART_HEIGHT,
            },
        }
    }
}

/// Send the query once and hand back the raw payload of a 2xx response.
pub async fn submit(client: &Client, config: &Configuration, request: &QueryRequest) -> Result<String> {
    tracing::debug!(
        "POST {} for account {}",
        config.endpoint,
        request.account_id
    );

    let response = client
        .post(&config.endpoint)
        .header("API-Key", &config.api_key)
        .json(&request.body())
        .send()
        .await?;

    let status = response.status();
    let payload = response.text().await?;
    tracing::debug!("Query endpoint answered {status} with {} bytes", payload.len());

    check_status(status, &payload)?;
    Ok(payload)
}

fn check_status(status: StatusCode, payload: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }

    let message = provider_message(payload)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("no message").to_string());

    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChartErrorKind::AuthenticationError {
            status: status.as_u16(),
            message,
        },
        _ => ChartErrorKind::QueryError {
            message: format!("HTTP {}: {message}", status.as_u16()),
        },
    };

    Err(kind.into())
}

/// Pull a human-readable message out of an error body, if there is one.
fn provider_message(payload: &str) -> Option<String> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let messages: Vec<&str> = value
            .get("errors")
            .and_then(|errors| errors.as_array())
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        if !messages.is_empty() {
            return Some(messages.join("; "));
        }

        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|m| m.as_str()) {
                return Some(text.to_string());
            }
        }
    }

    Some(truncate(trimmed, MAX_MESSAGE_LEN))
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
