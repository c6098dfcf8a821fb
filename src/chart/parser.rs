//! Parsing NerdGraph responses into chart results.

use serde::Deserialize;
use serde_json::Value;

use crate::core::{ChartError, Result, error::ChartErrorKind};

/// What the pipeline keeps from a query response.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartResult {
    pub image_url: String,
    pub raw_results: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    data: Option<Data>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Data {
    actor: Option<Actor>,
}

#[derive(Debug, Deserialize)]
struct Actor {
    account: Option<Account>,
}

#[derive(Debug, Deserialize)]
struct Account {
    nrql: Option<Nrql>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Nrql {
    results: Option<Value>,
    static_chart_url: Option<String>,
}

fn unexpected(reason: impl Into<String>) -> ChartError {
    ChartErrorKind::UnexpectedResponseShape {
        reason: reason.into(),
    }
    .into()
}

/// Extract the chart URL, and the result rows when present, from a raw payload.
pub fn parse_response(payload: &str) -> Result<ChartResult> {
    let response: QueryResponse = serde_json::from_str(payload)
        .map_err(|e| unexpected(format!("payload is not a NerdGraph response: {e}")))?;

    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let messages: Vec<String> = errors
            .into_iter()
            .map(|e| e.message.unwrap_or_else(|| "unknown error".to_string()))
            .collect();
        for message in &messages {
            tracing::debug!("GraphQL error: {message}");
        }
        return Err(ChartErrorKind::QueryError {
            message: messages.join("; "),
        }
        .into());
    }

    let nrql = response
        .data
        .ok_or_else(|| unexpected("missing `data`"))?
        .actor
        .ok_or_else(|| unexpected("missing `data.actor`"))?
        .account
        .ok_or_else(|| unexpected("missing `data.actor.account`"))?
        .nrql
        .ok_or_else(|| unexpected("missing `data.actor.account.nrql`"))?;

    let image_url = nrql
        .static_chart_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| unexpected("missing `staticChartUrl` in NRQL result"))?;

    let raw_results = nrql.results.filter(|results| !results.is_null());

    Ok(ChartResult {
        image_url,
        raw_results,
    })
}
