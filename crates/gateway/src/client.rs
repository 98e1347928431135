use std::time::Duration;

use astra_core::config::GatewayConfig;
use astra_core::{BoardRef, RawField, RawRecord};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::GatewayError;
use crate::WorkboardGateway;

/// How many boards one lookup query scans.
pub const BOARD_LOOKUP_LIMIT: usize = 100;

/// One page of items per fetch. The gateway does not paginate beyond this,
/// so analytics on larger boards undercount.
pub const ITEM_PAGE_LIMIT: usize = 500;

const ERROR_BODY_LIMIT: usize = 512;

/// GraphQL client for a monday.com-style work-management API.
pub struct MondayGateway {
    client: reqwest::Client,
    base_url: String,
    api_token: SecretString,
    api_version: String,
}

impl MondayGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            api_version: config.api_version.clone(),
        })
    }

    async fn query<T>(&self, query: String) -> Result<T, GatewayError>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!(query_chars = query.len(), "posting graphql query to work-management API");

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", self.api_token.expose_secret())
            .header("API-Version", &self.api_version)
            .json(&json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let payload: GraphQlResponse<T> = response.json().await?;
        if let Some(first_error) = payload.errors.into_iter().next() {
            return Err(GatewayError::Api(first_error.message));
        }

        payload
            .data
            .ok_or_else(|| GatewayError::MalformedResponse("response carried no data".to_string()))
    }
}

#[async_trait]
impl WorkboardGateway for MondayGateway {
    async fn list_boards(&self) -> Result<Vec<BoardRef>, GatewayError> {
        let data: BoardsData = self
            .query(format!("query {{ boards (limit: {BOARD_LOOKUP_LIMIT}) {{ id name }} }}"))
            .await?;
        Ok(data.boards)
    }

    async fn fetch_items(&self, board_id: &str) -> Result<Vec<RawRecord>, GatewayError> {
        // Board ids come back from our own lookup and are numeric; anything
        // else would end up interpolated into the query text.
        if board_id.is_empty() || !board_id.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(GatewayError::Api(format!("invalid board id `{board_id}`")));
        }

        let data: ItemBoardsData = self
            .query(format!(
                "query {{ boards (ids: [{board_id}]) {{ items_page (limit: {ITEM_PAGE_LIMIT}) \
                 {{ items {{ id name column_values {{ id text value }} }} }} }} }}"
            ))
            .await?;

        let board = data.boards.into_iter().next().ok_or_else(|| {
            GatewayError::MalformedResponse(format!("board `{board_id}` missing from response"))
        })?;

        Ok(board.items_page.items.into_iter().map(WireItem::into_record).collect())
    }
}

fn truncate_body(body: String) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return body;
    }
    let mut cut = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…", &body[..cut])
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct GraphQlResponse<T> {
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct BoardsData {
    boards: Vec<BoardRef>,
}

#[derive(Debug, Deserialize)]
struct ItemBoardsData {
    boards: Vec<ItemsBoard>,
}

#[derive(Debug, Deserialize)]
struct ItemsBoard {
    items_page: ItemsPage,
}

#[derive(Debug, Deserialize)]
struct ItemsPage {
    items: Vec<WireItem>,
}

#[derive(Clone, Debug, Deserialize)]
struct WireItem {
    id: String,
    name: String,
    #[serde(default)]
    column_values: Vec<WireColumnValue>,
}

#[derive(Clone, Debug, Deserialize)]
struct WireColumnValue {
    id: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

impl WireItem {
    fn into_record(self) -> RawRecord {
        RawRecord {
            id: self.id,
            name: self.name,
            fields: self
                .column_values
                .into_iter()
                .map(|column| RawField { id: column.id, text: column.text, value: column.value })
                .collect(),
        }
    }
}
