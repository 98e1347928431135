//! In-memory gateway double for agent and server tests.

use std::collections::HashMap;

use astra_core::{BoardRef, RawRecord};
use async_trait::async_trait;

use crate::error::GatewayError;
use crate::WorkboardGateway;

/// A [`WorkboardGateway`] backed by fixed data, with an optional scripted
/// outage that makes every call fail the way a broken upstream would.
#[derive(Default)]
pub struct StaticGateway {
    boards: Vec<BoardRef>,
    items: HashMap<String, Vec<RawRecord>>,
    outage: Option<String>,
}

impl StaticGateway {
    pub fn new(boards: Vec<BoardRef>, items: HashMap<String, Vec<RawRecord>>) -> Self {
        Self { boards, items, outage: None }
    }

    pub fn with_board(mut self, id: &str, name: &str, records: Vec<RawRecord>) -> Self {
        self.boards.push(BoardRef { id: id.to_string(), name: name.to_string() });
        self.items.insert(id.to_string(), records);
        self
    }

    pub fn with_outage(message: impl Into<String>) -> Self {
        Self { outage: Some(message.into()), ..Self::default() }
    }

    fn check_outage(&self) -> Result<(), GatewayError> {
        match &self.outage {
            Some(message) => {
                Err(GatewayError::Status { status: 503, body: message.clone() })
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WorkboardGateway for StaticGateway {
    async fn list_boards(&self) -> Result<Vec<BoardRef>, GatewayError> {
        self.check_outage()?;
        Ok(self.boards.clone())
    }

    async fn fetch_items(&self, board_id: &str) -> Result<Vec<RawRecord>, GatewayError> {
        self.check_outage()?;
        Ok(self.items.get(board_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use crate::{GatewayError, WorkboardGateway};

    use super::StaticGateway;

    #[tokio::test]
    async fn resolves_board_ids_through_the_default_lookup() {
        let gateway = StaticGateway::default().with_board("42", "Deals", Vec::new());

        let board_id =
            gateway.board_id_by_name("deals").await.expect("lookup should not fail");
        assert_eq!(board_id.as_deref(), Some("42"));

        let missing =
            gateway.board_id_by_name("Work Orders").await.expect("lookup should not fail");
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn scripted_outage_fails_every_call() {
        let gateway = StaticGateway::with_outage("upstream maintenance");

        let error = gateway.list_boards().await.expect_err("outage should fail lookups");
        assert!(matches!(error, GatewayError::Status { status: 503, .. }));
    }
}
