//! Data Source Gateway: the thin transport adapter between the analytics
//! pipeline and the external work-management API.
//!
//! The [`WorkboardGateway`] trait is the seam: analytics code only ever sees
//! ordered `{id, name}` board references and raw records. [`MondayGateway`]
//! is the production GraphQL implementation; [`testing::StaticGateway`] is
//! the in-memory double used by agent and server tests.

mod client;
mod error;
pub mod testing;

use astra_core::{BoardRef, RawRecord};
use async_trait::async_trait;

pub use client::{MondayGateway, BOARD_LOOKUP_LIMIT, ITEM_PAGE_LIMIT};
pub use error::GatewayError;

#[async_trait]
pub trait WorkboardGateway: Send + Sync {
    /// All visible boards, in the order the service returned them.
    async fn list_boards(&self) -> Result<Vec<BoardRef>, GatewayError>;

    /// Up to [`ITEM_PAGE_LIMIT`] items from one board. Larger boards are
    /// silently undercounted: only the first page is fetched.
    async fn fetch_items(&self, board_id: &str) -> Result<Vec<RawRecord>, GatewayError>;

    /// Resolve a board id by name: case-insensitive substring match, first
    /// match in service order wins. A miss is a normal `None`, not an error;
    /// ambiguity resolves to whichever board the service listed first.
    async fn board_id_by_name(&self, name: &str) -> Result<Option<String>, GatewayError> {
        let boards = self.list_boards().await?;
        Ok(find_board_id(&boards, name))
    }
}

pub fn find_board_id(boards: &[BoardRef], name: &str) -> Option<String> {
    let needle = name.to_lowercase();
    boards
        .iter()
        .find(|board| board.name.to_lowercase().contains(&needle))
        .map(|board| board.id.clone())
}

#[cfg(test)]
mod tests {
    use astra_core::BoardRef;

    use super::find_board_id;

    fn board(id: &str, name: &str) -> BoardRef {
        BoardRef { id: id.to_string(), name: name.to_string() }
    }

    #[test]
    fn board_lookup_matches_substring_case_insensitively() {
        let boards =
            vec![board("11", "Q3 Work Orders"), board("12", "Deals Pipeline 2026")];

        assert_eq!(find_board_id(&boards, "deals"), Some("12".to_string()));
        assert_eq!(find_board_id(&boards, "Work Orders"), Some("11".to_string()));
    }

    #[test]
    fn board_lookup_returns_first_match_in_service_order() {
        let boards = vec![board("1", "Deals EMEA"), board("2", "Deals APAC")];
        assert_eq!(find_board_id(&boards, "Deals"), Some("1".to_string()));
    }

    #[test]
    fn board_lookup_misses_yield_none() {
        let boards = vec![board("1", "Hiring")];
        assert_eq!(find_board_id(&boards, "Deals"), None);
    }
}
