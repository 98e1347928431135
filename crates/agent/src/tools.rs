//! Analytics Functions: the callable capabilities the orchestration
//! advertises to the completion service.
//!
//! Each function resolves its board by name, fetches one page of raw items,
//! normalizes them, and computes the board's aggregates. A missing board is
//! not a failure: it short-circuits into an `{"error": …}` payload that the
//! completion service can explain to the user, and the conversation
//! continues.

use std::sync::Arc;

use astra_core::{normalize_board_data, summarize_deals, summarize_work_orders, NormalizedRecord};
use astra_gateway::{GatewayError, WorkboardGateway};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llm::ToolDeclaration;
use crate::trace::ExecutionTrace;

pub const DEALS_BOARD: &str = "Deals";
pub const WORK_ORDERS_BOARD: &str = "Work Orders";

#[async_trait]
pub trait AnalyticsFunction: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;

    /// Execute against live data, appending the steps taken to `trace`.
    /// Returns the aggregate payload, which may be an `{"error": …}` value.
    async fn run(&self, trace: &mut ExecutionTrace) -> Result<Value, GatewayError>;
}

/// Ordered set of registered Analytics Functions. Declaration order is
/// registration order, so the completion service sees a stable tool list.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn AnalyticsFunction>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: AnalyticsFunction + 'static,
    {
        self.tools.push(Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AnalyticsFunction>> {
        self.tools.iter().find(|tool| tool.name() == name).cloned()
    }

    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools
            .iter()
            .map(|tool| ToolDeclaration::function(tool.name(), tool.description()))
            .collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Revenue, pipeline, and sector aggregates over the Deals board.
pub struct DealsAnalysis {
    gateway: Arc<dyn WorkboardGateway>,
}

impl DealsAnalysis {
    pub fn new(gateway: Arc<dyn WorkboardGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl AnalyticsFunction for DealsAnalysis {
    fn name(&self) -> &'static str {
        "analyze_deals"
    }

    fn description(&self) -> &'static str {
        "Fetch and analyze all data from the Deals board for revenue, pipeline, and sectors."
    }

    async fn run(&self, trace: &mut ExecutionTrace) -> Result<Value, GatewayError> {
        let Some(records) = fetch_normalized(self.gateway.as_ref(), DEALS_BOARD, trace).await?
        else {
            return Ok(board_not_found(DEALS_BOARD));
        };

        trace.push("Performing BI analytics on deals...");
        Ok(serde_json::to_value(summarize_deals(records)).unwrap_or(Value::Null))
    }
}

/// Status-distribution aggregates over the Work Orders board.
pub struct WorkOrderAnalysis {
    gateway: Arc<dyn WorkboardGateway>,
}

impl WorkOrderAnalysis {
    pub fn new(gateway: Arc<dyn WorkboardGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl AnalyticsFunction for WorkOrderAnalysis {
    fn name(&self) -> &'static str {
        "analyze_work_orders"
    }

    fn description(&self) -> &'static str {
        "Fetch and analyze data from the Work Orders board for status and progress."
    }

    async fn run(&self, trace: &mut ExecutionTrace) -> Result<Value, GatewayError> {
        let Some(records) =
            fetch_normalized(self.gateway.as_ref(), WORK_ORDERS_BOARD, trace).await?
        else {
            return Ok(board_not_found(WORK_ORDERS_BOARD));
        };

        Ok(serde_json::to_value(summarize_work_orders(records)).unwrap_or(Value::Null))
    }
}

async fn fetch_normalized(
    gateway: &dyn WorkboardGateway,
    board: &str,
    trace: &mut ExecutionTrace,
) -> Result<Option<Vec<NormalizedRecord>>, GatewayError> {
    trace.push(format!("Detecting '{board}' board ID..."));
    let Some(board_id) = gateway.board_id_by_name(board).await? else {
        trace.push(format!("Error: {board} board not found."));
        return Ok(None);
    };

    trace.push(format!("Fetching live items from {board} board (ID: {board_id})..."));
    let items = gateway.fetch_items(&board_id).await?;

    trace.push(format!("Normalizing {} records...", items.len()));
    Ok(Some(normalize_board_data(&items)))
}

fn board_not_found(board: &str) -> Value {
    json!({ "error": format!("{board} board not found") })
}
