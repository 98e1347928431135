pub mod analytics;
pub mod config;
pub mod domain;
pub mod normalize;

pub use analytics::{
    summarize_deals, summarize_work_orders, DataQuality, DealsSummary, WorkOrdersSummary,
};
pub use domain::{BoardRef, NormalizedRecord, RawField, RawRecord};
pub use normalize::{normalize_board_data, normalize_probability, normalize_revenue};
