//! Aggregate computations over normalized board records.
//!
//! These are pure functions; fetching and normalization happen upstream.
//! The serialized field names (`totalDeals`, `closedRevenue`, ...) are the
//! wire contract consumed by the completion service, so they stay camelCase.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::NormalizedRecord;

/// Counters for records whose monetary fields failed to normalize.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    pub missing_revenue: usize,
    pub missing_probability: usize,
}

/// Result of one deals analysis: headline aggregates plus the normalized
/// record list for tabular rendering by the caller.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealsSummary {
    pub total_deals: usize,
    pub closed_revenue: f64,
    pub weighted_pipeline: f64,
    pub revenue_by_sector: BTreeMap<String, f64>,
    pub data_quality: DataQuality,
    pub item_list: Vec<NormalizedRecord>,
}

/// Result of one work-order analysis.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrdersSummary {
    pub total_orders: usize,
    pub status_distribution: BTreeMap<String, usize>,
    pub item_list: Vec<NormalizedRecord>,
}

pub fn summarize_deals(records: Vec<NormalizedRecord>) -> DealsSummary {
    let total_deals = records.len();

    let closed_revenue = records
        .iter()
        .filter(|record| record.stage.eq_ignore_ascii_case("closed"))
        .map(|record| record.revenue)
        .sum();

    let weighted_pipeline =
        records.iter().map(|record| record.revenue * record.probability).sum();

    let mut revenue_by_sector = BTreeMap::new();
    for record in &records {
        *revenue_by_sector.entry(record.sector.clone()).or_insert(0.0) += record.revenue;
    }

    let data_quality = DataQuality {
        missing_revenue: records.iter().filter(|record| record.revenue == 0.0).count(),
        missing_probability: records.iter().filter(|record| record.probability == 0.0).count(),
    };

    DealsSummary {
        total_deals,
        closed_revenue,
        weighted_pipeline,
        revenue_by_sector,
        data_quality,
        item_list: records,
    }
}

pub fn summarize_work_orders(records: Vec<NormalizedRecord>) -> WorkOrdersSummary {
    let total_orders = records.len();

    let mut status_distribution = BTreeMap::new();
    for record in &records {
        *status_distribution.entry(record.status.clone()).or_insert(0) += 1;
    }

    WorkOrdersSummary { total_orders, status_distribution, item_list: records }
}

#[cfg(test)]
mod tests {
    use crate::domain::{NormalizedRecord, RawField, RawRecord};
    use crate::normalize::normalize_board_data;

    use super::{summarize_deals, summarize_work_orders};

    fn deal(id: &str, revenue: f64, probability: f64, stage: &str, sector: &str) -> NormalizedRecord {
        NormalizedRecord {
            id: id.to_string(),
            name: format!("Deal {id}"),
            revenue,
            probability,
            stage: stage.to_string(),
            status: stage.to_string(),
            sector: sector.to_string(),
        }
    }

    #[test]
    fn deals_summary_computes_exact_aggregates() {
        let records = vec![
            deal("1", 10_000.0, 0.5, "Closed", "Energy"),
            deal("2", 200_000.0, 0.3, "Open", "Finance"),
            deal("3", 4_000.0, 1.0, "closed", "Energy"),
        ];

        let summary = summarize_deals(records);
        assert_eq!(summary.total_deals, 3);
        assert_eq!(summary.closed_revenue, 14_000.0);
        assert_eq!(summary.weighted_pipeline, 10_000.0 * 0.5 + 200_000.0 * 0.3 + 4_000.0);
        assert_eq!(summary.revenue_by_sector.get("Energy"), Some(&14_000.0));
        assert_eq!(summary.revenue_by_sector.get("Finance"), Some(&200_000.0));
        assert_eq!(summary.revenue_by_sector.len(), 2);
        assert_eq!(summary.item_list.len(), 3);
    }

    #[test]
    fn deals_summary_counts_missing_monetary_fields() {
        let records = vec![
            deal("1", 0.0, 0.4, "Open", "Other"),
            deal("2", 9_000.0, 0.0, "Open", "Other"),
            deal("3", 0.0, 0.0, "Open", "Other"),
        ];

        let summary = summarize_deals(records);
        assert_eq!(summary.data_quality.missing_revenue, 2);
        assert_eq!(summary.data_quality.missing_probability, 2);
    }

    // The scenario from the pipeline walkthrough: three raw records with
    // mixed currency notations and a missing revenue cell.
    #[test]
    fn deals_pipeline_round_trip_from_raw_records() {
        let raw = vec![
            RawRecord {
                id: "1".to_string(),
                name: "Alpha".to_string(),
                fields: vec![
                    RawField::new("revenue", Some("$10k")),
                    RawField::new("probability", Some("50%")),
                    RawField::new("stage", Some("Closed")),
                ],
            },
            RawRecord {
                id: "2".to_string(),
                name: "Beta".to_string(),
                fields: vec![
                    RawField::new("revenue", Some("₹2l")),
                    RawField::new("probability", Some("0.3")),
                    RawField::new("stage", Some("Open")),
                ],
            },
            RawRecord {
                id: "3".to_string(),
                name: "Gamma".to_string(),
                fields: vec![RawField::new("stage", Some("Open"))],
            },
        ];

        let summary = summarize_deals(normalize_board_data(&raw));
        assert_eq!(summary.total_deals, 3);
        assert_eq!(summary.closed_revenue, 10_000.0);
        assert_eq!(summary.weighted_pipeline, 10_000.0 * 0.5 + 200_000.0 * 0.3);
        assert_eq!(summary.data_quality.missing_revenue, 1);
    }

    #[test]
    fn deals_summary_serializes_with_wire_field_names() {
        let payload = serde_json::to_value(summarize_deals(vec![deal(
            "1", 5_000.0, 0.2, "Open", "Retail",
        )]))
        .expect("summary should serialize");

        assert_eq!(payload["totalDeals"], 1);
        assert_eq!(payload["weightedPipeline"], 1_000.0);
        assert_eq!(payload["revenueBySector"]["Retail"], 5_000.0);
        assert_eq!(payload["dataQuality"]["missingRevenue"], 0);
        assert_eq!(payload["itemList"][0]["stage"], "Open");
    }

    #[test]
    fn work_orders_summary_groups_by_status() {
        let records = vec![
            deal("1", 0.0, 0.0, "Done", "Other"),
            deal("2", 0.0, 0.0, "In Progress", "Other"),
            deal("3", 0.0, 0.0, "Done", "Other"),
        ];

        let summary = summarize_work_orders(records);
        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.status_distribution.get("Done"), Some(&2));
        assert_eq!(summary.status_distribution.get("In Progress"), Some(&1));

        let payload = serde_json::to_value(&summary).expect("summary should serialize");
        assert_eq!(payload["totalOrders"], 3);
        assert_eq!(payload["statusDistribution"]["Done"], 2);
    }
}
