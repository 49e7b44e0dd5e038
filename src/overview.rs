use crate::dataset::Dataset;
use crate::models::{AgentCsatPoint, CategoryMix, Overview, Record, TrendPoint};

/// Headline aggregates for the simple, unfiltered dashboard: four KPI
/// values plus the chart series the page plots. Missing columns degrade
/// the same way the filtered dashboard does.
pub fn build_overview(dataset: &Dataset) -> Overview {
    let records = &dataset.records;

    let total_chats = column_sum(records, "total_chats") as i64;
    let avg_response = match column_mean(records, "avg_response_time") {
        Some(mean) => format!("{mean:.1} sec"),
        None => "N/A".to_string(),
    };
    let avg_csat = match column_mean(records, "csat") {
        Some(mean) => format!("{:.1}%", mean * 100.0),
        None => "N/A".to_string(),
    };
    let avg_agents = column_mean(records, "active_agents").unwrap_or(0.0) as i64;

    Overview {
        total_chats,
        avg_response,
        avg_csat,
        avg_agents,
        chats_trend: day_series(records, "total_chats"),
        response_trend: day_series(records, "avg_response_time"),
        category_mix: CategoryMix {
            support: column_mean(records, "support").unwrap_or(0.0),
            sales: column_mean(records, "sales").unwrap_or(0.0),
            tech: column_mean(records, "tech").unwrap_or(0.0),
        },
        agents_csat: agents_csat_series(records),
    }
}

fn column_sum(records: &[Record], field: &str) -> f64 {
    records
        .iter()
        .filter_map(|record| record.numbers.get(field))
        .sum()
}

fn column_mean(records: &[Record], field: &str) -> Option<f64> {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|record| record.numbers.get(field).copied())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn day_series(records: &[Record], field: &str) -> Vec<TrendPoint> {
    records
        .iter()
        .filter_map(|record| {
            let day = record.day?;
            let value = record.numbers.get(field).copied()?;
            Some(TrendPoint { day, value })
        })
        .collect()
}

fn agents_csat_series(records: &[Record]) -> Vec<AgentCsatPoint> {
    records
        .iter()
        .filter_map(|record| {
            let day = record.day?;
            let active_agents = record.numbers.get("active_agents").copied()?;
            let csat = record.numbers.get("csat").copied()?;
            Some(AgentCsatPoint {
                day,
                active_agents,
                csat,
            })
        })
        .collect()
}
