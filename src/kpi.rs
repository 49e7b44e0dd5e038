use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::dataset::{Dataset, Schema, DAY_FIELD};
use crate::filter::FilterSpec;
use crate::models::{DashboardData, KpiResult, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Mean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Truncated integer, defaults to "0".
    Whole,
    /// One decimal with a "sec" suffix, defaults to "N/A".
    Seconds,
    /// One decimal with a "min" suffix, defaults to "N/A".
    Minutes,
    /// Fraction scaled by 100 with a "%" suffix, defaults to "N/A".
    Percent,
}

/// One entry of the fixed KPI catalog. The trend aggregate is declared here
/// explicitly rather than inferred from how the column happens to be stored.
#[derive(Debug, Clone, Copy)]
pub struct KpiDefinition {
    pub label: &'static str,
    pub field: &'static str,
    pub aggregate: Aggregate,
    pub trend: Aggregate,
    pub format: Format,
}

pub const CATALOG: [KpiDefinition; 10] = [
    KpiDefinition {
        label: "Total Chats",
        field: "total_chats",
        aggregate: Aggregate::Sum,
        trend: Aggregate::Sum,
        format: Format::Whole,
    },
    KpiDefinition {
        label: "Avg Response Time",
        field: "avg_response_time",
        aggregate: Aggregate::Mean,
        trend: Aggregate::Mean,
        format: Format::Seconds,
    },
    KpiDefinition {
        label: "Avg CSAT",
        field: "csat",
        aggregate: Aggregate::Mean,
        trend: Aggregate::Mean,
        format: Format::Percent,
    },
    KpiDefinition {
        label: "Active Agents",
        field: "active_agents",
        aggregate: Aggregate::Mean,
        trend: Aggregate::Sum,
        format: Format::Whole,
    },
    KpiDefinition {
        label: "Escalations",
        field: "escalations",
        aggregate: Aggregate::Sum,
        trend: Aggregate::Sum,
        format: Format::Whole,
    },
    KpiDefinition {
        label: "Resolved Tickets",
        field: "resolved_tickets",
        aggregate: Aggregate::Mean,
        trend: Aggregate::Mean,
        format: Format::Percent,
    },
    KpiDefinition {
        label: "Pending Tickets",
        field: "pending_tickets",
        aggregate: Aggregate::Sum,
        trend: Aggregate::Sum,
        format: Format::Whole,
    },
    KpiDefinition {
        label: "Avg Chat Duration",
        field: "chat_duration",
        aggregate: Aggregate::Mean,
        trend: Aggregate::Mean,
        format: Format::Minutes,
    },
    KpiDefinition {
        label: "Sales Conversions",
        field: "sales_conversion",
        aggregate: Aggregate::Mean,
        trend: Aggregate::Mean,
        format: Format::Percent,
    },
    KpiDefinition {
        label: "Avg Queue Time",
        field: "queue_time",
        aggregate: Aggregate::Mean,
        trend: Aggregate::Mean,
        format: Format::Seconds,
    },
];

/// Computes the full dashboard payload for one request: the ten catalog
/// KPIs and their per-day trends over the filtered view, plus the filter
/// domains over the whole dataset.
pub fn compute(dataset: &Dataset, filter: &FilterSpec) -> DashboardData {
    let view: Vec<&Record> = dataset
        .records
        .iter()
        .filter(|record| filter.matches(record))
        .collect();

    let kpis = CATALOG
        .iter()
        .map(|def| KpiResult {
            label: def.label.to_string(),
            value: evaluate(def, &dataset.schema, &view),
        })
        .collect();

    let mut trends = BTreeMap::new();
    for def in CATALOG.iter() {
        trends.insert(def.label.to_string(), trend_series(def, &dataset.schema, &view));
    }

    DashboardData {
        kpis,
        trends,
        domains: dataset.domains(),
    }
}

fn field_values(field: &str, view: &[&Record]) -> Vec<f64> {
    view.iter()
        .filter_map(|record| record.numbers.get(field).copied())
        .collect()
}

fn aggregate(values: &[f64], how: Aggregate) -> f64 {
    let total: f64 = values.iter().sum();
    match how {
        Aggregate::Sum => total,
        Aggregate::Mean => total / values.len() as f64,
    }
}

fn evaluate(def: &KpiDefinition, schema: &Schema, view: &[&Record]) -> String {
    let values = if schema.has(def.field) {
        field_values(def.field, view)
    } else {
        Vec::new()
    };
    // Covers the absent column, the empty view, and the all-cells-missing
    // case that matters for Active Agents.
    if values.is_empty() {
        return match def.format {
            Format::Whole => "0".to_string(),
            _ => "N/A".to_string(),
        };
    }

    let value = aggregate(&values, def.aggregate);
    match def.format {
        Format::Whole => format!("{}", value as i64),
        Format::Seconds => format!("{value:.1} sec"),
        Format::Minutes => format!("{value:.1} min"),
        Format::Percent => format!("{:.1}%", value * 100.0),
    }
}

fn trend_series(def: &KpiDefinition, schema: &Schema, view: &[&Record]) -> Vec<f64> {
    let series: Vec<f64> = if schema.has(DAY_FIELD) {
        let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        for record in view {
            if let (Some(day), Some(value)) = (record.day, record.numbers.get(def.field)) {
                by_day.entry(day).or_default().push(*value);
            }
        }
        by_day
            .values()
            .map(|values| aggregate(values, def.trend))
            .collect()
    } else {
        field_values(def.field, view)
    };

    if series.is_empty() {
        vec![0.0]
    } else {
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn two_day_dataset() -> Dataset {
        Dataset::from_rows(
            headers(&["day", "total_chats"]),
            rows(&[&["2024-01-01", "10"], &["2024-01-02", "20"]]),
        )
    }

    fn kpi_value(data: &DashboardData, label: &str) -> String {
        data.kpis
            .iter()
            .find(|kpi| kpi.label == label)
            .map(|kpi| kpi.value.clone())
            .unwrap()
    }

    #[test]
    fn always_returns_ten_kpis() {
        let empty = Dataset::from_rows(Vec::new(), Vec::new());
        let data = compute(&empty, &FilterSpec::default());
        assert_eq!(data.kpis.len(), 10);
        assert_eq!(data.trends.len(), 10);
    }

    #[test]
    fn sums_and_degrades_over_a_sparse_schema() {
        let data = compute(&two_day_dataset(), &FilterSpec::default());
        assert_eq!(kpi_value(&data, "Total Chats"), "30");
        assert_eq!(kpi_value(&data, "Avg Response Time"), "N/A");
        assert_eq!(kpi_value(&data, "Active Agents"), "0");
        assert_eq!(data.trends["Total Chats"], vec![10.0, 20.0]);
        assert_eq!(data.trends["Avg CSAT"], vec![0.0]);
        assert!(data.domains.agents.is_empty());
    }

    #[test]
    fn date_range_narrows_kpis_and_trends() {
        let filter =
            FilterSpec::from_params(None, None, None, Some("2024-01-02"), Some("2024-01-02"));
        let data = compute(&two_day_dataset(), &filter);
        assert_eq!(kpi_value(&data, "Total Chats"), "20");
        assert_eq!(data.trends["Total Chats"], vec![20.0]);
    }

    #[test]
    fn formats_means_rates_and_truncated_counts() {
        let dataset = Dataset::from_rows(
            headers(&[
                "day",
                "avg_response_time",
                "csat",
                "active_agents",
                "chat_duration",
            ]),
            rows(&[
                &["2024-01-01", "12.0", "0.8", "4", "7.25"],
                &["2024-01-02", "10.0", "0.86", "5", "6.75"],
            ]),
        );
        let data = compute(&dataset, &FilterSpec::default());
        assert_eq!(kpi_value(&data, "Avg Response Time"), "11.0 sec");
        assert_eq!(kpi_value(&data, "Avg CSAT"), "83.0%");
        assert_eq!(kpi_value(&data, "Active Agents"), "4");
        assert_eq!(kpi_value(&data, "Avg Chat Duration"), "7.0 min");
    }

    #[test]
    fn empty_view_degrades_everything_to_defaults() {
        let filter = FilterSpec::from_params(Some("Nobody"), None, None, None, None);
        let dataset = Dataset::from_rows(
            headers(&["day", "agent", "total_chats", "csat"]),
            rows(&[&["2024-01-01", "Mia", "10", "0.8"]]),
        );
        let data = compute(&dataset, &filter);
        for kpi in &data.kpis {
            assert!(kpi.value == "0" || kpi.value == "N/A", "{kpi:?}");
        }
        for series in data.trends.values() {
            assert_eq!(series, &vec![0.0]);
        }
    }

    #[test]
    fn domains_ignore_the_active_filter() {
        let dataset = Dataset::from_rows(
            headers(&["day", "agent", "total_chats"]),
            rows(&[
                &["2024-01-01", "Mia", "10"],
                &["2024-01-02", "Zoe", "20"],
            ]),
        );
        let filtered = compute(
            &dataset,
            &FilterSpec::from_params(Some("Mia"), None, None, None, None),
        );
        let unfiltered = compute(&dataset, &FilterSpec::default());
        assert_eq!(filtered.domains, unfiltered.domains);
        assert_eq!(filtered.domains.agents, vec!["Mia", "Zoe"]);
    }

    #[test]
    fn empty_filter_reproduces_the_unfiltered_aggregate() {
        let dataset = Dataset::from_rows(
            headers(&["day", "agent", "total_chats", "csat"]),
            rows(&[
                &["2024-01-01", "Mia", "10", "0.8"],
                &["2024-01-02", "Zoe", "20", "0.9"],
            ]),
        );
        let via_params = FilterSpec::from_params(None, None, None, None, None);
        assert_eq!(
            compute(&dataset, &via_params),
            compute(&dataset, &FilterSpec::default())
        );
    }

    #[test]
    fn compute_is_pure() {
        let dataset = two_day_dataset();
        let filter = FilterSpec::from_params(None, None, None, Some("2024-01-01"), Some("2024-01-02"));
        assert_eq!(compute(&dataset, &filter), compute(&dataset, &filter));
    }

    #[test]
    fn trend_groups_repeated_days_by_declared_aggregate() {
        let dataset = Dataset::from_rows(
            headers(&["day", "total_chats", "csat"]),
            rows(&[
                &["2024-01-01", "10", "0.5"],
                &["2024-01-01", "30", "0.75"],
                &["2024-01-02", "20", "0.9"],
            ]),
        );
        let data = compute(&dataset, &FilterSpec::default());
        // Counts sum per day, rates average per day.
        assert_eq!(data.trends["Total Chats"], vec![40.0, 20.0]);
        assert_eq!(data.trends["Avg CSAT"], vec![0.625, 0.9]);
    }

    #[test]
    fn without_a_day_column_trends_stay_ungrouped() {
        let dataset = Dataset::from_rows(
            headers(&["total_chats"]),
            rows(&[&["10"], &["30"], &["20"]]),
        );
        let data = compute(&dataset, &FilterSpec::default());
        assert_eq!(data.trends["Total Chats"], vec![10.0, 30.0, 20.0]);
    }

    #[test]
    fn active_agents_defaults_to_zero_when_all_cells_are_missing() {
        let dataset = Dataset::from_rows(
            headers(&["day", "active_agents", "total_chats"]),
            rows(&[&["2024-01-01", "", "10"], &["2024-01-02", "", "20"]]),
        );
        let data = compute(&dataset, &FilterSpec::default());
        assert_eq!(kpi_value(&data, "Active Agents"), "0");
        assert_eq!(kpi_value(&data, "Total Chats"), "30");
    }
}
