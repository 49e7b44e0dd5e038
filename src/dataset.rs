use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use crate::models::{FilterDomains, Record};

pub const DAY_FIELD: &str = "day";
pub const AGENT_FIELD: &str = "agent";
pub const TEAM_LEADER_FIELD: &str = "team_leader";
pub const SUPERVISOR_FIELD: &str = "supervisor";

const CATEGORICAL_FIELDS: [&str; 3] = [AGENT_FIELD, TEAM_LEADER_FIELD, SUPERVISOR_FIELD];

const NUMERIC_FIELDS: [&str; 13] = [
    "total_chats",
    "avg_response_time",
    "csat",
    "active_agents",
    "escalations",
    "resolved_tickets",
    "pending_tickets",
    "chat_duration",
    "sales_conversion",
    "queue_time",
    "support",
    "sales",
    "tech",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Categorical,
    Date,
}

/// Column descriptor built once per load. The aggregator consults this
/// instead of probing individual rows for column presence.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: BTreeMap<String, FieldKind>,
}

impl Schema {
    fn infer(headers: &[String], rows: &[Vec<String>]) -> Self {
        let mut fields = BTreeMap::new();
        for (index, name) in headers.iter().enumerate() {
            fields.insert(name.clone(), classify(name, index, rows));
        }
        Schema { fields }
    }

    pub fn kind(&self, field: &str) -> Option<FieldKind> {
        self.fields.get(field).copied()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

fn classify(name: &str, index: usize, rows: &[Vec<String>]) -> FieldKind {
    if name == DAY_FIELD {
        return FieldKind::Date;
    }
    if CATEGORICAL_FIELDS.contains(&name) {
        return FieldKind::Categorical;
    }
    if NUMERIC_FIELDS.contains(&name) {
        return FieldKind::Numeric;
    }
    // Unknown column: sniff the first non-empty cell.
    let sample = rows
        .iter()
        .filter_map(|row| row.get(index))
        .map(|cell| cell.trim())
        .find(|cell| !cell.is_empty());
    match sample {
        Some(cell) if cell.parse::<f64>().is_ok() => FieldKind::Numeric,
        _ => FieldKind::Categorical,
    }
}

pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// The metrics table, loaded once per process and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub schema: Schema,
}

impl Dataset {
    pub fn from_csv(path: &Path) -> anyhow::Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let headers: Vec<String> = reader
            .headers()
            .context("failed to read CSV header row")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let row = result.with_context(|| format!("malformed row in {}", path.display()))?;
            rows.push(row.iter().map(str::to_string).collect());
        }

        Ok(Self::from_rows(headers, rows))
    }

    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let schema = Schema::infer(&headers, &rows);
        let records = rows
            .iter()
            .map(|row| build_record(&headers, &schema, row))
            .collect();
        Dataset { records, schema }
    }

    /// Sorted distinct values for the three filterable dimensions, taken
    /// from the whole dataset so dropdowns survive an active filter.
    pub fn domains(&self) -> FilterDomains {
        FilterDomains {
            agents: self.distinct(AGENT_FIELD),
            team_leaders: self.distinct(TEAM_LEADER_FIELD),
            supervisors: self.distinct(SUPERVISOR_FIELD),
        }
    }

    fn distinct(&self, field: &str) -> Vec<String> {
        let values: BTreeSet<String> = self
            .records
            .iter()
            .filter_map(|record| record.labels.get(field).cloned())
            .collect();
        values.into_iter().collect()
    }

    /// The raw record list as JSON objects, one per row.
    pub fn to_json_records(&self) -> Vec<Value> {
        self.records
            .iter()
            .map(|record| {
                let mut object = Map::new();
                if let Some(day) = record.day {
                    object.insert(DAY_FIELD.to_string(), json!(day.to_string()));
                }
                for (field, value) in &record.labels {
                    object.insert(field.clone(), json!(value));
                }
                for (field, value) in &record.numbers {
                    if value.fract() == 0.0 {
                        object.insert(field.clone(), json!(*value as i64));
                    } else {
                        object.insert(field.clone(), json!(value));
                    }
                }
                Value::Object(object)
            })
            .collect()
    }
}

fn build_record(headers: &[String], schema: &Schema, row: &[String]) -> Record {
    let mut record = Record::default();
    for (name, cell) in headers.iter().zip(row.iter()) {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        match schema.kind(name) {
            Some(FieldKind::Date) => record.day = parse_day(cell),
            Some(FieldKind::Numeric) => {
                if let Ok(value) = cell.parse::<f64>() {
                    record.numbers.insert(name.clone(), value);
                }
            }
            Some(FieldKind::Categorical) => {
                record.labels.insert(name.clone(), cell.to_string());
            }
            None => {}
        }
    }
    record
}
