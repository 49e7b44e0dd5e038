use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

/// One row of the metrics CSV. Cells that are empty or unparsable for their
/// column kind are simply absent from the maps.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub day: Option<NaiveDate>,
    pub numbers: HashMap<String, f64>,
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiResult {
    pub label: String,
    pub value: String,
}

/// Distinct values per filterable dimension, always drawn from the full
/// dataset regardless of any active filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterDomains {
    pub agents: Vec<String>,
    pub team_leaders: Vec<String>,
    pub supervisors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub kpis: Vec<KpiResult>,
    pub trends: BTreeMap<String, Vec<f64>>,
    pub domains: FilterDomains,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub day: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMix {
    pub support: f64,
    pub sales: f64,
    pub tech: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentCsatPoint {
    pub day: NaiveDate,
    pub active_agents: f64,
    pub csat: f64,
}

/// Unfiltered headline aggregates for the simple dashboard variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_chats: i64,
    pub avg_response: String,
    pub avg_csat: String,
    pub avg_agents: i64,
    pub chats_trend: Vec<TrendPoint>,
    pub response_trend: Vec<TrendPoint>,
    pub category_mix: CategoryMix,
    pub agents_csat: Vec<AgentCsatPoint>,
}
