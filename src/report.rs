use std::fmt::Write;

use crate::filter::FilterSpec;
use crate::models::DashboardData;

fn describe_filter(filter: &FilterSpec) -> String {
    let mut parts = Vec::new();
    if let Some(agent) = &filter.agent {
        parts.push(format!("agent = {agent}"));
    }
    if let Some(team_leader) = &filter.team_leader {
        parts.push(format!("team leader = {team_leader}"));
    }
    if let Some(supervisor) = &filter.supervisor {
        parts.push(format!("supervisor = {supervisor}"));
    }
    if let Some((from, to)) = filter.date_range() {
        parts.push(format!("days {from} through {to}"));
    }

    if parts.is_empty() {
        "all records".to_string()
    } else {
        parts.join(", ")
    }
}

pub fn build_report(source: &str, filter: &FilterSpec, data: &DashboardData) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Chat Metrics Report");
    let _ = writeln!(output, "Source: {} ({})", source, describe_filter(filter));
    let _ = writeln!(output);
    let _ = writeln!(output, "## KPIs");

    for kpi in &data.kpis {
        let _ = writeln!(output, "- {}: {}", kpi.label, kpi.value);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Daily Trends");

    for (label, series) in &data.trends {
        let formatted: Vec<String> = series.iter().map(|value| format!("{value}")).collect();
        let _ = writeln!(output, "- {}: [{}]", label, formatted.join(", "));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Filter Options");

    let dimensions = [
        ("Agents", &data.domains.agents),
        ("Team leaders", &data.domains.team_leaders),
        ("Supervisors", &data.domains.supervisors),
    ];
    for (title, values) in dimensions {
        if values.is_empty() {
            let _ = writeln!(output, "- {title}: none recorded");
        } else {
            let _ = writeln!(output, "- {}: {}", title, values.join(", "));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::kpi;

    fn sample_data() -> (Dataset, FilterSpec) {
        let headers = vec![
            "day".to_string(),
            "agent".to_string(),
            "total_chats".to_string(),
        ];
        let rows = vec![
            vec!["2024-01-01".to_string(), "Mia".to_string(), "10".to_string()],
            vec!["2024-01-02".to_string(), "Zoe".to_string(), "20".to_string()],
        ];
        (Dataset::from_rows(headers, rows), FilterSpec::default())
    }

    #[test]
    fn report_lists_every_kpi_and_domain() {
        let (dataset, filter) = sample_data();
        let data = kpi::compute(&dataset, &filter);
        let report = build_report("chat_metrics.csv", &filter, &data);
        assert!(report.contains("# Chat Metrics Report"));
        assert!(report.contains("(all records)"));
        assert!(report.contains("- Total Chats: 30"));
        assert!(report.contains("- Avg Queue Time: N/A"));
        assert!(report.contains("- Total Chats: [10, 20]"));
        assert!(report.contains("- Agents: Mia, Zoe"));
        assert!(report.contains("- Supervisors: none recorded"));
    }

    #[test]
    fn active_filters_are_described_in_the_header() {
        let (dataset, _) = sample_data();
        let filter = FilterSpec::from_params(
            Some("Mia"),
            None,
            None,
            Some("2024-01-01"),
            Some("2024-01-31"),
        );
        let data = kpi::compute(&dataset, &filter);
        let report = build_report("chat_metrics.csv", &filter, &data);
        assert!(report.contains("agent = Mia, days 2024-01-01 through 2024-01-31"));
        assert!(report.contains("- Total Chats: 10"));
    }
}
