use chrono::NaiveDate;

use crate::dataset::{parse_day, AGENT_FIELD, SUPERVISOR_FIELD, TEAM_LEADER_FIELD};
use crate::models::Record;

/// User-supplied constraints narrowing the dataset view for one request.
/// All present constraints are applied as a conjunction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub agent: Option<String>,
    pub team_leader: Option<String>,
    pub supervisor: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl FilterSpec {
    /// Builds a spec from raw query-style parameters. Blank values and
    /// unparsable dates are treated as absent constraints.
    pub fn from_params(
        agent: Option<&str>,
        team_leader: Option<&str>,
        supervisor: Option<&str>,
        from_date: Option<&str>,
        to_date: Option<&str>,
    ) -> Self {
        FilterSpec {
            agent: normalize(agent),
            team_leader: normalize(team_leader),
            supervisor: normalize(supervisor),
            from_date: from_date.and_then(parse_day),
            to_date: to_date.and_then(parse_day),
        }
    }

    /// The date constraint applies only when both bounds are present;
    /// a one-sided bound is ignored entirely.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.from_date, self.to_date) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        let dimensions = [
            (AGENT_FIELD, &self.agent),
            (TEAM_LEADER_FIELD, &self.team_leader),
            (SUPERVISOR_FIELD, &self.supervisor),
        ];
        for (field, wanted) in dimensions {
            if let Some(wanted) = wanted {
                if record.labels.get(field) != Some(wanted) {
                    return false;
                }
            }
        }

        if let Some((from, to)) = self.date_range() {
            match record.day {
                Some(day) => from <= day && day <= to,
                None => false,
            }
        } else {
            true
        }
    }
}

fn normalize(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
