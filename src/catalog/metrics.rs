//! Metric metadata store
//!
//! Wraps the fetched metric metadata rows with the join tables the
//! composite value grammars need: which period catalog applies to a
//! metric identifier, which relative/absolute periods a screening
//! condition accepts, which comparison operators its data format allows,
//! and which bound values are valid. An unknown metric name yields empty
//! catalogs everywhere, which degrades to "no suggestions".

use std::collections::HashMap;

use crate::catalog::static_lists::FIRST_FISCAL_YEAR;
use crate::catalog::Candidate;
use crate::client::MetricMetadata;
use chrono::{Datelike, Utc};

/// Metric kinds backed by periodic financial statements.
const STATEMENT_KINDS: [&str; 2] = ["fin_metric", "fin_statement"];

pub struct MetricStore {
    rows: Vec<MetricMetadata>,
    by_name: HashMap<String, usize>,
}

impl MetricStore {
    pub fn new(rows: Vec<MetricMetadata>) -> Self {
        let by_name = rows
            .iter()
            .enumerate()
            .map(|(index, row)| (row.metric_name.clone(), index))
            .collect();
        Self { rows, by_name }
    }

    pub fn get(&self, metric_name: &str) -> Option<&MetricMetadata> {
        self.by_name.get(metric_name).map(|&index| &self.rows[index])
    }

    pub fn rows(&self) -> &[MetricMetadata] {
        &self.rows
    }

    /// All metrics as completion candidates, in catalog order.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.rows
            .iter()
            .map(|row| Candidate::new(row.metric_name.clone(), row.display_name.clone()))
            .collect()
    }

    /// Periods valid after the dot in a `metric.period` identifier.
    pub fn identifier_periods(&self, metric_name: &str) -> Vec<Candidate> {
        let Some(row) = self.get(metric_name) else {
            return Vec::new();
        };
        if STATEMENT_KINDS.contains(&row.kind.as_str()) {
            relative_periods()
        } else if row.kind == "earnings" {
            vec![
                Candidate::new("mrq", "Most Recent Quarter"),
                Candidate::new("1qa", "One Quarter Ago"),
                Candidate::new("2qa", "Two Quarters Ago"),
                Candidate::new("uq", "Upcoming Quarter"),
            ]
        } else {
            Vec::new()
        }
    }

    /// Periods valid in a `metric:period:...` screening condition.
    ///
    /// Statement-backed metrics additionally accept absolute quarters and
    /// fiscal years back to the first supported year.
    pub fn screening_periods(&self, metric_name: &str) -> Vec<Candidate> {
        let Some(row) = self.get(metric_name) else {
            return Vec::new();
        };
        match row.kind.as_str() {
            "price" | "performance" | "technical" => vec![
                Candidate::new("1da", "One Day Ago"),
                Candidate::new("2da", "Two Days Ago"),
            ],
            kind if STATEMENT_KINDS.contains(&kind) => {
                let mut periods = relative_periods();
                periods.push(Candidate::new("2ya", "Two Years Ago"));
                periods.extend(absolute_periods());
                periods
            }
            "earnings" => {
                let mut periods = relative_periods();
                periods.push(Candidate::new("2ya", "Two Years Ago"));
                periods.push(Candidate::new("uq", "Upcoming Quarter"));
                periods.extend(absolute_periods());
                periods
            }
            _ => Vec::new(),
        }
    }

    /// Comparison operators allowed by the metric's data format.
    pub fn operators(&self, metric_name: &str) -> Vec<Candidate> {
        let Some(row) = self.get(metric_name) else {
            return Vec::new();
        };
        match row.data_format.as_str() {
            "float" | "int" | "unsigned_int" => vec![
                Candidate::new("gt", "Greater Than"),
                Candidate::new("lt", "Less Than"),
                Candidate::new("bw", "Between"),
            ],
            _ => vec![Candidate::new("eq", "Equal To")],
        }
    }

    /// Enumerated bound values for a categorical screening metric.
    pub fn bounds(&self, metric_name: &str) -> Vec<Candidate> {
        let Some(row) = self.get(metric_name) else {
            return Vec::new();
        };
        let Some(conditions) = &row.screening_conditions else {
            return Vec::new();
        };
        conditions
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Candidate::new(value, ""))
            .collect()
    }
}

fn relative_periods() -> Vec<Candidate> {
    vec![
        Candidate::new("mrq", "Most Recent Quarter"),
        Candidate::new("mry", "Most Recent Year"),
        Candidate::new("1qa", "One Quarter Ago"),
        Candidate::new("2qa", "Two Quarters Ago"),
        Candidate::new("1ya", "One Year Ago"),
    ]
}

/// Absolute quarters then fiscal years, newest year first.
fn absolute_periods() -> Vec<Candidate> {
    let current = Utc::now().year();
    let mut periods = Vec::new();
    for year in (FIRST_FISCAL_YEAR..=current).rev() {
        for quarter in 1..5 {
            periods.push(Candidate::new(
                format!("q{quarter}_{year}"),
                format!("Q{quarter} {year}"),
            ));
        }
        periods.push(Candidate::new(format!("fy_{year}"), format!("FY {year}")));
    }
    periods
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(name: &str, kind: &str, data_format: &str, conditions: Option<&str>) -> MetricMetadata {
        MetricMetadata {
            metric_name: name.to_string(),
            display_name: name.to_string(),
            kind: kind.to_string(),
            data_format: data_format.to_string(),
            unit: None,
            period_type_default: None,
            screening_conditions: conditions.map(str::to_string),
        }
    }

    fn store() -> MetricStore {
        MetricStore::new(vec![
            metric("net_income", "fin_metric", "float", None),
            metric("price_to_earnings", "valuation", "float", None),
            metric("close_price", "price", "float", None),
            metric("eps_surprise", "earnings", "float", None),
            metric("sector", "company_info", "str", Some("Technology, Energy")),
        ])
    }

    #[test]
    fn test_identifier_periods_by_kind() {
        let store = store();
        let values: Vec<_> = store
            .identifier_periods("net_income")
            .iter()
            .map(|c| c.value.clone())
            .collect();
        assert_eq!(values, ["mrq", "mry", "1qa", "2qa", "1ya"]);

        let earnings: Vec<_> = store
            .identifier_periods("eps_surprise")
            .iter()
            .map(|c| c.value.clone())
            .collect();
        assert_eq!(earnings, ["mrq", "1qa", "2qa", "uq"]);

        assert!(store.identifier_periods("price_to_earnings").is_empty());
        assert!(store.identifier_periods("no_such_metric").is_empty());
    }

    #[test]
    fn test_screening_periods_for_price_metric() {
        let store = store();
        let values: Vec<_> = store
            .screening_periods("close_price")
            .iter()
            .map(|c| c.value.clone())
            .collect();
        assert_eq!(values, ["1da", "2da"]);
    }

    #[test]
    fn test_screening_periods_include_absolute_quarters() {
        let store = store();
        let periods = store.screening_periods("net_income");
        let values: Vec<_> = periods.iter().map(|c| c.value.as_str()).collect();
        assert!(values.contains(&"mrq"));
        assert!(values.contains(&"2ya"));
        let current = Utc::now().year();
        assert!(values.contains(&format!("q1_{current}").as_str()));
        assert!(values.contains(&format!("fy_{FIRST_FISCAL_YEAR}").as_str()));
    }

    #[test]
    fn test_operators_follow_data_format() {
        let store = store();
        let numeric: Vec<_> = store
            .operators("net_income")
            .iter()
            .map(|c| c.value.clone())
            .collect();
        assert_eq!(numeric, ["gt", "lt", "bw"]);

        let categorical: Vec<_> = store
            .operators("sector")
            .iter()
            .map(|c| c.value.clone())
            .collect();
        assert_eq!(categorical, ["eq"]);
    }

    #[test]
    fn test_bounds_split_and_trim() {
        let store = store();
        let bounds: Vec<_> = store
            .bounds("sector")
            .iter()
            .map(|c| c.value.clone())
            .collect();
        assert_eq!(bounds, ["Technology", "Energy"]);
        assert!(store.bounds("net_income").is_empty());
    }
}
