//! Fixed, hand-authored candidate catalogs
//!
//! These never touch the network; the store memoizes nothing here because
//! building them is already trivial.

use crate::catalog::Candidate;
use chrono::{Datelike, Utc};

/// Earliest fiscal year offered by year catalogs.
pub const FIRST_FISCAL_YEAR: i32 = 2009;

fn list(entries: &[(&str, &str)]) -> Vec<Candidate> {
    entries
        .iter()
        .map(|(value, description)| Candidate::new(*value, *description))
        .collect()
}

pub fn chart_types() -> Vec<Candidate> {
    list(&[
        ("bar", "Bar chart"),
        ("line", "Line chart"),
        ("candlestick", "Candlestick chart"),
    ])
}

pub fn output_types() -> Vec<Candidate> {
    list(&[("terminal", "Generate table"), ("plot", "Generate chart")])
}

pub fn sort_orders() -> Vec<Candidate> {
    list(&[("asc", "Ascending order"), ("desc", "Descending order")])
}

pub fn period_types() -> Vec<Candidate> {
    list(&[
        ("Q", "Quarterly"),
        ("FY", "Annual"),
        ("TTM", "Trailing 12-month"),
    ])
}

pub fn price_periods() -> Vec<Candidate> {
    list(&[
        ("1M", "One Month"),
        ("3M", "Three Months"),
        ("6M", "Six Months"),
        ("1Y", "One Year"),
        ("3Y", "Three Years"),
        ("5Y", "Five Years"),
    ])
}

/// Fiscal reporting periods for financial identifiers.
pub fn fiscal_periods() -> Vec<Candidate> {
    let mut periods = vec![Candidate::new("FY", "Annual")];
    for quarter in 1..5 {
        periods.push(Candidate::new(
            format!("Q{quarter}"),
            format!("Fiscal Quarter {quarter}"),
        ));
        periods.push(Candidate::new(
            format!("Q{quarter}TTM"),
            format!("Trailing 12 Months Ending Q{quarter}"),
        ));
        periods.push(Candidate::new(
            format!("Q{quarter}YTD"),
            format!("Year to Date Ending Q{quarter}"),
        ));
    }
    periods
}

/// Fiscal years, newest first.
pub fn fiscal_years() -> Vec<Candidate> {
    let current = Utc::now().year();
    (FIRST_FISCAL_YEAR..=current)
        .rev()
        .map(|year| Candidate::new(year.to_string(), ""))
        .collect()
}

pub fn statements() -> Vec<Candidate> {
    list(&[
        ("income", "Income Statement"),
        ("cash_flow", "Cash Flow Statement"),
        ("balance_sheet", "Balance Sheet Statement"),
    ])
}

pub fn market_indices() -> Vec<Candidate> {
    list(&[
        ("$DJI", "Dow 30"),
        ("$SPX", "S&P 500"),
        ("$NDX", "NASDAQ 100"),
    ])
}

/// Screening value fields: which figure of a metric a condition applies to.
pub fn value_fields() -> Vec<Candidate> {
    list(&[
        ("value", "Absolute Value"),
        ("rank", "Rank (SPX Rank)"),
        ("dow_rank", "Dow Rank"),
        ("sector_rank", "Sector Rank"),
        ("industry_rank", "Industry Rank"),
        ("percentile", "Percentile (SPX Percentile)"),
        ("dow_percentile", "Dow Percentile"),
        ("sector_percentile", "Sector Percentile"),
        ("industry_percentile", "Industry Percentile"),
    ])
}

pub fn indicators() -> Vec<Candidate> {
    list(&[
        ("ma5", "5 Days Moving Average"),
        ("ma12", "12 Days Moving Average"),
        ("ma26", "26 Days Moving Average"),
        ("ma52", "52 Days Moving Average"),
        ("ema5", "5 Days Exponential Moving Average"),
        ("ema12", "12 Days Exponential Moving Average"),
        ("ema26", "26 Days Exponential Moving Average"),
        ("ema52", "52 Days Exponential Moving Average"),
        ("rsi", "Relative strength index (14 Days)"),
        ("rsi_7d", "Relative strength index (7 Days)"),
        ("rsi_1m", "Relative strength index (1 Month)"),
        ("rsi_3m", "Relative strength index (3 Months)"),
        ("alpha", "Alpha (1 Year)"),
        ("alpha_1w", "Alpha (1 Week)"),
        ("alpha_1m", "Alpha (1 Month)"),
        ("alpha_3m", "Alpha (3 Months)"),
        ("alpha_6m", "Alpha (6 Months)"),
        ("alpha_2y", "Alpha (2 Years)"),
        ("alpha_5y", "Alpha (5 Years)"),
        ("beta", "Beta (1 Year)"),
        ("beta_1w", "Beta (1 Week)"),
        ("beta_1m", "Beta (1 Month)"),
        ("beta_3m", "Beta (3 Months)"),
        ("beta_6m", "Beta (6 Months)"),
        ("beta_2y", "Beta (2 Years)"),
        ("beta_5y", "Beta (5 Years)"),
        ("volume", "Volume"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fiscal_periods_cover_all_quarters() {
        let periods = fiscal_periods();
        assert_eq!(periods.len(), 13);
        assert!(periods.iter().any(|p| p.value == "Q4TTM"));
    }

    #[test]
    fn test_fiscal_years_newest_first() {
        let years = fiscal_years();
        assert_eq!(years.last().unwrap().value, FIRST_FISCAL_YEAR.to_string());
        let first: i32 = years[0].value.parse().unwrap();
        let second: i32 = years[1].value.parse().unwrap();
        assert_eq!(first, second + 1);
    }

    #[test]
    fn test_catalog_values_are_unique() {
        for catalog in [
            chart_types(),
            output_types(),
            sort_orders(),
            period_types(),
            price_periods(),
            fiscal_periods(),
            statements(),
            market_indices(),
            value_fields(),
            indicators(),
        ] {
            let mut values: Vec<&str> = catalog.iter().map(|c| c.value.as_str()).collect();
            values.sort_unstable();
            values.dedup();
            assert_eq!(values.len(), catalog.len());
        }
    }
}
