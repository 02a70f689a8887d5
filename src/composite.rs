//! Composite-value sub-parsers
//!
//! Several parameter values are structured: comma-separated lists, dotted
//! `metric[.period]` identifiers, dash-delimited `ticker-year-period`
//! identifiers, and colon-delimited screening conditions. Completion only
//! ever operates on one sub-field at a time, so each parser here maps a
//! raw incomplete fragment to the sub-fragment currently being typed plus
//! the catalog that sub-fragment should be completed against.
//!
//! List parsing and composite parsing compose: the comma split happens
//! first, and the composite grammar applies to the trailing, in-progress
//! segment only.

use crate::registry::CatalogKind;

/// Which catalog a composite sub-field completes against. Metric-dependent
/// variants carry the already-typed upstream metric; an unknown metric
/// resolves to an empty catalog downstream, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentCatalog {
    Kind(CatalogKind),
    /// Periods valid for a metric in a `metric.period` identifier.
    IdentifierPeriods { metric: String },
    /// Periods valid for a metric in a screening condition head.
    ScreeningPeriods { metric: String },
    /// Comparison operators valid for a metric's data format.
    Operators { metric: String },
    /// Declared bound values for a metric.
    Bounds { metric: String },
}

/// The sub-field currently being typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Text to match candidates against (the part after the last separator).
    pub fragment: String,
    pub catalog: SegmentCatalog,
}

impl Segment {
    fn new(fragment: &str, catalog: SegmentCatalog) -> Self {
        Self {
            fragment: fragment.to_string(),
            catalog,
        }
    }
}

/// The trailing, in-progress segment of a comma-separated value. Earlier
/// segments are already committed; they are not re-parsed and they do not
/// filter the catalog (duplicates are the user's concern).
pub fn active_list_segment(fragment: &str) -> &str {
    fragment.split(',').next_back().unwrap_or(fragment)
}

/// `metric[.period]`: until a dot is typed the metric catalog applies;
/// after it, the period catalog for the typed metric.
pub fn metric_identifier(segment: &str) -> Segment {
    match segment.split_once('.') {
        Some((metric, rest)) => {
            let fragment = rest.rsplit('.').next().unwrap_or(rest);
            Segment::new(
                fragment,
                SegmentCatalog::IdentifierPeriods {
                    metric: metric.to_string(),
                },
            )
        }
        None => Segment::new(segment, SegmentCatalog::Kind(CatalogKind::Metric)),
    }
}

/// `ticker[-year[-period]]`: the dash count selects the active part.
pub fn financials_identifier(segment: &str) -> Segment {
    let parts: Vec<&str> = segment.split('-').collect();
    let fragment = parts.last().copied().unwrap_or(segment);
    let catalog = match parts.len() {
        0 | 1 => SegmentCatalog::Kind(CatalogKind::Ticker),
        2 => SegmentCatalog::Kind(CatalogKind::FiscalYear),
        _ => SegmentCatalog::Kind(CatalogKind::FiscalPeriod),
    };
    Segment::new(fragment, catalog)
}

/// `metric[.period[.value_field]]:operator:bound`: the colon count decides
/// between the head, the operator, and the bound; within the head the dot
/// count decides between metric, period, and value field. The operator and
/// bound catalogs depend on the metric at the head of the condition.
pub fn screening_condition(segment: &str) -> Segment {
    let colon_parts: Vec<&str> = segment.split(':').collect();
    let dot_parts: Vec<&str> = colon_parts[0].split('.').collect();
    let metric = dot_parts[0].to_string();

    if colon_parts.len() > 2 {
        Segment::new(
            colon_parts.last().copied().unwrap_or(""),
            SegmentCatalog::Bounds { metric },
        )
    } else if colon_parts.len() > 1 {
        Segment::new(
            colon_parts.last().copied().unwrap_or(""),
            SegmentCatalog::Operators { metric },
        )
    } else if dot_parts.len() > 2 {
        Segment::new(
            dot_parts.last().copied().unwrap_or(""),
            SegmentCatalog::Kind(CatalogKind::ValueField),
        )
    } else if dot_parts.len() > 1 {
        Segment::new(
            dot_parts.last().copied().unwrap_or(""),
            SegmentCatalog::ScreeningPeriods { metric },
        )
    } else {
        Segment::new(segment, SegmentCatalog::Kind(CatalogKind::Metric))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_list_segment() {
        assert_eq!(active_list_segment("AAPL,MSFT,GO"), "GO");
        assert_eq!(active_list_segment("AAPL,MSFT,"), "");
        assert_eq!(active_list_segment("AAPL"), "AAPL");
        assert_eq!(active_list_segment(""), "");
    }

    #[test]
    fn test_metric_identifier_before_dot() {
        let seg = metric_identifier("net_inc");
        assert_eq!(seg.fragment, "net_inc");
        assert_eq!(seg.catalog, SegmentCatalog::Kind(CatalogKind::Metric));
    }

    #[test]
    fn test_metric_identifier_after_dot() {
        let seg = metric_identifier("net_income.mr");
        assert_eq!(seg.fragment, "mr");
        assert_eq!(
            seg.catalog,
            SegmentCatalog::IdentifierPeriods {
                metric: "net_income".to_string()
            }
        );
    }

    #[test]
    fn test_metric_identifier_trailing_dot() {
        let seg = metric_identifier("net_income.");
        assert_eq!(seg.fragment, "");
    }

    #[test]
    fn test_financials_identifier_parts() {
        let seg = financials_identifier("AAP");
        assert_eq!(seg.catalog, SegmentCatalog::Kind(CatalogKind::Ticker));
        assert_eq!(seg.fragment, "AAP");

        let seg = financials_identifier("AAPL-20");
        assert_eq!(seg.catalog, SegmentCatalog::Kind(CatalogKind::FiscalYear));
        assert_eq!(seg.fragment, "20");

        let seg = financials_identifier("AAPL-2021-");
        assert_eq!(seg.catalog, SegmentCatalog::Kind(CatalogKind::FiscalPeriod));
        assert_eq!(seg.fragment, "");
    }

    #[test]
    fn test_financials_identifier_is_stable_when_fully_typed() {
        let first = financials_identifier("AAPL-2021-Q4");
        let again = financials_identifier("AAPL-2021-Q4");
        assert_eq!(first, again);
        assert_eq!(first.catalog, SegmentCatalog::Kind(CatalogKind::FiscalPeriod));
        assert_eq!(first.fragment, "Q4");
    }

    #[test]
    fn test_screening_condition_fields() {
        let seg = screening_condition("net_inc");
        assert_eq!(seg.catalog, SegmentCatalog::Kind(CatalogKind::Metric));

        let seg = screening_condition("net_income.mr");
        assert_eq!(
            seg.catalog,
            SegmentCatalog::ScreeningPeriods {
                metric: "net_income".to_string()
            }
        );
        assert_eq!(seg.fragment, "mr");

        let seg = screening_condition("net_income.mrq.ra");
        assert_eq!(seg.catalog, SegmentCatalog::Kind(CatalogKind::ValueField));
        assert_eq!(seg.fragment, "ra");

        let seg = screening_condition("net_income.mrq:");
        assert_eq!(
            seg.catalog,
            SegmentCatalog::Operators {
                metric: "net_income".to_string()
            }
        );
        assert_eq!(seg.fragment, "");

        let seg = screening_condition("net_income:gt:1");
        assert_eq!(
            seg.catalog,
            SegmentCatalog::Bounds {
                metric: "net_income".to_string()
            }
        );
        assert_eq!(seg.fragment, "1");
    }

    #[test]
    fn test_list_and_composite_parsing_compose() {
        // The composite grammar applies to the last comma segment only.
        let seg = metric_identifier(active_list_segment("roa.mrq,net_income."));
        assert_eq!(seg.fragment, "");
        assert_eq!(
            seg.catalog,
            SegmentCatalog::IdentifierPeriods {
                metric: "net_income".to_string()
            }
        );
    }
}
