//! Completion engine
//!
//! Maps a resolved [`LineContext`] to the ordered completion list. Fresh
//! token positions get flags and child commands; an open parameter
//! dispatches on its value kind. Closed enumerations use a strict literal
//! prefix filter, dynamic catalogs go through the fuzzy ranker and skip
//! the literal filter on purpose.

use std::rc::Rc;

use crate::catalog::{Candidate, CatalogStore};
use crate::completer::context::{self, LineContext};
use crate::composite::{self, Segment};
use crate::ranker::{self, MAX_RESULTS};
use crate::registry::{ParamSpec, Registry, ValueKind};

/// One entry of the completion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    /// Replacement text.
    pub text: String,
    /// How many characters before the cursor the replacement covers. For
    /// composite values this is the sub-fragment only, so accepting a
    /// completion keeps the already-typed parts and separators.
    pub span: usize,
    /// Display hint shown next to the text.
    pub description: String,
}

impl CompletionItem {
    fn new(text: impl Into<String>, span: usize, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            span,
            description: description.into(),
        }
    }
}

pub struct Engine {
    registry: Rc<Registry>,
    store: Rc<CatalogStore>,
}

impl Engine {
    pub fn new(registry: Rc<Registry>, store: Rc<CatalogStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Completions for `line` at `cursor`. Every failure mode inside the
    /// subsystem surfaces here as an empty list.
    pub fn completions(&self, line: &str, cursor: usize) -> Vec<CompletionItem> {
        let Some(context) = context::resolve(line, cursor, &self.registry) else {
            return Vec::new();
        };
        tracing::debug!(
            node = context.node.name,
            incomplete = %context.incomplete,
            open = context.active_param.map(|p| p.name),
            "resolved completion context"
        );
        match context.active_param {
            Some(param) => self.value_completions(param, &context.incomplete),
            None => self.position_completions(&context),
        }
    }

    /// Flags of the active node, child commands of a group, and fixed
    /// choices of positional parameters.
    fn position_completions(&self, context: &LineContext<'_>) -> Vec<CompletionItem> {
        let incomplete = context.incomplete.to_lowercase();
        let span = context.incomplete.len();
        let mut items = Vec::new();

        for param in &context.node.params {
            if param.positional {
                if let ValueKind::Choice(choices) = &param.kind {
                    for choice in *choices {
                        if choice.to_lowercase().starts_with(&incomplete) {
                            items.push(CompletionItem::new(*choice, span, param.help));
                        }
                    }
                }
                continue;
            }
            // Single-valued flags disappear once used; repeatable ones stay.
            if !param.multiple && context.used_flags.iter().any(|f| param.matches_flag(f)) {
                continue;
            }
            if param.long.to_lowercase().starts_with(&incomplete) {
                items.push(CompletionItem::new(param.long, span, render_help(param)));
            }
        }

        for child in &context.node.children {
            if child.name.to_lowercase().starts_with(&incomplete) {
                items.push(CompletionItem::new(child.name, span, child.help));
            }
        }
        items
    }

    fn value_completions(&self, param: &ParamSpec, incomplete: &str) -> Vec<CompletionItem> {
        match &param.kind {
            ValueKind::Flag | ValueKind::Text | ValueKind::Date | ValueKind::Path { .. } => {
                Vec::new()
            }
            ValueKind::Choice(choices) => {
                let keyword = incomplete.to_lowercase();
                choices
                    .iter()
                    .filter(|choice| choice.to_lowercase().starts_with(&keyword))
                    .map(|choice| CompletionItem::new(*choice, incomplete.len(), ""))
                    .collect()
            }
            ValueKind::Single(kind) => {
                let catalog = self.store.catalog(*kind);
                self.ranked(catalog, incomplete)
            }
            ValueKind::List(kind) => {
                let catalog = self.store.catalog(*kind);
                self.ranked(catalog, composite::active_list_segment(incomplete))
            }
            ValueKind::MetricIdentifier => {
                let segment = composite::metric_identifier(composite::active_list_segment(incomplete));
                self.ranked_segment(segment)
            }
            ValueKind::FinancialsIdentifier => {
                let segment =
                    composite::financials_identifier(composite::active_list_segment(incomplete));
                self.ranked_segment(segment)
            }
            ValueKind::ScreeningCondition => {
                // Conditions are one value per flag occurrence; no comma
                // splitting here.
                self.ranked_segment(composite::screening_condition(incomplete))
            }
        }
    }

    fn ranked_segment(&self, segment: Segment) -> Vec<CompletionItem> {
        let catalog = self.store.segment_catalog(&segment.catalog);
        self.ranked(catalog, &segment.fragment)
    }

    /// Rank a dynamic catalog against the sub-fragment. An empty fragment
    /// shows the head of the catalog as-is instead of ranking nothing.
    fn ranked(&self, catalog: Vec<Candidate>, fragment: &str) -> Vec<CompletionItem> {
        if fragment.is_empty() {
            return catalog
                .into_iter()
                .take(MAX_RESULTS)
                .map(|c| CompletionItem::new(c.value, 0, c.description))
                .collect();
        }
        ranker::rank(&catalog, fragment)
            .into_iter()
            .map(|c| CompletionItem::new(c.value.clone(), fragment.len(), c.description.clone()))
            .collect()
    }
}

fn render_help(param: &ParamSpec) -> String {
    match param.short {
        Some(short) => format!("({short}) {}", param.help),
        None => param.help.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ApiError, Company, DataApi, MetricMetadata, ScreeningProfile, Watchlist};
    use crate::registry::standard_registry;
    use tempfile::TempDir;

    struct StubApi;

    impl DataApi for StubApi {
        fn active_companies(&self) -> Result<Vec<Company>, ApiError> {
            Ok(["AAPL", "MSFT", "GOOG", "AMZN", "NET"]
                .iter()
                .map(|t| Company {
                    ticker: t.to_string(),
                    name: format!("{t} Inc."),
                    peers: None,
                })
                .collect())
        }

        fn metrics_metadata(&self) -> Result<Vec<MetricMetadata>, ApiError> {
            let metric = |name: &str, display: &str| MetricMetadata {
                metric_name: name.to_string(),
                display_name: display.to_string(),
                kind: "fin_metric".to_string(),
                data_format: "float".to_string(),
                unit: None,
                period_type_default: None,
                screening_conditions: None,
            };
            Ok(vec![
                metric("net_income", "Net Income"),
                metric("net_ppe", "Net PPE"),
                metric("total_revenue", "Total Revenue"),
            ])
        }

        fn screening_profiles(&self) -> Result<Vec<ScreeningProfile>, ApiError> {
            Ok(Vec::new())
        }

        fn user_watchlists(&self) -> Result<Vec<Watchlist>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn engine(dir: &TempDir) -> Engine {
        let store = CatalogStore::new(Box::new(StubApi), dir.path(), 48, Vec::new());
        Engine::new(Rc::new(standard_registry()), Rc::new(store))
    }

    fn texts(items: &[CompletionItem]) -> Vec<String> {
        items.iter().map(|i| i.text.clone()).collect()
    }

    #[test]
    fn test_group_offers_children() {
        let dir = TempDir::new().unwrap();
        let line = "price ";
        let items = engine(&dir).completions(line, line.len());
        assert_eq!(texts(&items), ["list", "plot", "compare"]);
    }

    #[test]
    fn test_root_prefix_filters_commands() {
        let dir = TempDir::new().unwrap();
        let items = engine(&dir).completions("me", 2);
        assert_eq!(texts(&items), ["metrics"]);
        assert_eq!(items[0].span, 2);
    }

    #[test]
    fn test_leaf_offers_unused_flags_with_help() {
        let dir = TempDir::new().unwrap();
        let line = "price plot --ticker AAPL ";
        let items = engine(&dir).completions(line, line.len());
        let values = texts(&items);
        assert!(!values.contains(&"--ticker".to_string()));
        assert!(values.contains(&"--period".to_string()));
        let period = items.iter().find(|i| i.text == "--period").unwrap();
        assert_eq!(period.description, "(-p) Period of the data.");
    }

    #[test]
    fn test_repeatable_flag_stays_offered() {
        let dir = TempDir::new().unwrap();
        let line = "screen search --conditions pe:gt:20 ";
        let items = engine(&dir).completions(line, line.len());
        assert!(texts(&items).contains(&"--conditions".to_string()));
    }

    #[test]
    fn test_positional_choices_are_prefix_filtered() {
        let dir = TempDir::new().unwrap();
        let items = engine(&dir).completions("market summary mo", 17);
        assert_eq!(texts(&items), ["movers"]);
    }

    #[test]
    fn test_metric_value_is_fuzzy_ranked() {
        let dir = TempDir::new().unwrap();
        let line = "metrics list --metrics net";
        let items = engine(&dir).completions(line, line.len());
        assert_eq!(texts(&items), ["net_income", "net_ppe"]);
        assert_eq!(items[0].span, 3);
    }

    #[test]
    fn test_list_value_completes_trailing_segment_only() {
        let dir = TempDir::new().unwrap();
        let line = "metrics list --tickers AAPL,MSFT,";
        let items = engine(&dir).completions(line, line.len());
        // Prior entries are not filtered out of the catalog.
        let values = texts(&items);
        assert!(values.contains(&"AAPL".to_string()));
        assert!(values.contains(&"MSFT".to_string()));
        assert!(items.iter().all(|i| i.span == 0));
    }

    #[test]
    fn test_financials_identifier_third_part_span() {
        let dir = TempDir::new().unwrap();
        let line = "financials list --identifier AAPL-2021-Q";
        let items = engine(&dir).completions(line, line.len());
        assert!(texts(&items).contains(&"Q1".to_string()));
        // Replacement covers only the "Q", not the whole identifier.
        assert!(items.iter().all(|i| i.span == 1));
    }

    #[test]
    fn test_screening_condition_operator_stage() {
        let dir = TempDir::new().unwrap();
        let line = "screen search --conditions net_income:";
        let items = engine(&dir).completions(line, line.len());
        assert_eq!(texts(&items), ["gt", "lt", "bw"]);
    }

    #[test]
    fn test_unknown_metric_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let line = "screen search --conditions bogus_metric:";
        let items = engine(&dir).completions(line, line.len());
        assert!(items.is_empty());
    }

    #[test]
    fn test_unbalanced_quote_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let line = "company search --keyword \"app";
        assert!(engine(&dir).completions(line, line.len()).is_empty());
    }

    #[test]
    fn test_cursor_off_char_boundary_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let line = "company search --keyword Café";
        assert!(engine(&dir).completions(line, line.len() - 1).is_empty());
    }

    #[test]
    fn test_result_count_bounded() {
        let dir = TempDir::new().unwrap();
        let line = "metrics list --tickers ";
        let items = engine(&dir).completions(line, line.len());
        assert!(items.len() <= MAX_RESULTS);
    }
}
