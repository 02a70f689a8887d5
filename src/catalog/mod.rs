//! Candidate catalogs
//!
//! Every completable value kind maps to a catalog of candidates. Static
//! catalogs are built inline; externally sourced ones (companies, metric
//! metadata, screening profiles, watchlists) go through the disk cache
//! and are memoized per process. A failed fetch yields an empty catalog
//! and is deliberately not memoized, so the next shell invocation retries.

pub mod cache;
pub mod metrics;
pub mod static_lists;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::{Company, DataApi, ScreeningProfile};
use crate::composite::SegmentCatalog;
use crate::registry::CatalogKind;
use metrics::MetricStore;

/// Cache file names under the settings directory, one per remote catalog.
pub const COMPANIES_CACHE: &str = "companies.tsv";
pub const METRICS_CACHE: &str = "metrics_metadata.tsv";
pub const PROFILES_CACHE: &str = "screening_profiles.tsv";
pub const WATCHLISTS_CACHE: &str = "watchlists.tsv";

pub const CACHE_FILES: [&str; 4] = [
    COMPANIES_CACHE,
    METRICS_CACHE,
    PROFILES_CACHE,
    WATCHLISTS_CACHE,
];

/// One completable value with its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub value: String,
    pub description: String,
}

impl Candidate {
    pub fn new(value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: description.into(),
        }
    }
}

/// Flattened watchlist row for the tab-delimited cache format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WatchlistRow {
    name: String,
    tickers: String,
}

/// Serves candidate catalogs to the completion engine.
///
/// Remote catalogs are resolved at most once per process: cache file
/// first, then the API on a cold or stale cache.
pub struct CatalogStore {
    api: Box<dyn DataApi>,
    settings_dir: PathBuf,
    cache_age_hours: u64,
    metric_views: Vec<String>,
    companies: RefCell<Option<Vec<Company>>>,
    metrics: RefCell<Option<MetricStore>>,
    profiles: RefCell<Option<Vec<ScreeningProfile>>>,
    watchlists: RefCell<Option<Vec<WatchlistRow>>>,
}

impl CatalogStore {
    pub fn new(
        api: Box<dyn DataApi>,
        settings_dir: &Path,
        cache_age_hours: u64,
        metric_views: Vec<String>,
    ) -> Self {
        Self {
            api,
            settings_dir: settings_dir.to_path_buf(),
            cache_age_hours,
            metric_views,
            companies: RefCell::new(None),
            metrics: RefCell::new(None),
            profiles: RefCell::new(None),
            watchlists: RefCell::new(None),
        }
    }

    /// The full candidate catalog for a value kind, in catalog order.
    pub fn catalog(&self, kind: CatalogKind) -> Vec<Candidate> {
        match kind {
            CatalogKind::Ticker => self.tickers(false),
            CatalogKind::TickerWithPeers => self.tickers(true),
            CatalogKind::WatchlistTicker => self.watchlist_tickers(),
            CatalogKind::Metric => self.with_metrics(MetricStore::candidates),
            CatalogKind::Indicator => static_lists::indicators(),
            CatalogKind::ChartType => static_lists::chart_types(),
            CatalogKind::OutputType => static_lists::output_types(),
            CatalogKind::SortOrder => static_lists::sort_orders(),
            CatalogKind::PeriodType => static_lists::period_types(),
            CatalogKind::PricePeriod => static_lists::price_periods(),
            CatalogKind::FiscalPeriod => static_lists::fiscal_periods(),
            CatalogKind::FiscalYear => static_lists::fiscal_years(),
            CatalogKind::Statement => static_lists::statements(),
            CatalogKind::MarketIndex => static_lists::market_indices(),
            CatalogKind::MetricView => self
                .metric_views
                .iter()
                .map(|view| Candidate::new(view.clone(), format!("{view} metrics")))
                .collect(),
            CatalogKind::ScreeningProfile => self.screening_profiles(),
            CatalogKind::Watchlist => self.watchlist_names(),
            CatalogKind::ValueField => static_lists::value_fields(),
        }
    }

    /// The candidate catalog for one segment of a composite value.
    pub fn segment_catalog(&self, segment: &SegmentCatalog) -> Vec<Candidate> {
        match segment {
            SegmentCatalog::Kind(kind) => self.catalog(*kind),
            SegmentCatalog::IdentifierPeriods { metric } => {
                self.with_metrics(|store| store.identifier_periods(metric))
            }
            SegmentCatalog::ScreeningPeriods { metric } => {
                self.with_metrics(|store| store.screening_periods(metric))
            }
            SegmentCatalog::Operators { metric } => {
                self.with_metrics(|store| store.operators(metric))
            }
            SegmentCatalog::Bounds { metric } => self.with_metrics(|store| store.bounds(metric)),
        }
    }

    fn cache_path(&self, file_name: &str) -> PathBuf {
        self.settings_dir.join(file_name)
    }

    fn tickers(&self, with_peers: bool) -> Vec<Candidate> {
        self.ensure_companies();
        let companies = self.companies.borrow();
        let Some(companies) = companies.as_ref() else {
            return Vec::new();
        };
        let mut candidates = Vec::with_capacity(companies.len());
        for company in companies {
            candidates.push(Candidate::new(
                company.ticker.clone(),
                company.name.clone(),
            ));
            if with_peers && company.peers.is_some() {
                candidates.push(Candidate::new(
                    format!("{}.peers", company.ticker),
                    format!("Peers of {}", company.name),
                ));
            }
        }
        candidates
    }

    fn ensure_companies(&self) {
        if self.companies.borrow().is_some() {
            return;
        }
        let path = self.cache_path(COMPANIES_CACHE);
        match cache::load_or_fetch(&path, self.cache_age_hours, || self.api.active_companies()) {
            Ok(rows) => *self.companies.borrow_mut() = Some(rows),
            Err(e) => warn!(error = %e, "company catalog unavailable"),
        }
    }

    fn with_metrics<R: Default>(&self, f: impl FnOnce(&MetricStore) -> R) -> R {
        if self.metrics.borrow().is_none() {
            let path = self.cache_path(METRICS_CACHE);
            match cache::load_or_fetch(&path, self.cache_age_hours, || self.api.metrics_metadata())
            {
                Ok(rows) => *self.metrics.borrow_mut() = Some(MetricStore::new(rows)),
                Err(e) => warn!(error = %e, "metric catalog unavailable"),
            }
        }
        let metrics = self.metrics.borrow();
        match metrics.as_ref() {
            Some(store) => f(store),
            None => R::default(),
        }
    }

    fn screening_profiles(&self) -> Vec<Candidate> {
        if self.profiles.borrow().is_none() {
            let path = self.cache_path(PROFILES_CACHE);
            match cache::load_or_fetch(&path, self.cache_age_hours, || {
                self.api.screening_profiles()
            }) {
                Ok(rows) => *self.profiles.borrow_mut() = Some(rows),
                Err(e) => warn!(error = %e, "screening profile catalog unavailable"),
            }
        }
        self.profiles
            .borrow()
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|profile| {
                Candidate::new(profile.profile_name.clone(), profile.display_name.clone())
            })
            .collect()
    }

    fn ensure_watchlists(&self) {
        if self.watchlists.borrow().is_some() {
            return;
        }
        let path = self.cache_path(WATCHLISTS_CACHE);
        match cache::load_or_fetch(&path, self.cache_age_hours, || {
            self.api.user_watchlists().map(|lists| {
                lists
                    .into_iter()
                    .map(|list| WatchlistRow {
                        name: list.name,
                        tickers: list.tickers.join(","),
                    })
                    .collect()
            })
        }) {
            Ok(rows) => *self.watchlists.borrow_mut() = Some(rows),
            Err(e) => warn!(error = %e, "watchlist catalog unavailable"),
        }
    }

    fn watchlist_names(&self) -> Vec<Candidate> {
        self.ensure_watchlists();
        self.watchlists
            .borrow()
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|list| {
                // Names with spaces must survive word splitting in the line.
                let value = if list.name.contains(' ') {
                    format!("\"{}\"", list.name)
                } else {
                    list.name.clone()
                };
                Candidate::new(value, "")
            })
            .collect()
    }

    /// Union of tickers across all of the user's watchlists, in watchlist
    /// order, without duplicates.
    fn watchlist_tickers(&self) -> Vec<Candidate> {
        self.ensure_watchlists();
        let mut candidates: Vec<Candidate> = Vec::new();
        for list in self.watchlists.borrow().as_deref().unwrap_or_default() {
            for ticker in list.tickers.split(',').filter(|t| !t.is_empty()) {
                if !candidates.iter().any(|c| c.value == ticker) {
                    candidates.push(Candidate::new(ticker, ""));
                }
            }
        }
        candidates
    }

    /// All user watchlists with their tickers, for the watchlist command.
    pub fn watchlists(&self) -> Vec<(String, Vec<String>)> {
        self.ensure_watchlists();
        self.watchlists
            .borrow()
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|list| {
                let tickers = list
                    .tickers
                    .split(',')
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect();
                (list.name.clone(), tickers)
            })
            .collect()
    }

    /// Metric metadata lookup for the describe command.
    pub fn metric_metadata(&self, metric_name: &str) -> Option<crate::client::MetricMetadata> {
        self.with_metrics(|store| store.get(metric_name).cloned())
    }

    /// All metric rows, for the search command.
    pub fn metric_rows(&self) -> Vec<crate::client::MetricMetadata> {
        self.with_metrics(|store| store.rows().to_vec())
    }
}
