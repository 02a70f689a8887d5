//! Static command registry
//!
//! The registry is the immutable tree of commands the shell understands:
//! command groups, leaf commands, and each leaf's declared parameters. It
//! is built once at startup by [`standard_registry`] and only read
//! afterwards. The completion engine walks it on every keystroke to find
//! the active command and the parameter being typed.
//!
//! Parameter value typing is a closed tagged union ([`ValueKind`]) rather
//! than open-ended trait objects: every kind the engine can complete is a
//! variant here, and dispatch is a `match`.

/// Which provider catalog feeds a fuzzy-completed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    /// Active company tickers.
    Ticker,
    /// Tickers plus `TICKER.peers` peer-group entries.
    TickerWithPeers,
    /// Tickers drawn from the user's watchlists.
    WatchlistTicker,
    Metric,
    Indicator,
    ChartType,
    OutputType,
    SortOrder,
    PeriodType,
    PricePeriod,
    FiscalPeriod,
    FiscalYear,
    Statement,
    MarketIndex,
    MetricView,
    ScreeningProfile,
    Watchlist,
    ValueField,
}

/// Declared value type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Boolean switch; takes no value.
    Flag,
    /// Free text; nothing to complete.
    Text,
    /// `YYYY-MM-DD` date. Completed by the inline suggestion engine only.
    Date,
    /// Output file path with a set of accepted extensions.
    Path { extensions: &'static [&'static str] },
    /// Closed enumeration, literal-prefix filtered (never fuzzy ranked).
    Choice(&'static [&'static str]),
    /// One catalog value; the whole fragment is the match keyword.
    Single(CatalogKind),
    /// Comma-separated catalog values; only the trailing segment completes.
    List(CatalogKind),
    /// `metric[.period]`, the period catalog depending on the metric.
    MetricIdentifier,
    /// `ticker[-year[-period]]` financial identifier.
    FinancialsIdentifier,
    /// `metric[.period[.value_field]]:operator:bound` screening condition.
    ScreeningCondition,
}

/// One declared parameter of a leaf command.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    /// Long flag spelling, e.g. `--tickers`.
    pub long: &'static str,
    /// Short flag spelling, e.g. `-k`.
    pub short: Option<&'static str>,
    pub help: &'static str,
    pub kind: ValueKind,
    /// Repeatable flags stay in the completion list after first use.
    pub multiple: bool,
    /// Positional argument instead of a flag.
    pub positional: bool,
}

impl ParamSpec {
    fn opt(
        name: &'static str,
        long: &'static str,
        short: &'static str,
        help: &'static str,
        kind: ValueKind,
    ) -> Self {
        Self {
            name,
            long,
            short: Some(short),
            help,
            kind,
            multiple: false,
            positional: false,
        }
    }

    fn multi(mut self) -> Self {
        self.multiple = true;
        self
    }

    fn positional(name: &'static str, help: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            long: name,
            short: None,
            help,
            kind,
            multiple: false,
            positional: true,
        }
    }

    /// Whether `token` is one of this parameter's flag spellings.
    pub fn matches_flag(&self, token: &str) -> bool {
        !self.positional && (token == self.long || self.short == Some(token))
    }
}

/// One node of the command tree. Groups have children, leaves have params.
#[derive(Debug, Clone)]
pub struct CommandNode {
    pub name: &'static str,
    pub help: &'static str,
    pub params: Vec<ParamSpec>,
    pub children: Vec<CommandNode>,
}

impl CommandNode {
    fn leaf(name: &'static str, help: &'static str, params: Vec<ParamSpec>) -> Self {
        Self {
            name,
            help,
            params,
            children: Vec::new(),
        }
    }

    fn group(name: &'static str, help: &'static str, children: Vec<CommandNode>) -> Self {
        Self {
            name,
            help,
            params: Vec::new(),
            children,
        }
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Look up a parameter by one of its flag spellings.
    pub fn param_by_flag(&self, token: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.matches_flag(token))
    }
}

/// The full command tree, rooted at an unnamed node.
#[derive(Debug, Clone)]
pub struct Registry {
    root: CommandNode,
}

impl Registry {
    pub fn new(root: CommandNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    /// Walk the tree along `path`, descending while tokens match children.
    /// Flag-shaped tokens are skipped; the walk stops at the first other
    /// non-matching token. Always resolves to some node (possibly the root).
    pub fn resolve<'a, I>(&self, path: I) -> &CommandNode
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut node = &self.root;
        for token in path {
            if let Some(child) = node.child(token) {
                node = child;
            } else if token.starts_with('-') {
                continue;
            } else {
                break;
            }
        }
        node
    }
}

const EXPORT_EXTENSIONS: &[&str] = &["csv", "xlsx", "html"];

fn export_param() -> ParamSpec {
    ParamSpec::opt(
        "export_path",
        "--export",
        "-e",
        "Filename to export the output to.",
        ValueKind::Path {
            extensions: EXPORT_EXTENSIONS,
        },
    )
}

fn ticker_param() -> ParamSpec {
    ParamSpec::opt(
        "ticker",
        "--ticker",
        "-k",
        "Company ticker.",
        ValueKind::Single(CatalogKind::Ticker),
    )
}

fn tickers_param() -> ParamSpec {
    ParamSpec::opt(
        "tickers",
        "--tickers",
        "-k",
        "Comma-separated list of tickers.",
        ValueKind::List(CatalogKind::TickerWithPeers),
    )
}

fn metrics_param() -> ParamSpec {
    ParamSpec::opt(
        "metrics",
        "--metrics",
        "-m",
        "Comma-separated list of metrics.",
        ValueKind::List(CatalogKind::Metric),
    )
}

fn chart_type_param() -> ParamSpec {
    ParamSpec::opt(
        "chart_type",
        "--chart_type",
        "-c",
        "Chart type.",
        ValueKind::List(CatalogKind::ChartType),
    )
}

fn period_type_param() -> ParamSpec {
    ParamSpec::opt(
        "period_type",
        "--period_type",
        "-pt",
        "Period type of the data.",
        ValueKind::List(CatalogKind::PeriodType),
    )
}

fn price_period_param() -> ParamSpec {
    ParamSpec::opt(
        "period",
        "--period",
        "-p",
        "Period of the data.",
        ValueKind::List(CatalogKind::PricePeriod),
    )
}

fn date_params() -> [ParamSpec; 2] {
    [
        ParamSpec::opt(
            "from_date",
            "--from_date",
            "-f",
            "Historical data from date.",
            ValueKind::Date,
        ),
        ParamSpec::opt(
            "to_date",
            "--to_date",
            "-t",
            "Historical data to date.",
            ValueKind::Date,
        ),
    ]
}

fn watchlist_name_param() -> ParamSpec {
    ParamSpec::opt(
        "name",
        "--name",
        "-n",
        "Watchlist name.",
        ValueKind::List(CatalogKind::Watchlist),
    )
}

/// Build the terminal's command tree.
pub fn standard_registry() -> Registry {
    let [from_date, to_date] = date_params();

    let company = CommandNode::group(
        "company",
        "Company profiles and comparisons.",
        vec![
            CommandNode::leaf("details", "Company details.", vec![ticker_param()]),
            CommandNode::leaf(
                "search",
                "Search companies by ticker or name.",
                vec![ParamSpec::opt(
                    "keyword",
                    "--keyword",
                    "-k",
                    "Keyword can be ticker or company name.",
                    ValueKind::Text,
                )],
            ),
            CommandNode::leaf(
                "compare",
                "Compare a set of companies.",
                vec![tickers_param()],
            ),
        ],
    );

    let earnings = CommandNode::group(
        "earnings",
        "Company earnings data.",
        vec![
            CommandNode::leaf(
                "list",
                "List historical earnings.",
                vec![ticker_param(), export_param()],
            ),
            CommandNode::leaf("recent", "Recently announced earnings.", vec![]),
            CommandNode::leaf("upcoming", "Upcoming earnings dates.", vec![]),
            CommandNode::leaf(
                "plot",
                "Plot actual vs estimated earnings.",
                vec![ticker_param(), period_type_param(), chart_type_param()],
            ),
        ],
    );

    let financials = CommandNode::group(
        "financials",
        "Standardized financial statements.",
        vec![
            CommandNode::leaf(
                "list",
                "List financial statements.",
                vec![
                    ParamSpec::opt(
                        "identifier",
                        "--identifier",
                        "-i",
                        "Financial identifier: Ticker-[FiscalYear]-[FiscalPeriod].",
                        ValueKind::FinancialsIdentifier,
                    ),
                    ParamSpec::opt(
                        "statement",
                        "--statement",
                        "-s",
                        "Statement code.",
                        ValueKind::List(CatalogKind::Statement),
                    ),
                    period_type_param(),
                    export_param(),
                ],
            ),
            CommandNode::leaf(
                "compare",
                "Compare financials across identifiers.",
                vec![
                    ParamSpec::opt(
                        "identifiers",
                        "--identifiers",
                        "-i",
                        "Comma-separated financial identifiers.",
                        ValueKind::FinancialsIdentifier,
                    ),
                    ParamSpec::opt(
                        "statement",
                        "--statement",
                        "-s",
                        "Statement code.",
                        ValueKind::List(CatalogKind::Statement),
                    ),
                    export_param(),
                ],
            ),
            CommandNode::leaf(
                "coverage",
                "Available financials coverage for a company.",
                vec![ticker_param()],
            ),
        ],
    );

    let market = CommandNode::group(
        "market",
        "Market overview.",
        vec![CommandNode::leaf(
            "summary",
            "Market summary.",
            vec![ParamSpec::positional(
                "section",
                "Summary section.",
                ValueKind::Choice(&["indices", "movers", "sectors"]),
            )],
        )],
    );

    let metrics = CommandNode::group(
        "metrics",
        "Company metrics, current and historical.",
        vec![
            CommandNode::leaf(
                "current",
                "Latest metric values for companies.",
                vec![
                    tickers_param(),
                    metrics_param(),
                    ParamSpec::opt(
                        "view_name",
                        "--view_name",
                        "-v",
                        "Metric view name.",
                        ValueKind::List(CatalogKind::MetricView),
                    ),
                    export_param(),
                ],
            ),
            CommandNode::leaf(
                "list",
                "List metric values.",
                vec![tickers_param(), metrics_param(), export_param()],
            ),
            CommandNode::leaf(
                "plot",
                "Plot historical metrics.",
                vec![
                    tickers_param(),
                    metrics_param(),
                    price_period_param(),
                    period_type_param(),
                    from_date.clone(),
                    to_date.clone(),
                    chart_type_param(),
                    ParamSpec::opt(
                        "output",
                        "--output",
                        "-o",
                        "Output target.",
                        ValueKind::List(CatalogKind::OutputType),
                    ),
                ],
            ),
            CommandNode::leaf(
                "describe",
                "Describe a metric.",
                vec![ParamSpec::opt(
                    "name",
                    "--name",
                    "-n",
                    "Metric name.",
                    ValueKind::List(CatalogKind::Metric),
                )],
            ),
            CommandNode::leaf(
                "search",
                "Search metrics by keyword.",
                vec![ParamSpec::opt(
                    "keyword",
                    "--keyword",
                    "-k",
                    "Keyword can be metric name.",
                    ValueKind::Text,
                )],
            ),
        ],
    );

    let news = CommandNode::group(
        "news",
        "Company news.",
        vec![CommandNode::leaf(
            "list",
            "Latest news for a company.",
            vec![ticker_param()],
        )],
    );

    let price = CommandNode::group(
        "price",
        "Stock price data.",
        vec![
            CommandNode::leaf(
                "list",
                "List historical prices.",
                vec![
                    ticker_param(),
                    price_period_param(),
                    from_date.clone(),
                    to_date.clone(),
                    export_param(),
                ],
            ),
            CommandNode::leaf(
                "plot",
                "Plot historical prices.",
                vec![
                    ticker_param(),
                    price_period_param(),
                    chart_type_param(),
                    from_date.clone(),
                    to_date.clone(),
                    ParamSpec::opt(
                        "indicators",
                        "--indicators",
                        "-i",
                        "Comma-separated list of indicators.",
                        ValueKind::List(CatalogKind::Indicator),
                    ),
                ],
            ),
            CommandNode::leaf(
                "compare",
                "Compare price performance.",
                vec![
                    tickers_param(),
                    price_period_param(),
                    from_date,
                    to_date,
                    ParamSpec::opt(
                        "index",
                        "--index",
                        "-x",
                        "Benchmark market index.",
                        ValueKind::List(CatalogKind::MarketIndex),
                    ),
                ],
            ),
        ],
    );

    let screen = CommandNode::group(
        "screen",
        "Stock screening.",
        vec![
            CommandNode::leaf(
                "search",
                "Screen stocks by conditions.",
                vec![
                    ParamSpec::opt(
                        "profile",
                        "--profile",
                        "-p",
                        "Screening profile name.",
                        ValueKind::List(CatalogKind::ScreeningProfile),
                    ),
                    ParamSpec::opt(
                        "conditions",
                        "--conditions",
                        "-c",
                        "Conditions of search.",
                        ValueKind::ScreeningCondition,
                    )
                    .multi(),
                    ParamSpec::opt(
                        "metrics",
                        "--metrics",
                        "-m",
                        "Comma-separated metrics to display.",
                        ValueKind::MetricIdentifier,
                    ),
                    ParamSpec::opt(
                        "view_name",
                        "--view_name",
                        "-v",
                        "Metric view name.",
                        ValueKind::List(CatalogKind::MetricView),
                    ),
                    ParamSpec::opt(
                        "sort_order",
                        "--sort_order",
                        "-so",
                        "Order to sort the output by.",
                        ValueKind::List(CatalogKind::SortOrder),
                    ),
                    ParamSpec::opt(
                        "include_period",
                        "--include_period",
                        "-ip",
                        "Output will contain the periods.",
                        ValueKind::Flag,
                    ),
                    export_param(),
                ],
            ),
            CommandNode::leaf("profiles", "List available screening profiles.", vec![]),
            CommandNode::leaf(
                "gainers",
                "Top gaining stocks.",
                vec![ParamSpec::opt(
                    "view_name",
                    "--view_name",
                    "-v",
                    "Metric view name.",
                    ValueKind::List(CatalogKind::MetricView),
                )],
            ),
            CommandNode::leaf(
                "losers",
                "Top losing stocks.",
                vec![ParamSpec::opt(
                    "view_name",
                    "--view_name",
                    "-v",
                    "Metric view name.",
                    ValueKind::List(CatalogKind::MetricView),
                )],
            ),
        ],
    );

    let watchlist = CommandNode::group(
        "watchlist",
        "User watchlists.",
        vec![
            CommandNode::leaf("list", "List your watchlists.", vec![]),
            CommandNode::leaf(
                "create",
                "Create a new watchlist.",
                vec![
                    ParamSpec::opt(
                        "name",
                        "--name",
                        "-n",
                        "Name of the new watchlist.",
                        ValueKind::Text,
                    ),
                    tickers_param(),
                ],
            ),
            CommandNode::leaf(
                "add",
                "Add tickers to a watchlist.",
                vec![watchlist_name_param(), tickers_param()],
            ),
            CommandNode::leaf(
                "rm",
                "Remove tickers from a watchlist.",
                vec![
                    watchlist_name_param(),
                    ParamSpec::opt(
                        "tickers",
                        "--tickers",
                        "-k",
                        "Comma-separated list of tickers.",
                        ValueKind::List(CatalogKind::WatchlistTicker),
                    ),
                ],
            ),
            CommandNode::leaf(
                "details",
                "Show a watchlist's companies.",
                vec![watchlist_name_param()],
            ),
            CommandNode::leaf(
                "export",
                "Export watchlist data.",
                vec![
                    watchlist_name_param(),
                    ParamSpec::opt(
                        "path",
                        "--path",
                        "-p",
                        "Filename to export the output to.",
                        ValueKind::Path {
                            extensions: &["xlsx"],
                        },
                    ),
                ],
            ),
        ],
    );

    let builtins = vec![
        CommandNode::leaf("help", "List available commands.", vec![]),
        CommandNode::leaf(
            "clear",
            "Clear the console screen.",
            vec![ParamSpec::opt(
                "all",
                "--all",
                "-a",
                "Clear entire screen.",
                ValueKind::Flag,
            )],
        ),
        CommandNode::leaf("version", "Show terminal version.", vec![]),
        CommandNode::leaf("exit", "Exit the shell.", vec![]),
    ];

    let mut children = vec![
        company, earnings, financials, market, metrics, news, price, screen, watchlist,
    ];
    children.extend(builtins);

    Registry::new(CommandNode::group("", "", children))
}
