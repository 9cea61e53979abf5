/// Default number of concurrent provider calls
pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Default per-call timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default cache time-to-live in seconds
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Symbols shown on the trending board
pub const TRENDING_SYMBOLS: &[&str] = &[
    "AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "META", "NVDA", "NFLX", "BABA", "DIS", "PYPL", "ADBE",
    "CRM", "INTC", "AMD",
];

/// Tracked market indices and their display names
pub const MARKET_INDICES: &[(&str, &str)] = &[
    ("^GSPC", "S&P 500"),
    ("^DJI", "Dow Jones"),
    ("^IXIC", "NASDAQ"),
];

/// Fixed universe for free-text search
pub const SEARCH_UNIVERSE: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("GOOGL", "Alphabet Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("AMZN", "Amazon.com Inc."),
    ("TSLA", "Tesla Inc."),
    ("META", "Meta Platforms Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("NFLX", "Netflix Inc."),
    ("BABA", "Alibaba Group Holding Ltd."),
    ("DIS", "The Walt Disney Company"),
    ("PYPL", "PayPal Holdings Inc."),
    ("ADBE", "Adobe Inc."),
    ("CRM", "Salesforce Inc."),
    ("INTC", "Intel Corporation"),
    ("AMD", "Advanced Micro Devices Inc."),
    ("ORCL", "Oracle Corporation"),
    ("IBM", "International Business Machines Corporation"),
    ("UBER", "Uber Technologies Inc."),
    ("LYFT", "Lyft Inc."),
    ("SPOT", "Spotify Technology S.A."),
    ("TWTR", "Twitter Inc."),
    ("SNAP", "Snap Inc."),
    ("ZM", "Zoom Video Communications Inc."),
    ("SLACK", "Slack Technologies Inc."),
    ("SQ", "Square Inc."),
    ("SHOP", "Shopify Inc."),
];

/// Maximum number of free-text search results
pub const MAX_SEARCH_RESULTS: usize = 20;

/// Exchanges whose listings quote on the NSE feed
pub const NSE_EXCHANGES: &[&str] = &["NSE", "ALL"];

/// NSE-listed symbols that must be quoted through the BSE feed instead
pub const BSE_QUOTED_SYMBOLS: &[&str] = &["INDIGRID"];

/// Suffix appended to reference-table tickers
pub const REFERENCE_TICKER_SUFFIX: &str = ".NS";
