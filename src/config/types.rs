use serde::Deserialize;

/// Browser identity strings rotated across requests when no pool is configured
pub const DEFAULT_USER_AGENTS: [&str; 6] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) AppleWebKit/604.1.38 (KHTML, like Gecko) Version/11.0 Safari/604.1.38",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:56.0) Gecko/20100101 Firefox/56.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_13) AppleWebKit/604.1.38 (KHTML, like Gecko) Version/11.0 Safari/604.1.38",
];

/// Main configuration structure for Sitemap-SEO
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sitemap: SitemapConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Creates a configuration for `root_url` with every other setting at its default
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            sitemap: SitemapConfig {
                root_url: root_url.into(),
                skip_revisited_sitemaps: false,
            },
            scraper: ScraperConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Sitemap discovery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SitemapConfig {
    /// URL of the root sitemap (index or URL set)
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Dispatch each sitemap URL at most once per run.
    ///
    /// Off by default: sitemap graphs containing a cycle are then walked
    /// forever, matching the unguarded behavior.
    #[serde(rename = "skip-revisited-sitemaps", default)]
    pub skip_revisited_sitemaps: bool,
}

/// Page scraping configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Maximum number of page fetches in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_concurrency() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    10
}

/// User agent rotation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Identity strings to pick from, one per request
    #[serde(default = "default_pool")]
    pub pool: Vec<String>,

    /// Seed for the rotation generator; seeded from the OS when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            pool: default_pool(),
            seed: None,
        }
    }
}

fn default_pool() -> Vec<String> {
    DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path to the markdown report file, if one should be written
    #[serde(rename = "report-path", default)]
    pub report_path: Option<String>,
}
