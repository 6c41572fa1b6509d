#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Application configuration, loaded from `OUTFLOW_*` environment variables.
///
/// Authentication is deliberately stubbed: `user_id` is a configured string
/// standing in for a signed-in user, matching the backend's expectations.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the Remote Campaign API.
    pub api_base_url: String,
    pub user_id: String,
    pub env: Environment,
    pub log_level: String,
    /// Per-request timeout for ordinary API calls.
    pub request_timeout_secs: u64,
    /// Timeout for the ICP analysis call, which performs web research
    /// server-side and routinely takes minutes.
    pub analyze_timeout_secs: u64,
    /// Delay between lead-enrichment poll attempts.
    pub lead_poll_interval_ms: u64,
    /// Hard ceiling on lead-enrichment poll attempts.
    pub lead_poll_max_attempts: u32,
    /// When the poll ceiling is reached, advance the wizard with whatever
    /// leads were found (possibly none) instead of failing the step.
    pub lead_poll_proceed_on_exhaustion: bool,
}
