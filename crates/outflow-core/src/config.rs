use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    let api_base_url = or_default("OUTFLOW_API_BASE_URL", "http://localhost:8000");
    let user_id = or_default("OUTFLOW_USER_ID", "demo_user_123");
    let env = parse_environment(&or_default("OUTFLOW_ENV", "development"));
    let log_level = or_default("OUTFLOW_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("OUTFLOW_REQUEST_TIMEOUT_SECS", "30")?;
    let analyze_timeout_secs = parse_u64("OUTFLOW_ANALYZE_TIMEOUT_SECS", "180")?;
    let lead_poll_interval_ms = parse_u64("OUTFLOW_LEAD_POLL_INTERVAL_MS", "5000")?;
    let lead_poll_max_attempts = parse_u32("OUTFLOW_LEAD_POLL_MAX_ATTEMPTS", "24")?;
    let lead_poll_proceed_on_exhaustion =
        parse_bool("OUTFLOW_LEAD_POLL_PROCEED_ON_EXHAUSTION", "true")?;

    Ok(AppConfig {
        api_base_url,
        user_id,
        env,
        log_level,
        request_timeout_secs,
        analyze_timeout_secs,
        lead_poll_interval_ms,
        lead_poll_max_attempts,
        lead_poll_proceed_on_exhaustion,
    })
}

/// Parse an environment name, defaulting to `Development` for unknown values.
fn parse_environment(raw: &str) -> Environment {
    match raw.to_ascii_lowercase().as_str() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_apply_with_empty_env() {
        let map = HashMap::new();
        let config = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.user_id, "demo_user_123");
        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.analyze_timeout_secs, 180);
        assert_eq!(config.lead_poll_interval_ms, 5000);
        assert_eq!(config.lead_poll_max_attempts, 24);
        assert!(config.lead_poll_proceed_on_exhaustion);
    }

    #[test]
    fn overrides_are_read() {
        let mut map = HashMap::new();
        map.insert("OUTFLOW_API_BASE_URL", "https://api.outflow.example");
        map.insert("OUTFLOW_ENV", "production");
        map.insert("OUTFLOW_LEAD_POLL_MAX_ATTEMPTS", "4");
        map.insert("OUTFLOW_LEAD_POLL_PROCEED_ON_EXHAUSTION", "false");
        let config = build_app_config(lookup_from_map(&map)).expect("overrides should be valid");
        assert_eq!(config.api_base_url, "https://api.outflow.example");
        assert_eq!(config.env, Environment::Production);
        assert_eq!(config.lead_poll_max_attempts, 4);
        assert!(!config.lead_poll_proceed_on_exhaustion);
    }

    #[test]
    fn unknown_environment_falls_back_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn invalid_number_is_rejected() {
        let mut map = HashMap::new();
        map.insert("OUTFLOW_LEAD_POLL_INTERVAL_MS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "OUTFLOW_LEAD_POLL_INTERVAL_MS"),
            "expected InvalidEnvVar(OUTFLOW_LEAD_POLL_INTERVAL_MS), got: {result:?}"
        );
    }

    #[test]
    fn invalid_bool_is_rejected() {
        let mut map = HashMap::new();
        map.insert("OUTFLOW_LEAD_POLL_PROCEED_ON_EXHAUSTION", "maybe");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "OUTFLOW_LEAD_POLL_PROCEED_ON_EXHAUSTION"),
            "expected InvalidEnvVar(OUTFLOW_LEAD_POLL_PROCEED_ON_EXHAUSTION), got: {result:?}"
        );
    }
}
