//! App Configuration
//!
//! Resolved once at startup. On wasm32 there is no process environment, so
//! overrides are baked in at compile time; native builds also read the
//! runtime environment, which wins.

use log::LevelFilter;

use crate::sync::MutationPolicy;

pub const DEFAULT_API_HOST: &str = "http://localhost:5000";
pub const API_PREFIX: &str = "/api";

pub const API_URL_ENV: &str = "TODO_API_URL";
pub const LOG_LEVEL_ENV: &str = "TODO_LOG";
pub const MUTATION_POLICY_ENV: &str = "TODO_MUTATION_POLICY";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL the `/todos` paths are appended to, `/api` prefix included.
    pub api_base_url: String,
    pub log_level: LevelFilter,
    pub mutation_policy: MutationPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: api_base_url(None),
            log_level: LevelFilter::Info,
            mutation_policy: MutationPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_host = env_value(API_URL_ENV, option_env!("TODO_API_URL"));
        let log_level = env_value(LOG_LEVEL_ENV, option_env!("TODO_LOG"))
            .and_then(|value| parse_level(&value))
            .unwrap_or(LevelFilter::Info);
        let mutation_policy = env_value(MUTATION_POLICY_ENV, option_env!("TODO_MUTATION_POLICY"))
            .and_then(|value| parse_policy(&value))
            .unwrap_or_default();

        Self {
            api_base_url: api_base_url(api_host.as_deref()),
            log_level,
            mutation_policy,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn env_value(name: &str, compiled: Option<&'static str>) -> Option<String> {
    std::env::var(name)
        .ok()
        .or_else(|| compiled.map(str::to_string))
        .filter(|value| !value.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
fn env_value(_name: &str, compiled: Option<&'static str>) -> Option<String> {
    compiled.map(str::to_string).filter(|value| !value.trim().is_empty())
}

/// Host override (or the default host) joined with the `/api` prefix.
pub fn api_base_url(host_override: Option<&str>) -> String {
    let host = host_override
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .unwrap_or(DEFAULT_API_HOST)
        .trim_end_matches('/');
    format!("{}{}", host, API_PREFIX)
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

fn parse_policy(value: &str) -> Option<MutationPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "queue" => Some(MutationPolicy::Queue),
        "reject" => Some(MutationPolicy::Reject),
        _ => None,
    }
}
