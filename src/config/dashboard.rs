use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::dashboard::DEFAULT_PLACEHOLDER_USER_ID;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Parameters of the six section reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionQueries {
    pub farmer_id: i64,
    pub page_limit: u32,
    pub page_offset: u32,
    pub iot_device_id: String,
    pub iot_limit: u32,
    pub blockchain_limit: u32,
}

impl Default for SectionQueries {
    fn default() -> Self {
        Self {
            farmer_id: 1,
            page_limit: 10,
            page_offset: 0,
            iot_device_id: "sensor-001".to_string(),
            iot_limit: 20,
            blockchain_limit: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub queries: SectionQueries,
    pub placeholder_user_id: String,
    pub request_timeout: Duration,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub token: Option<String>,
    pub credentials: Option<LoginCredentials>,
    pub demo: bool,
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = SectionQueries::default();

        let queries = SectionQueries {
            farmer_id: parse_or(&var, "DASHBOARD_FARMER_ID", defaults.farmer_id),
            page_limit: parse_or(&var, "DASHBOARD_PAGE_LIMIT", defaults.page_limit),
            page_offset: defaults.page_offset,
            iot_device_id: var("DASHBOARD_IOT_DEVICE_ID").unwrap_or(defaults.iot_device_id),
            iot_limit: parse_or(&var, "DASHBOARD_IOT_LIMIT", defaults.iot_limit),
            blockchain_limit: parse_or(&var, "DASHBOARD_BLOCKCHAIN_LIMIT", defaults.blockchain_limit),
        };

        let credentials = match (var("DASHBOARD_USERNAME"), var("DASHBOARD_PASSWORD")) {
            (Some(username), Some(password)) => Some(LoginCredentials { username, password }),
            _ => None,
        };

        Self {
            api_base_url: var("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            queries,
            placeholder_user_id: var("LINE_PLACEHOLDER_USER_ID")
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_USER_ID.to_string()),
            request_timeout: Duration::from_secs(parse_or(
                &var,
                "REQUEST_TIMEOUT_SECONDS",
                DEFAULT_TIMEOUT_SECONDS,
            )),
            port: parse_or(&var, "PORT", DEFAULT_PORT),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            token: var("DASHBOARD_TOKEN"),
            credentials,
            demo: var("DASHBOARD_DEMO")
                .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "invalid config value; using default");
            default
        }),
        None => default,
    }
}
