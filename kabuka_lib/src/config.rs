//! Service configuration, read from the environment.

use std::path::PathBuf;

use kabuka_api::FetchConfig;

pub const DEFAULT_ADVISOR_NAME: &str = "株式投資アドバイザー西野彩羽";

pub const ENV_BASE_URL: &str = "KABUKA_BASE_URL";
pub const ENV_VERIFY_TLS: &str = "KABUKA_VERIFY_TLS";
pub const ENV_ADVISOR_NAME: &str = "KABUKA_ADVISOR_NAME";
pub const ENV_TRACKING_LOG: &str = "KABUKA_TRACKING_LOG";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub fetch: FetchConfig,
    /// Top-level persona label placed in every response.
    pub advisor_name: String,
    /// Where request events are appended. `None` disables event logging.
    pub tracking_log: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            advisor_name: DEFAULT_ADVISOR_NAME.to_string(),
            tracking_log: None,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by `KABUKA_*` variables. Unset, empty or
    /// unparsable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServiceConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let string = |key: &str| non_empty(lookup(key));
        Self {
            fetch: FetchConfig {
                base_url: string(ENV_BASE_URL).unwrap_or(defaults.fetch.base_url),
                verify_tls: string(ENV_VERIFY_TLS)
                    .and_then(|val| parse_bool(&val))
                    .unwrap_or(defaults.fetch.verify_tls),
            },
            advisor_name: string(ENV_ADVISOR_NAME).unwrap_or(defaults.advisor_name),
            tracking_log: string(ENV_TRACKING_LOG).map(PathBuf::from),
        }
    }
}

fn non_empty(val: Option<String>) -> Option<String> {
    val.map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
