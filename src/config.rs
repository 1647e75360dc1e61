//! Runtime configuration.
//!
//! Values come from, in order of precedence: the browser preference store
//! (`localStorage`), build-time environment, built-in defaults.

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_LOG_LEVEL: &str = "info";

const API_BASE_KEY: &str = "shift_report.api_base";
const LOG_LEVEL_KEY: &str = "shift_report.log_level";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Prefix of every backend path, without trailing slash.
    pub api_base: String,
    /// `EnvFilter` directive for the console logger.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Build a config from a preference lookup, falling back to build-time
    /// values and then defaults. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |key: &str, build_time: Option<&'static str>, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or_else(|| {
                    build_time
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                })
                .unwrap_or_else(|| default.to_string())
        };

        let api_base = pick(
            API_BASE_KEY,
            option_env!("SHIFT_REPORT_API_BASE"),
            DEFAULT_API_BASE,
        );
        let log_level = pick(LOG_LEVEL_KEY, option_env!("SHIFT_REPORT_LOG"), DEFAULT_LOG_LEVEL);

        Self {
            api_base: normalize_base(&api_base),
            log_level,
        }
    }

    /// Load from the browser's `localStorage`. Storage being unavailable
    /// (private mode, sandboxed iframe) is not an error.
    pub fn load() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self::from_lookup(|key| storage.as_ref().and_then(|s| s.get_item(key).ok().flatten()))
    }
}

fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_end_matches('/');
    if trimmed.is_empty() && base.starts_with('/') {
        // "/" means the site root
        String::new()
    } else {
        trimmed.to_string()
    }
}
