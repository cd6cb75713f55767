use captable_core::errors::{Error, Result};

pub const DEFAULT_DB_PATH: &str = "./db/captable.db";
pub const DEFAULT_SCENARIO: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: String,
    pub scenario: String,
    pub history_limit: Option<usize>,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("CAPTABLE_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());
        let scenario = lookup("CAPTABLE_SCENARIO").unwrap_or_else(|| DEFAULT_SCENARIO.into());
        let history_limit = match lookup("CAPTABLE_HISTORY_LIMIT") {
            Some(raw) if !raw.trim().is_empty() => {
                let limit: usize = raw.trim().parse().map_err(|_| {
                    Error::InvalidConfigValue(format!("CAPTABLE_HISTORY_LIMIT '{}'", raw))
                })?;
                if limit == 0 {
                    return Err(Error::InvalidConfigValue(
                        "CAPTABLE_HISTORY_LIMIT must be at least 1".to_string(),
                    ));
                }
                Some(limit)
            }
            _ => None,
        };
        let log_format = lookup("CAPTABLE_LOG_FORMAT").unwrap_or_else(|| "text".into());
        Ok(Self {
            db_path,
            scenario,
            history_limit,
            log_format,
        })
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, db: Option<String>, scenario: Option<String>) -> Self {
        if let Some(db) = db {
            self.db_path = db;
        }
        if let Some(scenario) = scenario {
            self.scenario = scenario;
        }
        self
    }
}
