//! Desk configuration, read from the environment.

use std::env::{self, VarError};
use std::path::PathBuf;

use log::debug;

use crate::errors::{Error, Result};

const FMP_API_KEY_VAR: &str = "TRADINGDESK_FMP_API_KEY";
const SNAPSHOT_DIR_VAR: &str = "TRADINGDESK_SNAPSHOT_DIR";

/// Runtime configuration for a [`Desk`](crate::Desk).
///
/// Everything is optional: without an FMP key the equity and commodity
/// chains start from Yahoo, and without a snapshot directory last-good
/// values are kept in memory only.
#[derive(Clone, Debug, Default)]
pub struct DeskConfig {
    /// Financial Modeling Prep API key
    pub fmp_api_key: Option<String>,

    /// Directory for persisted last-good snapshots
    pub snapshot_dir: Option<PathBuf>,
}

fn read_var(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => {
            let value = value.trim().to_string();
            Ok(if value.is_empty() { None } else { Some(value) })
        }
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => {
            Err(Error::Config(format!("{} is not valid unicode", name)))
        }
    }
}

impl DeskConfig {
    /// Read the configuration from `TRADINGDESK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let fmp_api_key = read_var(FMP_API_KEY_VAR)?;
        let snapshot_dir = read_var(SNAPSHOT_DIR_VAR)?.map(PathBuf::from);

        debug!(
            "Desk config: fmp_api_key={}, snapshot_dir={:?}",
            if fmp_api_key.is_some() { "set" } else { "unset" },
            snapshot_dir
        );

        Ok(Self {
            fmp_api_key,
            snapshot_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let config = DeskConfig::default();
        assert!(config.fmp_api_key.is_none());
        assert!(config.snapshot_dir.is_none());
    }

    #[test]
    fn test_blank_values_read_as_unset() {
        env::set_var("TRADINGDESK_TEST_BLANK", "   ");
        assert_eq!(read_var("TRADINGDESK_TEST_BLANK").unwrap(), None);
        env::remove_var("TRADINGDESK_TEST_BLANK");
    }

    #[test]
    fn test_set_values_are_trimmed() {
        env::set_var("TRADINGDESK_TEST_KEY", " abc123 ");
        assert_eq!(
            read_var("TRADINGDESK_TEST_KEY").unwrap(),
            Some("abc123".to_string())
        );
        env::remove_var("TRADINGDESK_TEST_KEY");
    }
}
