//! Asset-class services and the desk aggregate.
//!
//! Every service is the same shape: one fallback chain (constructed once,
//! never mutated), one static fallback literal, one TTL cache. The desk
//! builds them all from one config.

mod commodities;
mod country_risk;
mod crypto;
mod dollar;
mod equities;
mod inflation;
mod merval;
mod news;

pub use commodities::CommodityService;
pub use country_risk::CountryRiskService;
pub use crypto::CryptoService;
pub use dollar::DollarService;
pub use equities::EquityService;
pub use inflation::InflationService;
pub use merval::MervalService;
pub use news::NewsService;

use std::sync::Arc;

use log::info;

use tradingdesk_market_data::SnapshotStore;

use crate::config::DeskConfig;
use crate::errors::Result;

/// All asset-class services behind the dashboard.
pub struct Desk {
    pub crypto: CryptoService,
    pub equities: EquityService,
    pub commodities: CommodityService,
    pub dollar: DollarService,
    pub merval: MervalService,
    pub inflation: InflationService,
    pub country_risk: CountryRiskService,
    pub news: NewsService,
}

impl Desk {
    /// Build every service from the given configuration.
    pub fn new(config: &DeskConfig) -> Result<Self> {
        let store = match &config.snapshot_dir {
            Some(dir) => {
                info!("Desk: persisting snapshots under {}", dir.display());
                Some(Arc::new(SnapshotStore::open(dir)?))
            }
            None => None,
        };
        let store = store.as_ref();
        let fmp_api_key = config.fmp_api_key.as_deref();

        Ok(Self {
            crypto: CryptoService::new(store),
            equities: EquityService::new(fmp_api_key, store),
            commodities: CommodityService::new(fmp_api_key, store),
            dollar: DollarService::new(store),
            merval: MervalService::new(store),
            inflation: InflationService::new(store),
            country_risk: CountryRiskService::new(store),
            news: NewsService::new(store),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desk_builds_without_config() {
        let desk = Desk::new(&DeskConfig::default());
        assert!(desk.is_ok());
    }

    #[test]
    fn test_desk_builds_with_snapshot_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DeskConfig {
            fmp_api_key: Some("demo".to_string()),
            snapshot_dir: Some(tmp.path().to_path_buf()),
        };
        assert!(Desk::new(&config).is_ok());
    }
}
