//! Subcommand implementations

pub(crate) mod baskets;
pub(crate) mod recommend;
pub(crate) mod rules;
pub(crate) mod run;

use crate::error::{CliError, Result};
use crate::MiningArgs;
use basket_arl::data::TransactionLog;
use basket_arl::mining::{Apriori, RuleMetric};
use std::path::Path;
use tracing::info;

/// Load a transaction CSV, reporting a missing file distinctly
pub(crate) fn load_log(path: &Path) -> Result<TransactionLog> {
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let log = TransactionLog::from_path(path)?;
    info!(rows = log.len(), path = %path.display(), "transactions loaded");
    Ok(log)
}

impl MiningArgs {
    /// Miner configured from the command line thresholds
    pub(crate) fn miner(&self) -> Result<Apriori> {
        let metric: RuleMetric = self.metric.parse()?;
        let miner = Apriori::new()
            .with_min_support(self.min_support)
            .with_metric(metric, self.min_threshold);
        Ok(match self.max_len {
            Some(max_len) => miner.with_max_len(max_len),
            None => miner,
        })
    }
}
