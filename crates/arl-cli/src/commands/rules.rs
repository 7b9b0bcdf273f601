//! Rules command: mine and list association rules

use super::load_log;
use crate::error::Result;
use crate::output;
use crate::MiningArgs;
use basket_arl::pipeline::Pipeline;
use std::path::Path;

/// Mine rules from a transaction CSV and print them by lift
pub(crate) fn run(path: &Path, mining: &MiningArgs, limit: usize, json: bool) -> Result<()> {
    let miner = mining.miner()?;
    let log = load_log(path)?;
    let pipeline = Pipeline::new(&miner, 0);
    let table = pipeline.baskets(&log)?;
    let ranked = pipeline.mine(&table)?;

    if json {
        let shown: Vec<_> = ranked.rules().iter().take(limit).collect();
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    output::section("Mining");
    output::kv("Baskets", table.n_baskets());
    output::kv("Min support", miner.min_support());
    output::kv("Filter", format!("{} >= {}", miner.metric(), miner.min_threshold()));
    output::kv("Rules", ranked.len());
    output::rules("Rules by lift", ranked.rules(), limit);
    Ok(())
}
