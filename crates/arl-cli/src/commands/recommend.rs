//! Recommend command: single item lookup

use super::load_log;
use crate::error::Result;
use crate::output;
use crate::MiningArgs;
use basket_arl::pipeline::Pipeline;
use std::path::Path;

/// Recommend up to `count` items that go with `item`
pub(crate) fn run(path: &Path, item: &str, count: usize, mining: &MiningArgs, json: bool) -> Result<()> {
    let miner = mining.miner()?;
    let log = load_log(path)?;
    let pipeline = Pipeline::new(miner, count);
    let table = pipeline.baskets(&log)?;
    let recommender = pipeline.mine(&table)?;
    let recommendations = recommender.recommend_scored(item, count);

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    output::section(&format!("Recommendations for {item}"));
    if recommendations.is_empty() {
        output::warning(&format!("no rule has {item} in its antecedent"));
        return Ok(());
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "  {}. {}  (lift={:.4}, confidence={:.4})",
            rank + 1,
            rec.item,
            rec.lift,
            rec.confidence
        );
    }
    Ok(())
}
