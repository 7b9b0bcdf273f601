//! Baskets command: monthly basket contents

use super::load_log;
use crate::error::Result;
use crate::output;
use basket_arl::basket::IncidenceTable;
use std::collections::BTreeMap;
use std::path::Path;

/// Print basket → items for a transaction CSV
pub(crate) fn run(path: &Path, limit: usize, json: bool) -> Result<()> {
    let log = load_log(path)?;
    let table = IncidenceTable::from_transactions(&log);

    if json {
        let baskets: BTreeMap<&str, Vec<&str>> = table
            .baskets()
            .map(|(basket, items)| (basket.as_str(), items.iter().map(|i| i.as_str()).collect()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&baskets)?);
        return Ok(());
    }

    output::section("Baskets");
    output::kv("Transactions", log.len());
    output::kv("Baskets", table.n_baskets());
    output::kv("Items", table.n_items());
    println!();
    for (basket, items) in table.baskets().take(limit) {
        let items: Vec<&str> = items.iter().map(|i| i.as_str()).collect();
        println!("  {basket}: {}", items.join(", "));
    }
    if table.n_baskets() > limit {
        println!("  ... {} more", table.n_baskets() - limit);
    }
    Ok(())
}
