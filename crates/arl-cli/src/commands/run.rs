//! Run command: whole pipeline from a JSON config

use crate::error::{CliError, Result};
use crate::output;
use basket_arl::config::PipelineConfig;
use basket_arl::pipeline::{self, PipelineReport};
use std::path::Path;

/// Run the pipeline described by `config_path`
pub(crate) fn run(config_path: &Path, json: bool) -> Result<()> {
    if !config_path.is_file() {
        return Err(CliError::FileNotFound(config_path.to_path_buf()));
    }
    let config = PipelineConfig::from_path(config_path)?;
    if !config.input.is_file() {
        return Err(CliError::FileNotFound(config.input.clone()));
    }

    let report = pipeline::run(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &PipelineReport) {
    output::section("Baskets");
    output::kv("Transactions", report.n_transactions);
    output::kv("Baskets", report.n_baskets);
    output::kv("Items", report.n_items);
    output::kv("Rules", report.n_rules);

    output::rules("Top rules by lift", &report.top_rules, report.top_rules.len());

    if report.queries.is_empty() {
        return;
    }
    output::section("Recommendations");
    for query in &report.queries {
        let items: Vec<&str> = query
            .recommendations
            .iter()
            .map(|rec| rec.item.as_str())
            .collect();
        output::kv(&query.item, format!("[{}]", items.join(", ")));
    }
}
