//! End-to-end run: load → baskets → mine → recommend.
//!
//! Each stage consumes the previous stage's output and produces a fresh
//! value; the first failure aborts the run.

use crate::basket::IncidenceTable;
use crate::config::PipelineConfig;
use crate::data::TransactionLog;
use crate::error::{BasketError, Result};
use crate::mining::{join_items, AssociationRule};
use crate::recommend::{Recommendation, Recommender};
use crate::traits::RuleMiner;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, info_span, warn};

/// How many rules the report keeps.
pub const TOP_RULES: usize = 10;

/// Recommendations for one queried item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Queried item key
    pub item: String,
    /// Ranked recommendations
    pub recommendations: Vec<Recommendation>,
}

/// Summary of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Rows loaded
    pub n_transactions: usize,
    /// Monthly baskets
    pub n_baskets: usize,
    /// Distinct item keys
    pub n_items: usize,
    /// Rules mined
    pub n_rules: usize,
    /// Highest-lift rules, at most [`TOP_RULES`]
    pub top_rules: Vec<AssociationRule>,
    /// One entry per configured query
    pub queries: Vec<QueryResult>,
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transactions: {}", self.n_transactions)?;
        writeln!(f, "Baskets:      {}", self.n_baskets)?;
        writeln!(f, "Items:        {}", self.n_items)?;
        writeln!(f, "Rules:        {}", self.n_rules)?;
        if !self.top_rules.is_empty() {
            writeln!(f, "\nTop rules by lift:")?;
            for rule in &self.top_rules {
                writeln!(f, "  {rule}")?;
            }
        }
        for query in &self.queries {
            let items: Vec<&str> = query.recommendations.iter().map(|r| r.item.as_str()).collect();
            writeln!(f, "\n{} -> [{}]", query.item, items.join(", "))?;
        }
        Ok(())
    }
}

/// Runs the stages with a given rule miner.
#[derive(Debug, Clone)]
pub struct Pipeline<M> {
    miner: M,
    rec_count: usize,
}

impl<M: RuleMiner> Pipeline<M> {
    /// Creates a pipeline returning `rec_count` items per query.
    pub fn new(miner: M, rec_count: usize) -> Self {
        Self { miner, rec_count }
    }

    /// Builds the incidence table for `log`.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::EmptyInput`] if the log has no rows.
    pub fn baskets(&self, log: &TransactionLog) -> Result<IncidenceTable> {
        if log.is_empty() {
            return Err(BasketError::empty_input("transaction log has no rows"));
        }
        let table = IncidenceTable::from_transactions(log);
        info!(
            baskets = table.n_baskets(),
            items = table.n_items(),
            "baskets built"
        );
        Ok(table)
    }

    /// Mines rules and ranks them for recommendation.
    ///
    /// # Errors
    ///
    /// Propagates the miner's configuration errors.
    pub fn mine(&self, table: &IncidenceTable) -> Result<Recommender> {
        let rules = self.miner.mine(table)?;
        if rules.is_empty() {
            warn!("no association rules passed the thresholds");
        } else {
            info!(rules = rules.len(), "rules mined");
        }
        Ok(Recommender::new(rules))
    }

    /// Runs every stage over an already loaded log.
    ///
    /// # Errors
    ///
    /// Returns the first stage error.
    pub fn run_log<S: AsRef<str>>(&self, log: &TransactionLog, queries: &[S]) -> Result<PipelineReport> {
        let table = self.baskets(log)?;
        let recommender = self.mine(&table)?;

        let queries = queries
            .iter()
            .map(|query| {
                let item = query.as_ref();
                let recommendations = recommender.recommend_scored(item, self.rec_count);
                debug!(item, found = recommendations.len(), "query answered");
                QueryResult {
                    item: item.to_string(),
                    recommendations,
                }
            })
            .collect();

        Ok(PipelineReport {
            n_transactions: log.len(),
            n_baskets: table.n_baskets(),
            n_items: table.n_items(),
            n_rules: recommender.len(),
            top_rules: recommender.rules().iter().take(TOP_RULES).cloned().collect(),
            queries,
        })
    }
}

/// Loads `config.input` and runs the whole pipeline.
///
/// # Errors
///
/// Returns the first load, validation or mining error.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    let span = info_span!("pipeline", input = %config.input.display());
    let _guard = span.enter();

    config.validate()?;
    let log = TransactionLog::from_path(&config.input)?;
    info!(rows = log.len(), "transactions loaded");

    let report = Pipeline::new(config.miner(), config.rec_count).run_log(&log, config.queries.as_slice())?;
    for query in &report.queries {
        let items: Vec<&str> = query.recommendations.iter().map(|r| r.item.as_str()).collect();
        info!(item = %query.item, recommendations = %items.join(","), "recommendation");
    }
    if let Some(best) = report.top_rules.first() {
        debug!(
            antecedent = %join_items(&best.antecedent),
            consequent = %join_items(&best.consequent),
            lift = best.lift,
            "strongest rule"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Transaction;
    use crate::mining::{Apriori, RuleMetric};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn log() -> TransactionLog {
        let rows = [
            (1, 2, 0, "2020-01-05"),
            (1, 11, 11, "2020-01-20"),
            (2, 2, 0, "2020-01-02"),
            (2, 11, 11, "2020-01-03"),
            (3, 15, 1, "2020-02-10"),
            (3, 2, 0, "2020-02-11"),
            (4, 15, 1, "2020-03-01"),
        ];
        rows.iter()
            .map(|&(u, s, c, d)| Transaction::parse(u, s, c, d).expect("valid row"))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_run_log_counts_and_queries() {
        let pipeline = Pipeline::new(Apriori::new().with_min_support(0.2), 2);
        let report = pipeline.run_log(&log(), &["2_0", "99_99"]).expect("run");

        assert_eq!(report.n_transactions, 7);
        assert_eq!(report.n_baskets, 4);
        assert_eq!(report.n_items, 3);
        assert!(report.n_rules > 0);
        assert_eq!(report.queries.len(), 2);

        // {11_11} co-occurs with {2_0} twice; lift 4/3 beats {15_1} at 2/3
        let first = &report.queries[0].recommendations[0];
        assert_eq!(first.item.as_str(), "11_11");
        assert!(report.queries[1].recommendations.is_empty());
    }

    #[test]
    fn test_top_rules_sorted_by_lift() {
        let pipeline = Pipeline::new(Apriori::new().with_min_support(0.2), 1);
        let no_queries: [&str; 0] = [];
        let report = pipeline.run_log(&log(), &no_queries).expect("run");
        for pair in report.top_rules.windows(2) {
            assert!(pair[0].lift >= pair[1].lift);
        }
    }

    #[test]
    fn test_empty_log_fails() {
        let pipeline = Pipeline::new(Apriori::new(), 1);
        let err = pipeline.run_log(&TransactionLog::default(), &["2_0"]).unwrap_err();
        assert!(matches!(err, BasketError::EmptyInput(_)));
    }

    #[test]
    fn test_strict_thresholds_give_empty_results() {
        let pipeline = Pipeline::new(Apriori::new().with_min_support(0.9).with_metric(RuleMetric::Lift, 1.0), 3);
        let report = pipeline.run_log(&log(), &["2_0"]).expect("run");
        assert_eq!(report.n_rules, 0);
        assert!(report.queries[0].recommendations.is_empty());
    }

    #[test]
    fn test_run_from_config() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "UserId,ServiceId,CategoryId,CreateDate").expect("header");
        writeln!(file, "1,2,0,2020-01-05 10:00:00").expect("row");
        writeln!(file, "1,11,11,2020-01-06 10:00:00").expect("row");
        file.flush().expect("flush");

        let config = PipelineConfig::new(file.path()).with_query("2_0");
        let report = run(&config).expect("run");
        assert_eq!(report.n_baskets, 1);
        assert_eq!(report.queries[0].recommendations[0].item.as_str(), "11_11");
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let config = PipelineConfig::new("unused.csv").with_min_support(2.0);
        assert!(matches!(run(&config), Err(BasketError::InvalidHyperparameter { .. })));
    }

    #[test]
    fn test_report_display() {
        let pipeline = Pipeline::new(Apriori::new().with_min_support(0.2), 1);
        let text = pipeline.run_log(&log(), &["2_0"]).expect("run").to_string();
        assert!(text.contains("Baskets:      4"));
        assert!(text.contains("2_0 -> [11_11]"));
    }

    #[test]
    fn test_report_serializes() {
        let pipeline = Pipeline::new(Apriori::new().with_min_support(0.2), 1);
        let report = pipeline.run_log(&log(), &["2_0"]).expect("run");
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["n_baskets"], 4);
        assert_eq!(json["queries"][0]["recommendations"][0]["item"], "11_11");
    }
}
