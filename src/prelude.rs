//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use basket_arl::prelude::*;
//! ```

pub use crate::basket::{BasketKey, IncidenceTable, ItemKey};
pub use crate::config::PipelineConfig;
pub use crate::data::{Transaction, TransactionLog};
pub use crate::error::{BasketError, Result};
pub use crate::mining::{apriori, association_rules, Apriori, AssociationRule, FrequentItemsets, RuleMetric};
pub use crate::pipeline::{Pipeline, PipelineReport};
pub use crate::recommend::{recommend, Recommendation, Recommender};
pub use crate::traits::RuleMiner;
