//! Core traits at the pipeline seams.
//!
//! The rule miner is a collaborator with a fixed contract: it takes the
//! incidence table and returns association rules. [`crate::pipeline::Pipeline`]
//! is generic over it so another mining algorithm can be dropped in.

use crate::basket::IncidenceTable;
use crate::error::Result;
use crate::mining::AssociationRule;

/// Turns an incidence table into association rules.
///
/// Implementations must be deterministic for a fixed table and
/// configuration, and must never return a rule whose itemset support is
/// below their configured minimum support.
///
/// # Examples
///
/// ```
/// use basket_arl::basket::IncidenceTable;
/// use basket_arl::mining::Apriori;
/// use basket_arl::traits::RuleMiner;
///
/// let table = IncidenceTable::from_baskets(vec![("a", vec!["1_1", "2_2"])]);
/// let rules = Apriori::new().with_min_support(0.5).mine(&table).unwrap();
/// assert_eq!(rules.len(), 2);
/// ```
pub trait RuleMiner {
    /// Mines association rules from `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the miner's configuration is invalid.
    fn mine(&self, table: &IncidenceTable) -> Result<Vec<AssociationRule>>;
}

impl<M: RuleMiner + ?Sized> RuleMiner for &M {
    fn mine(&self, table: &IncidenceTable) -> Result<Vec<AssociationRule>> {
        (**self).mine(table)
    }
}
