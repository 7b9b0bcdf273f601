//! Association-rule recommendations.
//!
//! Rules are ranked by lift (highest first). For a queried item every rule
//! whose antecedent contains it contributes its consequent items, in rank
//! order; repeats are dropped keeping the first occurrence, so the result
//! stays in descending-lift order.
//!
//! # Quick Start
//!
//! ```
//! use basket_arl::mining::{AssociationRule, Itemset};
//! use basket_arl::basket::ItemKey;
//! use basket_arl::recommend::recommend;
//!
//! let antecedent: Itemset = [ItemKey::from("2_0")].into_iter().collect();
//! let consequent: Itemset = [ItemKey::from("11_11")].into_iter().collect();
//! let rules = vec![AssociationRule::from_supports(antecedent, consequent, 0.2, 0.2, 0.2)];
//!
//! let recommendations = recommend(&rules, "2_0", 1);
//! assert_eq!(recommendations, vec![ItemKey::from("11_11")]);
//! assert!(recommend(&rules, "99_99", 3).is_empty());
//! ```

use crate::basket::ItemKey;
use crate::mining::AssociationRule;
use serde::Serialize;
use std::collections::HashSet;

/// One recommended item with the rule that ranked it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Recommended item
    pub item: ItemKey,
    /// Lift of the highest-ranked rule that produced it
    pub lift: f64,
    /// Confidence of that rule
    pub confidence: f64,
}

/// Rule set ranked by lift, ready to answer many queries.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    rules: Vec<AssociationRule>,
}

impl Recommender {
    /// Ranks `rules` by lift, descending.
    ///
    /// The sort is stable: rules with equal lift keep their mined order.
    #[must_use]
    pub fn new(mut rules: Vec<AssociationRule>) -> Self {
        rules.sort_by(|a, b| b.lift.total_cmp(&a.lift));
        Self { rules }
    }

    /// Ranked rules.
    #[must_use]
    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules whose antecedent contains `item`, in rank order.
    pub fn matching_rules<'a>(&'a self, item: &'a str) -> impl Iterator<Item = &'a AssociationRule> {
        self.rules.iter().filter(move |rule| rule.antecedent.contains(item))
    }

    /// Up to `count` items recommended alongside `item`, best first.
    ///
    /// Returns an empty list when no rule has `item` in its antecedent.
    #[must_use]
    pub fn recommend(&self, item: &str, count: usize) -> Vec<ItemKey> {
        self.recommend_scored(item, count)
            .into_iter()
            .map(|rec| rec.item)
            .collect()
    }

    /// Like [`Recommender::recommend`], keeping the lift and confidence
    /// of the rule each item came from.
    #[must_use]
    pub fn recommend_scored(&self, item: &str, count: usize) -> Vec<Recommendation> {
        let mut seen: HashSet<&ItemKey> = HashSet::new();
        let mut out = Vec::new();

        if count == 0 {
            return out;
        }

        for rule in self.matching_rules(item) {
            for candidate in &rule.consequent {
                if !seen.insert(candidate) {
                    continue;
                }
                out.push(Recommendation {
                    item: candidate.clone(),
                    lift: rule.lift,
                    confidence: rule.confidence,
                });
                if out.len() == count {
                    return out;
                }
            }
        }

        out
    }
}

impl From<Vec<AssociationRule>> for Recommender {
    fn from(rules: Vec<AssociationRule>) -> Self {
        Self::new(rules)
    }
}

/// Up to `count` items recommended alongside `item`.
///
/// Convenience wrapper that ranks `rules` and runs a single query; build a
/// [`Recommender`] once when answering several.
#[must_use]
pub fn recommend(rules: &[AssociationRule], item: &str, count: usize) -> Vec<ItemKey> {
    Recommender::new(rules.to_vec()).recommend(item, count)
}
