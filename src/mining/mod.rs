//! Frequent itemset mining and association rule generation.
//!
//! Baskets from an [`IncidenceTable`] are mined level by level (Apriori):
//! frequent k-itemsets are joined into (k+1)-candidates, candidates with an
//! infrequent subset are pruned, and the rest are counted against per-item
//! basket lists. Rules are then derived from every frequent itemset of two
//! or more items.
//!
//! # Example
//!
//! ```
//! use basket_arl::basket::IncidenceTable;
//! use basket_arl::mining::{association_rules, Apriori, RuleMetric};
//!
//! let table = IncidenceTable::from_baskets(vec![
//!     ("u1_2017-08", vec!["1_1", "2_2", "3_3"]),
//!     ("u2_2017-08", vec!["1_1", "2_2"]),
//!     ("u3_2017-08", vec!["1_1", "3_3"]),
//!     ("u4_2017-08", vec!["2_2", "3_3"]),
//! ]);
//!
//! let itemsets = Apriori::new().with_min_support(0.5).fit(&table).unwrap();
//! let rules = association_rules(&itemsets, RuleMetric::Confidence, 0.6).unwrap();
//! for rule in &rules {
//!     println!("{rule}");
//! }
//! assert!(!rules.is_empty());
//! ```

use crate::basket::{IncidenceTable, ItemKey};
use crate::error::{BasketError, Result};
use crate::traits::RuleMiner;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A set of items, kept sorted so itemsets compare and print stably.
pub type Itemset = BTreeSet<ItemKey>;

/// Default minimum support.
pub const DEFAULT_MIN_SUPPORT: f64 = 0.01;

/// Default rule threshold (applied to [`RuleMetric::Support`]).
pub const DEFAULT_MIN_THRESHOLD: f64 = 0.01;

/// Association rule: antecedent => consequent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationRule {
    /// Items in the antecedent (left side)
    pub antecedent: Itemset,
    /// Items in the consequent (right side)
    pub consequent: Itemset,
    /// P(antecedent)
    pub antecedent_support: f64,
    /// P(consequent)
    pub consequent_support: f64,
    /// Support: P(antecedent ∪ consequent)
    pub support: f64,
    /// Confidence: P(consequent | antecedent) = support / P(antecedent)
    pub confidence: f64,
    /// Lift: confidence / P(consequent)
    pub lift: f64,
    /// Leverage: support - P(antecedent) * P(consequent)
    pub leverage: f64,
    /// Conviction: (1 - P(consequent)) / (1 - confidence), infinite at confidence 1.
    /// Serialized as the string `"inf"` when infinite.
    #[serde(serialize_with = "serialize_unbounded")]
    pub conviction: f64,
}

fn serialize_unbounded<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if value.is_infinite() {
        serializer.serialize_str(if *value > 0.0 { "inf" } else { "-inf" })
    } else {
        serializer.serialize_f64(*value)
    }
}

impl AssociationRule {
    /// Derives every metric from the three supports.
    #[must_use]
    pub fn from_supports(
        antecedent: Itemset,
        consequent: Itemset,
        antecedent_support: f64,
        consequent_support: f64,
        support: f64,
    ) -> Self {
        let confidence = support / antecedent_support;
        let lift = confidence / consequent_support;
        let leverage = support - antecedent_support * consequent_support;
        let conviction = if confidence >= 1.0 {
            f64::INFINITY
        } else {
            (1.0 - consequent_support) / (1.0 - confidence)
        };

        Self {
            antecedent,
            consequent,
            antecedent_support,
            consequent_support,
            support,
            confidence,
            lift,
            leverage,
            conviction,
        }
    }
}

impl fmt::Display for AssociationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}} => {{{}}} (support={:.4}, confidence={:.4}, lift={:.4})",
            join_items(&self.antecedent),
            join_items(&self.consequent),
            self.support,
            self.confidence,
            self.lift
        )
    }
}

/// Comma-separated rendering of an itemset.
#[must_use]
pub fn join_items(items: &Itemset) -> String {
    items
        .iter()
        .map(ItemKey::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Metric a rule must reach to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleMetric {
    /// Support of the whole rule
    #[default]
    Support,
    /// Confidence
    Confidence,
    /// Lift
    Lift,
    /// Leverage
    Leverage,
    /// Conviction
    Conviction,
}

impl RuleMetric {
    /// Value of this metric for `rule`.
    #[must_use]
    pub fn score(self, rule: &AssociationRule) -> f64 {
        match self {
            Self::Support => rule.support,
            Self::Confidence => rule.confidence,
            Self::Lift => rule.lift,
            Self::Leverage => rule.leverage,
            Self::Conviction => rule.conviction,
        }
    }

    /// Lowercase metric name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Confidence => "confidence",
            Self::Lift => "lift",
            Self::Leverage => "leverage",
            Self::Conviction => "conviction",
        }
    }
}

impl fmt::Display for RuleMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleMetric {
    type Err = BasketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "support" => Ok(Self::Support),
            "confidence" => Ok(Self::Confidence),
            "lift" => Ok(Self::Lift),
            "leverage" => Ok(Self::Leverage),
            "conviction" => Ok(Self::Conviction),
            _ => Err(BasketError::UnknownMetric(s.to_string())),
        }
    }
}

/// Frequent itemsets with their supports.
///
/// Itemsets are ordered by size, then lexicographically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequentItemsets {
    itemsets: Vec<(Itemset, f64)>,
    lookup: BTreeMap<Itemset, f64>,
    n_baskets: usize,
}

impl FrequentItemsets {
    fn new(itemsets: Vec<(Itemset, f64)>, n_baskets: usize) -> Self {
        let lookup = itemsets.iter().cloned().collect();
        Self {
            itemsets,
            lookup,
            n_baskets,
        }
    }

    /// Iterates over (itemset, support) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Itemset, f64)> {
        self.itemsets.iter().map(|(set, support)| (set, *support))
    }

    /// Support of `itemset`, if it is frequent.
    #[must_use]
    pub fn support(&self, itemset: &Itemset) -> Option<f64> {
        self.lookup.get(itemset).copied()
    }

    /// Number of frequent itemsets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    /// Whether no itemset reached the support threshold.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    /// Number of baskets the supports were computed over.
    #[must_use]
    pub fn n_baskets(&self) -> usize {
        self.n_baskets
    }
}

/// Apriori algorithm for frequent itemset mining and association rule generation.
///
/// # Algorithm
///
/// 1. Find frequent 1-itemsets (support >= `min_support`)
/// 2. Join frequent (k-1)-itemsets sharing their first k-2 items into k-candidates
/// 3. Prune candidates with an infrequent (k-1)-subset
/// 4. Count the rest by intersecting basket lists, keep those >= `min_support`
/// 5. Repeat until no candidates remain or `max_len` is reached
///
/// Rule generation ([`Apriori::rules`]) keeps rules whose `metric` is at
/// least `min_threshold`.
///
/// # Example
///
/// ```
/// use basket_arl::basket::IncidenceTable;
/// use basket_arl::mining::{Apriori, RuleMetric};
/// use basket_arl::traits::RuleMiner;
///
/// let table = IncidenceTable::from_baskets(vec![
///     ("a", vec!["1_1", "2_2"]),
///     ("b", vec!["1_1", "2_2"]),
///     ("c", vec!["3_3"]),
/// ]);
/// let miner = Apriori::new()
///     .with_min_support(0.5)
///     .with_metric(RuleMetric::Confidence, 0.9);
/// let rules = miner.mine(&table).unwrap();
/// assert_eq!(rules.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Apriori {
    min_support: f64,
    max_len: Option<usize>,
    metric: RuleMetric,
    min_threshold: f64,
}

impl Apriori {
    /// Create a new Apriori instance with default parameters.
    ///
    /// # Default Parameters
    ///
    /// - `min_support`: 0.01
    /// - `max_len`: unbounded
    /// - rule filter: support >= 0.01
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            max_len: None,
            metric: RuleMetric::Support,
            min_threshold: DEFAULT_MIN_THRESHOLD,
        }
    }

    /// Set the minimum support threshold (0.0, 1.0].
    #[must_use]
    pub fn with_min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    /// Limit itemsets to at most `max_len` items.
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Set the metric and threshold rules are filtered by.
    #[must_use]
    pub fn with_metric(mut self, metric: RuleMetric, min_threshold: f64) -> Self {
        self.metric = metric;
        self.min_threshold = min_threshold;
        self
    }

    /// Minimum support threshold.
    #[must_use]
    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    /// Rule metric.
    #[must_use]
    pub fn metric(&self) -> RuleMetric {
        self.metric
    }

    /// Rule threshold.
    #[must_use]
    pub fn min_threshold(&self) -> f64 {
        self.min_threshold
    }

    fn validate(&self) -> Result<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(BasketError::invalid_hyperparameter(
                "min_support",
                self.min_support,
                "a value in (0, 1]",
            ));
        }
        if self.max_len == Some(0) {
            return Err(BasketError::invalid_hyperparameter("max_len", 0, ">= 1"));
        }
        Ok(())
    }

    /// Mines the frequent itemsets of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::InvalidHyperparameter`] if `min_support` is
    /// outside (0, 1] or `max_len` is zero.
    pub fn fit(&self, table: &IncidenceTable) -> Result<FrequentItemsets> {
        self.validate()?;

        let n_baskets = table.n_baskets();
        if n_baskets == 0 {
            return Ok(FrequentItemsets::default());
        }

        let mut frequent = Vec::new();
        let mut current = self.find_frequent_1_itemsets(table);
        let mut k = 1;

        while !current.is_empty() {
            debug!(k, count = current.len(), "frequent itemsets at level");
            frequent.extend(
                current
                    .iter()
                    .map(|(set, tids)| (set.clone(), support_of(tids.len(), n_baskets))),
            );

            if self.max_len.is_some_and(|max| k >= max) {
                break;
            }
            current = self.next_level(&current, n_baskets);
            k += 1;
        }

        Ok(FrequentItemsets::new(frequent, n_baskets))
    }

    /// Derives the rules of `itemsets` using this miner's metric filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is not finite.
    pub fn rules(&self, itemsets: &FrequentItemsets) -> Result<Vec<AssociationRule>> {
        association_rules(itemsets, self.metric, self.min_threshold)
    }

    /// Frequent 1-itemsets with the (sorted) indices of the baskets holding them.
    fn find_frequent_1_itemsets(&self, table: &IncidenceTable) -> Vec<(Itemset, Vec<usize>)> {
        let mut tids: BTreeMap<&ItemKey, Vec<usize>> = BTreeMap::new();
        for (idx, (_, items)) in table.baskets().enumerate() {
            for item in items {
                tids.entry(item).or_default().push(idx);
            }
        }

        let n_baskets = table.n_baskets();
        tids.into_iter()
            .filter(|(_, baskets)| support_of(baskets.len(), n_baskets) >= self.min_support)
            .map(|(item, baskets)| (Itemset::from([item.clone()]), baskets))
            .collect()
    }

    /// Joins, prunes and counts the next level.
    fn next_level(
        &self,
        prev: &[(Itemset, Vec<usize>)],
        n_baskets: usize,
    ) -> Vec<(Itemset, Vec<usize>)> {
        let prev_sets: BTreeSet<&Itemset> = prev.iter().map(|(set, _)| set).collect();
        let mut next = Vec::new();

        for i in 0..prev.len() {
            for j in (i + 1)..prev.len() {
                let (set1, tids1) = &prev[i];
                let (set2, tids2) = &prev[j];

                // Join step: (k-1)-itemsets that share everything but their last item
                if !shares_prefix(set1, set2) {
                    continue;
                }
                let candidate: Itemset = set1.union(set2).cloned().collect();

                // Prune step: every (k-1)-subset must be frequent
                if has_infrequent_subset(&candidate, &prev_sets) {
                    continue;
                }

                let tids = intersect_sorted(tids1, tids2);
                if support_of(tids.len(), n_baskets) >= self.min_support {
                    next.push((candidate, tids));
                }
            }
        }

        next.sort_by(|a, b| a.0.cmp(&b.0));
        next
    }
}

impl Default for Apriori {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleMiner for Apriori {
    fn mine(&self, table: &IncidenceTable) -> Result<Vec<AssociationRule>> {
        let itemsets = self.fit(table)?;
        self.rules(&itemsets)
    }
}

/// Mines frequent itemsets with the default settings and `min_support`.
///
/// # Errors
///
/// Returns an error if `min_support` is outside (0, 1].
pub fn apriori(table: &IncidenceTable, min_support: f64) -> Result<FrequentItemsets> {
    Apriori::new().with_min_support(min_support).fit(table)
}

/// Generates association rules from frequent itemsets.
///
/// Every non-empty proper subset of each frequent itemset with two or more
/// items becomes an antecedent; the remaining items form the consequent.
/// Rules with `metric < min_threshold` are dropped. Output order follows the
/// itemset order, then antecedent size, then antecedent order.
///
/// # Errors
///
/// Returns [`BasketError::InvalidHyperparameter`] if `min_threshold` is not finite.
pub fn association_rules(
    itemsets: &FrequentItemsets,
    metric: RuleMetric,
    min_threshold: f64,
) -> Result<Vec<AssociationRule>> {
    if !min_threshold.is_finite() {
        return Err(BasketError::invalid_hyperparameter(
            "min_threshold",
            min_threshold,
            "a finite number",
        ));
    }

    let mut rules = Vec::new();

    for (itemset, support) in itemsets.iter() {
        if itemset.len() < 2 {
            continue;
        }

        let items: Vec<&ItemKey> = itemset.iter().collect();
        for size in 1..items.len() {
            for antecedent in combinations(&items, size) {
                let consequent: Itemset = itemset.difference(&antecedent).cloned().collect();

                // Subsets of a frequent itemset are frequent, so both lookups hit.
                let (Some(antecedent_support), Some(consequent_support)) =
                    (itemsets.support(&antecedent), itemsets.support(&consequent))
                else {
                    continue;
                };

                let rule = AssociationRule::from_supports(
                    antecedent,
                    consequent,
                    antecedent_support,
                    consequent_support,
                    support,
                );
                if metric.score(&rule) >= min_threshold {
                    rules.push(rule);
                }
            }
        }
    }

    debug!(rules = rules.len(), %metric, min_threshold, "association rules generated");
    Ok(rules)
}

#[allow(clippy::cast_precision_loss)]
fn support_of(count: usize, n_baskets: usize) -> f64 {
    count as f64 / n_baskets as f64
}

fn shares_prefix(a: &Itemset, b: &Itemset) -> bool {
    let k = a.len();
    a.iter().take(k - 1).eq(b.iter().take(k - 1))
}

/// Check if an itemset has any infrequent (k-1)-subset.
fn has_infrequent_subset(itemset: &Itemset, prev: &BTreeSet<&Itemset>) -> bool {
    itemset.iter().any(|item| {
        let mut subset = itemset.clone();
        subset.remove(item);
        !prev.contains(&subset)
    })
}

fn intersect_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// All `size`-element subsets of `items`, in lexicographic order.
fn combinations(items: &[&ItemKey], size: usize) -> Vec<Itemset> {
    fn walk(items: &[&ItemKey], size: usize, start: usize, acc: &mut Vec<ItemKey>, out: &mut Vec<Itemset>) {
        if acc.len() == size {
            out.push(acc.iter().cloned().collect());
            return;
        }
        for idx in start..items.len() {
            acc.push(items[idx].clone());
            walk(items, size, idx + 1, acc, out);
            acc.pop();
        }
    }

    let mut out = Vec::new();
    walk(items, size, 0, &mut Vec::with_capacity(size), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> Itemset {
        items.iter().map(|s| ItemKey::from(*s)).collect()
    }

    fn table(baskets: Vec<Vec<&str>>) -> IncidenceTable {
        IncidenceTable::from_baskets(
            baskets
                .into_iter()
                .enumerate()
                .map(|(i, items)| (format!("b{i}"), items)),
        )
    }

    fn abc_table() -> IncidenceTable {
        table(vec![vec!["1", "2", "3"], vec!["1", "2"], vec!["1", "3"], vec!["2", "3"]])
    }

    #[test]
    fn test_apriori_new() {
        let apriori = Apriori::new();
        assert_eq!(apriori.min_support(), 0.01);
        assert_eq!(apriori.metric(), RuleMetric::Support);
        assert_eq!(apriori.min_threshold(), 0.01);
        assert_eq!(apriori.max_len, None);
    }

    #[test]
    fn test_apriori_builders() {
        let apriori = Apriori::new()
            .with_min_support(0.3)
            .with_max_len(2)
            .with_metric(RuleMetric::Lift, 1.2);
        assert_eq!(apriori.min_support(), 0.3);
        assert_eq!(apriori.max_len, Some(2));
        assert_eq!(apriori.metric(), RuleMetric::Lift);
        assert_eq!(apriori.min_threshold(), 1.2);
    }

    #[test]
    fn test_frequent_itemsets() {
        let itemsets = apriori(&abc_table(), 0.5).expect("valid support");

        // {1},{2},{3} at 75%; pairs at 50%; {1,2,3} at 25% is not frequent
        assert_eq!(itemsets.len(), 6);
        assert_eq!(itemsets.support(&set(&["1"])), Some(0.75));
        assert_eq!(itemsets.support(&set(&["1", "2"])), Some(0.5));
        assert_eq!(itemsets.support(&set(&["1", "2", "3"])), None);
        assert_eq!(itemsets.n_baskets(), 4);

        // Ordered by size, then lexicographically
        let sizes: Vec<usize> = itemsets.iter().map(|(s, _)| s.len()).collect();
        assert_eq!(sizes, vec![1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn test_three_itemset_found() {
        let itemsets = apriori(&abc_table(), 0.25).expect("valid support");
        assert_eq!(itemsets.support(&set(&["1", "2", "3"])), Some(0.25));
    }

    #[test]
    fn test_max_len_stops_search() {
        let itemsets = Apriori::new()
            .with_min_support(0.25)
            .with_max_len(2)
            .fit(&abc_table())
            .expect("valid");
        assert!(itemsets.iter().all(|(s, _)| s.len() <= 2));
        assert_eq!(itemsets.len(), 6);
    }

    #[test]
    fn test_min_support_filter() {
        let t = table(vec![vec!["1", "2"], vec!["1", "2"], vec!["1", "2"], vec!["3", "4"]]);
        let itemsets = apriori(&t, 0.5).expect("valid");
        for (itemset, support) in itemsets.iter() {
            assert!(support >= 0.5, "All itemsets should meet min_support");
            assert!(!itemset.contains(&ItemKey::from("3")));
            assert!(!itemset.contains(&ItemKey::from("4")));
        }
        assert_eq!(itemsets.len(), 3);
    }

    #[test]
    fn test_invalid_min_support() {
        assert!(apriori(&abc_table(), 0.0).is_err());
        assert!(apriori(&abc_table(), 1.5).is_err());
        assert!(apriori(&abc_table(), f64::NAN).is_err());
        assert!(Apriori::new().with_max_len(0).fit(&abc_table()).is_err());
    }

    #[test]
    fn test_empty_table() {
        let itemsets = apriori(&IncidenceTable::default(), 0.1).expect("valid");
        assert!(itemsets.is_empty());
        let rules = association_rules(&itemsets, RuleMetric::Support, 0.0).expect("valid");
        assert!(rules.is_empty());
    }

    #[test]
    fn test_singleton_baskets_count_in_denominator() {
        let t = table(vec![vec!["1", "2"], vec!["1"], vec!["3"], vec!["4"]]);
        let itemsets = apriori(&t, 0.25).expect("valid");
        assert_eq!(itemsets.support(&set(&["1", "2"])), Some(0.25));
        assert_eq!(itemsets.support(&set(&["1"])), Some(0.5));
    }

    #[test]
    fn test_confidence_and_lift() {
        let itemsets = apriori(&abc_table(), 0.5).expect("valid");
        let rules = association_rules(&itemsets, RuleMetric::Confidence, 0.0).expect("valid");

        let rule = rules
            .iter()
            .find(|r| r.antecedent == set(&["1"]) && r.consequent == set(&["2"]))
            .expect("Should have rule {1} => {2}");

        // Confidence = 0.5 / 0.75, lift = confidence / 0.75
        assert!((rule.confidence - 0.666_666_6).abs() < 1e-5);
        assert!((rule.lift - 0.888_888_8).abs() < 1e-5);
        assert!((rule.leverage - (0.5 - 0.75 * 0.75)).abs() < 1e-12);
        assert!((rule.conviction - (0.25 / (1.0 / 3.0))).abs() < 1e-9);
        assert_eq!(rule.antecedent_support, 0.75);
        assert_eq!(rule.consequent_support, 0.75);
    }

    #[test]
    fn test_rules_from_three_itemset() {
        let itemsets = apriori(&abc_table(), 0.25).expect("valid");
        let rules = association_rules(&itemsets, RuleMetric::Support, 0.25).expect("valid");
        // 3 pairs * 2 directions + 6 splits of {1,2,3}
        assert_eq!(rules.len(), 12);
        assert!(rules.iter().all(|r| r.antecedent.is_disjoint(&r.consequent)));
    }

    #[test]
    fn test_metric_threshold_filters() {
        let itemsets = apriori(&abc_table(), 0.25).expect("valid");
        let rules = association_rules(&itemsets, RuleMetric::Confidence, 0.6).expect("valid");
        assert!(!rules.is_empty());
        for rule in &rules {
            assert!(rule.confidence >= 0.6, "{rule}");
        }
    }

    #[test]
    fn test_conviction_infinite_at_full_confidence() {
        let t = table(vec![vec!["1", "2"], vec!["1", "2"], vec!["2"]]);
        let itemsets = apriori(&t, 0.3).expect("valid");
        let rules = association_rules(&itemsets, RuleMetric::Conviction, 0.0).expect("valid");
        let rule = rules
            .iter()
            .find(|r| r.antecedent == set(&["1"]))
            .expect("rule {1} => {2}");
        assert_eq!(rule.confidence, 1.0);
        assert!(rule.conviction.is_infinite());

        let json = serde_json::to_value(rule).expect("serialize");
        assert_eq!(json["conviction"], "inf");
        assert_eq!(json["confidence"], 1.0);
    }

    #[test]
    fn test_finite_conviction_serializes_as_number() {
        let rule = AssociationRule::from_supports(set(&["1"]), set(&["2"]), 0.5, 0.5, 0.25);
        let json = serde_json::to_value(&rule).expect("serialize");
        assert!(json["conviction"].is_number());
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let itemsets = apriori(&abc_table(), 0.5).expect("valid");
        assert!(association_rules(&itemsets, RuleMetric::Lift, f64::NAN).is_err());
    }

    #[test]
    fn test_mining_is_deterministic() {
        let miner = Apriori::new().with_min_support(0.25).with_metric(RuleMetric::Lift, 0.0);
        let first = miner.mine(&abc_table()).expect("valid");
        let second = miner.mine(&abc_table()).expect("valid");
        assert_eq!(first, second);
    }

    #[test]
    fn test_rule_metric_from_str() {
        assert_eq!("lift".parse::<RuleMetric>().ok(), Some(RuleMetric::Lift));
        assert_eq!(" Confidence ".parse::<RuleMetric>().ok(), Some(RuleMetric::Confidence));
        assert!(matches!(
            "zhangs_metric".parse::<RuleMetric>(),
            Err(BasketError::UnknownMetric(_))
        ));
    }

    #[test]
    fn test_rule_metric_serde() {
        let json = serde_json::to_string(&RuleMetric::Leverage).expect("serialize");
        assert_eq!(json, "\"leverage\"");
        let metric: RuleMetric = serde_json::from_str("\"conviction\"").expect("deserialize");
        assert_eq!(metric, RuleMetric::Conviction);
    }

    #[test]
    fn test_rule_display() {
        let rule = AssociationRule::from_supports(set(&["2_0"]), set(&["11_11"]), 0.2, 0.2, 0.2);
        let text = rule.to_string();
        assert!(text.starts_with("{2_0} => {11_11}"));
        assert!(text.contains("lift=5.0000"));
    }

    #[test]
    fn test_combinations() {
        let keys: Vec<ItemKey> = ["a", "b", "c"].into_iter().map(ItemKey::from).collect();
        let refs: Vec<&ItemKey> = keys.iter().collect();
        assert_eq!(combinations(&refs, 1).len(), 3);
        assert_eq!(combinations(&refs, 2), vec![set(&["a", "b"]), set(&["a", "c"]), set(&["b", "c"])]);
    }

    #[test]
    fn test_intersect_sorted() {
        assert_eq!(intersect_sorted(&[0, 2, 4, 6], &[1, 2, 3, 6]), vec![2, 6]);
        assert!(intersect_sorted(&[], &[1]).is_empty());
    }
}
