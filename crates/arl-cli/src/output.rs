//! Output formatting utilities

use basket_arl::mining::{join_items, AssociationRule};
use colored::Colorize;

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

/// Print a warning message
pub(crate) fn warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// Print an error message
pub(crate) fn error(msg: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), msg);
}

/// One rule per line: `{a} => {c}` followed by its metrics
pub(crate) fn rule_line(rule: &AssociationRule) -> String {
    format!(
        "{{{}}} => {{{}}}  support={:.4} confidence={:.4} lift={:.4}",
        join_items(&rule.antecedent),
        join_items(&rule.consequent),
        rule.support,
        rule.confidence,
        rule.lift
    )
}

/// Print a list of rules under a header, at most `limit` of them
pub(crate) fn rules(title: &str, rules: &[AssociationRule], limit: usize) {
    section(title);
    if rules.is_empty() {
        warning("no rules passed the thresholds");
        return;
    }
    for rule in rules.iter().take(limit) {
        println!("  {}", rule_line(rule));
    }
    if rules.len() > limit {
        println!("  ... {} more", rules.len() - limit);
    }
}
