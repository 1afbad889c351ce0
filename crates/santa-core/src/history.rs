use crate::{Assignment, ExclusionRule};
use std::collections::HashSet;

/// Combine manual rules with one-way rules barring every pairing from `past`.
///
/// Manual rules come first. Exact repeats of `(givers, receivers,
/// bidirectional)` are dropped, keeping the first occurrence; rules differing
/// only in direction flag are both kept.
pub fn merge_history(manual: &[ExclusionRule], past: &[Assignment]) -> Vec<ExclusionRule> {
    let historical = past
        .iter()
        .flat_map(Assignment::iter)
        .map(|p| ExclusionRule::new(p.giver.clone(), p.receiver.clone()));

    let mut seen = HashSet::new();
    let merged: Vec<ExclusionRule> = manual
        .iter()
        .cloned()
        .chain(historical)
        .filter(|rule| seen.insert(rule.clone()))
        .collect();

    tracing::debug!(
        manual = manual.len(),
        rounds = past.len(),
        merged = merged.len(),
        "merged exclusion history"
    );
    merged
}
