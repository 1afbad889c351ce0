//! Constrained gift-exchange assignment.
//!
//! Given a roster and exclusion rules, finds a single cycle through everyone:
//! each person gives to exactly one other person and receives from exactly
//! one, nobody gives to themselves, and the group never splits into smaller
//! closed circles.
//!
//! ```
//! use santa_core::{compute_random_assignment, ExclusionRule, Person};
//!
//! let people: Vec<Person> = ["Alice", "Bob", "Charlie", "Diana"]
//!     .into_iter()
//!     .map(Person::from)
//!     .collect();
//! let rules = [ExclusionRule::family(["Alice", "Bob"])];
//!
//! let assignment = compute_random_assignment(&people, &rules).unwrap();
//! assert!(assignment.is_single_cycle());
//! assert!(!assignment.contains(&"Alice".into(), &"Bob".into()));
//! ```

mod assigner;
mod error;
mod exclusion;
mod history;
mod search;
mod types;

pub use assigner::{assign_in_order, Assigner, AssignerConfig};
pub use error::AssignmentError;
pub use exclusion::{normalize, ExclusionRule, ForbiddenPairs, Selector, WILDCARD};
pub use history::merge_history;
pub use search::{search, search_with_stats, SearchStats};
pub use types::{Assignment, Pairing, Person};

/// Single search over `participants` in the order given.
///
/// Always returns the same assignment for the same input.
pub fn compute_assignment(
    participants: &[Person],
    exclusions: &[ExclusionRule],
) -> Result<Assignment, AssignmentError> {
    assign_in_order(participants, exclusions)
}

/// Random valid assignment, using a freshly seeded [`Assigner`]
pub fn compute_random_assignment(
    participants: &[Person],
    exclusions: &[ExclusionRule],
) -> Result<Assignment, AssignmentError> {
    Assigner::new().assign(participants, exclusions)
}

/// Random valid assignment that repeats no pairing from `past` rounds
pub fn compute_assignment_with_history(
    participants: &[Person],
    exclusions: &[ExclusionRule],
    past: &[Assignment],
) -> Result<Assignment, AssignmentError> {
    Assigner::new().assign_with_history(participants, exclusions, past)
}
