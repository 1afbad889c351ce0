use crate::Person;

/// Everything that can stop a draw. None of these are retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentError {
    #[error("need at least 2 participants, got {count}")]
    InsufficientParticipants { count: usize },

    /// Every repeated name, each listed once
    #[error("duplicate people found: {}", join_names(.names))]
    DuplicatePeople { names: Vec<Person> },

    #[error("unknown person in exclusion: {0}")]
    UnknownPerson(Person),

    #[error("no valid assignment exists with the given exclusions ({attempts} attempts)")]
    NoValidAssignment { attempts: usize },
}

fn join_names(names: &[Person]) -> String {
    names
        .iter()
        .map(Person::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
