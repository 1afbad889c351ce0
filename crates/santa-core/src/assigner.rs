use crate::{
    merge_history, normalize, search, Assignment, AssignmentError, ExclusionRule, Person,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for randomized draws
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignerConfig {
    /// Fixed PRNG seed for reproducible draws. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Randomized assignment driver
pub struct Assigner {
    config: AssignerConfig,
    rng: SimpleRng,
}

impl Default for Assigner {
    fn default() -> Self {
        Self::new()
    }
}

impl Assigner {
    /// Create an assigner with default configuration and an OS-seeded RNG
    pub fn new() -> Self {
        Self::with_config(AssignerConfig::default())
    }

    /// Create an assigner with custom configuration
    pub fn with_config(config: AssignerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SimpleRng::with_seed(seed),
            None => SimpleRng::new(),
        };
        Self { config, rng }
    }

    /// Create an assigner with a specific seed for reproducible draws
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(AssignerConfig { seed: Some(seed) })
    }

    pub fn config(&self) -> &AssignerConfig {
        &self.config
    }

    /// Draw a random valid assignment.
    ///
    /// Shuffles the exploration order and runs the cycle search once. The
    /// search is complete, so a failure holds for every order and is
    /// reported straight away.
    pub fn assign(
        &mut self,
        participants: &[Person],
        exclusions: &[ExclusionRule],
    ) -> Result<Assignment, AssignmentError> {
        validate_participants(participants)?;
        let forbidden = normalize(participants, exclusions)?;

        let mut order = participants.to_vec();
        self.shuffle(&mut order);
        match search(&order, &forbidden) {
            Some(assignment) => {
                tracing::info!(participants = participants.len(), "assignment found");
                Ok(assignment)
            }
            None => {
                tracing::debug!(participants = participants.len(), "no cycle exists");
                Err(AssignmentError::NoValidAssignment { attempts: 1 })
            }
        }
    }

    /// Draw a random assignment that also avoids every pairing from `past`
    pub fn assign_with_history(
        &mut self,
        participants: &[Person],
        exclusions: &[ExclusionRule],
        past: &[Assignment],
    ) -> Result<Assignment, AssignmentError> {
        let merged = merge_history(exclusions, past);
        self.assign(participants, &merged)
    }

    /// Shuffle a slice using Fisher-Yates
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.rng.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Search once, exploring `participants` in the order given
pub fn assign_in_order(
    participants: &[Person],
    exclusions: &[ExclusionRule],
) -> Result<Assignment, AssignmentError> {
    validate_participants(participants)?;
    let forbidden = normalize(participants, exclusions)?;
    search(participants, &forbidden).ok_or(AssignmentError::NoValidAssignment { attempts: 1 })
}

/// Roster checks that run before any search
fn validate_participants(participants: &[Person]) -> Result<(), AssignmentError> {
    if participants.len() < 2 {
        return Err(AssignmentError::InsufficientParticipants {
            count: participants.len(),
        });
    }

    let mut seen = HashSet::with_capacity(participants.len());
    let mut names: Vec<Person> = Vec::new();
    for person in participants {
        if !seen.insert(person) && !names.contains(person) {
            names.push(person.clone());
        }
    }
    if !names.is_empty() {
        return Err(AssignmentError::DuplicatePeople { names });
    }

    Ok(())
}

/// Small PCG-style PRNG, seeded from the OS unless a seed is given
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // No OS entropy: fall back to a process-wide counter
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        xorshifted.rotate_right(rot) as u64
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }
}
