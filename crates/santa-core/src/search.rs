//! Backtracking search for a single gift cycle.
//!
//! Givers are taken in exploration order; each one picks a receiver from the
//! pool of people nobody gives to yet. Accepted links are tracked as chains
//! (head → ... → tail). A link whose receiver heads the giver's own chain would
//! close a loop, so it is refused everywhere except the last position, where
//! it closes the one chain that spans everybody. The result can therefore
//! never split into sub-cycles, and no post-hoc filtering is needed.

use crate::{Assignment, ForbiddenPairs, Pairing, Person};

/// Counters from one search run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions entered
    pub nodes: u64,
    /// Links undone after a dead end
    pub backtracks: u64,
}

/// Find the first valid cycle for `order`, or `None` if there is none.
///
/// Deterministic for a given order. The search is complete: if any single
/// cycle avoids `forbidden`, it is found regardless of how `order` is
/// arranged.
///
/// `order` is expected to hold each participant once. A repeated name is
/// never paired with itself, which leaves such an order without a cycle.
pub fn search(order: &[Person], forbidden: &ForbiddenPairs) -> Option<Assignment> {
    search_with_stats(order, forbidden).0
}

/// Like [`search`], also reporting how much work was done
pub fn search_with_stats(
    order: &[Person],
    forbidden: &ForbiddenPairs,
) -> (Option<Assignment>, SearchStats) {
    if order.len() < 2 {
        return (None, SearchStats::default());
    }

    let mut state = CycleSearch::new(order, forbidden);
    let found = state.extend(0);
    let stats = state.stats;
    tracing::trace!(
        participants = order.len(),
        nodes = stats.nodes,
        backtracks = stats.backtracks,
        found,
        "cycle search finished"
    );

    (found.then(|| state.into_assignment()), stats)
}

/// Working state, indexed by position in the exploration order
struct CycleSearch<'a> {
    order: &'a [Person],
    /// allowed[g][r]: g may give to r (different person, not forbidden)
    allowed: Vec<Vec<bool>>,
    receiver_of: Vec<Option<usize>>,
    /// Nobody gives to this person yet
    available: Vec<bool>,
    /// Valid at chain tails: where the chain starts
    chain_head: Vec<usize>,
    /// Valid at chain heads: where the chain ends
    chain_tail: Vec<usize>,
    stats: SearchStats,
}

impl<'a> CycleSearch<'a> {
    fn new(order: &'a [Person], forbidden: &ForbiddenPairs) -> Self {
        let n = order.len();
        let allowed = order
            .iter()
            .enumerate()
            .map(|(g, giver)| {
                order
                    .iter()
                    .enumerate()
                    .map(|(r, receiver)| {
                        g != r && giver != receiver && !forbidden.contains(giver, receiver)
                    })
                    .collect()
            })
            .collect();

        Self {
            order,
            allowed,
            receiver_of: vec![None; n],
            available: vec![true; n],
            chain_head: (0..n).collect(),
            chain_tail: (0..n).collect(),
            stats: SearchStats::default(),
        }
    }

    fn extend(&mut self, giver: usize) -> bool {
        self.stats.nodes += 1;
        if self.stranded_receiver(giver) {
            return false;
        }
        let last = giver == self.order.len() - 1;

        for receiver in 0..self.order.len() {
            if !self.available[receiver] || !self.allowed[giver][receiver] {
                continue;
            }

            // `giver` has no outgoing link yet so it ends its chain, and
            // `receiver` has no incoming one so it starts its own.
            let head = self.chain_head[giver];
            let tail = self.chain_tail[receiver];
            let closes_loop = tail == giver;

            if last {
                // Only one receiver is left and it heads the chain ending here.
                debug_assert!(closes_loop);
                self.receiver_of[giver] = Some(receiver);
                return true;
            }
            if closes_loop {
                continue;
            }

            self.receiver_of[giver] = Some(receiver);
            self.available[receiver] = false;
            self.chain_tail[head] = tail;
            self.chain_head[tail] = head;

            if self.extend(giver + 1) {
                return true;
            }

            self.chain_head[tail] = receiver;
            self.chain_tail[head] = giver;
            self.available[receiver] = true;
            self.receiver_of[giver] = None;
            self.stats.backtracks += 1;
        }

        false
    }

    /// True if some receiver still in the pool cannot be reached by any
    /// giver from `next_giver` on.
    fn stranded_receiver(&self, next_giver: usize) -> bool {
        (0..self.order.len()).any(|receiver| {
            self.available[receiver]
                && !(next_giver..self.order.len()).any(|g| self.allowed[g][receiver])
        })
    }

    /// Pairings in cycle order, starting from the first explored giver
    fn into_assignment(self) -> Assignment {
        let mut pairings = Vec::with_capacity(self.order.len());
        let mut giver = 0;
        while let Some(receiver) = self.receiver_of[giver] {
            pairings.push(Pairing {
                giver: self.order[giver].clone(),
                receiver: self.order[receiver].clone(),
            });
            giver = receiver;
            if giver == 0 {
                break;
            }
        }
        Assignment::from_pairings(pairings)
    }
}
