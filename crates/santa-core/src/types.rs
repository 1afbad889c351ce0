use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A participant, identified by an opaque unique name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Person(String);

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Person {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Person {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Person {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One giver → receiver link of an assignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    pub giver: Person,
    pub receiver: Person,
}

impl Pairing {
    pub fn new(giver: impl Into<Person>, receiver: impl Into<Person>) -> Self {
        Self {
            giver: giver.into(),
            receiver: receiver.into(),
        }
    }
}

/// A complete giver → receiver mapping.
///
/// Assignments produced by the engine list their pairings in cycle order:
/// each pairing's receiver is the giver of the next one, and the last
/// receiver is the first giver. Assignments collected from arbitrary pairs
/// (for example a past round loaded by the host) keep the order they were
/// given in and are not validated; use [`Assignment::is_single_cycle`] to
/// check them.
///
/// Equality compares the mappings, not the listing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    pairings: Vec<Pairing>,
}

impl Assignment {
    pub(crate) fn from_pairings(pairings: Vec<Pairing>) -> Self {
        Self { pairings }
    }

    /// Number of givers
    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pairing> {
        self.pairings.iter()
    }

    /// Who `giver` gives to
    pub fn receiver_of(&self, giver: &Person) -> Option<&Person> {
        self.pairings
            .iter()
            .find(|p| &p.giver == giver)
            .map(|p| &p.receiver)
    }

    /// Who gives to `receiver`
    pub fn giver_of(&self, receiver: &Person) -> Option<&Person> {
        self.pairings
            .iter()
            .find(|p| &p.receiver == receiver)
            .map(|p| &p.giver)
    }

    /// Whether the assignment maps `giver` to `receiver`
    pub fn contains(&self, giver: &Person, receiver: &Person) -> bool {
        self.receiver_of(giver) == Some(receiver)
    }

    /// The mapping as a sorted map, handy for comparisons and lookups
    pub fn as_map(&self) -> BTreeMap<&Person, &Person> {
        self.pairings
            .iter()
            .map(|p| (&p.giver, &p.receiver))
            .collect()
    }

    /// Participants in traversal order, starting from the first listed giver.
    ///
    /// Returns `None` unless following the links visits every giver exactly
    /// once and ends back at the start.
    pub fn cycle(&self) -> Option<Vec<&Person>> {
        let first = self.pairings.first()?;
        let links: HashMap<&Person, &Person> = self
            .pairings
            .iter()
            .map(|p| (&p.giver, &p.receiver))
            .collect();
        if links.len() != self.pairings.len() {
            return None;
        }

        let mut visited = HashSet::with_capacity(links.len());
        let mut order = Vec::with_capacity(links.len());
        let mut current = &first.giver;
        while visited.insert(current) {
            order.push(current);
            current = *links.get(current)?;
        }

        (current == &first.giver && order.len() == links.len()).then_some(order)
    }

    /// True when the mapping is a derangement forming exactly one cycle
    /// through all givers.
    pub fn is_single_cycle(&self) -> bool {
        self.len() >= 2
            && self.pairings.iter().all(|p| p.giver != p.receiver)
            && self.cycle().is_some()
    }
}

impl PartialEq for Assignment {
    fn eq(&self, other: &Self) -> bool {
        self.as_map() == other.as_map()
    }
}

impl Eq for Assignment {}

impl FromIterator<(Person, Person)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Person, Person)>>(iter: I) -> Self {
        Self::from_pairings(
            iter.into_iter()
                .map(|(giver, receiver)| Pairing { giver, receiver })
                .collect(),
        )
    }
}

impl FromIterator<Pairing> for Assignment {
    fn from_iter<I: IntoIterator<Item = Pairing>>(iter: I) -> Self {
        Self::from_pairings(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = &'a Pairing;
    type IntoIter = std::slice::Iter<'a, Pairing>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairings.iter()
    }
}
