//! Exclusion rules and their normalization into forbidden pairs.
//!
//! Rules speak in groups: a side may name one person, several people, or
//! everyone (`"*"`). [`normalize`] flattens them into [`ForbiddenPairs`], the
//! only form the search ever sees.

use crate::{AssignmentError, Person};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Serialized name of [`Selector::All`]
pub const WILDCARD: &str = "*";

/// One side of an exclusion rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSelector", into = "RawSelector")]
pub enum Selector {
    /// Every participant
    All,
    One(Person),
    Many(Vec<Person>),
}

impl Selector {
    pub fn many<I, P>(people: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Person>,
    {
        Self::Many(people.into_iter().map(Into::into).collect())
    }

    /// Resolve to concrete participants, rejecting names not on the roster
    fn expand<'a>(
        &'a self,
        participants: &'a [Person],
        roster: &HashSet<&Person>,
    ) -> Result<Vec<&'a Person>, AssignmentError> {
        let named: Vec<&Person> = match self {
            Selector::All => return Ok(participants.iter().collect()),
            Selector::One(person) => vec![person],
            Selector::Many(people) => people.iter().collect(),
        };
        if let Some(unknown) = named.iter().find(|p| !roster.contains(*p)) {
            return Err(AssignmentError::UnknownPerson((*unknown).clone()));
        }
        Ok(named)
    }
}

/// `"*"` becomes [`Selector::All`]; any other name selects that person.
impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        if name == WILDCARD {
            Self::All
        } else {
            Self::One(name.into())
        }
    }
}

impl From<Person> for Selector {
    fn from(person: Person) -> Self {
        Self::One(person)
    }
}

impl From<Vec<Person>> for Selector {
    fn from(people: Vec<Person>) -> Self {
        Self::Many(people)
    }
}

impl<const N: usize> From<[&str; N]> for Selector {
    fn from(names: [&str; N]) -> Self {
        Self::many(names)
    }
}

/// Wire form: a bare name (or `"*"`) or a list of names
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSelector {
    One(String),
    Many(Vec<String>),
}

impl From<RawSelector> for Selector {
    fn from(raw: RawSelector) -> Self {
        match raw {
            RawSelector::One(name) => Selector::from(name.as_str()),
            RawSelector::Many(names) => Selector::many(names),
        }
    }
}

impl From<Selector> for RawSelector {
    fn from(selector: Selector) -> Self {
        match selector {
            Selector::All => RawSelector::One(WILDCARD.to_string()),
            Selector::One(person) => RawSelector::One(person.as_str().to_string()),
            Selector::Many(people) => {
                RawSelector::Many(people.iter().map(|p| p.as_str().to_string()).collect())
            }
        }
    }
}

/// Forbids every giver in `givers` from giving to every receiver in
/// `receivers`, and the reverse too when `bidirectional` is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub givers: Selector,
    pub receivers: Selector,
    #[serde(default)]
    pub bidirectional: bool,
}

impl ExclusionRule {
    /// One-way rule.
    ///
    /// A bare `"*"` means everyone. To name a participant literally called
    /// `*`, pass `Selector::One(Person::new("*"))`.
    pub fn new(givers: impl Into<Selector>, receivers: impl Into<Selector>) -> Self {
        Self {
            givers: givers.into(),
            receivers: receivers.into(),
            bidirectional: false,
        }
    }

    /// Rule applied in both directions
    pub fn bidirectional(givers: impl Into<Selector>, receivers: impl Into<Selector>) -> Self {
        Self {
            bidirectional: true,
            ..Self::new(givers, receivers)
        }
    }

    /// Nobody in the group gives to anybody else in the group
    pub fn family<I, P>(members: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Person>,
    {
        let members = Selector::many(members);
        Self {
            givers: members.clone(),
            receivers: members,
            bidirectional: true,
        }
    }
}

/// Flat set of ordered `(giver, receiver)` pairs that may not be assigned.
///
/// Pairs are keyed structurally by giver then receiver, so identifiers may
/// contain any characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForbiddenPairs {
    by_giver: BTreeMap<Person, BTreeSet<Person>>,
    len: usize,
}

impl ForbiddenPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the pair was already present
    pub fn insert(&mut self, giver: Person, receiver: Person) -> bool {
        let added = self.by_giver.entry(giver).or_default().insert(receiver);
        if added {
            self.len += 1;
        }
        added
    }

    pub fn contains(&self, giver: &Person, receiver: &Person) -> bool {
        self.by_giver
            .get(giver)
            .is_some_and(|receivers| receivers.contains(receiver))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pairs in giver, then receiver order
    pub fn iter(&self) -> impl Iterator<Item = (&Person, &Person)> + '_ {
        self.by_giver
            .iter()
            .flat_map(|(giver, receivers)| receivers.iter().map(move |r| (giver, r)))
    }
}

/// Expand `rules` into the forbidden pairs they describe.
///
/// Every named person must be in `participants`; the first one that is not
/// is reported, givers before receivers, rules in order.
pub fn normalize(
    participants: &[Person],
    rules: &[ExclusionRule],
) -> Result<ForbiddenPairs, AssignmentError> {
    let roster: HashSet<&Person> = participants.iter().collect();
    let mut forbidden = ForbiddenPairs::new();

    for rule in rules {
        let givers = rule.givers.expand(participants, &roster)?;
        let receivers = rule.receivers.expand(participants, &roster)?;

        for giver in &givers {
            for receiver in &receivers {
                forbidden.insert((*giver).clone(), (*receiver).clone());
                if rule.bidirectional {
                    forbidden.insert((*receiver).clone(), (*giver).clone());
                }
            }
        }
    }

    tracing::debug!(
        rules = rules.len(),
        forbidden = forbidden.len(),
        "normalized exclusions"
    );
    Ok(forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(names: &[&str]) -> Vec<Person> {
        names.iter().map(|&n| Person::from(n)).collect()
    }

    fn pairs(forbidden: &ForbiddenPairs) -> Vec<(&str, &str)> {
        forbidden.iter().map(|(g, r)| (g.as_str(), r.as_str())).collect()
    }

    #[test]
    fn test_single_pair() {
        let roster = people(&["A", "B", "C"]);
        let forbidden = normalize(&roster, &[ExclusionRule::new("A", "B")]).unwrap();
        assert_eq!(pairs(&forbidden), vec![("A", "B")]);
        assert!(!forbidden.contains(&"B".into(), &"A".into()));
    }

    #[test]
    fn test_group_expansion() {
        let roster = people(&["A", "B", "C", "D"]);
        let forbidden = normalize(&roster, &[ExclusionRule::new(["A", "B"], ["C", "D"])]).unwrap();
        assert_eq!(
            pairs(&forbidden),
            vec![("A", "C"), ("A", "D"), ("B", "C"), ("B", "D")]
        );
    }

    #[test]
    fn test_bidirectional_family() {
        let roster = people(&["A", "B", "C"]);
        let forbidden = normalize(&roster, &[ExclusionRule::family(["A", "B"])]).unwrap();
        assert!(forbidden.contains(&"A".into(), &"B".into()));
        assert!(forbidden.contains(&"B".into(), &"A".into()));
        assert!(!forbidden.contains(&"A".into(), &"C".into()));
    }

    #[test]
    fn test_wildcard_receiver() {
        let roster = people(&["A", "B", "C"]);
        let forbidden = normalize(&roster, &[ExclusionRule::new("A", "*")]).unwrap();
        assert_eq!(pairs(&forbidden), vec![("A", "A"), ("A", "B"), ("A", "C")]);
    }

    #[test]
    fn test_wildcard_giver() {
        let roster = people(&["A", "B", "C"]);
        let forbidden = normalize(&roster, &[ExclusionRule::new("*", "A")]).unwrap();
        assert_eq!(pairs(&forbidden), vec![("A", "A"), ("B", "A"), ("C", "A")]);
    }

    #[test]
    fn test_unknown_giver_reported_first() {
        let roster = people(&["A", "B"]);
        let err = normalize(&roster, &[ExclusionRule::new("X", "Y")]).unwrap_err();
        assert_eq!(err, AssignmentError::UnknownPerson("X".into()));

        let err = normalize(&roster, &[ExclusionRule::new("A", ["B", "Y"])]).unwrap_err();
        assert_eq!(err, AssignmentError::UnknownPerson("Y".into()));
    }

    #[test]
    fn test_duplicates_collapse() {
        let roster = people(&["A", "B", "C"]);
        let rules = [
            ExclusionRule::new("A", "B"),
            ExclusionRule::new("A", "B"),
            ExclusionRule::bidirectional("B", "A"),
        ];
        let forbidden = normalize(&roster, &rules).unwrap();
        assert_eq!(forbidden.len(), 2);
    }

    #[test]
    fn test_order_independent() {
        let roster = people(&["A", "B", "C", "D"]);
        let mut rules = vec![
            ExclusionRule::family(["A", "B"]),
            ExclusionRule::new("C", "*"),
            ExclusionRule::new("D", "A"),
        ];
        let first = normalize(&roster, &rules).unwrap();
        rules.reverse();
        let second = normalize(&roster, &rules).unwrap();
        assert_eq!(first, second);
        assert_eq!(normalize(&roster, &rules).unwrap(), second);
    }

    #[test]
    fn test_separator_characters_do_not_collide() {
        // With a joined-string key these two pairs would both be "a→b→c".
        let roster = people(&["a→b", "c", "a", "b→c"]);
        let forbidden = normalize(&roster, &[ExclusionRule::new("a→b", "c")]).unwrap();
        assert!(forbidden.contains(&"a→b".into(), &"c".into()));
        assert!(!forbidden.contains(&"a".into(), &"b→c".into()));
    }

    #[test]
    fn test_participant_named_star() {
        let roster = people(&["*", "B", "C"]);
        assert_eq!(Selector::from("*"), Selector::All);

        let rules = [ExclusionRule::new("B", Selector::One(Person::new("*")))];
        let forbidden = normalize(&roster, &rules).unwrap();
        assert_eq!(pairs(&forbidden), vec![("B", "*")]);

        let result = crate::compute_assignment(&roster, &rules).unwrap();
        assert!(!result.contains(&"B".into(), &"*".into()));
        assert!(result.contains(&"*".into(), &"B".into()));
    }

    #[test]
    fn test_rule_wire_format() {
        let rule: ExclusionRule =
            serde_json::from_str(r#"{"givers": "*", "receivers": ["A", "B"]}"#).unwrap();
        assert_eq!(rule.givers, Selector::All);
        assert_eq!(rule.receivers, Selector::many(["A", "B"]));
        assert!(!rule.bidirectional);

        let json = serde_json::to_string(&ExclusionRule::bidirectional("A", "*")).unwrap();
        assert_eq!(json, r#"{"givers":"A","receivers":"*","bidirectional":true}"#);
    }
}
