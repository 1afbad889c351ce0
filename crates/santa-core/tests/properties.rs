use proptest::prelude::*;
use santa_core::{normalize, Assigner, AssignmentError, ExclusionRule, Person};

fn roster(n: usize) -> Vec<Person> {
    (0..n).map(|i| Person::new(format!("P{}", i))).collect()
}

/// Whether any single cycle over `0..n` avoids `blocked`, by enumerating
/// every cycle starting at 0.
fn cycle_exists(n: usize, blocked: &dyn Fn(usize, usize) -> bool) -> bool {
    fn walk(
        current: usize,
        visited: &mut Vec<bool>,
        depth: usize,
        blocked: &dyn Fn(usize, usize) -> bool,
    ) -> bool {
        let n = visited.len();
        if depth == n {
            return !blocked(current, 0);
        }
        for next in 1..n {
            if !visited[next] && !blocked(current, next) {
                visited[next] = true;
                if walk(next, visited, depth + 1, blocked) {
                    return true;
                }
                visited[next] = false;
            }
        }
        false
    }

    let mut visited = vec![false; n];
    visited[0] = true;
    walk(0, &mut visited, 1, blocked)
}

fn rules_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, bool)>)> {
    (2usize..=7).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n, any::<bool>()), 0..(n * 2)),
        )
    })
}

fn to_rules(people: &[Person], raw: &[(usize, usize, bool)]) -> Vec<ExclusionRule> {
    raw.iter()
        .map(|&(g, r, both)| {
            let (giver, receiver) = (people[g].clone(), people[r].clone());
            if both {
                ExclusionRule::bidirectional(giver, receiver)
            } else {
                ExclusionRule::new(giver, receiver)
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn draws_are_valid_and_complete((n, raw) in rules_strategy(), seed in any::<u64>()) {
        let people = roster(n);
        let rules = to_rules(&people, &raw);
        let forbidden = normalize(&people, &rules).unwrap();
        let blocked = |g: usize, r: usize| forbidden.contains(&people[g], &people[r]);

        match Assigner::with_seed(seed).assign(&people, &rules) {
            Ok(assignment) => {
                prop_assert_eq!(assignment.len(), n);
                prop_assert!(assignment.is_single_cycle());
                for (giver, receiver) in forbidden.iter() {
                    prop_assert!(!assignment.contains(giver, receiver));
                }
            }
            Err(AssignmentError::NoValidAssignment { .. }) => {
                prop_assert!(!cycle_exists(n, &blocked));
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn normalization_ignores_rule_order((n, raw) in rules_strategy(), seed in any::<u64>()) {
        let people = roster(n);
        let rules = to_rules(&people, &raw);
        let mut shuffled = rules.clone();
        if !shuffled.is_empty() {
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
        }
        shuffled.reverse();

        let first = normalize(&people, &rules).unwrap();
        prop_assert_eq!(&first, &normalize(&people, &rules).unwrap());
        prop_assert_eq!(&first, &normalize(&people, &shuffled).unwrap());
    }
}
