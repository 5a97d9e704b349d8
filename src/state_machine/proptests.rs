//! Property-based tests for the dialogue machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::transition::*;
use super::*;
use crate::recipe::{reduce_count, SYLLABLE_MODULUS};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_line() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i64>().prop_map(|n| n.to_string()),
        "[a-zA-Z ]{0,12}",
        "[A-Za-z]{1,8}(, ?[A-Za-z]{1,8}){0,5}",
        Just("no".to_string()),
        Just(" , ".to_string()),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        8 => arb_line().prop_map(Event::line),
        3 => Just(Event::PacingComplete),
        1 => Just(Event::Reset),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::AskAn),
        Just(Step::AskA),
        Just(Step::AskUm),
        Just(Step::ShowName),
        Just(Step::AskIngredients),
        Just(Step::AskMoreIngredients),
        Just(Step::ShowRecipe),
        Just(Step::Done),
    ]
}

// ============================================================================
// State Validity Checkers
// ============================================================================

fn is_valid_session(session: &Session) -> bool {
    let counts = session.counts;
    counts.an < SYLLABLE_MODULUS
        && counts.a < SYLLABLE_MODULUS
        && counts.um < SYLLABLE_MODULUS
        && session.cocktail_name.is_some() == session.step.has_cocktail_name()
        && (session.step < Step::AskMoreIngredients || !session.ingredients.is_empty())
}

fn multiset(items: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item.as_str()).or_default() += 1;
    }
    counts
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: every reachable session is well formed
    #[test]
    fn prop_transitions_preserve_validity(
        seed in any::<u64>(),
        events in proptest::collection::vec(arb_event(), 0..40)
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = Session::new();

        for event in events {
            if let Ok(result) = transition(&session, event, &mut rng) {
                session = result.new_session;
                prop_assert!(is_valid_session(&session), "Invalid session: {:?}", session);
            }
        }
    }

    // Invariant 2: the step only moves forward, except on reset
    #[test]
    fn prop_step_only_moves_forward(
        seed in any::<u64>(),
        events in proptest::collection::vec(arb_event(), 0..40)
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = Session::new();

        for event in events {
            let is_reset = event == Event::Reset;
            if let Ok(result) = transition(&session, event, &mut rng) {
                if !is_reset {
                    prop_assert!(result.new_session.step >= session.step);
                }
                session = result.new_session;
            }
        }
    }

    // Invariant 3: reset from anywhere gives a fresh session and greeting
    #[test]
    fn prop_reset_always_succeeds(step in arb_step(), seed in any::<u64>()) {
        let session = Session { step, ..Session::new() };
        let result = transition(&session, Event::Reset, &mut StdRng::seed_from_u64(seed));
        let result = result.expect("reset never fails");
        prop_assert_eq!(result.new_session, Session::new());
        prop_assert_eq!(result.effects.len(), 1);
    }

    // Invariant 4: counts are |n| mod 20 for every integer answer
    #[test]
    fn prop_counts_are_reduced(n in any::<i64>()) {
        let result = transition(&Session::new(), Event::line(n.to_string()), &mut StdRng::seed_from_u64(0));
        let session = result.expect("integers are accepted").new_session;
        prop_assert_eq!(session.step, Step::AskA);
        prop_assert_eq!(session.counts.an, reduce_count(n));
        prop_assert!(session.counts.an < 20);
    }

    // Invariant 5: the name is a shuffle of exactly the requested tokens
    #[test]
    fn prop_name_matches_token_multiset(an in 0u8..20, a in 0u8..20, um in 0u8..20, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let session = Session {
            step: Step::AskUm,
            counts: crate::recipe::SyllableCounts { an, a, um: 0 },
            ..Session::new()
        };
        let result = transition(&session, Event::line(um.to_string()), &mut rng).unwrap();
        let name = result.new_session.cocktail_name().to_string();

        let words: Vec<String> = name
            .strip_suffix("the drink")
            .unwrap()
            .split_whitespace()
            .map(String::from)
            .collect();
        let tally = multiset(&words);
        prop_assert_eq!(tally.get("an").copied().unwrap_or(0), usize::from(an));
        prop_assert_eq!(tally.get("a").copied().unwrap_or(0), usize::from(a));
        prop_assert_eq!(tally.get("um").copied().unwrap_or(0), usize::from(um));
        prop_assert_eq!(tally.len(), [an, a, um].iter().filter(|n| **n > 0).count());
    }

    // Invariant 6: the recommendation drops fewer than four items, keeps at least one
    #[test]
    fn prop_recommendation_is_subset(
        items in proptest::collection::vec("[A-Z][a-z]{0,6}", 1..10),
        seed in any::<u64>()
    ) {
        let session = Session {
            step: Step::AskMoreIngredients,
            cocktail_name: Some("um the drink".to_string()),
            ingredients: items.clone(),
            ..Session::new()
        };
        let result = transition(&session, Event::line("n"), &mut StdRng::seed_from_u64(seed)).unwrap();
        let recommended = &result.new_session.recommended;

        prop_assert!(!recommended.is_empty());
        prop_assert!(recommended.len() + 4 > items.len());
        let available = multiset(&items);
        for (item, count) in multiset(recommended) {
            prop_assert!(available.get(item).copied().unwrap_or(0) >= count);
        }
    }

    // Invariant 7: transient and terminal steps refuse lines without side effects
    #[test]
    fn prop_non_accepting_steps_reject_lines(line in arb_line(), seed in any::<u64>()) {
        for step in [Step::ShowName, Step::ShowRecipe, Step::Done] {
            let session = Session { step, ..Session::new() };
            let result = transition(&session, Event::line(line.clone()), &mut StdRng::seed_from_u64(seed));
            prop_assert!(result.is_err());
        }
    }
}
