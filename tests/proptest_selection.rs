
use aftermath::{Phase, SelectionRng, parse_note, select};
use fakes::{FakeBattle, ScriptEvaluator};
use proptest::prelude::*;
use strategies::{GenRule, arb_block, arb_scoped_rules, arb_unscoped_rules, build};

/// Highest priority among rules whose condition holds and that are in scope.
fn best_priority(gen: &[GenRule], scope: Option<u32>) -> Option<i64> {
    gen.iter()
        .filter(|g| g.holds)
        .filter(|g| scope.is_none() || g.owner == scope)
        .map(|g| g.priority)
        .max()
}

// ---------------------------------------------------------------------------
// Invariant 1: Only a top-priority applicable rule is ever chosen
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn chosen_rule_has_top_priority(gen in arb_unscoped_rules(), seed in any::<u64>()) {
        let rules = build(&gen, Phase::Experience);
        let chosen = select(
            &rules,
            None,
            &mut ScriptEvaluator::new(),
            &mut FakeBattle::new(),
            &mut SelectionRng::new(seed),
        )
        .unwrap();

        match (chosen, best_priority(&gen, None)) {
            (None, None) => {}
            (Some(rule), Some(best)) => {
                let index = rules.iter().position(|r| r == rule).unwrap();
                prop_assert!(gen[index].holds, "chose a rule whose condition failed");
                prop_assert_eq!(gen[index].priority, best);
            }
            (chosen, best) => prop_assert!(false, "chosen {:?} but best priority {:?}", chosen, best),
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Scoped selection stays within its owner
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn scoped_choice_belongs_to_scope(
        gen in arb_scoped_rules(),
        actor in 1_u32..=4,
        seed in any::<u64>(),
    ) {
        let rules = build(&gen, Phase::LevelUp);
        let chosen = select(
            &rules,
            Some(actor),
            &mut ScriptEvaluator::new(),
            &mut FakeBattle::new(),
            &mut SelectionRng::new(seed),
        )
        .unwrap();

        prop_assert_eq!(chosen.is_some(), best_priority(&gen, Some(actor)).is_some());
        if let Some(rule) = chosen {
            prop_assert_eq!(rule.owner(), Some(actor));
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Selection is deterministic for a fixed seed
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn same_seed_same_choice(gen in arb_unscoped_rules(), seed in any::<u64>()) {
        let rules = build(&gen, Phase::Loot);
        let run = || {
            select(
                &rules,
                None,
                &mut ScriptEvaluator::new(),
                &mut FakeBattle::new(),
                &mut SelectionRng::new(seed),
            )
            .unwrap()
            .map(|r| r.effect().to_owned())
        };
        prop_assert_eq!(run(), run());
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: One rule per complete block, regardless of spacing or casing
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn every_complete_block_parses(blocks in prop::collection::vec(arb_block(), 1..6)) {
        let note = blocks
            .iter()
            .map(|(text, _)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let rules = parse_note(4, &note);

        prop_assert_eq!(rules.len(), blocks.len());
        for (rule, (_, kind)) in rules.iter().zip(&blocks) {
            prop_assert_eq!(Some(rule.phase()), Phase::from_tag_value(kind));
            prop_assert_eq!(rule.condition(), "true");
            prop_assert_eq!(rule.priority_body(), "0");
            prop_assert_eq!(rule.owner().is_some(), rule.phase() == Phase::LevelUp);
        }
    }
}
