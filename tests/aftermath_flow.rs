
use aftermath::{
    Aftermath, AftermathConfig, Entity, ExpStyle, Phase, RuleRepository, SelectionRng,
    WindowMetrics,
};
use fakes::{FakeBattle, ScriptEvaluator, block};

/// Harold (1) and Therese (2) with a mix of actions, plus a troop note.
fn repository() -> RuleRepository {
    let harold = Entity::new(
        1,
        [
            block("exp", Some("enemies_have_tag:Boss"), Some("2"), "say:Harold: Tough one."),
            block("level", None, None, "say:Harold: I feel stronger!"),
        ]
        .concat(),
    );
    let therese = Entity::new(
        2,
        [
            block("exp", None, None, "say:Therese: Too easy."),
            "<TYPE: level>\n<NO MESSAGE>\n<EFFECT>\ncommon_event:30\n</EFFECT>\n".to_owned(),
        ]
        .concat(),
    );
    let troop = Entity::new(
        50,
        "<TYPE: drop>\n<CONDITION>\ndrops_have_tag:Rare\n</CONDITION>\n<EFFECT>\ncommon_event:20-22\n</EFFECT>",
    );
    RuleRepository::from_entities([&harold, &therese, &troop])
}

// ---------------------------------------------------------------------------
// Experience and loot
// ---------------------------------------------------------------------------

#[test]
fn experience_picks_highest_priority_and_raises_flag() {
    let repo = repository();
    let mut aftermath = Aftermath::new(&repo, ScriptEvaluator::new(), SelectionRng::new(3));
    let mut battle = FakeBattle::new().with_enemy_tag("Boss");

    assert!(aftermath.enter_experience(&mut battle).unwrap());
    assert!(aftermath.flags().shows_message(Phase::Experience));
    assert!(!aftermath.flags().shows_message(Phase::Loot));
}

#[test]
fn experience_layout_compacts_when_message_shows() {
    let repo = repository();
    let mut aftermath = Aftermath::new(&repo, ScriptEvaluator::new(), SelectionRng::new(3));
    aftermath.enter_experience(&mut FakeBattle::new()).unwrap();

    let layout = aftermath.layout(WindowMetrics::default());
    assert_eq!(layout.exp_style(2), ExpStyle::Compact { columns: 2 });
    assert_eq!(layout.exp_height(552), 372);
    assert_eq!(layout.exp_label(), "EXP");
}

#[test]
fn loot_without_match_keeps_default_layout() {
    let repo = repository();
    let mut aftermath = Aftermath::new(&repo, ScriptEvaluator::new(), SelectionRng::new(0));
    let mut battle = FakeBattle::new();

    assert!(!aftermath.enter_loot(&mut battle).unwrap());
    assert!(!aftermath.flags().shows_message(Phase::Loot));
    assert_eq!(aftermath.layout(WindowMetrics::default()).loot_height(400), 400);
    assert!(battle.started_events.is_empty());
}

#[test]
fn loot_effect_starts_event_and_defers_advance() {
    let repo = repository();
    let mut aftermath = Aftermath::new(&repo, ScriptEvaluator::new(), SelectionRng::new(0));
    let mut battle = FakeBattle::new().with_drop_tag("Rare");

    assert!(aftermath.enter_loot(&mut battle).unwrap());
    assert!(aftermath.flags().shows_message(Phase::Loot));
    assert_eq!(aftermath.layout(WindowMetrics::default()).loot_height(400), 220);
    let started = battle.started_events[0];
    assert!((20..=22).contains(&started));

    // The player presses confirm while the event runs.
    assert!(!aftermath.should_advance(&battle, true));
    assert!(!aftermath.should_advance(&battle, true));

    // The event ends; the owed advance happens exactly once.
    battle.finish_event();
    assert!(aftermath.should_advance(&battle, false));
    assert!(!aftermath.should_advance(&battle, false));
}

#[test]
fn busy_dialog_holds_the_sequence() {
    let repo = RuleRepository::new();
    let mut aftermath = Aftermath::new(&repo, ScriptEvaluator::new(), SelectionRng::new(0));
    let mut battle = FakeBattle::new();
    battle.message_busy = true;
    assert!(!aftermath.should_advance(&battle, true));
    battle.message_busy = false;
    assert!(aftermath.should_advance(&battle, true));
}

#[test]
fn always_compact_config() {
    let repo = RuleRepository::new();
    let config = AftermathConfig::from_params([("always_compact_exp", "true"), ("exp_label", "XP")])
        .unwrap();
    let aftermath =
        Aftermath::new(&repo, ScriptEvaluator::new(), SelectionRng::new(0)).with_config(config);

    let layout = aftermath.layout(WindowMetrics::default());
    assert_eq!(layout.exp_style(4), ExpStyle::Compact { columns: 4 });
    assert_eq!(layout.exp_height(552), 552);
    assert_eq!(layout.exp_label(), "XP");
    assert_eq!(aftermath.config().exp_label, "XP");
}

// ---------------------------------------------------------------------------
// Level-up
// ---------------------------------------------------------------------------

#[test]
fn level_up_rules_wait_for_their_actor() {
    let repo = repository();
    let mut aftermath = Aftermath::new(&repo, ScriptEvaluator::new(), SelectionRng::new(0));
    let mut battle = FakeBattle::new();

    assert_eq!(aftermath.prepare_level_up(&[1, 2], &mut battle).unwrap(), 2);
    // Harold's action shows a message, so the phase flag is raised.
    assert!(aftermath.flags().shows_message(Phase::LevelUp));
    assert_eq!(
        aftermath.pending_for(1).map(|r| r.effect()),
        Some("say:Harold: I feel stronger!")
    );

    // Therese's panel opens first: her event runs, Harold's does not.
    assert!(aftermath.activate_actor(2, &mut battle).unwrap());
    assert_eq!(battle.started_events, vec![30]);
    assert!(aftermath.pending_for(1).is_some());

    // Re-opening her panel does nothing.
    assert!(!aftermath.activate_actor(2, &mut battle).unwrap());
    assert_eq!(battle.started_events, vec![30]);
}

#[test]
fn level_up_flag_stays_low_for_silent_actions() {
    let repo = repository();
    let mut aftermath = Aftermath::new(&repo, ScriptEvaluator::new(), SelectionRng::new(0));
    assert_eq!(aftermath.prepare_level_up(&[2], &mut FakeBattle::new()).unwrap(), 1);
    assert!(!aftermath.flags().shows_message(Phase::LevelUp));
    assert_eq!(
        aftermath.layout(WindowMetrics::default()).level_up_height(552),
        552
    );
}

#[test]
fn actors_without_rules_get_nothing() {
    let repo = repository();
    let mut aftermath = Aftermath::new(&repo, ScriptEvaluator::new(), SelectionRng::new(0));
    let mut battle = FakeBattle::new();
    assert_eq!(aftermath.prepare_level_up(&[9], &mut battle).unwrap(), 0);
    assert!(!aftermath.activate_actor(9, &mut battle).unwrap());
    assert!(!aftermath.flags().shows_message(Phase::LevelUp));
}

#[test]
fn end_battle_forgets_everything() {
    let repo = repository();
    let mut aftermath = Aftermath::new(&repo, ScriptEvaluator::new(), SelectionRng::new(0));
    let mut battle = FakeBattle::new().with_drop_tag("Rare");
    aftermath.enter_loot(&mut battle).unwrap();
    aftermath.prepare_level_up(&[1], &mut battle).unwrap();
    assert!(!aftermath.should_advance(&battle, true));

    aftermath.end_battle();
    assert!(!aftermath.is_advance_deferred());
    assert!(aftermath.pending_for(1).is_none());
    assert!(!aftermath.flags().shows_message(Phase::Loot));
}
