//! Walk one battle's aftermath with a toy host.
//!
//! Run with: `cargo run --example victory`

use aftermath::{
    Aftermath, AftermathConfig, AftermathError, BattleRecord, Bindings, Entity, EvalError,
    Evaluator, EventRunner, MessageWindow, Phase, RuleLibrary, SelectionRng, Value,
    WindowMetrics,
};

const HAROLD: &str = "\
<Victory Action Type: exp>
<Victory Action Condition>
enemies Boss
</Victory Action Condition>
<Victory Action Priority>
2
</Victory Action Priority>
<Victory Action Effect>
say Harold: That one nearly had us.
</Victory Action Effect>

<Victory Action Type: level>
<Victory Action Effect>
say Harold: I can feel it. Stronger!
</Victory Action Effect>";

const THERESE: &str = "\
<TYPE: exp>
<EFFECT> say Therese: Is that all? </EFFECT>

<TYPE: drop>
<NO MESSAGE>
<CONDITION> drops Rare </CONDITION>
<EFFECT> event 3-5 </EFFECT>";

#[derive(Default)]
struct Battle {
    enemies: Vec<&'static str>,
    drops: Vec<&'static str>,
    running_event: Option<u32>,
}

impl BattleRecord for Battle {
    fn drops_have_tag(&self, tag: &str) -> bool {
        self.drops.iter().any(|d| *d == tag)
    }

    fn enemies_have_tag(&self, tag: &str) -> bool {
        self.enemies.iter().any(|e| *e == tag)
    }
}

impl EventRunner for Battle {
    fn run_event(&mut self, event_id: u32) {
        println!("  [common event {event_id} starts]");
        self.running_event = Some(event_id);
    }

    fn is_event_running(&self) -> bool {
        self.running_event.is_some()
    }
}

impl MessageWindow for Battle {
    fn is_message_busy(&self) -> bool {
        false
    }
}

/// Understands `enemies <tag>`, `drops <tag>`, `event <ids>`, `say <text>`
/// and integer literals.
struct Console;

impl Evaluator for Console {
    fn evaluate(&mut self, body: &str, bindings: &mut Bindings<'_>) -> Result<Value, EvalError> {
        let (verb, arg) = body.split_once(' ').unwrap_or((body, ""));
        match verb {
            "enemies" => Ok(bindings.enemies_have_tag(arg).into()),
            "drops" => Ok(bindings.drops_have_tag(arg).into()),
            "event" => Ok(i64::from(bindings.run_common_event(arg)?).into()),
            "say" => {
                println!("  \"{arg}\"");
                Ok(Value::Null)
            }
            "true" => Ok(true.into()),
            literal => literal
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| EvalError::new(format!("unknown body `{body}`"))),
        }
    }
}

fn main() -> Result<(), AftermathError> {
    let party = [Entity::new(1, HAROLD), Entity::new(2, THERESE)];
    let mut library = RuleLibrary::new();
    library.check_loaded(true, &party);
    let Some(repository) = library.repository() else {
        return Ok(());
    };
    println!("{repository}");

    let config = AftermathConfig::from_params([("exp_label", "XP")])?;
    let mut aftermath =
        Aftermath::new(repository, Console, SelectionRng::new(2024)).with_config(config);
    let mut battle = Battle {
        enemies: vec!["Boss"],
        drops: vec!["Rare"],
        ..Battle::default()
    };
    let metrics = WindowMetrics::default();

    println!("experience:");
    aftermath.enter_experience(&mut battle)?;
    let layout = aftermath.layout(metrics);
    println!(
        "  panel {:?}, height {}, label {}",
        layout.exp_style(2),
        layout.exp_height(552),
        layout.exp_label()
    );

    println!("loot:");
    aftermath.enter_loot(&mut battle)?;
    println!(
        "  message expected: {}",
        aftermath.flags().shows_message(Phase::Loot)
    );
    println!("  advance while event runs: {}", aftermath.should_advance(&battle, true));
    battle.running_event = None;
    println!("  advance once it ends: {}", aftermath.should_advance(&battle, false));

    println!("level-up:");
    aftermath.prepare_level_up(&[1, 2], &mut battle)?;
    for actor in [1, 2] {
        println!("  actor {actor} panel opens");
        aftermath.activate_actor(actor, &mut battle)?;
    }

    aftermath.end_battle();
    Ok(())
}
