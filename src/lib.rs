//! Annotation-driven actions for a turn-based RPG's post-battle sequence.
//!
//! Designers attach small blocks to database records:
//!
//! ```text
//! <TYPE: exp>
//! <CONDITION> enemies_have_tag("Boss") </CONDITION>
//! <PRIORITY> 2 </PRIORITY>
//! <EFFECT> show_message("Harold: That one was tough.") </EFFECT>
//! ```
//!
//! [`RuleRepository::from_entities`] parses them into [`Rule`]s partitioned
//! by [`Phase`]. During the aftermath an [`Aftermath`] coordinator picks at
//! most one rule per phase with [`select`] and runs it with [`execute`],
//! handing every body to the host's [`Evaluator`]. The resulting
//! [`PhaseFlags`] tell the presentation layer, through [`Layout`], whether to
//! make room for a dialog.

mod aftermath;
mod config;
mod error;
mod execute;
mod host;
mod layout;
mod parse;
mod rng;
mod select;
#[cfg(feature = "binary-cache")]
pub mod serial;
mod types;

pub use aftermath::{Aftermath, gate_message_input};
pub use config::{AftermathConfig, WindowMetrics};
pub use error::AftermathError;
pub use execute::execute;
pub use host::{BattleRecord, Bindings, Evaluator, EventRunner, Host, MessageWindow};
pub use layout::{ExpStyle, Layout};
pub use parse::{MAX_EXPANDED_IDS, expand_ids, parse_note};
pub use rng::{RandomSource, SelectionRng};
pub use select::select;
pub use types::{
    Annotated, ConfigError, DEFAULT_CONDITION, DEFAULT_PRIORITY, Entity, EvalError, IdListError,
    Phase, PhaseFlags, Rule, RuleLibrary, RuleRepository, Stage, Value,
};
