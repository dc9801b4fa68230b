mod entity;
mod error;
mod flags;
mod phase;
mod repository;
mod rule;
mod value;

pub use entity::{Annotated, Entity};
pub use error::{ConfigError, EvalError, IdListError};
pub use flags::PhaseFlags;
pub use phase::{Phase, Stage};
pub use repository::{RuleLibrary, RuleRepository};
pub use rule::{DEFAULT_CONDITION, DEFAULT_PRIORITY, Rule};
pub use value::Value;
