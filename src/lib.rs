//! Turn-based creature battle engine: deterministic move resolution, damage
//! calculation, status and field effects, turn ordering and outcome
//! arbitration, replayable from a seed.
//!
//! The main entry point for whole battles is [`engine::BattleEngine`].

pub mod battle_logger;
pub mod data;
pub mod engine;
pub mod sim;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::battle_logger::{BattleLog, BattleLogger, NullLogger};
    pub use crate::engine::{run_battle, BattleEngine};
    pub use crate::sim::arbiter::BattleOutcome;
    pub use crate::sim::field::{Field, Side, Slot, SlotRef, Terrain, Weather};
    pub use crate::sim::order::ChosenAction;
    pub use crate::sim::provider::{ActionProvider, AttackProvider, PassProvider};
    pub use crate::sim::rng::{RandomSource, SeededRandom};
    pub use crate::sim::rules::{BattleRules, SpreadPolicy};
    pub use crate::sim::view::{BattleView, NullView};
    pub use crate::sim::Pokemon;
}
