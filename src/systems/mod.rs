//! The per-frame systems the controller drives: input, battle, display.
//!
//! None of them own entities. Each is handed the live set through `init`
//! after every map change and refuses to act on any other set.

pub mod battle;
pub mod display;
pub mod input;

use crate::{
    ecs::EcsWorld,
    error::{EngineError, EngineResult},
};

pub use self::{battle::BattleSystem, display::DisplaySystem, input::InputSystem};

pub trait GameSystem {
    fn name(&self) -> &'static str;

    /// Adopts `ecs` as the entity view, replacing whatever was held before.
    fn init(&mut self, ecs: &EcsWorld);

    fn destroy(&mut self) -> EngineResult<()> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Ready {
        generation: u64,
    },
}

impl Lifecycle {
    pub fn init(&mut self, ecs: &EcsWorld) {
        *self = Lifecycle::Ready {
            generation: ecs.generation(),
        };
    }

    pub fn ensure_ready(&self, system: &'static str, ecs: &EcsWorld) -> EngineResult<()> {
        match *self {
            Lifecycle::Uninitialized => Err(EngineError::SystemNotReady { system }),
            Lifecycle::Ready { generation } if generation != ecs.generation() => {
                Err(EngineError::StaleView {
                    system,
                    held: generation,
                    live: ecs.generation(),
                })
            }
            Lifecycle::Ready { .. } => Ok(()),
        }
    }
}
