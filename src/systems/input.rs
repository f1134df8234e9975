use log::debug;
use specs::prelude::RunNow;

use crate::{
    data::interactions::InteractionTable,
    ecs::{
        EcsWorld,
        components::Effect,
        systems::{InteractionSystem, MovementSystem},
    },
    error::EngineResult,
    input::{Action, KeyCode, KeySource},
};

use super::{GameSystem, Lifecycle};

/// What one processed key produced.
#[derive(Clone, Debug, PartialEq)]
pub struct InputOutcome {
    pub action: Action,
    pub effects: Vec<Effect>,
}

/// Reads one key per frame and hands the resulting action to every entity
/// that reacts to input. Effects are passed back up, never applied here.
pub struct InputSystem {
    keys: Box<dyn KeySource>,
    interactions: InteractionTable,
    lifecycle: Lifecycle,
}

impl InputSystem {
    pub fn new(keys: Box<dyn KeySource>, interactions: InteractionTable) -> Self {
        Self {
            keys,
            interactions,
            lifecycle: Lifecycle::default(),
        }
    }

    /// Blocks for a raw key; used for title and story pauses.
    pub fn get_input(&mut self) -> EngineResult<KeyCode> {
        self.keys.next_key()
    }

    pub fn get_and_process_input(&mut self, ecs: &mut EcsWorld) -> EngineResult<InputOutcome> {
        self.lifecycle.ensure_ready(self.name(), ecs)?;
        let action = Action::from_key(self.keys.next_key()?);
        debug!("action {action}");

        ecs.set_action(Some(action.clone()));
        InteractionSystem {
            table: &self.interactions,
        }
        .run_now(ecs.specs());

        if let Some(delta) = action.direction() {
            ecs.queue_player_step(delta);
            MovementSystem.run_now(ecs.specs());
        }
        ecs.maintain();

        Ok(InputOutcome {
            action,
            effects: ecs.take_effects(),
        })
    }
}

impl GameSystem for InputSystem {
    fn name(&self) -> &'static str {
        "input"
    }

    fn init(&mut self, ecs: &EcsWorld) {
        self.lifecycle.init(ecs);
    }
}
