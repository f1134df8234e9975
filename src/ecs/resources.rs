use bracket_geometry::prelude::Point;
use specs::prelude::Entity;

use crate::{ecs::components::Effect, input::Action, map::FloorId};

/// Bounds of the installed map, used to keep steps on the board.
#[derive(Clone, Debug)]
pub struct MovementContext {
    pub floor: FloorId,
    pub width: i32,
    pub height: i32,
}

impl MovementContext {
    pub fn new(floor: FloorId, width: i32, height: i32) -> Self {
        Self {
            floor,
            width,
            height,
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }
}

/// The action being processed this frame.
#[derive(Clone, Debug, Default)]
pub struct CurrentAction(pub Option<Action>);

/// Effects requested by `Input` components, surfaced to the controller.
#[derive(Default)]
pub struct PendingEffects {
    pub effects: Vec<Effect>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bump {
    pub attacker: Entity,
    pub defender: Entity,
}

/// Steps that ran into a combatant this frame.
#[derive(Default)]
pub struct Bumps {
    pub pending: Vec<Bump>,
}

#[derive(Default)]
pub struct CombatLog {
    pub entries: Vec<String>,
}

impl CombatLog {
    pub fn push<S: Into<String>>(&mut self, entry: S) {
        self.entries.push(entry.into());
    }
}
