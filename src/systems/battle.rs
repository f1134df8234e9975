use log::{debug, info};
use specs::prelude::RunNow;

use crate::{
    ecs::{EcsWorld, resources::Bumps, systems::CombatSystem},
    error::EngineResult,
    input::Action,
};

use super::{GameSystem, Lifecycle};

/// Settles the fights started by this frame's movement.
#[derive(Default)]
pub struct BattleSystem {
    lifecycle: Lifecycle,
}

impl BattleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the combat messages produced this frame, if any.
    pub fn process(&mut self, ecs: &mut EcsWorld, action: &Action) -> EngineResult<Vec<String>> {
        self.lifecycle.ensure_ready(self.name(), ecs)?;
        if ecs.specs().fetch::<Bumps>().pending.is_empty() {
            return Ok(Vec::new());
        }

        debug!("resolving combat after {action}");
        CombatSystem.run_now(ecs.specs());
        ecs.maintain();

        let messages = ecs.drain_combat_log();
        for message in &messages {
            info!("{message}");
        }
        Ok(messages)
    }
}

impl GameSystem for BattleSystem {
    fn name(&self) -> &'static str {
        "battle"
    }

    fn init(&mut self, ecs: &EcsWorld) {
        self.lifecycle.init(ecs);
    }
}

#[cfg(test)]
mod tests {
    use bracket_random::prelude::RandomNumberGenerator;
    use bracket_terminal::prelude::RGB;

    use super::*;
    use crate::{
        data::{interactions::InteractionTable, monsters::build_monster},
        ecs::{
            components::{Battle, Display, Health, Name},
            entity::Entity,
            factory,
            resources::MovementContext,
        },
        input::KeyCode,
        map::FloorId,
        scripted_input::ScriptedInput,
        systems::InputSystem,
    };

    fn arena(extra: Vec<Entity>) -> EcsWorld {
        let mut entities = extra;
        entities.push(factory::player(1, 1));
        EcsWorld::populate(entities, MovementContext::new(FloorId(1), 6, 3), 4)
    }

    #[test]
    fn nothing_to_fight_is_a_no_op() {
        let mut ecs = EcsWorld::populate(Vec::new(), MovementContext::new(FloorId(1), 1, 1), 1);
        let mut battle = BattleSystem::new();
        battle.init(&ecs);
        assert!(battle.process(&mut ecs, &Action::Right).unwrap().is_empty());
        assert_eq!(ecs.len(), 0);
    }

    #[test]
    fn bumping_a_drone_trades_blows() {
        let mut rng = RandomNumberGenerator::seeded(8);
        let drone = build_monster(2, 1, "drone", None, &mut rng).unwrap();
        let drone_health = drone.get::<Health>().unwrap().current;
        let mut ecs = arena(vec![drone]);

        let mut input = InputSystem::new(
            Box::new(ScriptedInput::new([KeyCode::Right])),
            InteractionTable::default(),
        );
        let mut battle = BattleSystem::new();
        input.init(&ecs);
        battle.init(&ecs);

        let outcome = input.get_and_process_input(&mut ecs).unwrap();
        assert_eq!(ecs.player_point(), Some(bracket_geometry::prelude::Point::new(1, 1)));
        let messages = battle.process(&mut ecs, &outcome.action).unwrap();
        assert_eq!(messages[0], format!("Player hits drone for {}", factory::PLAYER_STRENGTH));
        assert_eq!(messages[1], "drone hits Player for 2");

        let player = ecs.player_component::<Health>().unwrap();
        assert_eq!(player.current, factory::PLAYER_HEALTH - 2);
        assert!(drone_health > factory::PLAYER_STRENGTH);
    }

    #[test]
    fn defeated_foes_leave_the_live_set() {
        let weak = Entity::new()
            .with(Display::new(2, 1, 'r', RGB::from_u8(120, 120, 120)))
            .with(Health::full(1))
            .with(Battle {
                strength: 1,
                speed: 1,
            })
            .with(Name("rat".to_string()));
        let mut ecs = arena(vec![weak]);
        let mut input = InputSystem::new(
            Box::new(ScriptedInput::new([KeyCode::Right, KeyCode::Right])),
            InteractionTable::default(),
        );
        let mut battle = BattleSystem::new();
        input.init(&ecs);
        battle.init(&ecs);

        let outcome = input.get_and_process_input(&mut ecs).unwrap();
        let messages = battle.process(&mut ecs, &outcome.action).unwrap();
        assert_eq!(messages, vec!["Player hits rat for 4", "rat is destroyed"]);
        assert_eq!(ecs.len(), 1);

        input.get_and_process_input(&mut ecs).unwrap();
        assert_eq!(ecs.player_point(), Some(bracket_geometry::prelude::Point::new(2, 1)));
    }
}
