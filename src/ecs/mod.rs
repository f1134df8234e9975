pub mod components;
pub mod entity;
pub mod factory;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::Point;
use specs::prelude::{
    Builder, Component, Entity as SpecsEntity, Join, World as SpecsWorld, WorldExt,
};

use crate::{
    error::{EngineError, EngineResult},
    map::FloorId,
};

use self::{
    components::{Battle, Display, Health, Input, IntentStep, Name, Solid},
    entity::{ComponentSlot, Entity},
    resources::{Bumps, CombatLog, CurrentAction, MovementContext, PendingEffects},
};

pub const PLAYER_NAME: &str = "Player";

/// The live entity set for one installed map.
///
/// Built in one go from the factory's sequence and never patched: a map
/// change throws the whole world away and populates a new one.
pub struct EcsWorld {
    specs_world: SpecsWorld,
    player: Option<SpecsEntity>,
    generation: u64,
}

impl EcsWorld {
    pub fn populate(entities: Vec<Entity>, context: MovementContext, generation: u64) -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        specs_world.insert(context);
        specs_world.insert(CurrentAction::default());
        specs_world.insert(PendingEffects::default());
        specs_world.insert(Bumps::default());
        specs_world.insert(CombatLog::default());

        let mut player = None;
        for entity in entities {
            let is_player = entity.is_named(PLAYER_NAME);
            let spawned = specs_world
                .create_entity()
                .maybe_with(entity.display)
                .maybe_with(entity.input)
                .maybe_with(entity.health)
                .maybe_with(entity.battle)
                .maybe_with(entity.solid)
                .maybe_with(entity.name)
                .build();
            if is_player {
                player = Some(spawned);
            }
        }

        Self {
            specs_world,
            player,
            generation,
        }
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<Display>();
        world.register::<Input>();
        world.register::<Health>();
        world.register::<Battle>();
        world.register::<Solid>();
        world.register::<Name>();
        world.register::<IntentStep>();
    }

    pub fn specs(&self) -> &SpecsWorld {
        &self.specs_world
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn floor(&self) -> FloorId {
        self.specs_world.fetch::<MovementContext>().floor
    }

    pub fn player_entity(&self) -> Option<SpecsEntity> {
        self.player
    }

    pub fn len(&self) -> usize {
        self.specs_world.entities().join().count()
    }

    #[cfg(test)]
    pub fn has<C>(&self, entity: SpecsEntity) -> bool
    where
        C: Component,
    {
        self.specs_world.read_component::<C>().contains(entity)
    }

    pub fn component<C>(&self, entity: SpecsEntity) -> EngineResult<C>
    where
        C: Component + ComponentSlot,
    {
        self.specs_world
            .read_component::<C>()
            .get(entity)
            .cloned()
            .ok_or(EngineError::MissingComponent { kind: C::KIND })
    }

    pub fn player_component<C>(&self) -> EngineResult<C>
    where
        C: Component + ComponentSlot,
    {
        let player = self
            .player
            .ok_or(EngineError::MissingComponent { kind: C::KIND })?;
        self.component(player)
    }

    pub fn player_point(&self) -> Option<Point> {
        self.player_component::<Display>()
            .ok()
            .map(|display| display.point())
    }

    pub fn queue_player_step(&mut self, delta: Point) {
        if let Some(player) = self.player {
            let mut intents = self.specs_world.write_component::<IntentStep>();
            let _ = intents.insert(player, IntentStep { delta });
        }
    }

    /// Visits every entity with a `Display`, in creation order.
    pub fn each_renderable<F>(&self, mut f: F)
    where
        F: FnMut(&Display),
    {
        let entities = self.specs_world.entities();
        let displays = self.specs_world.read_component::<Display>();
        for (_, display) in (&entities, &displays).join() {
            f(display);
        }
    }

    pub fn set_action(&mut self, action: Option<crate::input::Action>) {
        self.specs_world.insert(CurrentAction(action));
    }

    pub fn take_effects(&mut self) -> Vec<components::Effect> {
        let mut pending = self.specs_world.write_resource::<PendingEffects>();
        std::mem::take(&mut pending.effects)
    }

    pub fn drain_combat_log(&mut self) -> Vec<String> {
        let mut log = self.specs_world.write_resource::<CombatLog>();
        std::mem::take(&mut log.entries)
    }

    pub fn maintain(&mut self) {
        self.specs_world.maintain();
    }
}

#[cfg(test)]
mod tests {
    use bracket_terminal::prelude::RGB;

    use super::*;

    fn sample() -> EcsWorld {
        let white = RGB::from_u8(255, 255, 255);
        let entities = vec![
            Entity::new()
                .with(Display::new(0, 0, '#', white))
                .with(Solid(true)),
            Entity::new()
                .with(Display::new(2, 2, 'd', white))
                .with(Health::full(5))
                .with(Name("drone".to_string())),
            Entity::new()
                .with(Display::new(1, 1, '@', white))
                .with(Name(PLAYER_NAME.to_string())),
        ];
        EcsWorld::populate(entities, MovementContext::new(FloorId(0), 10, 10), 7)
    }

    #[test]
    fn populate_keeps_order_and_finds_the_player() {
        let ecs = sample();
        assert_eq!(ecs.len(), 3);
        assert_eq!(ecs.generation(), 7);
        assert_eq!(ecs.floor(), FloorId(0));
        assert_eq!(ecs.player_point(), Some(Point::new(1, 1)));

        let mut glyphs = Vec::new();
        ecs.each_renderable(|display| glyphs.push(display.glyph));
        assert_eq!(glyphs, vec!['#', 'd', '@']);
    }

    #[test]
    fn typed_lookup_reports_the_missing_kind() {
        let ecs = sample();
        let player = ecs.player_entity().unwrap();
        assert!(ecs.has::<Name>(player));
        assert!(!ecs.has::<Health>(player));
        match ecs.component::<Health>(player) {
            Err(EngineError::MissingComponent { kind }) => {
                assert_eq!(kind, components::ComponentKind::Health)
            }
            other => panic!("expected a missing component, got {other:?}"),
        }
    }
}
