use bracket_geometry::prelude::Point;
use specs::prelude::*;

use crate::data::interactions::InteractionTable;

use super::{
    PLAYER_NAME,
    components::{Battle, Display, Health, Input, IntentStep, Name, Solid},
    resources::{Bump, Bumps, CombatLog, CurrentAction, MovementContext, PendingEffects},
};

/// Offers the current action to every `Input` component and collects the
/// effects they ask for.
pub struct InteractionSystem<'t> {
    pub table: &'t InteractionTable,
}

impl<'a, 't> System<'a> for InteractionSystem<'t> {
    type SystemData = (
        ReadStorage<'a, Input>,
        Read<'a, CurrentAction>,
        Write<'a, PendingEffects>,
    );

    fn run(&mut self, (inputs, action, mut pending): Self::SystemData) {
        let Some(action) = action.0.as_ref() else {
            return;
        };
        for input in inputs.join() {
            if let Some(effect) = self.table.react(&input.interaction, action) {
                pending.effects.push(effect);
            }
        }
    }
}

#[derive(Default)]
pub struct MovementSystem;

impl<'a> System<'a> for MovementSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, Display>,
        WriteStorage<'a, IntentStep>,
        ReadStorage<'a, Solid>,
        ReadStorage<'a, Health>,
        ReadStorage<'a, Battle>,
        ReadExpect<'a, MovementContext>,
        Write<'a, Bumps>,
    );

    fn run(&mut self, data: Self::SystemData) {
        let (entities, mut displays, mut intents, solids, healths, battles, movement, mut bumps) =
            data;
        let occupants: Vec<(Entity, Point, bool, bool)> = (&entities, &displays)
            .join()
            .map(|(entity, display)| {
                let solid = solids.get(entity).is_some_and(|s| s.0);
                let combatant = healths.get(entity).is_some_and(Health::is_alive)
                    && battles.contains(entity);
                (entity, display.point(), solid, combatant)
            })
            .collect();

        let mut to_clear = Vec::new();
        for (entity, display, intent) in (&entities, &mut displays, &intents).join() {
            to_clear.push(entity);
            let target = Point::new(display.x + intent.delta.x, display.y + intent.delta.y);
            if !movement.in_bounds(target) {
                continue;
            }

            let here: Vec<_> = occupants
                .iter()
                .filter(|(other, point, _, _)| *other != entity && *point == target)
                .collect();

            if let Some((defender, ..)) = here.iter().find(|(_, _, _, combatant)| *combatant) {
                bumps.pending.push(Bump {
                    attacker: entity,
                    defender: *defender,
                });
                continue;
            }
            if here.iter().any(|(_, _, solid, _)| *solid) {
                continue;
            }
            display.x = target.x;
            display.y = target.y;
        }

        for entity in to_clear {
            intents.remove(entity);
        }
    }
}

/// Resolves this frame's bumps. The attacker swings first; a survivor swings back.
#[derive(Default)]
pub struct CombatSystem;

impl<'a> System<'a> for CombatSystem {
    type SystemData = (
        Entities<'a>,
        Write<'a, Bumps>,
        WriteStorage<'a, Health>,
        ReadStorage<'a, Battle>,
        ReadStorage<'a, Name>,
        Write<'a, CombatLog>,
    );

    fn run(
        &mut self,
        (entities, mut bumps, mut healths, battles, names, mut combat_log): Self::SystemData,
    ) {
        let name_of = |entity: Entity| {
            names
                .get(entity)
                .map(|n| n.0.clone())
                .unwrap_or_else(|| "something".to_string())
        };

        for bump in std::mem::take(&mut bumps.pending) {
            if !entities.is_alive(bump.attacker) || !entities.is_alive(bump.defender) {
                continue;
            }
            let (Some(attack), Some(counter)) = (
                battles.get(bump.attacker).cloned(),
                battles.get(bump.defender).cloned(),
            ) else {
                continue;
            };

            let defender_alive = strike(&mut healths, bump.defender, &attack);
            combat_log.push(format!(
                "{} hits {} for {}",
                name_of(bump.attacker),
                name_of(bump.defender),
                blow(&attack)
            ));
            if !defender_alive {
                combat_log.push(format!("{} is destroyed", name_of(bump.defender)));
                if !names.get(bump.defender).is_some_and(|n| n.0 == PLAYER_NAME) {
                    let _ = entities.delete(bump.defender);
                }
                continue;
            }

            let attacker_alive = strike(&mut healths, bump.attacker, &counter);
            combat_log.push(format!(
                "{} hits {} for {}",
                name_of(bump.defender),
                name_of(bump.attacker),
                blow(&counter)
            ));
            if !attacker_alive {
                combat_log.push(format!("{} is destroyed", name_of(bump.attacker)));
                if !names.get(bump.attacker).is_some_and(|n| n.0 == PLAYER_NAME) {
                    let _ = entities.delete(bump.attacker);
                }
            }
        }
    }
}

fn blow(battle: &Battle) -> i32 {
    battle.strength.max(0) * battle.speed.max(1)
}

/// Applies one exchange to `target` and reports whether it is still standing.
fn strike(healths: &mut WriteStorage<'_, Health>, target: Entity, attack: &Battle) -> bool {
    match healths.get_mut(target) {
        Some(health) => {
            health.current = (health.current - blow(attack)).max(0);
            health.is_alive()
        }
        None => true,
    }
}
