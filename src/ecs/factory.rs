//! Turns a map definition into the ordered entity sequence for that map.
//!
//! Order matters: the display pass paints in sequence order, so later
//! entities cover earlier ones. The player always comes last.

use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::RGB;

use crate::{
    data::monsters::build_monster,
    error::{EngineError, EngineResult},
    map::{AuthoredEntity, MapDefinition, NpcDef, StairsDef},
};

use super::{
    PLAYER_NAME,
    components::{Battle, Display, Health, Input, Interaction, Name, Solid},
    entity::Entity,
};

pub const PLAYER_HEALTH: i32 = 30;
pub const PLAYER_STRENGTH: i32 = 4;
pub const PLAYER_SPEED: i32 = 1;

pub fn build_entities(
    map: &MapDefinition,
    rng: &mut RandomNumberGenerator,
) -> EngineResult<Vec<Entity>> {
    let (Some(start_x), Some(start_y)) = (map.start_x, map.start_y) else {
        return Err(EngineError::malformed_map(
            &map.label,
            "no start position (start_x/start_y)",
        ));
    };
    let player = player(start_x, start_y);

    let mut entities = Vec::new();
    if map.perimeter {
        perimeter_walls(map, &mut entities);
    }
    entities.extend(map.stairs.iter().map(stairs));
    entities.extend(map.npcs.iter().map(npc));

    let white = RGB::from_u8(255, 255, 255);
    entities.extend(map.walls.iter().map(|&(x, y)| wall(x, y, white)));

    for authored in &map.entities {
        let entity = match authored {
            AuthoredEntity::Fixed(entity) => entity.clone(),
            AuthoredEntity::Monster(monster) => {
                build_monster(monster.x, monster.y, &monster.kind, monster.color, rng)
                    .map_err(|err| EngineError::malformed_map(&map.label, err.to_string()))?
            }
        };
        entities.push(entity);
    }

    entities.push(player);
    Ok(entities)
}

pub fn player(x: i32, y: i32) -> Entity {
    Entity::new()
        .with(Name(PLAYER_NAME.to_string()))
        .with(Display::new(x, y, '@', RGB::from_u8(255, 192, 32)))
        .with(Health::full(PLAYER_HEALTH))
        .with(Battle {
            strength: PLAYER_STRENGTH,
            speed: PLAYER_SPEED,
        })
        .with(Solid(true))
}

/// Border rows run x in `0..=width` at y = 0 and y = height - 1; border columns
/// run y in `0..=height` at x = 0 and x = width - 1. Corners appear twice.
fn perimeter_walls(map: &MapDefinition, entities: &mut Vec<Entity>) {
    let grey = RGB::from_u8(192, 192, 192);
    for x in 0..=map.width {
        entities.push(wall(x, 0, grey));
        entities.push(wall(x, map.height - 1, grey));
    }
    for y in 0..=map.height {
        entities.push(wall(0, y, grey));
        entities.push(wall(map.width - 1, y, grey));
    }
}

fn wall(x: i32, y: i32, color: RGB) -> Entity {
    Entity::new()
        .with(Display::new(x, y, '#', color))
        .with(Solid(true))
}

fn stairs(def: &StairsDef) -> Entity {
    let (glyph, interaction) = if def.is_up() {
        ('<', Interaction::StairsUp)
    } else {
        ('>', Interaction::StairsDown)
    };
    Entity::new()
        .with(Display::new(def.x, def.y, glyph, RGB::from_u8(255, 255, 255)))
        .with(Input::new(interaction))
        .with(Solid(false))
}

fn npc(def: &NpcDef) -> Entity {
    Entity::new()
        .with(Display::new(def.x, def.y, '@', def.color))
        .with(Solid(true))
}
