use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::RGB;

use crate::{
    ecs::{
        components::{Battle, Display, Health, Name, Solid},
        entity::Entity,
    },
    error::{EngineError, EngineResult},
};

/// The monsters the engine knows how to build. Closed on purpose: maps can
/// only name one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonsterKind {
    Drone,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 1] = [MonsterKind::Drone];

    pub fn name(&self) -> &'static str {
        match self {
            MonsterKind::Drone => "drone",
        }
    }

    pub fn from_name(name: &str) -> EngineResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| EngineError::UnknownMonsterType(name.to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct MonsterTemplate {
    pub kind: MonsterKind,
    pub color: RGB,
    pub health: i32,
    pub health_jitter: i32,
    pub strength: i32,
    pub strength_jitter: i32,
    pub speed: i32,
}

impl MonsterTemplate {
    pub fn for_kind(kind: MonsterKind) -> Self {
        match kind {
            MonsterKind::Drone => Self::new(kind, RGB::from_u8(0, 255, 0), 15, 5, 2, 1, 1),
        }
    }

    fn new(
        kind: MonsterKind,
        color: RGB,
        health: i32,
        health_jitter: i32,
        strength: i32,
        strength_jitter: i32,
        speed: i32,
    ) -> Self {
        Self {
            kind,
            color,
            health,
            health_jitter,
            strength,
            strength_jitter,
            speed,
        }
    }

    pub fn glyph(&self) -> char {
        self.kind.name().chars().next().unwrap_or('?')
    }

    /// Rolls stats for one monster. `color` overrides the template's default.
    pub fn spawn(
        &self,
        x: i32,
        y: i32,
        color: Option<RGB>,
        rng: &mut RandomNumberGenerator,
    ) -> Entity {
        let health = self.health + roll(rng, self.health_jitter);
        let strength = self.strength + roll(rng, self.strength_jitter);
        Entity::new()
            .with(Display::new(x, y, self.glyph(), color.unwrap_or(self.color)))
            .with(Health::full(health))
            .with(Battle {
                strength,
                speed: self.speed,
            })
            .with(Name(self.kind.name().to_string()))
            .with(Solid(true))
    }
}

/// Uniform roll in `[0, jitter)`; no jitter means no roll.
fn roll(rng: &mut RandomNumberGenerator, jitter: i32) -> i32 {
    if jitter <= 0 { 0 } else { rng.range(0, jitter) }
}

pub fn build_monster(
    x: i32,
    y: i32,
    type_name: &str,
    color: Option<RGB>,
    rng: &mut RandomNumberGenerator,
) -> EngineResult<Entity> {
    let kind = MonsterKind::from_name(type_name)?;
    Ok(MonsterTemplate::for_kind(kind).spawn(x, y, color, rng))
}
