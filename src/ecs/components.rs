use std::fmt;

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::RGB;
use serde::{Deserialize, Deserializer};
use specs::prelude::{Component, VecStorage};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Display,
    Input,
    Health,
    Battle,
    Solid,
    Name,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Display,
        ComponentKind::Input,
        ComponentKind::Health,
        ComponentKind::Battle,
        ComponentKind::Solid,
        ComponentKind::Name,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Display => "display",
            ComponentKind::Input => "input",
            ComponentKind::Health => "health",
            ComponentKind::Battle => "battle",
            ComponentKind::Solid => "solid",
            ComponentKind::Name => "name",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == key)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Display {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    pub glyph: char,
    #[serde(deserialize_with = "deserialize_rgb")]
    pub color: RGB,
}

impl Display {
    pub fn new(x: i32, y: i32, glyph: char, color: RGB) -> Self {
        Self { x, y, glyph, color }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl Component for Display {
    type Storage = VecStorage<Self>;
}

/// Closed set of things an entity can do when the player acts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    /// Leads toward the town (floor - 1).
    StairsUp,
    /// Leads deeper (floor + 1).
    StairsDown,
    /// Looked up by id in the game's interaction table.
    Custom(String),
}

/// What an interaction asks the controller to do.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    ChangeFloor(i32),
    Message(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Input {
    pub interaction: Interaction,
}

impl Input {
    pub fn new(interaction: Interaction) -> Self {
        Self { interaction }
    }
}

impl Component for Input {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }
}

impl Component for Health {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Battle {
    pub strength: i32,
    pub speed: i32,
}

impl Component for Battle {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Solid(pub bool);

impl Component for Solid {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Name(pub String);

impl Component for Name {
    type Storage = VecStorage<Self>;
}

/// Pending single-tile step for an entity, consumed by the movement pass.
#[derive(Clone, Debug)]
pub struct IntentStep {
    pub delta: Point,
}

impl Component for IntentStep {
    type Storage = VecStorage<Self>;
}

#[derive(Deserialize)]
struct ColorDef {
    r: u8,
    g: u8,
    b: u8,
}

/// Colors are authored as `{ "r": .., "g": .., "b": .. }` with byte channels.
pub fn deserialize_rgb<'de, D>(deserializer: D) -> Result<RGB, D::Error>
where
    D: Deserializer<'de>,
{
    let def = ColorDef::deserialize(deserializer)?;
    Ok(RGB::from_u8(def.r, def.g, def.b))
}

pub fn deserialize_optional_rgb<'de, D>(deserializer: D) -> Result<Option<RGB>, D::Error>
where
    D: Deserializer<'de>,
{
    let def = Option::<ColorDef>::deserialize(deserializer)?;
    Ok(def.map(|def| RGB::from_u8(def.r, def.g, def.b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_their_keys() {
        for kind in ComponentKind::ALL {
            assert_eq!(ComponentKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ComponentKind::parse("velocity"), None);
    }

    #[test]
    fn display_reads_byte_colors() {
        let display: Display = serde_json::from_str(
            r#"{ "x": 3, "y": 4, "glyph": "$", "color": { "r": 255, "g": 0, "b": 0 } }"#,
        )
        .unwrap();
        assert_eq!(display.point(), Point::new(3, 4));
        assert_eq!(display.glyph, '$');
        assert_eq!(display.color, RGB::from_u8(255, 0, 0));
    }

    #[test]
    fn interactions_and_effects_use_snake_case_tags() {
        let input: Input = serde_json::from_str(r#""stairs_down""#).unwrap();
        assert_eq!(input.interaction, Interaction::StairsDown);

        let input: Input = serde_json::from_str(r#"{ "custom": "lever" }"#).unwrap();
        assert_eq!(input.interaction, Interaction::Custom("lever".to_string()));

        let effect: Effect = serde_json::from_str(r#"{ "change_floor": 2 }"#).unwrap();
        assert_eq!(effect, Effect::ChangeFloor(2));
    }
}
