pub mod dungeon;

use std::{fs, path::Path};

use bracket_terminal::prelude::RGB;
use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::{Map, Value};

use crate::{
    data::{Catalog, monsters::MonsterKind},
    ecs::{
        components::{
            ComponentKind, Display, Input, Interaction, deserialize_optional_rgb, deserialize_rgb,
        },
        entity::{ComponentValue, Entity},
    },
    error::{EngineError, EngineResult},
};

/// Floor index: 0 is the town, anything above is a dungeon level.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FloorId(pub u32);

impl FloorId {
    pub const TOWN: FloorId = FloorId(0);

    pub fn is_town(&self) -> bool {
        self.0 == 0
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NpcDef {
    pub x: i32,
    pub y: i32,
    #[serde(deserialize_with = "deserialize_rgb")]
    pub color: RGB,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StairsDef {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub direction: Option<String>,
}

impl StairsDef {
    /// Only an explicit "up" (any case) leads up; everything else leads down.
    pub fn is_up(&self) -> bool {
        self.direction
            .as_deref()
            .is_some_and(|direction| direction.eq_ignore_ascii_case("up"))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonsterSpec {
    pub kind: String,
    pub x: i32,
    pub y: i32,
    pub color: Option<RGB>,
}

/// Entities placed by the map author rather than derived from map features.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthoredEntity {
    /// Inserted exactly as written.
    Fixed(Entity),
    /// Stats are rolled when the factory builds the floor.
    Monster(MonsterSpec),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapDefinition {
    pub label: String,
    pub width: i32,
    pub height: i32,
    pub perimeter: bool,
    pub start_x: Option<i32>,
    pub start_y: Option<i32>,
    pub walls: Vec<(i32, i32)>,
    pub npcs: Vec<NpcDef>,
    pub stairs: Vec<StairsDef>,
    pub entities: Vec<AuthoredEntity>,
    /// Stamped by the controller when the map is installed.
    pub floor: FloorId,
}

impl MapDefinition {
    pub fn new<S: Into<String>>(label: S, width: i32, height: i32) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            perimeter: false,
            start_x: None,
            start_y: None,
            walls: Vec::new(),
            npcs: Vec::new(),
            stairs: Vec::new(),
            entities: Vec::new(),
            floor: FloorId::TOWN,
        }
    }
}

#[derive(Deserialize)]
struct MapFile {
    width: i32,
    height: i32,
    #[serde(default)]
    perimeter: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_lenient_int")]
    start_x: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_lenient_int")]
    start_y: Option<i32>,
    #[serde(default)]
    walls: Option<Vec<(i32, i32)>>,
    #[serde(default)]
    npcs: Option<Vec<NpcDef>>,
    #[serde(default, deserialize_with = "deserialize_one_or_many")]
    stairs: Vec<StairsDef>,
    #[serde(default)]
    entities: Option<Vec<Map<String, Value>>>,
}

pub fn load_map(path: &Path, catalog: &Catalog) -> EngineResult<MapDefinition> {
    if !path.exists() {
        return Err(EngineError::config(path, "map file seems to be missing"));
    }
    let text = fs::read_to_string(path).map_err(|err| EngineError::config(path, err.to_string()))?;
    let file: MapFile =
        serde_json::from_str(&text).map_err(|err| EngineError::config(path, err.to_string()))?;

    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut entities = Vec::new();
    for (index, raw) in file.entities.unwrap_or_default().into_iter().enumerate() {
        let authored = authored_entity(raw, catalog).map_err(|reason| {
            EngineError::malformed_map(&label, format!("entity #{index}: {reason}"))
        })?;
        entities.push(authored);
    }

    Ok(MapDefinition {
        label,
        width: file.width,
        height: file.height,
        perimeter: file.perimeter.unwrap_or(false),
        start_x: file.start_x,
        start_y: file.start_y,
        walls: file.walls.unwrap_or_default(),
        npcs: file.npcs.unwrap_or_default(),
        stairs: file.stairs,
        entities,
        floor: FloorId::TOWN,
    })
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MonsterEntry {
    monster: String,
    x: i32,
    y: i32,
    #[serde(default, deserialize_with = "deserialize_optional_rgb")]
    color: Option<RGB>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PrefabEntry {
    prefab: String,
    x: i32,
    y: i32,
}

fn authored_entity(raw: Map<String, Value>, catalog: &Catalog) -> Result<AuthoredEntity, String> {
    if raw.contains_key("monster") {
        let entry: MonsterEntry =
            serde_json::from_value(Value::Object(raw)).map_err(|err| err.to_string())?;
        MonsterKind::from_name(&entry.monster).map_err(|err| err.to_string())?;
        return Ok(AuthoredEntity::Monster(MonsterSpec {
            kind: entry.monster,
            x: entry.x,
            y: entry.y,
            color: entry.color,
        }));
    }

    if raw.contains_key("prefab") {
        let entry: PrefabEntry =
            serde_json::from_value(Value::Object(raw)).map_err(|err| err.to_string())?;
        let mut entity = catalog
            .prefabs
            .get(&entry.prefab)
            .cloned()
            .ok_or_else(|| format!("unknown prefab `{}`", entry.prefab))?;
        let display = entity
            .get_mut::<Display>()
            .map_err(|_| format!("prefab `{}` has nothing to display", entry.prefab))?;
        display.x = entry.x;
        display.y = entry.y;
        return Ok(AuthoredEntity::Fixed(entity));
    }

    let entity = entity_from_components(raw)?;
    if let Some(Input {
        interaction: Interaction::Custom(id),
    }) = entity.try_get::<Input>()
    {
        if !catalog.interactions.contains(id) {
            return Err(format!("unknown interaction `{id}`"));
        }
    }
    Ok(AuthoredEntity::Fixed(entity))
}

/// Builds an entity from a `{ kind: value }` object, rejecting unknown kinds.
pub fn entity_from_components(raw: Map<String, Value>) -> Result<Entity, String> {
    let mut values = Vec::with_capacity(raw.len());
    for (key, value) in raw {
        let kind =
            ComponentKind::parse(&key).ok_or_else(|| format!("unknown component type `{key}`"))?;
        let parsed = match kind {
            ComponentKind::Display => serde_json::from_value(value).map(ComponentValue::Display),
            ComponentKind::Input => serde_json::from_value(value).map(ComponentValue::Input),
            ComponentKind::Health => serde_json::from_value(value).map(ComponentValue::Health),
            ComponentKind::Battle => serde_json::from_value(value).map(ComponentValue::Battle),
            ComponentKind::Solid => serde_json::from_value(value).map(ComponentValue::Solid),
            ComponentKind::Name => serde_json::from_value(value).map(ComponentValue::Name),
        };
        values.push(parsed.map_err(|err| format!("bad {kind} component: {err}"))?);
    }
    Ok(Entity::from_components(values))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntLike {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Coordinates may be written as numbers or numeric strings.
fn deserialize_lenient_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntLike>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntLike::Int(value)) => i32::try_from(value)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("{value} is out of range for a coordinate"))),
        Some(IntLike::Float(value)) => {
            if value.is_finite() && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
                Ok(Some(value.trunc() as i32))
            } else {
                Err(D::Error::custom(format!("{value} is not a coordinate")))
            }
        }
        Some(IntLike::Text(text)) => text
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("`{text}` is not a coordinate"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn deserialize_one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}
