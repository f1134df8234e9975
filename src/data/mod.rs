pub mod interactions;
pub mod monsters;

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    ecs::entity::Entity,
    error::{EngineError, EngineResult},
    map::entity_from_components,
};

use self::interactions::{CustomInteraction, InteractionTable};

pub const GAME_FILE: &str = "game.json";
pub const MAPS_DIR: &str = "maps";

/// Named things maps may refer to: entity prefabs and custom interactions.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub prefabs: BTreeMap<String, Entity>,
    pub interactions: InteractionTable,
}

#[derive(Deserialize)]
struct GameFile {
    name: String,
    starting_map: Option<String>,
    story: Option<String>,
    components: Option<BTreeMap<String, Map<String, Value>>>,
    interactions: Option<BTreeMap<String, CustomInteraction>>,
}

#[derive(Clone, Debug)]
pub struct GameDefinition {
    pub name: String,
    pub starting_map: String,
    pub story: Option<String>,
    pub catalog: Catalog,
}

impl GameDefinition {
    pub fn load(data_dir: &Path) -> EngineResult<Self> {
        let path = data_dir.join(GAME_FILE);
        let text =
            fs::read_to_string(&path).map_err(|err| EngineError::config(&path, err.to_string()))?;
        let file: GameFile =
            serde_json::from_str(&text).map_err(|err| EngineError::config(&path, err.to_string()))?;

        let starting_map = file.starting_map.ok_or_else(|| {
            EngineError::config(
                &path,
                "game definition is missing a starting map (\"starting_map\" property); please tell it which map to start on",
            )
        })?;

        let mut catalog = Catalog::default();
        for (id, components) in file.components.unwrap_or_default() {
            let prefab = entity_from_components(components)
                .map_err(|reason| EngineError::config(&path, format!("prefab `{id}`: {reason}")))?;
            catalog.prefabs.insert(id, prefab);
        }
        for (id, interaction) in file.interactions.unwrap_or_default() {
            catalog.interactions.register(id, interaction);
        }

        Ok(Self {
            name: file.name,
            starting_map,
            story: file.story,
            catalog,
        })
    }

    pub fn starting_map_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(MAPS_DIR).join(&self.starting_map)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::ecs::components::{ComponentKind, Effect, Interaction};
    use crate::input::Action;

    fn write_game(json: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(GAME_FILE), json).unwrap();
        dir
    }

    #[test]
    fn loads_name_story_and_catalog() {
        let dir = write_game(
            r#"{
                "name": "Crawl",
                "starting_map": "town.json",
                "story": "Long ago...",
                "components": {
                    "chest": { "display": { "glyph": "=", "color": { "r": 200, "g": 160, "b": 0 } }, "solid": true }
                },
                "interactions": {
                    "well": { "key": "x", "effect": { "message": "You drink." } }
                }
            }"#,
        );
        let game = GameDefinition::load(dir.path()).unwrap();
        assert_eq!(game.name, "Crawl");
        assert_eq!(game.story.as_deref(), Some("Long ago..."));
        assert_eq!(
            game.starting_map_path(dir.path()),
            dir.path().join("maps").join("town.json")
        );
        let chest = &game.catalog.prefabs["chest"];
        assert_eq!(
            chest.kinds(),
            vec![ComponentKind::Display, ComponentKind::Solid]
        );
        assert_eq!(
            game.catalog
                .interactions
                .react(&Interaction::Custom("well".to_string()), &Action::Char('x')),
            Some(Effect::Message("You drink.".to_string()))
        );
    }

    #[test]
    fn missing_starting_map_is_a_config_error() {
        let dir = write_game(r#"{ "name": "Crawl" }"#);
        match GameDefinition::load(dir.path()) {
            Err(EngineError::Config { path, reason }) => {
                assert_eq!(path, dir.path().join(GAME_FILE));
                assert!(reason.contains("starting_map"));
            }
            other => panic!("expected a config error, got {other:?}"),
        }
    }

    #[test]
    fn missing_game_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameDefinition::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains(GAME_FILE));
    }
}
