use std::path::PathBuf;

use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::RGB;
use log::{error, info, warn};

use crate::{
    audio::{AudioManager, Cue},
    config::GameConfig,
    data::{GameDefinition, MAPS_DIR},
    ecs::{
        EcsWorld,
        components::{Battle, Effect, Health},
        factory,
        resources::MovementContext,
    },
    error::EngineResult,
    input::KeySource,
    map::{FloorId, MapDefinition, dungeon, load_map},
    render::Surface,
    systems::{BattleSystem, DisplaySystem, GameSystem, InputSystem},
};

const STATUS_ROW: i32 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Quit,
    PlayerDefeated,
}

/// Owns the installed map, the retained town and the live entity set, and
/// drives the frame loop over the systems.
pub struct Game {
    data_dir: PathBuf,
    definition: GameDefinition,
    town: MapDefinition,
    current_map: MapDefinition,
    ecs: EcsWorld,
    display: DisplaySystem,
    input: InputSystem,
    battle: BattleSystem,
    audio: AudioManager,
    rng: RandomNumberGenerator,
    generation: u64,
    status: Vec<String>,
}

impl Game {
    /// Loads the game and its town, then brings up rendering. Nothing is
    /// rendered if either file is missing or malformed.
    pub fn new<F>(
        config: &GameConfig,
        surface_factory: F,
        keys: Box<dyn KeySource>,
    ) -> EngineResult<Self>
    where
        F: FnOnce() -> EngineResult<Box<dyn Surface>>,
    {
        let definition = GameDefinition::load(&config.data_dir)?;
        let mut town = load_map(
            &definition.starting_map_path(&config.data_dir),
            &definition.catalog,
        )?;
        town.floor = FloorId::TOWN;

        let seed = config
            .seed
            .unwrap_or_else(|| RandomNumberGenerator::new().next_u64());
        info!("seeding rng with {seed}");
        let rng = RandomNumberGenerator::seeded(seed);

        let display = DisplaySystem::new(surface_factory()?);
        let input = InputSystem::new(keys, definition.catalog.interactions.clone());

        let mut game = Self {
            data_dir: config.data_dir.clone(),
            definition,
            current_map: town.clone(),
            town,
            ecs: EcsWorld::populate(Vec::new(), MovementContext::new(FloorId::TOWN, 0, 0), 0),
            display,
            input,
            battle: BattleSystem::new(),
            audio: AudioManager::new(),
            rng,
            generation: 0,
            status: Vec::new(),
        };

        let town = game.town.clone();
        if let Err(err) = game.change_map(town).and_then(|_| game.display.clear()) {
            error!("Termination by error: {err}");
            game.shutdown();
            return Err(err);
        }
        Ok(game)
    }

    pub fn run(&mut self) -> EngineResult<Termination> {
        let result = self.play();
        match &result {
            Ok(_) => info!("Normal termination"),
            Err(err) => error!("Termination by error: {err}"),
        }
        self.shutdown();
        result
    }

    fn play(&mut self) -> EngineResult<Termination> {
        self.audio.cue(Cue::Title);
        self.display.draw_text(
            35,
            10,
            &self.definition.name.to_uppercase(),
            RGB::from_u8(255, 0, 0),
        )?;
        self.display.draw_text(
            30,
            12,
            "Press any key to begin.",
            RGB::from_u8(255, 255, 255),
        )?;
        self.input.get_input()?;

        if let Some(story) = self.definition.story.clone() {
            self.display.clear()?;
            self.display
                .draw_text(0, 0, &story, RGB::from_u8(192, 192, 192))?;
            self.input.get_input()?;
        }

        self.display.fill_screen('.', RGB::from_u8(128, 128, 128))?;
        loop {
            self.display.draw(&self.ecs)?;
            self.draw_status()?;

            let outcome = self.input.get_and_process_input(&mut self.ecs)?;
            if outcome.action.is_quit() {
                return Ok(Termination::Quit);
            }

            self.status = self.battle.process(&mut self.ecs, &outcome.action)?;
            if self.player_defeated() {
                info!("Player defeated on floor {}", self.ecs.floor().0);
                return Ok(Termination::PlayerDefeated);
            }

            self.apply_effects(outcome.effects)?;
        }
    }

    fn draw_status(&mut self) -> EngineResult<()> {
        if self.status.is_empty() {
            return Ok(());
        }
        let line = self.status.join("; ");
        self.display
            .draw_text(0, STATUS_ROW, &line, RGB::from_u8(255, 255, 255))
    }

    fn player_defeated(&self) -> bool {
        self.ecs
            .player_component::<Health>()
            .is_ok_and(|health| !health.is_alive())
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) -> EngineResult<()> {
        let mut floor_change = None;
        for effect in effects {
            match effect {
                Effect::ChangeFloor(delta) if floor_change.is_none() => floor_change = Some(delta),
                Effect::ChangeFloor(delta) => warn!("ignoring extra floor change {delta:+}"),
                Effect::Message(text) => {
                    info!("{text}");
                    self.status.push(text);
                }
            }
        }
        match floor_change {
            Some(delta) => self.change_floor(delta),
            None => Ok(()),
        }
    }

    /// Moves `delta` floors from the current one. Anything at or above
    /// ground level is the retained town.
    pub fn change_floor(&mut self, delta: i32) -> EngineResult<()> {
        let floor = FloorId((self.current_map.floor.0 as i32 + delta).max(0) as u32);
        let mut map = if floor.is_town() {
            self.town.clone()
        } else {
            self.resolve_floor(floor)?
        };
        map.floor = floor;
        self.audio.cue(Cue::Stairs);
        self.change_map(map)
    }

    fn resolve_floor(&mut self, floor: FloorId) -> EngineResult<MapDefinition> {
        let path = self
            .data_dir
            .join(MAPS_DIR)
            .join(format!("floor_{}.json", floor.0));
        if path.exists() {
            load_map(&path, &self.definition.catalog)
        } else {
            Ok(dungeon::generate_floor(floor, &mut self.rng))
        }
    }

    /// Rebuilds the entity set for `map` and hands it to every system. The
    /// new set is complete before any system sees it.
    fn change_map(&mut self, map: MapDefinition) -> EngineResult<()> {
        let carried = self
            .ecs
            .player_component::<Health>()
            .and_then(|health| Ok((health, self.ecs.player_component::<Battle>()?)))
            .ok();

        let mut entities = factory::build_entities(&map, &mut self.rng)?;
        if let (Some((health, battle)), Some(player)) = (carried, entities.last_mut()) {
            *player = player.clone().with(health).with(battle);
        }

        self.generation += 1;
        let context = MovementContext::new(map.floor, map.width, map.height);
        self.ecs = EcsWorld::populate(entities, context, self.generation);
        info!(
            "installed {} (floor {}) with {} entities",
            map.label,
            map.floor.0,
            self.ecs.len()
        );
        self.current_map = map;

        let systems: [&mut dyn GameSystem; 3] =
            [&mut self.input, &mut self.battle, &mut self.display];
        for system in systems {
            system.init(&self.ecs);
        }

        self.status.clear();
        self.display.fill_screen('.', RGB::from_u8(128, 128, 128))
    }

    /// Best-effort teardown of every system.
    fn shutdown(&mut self) {
        let systems: [&mut dyn GameSystem; 3] =
            [&mut self.input, &mut self.battle, &mut self.display];
        for system in systems {
            if let Err(err) = system.destroy() {
                warn!("{} system failed to shut down: {err}", system.name());
            }
        }
    }

    pub fn current_map(&self) -> &MapDefinition {
        &self.current_map
    }
}

#[cfg(test)]
impl Game {
    pub fn town(&self) -> &MapDefinition {
        &self.town
    }

    pub fn ecs(&self) -> &EcsWorld {
        &self.ecs
    }

    pub fn surface(&self) -> &dyn Surface {
        self.display.surface()
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, fs, path::Path, rc::Rc};

    use bracket_geometry::prelude::Point;
    use specs::prelude::WorldExt;

    use super::*;
    use crate::{
        error::EngineError,
        input::KeyCode,
        render::{self, BufferSurface, SCREEN_HEIGHT, SCREEN_WIDTH},
        scripted_input::ScriptedInput,
    };

    const TOWN: &str = r#"{
        "width": 20, "height": 10, "perimeter": true,
        "start_x": 5, "start_y": 5,
        "stairs": { "x": 6, "y": 5 },
        "npcs": [ { "x": 2, "y": 2, "color": { "r": 0, "g": 0, "b": 255 } } ]
    }"#;

    fn data_dir(game: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("game.json"), game).unwrap();
        fs::create_dir(dir.path().join("maps")).unwrap();
        fs::write(dir.path().join("maps").join("town.json"), TOWN).unwrap();
        dir
    }

    fn config(dir: &Path) -> GameConfig {
        GameConfig {
            data_dir: dir.to_path_buf(),
            seed: Some(77),
            ..GameConfig::default()
        }
    }

    fn start(dir: &Path, keys: Vec<KeyCode>) -> Game {
        Game::new(
            &config(dir),
            || Ok(Box::new(BufferSurface::new(SCREEN_WIDTH, SCREEN_HEIGHT)) as Box<dyn Surface>),
            Box::new(ScriptedInput::new(keys)),
        )
        .unwrap()
    }

    /// Buffer surface that counts how often it was torn down.
    struct CountingSurface {
        buffer: BufferSurface,
        destroyed: Rc<Cell<usize>>,
    }

    impl Surface for CountingSurface {
        fn size(&self) -> (i32, i32) {
            self.buffer.size()
        }

        fn clear(&mut self) {
            self.buffer.clear();
        }

        fn fill(&mut self, glyph: char, color: RGB) {
            self.buffer.fill(glyph, color);
        }

        fn set(&mut self, x: i32, y: i32, glyph: char, color: RGB) {
            self.buffer.set(x, y, glyph, color);
        }

        fn cell(&self, x: i32, y: i32) -> Option<render::Cell> {
            self.buffer.cell(x, y)
        }

        fn present(&mut self) -> EngineResult<()> {
            self.buffer.present()
        }

        fn destroy(&mut self) -> EngineResult<()> {
            self.destroyed.set(self.destroyed.get() + 1);
            Ok(())
        }
    }

    fn counted(dir: &Path, keys: Vec<KeyCode>, destroyed: &Rc<Cell<usize>>) -> EngineResult<Game> {
        let destroyed = Rc::clone(destroyed);
        Game::new(
            &config(dir),
            move || {
                Ok(Box::new(CountingSurface {
                    buffer: BufferSurface::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                    destroyed,
                }) as Box<dyn Surface>)
            },
            Box::new(ScriptedInput::new(keys)),
        )
    }

    #[test]
    fn quitting_tears_the_surface_down_once() {
        let dir = data_dir(r#"{ "name": "Crawl", "starting_map": "town.json" }"#);
        let destroyed = Rc::new(Cell::new(0));
        let mut game = counted(dir.path(), vec![KeyCode::Enter, KeyCode::Esc], &destroyed).unwrap();
        assert_eq!(destroyed.get(), 0);
        assert_eq!(game.run().unwrap(), Termination::Quit);
        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn an_error_tears_the_surface_down_before_returning() {
        let dir = data_dir(r#"{ "name": "Crawl", "starting_map": "town.json" }"#);
        let destroyed = Rc::new(Cell::new(0));
        let mut game = counted(dir.path(), vec![KeyCode::Enter], &destroyed).unwrap();
        assert!(matches!(game.run(), Err(EngineError::InputExhausted)));
        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn failed_startup_tears_the_surface_down() {
        let dir = data_dir(r#"{ "name": "Crawl", "starting_map": "town.json" }"#);
        fs::write(
            dir.path().join("maps").join("town.json"),
            r#"{ "width": 8, "height": 8, "start_x": 1 }"#,
        )
        .unwrap();
        let destroyed = Rc::new(Cell::new(0));
        let result = counted(dir.path(), Vec::new(), &destroyed);
        assert!(matches!(result, Err(EngineError::MalformedMap { .. })));
        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn title_then_escape_ends_normally() {
        let dir = data_dir(r#"{ "name": "Crawl", "starting_map": "town.json" }"#);
        let mut game = start(dir.path(), vec![KeyCode::Char(' '), KeyCode::Esc]);
        assert_eq!(game.run().unwrap(), Termination::Quit);
        assert!(game.current_map().floor.is_town());
        assert_eq!(game.surface().row_text(0).chars().next(), Some('#'));
    }

    #[test]
    fn story_waits_for_its_own_key() {
        let dir = data_dir(
            r#"{ "name": "Crawl", "starting_map": "town.json", "story": "Once upon a time" }"#,
        );
        let mut game = start(dir.path(), vec![KeyCode::Enter, KeyCode::Enter, KeyCode::Char('q')]);
        assert_eq!(game.run().unwrap(), Termination::Quit);
    }

    #[test]
    fn missing_starting_map_fails_before_rendering() {
        let dir = data_dir(r#"{ "name": "Crawl" }"#);
        let rendered = Cell::new(false);
        let result = Game::new(
            &config(dir.path()),
            || {
                rendered.set(true);
                Ok(Box::new(BufferSurface::new(4, 4)) as Box<dyn Surface>)
            },
            Box::new(ScriptedInput::new([])),
        );
        assert!(matches!(result, Err(EngineError::Config { .. })));
        assert!(!rendered.get());
    }

    #[test]
    fn running_out_of_input_is_reported_as_an_error() {
        let dir = data_dir(r#"{ "name": "Crawl", "starting_map": "town.json" }"#);
        let mut game = start(dir.path(), vec![KeyCode::Char(' ')]);
        assert!(matches!(game.run(), Err(EngineError::InputExhausted)));
    }

    #[test]
    fn stairs_lead_down_and_back_to_the_retained_town() {
        let dir = data_dir(r#"{ "name": "Crawl", "starting_map": "town.json" }"#);
        let mut game = start(dir.path(), vec![]);
        let town_entities = game.ecs().len();

        game.change_floor(1).unwrap();
        assert_eq!(game.current_map().floor, FloorId(1));
        assert_eq!(game.current_map().width, dungeon::DUNGEON_WIDTH);
        assert_eq!(game.ecs().generation(), 2);
        assert_eq!(game.ecs().floor(), FloorId(1));

        game.change_floor(-5).unwrap();
        assert_eq!(game.current_map(), game.town());
        assert_eq!(game.ecs().len(), town_entities);
        assert_eq!(game.ecs().player_point(), Some(Point::new(5, 5)));
        assert_eq!(game.audio().played(), &[Cue::Stairs, Cue::Stairs]);
    }

    #[test]
    fn pressing_down_stairs_in_the_loop_changes_floor() {
        let dir = data_dir(r#"{ "name": "Crawl", "starting_map": "town.json" }"#);
        let mut game = start(
            dir.path(),
            vec![KeyCode::Char(' '), KeyCode::Char('>'), KeyCode::Char('q')],
        );
        assert_eq!(game.run().unwrap(), Termination::Quit);
        assert_eq!(game.current_map().floor, FloorId(1));
    }

    #[test]
    fn authored_floor_files_win_over_generation() {
        let dir = data_dir(r#"{ "name": "Crawl", "starting_map": "town.json" }"#);
        fs::write(
            dir.path().join("maps").join("floor_1.json"),
            r#"{ "width": 8, "height": 8, "start_x": 1, "start_y": 1,
                 "stairs": { "x": 1, "y": 2, "direction": "up" } }"#,
        )
        .unwrap();
        let mut game = start(dir.path(), vec![]);
        game.change_floor(1).unwrap();
        assert_eq!(game.current_map().label, "floor_1.json");
        assert_eq!(game.current_map().floor, FloorId(1));
    }

    #[test]
    fn player_health_survives_map_changes() {
        let dir = data_dir(r#"{ "name": "Crawl", "starting_map": "town.json" }"#);
        let mut game = start(dir.path(), vec![]);
        {
            let player = game.ecs.player_entity().unwrap();
            let mut healths = game.ecs.specs().write_storage::<Health>();
            healths.get_mut(player).unwrap().current = 7;
        }
        game.change_floor(1).unwrap();
        let health = game.ecs().player_component::<Health>().unwrap();
        assert_eq!(health.current, 7);
        assert_eq!(health.max, factory::PLAYER_HEALTH);
    }

    #[test]
    fn map_without_start_is_fatal_at_startup() {
        let dir = data_dir(r#"{ "name": "Crawl", "starting_map": "town.json" }"#);
        fs::write(
            dir.path().join("maps").join("town.json"),
            r#"{ "width": 8, "height": 8 }"#,
        )
        .unwrap();
        let result = Game::new(
            &config(dir.path()),
            || Ok(Box::new(BufferSurface::new(4, 4)) as Box<dyn Surface>),
            Box::new(ScriptedInput::new([])),
        );
        assert!(matches!(result, Err(EngineError::MalformedMap { .. })));
    }
}
