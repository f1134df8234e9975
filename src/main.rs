mod audio;
mod config;
mod data;
mod ecs;
mod error;
mod game;
mod input;
mod map;
mod render;
mod scripted_input;
mod systems;

use std::{fs::File, io::Write};

use anyhow::Context;
use log::info;

use config::GameConfig;
use game::{Game, Termination};
use input::{KeySource, TerminalKeys};
use render::{SCREEN_HEIGHT, SCREEN_WIDTH, Surface, terminal::TerminalSurface};
use scripted_input::ScriptedInput;

fn init_logging(config: &GameConfig) -> anyhow::Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("glyphcrawl=info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .context("logger already initialised")
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = GameConfig::from_env()?;
    init_logging(&config)?;
    info!("starting with data from {}", config.data_dir.display());

    let keys: Box<dyn KeySource> = match &config.script {
        Some(path) => {
            let script = ScriptedInput::from_file(path)?;
            info!("replaying {} keys from {}", script.remaining(), path.display());
            Box::new(script)
        }
        None => Box::new(TerminalKeys),
    };

    let mut game = Game::new(
        &config,
        || Ok(Box::new(TerminalSurface::new(SCREEN_WIDTH, SCREEN_HEIGHT)?) as Box<dyn Surface>),
        keys,
    )?;
    let termination = game.run()?;
    info!("run ended on {}", game.current_map().label);
    match termination {
        Termination::Quit => {}
        Termination::PlayerDefeated => println!("You were defeated."),
    }
    Ok(())
}
