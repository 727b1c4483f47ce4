mod config;
mod menu;
mod offline;
mod state;
mod terminal_ui;

use std::path::PathBuf;

use clap::Parser;
use common::games::SessionRng;
use common::games::tictactoe::{
    Difficulty, FileScoreStore, GameMode, MatchController, MatchSettings, MemoryScoreStore,
    ScoreStore,
};
use common::{log, logger};
use tokio::io::{AsyncBufReadExt, BufReader};

use config::{Config, LoadedConfig, get_config_manager, load_config};
use menu::{SetupDefaults, SetupOverrides};
use offline::{MatchExit, run_match};
use terminal_ui::{TerminalAudio, TerminalPresenter};

#[derive(Parser)]
#[command(name = "tictactoe", about = "Tic-tac-toe against a friend or the computer")]
struct Args {
    /// hvh or hva; skips the mode menu for the first match
    #[arg(long)]
    mode: Option<GameMode>,
    /// easy, medium or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,
    #[arg(long)]
    name_x: Option<String>,
    #[arg(long)]
    name_o: Option<String>,
    /// Seed for reproducible computer play
    #[arg(long)]
    seed: Option<u64>,
    /// Keep scores in memory only
    #[arg(long)]
    no_persist: bool,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    use_log_prefix: bool,
    #[arg(long)]
    verbose: bool,
}

fn remember_match(config: &mut Config, settings: &MatchSettings) {
    config.last_mode = Some(settings.mode);
    match settings.mode {
        GameMode::HumanVsHuman => {
            config.names.name_x = settings.name_x.clone();
            config.names.name_o = settings.name_o.clone();
        }
        GameMode::HumanVsComputer => {
            config.names.solo = settings.name_x.clone();
            config.difficulty = settings.difficulty;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Client".to_string())
    } else {
        None
    };
    logger::init_logger(prefix, args.verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(args))
}

async fn run(mut args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config_manager = get_config_manager(args.config.as_deref());
    let LoadedConfig {
        mut config,
        writable: config_writable,
    } = load_config(&config_manager);

    let mut store: Box<dyn ScoreStore> = if args.no_persist || !config.scores.persist {
        Box::new(MemoryScoreStore::new())
    } else {
        let path = config.scores_path();
        log!("Scores are kept in {}", path.display());
        Box::new(FileScoreStore::from_yaml_file(path))
    };

    let overrides = SetupOverrides {
        name_x: args.name_x.take(),
        name_o: args.name_o.take(),
        difficulty: args.difficulty,
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut match_index: u64 = 0;

    loop {
        let mode = match args.mode.take() {
            Some(mode) => mode,
            None => match menu::select_mode(&mut lines, config.last_mode).await? {
                Some(mode) => mode,
                None => break,
            },
        };

        let defaults = SetupDefaults {
            name_x: config.names.name_x.clone(),
            name_o: config.names.name_o.clone(),
            solo: config.names.solo.clone(),
            difficulty: config.difficulty,
        };
        let Some(settings) = menu::setup_match(&mut lines, mode, &defaults, &overrides).await?
        else {
            break;
        };

        remember_match(&mut config, &settings);
        if config_writable && let Err(e) = config_manager.set_config(&config) {
            log!("Failed to save config: {}", e);
        }

        let rng = match args.seed {
            Some(seed) => SessionRng::new(seed.wrapping_add(match_index)),
            None => SessionRng::from_random(),
        };
        match_index += 1;

        let observer = (TerminalPresenter::new(), TerminalAudio::new(config.sound));
        let mut controller = MatchController::new(settings, config.thinking, rng, store, observer);
        let exit = run_match(&mut controller, &mut lines).await?;
        store = controller.into_store();

        if exit == MatchExit::Quit {
            break;
        }
    }

    println!("Bye!");
    Ok(())
}
