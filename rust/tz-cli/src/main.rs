//! tenzies: CLI binary for the Tenzies dice game.
//!
//! Subcommands:
//! - play
//! - best
//! - sim

use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use tz_core::autoplay::play_game;
use tz_core::{BestScoreStore, Config, FileStore, GameController, MemoryStore, RngDice};
use tz_tui::{App, EventSink};

fn print_help() {
    eprintln!(
        r#"tenzies - roll until all ten dice match

USAGE:
    tenzies <COMMAND> [OPTIONS]

COMMANDS:
    play     Play in the terminal
    best     Show (or clear) the stored best score
    sim      Play games with the auto-player and report roll counts

OPTIONS:
    -h, --help       Print help
    -V, --version    Print version
"#
    );
}

fn print_version() {
    println!("tenzies {}", env!("CARGO_PKG_VERSION"));
}

fn take_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    if i + 1 >= args.len() {
        eprintln!("Missing value for {flag}");
        process::exit(1);
    }
    &args[i + 1]
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    let raw = take_value(args, i, flag);
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {flag} value: {raw}");
        process::exit(1);
    })
}

fn load_config(path: Option<&PathBuf>) -> (Config, Option<String>) {
    let Some(path) = path else {
        let cfg = Config::default();
        let hash = cfg
            .to_yaml()
            .ok()
            .map(|s| tz_logging::hash_config_bytes(s.as_bytes()));
        return (cfg, hash);
    };
    let bytes = std::fs::read(path).unwrap_or_else(|e| {
        eprintln!("Failed to read config {}: {e}", path.display());
        process::exit(1);
    });
    let text = std::str::from_utf8(&bytes).unwrap_or_else(|e| {
        eprintln!("Failed to load config {}: not valid UTF-8: {e}", path.display());
        process::exit(1);
    });
    let cfg = Config::from_yaml(text).unwrap_or_else(|e| {
        eprintln!("Failed to load config {}: {e}", path.display());
        process::exit(1);
    });
    (cfg, Some(tz_logging::hash_config_bytes(&bytes)))
}

fn cmd_play(args: &[String]) {
    let mut config_path: Option<PathBuf> = None;
    let mut seed: Option<u64> = None;
    let mut no_persist = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"tenzies play

USAGE:
    tenzies play [--config PATH] [--seed S] [--no-persist]

OPTIONS:
    --config PATH    YAML config (default: built-in defaults)
    --seed S         Fixed dice seed (overrides rng.seed)
    --no-persist     Keep the best score in memory only

KEYS:
    1-9, 0       hold/release die 1..10
    left/right   move cursor, h or Enter to hold
    space, r     roll / new game
    q, Esc       quit
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(PathBuf::from(take_value(args, i, "--config")));
                i += 2;
            }
            "--seed" => {
                seed = Some(parse_value(args, i, "--seed"));
                i += 2;
            }
            "--no-persist" => {
                no_persist = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown option for `tenzies play`: {}", other);
                eprintln!("Run `tenzies play --help` for usage.");
                process::exit(1);
            }
        }
    }

    let (mut cfg, config_hash) = load_config(config_path.as_ref());
    if seed.is_some() {
        cfg.rng.seed = seed;
    }
    if no_persist {
        cfg.store.persist = false;
    }

    let source = match cfg.rng.seed {
        Some(s) => RngDice::seeded(s),
        None => RngDice::from_entropy(),
    };
    let store: Box<dyn BestScoreStore> = if cfg.store.persist {
        Box::new(FileStore::new(&cfg.store.path))
    } else {
        Box::new(MemoryStore::new())
    };
    let game = GameController::new(source, store, cfg.timer.period());

    let sink = match &cfg.logging.events_path {
        None => None,
        Some(path) => {
            let opened = EventSink::open(
                path,
                cfg.logging.flush_every_lines,
                tz_logging::new_session_id(),
            )
            .and_then(|mut s| {
                s.session_start(cfg.rng.seed, config_hash.clone(), game.best())?;
                Ok(s)
            });
            match opened {
                Ok(s) => Some(s),
                Err(e) => {
                    eprintln!("Failed to open event log {}: {e}", path.display());
                    process::exit(1);
                }
            }
        }
    };

    let mut app = App::new(game, sink);
    if let Err(e) = tz_tui::run(&mut app, Duration::from_millis(cfg.tui.poll_ms)) {
        eprintln!("Terminal error: {e}");
        process::exit(1);
    }

    let best = app.game.best();
    if let (Some(r), Some(t)) = (best.rolls, best.time) {
        println!("Best: {r} rolls in {t}s");
    }
}

fn cmd_best(args: &[String]) {
    let mut config_path: Option<PathBuf> = None;
    let mut clear = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"tenzies best

USAGE:
    tenzies best [--config PATH] [--clear]

OPTIONS:
    --config PATH    YAML config naming the store path
    --clear          Forget the stored best score
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(PathBuf::from(take_value(args, i, "--config")));
                i += 2;
            }
            "--clear" => {
                clear = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown option for `tenzies best`: {}", other);
                eprintln!("Run `tenzies best --help` for usage.");
                process::exit(1);
            }
        }
    }

    let (cfg, _) = load_config(config_path.as_ref());
    let mut store = FileStore::new(&cfg.store.path);
    if clear {
        if let Err(e) = store.clear() {
            eprintln!("Failed to clear {}: {e}", store.path().display());
            process::exit(1);
        }
        println!("Best score cleared.");
        return;
    }
    match store.load() {
        best if best.is_set() => println!(
            "Best: {} rolls in {}s",
            best.rolls.unwrap_or_default(),
            best.time.map_or_else(|| "?".to_string(), |t| t.to_string())
        ),
        _ => println!("Best: none"),
    }
}

fn cmd_sim(args: &[String]) {
    let mut games: usize = 1_000;
    let mut seed: u64 = 0;
    let mut max_rolls: u32 = 1_000;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"tenzies sim

USAGE:
    tenzies sim [--games N] [--seed S] [--max-rolls M]

OPTIONS:
    --games N        Number of games to simulate (default: 1000)
    --seed S         RNG seed (default: 0)
    --max-rolls M    Give up on a game after M rolls (default: 1000)
"#
                );
                return;
            }
            "--games" => {
                games = parse_value(args, i, "--games");
                i += 2;
            }
            "--seed" => {
                seed = parse_value(args, i, "--seed");
                i += 2;
            }
            "--max-rolls" => {
                max_rolls = parse_value(args, i, "--max-rolls");
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `tenzies sim`: {}", other);
                eprintln!("Run `tenzies sim --help` for usage.");
                process::exit(1);
            }
        }
    }
    if games == 0 {
        eprintln!("--games must be > 0");
        process::exit(1);
    }

    let mut src = RngDice::seeded(seed);
    let mut rolls: Vec<u32> = Vec::with_capacity(games);
    let mut won = 0usize;
    for _ in 0..games {
        let out = play_game(&mut src, max_rolls);
        if out.won {
            won += 1;
            rolls.push(out.rolls);
        }
    }

    println!("Games: {games}");
    println!("Won: {won}");
    if rolls.is_empty() {
        return;
    }
    rolls.sort_unstable();
    let mean = rolls.iter().map(|&r| r as f64).sum::<f64>() / rolls.len() as f64;
    println!("Mean rolls: {mean:.2}");
    println!("Median rolls: {}", rolls[rolls.len() / 2]);
    println!("Min rolls: {}", rolls[0]);
    println!("Max rolls: {}", rolls[rolls.len() - 1]);
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(0);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "play" => {
            cmd_play(&args[2..]);
        }
        "best" => {
            cmd_best(&args[2..]);
        }
        "sim" => {
            cmd_sim(&args[2..]);
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run `tenzies --help` for usage.");
            process::exit(1);
        }
    }
}
