use std::io::{self, BufRead, Write};

use engine::agent::{AgentCommand, AgentHost, AgentResponse};
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;

use blockblast::agent::GreedyAgent;
use blockblast::config::ConfigStore;
use blockblast::playtest::{BlastLogic, InputAction};
use blockblast::seed::Seeder;
use blockblast::session::GameSession;
use blockblast::storage::{JsonFileStore, KeyValueStore, load_best_score, record_best_score};
use blockblast::view::render_text;

const HELP: &str = "\
commands:
  select <slot>     pick a piece (again to put it back)
  click <row> <col> place the picked piece with its top-left on that cell
  drag <slot>       start dragging a piece
  over <row> <col>  move the dragged piece over a cell
  drop              place the dragged piece at its preview
  cancel            drop the selection or drag
  again             start a new game
  state             print the session as JSON
  inputs            print the inputs applied so far
  quit";

type Host = AgentHost<BlastLogic>;

fn init_log(level: LevelFilter, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}",
        )))
        .build(path)?;
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

/// Steps the host and persists a beaten best score. Returns the new session.
fn step(host: &mut Host, store: &mut dyn KeyValueStore, best: &mut u32, action: InputAction) -> Option<GameSession> {
    match host.handle(AgentCommand::Step(action)) {
        AgentResponse::State { frame, state } => {
            log::debug!("frame {frame}: {action}");
            *best = record_best_score(store, *best, state.best_score());
            Some(state)
        }
        AgentResponse::Inputs { .. } => None,
    }
}

fn autoplay(host: &mut Host, store: &mut dyn KeyValueStore, best: &mut u32, moves: usize, out: &mut impl Write) -> io::Result<()> {
    let agent = GreedyAgent::new();
    let mut played = 0;
    while played < moves {
        let session = host.runner().state();
        if session.is_game_over() {
            break;
        }
        let actions = agent.actions(session);
        if actions.is_empty() {
            break;
        }
        for action in actions {
            step(host, store, best, action);
        }
        played += 1;
    }
    let session = host.runner().state();
    write!(out, "{}", render_text(&session.snapshot()))?;
    writeln!(out, "autoplay: {played} moves")?;
    Ok(())
}

fn main() -> io::Result<()> {
    let level = std::env::var("BLAST_LOG_LEVEL")
        .ok()
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    let log_path = std::env::var("BLAST_LOG_PATH").unwrap_or_else(|_| "blockblast.log".to_string());
    if let Err(err) = init_log(level, &log_path) {
        eprintln!("logging disabled ({log_path}): {err}");
    }

    let config = ConfigStore::from_env().load().with_env_overrides();
    let mut store = JsonFileStore::from_env();
    let mut best = load_best_score(&store);
    let seeder = match std::env::var("BLAST_SEED").ok().and_then(|v| v.trim().parse::<f64>().ok()) {
        Some(base) => Seeder::counter(base),
        None => Seeder::clock(config.stage_seed()),
    };
    log::info!(
        "starting stage {} (store {})",
        config.stage,
        store.path().display()
    );
    let mut host = Host::new(BlastLogic::new(config, best).with_seeder(seeder));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let moves = env_usize("BLAST_AUTOPLAY", 0);
    if moves > 0 {
        return autoplay(&mut host, &mut store, &mut best, moves, &mut out);
    }

    write!(out, "{}", render_text(&host.runner().state().snapshot()))?;
    writeln!(out, "type `help` for commands")?;
    out.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = line.trim();
        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => writeln!(out, "{HELP}")?,
            "state" => {
                let snapshot = host.runner().state().snapshot();
                let json = serde_json::to_string_pretty(&snapshot)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                writeln!(out, "{json}")?;
            }
            "inputs" => {
                if let AgentResponse::Inputs { frame, inputs } = host.handle(AgentCommand::GetInputs) {
                    writeln!(out, "frame {frame}")?;
                    for input in inputs {
                        writeln!(out, "  {input}")?;
                    }
                }
            }
            _ => match command.parse::<InputAction>() {
                Ok(action) => {
                    if let Some(session) = step(&mut host, &mut store, &mut best, action) {
                        write!(out, "{}", render_text(&session.snapshot()))?;
                    }
                }
                Err(err) => writeln!(out, "{err} (type `help`)")?,
            },
        }
        out.flush()?;
    }
    Ok(())
}
