//! Headless timing harness: greedy autoplay with a nearest-placement sweep
//! after every input. `BLAST_PROFILE_FRAMES` and `BLAST_PROFILE_WARMUP` size
//! the run.

use std::str::FromStr;
use std::time::{Duration, Instant};

use engine::HeadlessRunner;
use engine::profiling::{Profiler, StepTimings};

use blockblast::agent::GreedyAgent;
use blockblast::config::GameConfig;
use blockblast::playtest::{BlastLogic, InputAction};
use blockblast::search::nearest_valid_placement;
use blockblast::session::GameSession;

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[derive(Default)]
struct Timings(Vec<Duration>);

impl Timings {
    fn report(&mut self, label: &str) {
        let sorted = &mut self.0;
        sorted.sort_unstable();
        let Some(&max) = sorted.last() else {
            println!("{label:<8} no samples");
            return;
        };
        let at = |q: f64| sorted[((sorted.len() - 1) as f64 * q).round() as usize];
        let mean = sorted.iter().sum::<Duration>() / sorted.len() as u32;
        println!(
            "{label:<8} n={:<6} mean={:>9.3?} p50={:>9.3?} p95={:>9.3?} p99={:>9.3?} max={:>9.3?}",
            sorted.len(),
            mean,
            at(0.50),
            at(0.95),
            at(0.99),
            max,
        );
    }
}

/// Engine-side timings, skipping the first `warmup` frames.
struct EngineTimings {
    warmup: usize,
    step: Timings,
    total: Timings,
}

impl Profiler for EngineTimings {
    fn on_step(&mut self, frame: usize, timings: StepTimings) {
        if frame > self.warmup {
            self.step.0.push(timings.step);
            self.total.0.push(timings.total);
        }
    }
}

/// Asks for the nearest placement of slot 0 from every cell, as a drag across
/// the whole board would. Returns a checksum so the work is not optimised out.
fn pointer_sweep(session: &GameSession) -> i64 {
    let Some(shape) = session.shape_in_slot(0) else {
        return 0;
    };
    let n = session.grid().size() as i32;
    (0..n)
        .flat_map(|row| (0..n).map(move |col| (row, col)))
        .filter_map(|(row, col)| nearest_valid_placement(session.grid(), shape, row, col))
        .map(|anchor| i64::from(anchor.row + anchor.col))
        .sum()
}

fn main() {
    let frames: usize = env_or("BLAST_PROFILE_FRAMES", 10_000).max(1);
    let warmup: usize = env_or("BLAST_PROFILE_WARMUP", 200);
    println!("blockblast profile: {frames} frames after {warmup} warmup, greedy autoplay");

    let agent = GreedyAgent::new();
    let mut runner = HeadlessRunner::new(BlastLogic::new(GameConfig::default(), 0));
    let mut engine = EngineTimings {
        warmup,
        step: Timings::default(),
        total: Timings::default(),
    };
    let (mut choose, mut sweep, mut frame) =
        (Timings::default(), Timings::default(), Timings::default());

    let mut queue = std::collections::VecDeque::new();
    let mut games = 0usize;
    let mut checksum = 0i64;

    for i in 0..frames + warmup {
        let measured = i >= warmup;
        let frame_start = Instant::now();

        if queue.is_empty() {
            let start = Instant::now();
            queue.extend(agent.actions(runner.state()));
            if measured {
                choose.0.push(start.elapsed());
            }
        }
        let action = queue.pop_front().unwrap_or(InputAction::PlayAgain);
        games += usize::from(action == InputAction::PlayAgain);
        runner.step_profiled(action, &mut engine);

        let start = Instant::now();
        checksum += pointer_sweep(runner.state());
        if measured {
            sweep.0.push(start.elapsed());
            frame.0.push(frame_start.elapsed());
        }
    }

    std::hint::black_box(checksum);
    println!("games={games} final_score={}", runner.state().score());
    engine.step.report("step");
    engine.total.report("engine");
    choose.report("choose");
    sweep.report("sweep");
    frame.report("frame");
}
