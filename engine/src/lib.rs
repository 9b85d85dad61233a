pub mod agent;
pub mod profiling;

/// A pure transition function set. The host owns every state value; the logic
/// never keeps state of its own between calls.
pub trait GameLogic {
    type State;
    type Input;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State;

    /// State a runner restarts from. Games that keep values across restarts
    /// (high scores, unlocks) read them from `previous`.
    fn reset_state(&self, _previous: &Self::State) -> Self::State {
        self.initial_state()
    }
}

/// Drives a [`GameLogic`] without any window or event loop.
///
/// The runner keeps the ordered log of inputs it applied so a run can be fed
/// to a fresh runner again. Runners only move forward.
#[derive(Debug)]
pub struct HeadlessRunner<G: GameLogic> {
    game: G,
    state: G::State,
    frame: usize,
    inputs: Vec<G::Input>,
}

impl<G: GameLogic> HeadlessRunner<G>
where
    G::Input: Clone,
{
    pub fn new(game: G) -> Self {
        let state = game.initial_state();
        Self {
            game,
            state,
            frame: 0,
            inputs: Vec::new(),
        }
    }

    /// Builds a runner and applies `inputs` in order.
    pub fn replay<I>(game: G, inputs: I) -> Self
    where
        I: IntoIterator<Item = G::Input>,
    {
        let mut runner = Self::new(game);
        runner.run(inputs);
        runner
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn state(&self) -> &G::State {
        &self.state
    }

    pub fn inputs(&self) -> &[G::Input] {
        &self.inputs
    }

    pub fn step(&mut self, input: G::Input) -> usize {
        self.state = self.game.step(&self.state, input.clone());
        self.inputs.push(input);
        self.frame += 1;
        self.frame
    }

    pub fn step_profiled<P: profiling::Profiler>(&mut self, input: G::Input, profiler: &mut P) -> usize {
        use std::time::Instant;

        let total_start = Instant::now();

        let step_start = Instant::now();
        let next_state = self.game.step(&self.state, input.clone());
        let step_dt = step_start.elapsed();

        self.state = next_state;
        self.inputs.push(input);
        self.frame += 1;

        let total_dt = total_start.elapsed();
        profiler.on_step(
            self.frame,
            profiling::StepTimings {
                step: step_dt,
                total: total_dt,
            },
        );

        self.frame
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = G::Input>,
    {
        let mut last_frame = self.frame();
        for input in inputs {
            last_frame = self.step(input);
        }
        last_frame
    }

    pub fn reset(&mut self) {
        self.state = self.game.reset_state(&self.state);
        self.frame = 0;
        self.inputs.clear();
    }
}
