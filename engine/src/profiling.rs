use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct StepTimings {
    /// Time spent inside `GameLogic::step`.
    pub step: Duration,
    /// Step plus runner bookkeeping (state swap, input log).
    pub total: Duration,
}

/// Hook for capturing per-step timings from a [`crate::HeadlessRunner`].
pub trait Profiler {
    fn on_step(&mut self, _frame: usize, _timings: StepTimings) {}
}
