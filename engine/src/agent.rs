use crate::{GameLogic, HeadlessRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentCommand<I> {
    Step(I),
    Reset,
    GetState,
    GetInputs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentResponse<S, I> {
    State { frame: usize, state: S },
    Inputs { frame: usize, inputs: Vec<I> },
}

/// Command front-end for scripted drivers (terminal hosts, test bots).
pub struct AgentHost<G>
where
    G: GameLogic,
{
    runner: HeadlessRunner<G>,
}

impl<G> AgentHost<G>
where
    G: GameLogic,
    G::State: Clone,
    G::Input: Clone,
{
    pub fn new(game: G) -> Self {
        Self {
            runner: HeadlessRunner::new(game),
        }
    }

    pub fn handle(&mut self, command: AgentCommand<G::Input>) -> AgentResponse<G::State, G::Input> {
        match command {
            AgentCommand::Step(input) => {
                let frame = self.runner.step(input);
                self.state_response(frame)
            }
            AgentCommand::Reset => {
                self.runner.reset();
                self.state_response(self.runner.frame())
            }
            AgentCommand::GetState => self.state_response(self.runner.frame()),
            AgentCommand::GetInputs => AgentResponse::Inputs {
                frame: self.runner.frame(),
                inputs: self.runner.inputs().to_vec(),
            },
        }
    }

    pub fn runner(&self) -> &HeadlessRunner<G> {
        &self.runner
    }

    fn state_response(&self, frame: usize) -> AgentResponse<G::State, G::Input> {
        AgentResponse::State {
            frame,
            state: self.runner.state().clone(),
        }
    }
}
