use crate::env::{BaseEnv, Direction};
use crate::error::AgentError;
use crate::memory::{ReplayMemory, Transition};
use crate::models::QModel;
use crate::reward::compute_reward;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tch::{Kind, Tensor};
use tokio::time::sleep;
use tracing::info;

/// Backoff applied when the environment rejects a move in play-only mode.
const SHIFT_RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Drives episodes: steps the board, stores transitions, and runs one
/// replay pass per episode.
pub struct Orchestrator {
    model: Arc<Mutex<QModel>>,
    memory: ReplayMemory<Transition>,
    env: Box<dyn BaseEnv>,
    steps: usize,
    replays: usize,
    max_steps_per_game: usize,
    round_waiting: Duration,
    disable_wait: bool,
    discount_rate: f64,
}

impl Orchestrator {
    pub fn new(
        env: Box<dyn BaseEnv>,
        model: Arc<Mutex<QModel>>,
        memory_slots: usize,
        max_steps_per_game: usize,
        round_waiting_ms: u64,
        disable_wait: bool,
        discount_rate: f64,
    ) -> Self {
        Orchestrator {
            model,
            memory: ReplayMemory::new(memory_slots),
            env,
            steps: 0,
            replays: 0,
            max_steps_per_game,
            round_waiting: Duration::from_millis(round_waiting_ms),
            disable_wait,
            discount_rate,
        }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn replays(&self) -> usize {
        self.replays
    }

    pub fn memory(&self) -> &ReplayMemory<Transition> {
        &self.memory
    }

    pub fn reset_env(&mut self) {
        self.env.reset();
    }

    fn encode_state(&self) -> Tensor {
        Tensor::from_slice(&self.env.encoded_state())
    }

    /// One training episode: steps the environment up to the step budget,
    /// resetting the board whenever a game finishes mid-episode, then runs
    /// exactly one replay pass.
    pub async fn run(&mut self) -> Result<f64, AgentError> {
        let mut state = self.encode_state();
        let mut total_reward = 0.0;
        let mut step = 0;
        while step < self.max_steps_per_game {
            let action = self.model.lock().unwrap().choose_action(&state);
            self.env.shift(Direction::from_action(action));

            let done = self.env.is_won() || self.env.is_lost();
            let reward = compute_reward(
                self.env.state(),
                self.env.current_score(),
                self.env.is_lost(),
                self.env.is_won(),
            );
            let next_state = self.encode_state();

            if done {
                self.memory
                    .add_sample(Transition::new(state, action, reward, None));
            } else {
                self.memory.add_sample(Transition::new(
                    state,
                    action,
                    reward,
                    Some(next_state.shallow_clone()),
                ));
            }

            self.steps += 1;
            state = next_state;
            total_reward += reward;
            step += 1;

            if step == self.max_steps_per_game {
                info!(total_reward, "achieved reward");
                break;
            }
            if done {
                self.env.reset();
            }
            if !self.disable_wait {
                sleep(self.round_waiting).await;
            }
        }
        self.replay().await?;
        self.env.reset();
        Ok(total_reward)
    }

    /// One inference-only step. Writes nothing to memory and never trains.
    pub async fn just_play(&mut self) -> Result<(bool, bool), AgentError> {
        let state = self.encode_state();
        let action = self.model.lock().unwrap().choose_action(&state);
        let moved = self.env.shift(Direction::from_action(action));
        if !moved {
            sleep(SHIFT_RETRY_BACKOFF).await;
        }
        Ok((self.env.is_lost(), self.env.is_won()))
    }

    /// One mini-batch learning pass over the stored transitions.
    pub async fn replay(&mut self) -> Result<(), AgentError> {
        let mut model = self.model.lock().unwrap();
        let batch = self.memory.sample(model.batch_size());
        if batch.is_empty() {
            return Ok(());
        }
        let (x, y) = build_training_batch(&model, &batch, self.discount_rate);
        model.train(&x, &y);
        self.replays += 1;
        Ok(())
    }
}

/// Builds the input and TD-target batch tensors for one replay pass. Rows
/// are shaped to the actual batch length, which can be smaller than the
/// configured batch size early in training.
pub fn build_training_batch(
    model: &QModel,
    batch: &[&Transition],
    discount_rate: f64,
) -> (Tensor, Tensor) {
    let mut states = Vec::with_capacity(batch.len());
    let mut targets = Vec::with_capacity(batch.len());
    for transition in batch {
        let mut current_q = model.predict_values(&transition.state);
        let target = match &transition.next_state {
            // Terminal transition, the reward stands alone.
            None => transition.reward,
            Some(next_state) => {
                let next_q = model.predict(next_state);
                transition.reward + discount_rate * next_q.max().double_value(&[])
            }
        };
        current_q[transition.action as usize] = target;
        states.push(transition.state.shallow_clone());
        targets.push(Tensor::from_slice(&current_q).to_kind(Kind::Float));
    }
    let x = Tensor::stack(&states, 0).view([-1, model.num_states()]);
    let y = Tensor::stack(&targets, 0).view([-1, model.num_actions()]);
    (x, y)
}
