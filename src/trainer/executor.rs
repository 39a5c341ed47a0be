use super::message::TrainerMessage;
use crate::config::AppConfig;
use crate::env::{GameTable, NUM_ACTIONS};
use crate::error::AgentError;
use crate::models::QModel;
use crate::orchestrator::Orchestrator;
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Everything an executor needs to rebuild the training setup away from
/// the host: serialized weights plus scalar configuration.
#[derive(Debug, Clone)]
pub struct TrainRequest {
    pub weights: Vec<u8>,
    pub table_size: usize,
    pub memory_slots: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub training_rounds: usize,
    pub steps: usize,
    pub discount_rate: f64,
}

impl TrainRequest {
    pub fn from_config(config: &AppConfig, weights: Vec<u8>) -> Self {
        TrainRequest {
            weights,
            table_size: config.game.table_size,
            memory_slots: config.ai.memory_slots,
            batch_size: config.ai.batch_size,
            learning_rate: config.ai.learning_rate,
            training_rounds: config.ai.training_rounds,
            steps: config.ai.steps,
            discount_rate: config.ai.discount_rate,
        }
    }
}

/// A place training can run. Implementations stream `Progress` messages
/// and finish with `Complete` or `Error`.
pub trait TrainingExecutor {
    fn start(&self, request: TrainRequest) -> Result<UnboundedReceiver<TrainerMessage>, AgentError>;
}

/// Runs the requested training rounds against a model rebuilt from the
/// serialized weights, on a fresh environment and memory. Both executors
/// go through here.
pub async fn run_training_rounds(
    request: &TrainRequest,
    progress: &UnboundedSender<TrainerMessage>,
) -> Result<Vec<u8>, AgentError> {
    let num_states = (request.table_size * request.table_size) as i64;
    let mut model = QModel::new(
        num_states,
        NUM_ACTIONS,
        request.batch_size,
        request.learning_rate,
    )?;
    model.load_weights(&request.weights)?;
    let model = Arc::new(Mutex::new(model));

    let mut orchestrator = Orchestrator::new(
        Box::new(GameTable::new(request.table_size)),
        Arc::clone(&model),
        request.memory_slots,
        request.steps,
        0,
        true,
        request.discount_rate,
    );

    for round in 1..=request.training_rounds {
        let reward = orchestrator.run().await?;
        let _ = progress.send(TrainerMessage::Progress {
            round,
            total_rounds: request.training_rounds,
            reward,
        });
    }

    let weights = model.lock().unwrap().save_weights()?;
    Ok(weights)
}

/// Runs the training job on a dedicated OS thread with its own runtime.
pub struct ThreadExecutor;

impl TrainingExecutor for ThreadExecutor {
    fn start(&self, request: TrainRequest) -> Result<UnboundedReceiver<TrainerMessage>, AgentError> {
        let (tx, rx) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("dqn2048-trainer".into())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        let _ = tx.send(TrainerMessage::Error {
                            message: err.to_string(),
                        });
                        return;
                    }
                };
                let message = match runtime.block_on(run_training_rounds(&request, &tx)) {
                    Ok(weights) => TrainerMessage::Complete { weights },
                    Err(err) => TrainerMessage::Error {
                        message: err.to_string(),
                    },
                };
                let _ = tx.send(message);
            })?;
        Ok(rx)
    }
}

/// Runs the training job as a task on the host runtime; the fallback path
/// when the worker thread cannot run.
pub struct InProcessExecutor;

impl TrainingExecutor for InProcessExecutor {
    fn start(&self, request: TrainRequest) -> Result<UnboundedReceiver<TrainerMessage>, AgentError> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let message = match run_training_rounds(&request, &tx).await {
                Ok(weights) => TrainerMessage::Complete { weights },
                Err(err) => TrainerMessage::Error {
                    message: err.to_string(),
                },
            };
            let _ = tx.send(message);
        });
        Ok(rx)
    }
}
