use super::executor::{InProcessExecutor, ThreadExecutor, TrainRequest, TrainingExecutor};
use super::message::TrainerMessage;
use crate::config::AppConfig;
use crate::env::GameTable;
use crate::error::AgentError;
use crate::models::QModel;
use crate::orchestrator::Orchestrator;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainerStatus {
    Idle,
    Playing,
    Preparing,
    TrainingInWorker { round: usize, total_rounds: usize },
    TrainingInProcess { round: usize, total_rounds: usize },
    Failed(String),
}

impl fmt::Display for TrainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainerStatus::Idle => write!(f, "idle"),
            TrainerStatus::Playing => write!(f, "playing"),
            TrainerStatus::Preparing => write!(f, "preparing training"),
            TrainerStatus::TrainingInWorker {
                round,
                total_rounds,
            } => write!(f, "training round {}/{}", round, total_rounds),
            TrainerStatus::TrainingInProcess {
                round,
                total_rounds,
            } => write!(f, "training round {}/{} (in-process)", round, total_rounds),
            TrainerStatus::Failed(message) => write!(f, "training failed: {}", message),
        }
    }
}

/// Host-side coordination of training and demonstration play. Only one
/// training or play loop may run at a time.
pub struct TrainingService {
    config: AppConfig,
    model: Option<Arc<Mutex<QModel>>>,
    orchestrator: Option<Orchestrator>,
    status: TrainerStatus,
    block_input: bool,
}

impl TrainingService {
    pub fn new(config: AppConfig) -> Self {
        TrainingService {
            config,
            model: None,
            orchestrator: None,
            status: TrainerStatus::Idle,
            block_input: false,
        }
    }

    /// The same handle is injected into the orchestrator, so the play loop
    /// reads the weights the replay step trains.
    pub fn attach_model(&mut self, model: QModel) {
        let model = Arc::new(Mutex::new(model));
        self.orchestrator = Some(Orchestrator::new(
            Box::new(GameTable::new(self.config.game.table_size)),
            Arc::clone(&model),
            self.config.ai.memory_slots,
            self.config.ai.steps,
            self.config.ui.training_delay,
            self.config.ui.no_delay,
            self.config.ai.discount_rate,
        ));
        self.model = Some(model);
    }

    pub fn model(&self) -> Option<&Arc<Mutex<QModel>>> {
        self.model.as_ref()
    }

    pub fn status(&self) -> &TrainerStatus {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.block_input
    }

    /// Plays one game to completion with the current policy, no learning.
    pub async fn play(&mut self) -> Result<usize, AgentError> {
        if self.model.is_none() {
            error!("cannot play, no model attached");
            return Err(AgentError::ModelMissing);
        }
        if self.block_input {
            return Err(AgentError::Busy);
        }
        self.block_input = true;
        self.status = TrainerStatus::Playing;

        let result = self.play_to_completion().await;

        self.block_input = false;
        self.status = TrainerStatus::Idle;
        if let Ok(needed_steps) = &result {
            info!(needed_steps, "play finished");
        }
        result
    }

    async fn play_to_completion(&mut self) -> Result<usize, AgentError> {
        let delay = Duration::from_millis(self.config.ui.training_delay);
        let orchestrator = self.orchestrator.as_mut().ok_or(AgentError::ModelMissing)?;
        orchestrator.reset_env();

        let mut needed_steps = 0;
        loop {
            let (lost, won) = orchestrator.just_play().await?;
            needed_steps += 1;
            if lost || won {
                return Ok(needed_steps);
            }
            sleep(delay).await;
        }
    }

    /// Runs the configured training rounds, preferring the thread executor
    /// and falling back to in-process training.
    pub async fn train(&mut self) -> Result<(), AgentError> {
        if self.model.is_none() {
            error!("cannot train, no model attached");
            return Err(AgentError::ModelMissing);
        }
        if self.block_input {
            return Err(AgentError::Busy);
        }
        self.block_input = true;
        self.status = TrainerStatus::Preparing;

        let result = self.train_inner().await;

        self.block_input = false;
        self.status = match &result {
            Ok(()) => TrainerStatus::Idle,
            Err(err) => TrainerStatus::Failed(err.to_string()),
        };
        result
    }

    async fn train_inner(&mut self) -> Result<(), AgentError> {
        let model = self
            .model
            .as_ref()
            .cloned()
            .ok_or(AgentError::ModelMissing)?;
        if let Some(orchestrator) = self.orchestrator.as_mut() {
            orchestrator.reset_env();
        }

        let weights = model.lock().unwrap().save_weights()?;
        let request = TrainRequest::from_config(&self.config, weights);

        // On worker failure the weights are untouched; replay the request.
        match ThreadExecutor.start(request.clone()) {
            Ok(rx) => match self.drive(rx, false, &model).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!(error = %err, "worker failed, falling back to in-process training");
                }
            },
            Err(err) => {
                warn!(error = %err, "could not start worker thread, falling back");
            }
        }

        let rx = InProcessExecutor.start(request)?;
        self.drive(rx, true, &model).await
    }

    /// Consumes an executor's message stream and installs the final weights.
    async fn drive(
        &mut self,
        mut rx: UnboundedReceiver<TrainerMessage>,
        in_process: bool,
        model: &Arc<Mutex<QModel>>,
    ) -> Result<(), AgentError> {
        while let Some(message) = rx.recv().await {
            match message {
                TrainerMessage::Progress {
                    round,
                    total_rounds,
                    reward,
                } => {
                    self.status = if in_process {
                        TrainerStatus::TrainingInProcess {
                            round,
                            total_rounds,
                        }
                    } else {
                        TrainerStatus::TrainingInWorker {
                            round,
                            total_rounds,
                        }
                    };
                    info!(round, total_rounds, reward, "training progress");
                }
                TrainerMessage::Complete { weights } => {
                    model.lock().unwrap().load_weights(&weights)?;
                    info!("model updated");
                    return Ok(());
                }
                TrainerMessage::Error { message } => {
                    return Err(AgentError::Worker(message));
                }
            }
        }
        Err(AgentError::Worker(
            "executor finished without sending weights".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::NUM_ACTIONS;

    fn fast_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.game.table_size = 3;
        config.ai.training_rounds = 2;
        config.ai.steps = 4;
        config.ai.batch_size = 4;
        config.ai.memory_slots = 16;
        config.ui.no_delay = true;
        config.ui.training_delay = 0;
        config
    }

    fn service_with_model() -> TrainingService {
        let config = fast_config();
        let num_states = (config.game.table_size * config.game.table_size) as i64;
        let model = QModel::new(num_states, NUM_ACTIONS, config.ai.batch_size, 1e-3).unwrap();
        let mut service = TrainingService::new(config);
        service.attach_model(model);
        service
    }

    #[tokio::test]
    async fn test_train_without_model_fails_cleanly() {
        let mut service = TrainingService::new(fast_config());
        assert!(matches!(
            service.train().await,
            Err(AgentError::ModelMissing)
        ));
        assert_eq!(*service.status(), TrainerStatus::Idle);
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_play_without_model_fails_cleanly() {
        let mut service = TrainingService::new(fast_config());
        assert!(matches!(
            service.play().await,
            Err(AgentError::ModelMissing)
        ));
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_train_updates_model_and_returns_to_idle() {
        let mut service = service_with_model();
        service.train().await.unwrap();
        assert_eq!(*service.status(), TrainerStatus::Idle);
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_in_process_fallback_updates_model() {
        let mut service = service_with_model();
        let model = Arc::clone(service.model().unwrap());
        let weights = model.lock().unwrap().save_weights().unwrap();
        let request = TrainRequest::from_config(&service.config, weights);

        let rx = InProcessExecutor.start(request).unwrap();
        service.drive(rx, true, &model).await.unwrap();

        assert_eq!(
            *service.status(),
            TrainerStatus::TrainingInProcess {
                round: 2,
                total_rounds: 2
            }
        );
    }

    #[tokio::test]
    async fn test_play_runs_one_game_to_completion() {
        let mut service = service_with_model();
        let needed_steps = service.play().await.unwrap();
        assert!(needed_steps > 0);
        assert_eq!(*service.status(), TrainerStatus::Idle);
        assert!(!service.is_busy());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TrainerStatus::Idle.to_string(), "idle");
        assert_eq!(
            TrainerStatus::TrainingInWorker {
                round: 2,
                total_rounds: 5
            }
            .to_string(),
            "training round 2/5"
        );
        assert_eq!(
            TrainerStatus::Failed("boom".into()).to_string(),
            "training failed: boom"
        );
    }
}
