use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no model is attached")]
    ModelMissing,

    #[error("a training job is already in flight")]
    Busy,

    #[error("torch: {0}")]
    Torch(#[from] tch::TchError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("worker: {0}")]
    Worker(String),
}
