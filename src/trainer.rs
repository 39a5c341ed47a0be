mod executor;
mod message;
mod service;

pub use executor::{
    run_training_rounds, InProcessExecutor, ThreadExecutor, TrainRequest, TrainingExecutor,
};
pub use message::TrainerMessage;
pub use service::{TrainerStatus, TrainingService};
