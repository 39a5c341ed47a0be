use std::env;

use dqn2048::config::AppConfig;
use dqn2048::env::NUM_ACTIONS;
use dqn2048::error::AgentError;
use dqn2048::models::QModel;
use dqn2048::trainer::TrainingService;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AgentError> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    let mut config_path = String::from("dqn2048.json");
    let mut play_only = false;
    let mut rounds_override: Option<usize> = None;
    let mut steps_override: Option<usize> = None;
    let mut no_delay_override = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                if let Some(value) = iter.next() {
                    config_path = value.clone();
                }
            }
            "--rounds" => {
                if let Some(value) = iter.next() {
                    rounds_override = value.parse().ok();
                }
            }
            "--steps" => {
                if let Some(value) = iter.next() {
                    steps_override = value.parse().ok();
                }
            }
            "--no-delay" => {
                no_delay_override = true;
            }
            "--play" => {
                play_only = true;
            }
            _ => {}
        }
    }

    let mut config = AppConfig::load(&config_path)?;
    if let Some(rounds) = rounds_override {
        config.ai.training_rounds = rounds;
    }
    if let Some(steps) = steps_override {
        config.ai.steps = steps;
    }
    if no_delay_override {
        config.ui.no_delay = true;
    }

    info!(
        table_size = config.game.table_size,
        training_rounds = config.ai.training_rounds,
        steps = config.ai.steps,
        discount_rate = config.ai.discount_rate,
        "starting"
    );

    let num_states = (config.game.table_size * config.game.table_size) as i64;
    let model = QModel::new(
        num_states,
        NUM_ACTIONS,
        config.ai.batch_size,
        config.ai.learning_rate,
    )?;

    let mut service = TrainingService::new(config);
    service.attach_model(model);

    if !play_only {
        service.train().await?;
    }

    let needed_steps = service.play().await?;
    info!(needed_steps, "demonstration game finished");

    Ok(())
}
