/// Tagged protocol between a training executor and its host.
#[derive(Debug)]
pub enum TrainerMessage {
    Progress {
        round: usize,
        total_rounds: usize,
        reward: f64,
    },
    Complete {
        weights: Vec<u8>,
    },
    Error {
        message: String,
    },
}
