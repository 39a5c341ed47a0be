mod replay_memory;
mod transition;

pub use replay_memory::ReplayMemory;
pub use transition::Transition;
