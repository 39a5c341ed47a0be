mod base_env;
mod game_table;

pub use base_env::{BaseEnv, Direction, NUM_ACTIONS};
pub use game_table::GameTable;
