mod base_q_network;
mod fc_q_network;
mod q_model;

pub use base_q_network::BaseQFunction;
pub use fc_q_network::FCQNetwork;
pub use q_model::QModel;
