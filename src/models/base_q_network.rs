use crate::error::AgentError;
use tch::Tensor;

/// The function approximator behind the agent. Weights cross execution
/// contexts as raw bytes, never as shared state.
pub trait BaseQFunction {
    fn forward(&self, x: &Tensor) -> Tensor;
    fn save_weights(&self) -> Result<Vec<u8>, AgentError>;
    fn load_weights(&mut self, weights: &[u8]) -> Result<(), AgentError>;
}
