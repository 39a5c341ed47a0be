use super::{BaseQFunction, FCQNetwork};
use crate::error::AgentError;
use crate::policy::SigmoidCategorical;
use tch::{nn, nn::OptimizerConfig, no_grad, Device, Kind, Tensor};

const N_HIDDEN_LAYERS: usize = 2;
const N_HIDDEN_CHANNELS: i64 = 128;

/// Function-approximator facade. The action policy reads through `predict`;
/// the replay step is the only writer.
pub struct QModel {
    num_states: i64,
    num_actions: i64,
    batch_size: usize,
    network: Box<dyn BaseQFunction>,
    optimizer: nn::Optimizer,
}

unsafe impl Send for QModel {}

impl QModel {
    pub fn new(
        num_states: i64,
        num_actions: i64,
        batch_size: usize,
        learning_rate: f64,
    ) -> Result<Self, AgentError> {
        let vs = nn::VarStore::new(Device::Cpu);
        let optimizer = nn::Adam::default().build(&vs, learning_rate)?;
        let network = Box::new(FCQNetwork::new(
            vs,
            num_states,
            num_actions,
            N_HIDDEN_LAYERS,
            N_HIDDEN_CHANNELS,
        ));
        Ok(QModel {
            num_states,
            num_actions,
            batch_size,
            network,
            optimizer,
        })
    }

    pub fn num_states(&self) -> i64 {
        self.num_states
    }

    pub fn num_actions(&self) -> i64 {
        self.num_actions
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Q-values for a batch of states, detached from the graph.
    pub fn predict(&self, states: &Tensor) -> Tensor {
        no_grad(|| self.network.forward(&states.view([-1, self.num_states])))
    }

    /// Q-value row for a single state as a plain vector.
    pub fn predict_values(&self, state: &Tensor) -> Vec<f64> {
        let q_values = self.predict(state);
        (0..self.num_actions)
            .map(|a| q_values.double_value(&[0, a]))
            .collect()
    }

    /// Stochastic action selection, one categorical draw.
    pub fn choose_action(&self, state: &Tensor) -> i64 {
        no_grad(|| {
            let q_values = self.network.forward(&state.view([1, self.num_states]));
            SigmoidCategorical::new(&q_values).sample()
        })
    }

    /// One gradient step on the MSE between predicted and target Q-values.
    pub fn train(&mut self, x: &Tensor, y: &Tensor) {
        let pred = self.network.forward(x);
        let loss = (pred - y).square().mean(Kind::Float);
        self.optimizer.zero_grad();
        loss.backward();
        self.optimizer.step();
    }

    pub fn save_weights(&self) -> Result<Vec<u8>, AgentError> {
        self.network.save_weights()
    }

    pub fn load_weights(&mut self, weights: &[u8]) -> Result<(), AgentError> {
        self.network.load_weights(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qmodel_new() {
        let model = QModel::new(16, 4, 32, 1e-3).unwrap();
        assert_eq!(model.num_states(), 16);
        assert_eq!(model.num_actions(), 4);
        assert_eq!(model.batch_size(), 32);
    }

    #[test]
    fn test_predict_shapes() {
        let model = QModel::new(16, 4, 32, 1e-3).unwrap();
        let state = Tensor::from_slice(&vec![0.0f32; 16]);
        assert_eq!(model.predict(&state).size(), vec![1, 4]);

        let batch = Tensor::from_slice(&vec![0.0f32; 48]).view([3, 16]);
        assert_eq!(model.predict(&batch).size(), vec![3, 4]);

        assert_eq!(model.predict_values(&state).len(), 4);
    }

    #[test]
    fn test_choose_action_is_legal() {
        let model = QModel::new(16, 4, 32, 1e-3).unwrap();
        let state = Tensor::from_slice(&vec![2.0f32; 16]);
        for _ in 0..100 {
            let action = model.choose_action(&state);
            assert!((0..4).contains(&action));
        }
    }

    #[test]
    fn test_train_moves_predictions_towards_targets() {
        let mut model = QModel::new(4, 4, 4, 1e-2).unwrap();
        let x = Tensor::from_slice(&[1.0f32, 0.0, 0.0, 1.0]).view([1, 4]);
        let y = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0]).view([1, 4]);

        let error_before = (model.predict(&x) - &y).square().mean(Kind::Float).double_value(&[]);
        for _ in 0..200 {
            model.train(&x, &y);
        }
        let error_after = (model.predict(&x) - &y).square().mean(Kind::Float).double_value(&[]);
        assert!(error_after < error_before);
    }

    #[test]
    fn test_weights_transfer_between_models() {
        let source = QModel::new(16, 4, 32, 1e-3).unwrap();
        let mut target = QModel::new(16, 4, 32, 1e-3).unwrap();

        let weights = source.save_weights().unwrap();
        target.load_weights(&weights).unwrap();

        let state = Tensor::from_slice(&vec![2.0f32; 16]);
        assert!(source
            .predict(&state)
            .allclose(&target.predict(&state), 1e-6, 1e-6, false));
    }
}
