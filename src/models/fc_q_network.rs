use super::base_q_network::BaseQFunction;
use crate::error::AgentError;
use crate::misc::weight_initializer::{he_init, xavier_init};
use std::io::Cursor;
use tch::nn::{linear, Init, Linear, LinearConfig, Module, VarStore};
use tch::Tensor;

pub struct FCQNetwork {
    vs: VarStore,
    layers: Vec<Linear>,
    n_input_channels: i64,
    action_size: i64,
}

impl FCQNetwork {
    pub fn new(
        vs: VarStore,
        n_input_channels: i64,
        action_size: i64,
        n_hidden_layers: usize,
        n_hidden_channels: i64,
    ) -> Self {
        let root = (&vs).root();
        let mut layers: Vec<Linear> = Vec::new();

        layers.push(linear(
            &root,
            n_input_channels,
            n_hidden_channels,
            LinearConfig {
                ws_init: he_init(n_input_channels),
                bs_init: Some(Init::Const(0.0)),
                bias: true,
            },
        ));
        for _ in 0..n_hidden_layers {
            layers.push(linear(
                &root,
                n_hidden_channels,
                n_hidden_channels,
                LinearConfig {
                    ws_init: he_init(n_hidden_channels),
                    bs_init: Some(Init::Const(0.0)),
                    bias: true,
                },
            ));
        }
        layers.push(linear(
            &root,
            n_hidden_channels,
            action_size,
            LinearConfig {
                ws_init: xavier_init(n_hidden_channels, action_size),
                bs_init: Some(Init::Const(0.0)),
                bias: true,
            },
        ));

        FCQNetwork {
            vs,
            layers,
            n_input_channels,
            action_size,
        }
    }
}

impl BaseQFunction for FCQNetwork {
    fn forward(&self, x: &Tensor) -> Tensor {
        let mut h = x.view([-1, self.n_input_channels]);
        for i in 0..self.layers.len() {
            h = self.layers[i].forward(&h);
            if i < self.layers.len() - 1 {
                h = h.relu();
            }
        }
        h.view([-1, self.action_size])
    }

    fn save_weights(&self) -> Result<Vec<u8>, AgentError> {
        let mut buffer = Vec::new();
        self.vs.save_to_stream(&mut buffer)?;
        Ok(buffer)
    }

    fn load_weights(&mut self, weights: &[u8]) -> Result<(), AgentError> {
        self.vs.load_from_stream(Cursor::new(weights))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::{Device, Tensor};

    fn network() -> FCQNetwork {
        let vs = VarStore::new(Device::Cpu);
        FCQNetwork::new(vs, 16, 4, 2, 64)
    }

    #[test]
    fn test_fcqnetwork_forward() {
        let network = network();
        let input = Tensor::randn([1, 16], (tch::Kind::Float, Device::Cpu));
        let output = network.forward(&input);
        assert_eq!(output.size(), vec![1, 4]);
    }

    #[test]
    fn test_fcqnetwork_forward_batch() {
        let network = network();
        let input = Tensor::randn([7, 16], (tch::Kind::Float, Device::Cpu));
        let output = network.forward(&input);
        assert_eq!(output.size(), vec![7, 4]);
    }

    #[test]
    fn test_weight_round_trip() {
        let network = network();
        let mut other = network_with_different_weights();

        let input = Tensor::randn([1, 16], (tch::Kind::Float, Device::Cpu));
        let before = other.forward(&input);
        assert!(!network.forward(&input).allclose(&before, 1e-6, 1e-6, false));

        let weights = network.save_weights().unwrap();
        other.load_weights(&weights).unwrap();
        let after = other.forward(&input);
        assert!(network.forward(&input).allclose(&after, 1e-6, 1e-6, false));
    }

    fn network_with_different_weights() -> FCQNetwork {
        let vs = VarStore::new(Device::Cpu);
        FCQNetwork::new(vs, 16, 4, 2, 64)
    }
}
