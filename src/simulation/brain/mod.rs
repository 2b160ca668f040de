//! Feed-forward network that steers a vehicle from three distance sensors.
//!
//! The topology is fixed at three inputs and two outputs with a stack of
//! equal-width hidden layers in between. Each layer transition owns one
//! weight matrix and one scalar bias.

use ndarray::{Array1, Array2, ArrayViewMut2, array};

pub mod layer;

pub use layer::Layer;

use super::error::{Error, Result};

/// Number of sensor inputs.
pub const INPUT_WIDTH: usize = 3;
/// Number of control outputs (acceleration, turning).
pub const OUTPUT_WIDTH: usize = 2;

/// Shape of a network: hidden layer count and width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    /// Number of hidden layers.
    pub hidden_layer_count: usize,
    /// Width of every hidden layer.
    pub neuron_count: usize,
}

impl Topology {
    /// Creates a topology. Validity is checked by [`Topology::validate`].
    pub fn new(hidden_layer_count: usize, neuron_count: usize) -> Self {
        Self {
            hidden_layer_count,
            neuron_count,
        }
    }

    /// Number of layer transitions (weight matrices and biases).
    pub fn transition_count(&self) -> usize {
        self.hidden_layer_count + 1
    }

    /// Expected `(rows, cols)` of every weight matrix, input first.
    ///
    /// With no hidden layers the single matrix maps inputs straight to
    /// outputs.
    pub fn layer_shapes(&self) -> Vec<(usize, usize)> {
        let count = self.transition_count();
        (0..count)
            .map(|i| {
                let rows = if i == 0 { INPUT_WIDTH } else { self.neuron_count };
                let cols = if i == count - 1 {
                    OUTPUT_WIDTH
                } else {
                    self.neuron_count
                };
                (rows, cols)
            })
            .collect()
    }

    /// Rejects topologies that cannot carry the 3-in / 2-out contract.
    pub fn validate(&self) -> Result<()> {
        if self.neuron_count < 1 {
            return Err(Error::InvalidConfiguration(
                "neuron_count must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// One individual: weights, biases and the fitness it earned.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
    /// Fitness reported by the evaluator; zero until then.
    pub fitness: f32,
}

impl Network {
    /// Creates a network with every weight and bias drawn from `[-1, 1]`.
    pub fn initialize(topology: Topology) -> Result<Self> {
        topology.validate()?;

        let layers = topology
            .layer_shapes()
            .into_iter()
            .map(|(rows, cols)| Layer::new_random(rows, cols))
            .collect();

        Ok(Self {
            layers,
            fitness: 0.0,
        })
    }

    /// Assembles a network from explicit weights and biases.
    ///
    /// Every matrix must match the shape `topology` prescribes for its slot
    /// and there must be exactly one bias per matrix.
    pub fn from_parts(
        topology: Topology,
        weights: Vec<Array2<f32>>,
        biases: Vec<f32>,
    ) -> Result<Self> {
        topology.validate()?;

        let count = topology.transition_count();
        if weights.len() != count {
            return Err(Error::ShapeMismatch {
                layer: weights.len().min(count),
                expected: (count, 1),
                found: (weights.len(), 1),
            });
        }
        if biases.len() != count {
            return Err(Error::ShapeMismatch {
                layer: biases.len().min(count),
                expected: (count, 1),
                found: (biases.len(), 1),
            });
        }

        let layers = weights
            .into_iter()
            .zip(biases)
            .map(|(weights, bias)| Layer { weights, bias })
            .collect();

        let network = Self {
            layers,
            fitness: 0.0,
        };
        network.check_shapes(topology)?;
        Ok(network)
    }

    /// Deep copy of weights and biases with fitness reset to zero.
    ///
    /// Fails if this network does not have the shape `topology` describes.
    pub fn copy(&self, topology: Topology) -> Result<Self> {
        topology.validate()?;
        self.check_shapes(topology)?;

        Ok(Self {
            layers: self.layers.clone(),
            fitness: 0.0,
        })
    }

    /// Verifies the layer chain against `topology`.
    pub fn check_shapes(&self, topology: Topology) -> Result<()> {
        let expected = topology.layer_shapes();
        if self.layers.len() != expected.len() {
            return Err(Error::ShapeMismatch {
                layer: self.layers.len().min(expected.len()),
                expected: (expected.len(), 1),
                found: (self.layers.len(), 1),
            });
        }

        for (layer, (found, expected)) in self
            .layers
            .iter()
            .map(Layer::shape)
            .zip(expected)
            .enumerate()
        {
            if found != expected {
                return Err(Error::ShapeMismatch {
                    layer,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Maps three sensor readings to `(acceleration, turning)`.
    ///
    /// Acceleration lies in `[0, 1]` so the vehicle never reverses; turning
    /// lies in `[-1, 1]`.
    pub fn forward(&self, a: f32, b: f32, c: f32) -> (f32, f32) {
        let mut activation: Array1<f32> = array![a, b, c];
        activation.mapv_inplace(f32::tanh);

        for layer in &self.layers {
            activation = layer.forward(&activation);
        }

        (sigmoid(activation[0]), activation[1].tanh())
    }

    /// Layer transitions, input first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layer transitions.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Weight matrix of transition `index`.
    pub fn weights(&self, index: usize) -> &Array2<f32> {
        &self.layers[index].weights
    }

    /// Mutable view of a weight matrix. The view cannot change its shape.
    pub fn weights_mut(&mut self, index: usize) -> ArrayViewMut2<'_, f32> {
        self.layers[index].weights.view_mut()
    }

    /// Bias of transition `index`.
    pub fn bias(&self, index: usize) -> f32 {
        self.layers[index].bias
    }

    /// All biases, input first.
    pub fn biases(&self) -> Vec<f32> {
        self.layers.iter().map(Layer::bias).collect()
    }
}

/// Logistic function.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
