//! A single layer transition: one weight matrix and one shared bias.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;

/// One layer transition of a [`Network`](super::Network).
///
/// Unlike a per-neuron bias vector, the bias here is a single scalar added
/// to every unit of the layer's pre-activation.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Weight matrix (`input_width` × `output_width`).
    pub(super) weights: Array2<f32>,
    /// Scalar bias broadcast over the layer output.
    pub(super) bias: f32,
}

impl Layer {
    /// Creates a layer with weights and bias drawn uniformly from `[-1, 1]`.
    pub fn new_random(input_width: usize, output_width: usize) -> Self {
        Self {
            weights: Array2::random((input_width, output_width), Uniform::new_inclusive(-1.0, 1.0)),
            bias: rand::rng().random_range(-1.0..=1.0),
        }
    }

    /// Weight matrix of this transition.
    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// Scalar bias of this transition.
    pub fn bias(&self) -> f32 {
        self.bias
    }

    /// `(rows, cols)` of the weight matrix.
    pub fn shape(&self) -> (usize, usize) {
        self.weights.dim()
    }

    /// Row-vector times matrix, plus bias, through tanh.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.dot(&self.weights);
        output += self.bias;
        output.mapv_inplace(f32::tanh);
        output
    }
}
