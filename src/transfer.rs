//! Scalar transfer (activation) functions and their derivatives.
//!
//! Every derivative in this module is expressed in terms of the *output* of its transfer function,
//! i.e. `derivative(y)` where `y = apply(x)`. Networks only keep post-activation values around, so
//! this is the form backpropagation can evaluate without recomputing weighted sums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A transfer function paired with its derivative.
#[derive(Clone, Copy)]
pub struct TransferFunction {
    name: &'static str,
    apply: fn(f64) -> f64,
    derivative: fn(f64) -> f64,
}

impl fmt::Debug for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.name, f)
    }
}

impl PartialEq for TransferFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl TransferFunction {
    /// Create a transfer function from its parts. `derivative` receives the output of `apply`.
    #[must_use]
    pub const fn new(name: &'static str, apply: fn(f64) -> f64, derivative: fn(f64) -> f64) -> Self {
        Self {
            name,
            apply,
            derivative,
        }
    }

    /// Heaviside step. The derivative is fixed at 1 so that error can still flow through it.
    #[must_use]
    pub const fn step() -> Self {
        Self::new("step", step, unit)
    }

    /// Logistic sigmoid with derivative `y * (1 - y)`.
    #[must_use]
    pub const fn sigmoid() -> Self {
        Self::new("sigmoid", sigmoid, sigmoid_derivative)
    }

    /// Logistic sigmoid whose derivative is the constant 1.
    ///
    /// Reproduces the historical behaviour of networks trained with an unscaled error signal.
    #[must_use]
    pub const fn sigmoid_unit_derivative() -> Self {
        Self::new("sigmoid-unit-derivative", sigmoid, unit)
    }

    /// Hyperbolic tangent with derivative `1 - y^2`.
    #[must_use]
    pub const fn tanh() -> Self {
        Self::new("tanh", f64::tanh, tanh_derivative)
    }

    /// The name of the function.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the function to a weighted input sum.
    #[must_use]
    pub fn apply(&self, x: f64) -> f64 {
        (self.apply)(x)
    }

    /// The derivative at the point whose activation is `y`.
    #[must_use]
    pub fn derivative(&self, y: f64) -> f64 {
        (self.derivative)(y)
    }

    /// The derivative at the weighted input sum `x`.
    #[must_use]
    pub fn derivative_at_input(&self, x: f64) -> f64 {
        self.derivative(self.apply(x))
    }
}

fn step(x: f64) -> f64 {
    if x >= 0.0 {
        1.0
    } else {
        0.0
    }
}

fn unit(_: f64) -> f64 {
    1.0
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}

fn tanh_derivative(y: f64) -> f64 {
    1.0 - y * y
}

/// Names a registered transfer function, e.g. in configuration files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transfer {
    /// See [`TransferFunction::step`].
    Step,
    /// See [`TransferFunction::sigmoid`].
    #[default]
    Sigmoid,
    /// See [`TransferFunction::sigmoid_unit_derivative`].
    SigmoidUnitDerivative,
    /// See [`TransferFunction::tanh`].
    Tanh,
}

impl Transfer {
    /// Look up the function this entry names.
    #[must_use]
    pub fn function(self) -> TransferFunction {
        match self {
            Self::Step => TransferFunction::step(),
            Self::Sigmoid => TransferFunction::sigmoid(),
            Self::SigmoidUnitDerivative => TransferFunction::sigmoid_unit_derivative(),
            Self::Tanh => TransferFunction::tanh(),
        }
    }
}

impl From<Transfer> for TransferFunction {
    fn from(transfer: Transfer) -> Self {
        transfer.function()
    }
}
