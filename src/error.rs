//! Defines the errors reported by networks, trainers and the validation harness.

use thiserror::Error;

/// A result whose error is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// An error type for all operations of the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Two sequences that must line up have different lengths.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The length required by the receiving side.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },
    /// A network was described with an unusable list of layer sizes.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),
    /// An operation needed at least one pattern.
    #[error("the pattern set is empty")]
    EmptyDataset,
    /// A k-fold split was requested with a fold count the pattern set cannot satisfy.
    #[error("cannot split {patterns} patterns into {folds} folds")]
    InvalidFoldCount {
        /// The requested number of folds.
        folds: usize,
        /// The number of patterns available.
        patterns: usize,
    },
    /// A train/test fraction outside of `[0, 1]`, or one that leaves a side empty.
    #[error("invalid train fraction {0}")]
    InvalidFraction(f64),
    /// Random subsampling was asked for zero iterations.
    #[error("random subsampling needs at least one iteration")]
    NoIterations,
    /// A class index does not fit the number of known classes.
    #[error("class label {label} is out of range for {classes} classes")]
    LabelOutOfRange {
        /// The offending label.
        label: f64,
        /// The number of classes.
        classes: usize,
    },
    /// A weight initialisation spread that is negative or not a number.
    #[error("invalid weight standard deviation {0}")]
    InvalidStdDev(f64),
    /// The weight initialisation distribution could not be built.
    #[error("invalid weight distribution: {0}")]
    Distribution(#[from] rand_distr::NormalError),
    /// Reading a configuration file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Fails with [`Error::DimensionMismatch`] unless `actual == expected`.
pub(crate) fn ensure_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { expected, actual })
    }
}
