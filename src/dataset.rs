//! Data structures and methods for dealing with datasets.

use rand::Rng;
use tracing::{debug, trace};

/// A single example of a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pattern {
    /// The input data.
    pub features: Vec<f64>,
    /// The index of the class the pattern belongs to.
    pub single_label: f64,
    /// The expected output vector, for patterns mapping vectors to vectors.
    pub multi_label: Vec<f64>,
}

impl Pattern {
    /// Create a pattern labelled with a class index.
    #[must_use]
    pub fn classified(features: Vec<f64>, single_label: f64) -> Self {
        Self {
            features,
            single_label,
            multi_label: Vec::new(),
        }
    }

    /// Create a pattern labelled with an expected output vector.
    #[must_use]
    pub fn sequence(features: Vec<f64>, multi_label: Vec<f64>) -> Self {
        Self {
            features,
            single_label: 0.0,
            multi_label,
        }
    }
}

/// Maps raw class labels to dense indices, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelIndex {
    labels: Vec<String>,
}

impl LabelIndex {
    /// Collect the distinct labels of a dataset.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels: Vec<String> = Vec::new();
        for label in raw {
            let label = label.as_ref();
            if !labels.iter().any(|known| known == label) {
                trace!(label, "new class label");
                labels.push(label.to_owned());
            }
        }
        debug!(classes = labels.len(), "class labels indexed");
        Self { labels }
    }

    /// The number of distinct classes.
    #[must_use]
    pub fn classes(&self) -> usize {
        self.labels.len()
    }

    /// The index of a raw label, if it is known.
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|known| known == label)
    }

    /// The raw label of an index, if it is in range.
    #[must_use]
    pub fn label_of(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// All labels, ordered by index.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Write `n` as `width` binary digits, most significant first.
///
/// Digits that do not fit into `width` are dropped from the most significant end.
#[must_use]
pub fn to_bits(n: u64, width: usize) -> Vec<f64> {
    (0..width)
        .rev()
        .map(|shift| {
            if shift < 64 && (n >> shift) & 1 == 1 {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Read binary digits, most significant first. Any value of at least `0.5` counts as a set bit.
#[must_use]
pub fn from_bits(bits: &[f64]) -> u64 {
    bits.iter()
        .fold(0, |acc, &bit| (acc << 1) | u64::from(bit >= 0.5))
}

/// Generate `count` binary addition examples.
///
/// Each pattern's features are the two `bits`-wide operands `a` and `b` concatenated, and its
/// expected output is `a + b` written with `bits + 1` digits.
pub fn binary_sum_patterns<R>(rng: &mut R, bits: usize, count: usize) -> Vec<Pattern>
where
    R: Rng,
{
    let bound = 1u64 << bits.min(62);
    (0..count)
        .map(|_| {
            let a = rng.gen_range(0..bound);
            let b = rng.gen_range(0..bound);
            trace!(a, b, sum = a + b, "binary sum pattern");
            let mut features = to_bits(a, bits);
            features.extend(to_bits(b, bits));
            Pattern::sequence(features, to_bits(a + b, bits + 1))
        })
        .collect()
}
