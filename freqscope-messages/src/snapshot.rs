use std::fmt;

/// One spectrum sample: paired frequency bins and magnitudes.
///
/// Index `i` of both sequences refers to the same bin, and the order is the
/// plotting order. The two sequences always have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    frequencies: Vec<f64>,
    magnitudes: Vec<f64>,
}

/// Returned when frequencies and magnitudes differ in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthMismatch {
    pub frequencies: usize,
    pub magnitudes: usize,
}

impl fmt::Display for LengthMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frequencies but {} magnitudes",
            self.frequencies, self.magnitudes
        )
    }
}

impl std::error::Error for LengthMismatch {}

impl Snapshot {
    pub fn new(frequencies: Vec<f64>, magnitudes: Vec<f64>) -> Result<Self, LengthMismatch> {
        if frequencies.len() != magnitudes.len() {
            return Err(LengthMismatch {
                frequencies: frequencies.len(),
                magnitudes: magnitudes.len(),
            });
        }
        Ok(Self {
            frequencies,
            magnitudes,
        })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True when there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty() || self.magnitudes.is_empty()
    }

    /// `[frequency, magnitude]` pairs in bin order.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.frequencies
            .iter()
            .zip(&self.magnitudes)
            .map(|(&f, &m)| [f, m])
    }
}
