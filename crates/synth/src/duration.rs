//! Generation lengths in seconds or whole samples.

use crate::error::{Error, Result};

/// How long a generator should run.
///
/// Seconds are converted through the generator's reference sample rate;
/// a sample count is used as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Duration {
    /// Length in seconds; the sample count is `round(seconds * rate)`.
    Seconds(f32),
    /// Exact number of samples.
    Samples(usize),
}

impl Duration {
    /// Resolve to a sample count at the given rate.
    ///
    /// Fails with an invalid-argument error for a non-positive rate,
    /// non-positive seconds, or a zero sample count.
    pub fn sample_count(self, sample_rate: f32) -> Result<usize> {
        if !(sample_rate > 0.0) {
            return Err(Error::invalid_argument(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }
        match self {
            Duration::Seconds(s) if s > 0.0 => Ok(libm::roundf(s * sample_rate) as usize),
            Duration::Seconds(s) => Err(Error::invalid_argument(format!(
                "duration must be positive, got {s} s"
            ))),
            Duration::Samples(n) if n > 0 => Ok(n),
            Duration::Samples(_) => Err(Error::invalid_argument("duration must be positive")),
        }
    }
}

impl From<f32> for Duration {
    fn from(seconds: f32) -> Self {
        Duration::Seconds(seconds)
    }
}

impl From<f64> for Duration {
    fn from(seconds: f64) -> Self {
        Duration::Seconds(seconds as f32)
    }
}

impl From<usize> for Duration {
    fn from(samples: usize) -> Self {
        Duration::Samples(samples)
    }
}

impl From<u32> for Duration {
    fn from(samples: u32) -> Self {
        Duration::Samples(samples as usize)
    }
}
