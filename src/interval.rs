//! Sampling stride.
//!
//! [`SampleInterval`] is the validated "every Nth frame" value handed to the
//! sampler. It can only hold values of one or more, so a zero or negative
//! stride is rejected at parse time, before any decoding starts.
//!
//! # Example
//!
//! ```
//! use ytframes::SampleInterval;
//!
//! let interval: SampleInterval = "30".parse()?;
//! assert!(interval.selects(0));
//! assert!(!interval.selects(29));
//! assert!(interval.selects(60));
//!
//! assert!("0".parse::<SampleInterval>().is_err());
//! assert!("-5".parse::<SampleInterval>().is_err());
//! # Ok::<(), ytframes::ExtractorError>(())
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    num::NonZeroU64,
    str::FromStr,
};

use crate::error::ExtractorError;

/// A positive frame stride (N ≥ 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleInterval(NonZeroU64);

impl SampleInterval {
    /// Stride used when the caller does not choose one.
    pub const DEFAULT: SampleInterval = match NonZeroU64::new(30) {
        Some(every) => SampleInterval(every),
        None => unreachable!(),
    };

    /// Build an interval from a raw count.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::InvalidInterval`] when `every` is zero.
    pub fn new(every: u64) -> Result<Self, ExtractorError> {
        NonZeroU64::new(every)
            .map(SampleInterval)
            .ok_or_else(|| ExtractorError::InvalidInterval(every.to_string()))
    }

    /// The stride as a plain integer.
    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// Whether the frame at zero-based position `counter` is sampled.
    ///
    /// Position 0 is always sampled.
    pub fn selects(self, counter: u64) -> bool {
        counter % self.0.get() == 0
    }

    /// Number of frames a source of `frame_count` frames yields at this stride.
    pub fn sampled_count(self, frame_count: u64) -> u64 {
        frame_count.div_ceil(self.0.get())
    }
}

impl Default for SampleInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<NonZeroU64> for SampleInterval {
    fn from(value: NonZeroU64) -> Self {
        SampleInterval(value)
    }
}

impl Display for SampleInterval {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SampleInterval {
    type Err = ExtractorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        // Parse signed so "-3" is reported as a bad interval rather than as
        // a generic parse failure.
        let parsed: i64 = trimmed
            .parse()
            .map_err(|_| ExtractorError::InvalidInterval(trimmed.to_string()))?;
        if parsed <= 0 {
            return Err(ExtractorError::InvalidInterval(trimmed.to_string()));
        }
        Self::new(parsed as u64)
    }
}
