use crate::record::Record;
use thiserror::Error;

/// Thresholds that a record must pass to be retained.
#[derive(Copy, Clone, Debug)]
pub struct FilterOpts {
    /// inclusive minimum length
    pub length_min: usize,
    /// inclusive maximum length
    pub length_max: usize,
    /// records whose mean quality is at or below this are rejected
    pub quality_threshold: f64,
}

#[derive(Error, Debug, PartialEq)]
pub enum FilterOptsError {
    #[error("minimum length {min} is greater than maximum length {max}")]
    EmptyLengthRange { min: usize, max: usize },

    #[error("quality threshold must be a number, got {0}")]
    NanThreshold(f64),
}

impl FilterOpts {
    pub fn new(
        length_min: usize,
        length_max: usize,
        quality_threshold: f64,
    ) -> Result<Self, FilterOptsError> {
        if length_min > length_max {
            return Err(FilterOptsError::EmptyLengthRange {
                min: length_min,
                max: length_max,
            });
        }
        if quality_threshold.is_nan() {
            return Err(FilterOptsError::NanThreshold(quality_threshold));
        }

        Ok(Self {
            length_min,
            length_max,
            quality_threshold,
        })
    }

    /// Both bounds are inclusive.
    pub fn length_ok(&self, len: usize) -> bool {
        len >= self.length_min && len <= self.length_max
    }

    pub fn quality_ok(&self, avg_qual: f64) -> bool {
        avg_qual > self.quality_threshold
    }
}

/// The outcome for a single input block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterDecision {
    Retained,
    RejectedLowQuality,
    RejectedLength,
    RejectedInvalid,
}

/// Decides whether a record is kept. Quality is checked first, so a low quality read is never
/// counted as a length failure even if its length is also out of range.
pub fn filter(read: &Record, opts: &FilterOpts) -> FilterDecision {
    if !opts.quality_ok(read.phred_quality_avg()) {
        FilterDecision::RejectedLowQuality
    } else if opts.length_ok(read.len()) {
        FilterDecision::Retained
    } else {
        FilterDecision::RejectedLength
    }
}
