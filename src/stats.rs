use crate::filter::FilterDecision;
use crate::record::{MalformedRecord, Record};

/// Running totals and distributions for a single filtering run.
#[derive(Clone, Debug, Default)]
pub struct RunStatistics {
    /// every record that was classified, including invalid ones
    pub records_total: usize,
    pub skipped_invalid: usize,
    /// blocks with differing sequence and quality lengths; not part of `records_total`
    pub mismatched_lengths: usize,
    pub qual_filtered: usize,
    pub len_filtered: usize,

    pub total_quality: u64,
    pub total_bases: u64,

    pub all_lengths: Vec<usize>,
    pub all_quals: Vec<f64>,
    pub retained_lengths: Vec<usize>,
    pub retained_quals: Vec<f64>,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records that were parsed successfully.
    pub fn parsed(&self) -> usize {
        self.all_lengths.len()
    }

    /// Adds a parsed record to the global totals and "all" distributions, before any filtering.
    /// Returns the 0-based index of the record among parsed records.
    pub fn observe(&mut self, read: &Record) -> usize {
        let index = self.parsed();

        self.total_quality += read.phred_quality_total();
        self.total_bases += read.qual.len() as u64;
        self.all_lengths.push(read.len());
        self.all_quals.push(read.phred_quality_avg());
        self.records_total += 1;

        index
    }

    /// Records the outcome for a record previously passed to [`RunStatistics::observe`], which has
    /// already counted it in `records_total`. Blocks that never parsed go through
    /// [`RunStatistics::add_malformed`] instead.
    pub fn add_decision(&mut self, read: &Record, decision: FilterDecision) {
        match decision {
            FilterDecision::Retained => {
                self.retained_lengths.push(read.len());
                self.retained_quals.push(read.phred_quality_avg());
            }
            FilterDecision::RejectedLowQuality => self.qual_filtered += 1,
            FilterDecision::RejectedLength => self.len_filtered += 1,
            FilterDecision::RejectedInvalid => self.skipped_invalid += 1,
        }
    }

    /// Counts a block which could not be parsed. Mismatched lengths are tallied on their own and
    /// stay out of `records_total`.
    pub fn add_malformed(&mut self, err: &MalformedRecord) {
        if err.counts_as_invalid() {
            self.records_total += 1;
            self.skipped_invalid += 1;
        } else {
            self.mismatched_lengths += 1;
        }
    }

    pub fn retained(&self) -> usize {
        self.records_total - self.skipped_invalid - self.qual_filtered - self.len_filtered
    }

    /// Mean quality over every base of every parsed record, if there were any.
    pub fn overall_quality(&self) -> Option<f64> {
        if self.total_bases == 0 {
            return None;
        }
        Some((self.total_quality as f64) / (self.total_bases as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(len: usize, qual: u8) -> Record {
        Record {
            id: "r".to_string(),
            seq: vec![b'A'; len],
            qual: vec![qual; len],
        }
    }

    #[test]
    fn observe_accumulates() {
        let mut stats = RunStatistics::new();
        assert_eq!(stats.observe(&read(4, 40)), 0);
        assert_eq!(stats.observe(&read(2, 10)), 1);

        assert_eq!(stats.records_total, 2);
        assert_eq!(stats.total_bases, 6);
        assert_eq!(stats.total_quality, 180);
        assert_eq!(stats.all_lengths, vec![4, 2]);
        assert_eq!(stats.all_quals, vec![40.0, 10.0]);
        assert_eq!(stats.overall_quality(), Some(30.0));
    }

    #[test]
    fn decisions_balance() {
        let mut stats = RunStatistics::new();
        let decisions = [
            FilterDecision::Retained,
            FilterDecision::RejectedLength,
            FilterDecision::RejectedLowQuality,
            FilterDecision::Retained,
        ];
        for d in decisions {
            let r = read(3, 30);
            stats.observe(&r);
            stats.add_decision(&r, d);
        }
        stats.add_malformed(&MalformedRecord::MissingIdPrefix {
            header: "r".to_string(),
        });

        assert_eq!(stats.records_total, 5);
        assert_eq!(stats.skipped_invalid, 1);
        assert_eq!(stats.retained(), 2);
        assert_eq!(stats.retained_lengths.len(), stats.retained());
        assert_eq!(
            stats.records_total,
            stats.skipped_invalid + stats.qual_filtered + stats.len_filtered + stats.retained()
        );
    }

    #[test]
    fn mismatched_lengths_are_kept_apart() {
        let mut stats = RunStatistics::new();
        stats.add_malformed(&MalformedRecord::LengthMismatch {
            header: "@r".to_string(),
            seq: 4,
            qual: 3,
        });

        assert_eq!(stats.mismatched_lengths, 1);
        assert_eq!(stats.records_total, 0);
        assert_eq!(stats.skipped_invalid, 0);
        assert_eq!(stats.retained(), 0);
    }

    #[test]
    fn invalid_decision_keeps_balance() {
        let mut stats = RunStatistics::new();
        let r = read(3, 30);
        stats.observe(&r);
        stats.add_decision(&r, FilterDecision::RejectedInvalid);
        stats.add_malformed(&MalformedRecord::Unparseable {
            header: "@r".to_string(),
            reason: "bad separator".to_string(),
        });

        assert_eq!(stats.records_total, 2);
        assert_eq!(stats.skipped_invalid, 2);
        assert_eq!(stats.retained(), 0);
        assert_eq!(stats.retained_lengths.len(), stats.retained());
    }

    #[test]
    fn no_bases_no_overall_quality() {
        assert_eq!(RunStatistics::new().overall_quality(), None);
    }
}
