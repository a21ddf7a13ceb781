use crate::stats::RunStatistics;
use std::io::Write;

/// Writes the end-of-run counters, one per line. The overall quality line is left out when no
/// bases were read.
pub fn write_summary(stats: &RunStatistics, wtr: &mut impl Write) -> std::io::Result<()> {
    if let Some(q) = stats.overall_quality() {
        writeln!(wtr, "overall_qual = {q:.2}")?;
    }

    writeln!(wtr, "records total = {}", stats.records_total)?;
    writeln!(wtr, "skipped invalid records = {}", stats.skipped_invalid)?;
    writeln!(
        wtr,
        "skipped records with mismatched sequence and quality lengths = {}",
        stats.mismatched_lengths
    )?;
    writeln!(
        wtr,
        "records rejected due to low quality = {}",
        stats.qual_filtered
    )?;
    writeln!(
        wtr,
        "records rejected due to outside of expected length = {}",
        stats.len_filtered
    )?;
    writeln!(
        wtr,
        "records retained, i.e. total records outputted = {}",
        stats.retained()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn summary(stats: &RunStatistics) -> String {
        let mut out = Vec::new();
        write_summary(stats, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn full_summary() {
        let stats = RunStatistics {
            records_total: 10,
            skipped_invalid: 1,
            mismatched_lengths: 2,
            qual_filtered: 3,
            len_filtered: 4,
            total_quality: 250,
            total_bases: 20,
            ..RunStatistics::default()
        };

        assert_eq!(
            summary(&stats),
            indoc! {"
                overall_qual = 12.50
                records total = 10
                skipped invalid records = 1
                skipped records with mismatched sequence and quality lengths = 2
                records rejected due to low quality = 3
                records rejected due to outside of expected length = 4
                records retained, i.e. total records outputted = 2
            "}
        );
    }

    #[test]
    fn no_bases_omits_overall_quality() {
        let out = summary(&RunStatistics::default());
        assert!(!out.contains("overall_qual"));
        assert!(out.starts_with("records total = 0\n"));
    }
}
