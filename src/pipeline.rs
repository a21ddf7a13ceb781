use crate::block::BlockReader;
use crate::filter::{filter, FilterDecision, FilterOpts};
use crate::record::Record;
use crate::stats::RunStatistics;
use crate::writer::FastqWriter;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use anyhow::{Context, Result};

/// Streams every block of `reader` through validation and filtering, writing retained records to
/// `writer` as they are found.
///
/// Malformed blocks are logged and skipped. Only I/O errors stop the run.
pub fn process<R: BufRead, W: Write>(
    reader: R,
    writer: &mut FastqWriter<W>,
    opts: &FilterOpts,
) -> Result<RunStatistics> {
    let mut stats = RunStatistics::new();
    let mut blocks = BlockReader::new(reader);
    let mut n_blocks = 0usize;

    for block in blocks.by_ref() {
        let block = block.with_context(|| format!("Could not read block {}", n_blocks + 1))?;
        let line = block.line;

        n_blocks += 1;
        if n_blocks % 50000 == 0 {
            info!("Processed: {n_blocks}");
        }

        let read = match Record::try_from(block) {
            Ok(read) => read,
            Err(e) => {
                warn!("{e} (line {line})");
                stats.add_malformed(&e);
                continue;
            }
        };

        let index = stats.observe(&read);
        info!(
            "index {}, ID = {}, length {}, with 0 features, qual = {:.2}",
            index,
            read.id,
            read.len(),
            read.phred_quality_avg()
        );

        let decision = filter(&read, opts);
        stats.add_decision(&read, decision);

        if decision == FilterDecision::Retained {
            writer
                .write_record(&read)
                .with_context(|| format!("Could not write record {}", read.id))?;
        }
    }

    let leftover = blocks.leftover();
    if leftover > 0 {
        debug!(
            "Dropped {leftover} trailing line(s) which do not form a complete record (input has {} lines)",
            blocks.lines_read()
        );
    }

    Ok(stats)
}

/// Filters the FASTQ file at `input`, writing retained records to `output`.
///
/// The output file is created (or truncated) before any input is read. Both files are closed when
/// this returns, whether or not it succeeds.
pub fn run(input: &str, output: &str, opts: &FilterOpts) -> Result<RunStatistics> {
    let file = File::open(input).with_context(|| format!("Unable to open file {input}"))?;
    let reader = BufReader::new(file);

    let out = File::create(output).with_context(|| format!("Unable to create file {output}"))?;
    let mut writer = FastqWriter::new(BufWriter::new(out));

    let stats = process(reader, &mut writer, opts)?;

    let written = writer.written();
    writer
        .finish()
        .with_context(|| format!("Unable to write to {output}"))?;
    info!("Wrote {written} records to {output}");

    Ok(stats)
}
