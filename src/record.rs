use crate::block::RawBlock;
use crate::phred;
use needletail::{parser::FastqReader, FastxReader};
use std::io::Cursor;
use thiserror::Error;

/// A validated FASTQ record with decoded quality scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The read identifier: the first whitespace-delimited token of the header, without `@`
    pub id: String,
    pub seq: Vec<u8>,
    /// Phred scores, one per base
    pub qual: Vec<u8>,
}

impl Record {
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn phred_quality_total(&self) -> u64 {
        self.qual.iter().map(|q| *q as u64).sum()
    }

    /// Mean Phred score across all bases. An empty record has a mean of zero.
    pub fn phred_quality_avg(&self) -> f64 {
        if self.qual.is_empty() {
            return 0.0;
        }
        (self.phred_quality_total() as f64) / (self.qual.len() as f64)
    }
}

/// Reasons a [`RawBlock`] can fail to become a [`Record`].
#[derive(Error, Debug, PartialEq)]
pub enum MalformedRecord {
    #[error("Skipping invalid record starting with: {header}")]
    MissingIdPrefix { header: String },

    #[error("Skipping record {header} due to mismatched lengths of sequence and quality values ({seq} vs {qual})")]
    LengthMismatch {
        header: String,
        seq: usize,
        qual: usize,
    },

    #[error("Skipping record {header}: quality character {symbol:?} at position {pos} is outside the Phred+33 range")]
    InvalidQuality {
        header: String,
        pos: usize,
        symbol: char,
    },

    #[error("Skipping record {header}: {reason}")]
    Unparseable { header: String, reason: String },
}

impl MalformedRecord {
    /// Whether this failure is counted as a skipped invalid record. Mismatched sequence and
    /// quality lengths are reported but kept out of that count.
    pub fn counts_as_invalid(&self) -> bool {
        !matches!(self, MalformedRecord::LengthMismatch { .. })
    }
}

impl TryFrom<RawBlock> for Record {
    type Error = MalformedRecord;

    fn try_from(block: RawBlock) -> Result<Self, Self::Error> {
        let header = String::from_utf8_lossy(&block.header).into_owned();

        if !block.header.starts_with(b"@") {
            return Err(MalformedRecord::MissingIdPrefix { header });
        }

        if block.seq.len() != block.qual.len() {
            return Err(MalformedRecord::LengthMismatch {
                seq: block.seq.len(),
                qual: block.qual.len(),
                header,
            });
        }

        let unparseable = |reason: String| MalformedRecord::Unparseable {
            header: header.clone(),
            reason,
        };

        let mut text = [
            &block.header[..],
            &block.seq[..],
            &block.sep[..],
            &block.qual[..],
        ]
        .join(&b'\n');
        text.push(b'\n');
        let capacity = text.len().max(3);
        let mut reader = FastqReader::with_capacity(Cursor::new(text), capacity);

        let rec = match reader.next() {
            Some(Ok(rec)) => rec,
            Some(Err(e)) => return Err(unparseable(e.to_string())),
            None => return Err(unparseable("empty record".to_string())),
        };

        // the first non-empty token, so `@ r1` still gives `r1`
        let id = rec
            .id()
            .split(|b| b.is_ascii_whitespace())
            .find(|t| !t.is_empty())
            .unwrap_or_default();
        let id = String::from_utf8(id.to_vec())
            .map_err(|_| unparseable("read identifier is not valid UTF-8".to_string()))?;
        let seq = rec.seq().into_owned();

        let qual = phred::decode_all(rec.qual().unwrap_or(&[])).map_err(|(pos, symbol)| {
            MalformedRecord::InvalidQuality {
                header: header.clone(),
                pos,
                symbol: symbol as char,
            }
        })?;

        Ok(Record { id, seq, qual })
    }
}
