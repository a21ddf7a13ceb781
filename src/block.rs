use std::io::BufRead;

/// Number of non-blank lines making up one FASTQ record.
pub const BLOCK_LINES: usize = 4;

/// Four consecutive non-blank lines of input, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub header: Vec<u8>,
    pub seq: Vec<u8>,
    pub sep: Vec<u8>,
    pub qual: Vec<u8>,
    /// 1-based line number of `header` in the input
    pub line: u64,
}

/// Groups the lines of a reader into [`RawBlock`]s.
///
/// Lines are kept as raw bytes, so a stray non-UTF-8 byte only spoils its own block. They are
/// trimmed of surrounding ASCII whitespace, and blank lines are skipped without counting
/// towards the block. This lets files which were concatenated with stray blank lines between them
/// still be read as one stream of records.
///
/// Any 1-3 lines left over at the end of the input do not form a block and are dropped.
/// [`BlockReader::leftover`] reports how many lines this was once the iterator is exhausted.
pub struct BlockReader<R> {
    reader: R,
    buf: Vec<u8>,
    pending: Vec<(u64, Vec<u8>)>,
    lines: u64,
    eof: bool,
}

impl<R: BufRead> BlockReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            pending: Vec::with_capacity(BLOCK_LINES),
            lines: 0,
            eof: false,
        }
    }

    /// Lines which were read but never completed a block.
    pub fn leftover(&self) -> usize {
        if self.eof {
            self.pending.len()
        } else {
            0
        }
    }

    /// Total number of input lines consumed so far, blank lines included.
    pub fn lines_read(&self) -> u64 {
        self.lines
    }

    fn take_block(&mut self) -> RawBlock {
        let mut lines = self.pending.drain(..);
        // the length of `pending` is checked by the caller
        let (line, header) = lines.next().unwrap_or_default();
        let seq = lines.next().unwrap_or_default().1;
        let sep = lines.next().unwrap_or_default().1;
        let qual = lines.next().unwrap_or_default().1;

        RawBlock {
            header,
            seq,
            sep,
            qual,
            line,
        }
    }
}

impl<R: BufRead> Iterator for BlockReader<R> {
    type Item = std::io::Result<RawBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof {
            return None;
        }

        while self.pending.len() < BLOCK_LINES {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    // end of file; a partial block is never flushed
                    self.eof = true;
                    return None;
                }
                Ok(_) => {
                    self.lines += 1;
                    let line = self.buf.trim_ascii();
                    if !line.is_empty() {
                        self.pending.push((self.lines, line.to_vec()));
                    }
                }
                Err(e) => {
                    self.eof = true;
                    return Some(Err(e));
                }
            }
        }

        Some(Ok(self.take_block()))
    }
}
