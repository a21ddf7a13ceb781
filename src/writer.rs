use crate::phred;
use crate::record::Record;
use std::io::Write;

/// Writes retained records as FASTQ, separating consecutive records with a single blank line.
pub struct FastqWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> FastqWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Formats a record into a FASTQ block and writes it. The quality line is re-encoded from the
    /// decoded Phred scores.
    pub fn write_record(&mut self, record: &Record) -> std::io::Result<()> {
        if self.written > 0 {
            self.inner.write_all(b"\n")?;
        }

        self.inner.write_all(b"@")?;
        self.inner.write_all(record.id.as_bytes())?;
        self.inner.write_all(b"\n")?;
        self.inner.write_all(&record.seq)?;
        self.inner.write_all(b"\n+\n")?;
        self.inner.write_all(&phred::encode_all(&record.qual))?;
        self.inner.write_all(b"\n")?;

        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> std::io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
