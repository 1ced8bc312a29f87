use std::io::{self, Write};

use crate::Record;
use crate::pipeline::RecordSink;

/// Terminal sink: one path per line for every record with a match flag set.
/// Lines appear in arrival order; fan-out upstream means that is not tree order.
pub struct Reporter<W: Write> {
    out: W,
    matches: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, matches: 0 }
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordSink for Reporter<W> {
    fn accept(&mut self, record: Record) -> io::Result<()> {
        if record.is_match() {
            writeln!(self.out, "{}", record.path.display())?;
            self.matches += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
