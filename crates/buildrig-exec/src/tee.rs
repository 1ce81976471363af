//! Fan-out writer used to mirror child output.

use std::io::{self, Write};

use crate::console::Console;

/// Writes every chunk to an optional caller sink and, optionally, to the
/// console's output stream.
///
/// With neither target set the writer swallows its input, which is how
/// stdout is drained when nobody asked to see it.
pub struct TeeWriter<'s, 'c> {
    sink: Option<&'s mut dyn Write>,
    console: Option<&'c Console>,
}

impl<'s, 'c> TeeWriter<'s, 'c> {
    /// Creates a writer over the given targets.
    #[must_use]
    pub fn new(sink: Option<&'s mut dyn Write>, console: Option<&'c Console>) -> Self {
        Self { sink, console }
    }
}

impl Write for TeeWriter<'_, '_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(sink) = self.sink.as_mut() {
            sink.write_all(buf)?;
        }
        if let Some(console) = self.console {
            console.write_out(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(sink) = self.sink.as_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}
