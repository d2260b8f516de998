//! Line-flushing writer in front of a [`RedirectSink`]

use crate::RedirectSink;
use std::io;
use std::sync::Arc;

/// Writer that pushes every completed line to its sink.
///
/// Bytes up to and including the last `\n` of each write are handed to the
/// sink in one [`RedirectSink::write_and_flush`] call; the remainder waits in
/// a private buffer for the next newline, an explicit flush, or drop. Each
/// writer has its own pending buffer, so concurrent writers sharing a sink
/// never produce a record containing bytes from both.
pub struct AutoFlushWriter {
    sink: Arc<RedirectSink>,
    pending: Vec<u8>,
}

impl AutoFlushWriter {
    /// Wrap `sink`
    pub fn new(sink: Arc<RedirectSink>) -> Self {
        Self {
            sink,
            pending: Vec::new(),
        }
    }

    /// The sink this writer feeds
    pub fn sink(&self) -> &Arc<RedirectSink> {
        &self.sink
    }

    /// Another writer on the same sink with its own pending buffer
    pub fn fork(&self) -> Self {
        Self::new(Arc::clone(&self.sink))
    }

    fn push_pending(&mut self) {
        if !self.pending.is_empty() {
            self.sink.write_and_flush(&self.pending);
            self.pending.clear();
        }
    }
}

impl io::Write for AutoFlushWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match buf.iter().rposition(|b| *b == b'\n') {
            Some(last_newline) => {
                let (complete, rest) = buf.split_at(last_newline + 1);
                if self.pending.is_empty() {
                    self.sink.write_and_flush(complete);
                } else {
                    self.pending.extend_from_slice(complete);
                    self.push_pending();
                }
                self.pending.extend_from_slice(rest);
            }
            None => self.pending.extend_from_slice(buf),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.push_pending();
        Ok(())
    }
}

impl Drop for AutoFlushWriter {
    fn drop(&mut self) {
        self.push_pending();
    }
}

impl std::fmt::Debug for AutoFlushWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoFlushWriter")
            .field("sink", &self.sink)
            .field("pending", &self.pending.len())
            .finish()
    }
}
