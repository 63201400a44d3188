//! `tracing-subscriber` output delivered one formatted event at a time, with
//! its level, to a caller-supplied sink. The browser host routes it to the
//! devtools console.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

pub struct LevelSink<F> {
    sink: F,
}

impl<F> LevelSink<F>
where
    F: Fn(Level, &str),
{
    pub fn new(sink: F) -> Self {
        Self { sink }
    }
}

/// Buffers one event; the sink sees it when the writer is dropped.
pub struct EventLine<'a, F: Fn(Level, &str)> {
    sink: &'a F,
    level: Level,
    buf: Vec<u8>,
}

impl<F: Fn(Level, &str)> io::Write for EventLine<'_, F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<F: Fn(Level, &str)> Drop for EventLine<'_, F> {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        (self.sink)(self.level, line.trim_end());
    }
}

impl<'a, F: Fn(Level, &str) + 'a> MakeWriter<'a> for LevelSink<F> {
    type Writer = EventLine<'a, F>;

    fn make_writer(&'a self) -> Self::Writer {
        EventLine { sink: &self.sink, level: Level::INFO, buf: Vec::new() }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        EventLine { sink: &self.sink, level: *meta.level(), buf: Vec::new() }
    }
}
