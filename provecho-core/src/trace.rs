//! Per-request diagnostic trace

use tracing::debug;

/// Append-only list of diagnostic lines collected while handling one request.
///
/// The trace is threaded explicitly through the pipeline (never global state)
/// and attached to the response payload when `debug_trace` is enabled. Every
/// line is also mirrored to `tracing` at debug level.
#[derive(Debug, Default)]
pub struct Trace {
    lines: Vec<String>,
}

impl Trace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one diagnostic line
    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        debug!("{}", line);
        self.lines.push(line);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Consume the trace, returning the collected lines in order
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_preserves_order() {
        let mut trace = Trace::new();
        assert!(trace.is_empty());

        trace.log("first");
        trace.log(format!("second: {}", 2));

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.into_lines(), vec!["first", "second: 2"]);
    }
}
