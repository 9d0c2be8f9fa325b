/// Receives each complete stderr line of a dxf_outlines run, in order.
pub trait StderrSink: Send + Sync {
    fn line(&self, line: &str);
}

/// Forwards lines to `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl StderrSink for TracingSink {
    fn line(&self, line: &str) {
        tracing::debug!(target: "dxf_outlines", "{}", line);
    }
}

impl<F> StderrSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn line(&self, line: &str) {
        self(line)
    }
}
