/// Append-only destination for human-readable audit lines.
///
/// The ledger writes one line per successful `add` and never reads back.
/// What happens to the lines afterwards is up to the implementation.
pub trait AuditSink {
    fn record(&mut self, line: String);
}

impl AuditSink for Vec<String> {
    fn record(&mut self, line: String) {
        self.push(line);
    }
}

/// Audit sink that forwards each line to `tracing` at `INFO` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAudit;

impl AuditSink for TracingAudit {
    fn record(&mut self, line: String) {
        tracing::info!(target: "tally::audit", "{line}");
    }
}
