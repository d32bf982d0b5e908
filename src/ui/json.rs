use std::io::{self, Write};

/// Write a single NDJSON event (one JSON object per line).
pub fn write_event(out: &mut impl Write, event: &serde_json::Value) -> io::Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    out.write_all(b"\n")
}

/// Convenience helper that writes to stdout.
pub fn emit(event: serde_json::Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, &event)
}

/// Emit the `complete` event for a command
pub fn complete(command: &str, data: serde_json::Value) -> io::Result<()> {
    emit(serde_json::json!({
        "event": "complete",
        "command": command,
        "data": data,
    }))
}
