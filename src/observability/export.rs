//! File-based OTLP span export.
//!
//! Spans are serialized to OTLP JSON and appended, one batch per line, to a
//! trace file under the data directory. The file rotates on a size threshold
//! with a small number of timestamped backups, so long-lived sessions cannot
//! grow it without bound. The output is loadable by standard OTLP trace
//! tooling.

use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanKind, Status, TraceError};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Value as JsonValue};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::SystemTime;

/// Rotate the trace file once it exceeds this size.
const MAX_TRACE_FILE_BYTES: u64 = 8 * 1024 * 1024;

/// Rotated backups kept on disk.
const TRACE_BACKUPS: usize = 2;

/// Instrumentation scope name stamped on exported spans.
const SCOPE_NAME: &str = "rolodex";

/// Appending line writer with size-based rotation.
///
/// The file opens lazily on first write and is flushed per line, so traces
/// survive even an aborted process. A `Mutex` guards the handle; exporters
/// may be driven from worker contexts the subscriber owns.
struct TraceWriter {
    path: PathBuf,
    file: Mutex<Option<std::fs::File>>,
}

impl TraceWriter {
    const fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: Mutex::new(None),
        }
    }

    /// Appends one line, rotating first when the file has grown too large.
    fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut slot = self
            .file
            .lock()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

        let oversized = fs::metadata(&self.path)
            .map(|m| m.len() > MAX_TRACE_FILE_BYTES)
            .unwrap_or(false);
        if oversized {
            *slot = None;
            self.rotate()?;
        }

        if slot.is_none() {
            *slot = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?,
            );
        }
        let file = slot
            .as_mut()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "no trace file"))?;

        writeln!(file, "{line}")?;
        file.flush()
    }

    /// Renames the current file to a timestamped backup and prunes old ones.
    fn rotate(&self) -> std::io::Result<()> {
        let stamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let backup = self.path.with_extension(format!("json.{stamp}"));
        if self.path.exists() {
            fs::rename(&self.path, &backup)?;
        }
        self.prune_backups();
        Ok(())
    }

    /// Deletes backups beyond the retention count, oldest first.
    ///
    /// Individual deletion failures are ignored so one stuck file cannot stop
    /// the rotation.
    fn prune_backups(&self) {
        let Some(parent) = self.path.parent() else {
            return;
        };
        let Some(stem) = self.path.file_stem().and_then(|s| s.to_str()) else {
            return;
        };

        let mut backups: Vec<PathBuf> = fs::read_dir(parent)
            .into_iter()
            .flatten()
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(stem) && n.contains(".json."))
            })
            .collect();

        backups.sort_by_key(|p| {
            std::cmp::Reverse(fs::metadata(p).and_then(|m| m.modified()).ok())
        });
        for old in backups.iter().skip(TRACE_BACKUPS) {
            let _ = fs::remove_file(old);
        }
    }
}

/// Span exporter writing OTLP JSON lines through a [`TraceWriter`].
struct FileSpanExporter {
    writer: TraceWriter,
    resource: Resource,
    is_shutdown: AtomicBool,
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("path", &self.writer.path)
            .finish_non_exhaustive()
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Box::pin(std::future::ready(Err(TraceError::from(
                "exporter is shut down",
            ))));
        }

        let document = batch_json(&self.resource, &batch).to_string();
        let result = self
            .writer
            .write_line(&document)
            .map_err(|e| TraceError::from(e.to_string()));
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.resource = resource.clone();
    }
}

/// Builds a tracer provider that exports spans to `file_path`.
///
/// Uses a simple (per-span, unbatched) export strategy; span volume in a view
/// session is a handful per user action, so batching buys nothing.
pub fn tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter {
        writer: TraceWriter::new(file_path),
        resource: resource.clone(),
        is_shutdown: AtomicBool::new(false),
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

/// Formats one export batch as a complete OTLP JSON document.
fn batch_json(resource: &Resource, batch: &[SpanData]) -> JsonValue {
    let resource_attrs: Vec<JsonValue> = resource
        .iter()
        .map(|(key, value)| json!({ "key": key.to_string(), "value": value_json(value) }))
        .collect();
    let spans: Vec<JsonValue> = batch.iter().map(span_json).collect();

    json!({
        "resourceSpans": [{
            "resource": { "attributes": resource_attrs },
            "scopeSpans": [{
                "scope": { "name": SCOPE_NAME },
                "spans": spans,
            }],
        }],
    })
}

/// Formats a single span in OTLP shape.
fn span_json(span: &SpanData) -> JsonValue {
    let parent = if span.parent_span_id == opentelemetry::trace::SpanId::INVALID {
        String::new()
    } else {
        format!("{:016x}", span.parent_span_id)
    };
    let (status_code, status_message) = match &span.status {
        Status::Unset => (0, String::new()),
        Status::Ok => (1, String::new()),
        Status::Error { description } => (2, description.to_string()),
    };
    let events: Vec<JsonValue> = span
        .events
        .iter()
        .map(|event| {
            json!({
                "timeUnixNano": unix_nanos(event.timestamp),
                "name": event.name,
                "attributes": attrs_json(&event.attributes),
            })
        })
        .collect();

    json!({
        "traceId": format!("{:032x}", span.span_context.trace_id()),
        "spanId": format!("{:016x}", span.span_context.span_id()),
        "parentSpanId": parent,
        "name": span.name,
        "kind": kind_code(&span.span_kind),
        "startTimeUnixNano": unix_nanos(span.start_time),
        "endTimeUnixNano": unix_nanos(span.end_time),
        "attributes": attrs_json(&span.attributes),
        "status": { "code": status_code, "message": status_message },
    })
}

/// Formats a key-value list in OTLP shape.
fn attrs_json(attributes: &[opentelemetry::KeyValue]) -> Vec<JsonValue> {
    attributes
        .iter()
        .map(|kv| json!({ "key": kv.key.to_string(), "value": value_json(&kv.value) }))
        .collect()
}

/// Maps an attribute value to its OTLP representation.
///
/// OTLP carries integers as strings; arrays fall back to their debug form.
fn value_json(value: &opentelemetry::Value) -> JsonValue {
    use opentelemetry::Value;
    match value {
        Value::Bool(b) => json!({ "boolValue": b }),
        Value::I64(i) => json!({ "intValue": i.to_string() }),
        Value::F64(f) => json!({ "doubleValue": f }),
        Value::String(s) => json!({ "stringValue": s.to_string() }),
        Value::Array(_) => json!({ "stringValue": format!("{value:?}") }),
    }
}

/// OTLP integer code for a span kind.
const fn kind_code(kind: &SpanKind) -> u8 {
    match kind {
        SpanKind::Internal => 1,
        SpanKind::Server => 2,
        SpanKind::Client => 3,
        SpanKind::Producer => 4,
        SpanKind::Consumer => 5,
    }
}

/// Nanoseconds since the unix epoch, as the string OTLP expects.
fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_json_maps_otlp_shapes() {
        assert_eq!(
            value_json(&opentelemetry::Value::Bool(true)),
            json!({ "boolValue": true })
        );
        assert_eq!(
            value_json(&opentelemetry::Value::I64(42)),
            json!({ "intValue": "42" })
        );
        assert_eq!(
            value_json(&opentelemetry::Value::from("hi")),
            json!({ "stringValue": "hi" })
        );
    }

    #[test]
    fn writer_appends_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("traces.json");
        let writer = TraceWriter::new(path.clone());

        writer.write_line("{\"a\":1}").expect("write");
        writer.write_line("{\"b\":2}").expect("write");

        let contents = fs::read_to_string(&path).expect("read");
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn writer_rotates_oversized_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("traces.json");
        fs::write(&path, vec![b'x'; (MAX_TRACE_FILE_BYTES + 1) as usize]).expect("seed");

        let writer = TraceWriter::new(path.clone());
        writer.write_line("{\"fresh\":true}").expect("write");

        let contents = fs::read_to_string(&path).expect("read");
        assert_eq!(contents.lines().count(), 1);

        let backups = fs::read_dir(dir.path())
            .expect("dir")
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".json."))
            .count();
        assert_eq!(backups, 1);
    }
}
