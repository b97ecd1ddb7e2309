use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use crate::cmd::RecordKind;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Records drained in one poll, kept both decoded and as received.
#[derive(Debug, Default)]
pub struct RecordBatch {
    pub values: Vec<serde_json::Value>,
    pub raw: Vec<u8>,
}

impl RecordBatch {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    port: &'a str,
    record: &'a str,
    record_size: usize,
    count: usize,
    values: &'a [serde_json::Value],
    timestamp: String,
}

pub fn print_batch(batch: &RecordBatch, port: &str, kind: RecordKind, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = BatchOutput {
                port,
                record: kind.name(),
                record_size: kind.size(),
                count: batch.len(),
                values: &batch.values,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "RECORD", "COUNT", "VALUES"])
                .add_row(vec![
                    port.to_string(),
                    kind.name().to_string(),
                    batch.len().to_string(),
                    values_preview(&batch.values),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "port={} record={} count={} values={}",
                port,
                kind.name(),
                batch.len(),
                values_preview(&batch.values)
            );
        }
        OutputFormat::Raw => {
            print_raw(&batch.raw);
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn values_preview(values: &[serde_json::Value]) -> String {
    let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", joined.join(", "))
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_lists_values_in_order() {
        let values = vec![serde_json::json!(1), serde_json::json!(-2), serde_json::json!(3.5)];
        assert_eq!(values_preview(&values), "[1, -2, 3.5]");
    }

    #[test]
    fn batch_len_tracks_values() {
        let batch = RecordBatch {
            values: vec![serde_json::json!(7)],
            raw: vec![7],
        };
        assert_eq!(batch.len(), 1);
        assert!(!batch.is_empty());
        assert!(RecordBatch::default().is_empty());
    }
}
