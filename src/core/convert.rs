//! JSON Lines decoding and CSV rendering.
//!
//! Bodies arrive as arbitrary byte chunks. [`LineSplitter`] reassembles them
//! into lines, [`JsonLinesDecoder`] turns each non-blank line into a
//! [`Record`], and [`build_table`] / [`write_csv`] produce the output file.

use crate::core::{Record, Table};
use crate::utils::error::{EtlError, Result};
use serde_json::Value;
use std::collections::HashSet;

/// Splits a byte stream on `\n`, carrying partial lines across chunks.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buffer: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|b| *b == b'\n') {
            self.buffer.extend_from_slice(&rest[..pos]);
            lines.push(std::mem::take(&mut self.buffer));
            rest = &rest[pos + 1..];
        }
        self.buffer.extend_from_slice(rest);

        lines
    }

    /// The trailing line when the body does not end with a newline.
    pub fn finish(self) -> Option<Vec<u8>> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line_number: usize,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ParsedRecords {
    pub records: Vec<Record>,
    pub errors: Vec<LineError>,
    pub lines_seen: usize,
}

pub struct JsonLinesDecoder {
    source: String,
    splitter: LineSplitter,
    parsed: ParsedRecords,
}

impl JsonLinesDecoder {
    /// `source` only labels log entries.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            splitter: LineSplitter::new(),
            parsed: ParsedRecords::default(),
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) {
        for line in self.splitter.push(chunk) {
            self.decode_line(&line);
        }
    }

    pub fn finish(mut self) -> ParsedRecords {
        let splitter = std::mem::take(&mut self.splitter);
        if let Some(line) = splitter.finish() {
            self.decode_line(&line);
        }
        self.parsed
    }

    fn decode_line(&mut self, line: &[u8]) {
        self.parsed.lines_seen += 1;
        let line_number = self.parsed.lines_seen;

        if line.iter().all(u8::is_ascii_whitespace) {
            return;
        }

        match serde_json::from_slice::<Value>(line) {
            Ok(Value::Object(data)) => self.parsed.records.push(Record::new(data)),
            Ok(other) => self.reject(line_number, format!("expected a JSON object, got {}", kind_of(&other))),
            Err(e) => self.reject(line_number, e.to_string()),
        }
    }

    fn reject(&mut self, line_number: usize, message: String) {
        tracing::warn!(
            source = %self.source,
            line = line_number,
            error = %message,
            "Skipping undecodable line"
        );
        self.parsed.errors.push(LineError {
            line_number,
            message,
        });
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn parse_json_lines(source: &str, body: &[u8]) -> ParsedRecords {
    let mut decoder = JsonLinesDecoder::new(source);
    decoder.feed(body);
    decoder.finish()
}

/// Columns are every key seen, in order of first appearance.
pub fn build_table(records: Vec<Record>) -> Result<Table> {
    if records.is_empty() {
        return Err(EtlError::processing("no valid JSON records in response"));
    }

    let mut seen = HashSet::new();
    let mut columns: Vec<String> = Vec::new();
    for record in &records {
        for key in record.data.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
    }

    if columns.is_empty() {
        return Err(EtlError::processing("records contain no fields"));
    }

    Ok(Table {
        columns,
        rows: records,
    })
}

pub fn write_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;

    for row in &table.rows {
        let cells = table
            .columns
            .iter()
            .map(|column| row.data.get(column).map(cell_value).unwrap_or_default());
        writer.write_record(cells)?;
    }

    writer.into_inner().map_err(|e| {
        EtlError::IoError(std::io::Error::new(e.error().kind(), e.error().to_string()))
    })
}

/// Scalars print bare, nested values as compact JSON, null as an empty cell.
fn cell_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
