//! Report output in JSON or JSON Lines.
//!
//! Reports describe parsed requests and generation results. JSON writes a
//! single array at the end; JSONL streams one record per line as results
//! come in.

use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::ThumbnailError;
use crate::request::ThumbnailRequest;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// A JSON array of all records
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Outcome of inspecting or generating one requested path.
#[derive(Debug, Clone, Serialize)]
pub struct RequestReport {
    pub request_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<ThumbnailRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_full_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestReport {
    /// A report for a successfully parsed request, to be filled in further.
    pub fn for_request(request: ThumbnailRequest) -> Self {
        Self {
            request_path: request.request_path().to_path_buf(),
            request: Some(request),
            ..Self::failed(PathBuf::new(), None)
        }
    }

    /// A report for a path that failed, with or without a parsed request.
    pub fn failed(request_path: PathBuf, error: Option<&ThumbnailError>) -> Self {
        Self {
            request_path,
            request: None,
            allowed: None,
            main_full_path: None,
            output: None,
            width: None,
            height: None,
            error: error.map(ToString::to_string),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Writes reports to the underlying writer.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    pending: Vec<serde_json::Value>,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects the JSON format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            pending: Vec::new(),
            items_written: 0,
        }
    }

    /// Write one record. JSON records are buffered until [`finish`](Self::finish).
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                self.pending
                    .push(serde_json::to_value(item).map_err(io::Error::other)?);
            }
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
        }
        self.items_written += 1;
        Ok(())
    }

    /// Get the number of records written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Emit buffered JSON records and flush; returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.format == OutputFormat::Json {
            if self.pretty {
                serde_json::to_writer_pretty(&mut self.writer, &self.pending)
                    .map_err(io::Error::other)?;
            } else {
                serde_json::to_writer(&mut self.writer, &self.pending)
                    .map_err(io::Error::other)?;
            }
            writeln!(self.writer)?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(path: &str) -> RequestReport {
        RequestReport::for_request(ThumbnailRequest::from_path(path).unwrap())
    }

    #[test]
    fn test_jsonl_streams_one_line_per_record() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::JsonLines, false);
        writer.write(&report("a/cat-64x64.png")).unwrap();
        writer.write(&report("a/dog-64x64.png")).unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"base_name\":\"cat\""));
    }

    #[test]
    fn test_json_writes_array_on_finish() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::Json, true);
        writer.write(&report("a/cat-64x64.png")).unwrap();
        writer.write(&report("a/dog-64x64.png")).unwrap();

        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_report_skips_empty_fields() {
        let err = ThumbnailError::MalformedName {
            path: PathBuf::from("bad.jpg"),
        };
        let report = RequestReport::failed(PathBuf::from("bad.jpg"), Some(&err));
        assert!(report.is_error());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["error"], "Bad filename bad.jpg");
        assert!(json.get("request").is_none());
        assert!(json.get("width").is_none());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("ndjson"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }
}
