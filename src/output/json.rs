//! JSON reporter
//!
//! Writes the final document as pretty-printed JSON to stdout or a file.

use crate::output::traits::{OutputError, OutputResult, Report, Reporter};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Where a JSON document goes
#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Stdout,
    File(PathBuf),
}

/// Emits reports as JSON
#[derive(Debug, Clone)]
pub struct JsonReporter {
    destination: Destination,
}

impl JsonReporter {
    /// Writes to standard output
    pub fn stdout() -> Self {
        Self {
            destination: Destination::Stdout,
        }
    }

    /// Writes to `path`, replacing any existing file
    pub fn to_file(path: impl AsRef<Path>) -> Self {
        Self {
            destination: Destination::File(path.as_ref().to_path_buf()),
        }
    }

    /// Writes to `path` if one is given, otherwise to stdout
    pub fn from_path(path: Option<&str>) -> Self {
        match path {
            Some(path) => Self::to_file(path),
            None => Self::stdout(),
        }
    }
}

impl Reporter for JsonReporter {
    fn emit(&mut self, report: &Report) -> OutputResult<()> {
        let json = format_json(report)?;

        match &self.destination {
            Destination::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(json.as_bytes())?;
                stdout.write_all(b"\n")?;
                stdout.flush()?;
            }
            Destination::File(path) => {
                let mut file = File::create(path).map_err(|e| {
                    OutputError::Write(format!("cannot create {}: {}", path.display(), e))
                })?;
                file.write_all(json.as_bytes())?;
                file.write_all(b"\n")?;
                tracing::info!("Report written to {}", path.display());
            }
        }

        Ok(())
    }
}

/// Formats a report as pretty-printed JSON
pub fn format_json(report: &Report) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::traits::CrawlReport;
    use tempfile::TempDir;

    #[test]
    fn test_emit_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("endpoints.json");

        let report = Report::from(CrawlReport {
            success: true,
            total_endpoints: 0,
            endpoints: vec![],
        });
        JsonReporter::to_file(&path).emit(&report).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["totalEndpoints"], 0);
    }

    #[test]
    fn test_emit_to_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("endpoints.json");

        let report = Report::from(CrawlReport {
            success: true,
            total_endpoints: 0,
            endpoints: vec![],
        });
        let result = JsonReporter::to_file(&path).emit(&report);
        assert!(matches!(result, Err(OutputError::Write(_))));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(JsonReporter::from_path(None).destination, Destination::Stdout);
        assert_eq!(
            JsonReporter::from_path(Some("out.json")).destination,
            Destination::File(PathBuf::from("out.json"))
        );
    }
}
