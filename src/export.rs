//! Export artifact assembly
//!
//! A job produces exactly one tabular artifact (fixed header, one row per
//! successfully fetched unit or entity) followed by zero or more media
//! artifacts. Artifacts are pure derivations of the data map: building them
//! performs no network access and repeating the build yields identical
//! content. File materialization belongs to the download sink.

use std::io::Write;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use zip::write::FileOptions;

use crate::error::{Error, Result};

/// A primitive scalar cell of a tabular artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// Text value
    Text(String),
    /// Integer value
    Int(i64),
    /// Timestamp value
    Time(DateTime<Utc>),
    /// Missing value
    Empty,
}

impl Cell {
    /// Text cell from anything stringly.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Timestamp cell from milliseconds since the Unix epoch; out-of-range
    /// input becomes [`Cell::Empty`].
    pub fn time_millis(millis: i64) -> Self {
        match Utc.timestamp_millis_opt(millis).single() {
            Some(ts) => Cell::Time(ts),
            None => Cell::Empty,
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

/// The tabular artifact of a job: a fixed header row plus data rows whose
/// cell order and meaning are stable across jobs of the same kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    /// Artifact title (becomes the spreadsheet file name downstream)
    pub title: String,
    /// Header row, fixed per job kind
    pub header: Vec<&'static str>,
    /// Data rows, one per successfully fetched unit/entity
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Empty table with the given title and header.
    pub fn new(title: impl Into<String>, header: Vec<&'static str>) -> Self {
        Self {
            title: title.into(),
            header,
            rows: Vec::new(),
        }
    }

    /// Append a data row.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(
            row.len(),
            self.header.len(),
            "row width must match the header"
        );
        self.rows.push(row);
    }
}

/// Payload of a media artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaPayload {
    /// Direct remote URL, resolved by the download sink
    Url(String),
    /// Raw bytes already fetched (or a packed archive of several assets)
    Bytes(Vec<u8>),
}

/// A named binary/media artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaArtifact {
    /// File name the sink should materialize
    pub filename: String,
    /// Optional subdirectory grouping related assets (e.g. per post)
    pub dir: Option<String>,
    /// The payload
    pub payload: MediaPayload,
}

impl MediaArtifact {
    /// URL-reference artifact.
    pub fn url(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            dir: None,
            payload: MediaPayload::Url(url.into()),
        }
    }

    /// URL-reference artifact placed under a subdirectory.
    pub fn url_in_dir(
        filename: impl Into<String>,
        dir: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            dir: Some(dir.into()),
            payload: MediaPayload::Url(url.into()),
        }
    }
}

/// One export artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Artifact {
    /// The tabular report
    Table(Table),
    /// A binary/media file
    Media(MediaArtifact),
}

/// Pack several named byte payloads into a single zip archive artifact.
///
/// Used when one conceptual item carries multiple sub-assets that should
/// arrive as one file. Entry order is preserved, so packing the same entries
/// twice yields byte-identical archives.
pub fn bundle_archive(
    archive_name: impl Into<String>,
    entries: &[(String, Vec<u8>)],
) -> Result<MediaArtifact> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, bytes) in entries {
        writer
            .start_file(name, options)
            .map_err(|e| Error::Export(format!("failed to add archive entry '{name}': {e}")))?;
        writer
            .write_all(bytes)
            .map_err(|e| Error::Export(format!("failed to write archive entry '{name}': {e}")))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| Error::Export(format!("failed to finish archive: {e}")))?;

    Ok(MediaArtifact {
        filename: archive_name.into(),
        dir: None,
        payload: MediaPayload::Bytes(cursor.into_inner()),
    })
}

/// The host's file-download boundary.
///
/// The pipeline's obligation ends at producing the artifact list; the sink
/// performs the actual materialization (browser download, disk write, ...).
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Materialize the given artifacts.
    async fn deliver(&self, artifacts: &[Artifact]) -> Result<()>;
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn time_millis_builds_utc_timestamps() {
        let cell = Cell::time_millis(1_700_000_000_000);
        match cell {
            Cell::Time(ts) => assert_eq!(ts.timestamp_millis(), 1_700_000_000_000),
            other => panic!("expected Time cell, got {other:?}"),
        }
    }

    #[test]
    fn time_millis_out_of_range_is_empty() {
        assert_eq!(Cell::time_millis(i64::MAX), Cell::Empty);
    }

    #[test]
    fn bundle_archive_round_trips_entries() {
        let entries = vec![
            ("a/one.png".to_string(), vec![1u8, 2, 3]),
            ("a/two.png".to_string(), vec![4u8, 5]),
        ];
        let artifact = bundle_archive("post-a.zip", &entries).unwrap();
        assert_eq!(artifact.filename, "post-a.zip");

        let bytes = match artifact.payload {
            MediaPayload::Bytes(b) => b,
            MediaPayload::Url(_) => panic!("archive must carry bytes"),
        };
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = Vec::new();
        archive
            .by_name("a/one.png")
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, vec![1, 2, 3]);
    }

    #[test]
    fn bundle_archive_is_deterministic() {
        let entries = vec![("x".to_string(), vec![9u8; 16])];
        let first = bundle_archive("b.zip", &entries).unwrap();
        let second = bundle_archive("b.zip", &entries).unwrap();
        assert_eq!(first, second, "repeat packing must be byte-identical");
    }
}
