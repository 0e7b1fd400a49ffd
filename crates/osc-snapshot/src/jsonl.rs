//! Line-delimited JSON record streams.
//!
//! One [`RawEntity`] object per line. Blank lines are skipped. Line numbers
//! in errors are 1-based.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::Path;

use osc_types::RawEntity;
use tracing::debug;

use crate::error::{SnapshotError, SnapshotResult};
use crate::snapshot::{DuplicatePolicy, EntitySnapshot};

/// Lazy reader yielding one raw record per non-blank line.
pub struct JsonLinesReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> JsonLinesReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesReader<R> {
    type Item = SnapshotResult<RawEntity>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(SnapshotError::Io(e))),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(
                serde_json::from_str(&line).map_err(|e| SnapshotError::Parse {
                    line: self.line_no,
                    reason: e.to_string(),
                }),
            );
        }
    }
}

/// Open a record stream file.
pub fn read_records(path: &Path) -> SnapshotResult<JsonLinesReader<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(JsonLinesReader::new(BufReader::new(file)))
}

/// Read a record stream file and build a snapshot from it.
pub fn load_snapshot(path: &Path, policy: DuplicatePolicy) -> SnapshotResult<EntitySnapshot> {
    debug!(path = %path.display(), "loading snapshot");
    EntitySnapshot::from_raw(read_records(path)?, policy)
}

/// Write records to a sink, one JSON object per line.
pub fn write_records<'a, W, I>(mut sink: W, records: I) -> SnapshotResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a RawEntity>,
{
    let mut count = 0;
    for record in records {
        serde_json::to_writer(&mut sink, record).map_err(std::io::Error::from)?;
        sink.write_all(b"\n")?;
        count += 1;
    }
    sink.flush()?;
    Ok(count)
}

/// Write records to a file. The file only appears once fully written.
pub fn write_records_to_file<'a, I>(path: &Path, records: I) -> SnapshotResult<usize>
where
    I: IntoIterator<Item = &'a RawEntity>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    let count = write_records(std::io::BufWriter::new(tmp.as_file_mut()), records)?;
    tmp.persist(path).map_err(|e| SnapshotError::Io(e.error))?;
    Ok(count)
}
