//! In-memory tables of alignment rows and the record-level diagnostics
//! collected while building them.

use std::fmt;
use std::io::Read;

use log::warn;

use crate::errors::{ErrorPosition, TableError, TableErrorKind};
use crate::parser::{Header, LineEnding, ReaderOptions, TableReader};
use crate::record::{AlignmentRecord, DerivedRecord};

/// A row that was left out of every derived table, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub position: ErrorPosition,
    pub reason: String,
}

impl Diagnostic {
    /// Log the diagnostic and hand it back
    pub(crate) fn report(self) -> Self {
        warn!("Skipping {}: {}", self.position, self.reason);
        self
    }
}

impl From<TableError> for Diagnostic {
    fn from(err: TableError) -> Self {
        Diagnostic {
            position: err.position,
            reason: err.msg,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.reason)
    }
}

/// How a table was laid out on disk; reused when writing it back out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub header: Header,
    pub delimiter: u8,
    pub line_ending: LineEnding,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            header: Header::canonical(),
            delimiter: ReaderOptions::default().delimiter,
            line_ending: LineEnding::Unix,
        }
    }
}

/// Rows of one input file, in input order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignmentTable {
    pub layout: Layout,
    pub records: Vec<AlignmentRecord>,
}

impl AlignmentTable {
    pub fn new(layout: Layout, records: Vec<AlignmentRecord>) -> Self {
        AlignmentTable { layout, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlignmentRecord> {
        self.records.iter()
    }
}

/// Rows with their query coverage attached, in input order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedTable {
    pub layout: Layout,
    pub records: Vec<DerivedRecord>,
}

impl DerivedTable {
    pub fn new(layout: Layout, records: Vec<DerivedRecord>) -> Self {
        DerivedTable { layout, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DerivedRecord> {
        self.records.iter()
    }

    /// Header names as written to reports: input columns, then derived ones
    pub fn column_names(&self) -> Vec<&str> {
        self.layout
            .header
            .names()
            .iter()
            .map(|s| s.as_str())
            .chain(DerivedRecord::COLUMNS.iter().copied())
            .collect()
    }
}

/// Drain a reader into a table.
///
/// Rows that fail to parse are skipped, logged and returned as diagnostics.
///
/// # Errors
///
/// Any error other than a row-level one (an I/O failure mid-stream) aborts.
pub fn load_table<R: Read>(
    mut reader: TableReader<R>,
) -> Result<(AlignmentTable, Vec<Diagnostic>), TableError> {
    let mut records = Vec::new();
    let mut diagnostics = Vec::new();

    while let Some(result) = reader.next() {
        match result {
            Ok(record) => records.push(record),
            Err(e) if e.kind == TableErrorKind::Record => {
                diagnostics.push(Diagnostic::from(e).report())
            }
            Err(e) => return Err(e),
        }
    }

    let layout = Layout {
        header: reader.header().clone(),
        delimiter: reader.options().delimiter,
        line_ending: reader.line_ending().unwrap_or(LineEnding::Unix),
    };
    Ok((AlignmentTable::new(layout, records), diagnostics))
}
