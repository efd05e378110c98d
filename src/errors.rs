//! The errors blastfilt can return while reading, filtering and writing tables

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Represents where we were in a file when an error occurred.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorPosition {
    /// Line number where the error occurred (starting with 1)
    pub line: u64,
    /// Query ID of the row if available
    pub id: Option<String>,
}

impl fmt::Display for ErrorPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(id) = self.id.as_ref() {
            write!(f, "record '{id}' at ")?;
        }
        write!(f, "line {}", self.line)
    }
}

/// The class of error that occurred
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableErrorKind {
    /// The input file is missing or could not be read
    FileAccess,
    /// The header is missing or lacks required columns, or a column was used
    /// in a way its type does not allow
    Schema,
    /// A single row could not be used (bad field count, unparsable number,
    /// zero query length). Recovered locally by the pipeline stages.
    Record,
    /// An output file could not be written
    Write,
}

/// The only error type that blastfilt returns
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableError {
    /// A description of what went wrong
    pub msg: String,
    /// The type of error that occurred
    pub kind: TableErrorKind,
    /// Position within file
    pub position: ErrorPosition,
    /// The file we were reading or writing, when known
    pub path: Option<PathBuf>,
}

impl TableError {
    pub fn new_file_access(path: &Path, err: &io::Error) -> Self {
        let msg = if err.kind() == io::ErrorKind::NotFound {
            format!("File can't be located with path: '{}'", path.display())
        } else {
            format!("Failed to read '{}': {}", path.display(), err)
        };
        Self {
            msg,
            kind: TableErrorKind::FileAccess,
            position: ErrorPosition::default(),
            path: Some(path.to_path_buf()),
        }
    }

    pub fn new_empty_file() -> Self {
        Self {
            msg: String::from("No header line found. Is the file empty?"),
            kind: TableErrorKind::Schema,
            position: ErrorPosition::default(),
            path: None,
        }
    }

    pub fn new_missing_columns(missing: &[&str], position: ErrorPosition) -> Self {
        let msg = format!("Missing required column(s): {}", missing.join(", "));
        Self {
            msg,
            kind: TableErrorKind::Schema,
            position,
            path: None,
        }
    }

    pub fn new_unrankable_column(column: &str) -> Self {
        Self {
            msg: format!("Column '{}' is not numeric and cannot be used for ranking", column),
            kind: TableErrorKind::Schema,
            position: ErrorPosition::default(),
            path: None,
        }
    }

    pub fn new_field_count(expected: usize, found: usize, position: ErrorPosition) -> Self {
        let msg = format!("Expected {} fields but found {}", expected, found);
        Self {
            msg,
            kind: TableErrorKind::Record,
            position,
            path: None,
        }
    }

    pub fn new_malformed_field(column: &str, value: &str, position: ErrorPosition) -> Self {
        let msg = format!(
            "Invalid value '{}' in column '{}'",
            value.escape_default(),
            column
        );
        Self {
            msg,
            kind: TableErrorKind::Record,
            position,
            path: None,
        }
    }

    pub fn new_zero_query_length(position: ErrorPosition) -> Self {
        Self {
            msg: String::from("Query length (qlen) is 0, length percentage is undefined"),
            kind: TableErrorKind::Record,
            position,
            path: None,
        }
    }

    pub fn new_no_usable_records(rejected: usize) -> Self {
        Self {
            msg: format!(
                "All {} data rows were rejected, no usable records left",
                rejected
            ),
            kind: TableErrorKind::Record,
            position: ErrorPosition::default(),
            path: None,
        }
    }

    pub fn new_write(path: &Path, err: &io::Error) -> Self {
        Self {
            msg: format!("Failed to write '{}': {}", path.display(), err),
            kind: TableErrorKind::Write,
            position: ErrorPosition::default(),
            path: Some(path.to_path_buf()),
        }
    }

    /// Attach the path of the file being processed, unless one is already set
    pub fn with_path(mut self, path: &Path) -> Self {
        if self.path.is_none() {
            self.path = Some(path.to_path_buf());
        }
        self
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TableErrorKind::FileAccess | TableErrorKind::Write => write!(f, "{}", self.msg),
            TableErrorKind::Schema | TableErrorKind::Record => {
                write!(f, "{}", self.msg)?;
                if self.position.line > 0 {
                    write!(f, " ({})", self.position)?;
                }
                if let Some(path) = self.path.as_ref() {
                    write!(f, " in '{}'", path.display())?;
                }
                Ok(())
            }
        }
    }
}

impl From<io::Error> for TableError {
    fn from(err: io::Error) -> Self {
        Self {
            msg: err.to_string(),
            kind: TableErrorKind::FileAccess,
            position: ErrorPosition::default(),
            path: None,
        }
    }
}

impl StdError for TableError {}
