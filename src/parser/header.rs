use crate::errors::{ErrorPosition, TableError};
use crate::record::Column;

/// The header line of a table: every column name in input order, and where
/// each required column sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    /// Index into `names`, in `Column::REQUIRED` order
    required: [usize; 9],
}

impl Header {
    /// Validate the header fields against the required column set.
    ///
    /// Extra columns are kept and may appear anywhere. When a name repeats,
    /// the first occurrence is used.
    ///
    /// # Errors
    ///
    /// Returns a schema error listing every missing required column.
    pub fn from_fields(names: Vec<String>, line: u64) -> Result<Self, TableError> {
        let mut required = [0; 9];
        let mut missing = Vec::new();
        for (slot, column) in Column::REQUIRED.iter().enumerate() {
            match names.iter().position(|n| n == column.name()) {
                Some(idx) => required[slot] = idx,
                None => missing.push(column.name()),
            }
        }

        if !missing.is_empty() {
            return Err(TableError::new_missing_columns(
                &missing,
                ErrorPosition { line, id: None },
            ));
        }

        Ok(Header { names, required })
    }

    /// Header with only the required columns, in their canonical order
    pub fn canonical() -> Self {
        let names = Column::REQUIRED
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        Header {
            names,
            required: [0, 1, 2, 3, 4, 5, 6, 7, 8],
        }
    }

    /// All column names in input order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of fields every data row must have
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a required column within a row
    pub fn index_of(&self, column: Column) -> usize {
        // variants are declared in `Column::REQUIRED` order
        self.required[column as usize]
    }
}
