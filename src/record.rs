use std::borrow::Cow;

/// The columns every input table must carry, named as in BLAST `-outfmt`
/// format specifiers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    QuerySeqId,
    SubjectSeqId,
    PercentIdentity,
    IdenticalCount,
    EValue,
    BitScore,
    AlignLength,
    QueryLength,
    SubjectLength,
}

impl Column {
    pub const REQUIRED: [Column; 9] = [
        Column::QuerySeqId,
        Column::SubjectSeqId,
        Column::PercentIdentity,
        Column::IdenticalCount,
        Column::EValue,
        Column::BitScore,
        Column::AlignLength,
        Column::QueryLength,
        Column::SubjectLength,
    ];

    /// The header name of the column
    pub fn name(&self) -> &'static str {
        match self {
            Self::QuerySeqId => "qseqid",
            Self::SubjectSeqId => "sseqid",
            Self::PercentIdentity => "pident",
            Self::IdenticalCount => "nident",
            Self::EValue => "evalue",
            Self::BitScore => "bitscore",
            Self::AlignLength => "length",
            Self::QueryLength => "qlen",
            Self::SubjectLength => "slen",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Self::REQUIRED.iter().copied().find(|c| c.name() == name)
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::QuerySeqId | Self::SubjectSeqId)
    }
}

/// One row of a BLAST tabular result
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    /// Query sequence id
    pub query_id: String,
    /// Subject sequence id
    pub subject_id: String,
    /// Percentage of identical matches, 0 to 100
    pub percent_identity: f64,
    /// Number of identical matches
    pub identical_count: u64,
    pub e_value: f64,
    pub bit_score: f64,
    /// Alignment length
    pub align_length: u64,
    /// Query sequence length
    pub query_length: u64,
    /// Subject sequence length
    pub subject_length: u64,
    /// Every field of the row as it was read, in input column order
    pub(crate) fields: Vec<String>,
    /// Line of the row in the input (starting with 1)
    pub(crate) line: u64,
}

impl AlignmentRecord {
    /// The original text of every field, in input column order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Line number of the row in the input file
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn is_self_match(&self) -> bool {
        self.query_id == self.subject_id
    }

    /// Value of a column usable as a grouping key
    pub fn key(&self, column: Column) -> Cow<'_, str> {
        match column {
            Column::QuerySeqId => Cow::Borrowed(&self.query_id),
            Column::SubjectSeqId => Cow::Borrowed(&self.subject_id),
            Column::PercentIdentity => Cow::Owned(self.percent_identity.to_string()),
            Column::IdenticalCount => Cow::Owned(self.identical_count.to_string()),
            Column::EValue => Cow::Owned(self.e_value.to_string()),
            Column::BitScore => Cow::Owned(self.bit_score.to_string()),
            Column::AlignLength => Cow::Owned(self.align_length.to_string()),
            Column::QueryLength => Cow::Owned(self.query_length.to_string()),
            Column::SubjectLength => Cow::Owned(self.subject_length.to_string()),
        }
    }

    /// Value of a numeric column, `None` for the id columns
    pub fn numeric(&self, column: Column) -> Option<f64> {
        match column {
            Column::QuerySeqId | Column::SubjectSeqId => None,
            Column::PercentIdentity => Some(self.percent_identity),
            Column::IdenticalCount => Some(self.identical_count as f64),
            Column::EValue => Some(self.e_value),
            Column::BitScore => Some(self.bit_score),
            Column::AlignLength => Some(self.align_length as f64),
            Column::QueryLength => Some(self.query_length as f64),
            Column::SubjectLength => Some(self.subject_length as f64),
        }
    }
}

/// An alignment row together with its coverage of the query
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRecord {
    pub record: AlignmentRecord,
    /// `align_length / query_length * 100`
    pub length_pct: f64,
    /// Whether `length_pct` is strictly above the full-length threshold
    pub is_full_length: bool,
}

impl DerivedRecord {
    /// Header names of the derived columns, appended after the input columns
    pub const COLUMNS: [&'static str; 2] = ["length_pct", "full_length"];

    /// Text of the derived fields as written to reports
    pub fn derived_fields(&self) -> [String; 2] {
        let full = if self.is_full_length { "True" } else { "False" };
        [format_float(self.length_pct), full.to_string()]
    }
}

/// Shortest round-trip representation, keeping a `.0` on whole numbers
pub(crate) fn format_float(value: f64) -> String {
    let s = value.to_string();
    if value.is_finite() && !s.contains('.') {
        format!("{}.0", s)
    } else {
        s
    }
}
