use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use crate::errors::{ErrorPosition, TableError};
use crate::parser::header::Header;
use crate::parser::utils::{
    find_line_ending, is_blank, split_fields, trim_line_end, LineEnding, Position, BUFSIZE,
    DEFAULT_DELIMITER,
};
use crate::record::{AlignmentRecord, Column};

/// How a table is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Field separator, also used when writing reports
    pub delimiter: u8,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// Parser for delimited BLAST result tables.
/// Only use this directly if you know your file is not compressed, as it
/// does not handle decompression.
/// If you are unsure, it's better to use [parse_table_file](fn.parse_table_file.html).
pub struct TableReader<R: io::Read> {
    buf_reader: buffer_redux::BufReader<R>,
    header: Header,
    options: ReaderOptions,
    line_buf: Vec<u8>,
    position: Position,
    line_ending: Option<LineEnding>,
    finished: bool,
}

impl<R> TableReader<R>
where
    R: io::Read,
{
    /// Creates a new reader with the default buffer size of 64 KiB and
    /// reads the header line.
    ///
    /// # Example:
    ///
    /// ```
    /// use blastfilt::parser::{ReaderOptions, TableReader};
    /// let table = b"qseqid\tsseqid\tpident\tnident\tevalue\tbitscore\tlength\tqlen\tslen\n\
    ///               Q1\tS1\t99.0\t100\t0.0\t200\t100\t100\t100\n";
    ///
    /// let mut reader = TableReader::new(&table[..], ReaderOptions::default()).unwrap();
    /// let record = reader.next().unwrap().unwrap();
    /// assert_eq!(record.query_id, "Q1")
    /// ```
    pub fn new(reader: R, options: ReaderOptions) -> Result<TableReader<R>, TableError> {
        TableReader::with_capacity(reader, BUFSIZE, options)
    }

    /// Creates a new reader with a given buffer capacity.
    pub fn with_capacity(
        reader: R,
        capacity: usize,
        options: ReaderOptions,
    ) -> Result<TableReader<R>, TableError> {
        let mut buf_reader = buffer_redux::BufReader::with_capacity(capacity, reader);
        let mut line_buf = Vec::with_capacity(256);
        let mut position = Position::new(0, 0);

        loop {
            line_buf.clear();
            let n = buf_reader.read_until(b'\n', &mut line_buf)?;
            if n == 0 {
                return Err(TableError::new_empty_file());
            }
            position.line += 1;
            position.byte += n as u64;
            if !is_blank(&line_buf) {
                break;
            }
        }

        let line_ending = find_line_ending(&line_buf);
        let names = split_fields(trim_line_end(&line_buf), options.delimiter)
            .into_iter()
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect();
        let header = Header::from_fields(names, position.line)?;

        Ok(TableReader {
            buf_reader,
            header,
            options,
            line_buf,
            position,
            line_ending,
            finished: false,
        })
    }
}

impl TableReader<File> {
    /// Creates a reader from a file path.
    ///
    /// # Example:
    ///
    /// ```no_run
    /// use blastfilt::parser::{ReaderOptions, TableReader};
    ///
    /// let mut reader = TableReader::from_path("otus_blast.tsv", ReaderOptions::default()).unwrap();
    ///
    /// // (... do something with the reader)
    /// ```
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        options: ReaderOptions,
    ) -> Result<TableReader<File>, TableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TableError::new_file_access(path, &e))?;
        TableReader::new(file, options).map_err(|e| e.with_path(path))
    }
}

impl<R> TableReader<R>
where
    R: io::Read,
{
    /// The validated header of the table
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn options(&self) -> ReaderOptions {
        self.options
    }

    /// Returns the line/byte position of the last line read
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns whether the header line ended with \r\n or \n.
    /// `None` if the table is a lone header without a line terminator.
    pub fn line_ending(&self) -> Option<LineEnding> {
        self.line_ending
    }

    /// Gets the next record in the table.
    /// Returns `None` at EOF. A row that cannot be parsed gives an error of
    /// kind `Record`; reading can continue after it. Any other error ends
    /// the stream.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Result<AlignmentRecord, TableError>> {
        if self.finished {
            return None;
        }

        loop {
            self.line_buf.clear();
            let n = match self.buf_reader.read_until(b'\n', &mut self.line_buf) {
                Ok(n) => n,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            };
            if n == 0 {
                self.finished = true;
                return None;
            }
            self.position.line += 1;
            self.position.byte += n as u64;

            if is_blank(&self.line_buf) {
                continue;
            }

            let line = trim_line_end(&self.line_buf);
            return Some(parse_row(
                line,
                &self.header,
                self.options.delimiter,
                self.position.line,
            ));
        }
    }
}

fn parse_row(
    line: &[u8],
    header: &Header,
    delimiter: u8,
    line_number: u64,
) -> Result<AlignmentRecord, TableError> {
    let fields: Vec<String> = split_fields(line, delimiter)
        .into_iter()
        .map(|f| String::from_utf8_lossy(f).into_owned())
        .collect();

    let position = ErrorPosition {
        line: line_number,
        id: fields
            .get(header.index_of(Column::QuerySeqId))
            .filter(|id| !id.is_empty())
            .cloned(),
    };

    if fields.len() != header.len() {
        return Err(TableError::new_field_count(
            header.len(),
            fields.len(),
            position,
        ));
    }

    let text = |c: Column| fields[header.index_of(c)].as_str();
    let float = |c: Column| parse_float(c, text(c), &position);
    let count = |c: Column| parse_count(c, text(c), &position);

    let percent_identity = float(Column::PercentIdentity)?;
    if !(0.0..=100.0).contains(&percent_identity) {
        return Err(TableError::new_malformed_field(
            Column::PercentIdentity.name(),
            text(Column::PercentIdentity),
            position.clone(),
        ));
    }
    let e_value = float(Column::EValue)?;
    if e_value < 0.0 {
        return Err(TableError::new_malformed_field(
            Column::EValue.name(),
            text(Column::EValue),
            position.clone(),
        ));
    }

    Ok(AlignmentRecord {
        query_id: text(Column::QuerySeqId).to_string(),
        subject_id: text(Column::SubjectSeqId).to_string(),
        percent_identity,
        identical_count: count(Column::IdenticalCount)?,
        e_value,
        bit_score: float(Column::BitScore)?,
        align_length: count(Column::AlignLength)?,
        query_length: count(Column::QueryLength)?,
        subject_length: count(Column::SubjectLength)?,
        line: line_number,
        fields,
    })
}

fn parse_float(column: Column, value: &str, position: &ErrorPosition) -> Result<f64, TableError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TableError::new_malformed_field(
            column.name(),
            value,
            position.clone(),
        )),
    }
}

fn parse_count(column: Column, value: &str, position: &ErrorPosition) -> Result<u64, TableError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| TableError::new_malformed_field(column.name(), value, position.clone()))
}
