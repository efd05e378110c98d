//! Writing tables back out as delimited text

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::errors::TableError;
use crate::parser::LineEnding;
use crate::table::DerivedTable;

/// Write a header line and then one line per row.
///
/// Input columns keep the text they were read with; the derived columns
/// follow. The delimiter and line ending of the input table are reused.
pub fn write_rows(table: &DerivedTable, writer: &mut dyn Write) -> io::Result<()> {
    let layout = &table.layout;
    let ending = layout.line_ending.to_bytes();

    write_line(
        writer,
        table.column_names().into_iter(),
        layout.delimiter,
        &ending,
    )?;
    for row in table.iter() {
        let derived = row.derived_fields();
        let fields = row
            .record
            .fields()
            .iter()
            .map(|s| s.as_str())
            .chain(derived.iter().map(|s| s.as_str()));
        write_line(writer, fields, layout.delimiter, &ending)?;
    }
    Ok(())
}

fn write_line<'a>(
    writer: &mut dyn Write,
    fields: impl Iterator<Item = &'a str>,
    delimiter: u8,
    ending: &[u8],
) -> io::Result<()> {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            writer.write_all(&[delimiter])?;
        }
        writer.write_all(field.as_bytes())?;
    }
    writer.write_all(ending)
}

/// Write `table` to `path`, replacing any file already there.
///
/// Rows go to a temporary file next to `path` which is renamed over it once
/// everything is flushed, so readers never see a partial table. On failure
/// the destination is left as it was.
///
/// # Errors
///
/// Returns a `Write` error naming `path`.
pub fn write_table<P: AsRef<Path>>(path: P, table: &DerivedTable) -> Result<(), TableError> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir).map_err(|e| TableError::new_write(path, &e))?;
    let mut writer = BufWriter::new(tmp);
    write_rows(table, &mut writer).map_err(|e| TableError::new_write(path, &e))?;
    let tmp = writer
        .into_inner()
        .map_err(|e| TableError::new_write(path, e.error()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| TableError::new_write(path, &e))?;
    let file = tmp
        .persist(path)
        .map_err(|e| TableError::new_write(path, &e.error))?;
    set_default_permissions(&file);

    debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Temporary files are created owner-only; give reports the usual mode
#[cfg(unix)]
fn set_default_permissions(file: &fs::File) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o644)) {
        debug!("Could not relax report permissions: {}", e);
    }
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &fs::File) {}

/// Line endings as a short name, for log lines
pub fn line_ending_name(ending: LineEnding) -> &'static str {
    match ending {
        LineEnding::Windows => "CRLF",
        LineEnding::Unix => "LF",
    }
}
