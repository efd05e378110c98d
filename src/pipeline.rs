//! Runs one input table through every stage and writes the five reports

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use log::info;

use crate::errors::TableError;
use crate::filter::{
    best_matches, compute_derived, partition, remove_self_matches, DEFAULT_FULL_LENGTH_PCT,
};
use crate::parser::{parse_table_file, ReaderOptions, COMPRESSION_SUFFIXES, DEFAULT_DELIMITER};
use crate::record::Column;
use crate::report::{line_ending_name, write_table};
use crate::table::{load_table, DerivedTable, Diagnostic};

/// The reports a run produces, in the order they are written
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Output {
    All,
    Fulls,
    Shorts,
    FullsBest,
    AllBest,
}

impl Output {
    pub const ALL: [Output; 5] = [
        Output::All,
        Output::Fulls,
        Output::Shorts,
        Output::FullsBest,
        Output::AllBest,
    ];

    /// Suffix appended to the input stem, extension included
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::All => "_all.tsv",
            Self::Fulls => "_fulls.tsv",
            Self::Shorts => "_shorts.tsv",
            Self::FullsBest => "_fulls_best.tsv",
            Self::AllBest => "_all_best.tsv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Fulls => "fulls",
            Self::Shorts => "shorts",
            Self::FullsBest => "fulls_best",
            Self::AllBest => "all_best",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Alignments covering strictly more than this percentage of their query
    /// are full length
    pub full_length_pct: f64,
    pub delimiter: u8,
}

impl PipelineConfig {
    pub fn new<P: Into<PathBuf>>(input: P) -> Self {
        PipelineConfig {
            input: input.into(),
            output_dir: PathBuf::from("."),
            full_length_pct: DEFAULT_FULL_LENGTH_PCT,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Where `output` is written for this input
    pub fn output_path(&self, output: Output) -> PathBuf {
        let mut name = file_stem(&self.input);
        name.push_str(output.suffix());
        self.output_dir.join(name)
    }
}

/// The input file name without its extension. A compression suffix is
/// stripped first, so `otus.tsv.gz` gives `otus`.
pub fn file_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = Path::new(&name)
        .extension()
        .and_then(OsStr::to_str)
        .map(String::from);
    let name = match ext {
        Some(ext) if COMPRESSION_SUFFIXES.contains(&ext.as_str()) => {
            name[..name.len() - ext.len() - 1].to_string()
        }
        _ => name,
    };
    Path::new(&name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or(name)
}

/// What a finished run produced
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    /// Rows loaded from the input, before any filtering
    pub loaded: usize,
    /// Self-match rows removed
    pub self_matches: usize,
    /// Each report with its path and row count, in write order
    pub outputs: Vec<(Output, PathBuf, usize)>,
    /// Rows left out because they could not be used
    pub diagnostics: Vec<Diagnostic>,
}

impl PipelineSummary {
    pub fn rows(&self, output: Output) -> Option<usize> {
        self.outputs
            .iter()
            .find(|(o, _, _)| *o == output)
            .map(|(_, _, n)| *n)
    }
}

/// Load, filter, derive, partition and select best matches, then write the
/// reports.
///
/// Nothing is written until every table has been computed. If the input had
/// data rows but none of them were usable the run fails without writing.
/// A write failure stops the run; reports already written stay in place.
pub fn run(config: &PipelineConfig) -> Result<PipelineSummary, TableError> {
    let options = ReaderOptions {
        delimiter: config.delimiter,
    };
    let reader = parse_table_file(&config.input, options)?;
    let (table, mut diagnostics) =
        load_table(reader).map_err(|e| e.with_path(&config.input))?;
    info!(
        "Loaded {} rows from {} ({} line endings)",
        table.len(),
        config.input.display(),
        line_ending_name(table.layout.line_ending)
    );

    let filtered = remove_self_matches(&table);
    let self_matches = table.len() - filtered.len();
    info!("Removed {} self-match rows", self_matches);

    let (all, derive_diagnostics) = compute_derived(&filtered, config.full_length_pct);
    diagnostics.extend(derive_diagnostics);

    // self-matches were usable rows, just not ones we report on
    let usable = all.len() + self_matches;
    if usable == 0 && !diagnostics.is_empty() {
        let err = TableError::new_no_usable_records(diagnostics.len());
        return Err(err.with_path(&config.input));
    }

    let (fulls, shorts) = partition(&all);
    let fulls_best = best_matches(&fulls, Column::QuerySeqId, Column::PercentIdentity)?;
    let all_best = best_matches(&all, Column::QuerySeqId, Column::PercentIdentity)?;

    let mut outputs = Vec::with_capacity(Output::ALL.len());
    for output in Output::ALL.iter() {
        let t: &DerivedTable = match output {
            Output::All => &all,
            Output::Fulls => &fulls,
            Output::Shorts => &shorts,
            Output::FullsBest => &fulls_best,
            Output::AllBest => &all_best,
        };
        let path = config.output_path(*output);
        write_table(&path, t)?;
        info!("{}: {} rows written to {}", output.label(), t.len(), path.display());
        outputs.push((*output, path, t.len()));
    }

    Ok(PipelineSummary {
        loaded: table.len(),
        self_matches,
        outputs,
        diagnostics,
    })
}
