#![crate_name = "blastfilt"]
pub mod errors;
pub mod filter;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod table;

pub use errors::{ErrorPosition, TableError, TableErrorKind};
pub use filter::{
    best_matches, compute_derived, partition, remove_self_matches, DEFAULT_FULL_LENGTH_PCT,
};
pub use parser::{parse_table_file, parse_table_reader, ReaderOptions, TableReader};
pub use pipeline::{run, Output, PipelineConfig, PipelineSummary};
pub use record::{AlignmentRecord, Column, DerivedRecord};
pub use report::write_table;
pub use table::{load_table, AlignmentTable, DerivedTable, Diagnostic};
