pub mod classify;
pub mod config;
pub mod directive;
pub mod error;
pub mod gather;
pub mod merge;
pub mod pipeline;
pub mod writer;

pub use classify::{Classification, Classifier, ClassifyWarning, IncludeSet, classify};
pub use config::Config;
pub use directive::{
    Delimiter, FirstLineDirective, IncludeDirective, IncludeTarget, ParsedFile, parse_first_line,
    parse_include_line,
};
pub use error::{AppError, RankKind, Result};
pub use gather::{SourceKind, SourceSet, find_files, gather_sources};
pub use merge::{Documents, assemble, header_document, source_document};
pub use pipeline::{RunReport, RunSummary, build, run};
pub use writer::{OutputPaths, write_documents, write_lines};
