use crate::classify::{ClassifyWarning, classify};
use crate::config::Config;
use crate::directive::ParsedFile;
use crate::error::Result;
use crate::gather::{SourceKind, gather_sources};
use crate::merge::{Documents, assemble};
use crate::writer::{OutputPaths, write_documents};
use log;
use std::path::PathBuf;

/// What went into the two documents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    pub ranked: usize,
    pub exposed: usize,
    pub unranked: usize,
    pub implementation: usize,
    pub warnings: Vec<ClassifyWarning>,
}

impl RunSummary {
    pub fn total_files(&self) -> usize {
        self.ranked + self.exposed + self.unranked + self.implementation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outputs: OutputPaths,
    pub summary: RunSummary,
}

fn load_all(paths: &[PathBuf], kind: SourceKind) -> Result<Vec<ParsedFile>> {
    paths.iter().map(|p| ParsedFile::load(p, kind)).collect()
}

/// Discovers, parses, classifies and merges; nothing is written.
pub fn build(config: &Config) -> Result<(Documents, RunSummary)> {
    config.validate()?;
    let sources = gather_sources(config)?;

    log::debug!("Parsing {} header(s)...", sources.headers.len());
    let headers = load_all(&sources.headers, SourceKind::Header)?;
    log::debug!("Parsing {} implementation file(s)...", sources.implementations.len());
    let implementations = load_all(&sources.implementations, SourceKind::Implementation)?;

    let classification = classify(headers, implementations)?;
    let documents = assemble(&classification, config);
    let summary = RunSummary {
        ranked: classification.ranked().len(),
        exposed: classification.exposed().len(),
        unranked: classification.unranked().len(),
        implementation: classification.implementation().len(),
        warnings: classification.warnings().to_vec(),
    };
    Ok((documents, summary))
}

/// Runs the whole pipeline. Both documents are assembled before the first
/// write, so a parse or rank error leaves the destination untouched.
pub fn run(config: &Config) -> Result<RunReport> {
    let (documents, summary) = build(config)?;
    let outputs = write_documents(&config.dest, &documents, config)?;
    Ok(RunReport { outputs, summary })
}
