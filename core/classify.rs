use crate::directive::{IncludeDirective, ParsedFile};
use crate::error::{AppError, RankKind, Result};
use crate::gather::SourceKind;
use log;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::PathBuf;

/// Deduplicated include directives collected from one bucket of files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncludeSet {
    directives: BTreeSet<IncludeDirective>,
}

impl IncludeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, directive: IncludeDirective) -> bool {
        self.directives.insert(directive)
    }

    pub fn merge(&mut self, other: &IncludeSet) {
        self.directives.extend(other.directives.iter().cloned());
    }

    /// Renders the include block, sorted by rendered include text.
    ///
    /// Each precede statement is written once, directly above the first
    /// include line that requested it.
    pub fn render(&self) -> Vec<String> {
        let mut grouped: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for directive in &self.directives {
            match directive {
                IncludeDirective::Include(include) => {
                    grouped.entry(include.render()).or_default();
                }
                IncludeDirective::Precede { statement, include } => {
                    grouped
                        .entry(include.render())
                        .or_default()
                        .push(statement.as_str());
                }
            }
        }

        let mut emitted = HashSet::new();
        let mut lines = Vec::with_capacity(self.directives.len());
        for (include_line, statements) in grouped {
            for statement in statements {
                if emitted.insert(statement) {
                    lines.push(statement.to_string());
                }
            }
            lines.push(include_line);
        }
        lines
    }
}

impl Extend<IncludeDirective> for IncludeSet {
    fn extend<T: IntoIterator<Item = IncludeDirective>>(&mut self, iter: T) {
        self.directives.extend(iter);
    }
}

/// Non-fatal findings reported while classifying.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyWarning {
    MisplacedDirective {
        path: PathBuf,
        kind: RankKind,
        rank: u32,
    },
}

impl fmt::Display for ClassifyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyWarning::MisplacedDirective { path, kind, rank } => write!(
                f,
                "{} {} in implementation file '{}' is ignored; rank directives only apply to headers",
                kind,
                rank,
                path.display()
            ),
        }
    }
}

/// Accumulates parsed files into buckets. Call [`Classifier::finish`] to
/// obtain the snapshot the merge pass reads.
#[derive(Debug, Default)]
pub struct Classifier {
    ranked: BTreeMap<u32, ParsedFile>,
    exposed: BTreeMap<u32, ParsedFile>,
    unranked: Vec<ParsedFile>,
    implementation: Vec<ParsedFile>,
    ranked_includes: IncludeSet,
    exposed_includes: IncludeSet,
    unranked_includes: IncludeSet,
    implementation_includes: IncludeSet,
    warnings: Vec<ClassifyWarning>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes a file to the header or implementation buckets by its kind.
    pub fn add(&mut self, file: ParsedFile) -> Result<()> {
        match file.kind {
            SourceKind::Header => self.add_header(file),
            SourceKind::Implementation => {
                self.add_implementation(file);
                Ok(())
            }
        }
    }

    /// Buckets a header by its directive. A rank or expose rank already
    /// taken by another header is fatal.
    pub fn add_header(&mut self, file: ParsedFile) -> Result<()> {
        if let Some(rank) = file.rank {
            let slot = match self.ranked.entry(rank) {
                Entry::Occupied(existing) => {
                    return Err(duplicate(RankKind::Rank, rank, existing.get(), file));
                }
                Entry::Vacant(slot) => slot,
            };
            log::debug!("Ranked header {} -> {}", rank, file.path.display());
            self.ranked_includes.extend(file.includes.iter().cloned());
            slot.insert(file);
        } else if let Some(rank) = file.expose_rank {
            let slot = match self.exposed.entry(rank) {
                Entry::Occupied(existing) => {
                    return Err(duplicate(RankKind::Expose, rank, existing.get(), file));
                }
                Entry::Vacant(slot) => slot,
            };
            log::debug!("Exposed header {} -> {}", rank, file.path.display());
            self.exposed_includes.extend(file.includes.iter().cloned());
            slot.insert(file);
        } else {
            log::debug!("Unranked header {}", file.path.display());
            self.unranked_includes.extend(file.includes.iter().cloned());
            self.unranked.push(file);
        }
        Ok(())
    }

    pub fn add_implementation(&mut self, file: ParsedFile) {
        let misplaced = file
            .rank
            .map(|r| (RankKind::Rank, r))
            .or(file.expose_rank.map(|r| (RankKind::Expose, r)));
        if let Some((kind, rank)) = misplaced {
            let warning = ClassifyWarning::MisplacedDirective {
                path: file.path.clone(),
                kind,
                rank,
            };
            log::debug!("{}", warning);
            self.warnings.push(warning);
        }
        self.implementation_includes
            .extend(file.includes.iter().cloned());
        self.implementation.push(file);
    }

    pub fn finish(self) -> Classification {
        log::info!(
            "Classified {} ranked, {} exposed, {} unranked header(s) and {} implementation file(s).",
            self.ranked.len(),
            self.exposed.len(),
            self.unranked.len(),
            self.implementation.len()
        );
        Classification {
            ranked: self.ranked,
            exposed: self.exposed,
            unranked: self.unranked,
            implementation: self.implementation,
            ranked_includes: self.ranked_includes,
            exposed_includes: self.exposed_includes,
            unranked_includes: self.unranked_includes,
            implementation_includes: self.implementation_includes,
            warnings: self.warnings,
        }
    }
}

fn duplicate(kind: RankKind, rank: u32, existing: &ParsedFile, file: ParsedFile) -> AppError {
    AppError::DuplicateRank {
        kind,
        rank,
        first: existing.path.clone(),
        second: file.path,
    }
}

/// Read-only result of classifying every file of a run.
#[derive(Debug)]
pub struct Classification {
    ranked: BTreeMap<u32, ParsedFile>,
    exposed: BTreeMap<u32, ParsedFile>,
    unranked: Vec<ParsedFile>,
    implementation: Vec<ParsedFile>,
    ranked_includes: IncludeSet,
    exposed_includes: IncludeSet,
    unranked_includes: IncludeSet,
    implementation_includes: IncludeSet,
    warnings: Vec<ClassifyWarning>,
}

impl Classification {
    pub fn ranked(&self) -> &BTreeMap<u32, ParsedFile> {
        &self.ranked
    }

    pub fn exposed(&self) -> &BTreeMap<u32, ParsedFile> {
        &self.exposed
    }

    pub fn unranked(&self) -> &[ParsedFile] {
        &self.unranked
    }

    pub fn implementation(&self) -> &[ParsedFile] {
        &self.implementation
    }

    pub fn exposed_includes(&self) -> &IncludeSet {
        &self.exposed_includes
    }

    /// Union of the ranked, unranked and implementation include sets.
    pub fn internal_includes(&self) -> IncludeSet {
        let mut merged = self.ranked_includes.clone();
        merged.merge(&self.unranked_includes);
        merged.merge(&self.implementation_includes);
        merged
    }

    pub fn warnings(&self) -> &[ClassifyWarning] {
        &self.warnings
    }
}

pub fn classify(headers: Vec<ParsedFile>, implementations: Vec<ParsedFile>) -> Result<Classification> {
    let mut classifier = Classifier::new();
    for file in headers.into_iter().chain(implementations) {
        classifier.add(file)?;
    }
    Ok(classifier.finish())
}
