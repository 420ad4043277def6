use crate::classify::Classification;
use crate::config::Config;
use crate::directive::ParsedFile;
use log;

pub const GENERATED_NOTICE: &str = "/* Generated by cconcat. Do not edit by hand. */";

/// Both aggregate documents, fully assembled before anything is written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Documents {
    pub header: Vec<String>,
    pub source: Vec<String>,
}

pub fn assemble(classification: &Classification, config: &Config) -> Documents {
    Documents {
        header: header_document(classification),
        source: source_document(classification, &config.header_file_name()),
    }
}

/// Exposed headers: their includes, then each body in ascending expose rank.
pub fn header_document(classification: &Classification) -> Vec<String> {
    let mut lines = vec![GENERATED_NOTICE.to_string(), String::new()];
    lines.extend(classification.exposed_includes().render());

    for (rank, file) in classification.exposed() {
        log::trace!("header document: rank {} from {}", rank, file.path.display());
        push_section(&mut lines, &format!("rank {}", rank), [file]);
    }
    log::debug!("Assembled header document ({} lines).", lines.len());
    lines
}

/// Everything not exposed: merged includes, the generated header include,
/// ranked headers in ascending rank, unranked headers, then implementation
/// files.
pub fn source_document(classification: &Classification, header_file_name: &str) -> Vec<String> {
    let mut lines = vec![GENERATED_NOTICE.to_string(), String::new()];
    lines.extend(classification.internal_includes().render());
    lines.push(format!("#include \"{}\"", header_file_name));

    for (rank, file) in classification.ranked() {
        log::trace!("source document: rank {} from {}", rank, file.path.display());
        push_section(&mut lines, &format!("rank {}", rank), [file]);
    }
    push_section(&mut lines, "unranked headers", classification.unranked());
    push_section(&mut lines, "implementation files", classification.implementation());

    log::debug!("Assembled source document ({} lines).", lines.len());
    lines
}

fn push_section<'a>(
    lines: &mut Vec<String>,
    label: &str,
    files: impl IntoIterator<Item = &'a ParsedFile>,
) {
    lines.push(String::new());
    lines.push(format!("/* ===== {} ===== */", label));
    for file in files {
        lines.extend(file.body.iter().cloned());
    }
    lines.push(format!("/* ===== end {} ===== */", label));
}
