use crate::config::Config;
use crate::error::{AppError, Result};
use crate::merge::Documents;
use log;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub header: PathBuf,
    pub source: PathBuf,
}

/// Writes `lines` to `path`, one per line, replacing any existing content.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let to_write_error = |e: std::io::Error| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::create(path).map_err(to_write_error)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line).map_err(to_write_error)?;
    }
    writer.flush().map_err(to_write_error)?;
    log::debug!("Wrote {} lines to {}", lines.len(), path.display());
    Ok(())
}

/// Writes both documents into `dest`, header first.
pub fn write_documents(dest: &Path, documents: &Documents, config: &Config) -> Result<OutputPaths> {
    if !dest.is_dir() {
        fs::create_dir_all(dest).map_err(|e| AppError::DirCreation {
            path: dest.to_path_buf(),
            source: e,
        })?;
        log::info!("Created destination directory {}", dest.display());
    }

    let paths = OutputPaths {
        header: dest.join(config.header_file_name()),
        source: dest.join(config.source_file_name()),
    };
    write_lines(&paths.header, &documents.header)?;
    write_lines(&paths.source, &documents.source)?;
    log::info!(
        "Wrote {} and {}",
        paths.header.display(),
        paths.source.display()
    );
    Ok(paths)
}
