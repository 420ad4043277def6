use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "cconcat.toml";
pub const DEFAULT_TARGET: &str = "concat";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Source roots scanned recursively for `.h` and `.c` files.
    #[serde(default)]
    pub src: Vec<PathBuf>,
    /// Directories whose direct files are skipped (subdirectories are still walked).
    #[serde(default)]
    pub reject_dir: Vec<PathBuf>,
    #[serde(default)]
    pub reject_file: Vec<PathBuf>,
    #[serde(default = "default_dest")]
    pub dest: PathBuf,
    /// Basename of the two generated files.
    #[serde(default = "default_target")]
    pub target: String,
}

fn default_dest() -> PathBuf {
    PathBuf::from(".")
}
fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src: Vec::new(),
            reject_dir: Vec::new(),
            reject_file: Vec::new(),
            dest: default_dest(),
            target: default_target(),
        }
    }
}

impl Config {
    /// Picks the config file to load, if any.
    ///
    /// An explicitly named file must exist. Without one, `cconcat.toml` in
    /// `base_dir` is used when present.
    pub fn resolve_config_path(
        base_dir: &Path,
        cli_config_file: Option<&PathBuf>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    base_dir.join(path)
                };
                if !path.is_file() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = base_dir.join(DEFAULT_CONFIG_FILENAME);
                if default_path.is_file() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        let mut config = toml::from_str::<Config>(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })?;
        // Paths inside a config file are relative to the file, not the cwd.
        if let Some(config_dir) = config_path.parent() {
            config = config.resolve_paths(config_dir);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.src.is_empty() {
            return Err(AppError::Config(
                "at least one source directory is required (--src)".to_string(),
            ));
        }
        if self.target.trim().is_empty() {
            return Err(AppError::Config("target name must not be empty".to_string()));
        }
        if self.target.contains(['/', '\\']) {
            return Err(AppError::Config(format!(
                "target name '{}' must not contain a path separator",
                self.target
            )));
        }
        Ok(())
    }

    /// Makes every path absolute against `base`.
    ///
    /// Existing paths are canonicalized so they compare equal to the paths
    /// produced by directory discovery.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |p: &PathBuf| absolutize(base, p);
        self.src = self.src.iter().map(resolve).collect();
        self.reject_dir = self.reject_dir.iter().map(resolve).collect();
        self.reject_file = self.reject_file.iter().map(resolve).collect();
        self.dest = absolutize(base, &self.dest);
        self
    }

    pub fn header_file_name(&self) -> String {
        format!("{}.h", self.target)
    }

    pub fn source_file_name(&self) -> String {
        format!("{}.c", self.target)
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    joined
        .canonicalize()
        .unwrap_or_else(|_| normalize_lexically(&joined))
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: Config = toml::from_str("src = [\"lib\"]").unwrap();
        assert_eq!(config.src, vec![PathBuf::from("lib")]);
        assert_eq!(config.target, "concat");
        assert_eq!(config.dest, PathBuf::from("."));
        assert!(config.reject_dir.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<Config>("sources = [\"lib\"]").is_err());
    }

    #[test]
    fn test_validate_requires_src() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_target_with_separator() {
        let config = Config {
            src: vec![PathBuf::from("lib")],
            target: "out/lib".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_output_file_names() {
        let config = Config {
            target: "out".to_string(),
            ..Config::default()
        };
        assert_eq!(config.header_file_name(), "out.h");
        assert_eq!(config.source_file_name(), "out.c");
    }

    #[test]
    fn test_resolve_config_path_default_and_disabled() {
        let td = TempDir::new().unwrap();
        assert_eq!(Config::resolve_config_path(td.path(), None, false).unwrap(), None);

        let default_path = td.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(&default_path, "src = [\"lib\"]\n").unwrap();
        assert_eq!(
            Config::resolve_config_path(td.path(), None, false).unwrap(),
            Some(default_path)
        );
        assert_eq!(Config::resolve_config_path(td.path(), None, true).unwrap(), None);
    }

    #[test]
    fn test_resolve_config_path_missing_explicit_file() {
        let td = TempDir::new().unwrap();
        let missing = PathBuf::from("nope.toml");
        let err = Config::resolve_config_path(td.path(), Some(&missing), false).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_load_resolves_paths_relative_to_file() {
        let td = TempDir::new().unwrap();
        fs::create_dir(td.path().join("lib")).unwrap();
        let path = td.path().join("cconcat.toml");
        fs::write(&path, "src = [\"lib\"]\ntarget = \"out\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.src, vec![td.path().join("lib").canonicalize().unwrap()]);
        assert_eq!(config.target, "out");
    }

    #[test]
    fn test_resolve_paths_normalizes_missing_paths() {
        let config = Config {
            dest: PathBuf::from("./build/../out"),
            ..Config::default()
        }
        .resolve_paths(Path::new("/nonexistent-base"));
        assert_eq!(config.dest, PathBuf::from("/nonexistent-base/out"));
    }
}
