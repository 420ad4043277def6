//! Per-file directive extraction.
//!
//! Only two things in a source file carry meaning here: an optional
//! `RANK=<n>` / `EXPOSE <n>` comment on the first line, and `#include`
//! lines anywhere in the file. Everything else is copied into the body
//! untouched.

use crate::error::{AppError, Result};
use crate::gather::SourceKind;
use log;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

static RANK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?://\s*)+RANK\s*=\s*(\d+)$").expect("valid rank regex"));

static EXPOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?://\s*)+EXPOSE\s+(\d+)$").expect("valid expose regex"));

static INCLUDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(?://+\s*)?#\s*include\s*(?:<(?P<angle>[^>]+)>|"(?P<quote>[^"]+)")(?P<rest>.*)$"#)
        .expect("valid include regex")
});

static PRECEDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*//+\s*PRECEDED BY:\s*(?P<stmt>.*?)\s*$").expect("valid precede regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Delimiter {
    /// `<...>`, a system header.
    Angle,
    /// `"..."`, a local header.
    Quote,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IncludeTarget {
    pub delimiter: Delimiter,
    pub target: String,
}

impl IncludeTarget {
    pub fn angle(target: impl Into<String>) -> Self {
        Self {
            delimiter: Delimiter::Angle,
            target: target.into(),
        }
    }

    pub fn quote(target: impl Into<String>) -> Self {
        Self {
            delimiter: Delimiter::Quote,
            target: target.into(),
        }
    }

    /// Renders the line emitted into an aggregate document.
    ///
    /// Local includes are commented out because their content is inlined
    /// into the same aggregate.
    pub fn render(&self) -> String {
        match self.delimiter {
            Delimiter::Angle => format!("#include <{}>", self.target),
            Delimiter::Quote => format!("// #include \"{}\"", self.target),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IncludeDirective {
    Include(IncludeTarget),
    /// A raw statement that must be emitted right before `include`.
    Precede {
        statement: String,
        include: IncludeTarget,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstLineDirective {
    None,
    Rank(u32),
    Expose(u32),
}

/// Matches the first line of a file against the rank/expose patterns.
///
/// The error carries the offending number when it is zero or overflows.
pub fn parse_first_line(line: &str) -> std::result::Result<FirstLineDirective, String> {
    let trimmed = line.trim();
    if let Some(c) = RANK_RE.captures(trimmed) {
        return positive(&c[1]).map(FirstLineDirective::Rank);
    }
    if let Some(c) = EXPOSE_RE.captures(trimmed) {
        return positive(&c[1]).map(FirstLineDirective::Expose);
    }
    Ok(FirstLineDirective::None)
}

fn positive(digits: &str) -> std::result::Result<u32, String> {
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(digits.to_string()),
    }
}

/// Recognizes an include line, commented or not, and its optional
/// `PRECEDED BY:` annotation.
pub fn parse_include_line(line: &str) -> Option<(IncludeTarget, Option<String>)> {
    let captures = INCLUDE_RE.captures(line)?;
    let include = if let Some(angle) = captures.name("angle") {
        IncludeTarget::angle(angle.as_str().trim())
    } else {
        IncludeTarget::quote(captures.name("quote")?.as_str().trim())
    };

    let precede = captures
        .name("rest")
        .and_then(|rest| PRECEDE_RE.captures(rest.as_str()))
        .map(|c| c["stmt"].trim_matches('`').trim().to_string())
        .filter(|stmt| !stmt.is_empty());

    Some((include, precede))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub kind: SourceKind,
    pub rank: Option<u32>,
    pub expose_rank: Option<u32>,
    /// Source lines minus include lines, wrapped in a banner and footer.
    pub body: Vec<String>,
    pub includes: Vec<IncludeDirective>,
}

impl ParsedFile {
    pub fn load(path: &Path, kind: SourceKind) -> Result<Self> {
        log::debug!("Parsing {}", path.display());
        let bytes = fs::read(path).map_err(|e| AppError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = text {
            log::warn!(
                "{} is not valid UTF-8; invalid bytes were replaced with U+FFFD",
                path.display()
            );
        }
        Self::parse(path, kind, &text)
    }

    pub fn parse(path: &Path, kind: SourceKind, text: &str) -> Result<Self> {
        let mut lines = text.lines().peekable();

        let first = lines.peek().copied().unwrap_or_default();
        let directive = parse_first_line(first).map_err(|value| AppError::InvalidRank {
            path: path.to_path_buf(),
            value,
        })?;
        let (rank, expose_rank) = match directive {
            FirstLineDirective::None => (None, None),
            FirstLineDirective::Rank(n) => (Some(n), None),
            FirstLineDirective::Expose(n) => (None, Some(n)),
        };
        if directive != FirstLineDirective::None {
            lines.next();
        }

        let mut body = banner(path);
        let mut includes = Vec::new();
        for line in lines {
            match parse_include_line(line) {
                Some((include, precede)) => {
                    if let Some(statement) = precede {
                        includes.push(IncludeDirective::Precede {
                            statement,
                            include: include.clone(),
                        });
                    }
                    includes.push(IncludeDirective::Include(include));
                }
                None => body.push(line.to_string()),
            }
        }
        body.push(footer(path));

        log::trace!(
            "{}: rank={:?} expose={:?} includes={}",
            path.display(),
            rank,
            expose_rank,
            includes.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            kind,
            rank,
            expose_rank,
            body,
            includes,
        })
    }
}

fn banner(path: &Path) -> Vec<String> {
    vec![
        "/*".to_string(),
        format!(" * ===== BEGIN {} =====", path.display()),
        " */".to_string(),
    ]
}

fn footer(path: &Path) -> String {
    format!("/* ===== END {} ===== */", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedFile {
        ParsedFile::parse(Path::new("/src/a.h"), SourceKind::Header, text).unwrap()
    }

    #[test]
    fn test_first_line_variants() {
        assert_eq!(parse_first_line("// RANK=3"), Ok(FirstLineDirective::Rank(3)));
        assert_eq!(parse_first_line("  ////RANK = 12  "), Ok(FirstLineDirective::Rank(12)));
        assert_eq!(parse_first_line("// // EXPOSE 2"), Ok(FirstLineDirective::Expose(2)));
        assert_eq!(parse_first_line("//EXPOSE 7"), Ok(FirstLineDirective::Expose(7)));
        assert_eq!(parse_first_line("RANK=3"), Ok(FirstLineDirective::None));
        assert_eq!(parse_first_line("// RANK=3 please"), Ok(FirstLineDirective::None));
        assert_eq!(parse_first_line("// EXPOSE2"), Ok(FirstLineDirective::None));
        assert_eq!(parse_first_line("int x;"), Ok(FirstLineDirective::None));
    }

    #[test]
    fn test_first_line_rejects_zero_and_overflow() {
        assert_eq!(parse_first_line("// RANK=0"), Err("0".to_string()));
        assert_eq!(
            parse_first_line("// EXPOSE 99999999999"),
            Err("99999999999".to_string())
        );
    }

    #[test]
    fn test_include_lines() {
        assert_eq!(
            parse_include_line("#include <stdio.h>"),
            Some((IncludeTarget::angle("stdio.h"), None))
        );
        assert_eq!(
            parse_include_line("  # include \"util/list.h\""),
            Some((IncludeTarget::quote("util/list.h"), None))
        );
        assert_eq!(
            parse_include_line("// #include \"old.h\""),
            Some((IncludeTarget::quote("old.h"), None))
        );
        assert_eq!(parse_include_line("int include = 1;"), None);
        assert_eq!(parse_include_line("#define X 1"), None);
    }

    #[test]
    fn test_include_with_precede_annotation() {
        assert_eq!(
            parse_include_line("#include <windows.h> // PRECEDED BY: #ifdef _WIN32"),
            Some((IncludeTarget::angle("windows.h"), Some("#ifdef _WIN32".to_string())))
        );
        assert_eq!(
            parse_include_line("#include <x.h> // PRECEDED BY: `#define X_IMPL`"),
            Some((IncludeTarget::angle("x.h"), Some("#define X_IMPL".to_string())))
        );
        assert_eq!(
            parse_include_line("#include <x.h> // for x()"),
            Some((IncludeTarget::angle("x.h"), None))
        );
    }

    #[test]
    fn test_render() {
        assert_eq!(IncludeTarget::angle("stdio.h").render(), "#include <stdio.h>");
        assert_eq!(IncludeTarget::quote("local.h").render(), "// #include \"local.h\"");
    }

    #[test]
    fn test_parse_consumes_directive_line_and_includes() {
        let parsed = parse("// RANK=2\n#include <stdio.h>\nint a;\n#include \"b.h\"\nint c;\n");
        assert_eq!(parsed.rank, Some(2));
        assert_eq!(parsed.expose_rank, None);
        assert_eq!(
            parsed.includes,
            vec![
                IncludeDirective::Include(IncludeTarget::angle("stdio.h")),
                IncludeDirective::Include(IncludeTarget::quote("b.h")),
            ]
        );
        assert_eq!(
            parsed.body,
            vec![
                "/*",
                " * ===== BEGIN /src/a.h =====",
                " */",
                "int a;",
                "int c;",
                "/* ===== END /src/a.h ===== */",
            ]
        );
    }

    #[test]
    fn test_parse_without_directive_keeps_first_line() {
        let parsed = parse("int first;\n// RANK=4\n");
        assert_eq!((parsed.rank, parsed.expose_rank), (None, None));
        assert_eq!(parsed.body[3], "int first;");
        assert_eq!(parsed.body[4], "// RANK=4");
    }

    #[test]
    fn test_parse_precede_comes_before_its_include() {
        let parsed = parse("#include <io.h> // PRECEDED BY: #ifdef FOO\n");
        assert_eq!(
            parsed.includes,
            vec![
                IncludeDirective::Precede {
                    statement: "#ifdef FOO".to_string(),
                    include: IncludeTarget::angle("io.h"),
                },
                IncludeDirective::Include(IncludeTarget::angle("io.h")),
            ]
        );
    }

    #[test]
    fn test_parse_empty_file() {
        let parsed = parse("");
        assert_eq!(parsed.body.len(), 4);
        assert!(parsed.includes.is_empty());
    }

    #[test]
    fn test_parse_invalid_rank() {
        let err = ParsedFile::parse(Path::new("/src/z.h"), SourceKind::Header, "// RANK=0\n")
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRank { value, .. } if value == "0"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ParsedFile::load(Path::new("/definitely/not/here.h"), SourceKind::Header)
            .unwrap_err();
        assert!(matches!(err, AppError::FileRead { .. }));
    }

    #[test]
    fn test_load_replaces_invalid_utf8() {
        let td = tempfile::TempDir::new().unwrap();
        let path = td.path().join("latin1.h");
        fs::write(&path, b"// RANK=3\nconst char *s = \"na\xefve\";\n").unwrap();

        let parsed = ParsedFile::load(&path, SourceKind::Header).unwrap();
        assert_eq!(parsed.rank, Some(3));
        assert_eq!(parsed.body[3], "const char *s = \"na\u{fffd}ve\";");
    }
}
