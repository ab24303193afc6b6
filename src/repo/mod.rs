//! apt repository sources.
//!
//! The deb822 parser in [`deb822`] turns the text of a `.sources` file
//! into [`SourceEntry`] records; [`SourceCatalog`] collects entries from
//! any number of files. File reading is the caller's business, so
//! everything here stays pure.

mod deb822;

use anyhow::{bail, Result};
use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use deb822::parse_deb822_lines;

/// The repository types a sources entry can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepoType {
    Deb,
    DebSrc,
}

impl RepoType {
    pub fn as_str(self) -> &'static str {
        match self {
            RepoType::Deb => "deb",
            RepoType::DebSrc => "deb-src",
        }
    }
}

impl TryFrom<&str> for RepoType {
    type Error = anyhow::Error;

    fn try_from(s: &str) -> Result<Self> {
        match s {
            "deb" => Ok(RepoType::Deb),
            "deb-src" => Ok(RepoType::DebSrc),
            _ => bail!("Unknown repository type: {}", s),
        }
    }
}

impl fmt::Display for RepoType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The `Signed-By` field of a stanza: either a path to a keyring file, or
/// the key material itself when the field value spans multiple lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SignedBy {
    Path(PathBuf),
    Inline(String),
}

/// One repository source, as expanded from a deb822 stanza.
///
/// A stanza declaring several types, URIs or suites expands to one entry
/// per combination; the entries share components, key and passthrough
/// options. `file` and `line` point back at the first field of the
/// originating stanza.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    pub enabled: bool,
    pub repo_type: RepoType,
    pub uri: String,
    pub suite: String,
    pub components: Vec<String>,
    pub signed_by: Option<SignedBy>,
    /// Fields not otherwise consumed, e.g. `Architectures`
    pub options: HashMap<String, String>,
    pub file: String,
    pub line: usize,
}

impl SourceEntry {
    /// Stable identifier used to key catalog entries.
    pub fn identifier(&self) -> String {
        format!("{}-{}-{}", self.repo_type, self.uri, self.suite)
    }
}

/// A stanza-level parse problem. One bad stanza yields exactly one of
/// these and no entries; other stanzas in the file are unaffected.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SourceError {
    #[error("missing required field '{field}'{}", origin(.file, .line))]
    MissingField {
        field: String,
        file: String,
        line: Option<usize>,
    },
    #[error("bad value '{value}' for field '{field}'{}: {reason}", origin(.file, .line))]
    BadValue {
        field: String,
        value: String,
        reason: String,
        file: String,
        line: Option<usize>,
    },
}

fn origin(file: &str, line: &Option<usize>) -> String {
    match (file, line) {
        ("", None) => String::new(),
        ("", Some(n)) => format!(" (line {})", n),
        (f, None) => format!(" ({})", f),
        (f, Some(n)) => format!(" ({}:{})", f, n),
    }
}

/// Known repository sources, keyed by their identifier.
///
/// The catalog is populated from file contents the caller has already
/// read, one file at a time. A later file wins over an earlier one when
/// both define the same source.
#[derive(Debug, Default)]
pub struct SourceCatalog {
    sources: HashMap<String, SourceEntry>,
    last_errors: Vec<SourceError>,
}

impl SourceCatalog {
    pub fn new() -> Self {
        SourceCatalog::default()
    }

    /// Merge all entries of one deb822 sources file into the catalog.
    ///
    /// Stanza-level problems are collected (see
    /// [`SourceCatalog::last_errors`]) rather than raised; the file as a
    /// whole is rejected only when not a single stanza produced an entry.
    pub fn load_deb822(&mut self, filename: &str, content: &str) -> Result<()> {
        let (entries, errors) = parse_deb822_lines(content.lines(), filename);
        if !errors.is_empty() {
            debug!("{} invalid stanza(s) in {}:", errors.len(), filename);
            for e in &errors {
                debug!("  {}", e);
            }
        }
        self.last_errors = errors;
        let count = entries.len();
        for entry in entries {
            self.sources.insert(entry.identifier(), entry);
        }
        if count == 0 {
            bail!("all repository stanzas in '{}' were invalid!", filename)
        }
        info!("parsed {} package repositories from {}", count, filename);
        Ok(())
    }

    pub fn get(&self, identifier: &str) -> Option<&SourceEntry> {
        self.sources.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.sources.contains_key(identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceEntry> {
        self.sources.values()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Errors collected by the most recent [`SourceCatalog::load_deb822`].
    pub fn last_errors(&self) -> &[SourceError] {
        &self.last_errors
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use indoc::indoc;

    #[test]
    fn repo_type_round_trip() {
        assert_eq!(RepoType::try_from("deb").unwrap(), RepoType::Deb);
        assert_eq!(RepoType::try_from("deb-src").unwrap(), RepoType::DebSrc);
        assert_eq!(RepoType::DebSrc.to_string(), "deb-src");
        assert!(RepoType::try_from("rpm").is_err());
    }

    #[test]
    fn error_rendering() {
        let e = SourceError::MissingField {
            field: "URIs".to_string(),
            file: "ubuntu.sources".to_string(),
            line: Some(3),
        };
        assert_eq!(
            e.to_string(),
            "missing required field 'URIs' (ubuntu.sources:3)"
        );

        let e = SourceError::MissingField {
            field: "Types".to_string(),
            file: String::new(),
            line: None,
        };
        assert_eq!(e.to_string(), "missing required field 'Types'");

        let e = SourceError::BadValue {
            field: "Enabled".to_string(),
            value: "maybe".to_string(),
            reason: "must be one of yes or no (default: yes)".to_string(),
            file: "x.sources".to_string(),
            line: Some(2),
        };
        assert_eq!(
            e.to_string(),
            "bad value 'maybe' for field 'Enabled' (x.sources:2): must be one of yes or no (default: yes)"
        );
    }

    #[test]
    fn catalog_load() {
        let content = indoc! {"
            Types: deb
            URIs: http://archive.ubuntu.com/ubuntu/
            Suites: noble noble-updates
            Components: main restricted

            Types: deb
            URIs: http://security.ubuntu.com/ubuntu/
            Suites: noble-security
            Components: main
        "};
        let mut catalog = SourceCatalog::new();
        catalog.load_deb822("ubuntu.sources", content).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.last_errors().is_empty());

        let entry = catalog
            .get("deb-http://archive.ubuntu.com/ubuntu/-noble")
            .unwrap();
        assert_eq!(entry.suite, "noble");
        assert_eq!(entry.components, vec!["main", "restricted"]);
        assert!(catalog.contains("deb-http://security.ubuntu.com/ubuntu/-noble-security"));
    }

    #[test]
    fn catalog_later_file_wins() {
        let first = indoc! {"
            Types: deb
            URIs: http://archive.ubuntu.com/ubuntu/
            Suites: noble
            Components: main
        "};
        let second = indoc! {"
            Types: deb
            URIs: http://archive.ubuntu.com/ubuntu/
            Suites: noble
            Components: main universe
        "};
        let mut catalog = SourceCatalog::new();
        catalog.load_deb822("a.sources", first).unwrap();
        catalog.load_deb822("b.sources", second).unwrap();
        assert_eq!(catalog.len(), 1);
        let entry = catalog.iter().next().unwrap();
        assert_eq!(entry.file, "b.sources");
        assert_eq!(entry.components, vec!["main", "universe"]);
    }

    #[test]
    fn catalog_rejects_entryless_file() {
        let mut catalog = SourceCatalog::new();
        // a file of comments parses to zero entries and one error
        assert!(catalog
            .load_deb822("empty.sources", "# nothing to see here\n")
            .is_err());
        assert_eq!(catalog.last_errors().len(), 1);

        // partial failure is not fatal
        let content = indoc! {"
            Types: deb
            Suites: noble
            Components: main

            Types: deb
            URIs: http://archive.ubuntu.com/ubuntu/
            Suites: noble
            Components: main
        "};
        catalog.load_deb822("mixed.sources", content).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.last_errors().len(), 1);
    }
}
