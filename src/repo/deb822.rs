//! Parsing of deb822 "multi-line style" repository source files.
//!
//! In contrast to the one-line `sources.list` format, deb822 describes a
//! repository with a stanza of `Key: value` lines, where indented lines
//! continue the previous value and stanzas are separated by blank lines:
//! https://manpages.ubuntu.com/manpages/noble/en/man5/sources.list.5.html
//!
//! Parsing is line oriented and keeps 1-indexed line numbers around, so
//! problems can point back into the file.

use super::{RepoType, SignedBy, SourceEntry, SourceError};
use std::collections::HashMap;
use std::path::PathBuf;

/// A line that survived comment stripping: its 1-indexed number in the
/// source file and its content, trailing whitespace removed.
type NumberedLine<'a> = (usize, &'a str);

/// Iterator over the stanzas of a deb822 file.
///
/// Everything from the first `#` of a line on is dropped. A paragraph
/// holding only comments still counts as a (field-free) stanza, so a file
/// of commented-out sources is reported as invalid instead of silently
/// producing nothing.
struct Stanzas<I> {
    lines: std::iter::Enumerate<I>,
}

impl<'a, I: Iterator<Item = &'a str>> Iterator for Stanzas<I> {
    type Item = Vec<NumberedLine<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut stanza = Vec::new();
        let mut in_paragraph = false;
        for (idx, line) in self.lines.by_ref() {
            // blank lines separate stanzas
            if line.trim().is_empty() {
                if in_paragraph {
                    return Some(stanza);
                }
                continue;
            }
            in_paragraph = true;
            let content = match line.find('#') {
                Some(pos) => &line[..pos],
                None => line,
            };
            let content = content.trim_end();
            if !content.trim().is_empty() {
                stanza.push((idx + 1, content)); // preserve indent
            }
        }
        if in_paragraph {
            return Some(stanza);
        }
        None
    }
}

fn iter_stanzas<'a, I>(lines: I) -> Stanzas<I::IntoIter>
where
    I: IntoIterator<Item = &'a str>,
{
    Stanzas {
        lines: lines.into_iter().enumerate(),
    }
}

/// Turn the numbered lines of one stanza into field values plus the line
/// number where each field first appeared. An indented line continues the
/// value of the most recent field.
fn stanza_options(lines: &[NumberedLine]) -> (HashMap<String, String>, HashMap<String, usize>) {
    let mut parts: HashMap<String, Vec<&str>> = HashMap::new();
    let mut line_numbers: HashMap<String, usize> = HashMap::new();
    let mut current: Option<String> = None;
    for &(n, line) in lines {
        if line.starts_with([' ', '\t']) {
            // continuation of the previous field's value; a continuation
            // before any field has nothing to attach to and is dropped
            if let Some(key) = &current {
                if let Some(value) = parts.get_mut(key) {
                    value.push(line);
                }
            }
            continue;
        }
        let (raw_key, raw_value) = match line.split_once(':') {
            Some((key, value)) => (key, value),
            None => (line, ""),
        };
        let key = raw_key.trim().to_string();
        parts.insert(key.clone(), vec![raw_value.trim()]);
        line_numbers.entry(key.clone()).or_insert(n);
        current = Some(key);
    }
    let options = parts
        .into_iter()
        .map(|(key, value)| (key, value.join("\n")))
        .collect();
    (options, line_numbers)
}

fn missing(field: &str, filename: &str, line_numbers: &HashMap<String, usize>) -> SourceError {
    SourceError::MissingField {
        field: field.to_string(),
        file: filename.to_string(),
        line: line_numbers.values().min().copied(),
    }
}

/// Expand one stanza into source entries, one per (type, uri, suite)
/// combination. A stanza that breaks any rule yields a single error and
/// no entries.
fn stanza_to_entries(
    mut options: HashMap<String, String>,
    line_numbers: &HashMap<String, usize>,
    filename: &str,
) -> Result<Vec<SourceEntry>, SourceError> {
    let enabled = match options.remove("Enabled").as_deref().unwrap_or("yes") {
        "yes" => true,
        "no" => false,
        other => {
            return Err(SourceError::BadValue {
                field: "Enabled".to_string(),
                value: other.to_string(),
                reason: "must be one of yes or no (default: yes)".to_string(),
                file: filename.to_string(),
                line: line_numbers.get("Enabled").copied(),
            });
        }
    };

    // An embedded line break means the key itself was inlined rather than
    // a path to a keyring file; importing it is the caller's business
    let signed_by = match options.remove("Signed-By") {
        None => None,
        Some(v) if v.is_empty() => None,
        Some(v) if v.contains('\n') => Some(SignedBy::Inline(v)),
        Some(v) => Some(SignedBy::Path(PathBuf::from(v))),
    };

    let types_field = match options.remove("Types") {
        Some(v) => v,
        None => return Err(missing("Types", filename, line_numbers)),
    };
    let uris_field = match options.remove("URIs") {
        Some(v) => v,
        None => return Err(missing("URIs", filename, line_numbers)),
    };
    let suites_field = match options.remove("Suites") {
        Some(v) => v,
        None => return Err(missing("Suites", filename, line_numbers)),
    };

    let mut types = Vec::new();
    for t in types_field.split_whitespace() {
        match RepoType::try_from(t) {
            Ok(repo_type) => types.push(repo_type),
            Err(_) => {
                return Err(SourceError::BadValue {
                    field: "Types".to_string(),
                    value: t.to_string(),
                    reason: "must be one of deb or deb-src".to_string(),
                    file: filename.to_string(),
                    line: line_numbers.get("Types").copied(),
                });
            }
        }
    }
    let uris: Vec<&str> = uris_field.split_whitespace().collect();
    let suites: Vec<&str> = suites_field.split_whitespace().collect();

    // A single suite ending in / names an exact path relative to the URI;
    // such a stanza must not declare components. Any other suite needs at
    // least one component.
    let components: Vec<String> = if suites.len() == 1 && suites[0].ends_with('/') {
        if let Some(value) = options.remove("Components") {
            let suites_line = line_numbers.get("Suites").copied().unwrap_or_default();
            return Err(SourceError::BadValue {
                field: "Components".to_string(),
                value,
                reason: format!(
                    "'Suites' (line {}) specifies a path relative to 'URIs', \
                     so 'Components' must be omitted",
                    suites_line
                ),
                file: filename.to_string(),
                line: line_numbers.get("Components").copied(),
            });
        }
        Vec::new()
    } else {
        match options.remove("Components") {
            Some(v) => v.split_whitespace().map(str::to_string).collect(),
            None => return Err(missing("Components", filename, line_numbers)),
        }
    };

    let line = line_numbers.values().min().copied().unwrap_or_default();
    let mut entries = Vec::new();
    for repo_type in &types {
        for uri in &uris {
            for suite in &suites {
                entries.push(SourceEntry {
                    enabled,
                    repo_type: *repo_type,
                    uri: uri.to_string(),
                    suite: suite.to_string(),
                    components: components.clone(),
                    signed_by: signed_by.clone(),
                    options: options.clone(),
                    file: filename.to_string(),
                    line,
                });
            }
        }
    }
    Ok(entries)
}

/// Parse the lines of a deb822 sources file into entries and errors.
///
/// A bad stanza contributes one error and no entries; good stanzas are
/// unaffected. Deciding whether an entry-free file is fatal is left to
/// the caller, which can tell "nothing parsed" from "some stanzas failed".
pub fn parse_deb822_lines<'a, I>(lines: I, filename: &str) -> (Vec<SourceEntry>, Vec<SourceError>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut entries = Vec::new();
    let mut errors = Vec::new();
    for stanza in iter_stanzas(lines) {
        let (options, line_numbers) = stanza_options(&stanza);
        match stanza_to_entries(options, &line_numbers, filename) {
            Ok(mut found) => entries.append(&mut found),
            Err(e) => errors.push(e),
        }
    }
    (entries, errors)
}
