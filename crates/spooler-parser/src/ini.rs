// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A hand-rolled ini-style parser.
//!
//! Not an off-the-shelf `ini` crate: job files need a bespoke "consume an
//! option as you read it, then reject anything left over" workflow that
//! no general-purpose ini library exposes.

use crate::error::ParseError;

/// A single `[section]` block: its options in file order, consumed one
/// at a time by [`Section::take`].
#[derive(Debug, Default)]
pub struct Section {
    entries: Vec<(String, String)>,
}

impl Section {
    /// Remove and return the first value for `key`, preserving the
    /// relative order of whatever remains.
    pub fn take(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Every remaining value, in file order — used for `[inputfiles]`
    /// where the keys themselves are irrelevant (§4.1 step 6).
    pub fn values_in_order(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    /// Keys left after every expected option has been `take`n. A
    /// non-empty result means the section had unknown options (§4.1
    /// step 4: "any remaining options in the section fail validation").
    pub fn remaining_keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }
}

/// A fully parsed ini document: an ordered set of named sections.
#[derive(Debug, Default)]
pub struct IniDocument {
    sections: Vec<(String, Section)>,
}

impl IniDocument {
    /// Remove and return the named section, if present.
    pub fn take_section(&mut self, name: &str) -> Option<Section> {
        let idx = self.sections.iter().position(|(n, _)| n == name)?;
        Some(self.sections.remove(idx).1)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|(n, _)| n == name)
    }
}

/// Parse ini-style text. Fails with [`ParseError::Syntax`] if there is no
/// section header at all, if a key/value line appears before any header,
/// or if a line is neither blank, a comment, a header, nor `key = value`.
pub fn parse(text: &str) -> Result<IniDocument, ParseError> {
    let mut doc = IniDocument::default();
    let mut current: Option<(String, Section)> = None;

    for (lineno, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = parse_section_header(line) {
            if let Some(finished) = current.take() {
                doc.sections.push(finished);
            }
            current = Some((name, Section::default()));
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ParseError::Syntax(format!(
                "line {}: expected 'key = value', got {:?}",
                lineno + 1,
                raw_line
            )));
        };

        let Some((_, section)) = current.as_mut() else {
            return Err(ParseError::Syntax(format!(
                "line {}: option outside of any [section] header",
                lineno + 1
            )));
        };
        section.entries.push((key.trim().to_string(), value.trim().to_string()));
    }

    if let Some(finished) = current.take() {
        doc.sections.push(finished);
    }

    if doc.sections.is_empty() {
        return Err(ParseError::Syntax("no [section] headers found".to_string()));
    }

    Ok(doc)
}

fn parse_section_header(line: &str) -> Option<String> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        None
    } else {
        Some(inner.trim().to_string())
    }
}

#[cfg(test)]
#[path = "ini_tests.rs"]
mod tests;
