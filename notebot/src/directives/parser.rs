//! Directive block parser
//!
//! A directive block starts at any line beginning with `\` and runs until the
//! next such line or the end of the text. The first word of the block is the
//! marker; the rest of that line (after a single space) plus every following
//! line, joined with `\n`, is the value. Text before the first marker line is
//! ignored.

use strum::{AsRefStr, EnumString};

/// Lines starting with this character open a new directive block
pub const MARKER_SENTINEL: char = '\\';

/// Directive markers the agent understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr)]
pub enum Marker {
    #[strum(serialize = "\\READ")]
    Read,
    #[strum(serialize = "\\MESSAGE")]
    Message,
    #[strum(serialize = "\\WRITE")]
    Write,
}

/// Directive values grouped by marker, in the order markers were first seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveMap {
    entries: Vec<(String, Vec<String>)>,
}

impl DirectiveMap {
    fn push(&mut self, marker: &str, value: String) {
        match self.entries.iter_mut().find(|(m, _)| m == marker) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((marker.to_string(), vec![value])),
        }
    }

    /// All values for `marker`, in order of appearance; empty if absent
    pub fn get(&self, marker: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(m, _)| m == marker)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn first(&self, marker: &str) -> Option<&str> {
        self.get(marker).first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of directive blocks across all markers
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(marker, values)| (marker.as_str(), values.as_slice()))
    }
}

/// Parse every directive block in `text`
pub fn parse_directives(text: &str) -> DirectiveMap {
    let lines: Vec<&str> = text.lines().collect();
    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.starts_with(MARKER_SENTINEL))
        .map(|(i, _)| i)
        .collect();

    let mut map = DirectiveMap::default();
    for (n, &start) in starts.iter().enumerate() {
        let end = starts.get(n + 1).copied().unwrap_or(lines.len());
        let (marker, head) = lines[start]
            .split_once(' ')
            .unwrap_or((lines[start], ""));

        let mut value = head.to_string();
        for line in &lines[start + 1..end] {
            value.push('\n');
            value.push_str(line);
        }
        map.push(marker, value);
    }

    if !map.is_empty() {
        log::debug!(
            "[AGENT] Parsed {} directive(s): {:?}",
            map.len(),
            map.iter().map(|(m, v)| (m, v.len())).collect::<Vec<_>>()
        );
    }
    map
}
