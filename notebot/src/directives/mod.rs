//! Directive protocol
//!
//! Generated text carries line-oriented directives (`\READ`, `\MESSAGE`,
//! `\WRITE`). The parser splits text into directive blocks; the helpers here
//! turn those blocks into typed read/write requests and the reply.

pub mod parser;

pub use parser::{parse_directives, DirectiveMap, Marker};

/// A request to append `content` to the note at `path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub path: String,
    pub content: String,
}

/// Note paths requested with `\READ`. Only the first line of each directive is
/// used as the path; blank paths are skipped.
pub fn read_requests(map: &DirectiveMap) -> Vec<String> {
    map.get(Marker::Read.as_ref())
        .iter()
        .filter_map(|value| {
            let path = value.lines().next().unwrap_or("").trim();
            if path.is_empty() {
                log::warn!("[AGENT] Skipping \\READ directive without a path");
                None
            } else {
                Some(path.to_string())
            }
        })
        .collect()
}

/// Note appends requested with `\WRITE`: the first line is the path, the
/// remaining lines are the content.
pub fn write_requests(map: &DirectiveMap) -> Vec<WriteRequest> {
    map.get(Marker::Write.as_ref())
        .iter()
        .filter_map(|value| {
            let mut lines = value.lines();
            let path = lines.next().unwrap_or("").trim();
            if path.is_empty() {
                log::warn!("[AGENT] Skipping \\WRITE directive without a path");
                return None;
            }
            Some(WriteRequest {
                path: path.to_string(),
                content: lines.collect::<Vec<_>>().join("\n"),
            })
        })
        .collect()
}

/// The reply to show the user: the first `\MESSAGE` block, trimmed
pub fn reply(map: &DirectiveMap) -> Option<String> {
    map.first(Marker::Message.as_ref())
        .map(|message| message.trim().to_string())
}
