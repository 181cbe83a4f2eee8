use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureKind {
    Decision,
    Action,
    Issue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCapture {
    pub kind: CaptureKind,
    pub content: String,
}

/// Classify a quick-capture line by its `D:` / `A:` / `I:` prefix
/// (case-insensitive). Anything else is an action carrying the whole line.
pub fn parse(raw: &str) -> ParsedCapture {
    let trimmed = raw.trim();

    let prefixed = |kind: CaptureKind| {
        let rest = trimmed.get(2..).unwrap_or_default();
        ParsedCapture {
            kind,
            content: rest.trim().to_string(),
        }
    };

    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some('D' | 'd'), Some(':')) => prefixed(CaptureKind::Decision),
        (Some('A' | 'a'), Some(':')) => prefixed(CaptureKind::Action),
        (Some('I' | 'i'), Some(':')) => prefixed(CaptureKind::Issue),
        _ => ParsedCapture {
            kind: CaptureKind::Action,
            content: trimmed.to_string(),
        },
    }
}
