//! Phrases that make a post read as machine-written

/// Default banned phrases, lowercase
pub const BANNED_PHRASES: &[&str] = &[
    "in today's rapidly evolving",
    "in an era where",
    "let's dive into",
    "let's unpack",
    "here's the thing",
    "at the end of the day",
    "the bottom line is",
    "excited to announce",
    "thrilled to share",
    "leverage synergies",
    "game-changer",
    "best practices",
    "deep dive",
];

/// First banned phrase found in `text`, case-insensitively
///
/// Phrases are checked in list order.
pub fn find_banned<'a, S: AsRef<str>>(text: &str, phrases: &'a [S]) -> Option<&'a str> {
    let lowered = text.to_lowercase();
    phrases
        .iter()
        .map(AsRef::as_ref)
        .find(|phrase| !phrase.is_empty() && lowered.contains(&phrase.to_lowercase()))
}
