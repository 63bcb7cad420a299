use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use c19_types::InfectionReport;

// ── Message shapes ─────────────────────────────────────────────────
//
// Real data examples, as handed over by the retrieval side:
//
//   No attribution:
//     source: None
//     desc:   "2020-03-09 10:47 - En person i Värmland"
//     count:  "1"
//
//   With attribution:
//     source: "Person i Skåne som varit i norra Italien.,"
//     desc:   "2020-03-03 00:00 - "
//     count:  "1"
//
// The body text is inconsistent: punctuation glued onto words
// ("Italien.,"), an optional "Region"/"region" before the place name
// ("i Region Jämtland"), and compound place names ("i Västra Götaland").

/// Errors raised while assembling a report record.
///
/// Absent location/date are valid outcomes, not errors; a count token
/// that is not a base-10 integer is the only hard failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("count token {0:?} is not a base-10 integer")]
    InvalidCount(String),
}

// Exact wire shape of a leading report timestamp: zero-padded ISO date.
static RE_ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Locative prepositions that introduce a place name.
/// Matched case-sensitively, lowercase form only.
const PREPOSITIONS: &[&str] = &["i", "från"];

/// Insert a space before each `.` and `,` so punctuation glued onto a
/// word ("Italien.,") does not corrupt whitespace tokenization.
///
/// Already-spaced punctuation is left alone, so the function is
/// idempotent. Absent and empty input pass through unchanged.
pub fn normalize_message(msg: Option<&str>) -> Option<String> {
    let msg = msg?;
    let mut out = String::with_capacity(msg.len() + 8);
    for ch in msg.chars() {
        if (ch == '.' || ch == ',') && !out.ends_with(' ') {
            out.push(' ');
        }
        out.push(ch);
    }
    Some(out)
}

/// Scan a free-text message for the first place name introduced by a
/// locative preposition.
///
/// Walks the space-separated tokens left to right. At each "i"/"från",
/// the follower decides:
///   - "region"/"Region" followed by a capitalized token: skip the
///     administrative keyword and capture from the token after it
///     ("i Region Jämtland" → "Jämtland");
///   - a capitalized token: capture from it directly
///     ("i Stockholm" → "Stockholm");
///   - anything else: the preposition is rejected and the scan moves on,
///     so "i stockholm i Monad" yields "Monad".
///
/// Capture is greedy across consecutive capitalized tokens, which keeps
/// compound names intact ("i Västra Götaland" → "Västra Götaland").
/// The first successful match wins; later ones in the same message are
/// ignored.
pub fn parse_location_from_message(message: &str) -> Option<String> {
    let tokens: Vec<&str> = message.split(' ').collect();

    for (idx, token) in tokens.iter().enumerate() {
        if !PREPOSITIONS.contains(token) {
            continue;
        }
        let Some(&next) = tokens.get(idx + 1) else {
            // Trailing preposition, nothing to capture.
            continue;
        };
        if (next == "region" || next == "Region")
            && tokens.get(idx + 2).is_some_and(|t| starts_uppercase(t))
        {
            return Some(join_capitalized(&tokens[idx + 2..]));
        }
        if starts_uppercase(next) {
            return Some(join_capitalized(&tokens[idx + 1..]));
        }
        // Lowercase follower: not a proper noun, keep scanning.
    }

    None
}

/// Parse a report date from the leading token of a message.
///
/// Only the first token is a candidate: the source always puts the
/// timestamp at the very start of the body, and anything later is free
/// text that may coincidentally look like a date. The token must be
/// exactly `YYYY-MM-DD` (zero-padded) and a real calendar date.
pub fn parse_date_from_message(message: &str) -> Option<NaiveDate> {
    let first = message.split(' ').next()?;
    if !RE_ISO_DATE.is_match(first) {
        return None;
    }
    NaiveDate::parse_from_str(first, "%Y-%m-%d").ok()
}

/// Assemble one structured report from the raw fields of an entry.
///
/// The location is taken from the attribution line when one is present
/// and non-empty, otherwise from the body; the date always comes from
/// the body (attribution text never carries a timestamp). Both strings
/// go through [`normalize_message`] first. The count must parse as a
/// base-10 integer or the whole entry is rejected.
pub fn parse_entry(
    source: Option<&str>,
    description: &str,
    count: &str,
) -> Result<InfectionReport, ParseError> {
    let source = normalize_message(source);
    let description =
        normalize_message(Some(description)).unwrap_or_default();

    let location = match source.as_deref() {
        Some(src) if !src.is_empty() => parse_location_from_message(src),
        _ => parse_location_from_message(&description),
    };
    let date = parse_date_from_message(&description);
    let count: i64 = count
        .parse()
        .map_err(|_| ParseError::InvalidCount(count.to_string()))?;

    Ok(InfectionReport {
        location,
        date,
        count,
    })
}

/// Unicode-aware check on the first character only, so "Åre" and
/// "Örebro" count as capitalized.
fn starts_uppercase(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}

/// Greedily take the leading run of capitalized tokens and join them
/// with single spaces.
fn join_capitalized(tokens: &[&str]) -> String {
    let parts: Vec<&str> = tokens
        .iter()
        .take_while(|t| starts_uppercase(t))
        .copied()
        .collect();
    parts.join(" ")
}
