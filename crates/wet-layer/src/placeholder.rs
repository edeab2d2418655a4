//! Placeholder tokenizer and expansion
//!
//! A token is the shortest run of text between two `$` delimiters that does
//! not cross a line break. Scanning resumes after the closing delimiter, so
//! `$a$b$` yields the single token `a` followed by the literal `b$`.

use crate::model::Placeholder;
use std::collections::HashMap;

/// A slice of message text produced by [`tokenize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied to the output as is
    Literal(&'a str),
    /// A `$name$` token: `name` without delimiters, `raw` with them
    Token { name: &'a str, raw: &'a str },
}

/// Iterator over the segments of a message text
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
    pending: Option<Segment<'a>>,
}

/// Split `text` into literal runs and `$token$` segments
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        text,
        pos: 0,
        pending: None,
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(segment) = self.pending.take() {
            return Some(segment);
        }
        if self.pos >= self.text.len() {
            return None;
        }

        let start = self.pos;
        match find_token(self.text, start) {
            Some((open, close)) => {
                let token = Segment::Token {
                    name: &self.text[open + 1..close],
                    raw: &self.text[open..=close],
                };
                self.pos = close + 1;
                if open > start {
                    self.pending = Some(token);
                    Some(Segment::Literal(&self.text[start..open]))
                } else {
                    Some(token)
                }
            }
            None => {
                self.pos = self.text.len();
                Some(Segment::Literal(&self.text[start..]))
            }
        }
    }
}

const fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Byte offsets of the opening and closing `$` of the next token at or after `from`
fn find_token(text: &str, from: usize) -> Option<(usize, usize)> {
    let mut search = from;
    while let Some(offset) = text[search..].find('$') {
        let open = search + offset;
        let body = open + 1;
        for (idx, c) in text[body..].char_indices() {
            if c == '$' {
                return Some((open, body + idx));
            }
            if is_line_terminator(c) {
                break;
            }
        }
        search = body;
    }
    None
}

/// Zero-based substitution index of a positional content such as `$2`
///
/// The whole content must be `$` followed by ASCII digits. `$0` and values
/// too large to index never match.
pub fn positional_index(content: &str) -> Option<usize> {
    let digits = content.strip_prefix('$')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<usize>().ok()?.checked_sub(1)
}

/// Replace every `$token$` in `text` using `placeholders` and `substitutions`
///
/// Unknown tokens and placeholders with empty content keep their original
/// `$token$` text. A positional reference past the end of `substitutions`
/// emits the placeholder content itself.
pub fn expand(text: &str, placeholders: &[Placeholder], substitutions: &[String]) -> String {
    let by_name: HashMap<String, &Placeholder> = placeholders
        .iter()
        .map(|placeholder| (placeholder.name.to_lowercase(), placeholder))
        .collect();

    let mut output = String::with_capacity(text.len());
    for segment in tokenize(text) {
        match segment {
            Segment::Literal(literal) => output.push_str(literal),
            Segment::Token { name, raw } => {
                output.push_str(replacement(name, raw, &by_name, substitutions));
            }
        }
    }
    output
}

fn replacement<'a>(
    name: &str,
    raw: &'a str,
    by_name: &HashMap<String, &'a Placeholder>,
    substitutions: &'a [String],
) -> &'a str {
    match by_name.get(&name.to_lowercase()).copied() {
        Some(placeholder) if !placeholder.content.is_empty() => {
            positional_index(&placeholder.content)
                .and_then(|index| substitutions.get(index))
                .map_or(placeholder.content.as_str(), String::as_str)
        }
        _ => raw,
    }
}
