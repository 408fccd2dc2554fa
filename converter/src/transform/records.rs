//! Line-to-record conversion.
//!
//! Each source line becomes one record block of three physical lines:
//!
//! ```text
//! "1, 2 (m) 3 (m) 4,5 (m) 6"   →   "1\n12;3\n45;6\n"
//!  └──── source line ────┘          │  │     └ tokens 2..4
//!                                   │  └ tokens 0..2
//!                                   └ counter
//! ```
//!
//! The conversion is total: every string converts, and a token index past
//! the end of a line renders as an empty string.

use std::fmt;

/// Literal field marker inside a Caris line.
pub const FIELD_MARKER: &str = "(m)";

/// Characters dropped from a line before it is split.
const STRIPPED_CHARS: [char; 2] = [' ', ','];

/// Remove every space and comma from a line.
pub fn clean_line(line: &str) -> String {
    line.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect()
}

/// Split a cleaned line on [`FIELD_MARKER`].
///
/// A line without the marker yields a single token equal to the line,
/// including the empty line.
pub fn split_tokens(cleaned: &str) -> Vec<String> {
    cleaned.split(FIELD_MARKER).map(str::to_string).collect()
}

/// One converted source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based position of the source line
    pub number: usize,
    /// Tokens of the cleaned line, in order
    pub tokens: Vec<String>,
}

impl Record {
    /// Build the record for `line`, numbered `number`.
    pub fn parse(number: usize, line: &str) -> Self {
        Self {
            number,
            tokens: split_tokens(&clean_line(line)),
        }
    }

    /// Token at `index`, or `None` past the end of the line.
    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Render tokens `first` and `first + 1` joined by `;`.
    ///
    /// A missing second token renders as empty, keeping the separator.
    /// When the pair starts past the end of the line, nothing is rendered.
    fn pair(&self, first: usize) -> String {
        match self.token(first) {
            Some(head) => format!("{};{}", head, self.token(first + 1).unwrap_or("")),
            None => String::new(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n{}\n", self.number, self.pair(0), self.pair(2))
    }
}

/// Parse every `\n`-delimited line of `source` into a [`Record`].
///
/// A trailing newline produces a final record from the empty line after it.
pub fn parse_records(source: &str) -> impl Iterator<Item = Record> + '_ {
    source
        .split('\n')
        .enumerate()
        .map(|(i, line)| Record::parse(i + 1, line))
}

/// Convert source text into rendered record blocks, one per line.
///
/// # Example
/// ```
/// use caris_converter::convert;
///
/// let records = convert("A (m) B (m) C (m) D\nHELLO");
/// assert_eq!(records, vec!["1\nA;B\nC;D\n", "2\nHELLO;\n\n"]);
/// ```
pub fn convert(source: &str) -> Vec<String> {
    parse_records(source).map(|r| r.to_string()).collect()
}
