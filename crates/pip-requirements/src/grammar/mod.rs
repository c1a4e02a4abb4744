//! Backtracking matcher for requirements syntax.
//!
//! A recursive-descent PEG matcher with ordered choice. Every rule either
//! matches and advances, or fails and leaves the position where it found
//! it. While matching, the engine remembers the furthest position any token
//! failed at and what it expected there, which is what strict callers turn
//! into an error message.
//!
//! The strict `File`/`Line` rules and the loose recovery rules used while a
//! line is still being typed are implemented as separate `impl` blocks on
//! the same [`Parser`].

mod loose;
mod strict;
pub mod tree;

use crate::location::SourceLocation;
use std::collections::HashMap;
use std::fmt;
use tree::{LooseLine, Marker};

/// Default cap on nested marker parentheses.
pub const DEFAULT_MAX_MARKER_DEPTH: usize = 64;

/// Default cap on comparisons within one environment marker.
pub const DEFAULT_MAX_MARKER_CLAUSES: usize = 256;

/// Size limits on a single environment marker.
///
/// Markers nest and chain into recursive trees, so both limits bound how
/// deep those trees get before they are rejected as syntax errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerLimits {
    /// Parentheses that may be open at once
    pub max_depth: usize,
    /// Comparisons joined by `and`/`or`, counted across all groups
    pub max_clauses: usize,
}

impl Default for MarkerLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_MARKER_DEPTH,
            max_clauses: DEFAULT_MAX_MARKER_CLAUSES,
        }
    }
}

/// Entry rule for [`match_input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartRule {
    File,
    Line,
    LooseFile,
    LooseLine,
}

/// Tree produced by a successful match, shaped by the start rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree<'i> {
    File(Vec<tree::Line<'i>>),
    Line(tree::Line<'i>),
    LooseFile(Vec<LooseLine<'i>>),
    LooseLine(LooseLine<'i>),
}

pub type MatchResult<'i> = Result<ParseTree<'i>, MatchFailure>;

/// Something the engine looked for and did not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expected {
    /// Exact text, rendered quoted
    Literal(&'static str),
    /// A token class such as `end of input`, rendered as-is
    Named(&'static str),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{:?}", text),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Why a match failed: the furthest position reached and what would have
/// let the engine continue there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFailure {
    /// Byte offset of the furthest failure
    pub position: usize,
    /// Expectations at `position`, firm ones only when there are any
    pub expected: Vec<Expected>,
}

impl MatchFailure {
    /// Human-readable list of expectations, e.g. `"," or "]"`.
    pub fn description(&self) -> String {
        let items: Vec<String> = self.expected.iter().map(ToString::to_string).collect();
        match items.as_slice() {
            [] => "nothing".to_string(),
            [only] => only.clone(),
            [first, second] => format!("{} or {}", first, second),
            [init @ .., last] => format!("{}, or {}", init.join(", "), last),
        }
    }

    /// 1-based line and column of the failure within `input`.
    ///
    /// Columns count characters, not bytes.
    pub fn line_col(&self, input: &str) -> (usize, usize) {
        let position = self.position.min(input.len());
        let before = input.get(..position).unwrap_or(input);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}

/// Match `input` against `rule` with the default limits.
///
/// # Examples
///
/// ```
/// use pip_requirements::grammar::{match_input, ParseTree, StartRule};
///
/// let tree = match_input("pip >= 22.0", StartRule::Line).unwrap();
/// assert!(matches!(tree, ParseTree::Line(line) if line.req.is_some()));
///
/// let failure = match_input("pip???", StartRule::Line).unwrap_err();
/// assert_eq!(failure.position, 3);
/// assert_eq!(failure.description(), "end of input");
/// ```
pub fn match_input(input: &str, rule: StartRule) -> MatchResult<'_> {
    match_input_with_limits(input, rule, MarkerLimits::default())
}

/// Match `input` against `rule`, rejecting environment markers that exceed
/// `limits`.
pub fn match_input_with_limits(
    input: &str,
    rule: StartRule,
    limits: MarkerLimits,
) -> MatchResult<'_> {
    match rule {
        StartRule::File => match_file(input, limits).map(ParseTree::File),
        StartRule::Line => match_line(input, limits).map(ParseTree::Line),
        StartRule::LooseFile => Ok(ParseTree::LooseFile(match_loose_file(input))),
        StartRule::LooseLine => Ok(ParseTree::LooseLine(match_loose_line(input))),
    }
}

pub(crate) fn match_file(
    input: &str,
    limits: MarkerLimits,
) -> Result<Vec<tree::Line<'_>>, MatchFailure> {
    let mut parser = Parser::new(input, limits);
    parser.file().ok_or_else(|| parser.failure())
}

pub(crate) fn match_line(
    input: &str,
    limits: MarkerLimits,
) -> Result<tree::Line<'_>, MatchFailure> {
    let mut parser = Parser::new(input, limits);
    parser.strict_line().ok_or_else(|| parser.failure())
}

/// Loose matching cannot fail.
pub(crate) fn match_loose_file(input: &str) -> Vec<LooseLine<'_>> {
    Parser::new(input, MarkerLimits::default()).loose_file()
}

pub(crate) fn match_loose_line(input: &str) -> LooseLine<'_> {
    Parser::new(input, MarkerLimits::default()).loose_line()
}

/// Marker rules whose results are cached per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MarkerRule {
    Or,
    And,
    Atom,
}

/// Cached outcome of a marker rule: the node plus where it left the cursor.
type MemoEntry<'i> = Option<(Marker<'i>, Cursor)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    pos: usize,
    /// End of the last consumed token
    last_end: usize,
}

pub(crate) struct Parser<'i> {
    input: &'i str,
    cursor: Cursor,
    furthest: usize,
    /// Expectations at `furthest`, flagged tentative when recorded inside an
    /// optional or repeated sub-rule
    expected: Vec<(Expected, bool)>,
    tentative_depth: usize,
    memo: HashMap<(MarkerRule, usize), MemoEntry<'i>>,
    marker_depth: usize,
    /// Comparisons matched so far in the current marker
    marker_clauses: usize,
    limits: MarkerLimits,
}

impl<'i> Parser<'i> {
    fn new(input: &'i str, limits: MarkerLimits) -> Self {
        Self {
            input,
            cursor: Cursor { pos: 0, last_end: 0 },
            furthest: 0,
            expected: Vec::new(),
            tentative_depth: 0,
            memo: HashMap::new(),
            marker_depth: 0,
            marker_clauses: 0,
            limits,
        }
    }

    fn failure(&self) -> MatchFailure {
        let firm: Vec<Expected> = self
            .expected
            .iter()
            .filter(|(_, tentative)| !tentative)
            .map(|(expected, _)| *expected)
            .collect();
        let expected = if firm.is_empty() {
            self.expected.iter().map(|(expected, _)| *expected).collect()
        } else {
            firm
        };
        MatchFailure {
            position: self.furthest,
            expected,
        }
    }

    /// Record that `what` was expected at `pos`.
    fn expect_at(&mut self, pos: usize, what: Expected) {
        let tentative = self.tentative_depth > 0;
        if pos > self.furthest {
            self.furthest = pos;
            self.expected.clear();
        }
        if pos < self.furthest {
            return;
        }
        match self.expected.iter_mut().find(|(e, _)| *e == what) {
            Some(entry) => entry.1 &= tentative,
            None => self.expected.push((what, tentative)),
        }
    }

    fn rest(&self) -> &'i str {
        &self.input[self.cursor.pos..]
    }

    /// Position of the next token, i.e. after insignificant whitespace.
    fn token_start(&self) -> usize {
        let rest = self.rest();
        let skipped = rest.len() - rest.trim_start_matches(is_blank).len();
        self.cursor.pos + skipped
    }

    /// Consume `len` bytes starting at the current position as one token.
    fn take(&mut self, len: usize) -> tree::Lexeme<'i> {
        let start = self.cursor.pos;
        let end = start + len;
        self.cursor = Cursor { pos: end, last_end: end };
        tree::Lexeme {
            text: &self.input[start..end],
            span: SourceLocation::new(start, end),
        }
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: usize) -> SourceLocation {
        SourceLocation::new(start, self.cursor.last_end.max(start))
    }

    /// Run `rule`, restoring the position if it fails.
    fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let saved = self.cursor;
        let result = rule(self);
        if result.is_none() {
            self.cursor = saved;
        }
        result
    }

    /// `rule?`
    fn optional<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        self.tentative_depth += 1;
        let result = self.attempt(rule);
        self.tentative_depth -= 1;
        result
    }

    /// `rule*`
    fn repeat<T>(&mut self, mut rule: impl FnMut(&mut Self) -> Option<T>) -> Vec<T> {
        let mut items = Vec::new();
        loop {
            let before = self.cursor;
            match self.optional(&mut rule) {
                Some(item) if self.cursor.pos > before.pos => items.push(item),
                Some(_) => {
                    self.cursor = before;
                    break;
                }
                None => break,
            }
        }
        items
    }

    /// `(item (sep item)*)?`
    fn list_of<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Option<T>,
        sep: &'static str,
    ) -> Vec<T> {
        let Some(first) = self.optional(&mut item) else {
            return Vec::new();
        };
        let mut items = vec![first];
        items.extend(self.repeat(|p| {
            p.literal(sep)?;
            item(p)
        }));
        items
    }

    fn literal(&mut self, text: &'static str) -> Option<tree::Lexeme<'i>> {
        let start = self.token_start();
        if self.input[start..].starts_with(text) {
            self.cursor.pos = start;
            Some(self.take(text.len()))
        } else {
            self.expect_at(start, Expected::Literal(text));
            None
        }
    }

    /// A word that must not run on into a longer identifier.
    fn keyword(&mut self, word: &'static str) -> Option<tree::Lexeme<'i>> {
        let start = self.token_start();
        let after = &self.input[start..];
        let boundary = after
            .strip_prefix(word)
            .is_some_and(|tail| !tail.starts_with(is_identifier_char));
        if boundary {
            self.cursor.pos = start;
            Some(self.take(word.len()))
        } else {
            self.expect_at(start, Expected::Literal(word));
            None
        }
    }

    /// A non-empty run of characters accepted by `accept`.
    fn run_of(
        &mut self,
        accept: impl Fn(char) -> bool,
        name: &'static str,
    ) -> Option<tree::Lexeme<'i>> {
        let start = self.token_start();
        let after = &self.input[start..];
        let len = after.find(|c: char| !accept(c)).unwrap_or(after.len());
        if len == 0 {
            self.expect_at(start, Expected::Named(name));
            return None;
        }
        self.cursor.pos = start;
        Some(self.take(len))
    }

    /// `letterOrDigit (('-'|'_'|'.')* letterOrDigit)*`
    fn identifier(&mut self) -> Option<tree::Lexeme<'i>> {
        let start = self.token_start();
        let bytes = self.input[start..].as_bytes();
        if !bytes.first().is_some_and(u8::is_ascii_alphanumeric) {
            self.expect_at(start, Expected::Named("identifier"));
            return None;
        }
        let mut len = 1;
        loop {
            let mut next = len;
            while bytes.get(next).is_some_and(|b| matches!(b, b'-' | b'_' | b'.')) {
                next += 1;
            }
            if bytes.get(next).is_some_and(u8::is_ascii_alphanumeric) {
                len = next + 1;
            } else {
                break;
            }
        }
        self.cursor.pos = start;
        Some(self.take(len))
    }

    fn version(&mut self) -> Option<tree::Lexeme<'i>> {
        self.run_of(is_version_char, "version")
    }

    /// Everything up to the end of the line, possibly nothing.
    fn rest_of_line(&mut self) -> tree::Lexeme<'i> {
        let len = self.rest().find('\n').unwrap_or(self.rest().len());
        let start = self.cursor.pos;
        let end = start + len;
        let last_end = if len == 0 { self.cursor.last_end } else { end };
        self.cursor = Cursor { pos: end, last_end };
        tree::Lexeme {
            text: &self.input[start..end],
            span: SourceLocation::new(start, end),
        }
    }

    fn newline(&mut self) -> Option<tree::Lexeme<'i>> {
        self.literal("\n")
    }

    fn end_of_input(&mut self) -> Option<()> {
        let start = self.token_start();
        if start == self.input.len() {
            self.cursor.pos = start;
            Some(())
        } else {
            self.expect_at(start, Expected::Named("end of input"));
            None
        }
    }

    /// Look up or compute a marker rule at the current position.
    fn memoized(
        &mut self,
        rule: MarkerRule,
        compute: fn(&mut Self) -> Option<Marker<'i>>,
    ) -> Option<Marker<'i>> {
        let key = (rule, self.cursor.pos);
        if let Some(entry) = self.memo.get(&key) {
            return entry.clone().map(|(node, cursor)| {
                self.cursor = cursor;
                node
            });
        }
        let result = self.attempt(compute);
        let entry = result.clone().map(|node| (node, self.cursor));
        self.memo.insert(key, entry);
        result
    }

    /// Enter one level of marker parentheses, failing past the cap.
    fn enter_group(&mut self, at: usize) -> Option<()> {
        if self.marker_depth >= self.limits.max_depth {
            self.expect_at(at, Expected::Named("a less deeply nested marker"));
            return None;
        }
        self.marker_depth += 1;
        Some(())
    }

    fn leave_group(&mut self) {
        self.marker_depth = self.marker_depth.saturating_sub(1);
    }

    /// Count one more comparison in the current marker, failing past the cap.
    ///
    /// The failure is recorded at the end of the rejected comparison so it
    /// outranks anything matched earlier on the line.
    fn count_clause(&mut self) -> Option<()> {
        if self.marker_clauses >= self.limits.max_clauses {
            self.expect_at(self.cursor.last_end, Expected::Named("a shorter marker"));
            return None;
        }
        self.marker_clauses += 1;
        Some(())
    }
}

/// Whitespace skipped between tokens; newline is significant.
const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

const fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '*' | '+' | '!')
}

/// Characters that end a file path or URL.
const fn is_space(c: char) -> bool {
    is_blank(c) || c == '\n'
}
