//! Options-driven entry points.
//!
//! [`RequirementsParser`] runs the grammar with a given [`ParseOptions`] and
//! reduces the parse tree. The free functions at the crate root are thin
//! wrappers over a default-configured parser.

use crate::config::ParseOptions;
use crate::error::{ParseTarget, RequirementsSyntaxError, Result};
use crate::extract;
use crate::grammar;
use crate::location::{Decoration, Located, Plain, WithLocation};
use crate::types::{LooseProjectNameRequirement, Requirement};
use serde::Serialize;

/// Output of a [`RequirementsParser`], plain or located depending on
/// [`ParseOptions::include_locations`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Parsed<P, L> {
    Plain(P),
    Located(L),
}

impl<P, L> Parsed<P, L> {
    pub const fn is_located(&self) -> bool {
        matches!(self, Self::Located(_))
    }

    /// The plain output, if locations were not requested.
    pub fn plain(self) -> Option<P> {
        match self {
            Self::Plain(plain) => Some(plain),
            Self::Located(_) => None,
        }
    }

    /// The located output, if locations were requested.
    pub fn located(self) -> Option<L> {
        match self {
            Self::Plain(_) => None,
            Self::Located(located) => Some(located),
        }
    }
}

pub type ParsedFile = Parsed<Vec<Requirement>, Vec<Requirement<Located>>>;
pub type ParsedLine = Parsed<Option<Requirement>, Option<Requirement<Located>>>;
pub type LooseParsedFile = Parsed<
    Vec<LooseProjectNameRequirement>,
    Vec<WithLocation<LooseProjectNameRequirement<Located>>>,
>;
pub type LooseParsedLine = Parsed<
    Option<LooseProjectNameRequirement>,
    Option<WithLocation<LooseProjectNameRequirement<Located>>>,
>;

/// Requirements parser configured by [`ParseOptions`].
///
/// # Examples
///
/// ```
/// use pip_requirements::{ParseOptions, RequirementsParser};
///
/// let parser = RequirementsParser::new(ParseOptions::with_locations());
/// let parsed = parser.parse_file("pip == 22.0.2\n-r dev.txt").unwrap();
///
/// let requirements = parsed.located().unwrap();
/// assert_eq!(requirements.len(), 2);
/// assert_eq!(requirements[0].location().end_idx, 13);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirementsParser {
    options: ParseOptions,
}

impl RequirementsParser {
    pub const fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a whole requirements file.
    pub fn parse_file(&self, text: &str) -> Result<ParsedFile> {
        if self.options.include_locations {
            self.file::<Located>(text).map(Parsed::Located)
        } else {
            self.file::<Plain>(text).map(Parsed::Plain)
        }
    }

    /// Parse a single line; blank and comment-only lines yield `None`.
    pub fn parse_line(&self, text: &str) -> Result<ParsedLine> {
        if self.options.include_locations {
            self.line::<Located>(text).map(Parsed::Located)
        } else {
            self.line::<Plain>(text).map(Parsed::Plain)
        }
    }

    /// Recover name requirements from a file that may be mid-edit.
    pub fn parse_file_loosely(&self, text: &str) -> LooseParsedFile {
        if self.options.include_locations {
            Parsed::Located(self.file_loosely::<Located>(text))
        } else {
            Parsed::Plain(self.file_loosely::<Plain>(text))
        }
    }

    /// Recover the name requirement on a line that may be mid-edit.
    pub fn parse_line_loosely(&self, text: &str) -> LooseParsedLine {
        if self.options.include_locations {
            Parsed::Located(self.line_loosely::<Located>(text))
        } else {
            Parsed::Plain(self.line_loosely::<Plain>(text))
        }
    }

    /// Strict file parse under an explicit decoration.
    pub fn file<D: Decoration>(&self, text: &str) -> Result<Vec<Requirement<D>>> {
        tracing::debug!(mode = "file", len = text.len(), "Parsing requirements");
        let lines = grammar::match_file(text, self.options.marker_limits())
            .map_err(|failure| syntax_error(ParseTarget::File, text, &failure))?;
        let requirements = extract::requirements::<D>(&lines);
        tracing::debug!(
            lines = lines.len(),
            requirements = requirements.len(),
            "Parsed requirements file"
        );
        Ok(requirements)
    }

    /// Strict line parse under an explicit decoration.
    pub fn line<D: Decoration>(&self, text: &str) -> Result<Option<Requirement<D>>> {
        tracing::debug!(mode = "line", len = text.len(), "Parsing requirements");
        let line = grammar::match_line(text, self.options.marker_limits())
            .map_err(|failure| syntax_error(ParseTarget::Line, text, &failure))?;
        Ok(extract::line::<D>(&line))
    }

    /// Loose file parse under an explicit decoration.
    pub fn file_loosely<D: Decoration>(
        &self,
        text: &str,
    ) -> Vec<D::Wrap<LooseProjectNameRequirement<D>>> {
        tracing::debug!(mode = "loose file", len = text.len(), "Parsing requirements");
        let lines = grammar::match_loose_file(text);
        let requirements = extract::loose_requirements::<D>(&lines);
        tracing::debug!(
            lines = lines.len(),
            requirements = requirements.len(),
            "Recovered loose requirements"
        );
        requirements
    }

    /// Loose line parse under an explicit decoration.
    pub fn line_loosely<D: Decoration>(
        &self,
        text: &str,
    ) -> Option<D::Wrap<LooseProjectNameRequirement<D>>> {
        tracing::debug!(mode = "loose line", len = text.len(), "Parsing requirements");
        extract::loose_line::<D>(&grammar::match_loose_line(text))
    }
}

fn syntax_error(
    target: ParseTarget,
    text: &str,
    failure: &grammar::MatchFailure,
) -> RequirementsSyntaxError {
    let error = RequirementsSyntaxError::from_failure(target, text, failure);
    tracing::debug!(
        %target,
        line = error.line,
        column = error.column,
        expected = %error.expected,
        "Requirements syntax error"
    );
    error
}
