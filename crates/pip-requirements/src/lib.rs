//! Parser for pip requirements files.
//!
//! Reads the syntax of `requirements.txt`: PEP 508 name requirements with
//! extras, version clauses and environment markers, URL requirements, and
//! `-r`/`-c` references to other files.
//!
//! # Features
//!
//! - **Strict parsing**: the whole input must follow the syntax, otherwise a
//!   [`RequirementsSyntaxError`] says where and what was expected
//! - **Loose parsing**: recovers whatever name requirements can be made out
//!   of text that is still being typed, and never fails
//! - **Locations**: every pipeline has a variant that wraps each node in a
//!   [`WithLocation`] carrying the byte span it was parsed from
//!
//! # Architecture
//!
//! - **Grammar**: backtracking matcher producing a parse tree with spans
//!   ([`grammar`])
//! - **Extraction**: reduction of parse trees to [`types`], generic over a
//!   [`Decoration`] so plain and located output share one traversal
//! - **Parser**: [`RequirementsParser`] driven by [`ParseOptions`]
//! - **Error Handling**: typed errors with `thiserror`
//!
//! # Examples
//!
//! ## Parsing a file
//!
//! ```
//! use pip_requirements::{parse_requirements_file, Requirement};
//!
//! let content = "\
//! requests[security] >= 2.28, < 3 ; python_version >= '3.8'
//! # pinned for CI
//! -c constraints.txt
//! ";
//!
//! let requirements = parse_requirements_file(content).unwrap();
//! assert_eq!(requirements.len(), 2);
//! assert_eq!(requirements[0].name(), Some("requests"));
//! assert!(matches!(requirements[1], Requirement::ConstraintsFile(_)));
//! ```
//!
//! ## Recovering from incomplete input
//!
//! ```
//! use pip_requirements::parse_requirements_line_loosely;
//!
//! let requirement = parse_requirements_line_loosely("flask[async,").unwrap();
//! assert_eq!(requirement.name, "flask");
//! assert_eq!(requirement.extras, Some(vec!["async".to_string()]));
//! ```

pub mod config;
pub mod error;
mod extract;
pub mod grammar;
pub mod location;
pub mod parser;
pub mod types;

pub use config::ParseOptions;
pub use error::{ParseTarget, RequirementsSyntaxError, Result};
pub use location::{Decoration, Located, Plain, SourceLocation, WithLocation};
pub use parser::{
    LooseParsedFile, LooseParsedLine, Parsed, ParsedFile, ParsedLine, RequirementsParser,
};
pub use types::{
    ConstraintsFileRequirement, EnvironmentMarker, EnvironmentMarkerLeaf, EnvironmentMarkerNode,
    EnvironmentMarkerVariable, LooseProjectNameRequirement, LooseVersionSpec, MarkerConnective,
    MarkerOperator, MarkerValue, ProjectNameRequirement, ProjectUrlRequirement, Requirement,
    RequirementsFileRequirement, VersionOperator, VersionSpec,
};

/// Parse a requirements file, skipping blank and comment-only lines.
pub fn parse_requirements_file(text: &str) -> Result<Vec<Requirement>> {
    RequirementsParser::default().file::<Plain>(text)
}

/// [`parse_requirements_file`] with every node wrapped in its location.
pub fn parse_requirements_file_with_locations(text: &str) -> Result<Vec<Requirement<Located>>> {
    RequirementsParser::default().file::<Located>(text)
}

/// Parse a single requirement line.
///
/// Returns `Ok(None)` for a blank or comment-only line.
pub fn parse_requirements_line(text: &str) -> Result<Option<Requirement>> {
    RequirementsParser::default().line::<Plain>(text)
}

/// [`parse_requirements_line`] with every node wrapped in its location.
pub fn parse_requirements_line_with_locations(
    text: &str,
) -> Result<Option<Requirement<Located>>> {
    RequirementsParser::default().line::<Located>(text)
}

/// Recover the name requirements of a possibly incomplete file.
///
/// URL and `-r`/`-c` lines are skipped, as is anything that does not start
/// with a project name.
pub fn parse_requirements_file_loosely(text: &str) -> Vec<LooseProjectNameRequirement> {
    RequirementsParser::default().file_loosely::<Plain>(text)
}

/// [`parse_requirements_file_loosely`] with every node wrapped in its location.
pub fn parse_requirements_file_loosely_with_locations(
    text: &str,
) -> Vec<WithLocation<LooseProjectNameRequirement<Located>>> {
    RequirementsParser::default().file_loosely::<Located>(text)
}

/// Recover the name requirement of a possibly incomplete line.
pub fn parse_requirements_line_loosely(text: &str) -> Option<LooseProjectNameRequirement> {
    RequirementsParser::default().line_loosely::<Plain>(text)
}

/// [`parse_requirements_line_loosely`] with every node wrapped in its location.
pub fn parse_requirements_line_loosely_with_locations(
    text: &str,
) -> Option<WithLocation<LooseProjectNameRequirement<Located>>> {
    RequirementsParser::default().line_loosely::<Located>(text)
}
