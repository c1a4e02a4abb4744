//! Parse trees produced by the grammar engine.
//!
//! One type per grammar rule. Nodes borrow their text from the input and
//! record the span the rule matched; whitespace skipped before the first
//! token or after the last one is never part of a span.

use crate::location::SourceLocation;
use crate::types::{MarkerOperator, VersionOperator};

/// A single token: its text and where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'i> {
    pub text: &'i str,
    pub span: SourceLocation,
}

/// `Line = Req? Comment?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'i> {
    pub req: Option<Req<'i>>,
    pub comment: Option<Lexeme<'i>>,
}

/// `Req = UrlReq | NameReq | RequirementsReq | ConstraintsReq`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Req<'i> {
    Url(UrlReq<'i>),
    Name(NameReq<'i>),
    RequirementsFile(FileReq<'i>),
    ConstraintsFile(FileReq<'i>),
}

/// `NameReq = Identifier Extras? VersionSpec QuotedMarker?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameReq<'i> {
    pub span: SourceLocation,
    pub name: Lexeme<'i>,
    pub extras: Option<Extras<'i>>,
    pub version_spec: VersionSpecTree<'i>,
    pub marker: Option<QuotedMarker<'i>>,
}

/// `UrlReq = Identifier Extras? '@' UrlSpec QuotedMarker?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlReq<'i> {
    pub span: SourceLocation,
    pub name: Lexeme<'i>,
    pub extras: Option<Extras<'i>>,
    pub url: Lexeme<'i>,
    pub marker: Option<QuotedMarker<'i>>,
}

/// `-r path` or `-c path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReq<'i> {
    pub span: SourceLocation,
    pub path: Lexeme<'i>,
}

/// `'[' (Identifier (',' Identifier)*)? ']'`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extras<'i> {
    pub span: SourceLocation,
    pub names: Vec<Lexeme<'i>>,
}

/// `VersionSpec = '(' VersionMany ')' | VersionMany`
///
/// An empty parenthesized list is a present but empty clause; an empty bare
/// list means no clause was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpecTree<'i> {
    Parenthesized(Vec<VersionOne<'i>>),
    Bare(Vec<VersionOne<'i>>),
}

/// `VersionOne = Operator Version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionOne<'i> {
    pub span: SourceLocation,
    pub operator: OperatorToken,
    pub version: Lexeme<'i>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorToken {
    pub operator: VersionOperator,
    pub span: SourceLocation,
}

/// `QuotedMarker = ';' MarkerExpr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedMarker<'i> {
    /// Includes the `;`
    pub span: SourceLocation,
    pub expr: Marker<'i>,
}

/// Marker expression, one variant per marker rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker<'i> {
    Or {
        span: SourceLocation,
        left: Box<Marker<'i>>,
        right: Box<Marker<'i>>,
    },
    And {
        span: SourceLocation,
        left: Box<Marker<'i>>,
        right: Box<Marker<'i>>,
    },
    /// `'(' MarkerExpr ')'`
    Group {
        span: SourceLocation,
        inner: Box<Marker<'i>>,
    },
    Leaf(MarkerLeaf<'i>),
}

impl Marker<'_> {
    pub const fn span(&self) -> SourceLocation {
        match self {
            Self::Or { span, .. } | Self::And { span, .. } | Self::Group { span, .. } => *span,
            Self::Leaf(leaf) => leaf.span,
        }
    }
}

/// `MarkerLeaf = Operand MarkerOperator Operand`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerLeaf<'i> {
    pub span: SourceLocation,
    pub left: Lexeme<'i>,
    pub operator: MarkerOperator,
    pub right: Lexeme<'i>,
}

/// `LooseLine = LooseReq? LooseRest`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooseLine<'i> {
    pub req: Option<LooseReq<'i>>,
    /// Whatever followed the requirement on this line, comments included
    pub rest: Lexeme<'i>,
}

/// `LooseReq = LooseNonNameReq | LooseNameReq`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LooseReq<'i> {
    /// A `-r`/`-c`/URL line, recognized but not interpreted
    NonName(Lexeme<'i>),
    Name(LooseNameReq<'i>),
}

/// `LooseNameReq = Identifier LooseExtras? LooseVersionSpec LooseMarker?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooseNameReq<'i> {
    pub span: SourceLocation,
    pub name: Lexeme<'i>,
    pub extras: Option<LooseExtras<'i>>,
    pub version_spec: LooseVersionSpecTree<'i>,
    /// The marker clause from `;` on, consumed but never interpreted
    pub marker: Option<Lexeme<'i>>,
}

/// `'[' (Identifier (',' Identifier)*)? ','* ']'?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooseExtras<'i> {
    pub span: SourceLocation,
    pub names: Vec<Lexeme<'i>>,
    pub closed: bool,
}

/// `'(' LooseVersionMany ')'? | LooseVersionMany`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LooseVersionSpecTree<'i> {
    Parenthesized {
        entries: Vec<LooseVersionOne<'i>>,
        closed: bool,
    },
    Bare(Vec<LooseVersionOne<'i>>),
}

/// `LooseOperator Version?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooseVersionOne<'i> {
    pub span: SourceLocation,
    pub operator: Lexeme<'i>,
    pub version: Option<Lexeme<'i>>,
}
