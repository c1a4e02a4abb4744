//! Syntax tree produced by the parsers.
//!
//! Every type that can carry locations is generic over a [`Decoration`]
//! defaulting to [`Plain`], so `Requirement` is the plain tree and
//! `Requirement<Located>` the decorated one. Both serialize to the same JSON
//! shape apart from the `{data, location}` wrappers.

use crate::location::{Decoration, Located, Plain, SourceLocation};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One parsed line of a requirements file.
///
/// # Examples
///
/// ```
/// use pip_requirements::{Requirement, parse_requirements_line};
///
/// let requirement = parse_requirements_line("pip @ https://x.com/y.zip").unwrap();
/// assert!(matches!(requirement, Some(Requirement::ProjectUrl(_))));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Requirement<D: Decoration = Plain> {
    /// `pip == 22.0.2`
    ProjectName(D::Wrap<ProjectNameRequirement<D>>),
    /// `pip @ https://github.com/pypa/pip/archive/22.0.2.zip`
    ProjectUrl(D::Wrap<ProjectUrlRequirement<D>>),
    /// `-r other-requirements.txt`
    RequirementsFile(D::Wrap<RequirementsFileRequirement>),
    /// `-c constraints.txt`
    ConstraintsFile(D::Wrap<ConstraintsFileRequirement>),
}

impl<D: Decoration> Requirement<D> {
    /// Project name, for the name- and URL-based variants.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::ProjectName(req) => {
                let req = D::peek::<ProjectNameRequirement<D>>(req);
                Some(D::peek::<String>(&req.name).as_str())
            }
            Self::ProjectUrl(req) => {
                let req = D::peek::<ProjectUrlRequirement<D>>(req);
                Some(D::peek::<String>(&req.name).as_str())
            }
            Self::RequirementsFile(_) | Self::ConstraintsFile(_) => None,
        }
    }

    /// Discard every location, yielding the plain tree.
    pub fn into_plain(self) -> Requirement {
        match self {
            Self::ProjectName(req) => Requirement::ProjectName(
                D::strip::<ProjectNameRequirement<D>>(req).into_plain(),
            ),
            Self::ProjectUrl(req) => {
                Requirement::ProjectUrl(D::strip::<ProjectUrlRequirement<D>>(req).into_plain())
            }
            Self::RequirementsFile(req) => {
                Requirement::RequirementsFile(D::strip::<RequirementsFileRequirement>(req))
            }
            Self::ConstraintsFile(req) => {
                Requirement::ConstraintsFile(D::strip::<ConstraintsFileRequirement>(req))
            }
        }
    }
}

impl Requirement<Located> {
    /// Span of the whole requirement.
    pub fn location(&self) -> SourceLocation {
        match self {
            Self::ProjectName(req) => req.location,
            Self::ProjectUrl(req) => req.location,
            Self::RequirementsFile(req) => req.location,
            Self::ConstraintsFile(req) => req.location,
        }
    }
}

/// Requirement on a project by name, optionally constrained by version.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ProjectName", rename_all = "camelCase")]
pub struct ProjectNameRequirement<D: Decoration = Plain> {
    pub name: D::Wrap<String>,
    /// `None` when no version clause was written; `Some(vec![])` for `pip()`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_spec: Option<Vec<D::Wrap<VersionSpec<D>>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Vec<D::Wrap<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_marker_tree: Option<D::Wrap<EnvironmentMarker>>,
}

impl<D: Decoration> ProjectNameRequirement<D> {
    /// Discard every location, yielding the plain requirement.
    pub fn into_plain(self) -> ProjectNameRequirement {
        ProjectNameRequirement {
            name: D::strip::<String>(self.name),
            version_spec: self.version_spec.map(|specs| {
                specs
                    .into_iter()
                    .map(|spec| D::strip::<VersionSpec<D>>(spec).into_plain())
                    .collect()
            }),
            extras: self.extras.map(strip_all::<D>),
            environment_marker_tree: self
                .environment_marker_tree
                .map(D::strip::<EnvironmentMarker>),
        }
    }
}

/// Requirement on a project fetched from a URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ProjectURL", rename_all = "camelCase")]
pub struct ProjectUrlRequirement<D: Decoration = Plain> {
    pub name: D::Wrap<String>,
    pub url: D::Wrap<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Vec<D::Wrap<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_marker_tree: Option<D::Wrap<EnvironmentMarker>>,
}

impl<D: Decoration> ProjectUrlRequirement<D> {
    /// Discard every location, yielding the plain requirement.
    pub fn into_plain(self) -> ProjectUrlRequirement {
        ProjectUrlRequirement {
            name: D::strip::<String>(self.name),
            url: D::strip::<String>(self.url),
            extras: self.extras.map(strip_all::<D>),
            environment_marker_tree: self
                .environment_marker_tree
                .map(D::strip::<EnvironmentMarker>),
        }
    }
}

/// `-r {path}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "RequirementsFile")]
pub struct RequirementsFileRequirement {
    pub path: String,
}

/// `-c {path}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "ConstraintsFile")]
pub struct ConstraintsFileRequirement {
    pub path: String,
}

/// A single `{operator}{version}` clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionSpec<D: Decoration = Plain> {
    pub operator: D::Wrap<VersionOperator>,
    /// Kept verbatim; no PEP 440 validation happens here
    pub version: D::Wrap<String>,
}

impl<D: Decoration> VersionSpec<D> {
    /// Discard every location, yielding the plain clause.
    pub fn into_plain(self) -> VersionSpec {
        VersionSpec {
            operator: D::strip::<VersionOperator>(self.operator),
            version: D::strip::<String>(self.version),
        }
    }
}

/// PEP 440 comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VersionOperator {
    /// `~=`
    #[serde(rename = "~=")]
    CompatibleRelease,
    /// `==`
    #[serde(rename = "==")]
    VersionMatching,
    /// `!=`
    #[serde(rename = "!=")]
    VersionExclusion,
    /// `<=`
    #[serde(rename = "<=")]
    LessThanOrMatching,
    /// `>=`
    #[serde(rename = ">=")]
    GreaterThanOrMatching,
    /// `<`
    #[serde(rename = "<")]
    LessThan,
    /// `>`
    #[serde(rename = ">")]
    GreaterThan,
    /// `===`
    #[serde(rename = "===")]
    ArbitrarilyEqual,
}

impl VersionOperator {
    /// All operators, longest spelling first, in the order the grammar tries them.
    pub const ALL: [Self; 8] = [
        Self::ArbitrarilyEqual,
        Self::CompatibleRelease,
        Self::VersionMatching,
        Self::VersionExclusion,
        Self::LessThanOrMatching,
        Self::GreaterThanOrMatching,
        Self::LessThan,
        Self::GreaterThan,
    ];

    /// The operator as written in requirement text.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompatibleRelease => "~=",
            Self::VersionMatching => "==",
            Self::VersionExclusion => "!=",
            Self::LessThanOrMatching => "<=",
            Self::GreaterThanOrMatching => ">=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::ArbitrarilyEqual => "===",
        }
    }
}

impl fmt::Display for VersionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown version operator '{}'", s))
    }
}

/// Boolean expression gating when a requirement applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnvironmentMarker {
    Node(EnvironmentMarkerNode),
    Leaf(EnvironmentMarkerLeaf),
}

impl EnvironmentMarker {
    /// Number of comparison leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Node(node) => node.left.leaf_count() + node.right.leaf_count(),
            Self::Leaf(_) => 1,
        }
    }
}

/// `left and right` / `left or right`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentMarkerNode {
    pub operator: MarkerConnective,
    pub left: Box<EnvironmentMarker>,
    pub right: Box<EnvironmentMarker>,
}

/// Boolean connective of an inner marker node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerConnective {
    And,
    Or,
}

/// A single comparison such as `python_version >= "3.8"`.
///
/// Both sides hold the raw source text, quotes included for strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentMarkerLeaf {
    pub left: String,
    pub operator: MarkerOperator,
    pub right: String,
}

impl EnvironmentMarkerLeaf {
    /// Interpretation of the left operand.
    pub fn left_value(&self) -> MarkerValue<'_> {
        MarkerValue::classify(&self.left)
    }

    /// Interpretation of the right operand.
    pub fn right_value(&self) -> MarkerValue<'_> {
        MarkerValue::classify(&self.right)
    }
}

/// Comparison operator of a marker leaf.
///
/// The spelling is normalized: `not   in` in the source becomes
/// [`MarkerOperator::NotIn`], which prints as `"not in"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerOperator {
    Version(VersionOperator),
    In,
    NotIn,
}

impl MarkerOperator {
    /// Canonical spelling of the operator.
    ///
    /// `not in` is always rendered with a single space, however many blanks
    /// separated the two words in the source.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Version(op) => op.as_str(),
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }
}

impl fmt::Display for MarkerOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MarkerOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// What a marker operand refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerValue<'a> {
    /// One of the variables defined by PEP 508
    Variable(EnvironmentMarkerVariable),
    /// A bare identifier PEP 508 does not define
    UnknownVariable(&'a str),
    /// Contents of a quoted string, quotes removed
    String(&'a str),
}

impl<'a> MarkerValue<'a> {
    /// Classify the raw text of an operand.
    pub fn classify(raw: &'a str) -> Self {
        for quote in ['"', '\''] {
            if let Some(inner) = raw
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
            {
                return Self::String(inner);
            }
        }
        raw.parse()
            .map_or(Self::UnknownVariable(raw), Self::Variable)
    }
}

/// Environment marker variables.
///
/// See <https://peps.python.org/pep-0508/#environment-markers>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMarkerVariable {
    /// `'.'.join(platform.python_version_tuple()[:2])`, e.g. `3.11`
    PythonVersion,
    /// `platform.python_version()`, e.g. `3.11.2`
    PythonFullVersion,
    /// `os.name`, e.g. `posix`
    OsName,
    /// `sys.platform`, e.g. `linux`
    SysPlatform,
    /// `platform.release()`
    PlatformRelease,
    /// `platform.system()`, e.g. `Windows`
    PlatformSystem,
    /// `platform.version()`
    PlatformVersion,
    /// `platform.machine()`, e.g. `x86_64`
    PlatformMachine,
    /// `platform.python_implementation()`, e.g. `CPython`
    PlatformPythonImplementation,
    /// `sys.implementation.name`, e.g. `cpython`
    ImplementationName,
    /// processed `sys.implementation.version`
    ImplementationVersion,
    /// Only meaningful when the interpreting context defines it
    Extra,
}

impl EnvironmentMarkerVariable {
    pub const ALL: [Self; 12] = [
        Self::PythonVersion,
        Self::PythonFullVersion,
        Self::OsName,
        Self::SysPlatform,
        Self::PlatformRelease,
        Self::PlatformSystem,
        Self::PlatformVersion,
        Self::PlatformMachine,
        Self::PlatformPythonImplementation,
        Self::ImplementationName,
        Self::ImplementationVersion,
        Self::Extra,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PythonVersion => "python_version",
            Self::PythonFullVersion => "python_full_version",
            Self::OsName => "os_name",
            Self::SysPlatform => "sys_platform",
            Self::PlatformRelease => "platform_release",
            Self::PlatformSystem => "platform_system",
            Self::PlatformVersion => "platform_version",
            Self::PlatformMachine => "platform_machine",
            Self::PlatformPythonImplementation => "platform_python_implementation",
            Self::ImplementationName => "implementation_name",
            Self::ImplementationVersion => "implementation_version",
            Self::Extra => "extra",
        }
    }
}

impl fmt::Display for EnvironmentMarkerVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentMarkerVariable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|var| var.as_str() == s)
            .ok_or_else(|| format!("unknown environment marker variable '{}'", s))
    }
}

/// Name requirement as recovered from text that may still be being typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ProjectName", rename_all = "camelCase")]
pub struct LooseProjectNameRequirement<D: Decoration = Plain> {
    pub name: D::Wrap<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_spec: Option<Vec<D::Wrap<LooseVersionSpec<D>>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Vec<D::Wrap<String>>>,
}

impl<D: Decoration> LooseProjectNameRequirement<D> {
    /// Discard every location, yielding the plain requirement.
    pub fn into_plain(self) -> LooseProjectNameRequirement {
        LooseProjectNameRequirement {
            name: D::strip::<String>(self.name),
            version_spec: self.version_spec.map(|specs| {
                specs
                    .into_iter()
                    .map(|spec| D::strip::<LooseVersionSpec<D>>(spec).into_plain())
                    .collect()
            }),
            extras: self.extras.map(strip_all::<D>),
        }
    }
}

/// Version clause of a loose requirement.
///
/// `operator` is whatever run of operator characters was typed (`=`, `=<`,
/// `>>>` are all kept); `version` is `None` until something follows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LooseVersionSpec<D: Decoration = Plain> {
    pub operator: D::Wrap<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<D::Wrap<String>>,
}

impl<D: Decoration> LooseVersionSpec<D> {
    /// Discard every location, yielding the plain clause.
    pub fn into_plain(self) -> LooseVersionSpec {
        LooseVersionSpec {
            operator: D::strip::<String>(self.operator),
            version: self.version.map(D::strip::<String>),
        }
    }
}

fn strip_all<D: Decoration>(items: Vec<D::Wrap<String>>) -> Vec<String> {
    items.into_iter().map(D::strip::<String>).collect()
}
