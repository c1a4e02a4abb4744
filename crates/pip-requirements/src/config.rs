use crate::grammar::{DEFAULT_MAX_MARKER_CLAUSES, DEFAULT_MAX_MARKER_DEPTH, MarkerLimits};
use serde::Deserialize;

/// Options for [`RequirementsParser`](crate::RequirementsParser).
///
/// Usually supplied by an editor as part of its settings, so every field
/// has a default and unknown fields are ignored.
///
/// # Defaults
///
/// - `include_locations`: `false`
/// - `max_marker_depth`: `64`
/// - `max_marker_clauses`: `256`
///
/// # Examples
///
/// ```
/// use pip_requirements::ParseOptions;
///
/// let json = r#"{ "include_locations": true }"#;
/// let options: ParseOptions = serde_json::from_str(json).unwrap();
///
/// assert!(options.include_locations);
/// assert_eq!(options.max_marker_depth, 64);
/// assert_eq!(options.max_marker_clauses, 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ParseOptions {
    /// Decorate every node with the span it was parsed from
    #[serde(default, alias = "includeLocations")]
    pub include_locations: bool,
    /// How many parentheses an environment marker may nest before the
    /// strict parsers reject it
    #[serde(default = "default_max_marker_depth", alias = "maxMarkerDepth")]
    pub max_marker_depth: usize,
    /// How many comparisons one environment marker may join with
    /// `and`/`or` before the strict parsers reject it
    #[serde(default = "default_max_marker_clauses", alias = "maxMarkerClauses")]
    pub max_marker_clauses: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            include_locations: false,
            max_marker_depth: default_max_marker_depth(),
            max_marker_clauses: default_max_marker_clauses(),
        }
    }
}

impl ParseOptions {
    /// Defaults with locations switched on.
    pub fn with_locations() -> Self {
        Self {
            include_locations: true,
            ..Self::default()
        }
    }

    pub fn marker_limits(&self) -> MarkerLimits {
        MarkerLimits {
            max_depth: self.max_marker_depth,
            max_clauses: self.max_marker_clauses,
        }
    }

    /// Read options from editor settings, keeping the defaults when the
    /// settings are absent or malformed.
    pub fn from_settings(settings: Option<serde_json::Value>) -> Self {
        if let Some(settings) = settings
            && let Ok(options) = serde_json::from_value::<Self>(settings)
        {
            tracing::debug!("loaded parse options: {:?}", options);
            return options;
        }
        Self::default()
    }
}

const fn default_max_marker_depth() -> usize {
    DEFAULT_MAX_MARKER_DEPTH
}

const fn default_max_marker_clauses() -> usize {
    DEFAULT_MAX_MARKER_CLAUSES
}
