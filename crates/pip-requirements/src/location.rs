//! Source locations and the decoration layer.
//!
//! Every reducer in [`crate::extract`] is generic over a [`Decoration`]. The
//! decoration decides what a node looks like once it has been produced:
//! [`Plain`] hands the data back untouched, [`Located`] wraps it in a
//! [`WithLocation`] carrying the byte span the grammar matched for it.
//! Because both shapes come out of the same traversal, stripping the
//! locations from a decorated tree always yields the plain tree.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Half-open byte span `[start_idx, end_idx)` into the parsed input.
///
/// # Examples
///
/// ```
/// use pip_requirements::SourceLocation;
///
/// let location = SourceLocation::new(4, 13);
/// assert_eq!(location.len(), 9);
/// assert_eq!(&"pip == 22.0.2"[location.range()], "== 22.0.2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    /// Byte offset of the first matched byte
    pub start_idx: usize,
    /// Byte offset one past the last matched byte
    pub end_idx: usize,
}

impl SourceLocation {
    /// Create a location from its bounds.
    pub const fn new(start_idx: usize, end_idx: usize) -> Self {
        Self { start_idx, end_idx }
    }

    /// Number of bytes covered.
    pub const fn len(&self) -> usize {
        self.end_idx - self.start_idx
    }

    /// Whether the span covers no input.
    pub const fn is_empty(&self) -> bool {
        self.start_idx == self.end_idx
    }

    /// The span as a range usable for slicing the input.
    pub const fn range(&self) -> Range<usize> {
        self.start_idx..self.end_idx
    }
}

impl From<Range<usize>> for SourceLocation {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start_idx, self.end_idx)
    }
}

/// A node together with the span it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithLocation<T> {
    /// The decorated node
    pub data: T,
    /// Where the node was found in the input
    pub location: SourceLocation,
}

impl<T> WithLocation<T> {
    /// Wrap `data` with `location`.
    pub const fn new(data: T, location: SourceLocation) -> Self {
        Self { data, location }
    }

    /// Drop the location and keep the node.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Transform the wrapped node, keeping the location.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WithLocation<U> {
        WithLocation {
            data: f(self.data),
            location: self.location,
        }
    }
}

/// Bounds shared by every value stored in the syntax tree.
pub trait Node: fmt::Debug + Clone + PartialEq + Serialize + Send + Sync + 'static {}

impl<T> Node for T where T: fmt::Debug + Clone + PartialEq + Serialize + Send + Sync + 'static {}

/// How reducers package the nodes they emit.
///
/// Implemented by [`Plain`] and [`Located`]; the tree types in
/// [`crate::types`] are parameterized over it so the plain and the decorated
/// trees share one definition.
pub trait Decoration: Node + Default {
    /// A node of type `T` as emitted under this decoration.
    type Wrap<T: Node>: Node;

    /// Package `data` that was matched at `location`.
    fn wrap<T: Node>(data: T, location: SourceLocation) -> Self::Wrap<T>;

    /// Recover the node, discarding any location.
    fn strip<T: Node>(wrapped: Self::Wrap<T>) -> T;

    /// Borrow the node inside a wrapper.
    fn peek<T: Node>(wrapped: &Self::Wrap<T>) -> &T;
}

/// Nodes are emitted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Plain;

impl Decoration for Plain {
    type Wrap<T: Node> = T;

    fn wrap<T: Node>(data: T, _location: SourceLocation) -> Self::Wrap<T> {
        data
    }

    fn strip<T: Node>(wrapped: Self::Wrap<T>) -> T {
        wrapped
    }

    fn peek<T: Node>(wrapped: &Self::Wrap<T>) -> &T {
        wrapped
    }
}

/// Nodes are emitted as [`WithLocation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Located;

impl Decoration for Located {
    type Wrap<T: Node> = WithLocation<T>;

    fn wrap<T: Node>(data: T, location: SourceLocation) -> Self::Wrap<T> {
        WithLocation::new(data, location)
    }

    fn strip<T: Node>(wrapped: Self::Wrap<T>) -> T {
        wrapped.data
    }

    fn peek<T: Node>(wrapped: &Self::Wrap<T>) -> &T {
        &wrapped.data
    }
}
