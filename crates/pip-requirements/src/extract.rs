//! Reduction of parse trees to requirement values.
//!
//! Each function walks one kind of tree node and is generic over the
//! [`Decoration`], so the plain and the located outputs are produced by the
//! same code. Spans are taken from the tree as matched.

use crate::grammar::tree::{
    Extras, Lexeme, Line, LooseLine, LooseNameReq, LooseReq, LooseVersionOne,
    LooseVersionSpecTree, Marker, NameReq, Req, UrlReq, VersionOne, VersionSpecTree,
};
use crate::location::Decoration;
use crate::types::{
    ConstraintsFileRequirement, EnvironmentMarker, EnvironmentMarkerLeaf, EnvironmentMarkerNode,
    LooseProjectNameRequirement, LooseVersionSpec, MarkerConnective, ProjectNameRequirement,
    ProjectUrlRequirement, Requirement, RequirementsFileRequirement, VersionSpec,
};

/// Requirements of every line that has one, in order.
pub(crate) fn requirements<D: Decoration>(lines: &[Line<'_>]) -> Vec<Requirement<D>> {
    lines.iter().filter_map(line::<D>).collect()
}

/// `None` for blank and comment-only lines.
pub(crate) fn line<D: Decoration>(line: &Line<'_>) -> Option<Requirement<D>> {
    line.req.as_ref().map(requirement::<D>)
}

fn requirement<D: Decoration>(req: &Req<'_>) -> Requirement<D> {
    match req {
        Req::Name(req) => Requirement::ProjectName(D::wrap(name_requirement::<D>(req), req.span)),
        Req::Url(req) => Requirement::ProjectUrl(D::wrap(url_requirement::<D>(req), req.span)),
        Req::RequirementsFile(req) => Requirement::RequirementsFile(D::wrap(
            RequirementsFileRequirement {
                path: req.path.text.to_string(),
            },
            req.span,
        )),
        Req::ConstraintsFile(req) => Requirement::ConstraintsFile(D::wrap(
            ConstraintsFileRequirement {
                path: req.path.text.to_string(),
            },
            req.span,
        )),
    }
}

fn name_requirement<D: Decoration>(req: &NameReq<'_>) -> ProjectNameRequirement<D> {
    let version_spec = match &req.version_spec {
        VersionSpecTree::Parenthesized(entries) => Some(entries),
        VersionSpecTree::Bare(entries) if entries.is_empty() => None,
        VersionSpecTree::Bare(entries) => Some(entries),
    };
    ProjectNameRequirement {
        name: text::<D>(&req.name),
        version_spec: version_spec.map(|entries| entries.iter().map(version_one::<D>).collect()),
        extras: req.extras.as_ref().map(extras::<D>),
        environment_marker_tree: req
            .marker
            .as_ref()
            .map(|marker| D::wrap(environment_marker(&marker.expr), marker.expr.span())),
    }
}

fn url_requirement<D: Decoration>(req: &UrlReq<'_>) -> ProjectUrlRequirement<D> {
    ProjectUrlRequirement {
        name: text::<D>(&req.name),
        url: text::<D>(&req.url),
        extras: req.extras.as_ref().map(extras::<D>),
        environment_marker_tree: req
            .marker
            .as_ref()
            .map(|marker| D::wrap(environment_marker(&marker.expr), marker.expr.span())),
    }
}

fn extras<D: Decoration>(extras: &Extras<'_>) -> Vec<D::Wrap<String>> {
    extras.names.iter().map(text::<D>).collect()
}

fn version_one<D: Decoration>(entry: &VersionOne<'_>) -> D::Wrap<VersionSpec<D>> {
    let spec = VersionSpec::<D> {
        operator: D::wrap(entry.operator.operator, entry.operator.span),
        version: text::<D>(&entry.version),
    };
    D::wrap(spec, entry.span)
}

/// Markers are not decorated below the root; groups only affect the shape.
fn environment_marker(marker: &Marker<'_>) -> EnvironmentMarker {
    match marker {
        Marker::Or { left, right, .. } => node(MarkerConnective::Or, left, right),
        Marker::And { left, right, .. } => node(MarkerConnective::And, left, right),
        Marker::Group { inner, .. } => environment_marker(inner),
        Marker::Leaf(leaf) => EnvironmentMarker::Leaf(EnvironmentMarkerLeaf {
            left: leaf.left.text.to_string(),
            operator: leaf.operator,
            right: leaf.right.text.to_string(),
        }),
    }
}

fn node(operator: MarkerConnective, left: &Marker<'_>, right: &Marker<'_>) -> EnvironmentMarker {
    EnvironmentMarker::Node(EnvironmentMarkerNode {
        operator,
        left: Box::new(environment_marker(left)),
        right: Box::new(environment_marker(right)),
    })
}

fn text<D: Decoration>(lexeme: &Lexeme<'_>) -> D::Wrap<String> {
    D::wrap(lexeme.text.to_string(), lexeme.span)
}

/// Name requirements of every loose line, in order.
pub(crate) fn loose_requirements<D: Decoration>(
    lines: &[LooseLine<'_>],
) -> Vec<D::Wrap<LooseProjectNameRequirement<D>>> {
    lines.iter().filter_map(loose_line::<D>).collect()
}

/// `None` unless the line starts with a name requirement.
pub(crate) fn loose_line<D: Decoration>(
    line: &LooseLine<'_>,
) -> Option<D::Wrap<LooseProjectNameRequirement<D>>> {
    match line.req.as_ref()? {
        LooseReq::Name(req) => Some(D::wrap(loose_name_requirement::<D>(req), req.span)),
        LooseReq::NonName(skipped) => {
            tracing::trace!(location = %skipped.span, "Skipping non-name requirement");
            None
        }
    }
}

fn loose_name_requirement<D: Decoration>(req: &LooseNameReq<'_>) -> LooseProjectNameRequirement<D> {
    let version_spec = match &req.version_spec {
        LooseVersionSpecTree::Parenthesized { entries, .. } => Some(entries),
        LooseVersionSpecTree::Bare(entries) if entries.is_empty() => None,
        LooseVersionSpecTree::Bare(entries) => Some(entries),
    };
    LooseProjectNameRequirement {
        name: text::<D>(&req.name),
        version_spec: version_spec
            .map(|entries| entries.iter().map(loose_version_one::<D>).collect()),
        extras: req
            .extras
            .as_ref()
            .map(|extras| extras.names.iter().map(text::<D>).collect()),
    }
}

fn loose_version_one<D: Decoration>(entry: &LooseVersionOne<'_>) -> D::Wrap<LooseVersionSpec<D>> {
    let spec = LooseVersionSpec::<D> {
        operator: text::<D>(&entry.operator),
        version: entry.version.as_ref().map(text::<D>),
    };
    D::wrap(spec, entry.span)
}
