//! Rules of the strict grammar.

use super::tree::{
    Extras, FileReq, Lexeme, Line, Marker, MarkerLeaf, NameReq, OperatorToken, QuotedMarker, Req,
    UrlReq, VersionOne, VersionSpecTree,
};
use super::{Expected, MarkerRule, Parser, is_blank, is_space};
use crate::location::SourceLocation;
use crate::types::{MarkerOperator, VersionOperator};

impl<'i> Parser<'i> {
    /// `Line ('\n' Line)* end`
    pub(super) fn file(&mut self) -> Option<Vec<Line<'i>>> {
        let mut lines = vec![self.line()];
        lines.extend(self.repeat(|p| {
            p.newline()?;
            Some(p.line())
        }));
        self.end_of_input()?;
        Some(lines)
    }

    /// `Line end`
    pub(super) fn strict_line(&mut self) -> Option<Line<'i>> {
        let line = self.line();
        self.end_of_input()?;
        Some(line)
    }

    fn line(&mut self) -> Line<'i> {
        let req = self.optional(Self::req);
        let comment = self.optional(Self::comment);
        Line { req, comment }
    }

    fn comment(&mut self) -> Option<Lexeme<'i>> {
        let hash = self.literal("#")?;
        let text = self.rest_of_line();
        Some(Lexeme {
            text: &self.input[hash.span.start_idx..text.span.end_idx],
            span: SourceLocation::new(hash.span.start_idx, text.span.end_idx),
        })
    }

    fn req(&mut self) -> Option<Req<'i>> {
        if let Some(req) = self.attempt(Self::url_req) {
            return Some(Req::Url(req));
        }
        if let Some(req) = self.attempt(Self::name_req) {
            return Some(Req::Name(req));
        }
        if let Some(req) = self.attempt(|p| p.file_req("-r")) {
            return Some(Req::RequirementsFile(req));
        }
        self.attempt(|p| p.file_req("-c")).map(Req::ConstraintsFile)
    }

    /// `flag ws+ FilePath`
    fn file_req(&mut self, flag: &'static str) -> Option<FileReq<'i>> {
        let start = self.token_start();
        self.literal(flag)?;
        if !self.rest().starts_with(is_blank) {
            self.expect_at(self.cursor.pos, Expected::Named("whitespace"));
            return None;
        }
        let path = self.run_of(|c| !is_space(c), "file path")?;
        Some(FileReq {
            span: self.span_from(start),
            path,
        })
    }

    fn name_req(&mut self) -> Option<NameReq<'i>> {
        let start = self.token_start();
        let name = self.identifier()?;
        let extras = self.optional(Self::extras);
        let version_spec = self.version_spec();
        let marker = self.optional(Self::quoted_marker);
        Some(NameReq {
            span: self.span_from(start),
            name,
            extras,
            version_spec,
            marker,
        })
    }

    fn url_req(&mut self) -> Option<UrlReq<'i>> {
        let start = self.token_start();
        let name = self.identifier()?;
        let extras = self.optional(Self::extras);
        self.literal("@")?;
        let url = self.run_of(|c| !is_space(c), "URL")?;
        let marker = self.optional(Self::quoted_marker);
        Some(UrlReq {
            span: self.span_from(start),
            name,
            extras,
            url,
            marker,
        })
    }

    fn extras(&mut self) -> Option<Extras<'i>> {
        let start = self.token_start();
        self.literal("[")?;
        let names = self.list_of(Self::identifier, ",");
        self.literal("]")?;
        Some(Extras {
            span: self.span_from(start),
            names,
        })
    }

    /// Never fails: no clause at all is an empty bare list.
    fn version_spec(&mut self) -> VersionSpecTree<'i> {
        let parenthesized = self.attempt(|p| {
            p.literal("(")?;
            let entries = p.version_many();
            p.literal(")")?;
            Some(entries)
        });
        match parenthesized {
            Some(entries) => VersionSpecTree::Parenthesized(entries),
            None => VersionSpecTree::Bare(self.version_many()),
        }
    }

    fn version_many(&mut self) -> Vec<VersionOne<'i>> {
        self.list_of(Self::version_one, ",")
    }

    fn version_one(&mut self) -> Option<VersionOne<'i>> {
        let start = self.token_start();
        let operator = self.version_operator()?;
        let version = self.version()?;
        Some(VersionOne {
            span: self.span_from(start),
            operator,
            version,
        })
    }

    fn version_operator(&mut self) -> Option<OperatorToken> {
        let start = self.token_start();
        let found = VersionOperator::ALL
            .into_iter()
            .find(|op| self.input[start..].starts_with(op.as_str()));
        let Some(operator) = found else {
            self.expect_at(start, Expected::Named("version operator"));
            return None;
        };
        self.cursor.pos = start;
        let token = self.take(operator.as_str().len());
        Some(OperatorToken {
            operator,
            span: token.span,
        })
    }

    fn quoted_marker(&mut self) -> Option<QuotedMarker<'i>> {
        let start = self.token_start();
        self.literal(";")?;
        self.marker_clauses = 0;
        let expr = self.marker_or()?;
        Some(QuotedMarker {
            span: self.span_from(start),
            expr,
        })
    }

    /// `MarkerAnd ('or' MarkerAnd)*`, folded to the left.
    fn marker_or(&mut self) -> Option<Marker<'i>> {
        self.memoized(MarkerRule::Or, |p| {
            let start = p.token_start();
            let first = p.marker_and()?;
            let rest = p.repeat(|p| {
                p.keyword("or")?;
                p.marker_and()
            });
            Some(rest.into_iter().fold(first, |left, right| Marker::Or {
                span: SourceLocation::new(start, right.span().end_idx),
                left: Box::new(left),
                right: Box::new(right),
            }))
        })
    }

    /// `MarkerAtom ('and' MarkerAtom)*`, folded to the left.
    fn marker_and(&mut self) -> Option<Marker<'i>> {
        self.memoized(MarkerRule::And, |p| {
            let start = p.token_start();
            let first = p.marker_atom()?;
            let rest = p.repeat(|p| {
                p.keyword("and")?;
                p.marker_atom()
            });
            Some(rest.into_iter().fold(first, |left, right| Marker::And {
                span: SourceLocation::new(start, right.span().end_idx),
                left: Box::new(left),
                right: Box::new(right),
            }))
        })
    }

    /// `'(' MarkerExpr ')' | MarkerLeaf`
    fn marker_atom(&mut self) -> Option<Marker<'i>> {
        self.memoized(MarkerRule::Atom, |p| {
            p.attempt(Self::marker_group)
                .or_else(|| p.marker_leaf().map(Marker::Leaf))
        })
    }

    fn marker_group(&mut self) -> Option<Marker<'i>> {
        let start = self.token_start();
        self.literal("(")?;
        self.enter_group(start)?;
        let inner = self.marker_or();
        self.leave_group();
        let inner = inner?;
        self.literal(")")?;
        Some(Marker::Group {
            span: self.span_from(start),
            inner: Box::new(inner),
        })
    }

    fn marker_leaf(&mut self) -> Option<MarkerLeaf<'i>> {
        let start = self.token_start();
        let left = self.marker_operand()?;
        let operator = self.marker_operator()?;
        let right = self.marker_operand()?;
        self.count_clause()?;
        Some(MarkerLeaf {
            span: self.span_from(start),
            left,
            operator,
            right,
        })
    }

    /// `PythonString | Identifier`
    fn marker_operand(&mut self) -> Option<Lexeme<'i>> {
        self.attempt(Self::python_string).or_else(|| self.identifier())
    }

    /// A single- or double-quoted string on one line, quotes included.
    fn python_string(&mut self) -> Option<Lexeme<'i>> {
        let start = self.token_start();
        let after = &self.input[start..];
        let Some(quote) = after.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
            self.expect_at(start, Expected::Named("string"));
            return None;
        };
        let body = &after[1..];
        let Some(close) = body.find([quote, '\n']).filter(|&idx| body[idx..].starts_with(quote))
        else {
            let end = start + 1 + body.find('\n').unwrap_or(body.len());
            self.expect_at(end, Expected::Literal(if quote == '"' { "\"" } else { "'" }));
            return None;
        };
        self.cursor.pos = start;
        Some(self.take(close + 2))
    }

    fn marker_operator(&mut self) -> Option<MarkerOperator> {
        if let Some(token) = self.attempt(Self::version_operator) {
            return Some(MarkerOperator::Version(token.operator));
        }
        if self.attempt(|p| p.keyword("in")).is_some() {
            return Some(MarkerOperator::In);
        }
        self.attempt(|p| {
            p.keyword("not")?;
            p.keyword("in")?;
            Some(MarkerOperator::NotIn)
        })
    }
}
