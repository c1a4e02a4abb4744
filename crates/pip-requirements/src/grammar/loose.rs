//! Rules of the loose grammar.
//!
//! Every rule here either succeeds or is optional, so a loose match never
//! fails: whatever the rules cannot make sense of ends up in the line's rest.

use super::tree::{
    Lexeme, LooseExtras, LooseLine, LooseNameReq, LooseReq, LooseVersionOne, LooseVersionSpecTree,
};
use super::{Parser, is_blank};

impl<'i> Parser<'i> {
    /// `LooseLine ('\n' LooseLine)*`
    pub(super) fn loose_file(&mut self) -> Vec<LooseLine<'i>> {
        let mut lines = vec![self.loose_line()];
        while self.newline().is_some() {
            lines.push(self.loose_line());
        }
        lines
    }

    /// `LooseReq? LooseRest`
    pub(super) fn loose_line(&mut self) -> LooseLine<'i> {
        let req = self.optional(Self::loose_req);
        let rest = self.rest_of_line();
        LooseLine { req, rest }
    }

    fn loose_req(&mut self) -> Option<LooseReq<'i>> {
        self.attempt(Self::loose_non_name_req)
            .map(LooseReq::NonName)
            .or_else(|| self.loose_name_req().map(LooseReq::Name))
    }

    /// `'-' rest | Identifier LooseExtras? '@' rest`
    fn loose_non_name_req(&mut self) -> Option<Lexeme<'i>> {
        let start = self.token_start();
        let matched = self.attempt(|p| p.literal("-")).is_some()
            || self
                .attempt(|p| {
                    p.identifier()?;
                    p.optional(Self::loose_extras);
                    p.literal("@")
                })
                .is_some();
        if !matched {
            return None;
        }
        self.rest_of_line();
        let span = self.span_from(start);
        Some(Lexeme {
            text: &self.input[span.range()],
            span,
        })
    }

    fn loose_name_req(&mut self) -> Option<LooseNameReq<'i>> {
        let start = self.token_start();
        let name = self.identifier()?;
        let extras = self.optional(Self::loose_extras);
        let version_spec = self.loose_version_spec();
        let marker = self.optional(Self::loose_marker);
        Some(LooseNameReq {
            span: self.span_from(start),
            name,
            extras,
            version_spec,
            marker,
        })
    }

    /// `'[' (Identifier (',' Identifier)*)? ','* ']'?`
    fn loose_extras(&mut self) -> Option<LooseExtras<'i>> {
        let start = self.token_start();
        self.literal("[")?;
        let names = self.list_of(Self::identifier, ",");
        self.repeat(|p| p.literal(","));
        let closed = self.optional(|p| p.literal("]")).is_some();
        Some(LooseExtras {
            span: self.span_from(start),
            names,
            closed,
        })
    }

    /// Never fails: no clause at all is an empty bare list.
    fn loose_version_spec(&mut self) -> LooseVersionSpecTree<'i> {
        if self.optional(|p| p.literal("(")).is_some() {
            let entries = self.loose_version_many();
            let closed = self.optional(|p| p.literal(")")).is_some();
            LooseVersionSpecTree::Parenthesized { entries, closed }
        } else {
            LooseVersionSpecTree::Bare(self.loose_version_many())
        }
    }

    /// `(LooseVersionOne (',' LooseVersionOne)*)? ','*`
    fn loose_version_many(&mut self) -> Vec<LooseVersionOne<'i>> {
        let entries = self.list_of(Self::loose_version_one, ",");
        self.repeat(|p| p.literal(","));
        entries
    }

    fn loose_version_one(&mut self) -> Option<LooseVersionOne<'i>> {
        let start = self.token_start();
        let operator =
            self.run_of(|c| matches!(c, '<' | '>' | '=' | '!' | '~'), "version operator")?;
        let version = self.optional(Self::version);
        Some(LooseVersionOne {
            span: self.span_from(start),
            operator,
            version,
        })
    }

    /// `';' LooseMarkerText?`
    ///
    /// The text stops at the end of the line or at a `#` outside quotes; an
    /// unterminated quote runs to the end of the line. Trailing blanks are
    /// left for the rest of the line.
    fn loose_marker(&mut self) -> Option<Lexeme<'i>> {
        let start = self.token_start();
        self.literal(";")?;
        let text_start = self.token_start();
        let mut quote = None;
        let mut end = text_start;
        for (offset, c) in self.input[text_start..].char_indices() {
            match (quote, c) {
                (_, '\n') | (None, '#') => break,
                (None, '"' | '\'') => quote = Some(c),
                (Some(open), _) if open == c => quote = None,
                _ => {}
            }
            if !is_blank(c) {
                end = text_start + offset + c.len_utf8();
            }
        }
        if end > text_start {
            self.cursor.pos = text_start;
            self.take(end - text_start);
        }
        let span = self.span_from(start);
        Some(Lexeme {
            text: &self.input[span.range()],
            span,
        })
    }
}
