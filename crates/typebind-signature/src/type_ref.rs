//! Java source-style type references (`Pair<String, java.lang.Integer>`), as typed on a command
//! line.

use typebind_types::{Type, TypeEnv, TypeStore};

use crate::error::{Error, Result};

/// Parse `text` and resolve every class name through `store`.
///
/// Names may be binary (`java.util.List`, `com.example.Outer$Inner`) or simple when the simple
/// name is unambiguous in the store. Whitespace between tokens is ignored. Arrays, wildcards and
/// type variables are not accepted.
pub fn parse_type_ref(store: &TypeStore, text: &str) -> Result<Type> {
    let mut parser = Parser {
        store,
        text,
        pos: 0,
    };
    let ty = parser.parse_type()?;
    parser.skip_ws();
    if !parser.is_eof() {
        return Err(parser.error(format!("unexpected `{}`", parser.rest())));
    }
    Ok(ty)
}

struct Parser<'a> {
    store: &'a TypeStore,
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse_type(&mut self) -> Result<Type> {
        self.skip_ws();
        let name = self.parse_qualified_name()?;
        let class = self
            .store
            .find_class(&name)
            .ok_or_else(|| Error::UnknownClass(name.clone()))?;

        let args = if self.consume_char('<') {
            self.parse_type_args()?
        } else {
            Vec::new()
        };

        if !args.is_empty() && self.store.is_defined(class) {
            let expected = self.store.type_params(class).len();
            if expected != args.len() {
                return Err(Error::ArityMismatch {
                    class: name,
                    expected,
                    found: args.len(),
                });
            }
        }
        Ok(Type::class(class, args))
    }

    /// Arguments after an opening `<`, through the closing `>`.
    fn parse_type_args(&mut self) -> Result<Vec<Type>> {
        let mut args = Vec::new();
        loop {
            self.skip_ws();
            match self.peek_char() {
                Some('?') => return Err(self.error("wildcards are not supported")),
                Some('>') if args.is_empty() => return Err(self.error("empty type arguments")),
                _ => {}
            }
            args.push(self.parse_type()?);
            self.skip_ws();
            if self.consume_char(',') {
                continue;
            }
            if self.consume_char('>') {
                return Ok(args);
            }
            return Err(match self.peek_char() {
                Some(ch) => self.error(format!("expected `,` or `>`, found `{ch}`")),
                None => self.error("unclosed `<`"),
            });
        }
    }

    fn parse_qualified_name(&mut self) -> Result<String> {
        let mut name = self.parse_ident()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            if !self.consume_char('.') {
                self.pos = save;
                return Ok(name);
            }
            self.skip_ws();
            name.push('.');
            name.push_str(&self.parse_ident()?);
        }
    }

    fn parse_ident(&mut self) -> Result<String> {
        let start = self.pos;
        match self.peek_char() {
            Some(ch) if is_ident_start(ch) => {
                self.bump_char();
            }
            Some('[') => return Err(self.error("array types are not supported")),
            Some(ch) => return Err(self.error(format!("expected a type name, found `{ch}`"))),
            None => return Err(self.error("expected a type name")),
        }
        while let Some(ch) = self.peek_char() {
            if !is_ident_part(ch) {
                break;
            }
            self.bump_char();
        }
        if self.peek_char() == Some('[') {
            return Err(self.error("array types are not supported"));
        }
        Ok(self.text[start..self.pos].to_string())
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn rest(&self) -> &str {
        self.text.get(self.pos..).unwrap_or("")
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek_char(), Some(ch) if ch.is_whitespace()) {
            self.bump_char();
        }
    }

    fn consume_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.bump_char();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::InvalidTypeRef {
            text: self.text.to_string(),
            message: message.into(),
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

fn is_ident_part(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}
