//! Shaping raw model replies.
//!
//! Most steps hand the reply back verbatim. The persona step asks the model
//! for a list literal like `[['Name', 'view'], ...]` and has to dig it out of
//! whatever chatter surrounds it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named viewpoint. Serialized as a two-element array `[name, perspective]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Persona {
    pub name: String,
    pub perspective: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, perspective: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            perspective: perspective.into(),
        }
    }
}

impl From<(String, String)> for Persona {
    fn from((name, perspective): (String, String)) -> Self {
        Self { name, perspective }
    }
}

impl From<Persona> for (String, String) {
    fn from(p: Persona) -> Self {
        (p.name, p.perspective)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("List not found in response")]
    ListNotFound,

    /// The bracketed text is not a list of `[string, string]` pairs.
    #[error("Invalid list format")]
    InvalidListFormat { detail: String },
}

/// Return the reply untouched.
pub fn passthrough(reply: String) -> String {
    reply
}

/// Find the outermost `[...]` in a reply and parse it as a persona list.
///
/// The span runs from the first `[` to the last `]`; text outside it is ignored.
pub fn extract_persona_list(raw: &str) -> Result<Vec<Persona>, ExtractError> {
    let start = raw.find('[').ok_or(ExtractError::ListNotFound)?;
    let end = raw.rfind(']').ok_or(ExtractError::ListNotFound)?;
    if end < start {
        return Err(ExtractError::ListNotFound);
    }
    parse_persona_list(&raw[start..=end])
}

/// Parse a complete list literal, e.g. one a client stored and sent back.
pub fn parse_persona_list(literal: &str) -> Result<Vec<Persona>, ExtractError> {
    let mut parser = LiteralParser::new(literal);
    parser.skip_ws();
    let personas = parser.persona_list()?;
    parser.skip_ws();
    if let Some((pos, c)) = parser.peek() {
        return Err(parser.invalid(pos, format!("unexpected {:?} after list", c)));
    }
    Ok(personas)
}

/// Recursive-descent parser for `[[str, str], ...]`.
///
/// Pairs may be lists or tuples. Strings may use single or double quotes,
/// Python backslash escapes and implicit concatenation. Trailing commas are
/// allowed; nothing else is.
struct LiteralParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<(usize, char)> {
        self.src[self.pos..].chars().next().map(|c| (self.pos, c))
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.src[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some((_, c)) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump();
        }
    }

    fn invalid(&self, pos: usize, what: String) -> ExtractError {
        ExtractError::InvalidListFormat {
            detail: format!("{} at offset {}", what, pos),
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ExtractError> {
        match self.peek() {
            Some((_, c)) if c == want => {
                self.bump();
                Ok(())
            }
            Some((pos, c)) => Err(self.invalid(pos, format!("expected {:?}, found {:?}", want, c))),
            None => Err(self.invalid(self.pos, format!("expected {:?}, found end of input", want))),
        }
    }

    /// Consume `,` or stop at `close`. Returns true when the sequence is finished.
    fn separator_or_close(&mut self, close: char) -> Result<bool, ExtractError> {
        self.skip_ws();
        match self.peek() {
            Some((_, ',')) => {
                self.bump();
                self.skip_ws();
                if let Some((_, c)) = self.peek() {
                    if c == close {
                        self.bump();
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Some((_, c)) if c == close => {
                self.bump();
                Ok(true)
            }
            Some((pos, c)) => Err(self.invalid(pos, format!("expected ',' or {:?}, found {:?}", close, c))),
            None => Err(self.invalid(self.pos, format!("expected ',' or {:?}, found end of input", close))),
        }
    }

    fn persona_list(&mut self) -> Result<Vec<Persona>, ExtractError> {
        self.expect('[')?;
        self.skip_ws();
        let mut personas = Vec::new();
        if let Some((_, ']')) = self.peek() {
            self.bump();
            return Ok(personas);
        }
        loop {
            personas.push(self.pair()?);
            if self.separator_or_close(']')? {
                return Ok(personas);
            }
        }
    }

    /// `[name, perspective]` or `(name, perspective)`.
    fn pair(&mut self) -> Result<Persona, ExtractError> {
        let close = match self.peek() {
            Some((_, '[')) => ']',
            Some((_, '(')) => ')',
            Some((pos, c)) => return Err(self.invalid(pos, format!("expected '[' or '(', found {:?}", c))),
            None => return Err(self.invalid(self.pos, "expected '[' or '(', found end of input".to_string())),
        };
        let open = self.pos;
        self.bump();
        self.skip_ws();
        let name = self.string()?;
        if self.separator_or_close(close)? {
            return Err(self.invalid(open, "pair has 1 element, expected 2".to_string()));
        }
        let perspective = self.string()?;
        if !self.separator_or_close(close)? {
            return Err(self.invalid(open, "pair has more than 2 elements".to_string()));
        }
        Ok(Persona { name, perspective })
    }

    /// One string element: a quoted literal, or several separated only by
    /// whitespace, which are joined.
    fn string(&mut self) -> Result<String, ExtractError> {
        let mut out = self.quoted()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some((_, '\'' | '"')) => out.push_str(&self.quoted()?),
                _ => return Ok(out),
            }
        }
    }

    fn quoted(&mut self) -> Result<String, ExtractError> {
        let (start, quote) = match self.peek() {
            Some((pos, c @ ('\'' | '"'))) => (pos, c),
            Some((pos, c)) => return Err(self.invalid(pos, format!("expected string, found {:?}", c))),
            None => return Err(self.invalid(self.pos, "expected string, found end of input".to_string())),
        };
        self.bump();

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.invalid(start, "unterminated string".to_string())),
                Some(c) if c == quote => return Ok(out),
                Some('\n') => return Err(self.invalid(start, "newline in string".to_string())),
                Some('\\') => self.escape(start, &mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    /// Decode the escape after a backslash, Python string rules.
    fn escape(&mut self, start: usize, out: &mut String) -> Result<(), ExtractError> {
        let at = self.pos;
        match self.bump() {
            None => return Err(self.invalid(start, "unterminated string".to_string())),
            Some('\n') => {}
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0C}'),
            Some('v') => out.push('\u{0B}'),
            Some(c @ ('\\' | '\'' | '"')) => out.push(c),
            Some('x') => out.push(self.hex_escape(at, 2)?),
            Some('u') => out.push(self.hex_escape(at, 4)?),
            Some('U') => out.push(self.hex_escape(at, 8)?),
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match self.peek() {
                        Some((_, c @ '0'..='7')) => {
                            value = value * 8 + c.to_digit(8).unwrap_or_default();
                            self.bump();
                        }
                        _ => break,
                    }
                }
                out.push(self.code_point(at, value)?);
            }
            // Needs the Unicode name table; refuse rather than guess.
            Some('N') => return Err(self.invalid(at, "named unicode escape is not supported".to_string())),
            // Unknown escapes keep their backslash.
            Some(c) => {
                out.push('\\');
                out.push(c);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, at: usize, digits: usize) -> Result<char, ExtractError> {
        let mut value: u32 = 0;
        for _ in 0..digits {
            let digit = match self.peek() {
                Some((_, c)) => c.to_digit(16),
                None => None,
            };
            let Some(digit) = digit else {
                return Err(self.invalid(at, format!("truncated escape, expected {} hex digits", digits)));
            };
            value = value * 16 + digit;
            self.bump();
        }
        self.code_point(at, value)
    }

    fn code_point(&self, at: usize, value: u32) -> Result<char, ExtractError> {
        char::from_u32(value).ok_or_else(|| self.invalid(at, format!("invalid code point {:#x}", value)))
    }
}
