//! Tokenizer for template source
//!
//! Expression syntax is tokenized on demand with [`Lexer::next_token`].
//! Markup is context sensitive (text runs, attribute strings, tag names), so
//! the parser switches to the character-level `scan_*` methods while inside
//! a tag or between children. The lexer state is a single byte offset, so
//! lookahead and backtracking are a `clone()`.

use crate::error::{ParseError, Position};

/// Punctuators, longest first so matching is greedy.
const PUNCTUATORS: &[&str] = &[
    ">>>", "===", "!==", "...", "**", "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "?.",
    "<<", ">>", "+", "-", "*", "/", "%", "<", ">", "!", "~", "&", "|", "^", "?", ":", ".", ",",
    "(", ")", "[", "]", "{", "}", "=", ";",
];

/// A lexical token kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal
    Number(f64),
    /// String literal, unescaped
    String(String),
    /// Identifier or keyword
    Ident(String),
    /// Operator or delimiter
    Punct(&'static str),
    /// Opening backtick of a template string
    Backtick,
    /// End of input
    Eof,
}

/// A token with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was scanned
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub offset: usize,
    /// Whether a line break precedes the token
    pub newline_before: bool,
}

impl Token {
    /// Check if this token is the given punctuator.
    pub fn is_punct(&self, p: &str) -> bool {
        matches!(&self.kind, TokenKind::Punct(q) if *q == p)
    }

    /// Check if this token is the given identifier or keyword.
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(n) if n == name)
    }

    /// Describe the token for error messages.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Number(n) => format!("number `{}`", crate::value::format_number(*n)),
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::Ident(name) => format!("`{}`", name),
            TokenKind::Punct(p) => format!("`{}`", p),
            TokenKind::Backtick => "template string".to_string(),
            TokenKind::Eof => "end of template".to_string(),
        }
    }
}

/// How a template string chunk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkEnd {
    /// Closing backtick reached
    Close,
    /// `${` reached; an interpolated expression follows
    Interpolation,
}

/// Cursor over template source.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Position of a byte offset in the source.
    pub fn position_of(&self, offset: usize) -> Position {
        Position::locate(self.source, offset)
    }

    /// Build a parse error located at `offset`.
    pub fn error_at(&self, offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::new(message).with_position(self.position_of(offset))
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Peek the next character without consuming it.
    pub fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Check if the remaining input starts with `s`.
    pub fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Consume `s` if the remaining input starts with it.
    pub fn eat(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Check if the input is exhausted.
    pub fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Expression Tokens
    // ═══════════════════════════════════════════════════════════════════

    /// Peek the next expression token without consuming it.
    pub fn peek_token(&self) -> Result<Token, ParseError> {
        self.clone().next_token()
    }

    /// Consume the next expression token.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        let newline_before = self.skip_trivia()?;
        let offset = self.pos;
        let token = |kind| Token {
            kind,
            offset,
            newline_before,
        };

        let Some(c) = self.peek_char() else {
            return Ok(token(TokenKind::Eof));
        };

        if c.is_ascii_digit() || (c == '.' && self.next_is_digit(1)) {
            return self.scan_number().map(|n| token(TokenKind::Number(n)));
        }

        if c == '"' || c == '\'' {
            return self.scan_string(c).map(|s| token(TokenKind::String(s)));
        }

        if c == '`' {
            self.pos += 1;
            return Ok(token(TokenKind::Backtick));
        }

        if is_ident_start(c) {
            let name = self.scan_while(is_ident_continue);
            return Ok(token(TokenKind::Ident(name.to_string())));
        }

        for p in PUNCTUATORS {
            if self.starts_with(p) {
                // `a?.5:b` is a conditional, not optional chaining
                if *p == "?." && self.next_is_digit(2) {
                    continue;
                }
                self.pos += p.len();
                return Ok(token(TokenKind::Punct(p)));
            }
        }

        Err(self.error_at(offset, format!("unexpected character `{}`", c)))
    }

    fn next_is_digit(&self, skip: usize) -> bool {
        self.rest()
            .as_bytes()
            .get(skip)
            .is_some_and(|b| b.is_ascii_digit())
    }

    /// Skip whitespace and comments. Returns whether a line break was seen.
    fn skip_trivia(&mut self) -> Result<bool, ParseError> {
        let mut newline = false;
        loop {
            let before = self.pos;
            let ws = self.scan_while(char::is_whitespace);
            newline |= ws.contains('\n');

            if self.starts_with("//") {
                self.scan_while(|c| c != '\n');
            } else if self.starts_with("/*") {
                let start = self.pos;
                match self.rest()[2..].find("*/") {
                    Some(end) => {
                        newline |= self.rest()[..end + 2].contains('\n');
                        self.pos += end + 4;
                    }
                    None => return Err(self.error_at(start, "unterminated comment")),
                }
            }

            if self.pos == before {
                return Ok(newline);
            }
        }
    }

    fn scan_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        let len = self
            .rest()
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len());
        self.pos += len;
        &self.source[start..self.pos]
    }

    fn scan_number(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;

        let radix = match self.rest().get(..2) {
            Some("0x") | Some("0X") => Some(16),
            Some("0o") | Some("0O") => Some(8),
            Some("0b") | Some("0B") => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            self.pos += 2;
            let digits = self.scan_while(|c| c.is_ascii_alphanumeric() || c == '_');
            let digits: String = digits.chars().filter(|c| *c != '_').collect();
            return u64::from_str_radix(&digits, radix)
                .map(|n| n as f64)
                .map_err(|_| self.error_at(start, "invalid numeric literal"));
        }

        self.scan_while(|c| c.is_ascii_digit() || c == '_');
        if self.starts_with(".") {
            self.pos += 1;
            self.scan_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            self.pos += 1;
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                self.pos += 1;
            }
            if self.scan_while(|c| c.is_ascii_digit()).is_empty() {
                return Err(self.error_at(start, "invalid numeric literal"));
            }
        }

        let text: String = self.source[start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();
        if self.peek_char().is_some_and(is_ident_start) {
            return Err(self.error_at(self.pos, "identifier directly after number"));
        }
        text.parse::<f64>()
            .map_err(|_| self.error_at(start, "invalid numeric literal"))
    }

    fn scan_string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.pos;
        self.pos += quote.len_utf8();
        let mut out = String::new();
        loop {
            let Some(c) = self.peek_char() else {
                return Err(self.error_at(start, "unterminated string literal"));
            };
            self.pos += c.len_utf8();
            match c {
                c if c == quote => return Ok(out),
                '\\' => self.scan_escape(&mut out, start)?,
                '\n' => return Err(self.error_at(start, "unterminated string literal")),
                c => out.push(c),
            }
        }
    }

    fn scan_escape(&mut self, out: &mut String, start: usize) -> Result<(), ParseError> {
        let Some(c) = self.peek_char() else {
            return Err(self.error_at(start, "unterminated escape sequence"));
        };
        self.pos += c.len_utf8();
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // Line continuation
            '\n' => {}
            'x' => {
                let code = self.scan_hex_digits(2, start)?;
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            'u' => {
                let code = if self.eat("{") {
                    let digits = self.scan_while(|c| c.is_ascii_hexdigit());
                    let code = u32::from_str_radix(digits, 16)
                        .map_err(|_| self.error_at(start, "invalid unicode escape"))?;
                    if !self.eat("}") {
                        return Err(self.error_at(start, "invalid unicode escape"));
                    }
                    code
                } else {
                    self.scan_hex_digits(4, start)?
                };
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn scan_hex_digits(&mut self, count: usize, start: usize) -> Result<u32, ParseError> {
        let digits = self
            .rest()
            .get(..count)
            .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| self.error_at(start, "invalid hexadecimal escape"))?;
        self.pos += count;
        u32::from_str_radix(digits, 16).map_err(|_| self.error_at(start, "invalid escape"))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Template Strings
    // ═══════════════════════════════════════════════════════════════════

    /// Scan a literal run of a template string, after the backtick or `}`.
    pub fn scan_template_chunk(&mut self) -> Result<(String, ChunkEnd), ParseError> {
        let start = self.pos;
        let mut out = String::new();
        loop {
            if self.eat("`") {
                return Ok((out, ChunkEnd::Close));
            }
            if self.eat("${") {
                return Ok((out, ChunkEnd::Interpolation));
            }
            let Some(c) = self.peek_char() else {
                return Err(self.error_at(start, "unterminated template string"));
            };
            self.pos += c.len_utf8();
            if c == '\\' {
                self.scan_escape(&mut out, start)?;
            } else {
                out.push(c);
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Markup Scanning
    // ═══════════════════════════════════════════════════════════════════

    /// Skip whitespace inside a tag.
    pub fn skip_whitespace(&mut self) {
        self.scan_while(char::is_whitespace);
    }

    /// Scan a tag name such as `Row`, `UI.Button` or `my-widget`.
    pub fn scan_tag_name(&mut self) -> &'a str {
        self.scan_while(|c| is_ident_continue(c) || c == '-' || c == '.')
    }

    /// Scan an attribute name such as `value`, `aria-label` or `xml:lang`.
    pub fn scan_attribute_name(&mut self) -> &'a str {
        if !self.peek_char().is_some_and(is_ident_start) {
            return "";
        }
        self.scan_while(|c| is_ident_continue(c) || c == '-' || c == ':')
    }

    /// Scan a quoted attribute value. No backslash escapes; entities decoded.
    pub fn scan_attribute_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let Some(quote) = self.peek_char().filter(|c| *c == '"' || *c == '\'') else {
            return Err(self.error_at(start, "expected quoted attribute value"));
        };
        self.pos += 1;
        match self.rest().find(quote) {
            Some(end) => {
                let raw = &self.rest()[..end];
                self.pos += end + 1;
                Ok(decode_entities(raw))
            }
            None => Err(self.error_at(start, "unterminated attribute value")),
        }
    }

    /// Scan raw text between markup children, up to `<`, `{` or the end.
    pub fn scan_text(&mut self) -> &'a str {
        self.scan_while(|c| c != '<' && c != '{')
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Decode the character references allowed in markup attribute strings.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi))
        });

        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token.kind == TokenKind::Eof {
                return out;
            }
            out.push(token.kind);
        }
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1 2.5 .5 1e3 0x1f 1_000"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Number(2.5),
                TokenKind::Number(0.5),
                TokenKind::Number(1000.0),
                TokenKind::Number(31.0),
                TokenKind::Number(1000.0),
            ]
        );
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            kinds(r#""a\nb" 'it\'s' "A\x42""#),
            vec![
                TokenKind::String("a\nb".to_string()),
                TokenKind::String("it's".to_string()),
                TokenKind::String("AB".to_string()),
            ]
        );
    }

    #[test]
    fn test_greedy_punctuators() {
        assert_eq!(
            kinds("a === b !== c >>> d"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Punct("==="),
                TokenKind::Ident("b".to_string()),
                TokenKind::Punct("!=="),
                TokenKind::Ident("c".to_string()),
                TokenKind::Punct(">>>"),
                TokenKind::Ident("d".to_string()),
            ]
        );
    }

    #[test]
    fn test_optional_chain_vs_conditional() {
        assert_eq!(kinds("a?.b")[1], TokenKind::Punct("?."));
        assert_eq!(kinds("a?.5:1")[1], TokenKind::Punct("?"));
    }

    #[test]
    fn test_comments_are_trivia() {
        let mut lexer = Lexer::new("/* c */ // line\n x");
        let token = lexer.next_token().unwrap();
        assert!(token.is_ident("x"));
        assert!(token.newline_before);
    }

    #[test]
    fn test_unterminated_string_position() {
        let err = Lexer::new("\n  'abc").next_token().unwrap_err();
        assert_eq!(err.message, "unterminated string literal");
        let position = err.position.unwrap();
        assert_eq!((position.line, position.column), (2, 3));
    }

    #[test]
    fn test_template_chunks() {
        let mut lexer = Lexer::new("`Hi ${");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Backtick);
        assert_eq!(
            lexer.scan_template_chunk().unwrap(),
            ("Hi ".to_string(), ChunkEnd::Interpolation)
        );
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;&#65;&#x42;&gt;"), "<AB>");
        assert_eq!(decode_entities("AT&T"), "AT&T");
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
    }
}
