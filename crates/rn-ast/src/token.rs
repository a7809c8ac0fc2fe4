//! Hand-rolled lexer for the illustrative subset language `rn-ast` parses.

use std::fmt;

/// A lexical token with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token's kind and payload.
    pub kind: TokenKind,
    /// Start byte offset, inclusive.
    pub start: usize,
    /// End byte offset, exclusive.
    pub end: usize,
}

/// Token kinds recognized by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A bare or backslash-escaped identifier.
    Ident(String),
    /// An integer literal.
    Int(i64),
    /// A double-quoted string literal (contents only, quotes stripped).
    Str(String),
    /// `module`
    KwModule,
    /// `import`
    KwImport,
    /// `alias`
    KwAlias,
    /// `data`
    KwData,
    /// `common`
    KwCommon,
    /// `keyword`
    KwKeyword,
    /// `syntax`
    KwSyntax,
    /// `return`
    KwReturn,
    /// `;`
    Semi,
    /// `,`
    Comma,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `=`
    Eq,
    /// `::`
    ColonColon,
    /// `.`
    Dot,
    /// `|`
    Pipe,
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier `{name}`"),
            TokenKind::Int(n) => write!(f, "integer `{n}`"),
            TokenKind::Str(s) => write!(f, "string {s:?}"),
            TokenKind::KwModule => write!(f, "`module`"),
            TokenKind::KwImport => write!(f, "`import`"),
            TokenKind::KwAlias => write!(f, "`alias`"),
            TokenKind::KwData => write!(f, "`data`"),
            TokenKind::KwCommon => write!(f, "`common`"),
            TokenKind::KwKeyword => write!(f, "`keyword`"),
            TokenKind::KwSyntax => write!(f, "`syntax`"),
            TokenKind::KwReturn => write!(f, "`return`"),
            TokenKind::Semi => write!(f, "`;`"),
            TokenKind::Comma => write!(f, "`,`"),
            TokenKind::LParen => write!(f, "`(`"),
            TokenKind::RParen => write!(f, "`)`"),
            TokenKind::LBrace => write!(f, "`{{`"),
            TokenKind::RBrace => write!(f, "`}}`"),
            TokenKind::Lt => write!(f, "`<`"),
            TokenKind::Gt => write!(f, "`>`"),
            TokenKind::Eq => write!(f, "`=`"),
            TokenKind::ColonColon => write!(f, "`::`"),
            TokenKind::Dot => write!(f, "`.`"),
            TokenKind::Pipe => write!(f, "`|`"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

fn keyword(ident: &str) -> Option<TokenKind> {
    Some(match ident {
        "module" => TokenKind::KwModule,
        "import" => TokenKind::KwImport,
        "alias" => TokenKind::KwAlias,
        "data" => TokenKind::KwData,
        "common" => TokenKind::KwCommon,
        "keyword" => TokenKind::KwKeyword,
        "syntax" => TokenKind::KwSyntax,
        "return" => TokenKind::KwReturn,
        _ => return None,
    })
}

/// Is `ident` a reserved word of the host language, i.e. one that would
/// lex as a keyword unless backslash-escaped?
///
/// Exposed for the Edit Planner's escaping rule (spec §4.6: "if the new
/// name is a reserved identifier of the host language, prepend a single
/// backslash").
pub fn is_reserved_word(ident: &str) -> bool {
    keyword(ident).is_some()
}

/// Is `text` a single legal identifier token (spec §4.5 item 1: "parse the
/// escaped new name as the syntactic category appropriate to the role")?
///
/// The toy grammar has one identifier shape shared by every named form
/// (ordinary identifiers, non-terminal names, and non-terminal labels all
/// lex the same way), so this single check stands in for the whole
/// syntactic-category dispatch a richer grammar would need.
pub fn is_legal_identifier(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let tokens = lex(text);
    matches!(
        tokens.as_slice(),
        [Token { kind: TokenKind::Ident(_), start: 0, end }, Token { kind: TokenKind::Eof, .. }]
            if *end == text.len()
    )
}

/// Tokenize `source`, skipping whitespace and `//` line comments.
pub fn lex(source: &str) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i] as char;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c == '/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }

        let start = i;
        let kind = match c {
            ';' => {
                i += 1;
                TokenKind::Semi
            }
            ',' => {
                i += 1;
                TokenKind::Comma
            }
            '(' => {
                i += 1;
                TokenKind::LParen
            }
            ')' => {
                i += 1;
                TokenKind::RParen
            }
            '{' => {
                i += 1;
                TokenKind::LBrace
            }
            '}' => {
                i += 1;
                TokenKind::RBrace
            }
            '<' => {
                i += 1;
                TokenKind::Lt
            }
            '>' => {
                i += 1;
                TokenKind::Gt
            }
            '=' => {
                i += 1;
                TokenKind::Eq
            }
            '|' => {
                i += 1;
                TokenKind::Pipe
            }
            ':' if bytes.get(i + 1) == Some(&b':') => {
                i += 2;
                TokenKind::ColonColon
            }
            '.' => {
                i += 1;
                TokenKind::Dot
            }
            '"' => {
                i += 1;
                let content_start = i;
                while i < bytes.len() && bytes[i] != b'"' {
                    i += 1;
                }
                let content = source[content_start..i].to_string();
                if i < bytes.len() {
                    i += 1; // closing quote
                }
                TokenKind::Str(content)
            }
            '0'..='9' => {
                while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                    i += 1;
                }
                let text = &source[start..i];
                TokenKind::Int(text.parse().unwrap_or(0))
            }
            '\\' | 'a'..='z' | 'A'..='Z' | '_' => {
                let escaped = c == '\\';
                if escaped {
                    i += 1;
                }
                let ident_start = i;
                while i < bytes.len() {
                    let ch = bytes[i] as char;
                    if ch.is_alphanumeric() || ch == '_' {
                        i += 1;
                    } else {
                        break;
                    }
                }
                let name = source[ident_start..i].to_string();
                if escaped {
                    TokenKind::Ident(name)
                } else {
                    keyword(&name).unwrap_or(TokenKind::Ident(name))
                }
            }
            _ => {
                // Unknown byte: skip it rather than abort lexing; the parser
                // surfaces a proper error at the next expected-token site.
                i += 1;
                continue;
            }
        };

        tokens.push(Token { kind, start, end: i });
    }

    tokens.push(Token { kind: TokenKind::Eof, start: bytes.len(), end: bytes.len() });
    tokens
}
