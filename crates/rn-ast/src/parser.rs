//! Recursive-descent parser for the illustrative subset language.

use std::sync::Arc;

use rn_source::SourceLocation;
use thiserror::Error;

use crate::ast::{Node, NodeKind};
use crate::token::{Token, TokenKind, lex};

/// A parse failure, with a source range (spec §6: "raises a parse error
/// with a source range on failure").
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unexpected token: found {found}, expected {expected}")]
pub struct ParseError {
    /// What was actually found.
    pub found: String,
    /// What the parser expected instead.
    pub expected: String,
    /// Where in the source the mismatch occurred.
    pub location: SourceLocation,
}

/// Parse result alias.
pub type ParseResult<T> = Result<T, ParseError>;

/// A one-file recursive-descent parser.
pub struct Parser {
    file: Arc<str>,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a parser for `source`, attributing all locations to `file`.
    pub fn new(file: impl Into<Arc<str>>, source: &str) -> Self {
        Parser { file: file.into(), tokens: lex(source), pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn loc(&self, start: usize, end: usize) -> SourceLocation {
        SourceLocation::new(self.file.clone(), start, end)
    }

    fn error(&self, expected: &str) -> ParseError {
        let tok = self.peek();
        ParseError {
            found: tok.kind.to_string(),
            expected: expected.to_string(),
            location: self.loc(tok.start, tok.end),
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> ParseResult<Token> {
        if self.peek().kind == *kind {
            Ok(self.advance())
        } else {
            Err(self.error(expected))
        }
    }

    fn name(&mut self) -> ParseResult<Node> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Ident(text) => {
                self.advance();
                Ok(Node::new(NodeKind::Name(text), self.loc(tok.start, tok.end)))
            }
            _ => Err(self.error("identifier")),
        }
    }

    /// Parse a whole module: `module Name; decl*`.
    pub fn parse_module(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        self.expect(&TokenKind::KwModule, "`module`")?;
        let name = self.name()?;
        self.expect(&TokenKind::Semi, "`;`")?;

        let mut decls = Vec::new();
        while self.peek().kind != TokenKind::Eof {
            decls.push(self.decl()?);
        }
        let end = self.tokens[self.pos].start;
        Ok(Node::new(NodeKind::Module { name: Box::new(name), decls }, self.loc(start, end)))
    }

    fn decl(&mut self) -> ParseResult<Node> {
        match self.peek().kind.clone() {
            TokenKind::KwImport => self.import_decl(),
            TokenKind::KwAlias => self.alias_decl(),
            TokenKind::KwData => self.data_decl(),
            TokenKind::KwSyntax => self.syntax_rule(),
            TokenKind::Ident(_) => {
                // Either a function declaration or a top-level variable
                // declaration: both start with a type expression.
                self.function_or_variable_decl()
            }
            _ => Err(self.error("a declaration")),
        }
    }

    fn import_decl(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        self.advance(); // import
        let path = self.qualified_name()?;
        let end = self.tokens[self.pos.saturating_sub(1)].end;
        self.expect(&TokenKind::Semi, "`;`")?;
        Ok(Node::new(NodeKind::Import { path: Box::new(path) }, self.loc(start, end)))
    }

    fn alias_decl(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        self.advance(); // alias
        let name = self.name()?;
        self.expect(&TokenKind::Eq, "`=`")?;
        let target = self.qualified_name()?;
        let end = self.tokens[self.pos.saturating_sub(1)].end;
        self.expect(&TokenKind::Semi, "`;`")?;
        Ok(Node::new(
            NodeKind::Alias { name: Box::new(name), target: Box::new(target) },
            self.loc(start, end),
        ))
    }

    fn qualified_name(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        let mut segments = vec![self.name()?];
        while self.peek().kind == TokenKind::ColonColon {
            self.advance();
            segments.push(self.name()?);
        }
        let end = segments.last().expect("at least one segment parsed").location.end;
        if segments.len() == 1 {
            Ok(segments.pop().expect("exactly one segment"))
        } else {
            Ok(Node::new(NodeKind::QualifiedName(segments), self.loc(start, end)))
        }
    }

    fn data_decl(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        self.advance(); // data
        let name = self.name()?;
        self.expect(&TokenKind::Eq, "`=`")?;

        let mut constructors = Vec::new();
        let mut common_keyword_fields = Vec::new();
        loop {
            if self.peek().kind == TokenKind::KwCommon {
                self.advance();
                common_keyword_fields.push(self.keyword_field()?);
                while self.peek().kind == TokenKind::Comma {
                    self.advance();
                    self.expect(&TokenKind::KwCommon, "`common`")?;
                    common_keyword_fields.push(self.keyword_field()?);
                }
            } else {
                constructors.push(self.constructor()?);
            }
            if self.peek().kind == TokenKind::Pipe {
                self.advance();
            } else {
                break;
            }
        }
        let end = self.tokens[self.pos.saturating_sub(1)].end;
        self.expect(&TokenKind::Semi, "`;`")?;
        Ok(Node::new(
            NodeKind::Data { name: Box::new(name), constructors, common_keyword_fields },
            self.loc(start, end),
        ))
    }

    fn constructor(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        let name = self.name()?;
        self.expect(&TokenKind::LParen, "`(`")?;

        let mut positional_fields = Vec::new();
        let mut keyword_fields = Vec::new();
        if self.peek().kind != TokenKind::RParen {
            loop {
                if self.peek().kind == TokenKind::KwKeyword {
                    self.advance();
                    keyword_fields.push(self.keyword_field()?);
                } else {
                    positional_fields.push(self.positional_field()?);
                }
                if self.peek().kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let close = self.expect(&TokenKind::RParen, "`)`")?;
        Ok(Node::new(
            NodeKind::Constructor { name: Box::new(name), positional_fields, keyword_fields },
            self.loc(start, close.end),
        ))
    }

    fn positional_field(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        let ty = self.name()?;
        let name = self.name()?;
        let end = name.location.end;
        Ok(Node::new(
            NodeKind::PositionalField { ty: Box::new(ty), name: Box::new(name) },
            self.loc(start, end),
        ))
    }

    fn keyword_field(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        let ty = self.name()?;
        let name = self.name()?;
        self.expect(&TokenKind::Eq, "`=`")?;
        let default = self.expr()?;
        let end = default.location.end;
        Ok(Node::new(
            NodeKind::KeywordField { ty: Box::new(ty), name: Box::new(name), default: Box::new(default) },
            self.loc(start, end),
        ))
    }

    fn function_or_variable_decl(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        let ty = self.name()?;
        let name = self.name()?;

        let mut type_params = Vec::new();
        if self.peek().kind == TokenKind::Lt {
            self.advance();
            loop {
                let tp_start = self.peek().start;
                let tp_name = self.name()?;
                let tp_end = tp_name.location.end;
                type_params.push(Node::new(
                    NodeKind::TypeParameter { name: Box::new(tp_name) },
                    self.loc(tp_start, tp_end),
                ));
                if self.peek().kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
            self.expect(&TokenKind::Gt, "`>`")?;
        }

        if self.peek().kind == TokenKind::LParen {
            self.advance();
            let mut params = Vec::new();
            let mut keyword_params = Vec::new();
            if self.peek().kind != TokenKind::RParen {
                loop {
                    if self.peek().kind == TokenKind::KwKeyword {
                        self.advance();
                        keyword_params.push(self.keyword_parameter()?);
                    } else {
                        params.push(self.parameter()?);
                    }
                    if self.peek().kind == TokenKind::Comma {
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
            self.expect(&TokenKind::RParen, "`)`")?;
            let body = self.block()?;
            let end = body.location.end;
            return Ok(Node::new(
                NodeKind::FunctionDecl {
                    name: Box::new(name),
                    type_params,
                    params,
                    keyword_params,
                    body: Box::new(body),
                },
                self.loc(start, end),
            ));
        }

        // Variable declaration: `Type name = expr;`
        self.expect(&TokenKind::Eq, "`=`")?;
        let init = self.expr()?;
        let end = init.location.end;
        self.expect(&TokenKind::Semi, "`;`")?;
        Ok(Node::new(
            NodeKind::VariableDecl { ty: Box::new(ty), name: Box::new(name), init: Box::new(init) },
            self.loc(start, end),
        ))
    }

    fn parameter(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        let ty = self.name()?;
        let name = self.name()?;
        let end = name.location.end;
        Ok(Node::new(
            NodeKind::Parameter { ty: Box::new(ty), name: Box::new(name) },
            self.loc(start, end),
        ))
    }

    fn keyword_parameter(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        let ty = self.name()?;
        let name = self.name()?;
        self.expect(&TokenKind::Eq, "`=`")?;
        let default = self.expr()?;
        let end = default.location.end;
        Ok(Node::new(
            NodeKind::KeywordParameter {
                ty: Box::new(ty),
                name: Box::new(name),
                default: Box::new(default),
            },
            self.loc(start, end),
        ))
    }

    fn block(&mut self) -> ParseResult<Node> {
        let open = self.expect(&TokenKind::LBrace, "`{`")?;
        let mut statements = Vec::new();
        while self.peek().kind != TokenKind::RBrace {
            statements.push(self.statement()?);
        }
        let close = self.expect(&TokenKind::RBrace, "`}`")?;
        Ok(Node::new(NodeKind::Block(statements), self.loc(open.start, close.end)))
    }

    fn statement(&mut self) -> ParseResult<Node> {
        match self.peek().kind.clone() {
            TokenKind::KwReturn => {
                let start = self.peek().start;
                self.advance();
                let value = if self.peek().kind == TokenKind::Semi {
                    None
                } else {
                    Some(Box::new(self.expr()?))
                };
                let end = self.tokens[self.pos].start;
                self.expect(&TokenKind::Semi, "`;`")?;
                Ok(Node::new(NodeKind::Return(value), self.loc(start, end)))
            }
            TokenKind::Ident(_) if self.looks_like_decl() => self.function_or_variable_decl(),
            _ => {
                let start = self.peek().start;
                let expr = self.expr()?;
                let end = expr.location.end;
                self.expect(&TokenKind::Semi, "`;`")?;
                Ok(Node::new(NodeKind::ExprStatement(Box::new(expr)), self.loc(start, end)))
            }
        }
    }

    /// Two identifiers in a row (`Type name`) signal a nested variable
    /// declaration rather than an expression statement.
    fn looks_like_decl(&self) -> bool {
        matches!(
            (&self.tokens[self.pos].kind, self.tokens.get(self.pos + 1).map(|t| &t.kind)),
            (TokenKind::Ident(_), Some(TokenKind::Ident(_)))
        )
    }

    fn expr(&mut self) -> ParseResult<Node> {
        let mut node = self.primary()?;
        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let field = self.name()?;
                    let end = field.location.end;
                    let start = node.location.start;
                    node = Node::new(
                        NodeKind::FieldAccess { base: Box::new(node), field: Box::new(field) },
                        self.loc(start, end),
                    );
                }
                TokenKind::LParen => {
                    self.advance();
                    let mut args = Vec::new();
                    if self.peek().kind != TokenKind::RParen {
                        loop {
                            args.push(self.expr()?);
                            if self.peek().kind == TokenKind::Comma {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    let close = self.expect(&TokenKind::RParen, "`)`")?;
                    let start = node.location.start;
                    node = Node::new(
                        NodeKind::Call { callee: Box::new(node), args },
                        self.loc(start, close.end),
                    );
                }
                _ => break,
            }
        }
        Ok(node)
    }

    fn primary(&mut self) -> ParseResult<Node> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Node::new(NodeKind::IntLiteral(n), self.loc(tok.start, tok.end)))
            }
            TokenKind::Str(ref s) => {
                let text = s.clone();
                self.advance();
                Ok(Node::new(NodeKind::StringLiteral(text), self.loc(tok.start, tok.end)))
            }
            TokenKind::Ident(_) => {
                let qualified = self.qualified_name()?;
                let loc = qualified.location.clone();
                Ok(Node::new(NodeKind::Use(Box::new(qualified)), loc))
            }
            _ => Err(self.error("an expression")),
        }
    }

    fn syntax_rule(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        self.advance(); // syntax
        let nonterminal = self.name()?;
        self.expect(&TokenKind::Eq, "`=`")?;

        let mut alternatives = vec![self.syntax_alternative()?];
        while self.peek().kind == TokenKind::Pipe {
            self.advance();
            alternatives.push(self.syntax_alternative()?);
        }
        let end = self.tokens[self.pos.saturating_sub(1)].end;
        self.expect(&TokenKind::Semi, "`;`")?;
        Ok(Node::new(
            NodeKind::SyntaxRule { nonterminal: Box::new(nonterminal), alternatives },
            self.loc(start, end),
        ))
    }

    fn syntax_alternative(&mut self) -> ParseResult<Node> {
        let start = self.peek().start;
        // `label = Sym1 Sym2`: an identifier immediately followed by `=`
        // names this alternative; otherwise it is unlabelled.
        let mut label = None;
        if matches!(self.peek().kind, TokenKind::Ident(_))
            && self.tokens.get(self.pos + 1).map(|t| &t.kind) == Some(&TokenKind::Eq)
        {
            let l = self.name()?;
            self.advance(); // consume `=`
            label = Some(Box::new(l));
        }

        let mut symbols = Vec::new();
        while matches!(self.peek().kind, TokenKind::Ident(_)) {
            symbols.push(self.name()?);
        }
        let end = symbols
            .last()
            .map(|s| s.location.end)
            .or_else(|| label.as_ref().map(|l| l.location.end))
            .unwrap_or(start);
        Ok(Node::new(NodeKind::SyntaxAlternative { label, symbols }, self.loc(start, end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Node {
        Parser::new("M.lang", src).parse_module().expect("test source must parse")
    }

    #[test]
    fn parses_module_header() {
        let m = parse("module M;");
        match m.kind {
            NodeKind::Module { name, decls } => {
                assert_eq!(name.as_name(), Some("M"));
                assert!(decls.is_empty());
            }
            _ => panic!("expected Module"),
        }
    }

    #[test]
    fn parses_import_and_alias() {
        let m = parse("module M;\nimport Other;\nalias Name = Other;\n");
        match m.kind {
            NodeKind::Module { decls, .. } => {
                assert!(matches!(decls[0].kind, NodeKind::Import { .. }));
                assert!(matches!(decls[1].kind, NodeKind::Alias { .. }));
            }
            _ => panic!("expected Module"),
        }
    }

    #[test]
    fn parses_data_with_positional_keyword_and_common_fields() {
        let src = "module M;\ndata D = d(int foo, keyword int baz = 0) | common keyword int qux = 1;\n";
        let m = parse(src);
        match m.kind {
            NodeKind::Module { decls, .. } => match &decls[0].kind {
                NodeKind::Data { constructors, common_keyword_fields, .. } => {
                    assert_eq!(constructors.len(), 1);
                    assert_eq!(common_keyword_fields.len(), 1);
                    match &constructors[0].kind {
                        NodeKind::Constructor { positional_fields, keyword_fields, .. } => {
                            assert_eq!(positional_fields.len(), 1);
                            assert_eq!(keyword_fields.len(), 1);
                        }
                        _ => panic!("expected Constructor"),
                    }
                }
                _ => panic!("expected Data"),
            },
            _ => panic!("expected Module"),
        }
    }

    #[test]
    fn parses_function_with_type_parameters_and_body() {
        let src = "module M;\nint f<T>(int a) { return a; }\n";
        let m = parse(src);
        match m.kind {
            NodeKind::Module { decls, .. } => match &decls[0].kind {
                NodeKind::FunctionDecl { name, type_params, params, body, .. } => {
                    assert_eq!(name.as_name(), Some("f"));
                    assert_eq!(type_params.len(), 1);
                    assert_eq!(params.len(), 1);
                    assert!(matches!(body.kind, NodeKind::Block(_)));
                }
                _ => panic!("expected FunctionDecl"),
            },
            _ => panic!("expected Module"),
        }
    }

    #[test]
    fn parses_qualified_name_in_field_access() {
        let src = "module M;\nint f(int a) { return Other::g(a).foo; }\n";
        parse(src);
    }

    #[test]
    fn parse_error_reports_location() {
        let mut parser = Parser::new("M.lang", "module ;");
        let err = parser.parse_module().unwrap_err();
        assert_eq!(err.expected, "identifier");
    }
}
