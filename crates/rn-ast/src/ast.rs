//! Concrete syntax tree for the illustrative subset language.
//!
//! The shape is deliberately small: enough productions to exercise every
//! identifier role in `rn_symbol_types::IdentifierRole` except the two the
//! spec marks unsupported (annotations), without attempting a real
//! language's full grammar. Production deployments plug a real parser in
//! behind the [`crate::oracle::ParserOracle`] trait instead of this one.

use rn_source::SourceLocation;

/// One syntax tree node. Identifier occurrences are always leaves of kind
/// [`NodeKind::Name`]; every other kind names its child fields explicitly
/// so the Locator (`rn-core`'s C1) can dispatch on production kind the way
/// spec §4.1 describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// This node's production.
    pub kind: NodeKind,
    /// This node's full byte span, including all children.
    pub location: SourceLocation,
}

/// Node productions. Boxed/Vec child fields are named after their role in
/// the production, mirroring spec §4.1's dispatch table ("the `name`
/// field", "the signature's name field", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A bare identifier occurrence — the unit every other production's
    /// "name field" ultimately points at.
    Name(String),
    /// A qualified name `A::B::c`; the Locator takes the *last* segment.
    QualifiedName(Vec<Node>),
    /// The whole module, with its header name and top-level declarations.
    Module {
        /// The module header's declared name.
        name: Box<Node>,
        /// Top-level declarations, in source order.
        decls: Vec<Node>,
    },
    /// `import Path;`
    Import {
        /// The imported module's (possibly qualified) name.
        path: Box<Node>,
    },
    /// `alias Name = Target;`
    Alias {
        /// The alias's declared name.
        name: Box<Node>,
        /// The aliased type expression.
        target: Box<Node>,
    },
    /// `data Name = ctor1(..) | ctor2(..) common keyword ...;`
    Data {
        /// The data type's declared name.
        name: Box<Node>,
        /// The type's constructors.
        constructors: Vec<Node>,
        /// Keyword fields shared by every constructor.
        common_keyword_fields: Vec<Node>,
    },
    /// One constructor of a `data` declaration.
    Constructor {
        /// The constructor's declared name.
        name: Box<Node>,
        /// Positional fields, in declaration order.
        positional_fields: Vec<Node>,
        /// Keyword fields declared on this constructor specifically.
        keyword_fields: Vec<Node>,
    },
    /// A positional field of a constructor.
    PositionalField {
        /// The field's type expression.
        ty: Box<Node>,
        /// The field's name.
        name: Box<Node>,
    },
    /// A keyword field (on a constructor or shared across a data type).
    KeywordField {
        /// The field's type expression.
        ty: Box<Node>,
        /// The field's name.
        name: Box<Node>,
        /// The field's default-value expression.
        default: Box<Node>,
    },
    /// A function declaration, with its signature and body.
    FunctionDecl {
        /// The signature's declared name.
        name: Box<Node>,
        /// Type parameters in angle brackets.
        type_params: Vec<Node>,
        /// Positional parameters.
        params: Vec<Node>,
        /// Keyword parameters.
        keyword_params: Vec<Node>,
        /// The function's body block.
        body: Box<Node>,
    },
    /// A positional function parameter.
    Parameter {
        /// The parameter's type expression.
        ty: Box<Node>,
        /// The parameter's name.
        name: Box<Node>,
    },
    /// A keyword function parameter with a default value.
    KeywordParameter {
        /// The parameter's type expression.
        ty: Box<Node>,
        /// The parameter's name.
        name: Box<Node>,
        /// The parameter's default-value expression.
        default: Box<Node>,
    },
    /// A type parameter occurrence, e.g. the `T` in `<T>`.
    TypeParameter {
        /// The type parameter's name.
        name: Box<Node>,
    },
    /// A block of statements.
    Block(Vec<Node>),
    /// A local variable declaration with an initializing expression.
    VariableDecl {
        /// The variable's type expression.
        ty: Box<Node>,
        /// The variable's name.
        name: Box<Node>,
        /// The initializing expression.
        init: Box<Node>,
    },
    /// `return expr;`
    Return(Option<Box<Node>>),
    /// An expression used as a statement.
    ExprStatement(Box<Node>),
    /// An integer literal.
    IntLiteral(i64),
    /// A string literal.
    StringLiteral(String),
    /// A use of a name (variable, function, type, module, ...).
    Use(Box<Node>),
    /// `base.field`
    FieldAccess {
        /// The accessed container expression.
        base: Box<Node>,
        /// The field being accessed.
        field: Box<Node>,
    },
    /// `callee(args...)`
    Call {
        /// The called expression.
        callee: Box<Node>,
        /// Call arguments.
        args: Vec<Node>,
    },
    /// A grammar rule: `syntax Nonterminal = alt1 | alt2 | ...;`
    SyntaxRule {
        /// The defined nonterminal's name.
        nonterminal: Box<Node>,
        /// The rule's alternatives.
        alternatives: Vec<Node>,
    },
    /// One alternative of a syntax rule, optionally labelled.
    SyntaxAlternative {
        /// The alternative's label, if any.
        label: Option<Box<Node>>,
        /// Nonterminal/terminal references making up this alternative.
        symbols: Vec<Node>,
    },
}

impl Node {
    /// Construct a node.
    pub fn new(kind: NodeKind, location: SourceLocation) -> Self {
        Node { kind, location }
    }

    /// If this node is a [`NodeKind::Name`] leaf, its text.
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Name(text) => Some(text),
            _ => None,
        }
    }

    /// This node's immediate children, in source order.
    ///
    /// Generic traversal utility so downstream crates (the Locator, the
    /// legality checker) can walk the tree without matching on every
    /// `NodeKind` variant themselves.
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Name(_) | NodeKind::IntLiteral(_) | NodeKind::StringLiteral(_) => Vec::new(),
            NodeKind::QualifiedName(segments) => segments.iter().collect(),
            NodeKind::Module { name, decls } => {
                let mut kids = vec![name.as_ref()];
                kids.extend(decls.iter());
                kids
            }
            NodeKind::Import { path } => vec![path.as_ref()],
            NodeKind::Alias { name, target } => vec![name.as_ref(), target.as_ref()],
            NodeKind::Data { name, constructors, common_keyword_fields } => {
                let mut kids = vec![name.as_ref()];
                kids.extend(constructors.iter());
                kids.extend(common_keyword_fields.iter());
                kids
            }
            NodeKind::Constructor { name, positional_fields, keyword_fields } => {
                let mut kids = vec![name.as_ref()];
                kids.extend(positional_fields.iter());
                kids.extend(keyword_fields.iter());
                kids
            }
            NodeKind::PositionalField { ty, name } => vec![ty.as_ref(), name.as_ref()],
            NodeKind::KeywordField { ty, name, default } => {
                vec![ty.as_ref(), name.as_ref(), default.as_ref()]
            }
            NodeKind::FunctionDecl { name, type_params, params, keyword_params, body } => {
                let mut kids = vec![name.as_ref()];
                kids.extend(type_params.iter());
                kids.extend(params.iter());
                kids.extend(keyword_params.iter());
                kids.push(body.as_ref());
                kids
            }
            NodeKind::Parameter { ty, name } => vec![ty.as_ref(), name.as_ref()],
            NodeKind::KeywordParameter { ty, name, default } => {
                vec![ty.as_ref(), name.as_ref(), default.as_ref()]
            }
            NodeKind::TypeParameter { name } => vec![name.as_ref()],
            NodeKind::Block(stmts) => stmts.iter().collect(),
            NodeKind::VariableDecl { ty, name, init } => {
                vec![ty.as_ref(), name.as_ref(), init.as_ref()]
            }
            NodeKind::Return(expr) => expr.iter().map(|e| e.as_ref()).collect(),
            NodeKind::ExprStatement(expr) => vec![expr.as_ref()],
            NodeKind::Use(name) => vec![name.as_ref()],
            NodeKind::FieldAccess { base, field } => vec![base.as_ref(), field.as_ref()],
            NodeKind::Call { callee, args } => {
                let mut kids = vec![callee.as_ref()];
                kids.extend(args.iter());
                kids
            }
            NodeKind::SyntaxRule { nonterminal, alternatives } => {
                let mut kids = vec![nonterminal.as_ref()];
                kids.extend(alternatives.iter());
                kids
            }
            NodeKind::SyntaxAlternative { label, symbols } => {
                let mut kids: Vec<&Node> = label.iter().map(|l| l.as_ref()).collect();
                kids.extend(symbols.iter());
                kids
            }
        }
    }

    /// Every node in the subtree rooted at `self`, pre-order, including
    /// `self`.
    pub fn walk(&self) -> Vec<&Node> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.walk());
        }
        out
    }
}
