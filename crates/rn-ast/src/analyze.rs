//! A reference [`TypeCheckerOracle`] for the toy grammar, analogous in
//! spirit to a production language's symbol extractor: walks a parsed
//! tree once, building the `Define`/`Fact`/`Use→Def` facts spec §3
//! describes, resolving what it can locally and leaving cross-file
//! resolution to the workspace index.

use std::collections::HashMap;

use rn_source::SourceLocation;
use rn_symbol_types::{Define, IdentifierRole, Type};
use tracing::trace;

use crate::ast::{Node, NodeKind};
use crate::oracle::{FileModel, OracleError, ParserOracle, TypeCheckerOracle};
use crate::parser::Parser;

/// Parses with the toy grammar's [`Parser`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ToyParser;

impl ParserOracle for ToyParser {
    fn parse(&self, file: &str, source: &str) -> Result<Node, OracleError> {
        Parser::new(file, source).parse_module().map_err(|source| OracleError::Parse {
            file: file.to_string(),
            source,
        })
    }
}

/// A name visible in some enclosing scope, and where it resolves to.
#[derive(Debug, Clone)]
struct ScopeEntry {
    defined_at: SourceLocation,
}

/// A stack of lexical scopes, innermost last, used to resolve local
/// uses without needing the workspace index.
#[derive(Debug, Default)]
struct Scopes(Vec<HashMap<String, ScopeEntry>>);

impl Scopes {
    fn push(&mut self) {
        self.0.push(HashMap::new());
    }

    fn pop(&mut self) {
        self.0.pop();
    }

    fn bind(&mut self, name: &str, defined_at: SourceLocation) {
        if let Some(top) = self.0.last_mut() {
            top.insert(name.to_string(), ScopeEntry { defined_at });
        }
    }

    fn resolve(&self, name: &str) -> Option<SourceLocation> {
        self.0.iter().rev().find_map(|scope| scope.get(name).map(|e| e.defined_at.clone()))
    }
}

/// Walks a toy-grammar tree, producing a [`FileModel`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ToyAnalyzer;

impl TypeCheckerOracle for ToyAnalyzer {
    fn analyze(&self, tree: &Node) -> Result<FileModel, OracleError> {
        let mut model = FileModel::empty();
        let mut scopes = Scopes::default();
        scopes.push();
        walk_module(tree, &mut model, &mut scopes);
        scopes.pop();
        Ok(model)
    }
}

fn record_scope(model: &mut FileModel, inner: SourceLocation, outer: SourceLocation) {
    if inner != outer {
        model.scopes.insert(inner, outer);
    }
}

fn define(
    model: &mut FileModel,
    scopes: &mut Scopes,
    scope: SourceLocation,
    name_node: &Node,
    role: IdentifierRole,
    ty: Type,
) {
    let name = name_node.as_name().unwrap_or_default().to_string();
    let defined_at = name_node.location.clone();
    trace!(%name, ?role, "defining symbol");
    model.facts.insert(defined_at.clone(), ty.clone());
    scopes.bind(&name, defined_at.clone());
    model.defines.push(Define::new(scope, name, role, defined_at, ty));
}

fn record_use(model: &mut FileModel, scopes: &Scopes, name_node: &Node, ty: Type) {
    let loc = name_node.location.clone();
    if let Some(name) = name_node.as_name() {
        if let Some(target) = scopes.resolve(name) {
            if target != loc {
                model.use_def.insert(loc.clone(), target.clone());
            }
            // Adopt the resolved define's type rather than the caller's
            // fallback, so a use's fact reflects what it actually names
            // (e.g. the container type a field access is chained off of).
            let resolved_ty = model.facts.get(&target).cloned().unwrap_or(ty);
            model.facts.insert(loc, resolved_ty);
            return;
        }
    }
    model.facts.insert(loc, ty);
}

fn last_segment(node: &Node) -> &Node {
    match &node.kind {
        NodeKind::QualifiedName(segments) => segments.last().unwrap_or(node),
        _ => node,
    }
}

fn walk_module(module: &Node, model: &mut FileModel, scopes: &mut Scopes) {
    if let NodeKind::Module { name, decls } = &module.kind {
        let module_name = name.as_name().unwrap_or_default().to_string();
        define(
            model,
            scopes,
            module.location.clone(),
            name,
            IdentifierRole::ModuleName,
            Type::Module(module_name.clone().into()),
        );
        model.module = Some((module_name, module.location.clone()));
        for decl in decls {
            walk_decl(decl, module, model, scopes);
        }
    }
}

fn qualified_name_text(node: &Node) -> String {
    match &node.kind {
        NodeKind::QualifiedName(segments) => {
            segments.iter().filter_map(|s| s.as_name()).collect::<Vec<_>>().join("::")
        }
        _ => node.as_name().unwrap_or_default().to_string(),
    }
}

fn walk_decl(decl: &Node, enclosing: &Node, model: &mut FileModel, scopes: &mut Scopes) {
    match &decl.kind {
        NodeKind::Import { path } => {
            record_use(model, scopes, last_segment(path), Type::Unknown);
            model.imports.push(qualified_name_text(path));
        }
        NodeKind::Alias { name, target } => {
            let target_name = last_segment(target).as_name().unwrap_or_default();
            define(
                model,
                scopes,
                enclosing.location.clone(),
                name,
                IdentifierRole::Alias,
                Type::Adt(target_name.into()),
            );
            record_use(model, scopes, last_segment(target), Type::Adt(target_name.into()));
        }
        NodeKind::Data { name, constructors, common_keyword_fields } => {
            let type_name: std::sync::Arc<str> = name.as_name().unwrap_or_default().into();
            define(
                model,
                scopes,
                enclosing.location.clone(),
                name,
                IdentifierRole::DataType,
                Type::Adt(type_name.clone()),
            );
            for field in common_keyword_fields {
                walk_keyword_field(field, decl, model, scopes, &type_name);
            }
            for ctor in constructors {
                walk_constructor(ctor, decl, model, scopes, &type_name);
            }
        }
        NodeKind::FunctionDecl { name, type_params, params, keyword_params, body } => {
            let mut param_types = Vec::new();
            scopes.push();
            for tp in type_params {
                if let NodeKind::TypeParameter { name } = &tp.kind {
                    define(
                        model,
                        scopes,
                        decl.location.clone(),
                        name,
                        IdentifierRole::TypeParameter,
                        Type::TypeParameter(name.as_name().unwrap_or_default().into()),
                    );
                }
            }
            for p in params {
                if let NodeKind::Parameter { ty, name } = &p.kind {
                    let pty = type_of_expr(ty);
                    param_types.push(pty.clone());
                    define(model, scopes, body.location.clone(), name, IdentifierRole::Parameter, pty);
                }
            }
            for kp in keyword_params {
                if let NodeKind::KeywordParameter { ty, name, default } = &kp.kind {
                    let pty = type_of_expr(ty);
                    param_types.push(pty.clone());
                    define(
                        model,
                        scopes,
                        body.location.clone(),
                        name,
                        IdentifierRole::KeywordParameter,
                        pty,
                    );
                    walk_expr(default, model, scopes);
                }
            }
            define(
                model,
                scopes,
                enclosing.location.clone(),
                name,
                IdentifierRole::Function,
                Type::Function { params: param_types, ret: Box::new(Type::Unknown) },
            );
            record_scope(model, decl.location.clone(), enclosing.location.clone());
            record_scope(model, body.location.clone(), decl.location.clone());
            walk_block(body, model, scopes);
            scopes.pop();
        }
        NodeKind::VariableDecl { ty, name, init } => {
            walk_expr(init, model, scopes);
            define(model, scopes, enclosing.location.clone(), name, IdentifierRole::Variable, type_of_expr(ty));
        }
        NodeKind::SyntaxRule { nonterminal, alternatives } => {
            define(
                model,
                scopes,
                enclosing.location.clone(),
                nonterminal,
                IdentifierRole::Nonterminal,
                Type::Simple(nonterminal.as_name().unwrap_or_default().into()),
            );
            for alt in alternatives {
                if let NodeKind::SyntaxAlternative { label, symbols } = &alt.kind {
                    if let Some(label) = label {
                        define(
                            model,
                            scopes,
                            decl.location.clone(),
                            label,
                            IdentifierRole::NonterminalLabel,
                            Type::Simple(label.as_name().unwrap_or_default().into()),
                        );
                    }
                    for sym in symbols {
                        record_use(model, scopes, sym, Type::Unknown);
                    }
                }
            }
        }
        _ => {}
    }
}

fn walk_constructor(
    ctor: &Node,
    data_decl: &Node,
    model: &mut FileModel,
    scopes: &mut Scopes,
    type_name: &std::sync::Arc<str>,
) {
    if let NodeKind::Constructor { name, positional_fields, keyword_fields } = &ctor.kind {
        let mut param_types = Vec::new();
        for field in positional_fields {
            if let NodeKind::PositionalField { ty, name } = &field.kind {
                let fty = type_of_expr(ty);
                param_types.push(fty.clone());
                define(model, scopes, ctor.location.clone(), name, IdentifierRole::ConstructorField, fty);
            }
        }
        for field in keyword_fields {
            walk_keyword_field(field, ctor, model, scopes, type_name);
        }
        define(
            model,
            scopes,
            data_decl.location.clone(),
            name,
            IdentifierRole::Constructor,
            Type::Function { params: param_types, ret: Box::new(Type::Adt(type_name.clone())) },
        );
    }
}

fn walk_keyword_field(
    field: &Node,
    scope_node: &Node,
    model: &mut FileModel,
    scopes: &mut Scopes,
    _type_name: &std::sync::Arc<str>,
) {
    if let NodeKind::KeywordField { ty, name, default } = &field.kind {
        walk_expr(default, model, scopes);
        define(model, scopes, scope_node.location.clone(), name, IdentifierRole::ConstructorField, type_of_expr(ty));
    }
}

fn walk_block(block: &Node, model: &mut FileModel, scopes: &mut Scopes) {
    if let NodeKind::Block(statements) = &block.kind {
        for stmt in statements {
            walk_decl(stmt, block, model, scopes);
            walk_stmt_expr(stmt, model, scopes);
        }
    }
}

fn walk_stmt_expr(stmt: &Node, model: &mut FileModel, scopes: &mut Scopes) {
    match &stmt.kind {
        NodeKind::Return(Some(expr)) => walk_expr(expr, model, scopes),
        NodeKind::ExprStatement(expr) => walk_expr(expr, model, scopes),
        _ => {}
    }
}

fn walk_expr(expr: &Node, model: &mut FileModel, scopes: &mut Scopes) {
    match &expr.kind {
        NodeKind::Use(inner) => {
            record_use(model, scopes, last_segment(inner), Type::Unknown);
        }
        NodeKind::FieldAccess { base, field } => {
            walk_expr(base, model, scopes);
            record_use(model, scopes, field, Type::Unknown);
        }
        NodeKind::Call { callee, args } => {
            walk_expr(callee, model, scopes);
            for arg in args {
                walk_expr(arg, model, scopes);
            }
        }
        _ => {}
    }
}

fn type_of_expr(ty: &Node) -> Type {
    match ty.as_name() {
        Some("int") | Some("str") | Some("bool") => Type::Simple(ty.as_name().unwrap_or_default().into()),
        Some(name) => Type::Adt(name.into()),
        None => Type::Unknown,
    }
}
