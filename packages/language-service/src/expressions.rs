//! Expressions
//!
//! Types binding expressions against the symbols visible in a template and
//! finds the symbol a position in an expression names.

use std::sync::atomic::{AtomicUsize, Ordering};

use angular_compiler::expression_parser::{LiteralValue, ParseSpan, AST};
use angular_compiler::ml_parser::ast::NodeKind;
use angular_compiler::template_parser::{TemplateAst, TemplateAstRef};
use angular_compiler::StaticSymbol;

use crate::error::EvaluationError;
use crate::symbols::{
    BuiltinType, HostSymbol, Symbol, SymbolId, SymbolKind, SymbolQuery, SymbolTable,
};
use crate::html_path::HtmlAstPath;
use crate::template_path::{binding_at, PathBinding, TemplateAstPath};
use crate::types::{Definition, Location, Span};
use crate::utils::span_of_source;

/// Host id of symbols declared by templates themselves.
const TEMPLATE_HOST: usize = usize::MAX;

static NEXT_TEMPLATE_SYMBOL: AtomicUsize = AtomicUsize::new(0);

/// A template reference (`#name`) or template variable (`let-name`).
struct TemplateVariable {
    id: SymbolId,
    name: String,
    kind: SymbolKind,
    ty: Symbol,
    definition: Option<Definition>,
}

impl TemplateVariable {
    fn symbol(name: &str, kind: SymbolKind, ty: Symbol, definition: Option<Definition>) -> Symbol {
        Symbol::new(TemplateVariable {
            id: SymbolId::new(
                TEMPLATE_HOST,
                NEXT_TEMPLATE_SYMBOL.fetch_add(1, Ordering::Relaxed),
            ),
            name: name.to_string(),
            kind,
            ty,
            definition,
        })
    }
}

impl HostSymbol for TemplateVariable {
    fn id(&self) -> SymbolId {
        self.id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> SymbolKind {
        self.kind
    }

    fn language(&self) -> &'static str {
        "ng-template"
    }

    fn type_(&self) -> Option<Symbol> {
        Some(self.ty.clone())
    }

    fn definition(&self) -> Option<Definition> {
        self.definition.clone()
    }

    fn members(&self) -> SymbolTable {
        self.ty.members()
    }

    fn super_type_of(&self, other: &Symbol) -> bool {
        self.ty.super_type_of(other)
    }
}

/// A symbol found under a position together with the span of the name.
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub symbol: Symbol,
    pub span: Span,
}

/// A binding expression under a template position.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionAt<'a> {
    pub binding: PathBinding<'a>,
    /// Where the expression source sits in the template.
    pub span: Span,
}

impl<'a> ExpressionAt<'a> {
    /// Finds the binding under the position shared by both paths. For
    /// attribute bindings the expression is the attribute value; for bound
    /// text it is the whole text.
    pub fn find(html_path: &HtmlAstPath<'a>, template_path: &TemplateAstPath<'a>) -> Option<Self> {
        let binding = binding_at(template_path)?;
        let span = match binding {
            PathBinding::Text(text) => span_of_source(&text.source_span),
            _ => {
                let attribute = html_path.first(NodeKind::Attribute)?.as_attribute()?;
                span_of_source(attribute.value_span.as_ref()?)
            }
        };
        Some(ExpressionAt { binding, span })
    }

    pub fn is_event(&self) -> bool {
        matches!(self.binding, PathBinding::Event(_))
    }
}

/// Where template-declared symbols are reported as defined.
#[derive(Debug, Clone, Copy)]
pub struct TemplateOrigin<'a> {
    pub file_name: &'a str,
    /// Offset of the template in the file.
    pub offset: usize,
}

impl TemplateOrigin<'_> {
    fn definition(&self, start: usize, end: usize) -> Option<Definition> {
        Some(vec![Location {
            file_name: self.file_name.to_string(),
            span: Span::new(start + self.offset, end + self.offset),
        }])
    }
}

/// The names visible to expressions at the end of `path`: members of the
/// component, every reference in the template, the variables of enclosing
/// embedded templates and, inside event handlers, `$event`.
pub fn get_template_scope(
    query: &dyn SymbolQuery,
    component: &StaticSymbol,
    template_ast: &[TemplateAst],
    path: &TemplateAstPath<'_>,
    origin: TemplateOrigin<'_>,
    include_event: bool,
) -> SymbolTable {
    let any = query.get_builtin_type(BuiltinType::Any);
    let members = query
        .get_type_symbol(component)
        .map(|c| c.members())
        .unwrap_or_default();

    let mut references = SymbolTable::new();
    collect_references(query, template_ast, origin, &mut references);
    let base = SymbolTable::merge([members, references]);

    let mut variables = SymbolTable::new();
    for node in path.nodes() {
        let TemplateAstRef::EmbeddedTemplate(template) = node else {
            continue;
        };
        for variable in &template.variables {
            let ty = variable_type(query, &base, *node, &variable.value).unwrap_or_else(|| any.clone());
            let span = &variable.source_span;
            let symbol = TemplateVariable::symbol(
                &variable.name,
                SymbolKind::Variable,
                ty,
                origin.definition(span.start.offset, span.end.offset),
            );
            variables.insert_as(variable.name.clone(), symbol);
        }
    }

    let mut event = SymbolTable::new();
    if include_event {
        event.insert_as("$event", TemplateVariable::symbol("$event", SymbolKind::Variable, any, None));
    }
    SymbolTable::merge([base, variables, event])
}

fn collect_references(
    query: &dyn SymbolQuery,
    nodes: &[TemplateAst],
    origin: TemplateOrigin<'_>,
    table: &mut SymbolTable,
) {
    for node in nodes {
        let node = node.as_ref();
        for reference in node.references() {
            let ty = query
                .get_type_symbol(&reference.value)
                .unwrap_or_else(|| query.get_builtin_type(BuiltinType::Any));
            let span = &reference.source_span;
            let symbol = TemplateVariable::symbol(
                &reference.name,
                SymbolKind::Reference,
                ty,
                origin.definition(span.start.offset, span.end.offset),
            );
            table.insert_as(reference.name.clone(), symbol);
        }
        match node {
            TemplateAstRef::Element(element) => {
                collect_references(query, &element.children, origin, table)
            }
            TemplateAstRef::EmbeddedTemplate(template) => {
                collect_references(query, &template.children, origin, table)
            }
            _ => {}
        }
    }
}

/// The type of a variable of an embedded template. `$implicit` of a
/// template iterating with `ngForOf` is the element type of the iterated
/// value; the other iteration context fields have fixed types.
fn variable_type(
    query: &dyn SymbolQuery,
    scope: &SymbolTable,
    template: TemplateAstRef<'_>,
    value: &str,
) -> Option<Symbol> {
    let iterated = template.directives().iter().find_map(|directive| {
        directive
            .inputs
            .iter()
            .find(|input| input.template_name == "ngForOf")
    });
    match value {
        "$implicit" => {
            let input = iterated?;
            let ty = AstType::new(scope, query).get_type(&input.value.ast).ok()?;
            query.get_element_type(&ty)
        }
        "index" | "count" if iterated.is_some() => Some(query.get_builtin_type(BuiltinType::Number)),
        "first" | "last" | "even" | "odd" if iterated.is_some() => {
            Some(query.get_builtin_type(BuiltinType::Boolean))
        }
        _ => None,
    }
}

/// Computes the static type of an expression.
pub struct AstType<'a> {
    scope: &'a SymbolTable,
    query: &'a dyn SymbolQuery,
}

impl<'a> AstType<'a> {
    pub fn new(scope: &'a SymbolTable, query: &'a dyn SymbolQuery) -> Self {
        AstType { scope, query }
    }

    fn builtin(&self, kind: BuiltinType) -> Symbol {
        self.query.get_builtin_type(kind)
    }

    /// The value type a symbol stands for in an expression.
    fn value_type(&self, symbol: &Symbol) -> Symbol {
        symbol
            .type_()
            .unwrap_or_else(|| self.builtin(BuiltinType::Any))
    }

    /// The member `name` of `receiver`, or a name in scope.
    pub fn resolve_member(&self, receiver: &AST, name: &str) -> Result<Option<Symbol>, EvaluationError> {
        if receiver.is_implicit_receiver() {
            return Ok(self.scope.get(name).cloned());
        }
        let receiver_type = self.get_type(receiver)?;
        Ok(receiver_type.members().get(name).cloned())
    }

    pub fn get_type(&self, ast: &AST) -> Result<Symbol, EvaluationError> {
        match ast {
            AST::EmptyExpr(_) => Ok(self.builtin(BuiltinType::Any)),
            AST::ImplicitReceiver(_) => Err(EvaluationError::Unsupported("implicit receiver")),
            AST::Chain(chain) => match chain.expressions.last() {
                Some(last) => self.get_type(last),
                None => Ok(self.builtin(BuiltinType::Undefined)),
            },
            AST::Conditional(conditional) => {
                let when_true = self.get_type(&conditional.true_exp)?;
                let when_false = self.get_type(&conditional.false_exp)?;
                Ok(self.query.get_type_union(&[when_true, when_false]))
            }
            AST::PropertyRead(read) => self.read_type(&read.receiver, &read.name),
            AST::SafePropertyRead(read) => self.read_type(&read.receiver, &read.name),
            AST::PropertyWrite(write) => self.get_type(&write.value),
            AST::KeyedRead(read) => {
                let receiver = self.get_type(&read.receiver)?;
                let key = self.get_type(&read.key)?;
                Ok(receiver
                    .indexed(&key)
                    .unwrap_or_else(|| self.builtin(BuiltinType::Any)))
            }
            AST::KeyedWrite(write) => self.get_type(&write.value),
            AST::BindingPipe(_) => Ok(self.builtin(BuiltinType::Any)),
            AST::LiteralPrimitive(literal) => Ok(self.builtin(match literal.value {
                LiteralValue::String(_) => BuiltinType::String,
                LiteralValue::Number(_) => BuiltinType::Number,
                LiteralValue::Boolean(_) => BuiltinType::Boolean,
                LiteralValue::Null => BuiltinType::Null,
                LiteralValue::Undefined => BuiltinType::Undefined,
            })),
            AST::LiteralArray(array) => {
                let elements = array
                    .expressions
                    .iter()
                    .map(|e| self.get_type(e))
                    .collect::<Result<Vec<_>, _>>()?;
                let element = if elements.is_empty() {
                    self.builtin(BuiltinType::Any)
                } else {
                    self.query.get_type_union(&elements)
                };
                Ok(self.query.get_array_type(&element))
            }
            AST::LiteralMap(_) => Err(EvaluationError::Unsupported("object literal")),
            AST::Interpolation(_) => Ok(self.builtin(BuiltinType::String)),
            AST::Binary(binary) => self.binary_type(&binary.operation, &binary.left, &binary.right),
            AST::PrefixNot(_) => Ok(self.builtin(BuiltinType::Boolean)),
            AST::NonNullAssert(assert) => self.get_type(&assert.expression),
            AST::MethodCall(call) => self.call_type(&call.receiver, &call.name, &call.args),
            AST::SafeMethodCall(call) => self.call_type(&call.receiver, &call.name, &call.args),
            AST::FunctionCall(_) => Err(EvaluationError::Unsupported("function call")),
        }
    }

    fn read_type(&self, receiver: &AST, name: &str) -> Result<Symbol, EvaluationError> {
        match self.resolve_member(receiver, name)? {
            Some(symbol) => Ok(self.value_type(&symbol)),
            None if receiver.is_implicit_receiver() => Err(EvaluationError::Undefined(name.to_string())),
            None => Ok(self.builtin(BuiltinType::Any)),
        }
    }

    fn call_type(&self, receiver: &AST, name: &str, args: &[AST]) -> Result<Symbol, EvaluationError> {
        let Some(method) = self.resolve_member(receiver, name)? else {
            return if receiver.is_implicit_receiver() {
                Err(EvaluationError::Undefined(name.to_string()))
            } else {
                Ok(self.builtin(BuiltinType::Any))
            };
        };
        let arguments = args
            .iter()
            .map(|arg| self.get_type(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(method
            .select_signature(&arguments)
            .and_then(|signature| signature.result)
            .unwrap_or_else(|| self.builtin(BuiltinType::Any)))
    }

    fn binary_type(&self, operation: &str, left: &AST, right: &AST) -> Result<Symbol, EvaluationError> {
        let left = self.get_type(left)?;
        let right = self.get_type(right)?;
        let string = self.builtin(BuiltinType::String);
        Ok(match operation {
            "+" if left == string || right == string => string,
            "+" | "-" | "*" | "/" | "%" => self.builtin(BuiltinType::Number),
            "==" | "!=" | "===" | "!==" | "<" | ">" | "<=" | ">=" => {
                self.builtin(BuiltinType::Boolean)
            }
            "&&" => right,
            "||" => self.query.get_type_union(&[left, right]),
            _ => self.builtin(BuiltinType::Any),
        })
    }
}

/// Innermost property read, write or method call whose name covers
/// `position`; `inclusive_end` also accepts a position just past the name.
fn find_named<'a>(ast: &'a AST, position: usize, inclusive_end: bool) -> Option<&'a AST> {
    for child in ast.children() {
        if let Some(found) = find_named(child, position, inclusive_end) {
            return Some(found);
        }
    }
    let covers = |span: &ParseSpan| {
        span.contains(position) || (inclusive_end && position == span.end)
    };
    match ast {
        AST::PropertyRead(read) if covers(&read.name_span) => Some(ast),
        AST::SafePropertyRead(read) if covers(&read.name_span) => Some(ast),
        AST::PropertyWrite(write) if covers(&write.name_span) => Some(ast),
        AST::MethodCall(call) if covers(&call.name_span) => Some(ast),
        AST::SafeMethodCall(call) if covers(&call.name_span) => Some(ast),
        _ => None,
    }
}

fn receiver_and_name(ast: &AST) -> Option<(&AST, &str, ParseSpan)> {
    match ast {
        AST::PropertyRead(read) => Some((&read.receiver, &read.name, read.name_span)),
        AST::SafePropertyRead(read) => Some((&read.receiver, &read.name, read.name_span)),
        AST::PropertyWrite(write) => Some((&write.receiver, &write.name, write.name_span)),
        AST::MethodCall(call) => Some((&call.receiver, &call.name, call.name_span)),
        AST::SafeMethodCall(call) => Some((&call.receiver, &call.name, call.name_span)),
        _ => None,
    }
}

/// The symbol named at `position` (relative to the expression source).
pub fn get_expression_symbol(
    scope: &SymbolTable,
    ast: &AST,
    position: usize,
    query: &dyn SymbolQuery,
) -> Option<SymbolInfo> {
    let node = find_named(ast, position, false)?;
    let (receiver, name, name_span) = receiver_and_name(node)?;
    let symbol = AstType::new(scope, query)
        .resolve_member(receiver, name)
        .ok()
        .flatten()?;
    Some(SymbolInfo {
        symbol,
        span: Span::new(name_span.start, name_span.end),
    })
}

/// The symbols that can complete the name being typed at `position`: the
/// members of the receiver when completing after a `.`, else everything in
/// scope.
pub fn get_expression_completions(
    scope: &SymbolTable,
    ast: &AST,
    position: usize,
    query: &dyn SymbolQuery,
) -> SymbolTable {
    let receiver = find_named(ast, position, true)
        .and_then(receiver_and_name)
        .map(|(receiver, _, _)| receiver);
    match receiver {
        Some(receiver) if !receiver.is_implicit_receiver() => AstType::new(scope, query)
            .get_type(receiver)
            .map(|ty| ty.members())
            .unwrap_or_default(),
        _ => scope.clone(),
    }
}
