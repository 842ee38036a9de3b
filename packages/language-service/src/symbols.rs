//! Symbols
//!
//! A host type system seen through a small capability trait. The resolution
//! code (inference, expression typing, definitions) only talks to
//! [`Symbol`], so any type checker that can answer these questions can back
//! the language service.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use angular_compiler::StaticSymbol;
use indexmap::IndexMap;
use serde::Serialize;

use crate::types::Definition;

/// Identity of a symbol within one host. Two symbols with the same id are
/// the same symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId {
    pub host: usize,
    pub index: usize,
}

impl SymbolId {
    pub fn new(host: usize, index: usize) -> Self {
        SymbolId { host, index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    Component,
    Directive,
    Event,
    Pipe,
    Property,
    Method,
    Type,
    TypeParameter,
    Primitive,
    Variable,
    Reference,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Component => "component",
            SymbolKind::Directive => "directive",
            SymbolKind::Event => "event",
            SymbolKind::Pipe => "pipe",
            SymbolKind::Property => "property",
            SymbolKind::Method => "method",
            SymbolKind::Type => "type",
            SymbolKind::TypeParameter => "type-parameter",
            SymbolKind::Primitive => "primitive",
            SymbolKind::Variable => "variable",
            SymbolKind::Reference => "reference",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The capability a host implements for each of its symbols.
///
/// Only identity, naming and subtyping are required; everything else has a
/// conservative default so a host can start small.
pub trait HostSymbol {
    fn id(&self) -> SymbolId;

    fn name(&self) -> String;

    fn kind(&self) -> SymbolKind;

    fn language(&self) -> &'static str {
        "typescript"
    }

    /// The type of a value symbol, or `None` for symbols that are types.
    fn type_(&self) -> Option<Symbol> {
        None
    }

    fn container(&self) -> Option<Symbol> {
        None
    }

    fn is_public(&self) -> bool {
        true
    }

    fn is_callable(&self) -> bool {
        false
    }

    fn definition(&self) -> Option<Definition> {
        None
    }

    fn is_open_type_parameter(&self) -> bool {
        false
    }

    fn is_input_property(&self) -> bool {
        false
    }

    fn is_union_type(&self) -> bool {
        false
    }

    fn is_intersection_type(&self) -> bool {
        false
    }

    fn members(&self) -> SymbolTable {
        SymbolTable::default()
    }

    fn signatures(&self) -> Vec<Signature> {
        Vec::new()
    }

    fn select_signature(&self, _types: &[Symbol]) -> Option<Signature> {
        self.signatures().into_iter().next()
    }

    /// The result of indexing a value of this type with `argument`.
    fn indexed(&self, _argument: &Symbol) -> Option<Symbol> {
        None
    }

    /// Arguments of an instantiated generic, or parameters of a generic
    /// declaration.
    fn type_arguments(&self) -> Option<Vec<Symbol>> {
        None
    }

    /// The generic declaration this type instantiates.
    fn generic_type(&self) -> Option<Symbol> {
        None
    }

    /// Constituents of a union or intersection.
    fn constituent_types(&self) -> Vec<Symbol> {
        Vec::new()
    }

    /// Whether a value of `other` can be used where this type is expected.
    fn super_type_of(&self, other: &Symbol) -> bool;
}

/// A symbol as seen by the language service: a host symbol, or a host
/// symbol reported under a different kind (a class shown as the component
/// of an element, an output member shown as an event).
#[derive(Clone)]
pub enum Symbol {
    Host(Rc<dyn HostSymbol>),
    Overridden { inner: Box<Symbol>, kind: SymbolKind },
}

impl Symbol {
    pub fn new(host: impl HostSymbol + 'static) -> Self {
        Symbol::Host(Rc::new(host))
    }

    pub fn with_kind(self, kind: SymbolKind) -> Self {
        match self {
            Symbol::Overridden { inner, .. } => Symbol::Overridden { inner, kind },
            host => Symbol::Overridden {
                inner: Box::new(host),
                kind,
            },
        }
    }

    fn host(&self) -> &dyn HostSymbol {
        match self {
            Symbol::Host(host) => host.as_ref(),
            Symbol::Overridden { inner, .. } => inner.host(),
        }
    }

    pub fn id(&self) -> SymbolId {
        self.host().id()
    }

    pub fn name(&self) -> String {
        self.host().name()
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Host(host) => host.kind(),
            Symbol::Overridden { kind, .. } => *kind,
        }
    }

    pub fn language(&self) -> &'static str {
        self.host().language()
    }

    pub fn type_(&self) -> Option<Symbol> {
        self.host().type_()
    }

    pub fn container(&self) -> Option<Symbol> {
        self.host().container()
    }

    pub fn is_public(&self) -> bool {
        self.host().is_public()
    }

    pub fn is_callable(&self) -> bool {
        self.host().is_callable()
    }

    pub fn definition(&self) -> Option<Definition> {
        self.host().definition()
    }

    pub fn is_open_type_parameter(&self) -> bool {
        self.host().is_open_type_parameter()
    }

    pub fn is_input_property(&self) -> bool {
        self.host().is_input_property()
    }

    pub fn is_union_type(&self) -> bool {
        self.host().is_union_type()
    }

    pub fn is_intersection_type(&self) -> bool {
        self.host().is_intersection_type()
    }

    pub fn members(&self) -> SymbolTable {
        self.host().members()
    }

    pub fn signatures(&self) -> Vec<Signature> {
        self.host().signatures()
    }

    pub fn select_signature(&self, types: &[Symbol]) -> Option<Signature> {
        self.host().select_signature(types)
    }

    pub fn indexed(&self, argument: &Symbol) -> Option<Symbol> {
        self.host().indexed(argument)
    }

    pub fn type_arguments(&self) -> Option<Vec<Symbol>> {
        self.host().type_arguments()
    }

    pub fn generic_type(&self) -> Option<Symbol> {
        self.host().generic_type()
    }

    pub fn constituent_types(&self) -> Vec<Symbol> {
        self.host().constituent_types()
    }

    pub fn super_type_of(&self, other: &Symbol) -> bool {
        self.host().super_type_of(other)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({}:{})", self.kind(), self.name(), self.id().host, self.id().index)
    }
}

/// Named symbols in declaration order. Inserting an existing name replaces
/// the earlier symbol.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol.name(), symbol);
    }

    pub fn insert_as(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.symbols.insert(name.into(), symbol);
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.symbols.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }

    /// Later tables shadow earlier ones.
    pub fn merge(tables: impl IntoIterator<Item = SymbolTable>) -> SymbolTable {
        let mut result = SymbolTable::new();
        for table in tables {
            result.symbols.extend(table.symbols);
        }
        result
    }
}

impl FromIterator<Symbol> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut table = SymbolTable::new();
        for symbol in iter {
            table.insert(symbol);
        }
        table
    }
}

#[derive(Debug, Clone)]
pub struct Signature {
    pub arguments: SymbolTable,
    pub result: Option<Symbol>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Any,
    Boolean,
    Null,
    Number,
    String,
    Undefined,
    /// A type that could not be determined.
    Unbound,
}

/// Type queries scoped to one source file, supplied by the host.
pub trait SymbolQuery {
    /// The type symbol declared for a class or exported value.
    fn get_type_symbol(&self, reference: &StaticSymbol) -> Option<Symbol>;

    fn get_builtin_type(&self, kind: BuiltinType) -> Symbol;

    fn get_array_type(&self, element: &Symbol) -> Symbol;

    /// The element type of an array-like type.
    fn get_element_type(&self, ty: &Symbol) -> Option<Symbol>;

    fn get_type_union(&self, types: &[Symbol]) -> Symbol;
}
