//! Static Types
//!
//! A small in-memory type universe that implements [`HostSymbol`] and
//! [`SymbolQuery`]. Projects without a type checker declare their component
//! classes and exported values here; tests use it to build exact type
//! shapes.
//!
//! Structural types (instances, unions, intersections, object literals) are
//! interned, so two structurally equal types are the same symbol. Classes
//! are nominal: a class is a subtype of another only through its base
//! chain.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use angular_compiler::StaticSymbol;
use bitflags::bitflags;
use indexmap::{IndexMap, IndexSet};

use crate::symbols::{
    BuiltinType, HostSymbol, Signature, Symbol, SymbolId, SymbolKind, SymbolQuery, SymbolTable,
};
use crate::types::{Definition, Location, Span};

static NEXT_HOST: AtomicUsize = AtomicUsize::new(1);

const LIB_FILE: &str = "lib.d.ts";

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemberFlags: u8 {
        const INPUT = 1 << 0;
        const OUTPUT = 1 << 1;
        const METHOD = 1 << 2;
        const PRIVATE = 1 << 3;
    }
}

type TypeId = usize;
type ClassId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TypeKey {
    Primitive(BuiltinType),
    Class(ClassId),
    Instance(ClassId, Vec<TypeId>),
    Parameter(ClassId, usize),
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    Object(Vec<(String, TypeId)>),
    Member(TypeId, String),
    Value(usize),
}

#[derive(Debug, Clone)]
struct MemberInfo {
    ty: TypeId,
    flags: MemberFlags,
    file: String,
    span: Span,
}

#[derive(Debug)]
struct ClassData {
    file: String,
    name: String,
    parameters: Vec<String>,
    base: Option<TypeId>,
    members: IndexMap<String, MemberInfo>,
    span: Span,
}

#[derive(Debug)]
struct ValueData {
    file: String,
    name: String,
    ty: TypeId,
    span: Span,
}

#[derive(Debug)]
struct Universe {
    host: usize,
    keys: RefCell<IndexSet<TypeKey>>,
    classes: RefCell<Vec<ClassData>>,
    values: RefCell<Vec<ValueData>>,
    declarations: RefCell<HashMap<(String, String), TypeId>>,
    array: ClassId,
}

impl Universe {
    fn intern(&self, key: TypeKey) -> TypeId {
        self.keys.borrow_mut().insert_full(key).0
    }

    fn key(&self, id: TypeId) -> TypeKey {
        self.keys
            .borrow()
            .get_index(id)
            .cloned()
            .unwrap_or(TypeKey::Primitive(BuiltinType::Unbound))
    }

    fn primitive(&self, kind: BuiltinType) -> TypeId {
        self.intern(TypeKey::Primitive(kind))
    }

    fn add_class(&self, file: &str, name: &str, parameters: &[&str]) -> ClassId {
        let mut classes = self.classes.borrow_mut();
        classes.push(ClassData {
            file: file.to_string(),
            name: name.to_string(),
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            base: None,
            members: IndexMap::new(),
            span: Span::default(),
        });
        classes.len() - 1
    }

    fn class_name(&self, class: ClassId) -> String {
        self.classes
            .borrow()
            .get(class)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    /// Values and members stand for their declared types.
    fn type_of(&self, id: TypeId) -> TypeId {
        match self.key(id) {
            TypeKey::Value(value) => self
                .values
                .borrow()
                .get(value)
                .map(|v| v.ty)
                .unwrap_or_else(|| self.primitive(BuiltinType::Unbound)),
            TypeKey::Member(owner, name) => self
                .members_of(owner)
                .get(&name)
                .map(|m| m.ty)
                .unwrap_or_else(|| self.primitive(BuiltinType::Unbound)),
            _ => id,
        }
    }

    fn substitute(&self, ty: TypeId, class: ClassId, arguments: &[TypeId]) -> TypeId {
        match self.key(ty) {
            TypeKey::Parameter(owner, index) if owner == class => {
                arguments.get(index).copied().unwrap_or(ty)
            }
            TypeKey::Instance(generic, args) => {
                let args = args
                    .iter()
                    .map(|a| self.substitute(*a, class, arguments))
                    .collect();
                self.intern(TypeKey::Instance(generic, args))
            }
            TypeKey::Union(types) => {
                let types = types
                    .iter()
                    .map(|t| self.substitute(*t, class, arguments))
                    .collect();
                self.intern(TypeKey::Union(types))
            }
            TypeKey::Intersection(types) => {
                let types = types
                    .iter()
                    .map(|t| self.substitute(*t, class, arguments))
                    .collect();
                self.intern(TypeKey::Intersection(types))
            }
            TypeKey::Object(fields) => {
                let fields = fields
                    .into_iter()
                    .map(|(name, t)| (name, self.substitute(t, class, arguments)))
                    .collect();
                self.intern(TypeKey::Object(fields))
            }
            _ => ty,
        }
    }

    fn class_members(&self, class: ClassId) -> IndexMap<String, MemberInfo> {
        let (base, own) = {
            let classes = self.classes.borrow();
            match classes.get(class) {
                Some(data) => (data.base, data.members.clone()),
                None => return IndexMap::new(),
            }
        };
        let mut members = base.map(|b| self.members_of(b)).unwrap_or_default();
        members.extend(own);
        members
    }

    fn members_of(&self, ty: TypeId) -> IndexMap<String, MemberInfo> {
        match self.key(ty) {
            TypeKey::Class(class) => self.class_members(class),
            TypeKey::Instance(class, arguments) => self
                .class_members(class)
                .into_iter()
                .map(|(name, mut info)| {
                    info.ty = self.substitute(info.ty, class, &arguments);
                    (name, info)
                })
                .collect(),
            TypeKey::Object(fields) => fields
                .into_iter()
                .map(|(name, ty)| {
                    let info = MemberInfo {
                        ty,
                        flags: MemberFlags::empty(),
                        file: String::new(),
                        span: Span::default(),
                    };
                    (name, info)
                })
                .collect(),
            TypeKey::Intersection(types) => {
                let mut members = IndexMap::new();
                for t in types {
                    members.extend(self.members_of(t));
                }
                members
            }
            TypeKey::Value(_) | TypeKey::Member(..) => self.members_of(self.type_of(ty)),
            _ => IndexMap::new(),
        }
    }

    fn base_of(&self, ty: TypeId) -> Option<TypeId> {
        match self.key(ty) {
            TypeKey::Class(class) => self.classes.borrow().get(class).and_then(|c| c.base),
            TypeKey::Instance(class, arguments) => {
                let base = self.classes.borrow().get(class).and_then(|c| c.base)?;
                Some(self.substitute(base, class, &arguments))
            }
            _ => None,
        }
    }

    /// Whether `ty` is `class` itself or one of its descendants.
    fn derives_from(&self, ty: TypeId, class: ClassId) -> bool {
        let mut current = Some(ty);
        while let Some(ty) = current {
            if matches!(self.key(ty), TypeKey::Class(c) | TypeKey::Instance(c, _) if c == class) {
                return true;
            }
            current = self.base_of(ty);
        }
        false
    }

    fn is_nominal(key: &TypeKey) -> bool {
        matches!(key, TypeKey::Class(_) | TypeKey::Instance(..))
    }

    /// Whether a value of type `source` can be used where `target` is
    /// expected.
    fn is_assignable(&self, source: TypeId, target: TypeId) -> bool {
        let source = self.type_of(source);
        let target = self.type_of(target);
        if source == target {
            return true;
        }
        let source_key = self.key(source);
        let target_key = self.key(target);
        if matches!(source_key, TypeKey::Primitive(BuiltinType::Any))
            || matches!(target_key, TypeKey::Primitive(BuiltinType::Any))
        {
            return true;
        }
        match (&source_key, &target_key) {
            (TypeKey::Union(types), _) => types.iter().all(|t| self.is_assignable(*t, target)),
            (_, TypeKey::Union(types)) => types.iter().any(|t| self.is_assignable(source, *t)),
            (_, TypeKey::Intersection(types)) => {
                types.iter().all(|t| self.is_assignable(source, *t))
            }
            (TypeKey::Intersection(types), _) => {
                types.iter().any(|t| self.is_assignable(*t, target))
            }
            (s, t) if Self::is_nominal(s) && Self::is_nominal(t) => {
                let mut current = self.base_of(source);
                while let Some(base) = current {
                    if base == target {
                        return true;
                    }
                    current = self.base_of(base);
                }
                false
            }
            (_, TypeKey::Object(fields)) => {
                let members = self.members_of(source);
                fields.iter().all(|(name, ty)| {
                    members
                        .get(name)
                        .is_some_and(|member| self.is_assignable(member.ty, *ty))
                })
            }
            _ => false,
        }
    }

    fn type_name(&self, id: TypeId) -> String {
        let join = |types: &[TypeId], separator: &str| {
            types
                .iter()
                .map(|t| self.type_name(*t))
                .collect::<Vec<_>>()
                .join(separator)
        };
        match self.key(id) {
            TypeKey::Primitive(kind) => primitive_name(kind).to_string(),
            TypeKey::Class(class) => self.class_name(class),
            TypeKey::Instance(class, arguments) if class == self.array => {
                format!("{}[]", join(&arguments, ", "))
            }
            TypeKey::Instance(class, arguments) => {
                format!("{}<{}>", self.class_name(class), join(&arguments, ", "))
            }
            TypeKey::Parameter(class, index) => self
                .classes
                .borrow()
                .get(class)
                .and_then(|c| c.parameters.get(index).cloned())
                .unwrap_or_default(),
            TypeKey::Union(types) => join(&types, " | "),
            TypeKey::Intersection(types) => join(&types, " & "),
            TypeKey::Object(fields) => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|(name, ty)| format!("{}: {}", name, self.type_name(*ty)))
                    .collect();
                format!("{{ {} }}", fields.join("; "))
            }
            TypeKey::Member(_, name) => name,
            TypeKey::Value(value) => self
                .values
                .borrow()
                .get(value)
                .map(|v| v.name.clone())
                .unwrap_or_default(),
        }
    }
}

fn primitive_name(kind: BuiltinType) -> &'static str {
    match kind {
        BuiltinType::Any => "any",
        BuiltinType::Boolean => "boolean",
        BuiltinType::Null => "null",
        BuiltinType::Number => "number",
        BuiltinType::String => "string",
        BuiltinType::Undefined => "undefined",
        BuiltinType::Unbound => "unbound",
    }
}

/// One type, member or value of a [`StaticTypes`] universe.
struct StaticTypeSymbol {
    universe: Rc<Universe>,
    id: TypeId,
}

impl StaticTypeSymbol {
    fn symbol(&self, id: TypeId) -> Symbol {
        Symbol::new(StaticTypeSymbol {
            universe: self.universe.clone(),
            id,
        })
    }

    fn key(&self) -> TypeKey {
        self.universe.key(self.id)
    }

    fn member_info(&self) -> Option<MemberInfo> {
        match self.key() {
            TypeKey::Member(owner, name) => self.universe.members_of(owner).get(&name).cloned(),
            _ => None,
        }
    }

    fn location(file: &str, span: Span) -> Definition {
        vec![Location {
            file_name: file.to_string(),
            span,
        }]
    }
}

impl HostSymbol for StaticTypeSymbol {
    fn id(&self) -> SymbolId {
        SymbolId::new(self.universe.host, self.id)
    }

    fn name(&self) -> String {
        self.universe.type_name(self.id)
    }

    fn kind(&self) -> SymbolKind {
        match self.key() {
            TypeKey::Primitive(_) => SymbolKind::Primitive,
            TypeKey::Parameter(..) => SymbolKind::TypeParameter,
            TypeKey::Member(..) => match self.member_info() {
                Some(info) if info.flags.contains(MemberFlags::METHOD) => SymbolKind::Method,
                _ => SymbolKind::Property,
            },
            TypeKey::Value(_) => SymbolKind::Variable,
            _ => SymbolKind::Type,
        }
    }

    fn type_(&self) -> Option<Symbol> {
        match self.key() {
            TypeKey::Member(..) => match self.member_info() {
                Some(info) if !info.flags.contains(MemberFlags::METHOD) => {
                    Some(self.symbol(info.ty))
                }
                _ => None,
            },
            TypeKey::Value(_) => Some(self.symbol(self.universe.type_of(self.id))),
            _ => None,
        }
    }

    fn container(&self) -> Option<Symbol> {
        match self.key() {
            TypeKey::Member(owner, _) => Some(self.symbol(owner)),
            _ => None,
        }
    }

    fn is_public(&self) -> bool {
        !self
            .member_info()
            .is_some_and(|info| info.flags.contains(MemberFlags::PRIVATE))
    }

    fn is_callable(&self) -> bool {
        self.member_info()
            .is_some_and(|info| info.flags.contains(MemberFlags::METHOD))
    }

    fn definition(&self) -> Option<Definition> {
        match self.key() {
            TypeKey::Class(class) | TypeKey::Instance(class, _) => {
                let classes = self.universe.classes.borrow();
                let data = classes.get(class)?;
                Some(Self::location(&data.file, data.span))
            }
            TypeKey::Member(..) => {
                let info = self.member_info()?;
                Some(Self::location(&info.file, info.span))
            }
            TypeKey::Value(value) => {
                let values = self.universe.values.borrow();
                let data = values.get(value)?;
                Some(Self::location(&data.file, data.span))
            }
            _ => None,
        }
    }

    fn is_open_type_parameter(&self) -> bool {
        matches!(self.key(), TypeKey::Parameter(..))
    }

    fn is_input_property(&self) -> bool {
        self.member_info()
            .is_some_and(|info| info.flags.contains(MemberFlags::INPUT))
    }

    fn is_union_type(&self) -> bool {
        matches!(self.key(), TypeKey::Union(_))
    }

    fn is_intersection_type(&self) -> bool {
        matches!(self.key(), TypeKey::Intersection(_))
    }

    fn members(&self) -> SymbolTable {
        let owner = self.universe.type_of(self.id);
        let names: Vec<String> = self.universe.members_of(owner).into_keys().collect();
        let mut table = SymbolTable::new();
        for name in names {
            let member = self.universe.intern(TypeKey::Member(owner, name.clone()));
            table.insert_as(name, self.symbol(member));
        }
        table
    }

    fn signatures(&self) -> Vec<Signature> {
        match self.member_info() {
            Some(info) if info.flags.contains(MemberFlags::METHOD) => vec![Signature {
                arguments: SymbolTable::new(),
                result: Some(self.symbol(info.ty)),
            }],
            _ => Vec::new(),
        }
    }

    fn indexed(&self, _argument: &Symbol) -> Option<Symbol> {
        match self.universe.key(self.universe.type_of(self.id)) {
            TypeKey::Instance(class, arguments) if class == self.universe.array => {
                arguments.first().map(|element| self.symbol(*element))
            }
            _ => None,
        }
    }

    fn type_arguments(&self) -> Option<Vec<Symbol>> {
        match self.key() {
            TypeKey::Instance(_, arguments) => {
                Some(arguments.iter().map(|a| self.symbol(*a)).collect())
            }
            TypeKey::Class(class) => {
                let count = self
                    .universe
                    .classes
                    .borrow()
                    .get(class)
                    .map_or(0, |c| c.parameters.len());
                if count == 0 {
                    return None;
                }
                Some(
                    (0..count)
                        .map(|index| self.symbol(self.universe.intern(TypeKey::Parameter(class, index))))
                        .collect(),
                )
            }
            _ => None,
        }
    }

    fn generic_type(&self) -> Option<Symbol> {
        match self.key() {
            TypeKey::Instance(class, _) => Some(self.symbol(self.universe.intern(TypeKey::Class(class)))),
            TypeKey::Class(_) if self.type_arguments().is_some() => Some(self.symbol(self.id)),
            _ => None,
        }
    }

    fn constituent_types(&self) -> Vec<Symbol> {
        match self.key() {
            TypeKey::Union(types) | TypeKey::Intersection(types) => {
                types.iter().map(|t| self.symbol(*t)).collect()
            }
            _ => Vec::new(),
        }
    }

    fn super_type_of(&self, other: &Symbol) -> bool {
        let other = other.id();
        other.host == self.universe.host && self.universe.is_assignable(other.index, self.id)
    }
}

/// An in-memory type universe. Cloning shares the universe.
#[derive(Debug, Clone)]
pub struct StaticTypes {
    universe: Rc<Universe>,
}

impl Default for StaticTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticTypes {
    pub fn new() -> Self {
        let universe = Universe {
            host: NEXT_HOST.fetch_add(1, Ordering::Relaxed),
            keys: RefCell::new(IndexSet::new()),
            classes: RefCell::new(Vec::new()),
            values: RefCell::new(Vec::new()),
            declarations: RefCell::new(HashMap::new()),
            array: 0,
        };
        let array = universe.add_class(LIB_FILE, "Array", &["T"]);
        let universe = Universe { array, ..universe };
        let number = universe.primitive(BuiltinType::Number);
        if let Some(data) = universe.classes.borrow_mut().get_mut(array) {
            data.members.insert(
                "length".to_string(),
                MemberInfo {
                    ty: number,
                    flags: MemberFlags::empty(),
                    file: LIB_FILE.to_string(),
                    span: Span::default(),
                },
            );
        }
        StaticTypes {
            universe: Rc::new(universe),
        }
    }

    fn symbol(&self, id: TypeId) -> Symbol {
        Symbol::new(StaticTypeSymbol {
            universe: self.universe.clone(),
            id,
        })
    }

    /// The id of a symbol of this universe; foreign symbols read as `any`.
    fn id_of(&self, symbol: &Symbol) -> TypeId {
        let id = symbol.id();
        if id.host == self.universe.host {
            id.index
        } else {
            tracing::debug!(symbol = ?symbol, "symbol from another universe read as any");
            self.universe.primitive(BuiltinType::Any)
        }
    }

    fn class_of(&self, symbol: &Symbol) -> Option<ClassId> {
        match self.universe.key(self.id_of(symbol)) {
            TypeKey::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn primitive(&self, kind: BuiltinType) -> Symbol {
        self.symbol(self.universe.primitive(kind))
    }

    /// Declares a class; `parameters` names its type parameters.
    pub fn declare_class(&self, file: &str, name: &str, parameters: &[&str]) -> Symbol {
        let class = self.universe.add_class(file, name, parameters);
        let id = self.universe.intern(TypeKey::Class(class));
        self.universe
            .declarations
            .borrow_mut()
            .insert((file.to_string(), name.to_string()), id);
        self.symbol(id)
    }

    pub fn type_parameter(&self, class: &Symbol, index: usize) -> Option<Symbol> {
        let class_id = self.class_of(class)?;
        let count = self
            .universe
            .classes
            .borrow()
            .get(class_id)
            .map_or(0, |c| c.parameters.len());
        (index < count).then(|| self.symbol(self.universe.intern(TypeKey::Parameter(class_id, index))))
    }

    /// Sets the base class of `class`. Returns false, leaving the class
    /// unchanged, when `class` is not a class or `base` already derives
    /// from it; base chains stay acyclic.
    pub fn set_base(&self, class: &Symbol, base: &Symbol) -> bool {
        let base = self.id_of(base);
        let Some(class) = self.class_of(class) else {
            return false;
        };
        if self.universe.derives_from(base, class) {
            return false;
        }
        match self.universe.classes.borrow_mut().get_mut(class) {
            Some(data) => {
                data.base = Some(base);
                true
            }
            None => false,
        }
    }

    /// Adds a member to a class and returns the member symbol. For methods
    /// `ty` is the result type.
    pub fn add_member(&self, class: &Symbol, name: &str, ty: &Symbol, flags: MemberFlags) -> Symbol {
        let ty = self.id_of(ty);
        let class_type = self.id_of(class);
        if let Some(class) = self.class_of(class) {
            if let Some(data) = self.universe.classes.borrow_mut().get_mut(class) {
                let info = MemberInfo {
                    ty,
                    flags,
                    file: data.file.clone(),
                    span: Span::default(),
                };
                data.members.insert(name.to_string(), info);
            }
        }
        self.symbol(
            self.universe
                .intern(TypeKey::Member(class_type, name.to_string())),
        )
    }

    pub fn add_property(&self, class: &Symbol, name: &str, ty: &Symbol) -> Symbol {
        self.add_member(class, name, ty, MemberFlags::empty())
    }

    pub fn add_input(&self, class: &Symbol, name: &str, ty: &Symbol) -> Symbol {
        self.add_member(class, name, ty, MemberFlags::INPUT)
    }

    pub fn add_output(&self, class: &Symbol, name: &str, ty: &Symbol) -> Symbol {
        self.add_member(class, name, ty, MemberFlags::OUTPUT)
    }

    pub fn add_method(&self, class: &Symbol, name: &str, result: &Symbol) -> Symbol {
        self.add_member(class, name, result, MemberFlags::METHOD)
    }

    /// `generic<arguments>`. A symbol that is not a generic class is
    /// returned unchanged.
    pub fn instantiate(&self, generic: &Symbol, arguments: &[Symbol]) -> Symbol {
        match self.class_of(generic) {
            Some(class) => {
                let arguments = arguments.iter().map(|a| self.id_of(a)).collect();
                self.symbol(self.universe.intern(TypeKey::Instance(class, arguments)))
            }
            None => generic.clone(),
        }
    }

    pub fn array_of(&self, element: &Symbol) -> Symbol {
        let element = self.id_of(element);
        self.symbol(
            self.universe
                .intern(TypeKey::Instance(self.universe.array, vec![element])),
        )
    }

    fn flatten(&self, types: &[Symbol], union: bool) -> Vec<TypeId> {
        let mut result = IndexSet::new();
        for ty in types {
            let id = self.id_of(ty);
            match self.universe.key(id) {
                TypeKey::Union(inner) if union => result.extend(inner),
                TypeKey::Intersection(inner) if !union => result.extend(inner),
                _ => {
                    result.insert(id);
                }
            }
        }
        result.into_iter().collect()
    }

    pub fn union(&self, types: &[Symbol]) -> Symbol {
        let types = self.flatten(types, true);
        match types.as_slice() {
            [] => self.primitive(BuiltinType::Unbound),
            [single] => self.symbol(*single),
            _ => self.symbol(self.universe.intern(TypeKey::Union(types))),
        }
    }

    pub fn intersection(&self, types: &[Symbol]) -> Symbol {
        let types = self.flatten(types, false);
        match types.as_slice() {
            [] => self.primitive(BuiltinType::Unbound),
            [single] => self.symbol(*single),
            _ => self.symbol(self.universe.intern(TypeKey::Intersection(types))),
        }
    }

    /// An object literal type such as `{ b: number }`.
    pub fn object(&self, fields: &[(&str, Symbol)]) -> Symbol {
        let fields = fields
            .iter()
            .map(|(name, ty)| (name.to_string(), self.id_of(ty)))
            .collect();
        self.symbol(self.universe.intern(TypeKey::Object(fields)))
    }

    /// Declares an exported value such as `export let people: Person[]`.
    pub fn declare_value(&self, file: &str, name: &str, ty: &Symbol) -> Symbol {
        let ty = self.id_of(ty);
        let index = {
            let mut values = self.universe.values.borrow_mut();
            values.push(ValueData {
                file: file.to_string(),
                name: name.to_string(),
                ty,
                span: Span::default(),
            });
            values.len() - 1
        };
        let id = self.universe.intern(TypeKey::Value(index));
        self.universe
            .declarations
            .borrow_mut()
            .insert((file.to_string(), name.to_string()), id);
        self.symbol(id)
    }

    /// Records where a class, member or value is declared.
    pub fn set_definition_span(&self, symbol: &Symbol, span: Span) {
        match self.universe.key(self.id_of(symbol)) {
            TypeKey::Class(class) => {
                if let Some(data) = self.universe.classes.borrow_mut().get_mut(class) {
                    data.span = span;
                }
            }
            TypeKey::Member(owner, name) => {
                if let TypeKey::Class(class) = self.universe.key(owner) {
                    let mut classes = self.universe.classes.borrow_mut();
                    if let Some(member) = classes.get_mut(class).and_then(|c| c.members.get_mut(&name)) {
                        member.span = span;
                    }
                }
            }
            TypeKey::Value(value) => {
                if let Some(data) = self.universe.values.borrow_mut().get_mut(value) {
                    data.span = span;
                }
            }
            _ => {}
        }
    }

    /// A declared class or value by file and name.
    pub fn lookup(&self, file: &str, name: &str) -> Option<Symbol> {
        let id = self
            .universe
            .declarations
            .borrow()
            .get(&(file.to_string(), name.to_string()))
            .copied()?;
        Some(self.symbol(id))
    }
}

impl SymbolQuery for StaticTypes {
    fn get_type_symbol(&self, reference: &StaticSymbol) -> Option<Symbol> {
        self.lookup(&reference.file_path, &reference.name)
    }

    fn get_builtin_type(&self, kind: BuiltinType) -> Symbol {
        self.primitive(kind)
    }

    fn get_array_type(&self, element: &Symbol) -> Symbol {
        self.array_of(element)
    }

    fn get_element_type(&self, ty: &Symbol) -> Option<Symbol> {
        let id = self.universe.type_of(self.id_of(ty));
        match self.universe.key(id) {
            TypeKey::Instance(class, arguments) if class == self.universe.array => {
                arguments.first().map(|element| self.symbol(*element))
            }
            _ => None,
        }
    }

    fn get_type_union(&self, types: &[Symbol]) -> Symbol {
        self.union(types)
    }
}
