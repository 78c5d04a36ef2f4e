//! Type model shared by the typebind crates.
//!
//! Classes and type variables are interned into a [`TypeStore`] and referred to by small ids, so
//! two type variables that happen to share a name (`T` on `List` and `T` on `Comparable`) never
//! collide. The store is the static metadata table that generic resolution queries through
//! [`TypeEnv`].

use serde::{Deserialize, Serialize};

mod format;
mod store;

pub use format::{format_type, simple_name, TypeDisplay};
pub use store::{TypeStore, WellKnownTypes};

/// Interned id of a class, interface, or primitive in a [`TypeStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

/// Identity of a declared type variable.
///
/// Resolution keys on this id, never on the variable's name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId(u32);

impl TypeVarId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    /// `int`, `boolean`, ... Registered so they can appear as concrete field/method types.
    Primitive,
}

/// A generic class applied to an ordered list of type arguments, e.g. `Pair<String, Integer>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassType {
    pub def: ClassId,
    pub args: Vec<Type>,
}

/// A type expression: either declared (from a field/method/supertype signature) or resolved.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// A class used without type arguments (`String`, `int`, or a raw `List`).
    Concrete(ClassId),
    /// A reference to a declared type variable (`L`).
    TypeVar(TypeVarId),
    /// A class applied to type arguments (`Pair<L, R>`).
    Parameterized(ClassType),
}

impl Type {
    /// Build a class type; an empty argument list yields [`Type::Concrete`].
    pub fn class(def: ClassId, args: Vec<Type>) -> Self {
        if args.is_empty() {
            Type::Concrete(def)
        } else {
            Type::Parameterized(ClassType { def, args })
        }
    }

    /// The class this type refers to, ignoring type arguments. `None` for type variables.
    pub fn raw_class(&self) -> Option<ClassId> {
        match self {
            Type::Concrete(id) => Some(*id),
            Type::Parameterized(ClassType { def, .. }) => Some(*def),
            Type::TypeVar(_) => None,
        }
    }

    /// Whether a type variable occurs anywhere in this type.
    pub fn mentions_type_vars(&self) -> bool {
        match self {
            Type::Concrete(_) => false,
            Type::TypeVar(_) => true,
            Type::Parameterized(ClassType { args, .. }) => {
                args.iter().any(Type::mentions_type_vars)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: String,
    /// The class that declares this variable (for method-level variables, the method's class).
    pub owner: ClassId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    /// Method-level type variables (`<T> T identity(T)`).
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<Type>,
    /// `None` for `void`.
    pub return_type: Option<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    /// Binary name, e.g. `com.example.Outer$Inner`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    /// Directly declared interfaces (for an interface: the interfaces it extends).
    pub interfaces: Vec<Type>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    /// A definition with no supertypes and no members.
    pub fn empty(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// First method with the given name; overloads are not distinguished.
    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Read access to type metadata.
///
/// This is the provider generic resolution is built on: it exposes each type's declared type
/// parameters, the generic form of its direct superclass, and the generic forms of its directly
/// declared interfaces.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;

    /// Name of `id`, including classes that are known by name only.
    fn class_name(&self, id: ClassId) -> Option<&str> {
        self.class(id).map(|def| def.name.as_str())
    }

    fn type_params(&self, id: ClassId) -> &[TypeVarId] {
        self.class(id)
            .map(|def| def.type_params.as_slice())
            .unwrap_or(&[])
    }

    fn generic_superclass(&self, id: ClassId) -> Option<&Type> {
        self.class(id).and_then(|def| def.super_class.as_ref())
    }

    fn generic_interfaces(&self, id: ClassId) -> &[Type] {
        self.class(id)
            .map(|def| def.interfaces.as_slice())
            .unwrap_or(&[])
    }
}
