use std::collections::HashMap;

use typebind_types::{ClassDef, ClassId, ClassKind, Type, TypeEnv, TypeStore, TypeVarId};

use crate::error::{Error, Result};
use crate::signature::{BaseType, ClassTypeSignature, TypeParameter, TypeSignature};

/// Type variable names visible at some point of a signature.
///
/// Inner scopes (method type parameters) shadow outer ones (class type parameters).
#[derive(Debug, Clone, Default)]
pub struct TypeVarScope {
    vars: HashMap<String, TypeVarId>,
}

impl TypeVarScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, id: TypeVarId) {
        self.vars.insert(name.into(), id);
    }

    pub fn get(&self, name: &str) -> Option<TypeVarId> {
        self.vars.get(name).copied()
    }
}

/// Translates parsed signatures into [`Type`]s against a [`TypeStore`].
pub struct SignatureTranslator<'a> {
    store: &'a mut TypeStore,
    allow_unknown: bool,
}

impl<'a> SignatureTranslator<'a> {
    pub fn new(store: &'a mut TypeStore) -> Self {
        Self {
            store,
            allow_unknown: false,
        }
    }

    /// Intern classes the store has never seen instead of failing with [`Error::UnknownClass`].
    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    /// Allocate ids for `params` (owned by `owner`) and return them with `scope` extended by them.
    ///
    /// Bounds are not translated.
    pub fn declare_type_params(
        &mut self,
        owner: ClassId,
        scope: &TypeVarScope,
        params: &[TypeParameter],
    ) -> (Vec<TypeVarId>, TypeVarScope) {
        let mut scope = scope.clone();
        let ids = params
            .iter()
            .map(|param| {
                let id = self.store.add_type_param(param.name.clone(), owner);
                scope.insert(param.name.clone(), id);
                id
            })
            .collect();
        (ids, scope)
    }

    pub fn ty(&mut self, scope: &TypeVarScope, sig: &TypeSignature) -> Result<Type> {
        match sig {
            TypeSignature::Base(base) => Ok(Type::Concrete(self.primitive(*base))),
            TypeSignature::TypeVar(name) => scope
                .get(name)
                .map(Type::TypeVar)
                .ok_or_else(|| Error::UnknownTypeVariable(name.clone())),
            TypeSignature::Class(class) => self.class_type(scope, class),
        }
    }

    pub fn class_type(&mut self, scope: &TypeVarScope, sig: &ClassTypeSignature) -> Result<Type> {
        let name = sig.binary_name();
        let def = self.class_id(&name)?;
        let args = sig
            .type_args()
            .map(|arg| self.ty(scope, arg))
            .collect::<Result<Vec<_>>>()?;

        // Raw uses (no arguments) are always allowed; placeholders have no arity to check.
        if !args.is_empty() {
            if let Some(class) = self.store.class(def) {
                if class.type_params.len() != args.len() {
                    return Err(Error::ArityMismatch {
                        class: name,
                        expected: class.type_params.len(),
                        found: args.len(),
                    });
                }
            }
        }
        Ok(Type::class(def, args))
    }

    /// Look up a class by binary name (`java.lang.Object`).
    pub fn class_id(&mut self, name: &str) -> Result<ClassId> {
        if let Some(id) = self.store.class_id(name) {
            return Ok(id);
        }
        if self.allow_unknown {
            tracing::debug!(class = name, "interning unknown class as placeholder");
            return Ok(self.store.intern_class_id(name));
        }
        Err(Error::UnknownClass(name.to_string()))
    }

    fn primitive(&mut self, base: BaseType) -> ClassId {
        let name = base.java_name();
        let id = self.store.intern_class_id(name);
        if !self.store.is_defined(id) {
            self.store.define_class(id, ClassDef::empty(name, ClassKind::Primitive));
        }
        id
    }
}
