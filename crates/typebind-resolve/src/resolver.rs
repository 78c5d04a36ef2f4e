use typebind_types::{format_type, ClassId, FieldDef, MethodDef, Type, TypeEnv};

use crate::error::ResolveError;
use crate::members::{find_field, find_method, Member};
use crate::resolved::{ResolvedMethodSignature, ResolvedType};
use crate::substitution::SubstitutionMap;

/// Resolves declared member types against one concrete instantiation.
///
/// Build once per concrete type; every resolution afterwards only reads the precomputed
/// [`SubstitutionMap`], so a resolver can be shared freely across threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericTypeResolver {
    class: ClassId,
    substitution: SubstitutionMap,
}

impl GenericTypeResolver {
    /// `ty` is a class (`StringIntegerType`) or a parameterized type (`Pair<String, Integer>`).
    pub fn new(env: &dyn TypeEnv, ty: &Type) -> Result<Self, ResolveError> {
        let Some(class) = ty.raw_class() else {
            return Err(ResolveError::InvalidInput(format_type(env, ty)));
        };
        let substitution = SubstitutionMap::build(env, ty)?;
        Ok(Self {
            class,
            substitution,
        })
    }

    /// Raw class of the handle this resolver was built for.
    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn substitution(&self) -> &SubstitutionMap {
        &self.substitution
    }

    pub fn resolve_field(&self, declared: &Type) -> ResolvedType {
        resolve_type(declared, &self.substitution)
    }

    /// Resolve each parameter and the return type independently. `None` return means `void`.
    pub fn resolve_method(
        &self,
        params: &[Type],
        return_type: Option<&Type>,
    ) -> ResolvedMethodSignature {
        ResolvedMethodSignature {
            params: params
                .iter()
                .map(|param| resolve_type(param, &self.substitution))
                .collect(),
            return_type: return_type.map(|ty| resolve_type(ty, &self.substitution)),
        }
    }

    /// Find field `name` on the handle's class or its supertypes, nearest declaration first.
    pub fn lookup_field<'env>(
        &self,
        env: &'env dyn TypeEnv,
        name: &str,
    ) -> Result<Member<'env, FieldDef>, ResolveError> {
        find_field(env, self.class, name).ok_or_else(|| ResolveError::UnknownField {
            class: self.class_name(env),
            name: name.to_string(),
        })
    }

    pub fn lookup_method<'env>(
        &self,
        env: &'env dyn TypeEnv,
        name: &str,
    ) -> Result<Member<'env, MethodDef>, ResolveError> {
        find_method(env, self.class, name).ok_or_else(|| ResolveError::UnknownMethod {
            class: self.class_name(env),
            name: name.to_string(),
        })
    }

    /// Look up `name` on the handle's class or its supertypes and resolve its declared type.
    pub fn resolve_field_named(
        &self,
        env: &dyn TypeEnv,
        name: &str,
    ) -> Result<ResolvedType, ResolveError> {
        let field = self.lookup_field(env, name)?;
        Ok(self.resolve_field(&field.def.ty))
    }

    pub fn resolve_method_named(
        &self,
        env: &dyn TypeEnv,
        name: &str,
    ) -> Result<ResolvedMethodSignature, ResolveError> {
        let method = self.lookup_method(env, name)?;
        Ok(self.resolve_method(&method.def.params, method.def.return_type.as_ref()))
    }

    fn class_name(&self, env: &dyn TypeEnv) -> String {
        env.class_name(self.class)
            .map(str::to_string)
            .unwrap_or_else(|| format!("<class#{}>", self.class.to_raw()))
    }
}

/// Resolve one declared type expression against `map`.
///
/// Substitution is a single level: `Pair<List<L>, R>` resolves `R` but leaves `List<L>` as
/// declared.
pub fn resolve_type(declared: &Type, map: &SubstitutionMap) -> ResolvedType {
    let args = match declared {
        Type::Parameterized(class_type) => Some(
            class_type
                .args
                .iter()
                .map(|arg| map.lookup(arg))
                .collect(),
        ),
        Type::TypeVar(_) => Some(vec![map.lookup(declared)]),
        Type::Concrete(_) => None,
    };
    ResolvedType {
        ty: declared.clone(),
        args,
    }
}
