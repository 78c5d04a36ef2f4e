use std::fmt;

use typebind_types::{Type, TypeDisplay, TypeEnv};

/// A declared type expression together with its resolved type arguments.
///
/// `args` is `None` for a non-generic concrete type. Otherwise it holds one entry per argument of
/// the declared expression (or a single entry for a bare type variable), each either the bound
/// type or the original variable when the hierarchy never binds it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedType {
    pub ty: Type,
    pub args: Option<Vec<Type>>,
}

impl ResolvedType {
    pub fn is_generic(&self) -> bool {
        self.args.is_some()
    }

    /// Render as `Pair<L, R> => [String, Integer]`.
    pub fn display<'a>(&'a self, env: &'a dyn TypeEnv) -> ResolvedTypeDisplay<'a> {
        ResolvedTypeDisplay {
            env,
            resolved: self,
        }
    }
}

/// Parameter and return types of a method, each resolved independently.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedMethodSignature {
    /// In declaration order.
    pub params: Vec<ResolvedType>,
    /// `None` for `void`.
    pub return_type: Option<ResolvedType>,
}

pub struct ResolvedTypeDisplay<'a> {
    env: &'a dyn TypeEnv,
    resolved: &'a ResolvedType,
}

impl fmt::Display for ResolvedTypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", TypeDisplay::new(self.env, &self.resolved.ty))?;
        let Some(args) = &self.resolved.args else {
            return Ok(());
        };
        f.write_str(" => [")?;
        for (idx, arg) in args.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", TypeDisplay::new(self.env, arg))?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typebind_types::TypeStore;

    #[test]
    fn display_renders_declared_and_resolved_forms() {
        let store = TypeStore::with_minimal_jdk();
        let wk = store.well_known().unwrap();
        let e = store.type_params(wk.list)[0];

        let resolved = ResolvedType {
            ty: Type::class(wk.list, vec![Type::TypeVar(e)]),
            args: Some(vec![Type::Concrete(wk.string)]),
        };
        assert_eq!(resolved.display(&store).to_string(), "List<E> => [String]");

        let plain = ResolvedType {
            ty: Type::Concrete(wk.integer),
            args: None,
        };
        assert_eq!(plain.display(&store).to_string(), "Integer");
        assert!(!plain.is_generic());
    }
}
