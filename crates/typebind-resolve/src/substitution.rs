use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashSet;

use typebind_types::{format_type, ClassId, ClassType, Type, TypeEnv, TypeVarId};

use crate::error::ResolveError;

/// Type-variable bindings of one concrete instantiation.
///
/// Keys are type variable identities; values are what the variable is bound to at that
/// instantiation, which may itself be an unbound type variable when the hierarchy never supplies
/// a concrete argument. A map is built once and never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    bindings: BTreeMap<TypeVarId, Type>,
}

impl SubstitutionMap {
    /// Build the map for `ty`.
    ///
    /// * `Pair<String, Integer>` binds `Pair`'s own variables and nothing else.
    /// * A class is walked from itself up to the root. At each class the generic superclass and
    ///   the directly declared generic interfaces contribute bindings. Super-interfaces of those
    ///   interfaces are not visited.
    ///
    /// Fails only for a bare type variable.
    pub fn build(env: &dyn TypeEnv, ty: &Type) -> Result<Self, ResolveError> {
        let map = match ty {
            Type::Parameterized(class_type) => {
                let mut map = Self::default();
                map.bind_supertype(env, class_type);
                map
            }
            Type::Concrete(class) => Self::walk_hierarchy(env, *class),
            Type::TypeVar(_) => return Err(ResolveError::InvalidInput(format_type(env, ty))),
        };
        tracing::debug!(
            ty = %format_type(env, ty),
            bindings = map.len(),
            "built substitution map"
        );
        Ok(map)
    }

    fn walk_hierarchy(env: &dyn TypeEnv, start: ClassId) -> Self {
        let mut map = Self::default();
        let mut visited = HashSet::new();
        let mut current = Some(start);

        while let Some(class) = current {
            let name = env.class_name(class).unwrap_or_default();
            if !visited.insert(class) {
                tracing::debug!(class = name, "superclass chain revisits a class; stopping");
                break;
            }
            if env.class(class).is_none() {
                tracing::debug!(class = name, "no metadata for class; stopping");
                break;
            }

            let super_class = env.generic_superclass(class);
            if let Some(Type::Parameterized(sup)) = super_class {
                map.bind_supertype(env, sup);
            }
            for iface in env.generic_interfaces(class) {
                if let Type::Parameterized(iface) = iface {
                    map.bind_supertype(env, iface);
                }
            }

            current = super_class.and_then(Type::raw_class);
        }

        map
    }

    /// Zip the declared variables of `supertype`'s class with its arguments.
    ///
    /// An argument that is itself an already-bound variable is replaced by its binding, so the
    /// map stays transitively resolved while walking from derived to base. Existing bindings are
    /// never replaced.
    fn bind_supertype(&mut self, env: &dyn TypeEnv, supertype: &ClassType) {
        let params = env.type_params(supertype.def);
        if params.len() != supertype.args.len() {
            tracing::debug!(
                class = env.class_name(supertype.def).unwrap_or_default(),
                expected = params.len(),
                found = supertype.args.len(),
                "type argument count mismatch"
            );
        }

        for (param, arg) in params.iter().zip(&supertype.args) {
            let arg = self.lookup(arg);
            match self.bindings.entry(*param) {
                btree_map::Entry::Vacant(slot) => {
                    tracing::trace!(param = ?param, arg = ?arg, "bound type variable");
                    slot.insert(arg);
                }
                btree_map::Entry::Occupied(existing) => {
                    tracing::trace!(
                        param = ?param,
                        kept = ?existing.get(),
                        ignored = ?arg,
                        "type variable already bound by a more derived type"
                    );
                }
            }
        }
    }

    pub fn get(&self, var: TypeVarId) -> Option<&Type> {
        self.bindings.get(&var)
    }

    /// Single-level lookup: a bound type variable yields its binding, anything else is returned
    /// unchanged. Arguments nested inside a parameterized type are not visited.
    pub fn lookup(&self, ty: &Type) -> Type {
        match ty {
            Type::TypeVar(id) => self.bindings.get(id).cloned().unwrap_or_else(|| ty.clone()),
            Type::Concrete(_) | Type::Parameterized(_) => ty.clone(),
        }
    }

    /// Substitute every bound variable in `ty`, including nested arguments.
    ///
    /// The resolver itself only ever substitutes one level (see [`SubstitutionMap::lookup`]);
    /// this is for callers that want the fully instantiated type.
    pub fn apply(&self, ty: &Type) -> Type {
        if !ty.mentions_type_vars() {
            return ty.clone();
        }
        let mut active = Vec::new();
        self.apply_inner(ty, &mut active)
    }

    fn apply_inner(&self, ty: &Type, active: &mut Vec<TypeVarId>) -> Type {
        match ty {
            Type::Concrete(_) => ty.clone(),
            Type::TypeVar(id) => {
                if active.contains(id) {
                    return ty.clone();
                }
                match self.bindings.get(id) {
                    Some(bound) if bound != ty => {
                        active.push(*id);
                        let out = self.apply_inner(bound, active);
                        active.pop();
                        out
                    }
                    _ => ty.clone(),
                }
            }
            Type::Parameterized(ClassType { def, args }) => Type::Parameterized(ClassType {
                def: *def,
                args: args
                    .iter()
                    .map(|arg| self.apply_inner(arg, active))
                    .collect(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings ordered by type variable id.
    pub fn iter(&self) -> impl Iterator<Item = (TypeVarId, &Type)> + '_ {
        self.bindings.iter().map(|(var, ty)| (*var, ty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typebind_types::{ClassDef, ClassKind, TypeStore};

    fn class(store: &mut TypeStore, name: &str, params: &[&str]) -> (ClassId, Vec<TypeVarId>) {
        let id = store.intern_class_id(name);
        let params: Vec<_> = params.iter().map(|p| store.add_type_param(*p, id)).collect();
        let mut def = ClassDef::empty(name, ClassKind::Class);
        def.type_params = params.clone();
        store.define_class(id, def);
        (id, params)
    }

    fn set_supers(
        store: &mut TypeStore,
        id: ClassId,
        super_class: Option<Type>,
        ifaces: Vec<Type>,
    ) {
        let def = store.class_mut(id).unwrap();
        def.super_class = super_class;
        def.interfaces = ifaces;
    }

    #[test]
    fn parameterized_handle_binds_one_level() {
        let store = TypeStore::with_minimal_jdk();
        let wk = store.well_known().unwrap();
        let ty = Type::class(wk.array_list, vec![Type::Concrete(wk.string)]);

        let map = SubstitutionMap::build(&store, &ty).unwrap();
        let e = store.type_params(wk.array_list)[0];
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(e), Some(&Type::Concrete(wk.string)));

        // `ArrayList`'s own `implements List<E>` is not walked for a parameterized handle.
        let list_e = store.type_params(wk.list)[0];
        assert_eq!(map.get(list_e), None);
    }

    #[test]
    fn type_variable_handle_is_rejected() {
        let store = TypeStore::with_minimal_jdk();
        let wk = store.well_known().unwrap();
        let e = store.type_params(wk.list)[0];

        let err = SubstitutionMap::build(&store, &Type::TypeVar(e)).unwrap_err();
        assert_eq!(err, ResolveError::InvalidInput("E".to_string()));
    }

    #[test]
    fn more_derived_binding_is_kept() {
        let mut store = TypeStore::default();
        let string = store.add_class(ClassDef::empty("String", ClassKind::Class));
        let integer = store.add_class(ClassDef::empty("Integer", ClassKind::Class));
        let (iface, iface_params) = class(&mut store, "I", &["T"]);
        let (base, _) = class(&mut store, "Base", &[]);
        let (derived, _) = class(&mut store, "Derived", &[]);

        // class Base implements I<Integer>; class Derived extends Base implements I<String>
        let i_of = |ty| Type::class(iface, vec![Type::Concrete(ty)]);
        set_supers(&mut store, base, None, vec![i_of(integer)]);
        set_supers(&mut store, derived, Some(Type::Concrete(base)), vec![i_of(string)]);

        let map = SubstitutionMap::build(&store, &Type::Concrete(derived)).unwrap();
        assert_eq!(map.get(iface_params[0]), Some(&Type::Concrete(string)));
    }

    #[test]
    fn cyclic_superclass_chain_terminates() {
        let mut store = TypeStore::default();
        let (a, a_params) = class(&mut store, "A", &["X"]);
        let (b, b_params) = class(&mut store, "B", &["Y"]);
        set_supers(&mut store, a, Some(Type::class(b, vec![Type::TypeVar(a_params[0])])), vec![]);
        set_supers(&mut store, b, Some(Type::class(a, vec![Type::TypeVar(b_params[0])])), vec![]);

        let map = SubstitutionMap::build(&store, &Type::Concrete(a)).unwrap();
        assert_eq!(map.get(b_params[0]), Some(&Type::TypeVar(a_params[0])));
    }

    #[test]
    fn walk_stops_at_classes_without_metadata() {
        let mut store = TypeStore::default();
        let placeholder = store.intern_class_id("Unknown");
        let (child, _) = class(&mut store, "Child", &[]);
        set_supers(&mut store, child, Some(Type::Concrete(placeholder)), vec![]);

        let map = SubstitutionMap::build(&store, &Type::Concrete(child)).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn mismatched_arity_zips_shortest() {
        let mut store = TypeStore::default();
        let string = store.add_class(ClassDef::empty("String", ClassKind::Class));
        let (pair, pair_params) = class(&mut store, "Pair", &["L", "R"]);

        let ty = Type::class(pair, vec![Type::Concrete(string)]);
        let map = SubstitutionMap::build(&store, &ty).unwrap();
        assert_eq!(map.get(pair_params[0]), Some(&Type::Concrete(string)));
        assert_eq!(map.get(pair_params[1]), None);
    }

    #[test]
    fn apply_substitutes_nested_arguments() {
        let store = TypeStore::with_minimal_jdk();
        let wk = store.well_known().unwrap();
        let list_e = store.type_params(wk.list)[0];
        let map = SubstitutionMap::build(
            &store,
            &Type::class(wk.list, vec![Type::Concrete(wk.string)]),
        )
        .unwrap();

        let nested = Type::class(wk.list, vec![Type::class(wk.list, vec![Type::TypeVar(list_e)])]);
        assert_eq!(map.lookup(&nested), nested);
        assert_eq!(
            map.apply(&Type::Concrete(wk.string)),
            Type::Concrete(wk.string)
        );
        assert_eq!(
            map.apply(&nested),
            Type::class(
                wk.list,
                vec![Type::class(wk.list, vec![Type::Concrete(wk.string)])]
            )
        );
    }

    #[test]
    fn apply_does_not_loop_on_self_referential_bindings() {
        let store = TypeStore::with_minimal_jdk();
        let wk = store.well_known().unwrap();
        let list_e = store.type_params(wk.list)[0];

        // List<List<E>>: E is bound to a type mentioning E itself.
        let ty = Type::class(wk.list, vec![Type::class(wk.list, vec![Type::TypeVar(list_e)])]);
        let map = SubstitutionMap::build(&store, &ty).unwrap();

        assert_eq!(
            map.apply(&Type::TypeVar(list_e)),
            Type::class(wk.list, vec![Type::TypeVar(list_e)])
        );
    }
}
