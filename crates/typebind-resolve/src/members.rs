use std::collections::{HashSet, VecDeque};

use typebind_types::{ClassDef, ClassId, FieldDef, MethodDef, TypeEnv};

/// A member definition and the class that declares it.
#[derive(Debug)]
pub struct Member<'env, T> {
    pub owner: ClassId,
    pub def: &'env T,
}

impl<T> Clone for Member<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Member<'_, T> {}

/// Find a field declared on `class` or any of its supertypes.
///
/// Supertypes are searched breadth-first: the class itself, then its superclass and directly
/// declared interfaces in declaration order, then theirs. The first match wins.
pub fn find_field<'env>(
    env: &'env dyn TypeEnv,
    class: ClassId,
    name: &str,
) -> Option<Member<'env, FieldDef>> {
    find_member(env, class, |def| def.field(name))
}

/// Find a method by name on `class` or any of its supertypes. Overloads are not distinguished;
/// the first declaration found wins. See [`find_field`] for the search order.
pub fn find_method<'env>(
    env: &'env dyn TypeEnv,
    class: ClassId,
    name: &str,
) -> Option<Member<'env, MethodDef>> {
    find_member(env, class, |def| def.method(name))
}

fn find_member<'env, T>(
    env: &'env dyn TypeEnv,
    class: ClassId,
    mut select: impl FnMut(&'env ClassDef) -> Option<&'env T>,
) -> Option<Member<'env, T>> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([class]);

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        let Some(def) = env.class(current) else {
            continue;
        };
        if let Some(found) = select(def) {
            return Some(Member {
                owner: current,
                def: found,
            });
        }
        queue.extend(def.super_class.iter().filter_map(|ty| ty.raw_class()));
        queue.extend(def.interfaces.iter().filter_map(|ty| ty.raw_class()));
    }

    None
}
