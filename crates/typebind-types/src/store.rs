use std::collections::HashMap;

use crate::{ClassDef, ClassId, ClassKind, Type, TypeEnv, TypeParamDef, TypeVarId};

/// Ids of the classes registered by [`TypeStore::with_minimal_jdk`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub number: ClassId,
    pub string: ClassId,
    pub integer: ClassId,
    pub comparable: ClassId,
    pub collection: ClassId,
    pub list: ClassId,
    pub array_list: ClassId,
    pub int: ClassId,
    pub boolean: ClassId,
}

/// In-memory metadata table.
///
/// Classes can be referenced by name before they are defined ([`TypeStore::intern_class_id`]);
/// such placeholders have a name but no [`ClassDef`] until [`TypeStore::define_class`] runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeStore {
    names: Vec<String>,
    classes: Vec<Option<ClassDef>>,
    by_name: HashMap<String, ClassId>,
    type_params: Vec<TypeParamDef>,
    well_known: Option<WellKnownTypes>,
}

impl TypeStore {
    /// A store pre-populated with a handful of `java.lang`/`java.util` declarations.
    pub fn with_minimal_jdk() -> Self {
        let mut store = Self::default();
        let well_known = store.add_minimal_jdk();
        store.well_known = Some(well_known);
        store
    }

    pub fn well_known(&self) -> Option<WellKnownTypes> {
        self.well_known
    }

    /// Return the id for `name`, allocating a placeholder if it is not known yet.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let raw: u32 = self
            .names
            .len()
            .try_into()
            .unwrap_or_else(|_| panic!("class table overflow interning `{name}`"));
        let id = ClassId::from_raw(raw);
        self.names.push(name.to_string());
        self.classes.push(None);
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Install `def` for `id`, replacing any previous definition.
    ///
    /// `def.name` becomes the lookup name of `id`. Panics if `id` was not allocated by this store,
    /// or if `def.name` already names a different id.
    pub fn define_class(&mut self, id: ClassId, def: ClassDef) {
        let idx = id.to_raw() as usize;
        if let Some(other) = self.by_name.get(&def.name) {
            if *other != id {
                panic!(
                    "define_class would rename {id:?} to `{}`, already interned as {other:?}",
                    def.name
                );
            }
        }
        let Some(slot) = self.classes.get_mut(idx) else {
            panic!("define_class called with foreign class id {id:?}");
        };
        if self.names[idx] != def.name {
            self.by_name.remove(&self.names[idx]);
            self.by_name.insert(def.name.clone(), id);
            self.names[idx] = def.name.clone();
        }
        *slot = Some(def);
    }

    /// Intern `def.name` and define it. Re-adding a name keeps its id.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    pub fn add_type_param(&mut self, name: impl Into<String>, owner: ClassId) -> TypeVarId {
        let raw: u32 = self
            .type_params
            .len()
            .try_into()
            .unwrap_or_else(|_| panic!("type parameter table overflow"));
        self.type_params.push(TypeParamDef {
            name: name.into(),
            owner,
        });
        TypeVarId::from_raw(raw)
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.to_raw() as usize)?.as_mut()
    }

    pub fn is_defined(&self, id: ClassId) -> bool {
        self.class(id).is_some()
    }

    /// All defined classes in id order.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassDef)> + '_ {
        self.classes.iter().enumerate().filter_map(|(idx, def)| {
            def.as_ref().map(|def| (ClassId::from_raw(idx as u32), def))
        })
    }

    /// Find a class by binary name, or by simple name when that is unambiguous.
    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.class_id(name) {
            return Some(id);
        }
        let mut matches = self
            .names
            .iter()
            .enumerate()
            .filter(|(_, candidate)| crate::simple_name(candidate) == name);
        let (idx, _) = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(ClassId::from_raw(idx as u32))
    }

    fn add_minimal_jdk(&mut self) -> WellKnownTypes {
        let object = self.add_class(ClassDef::empty("java.lang.Object", ClassKind::Class));
        let int = self.add_class(ClassDef::empty("int", ClassKind::Primitive));
        let boolean = self.add_class(ClassDef::empty("boolean", ClassKind::Primitive));
        let object_ty = Type::Concrete(object);

        // interface Comparable<T> { int compareTo(T o); }
        let comparable = self.intern_class_id("java.lang.Comparable");
        let comparable_t = self.add_type_param("T", comparable);
        let mut def = ClassDef::empty("java.lang.Comparable", ClassKind::Interface);
        def.type_params = vec![comparable_t];
        def.methods.push(crate::MethodDef {
            name: "compareTo".to_string(),
            type_params: vec![],
            params: vec![Type::TypeVar(comparable_t)],
            return_type: Some(Type::Concrete(int)),
        });
        self.define_class(comparable, def);

        let mut def = ClassDef::empty("java.lang.Number", ClassKind::Class);
        def.super_class = Some(object_ty.clone());
        let number = self.add_class(def);

        let string = self.intern_class_id("java.lang.String");
        let mut def = ClassDef::empty("java.lang.String", ClassKind::Class);
        def.super_class = Some(object_ty.clone());
        def.interfaces = vec![Type::class(comparable, vec![Type::Concrete(string)])];
        self.define_class(string, def);

        let integer = self.intern_class_id("java.lang.Integer");
        let mut def = ClassDef::empty("java.lang.Integer", ClassKind::Class);
        def.super_class = Some(Type::Concrete(number));
        def.interfaces = vec![Type::class(comparable, vec![Type::Concrete(integer)])];
        self.define_class(integer, def);

        // interface Collection<E> { boolean add(E e); }
        let collection = self.intern_class_id("java.util.Collection");
        let collection_e = self.add_type_param("E", collection);
        let mut def = ClassDef::empty("java.util.Collection", ClassKind::Interface);
        def.type_params = vec![collection_e];
        def.methods.push(crate::MethodDef {
            name: "add".to_string(),
            type_params: vec![],
            params: vec![Type::TypeVar(collection_e)],
            return_type: Some(Type::Concrete(boolean)),
        });
        self.define_class(collection, def);

        // interface List<E> extends Collection<E> { E get(int index); }
        let list = self.intern_class_id("java.util.List");
        let list_e = self.add_type_param("E", list);
        let mut def = ClassDef::empty("java.util.List", ClassKind::Interface);
        def.type_params = vec![list_e];
        def.interfaces = vec![Type::class(collection, vec![Type::TypeVar(list_e)])];
        def.methods.push(crate::MethodDef {
            name: "get".to_string(),
            type_params: vec![],
            params: vec![Type::Concrete(int)],
            return_type: Some(Type::TypeVar(list_e)),
        });
        self.define_class(list, def);

        // class ArrayList<E> implements List<E>
        let array_list = self.intern_class_id("java.util.ArrayList");
        let array_list_e = self.add_type_param("E", array_list);
        let mut def = ClassDef::empty("java.util.ArrayList", ClassKind::Class);
        def.type_params = vec![array_list_e];
        def.super_class = Some(object_ty);
        def.interfaces = vec![Type::class(list, vec![Type::TypeVar(array_list_e)])];
        self.define_class(array_list, def);

        WellKnownTypes {
            object,
            number,
            string,
            integer,
            comparable,
            collection,
            list,
            array_list,
            int,
            boolean,
        }
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.to_raw() as usize)?.as_ref()
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.to_raw() as usize)
    }

    fn class_name(&self, id: ClassId) -> Option<&str> {
        self.names.get(id.to_raw() as usize).map(String::as_str)
    }
}
