use typebind_types::{
    ClassDef, ClassId, ClassKind, FieldDef, MethodDef, Type, TypeEnv, TypeStore, TypeVarId,
    WellKnownTypes,
};

/// The `com.example` pair hierarchy on top of [`TypeStore::with_minimal_jdk`].
///
/// See `testdata/pairs.toml` for the Java shape of each declaration.
pub struct PairFixture {
    pub store: TypeStore,
    pub wk: WellKnownTypes,

    pub pair: ClassId,
    pub pair_l: TypeVarId,
    pub pair_r: TypeVarId,

    pub generic_type: ClassId,
    pub generic_type_l: TypeVarId,
    pub generic_type_r: TypeVarId,

    pub generic_interface: ClassId,
    pub generic_interface_l: TypeVarId,
    pub generic_interface_r: TypeVarId,

    pub abstract_type: ClassId,
    pub abstract_type_l: TypeVarId,
    pub abstract_type_r: TypeVarId,

    pub test_pair: ClassId,
    pub non_generic_type: ClassId,
}

impl Default for PairFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl PairFixture {
    pub fn new() -> Self {
        let mut store = TypeStore::with_minimal_jdk();
        let wk = store
            .well_known()
            .expect("minimal JDK registers well-known types");
        let object = Type::Concrete(wk.object);
        let string = Type::Concrete(wk.string);
        let integer = Type::Concrete(wk.integer);

        // class Pair<L, R> { L left; R right; }
        let pair = store.intern_class_id("com.example.Pair");
        let pair_l = store.add_type_param("L", pair);
        let pair_r = store.add_type_param("R", pair);
        let mut def = generic_class("com.example.Pair", &[pair_l, pair_r], &object);
        def.fields = vec![
            field("left", Type::TypeVar(pair_l)),
            field("right", Type::TypeVar(pair_r)),
        ];
        store.define_class(pair, def);

        // class GenericType<L, R> { L left; Pair<L, R> straight; Pair<R, L> reverse; }
        let generic_type = store.intern_class_id("com.example.GenericType");
        let gl = store.add_type_param("L", generic_type);
        let gr = store.add_type_param("R", generic_type);
        let mut def = generic_class("com.example.GenericType", &[gl, gr], &object);
        def.fields = vec![
            field("left", Type::TypeVar(gl)),
            field(
                "straight",
                Type::class(pair, vec![Type::TypeVar(gl), Type::TypeVar(gr)]),
            ),
            field(
                "reverse",
                Type::class(pair, vec![Type::TypeVar(gr), Type::TypeVar(gl)]),
            ),
        ];
        store.define_class(generic_type, def);

        // interface GenericInterface<L, R> { L left(); R mirror(L right); Pair<L, R> pair(); }
        let generic_interface = store.intern_class_id("com.example.GenericInterface");
        let il = store.add_type_param("L", generic_interface);
        let ir = store.add_type_param("R", generic_interface);
        let mut def = ClassDef::empty("com.example.GenericInterface", ClassKind::Interface);
        def.type_params = vec![il, ir];
        def.methods = vec![
            method("left", vec![], Some(Type::TypeVar(il))),
            method("mirror", vec![Type::TypeVar(il)], Some(Type::TypeVar(ir))),
            method(
                "pair",
                vec![],
                Some(Type::class(pair, vec![Type::TypeVar(il), Type::TypeVar(ir)])),
            ),
        ];
        store.define_class(generic_interface, def);

        // abstract class AbstractType<L, R>
        //     extends GenericType<R, L> implements GenericInterface<L, R>
        let abstract_type = store.intern_class_id("com.example.AbstractType");
        let al = store.add_type_param("L", abstract_type);
        let ar = store.add_type_param("R", abstract_type);
        let super_class = Type::class(generic_type, vec![Type::TypeVar(ar), Type::TypeVar(al)]);
        let mut def = generic_class("com.example.AbstractType", &[al, ar], &super_class);
        def.interfaces = vec![Type::class(
            generic_interface,
            vec![Type::TypeVar(al), Type::TypeVar(ar)],
        )];
        store.define_class(abstract_type, def);

        // class TestPair extends Pair<Pair<Integer, String>, List<String>>
        let super_class = Type::class(
            pair,
            vec![
                Type::class(pair, vec![integer.clone(), string.clone()]),
                Type::class(wk.list, vec![string.clone()]),
            ],
        );
        let test_pair = store.add_class(generic_class("com.example.TestPair", &[], &super_class));

        // class NonGenericType { String string; Pair<String, Integer> pair; ... }
        let string_integer = Type::class(pair, vec![string.clone(), integer.clone()]);
        let integer_string = Type::class(pair, vec![integer, string.clone()]);
        let mut def = generic_class("com.example.NonGenericType", &[], &object);
        def.fields = vec![field("string", string), field("pair", string_integer.clone())];
        def.methods = vec![method(
            "reverse",
            vec![string_integer],
            Some(integer_string),
        )];
        let non_generic_type = store.add_class(def);

        Self {
            store,
            wk,
            pair,
            pair_l,
            pair_r,
            generic_type,
            generic_type_l: gl,
            generic_type_r: gr,
            generic_interface,
            generic_interface_l: il,
            generic_interface_r: ir,
            abstract_type,
            abstract_type_l: al,
            abstract_type_r: ar,
            test_pair,
            non_generic_type,
        }
    }

    pub fn string(&self) -> Type {
        Type::Concrete(self.wk.string)
    }

    pub fn integer(&self) -> Type {
        Type::Concrete(self.wk.integer)
    }

    /// Declare a non-generic class, standing in for a Java anonymous subclass
    /// such as `new GenericType<String, Integer>() {}`.
    pub fn subclass(&mut self, name: &str, super_class: Type, interfaces: Vec<Type>) -> ClassId {
        let mut def = ClassDef::empty(name, ClassKind::Class);
        def.super_class = Some(super_class);
        def.interfaces = interfaces;
        self.store.add_class(def)
    }

    /// Declared type of `class.name`. Panics if the field does not exist.
    pub fn field_type(&self, class: ClassId, name: &str) -> &Type {
        self.store
            .class(class)
            .and_then(|def| def.field(name))
            .map(|f| &f.ty)
            .unwrap_or_else(|| panic!("fixture has no field {name}"))
    }

    /// Declaration of `class.name(..)`. Panics if the method does not exist.
    pub fn method(&self, class: ClassId, name: &str) -> &MethodDef {
        self.store
            .class(class)
            .and_then(|def| def.method(name))
            .unwrap_or_else(|| panic!("fixture has no method {name}"))
    }
}

fn generic_class(name: &str, type_params: &[TypeVarId], super_class: &Type) -> ClassDef {
    let mut def = ClassDef::empty(name, ClassKind::Class);
    def.type_params = type_params.to_vec();
    def.super_class = Some(super_class.clone());
    def
}

fn field(name: &str, ty: Type) -> FieldDef {
    FieldDef {
        name: name.to_string(),
        ty,
    }
}

fn method(name: &str, params: Vec<Type>, return_type: Option<Type>) -> MethodDef {
    MethodDef {
        name: name.to_string(),
        type_params: vec![],
        params,
        return_type,
    }
}
