//! Resolution over a store populated from the bundled TOML type table.

use typebind_resolve::GenericTypeResolver;
use typebind_signature::{TypeStoreLoader, TypeTable};
use typebind_test_utils::PAIRS_TABLE;
use typebind_types::{Type, TypeStore};

use pretty_assertions::assert_eq;

fn load_pairs() -> TypeStore {
    let mut store = TypeStore::with_minimal_jdk();
    let table = TypeTable::from_toml_str(PAIRS_TABLE).unwrap();
    TypeStoreLoader::new(&mut store).load_table(&table).unwrap();
    store
}

fn render_field(store: &TypeStore, class: &str, field: &str) -> String {
    let class = store.class_id(class).unwrap();
    let resolver = GenericTypeResolver::new(store, &Type::Concrete(class)).unwrap();
    let resolved = resolver.resolve_field_named(store, field).unwrap();
    resolved.display(store).to_string()
}

#[test]
fn string_integer_type_fields() {
    let store = load_pairs();
    let class = "com.example.StringIntegerType";
    assert_eq!(render_field(&store, class, "left"), "L => [String]");
    assert_eq!(
        render_field(&store, class, "straight"),
        "Pair<L, R> => [String, Integer]"
    );
    assert_eq!(
        render_field(&store, class, "reverse"),
        "Pair<R, L> => [Integer, String]"
    );
}

#[test]
fn string_integer_abstract_swaps_through_abstract_type() {
    let store = load_pairs();
    let class = "com.example.StringIntegerAbstract";
    assert_eq!(render_field(&store, class, "left"), "L => [Integer]");
    assert_eq!(
        render_field(&store, class, "straight"),
        "Pair<L, R> => [Integer, String]"
    );

    let id = store.class_id(class).unwrap();
    let resolver = GenericTypeResolver::new(&store, &Type::Concrete(id)).unwrap();
    let mirror = resolver.resolve_method_named(&store, "mirror").unwrap();
    let params: Vec<_> = mirror
        .params
        .iter()
        .map(|p| p.display(&store).to_string())
        .collect();
    assert_eq!(params, ["L => [String]"]);
    assert_eq!(
        mirror.return_type.unwrap().display(&store).to_string(),
        "R => [Integer]"
    );
}

#[test]
fn test_pair_and_non_generic_type() {
    let store = load_pairs();
    assert_eq!(
        render_field(&store, "com.example.TestPair", "left"),
        "L => [Pair<Integer, String>]"
    );
    assert_eq!(
        render_field(&store, "com.example.TestPair", "right"),
        "R => [List<String>]"
    );
    assert_eq!(
        render_field(&store, "com.example.NonGenericType", "string"),
        "String"
    );
    assert_eq!(
        render_field(&store, "com.example.NonGenericType", "pair"),
        "Pair<String, Integer> => [String, Integer]"
    );
}

#[test]
fn string_integer_interface_methods() {
    let store = load_pairs();
    let id = store.class_id("com.example.StringIntegerInterface").unwrap();
    let resolver = GenericTypeResolver::new(&store, &Type::Concrete(id)).unwrap();

    let pair = resolver.resolve_method_named(&store, "pair").unwrap();
    assert!(pair.params.is_empty());
    assert_eq!(
        pair.return_type.unwrap().display(&store).to_string(),
        "Pair<L, R> => [String, Integer]"
    );
}

#[test]
fn library_hierarchy_from_the_minimal_jdk() {
    let mut store = load_pairs();
    let table = TypeTable::from_toml_str(
        r#"
        [[class]]
        name = "com.example.Names"
        signature = "Ljava/util/ArrayList<Ljava/lang/String;>;"
        "#,
    )
    .unwrap();
    let ids = TypeStoreLoader::new(&mut store).load_table(&table).unwrap();
    let resolver = GenericTypeResolver::new(&store, &Type::Concrete(ids[0])).unwrap();

    // ArrayList<E> implements List<E>: E of List chains to String.
    let get = resolver.resolve_method_named(&store, "get").unwrap();
    assert_eq!(
        get.return_type.unwrap().display(&store).to_string(),
        "E => [String]"
    );
    // List<E> extends Collection<E> is a super-interface of an interface and is not walked.
    let add = resolver.resolve_method_named(&store, "add").unwrap();
    assert_eq!(add.params[0].display(&store).to_string(), "E => [E]");
}
