use typebind_resolve::{
    find_field, find_method, resolve_type, GenericTypeResolver, ResolveError, ResolvedType,
    SubstitutionMap,
};
use typebind_test_utils::PairFixture;
use typebind_types::{Type, TypeEnv};

use pretty_assertions::assert_eq;

fn resolved(ty: &Type, args: Option<Vec<Type>>) -> ResolvedType {
    ResolvedType {
        ty: ty.clone(),
        args,
    }
}

#[test]
fn non_generic_members_have_no_arguments() {
    let fx = PairFixture::new();
    let resolver =
        GenericTypeResolver::new(&fx.store, &Type::Concrete(fx.non_generic_type)).unwrap();
    assert!(resolver.substitution().is_empty());

    let string = fx.field_type(fx.non_generic_type, "string");
    assert_eq!(resolver.resolve_field(string), resolved(string, None));

    let pair = fx.field_type(fx.non_generic_type, "pair");
    assert_eq!(
        resolver.resolve_field(pair).args,
        Some(vec![fx.string(), fx.integer()])
    );

    let reverse = fx.method(fx.non_generic_type, "reverse");
    let sig = resolver.resolve_method(&reverse.params, reverse.return_type.as_ref());
    assert_eq!(sig.params.len(), 1);
    assert_eq!(sig.params[0].args, Some(vec![fx.string(), fx.integer()]));
    assert_eq!(
        sig.return_type.unwrap().args,
        Some(vec![fx.integer(), fx.string()])
    );
}

#[test]
fn direct_instantiation_binds_own_variables() {
    let mut fx = PairFixture::new();
    let super_class = Type::class(fx.generic_type, vec![fx.string(), fx.integer()]);
    let anon = fx.subclass("com.example.Anon$1", super_class, vec![]);

    let resolver = GenericTypeResolver::new(&fx.store, &Type::Concrete(anon)).unwrap();
    let map = resolver.substitution();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(fx.generic_type_l), Some(&fx.string()));
    assert_eq!(map.get(fx.generic_type_r), Some(&fx.integer()));

    let left = fx.field_type(fx.generic_type, "left");
    let straight = fx.field_type(fx.generic_type, "straight");
    let reverse = fx.field_type(fx.generic_type, "reverse");
    assert_eq!(resolver.resolve_field(left).args, Some(vec![fx.string()]));
    assert_eq!(
        resolver.resolve_field(straight).args,
        Some(vec![fx.string(), fx.integer()])
    );
    assert_eq!(
        resolver.resolve_field(reverse).args,
        Some(vec![fx.integer(), fx.string()])
    );

    // The declared expression is carried through unchanged.
    assert_eq!(resolver.resolve_field(reverse).ty, *reverse);
}

#[test]
fn bindings_are_transitive_through_intermediate_generics() {
    let mut fx = PairFixture::new();
    // class StringIntegerAbstract extends AbstractType<String, Integer>
    let super_class = Type::class(fx.abstract_type, vec![fx.string(), fx.integer()]);
    let class = fx.subclass("com.example.StringIntegerAbstract", super_class, vec![]);
    let resolver = GenericTypeResolver::new(&fx.store, &Type::Concrete(class)).unwrap();

    let map = resolver.substitution();
    assert_eq!(map.get(fx.abstract_type_l), Some(&fx.string()));
    assert_eq!(map.get(fx.abstract_type_r), Some(&fx.integer()));
    // AbstractType<L, R> extends GenericType<R, L>
    assert_eq!(map.get(fx.generic_type_l), Some(&fx.integer()));
    assert_eq!(map.get(fx.generic_type_r), Some(&fx.string()));
    // AbstractType<L, R> implements GenericInterface<L, R>
    assert_eq!(map.get(fx.generic_interface_l), Some(&fx.string()));
    assert_eq!(map.get(fx.generic_interface_r), Some(&fx.integer()));

    let straight = fx.field_type(fx.generic_type, "straight");
    let reverse = fx.field_type(fx.generic_type, "reverse");
    assert_eq!(
        resolver.resolve_field(straight).args,
        Some(vec![fx.integer(), fx.string()])
    );
    assert_eq!(
        resolver.resolve_field(reverse).args,
        Some(vec![fx.string(), fx.integer()])
    );

    let left = fx.method(fx.generic_interface, "left");
    let sig = resolver.resolve_method(&left.params, left.return_type.as_ref());
    assert!(sig.params.is_empty());
    assert_eq!(sig.return_type.unwrap().args, Some(vec![fx.string()]));

    let mirror = fx.method(fx.generic_interface, "mirror");
    let sig = resolver.resolve_method(&mirror.params, mirror.return_type.as_ref());
    assert_eq!(sig.params[0].args, Some(vec![fx.string()]));
    assert_eq!(sig.return_type.unwrap().args, Some(vec![fx.integer()]));
}

#[test]
fn unbound_variables_resolve_to_themselves() {
    let fx = PairFixture::new();
    let resolver =
        GenericTypeResolver::new(&fx.store, &Type::Concrete(fx.abstract_type)).unwrap();

    // AbstractType itself is still generic: GenericType's variables point at its own.
    let left = fx.field_type(fx.generic_type, "left");
    assert_eq!(
        resolver.resolve_field(left).args,
        Some(vec![Type::TypeVar(fx.abstract_type_r)])
    );

    // Pair is not in AbstractType's hierarchy at all.
    let pair_left = fx.field_type(fx.pair, "left");
    assert_eq!(
        resolver.resolve_field(pair_left).args,
        Some(vec![Type::TypeVar(fx.pair_l)])
    );
}

#[test]
fn substitution_is_single_level() {
    let fx = PairFixture::new();
    let resolver = GenericTypeResolver::new(&fx.store, &Type::Concrete(fx.test_pair)).unwrap();

    let left = fx.field_type(fx.pair, "left");
    let right = fx.field_type(fx.pair, "right");
    assert_eq!(
        resolver.resolve_field(left).args,
        Some(vec![Type::class(fx.pair, vec![fx.integer(), fx.string()])])
    );
    assert_eq!(
        resolver.resolve_field(right).args,
        Some(vec![Type::class(fx.wk.list, vec![fx.string()])])
    );

    // Only the top-level arguments of `List<L>` are looked up; `L` inside a nested argument stays.
    let nested = Type::class(
        fx.pair,
        vec![
            Type::class(fx.wk.list, vec![Type::TypeVar(fx.pair_l)]),
            Type::TypeVar(fx.pair_r),
        ],
    );
    assert_eq!(
        resolver.resolve_field(&nested).args,
        Some(vec![
            Type::class(fx.wk.list, vec![Type::TypeVar(fx.pair_l)]),
            Type::class(fx.wk.list, vec![fx.string()]),
        ])
    );
    // `apply` is the explicit deep variant.
    assert_eq!(
        resolver.substitution().apply(&nested),
        Type::class(
            fx.pair,
            vec![
                Type::class(
                    fx.wk.list,
                    vec![Type::class(fx.pair, vec![fx.integer(), fx.string()])]
                ),
                Type::class(fx.wk.list, vec![fx.string()]),
            ]
        )
    );
}

#[test]
fn parameterized_handle_seeds_the_map() {
    let fx = PairFixture::new();
    let handle = Type::class(fx.pair, vec![fx.string(), fx.integer()]);
    let resolver = GenericTypeResolver::new(&fx.store, &handle).unwrap();

    let left = fx.field_type(fx.pair, "left");
    let right = fx.field_type(fx.pair, "right");
    assert_eq!(resolver.resolve_field(left).args, Some(vec![fx.string()]));
    assert_eq!(resolver.resolve_field(right).args, Some(vec![fx.integer()]));
    assert_eq!(resolver.class(), fx.pair);
}

#[test]
fn interface_bindings_come_from_directly_declared_interfaces() {
    let mut fx = PairFixture::new();
    let iface = Type::class(fx.generic_interface, vec![fx.string(), fx.integer()]);
    let object = Type::Concrete(fx.wk.object);
    let class = fx.subclass("com.example.StringIntegerInterface", object, vec![iface]);
    let resolver = GenericTypeResolver::new(&fx.store, &Type::Concrete(class)).unwrap();

    let pair = fx.method(fx.generic_interface, "pair");
    let sig = resolver.resolve_method(&pair.params, pair.return_type.as_ref());
    assert_eq!(
        sig.return_type.unwrap().args,
        Some(vec![fx.string(), fx.integer()])
    );
}

#[test]
fn method_parameters_keep_declaration_order() {
    let fx = PairFixture::new();
    let handle = Type::class(fx.pair, vec![fx.string(), fx.integer()]);
    let resolver = GenericTypeResolver::new(&fx.store, &handle).unwrap();

    let params = [
        Type::TypeVar(fx.pair_r),
        Type::Concrete(fx.wk.object),
        Type::TypeVar(fx.pair_l),
    ];
    let sig = resolver.resolve_method(&params, None);
    let args: Vec<_> = sig.params.iter().map(|p| p.args.clone()).collect();
    assert_eq!(
        args,
        vec![Some(vec![fx.integer()]), None, Some(vec![fx.string()])]
    );
    assert_eq!(sig.return_type, None);
}

#[test]
fn resolution_is_idempotent() {
    let mut fx = PairFixture::new();
    let super_class = Type::class(fx.generic_type, vec![fx.string(), fx.integer()]);
    let class = fx.subclass("com.example.StringIntegerType", super_class, vec![]);

    let first = GenericTypeResolver::new(&fx.store, &Type::Concrete(class)).unwrap();
    let second = GenericTypeResolver::new(&fx.store, &Type::Concrete(class)).unwrap();
    assert_eq!(first, second);

    let reverse = fx.field_type(fx.generic_type, "reverse");
    assert_eq!(first.resolve_field(reverse), first.resolve_field(reverse));
    assert_eq!(
        first.resolve_field(reverse),
        resolve_type(reverse, second.substitution())
    );
}

#[test]
fn type_variable_handle_is_invalid_input() {
    let fx = PairFixture::new();
    let err = GenericTypeResolver::new(&fx.store, &Type::TypeVar(fx.pair_l)).unwrap_err();
    assert_eq!(err, ResolveError::InvalidInput("L".to_string()));
    assert!(matches!(
        SubstitutionMap::build(&fx.store, &Type::TypeVar(fx.pair_l)),
        Err(ResolveError::InvalidInput(_))
    ));
}

#[test]
fn members_are_found_through_the_hierarchy() {
    let mut fx = PairFixture::new();
    let super_class = Type::class(fx.abstract_type, vec![fx.string(), fx.integer()]);
    let class = fx.subclass("com.example.StringIntegerAbstract", super_class, vec![]);

    let field = find_field(&fx.store, class, "reverse").unwrap();
    assert_eq!(field.owner, fx.generic_type);
    let method = find_method(&fx.store, class, "mirror").unwrap();
    assert_eq!(method.owner, fx.generic_interface);
    assert!(find_field(&fx.store, class, "missing").is_none());

    let resolver = GenericTypeResolver::new(&fx.store, &Type::Concrete(class)).unwrap();
    assert_eq!(
        resolver.lookup_field(&fx.store, "reverse").unwrap().owner,
        fx.generic_type
    );
    assert_eq!(
        resolver.lookup_method(&fx.store, "mirror").unwrap().owner,
        fx.generic_interface
    );
    assert!(matches!(
        resolver.lookup_field(&fx.store, "missing"),
        Err(ResolveError::UnknownField { .. })
    ));

    let reverse = resolver.resolve_field_named(&fx.store, "reverse").unwrap();
    assert_eq!(
        reverse.display(&fx.store).to_string(),
        "Pair<R, L> => [String, Integer]"
    );

    let mirror = resolver.resolve_method_named(&fx.store, "mirror").unwrap();
    assert_eq!(mirror.params[0].args, Some(vec![fx.string()]));

    let err = resolver.resolve_method_named(&fx.store, "missing").unwrap_err();
    assert_eq!(
        err.to_string(),
        "`com.example.StringIntegerAbstract` has no method `missing` in its hierarchy"
    );
    assert!(matches!(
        resolver.resolve_field_named(&fx.store, "missing"),
        Err(ResolveError::UnknownField { .. })
    ));
}

#[test]
fn resolver_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GenericTypeResolver>();
    assert_send_sync::<SubstitutionMap>();
    assert_send_sync::<ResolvedType>();

    let fx = PairFixture::new();
    let handle = Type::class(fx.pair, vec![fx.string(), fx.integer()]);
    let resolver = GenericTypeResolver::new(&fx.store, &handle).unwrap();
    let left = fx.field_type(fx.pair, "left").clone();

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| resolver.resolve_field(&left)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(results.iter().all(|r| r.args == Some(vec![fx.string()])));
    assert_eq!(fx.store.type_params(fx.pair).len(), 2);
}
