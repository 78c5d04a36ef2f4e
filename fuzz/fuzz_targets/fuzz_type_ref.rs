#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use typebind_signature::parse_type_ref;
use typebind_types::{format_type, TypeStore};

mod utils;

fn store() -> &'static TypeStore {
    static STORE: OnceLock<TypeStore> = OnceLock::new();
    STORE.get_or_init(TypeStore::with_minimal_jdk)
}

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    // Whatever parses must format back to something that parses to the same type.
    let store = store();
    if let Ok(ty) = parse_type_ref(store, text) {
        let printed = format_type(store, &ty);
        let reparsed = parse_type_ref(store, &printed).expect("formatted type reparses");
        assert_eq!(ty, reparsed, "{printed}");
    }
});
