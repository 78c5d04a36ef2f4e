#![no_main]

use std::sync::mpsc;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use typebind_resolve::GenericTypeResolver;
use typebind_signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, TypeStoreLoader,
    TypeTable,
};
use typebind_types::{Type, TypeStore};

mod utils;

const TIMEOUT: Duration = Duration::from_secs(1);

struct Runner {
    input_tx: mpsc::SyncSender<String>,
    output_rx: Mutex<mpsc::Receiver<()>>,
}

fn run_one(text: &str) {
    let _ = parse_field_signature(text);
    let _ = parse_method_signature(text);
    if parse_class_signature(text).is_err() {
        return;
    }

    // A class signature that parses must also load and resolve without panicking, even when it
    // names classes nobody declares or extends itself.
    let table = TypeTable::from_toml_str(&format!(
        "[[class]]\nname = \"fuzz.Target\"\nsignature = {text:?}\n"
    ));
    let Ok(table) = table else {
        return;
    };
    let mut store = TypeStore::with_minimal_jdk();
    let Ok(ids) = TypeStoreLoader::new(&mut store)
        .allow_unknown(true)
        .load_table(&table)
    else {
        return;
    };
    for id in ids {
        if let Ok(resolver) = GenericTypeResolver::new(&store, &Type::Concrete(id)) {
            for (_, bound) in resolver.substitution().iter() {
                let _ = resolver.substitution().apply(bound);
            }
        }
    }
}

fn runner() -> &'static Runner {
    static RUNNER: OnceLock<Runner> = OnceLock::new();
    RUNNER.get_or_init(|| {
        let (input_tx, input_rx) = mpsc::sync_channel::<String>(0);
        let (output_tx, output_rx) = mpsc::sync_channel::<()>(0);

        std::thread::spawn(move || {
            for input in input_rx {
                run_one(&input);
                let _ = output_tx.send(());
            }
        });

        Runner {
            input_tx,
            output_rx: Mutex::new(output_rx),
        }
    })
}

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    let runner = runner();
    runner
        .input_tx
        .send(text.to_owned())
        .expect("fuzz_signature_parse worker thread exited");

    match runner
        .output_rx
        .lock()
        .expect("fuzz_signature_parse worker receiver poisoned")
        .recv_timeout(TIMEOUT)
    {
        Ok(()) => {}
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("fuzz_signature_parse fuzz target timed out")
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            panic!("fuzz_signature_parse worker thread panicked")
        }
    }
});
