// logmask-core/tests/concurrency_tests.rs
//! Readers racing a writer must always observe a complete rule set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use logmask_core::{MaskingConfig, MaskingEngine, Redactor, RuleStore};

const LINE: &str = "user=alice token=abc123 pin=4321";

fn config(name: &str, pattern: &str, masking_char: &str) -> MaskingConfig {
    let mut config = MaskingConfig::default();
    config.add_pattern(name, pattern);
    config.masking_char = Some(masking_char.to_string());
    config
}

#[test]
fn readers_only_see_whole_configurations() {
    let store = Arc::new(RuleStore::new());
    let first = config("token", r"(token=)(\w+)", "*");
    let second = config("pin", r"(pin=)(\d+)", "#");
    store.apply_config(&first).unwrap();

    let allowed = [
        "user=alice token=****** pin=4321".to_string(),
        "user=alice token=abc123 pin=####".to_string(),
    ];
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = MaskingEngine::with_store(Arc::clone(&store));
            let stop = Arc::clone(&stop);
            let allowed = allowed.clone();
            thread::spawn(move || {
                let mut seen = 0usize;
                while !stop.load(Ordering::Relaxed) || seen == 0 {
                    let masked = engine.redact(LINE);
                    assert!(
                        allowed.iter().any(|a| *a == *masked),
                        "inconsistent rule set observed: {}",
                        masked
                    );
                    seen += 1;
                }
                seen
            })
        })
        .collect();

    for round in 0..200 {
        let next = if round % 2 == 0 { &second } else { &first };
        store.apply_config(next).unwrap();
    }
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
}

#[test]
fn concurrent_appends_are_all_kept() {
    let store = Arc::new(RuleStore::new());
    let writers: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .add_patterns(&format!(r"(key{}=)(\w+)", i))
                    .unwrap();
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(store.pattern_count(), 8);
    let engine = MaskingEngine::with_store(store);
    assert_eq!(engine.redact("key0=a key7=bb"), "key0=* key7=**");
}

#[test]
fn failed_mutation_does_not_disturb_readers() {
    let store = Arc::new(RuleStore::new());
    store.add_patterns(r"(token=)(\w+)").unwrap();
    let engine = MaskingEngine::with_store(Arc::clone(&store));

    let handle = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..100 {
                assert!(store.add_patterns(r"(ok=)(\w+),(broken)").is_err());
            }
        })
    };
    for _ in 0..100 {
        assert_eq!(engine.redact("token=xyz"), "token=***");
    }
    handle.join().unwrap();
    assert_eq!(store.pattern_count(), 1);
}
