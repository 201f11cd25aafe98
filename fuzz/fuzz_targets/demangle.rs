#![no_main]

use libfuzzer_sys::fuzz_target;
use nicedump_demangle::{demangle, Demangled};

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    // Errors are fine, panics are not
    if let Ok(demangled) = demangle(name) {
        let readable = demangled.readable_name();
        let _ = demangled.to_string();

        // Pass-through names come back untouched
        if let Demangled::PassThrough(untouched) = demangled {
            assert_eq!(untouched, readable);
        }
    }

    // Also try with the prefix forced on
    let _ = demangle(&format!("_D{}", name));
});
