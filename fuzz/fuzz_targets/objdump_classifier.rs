#![no_main]

use libfuzzer_sys::fuzz_target;
use nicedump_objdump::{classify, parse_disassembly, rewrite_instruction};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    for line in text.lines() {
        let _ = classify(line);
        let _ = rewrite_instruction(line);
    }

    // A successful pass yields symbols whose sizes cover their instructions
    if let Ok(disasm) = parse_disassembly(&text) {
        for symbol in disasm.symbols() {
            if let (Ok(size), Some(last)) = (symbol.size(), symbol.instructions().last()) {
                assert!(size >= last.offset);
            }
        }
        let _ = disasm.to_string();
    }
});
