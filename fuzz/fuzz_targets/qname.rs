#![no_main]

use libfuzzer_sys::fuzz_target;
use nicedump_core::{QName, SizeTree};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let qname = QName::parse(text);
    let rendered = qname.to_string();

    // Rendering is stable once parsed
    assert_eq!(QName::parse(&rendered).to_string(), rendered);

    let names = text.lines().map(|line| (QName::parse(line), line.len() as u64));
    let tree = SizeTree::build(names);
    let _ = tree.tree().to_string();
});
