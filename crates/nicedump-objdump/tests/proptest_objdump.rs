//! Property-based tests for listing processing.
//!
//! These tests verify:
//! - Classification and rewriting never panic on arbitrary input
//! - Hex literals read back as their two's complement value
//! - Instruction sizes count the listed byte pairs
//! - Symbol sizes equal the end of their last instruction

use proptest::prelude::*;

use nicedump_objdump::{classify, decimal_literals, parse_disassembly, rewrite_instruction, Line};

// =============================================================================
// Safety Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10000))]

    /// Classifying arbitrary lines never panics.
    #[test]
    fn classify_never_panics(line in "\\PC*") {
        let _ = classify(&line);
    }

    /// Rewriting arbitrary instruction text never panics.
    #[test]
    fn rewrite_never_panics(text in "[a-z]{1,6} +[0-9a-fx$%(),<>_+#-]{0,40}") {
        let _ = rewrite_instruction(&text);
    }

    /// Processing arbitrary listings never panics.
    #[test]
    fn parse_never_panics(lines in prop::collection::vec("[0-9a-f :<>\\t_.]{0,30}", 0..20)) {
        let _ = parse_disassembly(&lines.join("\n"));
    }
}

// =============================================================================
// Rewriting Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5000))]

    /// Every 64-bit literal reads back as the same bit pattern.
    #[test]
    fn hex_literals_are_twos_complement(value in any::<u64>()) {
        let rewritten = decimal_literals(&format!("mov    $0x{:x},%rax", value));
        let decimal = rewritten
            .strip_prefix("mov    $")
            .and_then(|s| s.strip_suffix(",%rax"))
            .unwrap();
        prop_assert_eq!(decimal.parse::<i64>().unwrap() as u64, value);
    }

    /// Text without a hex prefix is left alone.
    #[test]
    fn text_without_literals_unchanged(text in "[a-wyz %(),$0-9]{0,40}") {
        prop_assert_eq!(decimal_literals(&text), text);
    }

    /// Branches to plain symbols keep the symbol and drop the address.
    #[test]
    fn branch_targets_keep_symbol(
        mnemonic in prop::sample::select(vec!["call", "callq", "jmp", "jne", "jz"]),
        target in "[0-9a-f]{1,8}",
        symbol in "[a-z_][a-z0-9_]{0,12}",
    ) {
        let text = format!("{} {} <{}>", mnemonic, target, symbol);
        let rewritten = rewrite_instruction(&text).unwrap();
        let symbol_suffix = format!("<{}>", symbol);
        let address_token = format!(" {} ", target);
        prop_assert!(rewritten.ends_with(&symbol_suffix));
        prop_assert!(!rewritten.contains(&address_token));
    }
}

// =============================================================================
// Listing Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// The size of an instruction line is its number of byte pairs.
    #[test]
    fn instruction_size_counts_pairs(
        address in 0u64..0xffff,
        bytes in prop::collection::vec(any::<u8>(), 1..16),
    ) {
        let encoded: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        let line = format!("{:>6x}:\t{} \tnop", address, encoded.join(" "));
        prop_assert_eq!(
            classify(&line),
            Some(Line::Instruction { address, size: bytes.len() as u64, text: "nop" })
        );
    }

    /// A symbol's size is the end of its last instruction.
    #[test]
    fn symbol_size_is_end_of_last_instruction(
        base in 0u64..0x10000,
        sizes in prop::collection::vec(1u64..15, 1..20),
    ) {
        let mut listing = format!("{:016x} <f>:\n", base);
        let mut offset = 0;
        for size in &sizes {
            let encoded = vec!["90"; *size as usize].join(" ");
            listing.push_str(&format!("{:>6x}:\t{} \tnop\n", base + offset, encoded));
            offset += size;
        }

        let disasm = parse_disassembly(&listing).unwrap();
        prop_assert_eq!(disasm.symbol("f").unwrap().size(), Ok(sizes.iter().sum::<u64>()));
    }
}
