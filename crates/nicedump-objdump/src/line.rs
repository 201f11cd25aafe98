//! Recognition of single `objdump -d` listing lines.
//!
//! Lines are matched against a fixed set of shapes:
//!
//! ```text
//! test.o:     file format elf64-x86-64           header
//! Disassembly of section .text:                  section marker
//! 0000000000000000 <_D4mainFZv>:                 symbol label
//!    4:   48 89 e5                mov    %rsp,%rbp   instruction
//!    b:   00 00                                  padding
//! ...                                            elided zeros
//! ```

/// Prefix of a section marker line.
const SECTION_MARKER: &str = "Disassembly of section";

/// Text following the file name in a header line.
const FILE_FORMAT: &str = "file format";

/// Line that stands for a run of elided zero bytes.
const ELISION: &str = "...";

/// A classified listing line. Borrowed text points into the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Blank lines, headers, section markers and elisions.
    Ignored,
    /// `<address> <name>:` starting a new symbol.
    Symbol { address: u64, name: &'a str },
    /// `<address>: <bytes> <text>`, `size` counting the byte pairs.
    Instruction {
        address: u64,
        size: u64,
        text: &'a str,
    },
    /// `<address>: <bytes>` with no text; alignment or a wrapped encoding.
    Padding { address: u64, size: u64 },
}

/// Classifies one listing line, `None` if it has no known shape.
///
/// Surrounding whitespace is ignored.
pub fn classify(line: &str) -> Option<Line<'_>> {
    let line = line.trim();

    if line.is_empty() || line == ELISION || is_header(line) || line.starts_with(SECTION_MARKER) {
        return Some(Line::Ignored);
    }

    symbol_label(line).or_else(|| instruction(line))
}

fn is_header(line: &str) -> bool {
    line.split_once(':')
        .is_some_and(|(_, rest)| rest.trim_start().starts_with(FILE_FORMAT))
}

fn is_hex_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'a'..=b'f')
}

/// Splits a leading lowercase hex address off `s`.
fn address(s: &str) -> Option<(u64, &str)> {
    let len = s.bytes().take_while(|&b| is_hex_digit(b)).count();
    if len == 0 {
        return None;
    }
    let value = u64::from_str_radix(&s[..len], 16).ok()?;
    Some((value, &s[len..]))
}

fn symbol_label(line: &str) -> Option<Line<'_>> {
    let (address, rest) = address(line)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = rest
        .trim_start()
        .strip_prefix('<')?
        .strip_suffix(':')?
        .trim_end()
        .strip_suffix('>')?;
    Some(Line::Symbol { address, name })
}

fn instruction(line: &str) -> Option<Line<'_>> {
    let (address, rest) = address(line)?;
    let mut rest = rest.strip_prefix(':')?.trim_start();

    let mut size = 0;
    while let Some(tail) = byte_pair(rest) {
        size += 1;
        rest = tail.trim_start();
    }
    if size == 0 {
        return None;
    }

    if rest.is_empty() {
        Some(Line::Padding { address, size })
    } else {
        Some(Line::Instruction {
            address,
            size,
            text: rest,
        })
    }
}

/// Consumes one encoded byte. The pair must end at whitespace or at the end
/// of the line, so a mnemonic such as `add` is never read as a byte.
fn byte_pair(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || !is_hex_digit(bytes[0]) || !is_hex_digit(bytes[1]) {
        return None;
    }
    let tail = &s[2..];
    if tail.is_empty() || tail.starts_with(char::is_whitespace) {
        Some(tail)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_lines() {
        for line in [
            "",
            "   ",
            "...",
            "kernel.o:     file format elf64-x86-64",
            "Disassembly of section .text:",
            "Disassembly of section .text._D6kernel4mainFZv:",
        ] {
            assert_eq!(classify(line), Some(Line::Ignored), "{:?}", line);
        }
    }

    #[test]
    fn test_symbol_label() {
        assert_eq!(
            classify("0000000000400120 <_D4mainFZv>:"),
            Some(Line::Symbol {
                address: 0x400120,
                name: "_D4mainFZv"
            })
        );
    }

    #[test]
    fn test_symbol_label_with_angle_brackets_in_name() {
        assert_eq!(
            classify("0000000000000010 <operator<<>:"),
            Some(Line::Symbol {
                address: 0x10,
                name: "operator<<"
            })
        );
    }

    #[test]
    fn test_instruction() {
        assert_eq!(
            classify("   4:\t48 89 e5             \tmov    %rsp,%rbp"),
            Some(Line::Instruction {
                address: 4,
                size: 3,
                text: "mov    %rsp,%rbp"
            })
        );
    }

    #[test]
    fn test_instruction_text_is_not_read_as_bytes() {
        assert_eq!(
            classify("  10:\t48 01 c8 add    %rcx,%rax"),
            Some(Line::Instruction {
                address: 0x10,
                size: 3,
                text: "add    %rcx,%rax"
            })
        );
    }

    #[test]
    fn test_padding() {
        assert_eq!(
            classify("  1b:\t00 00 00 00 "),
            Some(Line::Padding {
                address: 0x1b,
                size: 4
            })
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify("this is not objdump output"), None);
        assert_eq!(classify("  4:\tmov    %rsp,%rbp"), None);
        assert_eq!(classify("0000000000400120 _D4mainFZv:"), None);
        assert_eq!(classify("ffffffffffffffffff <too_wide>:"), None);
    }
}
