//! Rewriting of instruction text into its readable form.
//!
//! Applied in order:
//! 1. a trailing `# comment` is split off;
//! 2. a direct call or jump to `<symbol>` becomes `mnemonic <demangled>`,
//!    and nothing else is rewritten;
//! 3. every `0x` literal becomes a signed decimal;
//! 4. a `disp(%rip)` operand whose comment names the referenced symbol is
//!    replaced by that symbol.

use nicedump_demangle::demangle_name;

use crate::SymbolError;

/// Mnemonics whose operand is a direct branch target.
pub const CONTROL_FLOW_MNEMONICS: &[&str] = &[
    "call", "callq", "jmp", "jmpq", "ja", "jae", "jb", "jbe", "jc", "jcxz", "je", "jecxz", "jg",
    "jge", "jl", "jle", "jna", "jnae", "jnb", "jnbe", "jnc", "jne", "jng", "jnge", "jnl", "jnle",
    "jno", "jnp", "jns", "jnz", "jo", "jp", "jpe", "jpo", "jrcxz", "js", "jz",
];

/// Column width the mnemonic of a rewritten branch is padded to.
const MNEMONIC_WIDTH: usize = 7;

const HEX_PREFIX: &str = "0x";

const RIP_OPERAND: &str = "(%rip)";

/// Number of hex digits of the address leading a PC-relative comment.
const COMMENT_ADDRESS_DIGITS: usize = 16;

/// Rewrites the text of one instruction.
///
/// Fails only if a branch target claims the mangling scheme but cannot be
/// demangled.
pub fn rewrite_instruction(text: &str) -> Result<String, SymbolError> {
    let (code, comment) = split_comment(text);

    if let Some(branch) = Branch::parse(code) {
        return branch.render();
    }

    let code = decimal_literals(code);
    Ok(match comment.and_then(commented_symbol) {
        Some(symbol) => replace_rip_operand(&code, symbol).unwrap_or(code),
        None => code,
    })
}

/// Splits at the first `#`, trimming both halves.
fn split_comment(text: &str) -> (&str, Option<&str>) {
    match text.split_once('#') {
        Some((code, comment)) => (code.trim(), Some(comment.trim())),
        None => (text.trim(), None),
    }
}

/// A direct branch: `mnemonic <hex target> <symbol[+-0xoffset]>`.
#[derive(Debug, PartialEq, Eq)]
struct Branch<'a> {
    mnemonic: &'a str,
    symbol: &'a str,
    offset: &'a str,
}

impl<'a> Branch<'a> {
    fn parse(code: &'a str) -> Option<Self> {
        let (mnemonic, rest) = code.split_once(char::is_whitespace)?;
        if !CONTROL_FLOW_MNEMONICS.contains(&mnemonic) {
            return None;
        }

        let (target, rest) = rest.trim_start().split_once(char::is_whitespace)?;
        if target.is_empty() || !target.bytes().all(is_hex_digit) {
            return None;
        }

        let inner = rest.trim_start().strip_prefix('<')?.strip_suffix('>')?;
        let (symbol, offset) = match inner.find(['+', '-']) {
            Some(at) => inner.split_at(at),
            None => (inner, ""),
        };
        if !offset.is_empty() && !is_offset(offset) {
            return None;
        }

        Some(Self {
            mnemonic,
            symbol,
            offset,
        })
    }

    fn render(&self) -> Result<String, SymbolError> {
        let name = demangle_name(self.symbol).map_err(|e| SymbolError::new(self.symbol, e))?;
        Ok(format!(
            "{:<width$}<{}{}>",
            self.mnemonic,
            name,
            self.offset,
            width = MNEMONIC_WIDTH
        ))
    }
}

fn is_hex_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'a'..=b'f')
}

/// `+0x1f` or `-0x8`.
fn is_offset(s: &str) -> bool {
    s[1..]
        .strip_prefix(HEX_PREFIX)
        .is_some_and(|digits| digits.bytes().all(is_hex_digit))
}

/// Replaces every `0x<hex>` literal by its signed decimal value.
///
/// Values with the top bit set read as negative two's complement. Literals
/// that do not fit in 64 bits are left as they are.
pub fn decimal_literals(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut rest = code;

    while let Some(at) = rest.find(HEX_PREFIX) {
        let digits_start = at + HEX_PREFIX.len();
        let digits = rest[digits_start..]
            .bytes()
            .take_while(|&b| is_hex_digit(b))
            .count();
        let end = digits_start + digits;

        out.push_str(&rest[..at]);
        match u64::from_str_radix(&rest[digits_start..end], 16) {
            Ok(value) if digits > 0 => out.push_str(&(value as i64).to_string()),
            _ => out.push_str(&rest[at..end]),
        }
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

/// Extracts `symbol` from a `<16 hex digits> <symbol>` comment.
fn commented_symbol(comment: &str) -> Option<&str> {
    let address = comment.get(..COMMENT_ADDRESS_DIGITS)?;
    if !address.bytes().all(is_hex_digit) {
        return None;
    }
    comment[COMMENT_ADDRESS_DIGITS..]
        .trim_start()
        .strip_prefix('<')?
        .strip_suffix('>')
}

/// Replaces the first `[-]<decimal>(%rip)` operand by `<symbol>`.
fn replace_rip_operand(code: &str, symbol: &str) -> Option<String> {
    for (at, _) in code.match_indices(RIP_OPERAND) {
        let digits = code[..at]
            .bytes()
            .rev()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits == 0 {
            continue;
        }

        let mut start = at - digits;
        if code[..start].ends_with('-') {
            start -= 1;
        }
        let end = at + RIP_OPERAND.len();
        return Some(format!("{}<{}>{}", &code[..start], symbol, &code[end..]));
    }
    None
}
