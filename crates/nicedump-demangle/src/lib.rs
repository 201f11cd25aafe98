//! # nicedump-demangle
//!
//! Demangling of `_D`-prefixed symbol names as emitted by D compilers.
//!
//! Supports the subset of the scheme needed to render readable names:
//! - qualified names and template instances (`name!(args)`)
//! - basic, pointer, array, associative-array and function/delegate types
//! - calling conventions, member functions, parameter storage modifiers
//!
//! Names that do not start with `_D` followed by a digit are passed through
//! untouched; names that do but violate the grammar are reported as a
//! [`DemangleError`] rather than rendered on a best-guess basis.

mod cursor;
pub mod error;
mod parser;
pub mod types;

use std::fmt;

pub use error::{Construct, DemangleError, DemangleResult};
pub use types::{
    BasicType, CallingConvention, FunctionSignature, MangledSignature, ParameterDescriptor,
    ParameterModifier, TypeDescriptor,
};

/// Prefix every mangled name starts with.
pub const MANGLING_PREFIX: &str = "_D";

/// Outcome of a successful demangling attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Demangled<'a> {
    /// The input was not a mangled name; it is returned unchanged.
    PassThrough(&'a str),
    /// The input was decoded.
    Signature(MangledSignature),
}

impl Demangled<'_> {
    /// Returns true if the input was not a mangled name.
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough(_))
    }

    /// The name and argument list without return type, or the untouched
    /// input for pass-through names.
    pub fn readable_name(&self) -> String {
        match self {
            Self::PassThrough(name) => (*name).to_string(),
            Self::Signature(sig) => sig.readable_name(),
        }
    }
}

impl fmt::Display for Demangled<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassThrough(name) => f.write_str(name),
            Self::Signature(sig) => write!(f, "{}", sig),
        }
    }
}

/// Returns true if `name` carries the mangling prefix followed by a digit.
pub fn is_mangled(name: &str) -> bool {
    name.strip_prefix(MANGLING_PREFIX)
        .is_some_and(|body| body.starts_with(|c: char| c.is_ascii_digit()))
}

/// Demangle a symbol name.
///
/// Returns [`Demangled::PassThrough`] for names outside the scheme, and an
/// error for names that claim the scheme but cannot be parsed.
pub fn demangle(name: &str) -> DemangleResult<Demangled<'_>> {
    if !is_mangled(name) {
        return Ok(Demangled::PassThrough(name));
    }
    parser::parse_symbol(&name[MANGLING_PREFIX.len()..]).map(Demangled::Signature)
}

/// Demangle a symbol name to the readable form used in listings and size
/// reports, e.g. `kernel.vga.putc(char)`.
///
/// Pass-through names are returned unchanged.
pub fn demangle_name(name: &str) -> DemangleResult<String> {
    demangle(name).map(|d| d.readable_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_demangle() {
        assert_eq!(demangle_name("_D4mainFZv").unwrap(), "main()");
        let full = demangle("_D4mainFZv").unwrap();
        assert_eq!(full.to_string(), "void main()");
    }

    #[test]
    fn test_non_mangled() {
        assert_eq!(demangle("printf").unwrap(), Demangled::PassThrough("printf"));
        assert_eq!(demangle("_Z4mainv").unwrap(), Demangled::PassThrough("_Z4mainv"));
        assert_eq!(demangle("_Dmain").unwrap(), Demangled::PassThrough("_Dmain"));
        assert_eq!(demangle("_D").unwrap(), Demangled::PassThrough("_D"));
        assert_eq!(demangle("").unwrap(), Demangled::PassThrough(""));
        assert!(demangle("printf").unwrap().is_pass_through());
        assert!(!demangle("_D4mainFZv").unwrap().is_pass_through());
    }

    #[test]
    fn test_pass_through_is_idempotent() {
        let once = demangle_name("memcpy").unwrap();
        let twice = demangle_name(&once).unwrap();
        assert_eq!(once, "memcpy");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_failure_is_distinct_from_pass_through() {
        let err = demangle("_D4mainQ").unwrap_err();
        assert_eq!(err.construct(), Construct::CallingConvention);
        assert_eq!(err.remaining(), "Q");
    }

    #[test]
    fn test_template_with_type_and_symbol_argument() {
        assert_eq!(
            demangle_name("_D15__T3FooTiS3barZ3runFZv").unwrap(),
            "Foo!(int,bar).run()"
        );
    }

    #[test]
    fn test_member_function_this() {
        let name = demangle_name("_D6kernel7Console5writeMFiiZv").unwrap();
        assert_eq!(name, "kernel.Console.write(int,int,this)");
        assert!(name.ends_with(",this)"));
    }

    #[test]
    fn test_is_mangled() {
        assert!(is_mangled("_D4main"));
        assert!(!is_mangled("_Dx"));
        assert!(!is_mangled("main"));
    }
}
