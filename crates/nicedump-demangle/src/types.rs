//! Structured results of demangling.
//!
//! Every type here renders with [`fmt::Display`] in the readable D syntax the
//! rest of the pipeline consumes.

use std::fmt;

/// Scalar types with a single-character mangling tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicType {
    Void,
    Bool,
    Byte,
    Ubyte,
    Short,
    Ushort,
    Int,
    Uint,
    Long,
    Ulong,
    Float,
    Double,
    Real,
    Ifloat,
    Idouble,
    Ireal,
    Cfloat,
    Cdouble,
    Creal,
    Char,
    Wchar,
    Dchar,
}

impl BasicType {
    /// Every basic type, in tag table order.
    pub const ALL: [BasicType; 22] = [
        Self::Void,
        Self::Bool,
        Self::Byte,
        Self::Ubyte,
        Self::Short,
        Self::Ushort,
        Self::Int,
        Self::Uint,
        Self::Long,
        Self::Ulong,
        Self::Float,
        Self::Double,
        Self::Real,
        Self::Ifloat,
        Self::Idouble,
        Self::Ireal,
        Self::Cfloat,
        Self::Cdouble,
        Self::Creal,
        Self::Char,
        Self::Wchar,
        Self::Dchar,
    ];

    /// Looks up the basic type for a mangling tag.
    pub fn from_tag(tag: char) -> Option<Self> {
        let ty = match tag {
            'v' => Self::Void,
            'b' => Self::Bool,
            'g' => Self::Byte,
            'h' => Self::Ubyte,
            's' => Self::Short,
            't' => Self::Ushort,
            'i' => Self::Int,
            'k' => Self::Uint,
            'l' => Self::Long,
            'm' => Self::Ulong,
            'f' => Self::Float,
            'd' => Self::Double,
            'e' => Self::Real,
            'o' => Self::Ifloat,
            'p' => Self::Idouble,
            'j' => Self::Ireal,
            'q' => Self::Cfloat,
            'r' => Self::Cdouble,
            'c' => Self::Creal,
            'a' => Self::Char,
            'u' => Self::Wchar,
            'w' => Self::Dchar,
            _ => return None,
        };
        Some(ty)
    }

    /// Returns the mangling tag of this type.
    pub fn tag(&self) -> char {
        match self {
            Self::Void => 'v',
            Self::Bool => 'b',
            Self::Byte => 'g',
            Self::Ubyte => 'h',
            Self::Short => 's',
            Self::Ushort => 't',
            Self::Int => 'i',
            Self::Uint => 'k',
            Self::Long => 'l',
            Self::Ulong => 'm',
            Self::Float => 'f',
            Self::Double => 'd',
            Self::Real => 'e',
            Self::Ifloat => 'o',
            Self::Idouble => 'p',
            Self::Ireal => 'j',
            Self::Cfloat => 'q',
            Self::Cdouble => 'r',
            Self::Creal => 'c',
            Self::Char => 'a',
            Self::Wchar => 'u',
            Self::Dchar => 'w',
        }
    }

    /// Returns the source-level name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Ubyte => "ubyte",
            Self::Short => "short",
            Self::Ushort => "ushort",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Long => "long",
            Self::Ulong => "ulong",
            Self::Float => "float",
            Self::Double => "double",
            Self::Real => "real",
            Self::Ifloat => "ifloat",
            Self::Idouble => "idouble",
            Self::Ireal => "ireal",
            Self::Cfloat => "cfloat",
            Self::Cdouble => "cdouble",
            Self::Creal => "creal",
            Self::Char => "char",
            Self::Wchar => "wchar",
            Self::Dchar => "dchar",
        }
    }
}

/// ABI tag of a function signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CallingConvention {
    #[default]
    Default,
    ExternC,
    ExternWindows,
    ExternPascal,
    ExternCpp,
}

impl CallingConvention {
    /// Looks up the calling convention for a mangling tag.
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'F' => Some(Self::Default),
            'U' => Some(Self::ExternC),
            'W' => Some(Self::ExternWindows),
            'V' => Some(Self::ExternPascal),
            'R' => Some(Self::ExternCpp),
            _ => None,
        }
    }

    /// Returns the linkage attribute spelling, empty for the default.
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Default => "",
            Self::ExternC => "extern (C)",
            Self::ExternWindows => "extern (Windows)",
            Self::ExternPascal => "extern (Pascal)",
            Self::ExternCpp => "extern (C++)",
        }
    }
}

/// Storage modifier on a function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterModifier {
    Out,
    InOut,
    Lazy,
}

impl ParameterModifier {
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'J' => Some(Self::Out),
            'K' => Some(Self::InOut),
            'L' => Some(Self::Lazy),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Out => "out",
            Self::InOut => "inout",
            Self::Lazy => "lazy",
        }
    }
}

/// A decoded type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Basic(BasicType),
    Pointer(Box<TypeDescriptor>),
    DynamicArray(Box<TypeDescriptor>),
    StaticArray(Box<TypeDescriptor>, usize),
    AssociativeArray {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    /// A function or delegate type.
    Function(Box<FunctionSignature>),
    /// A class, struct, enum or typedef, named by its qualified name.
    Named(Vec<String>),
    /// A tag the parser could not classify.
    Unknown,
}

impl TypeDescriptor {
    /// Returns true for [`TypeDescriptor::Unknown`].
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(basic) => f.write_str(basic.name()),
            Self::Pointer(inner) => write!(f, "{}*", inner),
            Self::DynamicArray(inner) => write!(f, "{}[]", inner),
            Self::StaticArray(inner, len) => write!(f, "{}[{}]", inner, len),
            Self::AssociativeArray { key, value } => write!(f, "{}[{}]", value, key),
            Self::Function(sig) => {
                let keyword = if sig.is_delegate { "delegate" } else { "function" };
                write!(f, "{} {}(", sig.return_type, keyword)?;
                write_arguments(f, &sig.parameters, sig.has_implicit_this())?;
                f.write_str(")")
            }
            Self::Named(segments) => f.write_str(&segments.join(".")),
            Self::Unknown => f.write_str("?"),
        }
    }
}

/// One entry of a parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterDescriptor {
    Typed {
        modifier: Option<ParameterModifier>,
        ty: TypeDescriptor,
    },
    /// The `...` marker closing a variadic parameter list.
    Variadic,
}

impl ParameterDescriptor {
    pub fn typed(ty: TypeDescriptor) -> Self {
        Self::Typed { modifier: None, ty }
    }
}

impl fmt::Display for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed { modifier: Some(m), ty } => write!(f, "{} {}", m.keyword(), ty),
            Self::Typed { modifier: None, ty } => write!(f, "{}", ty),
            Self::Variadic => f.write_str("..."),
        }
    }
}

/// Writes `a,b,c` with an implicit trailing `this` for methods and delegates.
fn write_arguments(
    f: &mut fmt::Formatter<'_>,
    parameters: &[ParameterDescriptor],
    implicit_this: bool,
) -> fmt::Result {
    let mut first = true;
    for param in parameters {
        if !first {
            f.write_str(",")?;
        }
        write!(f, "{}", param)?;
        first = false;
    }
    if implicit_this {
        if !first {
            f.write_str(",")?;
        }
        f.write_str("this")?;
    }
    Ok(())
}

/// The function part of a mangled name, also used for function-typed values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    pub calling_convention: CallingConvention,
    pub is_delegate: bool,
    pub is_member_function: bool,
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: TypeDescriptor,
}

impl FunctionSignature {
    /// Returns true if `this` is appended to the rendered argument list.
    pub fn has_implicit_this(&self) -> bool {
        self.is_member_function || self.is_delegate
    }
}

/// The decoded form of one mangled symbol name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MangledSignature {
    /// Name segments, outermost scope first.
    pub qualified_name: Vec<String>,
    /// Absent when the mangled name carried no function part.
    pub return_type: Option<TypeDescriptor>,
    pub parameters: Vec<ParameterDescriptor>,
    pub calling_convention: CallingConvention,
    pub is_delegate: bool,
    pub is_member_function: bool,
}

impl MangledSignature {
    /// A signature for a mangled name without a function part.
    pub fn name_only(qualified_name: Vec<String>) -> Self {
        Self {
            qualified_name,
            return_type: None,
            parameters: Vec::new(),
            calling_convention: CallingConvention::Default,
            is_delegate: false,
            is_member_function: false,
        }
    }

    /// A signature combining a name with its decoded function part.
    pub fn with_function(qualified_name: Vec<String>, function: FunctionSignature) -> Self {
        Self {
            qualified_name,
            return_type: Some(function.return_type),
            parameters: function.parameters,
            calling_convention: function.calling_convention,
            is_delegate: function.is_delegate,
            is_member_function: function.is_member_function,
        }
    }

    /// The dotted qualified name, e.g. `kernel.vga.putc`.
    pub fn dotted_name(&self) -> String {
        self.qualified_name.join(".")
    }

    /// Returns true if `this` is appended to the rendered argument list.
    pub fn has_implicit_this(&self) -> bool {
        self.is_member_function || self.is_delegate
    }

    /// The name and argument list without the return type, e.g.
    /// `kernel.vga.putc(char)`.
    ///
    /// This is the form the qualified-name model parses.
    pub fn readable_name(&self) -> String {
        ReadableName(self).to_string()
    }
}

struct ReadableName<'a>(&'a MangledSignature);

impl fmt::Display for ReadableName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sig = self.0;
        write!(f, "{}(", sig.dotted_name())?;
        write_arguments(f, &sig.parameters, sig.has_implicit_this())?;
        f.write_str(")")
    }
}

impl fmt::Display for MangledSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ret) = &self.return_type {
            write!(f, "{} ", ret)?;
        }
        write!(f, "{}", ReadableName(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_basic_tags_round_trip() {
        for ty in BasicType::ALL {
            assert_eq!(BasicType::from_tag(ty.tag()), Some(ty));
        }
    }

    #[test]
    fn test_basic_names_are_distinct() {
        let names: HashSet<_> = BasicType::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), BasicType::ALL.len());
        let tags: HashSet<_> = BasicType::ALL.iter().map(|t| t.tag()).collect();
        assert_eq!(tags.len(), BasicType::ALL.len());
    }

    #[test]
    fn test_compound_rendering() {
        let int = || Box::new(TypeDescriptor::Basic(BasicType::Int));
        assert_eq!(TypeDescriptor::Pointer(int()).to_string(), "int*");
        assert_eq!(TypeDescriptor::DynamicArray(int()).to_string(), "int[]");
        assert_eq!(TypeDescriptor::StaticArray(int(), 16).to_string(), "int[16]");
        let aa = TypeDescriptor::AssociativeArray {
            key: Box::new(TypeDescriptor::Basic(BasicType::Char)),
            value: int(),
        };
        assert_eq!(aa.to_string(), "int[char]");
    }

    #[test]
    fn test_delegate_type_rendering() {
        let sig = FunctionSignature {
            calling_convention: CallingConvention::Default,
            is_delegate: true,
            is_member_function: false,
            parameters: vec![ParameterDescriptor::typed(TypeDescriptor::Basic(BasicType::Int))],
            return_type: TypeDescriptor::Basic(BasicType::Void),
        };
        let ty = TypeDescriptor::Function(Box::new(sig));
        assert_eq!(ty.to_string(), "void delegate(int,this)");
    }

    #[test]
    fn test_function_pointer_keeps_star() {
        let sig = FunctionSignature {
            calling_convention: CallingConvention::Default,
            is_delegate: false,
            is_member_function: false,
            parameters: Vec::new(),
            return_type: TypeDescriptor::Basic(BasicType::Void),
        };
        let ty = TypeDescriptor::Pointer(Box::new(TypeDescriptor::Function(Box::new(sig))));
        assert_eq!(ty.to_string(), "void function()*");
    }

    #[test]
    fn test_signature_forms() {
        let function = FunctionSignature {
            calling_convention: CallingConvention::ExternC,
            is_delegate: false,
            is_member_function: false,
            parameters: vec![
                ParameterDescriptor::Typed {
                    modifier: Some(ParameterModifier::Out),
                    ty: TypeDescriptor::Basic(BasicType::Int),
                },
                ParameterDescriptor::Variadic,
            ],
            return_type: TypeDescriptor::Basic(BasicType::Bool),
        };
        let sig = MangledSignature::with_function(vec!["io".into(), "printf".into()], function);
        assert_eq!(sig.to_string(), "bool io.printf(out int,...)");
        assert_eq!(sig.readable_name(), "io.printf(out int,...)");
    }

    #[test]
    fn test_name_only_signature() {
        let sig = MangledSignature::name_only(vec!["main".into()]);
        assert_eq!(sig.to_string(), "main()");
        assert_eq!(sig.readable_name(), "main()");
    }
}
