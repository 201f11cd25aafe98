//! Recursive-descent parser for `_D` mangled names.
//!
//! Grammar, with `Number` a run of decimal digits:
//!
//! ```text
//! Symbol         := QualifiedName FunctionSig?
//! QualifiedName  := Name+
//! Name           := Number <Number chars> | Number TemplateName
//! TemplateName   := "__T" Name ( "T" Type | "S" Name )* "Z"
//! FunctionSig    := "Z" | ("D" | "M")* CallConv Param* ("Z" | "X" | "Y") Type
//! Param          := ("J" | "K" | "L")? Type
//! Type           := Basic | "A" Type | "P" Type | "G" Number Type
//!                 | "H" Type Type | FunctionSig | ("C" | "S" | "E" | "T") QualifiedName
//! ```

use crate::cursor::Cursor;
use crate::error::{Construct, DemangleError, DemangleResult};
use crate::types::{
    BasicType, CallingConvention, FunctionSignature, MangledSignature, ParameterDescriptor,
    ParameterModifier, TypeDescriptor,
};

/// Marker opening a template instance inside a length-prefixed name.
const TEMPLATE_MARKER: &str = "__T";

/// Maximum nesting of compound types, templates and function signatures.
const MAX_DEPTH: usize = 128;

/// Parses a mangled name with the `_D` prefix already stripped.
pub(crate) fn parse_symbol(body: &str) -> DemangleResult<MangledSignature> {
    let mut cursor = Cursor::new(body);
    Parser::default().symbol(&mut cursor)
}

#[derive(Default)]
struct Parser {
    depth: usize,
}

impl Parser {
    fn enter(&mut self, construct: Construct, remaining: &str) -> DemangleResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(DemangleError::too_deep(construct, remaining));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn symbol(&mut self, cursor: &mut Cursor<'_>) -> DemangleResult<MangledSignature> {
        let name = self.qualified_name(cursor)?;

        if cursor.is_empty() {
            return Ok(MangledSignature::name_only(name));
        }

        let function = self.function_signature(cursor)?;
        if !cursor.is_empty() {
            return Err(DemangleError::trailing_input(
                Construct::Symbol,
                cursor.remaining(),
            ));
        }

        Ok(MangledSignature::with_function(name, function))
    }

    fn qualified_name(&mut self, cursor: &mut Cursor<'_>) -> DemangleResult<Vec<String>> {
        let mut segments = Vec::new();
        while cursor.next_is_digit() {
            segments.push(self.name(cursor)?);
        }

        if segments.is_empty() {
            return Err(match cursor.is_empty() {
                true => DemangleError::unexpected_end(Construct::QualifiedName),
                false => {
                    DemangleError::unexpected_tag(Construct::QualifiedName, cursor.remaining())
                }
            });
        }
        Ok(segments)
    }

    fn name(&mut self, cursor: &mut Cursor<'_>) -> DemangleResult<String> {
        let len = cursor.number(Construct::Name)?;

        if cursor.starts_with(TEMPLATE_MARKER) {
            // The length covers the marker as well as the template body.
            if len < TEMPLATE_MARKER.len() {
                return Err(DemangleError::truncated(
                    Construct::TemplateName,
                    TEMPLATE_MARKER.len(),
                    &cursor.remaining()[..len],
                ));
            }
            let mut body = cursor.split_off(len, Construct::TemplateName)?;
            body.eat(TEMPLATE_MARKER);
            return self.template_name(&mut body);
        }

        Ok(cursor.take(len, Construct::Name)?.to_string())
    }

    fn template_name(&mut self, body: &mut Cursor<'_>) -> DemangleResult<String> {
        self.enter(Construct::TemplateName, body.remaining())?;

        let name = self.name(body)?;
        let mut args = Vec::new();

        loop {
            let remaining = body.remaining();
            match body.bump() {
                Some('T') => {
                    let ty = self.required_type(body, Construct::TemplateArgument)?;
                    args.push(ty.to_string());
                }
                Some('S') => args.push(self.name(body)?),
                Some('Z') => break,
                Some(_) => {
                    return Err(DemangleError::unexpected_tag(
                        Construct::TemplateArgument,
                        remaining,
                    ))
                }
                None => return Err(DemangleError::unexpected_end(Construct::TemplateArgument)),
            }
        }

        if !body.is_empty() {
            return Err(DemangleError::trailing_input(
                Construct::TemplateName,
                body.remaining(),
            ));
        }

        self.leave();
        Ok(format!("{}!({})", name, args.join(",")))
    }

    /// Parses a type that must be recognized for parsing to continue.
    fn required_type(
        &mut self,
        cursor: &mut Cursor<'_>,
        construct: Construct,
    ) -> DemangleResult<TypeDescriptor> {
        let remaining = cursor.remaining();
        let ty = self.type_descriptor(cursor)?;
        if ty.is_unknown() {
            return Err(DemangleError::unexpected_tag(construct, remaining));
        }
        Ok(ty)
    }

    /// Parses one type.
    ///
    /// An unrecognized tag yields [`TypeDescriptor::Unknown`] and leaves the
    /// cursor where it was.
    fn type_descriptor(&mut self, cursor: &mut Cursor<'_>) -> DemangleResult<TypeDescriptor> {
        let tag = cursor
            .peek()
            .ok_or_else(|| DemangleError::unexpected_end(Construct::Type))?;

        if let Some(basic) = BasicType::from_tag(tag) {
            cursor.bump();
            return Ok(TypeDescriptor::Basic(basic));
        }

        self.enter(Construct::Type, cursor.remaining())?;

        let ty = match tag {
            'A' => {
                cursor.bump();
                TypeDescriptor::DynamicArray(Box::new(self.required_type(cursor, Construct::Type)?))
            }
            'P' => {
                cursor.bump();
                TypeDescriptor::Pointer(Box::new(self.required_type(cursor, Construct::Type)?))
            }
            'G' => {
                cursor.bump();
                let len = cursor.number(Construct::Type)?;
                let inner = self.required_type(cursor, Construct::Type)?;
                TypeDescriptor::StaticArray(Box::new(inner), len)
            }
            'H' => {
                cursor.bump();
                let key = self.required_type(cursor, Construct::Type)?;
                let value = self.required_type(cursor, Construct::Type)?;
                TypeDescriptor::AssociativeArray {
                    key: Box::new(key),
                    value: Box::new(value),
                }
            }
            'D' | 'M' | 'F' | 'U' | 'W' | 'V' | 'R' => {
                TypeDescriptor::Function(Box::new(self.function_signature(cursor)?))
            }
            'C' | 'S' | 'E' | 'T' => {
                cursor.bump();
                TypeDescriptor::Named(self.qualified_name(cursor)?)
            }
            _ => TypeDescriptor::Unknown,
        };

        self.leave();
        Ok(ty)
    }

    fn function_signature(&mut self, cursor: &mut Cursor<'_>) -> DemangleResult<FunctionSignature> {
        self.enter(Construct::FunctionSignature, cursor.remaining())?;

        // A bare terminator: no calling convention, no parameters.
        if cursor.eat("Z") {
            self.leave();
            return Ok(FunctionSignature {
                calling_convention: CallingConvention::Default,
                is_delegate: false,
                is_member_function: false,
                parameters: Vec::new(),
                return_type: TypeDescriptor::Basic(BasicType::Void),
            });
        }

        let mut is_delegate = false;
        let mut is_member_function = false;
        loop {
            match cursor.peek() {
                Some('D') => is_delegate = true,
                Some('M') => is_member_function = true,
                _ => break,
            }
            cursor.bump();
        }

        let remaining = cursor.remaining();
        let tag = cursor.expect_any(Construct::CallingConvention)?;
        let calling_convention = CallingConvention::from_tag(tag)
            .ok_or_else(|| DemangleError::unexpected_tag(Construct::CallingConvention, remaining))?;

        let mut parameters = Vec::new();
        loop {
            match cursor.peek() {
                None => return Err(DemangleError::unexpected_end(Construct::Parameter)),
                Some('Z') => {
                    cursor.bump();
                    break;
                }
                Some('X') | Some('Y') => {
                    cursor.bump();
                    parameters.push(ParameterDescriptor::Variadic);
                    break;
                }
                Some(tag) => {
                    let modifier = ParameterModifier::from_tag(tag);
                    if modifier.is_some() {
                        cursor.bump();
                    }
                    let ty = self.required_type(cursor, Construct::Parameter)?;
                    parameters.push(ParameterDescriptor::Typed { modifier, ty });
                }
            }
        }

        let return_type = self.required_type(cursor, Construct::ReturnType)?;

        self.leave();
        Ok(FunctionSignature {
            calling_convention,
            is_delegate,
            is_member_function,
            parameters,
            return_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> MangledSignature {
        parse_symbol(body).unwrap_or_else(|e| panic!("failed to parse {body}: {e}"))
    }

    #[test]
    fn test_simple_function() {
        let sig = parse("4mainFZv");
        assert_eq!(sig.qualified_name, vec!["main"]);
        assert_eq!(sig.return_type, Some(TypeDescriptor::Basic(BasicType::Void)));
        assert!(sig.parameters.is_empty());
        assert_eq!(sig.readable_name(), "main()");
        assert_eq!(sig.to_string(), "void main()");
    }

    #[test]
    fn test_qualified_name_only() {
        let sig = parse("6kernel3vga");
        assert_eq!(sig.qualified_name, vec!["kernel", "vga"]);
        assert_eq!(sig.return_type, None);
        assert_eq!(sig.to_string(), "kernel.vga()");
    }

    #[test]
    fn test_parameters_and_return_type() {
        let sig = parse("6kernel3vga4putcFaiZb");
        assert_eq!(sig.to_string(), "bool kernel.vga.putc(char,int)");
    }

    #[test]
    fn test_member_function_appends_this() {
        let sig = parse("3foo3Bar3bazMFiiZv");
        assert!(sig.is_member_function);
        assert_eq!(sig.parameters.len(), 2);
        assert_eq!(sig.readable_name(), "foo.Bar.baz(int,int,this)");
    }

    #[test]
    fn test_member_function_without_parameters() {
        let sig = parse("3foo3Bar4sizeMFZk");
        assert_eq!(sig.to_string(), "uint foo.Bar.size(this)");
    }

    #[test]
    fn test_calling_conventions() {
        assert_eq!(parse("1fUZv").calling_convention, CallingConvention::ExternC);
        assert_eq!(parse("1fWZv").calling_convention, CallingConvention::ExternWindows);
        assert_eq!(parse("1fVZv").calling_convention, CallingConvention::ExternPascal);
        assert_eq!(parse("1fRZv").calling_convention, CallingConvention::ExternCpp);
        assert_eq!(parse("1fFZv").calling_convention, CallingConvention::Default);
    }

    #[test]
    fn test_unknown_calling_convention() {
        let err = parse_symbol("1fQZv").unwrap_err();
        assert_eq!(err.construct(), Construct::CallingConvention);
        assert_eq!(err.remaining(), "QZv");
    }

    #[test]
    fn test_variadic_parameters() {
        let sig = parse("6printfUPaXi");
        assert_eq!(sig.to_string(), "int printf(char*,...)");
    }

    #[test]
    fn test_parameter_modifiers() {
        let sig = parse("3swpFKiJkLbZv");
        assert_eq!(sig.readable_name(), "swp(inout int,out uint,lazy bool)");
    }

    #[test]
    fn test_compound_types() {
        let sig = parse("1fFAaPPiG16hHAaiZv");
        assert_eq!(sig.readable_name(), "f(char[],int**,ubyte[16],int[char[]])");
    }

    #[test]
    fn test_named_types() {
        let sig = parse("4copyFC6object6ObjectS3std5RangeZE4kind4Kind");
        assert_eq!(
            sig.to_string(),
            "kind.Kind copy(object.Object,std.Range)"
        );
    }

    #[test]
    fn test_function_and_delegate_types() {
        let sig = parse("5applyFDFiZbPFZvZv");
        assert_eq!(
            sig.readable_name(),
            "apply(bool delegate(int,this),void function()*)"
        );
    }

    #[test]
    fn test_pointer_to_function_type() {
        let sig = parse("1fFPFZvZv");
        assert_eq!(sig.readable_name(), "f(void function()*)");
    }

    #[test]
    fn test_template_instance() {
        let sig = parse("15__T3FooTiS3barZ3runFZv");
        assert_eq!(sig.qualified_name, vec!["Foo!(int,bar)", "run"]);
        assert_eq!(sig.readable_name(), "Foo!(int,bar).run()");
    }

    #[test]
    fn test_nested_template_argument() {
        let sig = parse("13__T3maxTAiTkZ3maxFAikZk");
        assert_eq!(sig.to_string(), "uint max!(int[],uint).max(int[],uint)");
    }

    #[test]
    fn test_template_bad_terminator() {
        let err = parse_symbol("10__T3FooTiQ3runFZv").unwrap_err();
        assert_eq!(err.construct(), Construct::TemplateArgument);
        assert_eq!(err.remaining(), "Q");
    }

    #[test]
    fn test_template_missing_terminator() {
        let err = parse_symbol("9__T3FooTi3runFZv").unwrap_err();
        assert_eq!(err, DemangleError::unexpected_end(Construct::TemplateArgument));
    }

    #[test]
    fn test_template_length_shorter_than_marker() {
        assert!(parse_symbol("2__T3foo").is_err());
    }

    #[test]
    fn test_name_past_end() {
        let err = parse_symbol("10main").unwrap_err();
        assert!(matches!(err, DemangleError::Truncated { needed: 10, available: 4, .. }));
    }

    #[test]
    fn test_unknown_parameter_type() {
        let err = parse_symbol("4mainF!Zv").unwrap_err();
        assert_eq!(err.construct(), Construct::Parameter);
        assert_eq!(err.remaining(), "!Zv");
    }

    #[test]
    fn test_missing_return_type() {
        let err = parse_symbol("4mainFZ").unwrap_err();
        assert_eq!(err, DemangleError::unexpected_end(Construct::Type));
    }

    #[test]
    fn test_unterminated_parameters() {
        let err = parse_symbol("4mainFii").unwrap_err();
        assert_eq!(err, DemangleError::unexpected_end(Construct::Parameter));
    }

    #[test]
    fn test_trailing_input() {
        let err = parse_symbol("4mainFZvxyz").unwrap_err();
        assert_eq!(err.construct(), Construct::Symbol);
        assert_eq!(err.remaining(), "xyz");
    }

    #[test]
    fn test_bare_terminator_signature() {
        let sig = parse("4initZ");
        assert_eq!(sig.to_string(), "void init()");
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let body = format!("1fF{}iZv", "P".repeat(MAX_DEPTH + 10));
        assert!(matches!(
            parse_symbol(&body),
            Err(DemangleError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        let body = format!("1fF{}iZv", "P".repeat(MAX_DEPTH - 8));
        assert!(parse_symbol(&body).is_ok());
    }
}
