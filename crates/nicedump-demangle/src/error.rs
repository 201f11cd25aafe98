//! Demangling error types.

use std::fmt;

use thiserror::Error;

/// The grammar construct being parsed when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    Number,
    Name,
    QualifiedName,
    TemplateName,
    TemplateArgument,
    Type,
    FunctionSignature,
    CallingConvention,
    Parameter,
    ReturnType,
    Symbol,
}

impl Construct {
    /// Returns the name of this construct.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Name => "name",
            Self::QualifiedName => "qualified name",
            Self::TemplateName => "template name",
            Self::TemplateArgument => "template argument",
            Self::Type => "type",
            Self::FunctionSignature => "function signature",
            Self::CallingConvention => "calling convention",
            Self::Parameter => "parameter",
            Self::ReturnType => "return type",
            Self::Symbol => "symbol",
        }
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mangled name that carried the `_D` prefix but violated the grammar.
///
/// Every variant records the construct being parsed and the unconsumed
/// input at the point of failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DemangleError {
    /// Input ended while a construct still needed characters.
    #[error("unexpected end of input while parsing {construct}")]
    UnexpectedEnd { construct: Construct },

    /// A mandatory tag was not one of the recognized values.
    #[error("unexpected tag while parsing {construct} at `{remaining}`")]
    UnexpectedTag {
        construct: Construct,
        remaining: String,
    },

    /// A length prefix pointed past the end of the available input.
    #[error("{construct} declares {needed} characters but only {available} remain at `{remaining}`")]
    Truncated {
        construct: Construct,
        needed: usize,
        available: usize,
        remaining: String,
    },

    /// A number was missing or did not fit.
    #[error("invalid number while parsing {construct} at `{remaining}`")]
    InvalidNumber {
        construct: Construct,
        remaining: String,
    },

    /// The signature was complete but input remained.
    #[error("trailing input after {construct}: `{remaining}`")]
    TrailingInput {
        construct: Construct,
        remaining: String,
    },

    /// Types nested deeper than the parser allows.
    #[error("{construct} nested too deeply at `{remaining}`")]
    TooDeep {
        construct: Construct,
        remaining: String,
    },
}

impl DemangleError {
    /// Creates a new UnexpectedEnd error.
    pub fn unexpected_end(construct: Construct) -> Self {
        Self::UnexpectedEnd { construct }
    }

    /// Creates a new UnexpectedTag error.
    pub fn unexpected_tag(construct: Construct, remaining: &str) -> Self {
        Self::UnexpectedTag {
            construct,
            remaining: remaining.to_string(),
        }
    }

    /// Creates a new Truncated error.
    pub fn truncated(construct: Construct, needed: usize, remaining: &str) -> Self {
        Self::Truncated {
            construct,
            needed,
            available: remaining.len(),
            remaining: remaining.to_string(),
        }
    }

    /// Creates a new InvalidNumber error.
    pub fn invalid_number(construct: Construct, remaining: &str) -> Self {
        Self::InvalidNumber {
            construct,
            remaining: remaining.to_string(),
        }
    }

    /// Creates a new TrailingInput error.
    pub fn trailing_input(construct: Construct, remaining: &str) -> Self {
        Self::TrailingInput {
            construct,
            remaining: remaining.to_string(),
        }
    }

    /// Creates a new TooDeep error.
    pub fn too_deep(construct: Construct, remaining: &str) -> Self {
        Self::TooDeep {
            construct,
            remaining: remaining.to_string(),
        }
    }

    /// Returns the construct that was being parsed.
    pub fn construct(&self) -> Construct {
        match self {
            Self::UnexpectedEnd { construct }
            | Self::UnexpectedTag { construct, .. }
            | Self::Truncated { construct, .. }
            | Self::InvalidNumber { construct, .. }
            | Self::TrailingInput { construct, .. }
            | Self::TooDeep { construct, .. } => *construct,
        }
    }

    /// Returns the unconsumed input at the point of failure.
    pub fn remaining(&self) -> &str {
        match self {
            Self::UnexpectedEnd { .. } => "",
            Self::UnexpectedTag { remaining, .. }
            | Self::Truncated { remaining, .. }
            | Self::InvalidNumber { remaining, .. }
            | Self::TrailingInput { remaining, .. }
            | Self::TooDeep { remaining, .. } => remaining,
        }
    }
}

/// Result type for demangling operations.
pub type DemangleResult<T> = Result<T, DemangleError>;
