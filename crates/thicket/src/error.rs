//! Error types for template parsing and evaluation

use std::fmt;

use thiserror::Error;

use crate::Value;

/// A location in template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Byte offset from the start of the template
    pub offset: usize,

    /// Line number (1-indexed)
    pub line: usize,

    /// Column number in characters (1-indexed)
    pub column: usize,
}

impl Position {
    /// Compute the position of a byte offset within `source`.
    pub fn locate(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1;
        let mut column = 1;
        for (i, ch) in source.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Error that occurred while parsing a template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}{}", at(.position))]
pub struct ParseError {
    /// Human-readable error message
    pub message: String,

    /// Where the error was detected, if known
    pub position: Option<Position>,
}

impl ParseError {
    /// Create a new parse error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    /// Add position information to the error.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// The discriminant of a [`TemplateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Template text does not conform to the grammar
    Parse,

    /// The grammar accepted a construct the evaluator refuses to run
    UnsupportedExpression,

    /// An element tag has no registry entry
    UnknownComponent,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Parse => "ParseError",
            ErrorKind::UnsupportedExpression => "UnsupportedExpressionError",
            ErrorKind::UnknownComponent => "UnknownComponentError",
        };
        f.write_str(name)
    }
}

/// Errors fatal to a single render call.
///
/// Tolerated conditions (missing identifiers, member access on `null`,
/// `.map()` over non-arrays) never produce one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    /// Syntax error in the template source
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A construct the interpreter deliberately does not execute
    #[error("Unsupported expression: {construct}{}", at(.position))]
    UnsupportedExpression {
        /// Name of the rejected construct
        construct: String,
        /// Source position of the construct, if known
        position: Option<Position>,
    },

    /// An element referenced a tag missing from the registry
    #[error("Unknown widget component: {tag}{}", at(.position))]
    UnknownComponent {
        /// The unresolved tag name
        tag: String,
        /// Source position of the element, if known
        position: Option<Position>,
    },
}

fn at(position: &Option<Position>) -> String {
    match position {
        Some(p) => format!(" at {}", p),
        None => String::new(),
    }
}

impl TemplateError {
    /// Create an unsupported-construct error without position.
    pub fn unsupported(construct: impl Into<String>) -> Self {
        TemplateError::UnsupportedExpression {
            construct: construct.into(),
            position: None,
        }
    }

    /// The discriminated kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TemplateError::Parse(_) => ErrorKind::Parse,
            TemplateError::UnsupportedExpression { .. } => ErrorKind::UnsupportedExpression,
            TemplateError::UnknownComponent { .. } => ErrorKind::UnknownComponent,
        }
    }

    /// Source position attached to the error, if any.
    pub fn position(&self) -> Option<Position> {
        match self {
            TemplateError::Parse(e) => e.position,
            TemplateError::UnsupportedExpression { position, .. } => *position,
            TemplateError::UnknownComponent { position, .. } => *position,
        }
    }
}

/// Result type alias for thicket operations
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Get the runtime type name of a value, as `typeof` would report it.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Undefined => "undefined",
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Element(_) => "element",
        Value::Fragment(_) => "fragment",
    }
}
