//! Abstract syntax tree for widget templates
//!
//! A template is a single expression, usually a markup element. The tree is
//! a tagged union so evaluators dispatch with one exhaustive `match`, which
//! doubles as the checklist of what the interpreter will and will not run.
//!
//! Nodes in the last group (`Call`, `Arrow`, `Function`, `New`, `Assign`,
//! `Spread`, `OptionalMember`) are accepted by the grammar so templates get
//! a precise error instead of a syntax error, but evaluating them always
//! fails.

use crate::error::Position;

/// A node of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // ═══════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════
    /// `"text"`, `42`, `true`, `null`
    Literal(Literal),

    /// A name looked up in scope
    Identifier(String),

    /// `` `Hello ${name}` ``: `quasis` has one more entry than `expressions`
    TemplateString {
        /// Literal runs, already unescaped
        quasis: Vec<String>,
        /// Interpolated expressions
        expressions: Vec<Node>,
    },

    /// Arithmetic, comparison and bitwise operators
    BinaryOp {
        /// The operator
        op: BinaryOperator,
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },

    /// Short-circuiting operators
    LogicalOp {
        /// The operator
        op: LogicalOperator,
        /// Left operand
        left: Box<Node>,
        /// Right operand, evaluated only when needed
        right: Box<Node>,
    },

    /// Prefix operators
    UnaryOp {
        /// The operator
        op: UnaryOperator,
        /// The operand
        operand: Box<Node>,
    },

    /// `test ? consequent : alternate`
    Conditional {
        /// Condition
        test: Box<Node>,
        /// Taken when `test` is truthy
        consequent: Box<Node>,
        /// Taken otherwise
        alternate: Box<Node>,
    },

    /// `object.name` or `object[expr]`
    MemberAccess {
        /// The accessed value
        object: Box<Node>,
        /// The property
        property: Property,
    },

    /// `[a, , b]`: holes are `None`
    ArrayLiteral(Vec<Option<Node>>),

    /// `{ a: 1, "b": 2, [k]: 3, c }`
    ObjectLiteral(Vec<ObjectEntry>),

    /// `target.map((item, index) => body)`: the only call form evaluated
    MapCall {
        /// The iterated value
        target: Box<Node>,
        /// The inline callback
        callback: Callback,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Markup
    // ═══════════════════════════════════════════════════════════════════
    /// `<Tag attr="x">children</Tag>`
    Element(ElementNode),

    /// `<>children</>`
    Fragment(Vec<Node>),

    /// `{expr}` among markup children; `None` for `{}` or a lone comment
    ExpressionSlot(Option<Box<Node>>),

    /// Raw text between markup tags
    TextRun(String),

    // ═══════════════════════════════════════════════════════════════════
    // Accepted by the grammar, never evaluated
    // ═══════════════════════════════════════════════════════════════════
    /// Any call other than `.map(<arrow>)`
    Call {
        /// The called expression
        callee: Box<Node>,
        /// Argument expressions
        arguments: Vec<Node>,
        /// Position of the call's opening parenthesis
        position: Position,
    },

    /// An arrow function outside `.map()`
    Arrow(Callback),

    /// `function (a) { ... }`
    Function(Callback),

    /// `new Callee(args)`
    New {
        /// The constructed expression
        callee: Box<Node>,
        /// Argument expressions
        arguments: Vec<Node>,
        /// Position of the `new` keyword
        position: Position,
    },

    /// `target = value`
    Assign {
        /// Assignment target
        target: Box<Node>,
        /// Assigned value
        value: Box<Node>,
        /// Position of the `=`
        position: Position,
    },

    /// `...argument` in arrays, call arguments or markup children
    Spread {
        /// The spread expression
        argument: Box<Node>,
        /// Position of the `...`
        position: Position,
    },

    /// `object?.name` / `object?.[expr]`
    OptionalMember {
        /// The accessed value
        object: Box<Node>,
        /// The property
        property: Property,
        /// Position of the `?.`
        position: Position,
    },
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Numeric literal
    Number(f64),
    /// String literal, unescaped
    String(String),
}

/// The property side of a member access.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// `.name`
    Static(String),
    /// `[expr]`
    Computed(Box<Node>),
}

/// An entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEntry {
    /// `key: value` (shorthand `key` is desugared to `key: key`)
    Property {
        /// The key
        key: PropertyKey,
        /// The value
        value: Node,
    },
    /// `...expr`
    Spread(Node),
}

/// An object literal key.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// Identifier, string or number key
    Static(String),
    /// `[expr]`
    Computed(Node),
}

/// An inline arrow function.
#[derive(Debug, Clone, PartialEq)]
pub struct Callback {
    /// Parameter names, in order
    pub params: Vec<String>,
    /// The function body
    pub body: CallbackBody,
    /// Position of the parameter list
    pub position: Position,
}

/// Body of an arrow function.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackBody {
    /// `x => expr`
    Expression(Box<Node>),
    /// `x => { ...; return expr; }`
    Block(Vec<Statement>),
}

/// A statement in an arrow function block body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `return expr;` / `return;`
    Return(Option<Node>),
    /// An expression statement (never executed)
    Expression(Node),
    /// `;`
    Empty,
}

/// A markup element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    /// Tag looked up in the registry (last segment of `A.B`)
    pub tag: String,
    /// Attributes in source order
    pub attributes: Vec<Attribute>,
    /// Child nodes: text runs, slots, elements, fragments
    pub children: Vec<Node>,
    /// Position of the opening `<`
    pub position: Position,
}

/// A markup attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// `name`, `name="value"`, `name={expr}`
    Named {
        /// Attribute name
        name: String,
        /// Attribute value
        value: AttributeValue,
    },
    /// `{...expr}`
    Spread(Node),
}

/// The value of a named attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// No value: shorthand for `true`
    Flag,
    /// Quoted string, entities decoded
    Literal(String),
    /// `{expr}`
    Expression(Box<Node>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `**`
    Exp,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `>>>`
    UShr,
}

impl BinaryOperator {
    /// The operator as written in source.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Rem => "%",
            BinaryOperator::Exp => "**",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::StrictEq => "===",
            BinaryOperator::StrictNotEq => "!==",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::Shl => "<<",
            BinaryOperator::Shr => ">>",
            BinaryOperator::UShr => ">>>",
        }
    }
}

/// Short-circuiting operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `&&`
    And,
    /// `||`
    Or,
    /// `??`
    Nullish,
}

impl LogicalOperator {
    /// The operator as written in source.
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
            LogicalOperator::Nullish => "??",
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `!`
    Not,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `~`
    BitNot,
    /// `typeof`
    Typeof,
    /// `void`
    Void,
}

impl UnaryOperator {
    /// The operator as written in source.
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::BitNot => "~",
            UnaryOperator::Typeof => "typeof",
            UnaryOperator::Void => "void",
        }
    }
}

impl Node {
    /// Get a human-readable name for a node kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Literal(_) => "literal",
            Node::Identifier(_) => "identifier",
            Node::TemplateString { .. } => "template string",
            Node::BinaryOp { .. } => "binary operation",
            Node::LogicalOp { .. } => "logical operation",
            Node::UnaryOp { .. } => "unary operation",
            Node::Conditional { .. } => "conditional",
            Node::MemberAccess { .. } => "member access",
            Node::ArrayLiteral(_) => "array literal",
            Node::ObjectLiteral(_) => "object literal",
            Node::MapCall { .. } => "map call",
            Node::Element(_) => "element",
            Node::Fragment(_) => "fragment",
            Node::ExpressionSlot(_) => "expression slot",
            Node::TextRun(_) => "text",
            Node::Call { .. } => "function call",
            Node::Arrow(_) => "arrow function",
            Node::Function(_) => "function expression",
            Node::New { .. } => "constructor call",
            Node::Assign { .. } => "assignment",
            Node::Spread { .. } => "spread",
            Node::OptionalMember { .. } => "optional chaining",
        }
    }

    /// Convenience constructor for string literals.
    pub fn string(s: impl Into<String>) -> Self {
        Node::Literal(Literal::String(s.into()))
    }

    /// Convenience constructor for number literals.
    pub fn number(n: f64) -> Self {
        Node::Literal(Literal::Number(n))
    }

    /// Convenience constructor for identifiers.
    pub fn ident(name: impl Into<String>) -> Self {
        Node::Identifier(name.into())
    }
}
