//! Template parser
//!
//! A recursive-descent parser over [`Lexer`] producing [`Node`]. Binary
//! operators use precedence climbing; arrow functions are detected by
//! speculatively scanning a parameter list on a cloned lexer. Markup is
//! parsed at the character level once a `<` appears in operand position.

use crate::ast::{
    Attribute, AttributeValue, BinaryOperator, Callback, CallbackBody, ElementNode, Literal,
    LogicalOperator, Node, ObjectEntry, Property, PropertyKey, Statement, UnaryOperator,
};
use crate::context::DEFAULT_MAX_DEPTH;
use crate::error::{ParseError, Position};
use crate::lexer::{ChunkEnd, Lexer, Token, TokenKind};

/// Nesting budget for expressions, markup and operator chains.
///
/// Each unit of the budget yields at most two levels of the syntax tree, so
/// any accepted template stays within the evaluator's default depth guard.
pub const MAX_NESTING: usize = DEFAULT_MAX_DEPTH / 4;

/// Parse a template into its syntax tree.
///
/// The template must be exactly one expression, optionally surrounded by
/// whitespace or comments.
///
/// # Example
///
/// ```
/// use thicket::ast::Node;
/// use thicket::parse;
///
/// let ast = parse("<Text value={title} />").unwrap();
/// assert!(matches!(ast, Node::Element(_)));
///
/// assert!(parse("<Row></Col>").is_err());
/// ```
pub fn parse(template: &str) -> Result<Node, ParseError> {
    let mut parser = Parser::new(template);
    let node = parser.parse_expression()?;
    let token = parser.lexer.next_token()?;
    if token.kind != TokenKind::Eof {
        return Err(parser.unexpected(&token));
    }
    Ok(node)
}

/// Operator found between two operands.
#[derive(Clone, Copy)]
enum InfixOp {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

/// Binding power of an infix operator token, lowest first.
fn infix_op(token: &Token) -> Option<(u8, InfixOp)> {
    use BinaryOperator as B;
    use InfixOp::{Binary, Logical};

    let TokenKind::Punct(p) = &token.kind else {
        return None;
    };
    let op = match *p {
        "??" => (1, Logical(LogicalOperator::Nullish)),
        "||" => (2, Logical(LogicalOperator::Or)),
        "&&" => (3, Logical(LogicalOperator::And)),
        "|" => (4, Binary(B::BitOr)),
        "^" => (5, Binary(B::BitXor)),
        "&" => (6, Binary(B::BitAnd)),
        "==" => (7, Binary(B::Eq)),
        "!=" => (7, Binary(B::NotEq)),
        "===" => (7, Binary(B::StrictEq)),
        "!==" => (7, Binary(B::StrictNotEq)),
        "<" => (8, Binary(B::Lt)),
        ">" => (8, Binary(B::Gt)),
        "<=" => (8, Binary(B::LtEq)),
        ">=" => (8, Binary(B::GtEq)),
        "<<" => (9, Binary(B::Shl)),
        ">>" => (9, Binary(B::Shr)),
        ">>>" => (9, Binary(B::UShr)),
        "+" => (10, Binary(B::Add)),
        "-" => (10, Binary(B::Sub)),
        "*" => (11, Binary(B::Mul)),
        "/" => (11, Binary(B::Div)),
        "%" => (11, Binary(B::Rem)),
        "**" => (12, Binary(B::Exp)),
        _ => return None,
    };
    Some(op)
}

fn prefix_op(token: &Token) -> Option<UnaryOperator> {
    match &token.kind {
        TokenKind::Punct("!") => Some(UnaryOperator::Not),
        TokenKind::Punct("+") => Some(UnaryOperator::Plus),
        TokenKind::Punct("-") => Some(UnaryOperator::Minus),
        TokenKind::Punct("~") => Some(UnaryOperator::BitNot),
        TokenKind::Ident(name) if name == "typeof" => Some(UnaryOperator::Typeof),
        TokenKind::Ident(name) if name == "void" => Some(UnaryOperator::Void),
        _ => None,
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            depth: 0,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Helpers
    // ═══════════════════════════════════════════════════════════════════

    fn peek(&self) -> Result<Token, ParseError> {
        self.lexer.peek_token()
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        self.lexer.next_token()
    }

    /// Consume the next token if it is the punctuator `p`.
    fn eat_punct(&mut self, p: &str) -> Result<bool, ParseError> {
        if self.peek()?.is_punct(p) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_punct(&mut self, p: &str) -> Result<Token, ParseError> {
        let token = self.advance()?;
        if token.is_punct(p) {
            Ok(token)
        } else {
            Err(self.error_at(
                token.offset,
                format!("expected `{}`, found {}", p, token.describe()),
            ))
        }
    }

    fn unexpected(&self, token: &Token) -> ParseError {
        self.error_at(token.offset, format!("unexpected {}", token.describe()))
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> ParseError {
        self.lexer.error_at(offset, message)
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_at(self.lexer.offset(), "template nested too deeply"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Run `f`, releasing every chain link it counted on the way out.
    fn chained<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let base = self.depth;
        let result = f(self);
        self.depth = base;
        result
    }

    /// Count one link of an operator or postfix chain against the budget.
    ///
    /// Chains build left-deep trees in a loop, so they are charged like
    /// recursion.
    fn link(&mut self, offset: usize) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_at(offset, "template nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════

    /// Assignment-level expression: arrows, assignments, conditionals.
    fn parse_expression(&mut self) -> Result<Node, ParseError> {
        self.nested(|p| {
            if let Some(callback) = p.try_parse_arrow()? {
                return Ok(Node::Arrow(callback));
            }

            let target = p.parse_conditional()?;
            let token = p.peek()?;
            if token.is_punct("=") {
                p.advance()?;
                let value = p.parse_expression()?;
                return Ok(Node::Assign {
                    target: Box::new(target),
                    value: Box::new(value),
                    position: p.lexer.position_of(token.offset),
                });
            }
            Ok(target)
        })
    }

    fn parse_conditional(&mut self) -> Result<Node, ParseError> {
        let test = self.parse_binary(1)?;
        if !self.eat_punct("?")? {
            return Ok(test);
        }
        let consequent = self.parse_expression()?;
        self.expect_punct(":")?;
        let alternate = self.parse_expression()?;
        Ok(Node::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Node, ParseError> {
        self.chained(|p| p.parse_binary_chain(min_prec))
    }

    fn parse_binary_chain(&mut self, min_prec: u8) -> Result<Node, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let token = self.peek()?;
            let Some((prec, op)) = infix_op(&token) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.link(token.offset)?;
            self.advance()?;

            // `**` is right-associative
            let next_min = match op {
                InfixOp::Binary(BinaryOperator::Exp) => prec,
                _ => prec + 1,
            };
            let right = self.nested(|p| p.parse_binary(next_min))?;

            left = match op {
                InfixOp::Binary(op) => Node::BinaryOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                InfixOp::Logical(op) => Node::LogicalOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        let token = self.peek()?;
        match prefix_op(&token) {
            Some(op) => {
                self.advance()?;
                let operand = self.nested(|p| p.parse_unary())?;
                Ok(Node::UnaryOp {
                    op,
                    operand: Box::new(operand),
                })
            }
            None => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Node, ParseError> {
        self.chained(|p| {
            let node = p.parse_primary()?;
            p.parse_postfix_chain(node)
        })
    }

    fn parse_postfix_chain(&mut self, mut node: Node) -> Result<Node, ParseError> {
        loop {
            let token = self.peek()?;
            if !starts_postfix(&token) {
                return Ok(node);
            }
            self.link(token.offset)?;
            match &token.kind {
                TokenKind::Punct(".") => {
                    self.advance()?;
                    let name = self.parse_property_name()?;
                    node = Node::MemberAccess {
                        object: Box::new(node),
                        property: Property::Static(name),
                    };
                }
                TokenKind::Punct("?.") => {
                    self.advance()?;
                    let position = self.lexer.position_of(token.offset);
                    if self.peek()?.is_punct("(") {
                        let arguments = self.parse_arguments()?;
                        node = Node::Call {
                            callee: Box::new(node),
                            arguments,
                            position,
                        };
                        continue;
                    }
                    let property = if self.eat_punct("[")? {
                        let index = self.parse_expression()?;
                        self.expect_punct("]")?;
                        Property::Computed(Box::new(index))
                    } else {
                        Property::Static(self.parse_property_name()?)
                    };
                    node = Node::OptionalMember {
                        object: Box::new(node),
                        property,
                        position,
                    };
                }
                TokenKind::Punct("[") => {
                    self.advance()?;
                    let index = self.parse_expression()?;
                    self.expect_punct("]")?;
                    node = Node::MemberAccess {
                        object: Box::new(node),
                        property: Property::Computed(Box::new(index)),
                    };
                }
                TokenKind::Punct("(") => {
                    let position = self.lexer.position_of(token.offset);
                    let arguments = self.parse_arguments()?;
                    node = make_call(node, arguments, position);
                }
                TokenKind::Backtick => {
                    // A tagged template calls its tag with the template
                    self.advance()?;
                    let template = self.parse_template_string()?;
                    node = Node::Call {
                        callee: Box::new(node),
                        arguments: vec![template],
                        position: self.lexer.position_of(token.offset),
                    };
                }
                _ => return Ok(node),
            }
        }
    }

    /// Property name after `.`: any identifier, keywords included.
    fn parse_property_name(&mut self) -> Result<String, ParseError> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Ident(name) => Ok(name),
            _ => Err(self.error_at(
                token.offset,
                format!("expected property name, found {}", token.describe()),
            )),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect_punct("(")?;
        let mut arguments = Vec::new();
        while !self.eat_punct(")")? {
            arguments.push(self.parse_element_or_spread()?);
            if !self.peek()?.is_punct(")") {
                self.expect_punct(",")?;
            }
        }
        Ok(arguments)
    }

    fn parse_element_or_spread(&mut self) -> Result<Node, ParseError> {
        let token = self.peek()?;
        if token.is_punct("...") {
            self.advance()?;
            let argument = self.parse_expression()?;
            return Ok(Node::Spread {
                argument: Box::new(argument),
                position: self.lexer.position_of(token.offset),
            });
        }
        self.parse_expression()
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Number(n) => Ok(Node::Literal(Literal::Number(n))),
            TokenKind::String(s) => Ok(Node::Literal(Literal::String(s))),
            TokenKind::Backtick => self.parse_template_string(),
            TokenKind::Ident(ref name) if name == "function" => {
                self.parse_function(token.offset)
            }
            TokenKind::Ident(ref name) if name == "new" => {
                self.nested(|p| p.parse_new(token.offset))
            }
            TokenKind::Ident(ref name) => Ok(match name.as_str() {
                "true" => Node::Literal(Literal::Bool(true)),
                "false" => Node::Literal(Literal::Bool(false)),
                "null" => Node::Literal(Literal::Null),
                _ => Node::Identifier(name.clone()),
            }),
            TokenKind::Punct("(") => {
                let inner = self.parse_expression()?;
                self.expect_punct(")")?;
                Ok(inner)
            }
            TokenKind::Punct("[") => self.parse_array(),
            TokenKind::Punct("{") => self.parse_object(),
            TokenKind::Punct("<") => self.nested(|p| p.parse_markup(token.offset)),
            TokenKind::Eof => Err(self.error_at(token.offset, "unexpected end of template")),
            _ => Err(self.unexpected(&token)),
        }
    }

    /// `function name(a, b) { ... }` after the `function` keyword.
    fn parse_function(&mut self, start: usize) -> Result<Node, ParseError> {
        if matches!(self.peek()?.kind, TokenKind::Ident(_)) {
            self.advance()?;
        }
        self.expect_punct("(")?;
        let offset = self.lexer.offset();
        let params = scan_params(&mut self.lexer)
            .ok_or_else(|| self.error_at(offset, "expected parameter list"))?;
        self.expect_punct("{")?;
        let body = CallbackBody::Block(self.parse_block()?);
        Ok(Node::Function(Callback {
            params,
            body,
            position: self.lexer.position_of(start),
        }))
    }

    /// `new Callee(args)` after the `new` keyword; the arguments are optional.
    fn parse_new(&mut self, start: usize) -> Result<Node, ParseError> {
        self.chained(|p| {
            let mut callee = p.parse_primary()?;
            loop {
                let token = p.peek()?;
                if token.is_punct(".") {
                    p.link(token.offset)?;
                    p.advance()?;
                    let name = p.parse_property_name()?;
                    callee = Node::MemberAccess {
                        object: Box::new(callee),
                        property: Property::Static(name),
                    };
                } else if token.is_punct("[") {
                    p.link(token.offset)?;
                    p.advance()?;
                    let index = p.parse_expression()?;
                    p.expect_punct("]")?;
                    callee = Node::MemberAccess {
                        object: Box::new(callee),
                        property: Property::Computed(Box::new(index)),
                    };
                } else {
                    break;
                }
            }
            let arguments = if p.peek()?.is_punct("(") {
                p.parse_arguments()?
            } else {
                Vec::new()
            };
            Ok(Node::New {
                callee: Box::new(callee),
                arguments,
                position: p.lexer.position_of(start),
            })
        })
    }

    fn parse_template_string(&mut self) -> Result<Node, ParseError> {
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let (chunk, end) = self.lexer.scan_template_chunk()?;
            quasis.push(chunk);
            match end {
                ChunkEnd::Close => break,
                ChunkEnd::Interpolation => {
                    expressions.push(self.parse_expression()?);
                    self.expect_punct("}")?;
                }
            }
        }
        Ok(Node::TemplateString {
            quasis,
            expressions,
        })
    }

    fn parse_array(&mut self) -> Result<Node, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.eat_punct("]")? {
                break;
            }
            if self.eat_punct(",")? {
                items.push(None);
                continue;
            }
            items.push(Some(self.parse_element_or_spread()?));
            if !self.peek()?.is_punct("]") {
                self.expect_punct(",")?;
            }
        }
        Ok(Node::ArrayLiteral(items))
    }

    fn parse_object(&mut self) -> Result<Node, ParseError> {
        let mut entries = Vec::new();
        while !self.eat_punct("}")? {
            entries.push(self.parse_object_entry()?);
            if !self.peek()?.is_punct("}") {
                self.expect_punct(",")?;
            }
        }
        Ok(Node::ObjectLiteral(entries))
    }

    fn parse_object_entry(&mut self) -> Result<ObjectEntry, ParseError> {
        let token = self.advance()?;
        let key = match token.kind {
            TokenKind::Punct("...") => return Ok(ObjectEntry::Spread(self.parse_expression()?)),
            TokenKind::Punct("[") => {
                let key = self.parse_expression()?;
                self.expect_punct("]")?;
                PropertyKey::Computed(key)
            }
            TokenKind::Ident(ref name) => {
                let next = self.peek()?;
                if next.is_punct(",") || next.is_punct("}") {
                    return Ok(ObjectEntry::Property {
                        key: PropertyKey::Static(name.clone()),
                        value: Node::Identifier(name.clone()),
                    });
                }
                PropertyKey::Static(name.clone())
            }
            TokenKind::String(ref s) => PropertyKey::Static(s.clone()),
            TokenKind::Number(n) => PropertyKey::Static(crate::value::format_number(n)),
            _ => return Err(self.unexpected(&token)),
        };
        self.expect_punct(":")?;
        let value = self.parse_expression()?;
        Ok(ObjectEntry::Property { key, value })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Arrow Functions
    // ═══════════════════════════════════════════════════════════════════

    /// Parse an arrow function if one starts here; otherwise leave the
    /// lexer untouched.
    fn try_parse_arrow(&mut self) -> Result<Option<Callback>, ParseError> {
        let mut probe = self.lexer.clone();
        let first = probe.next_token()?;
        let position = self.lexer.position_of(first.offset);

        let params = match first.kind {
            TokenKind::Ident(name) => vec![name],
            TokenKind::Punct("(") => match scan_params(&mut probe) {
                Some(params) => params,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };

        let arrow = probe.next_token()?;
        if !arrow.is_punct("=>") || arrow.newline_before {
            return Ok(None);
        }

        self.lexer = probe;
        let body = if self.peek()?.is_punct("{") {
            self.advance()?;
            CallbackBody::Block(self.parse_block()?)
        } else {
            CallbackBody::Expression(Box::new(self.parse_expression()?))
        };
        Ok(Some(Callback {
            params,
            body,
            position,
        }))
    }

    fn parse_block(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        loop {
            let token = self.peek()?;
            if token.is_punct("}") {
                self.advance()?;
                return Ok(statements);
            }
            if token.is_punct(";") {
                self.advance()?;
                statements.push(Statement::Empty);
                continue;
            }
            if token.is_ident("return") {
                self.advance()?;
                let next = self.peek()?;
                let value = if next.is_punct(";") || next.is_punct("}") || next.newline_before {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                statements.push(Statement::Return(value));
            } else {
                statements.push(Statement::Expression(self.parse_expression()?));
            }
            self.end_statement()?;
        }
    }

    /// Accept `;`, `}` or a line break after a statement.
    fn end_statement(&mut self) -> Result<(), ParseError> {
        let token = self.peek()?;
        if token.is_punct(";") {
            self.advance()?;
            return Ok(());
        }
        if token.is_punct("}") || token.newline_before {
            return Ok(());
        }
        Err(self.unexpected(&token))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Markup
    // ═══════════════════════════════════════════════════════════════════

    /// Parse an element or fragment; the opening `<` at `start` is consumed.
    fn parse_markup(&mut self, start: usize) -> Result<Node, ParseError> {
        self.lexer.skip_whitespace();
        if self.lexer.eat(">") {
            let children = self.parse_children(start, "")?;
            return Ok(Node::Fragment(children));
        }

        let name = self.lexer.scan_tag_name();
        if name.is_empty() || name.ends_with('.') {
            return Err(self.error_at(self.lexer.offset(), "expected tag name"));
        }
        let tag = name.rsplit('.').next().unwrap_or(name).to_string();
        let attributes = self.parse_attributes()?;

        let children = if self.lexer.eat("/>") {
            Vec::new()
        } else {
            self.parse_children(start, name)?
        };

        Ok(Node::Element(ElementNode {
            tag,
            attributes,
            children,
            position: self.lexer.position_of(start),
        }))
    }

    /// Parse attributes up to `/>` (left unconsumed) or `>` (consumed).
    fn parse_attributes(&mut self) -> Result<Vec<Attribute>, ParseError> {
        let mut attributes = Vec::new();
        loop {
            self.lexer.skip_whitespace();
            if self.lexer.starts_with("/>") {
                return Ok(attributes);
            }
            if self.lexer.eat(">") {
                return Ok(attributes);
            }
            if self.lexer.at_end() {
                return Err(self.error_at(self.lexer.offset(), "unterminated tag"));
            }

            if self.lexer.eat("{") {
                self.expect_punct("...")?;
                let argument = self.parse_expression()?;
                self.expect_punct("}")?;
                attributes.push(Attribute::Spread(argument));
                continue;
            }

            let offset = self.lexer.offset();
            let name = self.lexer.scan_attribute_name();
            if name.is_empty() {
                let found = self.lexer.peek_char().unwrap_or(' ');
                return Err(self.error_at(offset, format!("unexpected `{}` in tag", found)));
            }
            let name = name.to_string();

            self.lexer.skip_whitespace();
            let value = if self.lexer.eat("=") {
                self.lexer.skip_whitespace();
                self.parse_attribute_value()?
            } else {
                AttributeValue::Flag
            };
            attributes.push(Attribute::Named { name, value });
        }
    }

    fn parse_attribute_value(&mut self) -> Result<AttributeValue, ParseError> {
        let offset = self.lexer.offset();
        match self.lexer.peek_char() {
            Some('"') | Some('\'') => Ok(AttributeValue::Literal(
                self.lexer.scan_attribute_string()?,
            )),
            Some('{') => {
                self.lexer.eat("{");
                if self.peek()?.is_punct("}") {
                    return Err(self.error_at(offset, "attribute value expression is empty"));
                }
                let value = self.parse_expression()?;
                self.expect_punct("}")?;
                Ok(AttributeValue::Expression(Box::new(value)))
            }
            Some('<') => {
                self.lexer.eat("<");
                let element = self.nested(|p| p.parse_markup(offset))?;
                Ok(AttributeValue::Expression(Box::new(element)))
            }
            _ => Err(self.error_at(offset, "expected attribute value")),
        }
    }

    /// Parse children up to the closing tag for `name` (empty for fragments).
    fn parse_children(&mut self, start: usize, name: &str) -> Result<Vec<Node>, ParseError> {
        let mut children = Vec::new();
        loop {
            if self.lexer.at_end() {
                let what = if name.is_empty() {
                    "fragment".to_string()
                } else {
                    format!("<{}>", name)
                };
                return Err(self.error_at(start, format!("unterminated {}", what)));
            }

            if self.lexer.starts_with("</") {
                let offset = self.lexer.offset();
                self.lexer.eat("</");
                self.lexer.skip_whitespace();
                let closing = self.lexer.scan_tag_name();
                self.lexer.skip_whitespace();
                if closing != name {
                    return Err(self.error_at(
                        offset,
                        format!(
                            "expected closing tag </{}>, found </{}>",
                            name, closing
                        ),
                    ));
                }
                if !self.lexer.eat(">") {
                    return Err(self.error_at(self.lexer.offset(), "expected `>`"));
                }
                return Ok(children);
            }

            if self.lexer.starts_with("<") {
                let offset = self.lexer.offset();
                self.lexer.eat("<");
                children.push(self.nested(|p| p.parse_markup(offset))?);
                continue;
            }

            if self.lexer.eat("{") {
                children.push(self.parse_slot()?);
                continue;
            }

            let text = self.lexer.scan_text();
            children.push(Node::TextRun(text.to_string()));
        }
    }

    /// Parse a `{...}` child after its opening brace.
    fn parse_slot(&mut self) -> Result<Node, ParseError> {
        let token = self.peek()?;
        if token.is_punct("}") {
            self.advance()?;
            return Ok(Node::ExpressionSlot(None));
        }
        if token.is_punct("...") {
            self.advance()?;
            let argument = self.parse_expression()?;
            self.expect_punct("}")?;
            return Ok(Node::Spread {
                argument: Box::new(argument),
                position: self.lexer.position_of(token.offset),
            });
        }
        let expr = self.parse_expression()?;
        self.expect_punct("}")?;
        Ok(Node::ExpressionSlot(Some(Box::new(expr))))
    }
}

/// Whether `token` continues a postfix chain.
fn starts_postfix(token: &Token) -> bool {
    match token.kind {
        TokenKind::Punct("." | "?." | "[" | "(") => true,
        TokenKind::Backtick => !token.newline_before,
        _ => false,
    }
}

/// Scan `a, b)` after an opening parenthesis. `None` if it is not a
/// parameter list.
fn scan_params(lexer: &mut Lexer<'_>) -> Option<Vec<String>> {
    let mut params = Vec::new();
    loop {
        let token = lexer.next_token().ok()?;
        match token.kind {
            TokenKind::Punct(")") if params.is_empty() => return Some(params),
            TokenKind::Ident(name) => params.push(name),
            _ => return None,
        }
        let sep = lexer.next_token().ok()?;
        match sep.kind {
            TokenKind::Punct(")") => return Some(params),
            TokenKind::Punct(",") => continue,
            _ => return None,
        }
    }
}

/// Build a call node, recognizing `target.map(<arrow>)`.
fn make_call(callee: Node, arguments: Vec<Node>, position: Position) -> Node {
    match (callee, <[Node; 1]>::try_from(arguments)) {
        (
            Node::MemberAccess {
                object,
                property: Property::Static(name),
            },
            Ok([Node::Arrow(callback)]),
        ) if name == "map" => Node::MapCall {
            target: object,
            callback,
        },
        (callee, arguments) => Node::Call {
            callee: Box::new(callee),
            arguments: arguments.map_or_else(|many| many, Vec::from),
            position,
        },
    }
}
