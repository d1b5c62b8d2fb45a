//! Display and Debug implementations for Value

use std::fmt;

use super::*;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{:?}", s.as_ref()),

            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, "]")
            }

            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {:?}", k, v)?;
                }
                write!(f, "}}")
            }

            Value::Element(el) => write!(f, "{:?}", el),

            Value::Fragment(children) => {
                write!(f, "<>")?;
                for child in children.iter() {
                    write!(f, "{:?}", child)?;
                }
                write!(f, "</>")
            }
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (k, v) in &self.props {
            write!(f, " {}={{{:?}}}", k, v)?;
        }
        if self.children.is_empty() {
            return write!(f, "/>");
        }
        write!(f, ">")?;
        for child in &self.children {
            write!(f, "{:?}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display is the string coercion, Debug is the markup-like dump
        match self {
            Value::Element(_) | Value::Fragment(_) => fmt::Debug::fmt(self, f),
            other => f.write_str(&other.to_js_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ComponentDef;

    #[test]
    fn test_debug_primitives() {
        assert_eq!(format!("{:?}", Value::Undefined), "undefined");
        assert_eq!(format!("{:?}", Value::Number(7.0)), "7");
        assert_eq!(format!("{:?}", Value::string("hi")), "\"hi\"");
    }

    #[test]
    fn test_debug_element() {
        let el = Element::new("Badge", ComponentDef::shared("Badge")).with_prop("label", "x");
        assert_eq!(format!("{:?}", Value::element(el)), "<Badge label={\"x\"}/>");
    }

    #[test]
    fn test_display_is_string_coercion() {
        assert_eq!(Value::Number(3.5).to_string(), "3.5");
        assert_eq!(Value::string("plain").to_string(), "plain");
        assert_eq!(Value::Null.to_string(), "null");
    }
}
