//! Coercions and equality with the scripting semantics templates expect

use std::sync::Arc;

use super::Value;

impl Value {
    /// Truthiness as used by `&&`, `||`, `!` and the conditional operator.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Element(_) | Value::Fragment(_) => true,
        }
    }

    /// Numeric coercion (`ToNumber`).
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            // Arrays convert through their joined string form
            Value::Array(_) => string_to_number(&self.to_js_string()),
            Value::Object(_) | Value::Element(_) | Value::Fragment(_) => f64::NAN,
        }
    }

    /// String coercion (`ToString`).
    ///
    /// Interpolation and concatenation special-case `null`/`undefined`
    /// before calling this.
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.to_string(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.to_js_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) | Value::Element(_) | Value::Fragment(_) => {
                "[object Object]".to_string()
            }
        }
    }

    /// String form for interpolation: `null`/`undefined` become empty.
    pub fn to_interpolated_string(&self) -> String {
        match self {
            Value::Undefined | Value::Null => String::new(),
            other => other.to_js_string(),
        }
    }

    fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    fn is_compound(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Object(_) | Value::Element(_) | Value::Fragment(_)
        )
    }
}

/// Parse a string the way numeric coercion does.
///
/// Surrounding whitespace is ignored, the empty string is `0`, and anything
/// that is not a complete numeric literal is `NaN`.
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = if trimmed.len() > 2 {
        match &trimmed[..2] {
            "0x" | "0X" => Some(16),
            "0o" | "0O" => Some(8),
            "0b" | "0B" => Some(2),
            _ => None,
        }
    } else {
        None
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&trimmed[2..], radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    // Rust's float parser accepts "inf" and "nan"; coercion does not
    let plain = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !plain {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Format a number the way string coercion does.
///
/// Integral values print without a fractional part; very large and very
/// small magnitudes use exponent notation with an explicit sign.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }

    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// Strict equality (`===`): same type and value; compound values by identity.
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) => true,
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
        (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
        (Value::Element(a), Value::Element(b)) => Arc::ptr_eq(a, b),
        (Value::Fragment(a), Value::Fragment(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

/// Loose equality (`==`) with the usual primitive coercions.
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    if std::mem::discriminant(left) == std::mem::discriminant(right) {
        return strict_equals(left, right);
    }

    match (left, right) {
        (l, r) if l.is_nullish() && r.is_nullish() => true,
        (l, r) if l.is_nullish() || r.is_nullish() => false,

        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            *n == string_to_number(s)
        }

        (Value::Bool(b), other) | (other, Value::Bool(b)) => {
            let as_number = Value::Number(if *b { 1.0 } else { 0.0 });
            loose_equals(&as_number, other)
        }

        // Compound against primitive compares through the string form
        (compound, primitive) | (primitive, compound)
            if compound.is_compound() && !primitive.is_compound() =>
        {
            loose_equals(&Value::string(compound.to_js_string()), primitive)
        }

        _ => false,
    }
}
