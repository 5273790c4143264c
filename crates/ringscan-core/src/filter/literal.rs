use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

///
/// Literal
///
/// Constant operand of a host-engine filter. Partition-key extraction works
/// on the textual rendering (`Display`), which the token resolver parses
/// back according to the column's declared type.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(#[serde(with = "serde_bytes")] Vec<u8>),
}

impl Literal {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Bytes(bytes) => {
                let mut hex = String::with_capacity(2 + bytes.len() * 2);
                hex.push_str("0x");
                for byte in bytes {
                    write!(hex, "{byte:02x}")?;
                }
                f.write_str(&hex)
            }
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<u8>> for Literal {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_canonical_text() {
        let cases = [
            (Literal::Null, "null"),
            (Literal::Bool(true), "true"),
            (Literal::Int(-42), "-42"),
            (Literal::Float(1.5), "1.5"),
            (Literal::Text("abc".into()), "abc"),
            (Literal::Bytes(vec![0x00, 0xab, 0x1f]), "0x00ab1f"),
            (Literal::Bytes(Vec::new()), "0x"),
        ];

        for (literal, expected) in cases {
            assert_eq!(literal.to_string(), expected);
        }
    }
}
