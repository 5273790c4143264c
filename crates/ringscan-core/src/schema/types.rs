use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

///
/// CqlType
///
/// Column type as declared in the table schema. Only native types can be
/// encoded into partition keys; everything else (collections, tuples, UDTs,
/// frozen wrappers) is carried by name as `Other`.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum CqlType {
    Ascii,
    BigInt,
    Blob,
    Boolean,
    Counter,
    Date,
    Double,
    Float,
    Inet,
    Int,
    SmallInt,
    Text,
    Timestamp,
    TimeUuid,
    TinyInt,
    Uuid,
    VarChar,
    VarInt,
    Other(String),
}

impl CqlType {
    /// Canonical CQL type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Ascii => "ascii",
            Self::BigInt => "bigint",
            Self::Blob => "blob",
            Self::Boolean => "boolean",
            Self::Counter => "counter",
            Self::Date => "date",
            Self::Double => "double",
            Self::Float => "float",
            Self::Inet => "inet",
            Self::Int => "int",
            Self::SmallInt => "smallint",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::TimeUuid => "timeuuid",
            Self::TinyInt => "tinyint",
            Self::Uuid => "uuid",
            Self::VarChar => "varchar",
            Self::VarInt => "varint",
            Self::Other(name) => name,
        }
    }

    /// Whether values of this type can be pinned by a literal and encoded
    /// into a partition key.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for CqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CqlType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim().to_ascii_lowercase().as_str() {
            "ascii" => Self::Ascii,
            "bigint" => Self::BigInt,
            "blob" => Self::Blob,
            "boolean" => Self::Boolean,
            "counter" => Self::Counter,
            "date" => Self::Date,
            "double" => Self::Double,
            "float" => Self::Float,
            "inet" => Self::Inet,
            "int" => Self::Int,
            "smallint" => Self::SmallInt,
            "text" => Self::Text,
            "timestamp" => Self::Timestamp,
            "timeuuid" => Self::TimeUuid,
            "tinyint" => Self::TinyInt,
            "uuid" => Self::Uuid,
            "varchar" => Self::VarChar,
            "varint" => Self::VarInt,
            _ => Self::Other(s.trim().to_string()),
        };

        Ok(ty)
    }
}
