//! Bound argument values.
//!
//! Rendering never touches a database, so arguments are carried as an owned,
//! driver-agnostic [`Value`]. Callers convert the rendered `Vec<Value>` into
//! whatever their driver expects when executing.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single positional argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
}

impl Value {
    /// `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! impl_from_value {
    ($variant:ident: $($ty:ty => $conv:expr),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(($conv)(v))
                }
            }
        )+
    };
}

impl_from_value!(Bool: bool => |v| v);
impl_from_value!(Int: i8 => i64::from, i16 => i64::from, i32 => i64::from, i64 => |v| v);
impl_from_value!(UInt: u8 => u64::from, u16 => u64::from, u32 => u64::from, u64 => |v| v);
impl_from_value!(Float: f32 => f64::from, f64 => |v| v);
impl_from_value!(Text: String => |v| v, &str => str::to_string, &String => String::clone);
impl_from_value!(Bytes: Vec<u8> => |v| v, &[u8] => <[u8]>::to_vec);
impl_from_value!(Json: serde_json::Value => |v| v);
impl_from_value!(Date: NaiveDate => |v| v);
impl_from_value!(Time: NaiveTime => |v| v);
impl_from_value!(DateTime: NaiveDateTime => |v| v);
impl_from_value!(Uuid: Uuid => |v| v);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
