//! Convenient imports for typical `sqlcompose` usage.
//!
//! ```
//! use sqlcompose::prelude::*;
//! ```

pub use crate::qb;
pub use crate::{
    Column, Cond, Condition, Dialect, QbError, QbResult, RawSqlField, Select, Sort, Statement,
    Table, Value,
};
