//! # sqlcompose
//!
//! Compose SQL statements from typed tables, columns and conditions instead of
//! concatenating strings.
//!
//! ## Features
//!
//! - **Rendering only**: statements render to `(sql, args)`; executing them is
//!   the caller's business
//! - **Aligned arguments**: placeholders are generated while arguments are
//!   collected, so their order always matches, through joins and nested
//!   sub-queries alike
//! - **Condition algebra**: `&`, `|` and `!` on conditions, with De Morgan
//!   negation and an empty identity for conditional accumulation
//! - **Derived tables**: any SELECT can become `(...) AS alias` and be joined,
//!   selected from or inserted from
//! - **Dialects**: `%s`, `?` or `$n` placeholders and configurable identifier
//!   quoting
//!
//! ## Example
//!
//! ```
//! use sqlcompose::prelude::*;
//!
//! let student = Table::new("student");
//! let (sql, args) = student
//!     .select(["id", "name"])
//!     .filter(student.column("age").is_null() | student.column("age").gte(18))
//!     .slice(4..10)
//!     .unwrap()
//!     .sql()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT `student`.`id`, `student`.`name` FROM `student` \
//!      WHERE `student`.`age` IS NULL OR `student`.`age` >= %s LIMIT 4, 6"
//! );
//! assert_eq!(args, vec![Value::Int(18)]);
//! ```
//!
//! ## Upsert
//!
//! ```
//! use sqlcompose::prelude::*;
//!
//! let visits = Table::new("visits");
//! let hits = visits.column("hits");
//! let built = qb::insert(&visits)
//!     .unwrap()
//!     .set("page", "/home")
//!     .value(&hits, 1)
//!     .unwrap()
//!     .on_duplicate_key_update([hits.inc()])
//!     .unwrap()
//!     .build_with(&Dialect::sqlite())
//!     .unwrap();
//!
//! assert_eq!(
//!     built.sql,
//!     r#"INSERT INTO "visits"("page", "hits") VALUES(?, ?) ON DUPLICATE KEY UPDATE "hits" = "hits" + ?"#
//! );
//! assert_eq!(built.args.len(), 3);
//! ```

pub mod column;
pub mod condition;
pub mod dialect;
pub mod error;
pub mod prelude;
pub mod qb;
pub mod sql;
pub mod table;
pub mod value;

pub use column::{Aggregate, AggregateFunc, AssignOp, Column, ColumnUpdating, Field, RawSqlField};
pub use condition::{
    Cond, Condition, ConditionUnion, IntoMembers, IntoOperand, Logic, Operand, Operator,
};
pub use dialect::{Dialect, PatternMode, Placeholder, Quote};
pub use error::{QbError, QbResult};
pub use sql::{BuiltQuery, Sql};
pub use table::{JoinMethod, Source, Table, TableJoin};
pub use value::Value;

// Re-export qb module for easy access
pub use qb::{
    Delete, Direction, GroupBy, Insert, InsertFromSelect, InsertSource, Select, Sort, Statement,
    StatementKind, Update,
};
