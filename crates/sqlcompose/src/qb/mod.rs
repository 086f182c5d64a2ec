//! Statement builders.
//!
//! Five statement shapes share one lifecycle: construct, chain configuration
//! calls, render. Builders are consuming (`mut self -> Self`); calls that take
//! input which can be checked up front return `QbResult<Self>`, so misuse is
//! reported at the call that introduces it. Identifier checks happen when the
//! statement is rendered through [`Statement`].
//!
//! # Usage
//!
//! ```
//! use sqlcompose::prelude::*;
//!
//! let teacher = Table::new("teacher");
//! let teach = Table::new("teach");
//!
//! let taught = qb::select(&teach)
//!     .select([teach.column("teacher_id")])
//!     .filter(teach.column("class_id").eq(2));
//!
//! let (sql, args) = qb::delete(&teacher)
//!     .unwrap()
//!     .filter(teacher.column("id").in_(taught).unwrap())
//!     .sql()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "DELETE FROM `teacher` WHERE `teacher`.`id` IN \
//!      (SELECT `teach`.`teacher_id` FROM `teach` WHERE `teach`.`class_id` = %s)"
//! );
//! assert_eq!(args, vec![Value::Int(2)]);
//! ```

mod delete;
mod insert;
mod insert_select;
mod order;
mod select;
mod traits;
mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use insert_select::{InsertFromSelect, InsertSource};
pub use order::{Direction, GroupBy, Sort};
pub use select::Select;
pub use traits::{Statement, StatementKind};
pub use update::Update;

use crate::column::Column;
use crate::error::{QbError, QbResult};
use crate::table::{Source, Table};

/// Create a SELECT builder over a table, derived table or join.
pub fn select(source: impl Into<Source>) -> Select {
    Select::new(source)
}

/// Create an INSERT builder for a base table.
pub fn insert(table: &Table) -> QbResult<Insert> {
    Insert::new(table)
}

/// Create an INSERT ... SELECT builder for a base table.
pub fn insert_from_select(
    table: &Table,
    fields: impl IntoIterator<Item = Column>,
    source: impl Into<InsertSource>,
) -> QbResult<InsertFromSelect> {
    InsertFromSelect::new(table, fields, source)
}

/// Create an UPDATE builder for a base table.
pub fn update(table: &Table) -> QbResult<Update> {
    Update::new(table)
}

/// Create a DELETE builder for a base table.
pub fn delete(table: &Table) -> QbResult<Delete> {
    Delete::new(table)
}

/// Pair keys must be unbound or minted from the statement's target.
pub(crate) fn check_target(table: &Table, column: &Column) -> QbResult<()> {
    if column.is_unbound() || column.belongs_to(table) {
        Ok(())
    } else {
        Err(QbError::foreign_column(column.describe(), table.describe()))
    }
}

#[cfg(test)]
mod tests;
