//! Trait definitions for statement builders.

use crate::dialect::Dialect;
use crate::error::QbResult;
use crate::sql::{BuiltQuery, Sql};
use crate::value::Value;

/// Which of the five statement shapes a builder renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    InsertFromSelect,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::InsertFromSelect => "insert_from_select",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        }
    }
}

/// Base trait for all statement builders.
///
/// Rendering is pure: building the same statement twice yields identical text
/// and arguments.
pub trait Statement {
    fn kind(&self) -> StatementKind;

    /// Render into a dialect-neutral fragment.
    ///
    /// Used to splice this statement into another one as a sub-query.
    fn to_fragment(&self) -> QbResult<Sql>;

    /// Render SQL text and ordered arguments for `dialect`.
    fn build_with(&self, dialect: &Dialect) -> QbResult<BuiltQuery> {
        let built = self.to_fragment()?.build(dialect);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlcompose.sql",
            statement = self.kind().as_str(),
            sql = %built.sql,
            args = built.args.len(),
            "built statement"
        );

        Ok(built)
    }

    /// Render with the default dialect.
    fn build(&self) -> QbResult<BuiltQuery> {
        self.build_with(&Dialect::default())
    }

    /// `(sql, args)` with the default dialect.
    fn sql(&self) -> QbResult<(String, Vec<Value>)> {
        self.build().map(BuiltQuery::into_parts)
    }

    /// Debug helper to get the SQL string.
    fn to_sql(&self) -> QbResult<String> {
        self.build().map(|built| built.sql)
    }
}
