//! ORDER BY and GROUP BY clauses.

use crate::column::Column;
use crate::error::{QbError, QbResult};
use crate::sql::Sql;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Ordered `(column, direction)` list.
#[derive(Debug, Clone, Default)]
pub struct Sort {
    items: Vec<(Column, Direction)>,
}

impl Sort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: Column, direction: Direction) -> &mut Self {
        self.items.push((column, direction));
        self
    }

    pub fn asc(mut self, column: &Column) -> Self {
        self.push(column.clone(), Direction::Asc);
        self
    }

    pub fn desc(mut self, column: &Column) -> Self {
        self.push(column.clone(), Direction::Desc);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.items.iter().map(|(c, _)| c)
    }

    /// `a ASC, b DESC`.
    pub fn render(&self, out: &mut Sql) -> QbResult<()> {
        out.push_joined(&self.items, ", ", |(column, direction), sql| {
            sql.push_sql(column.where_view()?)
                .push(" ")
                .push(direction.as_sql());
            Ok::<_, QbError>(())
        })?;
        Ok(())
    }
}

/// Non-empty ordered column list.
#[derive(Debug, Clone)]
pub struct GroupBy {
    columns: Vec<Column>,
}

impl GroupBy {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> QbResult<Self> {
        let columns: Vec<Column> = columns.into_iter().collect();
        if columns.is_empty() {
            return Err(QbError::usage("GROUP BY needs at least one column"));
        }
        Ok(Self { columns })
    }

    pub fn add(mut self, column: &Column) -> Self {
        self.columns.push(column.clone());
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn render(&self, out: &mut Sql) -> QbResult<()> {
        out.push_joined(&self.columns, ", ", |column, sql| {
            sql.push_sql(column.where_view()?);
            Ok::<_, QbError>(())
        })?;
        Ok(())
    }
}
