//! SELECT statement builder.

use crate::column::{Column, Field};
use crate::condition::Cond;
use crate::error::{QbError, QbResult};
use crate::qb::order::{Direction, GroupBy, Sort};
use crate::qb::traits::{Statement, StatementKind};
use crate::sql::Sql;
use crate::table::{Source, Table};
use std::ops::Range;

/// SELECT statement builder.
///
/// ```
/// use sqlcompose::{Statement, Table};
///
/// let student = Table::new("student");
/// let (sql, args) = student
///     .select([student.column("id"), student.column("name")])
///     .filter(student.column("age").gte(18))
///     .desc(&student.column("age"))
///     .unwrap()
///     .slice(4..10)
///     .unwrap()
///     .sql()
///     .unwrap();
///
/// assert_eq!(
///     sql,
///     "SELECT `student`.`id`, `student`.`name` FROM `student` \
///      WHERE `student`.`age` >= %s ORDER BY `student`.`age` DESC LIMIT 4, 6"
/// );
/// assert_eq!(args.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Select {
    source: Source,
    /// Empty means `*`
    fields: Vec<Field>,
    filter: Cond,
    group: Option<GroupBy>,
    sort: Sort,
    offset: u64,
    /// `0` means no LIMIT
    count: u64,
}

impl Select {
    /// `SELECT * FROM source`.
    pub fn new(source: impl Into<Source>) -> Self {
        Self {
            source: source.into(),
            fields: Vec::new(),
            filter: Cond::Empty,
            group: None,
            sort: Sort::new(),
            offset: 0,
            count: 0,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    // ==================== Fields ====================

    /// Replace the select list.
    pub fn select<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Append to the select list.
    pub fn fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Append one field.
    pub fn add_field(mut self, field: impl Into<Field>) -> Self {
        self.fields.push(field.into());
        self
    }

    // ==================== WHERE ====================

    /// Replace the WHERE condition.
    pub fn filter(mut self, cond: impl Into<Cond>) -> Self {
        self.filter = cond.into();
        self
    }

    /// AND another condition onto the current one.
    pub fn and_filter(mut self, cond: impl Into<Cond>) -> Self {
        self.filter &= cond;
        self
    }

    pub fn condition(&self) -> &Cond {
        &self.filter
    }

    // ==================== GROUP BY / ORDER BY ====================

    /// `GROUP BY columns`; the list must be non-empty.
    pub fn group(mut self, columns: impl IntoIterator<Item = Column>) -> QbResult<Self> {
        self.group = Some(GroupBy::new(columns)?);
        Ok(self)
    }

    pub fn group_by(mut self, group: GroupBy) -> Self {
        self.group = Some(group);
        self
    }

    /// Append `column ASC`; the column must come from the source.
    pub fn asc(self, column: &Column) -> QbResult<Self> {
        self.order(column, Direction::Asc)
    }

    /// Append `column DESC`; the column must come from the source.
    pub fn desc(self, column: &Column) -> QbResult<Self> {
        self.order(column, Direction::Desc)
    }

    fn order(mut self, column: &Column, direction: Direction) -> QbResult<Self> {
        self.source.check_column(column)?;
        self.sort.push(column.clone(), direction);
        Ok(self)
    }

    /// Replace the ORDER BY list; every column must come from the source.
    pub fn order_by(mut self, sort: Sort) -> QbResult<Self> {
        for column in sort.columns() {
            self.source.check_column(column)?;
        }
        self.sort = sort;
        Ok(self)
    }

    // ==================== LIMIT ====================

    /// Rows `[start, end)`: `LIMIT start, end - start`.
    pub fn slice(mut self, range: Range<i64>) -> QbResult<Self> {
        if range.start < 0 || range.end <= range.start {
            return Err(QbError::usage(format!(
                "invalid slice {}..{}",
                range.start, range.end
            )));
        }
        self.offset = range.start.unsigned_abs();
        self.count = (range.end - range.start).unsigned_abs();
        Ok(self)
    }

    /// Row count; `0` removes the LIMIT clause.
    pub fn limit(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    // ==================== Derived table ====================

    /// Wrap as a derived table `(...) AS alias`.
    pub fn as_table(self, alias: impl Into<String>) -> Table {
        Table::derived(self, alias)
    }
}

impl Statement for Select {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn to_fragment(&self) -> QbResult<Sql> {
        let mut sql = Sql::new("SELECT ");

        if self.fields.is_empty() {
            sql.push("*");
        } else {
            sql.push_joined(&self.fields, ", ", |field, sql| {
                sql.push_sql(field.field_view()?);
                Ok::<_, QbError>(())
            })?;
        }

        sql.push(" FROM ").push_sql(self.source.from_view()?);

        if !self.filter.is_empty() {
            sql.push(" WHERE ");
            self.filter.render(&mut sql)?;
        }

        if let Some(group) = &self.group {
            sql.push(" GROUP BY ");
            group.render(&mut sql)?;
        }

        if !self.sort.is_empty() {
            sql.push(" ORDER BY ");
            self.sort.render(&mut sql)?;
        }

        if self.count > 0 {
            sql.push(&format!(" LIMIT {}, {}", self.offset, self.count));
        }

        Ok(sql)
    }
}
