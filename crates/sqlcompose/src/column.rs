//! Columns and select-list fields.
//!
//! Every column-like value renders differently depending on where it is used:
//!
//! | view          | used in                                | example             |
//! |---------------|----------------------------------------|---------------------|
//! | `field_view`  | SELECT list (alias applied)            | `` `t`.`a` AS `x` `` |
//! | `where_view`  | WHERE, ON, ORDER BY, GROUP BY          | `` `t`.`a` ``        |
//! | `insert_view` | INSERT column lists, SET targets       | `` `a` ``            |
//! | `update_view` | qualified assignment target            | `` `t`.`a` ``        |

use crate::condition::{Condition, IntoMembers, IntoOperand, Operand, Operator};
use crate::error::{QbError, QbResult};
use crate::sql::Sql;
use crate::table::{Table, TableInner};
use crate::value::Value;
use std::sync::Weak;

/// A table column, or the nameless "all columns" marker.
#[derive(Debug, Clone)]
pub struct Column {
    name: Option<String>,
    alias: Option<String>,
    table: Option<Weak<TableInner>>,
}

impl Column {
    /// An unbound column; renders without a table qualifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            alias: None,
            table: None,
        }
    }

    /// Unbound `*`.
    pub fn all() -> Self {
        Self {
            name: None,
            alias: None,
            table: None,
        }
    }

    pub(crate) fn bound(table: &Table, name: Option<String>) -> Self {
        Self {
            name,
            alias: None,
            table: Some(table.downgrade()),
        }
    }

    /// Alias used in select lists (`... AS alias`).
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The owning table, if the column was bound to one that is still alive.
    pub fn table(&self) -> Option<Table> {
        self.table.as_ref().and_then(Table::upgrade)
    }

    /// `true` if the column was never bound to a table.
    pub fn is_unbound(&self) -> bool {
        self.table.is_none()
    }

    /// `true` if the column was minted from `table` (handle identity).
    pub fn belongs_to(&self, table: &Table) -> bool {
        self.table.as_ref().is_some_and(|w| table.is_target_of(w))
    }

    pub(crate) fn describe(&self) -> String {
        self.name.clone().unwrap_or_else(|| "*".to_string())
    }

    fn require_name(&self) -> QbResult<&str> {
        self.name.as_deref().ok_or_else(|| {
            QbError::invalid_column("the all-columns marker has no name to render")
        })
    }

    // ==================== Rendering ====================

    /// Qualified identifier, never aliased.
    pub fn raw_view(&self) -> QbResult<Sql> {
        let name = self.require_name()?;
        let mut sql = Sql::empty();
        if let Some(table) = self.table() {
            sql.push_sql(table.where_view()).push(".");
        }
        sql.push_ident(name);
        Ok(sql)
    }

    pub fn where_view(&self) -> QbResult<Sql> {
        self.raw_view()
    }

    pub fn update_view(&self) -> QbResult<Sql> {
        self.raw_view()
    }

    /// Unqualified identifier.
    pub fn insert_view(&self) -> QbResult<Sql> {
        let name = self.require_name()?;
        let mut sql = Sql::empty();
        sql.push_ident(name);
        Ok(sql)
    }

    /// Select-list form: `*`, `t.*`, or the qualified name with its alias.
    pub fn field_view(&self) -> QbResult<Sql> {
        if self.name.is_none() {
            let mut sql = Sql::empty();
            if let Some(table) = self.table() {
                sql.push_sql(table.field_view()).push(".");
            }
            sql.push("*");
            return Ok(sql);
        }

        let mut sql = self.raw_view()?;
        if let Some(alias) = &self.alias {
            sql.push(" AS ").push_ident(alias);
        }
        Ok(sql)
    }

    // ==================== Conditions ====================

    fn compare(&self, op: Operator, value: impl IntoOperand) -> Condition {
        Condition::comparison(self.clone(), op, value.into_operand())
    }

    /// `=`; `None` renders `IS NULL`.
    pub fn eq(&self, value: impl IntoOperand) -> Condition {
        self.compare(Operator::Eq, value)
    }

    /// `!=`; `None` renders `IS NOT NULL`.
    pub fn ne(&self, value: impl IntoOperand) -> Condition {
        self.compare(Operator::Ne, value)
    }

    pub fn gt(&self, value: impl IntoOperand) -> Condition {
        self.compare(Operator::Gt, value)
    }

    pub fn gte(&self, value: impl IntoOperand) -> Condition {
        self.compare(Operator::Gte, value)
    }

    pub fn lt(&self, value: impl IntoOperand) -> Condition {
        self.compare(Operator::Lt, value)
    }

    pub fn lte(&self, value: impl IntoOperand) -> Condition {
        self.compare(Operator::Lte, value)
    }

    pub fn is_null(&self) -> Condition {
        self.eq(Value::Null)
    }

    pub fn is_not_null(&self) -> Condition {
        self.ne(Value::Null)
    }

    /// `IN (...)`; the list must be non-empty.
    pub fn in_(&self, members: impl IntoMembers) -> QbResult<Condition> {
        Condition::new(self.clone(), Operator::In, members.into_members())
    }

    pub fn not_in(&self, members: impl IntoMembers) -> QbResult<Condition> {
        Condition::new(self.clone(), Operator::NotIn, members.into_members())
    }

    /// `LIKE '%value%'`.
    pub fn like(&self, value: impl Into<String>) -> QbResult<Condition> {
        self.pattern(Operator::Like, value.into())
    }

    /// `NOT LIKE '%value%'`.
    pub fn not_like(&self, value: impl Into<String>) -> QbResult<Condition> {
        self.pattern(Operator::NotLike, value.into())
    }

    /// `LIKE 'value%'`.
    pub fn starts_with(&self, value: impl Into<String>) -> QbResult<Condition> {
        self.pattern(Operator::Prefix, value.into())
    }

    /// `LIKE '%value'`.
    pub fn ends_with(&self, value: impl Into<String>) -> QbResult<Condition> {
        self.pattern(Operator::Suffix, value.into())
    }

    fn pattern(&self, op: Operator, value: String) -> QbResult<Condition> {
        Condition::new(self.clone(), op, Operand::Value(Value::Text(value)))
    }

    // ==================== Aggregates ====================

    pub fn max(&self) -> Aggregate {
        Aggregate::new(AggregateFunc::Max, self.clone())
    }

    pub fn min(&self) -> Aggregate {
        Aggregate::new(AggregateFunc::Min, self.clone())
    }

    pub fn count(&self) -> Aggregate {
        Aggregate::new(AggregateFunc::Count, self.clone())
    }

    // ==================== Assignments ====================

    /// `col = value`.
    pub fn update(&self, value: impl IntoOperand) -> ColumnUpdating {
        ColumnUpdating::new(self.clone(), value, AssignOp::Assign)
    }

    /// `col = col + 1`.
    pub fn inc(&self) -> ColumnUpdating {
        ColumnUpdating::step(self.clone(), Value::Int(1), AssignOp::Inc)
    }

    /// `col = col + step`.
    pub fn inc_by(&self, step: impl Into<Value>) -> ColumnUpdating {
        ColumnUpdating::step(self.clone(), step.into(), AssignOp::Inc)
    }

    /// `col = col - 1`.
    pub fn dec(&self) -> ColumnUpdating {
        ColumnUpdating::step(self.clone(), Value::Int(1), AssignOp::Dec)
    }

    /// `col = col - step`.
    pub fn dec_by(&self, step: impl Into<Value>) -> ColumnUpdating {
        ColumnUpdating::step(self.clone(), step.into(), AssignOp::Dec)
    }
}

/// Aggregate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    Max,
    Min,
    Count,
}

impl AggregateFunc {
    pub fn as_sql(self) -> &'static str {
        match self {
            AggregateFunc::Max => "MAX",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Count => "COUNT",
        }
    }
}

/// `MAX(col)`, `MIN(col)` or `COUNT(col)`, with an optional alias.
#[derive(Debug, Clone)]
pub struct Aggregate {
    func: AggregateFunc,
    column: Column,
    alias: Option<String>,
}

impl Aggregate {
    pub fn new(func: AggregateFunc, column: Column) -> Self {
        Self {
            func,
            column,
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn func(&self) -> AggregateFunc {
        self.func
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn raw_view(&self) -> QbResult<Sql> {
        let mut sql = Sql::new(self.func.as_sql());
        if self.func == AggregateFunc::Count && self.column.name().is_none() {
            sql.push("(*)");
        } else {
            sql.push_parenthesized(self.column.raw_view()?);
        }
        Ok(sql)
    }

    pub fn field_view(&self) -> QbResult<Sql> {
        let mut sql = self.raw_view()?;
        if let Some(alias) = &self.alias {
            sql.push(" AS ").push_ident(alias);
        }
        Ok(sql)
    }
}

/// Verbatim select-list text; carries no arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSqlField(pub String);

impl RawSqlField {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }
}

/// One entry of a select list.
#[derive(Debug, Clone)]
pub enum Field {
    Column(Column),
    Aggregate(Aggregate),
    Raw(RawSqlField),
    /// A bare name: resolved to a column by `Table::select`, verbatim otherwise.
    Name(String),
}

impl Field {
    pub fn field_view(&self) -> QbResult<Sql> {
        match self {
            Field::Column(c) => c.field_view(),
            Field::Aggregate(a) => a.field_view(),
            Field::Raw(RawSqlField(text)) | Field::Name(text) => Ok(Sql::new(text.as_str())),
        }
    }
}

impl From<Column> for Field {
    fn from(c: Column) -> Self {
        Field::Column(c)
    }
}

impl From<&Column> for Field {
    fn from(c: &Column) -> Self {
        Field::Column(c.clone())
    }
}

impl From<Aggregate> for Field {
    fn from(a: Aggregate) -> Self {
        Field::Aggregate(a)
    }
}

impl From<RawSqlField> for Field {
    fn from(r: RawSqlField) -> Self {
        Field::Raw(r)
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::Name(name.to_string())
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::Name(name)
    }
}

/// Assignment operator of a SET entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Inc,
    Dec,
}

/// One SET-clause entry: `col = v`, `col = col + v` or `col = col - v`.
#[derive(Debug, Clone)]
pub struct ColumnUpdating {
    column: Column,
    value: Operand,
    op: AssignOp,
}

impl ColumnUpdating {
    /// The value may be a literal, a column or a sub-query.
    pub fn new(column: Column, value: impl IntoOperand, op: AssignOp) -> Self {
        Self {
            column,
            value: value.into_operand(),
            op,
        }
    }

    fn step(column: Column, step: Value, op: AssignOp) -> Self {
        Self {
            column,
            value: Operand::Value(step),
            op,
        }
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn op(&self) -> AssignOp {
        self.op
    }

    pub(crate) fn render(&self, out: &mut Sql) -> QbResult<()> {
        let target = self.column.insert_view()?;
        out.push_sql(target.clone()).push(" = ");
        match self.op {
            AssignOp::Assign => {}
            AssignOp::Inc => {
                out.push_sql(target).push(" + ");
            }
            AssignOp::Dec => {
                out.push_sql(target).push(" - ");
            }
        }
        self.value.render(out)
    }
}
