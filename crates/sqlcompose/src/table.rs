//! Tables, derived tables and joins.
//!
//! A [`Table`] is a cheap, clonable handle. Columns minted from it keep only a
//! weak reference back, so a column never extends the lifetime of its table;
//! once every handle is dropped the column simply renders unqualified.
//! Re-aliasing mutates the shared table, so earlier columns follow it.
//!
//! # Example
//!
//! ```
//! use sqlcompose::{Statement, Table};
//!
//! let student = Table::new("student");
//! let class = Table::new("class").with_alias("c");
//!
//! let join = student
//!     .inner_join(&class, student.column("class_id").eq(class.column("id")))
//!     .unwrap();
//! let (sql, args) = sqlcompose::Select::new(join).sql().unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM `student` INNER JOIN `class` AS `c` ON `student`.`class_id` = `c`.`id`"
//! );
//! assert!(args.is_empty());
//! ```

use crate::column::{Column, Field};
use crate::condition::Cond;
use crate::error::{QbError, QbResult};
use crate::qb::{Delete, Insert, InsertFromSelect, InsertSource, Select, Statement, Update};
use crate::sql::Sql;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

#[derive(Debug, Clone)]
enum Relation {
    Base(String),
    Derived(Box<Select>),
}

/// The mutable part of a table: re-aliasing is visible through every handle
/// and every column minted from it.
#[derive(Debug, Clone, Default)]
struct Naming {
    db: Option<String>,
    /// Always set for a derived table
    alias: Option<String>,
}

#[derive(Debug)]
pub(crate) struct TableInner {
    relation: Relation,
    naming: RwLock<Naming>,
}

/// A base relation or a derived table (aliased sub-query).
///
/// Clones share the same table: re-aliasing through one handle is seen by
/// all of them, and by the columns they minted.
#[derive(Debug, Clone)]
pub struct Table {
    inner: Arc<TableInner>,
}

impl Table {
    /// A base table.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_parts(Relation::Base(name.into()), Naming::default())
    }

    pub(crate) fn derived(query: Select, alias: impl Into<String>) -> Self {
        Self::from_parts(
            Relation::Derived(Box::new(query)),
            Naming {
                db: None,
                alias: Some(alias.into()),
            },
        )
    }

    fn from_parts(relation: Relation, naming: Naming) -> Self {
        Self {
            inner: Arc::new(TableInner {
                relation,
                naming: RwLock::new(naming),
            }),
        }
    }

    fn naming(&self) -> RwLockReadGuard<'_, Naming> {
        self.inner.naming.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn naming_mut(&self) -> RwLockWriteGuard<'_, Naming> {
        self.inner.naming.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Qualify a base table with a database name, in place.
    ///
    /// A derived table has no database qualifier; the call leaves it as is.
    pub fn with_db(self, db: impl Into<String>) -> Self {
        self.set_db(db);
        self
    }

    /// Re-alias the table in place. Columns minted earlier follow the new alias.
    pub fn with_alias(self, alias: impl Into<String>) -> Self {
        self.set_alias(alias);
        self
    }

    /// Borrowing form of [`Table::with_db`].
    pub fn set_db(&self, db: impl Into<String>) -> &Self {
        if !self.is_derived() {
            self.naming_mut().db = Some(db.into());
        }
        self
    }

    /// Borrowing form of [`Table::with_alias`].
    pub fn set_alias(&self, alias: impl Into<String>) -> &Self {
        self.naming_mut().alias = Some(alias.into());
        self
    }

    /// An independent table with the same definition; later re-aliasing of
    /// either side does not affect the other.
    pub fn copy(&self) -> Self {
        let naming = self.naming().clone();
        Self::from_parts(self.inner.relation.clone(), naming)
    }

    /// Table name; for a derived table, its alias.
    pub fn name(&self) -> String {
        match &self.inner.relation {
            Relation::Base(name) => name.clone(),
            Relation::Derived(_) => self.alias().unwrap_or_default(),
        }
    }

    pub fn db(&self) -> Option<String> {
        self.naming().db.clone()
    }

    pub fn alias(&self) -> Option<String> {
        self.naming().alias.clone()
    }

    pub fn is_derived(&self) -> bool {
        matches!(self.inner.relation, Relation::Derived(_))
    }

    /// `true` if both handles refer to the same table.
    pub fn ptr_eq(&self, other: &Table) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn downgrade(&self) -> Weak<TableInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn is_target_of(&self, weak: &Weak<TableInner>) -> bool {
        std::ptr::eq(weak.as_ptr(), Arc::as_ptr(&self.inner))
    }

    pub(crate) fn upgrade(weak: &Weak<TableInner>) -> Option<Table> {
        weak.upgrade().map(|inner| Table { inner })
    }

    pub(crate) fn describe(&self) -> String {
        let naming = self.naming();
        match (&self.inner.relation, naming.alias.as_deref()) {
            (Relation::Base(name), Some(alias)) => format!("table '{name}' (as '{alias}')"),
            (Relation::Base(name), None) => format!("table '{name}'"),
            (Relation::Derived(_), alias) => {
                format!("derived table '{}'", alias.unwrap_or_default())
            }
        }
    }

    // ==================== Columns ====================

    /// Mint a column bound to this table.
    pub fn column(&self, name: impl Into<String>) -> Column {
        Column::bound(self, Some(name.into()))
    }

    /// The nameless "all columns" marker, rendering `table.*`.
    pub fn all(&self) -> Column {
        Column::bound(self, None)
    }

    // ==================== Rendering ====================

    /// Database-qualified name, never aliased.
    pub fn raw_view(&self) -> Sql {
        let naming = self.naming();
        let mut sql = Sql::empty();
        match &self.inner.relation {
            Relation::Base(name) => {
                if let Some(db) = &naming.db {
                    sql.push_ident(db).push(".");
                }
                sql.push_ident(name);
            }
            Relation::Derived(_) => {
                sql.push_ident(naming.alias.as_deref().unwrap_or_default());
            }
        }
        sql
    }

    /// How columns of this table are qualified in select lists.
    pub fn field_view(&self) -> Sql {
        match self.alias() {
            Some(alias) => {
                let mut sql = Sql::empty();
                sql.push_ident(&alias);
                sql
            }
            None => self.raw_view(),
        }
    }

    /// How columns of this table are qualified in WHERE/ON/ORDER BY/GROUP BY.
    pub fn where_view(&self) -> Sql {
        self.field_view()
    }

    /// FROM-clause text, carrying a derived table's arguments.
    pub fn from_view(&self) -> QbResult<Sql> {
        let mut sql = Sql::empty();
        match &self.inner.relation {
            Relation::Base(_) => {
                sql.push_sql(self.raw_view());
            }
            Relation::Derived(query) => {
                sql.push_parenthesized(query.to_fragment()?);
            }
        }
        if let Some(alias) = self.alias() {
            sql.push(" AS ").push_ident(&alias);
        }
        Ok(sql)
    }

    pub(crate) fn require_base(&self) -> QbResult<()> {
        if self.is_derived() {
            return Err(QbError::NotBaseTable(self.describe()));
        }
        Ok(())
    }

    // ==================== Statement factories ====================

    /// `SELECT <fields> FROM self`. Bare names resolve to columns of this table.
    pub fn select<I>(&self, fields: I) -> Select
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let fields = fields.into_iter().map(|f| match f.into() {
            Field::Name(name) => Field::Column(self.column(name)),
            other => other,
        });
        Select::new(self).select(fields)
    }

    /// `SELECT * FROM self`.
    pub fn select_all(&self) -> Select {
        Select::new(self)
    }

    pub fn insert(&self) -> QbResult<Insert> {
        Insert::new(self)
    }

    pub fn update(&self) -> QbResult<Update> {
        Update::new(self)
    }

    pub fn delete(&self) -> QbResult<Delete> {
        Delete::new(self)
    }

    pub fn insert_from_select(
        &self,
        fields: impl IntoIterator<Item = Column>,
        source: impl Into<InsertSource>,
    ) -> QbResult<InsertFromSelect> {
        InsertFromSelect::new(self, fields, source)
    }

    // ==================== Joins ====================

    pub fn join(&self, other: &Table, on: impl Into<Cond>) -> QbResult<TableJoin> {
        TableJoin::new(self).join(other, on)
    }

    pub fn inner_join(&self, other: &Table, on: impl Into<Cond>) -> QbResult<TableJoin> {
        TableJoin::new(self).inner_join(other, on)
    }

    pub fn left_join(&self, other: &Table, on: impl Into<Cond>) -> QbResult<TableJoin> {
        TableJoin::new(self).left_join(other, on)
    }

    pub fn right_join(&self, other: &Table, on: impl Into<Cond>) -> QbResult<TableJoin> {
        TableJoin::new(self).right_join(other, on)
    }

    pub fn full_join(&self, other: &Table, on: impl Into<Cond>) -> QbResult<TableJoin> {
        TableJoin::new(self).full_join(other, on)
    }
}

/// Join method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinMethod {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinMethod {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinMethod::Inner => "INNER JOIN",
            JoinMethod::Left => "LEFT JOIN",
            JoinMethod::Right => "RIGHT JOIN",
            JoinMethod::Full => "FULL JOIN",
        }
    }
}

#[derive(Debug, Clone)]
struct JoinItem {
    method: JoinMethod,
    table: Table,
    on: Cond,
}

/// A base table followed by joined tables, each with its ON condition.
#[derive(Debug, Clone)]
pub struct TableJoin {
    base: Table,
    items: Vec<JoinItem>,
}

impl TableJoin {
    pub fn new(base: &Table) -> Self {
        Self {
            base: base.clone(),
            items: Vec::new(),
        }
    }

    /// Append a join with an explicit method.
    pub fn join_with(mut self, method: JoinMethod, table: &Table, on: impl Into<Cond>) -> QbResult<Self> {
        let on = on.into();
        if on.is_empty() {
            return Err(QbError::usage(format!(
                "{} {} requires a non-empty ON condition",
                method.as_sql(),
                table.describe()
            )));
        }
        self.items.push(JoinItem {
            method,
            table: table.clone(),
            on,
        });
        Ok(self)
    }

    /// `INNER JOIN` (the default method).
    pub fn join(self, table: &Table, on: impl Into<Cond>) -> QbResult<Self> {
        self.join_with(JoinMethod::default(), table, on)
    }

    pub fn inner_join(self, table: &Table, on: impl Into<Cond>) -> QbResult<Self> {
        self.join_with(JoinMethod::Inner, table, on)
    }

    pub fn left_join(self, table: &Table, on: impl Into<Cond>) -> QbResult<Self> {
        self.join_with(JoinMethod::Left, table, on)
    }

    pub fn right_join(self, table: &Table, on: impl Into<Cond>) -> QbResult<Self> {
        self.join_with(JoinMethod::Right, table, on)
    }

    pub fn full_join(self, table: &Table, on: impl Into<Cond>) -> QbResult<Self> {
        self.join_with(JoinMethod::Full, table, on)
    }

    pub fn base(&self) -> &Table {
        &self.base
    }

    /// Base and joined tables, in join order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        std::iter::once(&self.base).chain(self.items.iter().map(|item| &item.table))
    }

    /// `true` if `table` is the base or one of the joined tables.
    pub fn contains(&self, table: &Table) -> bool {
        self.tables().any(|t| t.ptr_eq(table))
    }

    /// `base [METHOD table ON cond]...`; arguments follow text order.
    pub fn from_view(&self) -> QbResult<Sql> {
        let mut sql = self.base.from_view()?;
        for item in &self.items {
            sql.push(" ").push(item.method.as_sql()).push(" ");
            sql.push_sql(item.table.from_view()?);
            sql.push(" ON ");
            item.on.render(&mut sql)?;
        }
        Ok(sql)
    }
}

/// The FROM source of a SELECT or DELETE.
#[derive(Debug, Clone)]
pub enum Source {
    Table(Table),
    Join(TableJoin),
}

impl Source {
    pub fn from_view(&self) -> QbResult<Sql> {
        match self {
            Source::Table(table) => table.from_view(),
            Source::Join(join) => join.from_view(),
        }
    }

    pub fn contains(&self, table: &Table) -> bool {
        match self {
            Source::Table(t) => t.ptr_eq(table),
            Source::Join(join) => join.contains(table),
        }
    }

    /// Unbound columns are accepted; bound ones must belong to a reachable table.
    pub(crate) fn check_column(&self, column: &Column) -> QbResult<()> {
        if column.is_unbound() {
            return Ok(());
        }
        let reachable = match self {
            Source::Table(t) => column.belongs_to(t),
            Source::Join(join) => join.tables().any(|t| column.belongs_to(t)),
        };
        if reachable {
            Ok(())
        } else {
            Err(QbError::foreign_column(column.describe(), self.describe()))
        }
    }

    fn describe(&self) -> String {
        match self {
            Source::Table(t) => t.describe(),
            Source::Join(join) => format!("join on {}", join.base.describe()),
        }
    }
}

impl From<Table> for Source {
    fn from(table: Table) -> Self {
        Source::Table(table)
    }
}

impl From<&Table> for Source {
    fn from(table: &Table) -> Self {
        Source::Table(table.clone())
    }
}

impl From<TableJoin> for Source {
    fn from(join: TableJoin) -> Self {
        Source::Join(join)
    }
}
