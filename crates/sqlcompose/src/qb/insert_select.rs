//! INSERT ... SELECT statement builder.

use crate::column::{AssignOp, Column, ColumnUpdating};
use crate::error::{QbError, QbResult};
use crate::qb::check_target;
use crate::qb::insert::render_on_duplicate;
use crate::qb::select::Select;
use crate::qb::traits::{Statement, StatementKind};
use crate::sql::Sql;
use crate::table::Table;

/// Row source of an INSERT ... SELECT.
#[derive(Debug, Clone)]
pub enum InsertSource {
    /// Rendered as-is.
    Select(Select),
    /// Rendered as `SELECT * FROM (...) AS alias`; its columns may feed
    /// ON DUPLICATE KEY UPDATE.
    Derived(Table),
}

impl From<Select> for InsertSource {
    fn from(select: Select) -> Self {
        InsertSource::Select(select)
    }
}

impl From<Table> for InsertSource {
    fn from(table: Table) -> Self {
        InsertSource::Derived(table)
    }
}

impl From<&Table> for InsertSource {
    fn from(table: &Table) -> Self {
        InsertSource::Derived(table.clone())
    }
}

/// `INSERT INTO t(cols) <source> [ON DUPLICATE KEY UPDATE ...]`.
///
/// Arguments are the source's, then the update values.
#[derive(Debug, Clone)]
pub struct InsertFromSelect {
    table: Table,
    fields: Vec<Column>,
    source: InsertSource,
    on_duplicate: Vec<ColumnUpdating>,
}

impl InsertFromSelect {
    /// The target must be a base table, the column list non-empty and owned
    /// by the target, and a table source must be derived.
    pub fn new(
        table: &Table,
        fields: impl IntoIterator<Item = Column>,
        source: impl Into<InsertSource>,
    ) -> QbResult<Self> {
        table.require_base()?;

        let fields: Vec<Column> = fields.into_iter().collect();
        if fields.is_empty() {
            return Err(QbError::usage("INSERT ... SELECT needs a target column list"));
        }
        for column in &fields {
            check_target(table, column)?;
        }

        let source = source.into();
        if let InsertSource::Derived(t) = &source {
            if !t.is_derived() {
                return Err(QbError::usage(format!(
                    "INSERT ... SELECT source {} is not a derived table",
                    t.describe()
                )));
            }
        }

        Ok(Self {
            table: table.clone(),
            fields,
            source,
            on_duplicate: Vec::new(),
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    fn derived_source(&self) -> QbResult<&Table> {
        match &self.source {
            InsertSource::Derived(t) => Ok(t),
            InsertSource::Select(_) => Err(QbError::usage(
                "ON DUPLICATE KEY fields need a derived-table source",
            )),
        }
    }

    /// Append `target_col = source_col` entries; only valid with a derived
    /// source whose columns supply the values. Target columns must be minted
    /// from the insert table.
    pub fn on_duplicate_key_fields(
        mut self,
        pairs: impl IntoIterator<Item = (Column, Column)>,
    ) -> QbResult<Self> {
        let source = self.derived_source()?.clone();
        let pairs: Vec<(Column, Column)> = pairs.into_iter().collect();
        if pairs.is_empty() {
            return Err(QbError::usage("ON DUPLICATE KEY fields must not be empty"));
        }

        for (target, value) in pairs {
            if !target.belongs_to(&self.table) {
                return Err(QbError::foreign_column(target.describe(), self.table.describe()));
            }
            if !value.belongs_to(&source) {
                return Err(QbError::foreign_column(value.describe(), source.describe()));
            }
            self.on_duplicate
                .push(ColumnUpdating::new(target, value, AssignOp::Assign));
        }
        Ok(self)
    }

    /// Append `name = source_col`.
    pub fn on_duplicate_key_set(self, name: &str, value: &Column) -> QbResult<Self> {
        let target = self.table.column(name);
        self.on_duplicate_key_fields([(target, value.clone())])
    }

    /// Append prepared entries (`col.inc()`, `col.update(v)`, ...).
    pub fn on_duplicate_key_update(
        mut self,
        updates: impl IntoIterator<Item = ColumnUpdating>,
    ) -> QbResult<Self> {
        for update in updates {
            check_target(&self.table, update.column())?;
            self.on_duplicate.push(update);
        }
        Ok(self)
    }
}

impl Statement for InsertFromSelect {
    fn kind(&self) -> StatementKind {
        StatementKind::InsertFromSelect
    }

    fn to_fragment(&self) -> QbResult<Sql> {
        let mut sql = Sql::new("INSERT INTO ");
        sql.push_sql(self.table.raw_view()).push("(");
        sql.push_joined(&self.fields, ", ", |column, sql| {
            sql.push_sql(column.insert_view()?);
            Ok::<_, QbError>(())
        })?;
        sql.push(") ");

        match &self.source {
            InsertSource::Select(select) => {
                sql.push_sql(select.to_fragment()?);
            }
            InsertSource::Derived(table) => {
                sql.push("SELECT * FROM ").push_sql(table.from_view()?);
            }
        }

        render_on_duplicate(&self.on_duplicate, &mut sql)?;
        Ok(sql)
    }
}
