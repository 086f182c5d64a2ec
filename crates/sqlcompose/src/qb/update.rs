//! UPDATE statement builder.

use crate::column::{AssignOp, Column, ColumnUpdating};
use crate::condition::{Cond, IntoOperand};
use crate::error::{QbError, QbResult};
use crate::qb::check_target;
use crate::qb::traits::{Statement, StatementKind};
use crate::sql::Sql;
use crate::table::Table;

/// `UPDATE t SET ... [WHERE ...]`.
#[derive(Debug, Clone)]
pub struct Update {
    table: Table,
    assignments: Vec<ColumnUpdating>,
    filter: Cond,
}

impl Update {
    /// The target must be a base table.
    pub fn new(table: &Table) -> QbResult<Self> {
        table.require_base()?;
        Ok(Self {
            table: table.clone(),
            assignments: Vec::new(),
            filter: Cond::Empty,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Append `column = value`.
    pub fn value(self, column: &Column, value: impl IntoOperand) -> QbResult<Self> {
        self.update([column.update(value)])
    }

    /// Append `column = value` pairs.
    pub fn values<I, V>(self, pairs: I) -> QbResult<Self>
    where
        I: IntoIterator<Item = (Column, V)>,
        V: IntoOperand,
    {
        self.update(
            pairs
                .into_iter()
                .map(|(column, value)| ColumnUpdating::new(column, value, AssignOp::Assign)),
        )
    }

    /// Append `name = value`.
    pub fn set(mut self, name: &str, value: impl IntoOperand) -> Self {
        let column = self.table.column(name);
        self.assignments
            .push(ColumnUpdating::new(column, value, AssignOp::Assign));
        self
    }

    /// Append prepared entries (`col.inc()`, `col.dec_by(2)`, ...).
    pub fn update(mut self, updates: impl IntoIterator<Item = ColumnUpdating>) -> QbResult<Self> {
        for update in updates {
            check_target(&self.table, update.column())?;
            self.assignments.push(update);
        }
        Ok(self)
    }

    /// Replace the WHERE condition.
    pub fn filter(mut self, cond: impl Into<Cond>) -> Self {
        self.filter = cond.into();
        self
    }
}

impl Statement for Update {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn to_fragment(&self) -> QbResult<Sql> {
        if self.assignments.is_empty() {
            return Err(QbError::usage(format!(
                "UPDATE of {} has no SET entries",
                self.table.describe()
            )));
        }

        let mut sql = Sql::new("UPDATE ");
        sql.push_sql(self.table.raw_view()).push(" SET ");
        sql.push_joined(&self.assignments, ", ", |update, sql| update.render(sql))?;

        if !self.filter.is_empty() {
            sql.push(" WHERE ");
            self.filter.render(&mut sql)?;
        }
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn update_with_where() {
        let t = Table::new("student");
        let built = t
            .update()
            .unwrap()
            .set("name", "amy")
            .update([t.column("age").inc()])
            .unwrap()
            .filter(t.column("id").eq(3))
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "UPDATE `student` SET `name` = %s, `age` = `age` + %s WHERE `student`.`id` = %s"
        );
        assert_eq!(
            built.args,
            vec![Value::Text("amy".into()), Value::Int(1), Value::Int(3)]
        );
    }

    #[test]
    fn assign_from_subquery() {
        let t = Table::new("class");
        let s = Table::new("student");
        let count = s
            .select([s.all().count()])
            .filter(s.column("class_id").eq(t.column("id")));
        let built = t
            .update()
            .unwrap()
            .value(&t.column("size"), count)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "UPDATE `class` SET `size` = (SELECT COUNT(*) FROM `student` \
             WHERE `student`.`class_id` = `class`.`id`)"
        );
        assert!(built.args.is_empty());
    }

    #[test]
    fn rejects_foreign_columns() {
        let t = Table::new("t");
        let other = Table::new("o");
        let err = t
            .update()
            .unwrap()
            .values([(other.column("x"), 1)])
            .unwrap_err();
        assert!(err.is_foreign_column());
    }

    #[test]
    fn update_without_set_fails_at_render() {
        let t = Table::new("t");
        let q = t.update().unwrap().filter(t.column("id").eq(1));
        assert!(q.build().unwrap_err().is_usage());
    }
}
