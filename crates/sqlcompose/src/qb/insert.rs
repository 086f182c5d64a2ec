//! INSERT statement builder.

use crate::column::{AssignOp, Column, ColumnUpdating};
use crate::condition::{IntoOperand, Operand};
use crate::error::{QbError, QbResult};
use crate::qb::check_target;
use crate::qb::traits::{Statement, StatementKind};
use crate::sql::Sql;
use crate::table::Table;

/// `INSERT INTO t(cols) VALUES(...) [ON DUPLICATE KEY UPDATE ...]`.
///
/// Arguments are the row values in column order, then the update values.
#[derive(Debug, Clone)]
pub struct Insert {
    table: Table,
    pairs: Vec<(Column, Operand)>,
    on_duplicate: Vec<ColumnUpdating>,
}

impl Insert {
    /// The target must be a base table.
    pub fn new(table: &Table) -> QbResult<Self> {
        table.require_base()?;
        Ok(Self {
            table: table.clone(),
            pairs: Vec::new(),
            on_duplicate: Vec::new(),
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Append one `(column, value)` pair.
    pub fn value(mut self, column: &Column, value: impl IntoOperand) -> QbResult<Self> {
        check_target(&self.table, column)?;
        self.pairs.push((column.clone(), value.into_operand()));
        Ok(self)
    }

    /// Append `(column, value)` pairs.
    pub fn values<I, V>(mut self, pairs: I) -> QbResult<Self>
    where
        I: IntoIterator<Item = (Column, V)>,
        V: IntoOperand,
    {
        for (column, value) in pairs {
            check_target(&self.table, &column)?;
            self.pairs.push((column, value.into_operand()));
        }
        Ok(self)
    }

    /// Append a pair by column name.
    pub fn set(mut self, name: &str, value: impl IntoOperand) -> Self {
        self.pairs.push((self.table.column(name), value.into_operand()));
        self
    }

    /// Append `col = value` entries to ON DUPLICATE KEY UPDATE.
    pub fn on_duplicate_key_fields<I, V>(mut self, pairs: I) -> QbResult<Self>
    where
        I: IntoIterator<Item = (Column, V)>,
        V: IntoOperand,
    {
        for (column, value) in pairs {
            check_target(&self.table, &column)?;
            self.on_duplicate
                .push(ColumnUpdating::new(column, value, AssignOp::Assign));
        }
        Ok(self)
    }

    /// Append `name = value` to ON DUPLICATE KEY UPDATE.
    pub fn on_duplicate_key_set(mut self, name: &str, value: impl IntoOperand) -> Self {
        let column = self.table.column(name);
        self.on_duplicate
            .push(ColumnUpdating::new(column, value, AssignOp::Assign));
        self
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

/// ` ON DUPLICATE KEY UPDATE a, b`, or nothing.
pub(crate) fn render_on_duplicate(updates: &[ColumnUpdating], sql: &mut Sql) -> QbResult<()> {
    if updates.is_empty() {
        return Ok(());
    }
    sql.push(" ON DUPLICATE KEY UPDATE ");
    sql.push_joined(updates, ", ", |update, sql| update.render(sql))?;
    Ok(())
}

impl Statement for Insert {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn to_fragment(&self) -> QbResult<Sql> {
        if self.pairs.is_empty() {
            return Err(QbError::usage(format!(
                "INSERT into {} has no values",
                self.table.describe()
            )));
        }

        let mut sql = Sql::new("INSERT INTO ");
        sql.push_sql(self.table.raw_view()).push("(");
        sql.push_joined(&self.pairs, ", ", |(column, _), sql| {
            sql.push_sql(column.insert_view()?);
            Ok::<_, QbError>(())
        })?;
        sql.push(") VALUES(");
        sql.push_joined(&self.pairs, ", ", |(_, value), sql| value.render(sql))?;
        sql.push(")");

        render_on_duplicate(&self.on_duplicate, &mut sql)?;
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn insert_pairs_in_order() {
        let t = Table::new("student");
        let built = t
            .insert()
            .unwrap()
            .values([(t.column("name"), "bob"), (t.column("city"), "paris")])
            .unwrap()
            .set("age", 20)
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "INSERT INTO `student`(`name`, `city`, `age`) VALUES(%s, %s, %s)"
        );
        assert_eq!(
            built.args,
            vec![
                Value::Text("bob".into()),
                Value::Text("paris".into()),
                Value::Int(20)
            ]
        );
    }

    #[test]
    fn on_duplicate_key_arguments_come_last() {
        let t = Table::new("counter").with_db("stats");
        let hits = t.column("hits");
        let built = t
            .insert()
            .unwrap()
            .value(&t.column("id"), 7)
            .unwrap()
            .value(&hits, 1)
            .unwrap()
            .on_duplicate_key_update([hits.inc_by(5)])
            .unwrap()
            .on_duplicate_key_set("seen", true)
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "INSERT INTO `stats`.`counter`(`id`, `hits`) VALUES(%s, %s) \
             ON DUPLICATE KEY UPDATE `hits` = `hits` + %s, `seen` = %s"
        );
        assert_eq!(
            built.args,
            vec![Value::Int(7), Value::Int(1), Value::Int(5), Value::Bool(true)]
        );
    }

    #[test]
    fn on_duplicate_key_field_pairs() {
        let t = Table::new("score");
        let built = t
            .insert()
            .unwrap()
            .set("id", 3)
            .set("best", 40)
            .on_duplicate_key_fields([(t.column("best"), 40), (t.column("runs"), 1)])
            .unwrap()
            .on_duplicate_key_fields([(t.column("last"), t.column("best"))])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "INSERT INTO `score`(`id`, `best`) VALUES(%s, %s) \
             ON DUPLICATE KEY UPDATE `best` = %s, `runs` = %s, `last` = `score`.`best`"
        );
        assert_eq!(
            built.args,
            vec![Value::Int(3), Value::Int(40), Value::Int(40), Value::Int(1)]
        );

        let err = t
            .insert()
            .unwrap()
            .on_duplicate_key_fields([(Table::new("score").column("best"), 1)])
            .unwrap_err();
        assert!(err.is_foreign_column());
    }

    #[test]
    fn aliased_target_renders_raw_name() {
        let t = Table::new("student").with_alias("s");
        let q = t.insert().unwrap().set("id", 1);
        assert_eq!(q.to_sql().unwrap(), "INSERT INTO `student`(`id`) VALUES(%s)");
    }

    #[test]
    fn rejects_foreign_columns() {
        let t = Table::new("t");
        let other = Table::new("o");
        let err = t.insert().unwrap().value(&other.column("x"), 1).unwrap_err();
        assert!(err.is_foreign_column());

        let err = t
            .insert()
            .unwrap()
            .on_duplicate_key_update([other.column("x").inc()])
            .unwrap_err();
        assert!(err.is_foreign_column());

        assert!(t.insert().unwrap().value(&Column::new("x"), 1).is_ok());
    }

    #[test]
    fn empty_insert_fails_at_render() {
        let t = Table::new("t");
        assert!(t.insert().unwrap().build().unwrap_err().is_usage());
    }
}
