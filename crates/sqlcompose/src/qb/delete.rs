//! DELETE statement builder.

use crate::condition::Cond;
use crate::error::QbResult;
use crate::qb::traits::{Statement, StatementKind};
use crate::sql::Sql;
use crate::table::Table;

/// `DELETE FROM t [WHERE ...]`.
///
/// Without a condition every row is deleted; there is no safety net.
#[derive(Debug, Clone)]
pub struct Delete {
    table: Table,
    filter: Cond,
}

impl Delete {
    /// The target must be a base table.
    pub fn new(table: &Table) -> QbResult<Self> {
        table.require_base()?;
        Ok(Self {
            table: table.clone(),
            filter: Cond::Empty,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Replace the WHERE condition.
    pub fn filter(mut self, cond: impl Into<Cond>) -> Self {
        self.filter = cond.into();
        self
    }
}

impl Statement for Delete {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn to_fragment(&self) -> QbResult<Sql> {
        let mut sql = Sql::new("DELETE FROM ");
        sql.push_sql(self.table.from_view()?);

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
    fn delete_all() {
        let t = Table::new("t");
        assert_eq!(t.delete().unwrap().to_sql().unwrap(), "DELETE FROM `t`");
    }

    #[test]
    fn delete_with_aliased_table() {
        let t = Table::new("teacher").with_alias("tt");
        let built = t
            .delete()
            .unwrap()
            .filter(t.column("id").eq(1) | t.column("id").eq(2))
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "DELETE FROM `teacher` AS `tt` WHERE `tt`.`id` = %s OR `tt`.`id` = %s"
        );
        assert_eq!(built.args, vec![Value::Int(1), Value::Int(2)]);
    }
}
