//! Cross-statement tests for the qb module.

use crate::condition::Cond;
use crate::dialect::{Dialect, PatternMode};
use crate::qb::{Statement, delete, insert, select, update};
use crate::table::Table;
use crate::value::Value;

fn placeholder_count(sql: &str) -> usize {
    sql.matches("%s").count()
}

#[test]
fn test_select_with_join_and_subquery_args_in_text_order() {
    let student = Table::new("student");
    let class = Table::new("class").with_alias("c");
    let recent = student
        .select([student.column("id")])
        .filter(student.column("year").gte(2020))
        .as_table("recent");

    let join = student
        .left_join(&class, class.column("id").eq(student.column("class_id")))
        .unwrap()
        .inner_join(&recent, recent.column("id").eq(student.column("id")))
        .unwrap();

    let built = select(join)
        .select([student.column("name"), class.column("title")])
        .filter(class.column("level").eq(3) & student.column("name").ne("x"))
        .asc(&class.column("title"))
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "SELECT `student`.`name`, `c`.`title` FROM `student` \
         LEFT JOIN `class` AS `c` ON `c`.`id` = `student`.`class_id` \
         INNER JOIN (SELECT `student`.`id` FROM `student` WHERE `student`.`year` >= %s) AS `recent` \
         ON `recent`.`id` = `student`.`id` \
         WHERE `c`.`level` = %s AND `student`.`name` != %s ORDER BY `c`.`title` ASC"
    );
    assert_eq!(
        built.args,
        vec![Value::Int(2020), Value::Int(3), Value::Text("x".into())]
    );
    assert_eq!(placeholder_count(&built.sql), built.args.len());
}

#[test]
fn test_order_by_table_outside_join_is_rejected() {
    let a = Table::new("a");
    let b = Table::new("b");
    let c = Table::new("c");
    let join = a.join(&b, b.column("a_id").eq(a.column("id"))).unwrap();

    let q = select(join);
    assert!(q.clone().desc(&b.column("x")).is_ok());
    assert!(q.asc(&c.column("x")).unwrap_err().is_foreign_column());
}

#[test]
fn test_numbered_placeholders_across_statement() {
    let t = Table::new("t");
    let built = update(&t)
        .unwrap()
        .set("a", 1)
        .set("b", 2)
        .filter(t.column("id").in_([3, 4]).unwrap())
        .build_with(&Dialect::postgres())
        .unwrap();
    assert_eq!(
        built.sql,
        r#"UPDATE "t" SET "a" = $1, "b" = $2 WHERE "t"."id" IN ($3, $4)"#
    );
    assert_eq!(built.args.len(), 4);
}

#[test]
fn test_pattern_bind_mode() {
    let t = Table::new("t");
    let q = select(&t).filter(t.column("name").starts_with("al").unwrap());

    let inline = q.build().unwrap();
    assert_eq!(
        inline.sql,
        "SELECT * FROM `t` WHERE `t`.`name` LIKE 'al%%'"
    );
    assert!(inline.args.is_empty());

    let bound = q
        .build_with(&Dialect::sqlite().with_pattern_mode(PatternMode::Bind))
        .unwrap();
    assert_eq!(
        bound.sql,
        r#"SELECT * FROM "t" WHERE "t"."name" LIKE ?"#
    );
    assert_eq!(bound.args, vec![Value::Text("al%".into())]);
}

#[test]
fn test_conditional_accumulation() {
    let t = Table::new("users");
    let filters: [(&str, Option<i64>); 3] = [("a", Some(1)), ("b", None), ("c", Some(3))];

    let mut cond = Cond::empty();
    for (name, value) in filters {
        if let Some(v) = value {
            cond &= t.column(name).eq(v);
        }
    }

    let built = delete(&t).unwrap().filter(cond).build().unwrap();
    assert_eq!(
        built.sql,
        "DELETE FROM `users` WHERE `users`.`a` = %s AND `users`.`c` = %s"
    );
    assert_eq!(built.args, vec![Value::Int(1), Value::Int(3)]);
}

#[test]
fn test_empty_filter_omits_where() {
    let t = Table::new("t");
    let q = select(&t).filter(Cond::empty());
    assert_eq!(q.to_sql().unwrap(), "SELECT * FROM `t`");
}

#[test]
fn test_insert_from_builder_function() {
    let t = Table::new("t");
    let (sql, args) = insert(&t).unwrap().set("x", "y").sql().unwrap();
    assert_eq!(sql, "INSERT INTO `t`(`x`) VALUES(%s)");
    assert_eq!(args, vec![Value::Text("y".into())]);
}

#[test]
fn test_statement_kind() {
    use crate::qb::StatementKind;

    let t = Table::new("t");
    assert_eq!(select(&t).kind(), StatementKind::Select);
    assert_eq!(delete(&t).unwrap().kind().as_str(), "delete");
}
