//! Properties every rendered statement must satisfy.

use sqlcompose::prelude::*;
use sqlcompose::{BuiltQuery, Placeholder};

fn render(cond: impl Into<Cond>) -> BuiltQuery {
    let mut sql = sqlcompose::Sql::empty();
    cond.into().render(&mut sql).unwrap();
    sql.build(&Dialect::default())
}

fn sample_conditions(t: &Table) -> Vec<Cond> {
    let sub = t.select(["id"]).filter(t.column("x").lt(9));
    vec![
        t.column("a").eq(1).into(),
        t.column("a").eq(None::<i64>).into(),
        t.column("a").ne(t.column("b")).into(),
        t.column("a").gte(2.5).into(),
        t.column("a").in_([1, 2, 3]).unwrap().into(),
        t.column("a").not_in(sub.clone()).unwrap().into(),
        t.column("a").starts_with("x").unwrap().into(),
        t.column("a").ends_with("y").unwrap().into(),
        t.column("a").eq(1) & (t.column("b").lt(sub) | t.column("c").like("z").unwrap()),
        (t.column("a").eq(1) | t.column("b").eq(2)) & !(t.column("c").gt(3) & t.column("d").lte(4)),
    ]
}

#[test]
fn test_double_negation_is_identity() {
    let t = Table::new("t");
    for cond in sample_conditions(&t) {
        assert_eq!(render(!!cond.clone()), render(cond));
    }
}

#[test]
fn test_negation_does_not_mutate_the_operand() {
    let t = Table::new("t");
    for cond in sample_conditions(&t) {
        let before = render(cond.clone());
        let _ = cond.negate();
        assert_eq!(render(cond), before);
    }
}

#[test]
fn test_empty_condition_is_identity() {
    let t = Table::new("t");
    for cond in sample_conditions(&t) {
        assert_eq!(render(cond.clone() & Cond::empty()), render(cond.clone()));
        assert_eq!(render(Cond::empty() | cond.clone()), render(cond.clone()));
        assert_eq!(render(Cond::empty() & cond.clone()), render(cond));
    }
}

#[test]
fn test_in_list_placeholders_and_args() {
    let t = Table::new("t");
    let built = render(t.column("id").in_(vec![1, 2, 3]).unwrap());
    assert_eq!(built.sql.matches("%s").count(), 3);
    assert_eq!(built.args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_placeholder_count_matches_args_everywhere() {
    let student = Table::new("student");
    let class = Table::new("class").with_alias("c");
    let sub = student
        .select([student.column("class_id")])
        .filter(student.column("age").gt(10) & student.column("name").in_(["a", "b"]).unwrap())
        .as_table("sub");

    let join = class
        .inner_join(&sub, sub.column("class_id").eq(class.column("id")) & class.column("open").eq(true))
        .unwrap();

    let statements: Vec<Box<dyn Statement>> = vec![
        Box::new(Select::new(join).filter(class.column("level").in_([1, 2]).unwrap())),
        Box::new(
            class
                .update()
                .unwrap()
                .set("size", student.select_all().filter(student.column("x").eq(5)))
                .filter(class.column("id").ne(0)),
        ),
        Box::new(
            class
                .insert_from_select([class.column("id")], &sub)
                .unwrap()
                .on_duplicate_key_update([class.column("n").inc_by(4)])
                .unwrap(),
        ),
        Box::new(class.delete().unwrap().filter(!class.column("id").in_([7, 8, 9]).unwrap())),
    ];

    for stmt in &statements {
        let numbered = stmt
            .build_with(&Dialect::mysql().with_placeholder(Placeholder::Numbered))
            .unwrap();
        let expected: Vec<String> = (1..=numbered.args.len()).map(|i| format!("${i}")).collect();
        let found: Vec<&str> = numbered
            .sql
            .split(|c: char| c != '$' && !c.is_ascii_digit())
            .filter(|s| s.starts_with('$'))
            .collect();
        assert_eq!(found, expected, "{}", numbered.sql);

        let question = stmt.build_with(&Dialect::sqlite()).unwrap();
        assert_eq!(question.sql.matches('?').count(), question.args.len());
    }
}

#[test]
fn test_render_is_pure() {
    let t = Table::new("t");
    let q = t.select_all().filter(t.column("x").eq(5));
    let first = q.build().unwrap();
    let second = q.build().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.args, vec![Value::Int(5)]);
}

#[test]
fn test_dialect_from_config() {
    let dialect = Dialect::from_toml_str(
        r#"
placeholder = "question"
pattern = "bind"
"#,
    )
    .unwrap();

    let t = Table::new("t");
    let built = t
        .select_all()
        .filter(t.column("name").like("o'k").unwrap())
        .build_with(&dialect)
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM `t` WHERE `t`.`name` LIKE ?");
    assert_eq!(built.args, vec![Value::Text("%o'k%".into())]);

    let inline = t
        .select_all()
        .filter(t.column("name").like("o'k").unwrap())
        .build_with(&Dialect::sqlite())
        .unwrap();
    assert_eq!(inline.sql, r#"SELECT * FROM "t" WHERE "t"."name" LIKE '%o''k%'"#);
}

#[test]
fn test_args_serialize_as_json() {
    let t = Table::new("t");
    let (_, args) = t
        .select_all()
        .filter(t.column("a").eq(1) & t.column("b").eq("x"))
        .sql()
        .unwrap();
    let json = serde_json::to_value(&args).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"type": "int", "value": 1},
            {"type": "text", "value": "x"}
        ])
    );
}
