//! Boolean condition trees.
//!
//! Leaves are [`Condition`]s built from column methods (`eq`, `in_`, `like`,
//! ...). They compose with `&` and `|` into a [`Cond`] tree and negate with
//! `!`, which rewrites leaf operators to their complements and applies
//! De Morgan's laws to unions. [`Cond::Empty`] is the identity of both `&`
//! and `|`, so a condition can be accumulated in a loop:
//!
//! ```
//! use sqlcompose::{Cond, Table};
//!
//! let student = Table::new("student");
//! let mut cond = Cond::empty();
//! for (name, min_age) in [("age", 18), ("grade", 3)] {
//!     cond &= student.column(name).gte(min_age);
//! }
//!
//! let mut sql = sqlcompose::Sql::empty();
//! cond.render(&mut sql).unwrap();
//! assert_eq!(
//!     sql.to_sql(),
//!     "`student`.`age` >= %s AND `student`.`grade` >= %s"
//! );
//! ```

use crate::column::Column;
use crate::error::{QbError, QbResult};
use crate::qb::{Select, Statement};
use crate::sql::Sql;
use crate::value::Value;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// Comparison operator of a leaf condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gte,
    Gt,
    Lte,
    Lt,
    In,
    NotIn,
    Like,
    NotLike,
    Prefix,
    NotPrefix,
    Suffix,
    NotSuffix,
}

impl Operator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gte => ">=",
            Operator::Gt => ">",
            Operator::Lte => "<=",
            Operator::Lt => "<",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Like | Operator::Prefix | Operator::Suffix => "LIKE",
            Operator::NotLike | Operator::NotPrefix | Operator::NotSuffix => "NOT LIKE",
        }
    }

    /// The logical complement.
    pub fn complement(self) -> Operator {
        match self {
            Operator::Eq => Operator::Ne,
            Operator::Ne => Operator::Eq,
            Operator::Gte => Operator::Lt,
            Operator::Gt => Operator::Lte,
            Operator::Lte => Operator::Gt,
            Operator::Lt => Operator::Gte,
            Operator::In => Operator::NotIn,
            Operator::NotIn => Operator::In,
            Operator::Like => Operator::NotLike,
            Operator::NotLike => Operator::Like,
            Operator::Prefix => Operator::NotPrefix,
            Operator::NotPrefix => Operator::Prefix,
            Operator::Suffix => Operator::NotSuffix,
            Operator::NotSuffix => Operator::Suffix,
        }
    }

    pub fn is_membership(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            Operator::Like
                | Operator::NotLike
                | Operator::Prefix
                | Operator::NotPrefix
                | Operator::Suffix
                | Operator::NotSuffix
        )
    }

    fn wildcard(self, value: &str) -> String {
        match self {
            Operator::Prefix | Operator::NotPrefix => format!("{value}%"),
            Operator::Suffix | Operator::NotSuffix => format!("%{value}"),
            _ => format!("%{value}%"),
        }
    }
}

/// Right-hand side of a condition or SET entry.
#[derive(Debug, Clone)]
pub enum Operand {
    Value(Value),
    Column(Column),
    Subquery(Box<Select>),
    List(Vec<Value>),
}

impl Operand {
    /// Literal → placeholder, column → qualified identifier,
    /// sub-query → `(...)` with its arguments, list → `(?, ?, ...)`.
    pub(crate) fn render(&self, out: &mut Sql) -> QbResult<()> {
        match self {
            Operand::Value(v) => {
                out.push_bind(v.clone());
            }
            Operand::Column(c) => {
                out.push_sql(c.where_view()?);
            }
            Operand::Subquery(select) => {
                out.push_parenthesized(select.to_fragment()?);
            }
            Operand::List(values) => {
                out.push("(").push_bind_list(values.iter().cloned()).push(")");
            }
        }
        Ok(())
    }
}

/// Conversion into a comparison operand.
pub trait IntoOperand {
    fn into_operand(self) -> Operand;
}

macro_rules! impl_into_operand_for_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoOperand for $ty {
                fn into_operand(self) -> Operand {
                    Operand::Value(self.into())
                }
            }
        )*
    };
}

impl_into_operand_for_value!(
    Value,
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    &str,
    &String,
    Vec<u8>,
    &[u8],
    serde_json::Value,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    uuid::Uuid,
);

impl<T: Into<Value>> IntoOperand for Option<T> {
    fn into_operand(self) -> Operand {
        Operand::Value(self.into())
    }
}

impl IntoOperand for Column {
    fn into_operand(self) -> Operand {
        Operand::Column(self)
    }
}

impl IntoOperand for &Column {
    fn into_operand(self) -> Operand {
        Operand::Column(self.clone())
    }
}

impl IntoOperand for Select {
    fn into_operand(self) -> Operand {
        Operand::Subquery(Box::new(self))
    }
}

impl IntoOperand for &Select {
    fn into_operand(self) -> Operand {
        Operand::Subquery(Box::new(self.clone()))
    }
}

/// Conversion into an `IN` / `NOT IN` operand.
pub trait IntoMembers {
    fn into_members(self) -> Operand;
}

impl<T: Into<Value>> IntoMembers for Vec<T> {
    fn into_members(self) -> Operand {
        Operand::List(self.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> IntoMembers for &Vec<T> {
    fn into_members(self) -> Operand {
        self.as_slice().into_members()
    }
}

impl<T: Into<Value> + Clone> IntoMembers for &[T] {
    fn into_members(self) -> Operand {
        Operand::List(self.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> IntoMembers for [T; N] {
    fn into_members(self) -> Operand {
        Operand::List(self.into_iter().map(Into::into).collect())
    }
}

impl IntoMembers for Select {
    fn into_members(self) -> Operand {
        Operand::Subquery(Box::new(self))
    }
}

impl IntoMembers for &Select {
    fn into_members(self) -> Operand {
        Operand::Subquery(Box::new(self.clone()))
    }
}

/// A leaf predicate: `column <op> operand`.
#[derive(Debug, Clone)]
pub struct Condition {
    column: Column,
    op: Operator,
    value: Operand,
}

impl Condition {
    /// Validate and build a leaf.
    ///
    /// Membership operators need a non-empty list or a sub-query, pattern
    /// operators a non-empty string, and no other operator accepts a list.
    pub fn new(column: Column, op: Operator, value: Operand) -> QbResult<Self> {
        if op.is_membership() {
            match &value {
                Operand::List(values) if values.is_empty() => {
                    return Err(QbError::invalid_operand(op.as_sql(), "empty member list"));
                }
                Operand::List(_) | Operand::Subquery(_) => {}
                _ => {
                    return Err(QbError::invalid_operand(
                        op.as_sql(),
                        "expected a list of values or a sub-query",
                    ));
                }
            }
        } else if op.is_pattern() {
            match &value {
                Operand::Value(Value::Text(s)) if !s.is_empty() => {}
                _ => {
                    return Err(QbError::invalid_operand(
                        op.as_sql(),
                        "expected a non-empty string",
                    ));
                }
            }
        } else if matches!(value, Operand::List(_)) {
            return Err(QbError::invalid_operand(
                op.as_sql(),
                "a list is only valid with IN / NOT IN",
            ));
        }

        Ok(Self { column, op, value })
    }

    /// Plain comparisons never carry a list, so there is nothing to validate.
    pub(crate) fn comparison(column: Column, op: Operator, value: Operand) -> Self {
        Self { column, op, value }
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn value(&self) -> &Operand {
        &self.value
    }

    /// Same condition with the complementary operator.
    pub fn negate(&self) -> Condition {
        Condition {
            column: self.column.clone(),
            op: self.op.complement(),
            value: self.value.clone(),
        }
    }

    pub fn render(&self, out: &mut Sql) -> QbResult<()> {
        out.push_sql(self.column.where_view()?);

        match (self.op, &self.value) {
            (Operator::Eq, Operand::Value(Value::Null)) => {
                out.push(" IS NULL");
            }
            (Operator::Ne, Operand::Value(Value::Null)) => {
                out.push(" IS NOT NULL");
            }
            (op, Operand::Value(Value::Text(text))) if op.is_pattern() => {
                out.push(" ").push(op.as_sql()).push(" ");
                out.push_pattern(op.wildcard(text));
            }
            (op, value) => {
                out.push(" ").push(op.as_sql()).push(" ");
                value.render(out)?;
            }
        }
        Ok(())
    }
}

/// Boolean connective of a union node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    pub fn as_sql(self) -> &'static str {
        match self {
            Logic::And => " AND ",
            Logic::Or => " OR ",
        }
    }

    pub fn flip(self) -> Logic {
        match self {
            Logic::And => Logic::Or,
            Logic::Or => Logic::And,
        }
    }
}

/// `left AND right` or `left OR right`; both sides non-empty.
#[derive(Debug, Clone)]
pub struct ConditionUnion {
    left: Cond,
    right: Cond,
    logic: Logic,
}

impl ConditionUnion {
    pub fn new(left: impl Into<Cond>, right: impl Into<Cond>, logic: Logic) -> QbResult<Self> {
        let (left, right) = (left.into(), right.into());
        if left.is_empty() || right.is_empty() {
            return Err(QbError::usage("both sides of AND / OR must be non-empty"));
        }
        Ok(Self { left, right, logic })
    }

    pub fn left(&self) -> &Cond {
        &self.left
    }

    pub fn right(&self) -> &Cond {
        &self.right
    }

    pub fn logic(&self) -> Logic {
        self.logic
    }

    /// De Morgan: negate both sides and flip the connective.
    pub fn negate(&self) -> ConditionUnion {
        ConditionUnion {
            left: self.left.negate(),
            right: self.right.negate(),
            logic: self.logic.flip(),
        }
    }

    pub fn render(&self, out: &mut Sql) -> QbResult<()> {
        render_child(&self.left, out)?;
        out.push(self.logic.as_sql());
        render_child(&self.right, out)
    }
}

// Leaves stay bare; nested unions are parenthesized.
fn render_child(cond: &Cond, out: &mut Sql) -> QbResult<()> {
    match cond {
        Cond::Union(_) => {
            let mut child = Sql::empty();
            cond.render(&mut child)?;
            out.push_parenthesized(child);
            Ok(())
        }
        _ => cond.render(out),
    }
}

/// A condition tree: empty, a leaf, or a union node.
#[derive(Debug, Clone, Default)]
pub enum Cond {
    #[default]
    Empty,
    Leaf(Condition),
    Union(Box<ConditionUnion>),
}

impl Cond {
    /// The identity for `&` and `|`.
    pub fn empty() -> Self {
        Cond::Empty
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cond::Empty)
    }

    pub fn and(self, other: impl Into<Cond>) -> Cond {
        self.combine(other.into(), Logic::And)
    }

    pub fn or(self, other: impl Into<Cond>) -> Cond {
        self.combine(other.into(), Logic::Or)
    }

    fn combine(self, other: Cond, logic: Logic) -> Cond {
        match (self, other) {
            (Cond::Empty, other) => other,
            (this, Cond::Empty) => this,
            (left, right) => Cond::Union(Box::new(ConditionUnion { left, right, logic })),
        }
    }

    pub fn negate(&self) -> Cond {
        match self {
            Cond::Empty => Cond::Empty,
            Cond::Leaf(c) => Cond::Leaf(c.negate()),
            Cond::Union(u) => Cond::Union(Box::new(u.negate())),
        }
    }

    /// Append the condition text; an empty condition appends nothing.
    pub fn render(&self, out: &mut Sql) -> QbResult<()> {
        match self {
            Cond::Empty => Ok(()),
            Cond::Leaf(c) => c.render(out),
            Cond::Union(u) => u.render(out),
        }
    }
}

impl From<Condition> for Cond {
    fn from(c: Condition) -> Self {
        Cond::Leaf(c)
    }
}

impl From<ConditionUnion> for Cond {
    fn from(u: ConditionUnion) -> Self {
        Cond::Union(Box::new(u))
    }
}

impl<R: Into<Cond>> BitAnd<R> for Cond {
    type Output = Cond;

    fn bitand(self, rhs: R) -> Cond {
        self.and(rhs)
    }
}

impl<R: Into<Cond>> BitOr<R> for Cond {
    type Output = Cond;

    fn bitor(self, rhs: R) -> Cond {
        self.or(rhs)
    }
}

impl<R: Into<Cond>> BitAnd<R> for Condition {
    type Output = Cond;

    fn bitand(self, rhs: R) -> Cond {
        Cond::from(self).and(rhs)
    }
}

impl<R: Into<Cond>> BitOr<R> for Condition {
    type Output = Cond;

    fn bitor(self, rhs: R) -> Cond {
        Cond::from(self).or(rhs)
    }
}

impl<R: Into<Cond>> BitAndAssign<R> for Cond {
    fn bitand_assign(&mut self, rhs: R) {
        *self = std::mem::take(self).and(rhs);
    }
}

impl<R: Into<Cond>> BitOrAssign<R> for Cond {
    fn bitor_assign(&mut self, rhs: R) {
        *self = std::mem::take(self).or(rhs);
    }
}

impl Not for Cond {
    type Output = Cond;

    fn not(self) -> Cond {
        self.negate()
    }
}

impl Not for Condition {
    type Output = Condition;

    fn not(self) -> Condition {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;
    use crate::{BuiltQuery, Dialect};

    fn build(cond: impl Into<Cond>) -> BuiltQuery {
        let mut sql = Sql::empty();
        cond.into().render(&mut sql).unwrap();
        sql.build(&Dialect::default())
    }

    #[test]
    fn comparison_binds_literal() {
        let t = Table::new("student");
        let built = build(t.column("age").gt(18));
        assert_eq!(built.sql, "`student`.`age` > %s");
        assert_eq!(built.args, vec![Value::Int(18)]);
    }

    #[test]
    fn null_comparisons_bind_nothing() {
        let t = Table::new("student");
        let none: Option<i32> = None;
        assert_eq!(build(t.column("age").eq(none)).sql, "`student`.`age` IS NULL");
        assert_eq!(
            build(t.column("age").is_not_null()).sql,
            "`student`.`age` IS NOT NULL"
        );
        assert!(build(t.column("age").is_null()).args.is_empty());
    }

    #[test]
    fn column_to_column() {
        let a = Table::new("a");
        let b = Table::new("b").with_alias("bb");
        let built = build(a.column("id").eq(b.column("a_id")));
        assert_eq!(built.sql, "`a`.`id` = `bb`.`a_id`");
        assert!(built.args.is_empty());
    }

    #[test]
    fn membership_list() {
        let t = Table::new("t");
        let built = build(t.column("id").in_(vec![1, 2, 3]).unwrap());
        assert_eq!(built.sql, "`t`.`id` IN (%s, %s, %s)");
        assert_eq!(built.args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

        let built = build(t.column("id").not_in(["a", "b"]).unwrap());
        assert_eq!(built.sql, "`t`.`id` NOT IN (%s, %s)");
    }

    #[test]
    fn membership_subquery() {
        let teacher = Table::new("teacher");
        let teach = Table::new("teach");
        let sub = teach
            .select([teach.column("teacher_id")])
            .filter(teach.column("class_id").eq(2));
        let built = build(teacher.column("id").in_(sub).unwrap());
        assert_eq!(
            built.sql,
            "`teacher`.`id` IN (SELECT `teach`.`teacher_id` FROM `teach` WHERE `teach`.`class_id` = %s)"
        );
        assert_eq!(built.args, vec![Value::Int(2)]);
    }

    #[test]
    fn operand_validation() {
        let c = Column::new("x");
        let empty: Vec<i32> = Vec::new();
        assert!(c.in_(empty).unwrap_err().is_invalid_operand());
        assert!(c.like("").unwrap_err().is_invalid_operand());
        assert!(
            Condition::new(c.clone(), Operator::Eq, Operand::List(vec![Value::Int(1)]))
                .unwrap_err()
                .is_invalid_operand()
        );
        assert!(
            Condition::new(c, Operator::In, Operand::Value(Value::Int(1)))
                .unwrap_err()
                .is_invalid_operand()
        );
    }

    #[test]
    fn patterns_are_wildcarded() {
        let c = Column::new("name");
        assert_eq!(build(c.like("bob").unwrap()).sql, "`name` LIKE '%%bob%%'");
        assert_eq!(build(c.starts_with("bob").unwrap()).sql, "`name` LIKE 'bob%%'");
        assert_eq!(build(c.ends_with("bob").unwrap()).sql, "`name` LIKE '%%bob'");
        assert_eq!(build(c.not_like("bob").unwrap()).sql, "`name` NOT LIKE '%%bob%%'");
        assert!(build(c.like("bob").unwrap()).args.is_empty());
    }

    #[test]
    fn complement_is_an_involution() {
        use Operator::*;
        for op in [
            Eq, Ne, Gte, Gt, Lte, Lt, In, NotIn, Like, NotLike, Prefix, NotPrefix, Suffix,
            NotSuffix,
        ] {
            assert_eq!(op.complement().complement(), op);
            assert_ne!(op.complement(), op);
        }
    }

    #[test]
    fn negating_a_leaf_leaves_the_original_untouched() {
        let c = Column::new("age").gte(18);
        let n = !c.clone();
        assert_eq!(n.op(), Operator::Lt);
        assert_eq!(c.op(), Operator::Gte);
        assert_eq!(build(n).sql, "`age` < %s");
        assert_eq!(build(!!c.clone()), build(c));
    }

    #[test]
    fn unions_parenthesize_nested_children() {
        let a = Column::new("a").eq(1);
        let b = Column::new("b").eq(2);
        let c = Column::new("c").eq(3);

        let built = build((a.clone() | b.clone()) & c.clone());
        assert_eq!(built.sql, "(`a` = %s OR `b` = %s) AND `c` = %s");
        assert_eq!(built.args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

        let built = build(a & (b | c));
        assert_eq!(built.sql, "`a` = %s AND (`b` = %s OR `c` = %s)");
    }

    #[test]
    fn de_morgan() {
        let a = Column::new("a").eq(1);
        let b = Column::new("b").in_([1, 2]).unwrap();
        let cond = a | b;

        assert_eq!(build(!cond.clone()).sql, "`a` != %s AND `b` NOT IN (%s, %s)");
        assert_eq!(build(!!cond.clone()), build(cond));
    }

    #[test]
    fn empty_is_identity() {
        let a = Column::new("a").eq(1);
        assert_eq!(build(a.clone() & Cond::empty()), build(a.clone()));
        assert_eq!(build(Cond::empty() | a.clone()), build(a.clone()));
        assert!((!Cond::empty()).is_empty());
        assert!((Cond::empty() & Cond::empty()).is_empty());

        let mut acc = Cond::empty();
        acc |= a.clone();
        assert_eq!(build(acc), build(a));
    }

    #[test]
    fn union_requires_non_empty_sides() {
        let a = Column::new("a").eq(1);
        assert!(
            ConditionUnion::new(a, Cond::empty(), Logic::And)
                .unwrap_err()
                .is_usage()
        );
    }
}
