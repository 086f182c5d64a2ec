use super::parts::SqlPart;
use crate::dialect::{Dialect, PatternMode};
use crate::value::Value;

/// A parameter-safe SQL fragment.
///
/// `Sql` stores text, identifiers and bound values separately and generates
/// placeholders only when built against a [`Dialect`].
#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sql {
    parts: Vec<SqlPart>,
}

impl Sql {
    /// Create a new fragment with an initial SQL text.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        let mut sql = Self::empty();
        sql.push(&initial_sql.into());
        sql
    }

    /// Create an empty fragment.
    pub fn empty() -> Self {
        Self { parts: Vec::new() }
    }

    /// `true` if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append one identifier segment (a table, database, alias or column name).
    ///
    /// The name is quoted at build time; no validation is applied, embedded
    /// quote characters are escaped instead.
    pub fn push_ident(&mut self, name: &str) -> &mut Self {
        self.parts.push(SqlPart::Ident(name.to_string()));
        self
    }

    /// Append a parameter placeholder and bind its value.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.parts.push(SqlPart::Bind(value.into()));
        self
    }

    /// Append a comma-separated list of placeholders and bind all values.
    pub fn push_bind_list<T>(&mut self, values: impl IntoIterator<Item = T>) -> &mut Self
    where
        T: Into<Value>,
    {
        for (i, v) in values.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_bind(v);
        }
        self
    }

    /// Append a wildcarded pattern operand.
    pub(crate) fn push_pattern(&mut self, pattern: String) -> &mut Self {
        self.parts.push(SqlPart::Pattern(pattern));
        self
    }

    /// Append another fragment, consuming it.
    pub fn push_sql(&mut self, other: Sql) -> &mut Self {
        for part in other.parts {
            match part {
                SqlPart::Raw(s) => {
                    self.push(&s);
                }
                part => self.parts.push(part),
            }
        }
        self
    }

    /// Append `(<other>)`.
    pub fn push_parenthesized(&mut self, other: Sql) -> &mut Self {
        self.push("(");
        self.push_sql(other);
        self.push(")")
    }

    /// Append `items` separated by `sep`, rendering each with `f`.
    pub(crate) fn push_joined<I, F, E>(&mut self, items: I, sep: &str, mut f: F) -> Result<&mut Self, E>
    where
        I: IntoIterator,
        F: FnMut(I::Item, &mut Sql) -> Result<(), E>,
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.push(sep);
            }
            f(item, &mut *self)?;
        }
        Ok(self)
    }

    /// Render text and arguments for `dialect`.
    pub fn build(&self, dialect: &Dialect) -> BuiltQuery {
        let mut sql = String::new();
        let mut args = Vec::new();

        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => sql.push_str(s),
                SqlPart::Ident(name) => dialect.quote.write(name, &mut sql),
                SqlPart::Bind(value) => {
                    args.push(value.clone());
                    dialect.write_placeholder(args.len(), &mut sql);
                }
                SqlPart::Pattern(pattern) => match dialect.pattern {
                    PatternMode::Inline => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(
                            target: "sqlcompose.sql",
                            pattern = %pattern,
                            "pattern operand spliced into SQL text"
                        );
                        dialect.write_literal(pattern, &mut sql);
                    }
                    PatternMode::Bind => {
                        args.push(Value::Text(pattern.clone()));
                        dialect.write_placeholder(args.len(), &mut sql);
                    }
                },
            }
        }

        BuiltQuery::new(sql, args)
    }

    /// Render with the default dialect (debug helper).
    pub fn to_sql(&self) -> String {
        self.build(&Dialect::default()).sql
    }

    /// Number of values bound so far (pattern parts excluded).
    pub fn bind_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, SqlPart::Bind(_)))
            .count()
    }
}

/// The result of building a statement: SQL text plus positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub args: Vec<Value>,
}

impl BuiltQuery {
    /// Create a new built query.
    pub fn new(sql: String, args: Vec<Value>) -> Self {
        Self { sql, args }
    }

    /// Split into `(sql, args)`.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}
