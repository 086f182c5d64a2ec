use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SqlPart {
    Raw(String),
    /// Quoted with the dialect's quote pair at build time.
    Ident(String),
    Bind(Value),
    /// Wildcarded `LIKE` operand; inlined or bound depending on the dialect.
    Pattern(String),
}
