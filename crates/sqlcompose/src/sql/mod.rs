//! Dialect-neutral SQL fragments.
//!
//! Every renderer in this crate appends to an [`Sql`] instead of formatting
//! strings directly. Identifiers, bound values and pattern literals stay as
//! structured parts until [`Sql::build`] is called with a
//! [`Dialect`](crate::Dialect), which produces the final text and the ordered
//! argument list in one pass. A placeholder is written exactly when an argument
//! is appended, so the two can never drift apart, however deeply sub-queries
//! are nested.
//!
//! # Example
//!
//! ```
//! use sqlcompose::{Dialect, Sql};
//!
//! let mut q = Sql::new("SELECT * FROM ");
//! q.push_ident("users").push(" WHERE ").push_ident("id").push(" = ").push_bind(42);
//!
//! let built = q.build(&Dialect::postgres());
//! assert_eq!(built.sql, r#"SELECT * FROM "users" WHERE "id" = $1"#);
//! assert_eq!(built.args.len(), 1);
//! ```

mod builder;
mod parts;


pub use builder::{BuiltQuery, Sql};
