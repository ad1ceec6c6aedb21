//! Query composition.
//!
//! # Expressions
//!
//! - [`Expr`] - fluent `$filter` predicate builder
//! - [`OrderBy`] - ordering specification for `$orderby`
//! - [`ExpandBuilder`] - nested `$expand` with its own query options
//!
//! # Queries
//!
//! - [`QueryBuilder`] - a resource path plus its query options, rendered in a
//!   fixed clause order
//! - [`Page`] / [`PagingToken`] - one page of results and the link to the next

mod builder;
mod expand;
mod filter;
mod order;
mod page;

pub use builder::QueryBuilder;
pub use builder::QueryState;
pub use expand::Expand;
pub use expand::ExpandBuilder;
pub use filter::Expr;
pub use order::Direction;
pub use order::OrderBy;
pub use page::Page;
pub use page::PagingToken;
