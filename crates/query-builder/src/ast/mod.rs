//! A small typed SQL AST used to render builder state back into SQL.
//!
//! Separate from the `sqlparser` AST; it only models what the panel
//! builder emits.

pub mod common;
pub mod expr;
pub mod select;
