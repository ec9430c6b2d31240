pub mod field;
pub mod filter;
pub mod join;
pub mod panel;
