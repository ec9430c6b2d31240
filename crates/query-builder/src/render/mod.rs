//! Rendering of the panel SQL AST into query text.

use crate::dialect::Dialect;

pub mod expr;
pub mod filter;
pub mod panel;
pub mod select;

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// A context that holds the state during the rendering process.
///
/// It accumulates the SQL string and provides access to the dialect for
/// quoting rules. Literals are inlined, since the output is SQL text handed
/// back to the editor rather than a prepared statement.
pub struct Renderer<'a> {
    pub sql: String,
    pub dialect: &'a dyn Dialect,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            dialect,
        }
    }

    /// Consumes the renderer and returns the final SQL string.
    pub fn finish(self) -> String {
        self.sql
    }

    pub fn push_literal(&mut self, value: &str) {
        let quoted = self.dialect.quote_literal(value);
        self.sql.push_str(&quoted);
    }
}

/// Renders a single node with a fresh renderer.
pub fn to_sql<R: Render + ?Sized>(node: &R, dialect: &dyn Dialect) -> String {
    let mut renderer = Renderer::new(dialect);
    node.render(&mut renderer);
    renderer.finish()
}
