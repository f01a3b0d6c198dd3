//! Go source reading.
//!
//! - [`lexer`]: tokens with positions and automatic semicolons
//! - [`parse_source`]: package name, imports, top-level declarations and
//!   struct bodies
//! - [`quote`] / [`unquote`]: Go string literal helpers

mod extract;
pub mod lexer;
mod literal;

pub(crate) use extract::is_embedded;
pub use extract::{
    FieldDecl, ImportSpec, MethodDecl, SourceFile, StructDecl, TypeParams, parse_source,
};
pub use lexer::{Token, TokenKind, tokenize};
pub use literal::{quote, unquote};
