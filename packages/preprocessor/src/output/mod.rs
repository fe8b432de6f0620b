//! Output Module
//!
//! Builder and renderer for generated JavaScript.

pub mod emitter;
pub mod output_ast;

pub use emitter::{emit_expression, emit_statement, emit_statements, escape_string_literal};
