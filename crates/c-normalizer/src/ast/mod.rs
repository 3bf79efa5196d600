//! Clang-backed AST provider and the parse snapshots it produces.

mod clang_nodes;
mod provider;
mod unit;

pub use provider::AstProvider;
pub use unit::{AliasTable, FunctionInfo, FunctionNode, ParsedUnit, TypedefRecord};
