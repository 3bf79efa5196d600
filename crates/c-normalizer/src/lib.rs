pub mod ast;
pub mod config;
pub mod error;
pub mod expand;
pub mod pipeline;
pub mod strip;
pub mod syntax;
pub mod text;
pub mod tools;
pub mod unfold;
pub mod workspace;

pub use ast::{AliasTable, AstProvider, FunctionInfo, FunctionNode, ParsedUnit, TypedefRecord};
pub use config::Settings;
pub use error::{NormalizeError, Result, SymbolKind};
pub use expand::{MacroExpander, expanded_output_path};
pub use pipeline::Pipeline;
pub use strip::StaticStripper;
pub use text::{Extent, SourceText};
pub use tools::{CompilerDiagnostic, Severity, tool_available};
pub use unfold::TypedefUnfolder;
