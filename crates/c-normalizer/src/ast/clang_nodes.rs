use clang_ast::{BareSourceLocation, SourceLocation, SourceRange};
use serde::Deserialize;

pub type Node = clang_ast::Node<Clang>;

/// Typed representation of the Clang AST node kinds the normalizer edits.
///
/// Each variant corresponds to a Clang AST node `"kind"` value.
#[derive(Deserialize)]
pub enum Clang {
    FunctionDecl(FunctionData),
    TypedefDecl(TypedefData),
    RecordDecl(TagData),
    EnumDecl(TagData),
    CompoundStmt(StmtData),

    // The `loc` and `range` fields MUST be deserialized even for unrecognized
    // node kinds. `clang-ast` tracks the "current file" across the
    // deserialization stream via `SourceLocation`; skipping them would leave
    // later nodes with an empty or stale file.
    #[allow(dead_code)]
    Other {
        #[serde(default)]
        loc: Option<SourceLocation>,
        #[serde(default)]
        range: Option<SourceRange>,
    },
}

#[derive(Deserialize, Debug)]
pub struct FunctionData {
    pub name: Option<String>,
    // Read only for file tracking, see `Clang::Other`.
    #[allow(dead_code)]
    pub loc: Option<SourceLocation>,
    pub range: Option<SourceRange>,
    #[serde(rename = "isImplicit")]
    pub is_implicit: Option<bool>,
}

#[derive(Deserialize, Debug)]
pub struct TypedefData {
    pub name: Option<String>,
    #[allow(dead_code)]
    pub loc: Option<SourceLocation>,
    pub range: Option<SourceRange>,
    #[serde(rename = "isImplicit")]
    pub is_implicit: Option<bool>,
    #[serde(rename = "type")]
    pub ty: Option<QualType>,
}

/// A `struct`, `union` or `enum` declaration.
#[derive(Deserialize, Debug)]
pub struct TagData {
    #[allow(dead_code)]
    pub loc: Option<SourceLocation>,
    pub range: Option<SourceRange>,
    /// Set on records with a body; enums carry their enumerators as `inner`.
    #[serde(rename = "completeDefinition")]
    pub complete_definition: Option<bool>,
}

#[derive(Deserialize, Debug)]
pub struct StmtData {
    #[allow(dead_code)]
    pub range: Option<SourceRange>,
}

/// Clang's qualified type representation.
///
/// `desugaredQualType` is only present when it differs from `qualType`,
/// e.g. for a typedef of another typedef.
#[derive(Deserialize, Debug)]
pub struct QualType {
    #[serde(rename = "qualType")]
    pub qual_type: Option<String>,
    #[serde(rename = "desugaredQualType")]
    pub desugared_qual_type: Option<String>,
}

impl QualType {
    /// The most resolved spelling Clang reports for this type.
    pub fn canonical(&self) -> Option<&str> {
        self.desugared_qual_type.as_deref().or(self.qual_type.as_deref())
    }
}

/// Extract the location the user sees in the file.
///
/// Prefers the expansion location (where a macro was invoked) over the
/// spelling location (inside the macro definition).
pub fn resolve_loc(loc: &SourceLocation) -> Option<&BareSourceLocation> {
    loc.expansion_loc.as_ref().or(loc.spelling_loc.as_ref())
}
