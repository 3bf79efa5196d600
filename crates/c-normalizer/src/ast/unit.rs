use std::path::PathBuf;

use clang_ast::SourceRange;
use tracing::debug;

use crate::{
    ast::clang_nodes::{Clang, FunctionData, Node, TagData, TypedefData, resolve_loc},
    error::{NormalizeError, Result, SymbolKind},
    syntax::{Token, tokens_in},
    text::{Extent, SourceText},
};

/// One `FunctionDecl` of the main file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionNode {
    pub name: String,
    /// `None` for implicit declarations, which have no tokens to edit.
    pub extent: Option<Extent>,
    pub is_definition: bool,
}

/// A function's definition and, when present, its first forward declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: String,
    pub definition: FunctionNode,
    pub declaration: Option<FunctionNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedefRecord {
    pub alias: String,
    pub canonical_spelling: String,
    pub extent: Extent,
    /// Extent of a `struct`/`union`/`enum` body defined inside this typedef,
    /// as in `typedef struct P { ... } P;`.
    pub owned_tag: Option<Extent>,
}

impl TypedefRecord {
    /// Whether the canonical spelling can stand in for the alias textually.
    ///
    /// Anonymous tags (`struct (unnamed at ...)`) and declarator types such
    /// as function pointers or arrays cannot be written before a declarator
    /// name, so those typedefs are left in place.
    pub fn is_spliceable(&self) -> bool {
        !self.canonical_spelling.contains(['(', '['])
    }
}

/// Ordered alias → canonical spelling mapping, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    /// Add an alias unless it is already present (a repeated typedef keeps
    /// its first position).
    pub fn insert(
        &mut self,
        alias: impl Into<String>,
        canonical: impl Into<String>,
    ) {
        let alias = alias.into();
        if !self.contains(&alias) {
            self.entries.push((alias, canonical.into()));
        }
    }

    pub fn get(
        &self,
        alias: &str,
    ) -> Option<&str> {
        self.entries.iter().find(|(a, _)| a == alias).map(|(_, c)| c.as_str())
    }

    pub fn contains(
        &self,
        alias: &str,
    ) -> bool {
        self.get(alias).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Into<String>, C: Into<String>> FromIterator<(A, C)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (A, C)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (alias, canonical) in iter {
            table.insert(alias, canonical);
        }
        table
    }
}

/// Read-only snapshot of one parse: the exact text clang saw plus the
/// function and typedef nodes of the main file.
///
/// Extents are only valid against [`ParsedUnit::text`]; after editing the
/// text, parse again before trusting any extent.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    path: PathBuf,
    text: SourceText,
    functions: Vec<FunctionNode>,
    typedefs: Vec<TypedefRecord>,
}

impl ParsedUnit {
    pub fn new(
        path: PathBuf,
        text: SourceText,
        functions: Vec<FunctionNode>,
        typedefs: Vec<TypedefRecord>,
    ) -> Self {
        Self {
            path,
            text,
            functions,
            typedefs,
        }
    }

    /// Build a unit from a deserialized `TranslationUnitDecl`.
    ///
    /// `main_files` are the spellings under which clang may report the parsed
    /// file; nodes from any other file (headers) are ignored.
    pub(crate) fn from_root(
        path: PathBuf,
        text: SourceText,
        root: &Node,
        main_files: &[String],
    ) -> Self {
        let mut functions = Vec::new();
        let mut typedefs = Vec::new();
        let mut tag_definitions = Vec::new();

        for node in &root.inner {
            match &node.kind {
                Clang::FunctionDecl(data) => {
                    if let Some(function) = collect_function(node, data, main_files) {
                        functions.push(function);
                    }
                },
                Clang::TypedefDecl(data) => {
                    if let Some(record) = collect_typedef(data, main_files) {
                        typedefs.push(record);
                    }
                },
                Clang::RecordDecl(data) | Clang::EnumDecl(data) => {
                    if let Some(extent) = tag_definition_extent(node, data, main_files) {
                        tag_definitions.push(extent);
                    }
                },
                _ => {},
            }
        }

        for record in &mut typedefs {
            record.owned_tag = tag_definitions
                .iter()
                .filter(|tag| record.extent.contains(tag))
                .min_by_key(|tag| (tag.start_line, tag.start_col))
                .copied();
        }

        debug!(
            "[parse] {}: {} functions, {} typedefs in main file",
            path.display(),
            functions.len(),
            typedefs.len()
        );

        Self::new(path, text, functions, typedefs)
    }

    pub fn text(&self) -> &SourceText {
        &self.text
    }

    pub fn functions(&self) -> &[FunctionNode] {
        &self.functions
    }

    pub fn find_function(
        &self,
        name: &str,
    ) -> Result<FunctionInfo> {
        let definition = self
            .functions
            .iter()
            .find(|f| f.name == name && f.is_definition)
            .cloned()
            .ok_or_else(|| NormalizeError::NotFound {
                kind: SymbolKind::Function,
                name: name.to_owned(),
                path: self.path.clone(),
            })?;
        let declaration = self.functions.iter().find(|f| f.name == name && !f.is_definition).cloned();

        Ok(FunctionInfo {
            name: name.to_owned(),
            definition,
            declaration,
        })
    }

    pub fn typedef_records(&self) -> &[TypedefRecord] {
        &self.typedefs
    }

    /// Aliases that can be unfolded, in declaration order.
    ///
    /// Declarators that share a tag body with an unspliceable one (`typedef
    /// struct P {...} P, Ps[2];`) are excluded with it: the declaration has
    /// to stay whole.
    pub fn alias_table(&self) -> AliasTable {
        self.typedefs
            .iter()
            .filter(|r| r.is_spliceable())
            .filter(|r| {
                r.owned_tag.is_none_or(|tag| {
                    self.typedefs.iter().all(|other| other.owned_tag != Some(tag) || other.is_spliceable())
                })
            })
            .map(|r| (r.alias.clone(), r.canonical_spelling.clone()))
            .collect()
    }

    pub fn tokens(
        &self,
        extent: &Extent,
    ) -> Vec<Token> {
        tokens_in(&self.text, extent)
    }

    /// Tokens of a function node; empty for implicit declarations.
    pub fn node_tokens(
        &self,
        node: &FunctionNode,
    ) -> Vec<Token> {
        node.extent.as_ref().map(|extent| self.tokens(extent)).unwrap_or_default()
    }
}

fn collect_function(
    node: &Node,
    data: &FunctionData,
    main_files: &[String],
) -> Option<FunctionNode> {
    let name = data.name.as_deref().filter(|n| !n.is_empty())?;

    let extent = if data.is_implicit.unwrap_or(false) {
        None
    } else {
        // Prototypes that live in headers are not ours to edit.
        Some(data.range.as_ref().and_then(|range| main_file_extent(range, main_files))?)
    };

    Some(FunctionNode {
        name: name.to_owned(),
        extent,
        is_definition: node.inner.iter().any(|child| matches!(child.kind, Clang::CompoundStmt(_))),
    })
}

fn collect_typedef(
    data: &TypedefData,
    main_files: &[String],
) -> Option<TypedefRecord> {
    if data.is_implicit.unwrap_or(false) {
        return None;
    }
    let alias = data.name.as_deref().filter(|n| !n.is_empty())?;
    let canonical = data.ty.as_ref().and_then(|ty| ty.canonical())?;
    let extent = data.range.as_ref().and_then(|range| main_file_extent(range, main_files))?;

    Some(TypedefRecord {
        alias: alias.to_owned(),
        canonical_spelling: canonical.to_owned(),
        extent,
        owned_tag: None,
    })
}

/// Main-file extent of a tag declaration that has a body.
fn tag_definition_extent(
    node: &Node,
    data: &TagData,
    main_files: &[String],
) -> Option<Extent> {
    let is_definition = data.complete_definition.unwrap_or(false)
        || (matches!(node.kind, Clang::EnumDecl(_)) && !node.inner.is_empty());
    if !is_definition {
        return None;
    }
    data.range.as_ref().and_then(|range| main_file_extent(range, main_files))
}

/// Convert a clang range into an inclusive [`Extent`] when both ends lie in
/// the main file.
///
/// Clang's range end points at the start of the last token, so the token
/// length is added to reach its last byte.
fn main_file_extent(
    range: &SourceRange,
    main_files: &[String],
) -> Option<Extent> {
    let begin = resolve_loc(&range.begin)?;
    let end = resolve_loc(&range.end)?;
    if begin.line == 0 || end.line == 0 {
        return None;
    }
    if !is_main_file(&begin.file, main_files) || !is_main_file(&end.file, main_files) {
        return None;
    }

    let end_col = end.col + end.tok_len.max(1) - 1;
    Some(Extent::new(begin.line as u32, begin.col as u32, end.line as u32, end_col as u32))
}

fn is_main_file(
    file: &str,
    main_files: &[String],
) -> bool {
    !file.is_empty() && main_files.iter().any(|main| main == file)
}

#[cfg(test)]
#[path = "../../tests/src/ast/unit_tests.rs"]
mod tests;
