//! Typedef unfolding: remove typedef declarations and spell out every alias.
//!
//! Substitution is lexical. Besides real type uses it also rewrites a local
//! variable or field that happens to share an alias name, and it does not
//! skip string literals or comments. Each alias is substituted once, in
//! declaration order; a chained typedef resolves only as far as Clang's
//! desugared spelling goes.

use std::path::{Path, PathBuf};

use regex::{Captures, Regex};
use tracing::{debug, info, warn};

use crate::{
    ast::{AliasTable, AstProvider, TypedefRecord},
    error::{NormalizeError, Result},
    syntax::{TokenKind, remove_token, tokens_in},
    text::{Extent, SourceText},
};

#[derive(Debug, Clone)]
pub struct TypedefUnfolder {
    provider: AstProvider,
}

impl TypedefUnfolder {
    pub fn new(provider: AstProvider) -> Self {
        Self {
            provider,
        }
    }

    /// Also resolve includes from `dir`, e.g. the directory of the file the
    /// input was derived from.
    pub fn with_include_dir(
        mut self,
        dir: impl Into<PathBuf>,
    ) -> Self {
        self.provider = self.provider.with_include_dir(dir);
        self
    }

    /// Rewrite `path` in place and return it.
    pub async fn unfold(
        &self,
        path: &Path,
    ) -> Result<PathBuf> {
        let unit = self.provider.for_file(path).parse(path).await?;
        let table = unit.alias_table();
        for record in unit.typedef_records().iter().filter(|r| !r.is_spliceable()) {
            debug!("[unfold] keeping typedef `{}` ({})", record.alias, record.canonical_spelling);
        }

        let code = unfold_text(unit.text().clone(), unit.typedef_records(), &table);
        tokio::fs::write(path, code).await.map_err(|error| NormalizeError::io(path, error))?;

        info!("Unfolded {} typedefs in {}", table.len(), path.display());
        Ok(path.to_path_buf())
    }
}

/// Remove the declarations of every alias in `table`, then substitute each
/// alias by its canonical spelling. Line count is preserved.
///
/// A typedef that defines its tag keeps the definition: only `typedef` and
/// the declarators after the body go, so `typedef struct P {...} P;` becomes
/// `struct P {...};`. Any other typedef declaration is blanked.
pub fn unfold_text(
    mut text: SourceText,
    records: &[TypedefRecord],
    table: &AliasTable,
) -> String {
    // (tag body, furthest declarator end) per defined tag.
    let mut owned: Vec<(Extent, Extent)> = Vec::new();
    for record in records.iter().filter(|r| table.contains(&r.alias)) {
        match record.owned_tag {
            Some(tag) => match owned.iter_mut().find(|(t, _)| *t == tag) {
                Some((_, declaration)) => {
                    if (record.extent.end_line, record.extent.end_col) > (declaration.end_line, declaration.end_col) {
                        *declaration = record.extent;
                    }
                },
                None => owned.push((tag, record.extent)),
            },
            None => text.blank_extent(&record.extent),
        }
    }
    for (tag, declaration) in &owned {
        detach_tag_definition(&mut text, tag, declaration);
    }

    let mut code = text.render();
    for (alias, canonical) in table.iter() {
        code = substitute_alias(&code, alias, canonical);
    }
    code
}

/// Turn `typedef <tag body> A, B;` into `<tag body> ;` in place.
fn detach_tag_definition(
    text: &mut SourceText,
    tag: &Extent,
    declaration: &Extent,
) {
    let tokens = tokens_in(text, declaration);
    let Some(keyword) = tokens.first().filter(|t| t.kind == Some(TokenKind::KwTypedef)) else {
        warn!("[unfold] typedef at line {} does not start with `typedef`, blanking it", declaration.start_line);
        text.blank_extent(declaration);
        return;
    };

    // Declarators first: they sit after the body, so the keyword's columns stay valid.
    if tag.end_line == declaration.end_line {
        text.remove_columns(tag.end_line, tag.end_col + 1, declaration.end_col);
    } else {
        let tail = text.line(tag.end_line).map_or(0, str::len) as u32;
        text.remove_columns(tag.end_line, tag.end_col + 1, tail);
        for line in tag.end_line + 1..declaration.end_line {
            text.blank_line(line);
        }
        text.remove_columns(declaration.end_line, 1, declaration.end_col);
    }
    remove_token(text, keyword);
}

/// Replace whole-word occurrences of `alias` with `canonical`.
///
/// An occurrence directly after `struct`, `union` or `enum` names a tag,
/// not the typedef, and is left alone.
pub fn substitute_alias(
    code: &str,
    alias: &str,
    canonical: &str,
) -> String {
    let pattern = format!(r"\b(?:(struct|union|enum)\s+)?{}\b", regex::escape(alias));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(error) => {
            warn!("[unfold] cannot build pattern for alias `{alias}`: {error}");
            return code.to_owned();
        },
    };

    re.replace_all(code, |caps: &Captures<'_>| {
        if caps.get(1).is_some() {
            caps[0].to_owned()
        } else {
            canonical.to_owned()
        }
    })
    .into_owned()
}

#[cfg(test)]
#[path = "../tests/src/unfold_tests.rs"]
mod tests;
