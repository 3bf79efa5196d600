use super::*;

const MAIN: &str = "/tmp/unit.c";
const HEADER: &str = "/usr/include/sys/types.h";

const SOURCE: &str = "static int add(int a, int b);
typedef unsigned int uint32;
static int add(int a, int b) { return a + b; }
typedef uint32 u32;
typedef int (*cmp)(int, int);
typedef struct point {
  int x;
} point;
typedef struct pair { int a; } pair, pairs[2];
struct fwd;
";

fn loc(
    file: &str,
    line: u32,
    col: u32,
    tok_len: u32,
) -> String {
    format!(r#"{{"offset": 0, "file": "{file}", "line": {line}, "col": {col}, "tokLen": {tok_len}}}"#)
}

fn range(
    file: &str,
    begin: (u32, u32, u32),
    end: (u32, u32, u32),
) -> String {
    format!(r#"{{"begin": {}, "end": {}}}"#, loc(file, begin.0, begin.1, begin.2), loc(file, end.0, end.1, end.2))
}

fn fixture_json() -> String {
    format!(
        r#"{{
  "id": "0x1", "kind": "TranslationUnitDecl", "loc": {{}}, "range": {{"begin": {{}}, "end": {{}}}},
  "inner": [
    {{"id": "0x2", "kind": "TypedefDecl", "loc": {{}}, "range": {{"begin": {{}}, "end": {{}}}},
      "isImplicit": true, "name": "__int128_t", "type": {{"qualType": "__int128"}}}},
    {{"id": "0x3", "kind": "TypedefDecl", "loc": {hdr_loc}, "range": {hdr_range},
      "name": "pid_t", "type": {{"qualType": "int"}}}},
    {{"id": "0x4", "kind": "FunctionDecl", "loc": {decl_loc}, "range": {decl_range},
      "name": "add", "type": {{"qualType": "int (int, int)"}}, "storageClass": "static",
      "inner": [{{"id": "0x5", "kind": "ParmVarDecl", "loc": {decl_loc}, "range": {decl_range}, "name": "a"}}]}},
    {{"id": "0x6", "kind": "TypedefDecl", "loc": {td_loc}, "range": {td_range},
      "name": "uint32", "type": {{"qualType": "unsigned int"}}}},
    {{"id": "0x7", "kind": "FunctionDecl", "loc": {def_loc}, "range": {def_range},
      "previousDecl": "0x4", "name": "add", "type": {{"qualType": "int (int, int)"}}, "storageClass": "static",
      "inner": [{{"id": "0x8", "kind": "CompoundStmt", "range": {body_range}}}]}},
    {{"id": "0x9", "kind": "TypedefDecl", "loc": {chain_loc}, "range": {chain_range},
      "name": "u32", "type": {{"qualType": "uint32", "desugaredQualType": "unsigned int"}}}},
    {{"id": "0xa", "kind": "TypedefDecl", "loc": {fp_loc}, "range": {fp_range},
      "name": "cmp", "type": {{"qualType": "int (*)(int, int)"}}}},
    {{"id": "0xb", "kind": "FunctionDecl", "loc": {{}}, "range": {{"begin": {{}}, "end": {{}}}},
      "isImplicit": true, "name": "helper", "storageClass": "extern"}},
    {{"id": "0xc", "kind": "RecordDecl", "loc": {point_tag_loc}, "range": {point_tag_range},
      "name": "point", "tagUsed": "struct", "completeDefinition": true,
      "inner": [{{"id": "0xd", "kind": "FieldDecl", "loc": {point_field_loc}, "range": {point_field_range}, "name": "x"}}]}},
    {{"id": "0xe", "kind": "TypedefDecl", "loc": {point_loc}, "range": {point_range},
      "name": "point", "type": {{"qualType": "struct point"}}}},
    {{"id": "0xf", "kind": "RecordDecl", "loc": {pair_tag_loc}, "range": {pair_tag_range},
      "name": "pair", "tagUsed": "struct", "completeDefinition": true}},
    {{"id": "0x10", "kind": "TypedefDecl", "loc": {pair_loc}, "range": {pair_range},
      "name": "pair", "type": {{"qualType": "struct pair"}}}},
    {{"id": "0x11", "kind": "TypedefDecl", "loc": {pairs_loc}, "range": {pairs_range},
      "name": "pairs", "type": {{"qualType": "struct pair[2]"}}}},
    {{"id": "0x12", "kind": "RecordDecl", "loc": {fwd_loc}, "range": {fwd_range},
      "name": "fwd", "tagUsed": "struct"}}
  ]
}}"#,
        hdr_loc = loc(HEADER, 10, 13, 5),
        hdr_range = range(HEADER, (10, 1, 7), (10, 13, 5)),
        decl_loc = loc(MAIN, 1, 12, 3),
        decl_range = range(MAIN, (1, 1, 6), (1, 28, 1)),
        td_loc = loc(MAIN, 2, 22, 6),
        td_range = range(MAIN, (2, 1, 7), (2, 22, 6)),
        def_loc = loc(MAIN, 3, 12, 3),
        def_range = range(MAIN, (3, 1, 6), (3, 46, 1)),
        body_range = range(MAIN, (3, 30, 1), (3, 46, 1)),
        chain_loc = loc(MAIN, 4, 16, 3),
        chain_range = range(MAIN, (4, 1, 7), (4, 16, 3)),
        fp_loc = loc(MAIN, 5, 15, 3),
        fp_range = range(MAIN, (5, 1, 7), (5, 28, 1)),
        point_tag_loc = loc(MAIN, 6, 16, 5),
        point_tag_range = range(MAIN, (6, 9, 6), (8, 1, 1)),
        point_field_loc = loc(MAIN, 7, 7, 1),
        point_field_range = range(MAIN, (7, 3, 3), (7, 7, 1)),
        point_loc = loc(MAIN, 8, 3, 5),
        point_range = range(MAIN, (6, 1, 7), (8, 3, 5)),
        pair_tag_loc = loc(MAIN, 9, 16, 4),
        pair_tag_range = range(MAIN, (9, 9, 6), (9, 30, 1)),
        pair_loc = loc(MAIN, 9, 32, 4),
        pair_range = range(MAIN, (9, 1, 7), (9, 32, 4)),
        pairs_loc = loc(MAIN, 9, 38, 5),
        pairs_range = range(MAIN, (9, 1, 7), (9, 45, 1)),
        fwd_loc = loc(MAIN, 10, 8, 3),
        fwd_range = range(MAIN, (10, 1, 6), (10, 8, 3)),
    )
}

fn fixture_unit() -> ParsedUnit {
    let root: Node = serde_json::from_str(&fixture_json()).expect("fixture AST deserializes");
    ParsedUnit::from_root(PathBuf::from(MAIN), SourceText::parse(SOURCE), &root, &[MAIN.to_owned()])
}

#[test]
fn collects_main_file_functions_only() {
    let unit = fixture_unit();
    let names: Vec<_> = unit.functions().iter().map(|f| (f.name.as_str(), f.is_definition)).collect();
    assert_eq!(names, vec![("add", false), ("add", true), ("helper", false)]);
}

#[test]
fn find_function_pairs_definition_and_declaration() {
    let unit = fixture_unit();
    let info = unit.find_function("add").expect("add is defined");

    assert_eq!(info.definition.extent, Some(Extent::new(3, 1, 3, 46)));
    let declaration = info.declaration.expect("forward declaration");
    assert_eq!(declaration.extent, Some(Extent::new(1, 1, 1, 28)));
}

#[test]
fn find_function_reports_missing_definition() {
    let unit = fixture_unit();
    let err = unit.find_function("helper").unwrap_err();
    assert!(matches!(err, NormalizeError::NotFound { kind: SymbolKind::Function, ref name, .. } if name == "helper"));
    assert!(err.to_string().contains("`helper`"), "error must name the function: {err}");
}

#[test]
fn implicit_declarations_have_no_tokens() {
    let unit = fixture_unit();
    let helper = unit.functions().iter().find(|f| f.name == "helper").expect("implicit helper");
    assert_eq!(helper.extent, None);
    assert!(unit.node_tokens(helper).is_empty());
}

#[test]
fn node_tokens_start_with_static_keyword() {
    let unit = fixture_unit();
    let info = unit.find_function("add").expect("add");
    let tokens = unit.node_tokens(&info.definition);
    assert_eq!(tokens.first().map(|t| t.spelling.as_str()), Some("static"));
    assert_eq!(tokens.last().map(|t| t.spelling.as_str()), Some("}"));
}

#[test]
fn typedef_records_skip_headers_and_implicit() {
    let unit = fixture_unit();
    let aliases: Vec<_> = unit.typedef_records().iter().map(|r| r.alias.as_str()).collect();
    assert_eq!(aliases, vec!["uint32", "u32", "cmp", "point", "pair", "pairs"]);
    assert_eq!(unit.typedef_records()[0].extent, Extent::new(2, 1, 2, 27));
    assert_eq!(unit.typedef_records()[0].owned_tag, None);
}

#[test]
fn typedef_records_know_the_tag_body_they_define() {
    let unit = fixture_unit();
    let owned: Vec<_> = unit.typedef_records().iter().map(|r| (r.alias.as_str(), r.owned_tag)).collect();
    assert_eq!(
        owned[3..],
        [
            ("point", Some(Extent::new(6, 9, 8, 1))),
            ("pair", Some(Extent::new(9, 9, 9, 30))),
            ("pairs", Some(Extent::new(9, 9, 9, 30))),
        ]
    );
    assert_eq!(unit.typedef_records()[3].extent, Extent::new(6, 1, 8, 7));
}

#[test]
fn alias_table_uses_desugared_spelling_and_skips_declarators() {
    let unit = fixture_unit();
    let table = unit.alias_table();
    let entries: Vec<_> = table.iter().collect();
    assert_eq!(entries, vec![("uint32", "unsigned int"), ("u32", "unsigned int"), ("point", "struct point")]);
    assert!(!table.contains("cmp"));
}

#[test]
fn alias_table_skips_declarators_sharing_a_body_with_an_array() {
    let table = fixture_unit().alias_table();
    assert!(!table.contains("pair"));
    assert!(!table.contains("pairs"));
}

#[test]
fn alias_table_keeps_first_of_repeated_alias() {
    let table: AliasTable = [("T", "int"), ("U", "long"), ("T", "short")].into_iter().collect();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("T"), Some("int"));
}
