use super::*;

#[test]
fn parse_and_render_preserve_trailing_newline() {
    let source = "int a;\nint b;\n";
    let text = SourceText::parse(source);
    assert_eq!(text.line_count(), 3);
    assert_eq!(text.render(), source);
}

#[test]
fn blank_line_keeps_line_count() {
    let mut text = SourceText::parse("typedef int T;\nT x;\nT y;");
    text.blank_line(1);
    assert_eq!(text.line_count(), 3);
    assert_eq!(text.render(), "\nT x;\nT y;");
}

#[test]
fn blank_extent_covers_every_line_inclusive() {
    let mut text = SourceText::parse("a\ntypedef struct {\n  int x;\n} P;\nb");
    text.blank_extent(&Extent::new(2, 1, 4, 3));
    assert_eq!(text.render(), "a\n\n\n\nb");
}

#[test]
fn blank_line_ignores_out_of_range() {
    let mut text = SourceText::parse("only");
    text.blank_line(0);
    text.blank_line(7);
    assert_eq!(text.render(), "only");
}

#[test]
fn remove_columns_splices_inside_line() {
    let mut text = SourceText::parse("static int add(int a,int b){return a+b;}");
    assert!(text.remove_columns(1, 1, 7));
    assert_eq!(text.line(1), Some("int add(int a,int b){return a+b;}"));
}

#[test]
fn remove_columns_rejects_bad_ranges() {
    let mut text = SourceText::parse("abc");
    assert!(!text.remove_columns(1, 0, 2));
    assert!(!text.remove_columns(1, 3, 9));
    assert!(!text.remove_columns(2, 1, 1));
    assert_eq!(text.render(), "abc");
}

#[test]
fn slice_single_and_multi_line() {
    let text = SourceText::parse("static int f(void)\n{\n  return 0;\n}");
    assert_eq!(text.slice(&Extent::new(1, 1, 1, 6)).as_deref(), Some("static"));
    assert_eq!(text.slice(&Extent::new(1, 12, 2, 1)).as_deref(), Some("f(void)\n{"));
    assert_eq!(text.slice(&Extent::new(5, 1, 5, 1)), None);
}

#[test]
fn extent_contains_nested_ranges() {
    let typedef = Extent::new(1, 1, 4, 7);
    assert!(typedef.contains(&Extent::new(1, 9, 4, 1)));
    assert!(typedef.contains(&typedef));
    assert!(!typedef.contains(&Extent::new(4, 1, 5, 2)));
    assert!(!Extent::new(2, 5, 2, 9).contains(&Extent::new(2, 4, 2, 6)));
}
