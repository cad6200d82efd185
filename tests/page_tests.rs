//! Checks on the sample page the browser binding attaches to.

const PAGE: &str = include_str!("../web/index.html");

fn tag_containing<'a>(marker: &str) -> &'a str {
    let at = PAGE.find(marker).unwrap_or_else(|| panic!("no {marker} in page"));
    let start = PAGE[..at].rfind('<').unwrap();
    let end = at + PAGE[at..].find('>').unwrap();
    &PAGE[start..=end]
}

#[test]
fn question_box_accepts_empty_input() {
    let textarea = tag_containing(r#"name="question""#);
    assert!(textarea.starts_with("<textarea"), "tag: {textarea}");
    assert!(!textarea.contains("required"), "tag: {textarea}");
}

#[test]
fn file_input_is_required() {
    let input = tag_containing(r#"type="file""#);
    assert!(input.contains("required"), "tag: {input}");
}

#[test]
fn page_has_every_bound_element() {
    for id in ["upload-form", "delete-form", "ask-form", "stats-text", "answer-text"] {
        assert!(PAGE.contains(&format!(r#"id="{id}""#)), "missing #{id}");
    }
    assert!(PAGE.contains(r#"class="answer""#));
}
