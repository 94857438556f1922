use similar::TextDiff;

/// Unified diff between the raw recipe text and the annotated document,
/// for dry-run previews. Returns `None` when nothing changed.
pub fn build_preview_diff(raw: &str, annotated: &str, name: &str) -> Option<String> {
    if raw == annotated {
        return None;
    }

    let diff = TextDiff::from_lines(raw, annotated);
    let mut output = Vec::new();
    let header_old = format!("{name} (original)");
    let header_new = format!("{name} (annotated)");

    diff.unified_diff()
        .header(&header_old, &header_new)
        .to_writer(&mut output)
        .expect("writing diff to string never fails");

    Some(String::from_utf8(output).expect("diff output is valid utf-8"))
}
