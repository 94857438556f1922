use cook_annotate::{
    annotate, AnnotateRequest, RecipeMetadata, Role, StepSeparator, TermEntry, TermTable,
    TimeSetting, UnitCatalog, UnitDef,
};
use pretty_assertions::assert_eq;

fn default_units() -> UnitCatalog {
    UnitCatalog::new(vec![
        UnitDef::new("Stück"),
        UnitDef::abbreviated("Esslöffel (EL)", "EL"),
        UnitDef::abbreviated("Gramm (g)", "g"),
    ])
}

#[test]
fn bare_ingredient_is_tagged_exactly_once() {
    let request = AnnotateRequest {
        text: "Salz hinzufügen und mit Salz abschmecken".into(),
        table: TermTable::seed(["Salz"]).unwrap(),
        ..AnnotateRequest::default()
    };

    let outcome = annotate(&request).unwrap();
    assert_eq!(
        outcome.document.body,
        "@Salz hinzufügen und mit Salz abschmecken"
    );
    assert_eq!(outcome.annotated, 1);
}

#[test]
fn multi_word_term_is_escaped_with_braces() {
    let bare = AnnotateRequest {
        text: "rote Linsen waschen".into(),
        table: TermTable::seed(["rote Linsen"]).unwrap(),
        ..AnnotateRequest::default()
    };
    assert_eq!(
        annotate(&bare).unwrap().document.body,
        "@rote Linsen{} waschen"
    );

    let quantified = AnnotateRequest {
        text: "rote Linsen waschen".into(),
        table: TermTable::from_entries([
            TermEntry::bare("rote Linsen").with_amount(100.0, "Gramm (g)")
        ])
        .unwrap(),
        units: default_units(),
        ..AnnotateRequest::default()
    };
    assert_eq!(
        annotate(&quantified).unwrap().document.body,
        "@rote Linsen{100%g} waschen"
    );
}

#[test]
fn tool_is_tagged_with_hash() {
    let request = AnnotateRequest {
        text: "Die Pfanne erhitzen, dann alles in die Pfanne geben".into(),
        table: TermTable::from_entries([TermEntry::bare("Pfanne").with_role(Role::Tool)])
            .unwrap(),
        ..AnnotateRequest::default()
    };

    let outcome = annotate(&request).unwrap();
    assert_eq!(
        outcome.document.body,
        "Die #Pfanne erhitzen, dann alles in die Pfanne geben"
    );
}

#[test]
fn separator_normalization_breaks_steps() {
    let request = AnnotateRequest {
        text: "Waschen. Schneiden. Kochen".into(),
        ..AnnotateRequest::default()
    };

    let outcome = annotate(&request).unwrap();
    assert_eq!(outcome.document.body, "Waschen.\n\nSchneiden.\n\nKochen");
}

#[test]
fn header_gating_emits_only_present_fields() {
    let request = AnnotateRequest {
        text: "Backen".into(),
        metadata: RecipeMetadata {
            source: Some("".into()),
            time: TimeSetting::Unset,
            course: Some("Kuchen".into()),
        },
        ..AnnotateRequest::default()
    };

    let outcome = annotate(&request).unwrap();
    assert_eq!(outcome.document.header, ">> course: Kuchen\n\n");
    assert_eq!(outcome.document.render(), ">> course: Kuchen\n\nBacken");
}

#[test]
fn end_to_end_tomatoes() {
    let request = AnnotateRequest {
        text: "Tomaten schneiden.".into(),
        separator: StepSeparator::Period,
        table: TermTable::from_entries([TermEntry::bare("Tomaten").with_amount(3.0, "Stück")])
            .unwrap(),
        units: default_units(),
        ..AnnotateRequest::default()
    };

    let outcome = annotate(&request).unwrap();
    assert_eq!(outcome.document.body, "@Tomaten{3%Stück} schneiden.\n\n");
    assert!(outcome.unmatched.is_empty());
}

#[test]
fn regenerating_from_the_same_inputs_is_deterministic() {
    let request = AnnotateRequest {
        text: "Die Kichererbsen waschen. Den Seitan würfeln.".into(),
        table: TermTable::seed(["Kichererbsen", "Seitan"]).unwrap(),
        ..AnnotateRequest::default()
    };

    let first = annotate(&request).unwrap();
    let second = annotate(&request).unwrap();
    assert_eq!(first.document, second.document);
    assert_eq!(
        first.document.body,
        "Die @Kichererbsen waschen.\n\nDen @Seitan würfeln.\n\n"
    );
}

#[test]
fn user_added_term_missing_from_text_is_diagnosed() {
    let request = AnnotateRequest {
        text: "Zwiebeln anbraten".into(),
        table: TermTable::seed(["Zwiebeln", "Knoblauch"]).unwrap(),
        ..AnnotateRequest::default()
    };

    let outcome = annotate(&request).unwrap();
    assert_eq!(outcome.document.body, "@Zwiebeln anbraten");
    assert_eq!(outcome.unmatched, vec!["Knoblauch".to_string()]);
}
