use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use form_spec::{
    BuilderError, FieldType, FormBuilder, FormSchema, StoredForm, render_canvas_text,
    validate_schema,
};

fn ids(builder: &FormBuilder) -> Vec<String> {
    builder.fields().iter().map(|field| field.id.clone()).collect()
}

fn builder_with_three() -> (FormBuilder, Vec<String>) {
    let mut builder = FormBuilder::new();
    let a = builder.add_field(FieldType::Text);
    let b = builder.add_field(FieldType::Select);
    let c = builder.add_field(FieldType::File);
    (builder, vec![a, b, c])
}

#[test]
fn adding_a_field_grows_the_list_by_one() {
    let mut builder = FormBuilder::new();
    for (expected, kind) in FieldType::ALL.iter().enumerate() {
        builder.add_field(*kind);
        assert_eq!(builder.len(), expected + 1);
    }
    let labels = builder
        .fields()
        .iter()
        .map(|field| field.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        labels,
        vec![
            "Untitled text question",
            "Untitled textarea question",
            "Untitled select question",
            "Untitled file question",
        ]
    );
}

#[test]
fn added_ids_are_unique() {
    let mut builder = FormBuilder::new();
    for _ in 0..20 {
        builder.add_field(FieldType::Text);
    }
    let unique = ids(&builder).into_iter().collect::<BTreeSet<_>>();
    assert_eq!(unique.len(), 20);
    assert!(validate_schema(&builder.schema()).valid);
}

#[test]
fn reorder_moves_active_to_over_slot() {
    let (mut builder, original) = builder_with_three();
    builder
        .reorder(&original[0], Some(original[2].as_str()))
        .expect("reorder");
    assert_eq!(
        ids(&builder),
        vec![original[1].clone(), original[2].clone(), original[0].clone()]
    );
}

#[test]
fn reorder_preserves_identifier_set() {
    let (mut builder, original) = builder_with_three();
    builder
        .reorder(&original[2], Some(original[0].as_str()))
        .expect("reorder");
    let before = original.iter().cloned().collect::<BTreeSet<_>>();
    let after = ids(&builder).into_iter().collect::<BTreeSet<_>>();
    assert_eq!(before, after);
    assert_eq!(ids(&builder)[0], original[2]);
}

#[test]
fn reorder_without_target_or_onto_itself_is_a_no_op() {
    let (mut builder, original) = builder_with_three();
    builder.reorder(&original[1], None).expect("no target");
    builder
        .reorder(&original[1], Some(original[1].as_str()))
        .expect("same target");
    assert_eq!(ids(&builder), original);
}

#[test]
fn reorder_with_unknown_id_leaves_list_untouched() {
    let (mut builder, original) = builder_with_three();
    let err = builder
        .reorder("missing", Some(original[0].as_str()))
        .expect_err("unknown active");
    assert_eq!(err, BuilderError::UnknownField("missing".into()));
    assert_eq!(ids(&builder), original);
}

#[test]
fn move_to_clamps_index() {
    let (mut builder, original) = builder_with_three();
    builder.move_to(&original[0], 99).expect("move");
    assert_eq!(ids(&builder)[2], original[0]);
}

#[test]
fn options_are_stored_raw_and_only_for_select() {
    let (mut builder, original) = builder_with_three();
    builder
        .set_options_from_text(&original[1], "Red, Green,Blue ")
        .expect("options");
    let field = builder.field(&original[1]).expect("field");
    assert_eq!(
        field.options.clone().unwrap_or_default(),
        vec!["Red", " Green", "Blue "]
    );
    assert_eq!(field.display_options(), vec!["Red", "Green", "Blue"]);

    let err = builder
        .set_options_from_text(&original[0], "a,b")
        .expect_err("text field");
    assert_eq!(err, BuilderError::NotMultipleChoice(original[0].clone()));
    assert!(builder.field(&original[0]).expect("field").options.is_none());
    assert!(validate_schema(&builder.schema()).valid);
}

#[test]
fn label_update_and_delete() {
    let (mut builder, original) = builder_with_three();
    builder
        .update_label(&original[0], "Your Name")
        .expect("label");
    assert_eq!(builder.fields()[0].label, "Your Name");

    let removed = builder.remove_field(&original[1]).expect("delete");
    assert_eq!(removed.kind, FieldType::Select);
    assert_eq!(ids(&builder), vec![original[0].clone(), original[2].clone()]);
    assert!(builder.remove_field(&original[1]).is_err());
}

#[test]
fn schema_snapshot_carries_title_and_order() {
    let (mut builder, original) = builder_with_three();
    builder.set_title("Feedback");
    let schema = builder.schema();
    assert_eq!(schema.title, "Feedback");
    assert_eq!(schema.field_ids(), original.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn canvas_shows_previews() {
    let (mut builder, original) = builder_with_three();
    builder.set_title("Survey");
    builder
        .set_options_from_text(&original[1], "Yes,No")
        .expect("options");
    let canvas = render_canvas_text(&builder);
    assert!(canvas.contains("Form Title: Survey"));
    assert!(canvas.contains("2. Untitled select question [Multiple Choice]"));
    assert!(canvas.contains("options: Yes,No"));
    assert!(canvas.contains("(Preview only)"));
}

#[test]
fn resumed_schema_edits_by_position() {
    let form: StoredForm =
        serde_json::from_str(include_str!("../tests/fixtures/mock_form.json")).expect("deserialize");
    let mut builder = FormBuilder::from_schema(form.schema).expect("valid schema");
    assert_eq!(builder.title(), "Mock Form Title");

    let id = builder.resolve("2").expect("position 2").id.clone();
    builder.update_label(&id, "Colour").expect("label");
    let labels = builder
        .fields()
        .iter()
        .map(|field| field.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(labels[1], "Colour");
    assert_eq!(labels[0], "Your Name");
}

#[test]
fn resuming_schema_with_duplicate_ids_is_refused() {
    let schema: FormSchema =
        serde_json::from_str(include_str!("../tests/fixtures/invalid_schema.json"))
            .expect("deserialize");
    let err = FormBuilder::from_schema(schema).expect_err("duplicate ids");
    match err {
        BuilderError::InvalidSchema(details) => {
            assert!(details.contains("'q1'"), "details: {}", details);
        }
        other => panic!("unexpected error {:?}", other),
    }
}
