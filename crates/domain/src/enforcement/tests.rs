use fieldgate_core::{SiteId, UserIdentity};
use proptest::prelude::*;
use serde_json::{Value, json};

use crate::field::{FieldDescriptor, FieldKind, WysiwygToolbar};
use crate::grant::GrantTable;

use super::{DEFAULT_DENIED_NOTICE, FieldPolicy, WritePlan};

const ROLES: [&str; 3] = ["fsm_restricted", "corporate", "franchisee"];

fn site() -> SiteId {
    SiteId::new(1).unwrap_or_else(|_| unreachable!())
}

fn editor(roles: &[&str]) -> UserIdentity {
    UserIdentity::new("21", "Jordan", site()).with_roles(roles.iter().copied())
}

fn administrator() -> UserIdentity {
    UserIdentity::new("1", "Admin", site()).with_capabilities(["administrator"])
}

fn field(key: &str, name: &str, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor::new(key, name, name, kind).unwrap_or_else(|_| unreachable!())
}

fn grants(entries: &[(&str, &str, bool)]) -> GrantTable {
    let mut table = GrantTable::new();
    for (key, role, granted) in entries {
        assert!(table.set_grant(*key, *role, *granted).is_ok());
    }
    table
}

fn repeater() -> FieldDescriptor {
    field(
        "field_rows",
        "rows",
        FieldKind::Repeater {
            sub_fields: vec![
                field("field_a", "a", FieldKind::Text),
                field("field_b", "b", FieldKind::Text),
            ],
            min: None,
            max: None,
        },
    )
}

#[test]
fn denied_field_is_locked_with_notice() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_title", "corporate", true)]);
    let rendered = policy.enforce_render(
        field("field_title", "title", FieldKind::Text),
        &table,
        &editor(&["franchisee"]),
    );

    assert!(rendered.is_read_only());
    assert!(rendered.is_disabled());
    assert!(rendered.instructions().contains(DEFAULT_DENIED_NOTICE));
}

#[test]
fn granted_role_keeps_field_editable() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_title", "corporate", true)]);
    let original = field("field_title", "title", FieldKind::Text);

    let rendered = policy.enforce_render(
        original.clone(),
        &table,
        &editor(&["franchisee", "corporate"]),
    );
    assert_eq!(rendered, original);
}

#[test]
fn exempt_field_name_is_never_locked() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_embed", "corporate", true)]);
    let original = field("field_embed", "iframe_embed_code", FieldKind::Text);

    let rendered = policy.enforce_render(original.clone(), &table, &editor(&["franchisee"]));
    assert_eq!(rendered, original);
}

#[test]
fn tabs_are_never_permission_checked() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_tab", "corporate", true)]);
    let original = field("field_tab", "", FieldKind::Tab);

    let rendered = policy.enforce_render(original.clone(), &table, &editor(&["franchisee"]));
    assert_eq!(rendered, original);
}

#[test]
fn consultant_bypasses_restrictions() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_title", "corporate", true)]);
    let original = field("field_title", "title", FieldKind::Text);
    let consultant = editor(&["franchise_business_consultant"]);

    assert_eq!(
        policy.enforce_render(original.clone(), &table, &consultant),
        original
    );
    assert_eq!(
        policy.plan_write(&original, &json!("new"), &table, &consultant),
        WritePlan::Accept
    );
}

#[test]
fn denied_write_restores_stored_value() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_title", "corporate", true)]);
    let title = field("field_title", "title", FieldKind::Text);

    let accepted = policy.enforce_write(
        &title,
        json!("defaced"),
        &table,
        &editor(&["franchisee"]),
        || Some(json!("Original headline")),
    );
    assert_eq!(accepted, json!("Original headline"));
}

#[test]
fn denied_first_save_keeps_submission() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_title", "corporate", true)]);
    let title = field("field_title", "title", FieldKind::Text);
    let user = editor(&["franchisee"]);

    for stored in [None, Some(Value::Null), Some(json!(false))] {
        let accepted =
            policy.enforce_write(&title, json!("first"), &table, &user, || stored.clone());
        assert_eq!(accepted, json!("first"));
    }
}

#[test]
fn permitted_write_never_reads_stored_value() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_title", "corporate", true)]);
    let title = field("field_title", "title", FieldKind::Text);

    let accepted = policy.enforce_write(
        &title,
        json!("edited"),
        &table,
        &editor(&["corporate"]),
        || unreachable!("stored value must not be read"),
    );
    assert_eq!(accepted, json!("edited"));
}

#[test]
fn repeater_reverts_only_denied_sub_fields() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_a", "corporate", true), ("field_b", "franchisee", true)]);

    let accepted = policy.enforce_write(
        &repeater(),
        json!([{ "a": 9, "b": 20 }, { "a": 9, "b": 40 }]),
        &table,
        &editor(&["franchisee"]),
        || Some(json!([{ "a": 1, "b": 2 }, { "a": 3, "b": 4 }])),
    );

    assert_eq!(accepted, json!([{ "a": 1, "b": 20 }, { "a": 3, "b": 40 }]));
}

#[test]
fn repeater_added_rows_pass_through() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_a", "corporate", true)]);

    let accepted = policy.enforce_write(
        &repeater(),
        json!([{ "a": 9, "b": 20 }, { "a": 7, "b": 30 }]),
        &table,
        &editor(&["franchisee"]),
        || Some(json!([{ "a": 1, "b": 2 }])),
    );

    assert_eq!(accepted, json!([{ "a": 1, "b": 20 }, { "a": 7, "b": 30 }]));
}

#[test]
fn repeater_rows_keyed_by_index_are_reverted() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_a", "corporate", true)]);

    let accepted = policy.enforce_write(
        &repeater(),
        json!({ "0": { "a": 9, "b": 20 }, "1": { "a": 9, "b": 40 } }),
        &table,
        &editor(&["franchisee"]),
        || Some(json!([{ "a": 1, "b": 2 }, { "a": 3, "b": 4 }])),
    );
    assert_eq!(
        accepted,
        json!({ "0": { "a": 1, "b": 20 }, "1": { "a": 3, "b": 40 } })
    );

    let accepted = policy.enforce_write(
        &repeater(),
        json!({ "0": { "a": 9, "b": 20 }, "2": { "a": 9, "b": 40 } }),
        &table,
        &editor(&["franchisee"]),
        || Some(json!({ "0": { "a": 1, "b": 2 }, "2": { "a": 5, "b": 6 } })),
    );
    assert_eq!(
        accepted,
        json!({ "0": { "a": 1, "b": 20 }, "2": { "a": 5, "b": 40 } })
    );
}

#[test]
fn repeater_list_rows_match_keyed_stored_rows() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_a", "corporate", true)]);

    let accepted = policy.enforce_write(
        &repeater(),
        json!([{ "a": 9, "b": 20 }, { "a": 9, "b": 40 }]),
        &table,
        &editor(&["franchisee"]),
        || Some(json!({ "1": { "a": 3, "b": 4 } })),
    );

    assert_eq!(accepted, json!([{ "a": 9, "b": 20 }, { "a": 3, "b": 40 }]));
}

#[test]
fn empty_keyed_repeater_submission_is_accepted() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_a", "corporate", true)]);

    assert_eq!(
        policy.plan_write(&repeater(), &json!({}), &table, &editor(&["franchisee"])),
        WritePlan::Accept
    );
}

#[test]
fn repeater_without_stored_rows_keeps_submission() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_a", "corporate", true)]);
    let submitted = json!([{ "a": 9, "b": 20 }]);

    let accepted = policy.enforce_write(
        &repeater(),
        submitted.clone(),
        &table,
        &editor(&["franchisee"]),
        || None,
    );
    assert_eq!(accepted, submitted);
}

#[test]
fn empty_repeater_submission_is_accepted() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_a", "corporate", true)]);

    assert_eq!(
        policy.plan_write(&repeater(), &json!([]), &table, &editor(&["franchisee"])),
        WritePlan::Accept
    );
}

#[test]
fn denied_repeater_keeps_all_stored_rows() {
    let policy = FieldPolicy::default();
    let table = grants(&[("field_rows", "corporate", true)]);

    assert_eq!(
        policy.plan_write(
            &repeater(),
            &json!([{ "a": 1 }]),
            &table,
            &editor(&["franchisee"])
        ),
        WritePlan::KeepStored
    );
}

fn kind_strategy() -> impl Strategy<Value = FieldKind> {
    prop_oneof![
        Just(FieldKind::Text),
        Just(FieldKind::Link),
        Just(FieldKind::Button),
        any::<bool>().prop_map(|uploader_disabled| FieldKind::Image { uploader_disabled }),
        Just(FieldKind::Wysiwyg {
            toolbar: WysiwygToolbar::Full
        }),
        (proptest::option::of(0u32..5), proptest::option::of(0u32..20)).prop_map(
            |(min, max)| FieldKind::Repeater {
                sub_fields: Vec::new(),
                min,
                max,
            }
        ),
    ]
}

fn descriptor_strategy() -> impl Strategy<Value = FieldDescriptor> {
    (kind_strategy(), "[a-z ]{0,24}", 0usize..4).prop_map(|(kind, instructions, rows)| {
        let value = Value::Array((0..rows).map(|row| json!({ "a": row })).collect());
        field("field_target", "target", kind)
            .with_instructions(instructions)
            .with_value(value)
    })
}

fn roles_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(ROLES.to_vec(), 0..=ROLES.len())
}

proptest! {
    #[test]
    fn denied_fields_are_always_read_only_and_disabled(
        descriptor in descriptor_strategy(),
        roles in roles_strategy(),
    ) {
        let policy = FieldPolicy::default();
        let table = grants(&[("field_target", "unlisted_role", true)]);

        let rendered = policy.enforce_render(descriptor.clone(), &table, &editor(&roles));
        prop_assert!(rendered.is_read_only());
        prop_assert!(rendered.is_disabled());
        prop_assert_ne!(rendered, descriptor);
    }

    #[test]
    fn unconfigured_fields_pass_both_hooks_unchanged(
        descriptor in descriptor_strategy(),
        roles in roles_strategy(),
        submitted in "[a-z]{1,12}",
    ) {
        let policy = FieldPolicy::default();
        let table = grants(&[("field_other", "corporate", true)]);
        let user = editor(&roles);

        prop_assert_eq!(
            policy.enforce_render(descriptor.clone(), &table, &user),
            descriptor.clone()
        );
        let accepted = policy.enforce_write(
            &descriptor,
            json!(submitted.clone()),
            &table,
            &user,
            || Some(json!("stored")),
        );
        prop_assert_eq!(accepted, json!(submitted));
    }

    #[test]
    fn privileged_users_pass_both_hooks_unchanged(
        descriptor in descriptor_strategy(),
        granted in any::<bool>(),
        submitted in "[a-z]{1,12}",
    ) {
        let policy = FieldPolicy::default();
        let table = grants(&[("field_target", "corporate", granted)]);
        let admin = administrator();

        prop_assert_eq!(
            policy.enforce_render(descriptor.clone(), &table, &admin),
            descriptor.clone()
        );
        let accepted = policy.enforce_write(
            &descriptor,
            json!(submitted.clone()),
            &table,
            &admin,
            || Some(json!("stored")),
        );
        prop_assert_eq!(accepted, json!(submitted));
    }

    #[test]
    fn render_enforcement_is_idempotent(
        descriptor in descriptor_strategy(),
        roles in roles_strategy(),
        granted_role in proptest::sample::select(ROLES.to_vec()),
    ) {
        let policy = FieldPolicy::default();
        let table = grants(&[("field_target", granted_role, true)]);
        let user = editor(&roles);

        let once = policy.enforce_render(descriptor, &table, &user);
        let twice = policy.enforce_render(once.clone(), &table, &user);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn denied_writes_restore_distinct_stored_values(
        stored in "[a-m]{1,8}",
        submitted in "[n-z]{1,8}",
    ) {
        let policy = FieldPolicy::default();
        let table = grants(&[("field_target", "corporate", true)]);
        let target = field("field_target", "target", FieldKind::Text);

        let accepted = policy.enforce_write(
            &target,
            json!(submitted),
            &table,
            &editor(&["franchisee"]),
            || Some(json!(stored.clone())),
        );
        prop_assert_eq!(accepted, json!(stored));
    }

    #[test]
    fn repeater_reversion_restores_denied_column_only(
        stored_rows in proptest::collection::vec((0i64..1000, 0i64..1000), 1..6),
        offset in 1i64..1000,
    ) {
        let policy = FieldPolicy::default();
        let table = grants(&[("field_a", "corporate", true), ("field_b", "franchisee", true)]);

        let stored = Value::Array(
            stored_rows.iter().map(|(a, b)| json!({ "a": a, "b": b })).collect(),
        );
        let submitted = Value::Array(
            stored_rows
                .iter()
                .map(|(a, b)| json!({ "a": a + offset, "b": b + offset }))
                .collect(),
        );
        let expected = Value::Array(
            stored_rows
                .iter()
                .map(|(a, b)| json!({ "a": a, "b": b + offset }))
                .collect(),
        );

        let accepted = policy.enforce_write(
            &repeater(),
            submitted,
            &table,
            &editor(&["franchisee"]),
            || Some(stored),
        );
        prop_assert_eq!(accepted, expected);
    }
}
