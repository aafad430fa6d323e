//! This module tests display-tree decoding of parameters and the diffing of
//! consecutive storage snapshots.
#![cfg(test)]

use michelson_decoder::{
    display::{self, diff, DiffState},
    macros::MacroRegistry,
};
use serde_json::json;

mod common;

fn parameter_type() -> serde_json::Value {
    json!({
        "prim": "or",
        "args": [
            { "prim": "nat", "annots": ["%deposit"] },
            {
                "prim": "or",
                "args": [
                    {
                        "prim": "pair",
                        "annots": ["%withdraw"],
                        "args": [
                            { "prim": "nat", "annots": ["%amount"] },
                            { "prim": "address", "annots": ["%beneficiary"] },
                        ],
                    },
                    { "prim": "unit", "annots": ["%close"] },
                ],
            },
        ],
    })
}

#[test]
fn wrapped_parameters_decode_against_their_entrypoint_schema() -> anyhow::Result<()> {
    let metadata = common::metadata(&parameter_type())?;
    let registry = MacroRegistry::standard();
    let parameter = json!({
        "prim": "Right",
        "args": [{
            "prim": "Left",
            "args": [{
                "prim": "Pair",
                "args": [
                    { "int": "25" },
                    { "string": "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb" },
                ],
            }],
        }],
    });

    let tree = display::parameter_tree(&parameter, &metadata, &registry)?;

    assert_eq!(tree.name.as_deref(), Some("withdraw"));
    assert_eq!(tree.children.len(), 2);
    assert_eq!(tree.children[0].name.as_deref(), Some("amount"));
    assert_eq!(tree.children[0].value, Some(json!(25)));
    assert_eq!(tree.children[1].name.as_deref(), Some("beneficiary"));
    Ok(())
}

#[test]
fn entrypoint_objects_skip_the_selector_walk() -> anyhow::Result<()> {
    let metadata = common::metadata(&parameter_type())?;
    let registry = MacroRegistry::standard();
    let parameter = json!({
        "entrypoint": "close",
        "value": { "prim": "Unit" },
    });

    let tree = display::parameter_tree(&parameter, &metadata, &registry)?;

    assert_eq!(tree.name.as_deref(), Some("close"));
    assert_eq!(tree.value, None);
    Ok(())
}

#[test]
fn diffing_a_snapshot_against_itself_reports_nothing() -> anyhow::Result<()> {
    let metadata = common::metadata(&json!({
        "prim": "pair",
        "args": [
            {
                "prim": "map",
                "annots": ["%balances"],
                "args": [{ "prim": "string" }, { "prim": "nat" }],
            },
            { "prim": "nat", "annots": ["%total"] },
        ],
    }))?;
    let registry = MacroRegistry::standard();
    let value = common::micheline(&json!({
        "prim": "Pair",
        "args": [
            [{ "prim": "Elt", "args": [{ "string": "a" }, { "int": "1" }] }],
            { "int": "1" },
        ],
    }))?;

    let current = display::storage_tree(&value, &metadata, &registry)?;
    let previous = display::storage_tree(&value, &metadata, &registry)?;

    let compared = diff::compare(&current, Some(&previous));

    fn clean(node: &display::DisplayNode) -> bool {
        node.diff.is_none() && node.old_value.is_none() && node.children.iter().all(clean)
    }
    assert!(clean(&compared));
    Ok(())
}

#[test]
fn map_diffs_report_added_removed_and_unchanged_entries() -> anyhow::Result<()> {
    let metadata = common::metadata(&json!({
        "prim": "map",
        "args": [{ "prim": "string" }, { "prim": "nat" }],
    }))?;
    let registry = MacroRegistry::standard();
    let current = display::storage_tree(
        &common::micheline(&json!([
            { "prim": "Elt", "args": [{ "string": "a" }, { "int": "1" }] },
            { "prim": "Elt", "args": [{ "string": "c" }, { "int": "3" }] },
        ]))?,
        &metadata,
        &registry,
    )?;
    let previous = display::storage_tree(
        &common::micheline(&json!([
            { "prim": "Elt", "args": [{ "string": "a" }, { "int": "1" }] },
            { "prim": "Elt", "args": [{ "string": "b" }, { "int": "2" }] },
        ]))?,
        &metadata,
        &registry,
    )?;

    let compared = diff::compare(&current, Some(&previous));

    let state = |name: &str| {
        compared
            .children
            .iter()
            .find(|child| child.name.as_deref() == Some(name))
            .map(|child| child.diff)
    };
    assert_eq!(state("a"), Some(None));
    assert_eq!(state("c"), Some(Some(DiffState::Added)));
    assert_eq!(state("b"), Some(Some(DiffState::Removed)));
    Ok(())
}

#[test]
fn absent_previous_snapshots_mark_every_node_added() -> anyhow::Result<()> {
    let metadata = common::metadata(&json!({
        "prim": "pair",
        "args": [{ "prim": "nat" }, { "prim": "string" }],
    }))?;
    let registry = MacroRegistry::standard();
    let current = display::storage_tree(
        &common::micheline(&json!({
            "prim": "Pair",
            "args": [{ "int": "1" }, { "string": "x" }],
        }))?,
        &metadata,
        &registry,
    )?;

    let compared = diff::compare(&current, None);

    fn all_added(node: &display::DisplayNode) -> bool {
        node.diff == Some(DiffState::Added) && node.children.iter().all(all_added)
    }
    assert!(all_added(&compared));
    Ok(())
}

#[test]
fn changed_values_carry_the_previous_rendition() -> anyhow::Result<()> {
    let metadata = common::metadata(&json!({ "prim": "nat", "annots": ["%count"] }))?;
    let registry = MacroRegistry::standard();
    let current =
        display::storage_tree(&common::micheline(&json!({ "int": "5" }))?, &metadata, &registry)?;
    let previous =
        display::storage_tree(&common::micheline(&json!({ "int": "4" }))?, &metadata, &registry)?;

    let compared = diff::compare(&current, Some(&previous));

    assert_eq!(compared.diff, Some(DiffState::Changed));
    assert_eq!(compared.value, Some(json!(5)));
    assert_eq!(compared.old_value, Some(json!(4)));
    Ok(())
}
