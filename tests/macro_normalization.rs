//! This module tests macro collapsing over instruction sequences the way
//! they appear inside lambda values and contract code sections.
#![cfg(test)]

use michelson_decoder::{
    macros::MacroRegistry,
    micheline::{Micheline, Prim},
};
use serde_json::json;

mod common;

fn normalize(code: &serde_json::Value) -> anyhow::Result<Micheline> {
    let code = common::micheline(code)?;
    Ok(MacroRegistry::standard().normalize(&code))
}

#[test]
fn collapses_the_long_set_car_window() -> anyhow::Result<()> {
    let normalized = normalize(&json!([
        { "prim": "DUP" },
        { "prim": "CAR", "annots": ["%owner"] },
        { "prim": "DROP" },
        { "prim": "CDR" },
        { "prim": "SWAP" },
        { "prim": "PAIR" },
    ]))?;

    let expected = Micheline::Seq(vec![Micheline::app_with_annots(
        Prim::SetCar,
        Vec::new(),
        vec!["%owner".to_owned()],
    )]);
    assert_eq!(normalized, expected);
    Ok(())
}

#[test]
fn collapses_the_short_set_car_window() -> anyhow::Result<()> {
    let normalized = normalize(&json!([
        { "prim": "CDR" },
        { "prim": "SWAP" },
        { "prim": "PAIR" },
    ]))?;

    assert_eq!(
        normalized,
        Micheline::Seq(vec![Micheline::prim(Prim::SetCar)])
    );
    Ok(())
}

#[test]
fn collapses_windows_inside_nested_code() -> anyhow::Result<()> {
    let normalized = normalize(&json!([
        { "prim": "DIP", "args": [[
            { "prim": "CDR" },
            { "prim": "SWAP" },
            { "prim": "PAIR" },
        ]]},
    ]))?;

    let expected = Micheline::Seq(vec![Micheline::app(
        Prim::Dip,
        vec![Micheline::Seq(vec![Micheline::prim(Prim::SetCar)])],
    )]);
    assert_eq!(normalized, expected);
    Ok(())
}

#[test]
fn fuses_comparison_chains_to_fixpoint() -> anyhow::Result<()> {
    let normalized = normalize(&json!([
        { "prim": "COMPARE" },
        { "prim": "EQ" },
        { "prim": "IF", "args": [
            [{ "prim": "UNIT" }],
            [{ "prim": "UNIT" }, { "prim": "FAILWITH" }],
        ]},
    ]))?;

    let elements = normalized.elements().unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].prim_tag(), Some(&Prim::IfCmpEq));
    // The failing else-branch collapses independently.
    let else_branch = &elements[0].args()[1];
    assert_eq!(
        else_branch,
        &Micheline::Seq(vec![Micheline::prim(Prim::Fail)])
    );
    Ok(())
}

#[test]
fn leaves_non_windows_untouched() -> anyhow::Result<()> {
    let code = json!([
        { "prim": "DUP" },
        { "prim": "CAR" },
        { "prim": "SWAP" },
    ]);

    let normalized = normalize(&code)?;

    assert_eq!(normalized, common::micheline(&code)?);
    Ok(())
}
