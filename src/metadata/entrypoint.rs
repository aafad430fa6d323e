//! This module contains the derived entrypoint view over a contract's
//! parameter type: the named leaves of the root `or` tree, each with the bin
//! path and parameter schema callers need to build invocations.

use serde::Serialize;
use serde_json::Value;

use crate::{
    constant::ROOT_PATH,
    micheline::{Micheline, Prim},
};

/// One callable entrypoint of a contract.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Entrypoint {
    /// The declared entrypoint name, or a positional `entrypoint_N`
    /// placeholder when the branch carries no annotation.
    pub name: String,

    /// The primitive of the entrypoint's parameter type.
    pub prim: Prim,

    /// The bin path of the branch within the parameter type tree.
    pub bin_path: String,

    /// Nested entrypoints, present when the branch is itself a named union.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Entrypoint>,

    /// The parameter type in its JSON wire form, for schema generation.
    pub parameter: Value,
}

/// Derives the entrypoints of a parameter type expression.
///
/// The root `or` tree is walked left to right; unnamed `or` nodes are
/// transparent branch points, while anything else (or a named `or`) is an
/// entrypoint. A parameter type with no `or` at the root yields the single
/// `default` entrypoint.
#[must_use]
pub fn entrypoints(parameter: &Micheline) -> Vec<Entrypoint> {
    let mut found = Vec::new();
    collect(super::unwrap_section(parameter), ROOT_PATH.to_owned(), &mut found);

    if found.len() == 1 && found[0].name.starts_with("entrypoint_") {
        found[0].name = "default".to_owned();
    }
    found
}

fn collect(node: &Micheline, path: String, out: &mut Vec<Entrypoint>) {
    if node.is_prim(&Prim::OrT) && node.field_annot().is_none() && node.args().len() == 2 {
        collect(&node.args()[0], format!("{path}/0"), out);
        collect(&node.args()[1], format!("{path}/1"), out);
        return;
    }

    let name = node
        .field_annot()
        .map_or_else(|| format!("entrypoint_{}", out.len()), str::to_owned);
    let prim = node
        .prim_tag()
        .cloned()
        .unwrap_or_else(|| Prim::Other(String::new()));

    // A named union is itself an entrypoint, with its branches nested.
    let mut args = Vec::new();
    if node.is_prim(&Prim::OrT) && node.args().len() == 2 {
        collect(&node.args()[0], format!("{path}/0"), &mut args);
        collect(&node.args()[1], format!("{path}/1"), &mut args);
    }

    out.push(Entrypoint {
        name,
        prim,
        bin_path: path,
        args,
        parameter: node.to_json(),
    });
}

/// Checks whether a parameter type contains a `contract` node anywhere,
/// marking the contract as a view-method candidate.
#[must_use]
pub fn has_view_method(parameter: &Micheline) -> bool {
    match parameter {
        Micheline::App { prim, args, .. } => {
            *prim == Prim::ContractT || args.iter().any(has_view_method)
        }
        Micheline::Seq(elements) => elements.iter().any(has_view_method),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{entrypoints, has_view_method};
    use crate::micheline::Micheline;

    #[test]
    fn derives_named_entrypoints() -> anyhow::Result<()> {
        let ty = Micheline::from_json(&json!({
            "prim": "or",
            "args": [
                { "prim": "nat", "annots": ["%deposit"] },
                { "prim": "pair", "annots": ["%withdraw"], "args": [
                    { "prim": "nat" }, { "prim": "address" }
                ]}
            ]
        }))?;

        let eps = entrypoints(&ty);
        assert_eq!(eps.len(), 2);
        assert_eq!(eps[0].name, "deposit");
        assert_eq!(eps[0].bin_path, "0/0");
        assert_eq!(eps[1].name, "withdraw");
        assert_eq!(eps[1].bin_path, "0/1");

        Ok(())
    }

    #[test]
    fn falls_back_to_a_single_default_entrypoint() -> anyhow::Result<()> {
        let ty = Micheline::from_json(&json!({ "prim": "nat" }))?;
        let eps = entrypoints(&ty);

        assert_eq!(eps.len(), 1);
        assert_eq!(eps[0].name, "default");
        assert_eq!(eps[0].bin_path, "0");

        Ok(())
    }

    #[test]
    fn detects_view_method_parameters() -> anyhow::Result<()> {
        let ty = Micheline::from_json(&json!({
            "prim": "pair",
            "args": [
                { "prim": "nat" },
                { "prim": "contract", "args": [{ "prim": "nat" }] }
            ]
        }))?;
        assert!(has_view_method(&ty));

        let plain = Micheline::from_json(&json!({ "prim": "nat" }))?;
        assert!(!has_view_method(&plain));

        Ok(())
    }
}
