//! This module contains the Micheline → Michelson pretty-printer used for
//! lambda bodies, compound map keys and unpacked expressions.

use itertools::Itertools;

use crate::{constant::DEFAULT_LINE_SIZE, micheline::Micheline};

/// Pretty-prints a Micheline expression as Michelson source.
///
/// When `inline` is set, or when the rendered form fits within `line_size`
/// columns, the expression is emitted on a single line; otherwise sequences
/// and argument lists are broken across indented lines.
#[must_use]
pub fn format(node: &Micheline, inline: bool, line_size: usize) -> String {
    render(node, 0, true, inline, line_size)
}

/// Pretty-prints with the default line budget.
#[must_use]
pub fn format_default(node: &Micheline) -> String {
    format(node, false, DEFAULT_LINE_SIZE)
}

fn render(node: &Micheline, indent: usize, is_root: bool, inline: bool, line_size: usize) -> String {
    let flat = render_inline(node, is_root);
    if inline || indent + flat.len() <= line_size {
        return flat;
    }

    match node {
        Micheline::Seq(elements) if !elements.is_empty() => {
            let inner_indent = indent + 2;
            let body = elements
                .iter()
                .map(|e| render(e, inner_indent, true, false, line_size))
                .join(&format!(" ;\n{}", " ".repeat(inner_indent)));
            format!("{{ {body} }}")
        }
        Micheline::App { prim, args, annots } if !args.is_empty() => {
            let mut head = prim.as_str().to_owned();
            for annot in annots {
                head.push(' ');
                head.push_str(annot);
            }
            let inner_indent = indent + 2;
            let rendered_args = args
                .iter()
                .map(|a| render(a, inner_indent, false, false, line_size))
                .join(&format!("\n{}", " ".repeat(inner_indent)));
            let body = format!("{head}\n{}{rendered_args}", " ".repeat(inner_indent));
            if is_root {
                body
            } else {
                format!("({body})")
            }
        }
        _ => flat,
    }
}

fn render_inline(node: &Micheline, is_root: bool) -> String {
    match node {
        Micheline::Int(value) => value.to_string(),
        Micheline::String(value) => format!("{value:?}"),
        Micheline::Bytes(value) => format!("0x{value}"),
        Micheline::Seq(elements) => {
            if elements.is_empty() {
                "{}".to_owned()
            } else {
                let body = elements.iter().map(|e| render_inline(e, true)).join(" ; ");
                format!("{{ {body} }}")
            }
        }
        Micheline::App { prim, args, annots } => {
            let mut out = prim.as_str().to_owned();
            for annot in annots {
                out.push(' ');
                out.push_str(annot);
            }
            for arg in args {
                out.push(' ');
                out.push_str(&render_inline(arg, false));
            }
            let needs_parens = !is_root && (!args.is_empty() || !annots.is_empty());
            if needs_parens {
                format!("({out})")
            } else {
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{format, format_default};
    use crate::micheline::Micheline;

    fn parse(value: serde_json::Value) -> Micheline {
        Micheline::from_json(&value).unwrap()
    }

    #[test]
    fn renders_scalars_and_applications_inline() {
        let node = parse(json!({
            "prim": "Pair",
            "args": [{ "int": "1" }, { "string": "tz" }]
        }));
        assert_eq!(format_default(&node), "Pair 1 \"tz\"");
    }

    #[test]
    fn parenthesizes_nested_applications() {
        let node = parse(json!({
            "prim": "pair",
            "args": [
                { "prim": "option", "args": [{ "prim": "nat" }] },
                { "prim": "int" }
            ]
        }));
        assert_eq!(format_default(&node), "pair (option nat) int");
    }

    #[test]
    fn breaks_long_sequences_across_lines() {
        let node = parse(json!([
            { "prim": "DUP" }, { "prim": "SWAP" }, { "prim": "DROP" }
        ]));
        let rendered = format(&node, false, 10);
        assert!(rendered.contains('\n'));
        assert!(rendered.starts_with("{ DUP ;"));
    }

    #[test]
    fn inline_flag_wins_over_line_budget() {
        let node = parse(json!([
            { "prim": "DUP" }, { "prim": "SWAP" }, { "prim": "DROP" }
        ]));
        assert_eq!(format(&node, true, 10), "{ DUP ; SWAP ; DROP }");
    }
}
