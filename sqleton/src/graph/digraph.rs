//! DOT document serializer
//!
//! The document is written in three passes: the preamble with graph, node and
//! edge defaults, then one node statement per table, then one edge statement
//! per foreign key. Every node is declared before the first edge.

use std::borrow::Cow;
use std::io::Write;

use crate::config::RenderOptions;
use crate::error::Result;
use crate::graph::label::label;
use crate::graph::markup::{attr_list, bold, escape_quoted, Markup};
use crate::schema::types::{DatabaseSchema, ForeignKey, Table};

/// Write the complete document for `schema` to `out`
pub fn write_digraph<W>(out: &mut W, schema: &DatabaseSchema, options: &RenderOptions) -> Result<()>
where
    W: Write + ?Sized,
{
    out.write_all(preamble(schema, options).as_bytes())?;

    for table in &schema.tables {
        writeln!(out, "  {}", node_statement(table, options))?;
    }

    for table in &schema.tables {
        for fk in &table.foreign_keys {
            writeln!(out, "  {}", edge_statement(table, fk, options))?;
        }
    }

    writeln!(out, "}}")?;
    out.flush()?;

    tracing::debug!(
        nodes = schema.tables.len(),
        edges = schema.foreign_key_count(),
        "Wrote digraph"
    );

    Ok(())
}

/// Graph header followed by graph, node and edge default attributes
pub fn preamble(schema: &DatabaseSchema, options: &RenderOptions) -> String {
    let font = options.font();
    let title = bold(Markup::text(options.title_or(&schema.file_name)), &[]);

    let graph = [
        ("rankdir", options.direction.as_str()),
        ("ranksep", "0.8"),
        ("nodesep", "0.6"),
        ("overlap", "false"),
        ("sep", "+16.0"),
        ("splines", "compound"),
        ("concentrate", "true"),
        ("pad", "0.4,0.4"),
        ("fontname", font),
        ("fontsize", "12"),
        ("label", title.as_str()),
    ];

    let node = [
        ("shape", "Mrecord"),
        ("fontsize", "12"),
        ("fontname", font),
        ("margin", "0.07,0.04"),
        ("penwidth", "1.0"),
    ];

    let edge = [
        ("arrowsize", "0.8"),
        ("fontsize", "10"),
        ("style", "solid"),
        ("penwidth", "0.9"),
        ("fontname", font),
        ("labelangle", "33"),
        ("labeldistance", "2.0"),
    ];

    format!(
        "digraph {} {{\n{};\n  node[{}];\n  edge[{}];\n",
        id(&schema.name),
        attr_list(&graph, ";\n", "  "),
        attr_list(&node, ", ", ""),
        attr_list(&edge, ", ", ""),
    )
}

/// `name [label=<...>];`
pub fn node_statement(table: &Table, options: &RenderOptions) -> String {
    let label = label(table, options);

    format!(
        "{} [{}];",
        id(&table.name),
        attr_list(&[("label", label.as_str())], ", ", "")
    )
}

/// `name -> target[...];`, with tail and head labels when edge labels are on
pub fn edge_statement(table: &Table, fk: &ForeignKey, options: &RenderOptions) -> String {
    let labels = if options.edge_labels {
        vec![
            ("taillabel", fk.column.as_deref().unwrap_or("")),
            ("headlabel", fk.ref_column.as_deref().unwrap_or("")),
        ]
    } else {
        Vec::new()
    };

    format!(
        "{} -> {}[{}];",
        id(&table.name),
        id(&fk.ref_table),
        attr_list(&labels, ", ", "")
    )
}

const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// A DOT identifier: bare when it is a plain name that is not a keyword,
/// double-quoted otherwise
fn id(name: &str) -> Cow<'_, str> {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    let keyword = KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(name));

    if plain && !keyword {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", escape_quoted(name)))
    }
}
