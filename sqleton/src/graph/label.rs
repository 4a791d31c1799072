//! Node labels for tables
//!
//! A label is two HTML-like tables separated by a record field divider: a
//! header with the table name, and a body listing columns and then indexes.

use crate::config::RenderOptions;
use crate::graph::markup::{bold, table, td, tr, Markup};
use crate::schema::types::{Column, Index, Table};

const PRIMARY_KEY_MARKER: &str = "*";

/// Build the full label for `table`
pub fn label(t: &Table, options: &RenderOptions) -> Markup {
    head(t).push(Markup::text("|")).push(body(t, options))
}

/// The header: the table name in bold at a larger size
pub fn head(t: &Table) -> Markup {
    let name = bold(Markup::text(&t.name), &[("point-size", "13")]);
    let cell = td(name, &[("height", "24"), ("valign", "bottom")]);

    table(vec![tr(vec![cell])], &[])
}

/// One row per column, followed by one row per index unless indexes are skipped
pub fn body(t: &Table, options: &RenderOptions) -> Markup {
    let columns = t.columns.iter().map(column_row);
    let indexes = t
        .indexes
        .iter()
        .filter(|_| !options.skip_index)
        .map(index_row);

    table(columns.chain(indexes).collect(), &[("width", "134")])
}

fn column_row(column: &Column) -> Markup {
    let marker = if column.primary_key {
        format!("{} ", PRIMARY_KEY_MARKER)
    } else {
        " ".to_string()
    };

    let content = Markup::text(&column.name)
        .push(Markup::text(&marker))
        .push(bold(Markup::text(&type_name(column)), &[]));

    tr(vec![td(content, &[])])
}

// Columns without a declared type still get a (blank) type cell.
fn type_name(column: &Column) -> String {
    if column.data_type.is_empty() {
        " ".to_string()
    } else {
        column.data_type.to_lowercase()
    }
}

fn index_row(index: &Index) -> Markup {
    let modifiers = index_modifiers(index);
    let mut content = Markup::text(&index.name).push(Markup::text(" "));

    if !modifiers.is_empty() {
        content = content
            .push(Markup::text("("))
            .push(bold(Markup::text(&modifiers), &[]))
            .push(Markup::text(")"));
    }

    tr(vec![td(content, &[])])
}

fn index_modifiers(index: &Index) -> String {
    let mut modifiers = Vec::new();
    if index.is_unique {
        modifiers.push("uniq");
    }
    if index.is_partial {
        modifiers.push("partial");
    }
    modifiers.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn users() -> Table {
        let mut users = Table::new("users");
        users.add_column(Column::new("id", "INTEGER").primary_key(true));
        users.add_column(Column::new("name", "TEXT"));
        users
    }

    #[test]
    fn header_holds_bold_table_name() {
        assert_eq!(
            head(&users()).as_str(),
            concat!(
                r#"<table border="0" cellspacing="0.5"><tr>"#,
                r#"<td align="left" height="24" valign="bottom">"#,
                r#"<font point-size="13"><b>users</b></font>"#,
                r#"</td></tr></table>"#
            )
        );
    }

    #[test]
    fn columns_render_in_order_with_primary_key_marker() {
        let options = RenderOptions {
            skip_index: true,
            ..Default::default()
        };

        assert_eq!(
            body(&users(), &options).as_str(),
            concat!(
                r#"<table border="0" cellspacing="0.5" width="134">"#,
                r#"<tr><td align="left">id* <font><b>integer</b></font></td></tr>"#,
                r#"<tr><td align="left">name <font><b>text</b></font></td></tr>"#,
                r#"</table>"#
            )
        );
    }

    #[test]
    fn untyped_column_gets_blank_type() {
        let mut t = Table::new("kv");
        t.add_column(Column::new("value", ""));

        let body = body(&t, &RenderOptions::default());
        assert!(body.as_str().contains("value <font><b> </b></font>"));
    }

    #[test]
    fn index_rows_follow_columns_with_modifiers() {
        let mut t = users();
        t.add_index(Index::new("users_name", false, false));
        t.add_index(Index::new("users_email", true, false));
        t.add_index(Index::new("users_active", true, true));
        t.add_index(Index::new("users_recent", false, true));

        let body = body(&t, &RenderOptions::default()).into_string();

        let rows: Vec<&str> = body
            .split("<tr>")
            .skip(1)
            .map(|row| row.trim_end_matches("</table>"))
            .collect();
        assert_eq!(
            rows,
            vec![
                r#"<td align="left">id* <font><b>integer</b></font></td></tr>"#,
                r#"<td align="left">name <font><b>text</b></font></td></tr>"#,
                r#"<td align="left">users_name </td></tr>"#,
                r#"<td align="left">users_email (<font><b>uniq</b></font>)</td></tr>"#,
                r#"<td align="left">users_active (<font><b>uniq, partial</b></font>)</td></tr>"#,
                r#"<td align="left">users_recent (<font><b>partial</b></font>)</td></tr>"#,
            ]
        );
    }

    #[test]
    fn skip_index_hides_index_rows() {
        let mut t = users();
        t.add_index(Index::new("users_name", true, false));

        let options = RenderOptions {
            skip_index: true,
            ..Default::default()
        };

        assert!(!label(&t, &options).as_str().contains("users_name"));
        assert!(label(&t, &RenderOptions::default())
            .as_str()
            .contains("users_name"));
    }

    #[test]
    fn label_joins_head_and_body() {
        let options = RenderOptions::default();
        let t = users();

        let expected = format!("{}|{}", head(&t), body(&t, &options));
        assert_eq!(label(&t, &options).into_string(), expected);
    }

    #[test]
    fn label_is_deterministic() {
        let options = RenderOptions::default();
        assert_eq!(label(&users(), &options), label(&users(), &options));
    }

    #[test]
    fn names_are_escaped() {
        let mut t = Table::new("a&b");
        t.add_column(Column::new("x<y", "VARCHAR(10)"));

        let rendered = label(&t, &RenderOptions::default()).into_string();
        assert!(rendered.contains("<b>a&amp;b</b>"));
        assert!(rendered.contains("x&lt;y <font><b>varchar(10)</b></font>"));
    }
}
