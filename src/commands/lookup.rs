//! `schedb lookup`: print the Schedule B hierarchy under an HS code.

use std::io::Write;

use tracing::info;

use super::write_err;
use crate::context::ServiceContext;
use crate::schedule::{format_code, Row, ScheduleTree};

/// Looks up `code` and prints the tree with its default expansion.
///
/// # Errors
///
/// Returns an error if the lookup fails or output cannot be written.
pub async fn run<W: Write>(ctx: &ServiceContext, code: &str, writer: &mut W) -> Result<(), String> {
    let response =
        ctx.schedule.find(code.trim()).await.map_err(|e| format!("Lookup failed: {e}"))?;
    let tree = ScheduleTree::from_response(response);
    info!(code, nodes = tree.len(), "schedule b lookup complete");

    if tree.is_empty() {
        writeln!(writer, "No Schedule B entries found for {}.", code.trim()).map_err(write_err)?;
        return Ok(());
    }
    write_rows(writer, &tree, &tree.visible_rows(), false)
}

/// Writes `rows`, indented by depth, optionally numbered from 1.
///
/// Collapsed nodes with children are marked `+`, expanded ones `-`.
pub(crate) fn write_rows<W: Write>(
    writer: &mut W,
    tree: &ScheduleTree,
    rows: &[Row],
    numbered: bool,
) -> Result<(), String> {
    for (n, row) in rows.iter().enumerate() {
        let Some(node) = tree.get(row.index) else {
            continue;
        };
        let marker = match (node.has_children(), node.is_expanded()) {
            (false, _) => ' ',
            (true, false) => '+',
            (true, true) => '-',
        };
        let code = node.code.as_deref().map(format_code).unwrap_or_default();
        let indent = "  ".repeat(row.depth);
        let select = if node.is_leaf() { " *" } else { "" };

        if numbered {
            write!(writer, "{:>4}. ", n + 1).map_err(write_err)?;
        }
        writeln!(writer, "{indent}{marker} {code} {}{select}", node.label()).map_err(write_err)?;
    }
    Ok(())
}
