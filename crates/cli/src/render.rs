//! Report renderers. Each takes the assembled `Table` and returns the full
//! document; the caller decides where it goes.

use std::fmt::Write as _;

use modelmatch_recon::Table;

use crate::exit_codes::EXIT_ERROR;
use crate::CliError;

/// Intelligence column, sorted descending by default in the HTML view.
const DEFAULT_SORT_COLUMN: usize = 4;

pub struct RenderMeta<'a> {
    pub title: &'a str,
    pub generated_at: &'a str,
    /// Relative link to the HTML report, when one is written alongside.
    pub html_link: Option<&'a str>,
}

// ── Markdown ────────────────────────────────────────────────────────

pub fn markdown(table: &Table, meta: &RenderMeta) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", meta.title);
    let _ = writeln!(out, "Generated on: {}\n", meta.generated_at);
    if let Some(link) = meta.html_link {
        let _ = writeln!(out, "**[View Sortable HTML Report]({link})**\n");
    }

    let _ = writeln!(out, "{}", md_row(&table.headers));
    let rule: Vec<&str> = table.headers.iter().map(|_| "---").collect();
    let _ = writeln!(out, "|{}|", rule.join("|"));
    for row in &table.rows {
        let _ = writeln!(out, "{}", md_row(row));
    }

    out.push_str("\n*Note: Metrics are dynamically discovered from the benchmark leaderboard.*\n");
    out
}

fn md_row(cells: &[String]) -> String {
    let escaped: Vec<String> = cells.iter().map(|c| md_escape(c)).collect();
    format!("| {} |", escaped.join(" | "))
}

fn md_escape(cell: &str) -> String {
    cell.replace('|', "\\|").replace(|c: char| c == '\n' || c == '\r', " ")
}

// ── HTML ────────────────────────────────────────────────────────────

pub fn html(table: &Table, meta: &RenderMeta) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", html_escape(meta.title));
    out.push_str(concat!(
        "<link rel=\"stylesheet\" type=\"text/css\" href=\"https://cdn.datatables.net/1.13.6/css/jquery.dataTables.min.css\">\n",
        "<script src=\"https://code.jquery.com/jquery-3.7.0.js\"></script>\n",
        "<script src=\"https://cdn.datatables.net/1.13.6/js/jquery.dataTables.min.js\"></script>\n",
        "<style>\n",
        "  body { font-family: sans-serif; margin: 20px; }\n",
        "  h1 { color: #333; }\n",
        "  table.dataTable thead th { background-color: #f2f2f2; }\n",
        "</style>\n",
    ));
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{}</h1>", html_escape(meta.title));
    let _ = writeln!(out, "<p>Generated on: {}</p>", html_escape(meta.generated_at));

    out.push_str("<table id=\"reportTable\" class=\"display\">\n<thead>\n<tr>");
    for h in &table.headers {
        let _ = write!(out, "<th>{}</th>", html_escape(h));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", html_escape(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");

    let sort = if table.width() > DEFAULT_SORT_COLUMN { DEFAULT_SORT_COLUMN } else { 0 };
    let _ = write!(
        out,
        "<script>\n$(document).ready(function() {{\n  $('#reportTable').DataTable({{ \"pageLength\": 50, \"order\": [[{sort}, \"desc\"]] }});\n}});\n</script>\n"
    );
    out.push_str("</body>\n</html>\n");
    out
}

fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ── CSV ─────────────────────────────────────────────────────────────

pub fn csv(table: &Table) -> Result<Vec<u8>, CliError> {
    let csv_err = |e: csv::Error| CliError {
        code: EXIT_ERROR,
        message: format!("CSV write error: {e}"),
        hint: None,
    };
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(&table.headers).map_err(csv_err)?;
    for row in &table.rows {
        wtr.write_record(row).map_err(csv_err)?;
    }
    wtr.into_inner().map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("CSV flush error: {e}"),
        hint: None,
    })
}
