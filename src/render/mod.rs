use anyhow::{Context, Result};

use crate::table::ReportTable;

/// Positional contract with the analyzer's output format: these two columns
/// carry special semantics and are addressed by index, not by header label.
pub const ADVISORY_COLUMN: usize = 6;
pub const SEVERITY_COLUMN: usize = 9;

const IBM_ADVISORY_URL: &str = "http://www-01.ibm.com/support/docview.wss?uid=isg1";
const NVD_CVE_URL: &str = "https://web.nvd.nist.gov/view/vuln/detail?vulnId=";

// Static page chrome. Downstream consumers diff these reports, so the markup
// (CDN pins, whitespace, tab indentation) must stay byte-identical.
const PAGE_HEAD: &str = r#"<!-- Latest compiled and minified CSS -->
        <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/bootstrap-table/1.8.1/bootstrap-table.min.css">

        <!-- Latest compiled and minified CSS -->
        <link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/bootstrap/3.3.5/css/bootstrap.min.css">
        "#;

const PAGE_FOOT: &str = r#"
        <!-- jQuery (necessary for Bootstrap's JavaScript plugins) -->
        <script src="https://ajax.googleapis.com/ajax/libs/jquery/2.1.0/jquery.min.js"></script>

        <!-- Latest compiled and minified JavaScript -->
        <script src="https://maxcdn.bootstrapcdn.com/bootstrap/3.3.5/js/bootstrap.min.js"></script>

        <!-- Latest compiled and minified JavaScript -->
        <script src="https://cdnjs.cloudflare.com/ajax/libs/bootstrap-table/1.8.1/bootstrap-table.min.js"></script>
        "#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityClass {
    Danger,
    Warning,
    Active,
}

impl SeverityClass {
    pub const fn css_class(self) -> &'static str {
        match self {
            SeverityClass::Danger => "bg-danger",
            SeverityClass::Warning => "bg-warning",
            SeverityClass::Active => "bg-active",
        }
    }
}

/// Map a severity cell to its styling class.
///
/// An empty cell is the default class. A non-empty cell must parse as a
/// float; anything else is a hard error, never a silent default.
pub fn classify_severity(cell: &str) -> Result<SeverityClass> {
    if cell.is_empty() {
        return Ok(SeverityClass::Active);
    }
    let score: f64 = cell
        .parse()
        .with_context(|| format!("severity cell is not a number: {cell:?}"))?;
    Ok(if score >= 8.0 {
        SeverityClass::Danger
    } else if score >= 5.0 {
        SeverityClass::Warning
    } else {
        SeverityClass::Active
    })
}

/// Render one data cell. The column rules are checked in this order, first
/// match wins: severity column, advisory column, embedded URL, YES/hiper
/// flag, plain text.
///
/// Cell content is passed through verbatim, unescaped; the analyzer owns the
/// text and the reference reports are consumed as-is.
fn render_cell(html: &mut String, index: usize, cell: &str) -> Result<()> {
    if index == SEVERITY_COLUMN {
        let class = classify_severity(cell)?;
        html.push_str(&format!(
            "\t\t\t<td class=\"{}\">{cell}</td>\n",
            class.css_class()
        ));
    } else if index == ADVISORY_COLUMN {
        if cell.contains("IV") {
            html.push_str(&format!(
                "\t\t\t<td><a href=\"{IBM_ADVISORY_URL}{cell}\"> {cell}</a></td>\n"
            ));
        } else if cell.contains("CVE") {
            html.push_str(&format!(
                "\t\t\t<td><a href=\"{NVD_CVE_URL}{cell}\"> {cell}</a></td>\n"
            ));
        }
        // Neither IV nor CVE: no <td> at all. The reference reports behave
        // this way and consumers rely on the byte-identical output.
    } else if cell.contains("://") {
        html.push_str(&format!("\t\t\t<td><a href=\"{cell}\"> link </a></td>\n"));
    } else if cell.contains("YES") || cell.contains("hiper") {
        html.push_str(&format!("\t\t\t<td class=\"bg-danger\">{cell}</td>\n"));
    } else {
        html.push_str(&format!("\t\t\t<td>{cell}</td>\n"));
    }
    Ok(())
}

/// Render a complete report document for one host.
pub fn render_report(hostname: &str, table: &ReportTable) -> Result<String> {
    let mut html = String::new();
    html.push_str(PAGE_HEAD);
    html.push_str(&format!("<title>{hostname}</title>\n"));
    html.push_str(
        "<table class = \"table table-sm table-striped table-bordered\" data-toggle = \"table\">\n",
    );

    if !table.is_empty() {
        html.push_str("\t<thead class = \"thead-inverse\">\n\t\t<tr>\n");
        for col in &table.header {
            html.push_str(&format!("\t\t\t<th data-sortable=\"true\">{col}</th>\n"));
        }
        html.push_str("\t\t</tr>\n\t</thead>\n");
        html.push_str("\t<tbody>\n");
    }

    for row in &table.rows {
        html.push_str("\t\t<tr>\n");
        for (index, cell) in row.iter().enumerate() {
            render_cell(&mut html, index, cell)?;
        }
        html.push_str("\t\t</tr>\n");
    }

    html.push_str("\t</tbody>\n");
    html.push_str("</table>\n");
    html.push_str(PAGE_FOOT);

    Ok(html)
}
