//! CSV and printable HTML renditions of a query result.

use chrono::NaiveDateTime;
use html_escape::encode_safe;
use serde::Serialize;

use crate::labels::{column_label, tag_label, Locale};
use crate::query::{FieldValue, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Html,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "html" => Some(ExportFormat::Html),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Html => "text/html; charset=utf-8",
        }
    }
}

/// Header labels and display cells, in schema column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub title: String,
    pub locale: Locale,
    pub generated_at: NaiveDateTime,
    pub auto_print: bool,
    pub show_generated_at: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub content: String,
    pub file_name: String,
    pub mime_type: &'static str,
    pub record_count: usize,
}

fn cell_text(value: FieldValue<'_>, labeled: bool, locale: Locale) -> String {
    let label = |tag: &str| -> String {
        if labeled {
            tag_label(locale, tag).to_string()
        } else {
            tag.to_string()
        }
    };
    match value {
        FieldValue::Text(s) => label(&*s),
        FieldValue::Number(Some(n)) => n.to_string(),
        FieldValue::Number(None) => String::new(),
        FieldValue::Tags(list) => list.into_iter().map(label).collect::<Vec<_>>().join(", "),
    }
}

pub fn table<R: Record>(rows: &[&R], locale: Locale) -> Table {
    let columns = R::schema().columns;
    Table {
        headers: columns
            .iter()
            .map(|c| column_label(locale, c.key).to_string())
            .collect(),
        rows: rows
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| cell_text(r.value(c.key), c.labeled, locale))
                    .collect()
            })
            .collect(),
    }
}

/// RFC 4180 field quoting.
pub fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn to_csv(table: &Table) -> String {
    let mut csv = String::new();
    for line in std::iter::once(&table.headers).chain(table.rows.iter()) {
        let fields: Vec<String> = line.iter().map(|f| csv_quote(f)).collect();
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }
    csv
}

const PRINT_CSS: &str = "\
body{font-family:Helvetica,Arial,sans-serif;font-size:12px;color:#1f2933;margin:24px;}\
header{border-bottom:2px solid #1f4e79;margin-bottom:16px;padding-bottom:8px;}\
h1{font-size:20px;margin:0 0 4px 0;color:#1f4e79;}\
.meta{color:#52606d;font-size:11px;}\
table{border-collapse:collapse;width:100%;}\
th,td{border:1px solid #cbd2d9;padding:4px 6px;text-align:left;}\
th{background:#e4e7eb;}\
tr:nth-child(even) td{background:#f5f7fa;}\
@media print{body{margin:0;}}";

fn record_count_text(locale: Locale, n: usize) -> String {
    match locale {
        Locale::Fr => format!("{} enregistrement{}", n, if n > 1 { "s" } else { "" }),
        Locale::En => format!("{} record{}", n, if n == 1 { "" } else { "s" }),
    }
}

fn generated_text(locale: Locale, at: NaiveDateTime) -> String {
    match locale {
        Locale::Fr => format!("Généré le {}", at.format("%d/%m/%Y à %H:%M")),
        Locale::En => format!("Generated on {}", at.format("%Y-%m-%d %H:%M")),
    }
}

pub fn to_html(table: &Table, opts: &ExportOptions) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!("<html lang=\"{}\">\n<head>\n", opts.locale.as_str()));
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", encode_safe(&opts.title)));
    html.push_str(&format!("<style>{}</style>\n", PRINT_CSS));
    html.push_str("</head>\n<body>\n<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", encode_safe(&opts.title)));
    html.push_str("<div class=\"meta\">");
    if opts.show_generated_at {
        html.push_str(&encode_safe(&generated_text(opts.locale, opts.generated_at)));
        html.push_str(" &middot; ");
    }
    html.push_str(&encode_safe(&record_count_text(opts.locale, table.rows.len())));
    html.push_str("</div>\n</header>\n<table>\n<thead><tr>");
    for h in &table.headers {
        html.push_str(&format!("<th>{}</th>", encode_safe(h)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", encode_safe(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    if opts.auto_print {
        html.push_str("<script>window.addEventListener('load',function(){window.print();});</script>\n");
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// `<prefix>-<entity>-<yyyymmdd-hhmm>.<ext>`
pub fn file_name(prefix: &str, entity: &str, at: NaiveDateTime, format: ExportFormat) -> String {
    let prefix = prefix.trim();
    let prefix = if prefix.is_empty() { "export" } else { prefix };
    format!(
        "{}-{}-{}.{}",
        prefix,
        entity,
        at.format("%Y%m%d-%H%M"),
        format.extension()
    )
}

/// Render the rows a query selected. Rows are exported in the order given.
pub fn render<R: Record>(
    rows: &[&R],
    format: ExportFormat,
    opts: &ExportOptions,
    file_prefix: &str,
) -> ExportDocument {
    let table = table(rows, opts.locale);
    let content = match format {
        ExportFormat::Csv => to_csv(&table),
        ExportFormat::Html => to_html(&table, opts),
    };
    ExportDocument {
        content,
        file_name: file_name(file_prefix, R::schema().entity, opts.generated_at, format),
        mime_type: format.mime_type(),
        record_count: rows.len(),
    }
}
