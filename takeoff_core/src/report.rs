//! # PDF Takeoff Report
//!
//! Renders a one-document quantity report with Typst: a title block, the
//! frame summary (grid, levels, member counts), the bill of quantities and
//! the totals. Data is injected into an embedded template by placeholder
//! replacement, then compiled in memory; the output is raw PDF bytes.
//!
//! Only the fonts bundled with `typst-assets` are used, so rendering needs no
//! files on disk.
//!
//! ## Example
//!
//! ```rust,no_run
//! use takeoff_core::report::render_takeoff_pdf;
//! use takeoff_core::session::TakeoffSession;
//!
//! let session = TakeoffSession::with_builtin();
//! let takeoff = session.compute();
//! let pdf = render_takeoff_pdf(session.params(), &takeoff, "J. Kim").unwrap();
//! std::fs::write("takeoff.pdf", pdf).unwrap();
//! ```

use chrono::{Datelike, Utc};
use tracing::debug;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{TakeoffError, TakeoffResult};
use crate::fmt::{format_display, format_optional, UNKNOWN};
use crate::params::FrameParams;
use crate::quantities::QuantityTable;
use crate::session::Takeoff;

/// In-memory Typst world: one detached source, bundled fonts, no files.
struct ReportWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl ReportWorld {
    fn new(source: String) -> Self {
        let fonts: Vec<Font> = typst_assets::fonts()
            .flat_map(|data| Font::iter(Bytes::new(data.to_vec())))
            .collect();
        let book = FontBook::from_fonts(&fonts);

        ReportWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for ReportWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

const TAKEOFF_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 20mm, bottom: 20mm, left: 18mm, right: 18mm),
  header: align(right)[
    #text(size: 8pt, fill: gray)[Steelgrid Quantity Takeoff]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 8pt)[{{PREPARED_BY}}]],
      align(center)[#text(size: 8pt)[Page #counter(page).display()]],
      align(right)[#text(size: 8pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "DejaVu Sans Mono", size: 9pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 16pt, weight: "bold")[Steel Quantity Takeoff]
    #v(4pt)
    #text(size: 12pt)[{{TITLE}}]
  ]
]

#v(10pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 16pt,
  [
    *Grid*
    #table(
      columns: (auto, 1fr),
      stroke: none,
      [X gridlines:], [{{NX}}],
      [X spans (mm):], [{{SPANS_X}}],
      [Y gridlines:], [{{NY}}],
      [Y spans (mm):], [{{SPANS_Y}}],
    )
  ],
  [
    *Levels*
    #table(
      columns: (auto, 1fr),
      stroke: none,
      [Elevations (mm):], [{{LEVELS}}],
      [Height (m):], [{{HEIGHT_M}}],
      [Members:], [{{MEMBER_COUNT}}],
    )
  ],
)

#v(10pt)

*Bill of Quantities*

#table(
  columns: (auto, 1fr, auto, auto, auto),
  align: (left, left, right, right, right),
  stroke: 0.5pt + gray,
  table.header([*Category*], [*Profile*], [*Count*], [*Length (m)*], [*Mass (kg)*]),
{{ROWS}}
  [*TOTAL*], [], [*{{TOTAL_COUNT}}*], [*{{TOTAL_LENGTH}}*], [*{{TOTAL_KG}}*],
)

#v(6pt)
#align(right)[Total mass: *{{TOTAL_T}} t*]

#v(10pt)
#text(size: 8pt, fill: gray)[Unit weights are nominal table values. "-" marks an unknown weight.]
"##;

/// Render the takeoff report to PDF bytes.
pub fn render_takeoff_pdf(params: &FrameParams, takeoff: &Takeoff, prepared_by: &str) -> TakeoffResult<Vec<u8>> {
    let grid = params.grid_spec();
    let levels = params.level_set();
    let table = &takeoff.table;

    let title = if params.title.trim().is_empty() {
        "Untitled frame"
    } else {
        params.title.as_str()
    };

    let join_mm = |values: &[f64]| -> String {
        if values.is_empty() {
            escape_typst(UNKNOWN)
        } else {
            values
                .iter()
                .map(|v| format_display(*v, 1))
                .collect::<Vec<_>>()
                .join(", ")
        }
    };

    let date = Utc::now().format("%Y-%m-%d").to_string();
    let values = [
        ("TITLE", escape_typst(title)),
        ("PREPARED_BY", escape_typst(prepared_by)),
        ("DATE", escape_typst(&date)),
        ("NX", grid.x.count.to_string()),
        ("NY", grid.y.count.to_string()),
        ("SPANS_X", join_mm(&grid.x.spans)),
        ("SPANS_Y", join_mm(&grid.y.spans)),
        ("LEVELS", join_mm(levels.elevations())),
        ("HEIGHT_M", format_display(levels.height() / 1000.0, 3)),
        ("MEMBER_COUNT", takeoff.members.len().to_string()),
        ("ROWS", build_rows(table)),
        ("TOTAL_COUNT", table.totals.count.to_string()),
        ("TOTAL_LENGTH", format_display(table.totals.length_m, 3)),
        ("TOTAL_KG", escape_typst(&format_optional(table.totals.mass_kg, 3))),
        ("TOTAL_T", escape_typst(&format_optional(table.totals.mass_t, 3))),
    ];
    let source = fill_template(TAKEOFF_TEMPLATE, &values);

    let world = ReportWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        TakeoffError::ReportFailed {
            reason: format!("Typst compilation failed: {}", msgs.join("; ")),
        }
    })?;

    let pdf = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        TakeoffError::ReportFailed {
            reason: format!("PDF rendering failed: {}", msgs.join("; ")),
        }
    })?;

    debug!(bytes = pdf.len(), rows = table.rows.len(), "Rendered takeoff report");
    Ok(pdf)
}

fn build_rows(table: &QuantityTable) -> String {
    table
        .rows
        .iter()
        .map(|r| {
            format!(
                "  [{}], [{}], [{}], [{}], [{}],",
                escape_typst(&r.category),
                escape_typst(&r.profile),
                r.count,
                format_display(r.length_m, 3),
                escape_typst(&format_optional(r.mass_kg, 3)),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace every `{{NAME}}` in `template` in one pass.
///
/// Inserted values are never rescanned, so user text containing `{{...}}`
/// stays literal. Unknown placeholders are kept as written.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 4]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

/// Escape Typst markup characters in user text placed inside `[...]`
fn escape_typst(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' | '~' | '/' | '-' | '+' | '=' | '{' | '}') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TakeoffSession;

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("H-200x200"), "H\\-200x200");
        assert_eq!(escape_typst("a*b_c#[x]"), "a\\*b\\_c\\#\\[x\\]");
        assert_eq!(escape_typst("{{ROWS}}"), "\\{\\{ROWS\\}\\}");
    }

    #[test]
    fn test_fill_template_single_pass() {
        let values = [
            ("TITLE", "Bay {{DATE}} {{ROWS}}".to_string()),
            ("DATE", "2026-10-16".to_string()),
            ("ROWS", "[row]".to_string()),
        ];
        let out = fill_template("{{TITLE}} | {{DATE}} | {{ROWS}} | {{OTHER}}", &values);
        assert_eq!(out, "Bay {{DATE}} {{ROWS}} | 2026-10-16 | [row] | {{OTHER}}");
        assert_eq!(fill_template("open {{TITLE", &values), "open {{TITLE");
    }

    #[test]
    fn test_rows_markup() {
        let session = TakeoffSession::with_builtin();
        let takeoff = session.compute();
        let rows = build_rows(&takeoff.table);
        assert!(rows.starts_with("  [COLUMN], [H\\-300x300x10x15], [9],"));
        assert_eq!(rows.lines().count(), takeoff.table.rows.len());
    }

    #[test]
    fn test_pdf_generation() {
        let mut session = TakeoffSession::with_builtin();
        session.update_params(|p| p.title = "Warehouse #2 [phase_1] {{ROWS}}".into());
        let takeoff = session.compute();

        let pdf = render_takeoff_pdf(session.params(), &takeoff, "Test Estimator");
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let bytes = pdf.unwrap();
        assert!(bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(bytes.len() > 1000, "PDF seems too small");
    }
}
