//! Typst markup generation.
//!
//! A [`ReportDocument`] becomes one Typst source file. Charts are drawn by a
//! small `line_chart` function defined in the preamble, fed with the
//! coordinate lists from the chart fragments. Images are referenced by
//! virtual file names; [`TypstSource::assets`] maps those names back to the
//! files on disk.

use std::path::PathBuf;

use crate::document::{Block, ReportDocument, Section};
use crate::format::{ChartSpec, SeriesColor, TableFragment};

/// Preamble shared by every report. `{{TITLE}}` and `{{AUTHOR}}` are string literals.
const PREAMBLE: &str = r##"
#set document(title: {{TITLE}}, author: {{AUTHOR}})
#set page(
  paper: "a4",
  margin: 1in,
  numbering: "1",
)
#set text(size: 11pt)
#set par(justify: true)
#set heading(numbering: "1.1")

#let line_chart(points, x_label: "", y_label: "", legend: "", color: blue, width: 12cm, height: 7cm, ticks: 4) = {
  let xs = points.map(p => float(p.at(0)))
  let ys = points.map(p => float(p.at(1)))
  let x_min = calc.min(..xs)
  let x_max = calc.max(..xs)
  let y_min = calc.min(0.0, ..ys)
  let y_max = calc.max(0.0, ..ys)
  let x_span = if x_max > x_min { x_max - x_min } else { 1.0 }
  let y_span = if y_max > y_min { y_max - y_min } else { 1.0 }
  let px(x) = (x - x_min) / x_span * width
  let py(y) = height - (y - y_min) / y_span * height
  let axis = 0.6pt + black
  let frame = 0.4pt + luma(180)
  let grid_line = 0.3pt + luma(215)

  let plot = box(width: width, height: height, stroke: frame, {
    for i in range(ticks + 1) {
      let xv = x_min + x_span * i / ticks
      let yv = y_min + y_span * i / ticks
      place(line(start: (px(xv), 0pt), end: (px(xv), height), stroke: grid_line))
      place(line(start: (0pt, py(yv)), end: (width, py(yv)), stroke: grid_line))
      place(top + left, dx: px(xv) - 15pt, dy: height + 3pt,
        box(width: 30pt, align(center, text(size: 7pt)[#calc.round(xv, digits: 2)])))
      place(top + left, dx: -33pt, dy: py(yv) - 4pt,
        box(width: 30pt, align(right, text(size: 7pt)[#calc.round(yv, digits: 2)])))
    }
    place(line(start: (0pt, py(0.0)), end: (width, py(0.0)), stroke: axis))
    if x_min <= 0.0 and 0.0 <= x_max {
      place(line(start: (px(0.0), 0pt), end: (px(0.0), height), stroke: axis))
    }
    for i in range(points.len() - 1) {
      place(line(
        start: (px(xs.at(i)), py(ys.at(i))),
        end: (px(xs.at(i + 1)), py(ys.at(i + 1))),
        stroke: 1.5pt + color,
      ))
    }
    place(top + right, dx: -4pt, dy: 4pt, box(fill: white, stroke: frame, inset: 4pt)[
      #box(width: 14pt, height: 1.5pt, fill: color) #h(3pt) #text(size: 9pt, legend)
    ])
  })

  align(center, grid(
    columns: 2,
    column-gutter: 38pt,
    row-gutter: 18pt,
    align(horizon, rotate(-90deg, reflow: true, text(size: 9pt, y_label))),
    plot,
    [],
    align(center, text(size: 9pt, x_label)),
  ))
}
"##;

/// Title block and outline. Fields are string literals.
const COVER: &str = r##"
#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 20pt, radius: 4pt)[
    #text(size: 22pt, weight: "bold", {{TITLE}})
    #v(6pt)
    #text(size: 15pt, {{SUBTITLE}})
    #v(10pt)
    #text(size: 11pt, {{AUTHOR}})
    #v(4pt)
    #text(size: 11pt)[#datetime.today().display("[month repr:long] [day], [year]")]
  ]
]

#v(24pt)

#outline()
"##;

/// An image the markup refers to by a virtual name.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Name used inside the markup, relative to the source file
    pub virtual_path: String,
    /// File on disk providing the bytes
    pub source: PathBuf,
}

/// Generated Typst source plus the images it references.
#[derive(Debug, Clone, PartialEq)]
pub struct TypstSource {
    pub text: String,
    pub assets: Vec<Asset>,
}

/// Escape special Typst characters in user-provided text
pub fn escape_typst(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, line) in s.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        escape_line(line, &mut out);
    }
    out
}

fn escape_line(line: &str, out: &mut String) {
    let body = line.trim_start();
    out.push_str(&line[..line.len() - body.len()]);

    // Heading, list and enum markers: start of line, followed by a space
    let spaced = |at: usize| body[at..].chars().next().map_or(true, char::is_whitespace);
    let marker_at = match body.bytes().position(|b| !b.is_ascii_digit()) {
        Some(0) if body.starts_with('=') => {
            let run = body.bytes().take_while(|&b| b == b'=').count();
            spaced(run).then_some(0)
        }
        Some(0) if body.starts_with(['-', '+']) && spaced(1) => Some(0),
        Some(n) if n > 0 && body[n..].starts_with('.') && spaced(n + 1) => Some(n),
        _ => None,
    };

    for (i, c) in body.char_indices() {
        let marker = marker_at == Some(i);
        match c {
            _ if marker => {
                out.push('\\');
                out.push(c);
            }
            '*' | '_' | '#' | '$' | '@' | '<' | '>' | '[' | ']' | '~' | '\\' | '`' | '/' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
}

/// Quote text as a Typst string literal
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A coordinate as a Typst float literal.
///
/// Integral values are written without a fraction by `f64`'s Display; Typst
/// would read those as integers, which overflow for very large magnitudes.
fn number_literal(value: &str) -> String {
    if value.contains('.') {
        value.to_string()
    } else {
        format!("{}.0", value)
    }
}

fn table_markup(table: &TableFragment) -> String {
    let header = table
        .headers
        .iter()
        .map(|h| format!("[*{}*]", escape_typst(h)))
        .collect::<Vec<_>>()
        .join(", ");

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .iter()
                .map(|c| format!("[{}]", escape_typst(c)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("  {},\n", cells)
        })
        .collect::<String>();

    format!(
        "#align(center, table(\n  columns: 3,\n  align: center,\n  inset: 6pt,\n  stroke: 0.5pt,\n  table.header({}),\n{}))\n\n",
        header, rows
    )
}

fn chart_markup(chart: &ChartSpec) -> String {
    let points = chart
        .series
        .points
        .iter()
        .map(|(x, y)| format!("({}, {})", number_literal(x), number_literal(y)))
        .collect::<Vec<_>>()
        .join(", ");

    let color = match chart.series.color {
        SeriesColor::Blue => "blue",
        SeriesColor::Red => "red",
    };

    format!(
        "#line_chart(\n  ({},),\n  x_label: {},\n  y_label: {},\n  legend: {},\n  color: {},\n)\n\n",
        points,
        string_literal(&chart.x_label),
        string_literal(&chart.y_label),
        string_literal(&chart.series.name),
        color
    )
}

struct Emitter {
    asset_prefix: String,
    text: String,
    assets: Vec<Asset>,
}

impl Emitter {
    fn block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(text) => {
                self.text.push_str(&escape_typst(text));
                self.text.push_str("\n\n");
            }
            Block::KeyFacts { heading, facts } => {
                self.text.push_str(&format!("*{}*", escape_typst(heading)));
                for fact in facts {
                    self.text.push_str(" \\\n");
                    self.text.push_str(&escape_typst(fact));
                }
                self.text.push_str("\n\n");
            }
            Block::Table(table) => self.text.push_str(&table_markup(table)),
            Block::Figure { path, caption } => {
                let extension = path
                    .extension()
                    .map(|e| e.to_string_lossy().to_lowercase())
                    .unwrap_or_else(|| "png".to_string());
                let virtual_path = format!("{}-figure-{}.{}", self.asset_prefix, self.assets.len() + 1, extension);

                self.text.push_str(&format!(
                    "#figure(\n  image({}, width: 80%),\n  caption: [{}],\n)\n\n",
                    string_literal(&virtual_path),
                    escape_typst(caption)
                ));
                self.assets.push(Asset {
                    virtual_path,
                    source: path.clone(),
                });
            }
            Block::Chart(chart) => self.text.push_str(&chart_markup(chart)),
            Block::List(items) => {
                for item in items {
                    self.text.push_str(&format!("- {}\n", escape_typst(item)));
                }
                self.text.push('\n');
            }
        }
    }

    fn section(&mut self, section: &Section, depth: usize) {
        if depth == 1 {
            self.text.push_str("#pagebreak()\n\n");
        }
        self.text
            .push_str(&format!("{} {}\n\n", "=".repeat(depth), escape_typst(&section.title)));
        for block in &section.blocks {
            self.block(block);
        }
        for (i, sub) in section.subsections.iter().enumerate() {
            if i > 0 {
                self.text.push_str("#v(1.5cm)\n\n");
            }
            self.section(sub, depth + 1);
        }
    }
}

/// Generate Typst markup for a document.
///
/// `asset_prefix` is prepended to virtual image names so that assets copied
/// next to a retained source file do not clash between reports.
pub fn to_typst(document: &ReportDocument, asset_prefix: &str) -> TypstSource {
    let preamble = PREAMBLE
        .replace("{{TITLE}}", &string_literal(&document.title))
        .replace("{{AUTHOR}}", &string_literal(&document.author));

    let cover = COVER
        .replace("{{TITLE}}", &string_literal(&document.title))
        .replace("{{SUBTITLE}}", &string_literal(&document.subtitle))
        .replace("{{AUTHOR}}", &string_literal(&document.author));

    let mut emitter = Emitter {
        asset_prefix: asset_prefix.to_string(),
        text: preamble + &cover,
        assets: Vec::new(),
    };
    emitter.text.push('\n');

    for section in &document.sections {
        emitter.section(section, 1);
    }

    TypstSource {
        text: emitter.text,
        assets: emitter.assets,
    }
}
