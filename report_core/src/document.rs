//! # Report Document
//!
//! The assembled report as a tree: title block, then sections holding
//! content blocks and optional subsections. A [`ReportDocument`] is built once
//! by [`assemble`] and handed whole to a renderer.
//!
//! ## Structure
//!
//! ```text
//! ReportDocument
//! ├── Introduction                 narrative, data source, [figure], beam properties
//! ├── Analysis Data                table, key results
//! ├── Structural Analysis Diagrams
//! │   ├── Shear Force Diagram (SFD)    chart + min/max caption
//! │   └── Bending Moment Diagram (BMD) chart + max caption
//! └── Conclusion                   narrative, list of uses
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::dataset::BeamDataset;
use crate::format::{ChartSpec, Fragments, TableFragment};
use crate::loader::source_kind;
use crate::summary::SummaryStats;

/// Caption of the optional beam illustration
pub const FIGURE_CAPTION: &str = "Simply Supported Beam Configuration";

/// One unit of content inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Block {
    /// Plain narrative text
    Paragraph(String),

    /// Bold heading followed by one line per fact
    KeyFacts { heading: String, facts: Vec<String> },

    Table(TableFragment),

    /// External image with caption
    Figure { path: PathBuf, caption: String },

    Chart(ChartSpec),

    /// Bullet list
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<Block>,
    pub subsections: Vec<Section>,
}

impl Section {
    fn new(title: impl Into<String>) -> Self {
        Section {
            title: title.into(),
            blocks: Vec::new(),
            subsections: Vec::new(),
        }
    }

    fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Paragraph(text.into()));
        self
    }

    fn block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    fn subsection(mut self, section: Section) -> Self {
        self.subsections.push(section);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub sections: Vec<Section>,
}

impl ReportDocument {
    /// Every block in document order, including those of subsections
    pub fn blocks(&self) -> Vec<&Block> {
        fn walk<'a>(section: &'a Section, out: &mut Vec<&'a Block>) {
            out.extend(section.blocks.iter());
            for sub in &section.subsections {
                walk(sub, out);
            }
        }

        let mut out = Vec::new();
        for section in &self.sections {
            walk(section, &mut out);
        }
        out
    }

    /// Find a top-level section by title
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// Describe the data source as "the <kind> file: <name>".
fn data_source_sentence(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    match source_kind(input) {
        Some(kind) => format!("Analysis data has been imported from the {} file: {}", kind, name),
        None => format!("Analysis data has been imported from: {}", name),
    }
}

/// The illustration block, if the configured image exists right now.
fn figure_block(image_path: Option<&Path>) -> Option<Block> {
    let path = image_path?;
    if path.is_file() {
        Some(Block::Figure {
            path: path.to_path_buf(),
            caption: FIGURE_CAPTION.to_string(),
        })
    } else {
        tracing::debug!("Beam image {} not found, leaving it out", path.display());
        None
    }
}

/// Compose the report from the dataset, its statistics and the fragments.
pub fn assemble(
    dataset: &BeamDataset,
    stats: &SummaryStats,
    fragments: &Fragments,
    config: &ReportConfig,
) -> ReportDocument {
    let units = &config.units;

    let mut introduction = Section::new("Introduction")
        .paragraph(
            "This report presents the structural analysis of a simply supported beam. \
             The beam consists of a pinned support on the left end and a roller support on the right end, \
             allowing for horizontal movement while providing vertical support.",
        )
        .paragraph(
            "The analysis includes the complete shear force distribution and bending moment distribution \
             along the length of the beam.",
        )
        .block(Block::KeyFacts {
            heading: "Data Source:".to_string(),
            facts: vec![data_source_sentence(&config.input_path)],
        });

    if let Some(figure) = figure_block(config.image_path.as_deref()) {
        introduction = introduction.block(figure);
    }

    let introduction = introduction.block(Block::KeyFacts {
        heading: "Beam Properties:".to_string(),
        facts: vec![
            format!("Total Beam Length: {:.1} {}", stats.length, units.length),
            format!("Number of Analysis Points: {}", dataset.len()),
        ],
    });

    let analysis_data = Section::new("Analysis Data")
        .paragraph(
            "The following table shows the calculated shear force and bending moment values \
             at various positions along the beam:",
        )
        .block(Block::Table(fragments.table.clone()))
        .block(Block::KeyFacts {
            heading: "Key Analysis Results:".to_string(),
            facts: vec![
                format!("Maximum Shear Force: {:.2} {}", stats.max_abs_shear, units.force),
                format!("Maximum Bending Moment: {:.2} {}", stats.max_moment, units.moment),
                format!(
                    "Location of Maximum Moment: {:.2} {} from left support",
                    stats.max_moment_position, units.length
                ),
            ],
        });

    let shear = Section::new("Shear Force Diagram (SFD)")
        .paragraph(
            "The shear force diagram shows the variation of shear force along the length of the beam. \
             Shear force represents the internal force acting perpendicular to the beam axis.",
        )
        .block(Block::Chart(fragments.shear_chart.clone()))
        .paragraph(format!(
            "The shear force varies from {:.2} {} to {:.2} {} along the beam.",
            stats.min_shear, units.force, stats.max_shear, units.force
        ));

    let moment = Section::new("Bending Moment Diagram (BMD)")
        .paragraph(
            "The bending moment diagram shows the variation of bending moment along the length of the beam. \
             Bending moment represents the internal moment that causes the beam to bend.",
        )
        .block(Block::Chart(fragments.moment_chart.clone()))
        .paragraph(format!(
            "The maximum bending moment is {:.2} {}, occurring at {:.2} {} from the left support.",
            stats.max_moment, units.moment, stats.max_moment_position, units.length
        ));

    let diagrams = Section::new("Structural Analysis Diagrams")
        .subsection(shear)
        .subsection(moment);

    let conclusion = Section::new("Conclusion")
        .paragraph(
            "The structural analysis of the simply supported beam has been completed. \
             The shear force and bending moment diagrams provide essential information for:",
        )
        .block(Block::List(vec![
            "Determining critical sections for design".to_string(),
            "Calculating required beam dimensions".to_string(),
            "Selecting appropriate materials".to_string(),
            "Ensuring structural safety and stability".to_string(),
        ]))
        .paragraph("These results form the foundation for detailed structural design and verification.");

    ReportDocument {
        title: config.title.clone(),
        subtitle: config.subtitle.clone(),
        author: config.author.clone(),
        sections: vec![introduction, analysis_data, diagrams, conclusion],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::BeamRecord;
    use crate::summary::summarize;

    fn reference_document(config: &ReportConfig) -> ReportDocument {
        let dataset = BeamDataset::new(vec![
            BeamRecord::new(0.0, 0.0, 0.0),
            BeamRecord::new(5.0, 10.0, 25.0),
            BeamRecord::new(10.0, -10.0, 0.0),
        ])
        .unwrap();
        let stats = summarize(&dataset);
        let fragments = Fragments::build(&dataset, &config.units);
        assemble(&dataset, &stats, &fragments, config)
    }

    fn facts<'a>(section: &'a Section, heading: &str) -> &'a [String] {
        section
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::KeyFacts { heading: h, facts } if h == heading => Some(facts.as_slice()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_section_order() {
        let config = ReportConfig {
            image_path: None,
            ..ReportConfig::default()
        };
        let doc = reference_document(&config);

        let titles: Vec<&str> = doc.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Introduction", "Analysis Data", "Structural Analysis Diagrams", "Conclusion"]
        );

        let diagrams = doc.section("Structural Analysis Diagrams").unwrap();
        let subtitles: Vec<&str> = diagrams.subsections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(subtitles, vec!["Shear Force Diagram (SFD)", "Bending Moment Diagram (BMD)"]);
    }

    #[test]
    fn test_key_facts() {
        let doc = reference_document(&ReportConfig::default());

        let intro = doc.section("Introduction").unwrap();
        assert_eq!(
            facts(intro, "Beam Properties:"),
            ["Total Beam Length: 10.0 m", "Number of Analysis Points: 3"]
        );
        assert_eq!(
            facts(intro, "Data Source:"),
            ["Analysis data has been imported from the Excel file: Force.xlsx"]
        );

        let data = doc.section("Analysis Data").unwrap();
        assert_eq!(
            facts(data, "Key Analysis Results:"),
            [
                "Maximum Shear Force: 10.00 kN",
                "Maximum Bending Moment: 25.00 kN·m",
                "Location of Maximum Moment: 5.00 m from left support",
            ]
        );
    }

    #[test]
    fn test_diagram_captions() {
        let doc = reference_document(&ReportConfig::default());
        let diagrams = doc.section("Structural Analysis Diagrams").unwrap();

        assert_eq!(
            diagrams.subsections[0].blocks.last(),
            Some(&Block::Paragraph(
                "The shear force varies from -10.00 kN to 10.00 kN along the beam.".to_string()
            ))
        );
        assert_eq!(
            diagrams.subsections[1].blocks.last(),
            Some(&Block::Paragraph(
                "The maximum bending moment is 25.00 kN·m, occurring at 5.00 m from the left support."
                    .to_string()
            ))
        );
    }

    #[test]
    fn test_missing_image_skipped() {
        let config = ReportConfig {
            image_path: Some(PathBuf::from("/nonexistent/Beam.png")),
            ..ReportConfig::default()
        };
        let doc = reference_document(&config);
        assert!(!doc.blocks().iter().any(|b| matches!(b, Block::Figure { .. })));
    }

    #[test]
    fn test_existing_image_included() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("Beam.png");
        std::fs::write(&image, b"png").unwrap();

        let config = ReportConfig {
            image_path: Some(image.clone()),
            ..ReportConfig::default()
        };
        let doc = reference_document(&config);

        let intro = doc.section("Introduction").unwrap();
        assert!(intro.blocks.contains(&Block::Figure {
            path: image,
            caption: FIGURE_CAPTION.to_string(),
        }));
    }

    #[test]
    fn test_blocks_include_both_charts_and_table() {
        let doc = reference_document(&ReportConfig::default());
        let blocks = doc.blocks();
        assert_eq!(blocks.iter().filter(|b| matches!(b, Block::Chart(_))).count(), 2);
        assert_eq!(blocks.iter().filter(|b| matches!(b, Block::Table(_))).count(), 1);
        assert!(blocks.iter().any(|b| matches!(b, Block::List(items) if items.len() == 4)));
    }

    #[test]
    fn test_csv_source_sentence() {
        assert_eq!(
            data_source_sentence(Path::new("runs/beam.csv")),
            "Analysis data has been imported from the CSV file: beam.csv"
        );
        assert_eq!(
            data_source_sentence(Path::new("runs/beam.dat")),
            "Analysis data has been imported from: beam.dat"
        );
    }
}
