//! Small HTML report builder used by the diagnostics pipeline.
//!
//! A `Report` is a titled list of `ReportSection`s, each holding free-form
//! maud content and inline Plotly figures, rendered to a single
//! self-contained HTML file.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

const REPORT_CSS: &str = "\
body { font-family: sans-serif; max-width: 960px; margin: 2em auto; color: #222; }\n\
header { border-bottom: 2px solid #446; padding-bottom: 1em; }\n\
header img { max-height: 64px; }\n\
p.version { color: #667; font-size: 0.9em; }\n\
section { margin-top: 2em; }\n\
section h2 { border-bottom: 1px solid #ccd; padding-bottom: 0.3em; }\n\
div.plot { margin: 1em 0; }\n\
footer { margin-top: 3em; color: #889; font-size: 0.8em; }\n";

enum Block {
    Content(Markup),
    Plot(Box<Plot>),
}

/// One titled section of a report.
pub struct ReportSection {
    title: String,
    blocks: Vec<Block>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            blocks: Vec::new(),
        }
    }

    /// Append free-form markup to the section.
    pub fn add_content(&mut self, content: Markup) {
        self.blocks.push(Block::Content(content));
    }

    /// Append a Plotly figure to the section.
    pub fn add_plot(&mut self, plot: Plot) {
        self.blocks.push(Block::Plot(Box::new(plot)));
    }
}

/// An HTML report assembled from sections.
pub struct Report {
    title: String,
    version: String,
    logo: Option<String>,
    description: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str, version: &str, logo: Option<&str>, description: &str) -> Self {
        Report {
            title: title.to_string(),
            version: version.to_string(),
            logo: logo.map(|l| l.to_string()),
            description: description.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    /// Render the full report as a standalone HTML document.
    pub fn to_html(&self) -> String {
        let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let markup = html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src="https://cdn.plot.ly/plotly-2.12.1.min.js" {}
                    style { (PreEscaped(REPORT_CSS)) }
                }
                body {
                    header {
                        @if let Some(logo) = &self.logo {
                            img src=(logo) alt="logo";
                        }
                        h1 { (self.title) }
                        p.version { "Version " (self.version) }
                        p { (self.description) }
                    }
                    @for (section_idx, section) in self.sections.iter().enumerate() {
                        section {
                            h2 { (section.title) }
                            @for (block_idx, block) in section.blocks.iter().enumerate() {
                                @match block {
                                    Block::Content(content) => {
                                        div.content { (content) }
                                    }
                                    Block::Plot(plot) => {
                                        div.plot {
                                            (PreEscaped(plot.to_inline_html(Some(&format!(
                                                "plot-{}-{}",
                                                section_idx, block_idx
                                            )))))
                                        }
                                    }
                                }
                            }
                        }
                    }
                    footer {
                        p { "Generated " (generated) }
                    }
                }
            }
        };
        markup.into_string()
    }

    /// Write the rendered report to disk.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(&path, self.to_html())
            .with_context(|| format!("Failed to write report: {}", path.as_ref().display()))?;
        log::info!("Report saved to {}", path.as_ref().display());
        Ok(())
    }
}
