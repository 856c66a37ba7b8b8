use crate::core::package::{DocxPackage, DOCUMENT_PART};
use crate::W_NS;
use anyhow::Result;
use roxmltree::{Document, Node};

/// A run's markers relevant to comment extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunRecord {
    /// Id of the first `w:commentReference` inside the run.
    pub comment_ref: Option<String>,
    /// Whether the run holds a `w:br w:type="page"`.
    pub page_break: bool,
}

/// A body paragraph with its full text and its direct runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphRecord {
    pub text: String,
    pub runs: Vec<RunRecord>,
}

impl ParagraphRecord {
    pub fn starts_with_page_break(&self) -> bool {
        self.runs.first().map_or(false, |run| run.page_break)
    }
}

/// Read the body paragraphs of the package's main document part.
pub fn read_body(package: &mut DocxPackage) -> Result<Vec<ParagraphRecord>> {
    let xml = package.read_required_part(DOCUMENT_PART)?;
    parse_body(&xml)
}

pub fn parse_body(xml: &str) -> Result<Vec<ParagraphRecord>> {
    let doc = Document::parse(xml)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", DOCUMENT_PART, e))?;

    let Some(body) = doc
        .root_element()
        .children()
        .find(|n| n.has_tag_name((W_NS, "body")))
    else {
        anyhow::bail!("{} has no w:body element", DOCUMENT_PART);
    };

    // Only top-level paragraphs; table cells and content controls are not walked.
    let paragraphs: Vec<ParagraphRecord> = body
        .children()
        .filter(|n| n.has_tag_name((W_NS, "p")))
        .map(|p| ParagraphRecord {
            text: paragraph_text(p),
            runs: p
                .children()
                .filter(|n| n.has_tag_name((W_NS, "r")))
                .map(run_record)
                .collect(),
        })
        .collect();

    log::debug!("read {} body paragraphs", paragraphs.len());
    Ok(paragraphs)
}

fn run_record(run: Node) -> RunRecord {
    let comment_ref = run
        .descendants()
        .find(|n| n.has_tag_name((W_NS, "commentReference")))
        .and_then(|n| n.attribute((W_NS, "id")))
        .map(str::to_string);

    let page_break = run
        .children()
        .any(|n| n.has_tag_name((W_NS, "br")) && n.attribute((W_NS, "type")) == Some("page"));

    RunRecord {
        comment_ref,
        page_break,
    }
}

/// Text of a paragraph: its direct runs and the runs of its hyperlinks.
fn paragraph_text(p: Node) -> String {
    let mut text = String::new();
    for child in p.children().filter(|n| n.is_element()) {
        if child.has_tag_name((W_NS, "r")) {
            push_run_text(child, &mut text);
        } else if child.has_tag_name((W_NS, "hyperlink")) {
            for run in child.children().filter(|n| n.has_tag_name((W_NS, "r"))) {
                push_run_text(run, &mut text);
            }
        }
    }
    text
}

fn push_run_text(run: Node, out: &mut String) {
    for child in run.children().filter(|n| n.is_element()) {
        if child.tag_name().namespace() != Some(W_NS) {
            continue;
        }
        match child.tag_name().name() {
            "t" => out.push_str(child.text().unwrap_or("")),
            "tab" | "ptab" => out.push('\t'),
            "cr" => out.push('\n'),
            "br" => match child.attribute((W_NS, "type")) {
                None | Some("textWrapping") => out.push('\n'),
                _ => {}
            },
            "noBreakHyphen" => out.push('-'),
            _ => {}
        }
    }
}
