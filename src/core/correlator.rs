use crate::core::body::ParagraphRecord;
use crate::core::comment_map::CommentMap;
use crate::ExtractedComment;

/// Page number of every body paragraph, computed in one forward pass.
///
/// A paragraph whose first run carries a page break starts a new page, so it
/// and every later paragraph count that break.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTable {
    pages: Vec<u32>,
}

impl PageTable {
    pub fn build(paragraphs: &[ParagraphRecord]) -> Self {
        let mut current_page = 1u32;
        let pages = paragraphs
            .iter()
            .map(|p| {
                if p.starts_with_page_break() {
                    current_page += 1;
                }
                current_page
            })
            .collect();
        Self { pages }
    }

    /// 1-based page of the paragraph at `index`. Indices past the end resolve
    /// to the last page reached.
    pub fn page_of(&self, index: usize) -> u32 {
        self.pages
            .get(index)
            .or_else(|| self.pages.last())
            .copied()
            .unwrap_or(1)
    }
}

/// Resolve every comment reference in the body against `comments`.
///
/// References to ids missing from the map are dropped without error; they
/// belong to comments whose definition was removed.
pub fn correlate(paragraphs: &[ParagraphRecord], comments: &CommentMap) -> Vec<ExtractedComment> {
    if comments.is_empty() {
        return Vec::new();
    }

    let pages = PageTable::build(paragraphs);
    let mut extracted = Vec::new();

    for (index, paragraph) in paragraphs.iter().enumerate() {
        for id in paragraph.runs.iter().filter_map(|r| r.comment_ref.as_deref()) {
            match comments.get(id) {
                Some(def) => extracted.push(ExtractedComment {
                    author: def.author.clone(),
                    text: def.body.clone(),
                    page: pages.page_of(index),
                    referenced_text: paragraph.text.clone(),
                }),
                None => log::debug!("dropping reference to unknown comment {}", id),
            }
        }
    }

    extracted
}
