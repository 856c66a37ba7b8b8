use crate::core::body::read_body;
use crate::core::comment_map::CommentMap;
use crate::core::correlator::correlate;
use crate::core::package::DocxPackage;
use crate::ExtractedComment;
use anyhow::Result;
use std::path::Path;

pub trait CommentSource {
    /// Extract every resolvable reviewer comment from the document at `path`.
    fn extract<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ExtractedComment>>;
}

/// DocxCommentExtractor: reads `word/comments.xml` and `word/document.xml`
/// from a `.docx` package and correlates them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxCommentExtractor;

impl CommentSource for DocxCommentExtractor {
    fn extract<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ExtractedComment>> {
        let path = path.as_ref();

        // The package is dropped at the end of this block, before correlation.
        let (comments, paragraphs) = {
            let mut package = DocxPackage::open(path)?;
            let comments = CommentMap::load(&mut package)?;
            let paragraphs = read_body(&mut package)?;
            (comments, paragraphs)
        };

        let extracted = correlate(&paragraphs, &comments);
        log::debug!(
            "{}: {} comment definitions, {} paragraphs, {} extracted",
            path.display(),
            comments.len(),
            paragraphs.len(),
            extracted.len()
        );
        Ok(extracted)
    }
}
