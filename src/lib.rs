pub mod core {
    pub mod body;
    pub mod comment_map;
    pub mod correlator;
    pub mod extractor;
    pub mod package;
    pub mod workbook;
}

pub mod utils {
    pub mod batch_processor;
    pub mod worker;
}

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::extractor::{CommentSource, DocxCommentExtractor};

/// WordprocessingML main namespace.
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentDefinition {
    pub id: String,
    pub author: String,
    pub body: String,
}

/// A reviewer comment resolved against the paragraph it is attached to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedComment {
    pub author: String,
    pub text: String,
    pub page: u32,
    pub referenced_text: String,
}

/// One data row of the output spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentRow {
    pub file_name: String,
    pub author: String,
    pub text: String,
    pub page: u32,
    pub referenced_text: String,
}

impl CommentRow {
    pub fn new(file_name: impl Into<String>, comment: ExtractedComment) -> Self {
        Self {
            file_name: file_name.into(),
            author: comment.author,
            text: comment.text,
            page: comment.page,
            referenced_text: comment.referenced_text,
        }
    }
}

/// Extract reviewer comments from a `.docx` file.
///
/// Fails when the file cannot be opened or is not a readable Open XML package.
/// A document without comments yields an empty list.
pub fn extract_comments_from_docx<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ExtractedComment>> {
    DocxCommentExtractor.extract(path)
}
