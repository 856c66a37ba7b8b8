//! Builds small `.docx` packages for integration tests.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

#[derive(Default)]
pub struct DocxBuilder {
    paragraphs: Vec<String>,
    comments: Vec<(String, String, String)>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.paragraphs
            .push(format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", text));
        self
    }

    /// A paragraph whose text is followed by a reference to comment `id`.
    pub fn commented(mut self, text: &str, id: &str) -> Self {
        self.paragraphs.push(format!(
            "<w:p><w:commentRangeStart w:id=\"{id}\"/><w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r>\
             <w:commentRangeEnd w:id=\"{id}\"/><w:r><w:rPr><w:rStyle w:val=\"CommentReference\"/></w:rPr>\
             <w:commentReference w:id=\"{id}\"/></w:r></w:p>"
        ));
        self
    }

    /// A paragraph that opens with a page break, optionally referencing a comment.
    pub fn page_break(mut self, text: &str, id: Option<&str>) -> Self {
        let reference = id
            .map(|id| format!("<w:r><w:commentReference w:id=\"{}\"/></w:r>", id))
            .unwrap_or_default();
        self.paragraphs.push(format!(
            "<w:p><w:r><w:br w:type=\"page\"/></w:r><w:r><w:t>{}</w:t></w:r>{}</w:p>",
            text, reference
        ));
        self
    }

    pub fn comment(mut self, id: &str, author: &str, text: &str) -> Self {
        self.comments
            .push((id.to_string(), author.to_string(), text.to_string()));
        self
    }

    fn document_xml(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"{}\"><w:body>{}<w:sectPr/></w:body></w:document>",
            W_NS,
            self.paragraphs.concat()
        )
    }

    fn comments_xml(&self) -> String {
        let body: String = self
            .comments
            .iter()
            .map(|(id, author, text)| {
                format!(
                    "<w:comment w:id=\"{}\" w:author=\"{}\" w:date=\"2024-01-01T00:00:00Z\" w:initials=\"X\">\
                     <w:p><w:r><w:annotationRef/></w:r><w:r><w:t>{}</w:t></w:r></w:p></w:comment>",
                    id, author, text
                )
            })
            .collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:comments xmlns:w=\"{}\">{}</w:comments>",
            W_NS, body
        )
    }

    /// Write the package to `dir/name`. The comments part is only included
    /// when at least one comment was added.
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        let options = FileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
              <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
              <Default Extension=\"xml\" ContentType=\"application/xml\"/></Types>",
        )
        .unwrap();

        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(self.document_xml().as_bytes()).unwrap();

        if !self.comments.is_empty() {
            zip.start_file("word/comments.xml", options).unwrap();
            zip.write_all(self.comments_xml().as_bytes()).unwrap();
        }

        zip.finish().unwrap();
        path
    }
}

/// Read every cell of the first sheet back as strings.
pub fn read_sheet(path: &Path) -> Vec<Vec<String>> {
    use calamine::{open_workbook, Reader, Xlsx};

    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range("Sheet").unwrap();
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}
