use crate::CommentRow;
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub const HEADER: [&str; 5] = [
    "File Name",
    "Comment Author",
    "Comment Text",
    "Page Number",
    "Referenced Text",
];

pub const SHEET_NAME: &str = "Sheet";

const SHEET_PART: &str = "xl/worksheets/sheet1.xml";
const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/><family val="2"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Writes extracted comment rows to a destination file.
pub trait RowWriter {
    fn write_rows<P: AsRef<Path>>(&self, out_path: P, rows: &[CommentRow]) -> Result<()>;
}

/// Single-sheet `.xlsx` writer. Output bytes depend only on the rows.
pub struct XlsxWriter;

impl RowWriter for XlsxWriter {
    fn write_rows<P: AsRef<Path>>(&self, out_path: P, rows: &[CommentRow]) -> Result<()> {
        let out_path = out_path.as_ref();
        let bytes = self.to_bytes(rows)?;
        std::fs::write(out_path, bytes)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {}", out_path.display(), e))?;
        log::info!("wrote {} rows to {}", rows.len(), out_path.display());
        Ok(())
    }
}

impl XlsxWriter {
    pub fn to_bytes(&self, rows: &[CommentRow]) -> Result<Vec<u8>> {
        let workbook_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
            SPREADSHEET_NS, SHEET_NAME
        );
        let sheet_xml = sheet_xml(rows)?;

        let parts: [(&str, &[u8]); 6] = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
            ("_rels/.rels", ROOT_RELS_XML.as_bytes()),
            ("xl/workbook.xml", workbook_xml.as_bytes()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.as_bytes()),
            ("xl/styles.xml", STYLES_XML.as_bytes()),
            (SHEET_PART, &sheet_xml),
        ];

        // Fixed timestamps keep repeated runs byte-identical.
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in parts {
            zip.start_file(name, options)?;
            zip.write_all(body)?;
        }
        Ok(zip.finish()?.into_inner())
    }
}

enum Cell<'a> {
    Text(&'a str),
    Number(u32),
}

fn sheet_xml(rows: &[CommentRow]) -> Result<Vec<u8>> {
    let mut writer = quick_xml::Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut worksheet = BytesStart::new("worksheet");
    worksheet.push_attribute(("xmlns", SPREADSHEET_NS));
    writer.write_event(Event::Start(worksheet))?;

    let last_row = rows.len() + 1;
    let dimension_ref = format!("A1:{}", cell_ref(HEADER.len() - 1, last_row));
    let mut dimension = BytesStart::new("dimension");
    dimension.push_attribute(("ref", dimension_ref.as_str()));
    writer.write_event(Event::Empty(dimension))?;

    writer.write_event(Event::Start(BytesStart::new("sheetData")))?;

    let header: Vec<Cell> = HEADER.iter().map(|h| Cell::Text(*h)).collect();
    write_row(&mut writer, 1, &header)?;

    for (i, row) in rows.iter().enumerate() {
        let cells = [
            Cell::Text(&row.file_name),
            Cell::Text(&row.author),
            Cell::Text(&row.text),
            Cell::Number(row.page),
            Cell::Text(&row.referenced_text),
        ];
        write_row(&mut writer, i + 2, &cells)?;
    }

    writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
    writer.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(writer.into_inner())
}

fn write_row(writer: &mut quick_xml::Writer<Vec<u8>>, row_number: usize, cells: &[Cell]) -> Result<()> {
    let row_attr = row_number.to_string();
    let mut row = BytesStart::new("row");
    row.push_attribute(("r", row_attr.as_str()));
    writer.write_event(Event::Start(row))?;

    for (col, cell) in cells.iter().enumerate() {
        let reference = cell_ref(col, row_number);
        let mut c = BytesStart::new("c");
        c.push_attribute(("r", reference.as_str()));

        match cell {
            Cell::Text(text) => {
                c.push_attribute(("t", "inlineStr"));
                writer.write_event(Event::Start(c))?;
                writer.write_event(Event::Start(BytesStart::new("is")))?;

                let mut t = BytesStart::new("t");
                t.push_attribute(("xml:space", "preserve"));
                writer.write_event(Event::Start(t))?;
                let clean = strip_illegal_xml_chars(text);
                writer.write_event(Event::Text(BytesText::new(&clean)))?;
                writer.write_event(Event::End(BytesEnd::new("t")))?;

                writer.write_event(Event::End(BytesEnd::new("is")))?;
            }
            Cell::Number(value) => {
                writer.write_event(Event::Start(c))?;
                writer.write_event(Event::Start(BytesStart::new("v")))?;
                writer.write_event(Event::Text(BytesText::new(&value.to_string())))?;
                writer.write_event(Event::End(BytesEnd::new("v")))?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new("c")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("row")))?;
    Ok(())
}

/// A1-style reference for a zero-based column and one-based row.
fn cell_ref(col: usize, row: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    format!("{}{}", String::from_utf8_lossy(&letters), row)
}

/// Drop characters XML 1.0 cannot carry (control characters other than tab,
/// newline and carriage return, plus U+FFFE and U+FFFF).
fn strip_illegal_xml_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| match c {
            '\t' | '\n' | '\r' => true,
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => false,
            _ => true,
        })
        .collect()
}
