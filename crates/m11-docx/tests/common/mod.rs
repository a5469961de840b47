//! In-memory DOCX fixtures

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const IMAGE_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="CPTH1"><w:name w:val="01 Heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="CPTH2"><w:name w:val="02 Heading 2"/></w:style>
  <w:style w:type="paragraph" w:styleId="CPTH3"><w:name w:val="03 Heading 3"/></w:style>
  <w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/></w:style>
</w:styles>"#;

/// Builds `word/document.xml` body content and packages it as a DOCX
#[derive(Debug, Default)]
pub struct DocxFixture {
    body: String,
    images: Vec<(String, String, Vec<u8>)>,
}

impl DocxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(mut self, level: usize, text: &str) -> Self {
        self.body.push_str(&heading(level, text));
        self
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.body.push_str(&paragraph(text));
        self
    }

    pub fn bullet(mut self, text: &str) -> Self {
        self.body.push_str(&bullet(text));
        self
    }

    pub fn numbered(mut self, level: usize, text: &str) -> Self {
        self.body.push_str(&numbered(level, text));
        self
    }

    pub fn table(mut self, rows: &[&[&str]]) -> Self {
        self.body.push_str(&table(rows));
        self
    }

    pub fn raw(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    /// Add an image part and a paragraph embedding it
    pub fn image(mut self, rel_id: &str, target: &str, bytes: &[u8]) -> Self {
        self.body.push_str(&format!(
            r#"<w:p><w:r><w:drawing><a:graphic><a:graphicData><a:blip r:embed="{rel_id}"/></a:graphicData></a:graphic></w:drawing></w:r></w:p>"#
        ));
        self.images
            .push((rel_id.to_string(), target.to_string(), bytes.to_vec()));
        self
    }

    pub fn document_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}" xmlns:a="{A_NS}"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            self.body
        )
    }

    fn relationships_xml(&self) -> String {
        let entries: String = self
            .images
            .iter()
            .map(|(id, target, _)| {
                format!(r#"<Relationship Id="{id}" Type="{IMAGE_TYPE}" Target="{target}"/>"#)
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{entries}</Relationships>"#
        )
    }

    /// Package as DOCX bytes
    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options: FileOptions<()> = FileOptions::default();

        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(self.document_xml().as_bytes()).unwrap();
        zip.start_file("word/styles.xml", options).unwrap();
        zip.write_all(STYLES.as_bytes()).unwrap();
        zip.start_file("word/_rels/document.xml.rels", options).unwrap();
        zip.write_all(self.relationships_xml().as_bytes()).unwrap();
        for (_, target, bytes) in &self.images {
            zip.start_file(format!("word/{target}"), options).unwrap();
            zip.write_all(bytes).unwrap();
        }

        zip.finish().unwrap().into_inner()
    }
}

pub fn heading(level: usize, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="CPTH{level}"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
    )
}

pub fn paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

pub fn bullet(text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="ListBullet"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
    )
}

pub fn numbered(level: usize, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="{level}"/><w:numId w:val="2"/></w:numPr></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
    )
}

pub fn table(rows: &[&[&str]]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells
                .iter()
                .map(|text| format!("<w:tc><w:tcPr/>{}</w:tc>", paragraph(text)))
                .collect();
            format!("<w:tr>{cells}</w:tr>")
        })
        .collect();
    format!("<w:tbl><w:tblPr/>{rows}</w:tbl>")
}

/// A title page table, as found before the first heading of an M11 protocol
pub fn title_page_table() -> String {
    table(&[
        &["Full Title", "A Phase 3 Study of Examplumab in Adults"],
        &["Sponsor Protocol Identifier", "EX-301"],
        &["Version Number", "2.0"],
        &["Trial Phase", "Phase 3"],
        &["Sponsor Name and Address", "Example Pharma Ltd"],
    ])
}
