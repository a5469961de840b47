//! Integration tests for DOCX conversion

mod common;

use common::{paragraph, title_page_table, DocxFixture};
use m11_core::{ContentItem, ConversionOptions, ListEntry, TitlePageField, DEFAULT_NOT_FOUND};
use m11_docx::{DocxConverter, DocxError};
use std::io::Cursor;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn convert(fixture: &DocxFixture) -> m11_docx::Conversion {
    init_logging();
    DocxConverter::default()
        .convert_bytes(&fixture.build())
        .expect("Failed to convert fixture")
}

fn protocol() -> DocxFixture {
    DocxFixture::new()
        .raw(&title_page_table())
        .heading(1, "Protocol Summary")
        .heading(2, "Synopsis")
        .paragraph("Randomised, double-blind")
        .heading(3, "Primary Objective")
        .bullet("Safety")
        .bullet("Tolerability")
        .heading(2, "Schema")
        .heading(1, "Introduction")
        .paragraph("Background")
}

#[test]
fn test_sections_numbered_from_headings() {
    let conversion = convert(&protocol());
    let numbers: Vec<_> = conversion
        .document
        .numbered_sections()
        .iter()
        .map(|s| (s.number.as_deref().unwrap(), s.title.as_deref().unwrap()))
        .collect();
    assert_eq!(
        numbers,
        vec![
            ("1", "Protocol Summary"),
            ("1.1", "Synopsis"),
            ("1.1.1", "Primary Objective"),
            ("1.2", "Schema"),
            ("2", "Introduction"),
        ]
    );
}

#[test]
fn test_title_page_fields() {
    let conversion = convert(&protocol());
    let page = conversion.title_page();
    assert_eq!(
        page.get(TitlePageField::FullTitle),
        "A Phase 3 Study of Examplumab in Adults"
    );
    assert_eq!(page.get(TitlePageField::SponsorProtocolIdentifier), "EX-301");
    assert_eq!(page.get(TitlePageField::TrialPhase), "Phase 3");
    assert_eq!(page.get(TitlePageField::TrialAcronym), DEFAULT_NOT_FOUND);
    assert_eq!(
        conversion.title_page_extractor().lookup("Nonexistent Field"),
        DEFAULT_NOT_FOUND
    );
}

#[test]
fn test_title_page_rows_inside_content_controls() {
    let cell = |text: &str| format!("<w:tc>{}</w:tc>", paragraph(text));
    let table = format!(
        "<w:tbl><w:tblPr/><w:tblGrid/><w:tr>{}{}</w:tr>\
         <w:sdt><w:sdtPr/><w:sdtContent><w:tr>{}{}</w:tr></w:sdtContent></w:sdt>\
         <w:tr>{}<w:sdt><w:sdtContent>{}</w:sdtContent></w:sdt></w:tr></w:tbl>",
        cell("Full Title"),
        cell("A Study"),
        cell("Trial Phase"),
        cell("Phase 2"),
        cell("Short Title"),
        cell("Short"),
    );
    let conversion = convert(&DocxFixture::new().raw(&table).heading(1, "Introduction"));

    let page = conversion.title_page();
    assert_eq!(page.get(TitlePageField::FullTitle), "A Study");
    assert_eq!(page.get(TitlePageField::TrialPhase), "Phase 2");
    assert_eq!(page.get(TitlePageField::ShortTitle), "Short");
    assert_eq!(conversion.title_page_extractor().lookup("Short Title"), "Short");
}

#[test]
fn test_custom_not_found_sentinel() {
    let options = ConversionOptions::default().with_not_found("n/a");
    let conversion = DocxConverter::new(options)
        .convert_bytes(&protocol().build())
        .unwrap();
    assert_eq!(conversion.title_page().get(TitlePageField::ShortTitle), "n/a");
}

#[test]
fn test_narrative_links() {
    let conversion = convert(&protocol());
    let narrative = conversion.narrative();
    assert_eq!(narrative.len(), 5);

    let summary = narrative.by_section_number("1").unwrap();
    let synopsis = narrative.by_section_number("1.1").unwrap();
    let objective = narrative.by_section_number("1.1.1").unwrap();
    let schema = narrative.by_section_number("1.2").unwrap();
    let intro = narrative.by_section_number("2").unwrap();

    assert_eq!(narrative.root.child_ids, vec![summary.id.clone(), intro.id.clone()]);
    assert_eq!(summary.child_ids, vec![synopsis.id.clone(), schema.id.clone()]);
    assert_eq!(synopsis.child_ids, vec![objective.id.clone()]);

    let order: Vec<_> = narrative
        .chain()
        .filter_map(|n| n.section_number.as_deref())
        .collect();
    assert_eq!(order, vec!["1", "1.1", "1.1.1", "1.2", "2"]);

    assert_eq!(
        objective.text,
        "<h3>1.1.1 Primary Objective</h3>\n<ul><li>Safety</li><li>Tolerability</li></ul>"
    );
}

#[test]
fn test_narrative_json_shape() {
    let json = convert(&protocol()).narrative().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let first = &value["nodes"][0];
    assert_eq!(first["sectionNumber"], "1");
    assert!(first["previousId"].is_null());
    assert_eq!(first["nextId"], value["nodes"][1]["id"]);
}

#[test]
fn test_numbered_list_levels() {
    let fixture = DocxFixture::new()
        .heading(1, "Procedures")
        .numbered(0, "Screening")
        .numbered(1, "Consent")
        .numbered(1, "Eligibility")
        .numbered(0, "Treatment");
    let conversion = convert(&fixture);
    let section = &conversion.document.numbered_sections()[0];
    assert_eq!(section.items.len(), 1);
    let ContentItem::List(list) = &section.items[0] else {
        panic!("expected list, got {:?}", section.items[0]);
    };
    assert_eq!(list.item_count(), 4);
    assert!(matches!(&list.items[1], ListEntry::List(nested) if nested.item_count() == 2));
}

#[test]
fn test_content_controls_and_spans() {
    let sdt = format!(
        "<w:sdt><w:sdtPr/><w:sdtContent>{}</w:sdtContent></w:sdt>",
        paragraph("Inside a content control")
    );
    let spanned = r#"<w:tbl><w:tr><w:tc><w:tcPr><w:gridSpan w:val="3"/></w:tcPr><w:p><w:r><w:t>Schedule</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#;
    let fixture = DocxFixture::new()
        .heading(1, "Schedule of Activities")
        .raw(&sdt)
        .raw(spanned);
    let conversion = convert(&fixture);
    let section = &conversion.document.numbered_sections()[0];
    assert!(matches!(&section.items[0], ContentItem::Paragraph(p) if p.text == "Inside a content control"));
    let ContentItem::Table(table) = &section.items[1] else {
        panic!("expected table");
    };
    assert_eq!(table.rows[0].cells[0].col_span, 3);
    assert!(conversion
        .to_html()
        .contains("<td colspan=\"3\"><p>Schedule</p></td>"));
}

#[test]
fn test_nested_table_rejected() {
    let inner = common::table(&[&["inner"]]);
    let outer = format!("<w:tbl><w:tr><w:tc>{}{inner}</w:tc></w:tr></w:tbl>", paragraph("outer"));
    let fixture = DocxFixture::new().heading(1, "Design").raw(&outer);

    let err = DocxConverter::default()
        .convert_bytes(&fixture.build())
        .unwrap_err();
    assert!(err.is_structural());
    assert!(matches!(err, DocxError::Model(_)));
    assert_eq!(err.to_string(), "Table within table detected in section 1");
}

#[test]
fn test_images_kept_in_archive_without_directory() {
    let fixture = DocxFixture::new()
        .heading(1, "Schema")
        .image("rId10", "media/image1.png", b"png-bytes");
    let conversion = convert(&fixture);
    assert_eq!(conversion.images.len(), 1);
    let section = &conversion.document.numbered_sections()[0];
    let ContentItem::Image(image) = &section.items[0] else {
        panic!("expected image, got {:?}", section.items[0]);
    };
    assert_eq!(image.path, std::path::PathBuf::from("word/media/image1.png"));
}

#[test]
fn test_images_extracted_and_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let options = ConversionOptions::default().with_image_dir(dir.path().join("images"));
    let fixture = DocxFixture::new()
        .heading(1, "Schema")
        .image("rId10", "media/image1.png", b"abc");

    let conversion = DocxConverter::new(options)
        .convert_bytes(&fixture.build())
        .unwrap();
    let extracted = dir.path().join("images").join("image1.png");
    assert_eq!(std::fs::read(&extracted).unwrap(), b"abc");

    let node = conversion.narrative().nodes[0].clone();
    assert_eq!(
        node.text,
        "<h1>1 Schema</h1>\n<img alt=\"image1.png\" src=\"data:image/png;base64,YWJj\"/>"
    );
}

#[test]
fn test_convert_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, &protocol().build()).unwrap();
    let conversion = DocxConverter::default().convert_file(file.path()).unwrap();
    assert_eq!(conversion.document.numbered_sections().len(), 5);
}

#[test]
fn test_missing_document_part() {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options: zip::write::FileOptions<()> = zip::write::FileOptions::default();
    zip.start_file("docProps/core.xml", options).unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    let err = DocxConverter::default().convert_bytes(&bytes).unwrap_err();
    assert!(matches!(err, DocxError::MissingFile(ref part) if part == "word/document.xml"));
    assert!(!err.is_structural());
}

#[test]
fn test_not_a_zip() {
    let err = DocxConverter::default()
        .convert_bytes(b"plain text, not a package")
        .unwrap_err();
    assert!(matches!(err, DocxError::Zip(_)));
}
