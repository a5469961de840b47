//! Recoverable irregularities are logged, not returned
//!
//! Installs a capturing logger, so this file holds a single test.

mod common;

use common::DocxFixture;
use log::{Level, LevelFilter, Log, Metadata, Record};
use m11_core::{ContentItem, ListEntry};
use m11_docx::DocxConverter;
use std::sync::Mutex;

struct CapturingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};

fn captured() -> Vec<(Level, String)> {
    std::mem::take(&mut *LOGGER.records.lock().unwrap())
}

#[test]
fn test_degraded_conversion_logs_warnings() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Warn);

    // Level 0 straight to level 2
    let fixture = DocxFixture::new()
        .heading(1, "Procedures")
        .numbered(0, "Visit 1")
        .numbered(2, "Deep step")
        .raw("<w:bookmarkStart w:id=\"0\" w:name=\"_Toc1\"/>")
        .raw("<w:tbl><w:customXml/><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>");
    let conversion = DocxConverter::default()
        .convert_bytes(&fixture.build())
        .unwrap();

    let section = &conversion.document.numbered_sections()[0];
    let ContentItem::List(list) = &section.items[0] else {
        panic!("expected list, got {:?}", section.items[0]);
    };
    assert_eq!(list.item_count(), 2);
    let ListEntry::List(level1) = &list.items[1] else {
        panic!("expected nested level 1 list");
    };
    assert!(matches!(&level1.items[0], ListEntry::List(level2) if level2.level == 2));

    let records = captured();
    assert!(records
        .iter()
        .any(|(level, msg)| *level == Level::Warn && msg.contains("List level jump from 0 to 2")));
    assert!(records
        .iter()
        .any(|(level, msg)| *level == Level::Warn && msg.contains("bookmarkStart")));
    assert!(records
        .iter()
        .any(|(level, msg)| *level == Level::Warn && msg.contains("<customXml> while reading <w:tr>")));

    // A heading two levels below its parent has no sibling to hang from
    let fixture = DocxFixture::new()
        .heading(1, "Design")
        .heading(3, "Orphan")
        .heading(1, "Population");
    let conversion = DocxConverter::default()
        .convert_bytes(&fixture.build())
        .unwrap();
    assert_eq!(conversion.document.numbered_sections().len(), 3);
    let narrative = conversion.narrative();
    assert_eq!(narrative.len(), 2);

    let records = captured();
    assert!(records
        .iter()
        .any(|(level, msg)| *level == Level::Error && msg.contains("has no parent")));
}
