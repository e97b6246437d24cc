//! Builders for small `.xlsx` fixtures, shared by the unit tests and the
//! CLI integration tests (`test-support` feature).

use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

/// Serialize rows into a minimal workbook. Numeric cells are stored inline,
/// text goes through the shared-string table and empty cells are omitted.
pub fn workbook_bytes(rows: &[Vec<&str>]) -> Vec<u8> {
    let mut shared: Vec<String> = Vec::new();
    let mut sheet_rows = String::new();

    for (r, row) in rows.iter().enumerate() {
        sheet_rows.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let reference = format!("{}{}", column_name(c), r + 1);
            if value.parse::<f64>().is_ok() {
                sheet_rows.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value));
            } else {
                let index = match shared.iter().position(|s| s == value) {
                    Some(index) => index,
                    None => {
                        shared.push(value.to_string());
                        shared.len() - 1
                    }
                };
                sheet_rows.push_str(&format!(
                    r#"<c r="{}" t="s"><v>{}</v></c>"#,
                    reference, index
                ));
            }
        }
        sheet_rows.push_str("</row>");
    }

    let strings: String = shared
        .iter()
        .map(|s| format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(s)))
        .collect();

    let parts = [
        (
            "xl/workbook.xml",
            format!(
                r#"<workbook xmlns="{}" xmlns:r="{}"><sheets><sheet name="Hoja1" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
                MAIN_NS, REL_NS
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#
                .to_string(),
        ),
        (
            "xl/sharedStrings.xml",
            format!(
                r#"<sst xmlns="{}" count="{}" uniqueCount="{}">{}</sst>"#,
                MAIN_NS,
                shared.len(),
                shared.len(),
                strings
            ),
        ),
        (
            "xl/worksheets/sheet1.xml",
            format!(
                r#"<worksheet xmlns="{}"><sheetData>{}</sheetData></worksheet>"#,
                MAIN_NS, sheet_rows
            ),
        ),
    ];

    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        for (name, content) in &parts {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    buf
}

/// Write a fixture workbook to disk.
pub fn write_workbook(path: &Path, rows: &[Vec<&str>]) {
    std::fs::write(path, workbook_bytes(rows)).unwrap();
}

/// A 13-column catalog row in source (shifted) layout.
pub fn source_row<'a>(id: &'a str, name: &'a str, muscle: &'a str, equipment: &'a str) -> Vec<&'a str> {
    vec![
        id, name, "", "", "60s", muscle, "Empuje", equipment, "3x8", "Subir carga", "", "", "",
    ]
}

#[test]
fn test_column_name() {
    assert_eq!(column_name(0), "A");
    assert_eq!(column_name(25), "Z");
    assert_eq!(column_name(26), "AA");
    assert_eq!(column_name(27), "AB");
}
