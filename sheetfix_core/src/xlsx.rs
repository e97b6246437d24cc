//! Spreadsheet reader for `.xlsx` workbooks.
//!
//! Reads the zip archive directly: the shared-string table, the workbook
//! manifest to locate the first worksheet, and that worksheet's rows. Only
//! cell text is extracted; styles, formulas and number formats are ignored.

use crate::{Error, RawRow, Result};
use roxmltree::{Document, Node};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const DEFAULT_SHEET: &str = "xl/worksheets/sheet1.xml";
const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Rows of the first worksheet
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetData {
    /// First row of the sheet
    pub header: RawRow,
    /// Remaining rows in sheet order, all-empty rows removed
    pub rows: Vec<RawRow>,
}

/// Open a workbook on disk and read its first worksheet.
pub fn read_workbook(path: &Path) -> Result<SheetData> {
    let location = path.display().to_string();
    let file = File::open(path)
        .map_err(|e| Error::format(&location, format!("cannot open workbook: {}", e)))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| Error::format(&location, format!("not a valid xlsx archive: {}", e)))?;

    let sheet = read_archive(&mut archive)?;
    tracing::info!(
        "Read {} data rows ({} header columns) from {:?}",
        sheet.rows.len(),
        sheet.header.len(),
        path
    );
    Ok(sheet)
}

/// Read the first worksheet from an already opened archive.
pub fn read_archive<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<SheetData> {
    let shared = match read_part(archive, SHARED_STRINGS)? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => {
            tracing::debug!("Workbook has no shared-string table");
            Vec::new()
        }
    };
    tracing::debug!("Loaded {} shared strings", shared.len());

    let sheet_part = first_sheet_part(archive)?;
    let xml = read_part(archive, &sheet_part)?
        .ok_or_else(|| Error::format(&sheet_part, "worksheet part is missing"))?;

    parse_sheet(&sheet_part, &xml, &shared)
}

/// Read an archive entry as text; `None` when the entry does not exist.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| Error::format(name, format!("cannot read part: {}", e)))?;
    Ok(Some(xml))
}

fn parse_xml<'a>(part: &str, xml: &'a str) -> Result<Document<'a>> {
    Document::parse(xml).map_err(|e| Error::format(part, format!("invalid XML: {}", e)))
}

fn is(node: &Node, local_name: &str) -> bool {
    node.is_element() && node.tag_name().name() == local_name
}

// ============================================================================
// Shared Strings
// ============================================================================

/// Parse `xl/sharedStrings.xml` into an index-ordered table.
pub fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let doc = parse_xml(SHARED_STRINGS, xml)?;
    let root = doc.root_element();
    if !is(&root, "sst") {
        return Err(Error::format(
            SHARED_STRINGS,
            format!("unexpected root element <{}>", root.tag_name().name()),
        ));
    }

    Ok(root
        .children()
        .filter(|n| is(n, "si"))
        .map(string_item_text)
        .collect())
}

/// Text of an `<si>` or `<is>` item: plain `<t>` plus every rich-text run.
/// Phonetic runs (`<rPh>`) are not part of the cell text.
fn string_item_text(item: Node) -> String {
    let mut text = String::new();
    for child in item.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "t" => text.push_str(child.text().unwrap_or("")),
            "r" => {
                for run in child.children().filter(|n| is(n, "t")) {
                    text.push_str(run.text().unwrap_or(""));
                }
            }
            _ => {}
        }
    }
    text
}

// ============================================================================
// Worksheet Location
// ============================================================================

/// Archive path of the first worksheet declared by the workbook.
fn first_sheet_part<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
    let Some(workbook) = read_part(archive, WORKBOOK)? else {
        tracing::debug!("No {} in archive, assuming {}", WORKBOOK, DEFAULT_SHEET);
        return Ok(DEFAULT_SHEET.to_string());
    };

    let doc = parse_xml(WORKBOOK, &workbook)?;
    let relationship_id = doc
        .descendants()
        .find(|n| is(n, "sheet"))
        .and_then(|sheet| sheet.attribute((RELATIONSHIPS_NS, "id")))
        .map(str::to_string)
        .ok_or_else(|| Error::format(WORKBOOK, "workbook declares no worksheets"))?;

    let Some(rels) = read_part(archive, WORKBOOK_RELS)? else {
        tracing::debug!("No {} in archive, assuming {}", WORKBOOK_RELS, DEFAULT_SHEET);
        return Ok(DEFAULT_SHEET.to_string());
    };

    let doc = parse_xml(WORKBOOK_RELS, &rels)?;
    let target = doc
        .descendants()
        .filter(|n| is(n, "Relationship"))
        .find(|n| n.attribute("Id") == Some(relationship_id.as_str()))
        .and_then(|n| n.attribute("Target"))
        .ok_or_else(|| {
            Error::format(
                WORKBOOK_RELS,
                format!("no relationship with id {}", relationship_id),
            )
        })?;

    let part = resolve_target(target);
    tracing::debug!("First worksheet is {}", part);
    Ok(part)
}

/// Relationship targets are relative to `xl/` unless they start with `/`.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

// ============================================================================
// Worksheet Rows
// ============================================================================

/// Parse worksheet XML into a header row and data rows.
pub fn parse_sheet(part: &str, xml: &str, shared: &[String]) -> Result<SheetData> {
    let doc = parse_xml(part, xml)?;
    if !doc.descendants().any(|n| is(&n, "sheetData")) {
        return Err(Error::format(part, "worksheet has no <sheetData>"));
    }

    let mut rows = doc
        .descendants()
        .filter(|n| is(n, "row"))
        .map(|row| read_row(row, shared));

    let header = rows
        .next()
        .ok_or_else(|| Error::format(part, "worksheet has no rows"))?;

    let mut skipped = 0;
    let rows: Vec<RawRow> = rows
        .filter(|row| {
            let keep = row.iter().any(|cell| !cell.is_empty());
            if !keep {
                skipped += 1;
            }
            keep
        })
        .collect();

    if skipped > 0 {
        tracing::debug!("Skipped {} empty rows", skipped);
    }

    Ok(SheetData { header, rows })
}

/// Cells of one `<row>`, placed by their column reference so that omitted
/// cells read as empty strings.
fn read_row(row: Node, shared: &[String]) -> RawRow {
    let mut cells = RawRow::new();
    for cell in row.children().filter(|n| is(n, "c")) {
        let index = cell
            .attribute("r")
            .and_then(column_index)
            .unwrap_or(cells.len());
        if index >= cells.len() {
            cells.resize(index + 1, String::new());
        }
        cells[index] = cell_value(cell, shared);
    }
    cells
}

fn cell_value(cell: Node, shared: &[String]) -> String {
    let raw = cell
        .children()
        .find(|n| is(n, "v"))
        .and_then(|v| v.text())
        .unwrap_or("");

    match cell.attribute("t") {
        Some("s") => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| shared.get(index))
            .cloned()
            .unwrap_or_default(),
        Some("inlineStr") => cell
            .children()
            .find(|n| is(n, "is"))
            .map(string_item_text)
            .unwrap_or_default(),
        _ => raw.to_string(),
    }
}

/// Zero-based column of an A1-style reference ("A1" → 0, "AB12" → 27).
fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .collect();
    // XFD is the widest column a worksheet can have
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }

    let number = letters.iter().fold(0usize, |acc, b| {
        acc * 26 + usize::from(b.to_ascii_uppercase() - b'A' + 1)
    });
    Some(number - 1)
}
