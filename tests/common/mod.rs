//! Workbook fixtures built with `zip::ZipWriter`.

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

struct SheetSpec {
    name: String,
    cells: Vec<String>,
    drawing: Option<String>,
}

/// Builds a minimal xlsx package: inline-string cells in column A and an
/// optional drawing per sheet.
#[derive(Default)]
pub struct WorkbookBuilder {
    sheets: Vec<SheetSpec>,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, cells: &[&str]) -> Self {
        self.sheets.push(SheetSpec {
            name: name.to_string(),
            cells: cells.iter().map(|c| c.to_string()).collect(),
            drawing: None,
        });
        self
    }

    /// Add a sheet whose drawing holds `anchored` (see [`anchor`]).
    pub fn sheet_with_drawing(mut self, name: &str, cells: &[&str], anchored: &[String]) -> Self {
        self.sheets.push(SheetSpec {
            name: name.to_string(),
            cells: cells.iter().map(|c| c.to_string()).collect(),
            drawing: Some(drawing(&anchored.concat())),
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        let mut put = |name: &str, content: &str| {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        };

        put("[Content_Types].xml", &self.content_types());
        put("_rels/.rels", ROOT_RELS);
        put("xl/workbook.xml", &self.workbook_xml());
        put("xl/_rels/workbook.xml.rels", &self.workbook_rels());

        let mut drawing_count = 0;
        for (i, sheet) in self.sheets.iter().enumerate() {
            let n = i + 1;
            let has_drawing = sheet.drawing.is_some();
            put(
                &format!("xl/worksheets/sheet{n}.xml"),
                &worksheet_xml(&sheet.cells, has_drawing),
            );
            if let Some(drawing) = &sheet.drawing {
                drawing_count += 1;
                let d = drawing_count;
                put(
                    &format!("xl/worksheets/_rels/sheet{n}.xml.rels"),
                    &format!(
                        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing" Target="../drawings/drawing{d}.xml"/></Relationships>"#
                    ),
                );
                put(&format!("xl/drawings/drawing{d}.xml"), drawing);
            }
        }

        zip.finish().unwrap().into_inner()
    }

    pub fn write(&self, path: &Path) -> PathBuf {
        fs::write(path, self.build()).unwrap();
        path.to_path_buf()
    }

    fn content_types(&self) -> String {
        let mut overrides = String::from(
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        );
        for n in 1..=self.sheets.len() {
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{overrides}</Types>"#
        )
    }

    fn workbook_xml(&self) -> String {
        let sheets: String = self
            .sheets
            .iter()
            .enumerate()
            .map(|(i, s)| {
                format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    escape(&s.name),
                    i + 1,
                    i + 1
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheets}</sheets></workbook>"#
        )
    }

    fn workbook_rels(&self) -> String {
        let rels: String = (1..=self.sheets.len())
            .map(|n| {
                format!(
                    r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
        )
    }
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

fn worksheet_xml(cells: &[String], has_drawing: bool) -> String {
    let rows: String = cells
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let r = i + 1;
            format!(
                r#"<row r="{r}"><c r="A{r}" t="inlineStr"><is><t>{}</t></is></c></row>"#,
                escape(text)
            )
        })
        .collect();
    let drawing = if has_drawing {
        r#"<drawing r:id="rId1"/>"#
    } else {
        ""
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheetData>{rows}</sheetData>{drawing}</worksheet>"#
    )
}

fn drawing(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">{body}</xdr:wsDr>"#
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A text box shape.
pub fn text_box(id: u32, name: &str, text: &str) -> String {
    format!(
        r#"<xdr:sp macro="" textlink=""><xdr:nvSpPr><xdr:cNvPr id="{id}" name="{name}"/><xdr:cNvSpPr txBox="1"/></xdr:nvSpPr><xdr:spPr/><xdr:txBody><a:bodyPr/><a:p><a:r><a:t>{}</a:t></a:r></a:p></xdr:txBody></xdr:sp>"#,
        escape(text)
    )
}

/// A group shape around `children`.
pub fn group(id: u32, name: &str, children: &[String]) -> String {
    format!(
        r#"<xdr:grpSp><xdr:nvGrpSpPr><xdr:cNvPr id="{id}" name="{name}"/><xdr:cNvGrpSpPr/></xdr:nvGrpSpPr><xdr:grpSpPr/>{}</xdr:grpSp>"#,
        children.concat()
    )
}

/// A picture, which has no text frame.
pub fn picture(id: u32, name: &str) -> String {
    format!(
        r#"<xdr:pic><xdr:nvPicPr><xdr:cNvPr id="{id}" name="{name}"/><xdr:cNvPicPr/></xdr:nvPicPr><xdr:blipFill/><xdr:spPr/></xdr:pic>"#
    )
}

/// Anchor a top-level shape to the sheet.
pub fn anchor(shape: &str) -> String {
    format!(
        "<xdr:twoCellAnchor><xdr:from><xdr:col>1</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>1</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from><xdr:to><xdr:col>4</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>6</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>{shape}<xdr:clientData/></xdr:twoCellAnchor>"
    )
}

pub fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
