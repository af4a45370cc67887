//! Workbook package navigation: sheet names to worksheet and drawing parts.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use crate::model::Shape;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::path::Path;

use super::drawing::parse_drawing;

const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Sheet entry from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// An OOXML workbook package opened for drawing inspection.
pub struct XlsxPackage {
    container: OoxmlContainer,
    sheets: Vec<SheetInfo>,
    relationships: HashMap<String, String>,
}

impl XlsxPackage {
    /// Open a workbook package from a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Open a workbook package from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        if !container.exists(WORKBOOK_PART) {
            return Err(Error::MissingComponent(WORKBOOK_PART.to_string()));
        }

        let relationships = container
            .read_relationships(WORKBOOK_PART)?
            .of_kind("worksheet")
            .into_iter()
            .map(|rel| {
                (
                    rel.id.clone(),
                    OoxmlContainer::resolve_path(WORKBOOK_PART, &rel.target),
                )
            })
            .collect();

        let sheets = Self::parse_workbook(&container.read_xml(WORKBOOK_PART)?)?;

        Ok(Self {
            container,
            sheets,
            relationships,
        })
    }

    /// Parse workbook.xml for sheet entries in declared order.
    fn parse_workbook(xml: &str) -> Result<Vec<SheetInfo>> {
        let mut sheets = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().local_name().as_ref() == b"sheet" =>
                {
                    let mut name = String::new();
                    let mut rel_id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.local_name().as_ref() {
                            b"name" => {
                                name = attr
                                    .unescape_value()
                                    .map(|v| v.into_owned())
                                    .unwrap_or_else(|_| {
                                        String::from_utf8_lossy(&attr.value).into_owned()
                                    });
                            }
                            // r:id; sheetId shares no local name with it
                            b"id" => {
                                rel_id = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            _ => {}
                        }
                    }

                    if !name.is_empty() {
                        sheets.push(SheetInfo { name, rel_id });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Part path of the worksheet called `sheet`.
    pub fn sheet_part(&self, sheet: &str) -> Result<&str> {
        let info = self
            .sheets
            .iter()
            .find(|s| s.name == sheet)
            .ok_or_else(|| Error::SheetNotFound(sheet.to_string()))?;

        self.relationships
            .get(&info.rel_id)
            .map(String::as_str)
            .ok_or_else(|| Error::MissingComponent(format!("worksheet part for {}", sheet)))
    }

    /// Drawing part paths attached to the worksheet called `sheet`.
    pub fn drawing_parts(&self, sheet: &str) -> Result<Vec<String>> {
        let sheet_part = self.sheet_part(sheet)?;
        let rels = self.container.read_relationships(sheet_part)?;
        Ok(rels
            .of_kind("drawing")
            .into_iter()
            .filter(|rel| !rel.external)
            .map(|rel| OoxmlContainer::resolve_path(sheet_part, &rel.target))
            .collect())
    }

    /// Top-level shapes drawn on the worksheet called `sheet`.
    ///
    /// A sheet without a drawing has no shapes.
    pub fn sheet_shapes(&self, sheet: &str) -> Result<Vec<Shape>> {
        let mut shapes = Vec::new();
        for part in self.drawing_parts(sheet)? {
            let xml = self.container.read_xml(&part)?;
            shapes.extend(parse_drawing(&xml)?);
        }
        Ok(shapes)
    }
}

impl std::fmt::Debug for XlsxPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxPackage")
            .field("sheets", &self.sheet_names())
            .finish()
    }
}
