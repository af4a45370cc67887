//! SpreadsheetDrawingML parsing.
//!
//! A drawing part (`xl/drawings/drawingN.xml`) holds one anchor per
//! top-level object. Text lives in `xdr:sp/xdr:txBody/a:p/a:r/a:t`, and
//! `xdr:grpSp` nests further objects.

use crate::error::{Error, Result};
use crate::model::{Shape, MAX_GROUP_DEPTH};
use quick_xml::events::{BytesStart, Event};
use tracing::warn;

/// What kind of drawing object a frame is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Shape,
    Group,
    Other,
}

impl FrameKind {
    fn from_element(local_name: &[u8]) -> Option<Self> {
        match local_name {
            b"sp" => Some(FrameKind::Shape),
            b"grpSp" => Some(FrameKind::Group),
            b"pic" | b"cxnSp" | b"graphicFrame" | b"contentPart" => Some(FrameKind::Other),
            _ => None,
        }
    }
}

/// A drawing object still being read.
#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    name: Option<String>,
    children: Vec<Shape>,
    /// `Some` once a text body has been seen
    paragraphs: Option<Vec<String>>,
    error: Option<String>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            name: None,
            children: Vec::new(),
            paragraphs: None,
            error: None,
        }
    }

    fn push_text(&mut self, text: &str) {
        let paragraphs = self.paragraphs.get_or_insert_with(Vec::new);
        match paragraphs.last_mut() {
            Some(last) => last.push_str(text),
            None => paragraphs.push(text.to_string()),
        }
    }

    fn finish(self) -> Shape {
        let name = self.name.unwrap_or_default();
        if let Some(reason) = self.error {
            return Shape::unreadable(name, reason);
        }
        match self.kind {
            FrameKind::Group => Shape::group(name, self.children),
            FrameKind::Shape => match self.paragraphs {
                Some(paragraphs) => Shape::text(name, paragraphs.join("\n")),
                None => Shape::plain(name),
            },
            FrameKind::Other => Shape::plain(name),
        }
    }
}

/// Parse a drawing part into its top-level shapes, in document order.
///
/// A group nested more than [`MAX_GROUP_DEPTH`] groups deep is not read: it
/// becomes a single unreadable shape.
pub fn parse_drawing(xml: &str) -> Result<Vec<Shape>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    // Keep whitespace inside a:t runs
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut shapes: Vec<Shape> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    // Depth inside an mc:Fallback branch; the mc:Choice branch already
    // carries the same objects.
    let mut fallback_depth = 0usize;
    let mut in_text_body = false;
    let mut in_text = false;
    // Group too deep to keep, and the element depth inside it.
    let mut too_deep: Option<(Frame, usize)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if too_deep.is_some() => {
                if let Some((frame, depth)) = too_deep.as_mut() {
                    *depth += 1;
                    if e.name().local_name().as_ref() == b"cNvPr" {
                        set_name(frame, e);
                    }
                }
            }
            Ok(Event::Empty(ref e)) if too_deep.is_some() => {
                if let Some((frame, _)) = too_deep.as_mut() {
                    if e.name().local_name().as_ref() == b"cNvPr" {
                        set_name(frame, e);
                    }
                }
            }
            Ok(Event::End(_)) if too_deep.is_some() => {
                if let Some((_, depth)) = too_deep.as_mut() {
                    *depth -= 1;
                    if *depth == 0 {
                        if let Some((frame, _)) = too_deep.take() {
                            warn!(shape = ?frame.name, "group nesting too deep, not read");
                            attach(frame.finish(), &mut stack, &mut shapes);
                        }
                    }
                }
            }
            Ok(Event::Start(ref e)) => {
                let local_name = e.name().local_name();
                if fallback_depth > 0 {
                    fallback_depth += 1;
                } else if local_name.as_ref() == b"Fallback" {
                    fallback_depth = 1;
                } else if let Some(kind) = FrameKind::from_element(local_name.as_ref()) {
                    let groups = stack.iter().filter(|f| f.kind == FrameKind::Group).count();
                    if kind == FrameKind::Group && groups >= MAX_GROUP_DEPTH {
                        let mut frame = Frame::new(kind);
                        frame.error = Some("group nesting too deep".to_string());
                        too_deep = Some((frame, 1));
                    } else {
                        stack.push(Frame::new(kind));
                    }
                } else if let Some(frame) = stack.last_mut() {
                    match local_name.as_ref() {
                        b"cNvPr" => set_name(frame, e),
                        b"txBody" if frame.kind == FrameKind::Shape => {
                            in_text_body = true;
                            frame.paragraphs.get_or_insert_with(Vec::new);
                        }
                        b"p" if in_text_body => {
                            frame.paragraphs.get_or_insert_with(Vec::new).push(String::new());
                        }
                        b"t" if in_text_body => in_text = true,
                        _ => {}
                    }
                }
            }
            Ok(Event::Empty(ref e)) if fallback_depth == 0 => {
                let local_name = e.name().local_name();
                if let Some(kind) = FrameKind::from_element(local_name.as_ref()) {
                    let mut frame = Frame::new(kind);
                    set_name(&mut frame, e);
                    attach(frame.finish(), &mut stack, &mut shapes);
                } else if let Some(frame) = stack.last_mut() {
                    match local_name.as_ref() {
                        b"cNvPr" => set_name(frame, e),
                        b"txBody" if frame.kind == FrameKind::Shape => {
                            frame.paragraphs.get_or_insert_with(Vec::new);
                        }
                        b"p" if in_text_body => {
                            frame.paragraphs.get_or_insert_with(Vec::new).push(String::new());
                        }
                        b"br" if in_text_body => frame.push_text("\n"),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if fallback_depth == 0 && in_text {
                    if let Some(frame) = stack.last_mut() {
                        match e.unescape() {
                            Ok(text) => frame.push_text(&text),
                            Err(err) => {
                                frame.error.get_or_insert_with(|| err.to_string());
                            }
                        }
                    }
                }
            }
            Ok(Event::End(_)) if fallback_depth > 0 => fallback_depth -= 1,
            Ok(Event::End(ref e)) => {
                let local_name = e.name().local_name();
                match local_name.as_ref() {
                    b"t" => in_text = false,
                    b"txBody" => in_text_body = false,
                    name if FrameKind::from_element(name).is_some() => {
                        if let Some(frame) = stack.pop() {
                            attach(frame.finish(), &mut stack, &mut shapes);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(shapes)
}

/// Hand a finished shape to its enclosing group, or to the top level.
fn attach(shape: Shape, stack: &mut [Frame], shapes: &mut Vec<Shape>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(shape),
        None => shapes.push(shape),
    }
}

/// Take the display name from the first `cNvPr` of a frame.
fn set_name(frame: &mut Frame, e: &BytesStart<'_>) {
    if frame.name.is_some() {
        return;
    }
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"name" {
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            frame.name = Some(value);
        }
    }
}
