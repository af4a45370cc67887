//! Drawing shape tree.

/// Group nesting deeper than this is not descended into.
pub const MAX_GROUP_DEPTH: usize = 32;

/// A drawing object on a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    /// Display name from the drawing (e.g. "TextBox 3"), possibly empty
    pub name: String,
    /// What the shape is
    pub kind: ShapeKind,
}

/// The three shapes a drawing object can take for text inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    /// A group container with nested shapes
    Group(Vec<Shape>),
    /// A single shape; `text` is `Some` when it carries a text frame
    Leaf { text: Option<String> },
    /// A shape whose content could not be inspected
    Unreadable(String),
}

impl Shape {
    /// Create a group shape.
    pub fn group(name: impl Into<String>, children: Vec<Shape>) -> Self {
        Self {
            name: name.into(),
            kind: ShapeKind::Group(children),
        }
    }

    /// Create a shape with a text frame.
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ShapeKind::Leaf {
                text: Some(text.into()),
            },
        }
    }

    /// Create a shape without a text frame (picture, connector, chart).
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ShapeKind::Leaf { text: None },
        }
    }

    /// Create a shape that could not be inspected.
    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ShapeKind::Unreadable(reason.into()),
        }
    }

    /// Whether this shape is a group container.
    pub fn is_group(&self) -> bool {
        matches!(self.kind, ShapeKind::Group(_))
    }

    /// Nested shapes of a group; empty for anything else.
    pub fn children(&self) -> &[Shape] {
        match &self.kind {
            ShapeKind::Group(children) => children,
            _ => &[],
        }
    }

    /// Text frame content, if the shape has one.
    pub fn text_frame(&self) -> Option<&str> {
        match &self.kind {
            ShapeKind::Leaf { text } => text.as_deref(),
            _ => None,
        }
    }
}
