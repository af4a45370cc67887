//! Automation sessions for drawing-shape inspection.
//!
//! Cell readers do not expose drawing objects, so the shape scanner talks to
//! a [`ShapeSession`] instead: something that can open one workbook at a
//! time and list the shapes on a sheet. [`DrawingSession`] reads the
//! DrawingML parts of OOXML packages directly; a session driving a live
//! spreadsheet application fits behind the same trait.

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::model::Shape;
use crate::xlsx::XlsxPackage;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A session able to inspect the drawing shapes of workbooks.
///
/// A session holds at most one open workbook. Opening another one replaces
/// it.
pub trait ShapeSession {
    /// Open `path` read-only, closing any workbook already open.
    fn open_workbook(&mut self, path: &Path) -> Result<()>;

    /// Close the open workbook, if any.
    fn close_workbook(&mut self);

    /// Top-level shapes of a sheet of the open workbook.
    fn sheet_shapes(&mut self, sheet: &str) -> Result<Vec<Shape>>;

    /// Terminate the session. Must be safe to call more than once.
    fn quit(&mut self);
}

/// Creates a session for one shape scan.
pub type SessionFactory = dyn Fn() -> Result<Box<dyn ShapeSession>>;

/// Start the default session.
pub fn default_session() -> Result<Box<dyn ShapeSession>> {
    Ok(Box::new(DrawingSession::start()))
}

/// Session reading SpreadsheetDrawingML from OOXML workbooks.
#[derive(Debug, Default)]
pub struct DrawingSession {
    current: Option<(PathBuf, XlsxPackage)>,
}

impl DrawingSession {
    /// Start a session with no workbook open.
    pub fn start() -> Self {
        Self::default()
    }

    /// Path of the open workbook.
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|(path, _)| path.as_path())
    }
}

impl ShapeSession for DrawingSession {
    fn open_workbook(&mut self, path: &Path) -> Result<()> {
        self.close_workbook();

        let format = detect_format_from_path(path)?;
        if !format.is_ooxml() {
            return Err(Error::UnsupportedFormat(format!(
                "{} has no DrawingML parts",
                format
            )));
        }

        let package = XlsxPackage::open(path)?;
        debug!(path = %path.display(), sheets = package.sheet_count(), "opened workbook for shapes");
        self.current = Some((path.to_path_buf(), package));
        Ok(())
    }

    fn close_workbook(&mut self) {
        if let Some((path, _)) = self.current.take() {
            debug!(path = %path.display(), "closed workbook");
        }
    }

    fn sheet_shapes(&mut self, sheet: &str) -> Result<Vec<Shape>> {
        let (_, package) = self
            .current
            .as_ref()
            .ok_or_else(|| Error::MissingComponent("open workbook".to_string()))?;
        package.sheet_shapes(sheet)
    }

    fn quit(&mut self) {
        self.close_workbook();
    }
}

/// Owns a session and tears it down when dropped.
///
/// Teardown runs on every exit path, including unwinding, and closes the
/// open workbook before quitting.
pub struct SessionGuard {
    session: Option<Box<dyn ShapeSession>>,
}

impl SessionGuard {
    /// Start a session through `factory`.
    pub fn start(factory: &SessionFactory) -> Result<Self> {
        let session = factory()?;
        Ok(Self {
            session: Some(session),
        })
    }

    /// Wrap an already started session.
    pub fn new(session: Box<dyn ShapeSession>) -> Self {
        Self {
            session: Some(session),
        }
    }
}

impl Deref for SessionGuard {
    type Target = dyn ShapeSession;

    fn deref(&self) -> &Self::Target {
        self.session
            .as_deref()
            .unwrap_or_else(|| unreachable!("session is only taken on drop"))
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session
            .as_deref_mut()
            .unwrap_or_else(|| unreachable!("session is only taken on drop"))
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close_workbook();
            session.quit();
            if std::thread::panicking() {
                warn!("shape session torn down during a panic");
            }
        }
    }
}
