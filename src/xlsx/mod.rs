//! XLSX package reading for drawing shapes.
//!
//! Cell values go through [`crate::workbook::Workbook`]; this module only
//! covers what the cell reader does not expose: the DrawingML shapes
//! anchored to each worksheet.
//!
//! # Example
//!
//! ```no_run
//! use docsearch::xlsx::XlsxPackage;
//!
//! let package = XlsxPackage::open("report.xlsx")?;
//! for sheet in package.sheet_names() {
//!     let shapes = package.sheet_shapes(sheet)?;
//!     println!("{}: {} shapes", sheet, shapes.len());
//! }
//! # Ok::<(), docsearch::Error>(())
//! ```

mod drawing;
mod package;

pub use drawing::parse_drawing;
pub use package::XlsxPackage;
