//! Report artifacts: PDF rendering and room join codes

pub mod pdf;
pub mod qr;

pub use pdf::{PdfRenderer, ReportRenderer};
pub use qr::room_code_png;
