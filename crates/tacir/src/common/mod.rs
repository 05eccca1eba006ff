//! Common infrastructure shared across the IR modules

mod error;

pub use error::{DiagnosticReporter, IrError, IrResult};
