//! Error types and diagnostic reporting

use crate::ir::{BlockId, OpKind};
use crate::symbol::SymbolId;
use crate::types::TypeId;
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, NoColor, StandardStream};
use thiserror::Error;

/// Structural error found when checking a control flow graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    #[error("{block} jumps to {target}, which does not belong to this function")]
    UnknownBlock { block: String, target: BlockId },

    #[error("{which} block {target} does not belong to this function")]
    DanglingDesignation { which: &'static str, target: BlockId },

    #[error("function definition has no {which} block")]
    MissingEntry { which: &'static str },

    #[error("in {block}: unknown symbol {symbol}")]
    UnknownSymbol { block: String, symbol: SymbolId },

    #[error("in {block}: unknown type {ty}")]
    UnknownType { block: String, ty: TypeId },

    #[error("in {block}: symbol `{symbol}` has no storage")]
    NoStorage { block: String, symbol: String },

    #[error("in {block}: dereferenced symbol `{symbol}` does not have pointer type")]
    DerefNonPointer { block: String, symbol: String },

    #[error("in {block}: immediate {value} does not match type {ty}")]
    ImmediateMismatch { block: String, value: String, ty: String },

    #[error("in {block}: destination of {kind:?} is not an lvalue")]
    AssignToRvalue { block: String, kind: OpKind },
}

impl IrError {
    pub fn unknown_block(block: impl Into<String>, target: BlockId) -> Self {
        Self::UnknownBlock {
            block: block.into(),
            target,
        }
    }

    pub fn no_storage(block: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::NoStorage {
            block: block.into(),
            symbol: symbol.into(),
        }
    }

    pub fn deref_non_pointer(block: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::DerefNonPointer {
            block: block.into(),
            symbol: symbol.into(),
        }
    }

    pub fn immediate_mismatch(
        block: impl Into<String>,
        value: impl Into<String>,
        ty: impl Into<String>,
    ) -> Self {
        Self::ImmediateMismatch {
            block: block.into(),
            value: value.into(),
            ty: ty.into(),
        }
    }

    pub fn assign_to_rvalue(block: impl Into<String>, kind: OpKind) -> Self {
        Self::AssignToRvalue {
            block: block.into(),
            kind,
        }
    }

    /// Short headline used as the diagnostic message
    fn headline(&self) -> &'static str {
        match self {
            Self::UnknownBlock { .. }
            | Self::DanglingDesignation { .. }
            | Self::MissingEntry { .. } => "malformed control flow graph",
            Self::UnknownSymbol { .. } | Self::UnknownType { .. } => "dangling operand handle",
            Self::NoStorage { .. }
            | Self::DerefNonPointer { .. }
            | Self::ImmediateMismatch { .. }
            | Self::AssignToRvalue { .. } => "malformed operand",
        }
    }
}

pub type IrResult<T> = Result<T, IrError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    fn diagnostic(&self, function: &str, error: &IrError) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(error.headline())
            .with_notes(vec![format!("in function `{}`: {}", function, error)])
    }

    /// Write a diagnostic for `error` to stderr
    pub fn report_error(&self, function: &str, error: &IrError) {
        let diagnostic = self.diagnostic(function, error);
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }

    /// Render a diagnostic for `error` without color
    pub fn render(&self, function: &str, error: &IrError) -> String {
        let diagnostic = self.diagnostic(function, error);
        let mut buffer = NoColor::new(Vec::new());
        if term::emit(&mut buffer, &self.config, &self.files, &diagnostic).is_err() {
            return error.to_string();
        }
        String::from_utf8_lossy(&buffer.into_inner()).into_owned()
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
