//! Compilation orchestrator
//!
//! Sequences parse → validate → interpret → transpile, accumulating
//! diagnostics from every stage. Failure is absorbing: a fatal parse
//! error or any validation error means no transpiler runs and `outputs`
//! stays empty, but the diagnostics gathered so far are still returned.

use log::{debug, info};
use roidsl_core::ast::{Document, OutputKind};
use roidsl_core::diagnostics::{Diagnostic, Stage};
use roidsl_core::Value;
use roidsl_parser::DocumentParser;

use crate::interpreter::interpret;
use crate::transpile::{self, Transpiler};
use crate::validator::validate;

/// Outcome of one `compile` call: success flag, the parsed document when
/// parsing got that far, every diagnostic from every stage, and the
/// generated output trees in canonical kind order.
#[derive(Debug)]
pub struct CompilationResult {
    pub success: bool,
    pub document: Option<Document>,
    pub diagnostics: Vec<Diagnostic>,
    pub outputs: Vec<(OutputKind, Value)>,
}

impl CompilationResult {
    fn failed(diagnostics: Vec<Diagnostic>, document: Option<Document>) -> Self {
        Self {
            success: false,
            document,
            diagnostics,
            outputs: Vec::new(),
        }
    }

    /// Diagnostics with Error severity
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Look up one generated output by kind
    pub fn output(&self, kind: OutputKind) -> Option<&Value> {
        self.outputs
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| v)
    }
}

/// The compiler: a parser plus the transpiler registry.
///
/// Stateless across calls; one instance can compile any number of
/// documents and repeated calls with identical input produce identical
/// results.
pub struct Compiler {
    parser: DocumentParser,
    transpilers: Vec<Box<dyn Transpiler>>,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            parser: DocumentParser::new(),
            transpilers: transpile::all(),
        }
    }

    /// Run the full pipeline over one source text.
    ///
    /// `selected` restricts which of the document's requested outputs are
    /// generated; `None` generates everything the document requests with
    /// its `OUTPUT` declarations. Outputs come back in canonical kind
    /// order regardless of declaration order.
    pub fn compile(&self, text: &str, selected: Option<&[OutputKind]>) -> CompilationResult {
        let mut diagnostics = Vec::new();

        // Parsing
        let parsed = match self.parser.parse(text) {
            Ok(parsed) => parsed,
            Err(err) => {
                let mut diag = Diagnostic::error(Stage::Parse, err.to_string());
                if let Some(line) = err.line() {
                    diag = diag.with_line(line);
                }
                diagnostics.push(diag);
                return CompilationResult::failed(diagnostics, None);
            }
        };
        diagnostics.extend(parsed.diagnostics);
        let document = parsed.document;

        // Validating
        let report = validate(&document);
        diagnostics.extend(report.warnings.iter().cloned());
        if !report.is_valid() {
            diagnostics.extend(report.errors);
            return CompilationResult::failed(diagnostics, Some(document));
        }

        // Interpreting
        let insights = interpret(&document);
        diagnostics.extend(insights.warnings.iter().cloned());

        // Transpiling
        let requested = self.requested_kinds(&document, selected);
        let mut outputs = Vec::with_capacity(requested.len());
        let mut success = true;
        for transpiler in &self.transpilers {
            let kind = transpiler.kind();
            if !requested.contains(&kind) {
                continue;
            }
            match transpiler.transpile(&document, &insights) {
                Ok(value) => {
                    debug!("generated {kind} output");
                    outputs.push((kind, value));
                }
                Err(err) => {
                    diagnostics.push(Diagnostic::error(Stage::Transpile, err.to_string()));
                    success = false;
                }
            }
        }

        info!(
            "compiled document: {} outputs, {} diagnostics",
            outputs.len(),
            diagnostics.len()
        );

        CompilationResult {
            success,
            document: Some(document),
            diagnostics,
            outputs,
        }
    }

    /// The document's selector set, intersected with `selected` when given.
    /// Unknown selector names were already rejected by validation.
    fn requested_kinds(
        &self,
        document: &Document,
        selected: Option<&[OutputKind]>,
    ) -> Vec<OutputKind> {
        document
            .output_selectors
            .iter()
            .filter_map(|name| OutputKind::from_name(name))
            .filter(|kind| selected.map_or(true, |s| s.contains(kind)))
            .collect()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience wrapper around [`Compiler::compile`]
pub fn compile(text: &str, selected: Option<&[OutputKind]>) -> CompilationResult {
    Compiler::new().compile(text, selected)
}
