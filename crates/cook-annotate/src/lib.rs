//! Engine for converting free-form recipe instructions into inline
//! CookLang-style markup, driven by a user-edited classification table.
//!
//! The pipeline is pure text/table in, text out: the caller normalizes
//! nothing and performs no I/O here. `annotate` snapshots the table,
//! rewrites the chosen step separator into paragraph breaks, plans all
//! term substitutions against the original body in one pass, and prepends
//! the metadata header.

pub mod amount;
pub mod diff;
pub mod error;
pub mod metadata;
pub mod plan;
pub mod steps;
pub mod term;

pub use amount::{amount_token, format_quantity, unit_token, UnitCatalog, UnitDef};
pub use diff::build_preview_diff;
pub use error::{AnnotateError, AnnotateResult, ExitCode};
pub use metadata::{RecipeMetadata, TimeSetting};
pub use plan::{apply_plan, build_plan, markup_token, AnnotationPlan, TermEdit};
pub use steps::{normalize_steps, StepSeparator, STEP_BREAK};
pub use term::{Role, TableSnapshot, TermEntry, TermTable};

/// Everything one annotation pass needs, owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct AnnotateRequest {
    pub text: String,
    pub separator: StepSeparator,
    pub table: TermTable,
    pub units: UnitCatalog,
    pub metadata: RecipeMetadata,
}

/// The immutable result of one pass: header and body, regenerated from
/// scratch on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedDocument {
    pub header: String,
    pub body: String,
}

impl AnnotatedDocument {
    pub fn render(&self) -> String {
        format!("{}{}", self.header, self.body)
    }
}

/// Document plus substitution diagnostics.
#[derive(Debug)]
pub struct AnnotateOutcome {
    pub document: AnnotatedDocument,
    pub annotated: usize,
    pub unmatched: Vec<String>,
}

/// Run the full annotation pipeline.
///
/// Empty input degenerates to a header-only document. Terms absent from
/// the text are collected in `unmatched` rather than raised.
pub fn annotate(request: &AnnotateRequest) -> AnnotateResult<AnnotateOutcome> {
    let trimmed = request.text.trim();
    let normalized = normalize_steps(trimmed, request.separator);
    let body = terminate_final_step(normalized, request.separator);

    let snapshot = request.table.snapshot();
    let plan = build_plan(&body, &snapshot, &request.units);
    let body = plan::apply_plan(&body, &plan.edits)?;

    Ok(AnnotateOutcome {
        document: AnnotatedDocument {
            header: request.metadata.header(),
            body,
        },
        annotated: plan.edits.len(),
        unmatched: plan.unmatched,
    })
}

/// A trailing separator ends the last step, so it gets the same paragraph
/// break as interior ones. Input is already trimmed, which rules the
/// newline separator out here.
fn terminate_final_step(mut body: String, separator: StepSeparator) -> String {
    let token = separator.as_str();
    if !body.is_empty() && body.ends_with(token) {
        body.truncate(body.len() - token.len());
        body.push_str(STEP_BREAK);
    }
    body
}
