use std::cmp::Reverse;
use std::ops::Range;

use crate::amount::{amount_token, UnitCatalog};
use crate::error::{AnnotateError, AnnotateResult};
use crate::term::{Role, TableSnapshot, TermEntry};

/// One planned rewrite: replace `range` of the body text with `replacement`.
#[derive(Debug, Clone)]
pub struct TermEdit {
    pub range: Range<usize>,
    pub term: String,
    pub replacement: String,
}

/// The combined replacement plan for one substitution pass, built against
/// the original body text so no edit can observe another's output.
#[derive(Debug, Default)]
pub struct AnnotationPlan {
    pub edits: Vec<TermEdit>,
    pub unmatched: Vec<String>,
}

/// Compute the markup token for a classified term.
///
/// Ingredients with both quantity and unit render the quantity block;
/// everything else is a bare reference, with an empty `{}` suffix when the
/// term contains a space so the dialect can delimit multi-word terms.
pub fn markup_token(entry: &TermEntry, catalog: &UnitCatalog) -> String {
    let sigil = match entry.role {
        Role::Ingredient => '@',
        Role::Tool => '#',
    };

    if entry.role == Role::Ingredient {
        if let (Some(quantity), Some(unit)) = (entry.quantity, entry.unit.as_deref()) {
            return format!("@{}{{{}}}", entry.term, amount_token(catalog, quantity, unit));
        }
    }

    let mut token = format!("{sigil}{}", entry.term);
    if entry.term.contains(' ') {
        token.push_str("{}");
    }
    token
}

/// Plan the substitution pass over `text`.
///
/// Ingredients are planned strictly before tools; within each role, longer
/// terms go first (ties keep table order) so a term that is a substring of
/// another can never steal the longer term's occurrence. Each term claims
/// the leftmost occurrence that does not overlap an already claimed
/// interval; terms with no claimable occurrence are reported as unmatched.
pub fn build_plan(text: &str, snapshot: &TableSnapshot, catalog: &UnitCatalog) -> AnnotationPlan {
    let mut plan = AnnotationPlan::default();
    let mut claimed: Vec<Range<usize>> = Vec::new();

    for entry in ordered_terms(snapshot) {
        match claim_occurrence(text, &entry.term, &claimed) {
            Some(range) => {
                claimed.push(range.clone());
                plan.edits.push(TermEdit {
                    range,
                    term: entry.term.clone(),
                    replacement: markup_token(entry, catalog),
                });
            }
            None => plan.unmatched.push(entry.term.clone()),
        }
    }

    plan
}

/// Splice a plan into `text`, rebuilding the string in one pass. Edits may
/// arrive in any order but must not overlap.
pub fn apply_plan(text: &str, edits: &[TermEdit]) -> AnnotateResult<String> {
    let mut ordered: Vec<&TermEdit> = edits.iter().collect();
    ordered.sort_by_key(|edit| edit.range.start);

    let mut rebuilt = String::with_capacity(text.len());
    let mut cursor = 0;

    for edit in ordered {
        if edit.range.start < cursor || edit.range.end > text.len() {
            return Err(AnnotateError::Validation(format!(
                "overlapping or out-of-bounds edit for term '{}'",
                edit.term
            )));
        }

        rebuilt.push_str(&text[cursor..edit.range.start]);
        rebuilt.push_str(&edit.replacement);
        cursor = edit.range.end;
    }

    rebuilt.push_str(&text[cursor..]);

    Ok(rebuilt)
}

fn ordered_terms(snapshot: &TableSnapshot) -> Vec<&TermEntry> {
    let mut ingredients: Vec<&TermEntry> = snapshot.ingredients.iter().collect();
    let mut tools: Vec<&TermEntry> = snapshot.tools.iter().collect();

    // Stable sort keeps table order among equal-length terms.
    ingredients.sort_by_key(|entry| Reverse(entry.term.chars().count()));
    tools.sort_by_key(|entry| Reverse(entry.term.chars().count()));

    ingredients.into_iter().chain(tools).collect()
}

fn claim_occurrence(text: &str, term: &str, claimed: &[Range<usize>]) -> Option<Range<usize>> {
    let mut offset = 0;

    while let Some(found) = text[offset..].find(term) {
        let start = offset + found;
        let range = start..start + term.len();

        if !claimed.iter().any(|taken| overlaps(&range, taken)) {
            return Some(range);
        }

        let step = text[start..].chars().next().map_or(1, char::len_utf8);
        offset = start + step;
    }

    None
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
