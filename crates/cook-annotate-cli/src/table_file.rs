use std::path::Path;

use cook_annotate::{AnnotateError, AnnotateResult, Role, TermEntry, TermTable};
use serde::{Deserialize, Serialize};

/// On-disk classification table, as edited by the user between `seed` and
/// `annotate`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TableFile {
    #[serde(default)]
    pub terms: Vec<TableRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TableRow {
    pub term: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

fn default_role() -> String {
    Role::Ingredient.as_str().to_string()
}

pub fn load(path: &Path) -> AnnotateResult<TermTable> {
    let contents = std::fs::read_to_string(path)?;
    let file: TableFile = toml::from_str(&contents).map_err(|err| {
        AnnotateError::InvalidTable(format!("failed to parse {}: {err}", path.display()))
    })?;
    into_table(file)
}

pub fn into_table(file: TableFile) -> AnnotateResult<TermTable> {
    let mut entries = Vec::with_capacity(file.terms.len());

    for row in file.terms {
        let role = row.role.parse::<Role>().map_err(|_| {
            AnnotateError::InvalidTable(format!(
                "unknown role '{}' for term '{}' (expected 'ingredient' or 'tool')",
                row.role, row.term
            ))
        })?;

        entries.push(TermEntry {
            term: row.term,
            role,
            quantity: row.quantity,
            unit: row.unit,
        });
    }

    TermTable::from_entries(entries)
}

/// Render a table skeleton for terms fresh from the tagger: every row an
/// ingredient with quantity and unit left for the user to fill in.
pub fn render_skeleton(table: &TermTable) -> String {
    let file = TableFile {
        terms: table
            .iter()
            .map(|entry| TableRow {
                term: entry.term.clone(),
                role: entry.role.as_str().to_string(),
                quantity: entry.quantity,
                unit: entry.unit.clone(),
            })
            .collect(),
    };

    let rendered = toml::to_string_pretty(&file).expect("table serialization never fails");
    format!(
        "# Classification table. Set role to \"ingredient\" or \"tool\";\n\
         # ingredients may carry quantity and unit.\n\n{rendered}"
    )
}
