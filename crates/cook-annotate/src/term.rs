use std::fmt;

use crate::error::{AnnotateError, AnnotateResult};

/// Classification assigned to a term by the table editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    Ingredient,
    Tool,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Ingredient => "ingredient",
            Role::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ingredient" => Ok(Role::Ingredient),
            "tool" => Ok(Role::Tool),
            _ => Err(()),
        }
    }
}

/// One row of the classification table: a surface form plus the markup
/// details the user assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct TermEntry {
    pub term: String,
    pub role: Role,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

impl TermEntry {
    /// An ingredient entry with no quantity or unit, as seeded from tagger
    /// output.
    pub fn bare(term: impl Into<String>) -> Self {
        TermEntry {
            term: term.into(),
            role: Role::Ingredient,
            quantity: None,
            unit: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_amount(mut self, quantity: f64, unit: impl Into<String>) -> Self {
        self.quantity = Some(quantity);
        self.unit = Some(unit.into());
        self
    }

    /// Bare references carry no quantity block. Tools are always bare.
    pub fn is_bare(&self) -> bool {
        self.role == Role::Tool || self.quantity.is_none() || self.unit.is_none()
    }
}

/// The user-edited term table. Entries keep insertion order and are unique
/// by surface form; inserting an existing term overwrites its row.
#[derive(Debug, Clone, Default)]
pub struct TermTable {
    entries: Vec<TermEntry>,
}

impl TermTable {
    pub fn new() -> Self {
        TermTable::default()
    }

    /// Seed a table from tagger output: every term becomes an ingredient
    /// with no quantity or unit. Terms are trimmed; duplicates collapse to
    /// the first occurrence. Blank terms are rejected.
    pub fn seed<I, S>(terms: I) -> AnnotateResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = TermTable::new();
        for (position, term) in terms.into_iter().enumerate() {
            let term = term.into();
            let trimmed = term.trim();
            if trimmed.is_empty() {
                return Err(AnnotateError::BlankTerm { position });
            }
            if table.get(trimmed).is_none() {
                table.entries.push(TermEntry::bare(trimmed));
            }
        }
        Ok(table)
    }

    /// Build a table from explicit rows, validating each one. Duplicate
    /// surface forms collapse to the first row carrying them.
    pub fn from_entries<I>(rows: I) -> AnnotateResult<Self>
    where
        I: IntoIterator<Item = TermEntry>,
    {
        let mut table = TermTable::new();
        for (position, mut entry) in rows.into_iter().enumerate() {
            entry.term = entry.term.trim().to_string();
            if entry.term.is_empty() {
                return Err(AnnotateError::BlankTerm { position });
            }
            if table.get(&entry.term).is_none() {
                table.entries.push(entry);
            }
        }
        Ok(table)
    }

    /// Insert or replace the row for `entry.term`.
    pub fn upsert(&mut self, mut entry: TermEntry) -> AnnotateResult<()> {
        entry.term = entry.term.trim().to_string();
        if entry.term.is_empty() {
            return Err(AnnotateError::BlankTerm {
                position: self.entries.len(),
            });
        }
        match self.entries.iter_mut().find(|row| row.term == entry.term) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        Ok(())
    }

    /// Remove the row for `term`, returning whether one existed.
    pub fn remove(&mut self, term: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.term != term);
        self.entries.len() < before
    }

    pub fn get(&self, term: &str) -> Option<&TermEntry> {
        self.entries.iter().find(|entry| entry.term == term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TermEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the table for a substitution pass. The snapshot partitions
    /// rows by role, preserving table order within each partition, and
    /// drops quantity/unit from tool rows so they can never leak into
    /// markup.
    pub fn snapshot(&self) -> TableSnapshot {
        let mut ingredients = Vec::new();
        let mut tools = Vec::new();

        for entry in &self.entries {
            match entry.role {
                Role::Ingredient => ingredients.push(entry.clone()),
                Role::Tool => {
                    let mut tool = entry.clone();
                    tool.quantity = None;
                    tool.unit = None;
                    tools.push(tool);
                }
            }
        }

        TableSnapshot { ingredients, tools }
    }
}

/// Immutable view of the table taken before a substitution pass begins.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub ingredients: Vec<TermEntry>,
    pub tools: Vec<TermEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_defaults_to_bare_ingredients() {
        let table = TermTable::seed(["Tomaten", "Pfanne"]).unwrap();
        assert_eq!(table.len(), 2);
        let entry = table.get("Tomaten").unwrap();
        assert_eq!(entry.role, Role::Ingredient);
        assert!(entry.quantity.is_none());
        assert!(entry.unit.is_none());
    }

    #[test]
    fn seed_trims_and_collapses_duplicates() {
        let table = TermTable::seed([" Salz ", "Salz", "Pfeffer"]).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.get("Salz").is_some());
    }

    #[test]
    fn seed_rejects_blank_terms() {
        let err = TermTable::seed(["Salz", "  "]).unwrap_err();
        assert!(matches!(err, AnnotateError::BlankTerm { position: 1 }));
    }

    #[test]
    fn upsert_replaces_existing_row() {
        let mut table = TermTable::seed(["Tomaten"]).unwrap();
        table
            .upsert(TermEntry::bare("Tomaten").with_amount(3.0, "Stück"))
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("Tomaten").unwrap().quantity, Some(3.0));
    }

    #[test]
    fn snapshot_partitions_by_role_and_strips_tool_amounts() {
        let table = TermTable::from_entries([
            TermEntry::bare("Tomaten").with_amount(3.0, "Stück"),
            TermEntry::bare("Pfanne")
                .with_role(Role::Tool)
                .with_amount(2.0, "Stück"),
            TermEntry::bare("Salz"),
        ])
        .unwrap();

        let snapshot = table.snapshot();
        assert_eq!(snapshot.ingredients.len(), 2);
        assert_eq!(snapshot.tools.len(), 1);
        assert!(snapshot.tools[0].quantity.is_none());
        assert!(snapshot.tools[0].unit.is_none());
    }
}
