/// A unit known to the catalog: the display label the table editor shows,
/// plus the short form the markup should carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDef {
    pub label: String,
    pub abbreviation: Option<String>,
}

impl UnitDef {
    pub fn new(label: impl Into<String>) -> Self {
        UnitDef {
            label: label.into(),
            abbreviation: None,
        }
    }

    pub fn abbreviated(label: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        UnitDef {
            label: label.into(),
            abbreviation: Some(abbreviation.into()),
        }
    }
}

/// Ordered unit catalog resolved from configuration. Labels not present in
/// the catalog fall back to the parenthetical extraction rule.
#[derive(Debug, Clone, Default)]
pub struct UnitCatalog {
    units: Vec<UnitDef>,
}

impl UnitCatalog {
    pub fn new(units: Vec<UnitDef>) -> Self {
        UnitCatalog { units }
    }

    pub fn empty() -> Self {
        UnitCatalog::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitDef> {
        self.units.iter()
    }

    fn abbreviation_for(&self, label: &str) -> Option<&str> {
        self.units
            .iter()
            .find(|unit| unit.label == label)
            .and_then(|unit| unit.abbreviation.as_deref())
    }
}

/// Render a quantity the way the markup expects: drop a zero fractional
/// part entirely, keep everything else at full precision.
pub fn format_quantity(quantity: f64) -> String {
    if quantity.is_finite() && quantity.fract() == 0.0 && quantity.abs() < i64::MAX as f64 {
        format!("{}", quantity as i64)
    } else {
        quantity.to_string()
    }
}

/// Resolve a unit label to the token embedded in the quantity block.
///
/// Catalog abbreviations win. Unknown labels containing a parenthesis yield
/// the substring between the first `(` and the first following `)`; with no
/// closing `)` the remainder after `(` is taken. Anything else passes
/// through verbatim.
pub fn unit_token(catalog: &UnitCatalog, label: &str) -> String {
    if let Some(abbreviation) = catalog.abbreviation_for(label) {
        return abbreviation.to_string();
    }

    match label.find('(') {
        Some(open) => {
            let rest = &label[open + 1..];
            match rest.find(')') {
                Some(close) => rest[..close].to_string(),
                None => rest.to_string(),
            }
        }
        None => label.to_string(),
    }
}

/// The compact `<quantity>%<unit>` token inside a markup quantity block.
pub fn amount_token(catalog: &UnitCatalog, quantity: f64, unit: &str) -> String {
    format!("{}%{}", format_quantity(quantity), unit_token(catalog, unit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integral_quantities_drop_fraction() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(100.0), "100");
    }

    #[test]
    fn fractional_quantities_keep_precision() {
        assert_eq!(format_quantity(1.5), "1.5");
        assert_eq!(format_quantity(0.25), "0.25");
    }

    #[test]
    fn parenthetical_labels_yield_short_form() {
        let catalog = UnitCatalog::empty();
        assert_eq!(unit_token(&catalog, "Gramm (g)"), "g");
        assert_eq!(unit_token(&catalog, "Esslöffel (EL)"), "EL");
    }

    #[test]
    fn plain_labels_pass_through() {
        let catalog = UnitCatalog::empty();
        assert_eq!(unit_token(&catalog, "Stück"), "Stück");
        assert_eq!(unit_token(&catalog, "Prise"), "Prise");
    }

    #[test]
    fn unmatched_parenthesis_takes_remainder() {
        let catalog = UnitCatalog::empty();
        assert_eq!(unit_token(&catalog, "Becher (B"), "B");
    }

    #[test]
    fn catalog_abbreviation_wins_over_parsing() {
        let catalog = UnitCatalog::new(vec![UnitDef::abbreviated("Tassen", "cup")]);
        assert_eq!(unit_token(&catalog, "Tassen"), "cup");
    }

    #[test]
    fn amount_token_combines_both_parts() {
        let catalog = UnitCatalog::empty();
        assert_eq!(amount_token(&catalog, 2.0, "Gramm (g)"), "2%g");
        assert_eq!(amount_token(&catalog, 1.5, "Gramm (g)"), "1.5%g");
    }
}
