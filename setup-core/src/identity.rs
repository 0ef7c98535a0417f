use serde::{Deserialize, Serialize};

/// Display identity of a car.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CarIdentity {
    /// Technical-name fragment that matched, or the whole input for a fallback.
    pub technical: String,
    pub display_name: String,
    /// Short class code such as `hy` or `lmgt3`.
    #[serde(default)]
    pub class: String,
    /// Short brand code such as `bmw`.
    #[serde(default)]
    pub brand: String,
}

impl CarIdentity {
    /// Identity for a technical name no table entry recognises.
    pub fn fallback(technical: &str) -> Self {
        Self {
            technical: technical.to_string(),
            display_name: technical.to_string(),
            class: String::new(),
            brand: String::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.class.is_empty() && self.brand.is_empty() && self.technical == self.display_name
    }
}

/// Car identity table in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarTable {
    cars: Vec<CarIdentity>,
}

impl CarTable {
    pub fn new(cars: Vec<CarIdentity>) -> Self {
        Self { cars }
    }

    pub fn cars(&self) -> &[CarIdentity] {
        &self.cars
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}

/// Resolves technical car names by longest contained fragment.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    by_length: Vec<CarIdentity>,
}

impl IdentityResolver {
    pub fn new(table: &CarTable) -> Self {
        let mut by_length = table.cars().to_vec();
        // Stable: equal lengths keep table order.
        by_length.sort_by(|a, b| b.technical.len().cmp(&a.technical.len()));
        Self { by_length }
    }

    /// Resolve a technical name such as `"GT3 BMW_M4_LMGT3 WEC2025"`.
    ///
    /// Returns `None` for empty input and a fallback identity for unknown cars.
    pub fn resolve(&self, technical: &str) -> Option<CarIdentity> {
        if technical.is_empty() {
            return None;
        }

        let found = self
            .by_length
            .iter()
            .find(|car| technical.contains(car.technical.as_str()))
            .cloned()
            .unwrap_or_else(|| CarIdentity::fallback(technical));
        Some(found)
    }

    /// Resolve and return only the display name, or an empty string.
    pub fn display_name(&self, technical: &str) -> String {
        self.resolve(technical)
            .map(|identity| identity.display_name)
            .unwrap_or_default()
    }
}
