//! Registry of explorable variables
//!
//! The catalog is the source of truth for which variables a sweep or
//! sensitivity run may vary: their bounds, recommended steps, units and the
//! configuration group each one lives in. It is constructed once, shared
//! immutably (typically behind an `Arc`), and passed by reference into the
//! components that need variable metadata.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::casing::camel_to_snake;

/// Configuration group a variable belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableCategory {
    Equipment,
    Cost,
    Market,
    Financial,
}

/// Catalog entry for one explorable variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizableVariable {
    pub name: String,
    pub display_name: String,
    pub category: VariableCategory,
    pub min_value: f64,
    pub max_value: f64,
    pub default_value: f64,
    #[serde(default)]
    pub unit: String,
    pub step: f64,
}

/// Immutable registry of explorable variables with an alias index.
///
/// Lookups resolve in three stages: exact canonical name, enumerated alias,
/// then a generic camelCase-to-snake_case transform as fallback. Declaration
/// order is stable and used as the tie-break when rankings collide.
#[derive(Debug, Clone)]
pub struct VariableCatalog {
    variables: Vec<OptimizableVariable>,
    index: FxHashMap<String, usize>,
}

impl VariableCatalog {
    /// The standard catalog for a hydrogen production project.
    pub fn standard() -> Self {
        let mut catalog = Self {
            variables: Vec::new(),
            index: FxHashMap::default(),
        };

        catalog.push(
            variable("electrolyzer_capacity", "Electrolyzer capacity", VariableCategory::Equipment)
                .bounds(1.0, 100.0)
                .default_value(10.0)
                .unit("MW")
                .step(1.0),
            &["electrolyser_capacity"],
        );
        catalog.push(
            variable("electrolyzer_efficiency", "Electrolyzer efficiency", VariableCategory::Equipment)
                .bounds(50.0, 85.0)
                .default_value(67.0)
                .unit("%")
                .step(1.0),
            &["electrolyser_efficiency"],
        );
        catalog.push(
            variable("ppa_price", "PPA power price", VariableCategory::Cost)
                .bounds(50.0, 200.0)
                .default_value(100.0)
                .unit("KRW/kWh")
                .step(5.0),
            &["power_price"],
        );
        catalog.push(
            variable("h2_price", "Hydrogen sales price", VariableCategory::Market)
                .bounds(3_000.0, 15_000.0)
                .default_value(6_000.0)
                .unit("KRW/kg")
                .step(500.0),
            &["hydrogen_price"],
        );
        catalog.push(
            variable("capex", "CAPEX", VariableCategory::Cost)
                .bounds(10e9, 200e9)
                .default_value(50e9)
                .unit("KRW")
                .step(5e9),
            &["total_capex"],
        );
        catalog.push(
            variable("discount_rate", "Discount rate", VariableCategory::Financial)
                .bounds(5.0, 15.0)
                .default_value(8.0)
                .unit("%")
                .step(0.5),
            &[],
        );
        catalog.push(
            variable("debt_ratio", "Debt ratio", VariableCategory::Financial)
                .bounds(0.0, 90.0)
                .default_value(70.0)
                .unit("%")
                .step(5.0),
            &[],
        );
        catalog.push(
            variable("annual_availability", "Annual availability", VariableCategory::Equipment)
                .bounds(70.0, 98.0)
                .default_value(85.0)
                .unit("%")
                .step(1.0),
            &["availability"],
        );

        catalog
    }

    fn push(&mut self, entry: OptimizableVariable, aliases: &[&str]) {
        let position = self.variables.len();
        self.index.insert(entry.name.clone(), position);
        for alias in aliases {
            self.index.insert((*alias).to_string(), position);
        }
        self.variables.push(entry);
    }

    /// All variables in declaration order.
    pub fn variables(&self) -> &[OptimizableVariable] {
        &self.variables
    }

    /// Look up by canonical name or enumerated alias.
    pub fn get(&self, name: &str) -> Option<&OptimizableVariable> {
        self.index.get(name).map(|&i| &self.variables[i])
    }

    /// Look up by canonical name, alias, or a camelCase spelling of either.
    pub fn resolve(&self, key: &str) -> Option<&OptimizableVariable> {
        if let Some(found) = self.get(key) {
            return Some(found);
        }
        self.get(&camel_to_snake(key))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of a variable in declaration order (ranking tie-break).
    pub fn declaration_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

fn variable(
    name: &str,
    display_name: &str,
    category: VariableCategory,
) -> OptimizableVariable {
    OptimizableVariable {
        name: name.to_string(),
        display_name: display_name.to_string(),
        category,
        min_value: 0.0,
        max_value: 0.0,
        default_value: 0.0,
        unit: String::new(),
        step: 1.0,
    }
}

impl OptimizableVariable {
    fn bounds(mut self, min: f64, max: f64) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    fn default_value(mut self, value: f64) -> Self {
        self.default_value = value;
        self
    }

    fn unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }
}
