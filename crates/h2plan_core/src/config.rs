//! Base simulation configuration submitted alongside every exploration
//!
//! Defaults reflect a 10 MW Korean-market reference project (2024-2025
//! research figures): ~67% electrolyzer efficiency, 50 bn KRW CAPEX,
//! 6,000 KRW/kg hydrogen, 8% discount rate, 70% debt.

use serde::{Deserialize, Serialize};

/// Electrolyzer and balance-of-plant specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentConfig {
    /// MW
    pub electrolyzer_capacity: f64,
    /// %
    pub electrolyzer_efficiency: f64,
    /// kWh per kg H2
    pub specific_consumption: f64,
    /// % per year
    pub degradation_rate: f64,
    /// hours
    pub stack_lifetime: u32,
    /// %
    pub annual_availability: f64,
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        Self {
            electrolyzer_capacity: 10.0,
            electrolyzer_efficiency: 67.0,
            specific_consumption: 50.0,
            degradation_rate: 0.5,
            stack_lifetime: 80_000,
            annual_availability: 85.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ElectricitySource {
    Ppa,
    Grid,
    Hybrid,
    Renewable,
}

/// Capital and operating cost structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// KRW
    pub capex: f64,
    /// % of CAPEX per year
    pub opex_ratio: f64,
    /// KRW
    pub stack_replacement_cost: f64,
    pub electricity_source: ElectricitySource,
    /// KRW/kWh; None when power comes from a co-located renewable source
    pub ppa_price: Option<f64>,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            capex: 50_000_000_000.0,
            opex_ratio: 2.5,
            stack_replacement_cost: 5_500_000_000.0,
            electricity_source: ElectricitySource::Ppa,
            ppa_price: Some(100.0),
        }
    }
}

/// Hydrogen offtake market assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// KRW/kg
    pub h2_price: f64,
    /// % per year
    pub h2_price_escalation: f64,
    pub electricity_price_scenario: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            h2_price: 6_000.0,
            h2_price_escalation: 0.0,
            electricity_price_scenario: "base".to_string(),
        }
    }
}

/// Financing assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialConfig {
    /// %
    pub discount_rate: f64,
    /// years
    pub project_lifetime: u32,
    /// %
    pub debt_ratio: f64,
    /// %
    pub interest_rate: f64,
    /// years
    pub loan_tenor: u32,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            discount_rate: 8.0,
            project_lifetime: 20,
            debt_ratio: 70.0,
            interest_rate: 5.0,
            loan_tenor: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    P50,
    P90,
    P99,
}

/// Which stochastic effects the worker's Monte Carlo pass should model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeightsConfig {
    pub weather_variability: bool,
    pub price_volatility: bool,
    pub confidence_level: ConfidenceLevel,
}

impl Default for RiskWeightsConfig {
    fn default() -> Self {
        Self {
            weather_variability: true,
            price_volatility: true,
            confidence_level: ConfidenceLevel::P50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub iterations: u32,
    pub weather_sigma: f64,
    pub price_sigma: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            weather_sigma: 0.1,
            price_sigma: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenewableSource {
    Solar,
    Wind,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenewableProfile {
    Typical,
    Custom,
}

/// Optional co-located renewable generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenewableConfig {
    pub enabled: bool,
    pub source_type: RenewableSource,
    /// MW
    pub capacity_mw: f64,
    /// %
    pub capacity_factor: f64,
    pub profile_type: RenewableProfile,
}

impl Default for RenewableConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            source_type: RenewableSource::Solar,
            capacity_mw: 15.0,
            capacity_factor: 15.0,
            profile_type: RenewableProfile::Typical,
        }
    }
}

/// The full nested base configuration a sweep or exploration perturbs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseInput {
    pub equipment: EquipmentConfig,
    pub cost: CostConfig,
    pub market: MarketConfig,
    pub financial: FinancialConfig,
    pub risk_weights: RiskWeightsConfig,
    pub monte_carlo: MonteCarloConfig,
    pub renewable: RenewableConfig,
}
