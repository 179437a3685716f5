use std::fmt;

use common::env_config::PricingConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Monthly,
    Yearly,
}

impl Cadence {
    pub const ALL: [Cadence; 2] = [Cadence::Monthly, Cadence::Yearly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Monthly => "monthly",
            Cadence::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Cadence> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PricingPlan {
    pub id: String,
    pub monthly_price_id: Option<String>,
    pub yearly_price_id: Option<String>,
}

impl PricingPlan {
    pub fn price_for(&self, cadence: Cadence) -> Option<&str> {
        match cadence {
            Cadence::Monthly => self.monthly_price_id.as_deref(),
            Cadence::Yearly => self.yearly_price_id.as_deref(),
        }
    }

    /// Cadences that have a Stripe price configured.
    pub fn cadences(&self) -> Vec<Cadence> {
        Cadence::ALL
            .into_iter()
            .filter(|c| self.price_for(*c).is_some())
            .collect()
    }
}

/// Static plan catalog, built once at startup.
#[derive(Debug, Clone)]
pub struct PricingCatalog {
    plans: Vec<PricingPlan>,
}

impl PricingCatalog {
    pub fn new(plans: Vec<PricingPlan>) -> Self {
        Self { plans }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(
            config
                .plans
                .iter()
                .map(|p| PricingPlan {
                    id: p.plan_id.clone(),
                    monthly_price_id: p.monthly.clone(),
                    yearly_price_id: p.yearly.clone(),
                })
                .collect(),
        )
    }

    pub fn get(&self, plan_id: &str) -> Option<&PricingPlan> {
        self.plans.iter().find(|p| p.id == plan_id)
    }

    pub fn plans(&self) -> &[PricingPlan] {
        &self.plans
    }
}
