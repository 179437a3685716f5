use std::borrow::Cow;

use common::error::AppError;
use i18n::Locale;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::plan::{Cadence, PricingCatalog};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    #[validate(custom(function = "validate_plan_id"))]
    pub plan_id: String,
    #[validate(custom(function = "validate_cadence"))]
    pub cadence: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_locale"))]
    pub locale: String,
}

/// A checkout request that passed validation.
#[derive(Debug, Clone)]
pub struct CheckoutSelection {
    pub plan_id: String,
    pub cadence: Cadence,
    pub email: Option<String>,
    pub locale: Locale,
}

impl TryFrom<CheckoutSessionRequest> for CheckoutSelection {
    type Error = AppError;

    fn try_from(req: CheckoutSessionRequest) -> Result<Self, Self::Error> {
        req.validate()?;

        let cadence = Cadence::parse(&req.cadence)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid cadence: {}", req.cadence)))?;
        let locale = Locale::parse(&req.locale)
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported locale: {}", req.locale)))?;

        Ok(Self {
            plan_id: req.plan_id,
            cadence,
            email: req.email,
            locale,
        })
    }
}

fn issue(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_plan_id(plan_id: &str) -> Result<(), ValidationError> {
    if plan_id.trim().is_empty() {
        return Err(issue("required", "planId is required"));
    }
    Ok(())
}

fn validate_cadence(cadence: &str) -> Result<(), ValidationError> {
    match Cadence::parse(cadence) {
        Some(_) => Ok(()),
        None => Err(issue("cadence", "cadence must be 'monthly' or 'yearly'")),
    }
}

fn validate_locale(locale: &str) -> Result<(), ValidationError> {
    match Locale::parse(locale) {
        Some(_) => Ok(()),
        None => Err(issue("locale", "locale is not supported")),
    }
}

#[derive(Debug, Serialize)]
pub struct CheckoutSessionResponse {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct PlanSummary {
    pub id: String,
    pub cadences: Vec<Cadence>,
}

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub plans: Vec<PlanSummary>,
}

impl From<&PricingCatalog> for PlansResponse {
    fn from(catalog: &PricingCatalog) -> Self {
        Self {
            plans: catalog
                .plans()
                .iter()
                .map(|plan| PlanSummary {
                    id: plan.id.clone(),
                    cadences: plan.cadences(),
                })
                .collect(),
        }
    }
}
