//! Insurance plan catalog records from the plans service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use meridian_core::{MetalTier, PlanId, Premium};

/// An insurance product offered for enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub plan_code: String,
    pub plan_name: String,
    pub plan_type: String,
    pub metal_tier: MetalTier,
    pub issuer_name: String,
    pub state: String,
    pub monthly_premium: Premium,
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_deductible: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub out_of_pocket_max: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub copay_primary_care: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub copay_specialist: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub copay_emergency: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub coinsurance: Decimal,
    pub hsa_eligible: bool,
    pub hra_eligible: bool,
    pub network_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub year: i32,
}

/// One page of a paged collection response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub first: bool,
    pub last: bool,
}
