use serde::{Deserialize, Serialize};

use super::number::{deserialize_buffer_percentage, deserialize_coerced_f64};

pub const DEFAULT_BUFFER_PERCENTAGE: f64 = 10.0;

fn default_buffer_percentage() -> f64 {
    DEFAULT_BUFFER_PERCENTAGE
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct CostItem {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_coerced_f64")]
    pub cost: f64,
}

impl CostItem {
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            cost,
        }
    }
}

/// Which itemized list a cost row belongs to.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CostCategory {
    Accommodation,
    Transportation,
    Activity,
}

/// Flat (non-itemized) numeric pricing inputs.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PricingField {
    VisaRegFee,
    CustomField,
    Commission,
    PgCharges,
    BufferPercentage,
    YourFee,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingState {
    #[serde(default)]
    pub accommodation_items: Vec<CostItem>,
    #[serde(default)]
    pub transportation_items: Vec<CostItem>,
    #[serde(default)]
    pub activity_items: Vec<CostItem>,
    #[serde(default, deserialize_with = "deserialize_coerced_f64")]
    pub visa_reg_fee: f64,
    #[serde(default, deserialize_with = "deserialize_coerced_f64")]
    pub custom_field: f64,
    #[serde(default, deserialize_with = "deserialize_coerced_f64")]
    pub commission: f64,
    #[serde(default, deserialize_with = "deserialize_coerced_f64")]
    pub pg_charges: f64,
    #[serde(
        default = "default_buffer_percentage",
        deserialize_with = "deserialize_buffer_percentage"
    )]
    pub buffer_percentage: f64,
    #[serde(default, deserialize_with = "deserialize_coerced_f64")]
    pub your_fee: f64,
    #[serde(default)]
    pub settle_to_vendor: bool,
    #[serde(default, rename = "collectPGCharges")]
    pub collect_pg_charges: bool,
    /// Last committed total. Only reflects the inputs right after a submit.
    #[serde(default, deserialize_with = "deserialize_coerced_f64")]
    pub total_price: f64,
}

impl Default for PricingState {
    fn default() -> Self {
        Self {
            accommodation_items: Vec::new(),
            transportation_items: Vec::new(),
            activity_items: Vec::new(),
            visa_reg_fee: 0.0,
            custom_field: 0.0,
            commission: 0.0,
            pg_charges: 0.0,
            buffer_percentage: DEFAULT_BUFFER_PERCENTAGE,
            your_fee: 0.0,
            settle_to_vendor: false,
            collect_pg_charges: false,
            total_price: 0.0,
        }
    }
}

impl PricingState {
    pub fn items(&self, category: CostCategory) -> &Vec<CostItem> {
        match category {
            CostCategory::Accommodation => &self.accommodation_items,
            CostCategory::Transportation => &self.transportation_items,
            CostCategory::Activity => &self.activity_items,
        }
    }

    pub fn items_mut(&mut self, category: CostCategory) -> &mut Vec<CostItem> {
        match category {
            CostCategory::Accommodation => &mut self.accommodation_items,
            CostCategory::Transportation => &mut self.transportation_items,
            CostCategory::Activity => &mut self.activity_items,
        }
    }

    pub fn field(&self, field: PricingField) -> f64 {
        match field {
            PricingField::VisaRegFee => self.visa_reg_fee,
            PricingField::CustomField => self.custom_field,
            PricingField::Commission => self.commission,
            PricingField::PgCharges => self.pg_charges,
            PricingField::BufferPercentage => self.buffer_percentage,
            PricingField::YourFee => self.your_fee,
        }
    }

    pub fn set_field(&mut self, field: PricingField, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        match field {
            PricingField::VisaRegFee => self.visa_reg_fee = value,
            PricingField::CustomField => self.custom_field = value,
            PricingField::Commission => self.commission = value,
            PricingField::PgCharges => self.pg_charges = value,
            PricingField::BufferPercentage => self.buffer_percentage = value,
            PricingField::YourFee => self.your_fee = value,
        }
    }
}

/// Decomposed total shown next to the pricing form.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub accommodation_total: f64,
    pub transportation_total: f64,
    pub activity_total: f64,
    pub visa_reg_fee: f64,
    pub custom_field: f64,
    pub base_total: f64,
    pub buffer_amount: f64,
    pub commission_amount: f64,
    pub pg_charges_amount: f64,
    pub your_fee: f64,
    pub total: f64,
}
