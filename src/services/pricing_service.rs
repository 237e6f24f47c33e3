use log::debug;

use crate::models::pricing::{CostItem, PriceBreakdown, PricingState};

pub struct PricingService;

impl PricingService {
    /// Sum of a cost list. Negative or non-finite costs count as zero.
    pub fn item_sum(items: &[CostItem]) -> f64 {
        items.iter().map(|item| Self::non_negative(item.cost)).sum()
    }

    /// Itemized costs plus visa/registration fee and the custom field
    pub fn base_total(pricing: &PricingState) -> f64 {
        Self::item_sum(&pricing.accommodation_items)
            + Self::item_sum(&pricing.transportation_items)
            + Self::item_sum(&pricing.activity_items)
            + Self::non_negative(pricing.visa_reg_fee)
            + Self::non_negative(pricing.custom_field)
    }

    /// Percentage of the base total. Negative rates count as zero.
    fn percentage_of(base_total: f64, rate: f64) -> f64 {
        base_total * Self::non_negative(rate) / 100.0
    }

    fn non_negative(value: f64) -> f64 {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }

    /// Live breakdown for display. Never touches `total_price`.
    pub fn breakdown(pricing: &PricingState) -> PriceBreakdown {
        let accommodation_total = Self::item_sum(&pricing.accommodation_items);
        let transportation_total = Self::item_sum(&pricing.transportation_items);
        let activity_total = Self::item_sum(&pricing.activity_items);
        let visa_reg_fee = Self::non_negative(pricing.visa_reg_fee);
        let custom_field = Self::non_negative(pricing.custom_field);

        let base_total =
            accommodation_total + transportation_total + activity_total + visa_reg_fee + custom_field;

        let commission_amount = Self::percentage_of(base_total, pricing.commission);
        let pg_charges_amount = if pricing.collect_pg_charges {
            Self::percentage_of(base_total, pricing.pg_charges)
        } else {
            0.0
        };
        let buffer_amount = Self::percentage_of(base_total, pricing.buffer_percentage);
        let your_fee = Self::non_negative(pricing.your_fee);

        let total = base_total + buffer_amount + your_fee + commission_amount + pg_charges_amount;

        PriceBreakdown {
            accommodation_total,
            transportation_total,
            activity_total,
            visa_reg_fee,
            custom_field,
            base_total,
            buffer_amount,
            commission_amount,
            pg_charges_amount,
            your_fee,
            total,
        }
    }

    pub fn calculate_total(pricing: &PricingState) -> f64 {
        Self::breakdown(pricing).total
    }

    /// Copy the live total into `total_price`. Only the submit path calls this.
    pub fn commit_total(pricing: &PricingState) -> PricingState {
        let total = Self::calculate_total(pricing);
        debug!("Committing total price {:.2}", total);

        PricingState {
            total_price: total,
            ..pricing.clone()
        }
    }
}
