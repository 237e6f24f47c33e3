use serde::Serialize;

use crate::models::event::EventDraft;
use crate::models::pricing::{CostCategory, PricingField};
use crate::services::itinerary_service::parse_date;

/// An inline message attached to a form field path.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn cost_path(category: CostCategory) -> &'static str {
    match category {
        CostCategory::Accommodation => "pricing.accommodationItems",
        CostCategory::Transportation => "pricing.transportationItems",
        CostCategory::Activity => "pricing.activityItems",
    }
}

fn pricing_path(field: PricingField) -> &'static str {
    match field {
        PricingField::VisaRegFee => "pricing.visaRegFee",
        PricingField::CustomField => "pricing.customField",
        PricingField::Commission => "pricing.commission",
        PricingField::PgCharges => "pricing.pgCharges",
        PricingField::BufferPercentage => "pricing.bufferPercentage",
        PricingField::YourFee => "pricing.yourFee",
    }
}

/// Checks that block submission. An empty result means the draft can be sent.
pub fn validate(draft: &EventDraft) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if draft.title.trim().is_empty() {
        issues.push(ValidationIssue::new("title", "Event title is required"));
    }

    if draft.image.as_deref().map_or(true, |image| image.trim().is_empty()) {
        issues.push(ValidationIssue::new("image", "Please upload an event image"));
    }

    if let (Some(start), Some(end)) = (
        draft.start_date.as_deref().and_then(parse_date),
        draft.end_date.as_deref().and_then(parse_date),
    ) {
        if end < start {
            issues.push(ValidationIssue::new(
                "endDate",
                "End date cannot be before the start date",
            ));
        }
    }

    validate_pricing(draft, &mut issues);
    validate_participants(draft, &mut issues);

    for (index, tier) in draft.cancellation_policy.tiers.iter().enumerate() {
        if !(0.0..=100.0).contains(&tier.refund_percentage) {
            issues.push(ValidationIssue::new(
                format!("cancellationPolicy.tiers.{}.refundPercentage", index),
                "Refund percentage must be between 0 and 100",
            ));
        }
    }

    if draft.faqs.is_empty() {
        issues.push(ValidationIssue::new("faqs", "Add at least one FAQ"));
    }
    for (index, faq) in draft.faqs.iter().enumerate() {
        if faq.question.trim().is_empty() || faq.answer.trim().is_empty() {
            issues.push(ValidationIssue::new(
                format!("faqs.{}", index),
                "FAQ needs both a question and an answer",
            ));
        }
    }

    issues
}

fn validate_pricing(draft: &EventDraft, issues: &mut Vec<ValidationIssue>) {
    let pricing = &draft.pricing;

    for category in [
        CostCategory::Accommodation,
        CostCategory::Transportation,
        CostCategory::Activity,
    ] {
        for (index, item) in pricing.items(category).iter().enumerate() {
            if item.cost < 0.0 {
                issues.push(ValidationIssue::new(
                    format!("{}.{}.cost", cost_path(category), index),
                    "Cost cannot be negative",
                ));
            }
        }
    }

    for field in [
        PricingField::VisaRegFee,
        PricingField::CustomField,
        PricingField::Commission,
        PricingField::PgCharges,
        PricingField::BufferPercentage,
        PricingField::YourFee,
    ] {
        if pricing.field(field) < 0.0 {
            issues.push(ValidationIssue::new(
                pricing_path(field),
                "Value cannot be negative",
            ));
        }
    }

    for (day_index, day) in draft.structured_itinerary.iter().enumerate() {
        for (stop_index, stop) in day.stops.iter().enumerate() {
            if stop.additional_cost < 0.0 {
                issues.push(ValidationIssue::new(
                    format!(
                        "structuredItinerary.{}.stops.{}.additionalCost",
                        day_index, stop_index
                    ),
                    "Additional cost cannot be negative",
                ));
            }
        }
    }
}

fn validate_participants(draft: &EventDraft, issues: &mut Vec<ValidationIssue>) {
    let rules = &draft.participant_rules;

    if let (Some(min), Some(max)) = (rules.min_group, rules.max_group) {
        if min > max {
            issues.push(ValidationIssue::new(
                "participantRules.maxGroup",
                "Maximum group size must be at least the minimum",
            ));
        }
    }

    if let (Some(min), Some(max)) = (rules.min_age, rules.max_age) {
        if min > max {
            issues.push(ValidationIssue::new(
                "participantRules.maxAge",
                "Maximum age must be at least the minimum",
            ));
        }
    }
}
