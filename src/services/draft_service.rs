use log::{debug, error, info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{DraftError, Result, SubmitError};
use crate::models::event::{
    AccommodationDetails, CancellationPolicy, CategoryDetails, EventCategory, EventDraft, Faq,
    ParticipantRules,
};
use crate::models::itinerary::transforms::ItineraryEncoding;
use crate::models::itinerary::{DayKey, ItineraryDay, ItineraryMode, Stop, StopField, TripDate};
use crate::models::pricing::{CostCategory, CostItem, PriceBreakdown, PricingField};
use crate::services::itinerary_service::{self, next_extra_label};
use crate::services::pricing_service::PricingService;
use crate::services::submission_service::{banner_message, encode_for_submission, SubmissionSink};
use crate::services::validation_service::{self, ValidationIssue};

/// Partial edit of a day's own fields. `None` leaves the field alone.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Every edit the form can make to a draft.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum DraftAction {
    SetTitle(String),
    SetImage(Option<String>),
    SetDescription(String),
    SetCategory(EventCategory),
    SetCategoryDetails(CategoryDetails),
    SetStartDate(Option<String>),
    SetEndDate(Option<String>),
    /// A blank or missing label gets the next free "Extra Day K".
    AddExtraDate(Option<String>),
    RemoveExtraDate(usize),
    SetItineraryMode(ItineraryMode),
    SetItineraryText(String),
    UpdateDay {
        key: DayKey,
        patch: DayPatch,
    },
    AddStop {
        key: DayKey,
    },
    UpdateStop {
        key: DayKey,
        index: usize,
        field: StopField,
    },
    RemoveStop {
        key: DayKey,
        index: usize,
    },
    AddCostItem(CostCategory),
    UpdateCostItem {
        category: CostCategory,
        index: usize,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        cost: Option<f64>,
    },
    RemoveCostItem {
        category: CostCategory,
        index: usize,
    },
    SetPricingField {
        field: PricingField,
        value: f64,
    },
    SetSettleToVendor(bool),
    SetCollectPgCharges(bool),
    SetAccommodation(AccommodationDetails),
    SetParticipantRules(ParticipantRules),
    SetCancellationPolicy(CancellationPolicy),
    AddFaq,
    UpdateFaq {
        index: usize,
        #[serde(default)]
        question: Option<String>,
        #[serde(default)]
        answer: Option<String>,
    },
    RemoveFaq(usize),
}

// Top-level fields whose change invalidates the derived day list
const DATE_INPUT_PATHS: [&str; 4] = ["startDate", "endDate", "extraDates", "structuredItinerary"];

// Written only by loading a record and by the submit commit
const READ_ONLY_PATHS: [&str; 2] = ["id", "pricing.totalPrice"];

/// Re-derive the structured itinerary from the draft's date inputs. Extra
/// labels that collide with a trip date or an earlier extra are removed from
/// `extra_dates` too, so each day key names exactly one day.
pub fn reconcile_draft(draft: &EventDraft) -> EventDraft {
    let trip = itinerary_service::trip_dates(draft.start_date.as_deref(), draft.end_date.as_deref());
    let extra_dates = itinerary_service::distinct_extra_dates(&trip, &draft.extra_dates);

    EventDraft {
        structured_itinerary: itinerary_service::reconcile(
            draft.start_date.as_deref(),
            draft.end_date.as_deref(),
            &extra_dates,
            &draft.structured_itinerary,
        ),
        extra_dates,
        ..draft.clone()
    }
}

fn day_mut<'a>(draft: &'a mut EventDraft, key: &DayKey) -> Option<&'a mut ItineraryDay> {
    let day = draft
        .structured_itinerary
        .iter_mut()
        .find(|day| day.date == key.date);
    if day.is_none() {
        warn!("No itinerary day for {:?}, edit ignored", key.date);
    }
    day
}

fn item_mut<'a, T>(items: &'a mut [T], index: usize, what: &str) -> Option<&'a mut T> {
    let len = items.len();
    let item = items.get_mut(index);
    if item.is_none() {
        warn!("{} index {} out of range (len {}), edit ignored", what, index, len);
    }
    item
}

fn remove_at<T>(items: &mut Vec<T>, index: usize, what: &str) -> bool {
    if index < items.len() {
        items.remove(index);
        true
    } else {
        warn!(
            "{} index {} out of range (len {}), removal ignored",
            what,
            index,
            items.len()
        );
        false
    }
}

/// Apply one action to a snapshot, producing the next snapshot. Date-input
/// changes re-run the day reconciler before returning.
pub fn reduce(draft: &EventDraft, action: DraftAction) -> EventDraft {
    let mut next = draft.clone();
    let mut dates_changed = false;

    match action {
        DraftAction::SetTitle(title) => next.title = title,
        DraftAction::SetImage(image) => next.image = image,
        DraftAction::SetDescription(description) => next.description = description,
        DraftAction::SetCategory(category) => next.category = category,
        DraftAction::SetCategoryDetails(details) => next.category_details = details,
        DraftAction::SetStartDate(date) => {
            next.start_date = date;
            dates_changed = true;
        }
        DraftAction::SetEndDate(date) => {
            next.end_date = date;
            dates_changed = true;
        }
        DraftAction::AddExtraDate(label) => {
            let trip = itinerary_service::trip_dates(
                next.start_date.as_deref(),
                next.end_date.as_deref(),
            );
            let label = match label.map(|l| l.trim().to_string()) {
                Some(label) if !label.is_empty() => label,
                _ => next_extra_label(&trip, &next.extra_dates),
            };

            let duplicate = next.extra_dates.contains(&label)
                || trip.iter().any(|date| date.iso_date == label);
            if duplicate {
                warn!("Extra day {:?} already exists, not added", label);
            } else {
                next.extra_dates.push(label);
                dates_changed = true;
            }
        }
        DraftAction::RemoveExtraDate(index) => {
            dates_changed = remove_at(&mut next.extra_dates, index, "Extra day");
        }
        // Switching modes never clears the structured days
        DraftAction::SetItineraryMode(mode) => next.itinerary_mode = mode,
        DraftAction::SetItineraryText(text) => next.itinerary_text = text,
        DraftAction::UpdateDay { key, patch } => {
            if let Some(day) = day_mut(&mut next, &key) {
                if let Some(title) = patch.title {
                    day.title = title;
                }
                if let Some(overview) = patch.overview {
                    day.overview = overview;
                }
                if let Some(completed) = patch.completed {
                    day.completed = completed;
                }
            }
        }
        DraftAction::AddStop { key } => {
            if let Some(day) = day_mut(&mut next, &key) {
                day.stops.push(Stop::default());
            }
        }
        DraftAction::UpdateStop { key, index, field } => {
            if let Some(day) = day_mut(&mut next, &key) {
                if let Some(stop) = item_mut(&mut day.stops, index, "Stop") {
                    stop.apply(field);
                }
            }
        }
        DraftAction::RemoveStop { key, index } => {
            if let Some(day) = day_mut(&mut next, &key) {
                remove_at(&mut day.stops, index, "Stop");
            }
        }
        DraftAction::AddCostItem(category) => {
            next.pricing.items_mut(category).push(CostItem::default());
        }
        DraftAction::UpdateCostItem {
            category,
            index,
            name,
            cost,
        } => {
            if let Some(item) = item_mut(next.pricing.items_mut(category), index, "Cost item") {
                if let Some(name) = name {
                    item.name = name;
                }
                if let Some(cost) = cost {
                    item.cost = if cost.is_finite() { cost } else { 0.0 };
                }
            }
        }
        DraftAction::RemoveCostItem { category, index } => {
            remove_at(next.pricing.items_mut(category), index, "Cost item");
        }
        DraftAction::SetPricingField { field, value } => next.pricing.set_field(field, value),
        DraftAction::SetSettleToVendor(on) => next.pricing.settle_to_vendor = on,
        DraftAction::SetCollectPgCharges(on) => next.pricing.collect_pg_charges = on,
        DraftAction::SetAccommodation(accommodation) => next.accommodation = accommodation,
        DraftAction::SetParticipantRules(rules) => next.participant_rules = rules,
        DraftAction::SetCancellationPolicy(policy) => next.cancellation_policy = policy,
        DraftAction::AddFaq => next.faqs.push(Faq::default()),
        DraftAction::UpdateFaq {
            index,
            question,
            answer,
        } => {
            if let Some(faq) = item_mut(&mut next.faqs, index, "FAQ") {
                if let Some(question) = question {
                    faq.question = question;
                }
                if let Some(answer) = answer {
                    faq.answer = answer;
                }
            }
        }
        DraftAction::RemoveFaq(index) => {
            remove_at(&mut next.faqs, index, "FAQ");
        }
    }

    if dates_changed {
        next = reconcile_draft(&next);
    }

    next
}

fn split_path(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if path.trim().is_empty() || segments.iter().any(|segment| segment.is_empty()) {
        return Err(DraftError::UnknownPath(path.to_string()));
    }
    Ok(segments)
}

fn lookup<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(list) => segment.parse::<usize>().ok().and_then(|i| list.get(i)),
        _ => None,
    }
}

fn lookup_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(list) => segment.parse::<usize>().ok().and_then(|i| list.get_mut(i)),
        _ => None,
    }
}

/// Owns the single mutable draft snapshot. Every change goes through
/// `dispatch` or `set_value`, which swap in a whole new snapshot.
pub struct DraftController {
    snapshot: EventDraft,
    encoding: ItineraryEncoding,
}

impl DraftController {
    pub fn new(encoding: ItineraryEncoding) -> Self {
        Self {
            snapshot: EventDraft::default(),
            encoding,
        }
    }

    /// Start editing a persisted draft. Day numbers are fixed up immediately.
    pub fn load(draft: EventDraft, encoding: ItineraryEncoding) -> Self {
        Self {
            snapshot: reconcile_draft(&draft),
            encoding,
        }
    }

    pub fn snapshot(&self) -> &EventDraft {
        &self.snapshot
    }

    pub fn dispatch(&mut self, action: DraftAction) {
        debug!("Dispatching {:?}", action);
        self.snapshot = reduce(&self.snapshot, action);
    }

    pub fn trip_dates(&self) -> Vec<TripDate> {
        itinerary_service::trip_dates(
            self.snapshot.start_date.as_deref(),
            self.snapshot.end_date.as_deref(),
        )
    }

    /// Live breakdown for display; `pricing.totalPrice` is not touched.
    pub fn price_breakdown(&self) -> PriceBreakdown {
        PricingService::breakdown(&self.snapshot.pricing)
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        validation_service::validate(&self.snapshot)
    }

    /// Read a dot-separated path such as `pricing.commission` or
    /// `structuredItinerary.0.title`.
    pub fn get_value(&self, path: &str) -> Option<Value> {
        let segments = split_path(path).ok()?;
        let document = serde_json::to_value(&self.snapshot).ok()?;

        let mut current = &document;
        for segment in segments {
            current = lookup(current, segment)?;
        }
        Some(current.clone())
    }

    /// Write a value at an existing path. `id` and `pricing.totalPrice` are
    /// read-only. On any error the snapshot is left as it was.
    pub fn set_value(&mut self, path: &str, value: Value) -> Result<()> {
        let segments = split_path(path)?;
        let read_only = READ_ONLY_PATHS.iter().any(|locked| {
            path == *locked || path.starts_with(&format!("{}.", locked))
        });
        if read_only {
            return Err(DraftError::ReadOnlyPath(path.to_string()));
        }
        let mut document = serde_json::to_value(&self.snapshot)?;

        let target = segments
            .iter()
            .try_fold(&mut document, |current, segment| lookup_mut(current, segment))
            .ok_or_else(|| DraftError::UnknownPath(path.to_string()))?;
        *target = value;

        let mut next = EventDraft::from_value(document).map_err(|err| DraftError::InvalidValue {
            path: path.to_string(),
            reason: err.to_string(),
        })?;

        if DATE_INPUT_PATHS.contains(&segments[0]) {
            next = reconcile_draft(&next);
        }

        self.snapshot = next;
        Ok(())
    }

    /// Snapshot as it would be sent: itinerary reconciled, total committed.
    pub fn finalize(&self) -> EventDraft {
        let reconciled = reconcile_draft(&self.snapshot);
        EventDraft {
            pricing: PricingService::commit_total(&reconciled.pricing),
            ..reconciled
        }
    }

    /// Validate, freeze the total and hand the draft to `sink`. Returns the
    /// record ID. On failure the snapshot is unchanged so the user can retry.
    pub async fn submit<S: SubmissionSink>(
        &mut self,
        sink: &S,
    ) -> std::result::Result<String, SubmitError> {
        let finalized = self.finalize();

        let issues = validation_service::validate(&finalized);
        if !issues.is_empty() {
            info!("Submission blocked by {} validation issue(s)", issues.len());
            return Err(SubmitError::Validation(issues));
        }

        let payload = encode_for_submission(&finalized, self.encoding)?;

        let result = match finalized.id.as_deref() {
            Some(id) => sink.update(id, payload).await.map(|_| id.to_string()),
            None => sink.create(payload).await,
        };

        match result {
            Ok(id) => {
                info!(
                    "Event {} saved with total price {:.2}",
                    id, finalized.pricing.total_price
                );
                self.snapshot = EventDraft {
                    id: Some(id.clone()),
                    ..finalized
                };
                Ok(id)
            }
            Err(err) => {
                error!("Failed to save event: {}", err);
                Err(SubmitError::Submission {
                    banner: banner_message(&err),
                    source: err,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn three_day_draft() -> EventDraft {
        reduce(
            &reduce(
                &EventDraft::default(),
                DraftAction::SetStartDate(Some("2024-05-10".to_string())),
            ),
            DraftAction::SetEndDate(Some("2024-05-12".to_string())),
        )
    }

    #[test]
    fn test_date_changes_reconcile() {
        let draft = three_day_draft();
        assert_eq!(draft.structured_itinerary.len(), 3);
        assert_eq!(draft.structured_itinerary[2].date, "2024-05-12");
    }

    #[test]
    fn test_add_and_remove_extra_dates() {
        let draft = reduce(&three_day_draft(), DraftAction::AddExtraDate(None));
        let draft = reduce(&draft, DraftAction::AddExtraDate(Some("  ".to_string())));
        assert_eq!(draft.extra_dates, vec!["Extra Day 1", "Extra Day 2"]);
        assert_eq!(draft.structured_itinerary[3].day, 4);
        assert_eq!(draft.structured_itinerary[4].day, 5);

        let draft = reduce(&draft, DraftAction::RemoveExtraDate(0));
        assert_eq!(draft.structured_itinerary.len(), 4);
        assert_eq!(draft.structured_itinerary[3].day, 4);
        assert_eq!(draft.structured_itinerary[3].date, "Extra Day 2");
    }

    #[test]
    fn test_duplicate_extra_date_ignored() {
        let draft = reduce(
            &three_day_draft(),
            DraftAction::AddExtraDate(Some("Bonus".to_string())),
        );
        let again = reduce(&draft, DraftAction::AddExtraDate(Some("Bonus".to_string())));
        assert_eq!(again, draft);

        let clash = reduce(&draft, DraftAction::AddExtraDate(Some("2024-05-11".to_string())));
        assert_eq!(clash.extra_dates, vec!["Bonus"]);
    }

    #[test]
    fn test_out_of_range_edits_are_no_ops() {
        let draft = three_day_draft();
        assert_eq!(reduce(&draft, DraftAction::RemoveExtraDate(3)), draft);
        assert_eq!(reduce(&draft, DraftAction::RemoveFaq(0)), draft);
        assert_eq!(
            reduce(
                &draft,
                DraftAction::AddStop {
                    key: DayKey::from("2031-01-01")
                }
            ),
            draft
        );
    }

    #[test]
    fn test_stop_editing_by_day_key() {
        let key = DayKey::from("2024-05-11");
        let draft = reduce(&three_day_draft(), DraftAction::AddStop { key: key.clone() });
        let draft = reduce(&draft, DraftAction::AddStop { key: key.clone() });
        let draft = reduce(
            &draft,
            DraftAction::UpdateStop {
                key: key.clone(),
                index: 1,
                field: StopField::Name("Key Monastery".to_string()),
            },
        );
        let draft = reduce(&draft, DraftAction::RemoveStop { key, index: 0 });

        let stops = &draft.structured_itinerary[1].stops;
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].name, "Key Monastery");
        assert_eq!(stops[0].additional_cost, 0.0);
    }

    #[test]
    fn test_stop_place_from_picker() {
        use crate::models::itinerary::Place;

        let key = DayKey::from("2024-05-10");
        let draft = reduce(&three_day_draft(), DraftAction::AddStop { key: key.clone() });
        let draft = reduce(
            &draft,
            DraftAction::UpdateStop {
                key,
                index: 0,
                field: StopField::Place(Place {
                    country: "India".to_string(),
                    state: "HP".to_string(),
                    city: "Manali".to_string(),
                    full: String::new(),
                }),
            },
        );

        let place = &draft.structured_itinerary[0].stops[0].place;
        assert_eq!(place.city, "Manali");
        assert_eq!(place.full, "Manali, HP, India");
    }

    #[test]
    fn test_mode_toggle_keeps_structured_days() {
        let draft = reduce(
            &three_day_draft(),
            DraftAction::UpdateDay {
                key: DayKey::from("2024-05-10"),
                patch: DayPatch {
                    overview: Some("Acclimatise".to_string()),
                    ..DayPatch::default()
                },
            },
        );
        let free = reduce(&draft, DraftAction::SetItineraryMode(ItineraryMode::FreeText));
        let back = reduce(&free, DraftAction::SetItineraryMode(ItineraryMode::Structured));

        assert_eq!(free.structured_itinerary, draft.structured_itinerary);
        assert_eq!(back, draft);
    }

    #[test]
    fn test_action_deserializes_from_form_payload() {
        let action: DraftAction = serde_json::from_value(json!({
            "type": "updateCostItem",
            "payload": { "category": "transportation", "index": 0, "cost": 30.0 }
        }))
        .unwrap();

        assert_eq!(
            action,
            DraftAction::UpdateCostItem {
                category: CostCategory::Transportation,
                index: 0,
                name: None,
                cost: Some(30.0),
            }
        );
    }

    #[test]
    fn test_get_and_set_value() {
        let mut controller = DraftController::new(ItineraryEncoding::String);
        controller
            .set_value("pricing.commission", json!("12.5"))
            .unwrap();
        assert_eq!(controller.get_value("pricing.commission"), Some(json!(12.5)));
        assert_eq!(controller.get_value("pricing.nope"), None);

        controller.set_value("startDate", json!("2024-05-10")).unwrap();
        controller.set_value("endDate", json!("2024-05-11")).unwrap();
        assert_eq!(
            controller.get_value("structuredItinerary.1.day"),
            Some(json!(2))
        );

        controller
            .set_value("structuredItinerary.0.title", json!("Arrival"))
            .unwrap();
        assert_eq!(controller.snapshot().structured_itinerary[0].title, "Arrival");
    }

    #[test]
    fn test_set_value_errors_leave_snapshot() {
        let mut controller = DraftController::new(ItineraryEncoding::String);
        let before = controller.snapshot().clone();

        assert!(matches!(
            controller.set_value("pricing.unknownField", json!(1)),
            Err(DraftError::UnknownPath(_))
        ));
        assert!(matches!(
            controller.set_value("", json!(1)),
            Err(DraftError::UnknownPath(_))
        ));
        assert!(matches!(
            controller.set_value("faqs", json!("not a list")),
            Err(DraftError::InvalidValue { .. })
        ));
        assert_eq!(controller.snapshot(), &before);
    }

    #[test]
    fn test_extra_date_absorbed_when_range_grows() {
        let mut draft = reduce(
            &EventDraft::default(),
            DraftAction::SetStartDate(Some("2024-05-10".to_string())),
        );
        draft = reduce(&draft, DraftAction::SetEndDate(Some("2024-05-11".to_string())));
        draft = reduce(&draft, DraftAction::AddExtraDate(Some("2024-05-12".to_string())));
        assert_eq!(draft.structured_itinerary.len(), 3);

        draft = reduce(&draft, DraftAction::SetEndDate(Some("2024-05-12".to_string())));
        assert!(draft.extra_dates.is_empty());
        assert_eq!(draft.structured_itinerary.len(), 3);

        let key = DayKey::from("2024-05-12");
        draft = reduce(
            &draft,
            DraftAction::UpdateDay {
                key,
                patch: DayPatch {
                    overview: Some("Pin Valley".to_string()),
                    ..DayPatch::default()
                },
            },
        );
        draft = reduce(&draft, DraftAction::AddExtraDate(None));

        let overviews: Vec<&str> = draft
            .structured_itinerary
            .iter()
            .map(|day| day.overview.as_str())
            .collect();
        assert_eq!(overviews, vec!["", "", "Pin Valley", ""]);
        assert_eq!(draft.extra_dates, vec!["Extra Day 1"]);
    }

    #[test]
    fn test_duplicate_extra_dates_written_by_path() {
        let mut controller = DraftController::new(ItineraryEncoding::String);
        controller.set_value("extraDates", json!(["A", "A"])).unwrap();
        assert_eq!(controller.snapshot().extra_dates, vec!["A"]);

        controller.dispatch(DraftAction::UpdateDay {
            key: DayKey::from("A"),
            patch: DayPatch {
                title: Some("Rest day".to_string()),
                ..DayPatch::default()
            },
        });
        controller.dispatch(DraftAction::AddExtraDate(None));

        let days = &controller.snapshot().structured_itinerary;
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].title, "Rest day");
    }

    #[test]
    fn test_read_only_paths() {
        let mut controller = DraftController::load(
            EventDraft {
                id: Some("665f1c2e9d1b2a0012345678".to_string()),
                ..EventDraft::default()
            },
            ItineraryEncoding::String,
        );
        let before = controller.snapshot().clone();

        for path in ["id", "pricing.totalPrice"] {
            assert!(matches!(
                controller.set_value(path, json!("x")),
                Err(DraftError::ReadOnlyPath(_))
            ));
        }
        assert_eq!(controller.snapshot(), &before);

        // Prefix match is on whole segments only
        assert!(matches!(
            controller.set_value("idea", json!(1)),
            Err(DraftError::UnknownPath(_))
        ));
    }

    #[test]
    fn test_finalize_commits_total() {
        let mut controller = DraftController::new(ItineraryEncoding::String);
        controller.dispatch(DraftAction::AddCostItem(CostCategory::Accommodation));
        controller.dispatch(DraftAction::UpdateCostItem {
            category: CostCategory::Accommodation,
            index: 0,
            name: Some("Hotel".to_string()),
            cost: Some(100.0),
        });

        assert_eq!(controller.price_breakdown().total, 110.0);
        assert_eq!(controller.snapshot().pricing.total_price, 0.0);
        assert_eq!(controller.finalize().pricing.total_price, 110.0);
        assert_eq!(controller.snapshot().pricing.total_price, 0.0);
    }
}
