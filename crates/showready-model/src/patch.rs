// SPDX-License-Identifier: Apache-2.0

//! Sparse patch structs: one per patchable entity, every field
//! present-or-absent. A field that is absent from the wire body stays
//! untouched in storage; it is never defaulted or nulled. Clearable text
//! columns use a nested `Option` so an explicit JSON `null` clears the
//! column while absence leaves it alone. The updatable column whitelist per
//! entity is exactly the field set of its patch struct.

use crate::checklist::{RentalType, ShippingMethod};
use serde::{Deserialize, Deserializer, Serialize};

/// Distinguishes `"field": null` (present, clear) from an absent key. Used
/// with `#[serde(default)]` so absence deserializes to the outer `None`.
fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChecklistPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booth_ordered: Option<bool>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub booth_notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity_ordered: Option<bool>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub electricity_notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub booth_map_url: Option<Option<String>>,
}

impl ChecklistPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.booth_ordered.is_none()
            && self.booth_notes.is_none()
            && self.electricity_ordered.is_none()
            && self.electricity_notes.is_none()
            && self.booth_map_url.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FlightPatch {
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub attendee_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_name: Option<String>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub carrier: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub confirmation_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booked: Option<bool>,
}

impl FlightPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attendee_id.is_none()
            && self.attendee_name.is_none()
            && self.carrier.is_none()
            && self.confirmation_number.is_none()
            && self.notes.is_none()
            && self.booked.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HotelPatch {
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub attendee_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_name: Option<String>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub property_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub confirmation_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booked: Option<bool>,
}

impl HotelPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attendee_id.is_none()
            && self.attendee_name.is_none()
            && self.property_name.is_none()
            && self.confirmation_number.is_none()
            && self.check_in_date.is_none()
            && self.check_out_date.is_none()
            && self.notes.is_none()
            && self.booked.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CarRentalPatch {
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub provider: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub confirmation_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub pickup_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub return_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_type: Option<RentalType>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub assigned_to_name: Option<Option<String>>,
}

impl CarRentalPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provider.is_none()
            && self.confirmation_number.is_none()
            && self.pickup_date.is_none()
            && self.return_date.is_none()
            && self.notes.is_none()
            && self.booked.is_none()
            && self.rental_type.is_none()
            && self.assigned_to_id.is_none()
            && self.assigned_to_name.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BoothShippingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<ShippingMethod>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub carrier_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub shipping_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipped: Option<bool>,
}

impl BoothShippingPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shipping_method.is_none()
            && self.carrier_name.is_none()
            && self.tracking_number.is_none()
            && self.shipping_date.is_none()
            && self.delivery_date.is_none()
            && self.notes.is_none()
            && self.shipped.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl CustomItemPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.position.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TemplatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl TemplatePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.position.is_none()
            && self.active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_stays_absent() {
        let patch: ChecklistPatch = serde_json::from_str(r#"{"boothOrdered": true}"#)
            .expect("sparse patch");
        assert_eq!(patch.booth_ordered, Some(true));
        assert!(patch.booth_notes.is_none());
        assert!(patch.booth_map_url.is_none());
        assert!(!patch.is_empty());
    }

    #[test]
    fn explicit_null_is_present_and_clears() {
        let patch: ChecklistPatch = serde_json::from_str(r#"{"boothMapUrl": null}"#)
            .expect("clearing patch");
        assert_eq!(patch.booth_map_url, Some(None));
        assert!(!patch.is_empty());
    }

    #[test]
    fn empty_body_is_empty_patch() {
        let patch: ChecklistPatch = serde_json::from_str("{}").expect("empty body");
        assert!(patch.is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_json::from_str::<ChecklistPatch>(r#"{"boothColor": "red"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn custom_item_patch_covers_all_updatable_columns() {
        let patch: CustomItemPatch = serde_json::from_str(
            r#"{"title": "Pack booth", "description": null, "completed": true, "position": 3}"#,
        )
        .expect("full patch");
        assert_eq!(patch.title.as_deref(), Some("Pack booth"));
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.completed, Some(true));
        assert_eq!(patch.position, Some(3));
    }
}
