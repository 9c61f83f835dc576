// SPDX-License-Identifier: Apache-2.0

use crate::ids::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The one-per-event logistics record. Sub-collections live in their own
/// tables and are joined into a [`ChecklistAggregate`] at the read boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: i64,
    pub event_id: String,
    pub booth_ordered: bool,
    pub booth_notes: Option<String>,
    pub electricity_ordered: bool,
    pub electricity_notes: Option<String>,
    pub booth_map_url: Option<String>,
    pub templates_applied: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub id: i64,
    pub checklist_id: i64,
    pub attendee_id: Option<String>,
    pub attendee_name: String,
    pub carrier: Option<String>,
    pub confirmation_number: Option<String>,
    pub notes: Option<String>,
    pub booked: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: i64,
    pub checklist_id: i64,
    pub attendee_id: Option<String>,
    pub attendee_name: String,
    pub property_name: Option<String>,
    pub confirmation_number: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub notes: Option<String>,
    pub booked: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarRental {
    pub id: i64,
    pub checklist_id: i64,
    pub provider: Option<String>,
    pub confirmation_number: Option<String>,
    pub pickup_date: Option<String>,
    pub return_date: Option<String>,
    pub notes: Option<String>,
    pub booked: bool,
    pub rental_type: RentalType,
    pub assigned_to_id: Option<String>,
    pub assigned_to_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoothShipping {
    pub id: i64,
    pub checklist_id: i64,
    pub shipping_method: ShippingMethod,
    pub carrier_name: Option<String>,
    pub tracking_number: Option<String>,
    pub shipping_date: Option<String>,
    pub delivery_date: Option<String>,
    pub notes: Option<String>,
    pub shipped: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomItem {
    pub id: i64,
    pub checklist_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub position: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Read-side view: the checklist plus every sub-collection. Collections are
/// always arrays, present even when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistAggregate {
    pub checklist: Checklist,
    pub flights: Vec<Flight>,
    pub hotels: Vec<Hotel>,
    pub car_rentals: Vec<CarRental>,
    pub booth_shipping: Vec<BoothShipping>,
    pub custom_items: Vec<CustomItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFlight {
    pub attendee_id: Option<String>,
    pub attendee_name: String,
    pub carrier: Option<String>,
    pub confirmation_number: Option<String>,
    pub notes: Option<String>,
    pub booked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewHotel {
    pub attendee_id: Option<String>,
    pub attendee_name: String,
    pub property_name: Option<String>,
    pub confirmation_number: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub notes: Option<String>,
    pub booked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCarRental {
    pub provider: Option<String>,
    pub confirmation_number: Option<String>,
    pub pickup_date: Option<String>,
    pub return_date: Option<String>,
    pub notes: Option<String>,
    pub booked: bool,
    pub rental_type: RentalType,
    pub assigned_to_id: Option<String>,
    pub assigned_to_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBoothShipping {
    pub shipping_method: ShippingMethod,
    pub carrier_name: Option<String>,
    pub tracking_number: Option<String>,
    pub shipping_date: Option<String>,
    pub delivery_date: Option<String>,
    pub notes: Option<String>,
    pub shipped: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCustomItem {
    pub title: String,
    pub description: Option<String>,
    pub position: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalType {
    Group,
    Individual,
}

impl RentalType {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "group" => Ok(Self::Group),
            "individual" => Ok(Self::Individual),
            other => Err(ValidationError(format!(
                "rental type must be 'group' or 'individual', got '{other}'"
            ))),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Individual => "individual",
        }
    }
}

impl Display for RentalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for RentalType {
    fn default() -> Self {
        Self::Group
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    Manual,
    Carrier,
}

impl ShippingMethod {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "manual" => Ok(Self::Manual),
            "carrier" => Ok(Self::Carrier),
            other => Err(ValidationError(format!(
                "shipping method must be 'manual' or 'carrier', got '{other}'"
            ))),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Carrier => "carrier",
        }
    }
}

impl Display for ShippingMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rental_type_round_trips_wire_form() {
        assert_eq!(RentalType::parse("group").expect("group"), RentalType::Group);
        assert_eq!(
            RentalType::parse("individual").expect("individual").as_str(),
            "individual"
        );
        assert!(RentalType::parse("fleet").is_err());
    }

    #[test]
    fn shipping_method_rejects_unknown_values() {
        assert_eq!(
            ShippingMethod::parse("carrier").expect("carrier"),
            ShippingMethod::Carrier
        );
        assert!(ShippingMethod::parse("drone").is_err());
    }

    #[test]
    fn aggregate_serializes_empty_collections_as_arrays() {
        let agg = ChecklistAggregate {
            checklist: Checklist {
                id: 1,
                event_id: "ev-1".to_string(),
                booth_ordered: false,
                booth_notes: None,
                electricity_ordered: false,
                electricity_notes: None,
                booth_map_url: None,
                templates_applied: false,
                created_at: "2026-01-01T00:00:00Z".to_string(),
                updated_at: "2026-01-01T00:00:00Z".to_string(),
            },
            flights: Vec::new(),
            hotels: Vec::new(),
            car_rentals: Vec::new(),
            booth_shipping: Vec::new(),
            custom_items: Vec::new(),
        };
        let value = serde_json::to_value(&agg).expect("serialize aggregate");
        for key in [
            "flights",
            "hotels",
            "car_rentals",
            "booth_shipping",
            "custom_items",
        ] {
            assert!(
                value.get(key).and_then(|v| v.as_array()).is_some(),
                "{key} must serialize as an array"
            );
        }
    }
}
