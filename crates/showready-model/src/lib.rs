#![forbid(unsafe_code)]
//! Showready domain model SSOT.
//!
//! One checklist per event, five owned sub-collections, a global template
//! set, and a per-user completion overlay keyed by an opaque item type.

mod checklist;
mod ids;
mod overlay;
mod patch;
mod template;

pub use checklist::{
    BoothShipping, CarRental, Checklist, ChecklistAggregate, CustomItem, Flight, Hotel,
    NewBoothShipping, NewCarRental, NewCustomItem, NewFlight, NewHotel, RentalType,
    ShippingMethod,
};
pub use ids::{parse_event_id, parse_item_type, parse_user_id, EventId, ItemType, UserId,
    ValidationError};
pub use overlay::{OverlayItem, OverlayStats, OverlayTransition};
pub use patch::{
    BoothShippingPatch, CarRentalPatch, ChecklistPatch, CustomItemPatch, FlightPatch, HotelPatch,
    TemplatePatch,
};
pub use template::{NewTemplate, Template};

pub const CRATE_NAME: &str = "showready-model";
