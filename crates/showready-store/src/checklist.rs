use crate::db::Db;
use crate::error::{StoreError, StoreResult};
use crate::schema::NOW;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use showready_model::{
    BoothShipping, BoothShippingPatch, CarRental, CarRentalPatch, Checklist, ChecklistAggregate,
    ChecklistPatch, CustomItem, CustomItemPatch, EventId, Flight, FlightPatch, Hotel, HotelPatch,
    NewBoothShipping, NewCarRental, NewCustomItem, NewFlight, NewHotel, RentalType,
    ShippingMethod,
};
use tracing::debug;

const CHECKLIST_COLS: &str = "id, event_id, booth_ordered, booth_notes, electricity_ordered, \
     electricity_notes, booth_map_url, templates_applied, created_at, updated_at";
const FLIGHT_COLS: &str = "id, checklist_id, attendee_id, attendee_name, carrier, \
     confirmation_number, notes, booked, created_at, updated_at";
const HOTEL_COLS: &str = "id, checklist_id, attendee_id, attendee_name, property_name, \
     confirmation_number, check_in_date, check_out_date, notes, booked, created_at, updated_at";
const CAR_RENTAL_COLS: &str = "id, checklist_id, provider, confirmation_number, pickup_date, \
     return_date, notes, booked, rental_type, assigned_to_id, assigned_to_name, created_at, \
     updated_at";
const BOOTH_SHIPPING_COLS: &str = "id, checklist_id, shipping_method, carrier_name, \
     tracking_number, shipping_date, delivery_date, notes, shipped, created_at, updated_at";
const CUSTOM_ITEM_COLS: &str =
    "id, checklist_id, title, description, completed, position, created_at, updated_at";

/// Owns the one-per-event checklist aggregate and its sub-collections.
/// Side effects are confined to the row(s) addressed; the only cross-entity
/// behavior is the cascade from a checklist to its children.
#[derive(Clone)]
pub struct ChecklistStore {
    db: Db,
}

impl ChecklistStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Returns the event's checklist, creating it on first access. Safe to
    /// call repeatedly; the UNIQUE event reference makes the insert a no-op
    /// once the row exists.
    pub fn get_or_create(&self, event: &EventId) -> StoreResult<Checklist> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO event_checklists (event_id) VALUES (?1)
             ON CONFLICT(event_id) DO NOTHING",
            params![event.as_str()],
        )?;
        let row = conn.query_row(
            &format!("SELECT {CHECKLIST_COLS} FROM event_checklists WHERE event_id = ?1"),
            params![event.as_str()],
            checklist_from_row,
        )?;
        Ok(row)
    }

    pub fn get(&self, id: i64) -> StoreResult<Checklist> {
        let conn = self.db.conn();
        conn.query_row(
            &format!("SELECT {CHECKLIST_COLS} FROM event_checklists WHERE id = ?1"),
            params![id],
            checklist_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::not_found("Checklist", id.to_string()))
    }

    pub fn find_by_event(&self, event: &EventId) -> StoreResult<Option<Checklist>> {
        let conn = self.db.conn();
        Ok(conn
            .query_row(
                &format!("SELECT {CHECKLIST_COLS} FROM event_checklists WHERE event_id = ?1"),
                params![event.as_str()],
                checklist_from_row,
            )
            .optional()?)
    }

    /// Get-or-create plus every sub-collection. Collections are always
    /// arrays, present even when empty.
    pub fn aggregate(&self, event: &EventId) -> StoreResult<ChecklistAggregate> {
        let checklist = self.get_or_create(event)?;
        let id = checklist.id;
        Ok(ChecklistAggregate {
            checklist,
            flights: self.flights_for(id)?,
            hotels: self.hotels_for(id)?,
            car_rentals: self.car_rentals_for(id)?,
            booth_shipping: self.booth_shipping_for(id)?,
            custom_items: self.custom_items_for(id)?,
        })
    }

    /// Sparse patch of the main fields: only keys present in the patch are
    /// written, absent keys stay untouched. An empty patch set is an error.
    pub fn update_main_fields(&self, id: i64, patch: &ChecklistPatch) -> StoreResult<Checklist> {
        if patch.is_empty() {
            return Err(StoreError::EmptyPatch);
        }
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(v) = patch.booth_ordered {
            sets.push("booth_ordered = ?");
            values.push(Value::from(v));
        }
        if let Some(v) = &patch.booth_notes {
            sets.push("booth_notes = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = patch.electricity_ordered {
            sets.push("electricity_ordered = ?");
            values.push(Value::from(v));
        }
        if let Some(v) = &patch.electricity_notes {
            sets.push("electricity_notes = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.booth_map_url {
            sets.push("booth_map_url = ?");
            values.push(Value::from(v.clone()));
        }
        values.push(Value::from(id));

        let conn = self.db.conn();
        let sql = format!(
            "UPDATE event_checklists SET {}, updated_at = {NOW} WHERE id = ?",
            sets.join(", ")
        );
        let changed = conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(StoreError::not_found("Checklist", id.to_string()));
        }
        debug!(checklist_id = id, "updated checklist main fields");
        Self::checklist_by_id(&conn, id)
    }

    /// One-way transition: `templates_applied` is set and never reverted.
    pub fn mark_templates_applied(&self, id: i64) -> StoreResult<()> {
        let conn = self.db.conn();
        let changed = conn.execute(
            &format!(
                "UPDATE event_checklists SET templates_applied = 1, updated_at = {NOW}
                 WHERE id = ?1"
            ),
            params![id],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("Checklist", id.to_string()));
        }
        Ok(())
    }

    /// Removes the checklist and, via the ownership link, every child row.
    /// Invoked by the event-deletion path of the surrounding system; there
    /// is no HTTP route for it.
    pub fn delete(&self, id: i64) -> StoreResult<bool> {
        let conn = self.db.conn();
        let changed = conn.execute("DELETE FROM event_checklists WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Insert-or-skip used by the template batch: a title that already
    /// exists for the checklist leaves the row untouched and reports no
    /// error. This is the storage-level duplicate guard that makes bulk
    /// application idempotent.
    pub fn create_custom_item_if_absent(
        &self,
        checklist_id: i64,
        title: &str,
        description: Option<&str>,
        position: i64,
    ) -> StoreResult<()> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO checklist_custom_items
               (checklist_id, title, description, position, completed)
             VALUES (?1, ?2, ?3, ?4, 0)
             ON CONFLICT(checklist_id, title) DO NOTHING",
            params![checklist_id, title, description, position],
        )?;
        Ok(())
    }

    fn checklist_by_id(conn: &Connection, id: i64) -> StoreResult<Checklist> {
        conn.query_row(
            &format!("SELECT {CHECKLIST_COLS} FROM event_checklists WHERE id = ?1"),
            params![id],
            checklist_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::not_found("Checklist", id.to_string()))
    }

    fn ensure_checklist(conn: &Connection, id: i64) -> StoreResult<()> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM event_checklists WHERE id = ?1",
                params![id],
                |_| Ok(()),
            )
            .optional()?;
        exists.ok_or_else(|| StoreError::not_found("Checklist", id.to_string()))
    }

    // ---- flights ----

    pub fn flights_for(&self, checklist_id: i64) -> StoreResult<Vec<Flight>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {FLIGHT_COLS} FROM checklist_flights WHERE checklist_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![checklist_id], flight_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn create_flight(&self, checklist_id: i64, new: NewFlight) -> StoreResult<Flight> {
        let conn = self.db.conn();
        Self::ensure_checklist(&conn, checklist_id)?;
        conn.execute(
            "INSERT INTO checklist_flights
               (checklist_id, attendee_id, attendee_name, carrier, confirmation_number, notes,
                booked)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                checklist_id,
                new.attendee_id,
                new.attendee_name,
                new.carrier,
                new.confirmation_number,
                new.notes,
                new.booked,
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {FLIGHT_COLS} FROM checklist_flights WHERE id = ?1"),
            params![id],
            flight_from_row,
        )
        .map_err(Into::into)
    }

    pub fn update_flight(&self, id: i64, patch: &FlightPatch) -> StoreResult<Flight> {
        if patch.is_empty() {
            return Err(StoreError::EmptyPatch);
        }
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(v) = &patch.attendee_id {
            sets.push("attendee_id = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.attendee_name {
            sets.push("attendee_name = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.carrier {
            sets.push("carrier = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.confirmation_number {
            sets.push("confirmation_number = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.notes {
            sets.push("notes = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = patch.booked {
            sets.push("booked = ?");
            values.push(Value::from(v));
        }
        values.push(Value::from(id));

        let conn = self.db.conn();
        let sql = format!(
            "UPDATE checklist_flights SET {}, updated_at = {NOW} WHERE id = ?",
            sets.join(", ")
        );
        let changed = conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(StoreError::not_found("Flight", id.to_string()));
        }
        conn.query_row(
            &format!("SELECT {FLIGHT_COLS} FROM checklist_flights WHERE id = ?1"),
            params![id],
            flight_from_row,
        )
        .map_err(Into::into)
    }

    pub fn delete_flight(&self, id: i64) -> StoreResult<bool> {
        let conn = self.db.conn();
        let changed = conn.execute("DELETE FROM checklist_flights WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ---- hotels ----

    pub fn hotels_for(&self, checklist_id: i64) -> StoreResult<Vec<Hotel>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {HOTEL_COLS} FROM checklist_hotels WHERE checklist_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![checklist_id], hotel_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn create_hotel(&self, checklist_id: i64, new: NewHotel) -> StoreResult<Hotel> {
        let conn = self.db.conn();
        Self::ensure_checklist(&conn, checklist_id)?;
        conn.execute(
            "INSERT INTO checklist_hotels
               (checklist_id, attendee_id, attendee_name, property_name, confirmation_number,
                check_in_date, check_out_date, notes, booked)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                checklist_id,
                new.attendee_id,
                new.attendee_name,
                new.property_name,
                new.confirmation_number,
                new.check_in_date,
                new.check_out_date,
                new.notes,
                new.booked,
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {HOTEL_COLS} FROM checklist_hotels WHERE id = ?1"),
            params![id],
            hotel_from_row,
        )
        .map_err(Into::into)
    }

    pub fn update_hotel(&self, id: i64, patch: &HotelPatch) -> StoreResult<Hotel> {
        if patch.is_empty() {
            return Err(StoreError::EmptyPatch);
        }
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(v) = &patch.attendee_id {
            sets.push("attendee_id = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.attendee_name {
            sets.push("attendee_name = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.property_name {
            sets.push("property_name = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.confirmation_number {
            sets.push("confirmation_number = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.check_in_date {
            sets.push("check_in_date = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.check_out_date {
            sets.push("check_out_date = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.notes {
            sets.push("notes = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = patch.booked {
            sets.push("booked = ?");
            values.push(Value::from(v));
        }
        values.push(Value::from(id));

        let conn = self.db.conn();
        let sql = format!(
            "UPDATE checklist_hotels SET {}, updated_at = {NOW} WHERE id = ?",
            sets.join(", ")
        );
        let changed = conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(StoreError::not_found("Hotel", id.to_string()));
        }
        conn.query_row(
            &format!("SELECT {HOTEL_COLS} FROM checklist_hotels WHERE id = ?1"),
            params![id],
            hotel_from_row,
        )
        .map_err(Into::into)
    }

    pub fn delete_hotel(&self, id: i64) -> StoreResult<bool> {
        let conn = self.db.conn();
        let changed = conn.execute("DELETE FROM checklist_hotels WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ---- car rentals ----

    pub fn car_rentals_for(&self, checklist_id: i64) -> StoreResult<Vec<CarRental>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {CAR_RENTAL_COLS} FROM checklist_car_rentals
             WHERE checklist_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![checklist_id], car_rental_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn create_car_rental(
        &self,
        checklist_id: i64,
        new: NewCarRental,
    ) -> StoreResult<CarRental> {
        let conn = self.db.conn();
        Self::ensure_checklist(&conn, checklist_id)?;
        conn.execute(
            "INSERT INTO checklist_car_rentals
               (checklist_id, provider, confirmation_number, pickup_date, return_date, notes,
                booked, rental_type, assigned_to_id, assigned_to_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                checklist_id,
                new.provider,
                new.confirmation_number,
                new.pickup_date,
                new.return_date,
                new.notes,
                new.booked,
                new.rental_type.as_str(),
                new.assigned_to_id,
                new.assigned_to_name,
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {CAR_RENTAL_COLS} FROM checklist_car_rentals WHERE id = ?1"),
            params![id],
            car_rental_from_row,
        )
        .map_err(Into::into)
    }

    pub fn update_car_rental(&self, id: i64, patch: &CarRentalPatch) -> StoreResult<CarRental> {
        if patch.is_empty() {
            return Err(StoreError::EmptyPatch);
        }
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(v) = &patch.provider {
            sets.push("provider = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.confirmation_number {
            sets.push("confirmation_number = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.pickup_date {
            sets.push("pickup_date = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.return_date {
            sets.push("return_date = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.notes {
            sets.push("notes = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = patch.booked {
            sets.push("booked = ?");
            values.push(Value::from(v));
        }
        if let Some(v) = patch.rental_type {
            sets.push("rental_type = ?");
            values.push(Value::from(v.as_str().to_string()));
        }
        if let Some(v) = &patch.assigned_to_id {
            sets.push("assigned_to_id = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.assigned_to_name {
            sets.push("assigned_to_name = ?");
            values.push(Value::from(v.clone()));
        }
        values.push(Value::from(id));

        let conn = self.db.conn();
        let sql = format!(
            "UPDATE checklist_car_rentals SET {}, updated_at = {NOW} WHERE id = ?",
            sets.join(", ")
        );
        let changed = conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(StoreError::not_found("CarRental", id.to_string()));
        }
        conn.query_row(
            &format!("SELECT {CAR_RENTAL_COLS} FROM checklist_car_rentals WHERE id = ?1"),
            params![id],
            car_rental_from_row,
        )
        .map_err(Into::into)
    }

    pub fn delete_car_rental(&self, id: i64) -> StoreResult<bool> {
        let conn = self.db.conn();
        let changed = conn.execute(
            "DELETE FROM checklist_car_rentals WHERE id = ?1",
            params![id],
        )?;
        Ok(changed > 0)
    }

    // ---- booth shipping ----

    pub fn booth_shipping_for(&self, checklist_id: i64) -> StoreResult<Vec<BoothShipping>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {BOOTH_SHIPPING_COLS} FROM checklist_booth_shipping
             WHERE checklist_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![checklist_id], booth_shipping_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Always inserts a new record; an event can have several shipments.
    pub fn create_booth_shipping(
        &self,
        checklist_id: i64,
        new: NewBoothShipping,
    ) -> StoreResult<BoothShipping> {
        let conn = self.db.conn();
        Self::ensure_checklist(&conn, checklist_id)?;
        conn.execute(
            "INSERT INTO checklist_booth_shipping
               (checklist_id, shipping_method, carrier_name, tracking_number, shipping_date,
                delivery_date, notes, shipped)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                checklist_id,
                new.shipping_method.as_str(),
                new.carrier_name,
                new.tracking_number,
                new.shipping_date,
                new.delivery_date,
                new.notes,
                new.shipped,
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {BOOTH_SHIPPING_COLS} FROM checklist_booth_shipping WHERE id = ?1"),
            params![id],
            booth_shipping_from_row,
        )
        .map_err(Into::into)
    }

    pub fn update_booth_shipping(
        &self,
        id: i64,
        patch: &BoothShippingPatch,
    ) -> StoreResult<BoothShipping> {
        if patch.is_empty() {
            return Err(StoreError::EmptyPatch);
        }
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(v) = patch.shipping_method {
            sets.push("shipping_method = ?");
            values.push(Value::from(v.as_str().to_string()));
        }
        if let Some(v) = &patch.carrier_name {
            sets.push("carrier_name = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.tracking_number {
            sets.push("tracking_number = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.shipping_date {
            sets.push("shipping_date = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.delivery_date {
            sets.push("delivery_date = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.notes {
            sets.push("notes = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = patch.shipped {
            sets.push("shipped = ?");
            values.push(Value::from(v));
        }
        values.push(Value::from(id));

        let conn = self.db.conn();
        let sql = format!(
            "UPDATE checklist_booth_shipping SET {}, updated_at = {NOW} WHERE id = ?",
            sets.join(", ")
        );
        let changed = conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(StoreError::not_found("BoothShipping", id.to_string()));
        }
        conn.query_row(
            &format!("SELECT {BOOTH_SHIPPING_COLS} FROM checklist_booth_shipping WHERE id = ?1"),
            params![id],
            booth_shipping_from_row,
        )
        .map_err(Into::into)
    }

    pub fn delete_booth_shipping(&self, id: i64) -> StoreResult<bool> {
        let conn = self.db.conn();
        let changed = conn.execute(
            "DELETE FROM checklist_booth_shipping WHERE id = ?1",
            params![id],
        )?;
        Ok(changed > 0)
    }

    // ---- custom items ----

    /// Custom items order by `(position, id)`; every other sub-collection
    /// orders by creation id.
    pub fn custom_items_for(&self, checklist_id: i64) -> StoreResult<Vec<CustomItem>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {CUSTOM_ITEM_COLS} FROM checklist_custom_items
             WHERE checklist_id = ?1 ORDER BY position, id"
        ))?;
        let rows = stmt
            .query_map(params![checklist_id], custom_item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn create_custom_item(
        &self,
        checklist_id: i64,
        new: NewCustomItem,
    ) -> StoreResult<CustomItem> {
        let conn = self.db.conn();
        Self::ensure_checklist(&conn, checklist_id)?;
        conn.execute(
            "INSERT INTO checklist_custom_items (checklist_id, title, description, position)
             VALUES (?1, ?2, ?3, ?4)",
            params![checklist_id, new.title, new.description, new.position],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {CUSTOM_ITEM_COLS} FROM checklist_custom_items WHERE id = ?1"),
            params![id],
            custom_item_from_row,
        )
        .map_err(Into::into)
    }

    pub fn update_custom_item(&self, id: i64, patch: &CustomItemPatch) -> StoreResult<CustomItem> {
        if patch.is_empty() {
            return Err(StoreError::EmptyPatch);
        }
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(v) = &patch.title {
            sets.push("title = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.description {
            sets.push("description = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = patch.completed {
            sets.push("completed = ?");
            values.push(Value::from(v));
        }
        if let Some(v) = patch.position {
            sets.push("position = ?");
            values.push(Value::from(v));
        }
        values.push(Value::from(id));

        let conn = self.db.conn();
        let sql = format!(
            "UPDATE checklist_custom_items SET {}, updated_at = {NOW} WHERE id = ?",
            sets.join(", ")
        );
        let changed = conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(StoreError::not_found("CustomItem", id.to_string()));
        }
        conn.query_row(
            &format!("SELECT {CUSTOM_ITEM_COLS} FROM checklist_custom_items WHERE id = ?1"),
            params![id],
            custom_item_from_row,
        )
        .map_err(Into::into)
    }

    pub fn delete_custom_item(&self, id: i64) -> StoreResult<bool> {
        let conn = self.db.conn();
        let changed = conn.execute(
            "DELETE FROM checklist_custom_items WHERE id = ?1",
            params![id],
        )?;
        Ok(changed > 0)
    }
}

fn checklist_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Checklist> {
    Ok(Checklist {
        id: row.get(0)?,
        event_id: row.get(1)?,
        booth_ordered: row.get(2)?,
        booth_notes: row.get(3)?,
        electricity_ordered: row.get(4)?,
        electricity_notes: row.get(5)?,
        booth_map_url: row.get(6)?,
        templates_applied: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn flight_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Flight> {
    Ok(Flight {
        id: row.get(0)?,
        checklist_id: row.get(1)?,
        attendee_id: row.get(2)?,
        attendee_name: row.get(3)?,
        carrier: row.get(4)?,
        confirmation_number: row.get(5)?,
        notes: row.get(6)?,
        booked: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn hotel_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Hotel> {
    Ok(Hotel {
        id: row.get(0)?,
        checklist_id: row.get(1)?,
        attendee_id: row.get(2)?,
        attendee_name: row.get(3)?,
        property_name: row.get(4)?,
        confirmation_number: row.get(5)?,
        check_in_date: row.get(6)?,
        check_out_date: row.get(7)?,
        notes: row.get(8)?,
        booked: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn car_rental_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CarRental> {
    let rental_type: String = row.get(8)?;
    Ok(CarRental {
        id: row.get(0)?,
        checklist_id: row.get(1)?,
        provider: row.get(2)?,
        confirmation_number: row.get(3)?,
        pickup_date: row.get(4)?,
        return_date: row.get(5)?,
        notes: row.get(6)?,
        booked: row.get(7)?,
        rental_type: RentalType::parse(&rental_type).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                8,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?,
        assigned_to_id: row.get(9)?,
        assigned_to_name: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn booth_shipping_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BoothShipping> {
    let method: String = row.get(2)?;
    Ok(BoothShipping {
        id: row.get(0)?,
        checklist_id: row.get(1)?,
        shipping_method: ShippingMethod::parse(&method).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?,
        carrier_name: row.get(3)?,
        tracking_number: row.get(4)?,
        shipping_date: row.get(5)?,
        delivery_date: row.get(6)?,
        notes: row.get(7)?,
        shipped: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn custom_item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CustomItem> {
    Ok(CustomItem {
        id: row.get(0)?,
        checklist_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        completed: row.get(4)?,
        position: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use showready_model::EventId;

    fn store() -> ChecklistStore {
        ChecklistStore::new(Db::open_in_memory().expect("open db"))
    }

    fn event(id: &str) -> EventId {
        EventId::parse(id).expect("event id")
    }

    #[test]
    fn get_or_create_is_idempotent_per_event() {
        let store = store();
        let first = store.get_or_create(&event("ev-1")).expect("create");
        let second = store.get_or_create(&event("ev-1")).expect("reuse");
        assert_eq!(first.id, second.id);
        let other = store.get_or_create(&event("ev-2")).expect("other event");
        assert_ne!(first.id, other.id);
    }

    #[test]
    fn aggregate_returns_empty_collections_for_fresh_checklist() {
        let store = store();
        let agg = store.aggregate(&event("ev-1")).expect("aggregate");
        assert!(agg.flights.is_empty());
        assert!(agg.hotels.is_empty());
        assert!(agg.car_rentals.is_empty());
        assert!(agg.booth_shipping.is_empty());
        assert!(agg.custom_items.is_empty());
        assert!(!agg.checklist.templates_applied);
    }

    #[test]
    fn sparse_patch_touches_only_present_fields() {
        let store = store();
        let checklist = store.get_or_create(&event("ev-1")).expect("create");
        store
            .update_main_fields(
                checklist.id,
                &ChecklistPatch {
                    booth_notes: Some(Some("hall B, stand 42".to_string())),
                    electricity_ordered: Some(true),
                    ..ChecklistPatch::default()
                },
            )
            .expect("first patch");

        let updated = store
            .update_main_fields(
                checklist.id,
                &ChecklistPatch {
                    booth_ordered: Some(true),
                    ..ChecklistPatch::default()
                },
            )
            .expect("second patch");

        assert!(updated.booth_ordered);
        assert!(updated.electricity_ordered, "untouched field must survive");
        assert_eq!(updated.booth_notes.as_deref(), Some("hall B, stand 42"));
    }

    #[test]
    fn present_null_clears_a_nullable_column() {
        let store = store();
        let checklist = store.get_or_create(&event("ev-1")).expect("create");
        store
            .update_main_fields(
                checklist.id,
                &ChecklistPatch {
                    booth_map_url: Some(Some("/maps/ev-1.png".to_string())),
                    ..ChecklistPatch::default()
                },
            )
            .expect("set url");
        let cleared = store
            .update_main_fields(
                checklist.id,
                &ChecklistPatch {
                    booth_map_url: Some(None),
                    ..ChecklistPatch::default()
                },
            )
            .expect("clear url");
        assert_eq!(cleared.booth_map_url, None);
    }

    #[test]
    fn empty_patch_is_rejected() {
        let store = store();
        let checklist = store.get_or_create(&event("ev-1")).expect("create");
        let err = store
            .update_main_fields(checklist.id, &ChecklistPatch::default())
            .expect_err("empty patch");
        assert!(matches!(err, StoreError::EmptyPatch));
    }

    #[test]
    fn update_of_missing_sub_resource_is_not_found_never_a_no_op() {
        let store = store();
        let err = store
            .update_flight(
                999,
                &FlightPatch {
                    booked: Some(true),
                    ..FlightPatch::default()
                },
            )
            .expect_err("missing flight");
        assert!(matches!(err, StoreError::NotFound { resource: "Flight", .. }));
    }

    #[test]
    fn create_under_missing_checklist_is_not_found() {
        let store = store();
        let err = store
            .create_flight(
                77,
                NewFlight {
                    attendee_name: "Ada".to_string(),
                    ..NewFlight::default()
                },
            )
            .expect_err("missing checklist");
        assert!(matches!(err, StoreError::NotFound { resource: "Checklist", .. }));
    }

    #[test]
    fn custom_items_order_by_position_then_id() {
        let store = store();
        let checklist = store.get_or_create(&event("ev-1")).expect("create");
        for (title, position) in [("third", 5), ("first", 0), ("second", 0)] {
            store
                .create_custom_item(
                    checklist.id,
                    NewCustomItem {
                        title: title.to_string(),
                        position,
                        ..NewCustomItem::default()
                    },
                )
                .expect("item");
        }
        let items = store.custom_items_for(checklist.id).expect("list");
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn deleting_checklist_cascades_to_children() {
        let store = store();
        let checklist = store.get_or_create(&event("ev-1")).expect("create");
        store
            .create_flight(
                checklist.id,
                NewFlight {
                    attendee_name: "Ada".to_string(),
                    ..NewFlight::default()
                },
            )
            .expect("flight");
        store
            .create_custom_item(
                checklist.id,
                NewCustomItem {
                    title: "Pack booth".to_string(),
                    ..NewCustomItem::default()
                },
            )
            .expect("item");

        assert!(store.delete(checklist.id).expect("delete"));
        assert!(store.flights_for(checklist.id).expect("flights").is_empty());
        assert!(store
            .custom_items_for(checklist.id)
            .expect("items")
            .is_empty());
    }

    #[test]
    fn duplicate_title_on_manual_create_surfaces_as_constraint() {
        let store = store();
        let checklist = store.get_or_create(&event("ev-1")).expect("create");
        let item = NewCustomItem {
            title: "Pack booth".to_string(),
            ..NewCustomItem::default()
        };
        store
            .create_custom_item(checklist.id, item.clone())
            .expect("first");
        let err = store
            .create_custom_item(checklist.id, item)
            .expect_err("duplicate");
        assert!(err.is_constraint());
    }
}
