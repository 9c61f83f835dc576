// SPDX-License-Identifier: Apache-2.0

use rusqlite::Connection;

/// SQL expression writing an ISO-8601 UTC timestamp with millisecond
/// precision. Shared by column defaults and every `updated_at` bump.
pub(crate) const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ','now')";

/// Idempotent schema bootstrap. The `users`, `events`, and
/// `event_participants` tables are owned by the surrounding system; they are
/// created here so a standalone deployment and the test suite have the
/// collaborator shape to read from.
pub fn init(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS users (
          id TEXT PRIMARY KEY,
          role TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS events (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL DEFAULT ''
        );
        CREATE TABLE IF NOT EXISTS event_participants (
          event_id TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
          user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
          UNIQUE (event_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS event_checklists (
          id INTEGER PRIMARY KEY,
          event_id TEXT NOT NULL UNIQUE,
          booth_ordered INTEGER NOT NULL DEFAULT 0,
          booth_notes TEXT,
          electricity_ordered INTEGER NOT NULL DEFAULT 0,
          electricity_notes TEXT,
          booth_map_url TEXT,
          templates_applied INTEGER NOT NULL DEFAULT 0,
          created_at TEXT NOT NULL DEFAULT ({NOW}),
          updated_at TEXT NOT NULL DEFAULT ({NOW})
        );

        CREATE TABLE IF NOT EXISTS checklist_flights (
          id INTEGER PRIMARY KEY,
          checklist_id INTEGER NOT NULL
            REFERENCES event_checklists(id) ON DELETE CASCADE,
          attendee_id TEXT,
          attendee_name TEXT NOT NULL,
          carrier TEXT,
          confirmation_number TEXT,
          notes TEXT,
          booked INTEGER NOT NULL DEFAULT 0,
          created_at TEXT NOT NULL DEFAULT ({NOW}),
          updated_at TEXT NOT NULL DEFAULT ({NOW})
        );
        CREATE INDEX IF NOT EXISTS idx_flights_checklist
          ON checklist_flights(checklist_id);

        CREATE TABLE IF NOT EXISTS checklist_hotels (
          id INTEGER PRIMARY KEY,
          checklist_id INTEGER NOT NULL
            REFERENCES event_checklists(id) ON DELETE CASCADE,
          attendee_id TEXT,
          attendee_name TEXT NOT NULL,
          property_name TEXT,
          confirmation_number TEXT,
          check_in_date TEXT,
          check_out_date TEXT,
          notes TEXT,
          booked INTEGER NOT NULL DEFAULT 0,
          created_at TEXT NOT NULL DEFAULT ({NOW}),
          updated_at TEXT NOT NULL DEFAULT ({NOW})
        );
        CREATE INDEX IF NOT EXISTS idx_hotels_checklist
          ON checklist_hotels(checklist_id);

        CREATE TABLE IF NOT EXISTS checklist_car_rentals (
          id INTEGER PRIMARY KEY,
          checklist_id INTEGER NOT NULL
            REFERENCES event_checklists(id) ON DELETE CASCADE,
          provider TEXT,
          confirmation_number TEXT,
          pickup_date TEXT,
          return_date TEXT,
          notes TEXT,
          booked INTEGER NOT NULL DEFAULT 0,
          rental_type TEXT NOT NULL DEFAULT 'group',
          assigned_to_id TEXT,
          assigned_to_name TEXT,
          created_at TEXT NOT NULL DEFAULT ({NOW}),
          updated_at TEXT NOT NULL DEFAULT ({NOW})
        );
        CREATE INDEX IF NOT EXISTS idx_car_rentals_checklist
          ON checklist_car_rentals(checklist_id);

        CREATE TABLE IF NOT EXISTS checklist_booth_shipping (
          id INTEGER PRIMARY KEY,
          checklist_id INTEGER NOT NULL
            REFERENCES event_checklists(id) ON DELETE CASCADE,
          shipping_method TEXT NOT NULL,
          carrier_name TEXT,
          tracking_number TEXT,
          shipping_date TEXT,
          delivery_date TEXT,
          notes TEXT,
          shipped INTEGER NOT NULL DEFAULT 0,
          created_at TEXT NOT NULL DEFAULT ({NOW}),
          updated_at TEXT NOT NULL DEFAULT ({NOW})
        );
        CREATE INDEX IF NOT EXISTS idx_booth_shipping_checklist
          ON checklist_booth_shipping(checklist_id);

        CREATE TABLE IF NOT EXISTS checklist_custom_items (
          id INTEGER PRIMARY KEY,
          checklist_id INTEGER NOT NULL
            REFERENCES event_checklists(id) ON DELETE CASCADE,
          title TEXT NOT NULL,
          description TEXT,
          completed INTEGER NOT NULL DEFAULT 0,
          position INTEGER NOT NULL DEFAULT 0,
          created_at TEXT NOT NULL DEFAULT ({NOW}),
          updated_at TEXT NOT NULL DEFAULT ({NOW}),
          UNIQUE (checklist_id, title)
        );

        CREATE TABLE IF NOT EXISTS checklist_templates (
          id INTEGER PRIMARY KEY,
          title TEXT NOT NULL,
          description TEXT,
          position INTEGER NOT NULL DEFAULT 0,
          active INTEGER NOT NULL DEFAULT 1,
          created_at TEXT NOT NULL DEFAULT ({NOW}),
          updated_at TEXT NOT NULL DEFAULT ({NOW})
        );

        CREATE TABLE IF NOT EXISTS user_checklist_items (
          id INTEGER PRIMARY KEY,
          user_id TEXT NOT NULL,
          event_id TEXT NOT NULL,
          item_type TEXT NOT NULL,
          completed INTEGER NOT NULL DEFAULT 0,
          created_at TEXT NOT NULL DEFAULT ({NOW}),
          updated_at TEXT NOT NULL DEFAULT ({NOW}),
          UNIQUE (user_id, event_id, item_type)
        );
        CREATE INDEX IF NOT EXISTS idx_user_checklist_user_event
          ON user_checklist_items(user_id, event_id);
        "
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn init_is_idempotent() {
        let conn = Connection::open_in_memory().expect("open memory db");
        init(&conn).expect("first init");
        init(&conn).expect("second init");
    }

    #[test]
    fn custom_items_enforce_title_uniqueness_per_checklist() {
        let conn = Connection::open_in_memory().expect("open memory db");
        init(&conn).expect("schema");
        conn.execute(
            "INSERT INTO event_checklists (event_id) VALUES ('ev-1')",
            [],
        )
        .expect("checklist");
        conn.execute(
            "INSERT INTO checklist_custom_items (checklist_id, title) VALUES (1, 'Pack booth')",
            [],
        )
        .expect("first item");
        let dup = conn.execute(
            "INSERT INTO checklist_custom_items (checklist_id, title) VALUES (1, 'Pack booth')",
            [],
        );
        assert!(dup.is_err(), "duplicate title must violate the unique guard");
    }
}
