use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    Event, EventDraft, EventStatus, Lead, LeadDraft, LeadStatus, Offer, OfferDraft, OfferStatus,
};
use crate::pricing;
use crate::utils;

pub struct Store {
    conn: Connection,
}

#[derive(serde::Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EventStats {
    pub total: i64,
    pub new: i64,
    pub contacted: i64,
    pub qualified: i64,
    pub offer_sent: i64,
    pub won: i64,
    pub lost: i64,
    pub rejected: i64,
}

impl Store {
    pub fn open_default() -> Result<Self> {
        let path = utils::database_path();
        utils::ensure_parent(&path);
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS events(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fingerprint TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                organizer TEXT,
                organizer_contact TEXT,
                organizer_email TEXT,
                organizer_phone TEXT,
                date_start TEXT,
                date_end TEXT,
                location TEXT,
                city TEXT,
                country TEXT DEFAULT 'PL',
                category TEXT,
                subcategory TEXT,
                source TEXT,
                source_url TEXT,
                potential_score INTEGER DEFAULT 3,
                estimated_audience INTEGER DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'new',
                notes TEXT DEFAULT '',
                discovered_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS leads(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event_id INTEGER NOT NULL,
                company TEXT,
                contact_person TEXT,
                email TEXT,
                phone TEXT,
                status TEXT NOT NULL DEFAULT 'new',
                value REAL DEFAULT 0,
                package TEXT,
                notes TEXT DEFAULT '',
                offer_sent_date TEXT,
                follow_up_date TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (event_id) REFERENCES events(id)
            );
            CREATE TABLE IF NOT EXISTS offers(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                lead_id INTEGER NOT NULL,
                event_id INTEGER NOT NULL,
                package TEXT NOT NULL,
                base_price TEXT NOT NULL,
                additional_services TEXT NOT NULL,
                total_price TEXT NOT NULL,
                valid_until TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'draft',
                created_at TEXT NOT NULL,
                sent_at TEXT,
                FOREIGN KEY (lead_id) REFERENCES leads(id),
                FOREIGN KEY (event_id) REFERENCES events(id)
            );
            CREATE INDEX IF NOT EXISTS idx_events_status ON events(status);
            CREATE INDEX IF NOT EXISTS idx_events_date ON events(date_start);
            CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status);",
        )?;
        Ok(())
    }

    /// Inserts a candidate event, or returns the id of the existing record
    /// with the same fingerprint. Existing records are left untouched: no
    /// field merge, no updated_at bump. The UNIQUE constraint on the
    /// fingerprint column keeps concurrent upserts of the same event from
    /// producing two rows.
    pub fn upsert_event(&self, draft: &EventDraft) -> Result<i64> {
        let fingerprint = draft.fingerprint();
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT INTO events (fingerprint, name, organizer, organizer_contact,
                organizer_email, organizer_phone, date_start, date_end, location, city,
                country, category, subcategory, source, source_url, potential_score,
                estimated_audience, status, notes, discovered_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                ?16, ?17, 'new', '', ?18, ?18)
             ON CONFLICT(fingerprint) DO NOTHING",
            params![
                fingerprint,
                draft.name,
                draft.organizer,
                draft.organizer_contact,
                draft.organizer_email,
                draft.organizer_phone,
                draft.date_start,
                draft.date_end,
                draft.location,
                draft.city,
                draft.country,
                draft.category,
                draft.subcategory,
                draft.source,
                draft.source_url,
                draft.potential_score,
                draft.estimated_audience,
                now,
            ],
        )?;
        let id: i64 = self.conn.query_row(
            "SELECT id FROM events WHERE fingerprint = ?1",
            params![fingerprint],
            |row| row.get(0),
        )?;
        if inserted == 0 {
            debug!(event = %draft.name, id, "duplicate event, keeping existing record");
        }
        Ok(id)
    }

    pub fn event(&self, id: i64) -> Result<Event> {
        self.conn
            .query_row("SELECT * FROM events WHERE id = ?1", params![id], row_to_event)
            .optional()?
            .ok_or(Error::NotFound { kind: "event", id })
    }

    pub fn events(&self, status: Option<EventStatus>, limit: u32) -> Result<Vec<Event>> {
        let mut out = Vec::new();
        match status {
            Some(status) => {
                let mut stmt = self.conn.prepare(
                    "SELECT * FROM events WHERE status = ?1 ORDER BY date_start ASC LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![status.as_str(), limit], row_to_event)?;
                for row in rows {
                    out.push(row?);
                }
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT * FROM events ORDER BY date_start ASC LIMIT ?1")?;
                let rows = stmt.query_map(params![limit], row_to_event)?;
                for row in rows {
                    out.push(row?);
                }
            }
        }
        Ok(out)
    }

    pub fn update_event_status(&self, id: i64, status: EventStatus) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE events SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status.as_str(), now],
        )?;
        if updated == 0 {
            return Err(Error::NotFound { kind: "event", id });
        }
        Ok(())
    }

    pub fn stats(&self) -> Result<EventStats> {
        let mut stats = EventStats::default();
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM events GROUP BY status")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (status, count) = row?;
            stats.total += count;
            match EventStatus::from_str(&status) {
                Ok(EventStatus::New) => stats.new = count,
                Ok(EventStatus::Contacted) => stats.contacted = count,
                Ok(EventStatus::Qualified) => stats.qualified = count,
                Ok(EventStatus::OfferSent) => stats.offer_sent = count,
                Ok(EventStatus::Won) => stats.won = count,
                Ok(EventStatus::Lost) => stats.lost = count,
                Ok(EventStatus::Rejected) => stats.rejected = count,
                Err(_) => {}
            }
        }
        Ok(stats)
    }

    /// Creates a lead and, when the referenced event is still `new`, moves it
    /// to `contacted`. The transition is one-way and only fires from `new`.
    pub fn create_lead(&self, draft: &LeadDraft) -> Result<Lead> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO leads (event_id, company, contact_person, email, phone,
                status, value, package, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 'new', ?6, ?7, ?8, ?9, ?9)",
            params![
                draft.event_id,
                draft.company,
                draft.contact_person,
                draft.email,
                draft.phone,
                draft.value,
                draft.package,
                draft.notes,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.conn.execute(
            "UPDATE events SET status = 'contacted', updated_at = ?2
             WHERE id = ?1 AND status = 'new'",
            params![draft.event_id, now],
        )?;
        self.lead(id)
    }

    pub fn lead(&self, id: i64) -> Result<Lead> {
        self.conn
            .query_row("SELECT * FROM leads WHERE id = ?1", params![id], row_to_lead)
            .optional()?
            .ok_or(Error::NotFound { kind: "lead", id })
    }

    pub fn leads(&self, status: Option<LeadStatus>, limit: u32) -> Result<Vec<Lead>> {
        let mut out = Vec::new();
        match status {
            Some(status) => {
                let mut stmt = self.conn.prepare(
                    "SELECT * FROM leads WHERE status = ?1 ORDER BY created_at DESC LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![status.as_str(), limit], row_to_lead)?;
                for row in rows {
                    out.push(row?);
                }
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT * FROM leads ORDER BY created_at DESC LIMIT ?1")?;
                let rows = stmt.query_map(params![limit], row_to_lead)?;
                for row in rows {
                    out.push(row?);
                }
            }
        }
        Ok(out)
    }

    pub fn update_lead_status(&self, id: i64, status: LeadStatus) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE leads SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status.as_str(), now],
        )?;
        if updated == 0 {
            return Err(Error::NotFound { kind: "lead", id });
        }
        Ok(())
    }

    /// Creates a draft offer. The stored total is the gross from the pricing
    /// engine and stays recomputable from (package, add-ons, discount); it is
    /// never edited by hand.
    pub fn create_offer(&self, draft: &OfferDraft) -> Result<Offer> {
        // ensure the parents exist before pricing anything
        self.lead(draft.lead_id)?;
        self.event(draft.event_id)?;

        let breakdown = pricing::quote(
            &draft.package,
            draft.additional_services.iter().map(String::as_str),
            draft.discount_percent,
        );
        let valid_until = pricing::valid_until(draft.valid_days);
        let now = Utc::now().to_rfc3339();
        let services = serde_json::to_string(&draft.additional_services)?;
        self.conn.execute(
            "INSERT INTO offers (lead_id, event_id, package, base_price,
                additional_services, total_price, valid_until, status, created_at, sent_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'draft', ?8, NULL)",
            params![
                draft.lead_id,
                draft.event_id,
                draft.package,
                breakdown.base_price.to_string(),
                services,
                breakdown.gross.to_string(),
                valid_until,
                now,
            ],
        )?;
        self.offer(self.conn.last_insert_rowid())
    }

    pub fn offer(&self, id: i64) -> Result<Offer> {
        self.conn
            .query_row("SELECT * FROM offers WHERE id = ?1", params![id], row_to_offer)
            .optional()?
            .ok_or(Error::NotFound { kind: "offer", id })
    }

    /// Marks a draft offer as sent and cascades the parent lead to
    /// `offer_sent` with the same timestamp.
    pub fn send_offer(&self, id: i64) -> Result<Offer> {
        let offer = self.offer(id)?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE offers SET status = 'sent', sent_at = ?2 WHERE id = ?1",
            params![id, now],
        )?;
        self.conn.execute(
            "UPDATE leads SET status = 'offer_sent', offer_sent_date = ?2, updated_at = ?2
             WHERE id = ?1",
            params![offer.lead_id, now],
        )?;
        self.offer(id)
    }
}

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<Event> {
    let status: String = row.get("status")?;
    Ok(Event {
        id: row.get("id")?,
        fingerprint: row.get("fingerprint")?,
        name: row.get("name")?,
        organizer: row.get("organizer")?,
        organizer_contact: row.get("organizer_contact")?,
        organizer_email: row.get("organizer_email")?,
        organizer_phone: row.get("organizer_phone")?,
        date_start: row.get("date_start")?,
        date_end: row.get("date_end")?,
        location: row.get("location")?,
        city: row.get("city")?,
        country: row.get("country")?,
        category: row.get("category")?,
        subcategory: row.get("subcategory")?,
        source: row.get("source")?,
        source_url: row.get("source_url")?,
        potential_score: row.get("potential_score")?,
        estimated_audience: row.get("estimated_audience")?,
        status: parse_column(&status)?,
        notes: row.get("notes")?,
        discovered_at: row.get("discovered_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn row_to_lead(row: &Row<'_>) -> rusqlite::Result<Lead> {
    let status: String = row.get("status")?;
    Ok(Lead {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        company: row.get("company")?,
        contact_person: row.get("contact_person")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        status: parse_column(&status)?,
        value: row.get("value")?,
        package: row.get("package")?,
        notes: row.get("notes")?,
        offer_sent_date: row.get("offer_sent_date")?,
        follow_up_date: row.get("follow_up_date")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn row_to_offer(row: &Row<'_>) -> rusqlite::Result<Offer> {
    let status: String = row.get("status")?;
    let services: String = row.get("additional_services")?;
    let base_price: String = row.get("base_price")?;
    let total_price: String = row.get("total_price")?;
    Ok(Offer {
        id: row.get("id")?,
        lead_id: row.get("lead_id")?,
        event_id: row.get("event_id")?,
        package: row.get("package")?,
        base_price: parse_column(&base_price)?,
        additional_services: serde_json::from_str(&services).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                services.len(),
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })?,
        total_price: parse_column(&total_price)?,
        valid_until: row.get("valid_until")?,
        status: parse_column(&status)?,
        created_at: row.get("created_at")?,
        sent_at: row.get("sent_at")?,
    })
}

fn parse_column<T>(value: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse::<T>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            value.len(),
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fingerprint;
    use rust_decimal::Decimal;

    fn sample_draft() -> EventDraft {
        EventDraft {
            name: "Runmageddon Warszawa".to_string(),
            organizer: "Runmageddon Sp. z o.o.".to_string(),
            organizer_email: "kontakt@runmageddon.pl".to_string(),
            date_start: "2026-03-15".to_string(),
            location: "Warszawa".to_string(),
            city: "Warszawa".to_string(),
            category: "OCR".to_string(),
            source: "Runmageddon.pl".to_string(),
            potential_score: 5,
            estimated_audience: 5000,
            ..EventDraft::default()
        }
    }

    #[test]
    fn upsert_inserts_once_and_returns_stable_id() {
        let store = Store::open_in_memory().unwrap();
        let draft = sample_draft();
        let first = store.upsert_event(&draft).unwrap();
        let second = store.upsert_event(&draft).unwrap();
        let third = store.upsert_event(&draft).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, third);
        assert_eq!(store.stats().unwrap().total, 1);
    }

    #[test]
    fn upsert_never_overwrites_existing_fields() {
        let store = Store::open_in_memory().unwrap();
        let id = store.upsert_event(&sample_draft()).unwrap();
        store.update_event_status(id, EventStatus::Qualified).unwrap();

        let mut rerun = sample_draft();
        rerun.estimated_audience = 9999;
        rerun.organizer_email = "other@runmageddon.pl".to_string();
        assert_eq!(store.upsert_event(&rerun).unwrap(), id);

        let event = store.event(id).unwrap();
        assert_eq!(event.status, EventStatus::Qualified);
        assert_eq!(event.estimated_audience, 5000);
        assert_eq!(event.organizer_email, "kontakt@runmageddon.pl");
    }

    #[test]
    fn inserted_event_gets_new_status_and_timestamps() {
        let store = Store::open_in_memory().unwrap();
        let id = store.upsert_event(&sample_draft()).unwrap();
        let event = store.event(id).unwrap();
        assert_eq!(event.status, EventStatus::New);
        assert_eq!(event.discovered_at, event.updated_at);
        assert_eq!(
            event.fingerprint,
            fingerprint(
                "Runmageddon Warszawa",
                "2026-03-15",
                "Warszawa",
                "Runmageddon Sp. z o.o."
            )
        );
    }

    #[test]
    fn events_are_ordered_by_start_date() {
        let store = Store::open_in_memory().unwrap();
        let mut later = sample_draft();
        later.name = "Later".to_string();
        later.date_start = "2026-12-01".to_string();
        let mut earlier = sample_draft();
        earlier.name = "Earlier".to_string();
        earlier.date_start = "2026-01-01".to_string();
        store.upsert_event(&later).unwrap();
        store.upsert_event(&earlier).unwrap();

        let events = store.events(None, 100).unwrap();
        assert_eq!(events[0].name, "Earlier");
        assert_eq!(events[1].name, "Later");
    }

    #[test]
    fn events_respects_status_filter_and_limit() {
        let store = Store::open_in_memory().unwrap();
        for i in 0..5 {
            let mut draft = sample_draft();
            draft.name = format!("Event {i}");
            draft.date_start = format!("2026-0{}-01", i + 1);
            store.upsert_event(&draft).unwrap();
        }
        assert_eq!(store.events(None, 3).unwrap().len(), 3);
        assert_eq!(store.events(Some(EventStatus::New), 100).unwrap().len(), 5);
        assert!(store.events(Some(EventStatus::Won), 100).unwrap().is_empty());
    }

    #[test]
    fn stats_report_zero_for_absent_statuses() {
        let store = Store::open_in_memory().unwrap();
        let empty = store.stats().unwrap();
        assert_eq!(empty, EventStats::default());

        store.upsert_event(&sample_draft()).unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.new, 1);
        assert_eq!(stats.won, 0);
    }

    #[test]
    fn creating_a_lead_contacts_a_new_event() {
        let store = Store::open_in_memory().unwrap();
        let event_id = store.upsert_event(&sample_draft()).unwrap();
        let lead = store
            .create_lead(&LeadDraft {
                event_id,
                company: "Acme".to_string(),
                value: 2490.0,
                ..LeadDraft::default()
            })
            .unwrap();
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(store.event(event_id).unwrap().status, EventStatus::Contacted);
    }

    #[test]
    fn lead_creation_leaves_non_new_events_alone() {
        let store = Store::open_in_memory().unwrap();
        let event_id = store.upsert_event(&sample_draft()).unwrap();
        store.update_event_status(event_id, EventStatus::Won).unwrap();
        store
            .create_lead(&LeadDraft {
                event_id,
                ..LeadDraft::default()
            })
            .unwrap();
        assert_eq!(store.event(event_id).unwrap().status, EventStatus::Won);
    }

    #[test]
    fn offer_lifecycle_draft_to_sent() {
        let store = Store::open_in_memory().unwrap();
        let event_id = store.upsert_event(&sample_draft()).unwrap();
        let lead = store
            .create_lead(&LeadDraft {
                event_id,
                company: "Acme".to_string(),
                ..LeadDraft::default()
            })
            .unwrap();

        let offer = store
            .create_offer(&OfferDraft {
                lead_id: lead.id,
                event_id,
                package: "standard".to_string(),
                additional_services: vec!["drone".to_string(), "highlights".to_string()],
                discount_percent: Decimal::from(10),
                valid_days: 14,
            })
            .unwrap();
        assert_eq!(offer.status, OfferStatus::Draft);
        assert_eq!(offer.base_price, Decimal::from(2490));
        assert_eq!(offer.total_price.to_string(), "4195.53");
        assert!(offer.sent_at.is_none());

        let sent = store.send_offer(offer.id).unwrap();
        assert_eq!(sent.status, OfferStatus::Sent);
        assert!(sent.sent_at.is_some());

        let lead = store.lead(lead.id).unwrap();
        assert_eq!(lead.status, LeadStatus::OfferSent);
        assert!(lead.offer_sent_date.is_some());
    }

    #[test]
    fn offer_requires_existing_parents() {
        let store = Store::open_in_memory().unwrap();
        let err = store
            .create_offer(&OfferDraft {
                lead_id: 42,
                event_id: 1,
                package: "basic".to_string(),
                additional_services: Vec::new(),
                discount_percent: Decimal::ZERO,
                valid_days: 14,
            })
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "lead", .. }));
    }

    #[test]
    fn missing_event_lookup_is_not_found() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(
            store.event(123).unwrap_err(),
            Error::NotFound { kind: "event", id: 123 }
        ));
    }
}
