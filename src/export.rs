use crate::error::Result;
use crate::models::{Event, Lead};

const EVENT_COLUMNS: [&str; 10] = [
    "id",
    "name",
    "organizer",
    "date_start",
    "location",
    "city",
    "category",
    "source",
    "potential_score",
    "status",
];

const LEAD_COLUMNS: [&str; 9] = [
    "id",
    "company",
    "contact_person",
    "email",
    "phone",
    "status",
    "value",
    "package",
    "created_at",
];

/// Semicolon-delimited event export in the column order downstream consumers
/// expect. Empty input produces empty output, not a lone header row.
pub fn events_to_csv(events: &[Event]) -> Result<String> {
    if events.is_empty() {
        return Ok(String::new());
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());
    writer.write_record(EVENT_COLUMNS)?;
    for event in events {
        writer.write_record([
            event.id.to_string(),
            event.name.clone(),
            event.organizer.clone(),
            event.date_start.clone(),
            event.location.clone(),
            event.city.clone(),
            event.category.clone(),
            event.source.clone(),
            event.potential_score.to_string(),
            event.status.as_str().to_string(),
        ])?;
    }
    finish(writer)
}

pub fn leads_to_csv(leads: &[Lead]) -> Result<String> {
    if leads.is_empty() {
        return Ok(String::new());
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());
    writer.write_record(LEAD_COLUMNS)?;
    for lead in leads {
        writer.write_record([
            lead.id.to_string(),
            lead.company.clone(),
            lead.contact_person.clone(),
            lead.email.clone(),
            lead.phone.clone(),
            lead.status.as_str().to_string(),
            lead.value.to_string(),
            lead.package.clone().unwrap_or_default(),
            lead.created_at.clone(),
        ])?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|err| crate::Error::Io(err.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|err| crate::Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventStatus, LeadStatus};

    fn event(id: i64, name: &str) -> Event {
        Event {
            id,
            fingerprint: "0".repeat(32),
            name: name.to_string(),
            organizer: "Grupa MTP".to_string(),
            organizer_contact: String::new(),
            organizer_email: "pga@mtp.pl".to_string(),
            organizer_phone: String::new(),
            date_start: "2026-10-16".to_string(),
            date_end: String::new(),
            location: "MTP Poznań".to_string(),
            city: "Poznań".to_string(),
            country: "PL".to_string(),
            category: "Targi".to_string(),
            subcategory: String::new(),
            source: "MTP.pl".to_string(),
            source_url: String::new(),
            potential_score: 4,
            estimated_audience: 80_000,
            status: EventStatus::New,
            notes: String::new(),
            discovered_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn empty_input_exports_zero_bytes() {
        assert_eq!(events_to_csv(&[]).unwrap(), "");
        assert_eq!(leads_to_csv(&[]).unwrap(), "");
    }

    #[test]
    fn event_columns_in_contract_order() {
        let csv = events_to_csv(&[event(7, "Poznań Game Arena 2026")]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id;name;organizer;date_start;location;city;category;source;potential_score;status"
        );
        assert_eq!(
            lines.next().unwrap(),
            "7;Poznań Game Arena 2026;Grupa MTP;2026-10-16;MTP Poznań;Poznań;Targi;MTP.pl;4;new"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn lead_export_includes_header_and_rows() {
        let lead = Lead {
            id: 3,
            event_id: 7,
            company: "Acme Sp. z o.o.".to_string(),
            contact_person: "Jan Kowalski".to_string(),
            email: "jan@acme.pl".to_string(),
            phone: "+48 500 000 000".to_string(),
            status: LeadStatus::Active,
            value: 2490.0,
            package: Some("standard".to_string()),
            notes: String::new(),
            offer_sent_date: None,
            follow_up_date: None,
            created_at: "2026-01-05T10:00:00+00:00".to_string(),
            updated_at: String::new(),
        };
        let csv = leads_to_csv(&[lead]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id;company;contact_person;email;phone;status;value;package;created_at"
        );
        assert_eq!(
            lines.next().unwrap(),
            "3;Acme Sp. z o.o.;Jan Kowalski;jan@acme.pl;+48 500 000 000;active;2490;standard;2026-01-05T10:00:00+00:00"
        );
    }
}
