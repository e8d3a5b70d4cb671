use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{ElementRef, Selector};

use crate::models::EventDraft;
use crate::scoring;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+48[\s\-]?)?\d{3}[\s\-]?\d{3}[\s\-]?\d{3}").expect("valid phone regex")
});

pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|node| {
            let text = inner_text(node);
            let cleaned = clean_text(&text);
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            }
        })
        .flatten()
}

pub fn inner_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

/// Shared blocking client; the request timeout doubles as the per-adapter
/// timeout, so one hung source cannot stall the whole sync.
pub fn fetch_html(url: &str) -> Result<String> {
    static CLIENT: Lazy<Client> = Lazy::new(|| {
        Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent("StreamFlow/0.1 (+https://prototypowanie.pl)")
            .build()
            .expect("http client")
    });

    let response = CLIENT
        .get(url)
        .send()
        .with_context(|| format!("request failed for {url}"))?;
    let response = response
        .error_for_status()
        .with_context(|| format!("non-success status for {url}"))?;
    response
        .text()
        .with_context(|| format!("unable to read response body for {url}"))
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE
        .find(text)
        .map(|m| clean_text(m.as_str()))
        .filter(|candidate| !candidate.is_empty())
}

/// Listing pages mix ISO and Polish day-first dates; normalize to YYYY-MM-DD.
pub fn parse_event_date(input: &str) -> Option<String> {
    let cleaned = clean_text(input);
    if cleaned.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%d %m %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, fmt) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    None
}

/// Assembles a candidate event the way every adapter does it: contact fields
/// pulled out of free text, the potential score derived at build time.
#[allow(clippy::too_many_arguments)]
pub fn build_draft(
    source: &str,
    source_url: &str,
    name: &str,
    organizer: &str,
    contact_text: &str,
    date_start: &str,
    location: &str,
    city: &str,
    category: &str,
    estimated_audience: i64,
) -> EventDraft {
    let organizer_email = extract_email(contact_text).unwrap_or_default();
    let organizer_phone = extract_phone(contact_text).unwrap_or_default();
    let potential_score = scoring::potential_score(
        estimated_audience,
        category,
        !organizer_email.is_empty(),
        !organizer_phone.is_empty(),
    );

    EventDraft {
        name: clean_text(name),
        organizer: clean_text(organizer),
        organizer_contact: clean_text(contact_text),
        organizer_email,
        organizer_phone,
        date_start: date_start.to_string(),
        location: clean_text(location),
        city: clean_text(city),
        category: category.to_string(),
        source: source.to_string(),
        source_url: source_url.to_string(),
        potential_score,
        estimated_audience,
        ..EventDraft::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Runmageddon\n  Warszawa  "), "Runmageddon Warszawa");
    }

    #[test]
    fn extracts_contact_details_from_free_text() {
        let text = "Kontakt: kontakt@runmageddon.pl, tel. +48 500 000 000";
        assert_eq!(extract_email(text).as_deref(), Some("kontakt@runmageddon.pl"));
        assert_eq!(extract_phone(text).as_deref(), Some("+48 500 000 000"));
        assert_eq!(extract_email("brak danych"), None);
        assert_eq!(extract_phone("brak danych"), None);
    }

    #[test]
    fn parses_polish_and_iso_dates() {
        assert_eq!(parse_event_date("2026-03-15").as_deref(), Some("2026-03-15"));
        assert_eq!(parse_event_date("15.03.2026").as_deref(), Some("2026-03-15"));
        assert_eq!(parse_event_date(" 15.03.2026 ").as_deref(), Some("2026-03-15"));
        assert_eq!(parse_event_date("wkrótce"), None);
    }

    #[test]
    fn build_draft_scores_at_build_time() {
        let draft = build_draft(
            "Runmageddon.pl",
            "https://www.runmageddon.pl",
            "Runmageddon Warszawa",
            "Runmageddon Sp. z o.o.",
            "kontakt@runmageddon.pl",
            "2026-03-15",
            "Warszawa",
            "Warszawa",
            "OCR",
            4000,
        );
        // base 3 + audience 1 + category 1; a single contact channel adds nothing
        assert_eq!(draft.potential_score, 5);
        assert_eq!(draft.organizer_email, "kontakt@runmageddon.pl");
        assert_eq!(draft.organizer_phone, "");
        assert_eq!(draft.country, "PL");
    }
}
