use std::fmt;
use std::str::FromStr;

use md5::{Digest, Md5};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stable content identifier for an event: lowercased concatenation of the
/// four identity fields (no separator), MD5, 32 hex chars. Whitespace and
/// diacritics are NOT normalized, so formatting differences between sources
/// produce distinct fingerprints.
pub fn fingerprint(name: &str, date_start: &str, location: &str, organizer: &str) -> String {
    let content = format!("{name}{date_start}{location}{organizer}").to_lowercase();
    let mut hasher = Md5::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    New,
    Contacted,
    Qualified,
    OfferSent,
    Won,
    Lost,
    Rejected,
}

impl EventStatus {
    pub const ALL: [EventStatus; 7] = [
        EventStatus::New,
        EventStatus::Contacted,
        EventStatus::Qualified,
        EventStatus::OfferSent,
        EventStatus::Won,
        EventStatus::Lost,
        EventStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::New => "new",
            EventStatus::Contacted => "contacted",
            EventStatus::Qualified => "qualified",
            EventStatus::OfferSent => "offer_sent",
            EventStatus::Won => "won",
            EventStatus::Lost => "lost",
            EventStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = crate::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| crate::Error::UnknownStatus {
                kind: "event",
                value: value.to_string(),
            })
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Active,
    OfferSent,
    Negotiation,
    Won,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::New,
        LeadStatus::Active,
        LeadStatus::OfferSent,
        LeadStatus::Negotiation,
        LeadStatus::Won,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Active => "active",
            LeadStatus::OfferSent => "offer_sent",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = crate::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| crate::Error::UnknownStatus {
                kind: "lead",
                value: value.to_string(),
            })
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Draft,
    Sent,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Draft => "draft",
            OfferStatus::Sent => "sent",
        }
    }
}

impl FromStr for OfferStatus {
    type Err = crate::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(OfferStatus::Draft),
            "sent" => Ok(OfferStatus::Sent),
            other => Err(crate::Error::UnknownStatus {
                kind: "offer",
                value: other.to_string(),
            }),
        }
    }
}

/// Candidate event as produced by a source adapter, before it has an identity
/// in the store.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct EventDraft {
    pub name: String,
    pub organizer: String,
    pub organizer_contact: String,
    pub organizer_email: String,
    pub organizer_phone: String,
    pub date_start: String,
    pub date_end: String,
    pub location: String,
    pub city: String,
    pub country: String,
    pub category: String,
    pub subcategory: String,
    pub source: String,
    pub source_url: String,
    pub potential_score: i64,
    pub estimated_audience: i64,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            organizer: String::new(),
            organizer_contact: String::new(),
            organizer_email: String::new(),
            organizer_phone: String::new(),
            date_start: String::new(),
            date_end: String::new(),
            location: String::new(),
            city: String::new(),
            country: "PL".to_string(),
            category: String::new(),
            subcategory: String::new(),
            source: String::new(),
            source_url: String::new(),
            potential_score: 3,
            estimated_audience: 0,
        }
    }
}

impl EventDraft {
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.name, &self.date_start, &self.location, &self.organizer)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Event {
    pub id: i64,
    pub fingerprint: String,
    pub name: String,
    pub organizer: String,
    pub organizer_contact: String,
    pub organizer_email: String,
    pub organizer_phone: String,
    pub date_start: String,
    pub date_end: String,
    pub location: String,
    pub city: String,
    pub country: String,
    pub category: String,
    pub subcategory: String,
    pub source: String,
    pub source_url: String,
    pub potential_score: i64,
    pub estimated_audience: i64,
    pub status: EventStatus,
    pub notes: String,
    pub discovered_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LeadDraft {
    pub event_id: i64,
    pub company: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub value: f64,
    pub package: Option<String>,
    pub notes: String,
}

impl Default for LeadDraft {
    fn default() -> Self {
        Self {
            event_id: 0,
            company: String::new(),
            contact_person: String::new(),
            email: String::new(),
            phone: String::new(),
            value: 0.0,
            package: None,
            notes: String::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Lead {
    pub id: i64,
    pub event_id: i64,
    pub company: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub status: LeadStatus,
    pub value: f64,
    pub package: Option<String>,
    pub notes: String,
    pub offer_sent_date: Option<String>,
    pub follow_up_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OfferDraft {
    pub lead_id: i64,
    pub event_id: i64,
    pub package: String,
    #[serde(default)]
    pub additional_services: Vec<String>,
    #[serde(default)]
    pub discount_percent: Decimal,
    #[serde(default = "default_valid_days")]
    pub valid_days: i64,
}

fn default_valid_days() -> i64 {
    14
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Offer {
    pub id: i64,
    pub lead_id: i64,
    pub event_id: i64,
    pub package: String,
    pub base_price: Decimal,
    pub additional_services: Vec<String>,
    pub total_price: Decimal,
    pub valid_until: String,
    pub status: OfferStatus,
    pub created_at: String,
    pub sent_at: Option<String>,
}
