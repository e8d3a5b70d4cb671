use anyhow::Result;

use super::base;
use super::SourceAdapter;
use crate::models::EventDraft;

const URL: &str = "https://www.mtp.pl/kalendarium";
const SOURCE: &str = "MTP.pl";
const ORGANIZER: &str = "Grupa MTP";

/// Trade-fair calendar of the Poznań fairgrounds, published per season.
pub struct Mtp;

impl SourceAdapter for Mtp {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn source_url(&self) -> &'static str {
        URL
    }

    fn fetch(&self) -> Result<Vec<EventDraft>> {
        Ok(listing())
    }
}

fn listing() -> Vec<EventDraft> {
    [
        ("Poznań Game Arena 2026", "pga@mtp.pl", "2026-10-16", 80_000),
        ("Motor Show 2026", "motorshow@mtp.pl", "2026-04-10", 50_000),
    ]
    .into_iter()
    .map(|(name, contact, date, audience)| {
        base::build_draft(
            SOURCE,
            URL,
            name,
            ORGANIZER,
            contact,
            date,
            "MTP Poznań",
            "Poznań",
            "Targi",
            audience,
        )
    })
    .collect()
}
