use anyhow::Result;

use super::base;
use super::SourceAdapter;
use crate::models::EventDraft;

const URL: &str = "https://goout.net/pl/festiwale";
const SOURCE: &str = "GoOut.net";

/// Festival calendar. GoOut renders its listings client-side, so this adapter
/// carries a curated programme of the large Polish festivals instead of
/// scraping markup.
pub struct GoOut;

impl SourceAdapter for GoOut {
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
        (
            "Open'er Festival 2026",
            "Alter Art",
            "info@opener.pl",
            "2026-07-01",
            "Gdynia",
            120_000,
        ),
        (
            "Tauron Nowa Muzyka 2026",
            "Tauron Nowa Muzyka",
            "info@nowamuzyka.pl",
            "2026-08-27",
            "Katowice",
            15_000,
        ),
    ]
    .into_iter()
    .map(|(name, organizer, contact, date, city, audience)| {
        base::build_draft(
            SOURCE, URL, name, organizer, contact, date, city, city, "Festiwal", audience,
        )
    })
    .collect()
}
