pub mod base;
pub mod goout;
pub mod hyrox;
pub mod mtp;
pub mod runmageddon;

use crate::models::EventDraft;

/// A source of candidate events. Anything that can produce drafts qualifies:
/// HTML scraping, feed parsing, curated listings, test fixtures. Adapters own
/// their transport and report failure through the Result; the reconciler
/// decides what failure means for the run.
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &'static str;
    fn source_url(&self) -> &'static str;
    fn fetch(&self) -> anyhow::Result<Vec<EventDraft>>;
}

#[derive(Clone, serde::Serialize)]
pub struct SourceInfo {
    pub name: String,
    pub url: String,
}

pub fn default_adapters() -> Vec<Box<dyn SourceAdapter>> {
    vec![
        Box::new(runmageddon::Runmageddon),
        Box::new(hyrox::Hyrox),
        Box::new(goout::GoOut),
        Box::new(mtp::Mtp),
    ]
}

pub fn list_sources() -> Vec<SourceInfo> {
    default_adapters()
        .into_iter()
        .map(|adapter| SourceInfo {
            name: adapter.name().to_string(),
            url: adapter.source_url().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_lists_every_source() {
        let names: Vec<String> = list_sources().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            ["Runmageddon.pl", "HYROX.com", "GoOut.net", "MTP.pl"]
        );
    }
}
