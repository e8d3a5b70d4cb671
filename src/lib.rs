pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod pricing;
pub mod reconcile;
pub mod scoring;
pub mod sources;
pub mod utils;

pub use db::{EventStats, Store};
pub use error::{Error, Result};
pub use models::{
    fingerprint, Event, EventDraft, EventStatus, Lead, LeadDraft, LeadStatus, Offer, OfferDraft,
    OfferStatus,
};
pub use pipeline::{conversion_rate, pipeline_value, PipelineValue};
pub use pricing::{quote, valid_until, PriceBreakdown};
pub use reconcile::{Reconciler, SyncReport};
pub use scoring::potential_score;
pub use sources::SourceAdapter;
