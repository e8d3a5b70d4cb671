use serde::Serialize;

use crate::models::{Lead, LeadStatus};

/// Monetary value of the lead funnel, bucketed by stage.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct PipelineValue {
    pub new: f64,
    pub active: f64,
    pub offer_sent: f64,
    pub negotiation: f64,
    pub won: f64,
    pub lost: f64,
    pub total: f64,
}

pub fn pipeline_value(leads: &[Lead]) -> PipelineValue {
    let mut pipeline = PipelineValue::default();
    for lead in leads {
        match lead.status {
            LeadStatus::New => pipeline.new += lead.value,
            LeadStatus::Active => pipeline.active += lead.value,
            LeadStatus::OfferSent => pipeline.offer_sent += lead.value,
            LeadStatus::Negotiation => pipeline.negotiation += lead.value,
            LeadStatus::Won => pipeline.won += lead.value,
            LeadStatus::Lost => pipeline.lost += lead.value,
        }
        pipeline.total += lead.value;
    }
    pipeline
}

/// Won leads as a percentage of all leads, rounded to 2 decimals.
/// Zero leads is a valid input and reports as 0.0.
pub fn conversion_rate(total_leads: u64, won_leads: u64) -> f64 {
    if total_leads == 0 {
        return 0.0;
    }
    let rate = won_leads as f64 / total_leads as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}
