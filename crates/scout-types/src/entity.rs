//! `Entity` — a structured extraction produced by the Entity Extractor
//! (spec §3, §4.6).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::source::SourceId;

/// The fixed set of entity classes the extraction model is directed to use
/// (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    Person,
    Organization,
    FundingRound,
    FundingAmount,
    Metric,
    Date,
    Technology,
    RiskFactor,
    Partnership,
}

impl EntityClass {
    pub const ALL: [EntityClass; 9] = [
        EntityClass::Person,
        EntityClass::Organization,
        EntityClass::FundingRound,
        EntityClass::FundingAmount,
        EntityClass::Metric,
        EntityClass::Date,
        EntityClass::Technology,
        EntityClass::RiskFactor,
        EntityClass::Partnership,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::FundingRound => "funding_round",
            Self::FundingAmount => "funding_amount",
            Self::Metric => "metric",
            Self::Date => "date",
            Self::Technology => "technology",
            Self::RiskFactor => "risk_factor",
            Self::Partnership => "partnership",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for EntityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniqueness key: `(class, text, source_start, source_end, source_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub class: EntityClass,
    pub text: String,
    pub attributes: HashMap<String, serde_json::Value>,
    pub source_start: usize,
    pub source_end: usize,
    pub source_id: SourceId,
    pub confidence: Option<f32>,
}

impl Entity {
    pub fn dedup_key(&self) -> (EntityClass, String, usize, usize, SourceId) {
        (
            self.class,
            self.text.clone(),
            self.source_start,
            self.source_end,
            self.source_id,
        )
    }
}
