use std::sync::{Arc, RwLock};

use shared::domain::CampaignBrief;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum BriefEdit {
    Product(String),
    Audience(String),
    Tone(String),
    Goal(String),
    Platform(Vec<String>),
    NumHeadlines(Option<u32>),
    NumLong(Option<u32>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BriefEditError {
    #[error("unknown brief field `{0}`")]
    UnknownField(String),
    #[error("brief field `{field}` expects a whole number, got `{value}`")]
    InvalidCount { field: &'static str, value: String },
}

impl BriefEdit {
    /// Builds an edit from a field name and its raw text.
    ///
    /// `platform` is split on commas with surrounding whitespace trimmed;
    /// empty entries are kept, and only a blank value gives an empty list.
    /// An empty count clears the knob so the server default applies.
    pub fn parse(field: &str, raw: &str) -> Result<Self, BriefEditError> {
        let edit = match field.trim() {
            "product" => Self::Product(raw.to_string()),
            "audience" => Self::Audience(raw.to_string()),
            "tone" => Self::Tone(raw.to_string()),
            "goal" => Self::Goal(raw.to_string()),
            "platform" if raw.trim().is_empty() => Self::Platform(Vec::new()),
            "platform" => Self::Platform(raw.split(',').map(|p| p.trim().to_string()).collect()),
            "num_headlines" => Self::NumHeadlines(parse_count("num_headlines", raw)?),
            "num_long" => Self::NumLong(parse_count("num_long", raw)?),
            other => return Err(BriefEditError::UnknownField(other.to_string())),
        };
        Ok(edit)
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Product(_) => "product",
            Self::Audience(_) => "audience",
            Self::Tone(_) => "tone",
            Self::Goal(_) => "goal",
            Self::Platform(_) => "platform",
            Self::NumHeadlines(_) => "num_headlines",
            Self::NumLong(_) => "num_long",
        }
    }

    fn apply_to(self, brief: &mut CampaignBrief) {
        match self {
            Self::Product(v) => brief.product = v,
            Self::Audience(v) => brief.audience = v,
            Self::Tone(v) => brief.tone = v,
            Self::Goal(v) => brief.goal = v,
            Self::Platform(v) => brief.platform = v,
            Self::NumHeadlines(v) => brief.num_headlines = v,
            Self::NumLong(v) => brief.num_long = v,
        }
    }
}

fn parse_count(field: &'static str, raw: &str) -> Result<Option<u32>, BriefEditError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| BriefEditError::InvalidCount {
            field,
            value: raw.to_string(),
        })
}

/// Holds the brief being edited. Every edit swaps in a new value, so a
/// snapshot returned by [`BriefStore::get`] never changes after the fact.
#[derive(Debug, Default)]
pub struct BriefStore {
    current: RwLock<Arc<CampaignBrief>>,
}

impl BriefStore {
    pub fn new(brief: CampaignBrief) -> Self {
        Self {
            current: RwLock::new(Arc::new(brief)),
        }
    }

    pub fn get(&self) -> Arc<CampaignBrief> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    pub fn set_field(&self, edit: BriefEdit) -> Arc<CampaignBrief> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut next = CampaignBrief::clone(&**guard);
        tracing::trace!(field = edit.field_name(), "brief field edited");
        edit.apply_to(&mut next);
        let next = Arc::new(next);
        *guard = Arc::clone(&next);
        next
    }

    pub fn replace(&self, brief: CampaignBrief) -> Arc<CampaignBrief> {
        let next = Arc::new(brief);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = Arc::clone(&next);
        next
    }
}

#[cfg(test)]
#[path = "tests/brief_store_tests.rs"]
mod tests;
