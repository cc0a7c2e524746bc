//! Presentation contract for a ranked asset list.
//!
//! Rendering is a pure function of the `GenerationResult`. Scores are
//! formatted with `{:.3}`: the exact binary value of the `f64` is rounded to
//! three decimals and exact ties go to the even digit. Scores outside
//! `[0, 1]` are printed unchanged.

use std::fmt;

use shared::domain::{GeneratedAsset, GenerationResult};

/// How a block shows its image. The reference is opaque and passed on
/// verbatim; whether it loads is up to the rendering medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageDirective {
    Load(String),
    /// Blank reference; the block is drawn without an image.
    Unresolvable(String),
}

impl ImageDirective {
    pub fn from_reference(reference: &str) -> Self {
        if reference.trim().is_empty() {
            Self::Unresolvable(reference.to_string())
        } else {
            Self::Load(reference.to_string())
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Self::Load(raw) | Self::Unresolvable(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBlock {
    pub rank: usize,
    pub score: String,
    pub copy: String,
    pub image: ImageDirective,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedResult {
    pub blocks: Vec<AssetBlock>,
}

impl RenderedResult {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

pub fn format_score(score: f64) -> String {
    format!("{score:.3}")
}

pub fn render_asset(rank: usize, asset: &GeneratedAsset) -> AssetBlock {
    AssetBlock {
        rank,
        score: format_score(asset.score),
        copy: asset.copy.clone(),
        image: ImageDirective::from_reference(&asset.image_url),
    }
}

pub fn render_result(result: Option<&GenerationResult>) -> RenderedResult {
    let Some(result) = result else {
        return RenderedResult::default();
    };

    RenderedResult {
        blocks: result
            .top_assets
            .iter()
            .enumerate()
            .map(|(idx, asset)| render_asset(idx + 1, asset))
            .collect(),
    }
}

impl fmt::Display for AssetBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{} score {}", self.rank, self.score)?;
        writeln!(f, "  copy:  {}", self.copy)?;
        match &self.image {
            ImageDirective::Load(src) => write!(f, "  image: {src}"),
            ImageDirective::Unresolvable(raw) => write!(f, "  image: <unavailable: {raw:?}>"),
        }
    }
}

impl fmt::Display for RenderedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, block) in self.blocks.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{block}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
