//! Contrast policy: which pairs are audited and how hard.
//!
//! Thresholds are data. The defaults below are the house table; a
//! `[contrast]` section in `lumen.toml` replaces them wholesale.

use serde::{Deserialize, Serialize};

use crate::token::{Family, Mode, TokenKey, Variant};

/// Minimum WCAG ratio between two tokens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContrastRequirement {
    pub foreground: TokenKey,
    pub background: TokenKey,
    pub min_ratio: f64,
    #[serde(default = "Mode::all")]
    pub modes: Vec<Mode>,
}

/// Minimum gap between two tokens' average 8-bit channel values, with
/// `lighter` expected above `darker`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelMargin {
    pub lighter: TokenKey,
    pub darker: TokenKey,
    pub min_gap: f64,
    #[serde(default = "Mode::all")]
    pub modes: Vec<Mode>,
}

impl ContrastRequirement {
    #[must_use]
    pub fn new(foreground: TokenKey, background: TokenKey, min_ratio: f64) -> Self {
        Self {
            foreground,
            background,
            min_ratio,
            modes: Mode::all(),
        }
    }
}

impl ChannelMargin {
    #[must_use]
    pub fn new(lighter: TokenKey, darker: TokenKey, min_gap: f64, mode: Mode) -> Self {
        Self {
            lighter,
            darker,
            min_gap,
            modes: vec![mode],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContrastPolicy {
    pub pairs: Vec<ContrastRequirement>,
    pub margins: Vec<ChannelMargin>,
}

/// WCAG AA for normal text.
pub const BODY_TEXT: f64 = 4.5;

impl Default for ContrastPolicy {
    fn default() -> Self {
        use crate::token::TokenKey as K;

        let mut pairs = vec![
            ContrastRequirement::new(K::Text, K::Bg, BODY_TEXT),
            ContrastRequirement::new(K::Text, K::Surface, BODY_TEXT),
            ContrastRequirement::new(K::TextSubtle, K::Bg, BODY_TEXT),
            ContrastRequirement::new(K::TextSubtle, K::Surface, BODY_TEXT),
            ContrastRequirement::new(K::TextMuted, K::Bg, 3.0),
        ];
        pairs.extend(
            Family::ALL.map(|family| ContrastRequirement::new(family.key(Variant::On), family.anchor(), BODY_TEXT)),
        );
        pairs.push(ContrastRequirement::new(K::Border, K::Bg, 1.2));
        pairs.push(ContrastRequirement::new(K::BorderStrong, K::Bg, 2.0));

        Self {
            pairs,
            margins: vec![
                ChannelMargin::new(K::Text, K::Bg, 100.0, Mode::Dark),
                ChannelMargin::new(K::Bg, K::Text, 100.0, Mode::Light),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("{foreground}/{background}: minimum ratio {min_ratio} is outside 1..=21")]
    RatioOutOfRange {
        foreground: TokenKey,
        background: TokenKey,
        min_ratio: f64,
    },
    #[error("{lighter}/{darker}: minimum gap {min_gap} is outside 0..=255")]
    GapOutOfRange {
        lighter: TokenKey,
        darker: TokenKey,
        min_gap: f64,
    },
    #[error("{0} is compared with itself")]
    SelfComparison(TokenKey),
    #[error("{first}/{second}: rule applies to no mode")]
    NoModes { first: TokenKey, second: TokenKey },
}

impl ContrastPolicy {
    /// Reject thresholds no palette could meet, or that mean nothing.
    ///
    /// # Errors
    ///
    /// The first offending rule, as a [`PolicyError`].
    pub fn validate(&self) -> Result<(), PolicyError> {
        for pair in &self.pairs {
            check_keys(pair.foreground, pair.background, &pair.modes)?;
            if !(1.0..=21.0).contains(&pair.min_ratio) {
                return Err(PolicyError::RatioOutOfRange {
                    foreground: pair.foreground,
                    background: pair.background,
                    min_ratio: pair.min_ratio,
                });
            }
        }
        for margin in &self.margins {
            check_keys(margin.lighter, margin.darker, &margin.modes)?;
            if !(0.0..=255.0).contains(&margin.min_gap) {
                return Err(PolicyError::GapOutOfRange {
                    lighter: margin.lighter,
                    darker: margin.darker,
                    min_gap: margin.min_gap,
                });
            }
        }
        Ok(())
    }
}

fn check_keys(first: TokenKey, second: TokenKey, modes: &[Mode]) -> Result<(), PolicyError> {
    if first == second {
        return Err(PolicyError::SelfComparison(first));
    }
    if modes.is_empty() {
        return Err(PolicyError::NoModes { first, second });
    }
    Ok(())
}
