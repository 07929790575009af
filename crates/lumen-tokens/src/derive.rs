//! The derivation contract: every non-anchor color is a pure function of
//! one anchor.
//!
//! A variant is a lightness step toward (or away from) the mode's page
//! background plus a chroma scale, keeping hue. The same [`VariantRule`]
//! applies to every family, so `accentStrong` and `errorStrong` differ only
//! because their anchors do. Lightness and chroma are quantized to the
//! precision of the canonical `oklch()` text, which makes the output string
//! the whole truth: re-parsing a derived token yields exactly the color the
//! engine computed.
//!
//! On-colors are not shifted. They are whichever of two fixed candidates
//! contrasts more with the anchor, near-black on a tie.

use lumen_color::Oklch;
use tracing::{debug, info};

use crate::anchors::{AnchorSet, ModeAnchors};
use crate::contrast::pick_on_color;
use crate::palette::Palette;
use crate::token::{Family, Mode, OklchToken, Role, TokenKey, TokenMap, Variant};

/// One lightness/chroma transformation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VariantRule {
    /// Percentage points toward the mode's background. Negative values move
    /// away from it (toward more emphasis).
    pub lightness: f64,
    pub chroma_scale: f64,
}

impl VariantRule {
    #[must_use]
    pub const fn new(lightness: f64, chroma_scale: f64) -> Self {
        Self { lightness, chroma_scale }
    }
}

/// The complete, fixed rule set.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivationRules {
    pub subtle: VariantRule,
    pub soft: VariantRule,
    pub strong: VariantRule,
    pub outline: VariantRule,
    /// `textSubtle` from `text`.
    pub text_subtle: VariantRule,
    /// `textMuted` from `text`.
    pub text_muted: VariantRule,
    /// `borderStrong` from `border`.
    pub border_strong: VariantRule,
    /// Shifted lightness is clamped to this range, in percent.
    pub lightness_floor: f64,
    pub lightness_ceiling: f64,
    pub near_white: Oklch,
    pub near_black: Oklch,
}

impl Default for DerivationRules {
    fn default() -> Self {
        Self {
            subtle: VariantRule::new(42.0, 0.3),
            soft: VariantRule::new(26.0, 0.6),
            strong: VariantRule::new(-12.0, 1.1),
            outline: VariantRule::new(12.0, 0.8),
            text_subtle: VariantRule::new(22.0, 1.0),
            text_muted: VariantRule::new(36.0, 1.0),
            border_strong: VariantRule::new(-14.0, 1.0),
            lightness_floor: 5.0,
            lightness_ceiling: 98.0,
            near_white: Oklch::new(0.98, 0.005, 250.0),
            near_black: Oklch::new(0.18, 0.015, 250.0),
        }
    }
}

impl DerivationRules {
    /// The shift rule of a family variant. `None` for [`Variant::On`], which
    /// is chosen by contrast instead.
    #[must_use]
    pub const fn variant(&self, variant: Variant) -> Option<VariantRule> {
        match variant {
            Variant::Subtle => Some(self.subtle),
            Variant::Soft => Some(self.soft),
            Variant::Strong => Some(self.strong),
            Variant::Outline => Some(self.outline),
            Variant::On => None,
        }
    }
}

/// Expands anchors into a full palette.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivationEngine {
    rules: DerivationRules,
}

impl DerivationEngine {
    #[must_use]
    pub const fn new(rules: DerivationRules) -> Self {
        Self { rules }
    }

    #[must_use]
    pub const fn rules(&self) -> &DerivationRules {
        &self.rules
    }

    /// Keys covered by the integrity check: everything the engine emits
    /// except literal values.
    pub fn checked_keys() -> impl Iterator<Item = TokenKey> {
        TokenKey::ALL.iter().copied().filter(|key| key.role() != Role::Literal)
    }

    /// Build both modes. Same anchors, same rules: identical output.
    #[must_use]
    pub fn generate(&self, anchors: &AnchorSet) -> Palette {
        let palette = Palette {
            light: self.derive_mode(Mode::Light, &anchors.light),
            dark: self.derive_mode(Mode::Dark, &anchors.dark),
        };
        info!(tokens = palette.light.len() + palette.dark.len(), "palette generated");
        palette
    }

    /// Build one mode: the anchors and literals verbatim plus every derived
    /// token.
    #[must_use]
    pub fn derive_mode(&self, mode: Mode, anchors: &ModeAnchors) -> TokenMap {
        let mut tokens = anchors.tokens().clone();
        let mut emit = |key: TokenKey, color: Oklch, name: String, usage: String| {
            let oklch = color.to_string();
            debug!(%mode, %key, %oklch, "derived");
            tokens.insert(key, OklchToken::new(oklch, name, usage).into());
        };

        let rules = &self.rules;
        let neutrals = [
            (TokenKey::TextSubtle, anchors.text(), rules.text_subtle, "Secondary copy and captions"),
            (TokenKey::TextMuted, anchors.text(), rules.text_muted, "Placeholders and disabled labels"),
            (
                TokenKey::BorderStrong,
                anchors.border(),
                rules.border_strong,
                "Dividers that must stand out from the page",
            ),
        ];
        for (key, source, rule, usage) in neutrals {
            let name = neutral_name(key);
            emit(key, self.shift(mode, source, rule), name, usage.to_owned());
        }

        for family in Family::ALL {
            let anchor = anchors.family(family);
            for variant in Variant::ALL {
                let color = self
                    .rules
                    .variant(variant)
                    .map_or_else(|| self.on_color(anchor), |rule| self.shift(mode, anchor, rule));
                emit(
                    family.key(variant),
                    color,
                    variant_name(family, variant),
                    variant_usage(family, variant),
                );
            }
        }

        tokens
    }

    /// Apply a rule to a color in `mode`.
    ///
    /// Lightness moves in percentage points and is clamped, then both
    /// lightness and chroma are rounded half-up to the canonical text
    /// precision. Hue is kept; the result is opaque.
    #[must_use]
    pub fn shift(&self, mode: Mode, color: Oklch, rule: VariantRule) -> Oklch {
        let percent = (color.l * 100.0 + mode.toward_background() * rule.lightness)
            .clamp(self.rules.lightness_floor, self.rules.lightness_ceiling);
        Oklch::new(
            quantize(percent, 1) / 100.0,
            quantize(color.c * rule.chroma_scale, 3),
            color.h,
        )
    }

    /// The readable foreground for a solid fill of `background`.
    #[must_use]
    pub fn on_color(&self, background: Oklch) -> Oklch {
        pick_on_color(background.to_rgba(), self.rules.near_white, self.rules.near_black)
    }
}

/// Round half-up to `decimals` places.
fn quantize(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale + 0.5).floor() / scale
}

fn neutral_name(key: TokenKey) -> String {
    match key {
        TokenKey::TextSubtle => "Text Subtle",
        TokenKey::TextMuted => "Text Muted",
        TokenKey::BorderStrong => "Border Strong",
        _ => key.as_str(),
    }
    .to_owned()
}

fn variant_name(family: Family, variant: Variant) -> String {
    match variant {
        Variant::On => format!("On {}", family.title()),
        _ => format!("{} {}", family.title(), variant.title()),
    }
}

fn variant_usage(family: Family, variant: Variant) -> String {
    let family = family.as_str();
    match variant {
        Variant::Subtle => format!("Tinted background behind {family} content"),
        Variant::Soft => format!("Hover and pressed fills for {family} surfaces"),
        Variant::Strong => format!("High-emphasis {family} text and icons"),
        Variant::Outline => format!("Borders and focus rings for {family} elements"),
        Variant::On => format!("Text and icons on a solid {family} fill"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
