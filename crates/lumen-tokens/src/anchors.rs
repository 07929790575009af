//! Anchor sets: the hand-authored colors derivation starts from.
//!
//! A mode's anchors are the structural neutrals (`bg`, `surface`, `text`,
//! `border`, `overlay`) plus one color per [`Family`]. Literal tokens
//! (`shadow`, `shadowMd`) ride along unchanged so a generated palette is
//! complete. Everything else in a palette is derived.

use lumen_color::Oklch;

use crate::error::PaletteError;
use crate::palette::Palette;
use crate::token::{ColorToken, Family, LiteralToken, Mode, OklchToken, Role, TokenKey, TokenMap};

/// Anchors and literals of both modes.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorSet {
    pub light: ModeAnchors,
    pub dark: ModeAnchors,
}

/// Anchors and literals of one mode, with the colors derivation reads
/// already parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct ModeAnchors {
    tokens: TokenMap,
    text: Oklch,
    border: Oklch,
    families: [Oklch; 6],
}

impl AnchorSet {
    /// The house anchors.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            light: ModeAnchors::assemble(&LIGHT, LIGHT_SHADOWS),
            dark: ModeAnchors::assemble(&DARK, DARK_SHADOWS),
        }
    }

    /// Extract the anchors and literals of a stored palette.
    ///
    /// # Errors
    ///
    /// [`PaletteError::InvalidAnchor`] when an anchor is absent, a literal,
    /// or not a parseable OKLCH expression.
    pub fn from_palette(palette: &Palette) -> Result<Self, PaletteError> {
        Ok(Self {
            light: ModeAnchors::from_tokens(Mode::Light, palette.mode(Mode::Light))?,
            dark: ModeAnchors::from_tokens(Mode::Dark, palette.mode(Mode::Dark))?,
        })
    }

    #[must_use]
    pub const fn mode(&self, mode: Mode) -> &ModeAnchors {
        match mode {
            Mode::Light => &self.light,
            Mode::Dark => &self.dark,
        }
    }
}

impl ModeAnchors {
    /// Pick the anchor and literal tokens out of a full token map.
    ///
    /// # Errors
    ///
    /// See [`AnchorSet::from_palette`].
    pub fn from_tokens(mode: Mode, all: &TokenMap) -> Result<Self, PaletteError> {
        let color_of = |key: TokenKey| {
            let token = all.get(&key);
            token.and_then(ColorToken::color).ok_or_else(|| PaletteError::InvalidAnchor {
                mode,
                key,
                found: token.map_or_else(String::new, |t| t.raw().to_owned()),
            })
        };

        for key in TokenKey::with_role(Role::Anchor) {
            color_of(key)?;
        }

        let mut families = [Oklch::BLACK; 6];
        for family in Family::ALL {
            families[family as usize] = color_of(family.anchor())?;
        }

        let tokens = all
            .iter()
            .filter(|(key, _)| key.role() != Role::Derived)
            .map(|(key, token)| (*key, token.clone()))
            .collect();

        Ok(Self {
            tokens,
            text: color_of(TokenKey::Text)?,
            border: color_of(TokenKey::Border)?,
            families,
        })
    }

    /// Anchor and literal tokens, verbatim.
    #[must_use]
    pub const fn tokens(&self) -> &TokenMap {
        &self.tokens
    }

    #[must_use]
    pub const fn text(&self) -> Oklch {
        self.text
    }

    #[must_use]
    pub const fn border(&self) -> Oklch {
        self.border
    }

    #[must_use]
    pub const fn family(&self, family: Family) -> Oklch {
        self.families[family as usize]
    }

    fn assemble(colors: &BuiltinColors, shadows: [&str; 2]) -> Self {
        let neutrals = [
            (TokenKey::Bg, colors.bg),
            (TokenKey::Surface, colors.surface),
            (TokenKey::Text, colors.text),
            (TokenKey::Border, colors.border),
            (TokenKey::Overlay, colors.overlay),
        ];
        let families = Family::ALL.map(|family| (family.anchor(), colors.families[family as usize]));

        let mut tokens = TokenMap::new();
        for (key, color) in neutrals.into_iter().chain(families) {
            let (name, usage) = anchor_metadata(key);
            tokens.insert(key, OklchToken::new(color.to_string(), name, usage).into());
        }
        for (key, value) in [TokenKey::Shadow, TokenKey::ShadowMd].into_iter().zip(shadows) {
            let (name, usage) = anchor_metadata(key);
            tokens.insert(key, LiteralToken::new(value, name, usage).into());
        }

        Self {
            tokens,
            text: colors.text,
            border: colors.border,
            families: colors.families,
        }
    }
}

// ---------------------------------------------------------------------------
// House anchors
// ---------------------------------------------------------------------------

struct BuiltinColors {
    bg: Oklch,
    surface: Oklch,
    text: Oklch,
    border: Oklch,
    overlay: Oklch,
    /// Indexed by `Family as usize`.
    families: [Oklch; 6],
}

const LIGHT: BuiltinColors = BuiltinColors {
    bg: Oklch::new(0.98, 0.004, 250.0),
    surface: Oklch::new(1.0, 0.0, 0.0),
    text: Oklch::new(0.18, 0.015, 250.0),
    border: Oklch::new(0.88, 0.01, 250.0),
    overlay: Oklch::with_alpha(0.25, 0.01, 250.0, 0.15),
    families: [
        Oklch::new(0.52, 0.06, 230.0),
        Oklch::new(0.50, 0.08, 300.0),
        Oklch::new(0.52, 0.12, 150.0),
        Oklch::new(0.75, 0.14, 75.0),
        Oklch::new(0.55, 0.18, 25.0),
        Oklch::new(0.54, 0.10, 250.0),
    ],
};

const DARK: BuiltinColors = BuiltinColors {
    bg: Oklch::new(0.18, 0.015, 250.0),
    surface: Oklch::new(0.22, 0.015, 250.0),
    text: Oklch::new(0.92, 0.01, 250.0),
    border: Oklch::new(0.32, 0.015, 250.0),
    overlay: Oklch::with_alpha(0.05, 0.01, 250.0, 0.5),
    families: [
        Oklch::new(0.70, 0.08, 230.0),
        Oklch::new(0.70, 0.09, 300.0),
        Oklch::new(0.72, 0.13, 150.0),
        Oklch::new(0.80, 0.13, 75.0),
        Oklch::new(0.68, 0.16, 25.0),
        Oklch::new(0.72, 0.10, 250.0),
    ],
};

const LIGHT_SHADOWS: [&str; 2] = [
    "0 1px 2px oklch(25% 0.01 250 / 0.08)",
    "0 4px 12px oklch(25% 0.01 250 / 0.12)",
];

const DARK_SHADOWS: [&str; 2] = ["0 1px 2px oklch(0% 0 0 / 0.4)", "0 4px 12px oklch(0% 0 0 / 0.5)"];

/// Display name and usage note of an anchor or literal key.
const fn anchor_metadata(key: TokenKey) -> (&'static str, &'static str) {
    match key {
        TokenKey::Bg => ("Background", "Page background"),
        TokenKey::Surface => ("Surface", "Cards, panels and popovers"),
        TokenKey::Text => ("Text", "Body copy and headings"),
        TokenKey::Border => ("Border", "Hairline dividers and input borders"),
        TokenKey::Overlay => ("Overlay", "Scrim behind modal dialogs"),
        TokenKey::Shadow => ("Shadow", "Resting elevation"),
        TokenKey::ShadowMd => ("Shadow Medium", "Raised elevation for menus and popovers"),
        TokenKey::Accent => ("Accent", "Primary actions and links"),
        TokenKey::Secondary => ("Secondary", "Secondary actions and highlights"),
        TokenKey::Success => ("Success", "Confirmations and positive states"),
        TokenKey::Warning => ("Warning", "Cautions that need attention"),
        TokenKey::Error => ("Error", "Failures and destructive actions"),
        TokenKey::Info => ("Info", "Neutral informational messages"),
        _ => ("", ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STORED: &str = include_str!("../../../palette/palette.json");

    #[test]
    fn builtin_matches_stored_anchors() {
        let stored = Palette::from_json(STORED).unwrap();
        assert_eq!(AnchorSet::from_palette(&stored).unwrap(), AnchorSet::builtin());
    }

    #[test]
    fn builtin_has_every_non_derived_key() {
        let anchors = AnchorSet::builtin();
        for mode in Mode::ALL {
            let tokens = anchors.mode(mode).tokens();
            assert_eq!(tokens.len(), 13, "{mode}");
            assert!(tokens.keys().all(|key| key.role() != Role::Derived));
        }
    }

    #[test]
    fn builtin_literals_are_not_colors() {
        let anchors = AnchorSet::builtin();
        let shadow = &anchors.light.tokens()[&TokenKey::Shadow];
        assert!(matches!(shadow, ColorToken::Literal(_)));
        assert_eq!(shadow.raw(), "0 1px 2px oklch(25% 0.01 250 / 0.08)");
    }

    #[test]
    fn family_lookup_uses_enum_order() {
        let anchors = AnchorSet::builtin();
        assert_eq!(anchors.light.family(Family::Accent).to_string(), "oklch(52% 0.06 230)");
        assert_eq!(anchors.dark.family(Family::Info).to_string(), "oklch(72% 0.1 250)");
    }

    #[test]
    fn literal_anchor_is_rejected() {
        let mut stored = Palette::from_json(STORED).unwrap();
        stored.dark.insert(
            TokenKey::Accent,
            LiteralToken::new("#437085", "Accent", "Primary actions and links").into(),
        );
        let err = AnchorSet::from_palette(&stored).unwrap_err();
        assert!(matches!(
            err,
            PaletteError::InvalidAnchor { mode: Mode::Dark, key: TokenKey::Accent, ref found }
                if found == "#437085"
        ));
    }

    #[test]
    fn unparseable_anchor_is_rejected() {
        let mut stored = Palette::from_json(STORED).unwrap();
        stored.light.insert(TokenKey::Border, OklchToken::new("oklch(88%)", "Border", "x").into());
        let err = AnchorSet::from_palette(&stored).unwrap_err();
        assert!(matches!(
            err,
            PaletteError::InvalidAnchor { mode: Mode::Light, key: TokenKey::Border, .. }
        ));
    }
}
