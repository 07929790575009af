//! Token vocabulary: modes, the closed set of palette keys, and the tagged
//! token representation.
//!
//! Every palette key is a [`TokenKey`] variant. Keys are validated against
//! this enumeration when a palette is loaded, so the rest of the pipeline
//! never looks anything up by free-form string.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use lumen_color::{Oklch, parse_oklch};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tokens of one mode, in enumeration order.
pub type TokenMap = BTreeMap<TokenKey, ColorToken>;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Light or dark appearance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Light,
    Dark,
}

impl Mode {
    pub const ALL: [Self; 2] = [Self::Light, Self::Dark];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Sign of a lightness step that moves toward this mode's page
    /// background: up in light mode, down in dark mode.
    #[must_use]
    pub const fn toward_background(self) -> f64 {
        match self {
            Self::Light => 1.0,
            Self::Dark => -1.0,
        }
    }

    /// Both modes, for serde defaults.
    #[must_use]
    pub fn all() -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseKeyError(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Families and variants
// ---------------------------------------------------------------------------

/// Semantic color families that expand into the full variant set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    Accent,
    Secondary,
    Success,
    Warning,
    Error,
    Info,
}

impl Family {
    pub const ALL: [Self; 6] = [
        Self::Accent,
        Self::Secondary,
        Self::Success,
        Self::Warning,
        Self::Error,
        Self::Info,
    ];

    /// Lowercase name used in prose (`"accent"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accent => "accent",
            Self::Secondary => "secondary",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    /// Capitalized name used in token titles (`"Accent"`).
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Accent => "Accent",
            Self::Secondary => "Secondary",
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Info => "Info",
        }
    }

    /// The hand-authored anchor of this family.
    #[must_use]
    pub const fn anchor(self) -> TokenKey {
        match self {
            Self::Accent => TokenKey::Accent,
            Self::Secondary => TokenKey::Secondary,
            Self::Success => TokenKey::Success,
            Self::Warning => TokenKey::Warning,
            Self::Error => TokenKey::Error,
            Self::Info => TokenKey::Info,
        }
    }

    /// The key this family uses for `variant`.
    #[must_use]
    #[rustfmt::skip]
    pub const fn key(self, variant: Variant) -> TokenKey {
        use crate::token::{TokenKey as K, Variant as V};
        match (self, variant) {
            (Self::Accent, V::Subtle) => K::AccentSubtle,
            (Self::Accent, V::Soft) => K::AccentSoft,
            (Self::Accent, V::Strong) => K::AccentStrong,
            (Self::Accent, V::Outline) => K::AccentOutline,
            (Self::Accent, V::On) => K::OnAccent,
            (Self::Secondary, V::Subtle) => K::SecondarySubtle,
            (Self::Secondary, V::Soft) => K::SecondarySoft,
            (Self::Secondary, V::Strong) => K::SecondaryStrong,
            (Self::Secondary, V::Outline) => K::SecondaryOutline,
            (Self::Secondary, V::On) => K::OnSecondary,
            (Self::Success, V::Subtle) => K::SuccessSubtle,
            (Self::Success, V::Soft) => K::SuccessSoft,
            (Self::Success, V::Strong) => K::SuccessStrong,
            (Self::Success, V::Outline) => K::SuccessOutline,
            (Self::Success, V::On) => K::OnSuccess,
            (Self::Warning, V::Subtle) => K::WarningSubtle,
            (Self::Warning, V::Soft) => K::WarningSoft,
            (Self::Warning, V::Strong) => K::WarningStrong,
            (Self::Warning, V::Outline) => K::WarningOutline,
            (Self::Warning, V::On) => K::OnWarning,
            (Self::Error, V::Subtle) => K::ErrorSubtle,
            (Self::Error, V::Soft) => K::ErrorSoft,
            (Self::Error, V::Strong) => K::ErrorStrong,
            (Self::Error, V::Outline) => K::ErrorOutline,
            (Self::Error, V::On) => K::OnError,
            (Self::Info, V::Subtle) => K::InfoSubtle,
            (Self::Info, V::Soft) => K::InfoSoft,
            (Self::Info, V::Strong) => K::InfoStrong,
            (Self::Info, V::Outline) => K::InfoOutline,
            (Self::Info, V::On) => K::OnInfo,
        }
    }
}

/// Derived variants every family carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variant {
    /// Tinted background behind family content.
    Subtle,
    /// Hover and pressed fills.
    Soft,
    /// High-emphasis text and icons.
    Strong,
    /// Borders and focus rings.
    Outline,
    /// Foreground placed on a solid fill of the anchor.
    On,
}

impl Variant {
    pub const ALL: [Self; 5] = [Self::Subtle, Self::Soft, Self::Strong, Self::Outline, Self::On];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Subtle => "Subtle",
            Self::Soft => "Soft",
            Self::Strong => "Strong",
            Self::Outline => "Outline",
            Self::On => "On",
        }
    }
}

// ---------------------------------------------------------------------------
// TokenKey
// ---------------------------------------------------------------------------

/// How a key gets its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Hand-authored OKLCH value that seeds derivation.
    Anchor,
    /// Pure function of an anchor; never edited by hand.
    Derived,
    /// Opaque non-color value (shadows); outside the derivation contract.
    Literal,
}

macro_rules! token_keys {
    ($($variant:ident => $name:literal,)*) => {
        /// Every key a palette mode must define, in canonical order.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum TokenKey {
            $($variant,)*
        }

        impl TokenKey {
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// The camelCase key used in palette files.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }
    };
}

token_keys! {
    Bg => "bg",
    Surface => "surface",
    Text => "text",
    TextSubtle => "textSubtle",
    TextMuted => "textMuted",
    Border => "border",
    BorderStrong => "borderStrong",
    Overlay => "overlay",
    Shadow => "shadow",
    ShadowMd => "shadowMd",
    Accent => "accent",
    AccentSubtle => "accentSubtle",
    AccentSoft => "accentSoft",
    AccentStrong => "accentStrong",
    AccentOutline => "accentOutline",
    OnAccent => "onAccent",
    Secondary => "secondary",
    SecondarySubtle => "secondarySubtle",
    SecondarySoft => "secondarySoft",
    SecondaryStrong => "secondaryStrong",
    SecondaryOutline => "secondaryOutline",
    OnSecondary => "onSecondary",
    Success => "success",
    SuccessSubtle => "successSubtle",
    SuccessSoft => "successSoft",
    SuccessStrong => "successStrong",
    SuccessOutline => "successOutline",
    OnSuccess => "onSuccess",
    Warning => "warning",
    WarningSubtle => "warningSubtle",
    WarningSoft => "warningSoft",
    WarningStrong => "warningStrong",
    WarningOutline => "warningOutline",
    OnWarning => "onWarning",
    Error => "error",
    ErrorSubtle => "errorSubtle",
    ErrorSoft => "errorSoft",
    ErrorStrong => "errorStrong",
    ErrorOutline => "errorOutline",
    OnError => "onError",
    Info => "info",
    InfoSubtle => "infoSubtle",
    InfoSoft => "infoSoft",
    InfoStrong => "infoStrong",
    InfoOutline => "infoOutline",
    OnInfo => "onInfo",
}

impl TokenKey {
    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::Bg
            | Self::Surface
            | Self::Text
            | Self::Border
            | Self::Overlay
            | Self::Accent
            | Self::Secondary
            | Self::Success
            | Self::Warning
            | Self::Error
            | Self::Info => Role::Anchor,
            Self::Shadow | Self::ShadowMd => Role::Literal,
            _ => Role::Derived,
        }
    }

    /// Keys with the given role, in canonical order.
    pub fn with_role(role: Role) -> impl Iterator<Item = Self> {
        Self::ALL.iter().copied().filter(move |key| key.role() == role)
    }

    /// Kebab-case projection for CSS custom properties (`textSubtle` →
    /// `text-subtle`).
    #[must_use]
    pub fn css_name(self) -> String {
        to_kebab_case(self.as_str())
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key (or mode) name that is not part of the enumeration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized name `{0}`")]
pub struct ParseKeyError(pub String);

impl FromStr for TokenKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ParseKeyError(s.to_owned()))
    }
}

impl Serialize for TokenKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TokenKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// `camelCase` → `kebab-case`.
#[must_use]
pub fn to_kebab_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for ch in camel.chars() {
        if ch.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// ColorToken
// ---------------------------------------------------------------------------

/// A token whose value is an OKLCH expression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OklchToken {
    pub oklch: String,
    pub name: String,
    pub usage: String,
}

impl OklchToken {
    pub fn new(oklch: impl Into<String>, name: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            oklch: oklch.into(),
            name: name.into(),
            usage: usage.into(),
        }
    }

    /// The parsed color, or `None` when the expression is not valid OKLCH.
    #[must_use]
    pub fn color(&self) -> Option<Oklch> {
        parse_oklch(&self.oklch)
    }
}

/// A token carrying an opaque value, e.g. a CSS shadow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiteralToken {
    pub value: String,
    pub name: String,
    pub usage: String,
}

impl LiteralToken {
    pub fn new(value: impl Into<String>, name: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: name.into(),
            usage: usage.into(),
        }
    }
}

/// A named palette entry: exactly one of an OKLCH color or a literal value.
///
/// Serialized untagged, as `{"oklch": …, "name": …, "usage": …}` or
/// `{"value": …, "name": …, "usage": …}`. An object with both fields (or
/// neither) does not deserialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorToken {
    Oklch(OklchToken),
    Literal(LiteralToken),
}

impl ColorToken {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Oklch(t) => &t.name,
            Self::Literal(t) => &t.name,
        }
    }

    #[must_use]
    pub fn usage(&self) -> &str {
        match self {
            Self::Oklch(t) => &t.usage,
            Self::Literal(t) => &t.usage,
        }
    }

    /// The raw representation: the OKLCH expression or the literal value.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Oklch(t) => &t.oklch,
            Self::Literal(t) => &t.value,
        }
    }

    /// The parsed color. `None` for literals and for unparseable
    /// expressions alike; both mean "not a color, skip it".
    #[must_use]
    pub fn color(&self) -> Option<Oklch> {
        match self {
            Self::Oklch(t) => t.color(),
            Self::Literal(_) => None,
        }
    }
}

impl From<OklchToken> for ColorToken {
    fn from(token: OklchToken) -> Self {
        Self::Oklch(token)
    }
}

impl From<LiteralToken> for ColorToken {
    fn from(token: LiteralToken) -> Self {
        Self::Literal(token)
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_strings_roundtrip() {
        for key in TokenKey::ALL {
            assert_eq!(key.as_str().parse::<TokenKey>(), Ok(*key));
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert_eq!(
            "accentGlow".parse::<TokenKey>(),
            Err(ParseKeyError("accentGlow".to_owned()))
        );
    }

    #[test]
    fn roles_partition_the_keys() {
        let anchors = TokenKey::with_role(Role::Anchor).count();
        let derived = TokenKey::with_role(Role::Derived).count();
        let literals = TokenKey::with_role(Role::Literal).count();
        assert_eq!(anchors, 11);
        assert_eq!(derived, 33);
        assert_eq!(literals, 2);
        assert_eq!(anchors + derived + literals, TokenKey::ALL.len());
    }

    #[test]
    fn every_family_variant_is_derived() {
        for family in Family::ALL {
            assert_eq!(family.anchor().role(), Role::Anchor);
            for variant in Variant::ALL {
                assert_eq!(family.key(variant).role(), Role::Derived, "{family:?} {variant:?}");
            }
        }
    }

    #[test]
    fn family_keys_follow_naming() {
        assert_eq!(Family::Warning.key(Variant::Subtle).as_str(), "warningSubtle");
        assert_eq!(Family::Info.key(Variant::On).as_str(), "onInfo");
    }

    #[test]
    fn kebab_case_projection() {
        assert_eq!(TokenKey::TextSubtle.css_name(), "text-subtle");
        assert_eq!(TokenKey::OnAccent.css_name(), "on-accent");
        assert_eq!(TokenKey::ShadowMd.css_name(), "shadow-md");
        assert_eq!(TokenKey::Bg.css_name(), "bg");
        assert_eq!(to_kebab_case("secondaryOutline"), "secondary-outline");
    }

    #[test]
    fn mode_parsing_and_direction() {
        assert_eq!("dark".parse::<Mode>(), Ok(Mode::Dark));
        assert!("dim".parse::<Mode>().is_err());
        assert!(Mode::Light.toward_background() > 0.0);
        assert!(Mode::Dark.toward_background() < 0.0);
    }

    #[test]
    fn token_json_shapes() {
        let color: ColorToken =
            serde_json::from_str(r#"{"oklch": "oklch(52% 0.06 230)", "name": "Accent", "usage": "Links"}"#)
                .unwrap();
        assert_eq!(color.raw(), "oklch(52% 0.06 230)");
        assert!(color.color().is_some());

        let literal: ColorToken =
            serde_json::from_str(r#"{"value": "0 1px 2px black", "name": "Shadow", "usage": "Cards"}"#)
                .unwrap();
        assert!(matches!(literal, ColorToken::Literal(_)));
        assert!(literal.color().is_none());
    }

    #[test]
    fn token_with_both_representations_is_rejected() {
        let both = r#"{"oklch": "oklch(52% 0.06 230)", "value": "x", "name": "A", "usage": "B"}"#;
        assert!(serde_json::from_str::<ColorToken>(both).is_err());
        let neither = r#"{"name": "A", "usage": "B"}"#;
        assert!(serde_json::from_str::<ColorToken>(neither).is_err());
    }

    #[test]
    fn token_serializes_field_order() {
        let token = ColorToken::from(OklchToken::new("oklch(52% 0.06 230)", "Accent", "Links"));
        assert_eq!(
            token.to_string(),
            r#"{"oklch":"oklch(52% 0.06 230)","name":"Accent","usage":"Links"}"#
        );
    }

    #[test]
    fn unparseable_oklch_token_is_not_a_color() {
        let token = ColorToken::from(OklchToken::new("oklch(fifty)", "Broken", "None"));
        assert!(token.color().is_none());
    }
}
