//! The palette store: both modes of a complete token set, as checked in.
//!
//! Loading validates the whole file against the key enumeration before
//! anything downstream sees it. Missing and unknown keys are collected over
//! both modes so one run names every problem. Writing is canonical (pretty
//! JSON in key order with a trailing newline), so regenerating from
//! unchanged anchors reproduces the stored file byte for byte.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lumen_color::{Oklch, Rgba};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{KeyReport, PaletteError};
use crate::token::{ColorToken, Mode, TokenKey, TokenMap};

/// Light and dark token maps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub light: TokenMap,
    pub dark: TokenMap,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPalette {
    light: BTreeMap<String, serde_json::Value>,
    dark: BTreeMap<String, serde_json::Value>,
}

impl Palette {
    /// Parse and validate palette JSON.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::Json`] for syntax errors or a top level other than
    ///   exactly `light` and `dark`.
    /// - [`PaletteError::MissingKeys`] / [`PaletteError::UnknownKeys`] with
    ///   every offending key of both modes.
    /// - [`PaletteError::InvalidToken`] for an entry that is not exactly one
    ///   of the two token shapes.
    pub fn from_json(text: &str) -> Result<Self, PaletteError> {
        let raw: RawPalette = serde_json::from_str(text)?;

        let mut missing = Vec::new();
        let mut unknown = Vec::new();
        let mut typed = Vec::with_capacity(2);
        for (mode, entries) in [(Mode::Light, raw.light), (Mode::Dark, raw.dark)] {
            let absent: Vec<String> = TokenKey::ALL
                .iter()
                .filter(|key| !entries.contains_key(key.as_str()))
                .map(|key| key.as_str().to_owned())
                .collect();
            if !absent.is_empty() {
                missing.push(KeyReport { mode, keys: absent });
            }

            let mut known = Vec::with_capacity(entries.len());
            let mut strays = Vec::new();
            for (name, value) in entries {
                match name.parse::<TokenKey>() {
                    Ok(key) => known.push((key, value)),
                    Err(_) => strays.push(name),
                }
            }
            if !strays.is_empty() {
                unknown.push(KeyReport { mode, keys: strays });
            }
            typed.push((mode, known));
        }
        if !missing.is_empty() {
            return Err(PaletteError::MissingKeys(missing));
        }
        if !unknown.is_empty() {
            return Err(PaletteError::UnknownKeys(unknown));
        }

        let mut palette = Self::default();
        for (mode, entries) in typed {
            let tokens = match mode {
                Mode::Light => &mut palette.light,
                Mode::Dark => &mut palette.dark,
            };
            for (key, value) in entries {
                let token = serde_json::from_value(value).map_err(|err| PaletteError::InvalidToken {
                    mode,
                    key,
                    reason: format!("not a valid token ({err})"),
                })?;
                tokens.insert(key, token);
            }
        }
        Ok(palette)
    }

    /// Canonical JSON: two-space indent, enumeration order, trailing newline.
    ///
    /// # Errors
    ///
    /// Only if serialization itself fails.
    pub fn to_json(&self) -> Result<String, PaletteError> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }

    /// Read and validate a palette file.
    ///
    /// # Errors
    ///
    /// [`PaletteError::Io`] naming `path`, or anything [`from_json`](Self::from_json) returns.
    pub fn load(path: &Path) -> Result<Self, PaletteError> {
        let text = fs::read_to_string(path).map_err(|source| PaletteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let palette = Self::from_json(&text)?;
        debug!(path = %path.display(), "palette loaded");
        Ok(palette)
    }

    /// Write the canonical JSON to `path`.
    ///
    /// # Errors
    ///
    /// [`PaletteError::Io`] naming `path`.
    pub fn save(&self, path: &Path) -> Result<(), PaletteError> {
        let text = self.to_json()?;
        fs::write(path, text).map_err(|source| PaletteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "palette written");
        Ok(())
    }

    #[must_use]
    pub const fn mode(&self, mode: Mode) -> &TokenMap {
        match mode {
            Mode::Light => &self.light,
            Mode::Dark => &self.dark,
        }
    }

    #[must_use]
    pub fn get(&self, mode: Mode, key: TokenKey) -> Option<&ColorToken> {
        self.mode(mode).get(&key)
    }

    /// The parsed color of a token; `None` for literals, unparseable
    /// expressions and absent keys.
    #[must_use]
    pub fn color(&self, mode: Mode, key: TokenKey) -> Option<Oklch> {
        self.get(mode, key).and_then(ColorToken::color)
    }

    /// Whether both modes define the same keys.
    #[must_use]
    pub fn keys_symmetric(&self) -> bool {
        self.light.keys().eq(self.dark.keys())
    }

    /// Flatten one mode into the shape downstream generators consume.
    ///
    /// Color tokens whose expression does not parse are skipped with a
    /// warning.
    #[must_use]
    pub fn resolve(&self, mode: Mode) -> Vec<ResolvedToken> {
        self.mode(mode)
            .iter()
            .filter_map(|(key, token)| {
                let value = match token {
                    ColorToken::Literal(literal) => ResolvedValue::Literal {
                        value: literal.value.clone(),
                    },
                    ColorToken::Oklch(oklch) => {
                        let Some(color) = oklch.color() else {
                            warn!(%mode, %key, expression = %oklch.oklch, "skipping unparseable color");
                            return None;
                        };
                        ResolvedValue::color(&oklch.oklch, color)
                    }
                };
                Some(ResolvedToken {
                    key: *key,
                    css_name: key.css_name(),
                    name: token.name().to_owned(),
                    usage: token.usage().to_owned(),
                    value,
                })
            })
            .collect()
    }

    /// Both modes, resolved.
    #[must_use]
    pub fn resolve_all(&self) -> ResolvedPalette {
        ResolvedPalette {
            light: self.resolve(Mode::Light),
            dark: self.resolve(Mode::Dark),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved projection
// ---------------------------------------------------------------------------

/// A token as downstream generators see it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedToken {
    pub key: TokenKey,
    /// Kebab-case name for CSS custom properties.
    pub css_name: String,
    pub name: String,
    pub usage: String,
    #[serde(flatten)]
    pub value: ResolvedValue,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolvedValue {
    Color {
        oklch: String,
        components: Components,
        rgb: Rgba,
        hex: String,
        argb: String,
        clipped: bool,
    },
    Literal {
        value: String,
    },
}

impl ResolvedValue {
    fn color(expression: &str, color: Oklch) -> Self {
        let rgb = color.to_rgba();
        Self::Color {
            oklch: expression.to_owned(),
            components: Components {
                l: color.l,
                c: color.c,
                h: color.h,
                opacity: color.alpha,
            },
            rgb,
            hex: rgb.to_hex6(),
            argb: rgb.to_hex8(),
            clipped: color.is_clipped(),
        }
    }
}

/// The OKLCH components a color token was written with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Components {
    pub l: f64,
    pub c: f64,
    pub h: f64,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedPalette {
    pub light: Vec<ResolvedToken>,
    pub dark: Vec<ResolvedToken>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
