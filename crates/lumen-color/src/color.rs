// SPDX-License-Identifier: MIT
//
// lumen color math: OKLCH in, 8-bit sRGB out.
//
// Single-character variable names (r, g, b, l, c, h, a, s, m) are the
// standard mathematical convention in color science. Renaming them would
// make the code harder to compare against reference implementations.
#![allow(clippy::many_single_char_names)]
// Forward pipeline uses plain multiply/add, no fused ops: published hex
// values are compared bit-exactly.
#![allow(clippy::suboptimal_flops)]
//
// Conversion pipeline:
//
//   OKLCH → Oklab → LMS (cubed) → Linear sRGB → sRGB (gamma) → clamp → 0..=255
//
// Every palette token goes through `oklch_to_rgb`. Out-of-gamut colors are
// clipped silently there; `is_clipped` re-runs the same steps without the
// final clamp so QA tooling can flag them.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tolerance used by the clipping detector. The LMS → sRGB matrix rows sum
/// to 1 only up to ~1e-10, so pure white lands a hair above 1.0.
const GAMUT_EPSILON: f64 = 1e-7;

// ─── Oklch ───────────────────────────────────────────────────────────────────

/// A color in OKLCH space with alpha.
///
/// Unlike most color types this one is allowed to hold out-of-range values:
/// chroma above the sRGB gamut, negative lightness, alpha above one. Parsing
/// never validates ranges; clipping happens when the color is resolved to
/// [`Rgba`].
///
/// # Examples
///
/// ```
/// use lumen_color::color::Oklch;
///
/// let accent = Oklch::new(0.52, 0.06, 230.0);
/// assert_eq!(accent.to_rgba().to_hex6(), "#437085");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oklch {
    /// Lightness as a fraction: 0.0 (black) to 1.0 (white).
    pub l: f64,

    /// Chroma, unitless. Practical sRGB colors stay below ~0.37.
    pub c: f64,

    /// Hue angle in degrees.
    pub h: f64,

    /// Opacity: 0.0 (transparent) to 1.0 (opaque).
    pub alpha: f64,
}

impl Oklch {
    /// Opaque color from lightness (fraction), chroma and hue (degrees).
    #[inline]
    #[must_use]
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h, alpha: 1.0 }
    }

    /// Color with an explicit alpha.
    #[inline]
    #[must_use]
    pub const fn with_alpha(l: f64, c: f64, h: f64, alpha: f64) -> Self {
        Self { l, c, h, alpha }
    }

    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 0.0, 0.0);

    /// Whether alpha is at (or above) full opacity.
    #[inline]
    #[must_use]
    pub fn is_opaque(self) -> bool {
        self.alpha >= 1.0
    }

    /// Resolve to 8-bit sRGB, clipping anything outside the gamut.
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        oklch_to_rgb(self.l, self.c, self.h, self.alpha)
    }

    /// Whether resolving this color loses information to gamut clipping.
    #[must_use]
    pub fn is_clipped(self) -> bool {
        is_clipped(self.l, self.c, self.h)
    }

    /// How far the worst gamma-encoded channel falls outside `[0, 1]`.
    /// Zero for in-gamut colors.
    #[must_use]
    pub fn gamut_excess(self) -> f64 {
        gamut_excess(self.l, self.c, self.h)
    }

    /// Reduce chroma until the color fits the sRGB gamut.
    ///
    /// Binary search on chroma keeps lightness and hue fixed. Used to suggest
    /// an in-gamut replacement for a clipped anchor; the pipeline never
    /// applies it on its own.
    #[must_use]
    pub fn to_gamut(self) -> Self {
        if !self.is_clipped() {
            return self;
        }

        let mut lo = 0.0_f64;
        let mut hi = self.c.max(0.0);
        for _ in 0..24 {
            let mid = (lo + hi) * 0.5;
            let candidate = Self { c: mid, ..self };
            if candidate.is_clipped() {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        Self { c: lo, ..self }
    }

    /// Perceptual distance (Euclidean ΔE in Oklab). Values below ~0.02 are
    /// generally imperceptible.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let (a1, b1) = oklch_to_oklab_ab(self.c, self.h);
        let (a2, b2) = oklch_to_oklab_ab(other.c, other.h);
        let dl = self.l - other.l;
        let da = a1 - a2;
        let db = b1 - b2;
        (dl * dl + da * da + db * db).sqrt()
    }

    /// Approximate inverse of [`to_rgba`](Self::to_rgba).
    ///
    /// 8-bit quantization and gamut clipping make the forward path lossy, so
    /// `Oklch::from_rgba(c.to_rgba())` is close to, not equal to, `c`.
    #[must_use]
    pub fn from_rgba(rgba: Rgba) -> Self {
        let (l, c, h) = rgb_to_oklch(rgba.r, rgba.g, rgba.b);
        Self::with_alpha(l, c, h, f64::from(rgba.a) / 255.0)
    }
}

// ─── Rgba ────────────────────────────────────────────────────────────────────

/// A resolved 8-bit sRGB color with alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    #[inline]
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// The color channels without alpha.
    #[inline]
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// `#RRGGBB`, uppercase. Alpha is dropped.
    #[must_use]
    pub fn to_hex6(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `0XAARRGGBB`, uppercase, alpha first. This is the ARGB integer literal
    /// form Flutter's `Color(...)` expects.
    #[must_use]
    pub fn to_hex8(self) -> String {
        format!("0X{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }

    /// Mean of the three color channels on the 0–255 scale.
    #[must_use]
    pub fn channel_average(self) -> f64 {
        (f64::from(self.r) + f64::from(self.g) + f64::from(self.b)) / 3.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

// ─── Forward Conversion ──────────────────────────────────────────────────────

/// Convert OKLCH components to 8-bit sRGB.
///
/// Total over its numeric domain: every input produces a valid tuple.
/// Channels outside the sRGB gamut clamp to `[0, 1]` before scaling; alpha
/// is clamped independently.
#[must_use]
pub fn oklch_to_rgb(l: f64, c: f64, h: f64, alpha: f64) -> Rgba {
    let (r, g, b) = oklch_to_srgb(l, c, h);
    Rgba {
        r: to_u8(r),
        g: to_u8(g),
        b: to_u8(b),
        a: to_u8(alpha),
    }
}

/// Whether `(l, c, h)` falls outside the sRGB gamut, i.e. whether
/// [`oklch_to_rgb`] has to clamp any channel.
#[must_use]
pub fn is_clipped(l: f64, c: f64, h: f64) -> bool {
    gamut_excess(l, c, h) > 0.0
}

/// Distance of the worst gamma-encoded channel outside `[0, 1]`, ignoring
/// excursions below the detector tolerance.
#[must_use]
pub fn gamut_excess(l: f64, c: f64, h: f64) -> f64 {
    let (r, g, b) = oklch_to_srgb(l, c, h);
    [r, g, b]
        .into_iter()
        .map(|v| {
            if v < 0.0 {
                -v
            } else if v > 1.0 {
                v - 1.0
            } else {
                0.0
            }
        })
        .filter(|excess| *excess > GAMUT_EPSILON)
        .fold(0.0, f64::max)
}

/// OKLCH → gamma-encoded sRGB, unclamped.
fn oklch_to_srgb(l: f64, c: f64, h: f64) -> (f64, f64, f64) {
    let (a, b) = oklch_to_oklab_ab(c, h);
    let (lr, lg, lb) = oklab_to_linear_srgb(l, a, b);
    (linear_to_srgb(lr), linear_to_srgb(lg), linear_to_srgb(lb))
}

/// Polar chroma/hue to Cartesian Oklab a, b.
#[inline]
fn oklch_to_oklab_ab(c: f64, h: f64) -> (f64, f64) {
    let h_rad = h * PI / 180.0;
    (c * h_rad.cos(), c * h_rad.sin())
}

// ─── Oklab ↔ Linear sRGB ────────────────────────────────────────────────────
//
// Through the LMS cone-response space, with Björn Ottosson's matrices.
// Reference: https://bottosson.github.io/posts/oklab/

/// Oklab → linear sRGB.
///
/// Negative LMS intermediates clamp to zero before cubing, so very dark or
/// wildly saturated inputs bottom out at black instead of wrapping.
#[inline]
fn oklab_to_linear_srgb(l_ok: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let l_ = (l_ok + 0.396_337_777_4 * a + 0.215_803_757_3 * b).max(0.0);
    let m_ = (l_ok - 0.105_561_345_8 * a - 0.063_854_172_8 * b).max(0.0);
    let s_ = (l_ok - 0.089_484_177_5 * a - 1.291_485_548 * b).max(0.0);

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    let r = 4.076_741_662_1 * l - 3.307_711_591_3 * m + 0.230_969_929_2 * s;
    let g = -1.268_438_004_6 * l + 2.609_757_401_1 * m - 0.341_319_396_5 * s;
    let bl = -0.004_196_086_3 * l - 0.703_418_614_7 * m + 1.707_614_701 * s;

    (r, g, bl)
}

/// Linear sRGB → Oklab.
#[inline]
fn linear_srgb_to_oklab(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let l = 0.412_221_470_8 * r + 0.536_332_536_3 * g + 0.051_445_992_9 * b;
    let m = 0.211_903_498_2 * r + 0.680_699_545_1 * g + 0.107_396_956_6 * b;
    let s = 0.088_302_461_9 * r + 0.281_718_837_6 * g + 0.629_978_700_5 * b;

    let l_ = l.cbrt();
    let m_ = m.cbrt();
    let s_ = s.cbrt();

    (
        0.210_454_255_3 * l_ + 0.793_617_785 * m_ - 0.004_072_046_8 * s_,
        1.977_998_495_1 * l_ - 2.428_592_205 * m_ + 0.450_593_709_9 * s_,
        0.025_904_037_1 * l_ + 0.782_771_766_2 * m_ - 0.808_675_766 * s_,
    )
}

/// 8-bit sRGB → OKLCH `(l, c, h)`.
#[must_use]
pub fn rgb_to_oklch(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let lr = srgb_to_linear(f64::from(r) / 255.0);
    let lg = srgb_to_linear(f64::from(g) / 255.0);
    let lb = srgb_to_linear(f64::from(b) / 255.0);
    let (l, a, b_ok) = linear_srgb_to_oklab(lr, lg, lb);

    let c = a.hypot(b_ok);
    let h = if c < 1e-8 {
        0.0 // achromatic, hue is undefined
    } else {
        let h = b_ok.atan2(a).to_degrees();
        if h < 0.0 { h + 360.0 } else { h }
    };
    (l, c, h)
}

// ─── Linear sRGB ↔ sRGB (Gamma) ─────────────────────────────────────────────

/// Apply the sRGB transfer curve to a linear component.
#[inline]
#[must_use]
pub fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Remove the sRGB transfer curve.
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Clamp to `[0, 1]`, scale to 0–255 and round half up.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f64) -> u8 {
    // NaN survives the clamp and casts to 0.
    (v.clamp(0.0, 1.0) * 255.0 + 0.5).floor() as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
