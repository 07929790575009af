//! WCAG contrast: the math, on-color selection, and the palette audit.
//!
//! Luminance is computed on the resolved 8-bit sRGB of each token, with the
//! WCAG 2.x linearization threshold of 0.03928. Alpha is ignored: a
//! translucent token is measured as if painted opaque.
//!
//! The audit is a report, not a gate. It walks every rule of the policy in
//! both modes, records every failure, and leaves the exit decision to the
//! caller.

use std::fmt;

use lumen_color::{Oklch, Rgba};
use tracing::{info, warn};

use crate::palette::Palette;
use crate::policy::ContrastPolicy;
use crate::report::Reporter;
use crate::token::{Mode, TokenKey};

/// Relative luminance per WCAG 2.1, in [0, 1].
#[must_use]
pub fn relative_luminance(color: Rgba) -> f64 {
    let (r, g, b) = color.rgb();
    0.2126 * linear_channel(r) + 0.7152 * linear_channel(g) + 0.0722 * linear_channel(b)
}

fn linear_channel(value: u8) -> f64 {
    let c = f64::from(value) / 255.0;
    if c <= 0.03928 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

/// WCAG contrast ratio, in [1, 21]. Argument order does not matter.
#[must_use]
pub fn contrast_ratio(a: Rgba, b: Rgba) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Whichever candidate contrasts more with `background`. `dark` wins ties.
#[must_use]
pub fn pick_on_color(background: Rgba, light: Oklch, dark: Oklch) -> Oklch {
    let light_ratio = contrast_ratio(light.to_rgba(), background);
    let dark_ratio = contrast_ratio(dark.to_rgba(), background);
    if light_ratio > dark_ratio { light } else { dark }
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// One violated rule.
#[derive(Clone, Debug, PartialEq)]
pub enum AuditFinding {
    Contrast {
        mode: Mode,
        foreground: TokenKey,
        background: TokenKey,
        ratio: f64,
        min_ratio: f64,
    },
    Margin {
        mode: Mode,
        lighter: TokenKey,
        darker: TokenKey,
        gap: f64,
        min_gap: f64,
    },
    /// A rule names a token that is absent or not a color.
    Unresolvable { mode: Mode, key: TokenKey },
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contrast {
                mode,
                foreground,
                background,
                ratio,
                min_ratio,
            } => write!(f, "{mode}: {foreground} on {background} is {ratio:.2}:1, needs {min_ratio}:1"),
            Self::Margin {
                mode,
                lighter,
                darker,
                gap,
                min_gap,
            } => write!(
                f,
                "{mode}: {lighter} is {gap:.1} channel levels above {darker}, needs more than {min_gap}"
            ),
            Self::Unresolvable { mode, key } => write!(f, "{mode}: {key} does not resolve to a color"),
        }
    }
}

/// Outcome of [`audit`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuditReport {
    /// Rules evaluated, counting each mode separately.
    pub checked: usize,
    pub failures: Vec<AuditFinding>,
}

impl AuditReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Evaluate every rule of `policy` against both modes of `palette`.
///
/// Never stops early: the report lists every failure.
#[must_use]
pub fn audit(palette: &Palette, policy: &ContrastPolicy, reporter: &mut Reporter) -> AuditReport {
    let mut report = AuditReport::default();

    for mode in Mode::ALL {
        let resolve = |report: &mut AuditReport, reporter: &mut Reporter, key: TokenKey| {
            let rgba = palette.color(mode, key).map(Oklch::to_rgba);
            if rgba.is_none() {
                let finding = AuditFinding::Unresolvable { mode, key };
                reporter.failure(format!("FAIL {finding}"));
                report.failures.push(finding);
            }
            rgba
        };

        for pair in policy.pairs.iter().filter(|pair| pair.modes.contains(&mode)) {
            report.checked += 1;
            let fg = resolve(&mut report, reporter, pair.foreground);
            let bg = resolve(&mut report, reporter, pair.background);
            let (Some(fg), Some(bg)) = (fg, bg) else { continue };

            let ratio = contrast_ratio(fg, bg);
            if ratio >= pair.min_ratio {
                reporter.detail(format!(
                    "ok   {mode}: {} on {} {ratio:.2}:1 (min {})",
                    pair.foreground, pair.background, pair.min_ratio
                ));
            } else {
                let finding = AuditFinding::Contrast {
                    mode,
                    foreground: pair.foreground,
                    background: pair.background,
                    ratio,
                    min_ratio: pair.min_ratio,
                };
                reporter.failure(format!("FAIL {finding}"));
                report.failures.push(finding);
            }
        }

        for margin in policy.margins.iter().filter(|margin| margin.modes.contains(&mode)) {
            report.checked += 1;
            let lighter = resolve(&mut report, reporter, margin.lighter);
            let darker = resolve(&mut report, reporter, margin.darker);
            let (Some(lighter), Some(darker)) = (lighter, darker) else { continue };

            let gap = lighter.channel_average() - darker.channel_average();
            if gap > margin.min_gap {
                reporter.detail(format!(
                    "ok   {mode}: {} above {} by {gap:.1} (min {})",
                    margin.lighter, margin.darker, margin.min_gap
                ));
            } else {
                let finding = AuditFinding::Margin {
                    mode,
                    lighter: margin.lighter,
                    darker: margin.darker,
                    gap,
                    min_gap: margin.min_gap,
                };
                reporter.failure(format!("FAIL {finding}"));
                report.failures.push(finding);
            }
        }
    }

    info!(checked = report.checked, failures = report.failures.len(), "contrast audit finished");
    report
}

// ---------------------------------------------------------------------------
// Gamut
// ---------------------------------------------------------------------------

/// A color token whose exact value lies outside sRGB.
#[derive(Clone, Debug, PartialEq)]
pub struct ClippedToken {
    pub mode: Mode,
    pub key: TokenKey,
    pub color: Oklch,
    /// Largest distance of a gamma-encoded channel outside [0, 1].
    pub excess: f64,
    /// Most saturated in-gamut color with the same lightness and hue.
    pub suggestion: Oklch,
}

/// Every clipped color token of `palette`. Clipping is legal; this is for
/// review only.
#[must_use]
pub fn gamut_report(palette: &Palette) -> Vec<ClippedToken> {
    let mut clipped = Vec::new();
    for mode in Mode::ALL {
        for (key, token) in palette.mode(mode) {
            let Some(color) = token.color() else { continue };
            if !color.is_clipped() {
                continue;
            }
            let suggestion = color.to_gamut();
            warn!(%mode, %key, %color, %suggestion, "color clips to sRGB");
            clipped.push(ClippedToken {
                mode,
                key: *key,
                color,
                excess: color.gamut_excess(),
                suggestion,
            });
        }
    }
    clipped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{ChannelMargin, ContrastRequirement};
    use crate::report::Verbosity;
    use crate::token::OklchToken;
    use pretty_assertions::assert_eq;

    const STORED: &str = include_str!("../../../palette/palette.json");

    fn stored() -> Palette {
        Palette::from_json(STORED).unwrap()
    }

    fn rgba(palette: &Palette, mode: Mode, key: TokenKey) -> Rgba {
        palette.color(mode, key).unwrap().to_rgba()
    }

    #[test]
    fn luminance_extremes() {
        assert!(relative_luminance(Rgba::opaque(0, 0, 0)).abs() < 1e-12);
        assert!((relative_luminance(Rgba::opaque(255, 255, 255)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ratio_extremes_and_symmetry() {
        let black = Rgba::opaque(0, 0, 0);
        let white = Rgba::opaque(255, 255, 255);
        assert!((contrast_ratio(black, white) - 21.0).abs() < 1e-9);
        assert!((contrast_ratio(white, white) - 1.0).abs() < 1e-12);
        let gray = Rgba::opaque(119, 119, 119);
        assert!((contrast_ratio(gray, white) - contrast_ratio(white, gray)).abs() < 1e-12);
    }

    #[test]
    fn known_ratio() {
        // #777777 on white is the classic just-under-AA gray.
        let ratio = contrast_ratio(Rgba::opaque(119, 119, 119), Rgba::opaque(255, 255, 255));
        assert!((ratio - 4.48).abs() < 0.01, "{ratio}");
    }

    #[test]
    fn on_color_prefers_dark_on_tie() {
        // Same channels, so equal ratios; alpha tells the two apart.
        let light = Oklch::with_alpha(0.5, 0.0, 0.0, 1.0);
        let dark = Oklch::with_alpha(0.5, 0.0, 0.0, 0.5);
        assert_eq!(pick_on_color(Rgba::opaque(255, 255, 255), light, dark), dark);
        assert_eq!(pick_on_color(Rgba::opaque(0, 0, 0), light, dark), dark);
    }

    #[test]
    fn on_color_picks_higher_contrast() {
        let light = Oklch::new(0.98, 0.005, 250.0);
        let dark = Oklch::new(0.18, 0.015, 250.0);
        assert_eq!(pick_on_color(Rgba::opaque(20, 20, 20), light, dark), light);
        assert_eq!(pick_on_color(Rgba::opaque(240, 240, 240), light, dark), dark);
    }

    #[test]
    fn light_text_on_bg_is_readable() {
        let palette = stored();
        let ratio = contrast_ratio(
            rgba(&palette, Mode::Light, TokenKey::Text),
            rgba(&palette, Mode::Light, TokenKey::Bg),
        );
        assert!(ratio >= 4.5, "{ratio}");
    }

    #[test]
    fn dark_text_clears_background_by_channel_margin() {
        let palette = stored();
        let bg = rgba(&palette, Mode::Dark, TokenKey::Bg);
        let text = rgba(&palette, Mode::Dark, TokenKey::Text);
        assert!(relative_luminance(bg) < relative_luminance(text));
        assert!(text.channel_average() - bg.channel_average() > 100.0);
    }

    #[test]
    fn light_border_sits_between_relaxed_and_strict_minimums() {
        let palette = stored();
        let ratio = contrast_ratio(
            rgba(&palette, Mode::Light, TokenKey::Border),
            rgba(&palette, Mode::Light, TokenKey::Bg),
        );
        assert!((ratio - 1.36).abs() < 0.01, "{ratio}");
        let border = ContrastPolicy::default()
            .pairs
            .into_iter()
            .find(|pair| pair.foreground == TokenKey::Border && pair.background == TokenKey::Bg)
            .unwrap();
        assert!(ratio >= border.min_ratio && ratio < 1.5);
    }

    #[test]
    fn stored_palette_passes_default_policy() {
        let mut reporter = Reporter::new(Verbosity::Normal);
        let report = audit(&stored(), &ContrastPolicy::default(), &mut reporter);
        assert_eq!(report.failures, Vec::new());
        assert_eq!(report.checked, 2 * 13 + 2);
        assert!(report.passed());
        assert!(!reporter.has_failures());
    }

    #[test]
    fn audit_aggregates_every_failure() {
        let mut palette = stored();
        let gray = OklchToken::new("oklch(70% 0 0)", "Gray", "Test");
        palette.light.insert(TokenKey::Text, gray.clone().into());
        palette.dark.insert(TokenKey::OnInfo, gray.into());

        let mut reporter = Reporter::new(Verbosity::Normal);
        let report = audit(&palette, &ContrastPolicy::default(), &mut reporter);

        let failing: Vec<_> = report
            .failures
            .iter()
            .map(|finding| match finding {
                AuditFinding::Contrast {
                    mode,
                    foreground,
                    background,
                    ..
                } => (*mode, *foreground, *background),
                AuditFinding::Margin {
                    mode, lighter, darker, ..
                } => (*mode, *lighter, *darker),
                AuditFinding::Unresolvable { mode, key } => (*mode, *key, *key),
            })
            .collect();
        assert_eq!(
            failing,
            vec![
                (Mode::Light, TokenKey::Text, TokenKey::Bg),
                (Mode::Light, TokenKey::Text, TokenKey::Surface),
                (Mode::Light, TokenKey::Bg, TokenKey::Text),
                (Mode::Dark, TokenKey::OnInfo, TokenKey::Info),
            ]
        );
        assert_eq!(reporter.failure_count(), 4);
    }

    #[test]
    fn mode_restricted_rules_skip_other_mode() {
        let policy = ContrastPolicy {
            pairs: vec![ContrastRequirement {
                modes: vec![Mode::Dark],
                ..ContrastRequirement::new(TokenKey::Text, TokenKey::Bg, 4.5)
            }],
            margins: vec![ChannelMargin::new(TokenKey::Text, TokenKey::Bg, 100.0, Mode::Dark)],
        };
        let report = audit(&stored(), &policy, &mut Reporter::default());
        assert_eq!(report.checked, 2);
        assert!(report.passed());
    }

    #[test]
    fn literal_in_a_rule_is_unresolvable() {
        let policy = ContrastPolicy {
            pairs: vec![ContrastRequirement::new(TokenKey::Shadow, TokenKey::Bg, 1.0)],
            margins: Vec::new(),
        };
        let report = audit(&stored(), &policy, &mut Reporter::default());
        assert_eq!(
            report.failures,
            vec![
                AuditFinding::Unresolvable {
                    mode: Mode::Light,
                    key: TokenKey::Shadow
                },
                AuditFinding::Unresolvable {
                    mode: Mode::Dark,
                    key: TokenKey::Shadow
                },
            ]
        );
    }

    #[test]
    fn finding_messages() {
        let finding = AuditFinding::Contrast {
            mode: Mode::Light,
            foreground: TokenKey::OnInfo,
            background: TokenKey::Info,
            ratio: 3.456,
            min_ratio: 4.5,
        };
        assert_eq!(finding.to_string(), "light: onInfo on info is 3.46:1, needs 4.5:1");
    }

    #[test]
    fn gamut_report_lists_clipped_tokens_with_in_gamut_suggestions() {
        let clipped = gamut_report(&stored());
        assert!(clipped.iter().any(|t| t.mode == Mode::Light && t.key == TokenKey::SuccessStrong));
        for token in &clipped {
            assert!(token.excess > 0.0);
            assert!(!token.suggestion.is_clipped(), "{token:?}");
            assert!(token.suggestion.c < token.color.c);
            assert_ne!(token.key.role(), crate::token::Role::Literal);
        }
    }
}
