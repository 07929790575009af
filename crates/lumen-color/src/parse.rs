// SPDX-License-Identifier: MIT
//
// OKLCH text form: `oklch(L[%] C H[ / A[%]])`.
//
// Parsing is deliberately forgiving about separators (spaces or commas) and
// strict about shape: anything that is not an OKLCH call yields `None`, so
// callers can walk a palette that mixes colors with literal values such as
// shadow strings and simply skip the latter.
//
// Formatting is canonical: lightness as a percentage to 0.1, chroma to
// 0.001, hue to 0.1°, alpha to 0.01 (omitted when opaque), trailing zeros
// trimmed. Re-parsing a formatted color and formatting it again yields the
// same string, which is what lets derived tokens be compared as text.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::color::Oklch;

const NUMBER: &str = r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)";

static OKLCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?i)^\s*oklch\(\s*(?P<l>{NUMBER})(?P<lp>%?)[\s,]+(?P<c>{NUMBER})[\s,]+(?P<h>{NUMBER})(?:deg)?\s*(?:/\s*(?P<a>{NUMBER})(?P<ap>%?)\s*)?\)\s*$"
    );
    Regex::new(&pattern).expect("OKLCH grammar is a valid regex")
});

/// Parse an OKLCH color expression.
///
/// Lightness may be a percentage (`52%`) or a fraction (`0.52`); alpha after
/// `/` may likewise be a percentage or a fraction. No range checks happen
/// here: out-of-gamut chroma or lightness above 100 % parse fine and are
/// clipped on conversion.
///
/// Returns `None` for anything that does not match the grammar.
///
/// ```
/// use lumen_color::parse::parse_oklch;
///
/// let c = parse_oklch("oklch(25% 0.01 250 / 0.15)").unwrap();
/// assert!((c.l - 0.25).abs() < 1e-12);
/// assert!((c.alpha - 0.15).abs() < 1e-12);
/// assert!(parse_oklch("0 1px 2px rgba(0,0,0,0.1)").is_none());
/// ```
#[must_use]
pub fn parse_oklch(text: &str) -> Option<Oklch> {
    let caps = OKLCH_RE.captures(text)?;
    let number = |name: &str| caps.name(name)?.as_str().parse::<f64>().ok();
    let percent = |name: &str| caps.name(name).is_some_and(|m| !m.as_str().is_empty());

    let mut l = number("l")?;
    if percent("lp") {
        l /= 100.0;
    }
    let c = number("c")?;
    let h = number("h")?;

    let alpha = match number("a") {
        Some(a) if percent("ap") => a / 100.0,
        Some(a) => a,
        None => 1.0,
    };

    Some(Oklch::with_alpha(l, c, h, alpha))
}

impl fmt::Display for Oklch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "oklch({}% {} {}",
            trimmed(self.l * 100.0, 1),
            trimmed(self.c, 3),
            trimmed(self.h, 1)
        )?;
        if self.alpha < 1.0 {
            write!(f, " / {}", trimmed(self.alpha, 2))?;
        }
        f.write_str(")")
    }
}

/// Fixed-precision decimal with trailing zeros (and a dangling point) removed.
fn trimmed(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let digits = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    if digits == "-0" { "0".to_owned() } else { digits.to_owned() }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
