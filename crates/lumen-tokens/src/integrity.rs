//! Semantic integrity: the stored palette must be exactly what the engine
//! derives from the stored anchors.
//!
//! This is a gate. The first divergent token ends the check; nothing after
//! it is compared. Literal tokens are never produced by the engine and are
//! never compared.

use tracing::info;

use crate::anchors::AnchorSet;
use crate::derive::DerivationEngine;
use crate::error::PaletteError;
use crate::palette::Palette;
use crate::report::Reporter;
use crate::token::{ColorToken, Mode, TokenKey};

#[derive(Debug, thiserror::Error)]
pub enum IntegrityError {
    #[error(
        "{mode}.{key} was edited by hand or is stale: expected {expected}, found {}",
        found_text(.found.as_deref())
    )]
    Mismatch {
        mode: Mode,
        key: TokenKey,
        expected: Box<ColorToken>,
        found: Option<Box<ColorToken>>,
    },

    #[error(transparent)]
    Anchors(#[from] PaletteError),
}

fn found_text(found: Option<&ColorToken>) -> String {
    found.map_or_else(|| "nothing".to_owned(), ToString::to_string)
}

/// Re-derive `stored` from its own anchors and compare token by token.
///
/// Returns the number of tokens compared.
///
/// # Errors
///
/// - [`IntegrityError::Anchors`] when the stored anchors cannot seed
///   derivation.
/// - [`IntegrityError::Mismatch`] for the first token, in mode then key
///   order, that differs from its derivation.
pub fn verify(stored: &Palette, engine: &DerivationEngine, reporter: &mut Reporter) -> Result<usize, IntegrityError> {
    let anchors = AnchorSet::from_palette(stored)?;
    let expected = engine.generate(&anchors);

    let mut checked = 0;
    for mode in Mode::ALL {
        for key in DerivationEngine::checked_keys() {
            let Some(want) = expected.get(mode, key) else { continue };
            let found = stored.get(mode, key);
            if found != Some(want) {
                reporter.failure(format!("FAIL {mode}.{key}"));
                reporter.failure(format!("  expected {want}"));
                reporter.failure(format!("  found    {}", found_text(found)));
                return Err(IntegrityError::Mismatch {
                    mode,
                    key,
                    expected: Box::new(want.clone()),
                    found: found.cloned().map(Box::new),
                });
            }
            reporter.detail(format!("ok   {mode}.{key} {}", want.raw()));
            checked += 1;
        }
    }

    info!(checked, "integrity check passed");
    Ok(checked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Verbosity;
    use crate::token::{LiteralToken, OklchToken};
    use pretty_assertions::assert_eq;

    const STORED: &str = include_str!("../../../palette/palette.json");

    fn stored() -> Palette {
        Palette::from_json(STORED).unwrap()
    }

    #[test]
    fn stored_palette_verifies() {
        let mut reporter = Reporter::new(Verbosity::Normal);
        let checked = verify(&stored(), &DerivationEngine::default(), &mut reporter).unwrap();
        assert_eq!(checked, 2 * 44);
        assert!(!reporter.has_failures());
    }

    #[test]
    fn tampered_token_is_named() {
        let tampered = STORED.replacen("oklch(94% 0.018 230)", "oklch(95% 0.018 230)", 1);
        assert_ne!(tampered, STORED);
        let palette = Palette::from_json(&tampered).unwrap();

        let mut reporter = Reporter::new(Verbosity::Normal);
        let err = verify(&palette, &DerivationEngine::default(), &mut reporter).unwrap_err();
        let IntegrityError::Mismatch {
            mode,
            key,
            expected,
            found,
        } = err
        else {
            panic!("expected a mismatch");
        };
        assert_eq!((mode, key), (Mode::Light, TokenKey::AccentSubtle));
        assert_eq!(expected.raw(), "oklch(94% 0.018 230)");
        assert_eq!(found.map(|t| t.raw().to_owned()), Some("oklch(95% 0.018 230)".to_owned()));
        assert_eq!(reporter.failure_count(), 3);
    }

    #[test]
    fn first_mismatch_halts() {
        let mut palette = stored();
        let bogus = OklchToken::new("oklch(50% 0 0)", "Bogus", "Bogus");
        palette.light.insert(TokenKey::TextMuted, bogus.clone().into());
        palette.dark.insert(TokenKey::OnInfo, bogus.into());

        let mut reporter = Reporter::default();
        let err = verify(&palette, &DerivationEngine::default(), &mut reporter).unwrap_err();
        assert!(matches!(
            err,
            IntegrityError::Mismatch { mode: Mode::Light, key: TokenKey::TextMuted, .. }
        ));
        assert!(reporter.lines().all(|line| !line.contains("onInfo")));
    }

    #[test]
    fn edited_metadata_is_a_mismatch() {
        let mut palette = stored();
        let mut token = palette.dark[&TokenKey::WarningSoft].clone();
        if let ColorToken::Oklch(inner) = &mut token {
            inner.usage = "Something else".to_owned();
        }
        palette.dark.insert(TokenKey::WarningSoft, token);
        let err = verify(&palette, &DerivationEngine::default(), &mut Reporter::default()).unwrap_err();
        assert!(matches!(
            err,
            IntegrityError::Mismatch { mode: Mode::Dark, key: TokenKey::WarningSoft, .. }
        ));
    }

    #[test]
    fn literals_are_exempt() {
        let mut palette = stored();
        palette.light.insert(
            TokenKey::Shadow,
            LiteralToken::new("none", "Shadow", "Resting elevation").into(),
        );
        assert!(verify(&palette, &DerivationEngine::default(), &mut Reporter::default()).is_ok());
    }

    #[test]
    fn changed_anchor_flows_into_its_variants() {
        let mut palette = stored();
        palette.light.insert(
            TokenKey::Accent,
            OklchToken::new("oklch(50% 0.06 230)", "Accent", "Primary actions and links").into(),
        );
        let err = verify(&palette, &DerivationEngine::default(), &mut Reporter::default()).unwrap_err();
        assert!(matches!(
            err,
            IntegrityError::Mismatch { mode: Mode::Light, key: TokenKey::AccentSubtle, .. }
        ));
    }

    #[test]
    fn broken_anchor_is_reported_as_such() {
        let mut palette = stored();
        palette
            .dark
            .insert(TokenKey::Bg, LiteralToken::new("black", "Background", "Page background").into());
        let err = verify(&palette, &DerivationEngine::default(), &mut Reporter::default()).unwrap_err();
        assert!(matches!(err, IntegrityError::Anchors(PaletteError::InvalidAnchor { .. })));
    }

    #[test]
    fn mismatch_message_shows_both_values() {
        let err = IntegrityError::Mismatch {
            mode: Mode::Light,
            key: TokenKey::AccentSubtle,
            expected: Box::new(OklchToken::new("oklch(94% 0.018 230)", "A", "B").into()),
            found: None,
        };
        assert_eq!(
            err.to_string(),
            r#"light.accentSubtle was edited by hand or is stale: expected {"oklch":"oklch(94% 0.018 230)","name":"A","usage":"B"}, found nothing"#
        );
    }
}
