//! # lumen-tokens: the semantic palette
//!
//! Turns a handful of hand-authored OKLCH anchors into a complete light and
//! dark token set, and checks that the checked-in palette is both honest
//! (nothing edited by hand) and readable (WCAG contrast).
//!
//! # Architecture
//!
//! ```text
//! anchors.rs:   AnchorSet (builtin, or read back from a stored palette)
//!     │
//!     ▼
//! derive.rs:    DerivationEngine: subtle/soft/strong/outline shifts,
//!               on-colors picked by contrast.rs
//!     │
//!     ▼
//! palette.rs:   Palette (light + dark TokenMap), canonical JSON on disk
//!     │
//!     ├──▶ integrity.rs: re-derive and compare, stop at first mismatch
//!     │
//!     └──▶ contrast.rs:  audit every policy.rs rule, report all failures
//! ```
//!
//! Keys are the closed [`TokenKey`] enumeration from `token.rs`; nothing is
//! looked up by free-form string once a palette has loaded. Diagnostics go
//! through an explicit [`Reporter`] owned by the caller.

// Color math reads best written out as in the references.
#![allow(clippy::suboptimal_flops)]
// Hue/lightness/chroma names are inherently similar.
#![allow(clippy::similar_names)]
// `Family as usize` indexes a six-element array.
#![allow(clippy::cast_possible_truncation)]

pub mod anchors;
pub mod config;
pub mod contrast;
pub mod derive;
pub mod error;
pub mod integrity;
pub mod palette;
pub mod policy;
pub mod report;
pub mod token;

pub use anchors::AnchorSet;
pub use config::{Config, ConfigError};
pub use contrast::{AuditFinding, AuditReport, audit, contrast_ratio, gamut_report, relative_luminance};
pub use derive::{DerivationEngine, DerivationRules, VariantRule};
pub use error::PaletteError;
pub use integrity::{IntegrityError, verify};
pub use palette::Palette;
pub use policy::ContrastPolicy;
pub use report::{Reporter, Verbosity};
pub use token::{ColorToken, Family, Mode, Role, TokenKey, TokenMap, Variant};
