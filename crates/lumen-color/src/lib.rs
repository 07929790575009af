// SPDX-License-Identifier: MIT
//
// lumen-color: the numeric core of the lumen token pipeline.
//
// Everything here is a pure function over numbers and strings. No I/O, no
// shared state, no allocation beyond the strings the formatters return.
//
//   parse   → `oklch(...)` text ↔ `Oklch`
//   color   → `Oklch` → 8-bit `Rgba` (with gamut clipping), the clipping
//             detector, the inverse conversion, hex formatters

pub mod color;
pub mod parse;

pub use color::{Oklch, Rgba, is_clipped, oklch_to_rgb, rgb_to_oklch};
pub use parse::parse_oklch;
