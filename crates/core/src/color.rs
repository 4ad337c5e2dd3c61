//! Deterministic item color assignment.
//!
//! The 3D render and the report table both call [`item_color`] so a
//! given item never shows two different colors. The mapping is pure:
//! a base hue from a fixed 10-entry palette indexed by the item's
//! first-seen position, nudged by a stable hash of the id's string form.

use crate::tree::ItemKey;
use serde::Serialize;
use std::fmt;

/// Base hues (degrees), chosen for mutual visual distance.
const BASE_HUES: [f64; 10] = [
    0.0, 30.0, 60.0, 120.0, 180.0, 210.0, 240.0, 270.0, 300.0, 330.0,
];

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Hex form, e.g. `#ff6b6b`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Returns the color for an item, given the index at which it was first
/// seen in the placement order. Identical arguments always yield the
/// identical color, within and across sessions.
pub fn item_color(item_id: &ItemKey, first_seen_index: usize) -> Rgb {
    let base_hue = BASE_HUES[first_seen_index % BASE_HUES.len()];
    let hash = mix_hash(item_id.as_str());

    let hue_offset = (hash % 20) as f64 - 10.0;
    let saturation = 75.0 + (hash % 20) as f64; // 75..=94 %
    let lightness = 50.0 + (hash % 15) as f64; // 50..=64 %

    let hue = (base_hue + hue_offset).rem_euclid(360.0);
    hsl_to_rgb(hue / 360.0, saturation / 100.0, lightness / 100.0)
}

/// Rotate-and-subtract string mix (`h = (h << 5) − h + c`). Stable and
/// cheap; not cryptographic.
fn mix_hash(s: &str) -> u32 {
    let mut h: i32 = 0;
    for c in s.chars() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32);
    }
    h.unsigned_abs()
}

/// Standard HSL to RGB conversion; all inputs in `[0, 1]`.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    if s == 0.0 {
        let v = channel(l);
        return Rgb { r: v, g: v, b: v };
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb {
        r: channel(hue_to_channel(p, q, h + 1.0 / 3.0)),
        g: channel(hue_to_channel(p, q, h)),
        b: channel(hue_to_channel(p, q, h - 1.0 / 3.0)),
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
