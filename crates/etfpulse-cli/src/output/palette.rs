//! Cell colors for terminal tables.
//!
//! Gains blend from a pale to a deep green, losses from a pale to a deep red.
//! Unranked tables use a red-yellow-green scale and correlations a red-white-blue
//! diverging scale.

use etfpulse_core::{CellStyle, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

const GAIN_LIGHT: Rgb = Rgb(0xE8, 0xF5, 0xE9);
const GAIN_DARK: Rgb = Rgb(0x1B, 0x5E, 0x20);
const LOSS_LIGHT: Rgb = Rgb(0xFF, 0xEB, 0xEE);
const LOSS_DARK: Rgb = Rgb(0xB7, 0x1C, 0x1C);
const NEUTRAL: Rgb = Rgb(0xF0, 0xF2, 0xF6);

const BLACK: Rgb = Rgb(0x11, 0x11, 0x11);
const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);

const RD_YL_GN: [Rgb; 11] = [
    Rgb(0xA5, 0x00, 0x26),
    Rgb(0xD7, 0x30, 0x27),
    Rgb(0xF4, 0x6D, 0x43),
    Rgb(0xFD, 0xAE, 0x61),
    Rgb(0xFE, 0xE0, 0x8B),
    Rgb(0xFF, 0xFF, 0xBF),
    Rgb(0xD9, 0xEF, 0x8B),
    Rgb(0xA6, 0xD9, 0x6A),
    Rgb(0x66, 0xBD, 0x63),
    Rgb(0x1A, 0x98, 0x50),
    Rgb(0x00, 0x68, 0x37),
];

const RD_BU: [Rgb; 3] = [
    Rgb(0xB2, 0x18, 0x2B),
    Rgb(0xF7, 0xF7, 0xF7),
    Rgb(0x21, 0x66, 0xAC),
];

pub fn cell_background(style: CellStyle) -> Rgb {
    match style.tone {
        Tone::Gain => blend(GAIN_LIGHT, GAIN_DARK, style.intensity),
        Tone::Loss => blend(LOSS_LIGHT, LOSS_DARK, style.intensity),
        Tone::Neutral | Tone::Benchmark => NEUTRAL,
        Tone::Scale => sample(&RD_YL_GN, style.intensity),
    }
}

/// `-1.0` maps to red, `0.0` to white, `1.0` to blue.
pub fn correlation_background(value: f64) -> Rgb {
    sample(&RD_BU, (value.clamp(-1.0, 1.0) + 1.0) / 2.0)
}

/// Readable text color for `background`.
pub fn foreground(background: Rgb) -> Rgb {
    let Rgb(r, g, b) = background;
    let luminance = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    if luminance > 140.0 {
        BLACK
    } else {
        WHITE
    }
}

/// Wrap `text` in 24-bit ANSI background and foreground escapes.
pub fn paint(text: &str, background: Rgb) -> String {
    let Rgb(br, bg, bb) = background;
    let Rgb(fr, fg, fb) = foreground(background);
    format!("\x1b[48;2;{br};{bg};{bb}m\x1b[38;2;{fr};{fg};{fb}m{text}\x1b[0m")
}

pub fn bold(text: &str) -> String {
    format!("\x1b[1m{text}\x1b[0m")
}

fn blend(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let channel = |a: u8, b: u8| {
        let value = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgb(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

fn sample(stops: &[Rgb], t: f64) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    let last = stops.len() - 1;
    let position = t * last as f64;
    let index = (position.floor() as usize).min(last.saturating_sub(1));
    blend(stops[index], stops[index + 1], position - index as f64)
}
