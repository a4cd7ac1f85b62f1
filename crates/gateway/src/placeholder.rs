//! Placeholder error artifact synthesis.
//!
//! When a generator fails, the gateway must still hand downstream stages
//! a well-formed image. This module composes a fixed 512x512 grey PNG
//! with the failure class rendered in red and a truncated message in
//! black, using a built-in 5x7 bitmap font. Lowercase letters render as
//! uppercase; characters outside the glyph table render as a hollow box.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use crate::artifact::Artifact;

/// Placeholder artifacts are always this size, in pixels.
pub const PLACEHOLDER_SIZE: u32 = 512;

/// Messages longer than this are truncated with a trailing ellipsis.
pub const MAX_MESSAGE_CHARS: usize = 100;

const BACKGROUND: Rgb<u8> = Rgb([200, 200, 200]);
const HEADER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BODY_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Pixel multiplier applied to the 5x7 glyphs.
const SCALE: u32 = 2;
/// Glyph cell advance (5 columns + 1 gap) in font units.
const ADVANCE: u32 = 6;
/// Left/top margin in pixels.
const MARGIN: u32 = 10;
/// Vertical distance between text baselines in pixels.
const LINE_HEIGHT: u32 = 20;
/// Characters that fit on one line inside the margins.
const CHARS_PER_LINE: usize = ((PLACEHOLDER_SIZE - 2 * MARGIN) / (ADVANCE * SCALE)) as usize;

/// Compose the placeholder artifact for a failed generation.
///
/// The header line names the tool and failure class; subsequent lines
/// carry the truncated failure message.
pub fn placeholder_artifact(tool_id: &str, class: &str, message: &str) -> Artifact {
    let mut img = RgbImage::from_pixel(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, BACKGROUND);

    let header = format!("error in {tool_id}: {class}");
    draw_text(&mut img, &header, MARGIN, MARGIN, HEADER_COLOR);

    let mut y = MARGIN + LINE_HEIGHT;
    for line in wrap(&truncate(message)) {
        draw_text(&mut img, &line, MARGIN, y, BODY_COLOR);
        y += LINE_HEIGHT;
    }

    let mut png = Vec::new();
    // Encoding an RgbImage to PNG in memory cannot fail.
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .expect("in-memory PNG encoding");

    Artifact::from_png(png)
}

fn truncate(message: &str) -> String {
    if message.chars().count() <= MAX_MESSAGE_CHARS {
        message.to_string()
    } else {
        let cut: String = message.chars().take(MAX_MESSAGE_CHARS).collect();
        format!("{cut}...")
    }
}

fn wrap(message: &str) -> Vec<String> {
    message
        .chars()
        .collect::<Vec<_>>()
        .chunks(CHARS_PER_LINE)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn draw_text(img: &mut RgbImage, text: &str, x: u32, y: u32, color: Rgb<u8>) {
    let mut cursor_x = x;
    for ch in text.chars() {
        draw_glyph(img, ch, cursor_x, y, color);
        cursor_x += ADVANCE * SCALE;
        if cursor_x + 5 * SCALE >= PLACEHOLDER_SIZE {
            break;
        }
    }
}

fn draw_glyph(img: &mut RgbImage, ch: char, x: u32, y: u32, color: Rgb<u8>) {
    let rows = glyph(ch);
    for (row_idx, row) in rows.iter().enumerate() {
        for col in 0..5u32 {
            // Bit 4 is the leftmost column.
            if row & (1 << (4 - col)) == 0 {
                continue;
            }
            for dy in 0..SCALE {
                for dx in 0..SCALE {
                    let px = x + col * SCALE + dx;
                    let py = y + row_idx as u32 * SCALE + dy;
                    if px < img.width() && py < img.height() {
                        img.put_pixel(px, py, color);
                    }
                }
            }
        }
    }
}

/// Hollow box for characters without a glyph.
const FALLBACK: [u8; 7] = [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111];

fn glyph(ch: char) -> [u8; 7] {
    let ch = ch.to_ascii_uppercase();
    match ch {
        ' ' => [0; 7],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00110],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000],
        ':' => [0b00000, 0b00110, 0b00110, 0b00000, 0b00110, 0b00110, 0b00000],
        ';' => [0b00000, 0b00110, 0b00110, 0b00000, 0b00110, 0b00100, 0b01000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '_' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111],
        '/' => [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        _ => FALLBACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(artifact: &Artifact) -> RgbImage {
        image::load_from_memory_with_format(artifact.png_bytes(), ImageFormat::Png)
            .expect("placeholder must decode as PNG")
            .to_rgb8()
    }

    #[test]
    fn placeholder_is_fixed_size_png() {
        let artifact = placeholder_artifact("faceswap", "network error", "connection refused");
        let img = decode(&artifact);
        assert_eq!(img.width(), PLACEHOLDER_SIZE);
        assert_eq!(img.height(), PLACEHOLDER_SIZE);
    }

    #[test]
    fn placeholder_contains_red_header_pixels() {
        let artifact = placeholder_artifact("faceswap", "timeout", "deadline exceeded");
        let img = decode(&artifact);
        let red = img.pixels().filter(|p| p.0 == [255, 0, 0]).count();
        assert!(red > 0, "header text should be rendered in red");
    }

    #[test]
    fn empty_message_still_renders() {
        let artifact = placeholder_artifact("faceswap", "generator error", "");
        let img = decode(&artifact);
        assert_eq!(img.width(), PLACEHOLDER_SIZE);
    }

    #[test]
    fn long_messages_are_truncated() {
        let long = "x".repeat(500);
        let truncated = truncate(&long);
        assert_eq!(truncated.chars().count(), MAX_MESSAGE_CHARS + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn wrap_splits_at_line_width() {
        let text = "a".repeat(CHARS_PER_LINE + 5);
        let lines = wrap(&text);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), CHARS_PER_LINE);
        assert_eq!(lines[1].len(), 5);
    }
}
