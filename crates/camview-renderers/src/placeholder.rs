use camview_codec::DecodedFrame;

pub const PLACEHOLDER_WIDTH: u32 = 320;
pub const PLACEHOLDER_HEIGHT: u32 = 240;
pub const PLACEHOLDER_LABEL: &str = "Camera is OFF";

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_SPACING: u32 = 1;
const SCALE: u32 = 2;

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];
const FOREGROUND: [u8; 4] = [255, 255, 255, 255];

/// The image shown while no acquisition is running: black, with the label in the middle.
pub fn placeholder_frame() -> DecodedFrame {
    blank_frame(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, PLACEHOLDER_LABEL)
}

/// Black frame with `label` centered on it. Only the glyphs of [`PLACEHOLDER_LABEL`] are
/// drawn.
pub(crate) fn blank_frame(width: u32, height: u32, label: &str) -> DecodedFrame {
    let mut pixels = BACKGROUND.repeat(width as usize * height as usize);

    let advance = (GLYPH_WIDTH + GLYPH_SPACING) * SCALE;
    let label_width = (label.chars().count() as u32 * advance).saturating_sub(GLYPH_SPACING * SCALE);
    let label_height = GLYPH_HEIGHT * SCALE;

    let origin_x = width.saturating_sub(label_width) / 2;
    let origin_y = height.saturating_sub(label_height) / 2;

    for (index, character) in label.chars().enumerate() {
        let glyph_x = origin_x + index as u32 * advance;

        for (row, bits) in glyph(character).iter().enumerate() {
            for column in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - column)) == 0 {
                    continue;
                }

                let x = glyph_x + column * SCALE;
                let y = origin_y + row as u32 * SCALE;
                fill(&mut pixels, width, height, x, y, SCALE);
            }
        }
    }

    DecodedFrame::from_rgba(width, height, pixels)
        .expect("placeholder buffer matches its dimensions")
}

fn fill(pixels: &mut [u8], width: u32, height: u32, x: u32, y: u32, size: u32) {
    for dy in 0..size {
        for dx in 0..size {
            let (px, py) = (x + dx, y + dy);
            if px >= width || py >= height {
                continue;
            }

            let offset = (py as usize * width as usize + px as usize) * 4;
            pixels[offset..offset + 4].copy_from_slice(&FOREGROUND);
        }
    }
}

// 5x7 bitmaps, most significant of the five low bits on the left. Unknown characters are blank.
fn glyph(character: char) -> [u8; GLYPH_HEIGHT as usize] {
    match character {
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'a' => [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111],
        'e' => [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        'i' => [0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110],
        'm' => [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10101, 0b10101],
        'r' => [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000],
        's' => [0b00000, 0b00000, 0b01111, 0b10000, 0b01110, 0b00001, 0b11110],
        _ => [0; GLYPH_HEIGHT as usize],
    }
}
