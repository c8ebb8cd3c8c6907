//! Rasterizes a pattern grid into a JPEG image with the code printed
//! beneath it.
//!
//! Geometry is fixed: 25 cells of 20 px plus a 40 px padding border on every
//! side, a 580x580 canvas. The label is drawn from a built-in 5x7 glyph
//! table covering exactly the code alphabet, scaled 2x and centered in the
//! bottom padding strip with a fixed-width advance estimate.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, Rgb, RgbImage};

use super::pattern::{PatternGrid, GRID_SIZE};
use super::BarcodeError;

/// Side of one grid cell in pixels; the 25-cell pattern spans 500 px.
const CELL_PX: u32 = 20;
const PADDING_PX: u32 = 40;
pub const CANVAS_PX: u32 = CELL_PX * GRID_SIZE as u32 + 2 * PADDING_PX;
const JPEG_QUALITY: u8 = 85;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

const GLYPH_SCALE: u32 = 2;
const GLYPH_H: u32 = 7 * GLYPH_SCALE;
/// 5 glyph columns plus one column of spacing, scaled.
const GLYPH_ADVANCE: u32 = 6 * GLYPH_SCALE;

/// Renders `grid` and its `label` to JPEG bytes.
///
/// Encoding is at a fixed quality; the bytes are stable for a given input
/// but bit-for-bit stability across encoder versions is not a contract.
pub fn rasterize(grid: &PatternGrid, label: &str) -> Result<Vec<u8>, BarcodeError> {
    let mut img = RgbImage::from_pixel(CANVAS_PX, CANVAS_PX, WHITE);

    for (row, cells) in grid.iter().enumerate() {
        for (col, &on) in cells.iter().enumerate() {
            if on {
                fill_cell(&mut img, row as u32, col as u32);
            }
        }
    }

    draw_label(&mut img, label);

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut Cursor::new(&mut bytes), JPEG_QUALITY)
        .encode(img.as_raw(), CANVAS_PX, CANVAS_PX, ExtendedColorType::Rgb8)
        .map_err(|e| BarcodeError::RasterizationFailed(e.to_string()))?;
    Ok(bytes)
}

fn fill_cell(img: &mut RgbImage, row: u32, col: u32) {
    let x0 = PADDING_PX + col * CELL_PX;
    let y0 = PADDING_PX + row * CELL_PX;
    for y in y0..y0 + CELL_PX {
        for x in x0..x0 + CELL_PX {
            img.put_pixel(x, y, BLACK);
        }
    }
}

/// Draws `label` horizontally centered in the bottom padding strip. Width is
/// estimated from the fixed glyph advance; an overlong label clips at the
/// right edge rather than failing.
fn draw_label(img: &mut RgbImage, label: &str) {
    if label.is_empty() {
        return;
    }
    let text_w = label.chars().count() as u32 * GLYPH_ADVANCE - GLYPH_SCALE;
    let x0 = CANVAS_PX.saturating_sub(text_w) / 2;
    let y0 = CANVAS_PX - PADDING_PX + (PADDING_PX - GLYPH_H) / 2;
    for (i, ch) in label.chars().enumerate() {
        draw_glyph(img, x0 + i as u32 * GLYPH_ADVANCE, y0, ch);
    }
}

fn draw_glyph(img: &mut RgbImage, x0: u32, y0: u32, ch: char) {
    let Some(rows) = glyph(ch) else {
        return; // outside the label alphabet, leave a blank advance
    };
    for (gy, bits) in rows.iter().enumerate() {
        for gx in 0..5u32 {
            if (bits >> (4 - gx)) & 1 == 0 {
                continue;
            }
            for dy in 0..GLYPH_SCALE {
                for dx in 0..GLYPH_SCALE {
                    let x = x0 + gx * GLYPH_SCALE + dx;
                    let y = y0 + gy as u32 * GLYPH_SCALE + dy;
                    if x < CANVAS_PX && y < CANVAS_PX {
                        img.put_pixel(x, y, BLACK);
                    }
                }
            }
        }
    }
}

/// 5x7 bitmaps for the code alphabet (A-Z, 0-9); bit 4 is the left column.
fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::pattern;

    const CODE: &str = "VIS20250814K7KQ2M9A";

    #[test]
    fn produces_jpeg_of_expected_size() {
        let grid = pattern::synthesize(CODE);
        let bytes = rasterize(&grid, CODE).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8], "missing JPEG SOI marker");

        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (CANVAS_PX, CANVAS_PX));
    }

    #[test]
    fn finder_corner_is_dark_and_padding_is_light() {
        let grid = pattern::synthesize(CODE);
        let bytes = rasterize(&grid, CODE).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();

        // center of cell (0,0): inside the top-left finder fill
        let dark = img.get_pixel(PADDING_PX + CELL_PX / 2, PADDING_PX + CELL_PX / 2);
        // top-left of the padding border, far from any drawing
        let light = img.get_pixel(4, 4);

        // JPEG is lossy, so compare against loose thresholds
        assert!(dark.0[0] < 64, "finder cell not dark: {:?}", dark);
        assert!(light.0[0] > 200, "padding not light: {:?}", light);
    }

    #[test]
    fn same_input_renders_identically() {
        let grid = pattern::synthesize(CODE);
        assert_eq!(rasterize(&grid, CODE).unwrap(), rasterize(&grid, CODE).unwrap());
    }

    #[test]
    fn label_marks_the_bottom_margin() {
        let grid = pattern::synthesize(CODE);
        let bytes = rasterize(&grid, CODE).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();

        // some pixel in the label strip must be dark
        let y = CANVAS_PX - PADDING_PX + (PADDING_PX - GLYPH_H) / 2 + GLYPH_H / 2;
        let mut darkest = 255u8;
        for x in 0..CANVAS_PX {
            darkest = darkest.min(img.get_pixel(x, y).0[0]);
        }
        assert!(darkest < 96, "no label pixels found in bottom margin");
    }
}
