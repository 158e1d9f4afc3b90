use camview_codec::DecodedFrame;
use camview_core::traits::{BorrowFrameProperties, FrameProcessor};

use crate::{
    headless::HeadlessRenderer,
    placeholder::{
        blank_frame, placeholder_frame, PLACEHOLDER_HEIGHT, PLACEHOLDER_LABEL, PLACEHOLDER_WIDTH,
    },
};

#[derive(Clone, Copy)]
struct Slot;

struct TestFrameData {
    frame: Option<DecodedFrame>,
}

impl BorrowFrameProperties<Slot, DecodedFrame> for TestFrameData {
    fn get_ref(&self, _key: &Slot) -> Option<&DecodedFrame> {
        self.frame.as_ref()
    }
}

#[test]
fn placeholder_is_black_with_a_white_label() {
    let frame = placeholder_frame();
    assert_eq!(frame.width(), PLACEHOLDER_WIDTH);
    assert_eq!(frame.height(), PLACEHOLDER_HEIGHT);

    let pixels: Vec<&[u8]> = frame.pixels().chunks(4).collect();
    let white = pixels.iter().filter(|pixel| **pixel == [255, 255, 255, 255]).count();
    let black = pixels.iter().filter(|pixel| **pixel == [0, 0, 0, 255]).count();

    assert!(white > 0);
    assert_eq!(white + black, pixels.len());

    // Corners stay clear of the centered label.
    assert_eq!(pixels[0], [0, 0, 0, 255]);
    assert_eq!(pixels[pixels.len() - 1], [0, 0, 0, 255]);
}

#[test]
fn placeholder_label_is_centered() {
    let frame = placeholder_frame();
    let width = frame.width() as usize;

    let lit_columns: Vec<usize> = (0..width)
        .filter(|x| {
            (0..frame.height() as usize)
                .any(|y| frame.pixels()[(y * width + x) * 4] == 255)
        })
        .collect();

    let left = lit_columns[0];
    let right = width - 1 - lit_columns[lit_columns.len() - 1];
    assert!(left.abs_diff(right) <= 2);
}

fn lit_pixels(frame: &DecodedFrame) -> usize {
    frame
        .pixels()
        .chunks(4)
        .filter(|pixel| *pixel == [255, 255, 255, 255])
        .count()
}

#[test]
fn every_placeholder_character_has_a_glyph() {
    for character in PLACEHOLDER_LABEL.chars().filter(|c| !c.is_whitespace()) {
        let frame = blank_frame(16, 16, &character.to_string());
        assert!(lit_pixels(&frame) > 0, "no glyph for {:?}", character);
    }
}

#[test]
fn characters_without_a_glyph_stay_blank() {
    assert_eq!(lit_pixels(&blank_frame(64, 16, "xyz")), 0);
}

#[tokio::test]
async fn headless_renderer_counts_frames_with_an_image() {
    let mut renderer = HeadlessRenderer::new(Slot).log_every(1);
    let rendered = renderer.rendered_frames();

    let with_image = TestFrameData {
        frame: Some(placeholder_frame()),
    };
    let without_image = TestFrameData { frame: None };

    assert!(renderer.process(with_image).await.is_some());
    assert!(renderer.process(without_image).await.is_some());

    assert_eq!(rendered.load(std::sync::atomic::Ordering::Relaxed), 1);
}
