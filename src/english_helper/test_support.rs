use crate::domain::passage_analysis::{NewWord, PassageAnalysis};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

fn encode_png(img: DynamicImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_png(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        Rgb([240, 240, 230]),
    )))
}

pub fn rgba_png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_png(DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, _| {
        Rgba([20, 40, 200, if x % 2 == 0 { 0 } else { 255 }])
    })))
}

pub fn noisy_png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_png(DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let v = (x * 31 + y * 17 + x * y * 7) % 256;
        Rgb([v as u8, (255 - v) as u8, ((v * 3) % 256) as u8])
    })))
}

pub fn sample_analysis() -> PassageAnalysis {
    PassageAnalysis {
        complete_passage: "My name is Lan. I live in Hanoi.".to_string(),
        vietnamese_translation: "Tên tôi là Lan. Tôi sống ở Hà Nội.".to_string(),
        new_words: vec![NewWord {
            word: "live".to_string(),
            part_of_speech: "verb".to_string(),
            meaning: "sống".to_string(),
        }],
        answers: Vec::new(),
    }
}
