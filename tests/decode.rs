extern crate pngico;
extern crate png;

use std::env;
use std::fs;
use std::path::PathBuf;

//===========================================================================//

// A 2x2 grayscale PNG, as produced by a typical encoder.
const GRAYSCALE_2X2: &[u8] = b"\
    \x89\x50\x4e\x47\x0d\x0a\x1a\x0a\x00\x00\x00\x0d\x49\x48\x44\x52\
    \x00\x00\x00\x02\x00\x00\x00\x02\x08\x00\x00\x00\x00\x57\xdd\x52\
    \xf8\x00\x00\x00\x0e\x49\x44\x41\x54\x78\x9c\x63\xb4\x77\x60\xdc\
    \xef\x00\x00\x04\x08\x01\x81\x86\x2e\xc9\x8d\x00\x00\x00\x00\x49\
    \x45\x4e\x44\xae\x42\x60\x82";

//===========================================================================//

#[test]
fn parse_grayscale_png() {
    let image = pngico::PngImage::from_bytes(GRAYSCALE_2X2).unwrap();
    let header = image.header();
    assert_eq!(header.width, 2);
    assert_eq!(header.height, 2);
    assert_eq!(header.bit_depth, 8);
    assert_eq!(header.color(), Some(pngico::ColorType::Grayscale));
    assert_eq!(header.filter_method, 0);
    assert_eq!(header.interlace_method, 0);
    let types: Vec<&[u8; 4]> =
        image.chunks().iter().map(|chunk| chunk.chunk_type()).collect();
    assert_eq!(types, vec![b"IHDR", b"IDAT", b"IEND"]);
    for chunk in image.chunks() {
        assert!(chunk.has_valid_checksum(), "bad checksum in {:?}", chunk);
    }
}

#[test]
fn decode_png_crate_output() {
    let (width, height) = (7, 5);
    let raw = test_pattern(width, height);
    let bytes = encode_reference_png(width, height, &raw);
    let image = pngico::PngImage::from_bytes(&bytes).unwrap();
    assert_eq!(image.width(), width);
    assert_eq!(image.height(), height);
    assert_eq!(image.image_data().unwrap(), raw.as_slice());
}

#[test]
fn load_from_file() {
    let raw = test_pattern(4, 4);
    let path = temp_path("load_from_file.png");
    fs::write(&path, encode_reference_png(4, 4, &raw)).unwrap();
    let image = pngico::load(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(image.image_data().unwrap(), raw.as_slice());
}

#[test]
fn load_missing_file_is_io_error() {
    let path = temp_path("does_not_exist.png");
    let result = pngico::PngImage::load(&path);
    assert!(matches!(result, Err(pngico::Error::Io(_))));
}

#[test]
fn load_non_png_is_bad_signature() {
    let result = pngico::PngImage::from_bytes(b"GIF89a\x01\x00\x01\x00");
    assert!(matches!(result, Err(pngico::Error::BadSignature)));
}

#[test]
fn truncated_png_is_rejected() {
    let bytes = encode_reference_png(3, 3, &test_pattern(3, 3));
    let result = pngico::PngImage::from_bytes(&bytes[..bytes.len() - 6]);
    assert!(matches!(result, Err(pngico::Error::TruncatedInput(_))));
}

//===========================================================================//

fn test_pattern(width: u32, height: u32) -> Vec<u8> {
    let mut raw = Vec::new();
    for index in 0..(width * height) {
        raw.push(if index % 2 == 0 { 0 } else { 255 });
        raw.push((index * 7) as u8);
        raw.push(if index % 5 == 0 { 0 } else { 128 });
    }
    raw
}

fn encode_reference_png(width: u32, height: u32, raw: &[u8]) -> Vec<u8> {
    let mut output = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut output, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_filter(png::FilterType::NoFilter);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(raw).unwrap();
    }
    output
}

fn temp_path(name: &str) -> PathBuf {
    env::temp_dir().join(format!("pngico-{}-{}", std::process::id(), name))
}

//===========================================================================//
