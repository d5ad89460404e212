//! End-to-end tests for the size-budget encoder, driven by synthetic photos.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use platepress_core::{
    encode, encode_with_report, Dimensions, EncodeError, EncodingOptions, OutputFormat,
};

const MIB: usize = 1024 * 1024;

/// Deterministic xorshift noise so the fixtures are stable across runs.
struct XorShift(u32);

impl XorShift {
    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

/// A gradient with `noise` levels of grain on top.
fn photo(width: u32, height: u32, noise: u8) -> RgbImage {
    let mut rng = XorShift(0x9E37_79B9);
    RgbImage::from_fn(width, height, |x, y| {
        let base = [
            (x * 200 / width + 20) as i32,
            (y * 200 / height + 20) as i32,
            ((x + y) * 100 / (width + height) + 60) as i32,
        ];
        let grain = |c: i32, r: u32| {
            let offset = if noise == 0 {
                0
            } else {
                (r % (2 * noise as u32 + 1)) as i32 - noise as i32
            };
            (c + offset).clamp(0, 255) as u8
        };
        image::Rgb([
            grain(base[0], rng.next()),
            grain(base[1], rng.next()),
            grain(base[2], rng.next()),
        ])
    })
}

fn static_noise(width: u32, height: u32) -> RgbImage {
    let mut rng = XorShift(0x1234_5678);
    RgbImage::from_fn(width, height, |_, _| {
        let v = rng.next();
        image::Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
    })
}

fn to_jpeg(img: &RgbImage) -> Vec<u8> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, 92)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8)
        .unwrap();
    buffer
}

fn to_png(img: &RgbImage) -> Vec<u8> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8)
        .unwrap();
    buffer
}

/// Splice an APP1 Exif block with a single Orientation tag in after SOI.
fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    let mut app1 = b"Exif\x00\x00MM\x00\x2A\x00\x00\x00\x08".to_vec();
    app1.extend_from_slice(&1u16.to_be_bytes());
    app1.extend_from_slice(&0x0112u16.to_be_bytes());
    app1.extend_from_slice(&3u16.to_be_bytes());
    app1.extend_from_slice(&1u32.to_be_bytes());
    app1.extend_from_slice(&orientation.to_be_bytes());
    app1.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}

fn jpeg_options() -> EncodingOptions {
    EncodingOptions {
        output_format: OutputFormat::Jpeg,
        ..EncodingOptions::default()
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn large_photo_fits_envelope_and_budget() {
    // Same shape as a 3000x2000 upload against the 2048px default, at half scale
    let source = to_jpeg(&photo(1500, 1000, 2));
    let options = EncodingOptions {
        max_width: 1024,
        max_height: 1024,
        max_size_bytes: MIB / 4,
        ..EncodingOptions::default()
    };
    let outcome = encode_with_report(&source, &options).unwrap();

    let candidate = &outcome.candidate;
    assert_eq!(candidate.format, OutputFormat::Avif);
    assert!(candidate.dimensions.fits_within(Dimensions::new(1024, 1024)));
    assert!(candidate.len() <= MIB / 4, "encoded {} bytes", candidate.len());
    assert!(outcome.budget_met());
    assert_eq!(&candidate.bytes[4..8], b"ftyp");
}

#[test]
fn small_photo_is_not_resized() {
    let source = to_png(&photo(200, 200, 0));
    let outcome = encode_with_report(&source, &jpeg_options()).unwrap();

    assert_eq!(outcome.candidate.dimensions, Dimensions::new(200, 200));
    assert_eq!(outcome.attempts.len(), 1);
    assert_eq!(outcome.candidate.quality, 85);

    let decoded = image::load_from_memory(&outcome.candidate.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (200, 200));
}

#[test]
fn truncated_jpeg_is_a_decode_error() {
    let source = to_jpeg(&photo(64, 64, 0));
    let result = encode(&source[..20], &EncodingOptions::default());
    assert!(matches!(result, Err(EncodeError::Decode(_))));
}

#[test]
fn garbage_is_a_decode_error() {
    let result = encode(b"GIF? no, just text", &jpeg_options());
    assert!(matches!(result, Err(EncodeError::Decode(_))));
}

#[test]
fn empty_input_is_a_decode_error() {
    let result = encode(&[], &EncodingOptions::default());
    assert!(matches!(result, Err(EncodeError::Decode(_))));
}

#[test]
fn lossless_only_format_is_rejected() {
    let source = to_png(&photo(32, 32, 0));
    for format in [OutputFormat::WebP, OutputFormat::Png] {
        let options = EncodingOptions {
            output_format: format,
            ..EncodingOptions::default()
        };
        let result = encode(&source, &options);
        assert!(matches!(result, Err(EncodeError::UnsupportedFormat(_))));
    }
}

#[test]
fn exif_rotation_is_baked_into_output() {
    let landscape = RgbImage::from_fn(300, 100, |x, _| {
        if x < 150 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    });
    let source = with_exif_orientation(&to_jpeg(&landscape), 6);
    let outcome = encode_with_report(&source, &jpeg_options()).unwrap();

    assert_eq!(outcome.attempts[0].target, Dimensions::new(100, 300));
    assert_eq!(outcome.candidate.dimensions, Dimensions::new(100, 300));

    let decoded = image::load_from_memory(&outcome.candidate.bytes).unwrap().to_rgb8();
    assert_eq!((decoded.width(), decoded.height()), (100, 300));
    let top = decoded.get_pixel(50, 20).0;
    let bottom = decoded.get_pixel(50, 280).0;
    assert!(top[0] > 200 && top[2] < 60, "top {:?}", top);
    assert!(bottom[2] > 200 && bottom[0] < 60, "bottom {:?}", bottom);
}

// ============================================================================
// Budget properties
// ============================================================================

#[test]
fn grainy_photo_meets_budget() {
    // A 4000x3000 photo against 1 MiB, scaled down by two in each direction
    let source = to_jpeg(&photo(2000, 1500, 4));
    let options = EncodingOptions {
        max_width: 1024,
        max_height: 1024,
        max_size_bytes: MIB / 4,
        ..jpeg_options()
    };
    let bytes = encode(&source, &options).unwrap();

    assert!(bytes.len() <= MIB / 4, "encoded {} bytes", bytes.len());
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert!(decoded.width() <= 1024 && decoded.height() <= 1024);
    let aspect = decoded.width() as f64 / decoded.height() as f64;
    assert!((aspect - 4.0 / 3.0).abs() < 0.01, "aspect {aspect}");
}

#[test]
fn unreachable_budget_stops_at_quality_floor() {
    let source = to_png(&static_noise(128, 128));
    let options = EncodingOptions {
        max_size_bytes: 100,
        ..jpeg_options()
    };
    let outcome = encode_with_report(&source, &options).unwrap();

    assert_eq!(outcome.candidate.quality, options.min_quality);
    assert!(outcome.candidate.len() > 100);
    let unmet = outcome.budget_unmet().unwrap();
    assert_eq!(unmet.max_size_bytes, 100);
    assert_eq!(unmet.quality, 40);
    assert!(outcome.attempts.len() <= 11);
}

#[test]
fn quality_never_increases_across_passes() {
    let source = to_png(&static_noise(256, 256));
    let options = EncodingOptions {
        max_size_bytes: 4_000,
        ..jpeg_options()
    };
    let outcome = encode_with_report(&source, &options).unwrap();

    assert!(outcome.attempts.len() > 1);
    for pair in outcome.attempts.windows(2) {
        assert!(pair[1].quality <= pair[0].quality);
        assert!(pair[1].target.fits_within(pair[0].target));
    }
    let last = outcome.attempts.last().unwrap();
    assert_eq!(last.size, outcome.candidate.len());
}

#[test]
fn source_bytes_are_untouched() {
    let source = to_jpeg(&photo(300, 200, 3));
    let snapshot = source.clone();
    let options = EncodingOptions {
        max_size_bytes: 2_000,
        ..jpeg_options()
    };
    encode(&source, &options).unwrap();
    assert_eq!(source, snapshot);
}

#[test]
fn custom_bounds_are_respected() {
    let source = to_png(&photo(640, 480, 0));
    let options = EncodingOptions {
        max_width: 320,
        max_height: 100,
        ..jpeg_options()
    };
    let bytes = encode(&source, &options).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (133, 100));
}
