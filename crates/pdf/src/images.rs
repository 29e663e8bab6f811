use std::io::Cursor;

use crate::backend::{LopdfBackend, PageId};
use crate::types::{ExtractedImage, ImageFormat};
use crate::PdfError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
}

impl ColorSpace {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"DeviceGray" => Some(ColorSpace::Gray),
            b"DeviceRGB" => Some(ColorSpace::Rgb),
            b"DeviceCMYK" => Some(ColorSpace::Cmyk),
            _ => None,
        }
    }

    fn channels(self) -> usize {
        match self {
            ColorSpace::Gray => 1,
            ColorSpace::Rgb => 3,
            ColorSpace::Cmyk => 4,
        }
    }
}

/// Layout of an unencoded image stream.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawImageMeta {
    width: u32,
    height: u32,
    /// One of 1, 2, 4 or 8.
    bits_per_component: u8,
    color_space: ColorSpace,
}

impl RawImageMeta {
    /// Read the layout from an image dictionary. Zero or out-of-range
    /// dimensions and unsupported sample depths give `None`.
    fn from_dict(dict: &lopdf::Dictionary) -> Option<Self> {
        fn dimension(dict: &lopdf::Dictionary, key: &[u8]) -> Option<u32> {
            let value = dict.get(key).ok()?.as_i64().ok()?;
            u32::try_from(value).ok().filter(|v| *v > 0)
        }

        let bits_per_component = match dict.get(b"BitsPerComponent") {
            Ok(obj) => match obj.as_i64().ok()? {
                bits @ (1 | 2 | 4 | 8) => bits as u8,
                _ => return None,
            },
            Err(_) => 8,
        };

        let color_space = ColorSpace::from_name(dict.get(b"ColorSpace").ok()?.as_name().ok()?)?;

        Some(Self {
            width: dimension(dict, b"Width")?,
            height: dimension(dict, b"Height")?,
            bits_per_component,
            color_space,
        })
    }

    fn samples_per_row(&self) -> usize {
        self.width as usize * self.color_space.channels()
    }

    /// Rows are padded to a whole byte.
    fn bytes_per_row(&self) -> usize {
        (self.samples_per_row() * self.bits_per_component as usize).div_ceil(8)
    }

    fn expected_byte_count(&self) -> usize {
        self.bytes_per_row() * self.height as usize
    }
}

/// Format from magic bytes, `Unknown` when nothing matches.
pub fn detect_image_format(bytes: &[u8]) -> ImageFormat {
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JP2: &[u8] = &[0x00, 0x00, 0x00, 0x0C, b'j', b'P', 0x20, 0x20];

    if bytes.len() < 8 {
        ImageFormat::Unknown
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        ImageFormat::Jpeg
    } else if bytes.starts_with(PNG) {
        ImageFormat::Png
    } else if bytes.starts_with(JP2) {
        ImageFormat::Jpeg2000
    } else {
        ImageFormat::Unknown
    }
}

/// `DCTDecode` is JPEG, `JPXDecode` is JPEG2000; other filters say nothing
/// about the encoded format.
pub fn format_from_pdf_filter(filter_name: &str) -> ImageFormat {
    match filter_name {
        "DCTDecode" => ImageFormat::Jpeg,
        "JPXDecode" => ImageFormat::Jpeg2000,
        _ => ImageFormat::Unknown,
    }
}

/// Filter hint first, magic bytes otherwise.
pub fn resolve_format(raw_bytes: &[u8], filter: Option<&str>) -> ImageFormat {
    match filter.map(format_from_pdf_filter) {
        Some(format) if format != ImageFormat::Unknown => format,
        _ => detect_image_format(raw_bytes),
    }
}

/// Re-encode raw pixel data as PNG.
fn encode_raw_as_png(meta: &RawImageMeta, raw_bytes: &[u8]) -> Option<Vec<u8>> {
    if raw_bytes.len() != meta.expected_byte_count() {
        return None;
    }

    let samples = if meta.bits_per_component == 8 {
        raw_bytes.to_vec()
    } else {
        unpack_samples(raw_bytes, meta)
    };

    let (width, height) = (meta.width, meta.height);
    let image = match meta.color_space {
        ColorSpace::Gray => {
            image::DynamicImage::ImageLuma8(image::GrayImage::from_raw(width, height, samples)?)
        }
        ColorSpace::Rgb => {
            image::DynamicImage::ImageRgb8(image::RgbImage::from_raw(width, height, samples)?)
        }
        ColorSpace::Cmyk => {
            let rgb = cmyk_to_rgb(&samples);
            image::DynamicImage::ImageRgb8(image::RgbImage::from_raw(width, height, rgb)?)
        }
    };

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .ok()?;
    Some(png)
}

/// Spread 1, 2 or 4-bit samples over full bytes (0 → 0, max → 255).
/// Padding bits at the end of each row are dropped.
fn unpack_samples(raw_bytes: &[u8], meta: &RawImageMeta) -> Vec<u8> {
    let bits = meta.bits_per_component as usize;
    let max = (1u16 << bits) - 1;
    let per_row = meta.samples_per_row();

    raw_bytes
        .chunks(meta.bytes_per_row())
        .flat_map(|row| {
            (0..per_row).map(move |sample| {
                let bit = sample * bits;
                let shift = 8 - bits - bit % 8;
                let value = (row[bit / 8] >> shift) as u16 & max;
                (value * 255 / max) as u8
            })
        })
        .collect()
}

/// Naive conversion without color management.
fn cmyk_to_rgb(cmyk: &[u8]) -> Vec<u8> {
    cmyk.chunks_exact(4)
        .flat_map(|px| {
            let k = px[3];
            [0, 1, 2].map(|i| 255u8.saturating_sub(px[i]).saturating_sub(k))
        })
        .collect()
}

/// Decode one image stream into saveable bytes, or `None` when neither the
/// encoded format nor the raw pixel layout is understood.
fn decode_image_stream(stream: &lopdf::Stream) -> Option<(ImageFormat, Vec<u8>)> {
    let filter_name = extract_filter_name(&stream.dict);
    let bytes = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    match resolve_format(&bytes, filter_name.as_deref()) {
        ImageFormat::Unknown => {
            let meta = RawImageMeta::from_dict(&stream.dict)?;
            encode_raw_as_png(&meta, &bytes).map(|png| (ImageFormat::Png, png))
        }
        format => Some((format, bytes)),
    }
}

/// Image XObjects of a page, in resource order.
///
/// Returns the decoded images and the number of image XObjects that could
/// not be decoded.
pub fn page_images(
    backend: &LopdfBackend,
    page_id: PageId,
) -> Result<(Vec<ExtractedImage>, usize), PdfError> {
    let doc = backend.raw_doc();
    let mut images = Vec::new();
    let mut skipped = 0;

    let page_obj = doc
        .get_object(page_id)
        .map_err(|e| PdfError::Parse(format!("cannot get page object: {}", e)))?;

    let page_dict = page_obj
        .as_dict()
        .map_err(|e| PdfError::Parse(format!("page object is not a dictionary: {}", e)))?;

    let Some(xobject_dict) = resolve_xobject_dict(doc, page_dict) else {
        return Ok((images, skipped));
    };

    let mut index = 0;
    for (name, obj) in xobject_dict.iter() {
        let Some(stream) = as_stream(resolve_object(doc, obj)) else {
            continue;
        };

        let is_image = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|n| n == b"Image");
        if !is_image {
            continue;
        }

        index += 1;
        match decode_image_stream(stream) {
            Some((format, bytes)) => images.push(ExtractedImage {
                index,
                name: String::from_utf8_lossy(name).into_owned(),
                format,
                bytes,
            }),
            None => skipped += 1,
        }
    }

    Ok((images, skipped))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn resolve_object<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn resolve_dict<'a>(
    doc: &'a lopdf::Document,
    obj: &'a lopdf::Object,
) -> Option<&'a lopdf::Dictionary> {
    match obj {
        lopdf::Object::Dictionary(d) => Some(d),
        lopdf::Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        _ => None,
    }
}

/// Page → Resources → XObject, following references.
fn resolve_xobject_dict<'a>(
    doc: &'a lopdf::Document,
    page_dict: &'a lopdf::Dictionary,
) -> Option<&'a lopdf::Dictionary> {
    let resources_obj = page_dict.get(b"Resources").ok()?;
    let resources_dict = resolve_dict(doc, resources_obj)?;
    let xobject_obj = resources_dict.get(b"XObject").ok()?;
    resolve_dict(doc, xobject_obj)
}

fn as_stream(obj: &lopdf::Object) -> Option<&lopdf::Stream> {
    match obj {
        lopdf::Object::Stream(s) => Some(s),
        _ => None,
    }
}

/// First filter name; `Filter` may be a name or an array of names.
fn extract_filter_name(dict: &lopdf::Dictionary) -> Option<String> {
    let filter_obj = dict.get(b"Filter").ok()?;
    match filter_obj {
        lopdf::Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        lopdf::Object::Array(arr) => arr.first().and_then(|o| match o {
            lopdf::Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }),
        _ => None,
    }
}
