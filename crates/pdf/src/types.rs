use std::fmt;

/// Encoded formats an image XObject can be saved as. Raw pixel data is
/// re-encoded to `Png`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Jpeg2000,
    Unknown,
}

impl ImageFormat {
    /// File extension used when saving an image of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Jpeg2000 => "jp2",
            ImageFormat::Unknown => "bin",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Jpeg2000 => "jpeg2000",
            ImageFormat::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// An image XObject pulled out of a page.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    /// 1-based position among the page's image XObjects, counting images
    /// that could not be decoded.
    pub index: usize,
    /// XObject name in the page resources (e.g. `Im1`).
    pub name: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

/// Text and images of a single page.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number.
    pub number: u32,
    pub text: String,
    pub images: Vec<ExtractedImage>,
    /// Image XObjects that were found but could not be decoded.
    pub skipped_images: usize,
}

/// File name given to an extracted image: `question_{page}_img_{index}.{ext}`.
pub fn image_filename(page: u32, image: &ExtractedImage) -> String {
    format!(
        "question_{}_img_{}.{}",
        page,
        image.index,
        image.format.extension()
    )
}
