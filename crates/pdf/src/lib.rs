use thiserror::Error;

pub mod backend;
pub mod images;
pub mod types;

pub use types::*;

use backend::LopdfBackend;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text and images of every page, in page order.
///
/// Images that cannot be decoded are counted in
/// [`PageContent::skipped_images`] instead of failing the page.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<PageContent>, PdfError> {
    let backend = LopdfBackend::load_bytes(bytes)?;
    let mut pages = Vec::with_capacity(backend.page_count());

    for (number, page_id) in backend.pages() {
        let text = backend.page_text(number)?;
        let (images, skipped_images) = images::page_images(&backend, page_id)?;
        pages.push(PageContent {
            number,
            text,
            images,
            skipped_images,
        });
    }

    Ok(pages)
}
