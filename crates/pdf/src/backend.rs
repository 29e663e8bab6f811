use std::collections::BTreeMap;

use crate::PdfError;

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation number).
pub type PageId = (u32, u16);

/// Thin wrapper over [`lopdf::Document`] exposing what the extractor needs.
pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    /// Parse a PDF from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }

        Ok(Self { doc })
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &lopdf::Document {
        &self.doc
    }

    /// Mapping from 1-based page number to [`PageId`].
    pub fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Plain text of one page, decoded with the page's font encodings.
    pub fn page_text(&self, page_number: u32) -> Result<String, PdfError> {
        self.doc
            .extract_text(&[page_number])
            .map_err(|e| PdfError::Parse(format!("cannot extract text of page {page_number}: {e}")))
    }
}
