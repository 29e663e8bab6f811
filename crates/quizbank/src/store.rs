//! Reading and writing collection files.

use std::path::Path;

use quizbank_core::merge::load_collection;
use quizbank_core::model::QuizData;

use crate::prelude::*;

/// Read and decode the collection stored at `path`.
pub fn read_collection(path: &Path) -> Result<QuizData> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| f!("Failed to read collection {}", path.display()))?;

    load_collection(&raw).map_err(|e| {
        Error::InvalidCollection {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Write `data` as pretty-printed JSON, creating parent directories.
pub fn write_collection(path: &Path, data: &QuizData) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| f!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).wrap_err_with(|| f!("Failed to write {}", path.display()))?;

    log::debug!(
        "wrote {} questions to {}",
        data.quiz.questions.len(),
        path.display()
    );
    Ok(())
}
