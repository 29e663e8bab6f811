use std::path::{Path, PathBuf};

use colored::Colorize;
use pdf::{image_filename, PageContent};
use quizbank_core::draft::parse_page;
use quizbank_core::images::{attach_images, ImageAsset};
use quizbank_core::model::{Question, Quiz, QuizData, DEFAULT_TITLE};

use crate::prelude::*;
use crate::prelude::println;
use crate::store::write_collection;

#[derive(Debug, clap::Parser)]
#[command(name = "extract")]
#[command(about = "Build draft questions from a PDF, one question per page")]
pub struct App {
    /// Path to the PDF file
    path: PathBuf,

    /// Draft collection file to write
    #[arg(short, long, env = "QUIZBANK_OUTPUT")]
    output: PathBuf,

    /// Directory extracted images are saved to
    #[arg(long, default_value = "public/images")]
    images_dir: PathBuf,

    /// Path prefix the quiz application serves images from
    #[arg(long, default_value = "/images")]
    image_prefix: String,

    /// Do not save images nor attach them to questions
    #[arg(long)]
    no_images: bool,

    /// Collection title
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,
}

/// Write every extracted image under `dir`. Returns the number of files
/// written.
fn save_images(pages: &[PageContent], dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| f!("Failed to create directory {}", dir.display()))?;

    let mut written = 0;
    for page in pages {
        for image in &page.images {
            let path = dir.join(image_filename(page.number, image));
            std::fs::write(&path, &image.bytes)
                .wrap_err_with(|| f!("Failed to write image {}", path.display()))?;
            written += 1;
        }
    }
    Ok(written)
}

/// Draft questions for every page with text, with the page images attached
/// when `image_prefix` is given.
fn build_drafts(pages: &[PageContent], image_prefix: Option<&str>) -> Vec<Question> {
    let mut questions = Vec::with_capacity(pages.len());

    for page in pages {
        let Some(mut question) = parse_page(&page.text, page.number) else {
            log::debug!("page {} has no text, skipped", page.number);
            continue;
        };

        if page.skipped_images > 0 {
            log::warn!(
                "page {}: {} images could not be decoded",
                page.number,
                page.skipped_images
            );
        }

        if let Some(prefix) = image_prefix {
            let assets: Vec<ImageAsset> = page
                .images
                .iter()
                .map(|image| {
                    ImageAsset::new(f!(
                        "{}/{}",
                        prefix.trim_end_matches('/'),
                        image_filename(page.number, image)
                    ))
                })
                .collect();
            attach_images(&mut question, &assets);
        }

        questions.push(question);
    }

    questions
}

pub fn run(app: App, _global: crate::Global) -> Result<()> {
    let bytes =
        std::fs::read(&app.path).wrap_err_with(|| f!("Failed to read {}", app.path.display()))?;

    let pages = pdf::extract_pages(&bytes).map_err(|e| Error::Pdf {
        path: app.path.display().to_string(),
        reason: e.to_string(),
    })?;
    log::info!("{}: {} pages", app.path.display(), pages.len());

    let images_written = if app.no_images {
        0
    } else {
        save_images(&pages, &app.images_dir)?
    };

    let prefix = (!app.no_images).then_some(app.image_prefix.as_str());
    let questions = build_drafts(&pages, prefix);
    let count = questions.len();

    write_collection(&app.output, &QuizData::new(Quiz::new(app.title, questions)))?;

    println!(
        "{} {} draft questions into {}",
        "Extracted".green().bold(),
        count.to_string().bright_white(),
        app.output.display()
    );
    if !app.no_images {
        println!(
            "  {} images saved to {}",
            images_written,
            app.images_dir.display()
        );
    }
    println!(
        "{}",
        "Correct answers are not detected: fill them in and check image associations by hand"
            .bright_yellow()
    );

    Ok(())
}
