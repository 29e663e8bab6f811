//! Best-effort association of extracted page images with a draft question.
//!
//! The rule is deliberately naive: the first image of a page illustrates
//! the question and the following ones belong to the options, in order.
//! Layouts that do not follow this rule get wrong associations, so the step
//! stays separate from page parsing and callers may skip it entirely.

use crate::model::Question;

/// An image saved next to the collection, addressed by the path the quiz
/// application will load it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub path: String,
}

impl ImageAsset {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Attach `images` to `question`. Images beyond the number of options are
/// ignored.
pub fn attach_images(question: &mut Question, images: &[ImageAsset]) {
    let Some((main, rest)) = images.split_first() else {
        return;
    };

    let alt = format!("Illustration pour la question {}", question.id);
    question.set_image(main.path.as_str(), alt);

    for (option, image) in question.options.iter_mut().zip(rest) {
        let alt = format!("Option {}", option.id);
        option.set_image(image.path.as_str(), alt);
    }
}
