//! Core library for quizbank
//!
//! This crate implements the **Functional Core** of the quizbank tooling,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`quizbank_core`** (this crate): Pure transformation functions with zero I/O
//! - **`pdf`**: PDF page text and image extraction on top of `lopdf`
//! - **`quizbank`**: File I/O and orchestration (the Imperative Shell)
//!
//! Every function here takes data in and hands data back: reading raw text
//! sources, loading JSON collections and writing the results is left to the
//! shell. Problems found while transforming (a malformed question block, a
//! badly shaped collection) are returned as values so the caller decides
//! whether to skip, log or abort.
//!
//! # Module Organization
//!
//! - [`model`]: The question bank document (`QuizData` → `Quiz` → `Question` → `QuizOption`)
//! - [`parser`]: Raw text blocks to questions
//! - [`merge`]: Collection loading, merging with renumbering, appending
//! - [`verify`]: Collection health statistics
//! - [`plan`]: TOML merge plans
//! - [`draft`]: Draft questions from PDF page text
//! - [`images`]: Best-effort image association for drafts
//!
//! # Example Usage
//!
//! ```rust
//! use quizbank_core::merge::{merge_collections, NamedSource};
//! use quizbank_core::model::{Quiz, QuizData};
//! use quizbank_core::parser::parse_document;
//!
//! let first = parse_document("Q ?\n[] A XXX\n[] B\nC1", 1);
//! let second = parse_document("R ?\n[] A\n[] B XXX\nC2", 1);
//!
//! let merged = merge_collections(
//!     vec![
//!         NamedSource::new("first", QuizData::new(Quiz::new("First", first.questions))),
//!         NamedSource::new("second", QuizData::new(Quiz::new("Second", second.questions))),
//!     ],
//!     "Merged",
//! );
//!
//! let ids: Vec<u32> = merged.data.quiz.questions.iter().map(|q| q.id).collect();
//! assert_eq!(ids, vec![1, 2]);
//! ```

pub mod draft;
pub mod images;
pub mod merge;
pub mod model;
pub mod parser;
pub mod plan;
pub mod verify;
