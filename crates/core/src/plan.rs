//! Merge plan: which collections to merge, where they live, where the
//! result goes.
//!
//! Plans are small TOML files:
//!
//! ```toml
//! title = "Quiz de Révision EPSF - Collection Complète"
//! data_dir = "src/data"
//! output = "questions_complete.json"
//! sources = ["questions_merged.json", "questions_supp.json"]
//! ```
//!
//! Relative `sources` and `output` are resolved against `data_dir`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::MERGED_TITLE;

pub const DEFAULT_DATA_DIR: &str = "src/data";
pub const DEFAULT_OUTPUT: &str = "questions_complete.json";
pub const DEFAULT_SOURCES: &[&str] = &[
    "questions_merged.json",
    "questions_supp.json",
    "questions_supp_2.json",
];

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid merge plan: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("merge plan lists no sources")]
    NoSources,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergePlan {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_sources")]
    pub sources: Vec<PathBuf>,
}

fn default_title() -> String {
    MERGED_TITLE.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_sources() -> Vec<PathBuf> {
    DEFAULT_SOURCES.iter().map(PathBuf::from).collect()
}

impl Default for MergePlan {
    fn default() -> Self {
        Self {
            title: default_title(),
            data_dir: default_data_dir(),
            output: default_output(),
            sources: default_sources(),
        }
    }
}

impl MergePlan {
    pub fn from_toml_str(input: &str) -> Result<Self, PlanError> {
        let plan: MergePlan = toml::from_str(input)?;
        if plan.sources.is_empty() {
            return Err(PlanError::NoSources);
        }
        Ok(plan)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.sources.iter().map(|p| self.resolve(p)).collect()
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan() {
        let plan = MergePlan::default();
        assert_eq!(plan.title, MERGED_TITLE);
        assert_eq!(
            plan.source_paths(),
            vec![
                PathBuf::from("src/data/questions_merged.json"),
                PathBuf::from("src/data/questions_supp.json"),
                PathBuf::from("src/data/questions_supp_2.json"),
            ]
        );
        assert_eq!(
            plan.output_path(),
            PathBuf::from("src/data/questions_complete.json")
        );
    }

    #[test]
    fn test_partial_plan_uses_defaults() {
        let plan = MergePlan::from_toml_str("sources = [\"a.json\", \"/abs/b.json\"]").unwrap();
        assert_eq!(plan.title, MERGED_TITLE);
        assert_eq!(
            plan.source_paths(),
            vec![
                PathBuf::from("src/data/a.json"),
                PathBuf::from("/abs/b.json")
            ]
        );
    }

    #[test]
    fn test_full_plan() {
        let input = r#"
title = "Série 3"
data_dir = "bank"
output = "out.json"
sources = ["one.json", "two.json"]
"#;
        let plan = MergePlan::from_toml_str(input).unwrap();
        assert_eq!(plan.title, "Série 3");
        assert_eq!(plan.output_path(), PathBuf::from("bank/out.json"));
        assert_eq!(plan.source_paths().len(), 2);
    }

    #[test]
    fn test_invalid_plans() {
        assert!(matches!(
            MergePlan::from_toml_str("sources = []"),
            Err(PlanError::NoSources)
        ));
        assert!(matches!(
            MergePlan::from_toml_str("sauces = [\"a.json\"]"),
            Err(PlanError::Toml(_))
        ));
        assert!(matches!(
            MergePlan::from_toml_str("title = 3"),
            Err(PlanError::Toml(_))
        ));
    }
}
