//! End-to-end report pipeline
//!
//! load → segment → persist → outline → write sections → save draft →
//! apply revision overlay → write delivery package.
//!
//! Sections are written one at a time. Only a missing materials directory,
//! client configuration and filesystem failures abort a run; generation
//! failures are absorbed by the [`SectionWriter`].

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::draft::{save_draft, Draft};
use crate::error::ReportResult;
use crate::export::DeliveryPackage;
use crate::generation::{OpenAiCompatibleClient, TextGenerator};
use crate::ingest::load_materials;
use crate::outline::build_outline;
use crate::revision::apply_revision_file;
use crate::segmentation::{persist_segments, Segmenter};
use crate::writer::SectionWriter;
use aria_common::config::TomlConfig;

/// Filesystem layout of one project, rooted at `<base>/materials`
#[derive(Debug, Clone, PartialEq)]
pub struct PipelinePaths {
    pub raw: PathBuf,
    pub organized: PathBuf,
    pub staging: PathBuf,
    pub draft: PathBuf,
    pub logs: PathBuf,
    pub revisions: PathBuf,
    pub final_dir: PathBuf,
}

impl PipelinePaths {
    pub fn from_base(base: &Path) -> Self {
        let materials = base.join("materials");
        let output = materials.join("output");
        Self {
            raw: materials.join("raw"),
            organized: materials.join("organized"),
            staging: materials.join("staging").join("misc"),
            draft: output.join("drafts").join("draft.md"),
            logs: output.join("logs"),
            revisions: materials.join("revisions").join("directives.md"),
            final_dir: output.join("final"),
        }
    }
}

/// Orchestrates one report run
pub struct WritingPipeline {
    paths: PipelinePaths,
    title: String,
    segmenter: Segmenter,
    writer: SectionWriter,
}

impl WritingPipeline {
    pub fn new(paths: PipelinePaths, title: impl Into<String>, writer: SectionWriter) -> Self {
        Self {
            paths,
            title: title.into(),
            segmenter: Segmenter::default(),
            writer,
        }
    }

    /// Replace the default bucket table
    pub fn with_segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Execute every stage and return the written package
    pub async fn run(&self, metadata_overrides: &IndexMap<String, String>) -> ReportResult<DeliveryPackage> {
        info!(title = %self.title, "Starting report pipeline");

        let materials = load_materials(&self.paths.raw)?;
        let buckets = self.segmenter.segment(&materials);
        persist_segments(&buckets, &self.paths.organized, &self.paths.staging)?;

        let outline = build_outline(&buckets);
        info!(sections = outline.len(), "Outline ready");

        let mut draft = Draft::new(self.title.clone());
        for section in &outline {
            let segments = buckets.get(&section.topic).map(Vec::as_slice).unwrap_or_default();
            let text = self.writer.write_section(section, segments).await;
            draft.set_section(section.title.clone(), text);
        }
        save_draft(&draft, &self.paths.draft)?;

        let revised = apply_revision_file(&draft, &self.paths.revisions)?;
        let package = DeliveryPackage::new(revised, materials.len(), metadata_overrides);
        package.write(&self.paths.final_dir)?;

        info!(
            materials = materials.len(),
            sections = package.draft.sections.len(),
            "Report pipeline complete"
        );
        Ok(package)
    }
}

/// Build the section writer from configuration
///
/// Both clients are constructed up front, so credential and provider
/// problems surface before any generation call.
pub fn build_writer(config: &TomlConfig, log_dir: Option<PathBuf>) -> ReportResult<SectionWriter> {
    let primary: Arc<dyn TextGenerator> = Arc::new(OpenAiCompatibleClient::new(&config.primary)?);
    let secondary: Arc<dyn TextGenerator> = Arc::new(OpenAiCompatibleClient::new(&config.secondary)?);
    Ok(SectionWriter::new(primary, secondary, config.writer.clone(), log_dir))
}

/// Run the pipeline rooted at `base` with generators from `config`
pub async fn run_default(
    base: &Path,
    title: &str,
    config: &TomlConfig,
    metadata_overrides: &IndexMap<String, String>,
) -> ReportResult<DeliveryPackage> {
    let paths = PipelinePaths::from_base(base);
    let writer = build_writer(config, Some(paths.logs.clone()))?;
    WritingPipeline::new(paths, title, writer).run(metadata_overrides).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use aria_common::config::GeneratorSettings;
    use tempfile::TempDir;

    #[test]
    fn test_paths_layout() {
        let paths = PipelinePaths::from_base(Path::new("/proj"));
        assert_eq!(paths.raw, PathBuf::from("/proj/materials/raw"));
        assert_eq!(paths.organized, PathBuf::from("/proj/materials/organized"));
        assert_eq!(paths.staging, PathBuf::from("/proj/materials/staging/misc"));
        assert_eq!(paths.draft, PathBuf::from("/proj/materials/output/drafts/draft.md"));
        assert_eq!(paths.logs, PathBuf::from("/proj/materials/output/logs"));
        assert_eq!(paths.revisions, PathBuf::from("/proj/materials/revisions/directives.md"));
        assert_eq!(paths.final_dir, PathBuf::from("/proj/materials/output/final"));
    }

    #[tokio::test]
    async fn test_run_default_fails_on_missing_credentials() {
        let dir = TempDir::new().unwrap();
        let config = TomlConfig {
            primary: GeneratorSettings {
                api_key_env: "ARIA_TEST_PRIMARY_KEY_NEVER_SET".to_string(),
                ..GeneratorSettings::new("primary", "m")
            },
            ..TomlConfig::default()
        };

        let err = run_default(dir.path(), "T", &config, &IndexMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Generation(_)));
        assert!(!dir.path().join("materials").exists());
    }
}
