use crate::core::render::render_document;
use crate::core::schema::{validate_document, DocumentOutcome};
use crate::core::{
    ConfigProvider, GenerationReport, Pipeline, Section, SectionOutcome, SkipReason,
    SourceDocument, Storage, TransformResult,
};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

pub struct SectionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> SectionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn source_path(&self, section: Section) -> PathBuf {
        self.config.data_dir().join(self.config.source_file(section))
    }

    fn fragment_path(&self, section: Section) -> PathBuf {
        self.config
            .sections_dir()
            .join(self.config.fragment_file(section))
    }

    async fn missing_directory(&self) -> Option<PathBuf> {
        for dir in [self.config.data_dir(), self.config.sections_dir()] {
            if !self.storage.is_dir(dir).await {
                return Some(dir.to_path_buf());
            }
        }
        None
    }

    async fn read_source(&self, path: &Path) -> std::result::Result<String, SkipReason> {
        if !self.storage.is_file(path).await {
            return Err(SkipReason::Absent);
        }

        let bytes = self
            .storage
            .read_file(path)
            .await
            .map_err(|e| SkipReason::Unreadable(e.to_string()))?;

        String::from_utf8(bytes).map_err(|e| SkipReason::Unreadable(e.to_string()))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SectionPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceDocument>> {
        if let Some(dir) = self.missing_directory().await {
            tracing::info!("Nothing to generate: {} does not exist", dir.display());
            return Ok(Section::ALL
                .into_iter()
                .map(|section| SourceDocument {
                    section,
                    path: self.source_path(section),
                    text: Err(SkipReason::DirectoryMissing(dir.clone())),
                })
                .collect());
        }

        let mut documents = Vec::with_capacity(Section::ALL.len());
        for section in Section::ALL {
            let path = self.source_path(section);
            tracing::debug!("Reading {} source from {}", section, path.display());
            let text = self.read_source(&path).await;
            documents.push(SourceDocument {
                section,
                path,
                text,
            });
        }

        Ok(documents)
    }

    async fn transform(&self, documents: Vec<SourceDocument>) -> Result<TransformResult> {
        let outcomes = documents
            .into_iter()
            .map(|document| {
                let outcome = match document.text {
                    Ok(text) => validate_document(document.section, &text),
                    Err(SkipReason::Absent) => DocumentOutcome::Absent,
                    Err(reason) => DocumentOutcome::Malformed(reason),
                };

                let result = outcome
                    .into_result()
                    .and_then(|doc| render_document(&doc));

                match &result {
                    Ok(fragment) => tracing::debug!(
                        "Rendered {} ({} bytes)",
                        document.section,
                        fragment.content.len()
                    ),
                    Err(reason) if reason.is_malformed() => tracing::warn!(
                        "⚠️ Skipping {} ({}): {}",
                        document.section,
                        document.path.display(),
                        reason
                    ),
                    Err(reason) => tracing::debug!("Skipping {}: {}", document.section, reason),
                }

                SectionOutcome {
                    section: document.section,
                    result,
                }
            })
            .collect();

        Ok(TransformResult { outcomes })
    }

    async fn load(&self, result: TransformResult) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();

        for outcome in result.outcomes {
            let path = self.fragment_path(outcome.section);

            match outcome.result {
                Ok(fragment) if !fragment.content.is_empty() => {
                    match self
                        .storage
                        .write_file(&path, fragment.content.as_bytes())
                        .await
                    {
                        Ok(()) => {
                            tracing::info!("📝 Wrote {}", path.display());
                            report.written.push(path);
                        }
                        Err(e) => {
                            tracing::error!("❌ Failed to write {}: {}", path.display(), e);
                            report.failed.push((outcome.section, e.to_string()));
                        }
                    }
                }
                Ok(_) => report.skipped.push((outcome.section, SkipReason::EmptyContent)),
                Err(reason) => {
                    let can_prune = !matches!(reason, SkipReason::DirectoryMissing(_));
                    if can_prune && self.config.remove_stale() && self.storage.is_file(&path).await
                    {
                        match self.storage.remove_file(&path).await {
                            Ok(()) => {
                                tracing::info!("🗑️ Removed stale {}", path.display());
                                report.removed.push(path);
                            }
                            Err(e) => {
                                tracing::warn!("Could not remove {}: {}", path.display(), e)
                            }
                        }
                    }
                    report.skipped.push((outcome.section, reason));
                }
            }
        }

        Ok(report)
    }
}
