use crate::core::{GenerationReport, Pipeline, TransformResult};
use crate::utils::error::Result;

/// Drives a [`Pipeline`] through extract, transform and load.
pub struct GeneratorEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> GeneratorEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<GenerationReport> {
        tracing::info!("Starting section generation...");

        let result = self.plan().await?;

        tracing::debug!("Writing fragments...");
        let report = self.pipeline.load(result).await?;
        tracing::info!(
            "Generated {} fragment(s), skipped {} section(s)",
            report.written.len(),
            report.skipped.len()
        );

        Ok(report)
    }

    /// Extract and transform without touching the output directory.
    pub async fn plan(&self) -> Result<TransformResult> {
        tracing::debug!("Reading source documents...");
        let documents = self.pipeline.extract().await?;
        tracing::debug!("Read {} source document(s)", documents.len());

        tracing::debug!("Rendering sections...");
        let result = self.pipeline.transform(documents).await?;
        tracing::debug!("Rendered {} fragment(s)", result.fragments().count());

        Ok(result)
    }
}
