pub mod etl;
pub mod pipeline;
pub mod render;
pub mod schema;

pub use crate::domain::model::{
    Fragment, GenerationReport, Section, SectionDocument, SectionOutcome, SkipReason,
    SourceDocument, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
