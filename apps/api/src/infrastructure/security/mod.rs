pub mod identifier;
pub mod pipeline;
pub mod redaction;
pub mod sanitizer;
pub mod validation;

pub use identifier::{IdentifierError, IdentifierValidator};
pub use pipeline::{PipelineRejection, PipelineStage, PipelineState, ValidationPipeline};
pub use validation::{
    CommentField, FieldViolation, ValidationConfig, ValidationResult, ValidationService,
};
