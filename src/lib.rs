//! Classify bank transactions into caller-defined categories with a
//! text-completion model.

pub mod classifier;
pub mod completion;
pub mod config;
pub mod error;
pub mod openai;
pub mod server;
pub mod types;

pub use classifier::{Classifier, build_prompt};
pub use completion::CompletionClient;
pub use error::{CompletionError, ServiceError, ServiceResponse};
pub use types::ClassificationResult;
