pub mod clients;
pub mod config;
pub mod error;
pub mod processors;
pub mod suggestions;

pub use clients::{EngineError, SuggestionEngine};
pub use config::Config;
pub use error::{Result, TaskwiseError};
pub use processors::{ProcessorKind, ProcessorRegistry, REGISTRY};
pub use suggestions::{SuggestionGateway, SuggestionRequest, SuggestionResponse, TaskItem};
