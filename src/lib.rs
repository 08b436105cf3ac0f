pub mod cli;
pub mod config;
pub mod generator;
pub mod llm;
pub mod server;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use generator::context::GeneratorContext;
pub use generator::workflow::{RunController, launch};
pub use llm::{GatewayError, ModelGateway, Prompt};
pub use types::{Interview, Persona, RunOutcome, StopReason};
