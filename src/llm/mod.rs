//! 模型网关：调研各智能体访问LLM的唯一入口

pub mod client;
pub mod gateway;

#[cfg(test)]
pub mod testing;

pub use client::LLMClient;
pub use gateway::{GatewayError, ModelGateway, Prompt};
