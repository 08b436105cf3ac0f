use crate::config::{Config, DEFAULT_CONFIG_FILE, InterviewScope, LLMProvider};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// persona-research - 由LLM驱动的画像访谈式市场调研引擎
#[derive(Parser, Debug)]
#[command(name = "persona-research")]
#[command(
    about = "Synthesizes consumer personas, simulates interviews with them, and writes a market research report with a spreadsheet export."
)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Excel输出目录
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// 每轮生成的画像数
    #[arg(short = 'k', long = "subjects", global = true)]
    pub subjects_per_iteration: Option<usize>,

    /// 最大迭代轮数
    #[arg(long, global = true)]
    pub max_iterations: Option<usize>,

    /// 每轮访谈范围 (accumulated, latest_batch)
    #[arg(long, global = true)]
    pub interview_scope: Option<InterviewScope>,

    /// LLM Provider (openai, deepseek, anthropic, ollama)
    #[arg(long, global = true)]
    pub llm_provider: Option<LLMProvider>,

    /// LLM API KEY
    #[arg(long, global = true)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long, global = true)]
    pub llm_api_base_url: Option<String>,

    /// 模型名称
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// 温度参数
    #[arg(long, global = true)]
    pub temperature: Option<f64>,

    /// 最大tokens数
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    /// 批量调用的最大并发数
    #[arg(long, global = true)]
    pub max_parallels: Option<usize>,

    /// 单次模型调用超时秒数
    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    /// 是否启用详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// 针对一条调研需求执行完整流程，结果以JSON输出
    Run {
        /// 调研需求
        #[arg(short, long)]
        request: String,
    },
    /// 启动HTTP服务
    Serve {
        /// 监听地址，覆盖配置文件
        #[arg(short, long)]
        bind: Option<String>,
    },
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = if let Some(config_path) = &self.config {
            // 显式指定的配置文件必须可读
            Config::from_file(config_path)
                .with_context(|| format!("无法读取配置文件 {:?}", config_path))?
        } else {
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_CONFIG_FILE);

            if default_config_path.exists() {
                Config::from_file(&default_config_path).with_context(|| {
                    format!("无法读取默认配置文件 {:?}", default_config_path)
                })?
            } else {
                Config::default()
            }
        };

        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }

        // 调研参数
        if let Some(k) = self.subjects_per_iteration {
            config.research.subjects_per_iteration = k;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.research.max_iterations = max_iterations;
        }
        if let Some(scope) = self.interview_scope {
            config.research.interview_scope = scope;
        }

        // 覆盖LLM配置
        if let Some(provider) = self.llm_provider {
            config.llm.provider = provider;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.llm.max_parallels = max_parallels;
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            config.llm.timeout_seconds = timeout_seconds;
        }

        if let Command::Serve { bind: Some(bind) } = self.command {
            config.server.bind_address = bind;
        }
        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }
}
