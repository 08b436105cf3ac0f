#[cfg(test)]
mod tests {
    use crate::config::{
        Config, ConfigError, InterviewScope, LLMConfig, LLMProvider, ResearchConfig,
        ServerConfig,
    };
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.research.subjects_per_iteration, 10);
        assert_eq!(config.research.max_iterations, 2);
        assert_eq!(config.research.interview_scope, InterviewScope::Accumulated);
        assert!(!config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_llm_provider_default() {
        let provider = LLMProvider::default();
        assert_eq!(provider, LLMProvider::OpenAI);
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!(
            "openai".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenAI
        );
        assert_eq!(
            "DeepSeek".parse::<LLMProvider>().unwrap(),
            LLMProvider::DeepSeek
        );
        assert_eq!(
            "anthropic".parse::<LLMProvider>().unwrap(),
            LLMProvider::Anthropic
        );
        assert_eq!(
            "ollama".parse::<LLMProvider>().unwrap(),
            LLMProvider::Ollama
        );

        assert!("invalid".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_llm_provider_display() {
        assert_eq!(LLMProvider::OpenAI.to_string(), "openai");
        assert_eq!(LLMProvider::DeepSeek.to_string(), "deepseek");
        assert_eq!(LLMProvider::Anthropic.to_string(), "anthropic");
        assert_eq!(LLMProvider::Ollama.to_string(), "ollama");
    }

    #[test]
    fn test_interview_scope_from_str() {
        assert_eq!(
            "accumulated".parse::<InterviewScope>().unwrap(),
            InterviewScope::Accumulated
        );
        assert_eq!(
            "latest-batch".parse::<InterviewScope>().unwrap(),
            InterviewScope::LatestBatch
        );
        assert_eq!(
            "latest".parse::<InterviewScope>().unwrap(),
            InterviewScope::LatestBatch
        );
        assert!("sometimes".parse::<InterviewScope>().is_err());
        assert_eq!(InterviewScope::LatestBatch.to_string(), "latest_batch");
    }

    #[test]
    fn test_llm_config_default() {
        let config = LLMConfig::default();

        assert_eq!(config.provider, LLMProvider::OpenAI);
        assert_eq!(config.model, "gpt-4-turbo-preview");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.timeout_seconds, 120);
        assert_eq!(config.max_parallels, 5);
        assert_eq!(config.api_base_url, "");
    }

    #[test]
    fn test_resolved_base_url() {
        let mut config = LLMConfig::default();
        assert_eq!(config.resolved_base_url(), "https://api.openai.com/v1");

        config.provider = LLMProvider::Ollama;
        assert_eq!(config.resolved_base_url(), "http://localhost:11434");

        config.api_base_url = " http://gpu-box:11434/ ".to_string();
        assert_eq!(config.resolved_base_url(), "http://gpu-box:11434");
    }

    #[test]
    fn test_research_and_server_defaults() {
        let research = ResearchConfig::default();
        assert_eq!(research.subjects_per_iteration, 10);
        assert_eq!(research.max_iterations, 2);

        let server = ServerConfig::default();
        assert_eq!(server.bind_address, "0.0.0.0:8000");
    }

    #[test]
    fn test_from_file_partial_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("persona-research.toml");

        let content = r#"output_dir = "reports"

[research]
subjects_per_iteration = 4
interview_scope = "latest_batch"

[llm]
provider = "deepseek"
model = "deepseek-chat"
temperature = 0.3
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.research.subjects_per_iteration, 4);
        assert_eq!(config.research.max_iterations, 2);
        assert_eq!(config.research.interview_scope, InterviewScope::LatestBatch);
        assert_eq!(config.llm.provider, LLMProvider::DeepSeek);
        assert_eq!(config.llm.model, "deepseek-chat");
        assert_eq!(config.llm.temperature, 0.3);
        assert_eq!(config.llm.max_parallels, 5);
        assert_eq!(config.server.bind_address, "0.0.0.0:8000");
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file(&PathBuf::from("/nonexistent/persona-research.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "[research\nmax_iterations = ").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = Config::default();
        config.research.subjects_per_iteration = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoSubjects));

        let mut config = Config::default();
        config.research.max_iterations = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoIterations));

        let mut config = Config::default();
        config.llm.max_parallels = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoParallelism));
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = Config::default();
        config.llm.temperature = 2.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TemperatureOutOfRange(2.5))
        );

        config.llm.temperature = 0.0;
        assert!(config.validate().is_ok());
    }
}
