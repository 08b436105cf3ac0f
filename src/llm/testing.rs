//! 测试用的脚本化模型网关

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::generator::context::GeneratorContext;
use crate::llm::gateway::{GatewayError, ModelGateway, Prompt};

type Responder = Box<dyn Fn(&Prompt) -> String + Send + Sync>;

/// 按 `log_tag` 返回预设响应的网关
///
/// 同一标签下优先按顺序消费排队的响应；队列为空时使用该标签的responder；
/// 二者都没有时返回 `GatewayError::Provider`。
#[derive(Default)]
pub struct ScriptedGateway {
    queued: Mutex<HashMap<String, VecDeque<String>>>,
    responders: HashMap<String, Responder>,
    failing: Vec<String>,
    batch_limit: Option<usize>,
    calls: Mutex<Vec<Prompt>>,
    batches: Mutex<Vec<(String, usize)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<I, S>(self, tag: impl ToString, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queued
            .lock()
            .unwrap()
            .entry(tag.to_string())
            .or_default()
            .extend(responses.into_iter().map(Into::into));
        self
    }

    pub fn with_responder<F>(mut self, tag: impl ToString, responder: F) -> Self
    where
        F: Fn(&Prompt) -> String + Send + Sync + 'static,
    {
        self.responders.insert(tag.to_string(), Box::new(responder));
        self
    }

    /// 该标签下的调用总是失败
    pub fn failing_on(mut self, tag: impl ToString) -> Self {
        self.failing.push(tag.to_string());
        self
    }

    /// 批量调用最多返回 `limit` 条结果，用于模拟返回长度不足
    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = Some(limit);
        self
    }

    pub fn calls_for(&self, tag: impl ToString) -> usize {
        self.prompts_for(tag).len()
    }

    pub fn prompts_for(&self, tag: impl ToString) -> Vec<Prompt> {
        let tag = tag.to_string();
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|prompt| prompt.log_tag == tag)
            .cloned()
            .collect()
    }

    /// 每次批量调用的 (标签, 输入条数)
    pub fn batch_sizes_for(&self, tag: impl ToString) -> Vec<usize> {
        let tag = tag.to_string();
        self.batches
            .lock()
            .unwrap()
            .iter()
            .filter(|(batch_tag, _)| *batch_tag == tag)
            .map(|(_, size)| *size)
            .collect()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn complete(&self, prompt: &Prompt) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(prompt.clone());

        if self.failing.contains(&prompt.log_tag) {
            return Err(GatewayError::Provider(format!(
                "scripted failure for {}",
                prompt.log_tag
            )));
        }

        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&prompt.log_tag)
            .and_then(|queue| queue.pop_front());
        if let Some(response) = queued {
            return Ok(response);
        }

        match self.responders.get(&prompt.log_tag) {
            Some(responder) => Ok(responder(prompt)),
            None => Err(GatewayError::Provider(format!(
                "no scripted response for {}",
                prompt.log_tag
            ))),
        }
    }

    async fn complete_batch(&self, prompts: &[Prompt]) -> Result<Vec<String>, GatewayError> {
        if let Some(first) = prompts.first() {
            self.batches
                .lock()
                .unwrap()
                .push((first.log_tag.clone(), prompts.len()));
        }

        let mut results = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            results.push(self.complete(prompt).await?);
        }
        if let Some(limit) = self.batch_limit {
            results.truncate(limit);
        }
        Ok(results)
    }
}

/// 以默认配置和脚本化网关构建上下文，同时返回网关以便断言调用记录
pub fn context_with(gateway: ScriptedGateway) -> (GeneratorContext, Arc<ScriptedGateway>) {
    context_with_config(Config::default(), gateway)
}

pub fn context_with_config(
    config: Config,
    gateway: ScriptedGateway,
) -> (GeneratorContext, Arc<ScriptedGateway>) {
    let gateway = Arc::new(gateway);
    let context = GeneratorContext::with_gateway(config, gateway.clone());
    (context, gateway)
}
