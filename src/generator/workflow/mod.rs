use crate::config::InterviewScope;
use crate::generator::context::GeneratorContext;
use crate::generator::outlet::ExcelOutlet;
use crate::generator::research::{
    InterviewConductor, PersonaSynthesizer, ReportGenerator, SufficiencyEvaluator,
};
use crate::types::{Interview, Persona, RunOutcome, StopReason};

use anyhow::Result;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{Instrument, info, info_span};

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: HashMap<&'static str, Instant>,
    phase_durations: HashMap<&'static str, Duration>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: HashMap::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &'static str) {
        self.phase_start_times.insert(phase_name, Instant::now());
    }

    /// 结束一个阶段的计时，同一阶段多次执行时累加
    pub fn end_phase(&mut self, phase_name: &'static str) -> Option<Duration> {
        let duration = self.phase_start_times.remove(phase_name)?.elapsed();
        *self.phase_durations.entry(phase_name).or_default() += duration;
        Some(duration)
    }

    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn get_phase_duration(&self, phase_name: &str) -> Option<Duration> {
        self.phase_durations.get(phase_name).copied()
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("各阶段执行时间:\n");
            for phase in TimingKeys::get_all_phase_keys() {
                if let Some(duration) = self.phase_durations.get(phase) {
                    report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
                }
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const SYNTHESIZE: &'static str = "synthesize";
    pub const INTERVIEW: &'static str = "interview";
    pub const EVALUATE: &'static str = "evaluate";
    pub const REPORT: &'static str = "report";
    pub const EXPORT: &'static str = "export";

    /// 获取所有阶段的键列表
    pub fn get_all_phase_keys() -> Vec<&'static str> {
        vec![
            Self::SYNTHESIZE,
            Self::INTERVIEW,
            Self::EVALUATE,
            Self::REPORT,
            Self::EXPORT,
        ]
    }
}

/// 运行阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// 继续收集访谈
    Collecting,
    /// 评估判定信息已充分
    Sufficient,
    /// 迭代次数用尽
    Exhausted,
    /// 报告与导出已完成
    Done,
}

/// 单次调研运行的累积状态，由一个 `RunController` 独占
#[derive(Debug, Clone)]
pub struct RunState {
    pub user_request: String,
    /// 全部轮次生成的画像，只追加
    pub personas: Vec<Persona>,
    /// 全部轮次的访谈，只追加
    pub interviews: Vec<Interview>,
    pub iteration: usize,
    /// 一旦为true不再回退
    pub is_information_sufficient: bool,
    pub max_iterations: usize,
    /// 最近一轮新生成画像在 `personas` 中的起始位置
    latest_batch_start: usize,
    finished: bool,
}

impl RunState {
    pub fn new(user_request: impl Into<String>, max_iterations: usize) -> Self {
        Self {
            user_request: user_request.into(),
            personas: Vec::new(),
            interviews: Vec::new(),
            iteration: 0,
            is_information_sufficient: false,
            max_iterations,
            latest_batch_start: 0,
            finished: false,
        }
    }

    pub fn phase(&self) -> RunPhase {
        if self.finished {
            RunPhase::Done
        } else if self.is_information_sufficient {
            RunPhase::Sufficient
        } else if self.iteration >= self.max_iterations {
            RunPhase::Exhausted
        } else {
            RunPhase::Collecting
        }
    }

    /// 最近一轮生成的画像
    pub fn latest_personas(&self) -> &[Persona] {
        &self.personas[self.latest_batch_start..]
    }

    fn push_batch(&mut self, batch: Vec<Persona>) {
        self.latest_batch_start = self.personas.len();
        self.personas.extend(batch);
        self.iteration += 1;
    }

    fn stop_reason(&self) -> StopReason {
        if self.is_information_sufficient {
            StopReason::Sufficient
        } else {
            StopReason::Exhausted
        }
    }
}

/// 调研运行控制器：驱动 画像生成 → 访谈 → 评估 的迭代，最后生成报告并导出
pub struct RunController {
    context: GeneratorContext,
    state: RunState,
    timing: TimingScope,
}

impl RunController {
    /// 创建控制器；配置不合法时直接返回错误
    pub fn new(context: GeneratorContext, user_request: impl Into<String>) -> Result<Self> {
        context.config.validate()?;
        let state = RunState::new(user_request, context.config.research.max_iterations);
        Ok(Self {
            context,
            state,
            timing: TimingScope::new(),
        })
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// 执行一轮迭代，返回本轮新增的访谈条数
    ///
    /// 仅在 `Collecting` 阶段有效，其余阶段直接返回0。
    pub async fn step(&mut self) -> Result<usize> {
        if self.state.phase() != RunPhase::Collecting {
            return Ok(0);
        }

        let research = &self.context.config.research;
        let round = self.state.iteration + 1;
        info!("🔄 第{}/{}轮调研开始", round, self.state.max_iterations);

        self.timing.start_phase(TimingKeys::SYNTHESIZE);
        let batch = PersonaSynthesizer
            .synthesize(
                &self.context,
                &self.state.user_request,
                research.subjects_per_iteration,
            )
            .await?;
        self.timing.end_phase(TimingKeys::SYNTHESIZE);
        self.state.push_batch(batch);

        let targets = match research.interview_scope {
            InterviewScope::Accumulated => self.state.personas.as_slice(),
            InterviewScope::LatestBatch => self.state.latest_personas(),
        };
        self.timing.start_phase(TimingKeys::INTERVIEW);
        let interviews = InterviewConductor
            .conduct(&self.context, &self.state.user_request, targets)
            .await?;
        self.timing.end_phase(TimingKeys::INTERVIEW);
        let added = interviews.len();
        self.state.interviews.extend(interviews);

        self.timing.start_phase(TimingKeys::EVALUATE);
        let evaluation = SufficiencyEvaluator
            .evaluate(
                &self.context,
                &self.state.user_request,
                &self.state.interviews,
            )
            .await?;
        self.timing.end_phase(TimingKeys::EVALUATE);
        if evaluation.is_sufficient {
            self.state.is_information_sufficient = true;
        }

        info!(
            "第{}轮结束：新增访谈{}条，累计{}条，阶段 {:?}",
            round,
            added,
            self.state.interviews.len(),
            self.state.phase()
        );
        Ok(added)
    }

    /// 迭代至终止条件，生成报告并导出Excel
    pub async fn run(mut self) -> Result<RunOutcome> {
        let run_id = uuid::Uuid::new_v4();
        let span = info_span!("research_run", %run_id);
        async move {
            info!("🚀 调研开始: {}", self.state.user_request);

            while self.state.phase() == RunPhase::Collecting {
                self.step().await?;
            }
            let stop_reason = self.state.stop_reason();

            self.timing.start_phase(TimingKeys::REPORT);
            let report = ReportGenerator
                .generate(
                    &self.context,
                    &self.state.user_request,
                    &self.state.interviews,
                )
                .await?;
            self.timing.end_phase(TimingKeys::REPORT);

            self.timing.start_phase(TimingKeys::EXPORT);
            let outlet = ExcelOutlet::new(&self.context.config.output_dir)?;
            let excel_path =
                outlet.export_interviews(&self.state.interviews, &self.state.user_request)?;
            self.timing.end_phase(TimingKeys::EXPORT);

            self.state.finished = true;
            info!(
                "✅ 调研完成（{}），共{}轮，{}条访谈\n{}",
                stop_reason,
                self.state.iteration,
                self.state.interviews.len(),
                self.timing.generate_timing_report()
            );

            Ok(RunOutcome {
                report,
                excel_path,
                personas: self.state.latest_personas().to_vec(),
                interviews: self.state.interviews,
                iterations: self.state.iteration,
                stop_reason,
            })
        }
        .instrument(span)
        .await
    }
}

/// 启动一次调研运行
pub async fn launch(context: &GeneratorContext, user_request: &str) -> Result<RunOutcome> {
    RunController::new(context.clone(), user_request)?.run().await
}
