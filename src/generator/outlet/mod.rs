use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::types::Interview;

pub const INTERVIEW_SHEET: &str = "インタビュー結果";
pub const SUMMARY_SHEET: &str = "サマリー";
pub const REQUEST_SHEET: &str = "リクエスト";

/// 不带时间戳的默认导出文件名
pub const DEFAULT_EXPORT_FILENAME: &str = "interview_results.xlsx";

const INTERVIEW_HEADERS: [&str; 7] = ["名前", "背景", "年代", "性別", "ポジション", "質問", "回答"];
const AGE_BRACKETS: [&str; 5] = ["20代", "30代", "40代", "50代", "60代"];

/// Excel单元格可容纳的最大字符数
pub const MAX_CELL_CHARS: usize = 32_767;

/// 按性别和年代统计的访谈人数，以访谈条数计，同一画像被多次访谈时重复计数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemographicSummary {
    pub total: usize,
    pub male: usize,
    pub female: usize,
    /// 与 `AGE_BRACKETS` 一一对应
    pub by_age: [usize; 5],
}

impl DemographicSummary {
    pub fn from_interviews(interviews: &[Interview]) -> Self {
        let mut summary = Self {
            total: interviews.len(),
            ..Default::default()
        };
        for interview in interviews {
            match interview.persona.gender.as_str() {
                "男性" => summary.male += 1,
                "女性" => summary.female += 1,
                _ => {}
            }
            if let Some(index) = AGE_BRACKETS
                .iter()
                .position(|bracket| *bracket == interview.persona.age_bracket)
            {
                summary.by_age[index] += 1;
            }
        }
        summary
    }

    /// (項目, 人数) 行，顺序与表格一致
    pub fn rows(&self) -> Vec<(&'static str, usize)> {
        let mut rows = vec![
            ("調査対象数", self.total),
            ("男性", self.male),
            ("女性", self.female),
        ];
        rows.extend(AGE_BRACKETS.iter().copied().zip(self.by_age));
        rows
    }
}

/// Excel导出器
pub struct ExcelOutlet {
    output_dir: PathBuf,
}

impl ExcelOutlet {
    /// 创建导出器，输出目录不存在时自动创建
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("无法创建输出目录: {}", output_dir.display()))?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 以带时间戳的文件名导出，返回文件路径
    ///
    /// 同一秒内的多次导出依次加上 `_2`、`_3` 后缀，互不覆盖。
    pub fn export_interviews(&self, interviews: &[Interview], user_request: &str) -> Result<PathBuf> {
        let path = self.reserve_timestamped_path()?;
        if let Err(e) = self.export_to(&path, interviews, user_request) {
            let _ = fs::remove_file(&path);
            return Err(e);
        }
        Ok(path)
    }

    /// 以 `create_new` 占用文件名，保证并发导出拿到不同的路径
    fn reserve_timestamped_path(&self) -> Result<PathBuf> {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut attempt = 1;
        loop {
            let filename = match attempt {
                1 => format!("interview_results_{}.xlsx", stamp),
                n => format!("interview_results_{}_{}.xlsx", stamp, n),
            };
            let path = self.output_dir.join(filename);
            match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(path),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("无法创建导出文件: {}", path.display()));
                }
            }
        }
    }

    /// 以固定文件名导出
    pub fn export_default(&self, interviews: &[Interview], user_request: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(DEFAULT_EXPORT_FILENAME);
        self.export_to(&path, interviews, user_request)?;
        Ok(path)
    }

    pub fn export_to(&self, path: &Path, interviews: &[Interview], user_request: &str) -> Result<()> {
        let mut workbook = build_workbook(interviews, user_request)
            .context("构建Excel工作簿失败")?;
        workbook
            .save(path)
            .with_context(|| format!("Excel文件写入失败: {}", path.display()))?;

        info!(
            "💾 Excel导出完成: {}（{}条访谈）",
            path.display(),
            interviews.len()
        );
        Ok(())
    }
}

fn build_workbook(interviews: &[Interview], user_request: &str) -> Result<Workbook, XlsxError> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(INTERVIEW_SHEET)?;
    write_header(sheet, &INTERVIEW_HEADERS, &header)?;
    for (index, interview) in interviews.iter().enumerate() {
        let row = index as u32 + 1;
        let persona = &interview.persona;
        let cells = [
            persona.name.as_str(),
            persona.background.as_str(),
            persona.age_bracket.as_str(),
            persona.gender.as_str(),
            persona.role.as_str(),
            interview.question.as_str(),
            interview.answer.as_str(),
        ];
        for (col, value) in cells.iter().enumerate() {
            write_text(sheet, row, col as u16, value)?;
        }
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET)?;
    write_header(sheet, &["項目", "人数"], &header)?;
    let summary = DemographicSummary::from_interviews(interviews);
    for (index, (label, count)) in summary.rows().into_iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, label)?;
        sheet.write_number(row, 1, count as f64)?;
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name(REQUEST_SHEET)?;
    write_header(sheet, &["ユーザーリクエスト"], &header)?;
    write_text(sheet, 1, 0, user_request)?;

    Ok(workbook)
}

/// 写入文本单元格，超出上限的部分截断
fn write_text(sheet: &mut Worksheet, row: u32, col: u16, text: &str) -> Result<(), XlsxError> {
    sheet.write_string(row, col, fit_cell(text, row, col))?;
    Ok(())
}

fn fit_cell(text: &str, row: u32, col: u16) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!(
                "单元格({}, {})有{}个字符，截断为{}个",
                row,
                col,
                text.chars().count(),
                MAX_CELL_CHARS
            );
            &text[..cut]
        }
        None => text,
    }
}

fn write_header(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, format)?;
    }
    Ok(())
}
