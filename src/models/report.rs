//! 批量处理报告

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

/// 单个参与者的处理状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParticipantStatus {
    Success { output: PathBuf },
    Failed { error: String },
    TimedOut,
}

/// 单个参与者的处理结果
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantOutcome {
    /// 参与者在列表中的序号（从1开始）
    pub index: usize,
    pub name: String,
    #[serde(flatten)]
    pub status: ParticipantStatus,
}

impl ParticipantOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ParticipantStatus::Success { .. })
    }
}

/// 批量处理报告
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub timed_out: usize,
    /// 按参与者列表顺序排列
    pub outcomes: Vec<ParticipantOutcome>,
}

impl BatchReport {
    pub fn new(started_at: DateTime<Local>, mut outcomes: Vec<ParticipantOutcome>) -> Self {
        outcomes.sort_by_key(|o| o.index);
        let count = |f: fn(&ParticipantStatus) -> bool| {
            outcomes.iter().filter(|o| f(&o.status)).count()
        };
        let success = count(|s| matches!(s, ParticipantStatus::Success { .. }));
        let failed = count(|s| matches!(s, ParticipantStatus::Failed { .. }));
        let timed_out = count(|s| matches!(s, ParticipantStatus::TimedOut));

        Self {
            started_at,
            finished_at: Local::now(),
            total: outcomes.len(),
            success,
            failed,
            timed_out,
            outcomes,
        }
    }

    /// 所有参与者均处理成功
    pub fn all_succeeded(&self) -> bool {
        self.success == self.total
    }

    /// 失败或超时的参与者
    pub fn failures(&self) -> impl Iterator<Item = &ParticipantOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
