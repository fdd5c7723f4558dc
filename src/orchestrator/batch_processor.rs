//! 批量证书处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：解析绝对路径、创建输出目录、检查模板
//! 2. **批量加载**：读取参与者列表（`Vec<String>`）
//! 3. **并发控制**：使用 Semaphore 限制同时运行的任务数
//! 4. **全局超时**：超过期限的任务被终止并记为超时
//! 5. **全局统计**：汇总每位参与者的结果，写入报告文件
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个证书的细节
//! - **延迟执行**：每个任务是捕获输入的 future，由 tokio::spawn 真正并发执行
//! - **向下委托**：委托 CertificateFlow 处理单位参与者

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::models::{
    load_participants, BatchReport, OutputAllocator, ParticipantOutcome, ParticipantStatus,
};
use crate::utils::fs::{ensure_dir, remove_file_if_exists};
use crate::utils::logging::{log_participants_loaded, log_startup, print_final_stats};
use crate::workflow::{CertificateCtx, CertificateFlow};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// 命令行传入的三个路径
#[derive(Debug, Clone)]
pub struct BatchPaths {
    pub template: PathBuf,
    pub participants: PathBuf,
    pub output_dir: PathBuf,
}

/// 已提交的参与者任务
enum Task {
    Running(CertificateCtx, JoinHandle<AppResult<PathBuf>>),
    /// 无法分配输出路径，未启动
    Rejected {
        index: usize,
        name: String,
        error: AppError,
    },
}

/// 应用主结构
pub struct App {
    config: Config,
    paths: BatchPaths,
}

impl App {
    /// 初始化应用
    ///
    /// 所有路径解析为绝对路径，输出目录不存在时创建
    pub async fn initialize(config: Config, paths: BatchPaths) -> AppResult<Self> {
        config.validate()?;

        let template = canonicalize_existing(&paths.template).await?;
        let participants = canonicalize_existing(&paths.participants).await?;

        ensure_dir(&paths.output_dir).await?;
        let output_dir = canonicalize_existing(&paths.output_dir).await?;

        log_startup(&config, &template, &output_dir);

        Ok(Self {
            config,
            paths: BatchPaths {
                template,
                participants,
                output_dir,
            },
        })
    }

    pub fn paths(&self) -> &BatchPaths {
        &self.paths
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<BatchReport> {
        let started_at = Local::now();

        info!("\n📁 正在读取参与者列表...");
        let participants = load_participants(&self.paths.participants).await?;

        if participants.is_empty() {
            warn!("⚠️ 参与者列表为空，没有需要生成的证书");
        } else {
            log_participants_loaded(participants.len(), self.config.max_workers);
        }

        let outcomes = self.process_all(participants).await;
        let report = BatchReport::new(started_at, outcomes);

        let report_path = self.write_report(&report).await?;
        print_final_stats(&report, &report_path);

        Ok(report)
    }

    /// 处理所有参与者
    async fn process_all(&self, participants: Vec<String>) -> Vec<ParticipantOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_workers));
        let flow = Arc::new(CertificateFlow::new(&self.paths.template, &self.config));
        let mut allocator = OutputAllocator::new(&self.paths.output_dir, &self.config);
        let total = participants.len();
        let mut tasks = Vec::with_capacity(total);

        for (idx, name) in participants.into_iter().enumerate() {
            // 输出路径按列表顺序分配，任务之间不会共享文件
            let pair = match allocator.allocate(&name) {
                Ok(pair) => pair,
                Err(e) => {
                    error!("[{}/{} {}] ❌ 证书生成失败: {}", idx + 1, total, name, e);
                    tasks.push(Task::Rejected {
                        index: idx + 1,
                        name,
                        error: e,
                    });
                    continue;
                }
            };

            let ctx = CertificateCtx::new(name, idx + 1, total, pair);
            let task_ctx = ctx.clone();
            let semaphore = semaphore.clone();
            let flow = flow.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::Worker(e.to_string()))?;
                info!("{} 开始处理", task_ctx);
                flow.run(&task_ctx).await
            });
            tasks.push(Task::Running(ctx, handle));
        }

        let deadline = Instant::now() + self.config.timeout();
        let mut outcomes = Vec::with_capacity(total);

        for task in tasks {
            let (ctx, mut handle) = match task {
                Task::Running(ctx, handle) => (ctx, handle),
                Task::Rejected { index, name, error } => {
                    outcomes.push(ParticipantOutcome {
                        index,
                        name,
                        status: ParticipantStatus::Failed {
                            error: error.to_string(),
                        },
                    });
                    continue;
                }
            };

            let waited = tokio::time::timeout_at(deadline, &mut handle).await;
            let status = match waited {
                Ok(Ok(Ok(output))) => ParticipantStatus::Success { output },
                Ok(Ok(Err(e))) => ParticipantStatus::Failed {
                    error: e.to_string(),
                },
                Ok(Err(join_err)) => {
                    error!("{} 任务执行失败: {}", ctx, join_err);
                    ParticipantStatus::Failed {
                        error: AppError::Worker(join_err.to_string()).to_string(),
                    }
                }
                Err(_) => {
                    handle.abort();
                    // 等待任务真正结束后再清理文件
                    if let Err(e) = handle.await {
                        debug!("{} 任务已取消: {}", ctx, e);
                    }
                    warn!("{} ⏱️ 超时，任务已终止", ctx);
                    cleanup_outputs(&ctx).await;
                    ParticipantStatus::TimedOut
                }
            };

            outcomes.push(ParticipantOutcome {
                index: ctx.index,
                name: ctx.name,
                status,
            });
        }

        outcomes
    }

    /// 写入 JSON 报告
    async fn write_report(&self, report: &BatchReport) -> AppResult<PathBuf> {
        let path = self.paths.output_dir.join(&self.config.report_file);
        let json = report.to_json()?;
        fs::write(&path, json)
            .await
            .map_err(|e| AppError::file_write_failed(&path, e))?;
        Ok(path)
    }
}

/// 删除超时任务留下的中间文件和不完整的最终文件
async fn cleanup_outputs(ctx: &CertificateCtx) {
    for path in [&ctx.pair.intermediate, &ctx.pair.final_document] {
        if let Err(e) = remove_file_if_exists(path).await {
            warn!("{} 清理输出文件失败: {}", ctx, e);
        }
    }
}

async fn canonicalize_existing(path: &Path) -> AppResult<PathBuf> {
    fs::canonicalize(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::File(FileError::NotFound {
            path: path.to_path_buf(),
        }),
        _ => AppError::file_read_failed(path, e),
    })
}
