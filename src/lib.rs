//! # Certificate Batch
//!
//! 根据 SVG 模板和参与者列表批量生成证书的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部转换命令，只暴露能力
//! - `CommandExecutor` - 执行转换程序并检查退出状态
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单位参与者
//! - `TemplateRenderer` - 复制模板并替换占位符
//! - `DocumentConverter` - 转换中间文件并清理
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一位参与者"的完整处理流程
//! - `CertificateCtx` - 上下文封装（名字 + 序号）
//! - `CertificateFlow` - 流程编排（render → convert）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理器，管理并发、超时和报告

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, ConverterCommand};
pub use error::{AppError, AppResult};
pub use infrastructure::CommandExecutor;
pub use models::{BatchReport, OutputPair, ParticipantOutcome, ParticipantStatus};
pub use orchestrator::{App, BatchPaths};
pub use workflow::{CertificateCtx, CertificateFlow};
