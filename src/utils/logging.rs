/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use crate::config::Config;
use crate::models::BatchReport;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化全局日志（进程启动时调用一次）
///
/// `RUST_LOG` 优先，其次根据 `verbose` 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose {
        "certificate_batch=debug"
    } else {
        "certificate_batch=info"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, template: &Path, output_dir: &Path) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量证书生成");
    info!("📄 模板: {}", template.display());
    info!("📁 输出目录: {}", output_dir.display());
    info!("📊 最大并发数: {}", config.max_workers);
    info!("⏱️ 超时时间: {} 秒", config.timeout_secs);
    info!("{}", "=".repeat(60));
}

/// 记录参与者加载信息
pub fn log_participants_loaded(total: usize, max_workers: usize) {
    info!("✓ 找到 {} 位参与者", total);
    info!("📋 将以 {} 个并发任务处理\n", max_workers);
}

/// 打印最终统计信息
pub fn print_final_stats(report: &BatchReport, report_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!("完成时间: {}", report.finished_at.format("%Y-%m-%d %H:%M:%S"));
    info!(
        "耗时: {} 秒",
        (report.finished_at - report.started_at).num_seconds()
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.success, report.total);
    info!("❌ 失败: {}", report.failed);
    if report.timed_out > 0 {
        info!("⏱️ 超时: {}", report.timed_out);
    }
    for outcome in report.failures() {
        warn!(
            "  [{}] {}: {}",
            outcome.index,
            outcome.name,
            truncate_text(&failure_reason(&outcome.status), 200)
        );
    }
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_path.display());
}

fn failure_reason(status: &crate::models::ParticipantStatus) -> String {
    use crate::models::ParticipantStatus;
    match status {
        ParticipantStatus::Success { .. } => String::new(),
        ParticipantStatus::Failed { error } => error.clone(),
        ParticipantStatus::TimedOut => "超时".to_string(),
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
