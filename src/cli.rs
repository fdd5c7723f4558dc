//! 命令行参数

use crate::config::Config;
use crate::error::AppResult;
use crate::orchestrator::BatchPaths;
use clap::Parser;
use std::path::PathBuf;

/// 为列表中的每位参与者生成一份证书
#[derive(Debug, Parser)]
#[command(name = "certificate_batch", version, about)]
pub struct Cli {
    /// 证书模板 (*.svg)，包含 id 为占位符 id 的 text 元素
    pub template: PathBuf,

    /// 参与者列表 (*.txt)，每行一个名字
    pub participants: PathBuf,

    /// 输出目录
    #[arg(default_value = "Urkunden_generiert")]
    pub output: PathBuf,

    /// TOML 配置文件
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 同时处理的参与者数量
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// 等待全部任务完成的最长时间（秒）
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// 显示详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 合并配置：默认值 → 配置文件 → 环境变量 → 命令行
    pub fn load_config(&self) -> AppResult<Config> {
        let base = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        let mut config = base.with_env_overrides()?;

        if let Some(workers) = self.workers {
            config.max_workers = workers;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if self.verbose {
            config.verbose_logging = true;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn paths(&self) -> BatchPaths {
        BatchPaths {
            template: self.template.clone(),
            participants: self.participants.clone(),
            output_dir: self.output.clone(),
        }
    }
}
