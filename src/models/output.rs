//! 输出文件对
//!
//! 每个参与者对应一个中间文件（渲染后的 SVG）和一个最终文件（转换后的 PDF），
//! 文件名由前缀 + 参与者名称 + 扩展名拼接而成

use crate::config::Config;
use crate::error::{AppError, AppResult};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("静态正则表达式"))
}

/// 把参与者名称转换为可用的文件名片段
///
/// 路径分隔符和常见文件系统不允许的字符替换为 `_`，其余字符（包括首尾空格）保持不变
pub fn sanitize_file_stem(name: &str) -> AppResult<String> {
    let stem = unsafe_chars().replace_all(name, "_").into_owned();
    let trimmed = stem.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(AppError::InvalidParticipantName {
            name: name.to_string(),
        });
    }
    Ok(stem)
}

/// 单个参与者的输出文件路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPair {
    /// 渲染后的中间文件，转换后删除
    pub intermediate: PathBuf,
    /// 转换得到的最终文件
    pub final_document: PathBuf,
}

impl OutputPair {
    fn from_stem(output_dir: &Path, stem: &str, config: &Config) -> Self {
        Self {
            intermediate: output_dir.join(format!("{}.{}", stem, config.intermediate_extension)),
            final_document: output_dir.join(format!("{}.{}", stem, config.output_extension)),
        }
    }
}

/// 为一批参与者分配互不冲突的输出路径
///
/// 重名或清理后同名的参与者依次加后缀 ` (2)`、` (3)`…，
/// 比较时不区分大小写，避免在大小写不敏感的文件系统上互相覆盖
pub struct OutputAllocator<'a> {
    output_dir: &'a Path,
    config: &'a Config,
    used: HashSet<String>,
}

impl<'a> OutputAllocator<'a> {
    pub fn new(output_dir: &'a Path, config: &'a Config) -> Self {
        Self {
            output_dir,
            config,
            used: HashSet::new(),
        }
    }

    /// 为下一位参与者分配路径，按列表顺序调用
    pub fn allocate(&mut self, name: &str) -> AppResult<OutputPair> {
        let base = format!("{}{}", self.config.file_prefix, sanitize_file_stem(name)?);
        let mut stem = base.clone();
        let mut n = 1;
        while !self.used.insert(stem.to_lowercase()) {
            n += 1;
            stem = format!("{} ({})", base, n);
        }
        if n > 1 {
            warn!("输出文件名冲突: {:?} 改用 {:?}", name, stem);
        }
        Ok(OutputPair::from_stem(self.output_dir, &stem, self.config))
    }
}
