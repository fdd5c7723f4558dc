//! 证书处理上下文
//!
//! 封装"我正在处理列表中第几位参与者、写到哪里"这一信息

use crate::models::OutputPair;
use std::fmt::Display;

/// 证书处理上下文
#[derive(Debug, Clone)]
pub struct CertificateCtx {
    /// 参与者名称（原样写入模板）
    pub name: String,

    /// 参与者在列表中的索引（从1开始）
    pub index: usize,

    /// 参与者总数（仅用于日志显示）
    pub total: usize,

    /// 分配给该参与者的输出路径，批次内唯一
    pub pair: OutputPair,
}

impl CertificateCtx {
    /// 创建新的证书上下文
    pub fn new(name: impl Into<String>, index: usize, total: usize, pair: OutputPair) -> Self {
        Self {
            name: name.into(),
            index,
            total,
            pair,
        }
    }
}

impl Display for CertificateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{} {}]", self.index, self.total, self.name)
    }
}
