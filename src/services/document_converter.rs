//! 文档转换服务 - 业务能力层
//!
//! 只负责"中间文件 → 最终文件"能力，不关心名字和模板

use crate::error::{AppResult, ConversionError};
use crate::infrastructure::CommandExecutor;
use crate::models::OutputPair;
use crate::utils::fs::remove_file_if_exists;
use tokio::fs;
use tracing::{debug, warn};

/// 文档转换服务
///
/// 职责：
/// - 调用外部转换程序
/// - 检查退出状态和输出文件
/// - 无论成功与否都删除中间文件
pub struct DocumentConverter {
    executor: CommandExecutor,
}

impl DocumentConverter {
    /// 创建新的文档转换服务
    pub fn new(executor: CommandExecutor) -> Self {
        Self { executor }
    }

    /// 转换一个输出文件对
    pub async fn convert(&self, pair: &OutputPair) -> AppResult<()> {
        let result = self.run_conversion(pair).await;

        if let Err(e) = remove_file_if_exists(&pair.intermediate).await {
            // 转换本身的错误优先上报
            if result.is_ok() {
                return Err(e);
            }
            warn!("删除中间文件失败: {}", e);
        }

        result
    }

    async fn run_conversion(&self, pair: &OutputPair) -> AppResult<()> {
        self.executor
            .run(&pair.intermediate, &pair.final_document)
            .await?;

        if !fs::try_exists(&pair.final_document).await.unwrap_or(false) {
            return Err(ConversionError::OutputMissing {
                path: pair.final_document.clone(),
            }
            .into());
        }

        debug!("转换完成: {}", pair.final_document.display());
        Ok(())
    }
}
