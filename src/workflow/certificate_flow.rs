//! 证书处理流程 - 流程层
//!
//! 核心职责：定义"一位参与者"的完整处理流程
//!
//! 流程顺序：
//! 1. 渲染模板 → 中间文件
//! 2. 转换 → 最终文件（删除中间文件）
//!
//! 输出路径由编排层预先分配，随上下文传入

use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::CommandExecutor;
use crate::services::{DocumentConverter, TemplateRenderer};
use crate::workflow::certificate_ctx::CertificateCtx;

/// 证书处理流程
///
/// - 编排渲染和转换
/// - 不持有任何共享可变状态，可以在多个任务间共享（`Arc`）
/// - 只依赖业务能力（services）
pub struct CertificateFlow {
    renderer: TemplateRenderer,
    converter: DocumentConverter,
}

impl CertificateFlow {
    /// 创建新的证书处理流程
    pub fn new(template_path: &Path, config: &Config) -> Self {
        Self {
            renderer: TemplateRenderer::new(template_path, config),
            converter: DocumentConverter::new(CommandExecutor::new(config.converter.clone())),
        }
    }

    /// 处理一位参与者，成功时返回最终文件路径
    pub async fn run(&self, ctx: &CertificateCtx) -> AppResult<PathBuf> {
        match self.generate(ctx).await {
            Ok(path) => {
                info!("{} ✓ 证书已生成: {}", ctx, path.display());
                Ok(path)
            }
            Err(e) => {
                error!("{} ❌ 证书生成失败: {}", ctx, e);
                Err(e)
            }
        }
    }

    async fn generate(&self, ctx: &CertificateCtx) -> AppResult<PathBuf> {
        self.renderer.render(&ctx.name, &ctx.pair).await?;
        self.converter.convert(&ctx.pair).await?;

        Ok(ctx.pair.final_document.clone())
    }
}
