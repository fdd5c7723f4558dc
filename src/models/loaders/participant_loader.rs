use crate::error::{AppError, AppResult, FileError};
use std::path::Path;
use tokio::fs;

/// 从文本中解析参与者列表
///
/// 每行一个名称，去掉行尾空白，忽略空行，保持原有顺序
pub fn parse_participants(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 从文件加载参与者列表
pub async fn load_participants(path: &Path) -> AppResult<Vec<String>> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(AppError::File(FileError::NotFound {
            path: path.to_path_buf(),
        }));
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path, e))?;

    let participants = parse_participants(&content);
    tracing::info!(
        "已加载参与者列表: {} ({} 人)",
        path.display(),
        participants.len()
    );

    Ok(participants)
}
