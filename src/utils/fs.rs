/// 文件系统辅助函数
use crate::error::{AppError, AppResult};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// 删除文件，文件不存在时不报错
///
/// # 返回
/// 文件存在并被删除时返回 `true`
pub async fn remove_file_if_exists(path: &Path) -> AppResult<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(AppError::file_delete_failed(path, e)),
    }
}

/// 确保目录存在
pub async fn ensure_dir(path: &Path) -> AppResult<()> {
    fs::create_dir_all(path).await.map_err(|source| {
        AppError::File(crate::error::FileError::CreateDirFailed {
            path: path.to_path_buf(),
            source,
        })
    })
}
