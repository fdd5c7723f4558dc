use std::path::{Path, PathBuf};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 模板相关错误
    #[error("模板错误: {0}")]
    Template(#[from] TemplateError),
    /// 文档转换错误
    #[error("转换错误: {0}")]
    Conversion(#[from] ConversionError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 参与者名称无法用作文件名
    #[error("参与者名称无效: {name:?}")]
    InvalidParticipantName { name: String },
    /// 工作任务异常退出（panic 等）
    #[error("工作任务异常: {0}")]
    Worker(String),
    /// 报告序列化失败
    #[error("报告序列化失败: {0}")]
    Report(#[from] serde_json::Error),
}

/// 模板错误
#[derive(Debug, Error)]
pub enum TemplateError {
    /// 模板中没有 id 匹配的 text 元素，或其下没有 tspan 子元素
    #[error("模板格式错误: 未找到占位符 (text#{placeholder_id} > tspan)")]
    PlaceholderNotFound { placeholder_id: String },
    /// XML 解析失败
    #[error("XML 解析失败 ({}): {source}", .path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },
    /// XML 写回失败
    #[error("XML 序列化失败: {0}")]
    WriteFailed(#[from] std::io::Error),
}

impl From<quick_xml::Error> for TemplateError {
    fn from(err: quick_xml::Error) -> Self {
        TemplateError::ParseFailed {
            path: PathBuf::new(),
            source: err,
        }
    }
}

/// 转换命令错误
#[derive(Debug, Error)]
pub enum ConversionError {
    /// 外部程序无法启动（未安装或不在 PATH 中）
    #[error("无法启动转换程序 {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// 外部程序以非零状态退出
    #[error("转换失败 (退出码: {}): {stderr}", display_exit_code(.exit_code))]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },
    /// 外部程序成功退出但未生成输出文件
    #[error("转换程序未生成输出文件: {}", .path.display())]
    OutputMissing { path: PathBuf },
}

fn display_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "被信号终止".to_string(),
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {}", .path.display())]
    NotFound { path: PathBuf },
    /// 读取文件失败
    #[error("读取文件失败 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({}): {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 复制文件失败
    #[error("复制文件失败 ({} -> {}): {source}", .from.display(), .to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 删除文件失败
    #[error("删除文件失败 ({}): {source}", .path.display())]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 创建目录失败
    #[error("创建目录失败 ({}): {source}", .path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({}): {source}", .path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// 创建文件删除错误
    pub fn file_delete_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AppError::File(FileError::DeleteFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// 创建配置值错误
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Config(ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// 是否为模板缺少占位符的错误
    pub fn is_template_malformed(&self) -> bool {
        matches!(
            self,
            AppError::Template(TemplateError::PlaceholderNotFound { .. })
        )
    }

    /// 是否为转换失败（非零退出或缺少输出）
    pub fn is_conversion_failed(&self) -> bool {
        matches!(
            self,
            AppError::Conversion(ConversionError::Failed { .. })
                | AppError::Conversion(ConversionError::OutputMissing { .. })
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
