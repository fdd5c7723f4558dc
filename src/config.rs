use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 外部转换命令
///
/// 参数中的 `{input}` / `{output}` 会被替换为中间文件和最终文件的路径
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ConverterCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ConverterCommand {
    fn default() -> Self {
        Self {
            program: "inkscape".to_string(),
            args: vec![
                "{input}".to_string(),
                "--export-area-page".to_string(),
                "--batch-process".to_string(),
                "--export-type=pdf".to_string(),
                "--export-filename={output}".to_string(),
            ],
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 同时处理的参与者数量
    pub max_workers: usize,
    /// 等待全部任务完成的最长时间（秒）
    pub timeout_secs: u64,
    /// 模板中占位符 text 元素的 id
    pub placeholder_id: String,
    /// 输出文件名前缀
    pub file_prefix: String,
    /// 中间文件扩展名
    pub intermediate_extension: String,
    /// 最终文件扩展名
    pub output_extension: String,
    /// 转换命令
    pub converter: ConverterCommand,
    /// 报告文件名（写入输出目录）
    pub report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_workers: 4,
            timeout_secs: 60 * 10,
            placeholder_id: "Teilnehmer".to_string(),
            file_prefix: "Urkunde ".to_string(),
            intermediate_extension: "svg".to_string(),
            output_extension: "pdf".to_string(),
            converter: ConverterCommand::default(),
            report_file: "Urkunden_report.json".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载，缺省字段使用默认值
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AppError::file_read_failed(path, e))?;
        toml::from_str(&content).map_err(|source| {
            AppError::Config(ConfigError::TomlParseFailed {
                path: path.to_path_buf(),
                source,
            })
        })
    }

    /// 用 `CERT_*` 环境变量覆盖当前配置
    pub fn with_env_overrides(self) -> AppResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        if let Some(v) = parse_var(&lookup, "CERT_MAX_WORKERS", "usize")? {
            self.max_workers = v;
        }
        if let Some(v) = parse_var(&lookup, "CERT_TIMEOUT_SECS", "u64")? {
            self.timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "CERT_VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        if let Some(v) = lookup("CERT_PLACEHOLDER_ID") {
            self.placeholder_id = v;
        }
        if let Some(v) = lookup("CERT_FILE_PREFIX") {
            self.file_prefix = v;
        }
        if let Some(v) = lookup("CERT_CONVERTER_PROGRAM") {
            self.converter.program = v;
        }
        Ok(self)
    }

    /// 检查配置值
    pub fn validate(&self) -> AppResult<()> {
        if self.max_workers == 0 {
            return Err(AppError::invalid_config("max_workers", "必须大于 0"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::invalid_config("timeout_secs", "必须大于 0"));
        }
        if self.placeholder_id.is_empty() {
            return Err(AppError::invalid_config("placeholder_id", "不能为空"));
        }
        if self.converter.program.is_empty() {
            return Err(AppError::invalid_config("converter.program", "不能为空"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &str,
) -> AppResult<Option<T>> {
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value.trim().parse().map(Some).map_err(|_| {
            AppError::Config(ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            })
        }),
    }
}
