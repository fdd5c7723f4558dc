//! 外部命令执行器 - 基础设施层
//!
//! 持有转换命令的定义，只暴露"执行一次转换命令"的能力

use crate::config::ConverterCommand;
use crate::error::ConversionError;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// 外部命令执行器
///
/// 职责：
/// - 持有转换程序和参数模板
/// - 插入输入输出路径并执行
/// - 检查退出状态，收集 stderr
/// - 不认识参与者，不处理文件清理
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    command: ConverterCommand,
}

impl CommandExecutor {
    /// 创建新的命令执行器
    pub fn new(command: ConverterCommand) -> Self {
        Self { command }
    }

    /// 生成本次调用的参数列表
    pub fn render_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.command
            .args
            .iter()
            .map(|arg| arg.replace("{input}", &input).replace("{output}", &output))
            .collect()
    }

    /// 执行转换命令
    ///
    /// 不经过 shell，参数原样传递；任务被取消时子进程随之终止
    pub async fn run(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let args = self.render_args(input, output);
        debug!("执行转换命令: {} {:?}", self.command.program, args);

        let result = Command::new(&self.command.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ConversionError::SpawnFailed {
                program: self.command.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ConversionError::Failed {
                exit_code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn sh(script: &str) -> CommandExecutor {
        CommandExecutor::new(ConverterCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        })
    }

    #[test]
    fn test_render_args_interpolates_paths() {
        let executor = CommandExecutor::new(ConverterCommand::default());
        let args = executor.render_args(
            Path::new("/out/Urkunde Alice.svg"),
            Path::new("/out/Urkunde Alice.pdf"),
        );
        assert_eq!(args[0], "/out/Urkunde Alice.svg");
        assert_eq!(args[4], "--export-filename=/out/Urkunde Alice.pdf");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_exit_is_ok() {
        assert_ok!(sh("exit 0").run(Path::new("in"), Path::new("out")).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_reports_code_and_stderr() {
        let err = assert_err!(
            sh("echo kaputt >&2; exit 3")
                .run(Path::new("in"), Path::new("out"))
                .await
        );
        match err {
            ConversionError::Failed { exit_code, stderr } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "kaputt");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_failure() {
        let executor = CommandExecutor::new(ConverterCommand {
            program: "definitely-not-an-installed-converter".to_string(),
            args: Vec::new(),
        });
        let err = assert_err!(executor.run(Path::new("in"), Path::new("out")).await);
        assert!(matches!(err, ConversionError::SpawnFailed { .. }));
    }
}
