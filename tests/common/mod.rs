//! 集成测试共用的夹具

#![allow(dead_code)]

use certificate_batch::{Config, ConverterCommand};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd" width="297mm" height="210mm">
  <text id="Titel" x="10" y="10"><tspan>Urkunde</tspan></text>
  <text id="Teilnehmer" x="10" y="40"><tspan sodipodi:role="line" id="tspan42">Max Mustermann</tspan></text>
</svg>
"#;

pub const TEMPLATE_WITHOUT_PLACEHOLDER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg"><text id="Titel"><tspan>Urkunde</tspan></text></svg>
"#;

/// 临时工作目录：模板、参与者列表、输出目录
pub struct Workspace {
    pub dir: TempDir,
    pub template: PathBuf,
    pub participants: PathBuf,
    pub output_dir: PathBuf,
}

impl Workspace {
    pub fn new(template: &str, participants: &str) -> Self {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let template_path = dir.path().join("urkunde.svg");
        let participants_path = dir.path().join("teilnehmer.txt");
        fs::write(&template_path, template).unwrap();
        fs::write(&participants_path, participants).unwrap();

        Self {
            output_dir: dir.path().join("Urkunden_generiert"),
            template: template_path,
            participants: participants_path,
            dir,
        }
    }

    pub fn paths(&self) -> certificate_batch::BatchPaths {
        certificate_batch::BatchPaths {
            template: self.template.clone(),
            participants: self.participants.clone(),
            output_dir: self.output_dir.clone(),
        }
    }

    /// 输出目录中指定扩展名的文件名（排序后）
    pub fn files_with_extension(&self, ext: &str) -> Vec<String> {
        files_with_extension(&self.output_dir, ext)
    }
}

pub fn files_with_extension(dir: &Path, ext: &str) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some(ext))
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// 用 `cp` 代替真实转换程序：最终文件就是渲染后的 SVG
pub fn copying_config() -> Config {
    config_with(ConverterCommand {
        program: "cp".to_string(),
        args: vec!["{input}".to_string(), "{output}".to_string()],
    })
}

/// 用 `sh -c` 运行任意脚本作为转换程序
pub fn shell_config(script: &str) -> Config {
    config_with(ConverterCommand {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
    })
}

/// 用 `sh -c` 运行脚本，中间文件和最终文件路径分别作为 `$0` / `$1` 传入
pub fn shell_config_with_paths(script: &str) -> Config {
    config_with(ConverterCommand {
        program: "sh".to_string(),
        args: vec![
            "-c".to_string(),
            script.to_string(),
            "{input}".to_string(),
            "{output}".to_string(),
        ],
    })
}

fn config_with(converter: ConverterCommand) -> Config {
    Config {
        converter,
        ..Config::default()
    }
}
