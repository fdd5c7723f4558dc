//! 模板渲染服务 - 业务能力层
//!
//! 只负责"把名字写进模板"能力：复制模板、替换占位符文本、写回中间文件

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError, TemplateError};
use crate::models::OutputPair;
use crate::utils::fs::remove_file_if_exists;
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use quick_xml::writer::Writer;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const SVG_NS: &[u8] = b"http://www.w3.org/2000/svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Substitution {
    /// 还未找到占位符
    Searching,
    /// 已写入名字，正在丢弃 tspan 原有的前导文本
    Replacing,
    Done,
}

/// 替换模板中的占位符文本
///
/// 找到第一个 `svg:text[@id=placeholder_id]` 的直接子元素 `svg:tspan`，
/// 把它第一个子节点之前的文本替换为 `name`。其余内容原样输出，
/// 文档开头写入 XML 声明。
pub fn substitute_placeholder(
    xml: &str,
    placeholder_id: &str,
    name: &str,
) -> Result<Vec<u8>, TemplateError> {
    let mut reader = NsReader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + name.len()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    // 每个打开的元素是否为占位符 text 元素
    let mut open: Vec<bool> = Vec::new();
    let mut state = Substitution::Searching;

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        let in_svg_ns = matches!(ns, ResolveResult::Bound(Namespace(uri)) if uri == SVG_NS);
        let parent_is_placeholder = open.last().copied().unwrap_or(false);

        match event {
            Event::Eof => break,
            // 原有声明被开头写入的声明替代
            Event::Decl(_) => {}
            Event::Text(_) | Event::CData(_) if state == Substitution::Replacing => {}
            Event::Start(start) => {
                if state == Substitution::Replacing {
                    state = Substitution::Done;
                }
                let local = start.local_name();
                let is_target = state == Substitution::Searching
                    && parent_is_placeholder
                    && in_svg_ns
                    && local.as_ref() == b"tspan";
                let is_placeholder = !is_target
                    && in_svg_ns
                    && local.as_ref() == b"text"
                    && has_id(&start, placeholder_id)?;

                open.push(is_placeholder);
                writer.write_event(Event::Start(start))?;
                if is_target {
                    writer.write_event(Event::Text(BytesText::new(name)))?;
                    state = Substitution::Replacing;
                }
            }
            Event::Empty(start) => {
                if state == Substitution::Replacing {
                    state = Substitution::Done;
                }
                let is_target = state == Substitution::Searching
                    && parent_is_placeholder
                    && in_svg_ns
                    && start.local_name().as_ref() == b"tspan";

                if is_target {
                    // <tspan/> 展开为 <tspan>name</tspan>
                    let end = start.to_end().into_owned();
                    writer.write_event(Event::Start(start))?;
                    writer.write_event(Event::Text(BytesText::new(name)))?;
                    writer.write_event(Event::End(end))?;
                    state = Substitution::Done;
                } else {
                    writer.write_event(Event::Empty(start))?;
                }
            }
            Event::End(end) => {
                if state == Substitution::Replacing {
                    state = Substitution::Done;
                }
                open.pop();
                writer.write_event(Event::End(end))?;
            }
            other => {
                if state == Substitution::Replacing {
                    state = Substitution::Done;
                }
                writer.write_event(other)?;
            }
        }
    }

    if state == Substitution::Searching {
        return Err(TemplateError::PlaceholderNotFound {
            placeholder_id: placeholder_id.to_string(),
        });
    }

    Ok(writer.into_inner())
}

fn has_id(
    start: &quick_xml::events::BytesStart<'_>,
    placeholder_id: &str,
) -> Result<bool, TemplateError> {
    let attr = start
        .try_get_attribute("id")
        .map_err(quick_xml::Error::from)?;
    Ok(attr.is_some_and(|a| a.value.as_ref() == placeholder_id.as_bytes()))
}

/// 模板渲染服务
///
/// 职责：
/// - 删除同名的旧输出
/// - 把模板复制到中间文件并替换占位符
/// - 只处理单个参与者
pub struct TemplateRenderer {
    template_path: PathBuf,
    placeholder_id: String,
}

impl TemplateRenderer {
    /// 创建新的模板渲染服务
    pub fn new(template_path: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            template_path: template_path.into(),
            placeholder_id: config.placeholder_id.clone(),
        }
    }

    /// 为一个参与者渲染中间文件
    pub async fn render(&self, name: &str, pair: &OutputPair) -> AppResult<()> {
        remove_existing_outputs(name, pair).await?;

        fs::copy(&self.template_path, &pair.intermediate)
            .await
            .map_err(|source| {
                AppError::File(FileError::CopyFailed {
                    from: self.template_path.clone(),
                    to: pair.intermediate.clone(),
                    source,
                })
            })?;

        info!("生成证书: {}", name);

        if let Err(e) = self.substitute_in_place(name, &pair.intermediate).await {
            // 渲染失败时不留下半成品
            remove_file_if_exists(&pair.intermediate).await?;
            return Err(e);
        }

        Ok(())
    }

    async fn substitute_in_place(&self, name: &str, path: &Path) -> AppResult<()> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| AppError::file_read_failed(path, e))?;

        let rendered =
            substitute_placeholder(&content, &self.placeholder_id, name).map_err(|e| match e {
                TemplateError::ParseFailed { source, .. } => TemplateError::ParseFailed {
                    path: self.template_path.clone(),
                    source,
                },
                other => other,
            })?;

        fs::write(path, rendered)
            .await
            .map_err(|e| AppError::file_write_failed(path, e))?;

        debug!("已写入中间文件: {}", path.display());
        Ok(())
    }
}

/// 删除同名的旧中间文件和最终文件
async fn remove_existing_outputs(name: &str, pair: &OutputPair) -> AppResult<()> {
    let removed_intermediate = remove_file_if_exists(&pair.intermediate).await?;
    let removed_final = remove_file_if_exists(&pair.final_document).await?;
    if removed_intermediate || removed_final {
        info!("删除已存在的证书: {}", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutputAllocator;

    const TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd" width="297mm" height="210mm">
  <text id="Titel"><tspan>Urkunde</tspan></text>
  <text id="Teilnehmer" x="10" y="20"><tspan sodipodi:role="line" id="tspan1">Max Mustermann</tspan></text>
</svg>
"#;

    fn render(xml: &str, name: &str) -> Result<String, TemplateError> {
        substitute_placeholder(xml, "Teilnehmer", name)
            .map(|bytes| String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn test_substitutes_placeholder_text() {
        let out = render(TEMPLATE, "Alice").unwrap();
        assert!(out.contains(r#"id="tspan1">Alice</tspan>"#));
        assert!(!out.contains("Max Mustermann"));
        // 其他文本不受影响
        assert!(out.contains("<tspan>Urkunde</tspan>"));
        assert!(out.contains(r#"sodipodi:role="line""#));
    }

    #[test]
    fn test_writes_xml_declaration_once() {
        let out = render(TEMPLATE, "Alice").unwrap();
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert_eq!(out.matches("<?xml").count(), 1);
    }

    #[test]
    fn test_declaration_added_when_template_has_none() {
        let xml = r#"<svg xmlns="http://www.w3.org/2000/svg"><text id="Teilnehmer"><tspan>x</tspan></text></svg>"#;
        let out = render(xml, "Bob").unwrap();
        assert!(out.starts_with("<?xml"));
        assert!(out.contains("<tspan>Bob</tspan>"));
    }

    #[test]
    fn test_name_is_escaped() {
        let xml = r#"<svg xmlns="http://www.w3.org/2000/svg"><text id="Teilnehmer"><tspan>x</tspan></text></svg>"#;
        let out = render(xml, "Tom & Jerry <3").unwrap();
        assert!(out.contains("<tspan>Tom &amp; Jerry &lt;3</tspan>"));
    }

    #[test]
    fn test_empty_tspan_is_expanded() {
        let xml = r#"<svg xmlns="http://www.w3.org/2000/svg"><text id="Teilnehmer"><tspan id="t"/></text></svg>"#;
        let out = render(xml, "Alice").unwrap();
        assert!(out.contains(r#"<tspan id="t">Alice</tspan>"#));
    }

    #[test]
    fn test_only_leading_text_is_replaced() {
        let xml = r#"<svg xmlns="http://www.w3.org/2000/svg"><text id="Teilnehmer"><tspan>alt<tspan>innen</tspan>tail</tspan></text></svg>"#;
        let out = render(xml, "Neu").unwrap();
        assert!(out.contains("<tspan>Neu<tspan>innen</tspan>tail</tspan>"));
    }

    #[test]
    fn test_first_matching_tspan_only() {
        let xml = r#"<svg xmlns="http://www.w3.org/2000/svg"><text id="Teilnehmer"><tspan>a</tspan><tspan>b</tspan></text></svg>"#;
        let out = render(xml, "X").unwrap();
        assert!(out.contains("<tspan>X</tspan><tspan>b</tspan>"));
    }

    #[test]
    fn test_missing_placeholder_is_malformed() {
        let xml = r#"<svg xmlns="http://www.w3.org/2000/svg"><text id="Andere"><tspan>x</tspan></text></svg>"#;
        let err = render(xml, "Alice").unwrap_err();
        assert!(matches!(err, TemplateError::PlaceholderNotFound { .. }));
    }

    #[test]
    fn test_placeholder_without_tspan_is_malformed() {
        let xml = r#"<svg xmlns="http://www.w3.org/2000/svg"><text id="Teilnehmer">x</text></svg>"#;
        let err = render(xml, "Alice").unwrap_err();
        assert!(matches!(err, TemplateError::PlaceholderNotFound { .. }));
    }

    #[test]
    fn test_non_svg_namespace_is_ignored() {
        let xml = r#"<svg><text id="Teilnehmer"><tspan>x</tspan></text></svg>"#;
        let err = render(xml, "Alice").unwrap_err();
        assert!(matches!(err, TemplateError::PlaceholderNotFound { .. }));
    }

    #[test]
    fn test_prefixed_svg_namespace() {
        let xml = r#"<s:svg xmlns:s="http://www.w3.org/2000/svg"><s:text id="Teilnehmer"><s:tspan>x</s:tspan></s:text></s:svg>"#;
        let out = render(xml, "Alice").unwrap();
        assert!(out.contains("<s:tspan>Alice</s:tspan>"));
    }

    #[test]
    fn test_mismatched_tags_fail_to_parse() {
        let xml = r#"<svg xmlns="http://www.w3.org/2000/svg"><text id="Teilnehmer"><tspan>x</text></svg>"#;
        assert!(render(xml, "Alice").is_err());
    }

    #[tokio::test]
    async fn test_render_replaces_existing_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("vorlage.svg");
        std::fs::write(&template, TEMPLATE).unwrap();

        let config = Config::default();
        let pair = OutputAllocator::new(dir.path(), &config)
            .allocate("Bob")
            .unwrap();
        std::fs::write(&pair.final_document, b"alt").unwrap();

        let renderer = TemplateRenderer::new(&template, &config);
        renderer.render("Bob", &pair).await.unwrap();

        assert!(!pair.final_document.exists());
        let rendered = std::fs::read_to_string(&pair.intermediate).unwrap();
        assert!(rendered.contains(">Bob</tspan>"));
        // 模板本身不被修改
        assert_eq!(std::fs::read_to_string(&template).unwrap(), TEMPLATE);
    }

    #[tokio::test]
    async fn test_render_failure_removes_intermediate() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("vorlage.svg");
        std::fs::write(
            &template,
            r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#,
        )
        .unwrap();

        let config = Config::default();
        let pair = OutputAllocator::new(dir.path(), &config)
            .allocate("Alice")
            .unwrap();
        let err = TemplateRenderer::new(&template, &config)
            .render("Alice", &pair)
            .await
            .unwrap_err();

        assert!(err.is_template_malformed());
        assert!(!pair.intermediate.exists());
    }
}
