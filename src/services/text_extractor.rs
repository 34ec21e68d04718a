//! 文本提取服务 - 业务能力层
//!
//! 按文件扩展名选择读取方式：
//! - `.txt` / 其他：UTF-8 解码，丢弃非法字节
//! - `.pdf`：逐页提取，每页前加页码标记
//! - `.docx`：按段落提取，标题段落转成 `###` 标题
//!
//! 提取结果为空不算错误，由调用方决定如何处理。

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::debug;

use crate::error::ExtractError;

/// 支持的文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Pdf,
    Docx,
}

impl FileKind {
    /// 根据文件名判断类型，未知扩展名按纯文本处理
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            FileKind::Pdf
        } else if lower.ends_with(".docx") {
            FileKind::Docx
        } else {
            FileKind::Text
        }
    }
}

/// 从上传文件中提取文本
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let kind = FileKind::from_filename(filename);
    debug!(filename, ?kind, size = bytes.len(), "提取文件文本");

    match kind {
        FileKind::Text => Ok(decode_utf8_ignore(bytes)),
        FileKind::Pdf => extract_pdf(bytes),
        FileKind::Docx => extract_docx(bytes),
    }
}

/// UTF-8 解码，非法字节直接丢弃（不替换成 U+FFFD）
pub fn decode_utf8_ignore(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract 遇到畸形文件可能直接 panic
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| ExtractError::Pdf("PDF 解析器异常退出".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    Ok(join_pdf_pages(&pages))
}

/// 每页加上 `=== PUSLAPIS n ===` 标记后拼接
pub fn join_pdf_pages(pages: &[String]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, txt)| format!("\n\n=== PUSLAPIS {} ===\n\n{}", i + 1, txt))
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    let paragraphs = parse_document_xml(&xml)?;
    Ok(render_paragraphs(&paragraphs))
}

/// 段落：文本 + 样式 ID
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    pub style: String,
}

impl Paragraph {
    fn is_heading(&self) -> bool {
        self.style.contains("Heading")
    }
}

/// 解析 `word/document.xml`，按顺序返回所有正文段落
///
/// 嵌套段落（文本框等）整体跳过，不影响外层段落。
pub fn parse_document_xml(xml: &str) -> Result<Vec<Paragraph>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<Paragraph> = None;
    // 当前所在段落的嵌套层数，只收集第 1 层
    let mut depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractError::Docx(e.to_string()))?;
        let outer = depth == 1;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    depth += 1;
                    if depth == 1 {
                        current = Some(Paragraph::default());
                    }
                }
                b"t" => in_text = true,
                b"pStyle" if outer => set_style(&mut current, &e)?,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"pStyle" if outer => set_style(&mut current, &e)?,
                b"tab" if outer => push_text(&mut current, "\t"),
                b"br" | b"cr" if outer => push_text(&mut current, "\n"),
                b"p" if depth == 0 => paragraphs.push(Paragraph::default()),
                _ => {}
            },
            Event::Text(t) if in_text && outer => {
                let text = t.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
                push_text(&mut current, &text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if depth == 1 {
                        if let Some(p) = current.take() {
                            paragraphs.push(p);
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn set_style(current: &mut Option<Paragraph>, e: &BytesStart<'_>) -> Result<(), ExtractError> {
    let Some(p) = current.as_mut() else {
        return Ok(());
    };
    let attr = e
        .try_get_attribute("w:val")
        .map_err(|err| ExtractError::Docx(err.to_string()))?;
    if let Some(attr) = attr {
        let value = attr
            .unescape_value()
            .map_err(|err| ExtractError::Docx(err.to_string()))?;
        p.style = value.into_owned();
    }
    Ok(())
}

fn push_text(current: &mut Option<Paragraph>, text: &str) {
    if let Some(p) = current.as_mut() {
        p.text.push_str(text);
    }
}

/// 段落拼接：跳过空段落，标题段落加 `###`
pub fn render_paragraphs(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .filter_map(|p| {
            let t = p.text.trim();
            if t.is_empty() {
                None
            } else if p.is_heading() {
                Some(format!("\n\n### {}\n", t))
            } else {
                Some(t.to_string())
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
