//! 表单解析
//!
//! 同时接受 multipart/form-data 和 application/x-www-form-urlencoded。

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;
use std::collections::HashMap;

use crate::error::{AppError, RequestError};
use crate::models::Difficulty;

/// 上传的文件
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// 解析后的表单字段
#[derive(Debug, Default)]
pub struct FormFields {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl FormFields {
    /// 读取整个请求体
    pub async fn read(req: Request) -> Result<Self, AppError> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, &())
                .await
                .map_err(|e| RequestError::Multipart(e.to_string()))?;
            Self::from_multipart(multipart).await
        } else {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, &())
                .await
                .map_err(|e| RequestError::Multipart(e.to_string()))?;
            Ok(Self { fields, file: None })
        }
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| RequestError::Multipart(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(filename) = field.file_name().map(str::to_string) {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| RequestError::Multipart(e.to_string()))?;
                if name == "file" {
                    form.file = Some(UploadedFile {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| RequestError::Multipart(e.to_string()))?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn require(&self, name: &'static str) -> Result<&str, RequestError> {
        self.get(name).ok_or(RequestError::MissingField(name))
    }

    /// 题目数量：必须是正整数
    pub fn question_count(&self) -> Result<u32, RequestError> {
        let raw = self.require("question_count")?;
        let count: u32 = raw
            .trim()
            .parse()
            .map_err(|_| RequestError::invalid("question_count", format!("'{}' is not a positive integer", raw)))?;
        if count == 0 {
            return Err(RequestError::invalid("question_count", "must be at least 1"));
        }
        Ok(count)
    }

    /// 难度：缺省或未知值均为 medium
    pub fn difficulty(&self) -> Difficulty {
        self.get("difficulty")
            .map(Difficulty::parse_lenient)
            .unwrap_or_default()
    }

    pub fn take_file(&mut self) -> Result<UploadedFile, RequestError> {
        self.file.take().ok_or(RequestError::MissingField("file"))
    }
}
