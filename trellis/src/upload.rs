//! Upload file list state.
//!
//! Tracks files through waiting, progress, success and failure. The
//! transport that drives these transitions lives with the host.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::events::ClickEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Waiting,
    Progress,
    Success,
    Fail,
}

/// A file in the upload list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadFile {
    pub uid: Uuid,
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    pub status: UploadStatus,
    /// Progress, 0 to 100.
    pub percent: u8,
    /// Server response of a finished upload.
    pub response: Option<Value>,
    /// Remote location once uploaded.
    pub url: Option<String>,
    pub upload_time: Option<DateTime<Utc>>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            uid: Uuid::new_v4(),
            name: name.into(),
            size,
            status: UploadStatus::Waiting,
            percent: 0,
            response: None,
            url: None,
            upload_time: None,
        }
    }
}

/// Request description handed to the host transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XhrOptions {
    pub action: String,
    pub with_credentials: bool,
    pub headers: HashMap<String, String>,
    /// Extra form fields sent with the file.
    pub data: Map<String, Value>,
    /// Form field name of the file.
    pub name: String,
}

impl XhrOptions {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            name: "file".to_string(),
            ..Default::default()
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = with_credentials;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressContext {
    pub file: UploadFile,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuccessContext {
    pub file: UploadFile,
    pub response: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    pub file: UploadFile,
    pub response: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveContext {
    pub index: usize,
    pub file: UploadFile,
    pub e: Option<ClickEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    Add(UploadFile),
    Progress(ProgressContext),
    Success(SuccessContext),
    Fail(ErrorContext),
    Remove(RemoveContext),
}

/// Ordered list of files being uploaded.
#[derive(Debug, Default)]
pub struct UploadList {
    files: Vec<UploadFile>,
    events: Vec<UploadEvent>,
}

impl UploadList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, uid: &Uuid) -> Option<&UploadFile> {
        self.files.iter().find(|f| &f.uid == uid)
    }

    pub fn index_of(&self, uid: &Uuid) -> Option<usize> {
        self.files.iter().position(|f| &f.uid == uid)
    }

    /// Append a file in the waiting state and return its uid.
    pub fn add(&mut self, file: UploadFile) -> Uuid {
        let uid = file.uid;
        self.events.push(UploadEvent::Add(file.clone()));
        self.files.push(file);
        uid
    }

    fn file_mut(&mut self, uid: &Uuid) -> Option<&mut UploadFile> {
        let file = self.files.iter_mut().find(|f| &f.uid == uid);
        if file.is_none() {
            debug!("UploadList: unknown file {}", uid);
        }
        file
    }

    /// Record upload progress; `percent` is clamped to 100.
    pub fn progress(&mut self, uid: &Uuid, percent: u32) {
        let percent = percent.min(100) as u8;
        let Some(file) = self.file_mut(uid) else {
            return;
        };
        file.status = UploadStatus::Progress;
        file.percent = percent;
        let ctx = ProgressContext {
            file: file.clone(),
            percent,
        };
        self.events.push(UploadEvent::Progress(ctx));
    }

    /// Mark a file uploaded. A `url` string in `response` becomes the file url.
    pub fn success(&mut self, uid: &Uuid, response: Value) {
        let Some(file) = self.file_mut(uid) else {
            return;
        };
        file.status = UploadStatus::Success;
        file.percent = 100;
        file.upload_time = Some(Utc::now());
        if let Some(url) = response.get("url").and_then(Value::as_str) {
            file.url = Some(url.to_string());
        }
        file.response = Some(response.clone());
        let ctx = SuccessContext {
            file: file.clone(),
            response,
        };
        self.events.push(UploadEvent::Success(ctx));
    }

    pub fn fail(&mut self, uid: &Uuid, response: Option<Value>) {
        let Some(file) = self.file_mut(uid) else {
            return;
        };
        warn!("UploadList: upload of '{}' failed", file.name);
        file.status = UploadStatus::Fail;
        file.response = response.clone();
        let ctx = ErrorContext {
            file: file.clone(),
            response,
        };
        self.events.push(UploadEvent::Fail(ctx));
    }

    /// Remove the file at `index`.
    pub fn remove(&mut self, index: usize, e: Option<ClickEvent>) -> Option<UploadFile> {
        if index >= self.files.len() {
            debug!("UploadList: remove index {} out of range", index);
            return None;
        }
        let file = self.files.remove(index);
        self.events.push(UploadEvent::Remove(RemoveContext {
            index,
            file: file.clone(),
            e,
        }));
        Some(file)
    }

    pub fn take_events(&mut self) -> Vec<UploadEvent> {
        std::mem::take(&mut self.events)
    }
}
