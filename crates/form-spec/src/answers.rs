use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Answers keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    values: BTreeMap<String, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.values.insert(question_id.into(), value.into());
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.values.get(question_id).map(String::as_str)
    }

    pub fn remove(&mut self, question_id: &str) -> Option<String> {
        self.values.remove(question_id)
    }

    /// An empty string counts as unanswered.
    pub fn is_answered(&self, question_id: &str) -> bool {
        self.get(question_id).is_some_and(|value| !value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        serde_cbor::to_vec(self)
    }
}

impl FromIterator<(String, String)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A file picked for a file question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        Ok(Self {
            content_type: guess_content_type(&name).map(String::from),
            name,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

fn guess_content_type(name: &str) -> Option<&'static str> {
    let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "txt" => Some("text/plain"),
        "json" => Some("application/json"),
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "csv" => Some("text/csv"),
        _ => None,
    }
}

/// Files waiting for submit. A cleared input keeps its key with `None`.
#[derive(Debug, Clone, Default)]
pub struct PendingUploads {
    files: BTreeMap<String, Option<UploadFile>>,
}

impl PendingUploads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, question_id: impl Into<String>, file: Option<UploadFile>) {
        self.files.insert(question_id.into(), file);
    }

    pub fn get(&self, question_id: &str) -> Option<&UploadFile> {
        self.files.get(question_id).and_then(Option::as_ref)
    }

    /// Attached files, skipping cleared inputs.
    pub fn attached(&self) -> impl Iterator<Item = (&str, &UploadFile)> {
        self.files
            .iter()
            .filter_map(|(key, file)| file.as_ref().map(|file| (key.as_str(), file)))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}
