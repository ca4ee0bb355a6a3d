//! Document upload, listing and deletion models.

use std::{cmp::Ordering, fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Most files accepted in a single upload request.
pub const MAX_FILES_PER_UPLOAD: usize = 2;

/// Processing pipeline the backend runs on an uploaded document.
///
/// Ordered `Text < Image < Plain`, the order listings sort by type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProcType {
    /// Text extraction from `.txt`/`.pdf` files.
    Text,
    /// Page-image understanding for slides, PDFs and pictures.
    Image,
    /// Text typed in directly and uploaded as a `.txt` file.
    Plain,
}

impl ProcType {
    /// Return the canonical string sent in the `proc_type` form field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Plain => "plain",
        }
    }

    /// Lower-case file extensions this pipeline accepts.
    #[must_use]
    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Text => &["txt", "pdf"],
            Self::Image => &["pptx", "pdf", "jpg", "png"],
            Self::Plain => &["txt"],
        }
    }

    /// Checks `path`'s extension against [`Self::allowed_extensions`].
    #[must_use]
    pub fn accepts(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .is_some_and(|ext| self.allowed_extensions().contains(&ext.as_str()))
    }
}

impl fmt::Display for ProcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcType {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "plain" => Ok(Self::Plain),
            _ => Err("unknown processing type"),
        }
    }
}

/// Coarse processing status derived from a document's `progress` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentProgress {
    /// Queued, `progress == 0`.
    Pending,
    /// Partially processed, carrying the percentage.
    InProgress(i32),
    /// Fully indexed, `progress == 100`.
    Complete,
    /// Processing failed, `progress == -1`.
    Failed,
}

impl DocumentProgress {
    /// The status without its percentage, as used by listing filters.
    #[must_use]
    pub fn state(self) -> DocumentState {
        match self {
            Self::Pending => DocumentState::Pending,
            Self::InProgress(_) => DocumentState::InProgress,
            Self::Complete => DocumentState::Complete,
            Self::Failed => DocumentState::Failed,
        }
    }
}

/// [`DocumentProgress`] bucket selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentState {
    /// Not started.
    Pending,
    /// Any percentage between start and completion.
    InProgress,
    /// Done.
    Complete,
    /// Failed.
    Failed,
}

impl FromStr for DocumentState {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "complete" => Ok(Self::Complete),
            "failed" => Ok(Self::Failed),
            _ => Err("expected pending, in-progress, complete or failed"),
        }
    }
}

impl From<i32> for DocumentProgress {
    fn from(progress: i32) -> Self {
        match progress {
            100 => Self::Complete,
            -1 => Self::Failed,
            0 => Self::Pending,
            other => Self::InProgress(other),
        }
    }
}

impl fmt::Display for DocumentProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::InProgress(pct) => write!(f, "{pct}%"),
            Self::Complete => f.write_str("complete"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// A document accepted by `POST api/ai-search/upload-document`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedDocument {
    /// Id assigned by the backend.
    pub doc_id: i64,
    /// File name without extension.
    pub title: String,
    /// Lower-case extension.
    pub extension: String,
    /// Pipeline processing the document.
    pub proc_type: ProcType,
}

/// Response of `POST api/ai-search/upload-document`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadDocumentResponse {
    /// Backend acknowledgement.
    pub message: String,
    /// Accepted documents.
    pub documents: Vec<UploadedDocument>,
}

/// A stored document as listed by `GET api/ai-search/get-documents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentSummary {
    /// Document id.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Lower-case extension.
    pub extension: String,
    /// Upload time.
    pub created_at: Timestamp,
    /// `0` pending, `1..=99` in progress, `100` complete, `-1` failed.
    #[serde(default)]
    pub progress: i32,
}

impl DocumentSummary {
    /// Processing status of this document.
    #[must_use]
    pub fn status(&self) -> DocumentProgress {
        DocumentProgress::from(self.progress)
    }
}

/// Documents grouped by processing pipeline, newest first within each group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentListResponse {
    /// [`ProcType::Text`] documents.
    #[serde(default)]
    pub text: Vec<DocumentSummary>,
    /// [`ProcType::Image`] documents.
    #[serde(default)]
    pub image: Vec<DocumentSummary>,
    /// [`ProcType::Plain`] documents.
    #[serde(default)]
    pub plain: Vec<DocumentSummary>,
}

impl DocumentListResponse {
    /// Iterates every group with its processing type.
    pub fn groups(&self) -> impl Iterator<Item = (ProcType, &[DocumentSummary])> {
        [
            (ProcType::Text, self.text.as_slice()),
            (ProcType::Image, self.image.as_slice()),
            (ProcType::Plain, self.plain.as_slice()),
        ]
        .into_iter()
    }

    /// Number of documents across all groups.
    #[must_use]
    pub fn total(&self) -> usize {
        self.text.len() + self.image.len() + self.plain.len()
    }

    /// Flattens the groups, keeps the documents matching `query` and sorts
    /// them by its field and order. Ties keep their listing order.
    #[must_use]
    pub fn query(&self, query: &DocumentQuery) -> Vec<(ProcType, &DocumentSummary)> {
        let mut documents: Vec<(ProcType, &DocumentSummary)> = self
            .groups()
            .flat_map(|(proc_type, group)| group.iter().map(move |doc| (proc_type, doc)))
            .filter(|(proc_type, _)| query.types.is_empty() || query.types.contains(proc_type))
            .filter(|(_, doc)| {
                query.states.is_empty() || query.states.contains(&doc.status().state())
            })
            .collect();

        documents.sort_by(|(type_a, a), (type_b, b)| {
            let ordering = match query.sort {
                DocumentSortField::Type => type_a.cmp(type_b),
                DocumentSortField::Title => compare_titles(&a.title, &b.title),
                DocumentSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                DocumentSortField::Progress => a.progress.cmp(&b.progress),
            };
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        documents
    }
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Field a document listing is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentSortField {
    /// Processing type, in [`ProcType`] order.
    Type,
    /// Title, case-insensitive.
    Title,
    /// Upload time.
    #[default]
    CreatedAt,
    /// Raw progress value.
    Progress,
}

impl FromStr for DocumentSortField {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "type" => Ok(Self::Type),
            "title" => Ok(Self::Title),
            "date" | "created-at" => Ok(Self::CreatedAt),
            "progress" => Ok(Self::Progress),
            _ => Err("expected type, title, date or progress"),
        }
    }
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err("expected asc or desc"),
        }
    }
}

/// Filters and ordering for [`DocumentListResponse::query`].
///
/// Empty filter lists match everything. The default lists newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    /// Processing types to keep.
    pub types: Vec<ProcType>,
    /// Progress states to keep.
    pub states: Vec<DocumentState>,
    /// Sort field.
    pub sort: DocumentSortField,
    /// Sort direction.
    pub order: SortOrder,
}

/// Body of `POST api/ai-search/delete-document/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteDocumentRequest {
    /// Document to delete.
    pub doc_id: i64,
}
