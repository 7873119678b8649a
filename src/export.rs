//! Spreadsheet Export
//!
//! Exports run in three steps that can be used on their own:
//! 1. project a record list into a [`Sheet`] of display columns,
//! 2. write the sheet to an `.xlsx` file in the exports directory,
//! 3. stream that file back as an attachment and remove it afterwards.

use axum::{
    body::{Body, Bytes},
    http::{header, StatusCode},
    response::Response,
};
use chrono::{DateTime, Utc};
use futures::Stream;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::Duration;
use tokio_util::io::ReaderStream;

use crate::store::models::{BlogPost, ContactSubmission, PortfolioProject, Testimonial};

/// How long a delivered export stays on disk before it is removed
pub const EXPORT_GRACE_PERIOD: Duration = Duration::from_secs(5);

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const MISSING: &str = "N/A";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write workbook: {0}")]
    Workbook(#[from] XlsxError),

    #[error("export file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("export task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("failed to build download response: {0}")]
    Response(#[from] axum::http::Error),
}

// ============================================================================
// Row projection
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Text, or "N/A" when absent or empty.
    fn or_missing(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Cell::text(v),
            _ => Cell::text(MISSING),
        }
    }

    fn timestamp(value: DateTime<Utc>) -> Self {
        Cell::Text(value.format("%Y-%m-%d %H:%M:%S UTC").to_string())
    }
}

/// A named sheet: header columns followed by data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

pub fn contact_submissions_sheet(items: &[ContactSubmission]) -> Sheet {
    Sheet {
        name: "Contact Submissions",
        columns: &[
            "ID",
            "Name",
            "Email",
            "Phone",
            "Service",
            "Message",
            "Budget",
            "Timeline",
            "Project Scope",
            "Read Status",
            "Submitted At",
        ],
        rows: items
            .iter()
            .map(|s| {
                vec![
                    Cell::Number(s.id.into()),
                    Cell::text(&s.name),
                    Cell::text(&s.email),
                    Cell::text(&s.phone),
                    Cell::text(&s.service),
                    Cell::text(&s.message),
                    Cell::or_missing(s.budget.as_deref()),
                    Cell::or_missing(s.timeline.as_deref()),
                    Cell::or_missing(s.project_scope.as_deref()),
                    Cell::text(if s.is_read { "Read" } else { "Unread" }),
                    Cell::timestamp(s.created_at),
                ]
            })
            .collect(),
    }
}

pub fn blog_posts_sheet(items: &[BlogPost]) -> Sheet {
    Sheet {
        name: "Blog Posts",
        columns: &[
            "ID",
            "Title",
            "Summary",
            "Category",
            "Author",
            "Status",
            "Created At",
            "Updated At",
        ],
        rows: items
            .iter()
            .map(|p| {
                vec![
                    Cell::Number(p.id.into()),
                    Cell::text(&p.title),
                    Cell::text(&p.summary),
                    Cell::or_missing(Some(p.category.as_str())),
                    Cell::text(&p.author),
                    Cell::text(if p.is_published { "Published" } else { "Draft" }),
                    Cell::timestamp(p.created_at),
                    Cell::timestamp(p.updated_at),
                ]
            })
            .collect(),
    }
}

pub fn testimonials_sheet(items: &[Testimonial]) -> Sheet {
    Sheet {
        name: "Testimonials",
        columns: &[
            "ID",
            "Client",
            "Company",
            "Project Type",
            "Rating",
            "Status",
            "Submitted At",
        ],
        rows: items
            .iter()
            .map(|t| {
                vec![
                    Cell::Number(t.id.into()),
                    Cell::text(&t.client_name),
                    Cell::or_missing(t.company.as_deref()),
                    Cell::text(&t.project_type),
                    Cell::Number(t.rating.into()),
                    Cell::text(if t.is_approved { "Approved" } else { "Pending" }),
                    Cell::timestamp(t.created_at),
                ]
            })
            .collect(),
    }
}

pub fn portfolio_projects_sheet(items: &[PortfolioProject]) -> Sheet {
    Sheet {
        name: "Portfolio Projects",
        columns: &[
            "ID",
            "Title",
            "Category",
            "Client",
            "Location",
            "Completion Date",
            "Featured",
            "Created At",
            "Updated At",
        ],
        rows: items
            .iter()
            .map(|p| {
                vec![
                    Cell::Number(p.id.into()),
                    Cell::text(&p.title),
                    Cell::text(&p.category),
                    Cell::or_missing(p.client_name.as_deref()),
                    Cell::or_missing(p.location.as_deref()),
                    Cell::or_missing(p.completion_date.as_deref()),
                    Cell::text(if p.featured { "Yes" } else { "No" }),
                    Cell::timestamp(p.created_at),
                    Cell::timestamp(p.updated_at),
                ]
            })
            .collect(),
    }
}

// ============================================================================
// Serialization
// ============================================================================

/// `<prefix>_<ISO-8601 timestamp>.xlsx` with `:` and `.` replaced by `-`.
pub fn export_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    let stamp = at
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-");
    format!("{prefix}_{stamp}.xlsx")
}

/// Write the sheet to `path` with a bold header row. Blocking.
pub fn write_workbook(sheet: &Sheet, path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet.name)?;

    for (col, title) in sheet.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (index, row) in sheet.rows.iter().enumerate() {
        let row_num = index as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(text) => worksheet.write_string(row_num, col as u16, text)?,
                Cell::Number(number) => worksheet.write_number(row_num, col as u16, *number)?,
            };
        }
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}

// ============================================================================
// Delivery
// ============================================================================

/// A generated export on disk. The file is removed when the guard drops, so
/// every early return cleans up after itself.
#[derive(Debug)]
pub struct TempExport {
    path: PathBuf,
}

impl TempExport {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file for `delay`, then remove it. Removes it right away when
    /// called outside a runtime.
    pub fn release_after(self, delay: Duration) {
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                drop(self);
            });
        }
    }
}

impl Drop for TempExport {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed export file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove export file")
            }
        }
    }
}

/// Streams an export file and schedules its removal once the body is done
/// with it: `grace` after the last chunk (or after the client goes away),
/// immediately on a read error.
pub struct ExportStream {
    inner: ReaderStream<tokio::fs::File>,
    export: Option<TempExport>,
    grace: Duration,
}

impl ExportStream {
    pub fn new(file: tokio::fs::File, export: TempExport, grace: Duration) -> Self {
        Self {
            inner: ReaderStream::new(file),
            export: Some(export),
            grace,
        }
    }
}

impl Stream for ExportStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let item = ready!(Pin::new(&mut this.inner).poll_next(cx));
        match &item {
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Export stream failed");
                this.export.take();
            }
            None => {
                if let Some(export) = this.export.take() {
                    export.release_after(this.grace);
                }
            }
            Some(Ok(_)) => {}
        }
        Poll::Ready(item)
    }
}

impl Drop for ExportStream {
    fn drop(&mut self) {
        if let Some(export) = self.export.take() {
            export.release_after(self.grace);
        }
    }
}

/// Write `sheet` under `dir` and return a response streaming it as an
/// attachment named after `prefix`.
pub async fn download(dir: &Path, prefix: &str, sheet: Sheet) -> Result<Response, ExportError> {
    tokio::fs::create_dir_all(dir).await?;

    let file_name = export_file_name(prefix, Utc::now());
    // Two exports in the same millisecond must not share a file on disk.
    let export = TempExport::new(dir.join(format!("{}_{}", uuid::Uuid::new_v4(), file_name)));

    let target = export.path().to_path_buf();
    let rows = sheet.rows.len();
    tokio::task::spawn_blocking(move || write_workbook(&sheet, &target)).await??;

    let file = tokio::fs::File::open(export.path()).await?;
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .body(Body::from_stream(ExportStream::new(
            file,
            export,
            EXPORT_GRACE_PERIOD,
        )))?;

    tracing::info!(file = %file_name, rows, "Export generated");
    Ok(response)
}
