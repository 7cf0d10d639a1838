//! Validation for uploaded papers: type and size checks before anything is
//! sent to the provider.

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

/// Largest accepted paper, in bytes.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error, PartialEq)]
pub enum UploadError {
    #[error("Please upload a file first")]
    Missing,

    #[error("Please upload a valid PDF or DOCX file")]
    UnsupportedType,

    #[error("Uploaded file is empty")]
    Empty,

    #[error("File size must be less than 10MB")]
    TooLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperKind {
    Pdf,
    Docx,
}

impl PaperKind {
    pub fn mime(self) -> &'static str {
        match self {
            PaperKind::Pdf => PDF_MIME,
            PaperKind::Docx => DOCX_MIME,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            PaperKind::Pdf => "pdf",
            PaperKind::Docx => "docx",
        }
    }

    /// Matches an exact MIME essence, ignoring parameters such as `charset`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(PDF_MIME) {
            Some(PaperKind::Pdf)
        } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
            Some(PaperKind::Docx)
        } else {
            None
        }
    }

    fn from_file_name(file_name: &str) -> Option<Self> {
        mime_guess::from_path(file_name)
            .iter_raw()
            .find_map(Self::from_mime)
    }
}

/// A paper that passed validation and is ready to be uploaded.
#[derive(Debug, Clone)]
pub struct PaperUpload {
    pub file_name: String,
    pub kind: PaperKind,
    pub data: Bytes,
}

impl PaperUpload {
    /// Validates a multipart file part.
    ///
    /// A declared content type wins; when it is missing or the generic
    /// `application/octet-stream`, the type is guessed from the file name.
    pub fn new(
        file_name: Option<&str>,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<Self, UploadError> {
        let declared = content_type
            .map(str::trim)
            .filter(|ct| !ct.is_empty() && !ct.starts_with("application/octet-stream"));

        let kind = match declared {
            Some(ct) => PaperKind::from_mime(ct),
            None => file_name.and_then(PaperKind::from_file_name),
        }
        .ok_or(UploadError::UnsupportedType)?;

        if data.is_empty() {
            return Err(UploadError::Empty);
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(UploadError::TooLarge);
        }

        let file_name = file_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("paper.{}", kind.extension()));

        Ok(Self {
            file_name,
            kind,
            data,
        })
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_bytes() -> Bytes {
        Bytes::from_static(b"%PDF-1.4\n%test\n")
    }

    #[test]
    fn test_accepts_declared_pdf_and_docx() {
        let pdf = PaperUpload::new(Some("paper.pdf"), Some("application/pdf"), pdf_bytes()).unwrap();
        assert_eq!(pdf.kind, PaperKind::Pdf);
        assert_eq!(pdf.file_name, "paper.pdf");

        let docx = PaperUpload::new(Some("draft.docx"), Some(DOCX_MIME), pdf_bytes()).unwrap();
        assert_eq!(docx.kind, PaperKind::Docx);
    }

    #[test]
    fn test_declared_type_ignores_parameters() {
        let upload =
            PaperUpload::new(Some("p.pdf"), Some("application/pdf; name=p.pdf"), pdf_bytes())
                .unwrap();
        assert_eq!(upload.kind, PaperKind::Pdf);
    }

    #[test]
    fn test_guesses_type_from_file_name() {
        let upload = PaperUpload::new(Some("paper.docx"), None, pdf_bytes()).unwrap();
        assert_eq!(upload.kind, PaperKind::Docx);

        let upload =
            PaperUpload::new(Some("paper.PDF"), Some("application/octet-stream"), pdf_bytes())
                .unwrap();
        assert_eq!(upload.kind, PaperKind::Pdf);
    }

    #[test]
    fn test_rejects_other_types() {
        let err = PaperUpload::new(Some("notes.txt"), Some("text/plain"), pdf_bytes()).unwrap_err();
        assert_eq!(err, UploadError::UnsupportedType);

        // A declared type is not overridden by a misleading extension.
        let err = PaperUpload::new(Some("paper.pdf"), Some("image/png"), pdf_bytes()).unwrap_err();
        assert_eq!(err, UploadError::UnsupportedType);

        let err = PaperUpload::new(None, None, pdf_bytes()).unwrap_err();
        assert_eq!(err, UploadError::UnsupportedType);
    }

    #[test]
    fn test_size_limits() {
        let err = PaperUpload::new(Some("p.pdf"), Some(PDF_MIME), Bytes::new()).unwrap_err();
        assert_eq!(err, UploadError::Empty);

        let at_limit = Bytes::from(vec![0u8; MAX_FILE_SIZE]);
        assert!(PaperUpload::new(Some("p.pdf"), Some(PDF_MIME), at_limit).is_ok());

        let over = Bytes::from(vec![0u8; MAX_FILE_SIZE + 1]);
        let err = PaperUpload::new(Some("p.pdf"), Some(PDF_MIME), over).unwrap_err();
        assert_eq!(err, UploadError::TooLarge);
        assert_eq!(err.to_string(), "File size must be less than 10MB");
    }

    #[test]
    fn test_missing_file_name_gets_default() {
        let upload = PaperUpload::new(Some("  "), Some(DOCX_MIME), pdf_bytes()).unwrap();
        assert_eq!(upload.file_name, "paper.docx");
        assert_eq!(upload.size(), 15);
    }
}
