use std::collections::BTreeMap;

use bytes::Bytes;
use serde::Serialize;

/// Field name -> one or more error messages, ordered by field name so the
/// serialized result is stable.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// A validated application, ready for delivery. Exists only for the span of
/// one request: parse, validate, dispatch, discard.
#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub project_name: String,
    pub sector: Sector,
    pub explanation: String,
    pub impact: String,
    pub differentiation: String,
    pub innovation: String,
    pub concept_note: UploadedFile,
}

/// A file part taken from the multipart body, kept byte-for-byte as
/// received.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Project category, fixed to the labels offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    Education,
    Health,
    Agriculture,
    Governance,
    Business,
    TechnologyAndAi,
    Communication,
    Transport,
    Other,
}

impl Sector {
    pub const ALL: [Sector; 9] = [
        Sector::Education,
        Sector::Health,
        Sector::Agriculture,
        Sector::Governance,
        Sector::Business,
        Sector::TechnologyAndAi,
        Sector::Communication,
        Sector::Transport,
        Sector::Other,
    ];

    /// The form value for this sector.
    pub fn slug(&self) -> &'static str {
        match self {
            Sector::Education => "education",
            Sector::Health => "health",
            Sector::Agriculture => "agriculture",
            Sector::Governance => "governance",
            Sector::Business => "business",
            Sector::TechnologyAndAi => "technology_and_ai",
            Sector::Communication => "communication",
            Sector::Transport => "transport",
            Sector::Other => "other",
        }
    }

    /// Human-readable label, used in the form and the operator email.
    pub fn label(&self) -> &'static str {
        match self {
            Sector::Education => "Education",
            Sector::Health => "Health",
            Sector::Agriculture => "Agriculture",
            Sector::Governance => "Governance",
            Sector::Business => "Business",
            Sector::TechnologyAndAi => "Technology and AI",
            Sector::Communication => "Communication",
            Sector::Transport => "Transport",
            Sector::Other => "Other",
        }
    }

    pub fn from_slug(value: &str) -> Option<Sector> {
        Sector::ALL.iter().copied().find(|s| s.slug() == value)
    }
}

/// The application-level outcome returned to the form for every submission
/// attempt. The HTTP request itself succeeds either way.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl SubmissionResult {
    pub fn accepted() -> Self {
        SubmissionResult {
            success: true,
            message: "Application submitted successfully!".to_string(),
            errors: None,
        }
    }

    pub fn rejected(errors: FieldErrors) -> Self {
        SubmissionResult {
            success: false,
            message: "There was a problem with your submission. Please check the form and try again."
                .to_string(),
            errors: Some(errors),
        }
    }

    /// The mail transport is not configured; nothing was attempted.
    pub fn unavailable() -> Self {
        SubmissionResult {
            success: false,
            message: "Submissions are temporarily unavailable: the mail transport is not configured."
                .to_string(),
            errors: None,
        }
    }

    /// Delivery was attempted and failed. The transport detail is surfaced
    /// so operators can diagnose misconfiguration from the response alone.
    pub fn failed(detail: &str) -> Self {
        SubmissionResult {
            success: false,
            message: format!(
                "Sorry, we were unable to submit your application at this time: {detail}"
            ),
            errors: None,
        }
    }
}
