pub mod submission;

pub use submission::{FieldErrors, Sector, SubmissionPayload, SubmissionResult, UploadedFile};
