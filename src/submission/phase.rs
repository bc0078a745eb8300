use crate::models::{FieldErrors, SubmissionResult};

/// The submission UI lifecycle. `static/form.js` runs the same machine in
/// the browser; this one drives the server-rendered fallback.
///
/// `Submitted` is terminal until the user explicitly resets.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPhase {
    Editing {
        errors: Option<FieldErrors>,
        message: Option<String>,
    },
    Pending,
    Submitted,
}

impl FormPhase {
    pub fn new() -> Self {
        FormPhase::Editing {
            errors: None,
            message: None,
        }
    }

    /// `editing -> pending`. Inert from any other phase.
    pub fn submit(self) -> Self {
        match self {
            FormPhase::Editing { .. } => FormPhase::Pending,
            other => other,
        }
    }

    /// `pending -> submitted` on success, `pending -> editing` carrying the
    /// field errors and message otherwise. Inert from any other phase.
    pub fn resolve(self, result: &SubmissionResult) -> Self {
        match self {
            FormPhase::Pending if result.success => FormPhase::Submitted,
            FormPhase::Pending => FormPhase::Editing {
                errors: result.errors.clone(),
                message: Some(result.message.clone()),
            },
            other => other,
        }
    }

    /// `submitted -> editing` ("submit another"). Inert from any other phase.
    pub fn reset(self) -> Self {
        match self {
            FormPhase::Submitted => FormPhase::new(),
            other => other,
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, FormPhase::Submitted)
    }
}

impl Default for FormPhase {
    fn default() -> Self {
        FormPhase::new()
    }
}
