use std::sync::LazyLock;

use regex::Regex;

use crate::models::{FieldErrors, Sector, SubmissionPayload, UploadedFile};

use super::parser::RawSubmission;

pub const MAX_CONCEPT_NOTE_SIZE: usize = 5 * 1024 * 1024;

pub const ACCEPTED_FILE_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// The only value the terms checkbox may carry to count as accepted.
pub const TERMS_ACCEPTED: &str = "on";

const MIN_DETAIL_LEN: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Validate the raw field bag into a `SubmissionPayload`.
///
/// Every rule runs regardless of earlier failures so the caller gets the
/// complete error map in one pass, never just the first violation.
pub fn validate(raw: &RawSubmission) -> Result<SubmissionPayload, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required_text(raw, "name", "Name is required.", &mut errors);
    let email = valid_email(raw, &mut errors);
    let phone = phone_pair(raw, &mut errors);
    let company = raw.text("company").map(str::to_string);
    let project_name = required_text(raw, "projectName", "Project name is required.", &mut errors);
    let sector = valid_sector(raw, &mut errors);

    let explanation = detail_text(
        raw,
        "explanation",
        "Project explanation is required.",
        "Please provide a more detailed explanation.",
        &mut errors,
    );
    let impact = detail_text(
        raw,
        "impact",
        "Social/environmental impact is required.",
        "Please describe the social/environmental impact.",
        &mut errors,
    );
    let differentiation = detail_text(
        raw,
        "differentiation",
        "Differentiation from existing solutions is required.",
        "Please describe what makes your project different.",
        &mut errors,
    );
    let innovation = detail_text(
        raw,
        "innovation",
        "Innovation aspect is required.",
        "Please describe the innovative aspects.",
        &mut errors,
    );

    let concept_note = concept_note(raw, &mut errors);

    if raw.text("terms") != Some(TERMS_ACCEPTED) {
        push(&mut errors, "terms", "You must agree to the terms and conditions.");
    }

    match (
        name,
        email,
        project_name,
        sector,
        explanation,
        impact,
        differentiation,
        innovation,
        concept_note,
    ) {
        (
            Some(name),
            Some(email),
            Some(project_name),
            Some(sector),
            Some(explanation),
            Some(impact),
            Some(differentiation),
            Some(innovation),
            Some(concept_note),
        ) if errors.is_empty() => Ok(SubmissionPayload {
            name,
            email,
            phone,
            company,
            project_name,
            sector,
            explanation,
            impact,
            differentiation,
            innovation,
            concept_note,
        }),
        _ => Err(errors),
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn required_text(
    raw: &RawSubmission,
    field: &str,
    missing: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match raw.text(field) {
        Some(value) => Some(value.to_string()),
        None => {
            push(errors, field, missing);
            None
        }
    }
}

fn detail_text(
    raw: &RawSubmission,
    field: &str,
    missing: &str,
    too_short: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match raw.text(field) {
        Some(value) if value.chars().count() >= MIN_DETAIL_LEN => Some(value.to_string()),
        Some(_) => {
            push(errors, field, too_short);
            None
        }
        None => {
            push(errors, field, missing);
            None
        }
    }
}

fn valid_email(raw: &RawSubmission, errors: &mut FieldErrors) -> Option<String> {
    match raw.text("email") {
        Some(value) if EMAIL_RE.is_match(value) => Some(value.to_string()),
        Some(_) => {
            push(errors, "email", "Invalid email address.");
            None
        }
        None => {
            push(errors, "email", "Email is required.");
            None
        }
    }
}

fn valid_sector(raw: &RawSubmission, errors: &mut FieldErrors) -> Option<Sector> {
    match raw.text("sector") {
        Some(value) => match Sector::from_slug(value) {
            Some(sector) => Some(sector),
            None => {
                push(errors, "sector", "Please select a valid sector.");
                None
            }
        },
        None => {
            push(errors, "sector", "Sector is required.");
            None
        }
    }
}

/// The phone number is optional, but the country code and the local number
/// travel as a pair: one without the other errors on the missing side.
fn phone_pair(raw: &RawSubmission, errors: &mut FieldErrors) -> Option<String> {
    match (raw.text("countryCode"), raw.text("phone")) {
        (Some(code), Some(number)) => Some(format!("{code} {number}")),
        (None, None) => None,
        (Some(_), None) => {
            push(errors, "phone", "Phone number is required when a country code is given.");
            None
        }
        (None, Some(_)) => {
            push(
                errors,
                "countryCode",
                "Country code is required when a phone number is given.",
            );
            None
        }
    }
}

/// Presence, size ceiling and type allow-list are independent checks; an
/// attachment can collect more than one violation.
fn concept_note(raw: &RawSubmission, errors: &mut FieldErrors) -> Option<UploadedFile> {
    let Some(file) = raw.file("conceptNote") else {
        push(errors, "conceptNote", "Concept note is required.");
        return None;
    };

    let mut ok = true;
    if file.size() == 0 {
        push(errors, "conceptNote", "Concept note is required.");
        ok = false;
    }
    if file.size() > MAX_CONCEPT_NOTE_SIZE {
        push(errors, "conceptNote", "Max file size is 5MB.");
        ok = false;
    }
    if !ACCEPTED_FILE_TYPES.contains(&file.content_type.as_str()) {
        push(errors, "conceptNote", ".pdf, .doc, and .docx files are accepted.");
        ok = false;
    }

    ok.then(|| file.clone())
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn pdf(size: usize) -> UploadedFile {
        UploadedFile {
            filename: "concept.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from(vec![0x25; size]),
        }
    }

    fn valid_raw() -> RawSubmission {
        let mut raw = RawSubmission::default();
        for (k, v) in [
            ("name", "Amina"),
            ("email", "amina@example.com"),
            ("projectName", "AquaSense"),
            ("sector", "agriculture"),
            ("explanation", "Low-cost soil moisture sensors."),
            ("impact", "Cuts water use on smallholder farms."),
            ("differentiation", "An order of magnitude cheaper."),
            ("innovation", "Capacitive sensing on printed boards."),
            ("terms", "on"),
        ] {
            raw.fields.insert(k.to_string(), v.to_string());
        }
        raw.files.insert("conceptNote".to_string(), pdf(2 * 1024 * 1024));
        raw
    }

    #[test]
    fn valid_submission_passes() {
        let payload = validate(&valid_raw()).unwrap();
        assert_eq!(payload.name, "Amina");
        assert_eq!(payload.sector, Sector::Agriculture);
        assert_eq!(payload.phone, None);
        assert_eq!(payload.concept_note.size(), 2 * 1024 * 1024);
    }

    #[test]
    fn empty_submission_reports_every_field() {
        let errors = validate(&RawSubmission::default()).unwrap_err();
        for field in [
            "name",
            "email",
            "projectName",
            "sector",
            "explanation",
            "impact",
            "differentiation",
            "innovation",
            "conceptNote",
            "terms",
        ] {
            assert!(errors.contains_key(field), "missing error for {field}");
        }
        // Optional fields impose nothing when absent
        assert!(!errors.contains_key("phone"));
        assert!(!errors.contains_key("company"));
    }

    #[test]
    fn all_violations_reported_together_not_just_first() {
        let mut raw = valid_raw();
        raw.fields.remove("name");
        raw.fields.insert("email".to_string(), "not-an-email".to_string());
        raw.fields.insert("explanation".to_string(), "too short".to_string());

        let errors = validate(&raw).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["name"], vec!["Name is required."]);
        assert_eq!(errors["email"], vec!["Invalid email address."]);
        assert_eq!(
            errors["explanation"],
            vec!["Please provide a more detailed explanation."]
        );
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut raw = valid_raw();
        raw.fields.insert("name".to_string(), "   ".to_string());
        let errors = validate(&raw).unwrap_err();
        assert_eq!(errors["name"], vec!["Name is required."]);
    }

    #[test]
    fn unknown_sector_rejected() {
        let mut raw = valid_raw();
        raw.fields.insert("sector".to_string(), "finance".to_string());
        let errors = validate(&raw).unwrap_err();
        assert_eq!(errors["sector"], vec!["Please select a valid sector."]);
    }

    #[test]
    fn text_plain_attachment_rejected_regardless_of_size() {
        let mut raw = valid_raw();
        raw.files.insert(
            "conceptNote".to_string(),
            UploadedFile {
                filename: "note.txt".to_string(),
                content_type: "text/plain".to_string(),
                bytes: Bytes::from_static(b"hello"),
            },
        );
        let errors = validate(&raw).unwrap_err();
        assert_eq!(
            errors["conceptNote"],
            vec![".pdf, .doc, and .docx files are accepted."]
        );
    }

    #[test]
    fn attachment_at_exactly_five_mib_accepted() {
        let mut raw = valid_raw();
        raw.files
            .insert("conceptNote".to_string(), pdf(MAX_CONCEPT_NOTE_SIZE));
        assert!(validate(&raw).is_ok());
    }

    #[test]
    fn attachment_one_byte_over_rejected() {
        let mut raw = valid_raw();
        raw.files
            .insert("conceptNote".to_string(), pdf(MAX_CONCEPT_NOTE_SIZE + 1));
        let errors = validate(&raw).unwrap_err();
        assert_eq!(errors["conceptNote"], vec!["Max file size is 5MB."]);
    }

    #[test]
    fn oversized_wrong_type_attachment_collects_both_violations() {
        let mut raw = valid_raw();
        raw.files.insert(
            "conceptNote".to_string(),
            UploadedFile {
                filename: "note.txt".to_string(),
                content_type: "text/plain".to_string(),
                bytes: Bytes::from(vec![0u8; MAX_CONCEPT_NOTE_SIZE + 1]),
            },
        );
        let errors = validate(&raw).unwrap_err();
        assert_eq!(errors["conceptNote"].len(), 2);
    }

    #[test]
    fn empty_attachment_counts_as_missing() {
        let mut raw = valid_raw();
        raw.files.insert("conceptNote".to_string(), pdf(0));
        let errors = validate(&raw).unwrap_err();
        assert_eq!(errors["conceptNote"], vec!["Concept note is required."]);
    }

    #[test]
    fn terms_must_equal_the_accepted_sentinel() {
        for value in ["off", "yes", "true", "ON", "on "] {
            let mut raw = valid_raw();
            raw.fields.insert("terms".to_string(), value.to_string());
            let result = validate(&raw);
            if value.trim() == "on" {
                // raw.text trims, so "on " is the sentinel
                assert!(result.is_ok(), "{value:?} should be accepted");
            } else {
                let errors = result.unwrap_err();
                assert_eq!(
                    errors["terms"],
                    vec!["You must agree to the terms and conditions."],
                    "{value:?} should be rejected"
                );
            }
        }
    }

    #[test]
    fn phone_and_country_code_travel_together() {
        let mut raw = valid_raw();
        raw.fields.insert("countryCode".to_string(), "+250".to_string());
        let errors = validate(&raw).unwrap_err();
        assert_eq!(
            errors["phone"],
            vec!["Phone number is required when a country code is given."]
        );

        let mut raw = valid_raw();
        raw.fields.insert("phone".to_string(), "788123456".to_string());
        let errors = validate(&raw).unwrap_err();
        assert_eq!(
            errors["countryCode"],
            vec!["Country code is required when a phone number is given."]
        );
    }

    #[test]
    fn phone_composed_from_country_code_and_number() {
        let mut raw = valid_raw();
        raw.fields.insert("countryCode".to_string(), "+250".to_string());
        raw.fields.insert("phone".to_string(), "788123456".to_string());
        let payload = validate(&raw).unwrap();
        assert_eq!(payload.phone.as_deref(), Some("+250 788123456"));
    }
}
