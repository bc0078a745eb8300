use askama::Template;
use axum::response::Html;

use crate::models::Sector;
use crate::submission::phase::FormPhase;

#[derive(Template)]
#[template(path = "form.html")]
struct FormTemplate {
    submitted: bool,
    message: Option<String>,
    errors: Vec<FieldError>,
    sectors: &'static [Sector],
}

struct FieldError {
    field: String,
    message: String,
}

pub async fn form_page() -> Html<String> {
    render(FormPhase::new())
}

/// Render the form page for a given phase of the submission machine.
pub fn render(phase: FormPhase) -> Html<String> {
    let (submitted, message, errors) = match phase {
        FormPhase::Submitted => (true, None, Vec::new()),
        FormPhase::Editing { errors, message } => {
            let flat = errors
                .map(|map| {
                    map.into_iter()
                        .flat_map(|(field, messages)| {
                            messages.into_iter().map(move |message| FieldError {
                                field: field.clone(),
                                message,
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            (false, message, flat)
        }
        FormPhase::Pending => (false, None, Vec::new()),
    };

    let template = FormTemplate {
        submitted,
        message,
        errors,
        sectors: &Sector::ALL,
    };
    Html(template.render().unwrap_or_default())
}
