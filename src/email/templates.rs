use crate::models::SubmissionPayload;

pub fn render_operator_notification(payload: &SubmissionPayload) -> String {
    let phone = payload.phone.as_deref().unwrap_or("N/A");
    let company = payload.company.as_deref().unwrap_or("N/A");
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h1>New Project Application</h1>
    <h2>Applicant Details</h2>
    <table cellpadding="4">
        <tr><td><strong>Name</strong></td><td>{name}</td></tr>
        <tr><td><strong>Email</strong></td><td>{email}</td></tr>
        <tr><td><strong>Phone</strong></td><td>{phone}</td></tr>
        <tr><td><strong>Company</strong></td><td>{company}</td></tr>
    </table>
    <h2>Project Details</h2>
    <table cellpadding="4">
        <tr><td><strong>Project Name</strong></td><td>{project}</td></tr>
        <tr><td><strong>Sector</strong></td><td>{sector}</td></tr>
    </table>
    <h3>Project Explanation</h3>
    <p>{explanation}</p>
    <h3>Social / Environmental Impact</h3>
    <p>{impact}</p>
    <h3>Differentiation</h3>
    <p>{differentiation}</p>
    <h3>Innovation</h3>
    <p>{innovation}</p>
</body>
</html>"#,
        name = esc(&payload.name),
        email = esc(&payload.email),
        phone = esc(phone),
        company = esc(company),
        project = esc(&payload.project_name),
        sector = payload.sector.label(),
        explanation = esc(&payload.explanation),
        impact = esc(&payload.impact),
        differentiation = esc(&payload.differentiation),
        innovation = esc(&payload.innovation),
    )
}

pub fn render_applicant_confirmation(name: &str, project_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Thank You!</h2>
    <p>Hi {name},</p>
    <p>We received your application for <strong>{project}</strong>.
    Our team will review your project and get back to you soon.</p>
    <p style="color: #666; font-size: 14px;">Code for Impact - Mastery Hub</p>
</body>
</html>"#,
        name = esc(name),
        project = esc(project_name),
    )
}

/// Submitted text goes straight into HTML email bodies.
fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
