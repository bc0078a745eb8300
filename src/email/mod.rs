pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{Config, DeliveryPolicy, MailDriver, SmtpConfig};
use crate::models::SubmissionPayload;

/// One outbound message, transport-agnostic.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub attachment: Option<MailAttachment>,
}

#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Outbound mail backend. The real implementation talks SMTP; the log
/// implementation just records the envelope, for development.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutboundEmail) -> Result<(), String>;
}

/// Select and build the configured backend. `None` means the smtp driver is
/// selected but cannot be built, which every submission will report as a
/// configuration error.
pub fn build_mailer(config: &Config) -> Option<Arc<dyn Mailer>> {
    match config.mail_driver {
        MailDriver::Log => {
            tracing::info!("Mail driver is 'log'; deliveries will be written to the log only");
            Some(Arc::new(LogMailer))
        }
        MailDriver::Smtp => config.smtp.as_ref().and_then(|smtp| {
            match SmtpMailer::new(smtp) {
                Ok(mailer) => {
                    tracing::info!("SMTP transport configured for {}", smtp.host);
                    Some(Arc::new(mailer) as Arc<dyn Mailer>)
                }
                Err(e) => {
                    tracing::warn!("SMTP transport not available: {e}");
                    None
                }
            }
        }),
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = match config.tls.as_str() {
            "tls" => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| format!("SMTP relay error: {e}"))?
                .port(config.port)
                .credentials(creds)
                .build(),
            "none" => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .credentials(creds)
                .build(),
            _ => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| format!("SMTP starttls error: {e}"))?
                .port(config.port)
                .credentials(creds)
                .build(),
        };

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutboundEmail) -> Result<(), String> {
        let mut builder = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(mail
                .to
                .parse()
                .map_err(|e| format!("Invalid to address: {e}"))?)
            .subject(mail.subject);

        if let Some(reply_to) = &mail.reply_to {
            builder = builder.reply_to(
                reply_to
                    .parse()
                    .map_err(|e| format!("Invalid reply-to address: {e}"))?,
            );
        }

        let message = match mail.attachment {
            Some(att) => {
                let content_type = ContentType::parse(&att.content_type)
                    .map_err(|e| format!("Invalid attachment content type: {e}"))?;
                builder
                    .multipart(
                        MultiPart::mixed()
                            .singlepart(SinglePart::html(mail.html))
                            .singlepart(
                                Attachment::new(att.filename).body(att.bytes.to_vec(), content_type),
                            ),
                    )
                    .map_err(|e| format!("Failed to build email: {e}"))?
            }
            None => builder
                .header(ContentType::TEXT_HTML)
                .body(mail.html)
                .map_err(|e| format!("Failed to build email: {e}"))?,
        };

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(())
    }
}

/// Development backend: pretends every send succeeded.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutboundEmail) -> Result<(), String> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            attachment = mail
                .attachment
                .as_ref()
                .map(|a| a.filename.as_str())
                .unwrap_or("none"),
            "simulated delivery"
        );
        Ok(())
    }
}

/// Turns one validated application into its two deliveries: the operator
/// notification carrying the concept note, then the applicant confirmation.
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    operator: String,
    policy: DeliveryPolicy,
}

impl Dispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, operator: String, policy: DeliveryPolicy) -> Self {
        Self {
            mailer,
            operator,
            policy,
        }
    }

    pub async fn dispatch(&self, payload: &SubmissionPayload) -> Result<(), String> {
        let notification = OutboundEmail {
            to: self.operator.clone(),
            reply_to: Some(payload.email.clone()),
            subject: format!("New Project Application: {}", payload.project_name),
            html: templates::render_operator_notification(payload),
            attachment: Some(MailAttachment {
                filename: payload.concept_note.filename.clone(),
                content_type: payload.concept_note.content_type.clone(),
                bytes: payload.concept_note.bytes.clone(),
            }),
        };
        self.mailer.send(notification).await?;

        let confirmation = OutboundEmail {
            to: payload.email.clone(),
            reply_to: None,
            subject: "Thank you for your application - Code for Impact".to_string(),
            html: templates::render_applicant_confirmation(&payload.name, &payload.project_name),
            attachment: None,
        };

        match self.mailer.send(confirmation).await {
            Ok(()) => Ok(()),
            Err(e) => match self.policy {
                DeliveryPolicy::AllOrNothing => Err(e),
                DeliveryPolicy::OperatorOnly => {
                    tracing::warn!(
                        "Applicant confirmation failed after operator notification was sent: {e}"
                    );
                    Ok(())
                }
            },
        }
    }
}
