use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use impactflow::config::{Config, DeliveryPolicy, MailDriver};
use impactflow::email::{Mailer, OutboundEmail};

pub type Outbox = Arc<Mutex<Vec<OutboundEmail>>>;

/// Test mail backend: records every accepted message, optionally failing
/// from the nth send onward.
pub struct CaptureMailer {
    outbox: Outbox,
    fail_from: Option<(usize, String)>,
}

#[async_trait]
impl Mailer for CaptureMailer {
    async fn send(&self, mail: OutboundEmail) -> Result<(), String> {
        let mut outbox = self.outbox.lock().unwrap();
        if let Some((n, detail)) = &self.fail_from {
            if outbox.len() >= *n {
                return Err(detail.clone());
            }
        }
        outbox.push(mail);
        Ok(())
    }
}

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub outbox: Outbox,
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 8 * 1024 * 1024,
        log_level: "warn".to_string(),
        operator_email: "info@masteryhub.co.rw".to_string(),
        mail_driver: MailDriver::Smtp,
        delivery_policy: DeliveryPolicy::AllOrNothing,
        smtp: None,
    }
}

/// Spawn the app with a capturing mail backend that accepts everything.
pub async fn spawn_app() -> TestApp {
    spawn_with(test_config(), true, None).await
}

/// Spawn the app with no mail backend at all, as if the SMTP settings were
/// missing from the environment.
pub async fn spawn_app_unconfigured() -> TestApp {
    spawn_with(test_config(), false, None).await
}

/// Spawn the app with a backend that fails from the `fail_from`-th send
/// onward with the given detail.
pub async fn spawn_app_failing(config: Config, fail_from: usize, detail: &str) -> TestApp {
    spawn_with(config, true, Some((fail_from, detail.to_string()))).await
}

async fn spawn_with(
    config: Config,
    with_mailer: bool,
    fail_from: Option<(usize, String)>,
) -> TestApp {
    let outbox: Outbox = Arc::new(Mutex::new(Vec::new()));

    let mailer: Option<Arc<dyn Mailer>> = with_mailer.then(|| {
        Arc::new(CaptureMailer {
            outbox: outbox.clone(),
            fail_from,
        }) as Arc<dyn Mailer>
    });

    let app = impactflow::build_app_with_mailer(config, mailer);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::new();

    TestApp {
        addr,
        client,
        outbox,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a multipart application, return (body, status).
    pub async fn submit(
        &self,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, Vec<u8>)>,
    ) -> (Value, StatusCode) {
        let resp = self
            .submit_request(fields, file, "application/json")
            .await;
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        (body, status)
    }

    /// Submit as a plain HTML form post, return the rendered page.
    pub async fn submit_html(
        &self,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, Vec<u8>)>,
    ) -> (String, StatusCode) {
        let resp = self.submit_request(fields, file, "text/html").await;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        (body, status)
    }

    async fn submit_request(
        &self,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, Vec<u8>)>,
        accept: &str,
    ) -> reqwest::Response {
        let mut form = Form::new();
        for (k, v) in fields {
            form = form.text(k.to_string(), v.to_string());
        }
        if let Some((filename, content_type, bytes)) = file {
            let part = Part::bytes(bytes)
                .file_name(filename.to_string())
                .mime_str(content_type)
                .expect("invalid test mime type");
            form = form.part("conceptNote", part);
        }

        self.client
            .post(self.url("/api/v1/applications"))
            .header("accept", accept)
            .multipart(form)
            .send()
            .await
            .expect("submit request failed")
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.outbox.lock().unwrap().clone()
    }
}

/// The field set from a complete, valid application.
pub fn valid_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Amina"),
        ("email", "amina@example.com"),
        ("projectName", "AquaSense"),
        ("sector", "agriculture"),
        ("explanation", "Low-cost soil moisture sensors for smallholder farms."),
        ("impact", "Cuts irrigation water use by up to a third."),
        ("differentiation", "An order of magnitude cheaper than existing probes."),
        ("innovation", "Capacitive sensing on printed circuit boards."),
        ("terms", "on"),
    ]
}

pub fn pdf(size: usize) -> (&'static str, &'static str, Vec<u8>) {
    ("concept.pdf", "application/pdf", vec![0x25; size])
}
