use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
    pub operator_email: String,
    pub mail_driver: MailDriver,
    pub delivery_policy: DeliveryPolicy,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
    pub tls: String,
}

/// Which outbound mail backend to use. `Log` writes the would-be messages
/// to the log instead of talking to an SMTP server.
#[derive(Debug, Clone, PartialEq)]
pub enum MailDriver {
    Smtp,
    Log,
}

/// What to do when the operator notification went out but the applicant
/// confirmation failed.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryPolicy {
    /// Any failed send fails the whole submission.
    AllOrNothing,
    /// A failed confirmation is logged and tolerated.
    OperatorOnly,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("IMPACTFLOW_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid IMPACTFLOW_HOST: {e}"))?;

        let port: u16 = env_or("IMPACTFLOW_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid IMPACTFLOW_PORT: {e}"))?;

        let max_body_size: usize = env_or("IMPACTFLOW_MAX_BODY_SIZE", "8388608")
            .parse()
            .map_err(|e| format!("Invalid IMPACTFLOW_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("IMPACTFLOW_LOG_LEVEL", "info");

        let operator_email = env_or("IMPACTFLOW_OPERATOR_EMAIL", "info@masteryhub.co.rw");

        let mail_driver = match env_or("IMPACTFLOW_MAIL_DRIVER", "smtp").as_str() {
            "log" => MailDriver::Log,
            "smtp" => MailDriver::Smtp,
            other => return Err(format!("Invalid IMPACTFLOW_MAIL_DRIVER: {other}")),
        };

        let delivery_policy = match env_or("IMPACTFLOW_DELIVERY_POLICY", "all-or-nothing").as_str() {
            "all-or-nothing" => DeliveryPolicy::AllOrNothing,
            "operator-only" => DeliveryPolicy::OperatorOnly,
            other => return Err(format!("Invalid IMPACTFLOW_DELIVERY_POLICY: {other}")),
        };

        let smtp = match (
            std::env::var("IMPACTFLOW_SMTP_HOST").ok(),
            std::env::var("IMPACTFLOW_SMTP_PORT").ok(),
            std::env::var("IMPACTFLOW_SMTP_USER").ok(),
            std::env::var("IMPACTFLOW_SMTP_PASS").ok(),
            std::env::var("IMPACTFLOW_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid IMPACTFLOW_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
                tls: env_or("IMPACTFLOW_SMTP_TLS", "starttls"),
            }),
            _ => None,
        };

        Ok(Config {
            host,
            port,
            max_body_size,
            log_level,
            operator_email,
            mail_driver,
            delivery_policy,
            smtp,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
