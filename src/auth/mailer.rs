use crate::error::{AppError, Result};
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// SMTP settings, all optional. With no host configured the mailer degrades
/// to logging the message body, which keeps local development working
/// without a mail server.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl SmtpConfig {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("SMTP_HOST").ok(),
            username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
            password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            from: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| "Shared Diary <noreply@shared-diary.local>".to_string()),
        }
    }
}

#[derive(Clone)]
pub struct Mailer {
    config: SmtpConfig,
}

impl Mailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    pub async fn send_verification_email(&self, to: &str, token: &str) -> Result<()> {
        let body = format!(
            "Welcome to Shared Diary!\n\n\
             Verify your email address with this token: {}\n\n\
             The token expires in 24 hours.",
            token
        );
        self.send(to, "Verify your Shared Diary account", body).await
    }

    pub async fn send_password_reset_email(&self, to: &str, token: &str) -> Result<()> {
        let body = format!(
            "A password reset was requested for your Shared Diary account.\n\n\
             Reset token: {}\n\n\
             The token expires in 1 hour. If you did not request this, ignore this mail.",
            token
        );
        self.send(to, "Reset your Shared Diary password", body).await
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<()> {
        let Some(host) = self.config.host.as_deref() else {
            tracing::info!(to, subject, "SMTP not configured, logging mail instead: {}", body);
            return Ok(());
        };

        let message = Message::builder()
            .from(
                self.config
                    .from
                    .parse()
                    .map_err(|_| AppError::Internal("Invalid SMTP_FROM address".to_string()))?,
            )
            .to(to
                .parse()
                .map_err(|_| AppError::BadRequest("Invalid recipient address".to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AppError::Internal(format!("Failed to build mail: {}", e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| AppError::Internal(format!("SMTP relay error: {}", e)))?
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send mail: {}", e)))?;

        tracing::debug!(to, subject, "Mail sent");
        Ok(())
    }
}
