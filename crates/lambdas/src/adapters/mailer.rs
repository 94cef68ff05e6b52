use async_trait::async_trait;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

use crate::LambdaError;

/// Sends plain-text email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), LambdaError>;
}

/// [`Mailer`] backed by Amazon SES.
pub struct SesMailer {
    client: aws_sdk_sesv2::Client,
    source: Option<String>,
}

impl SesMailer {
    /// `source` is the verified sender address; sends fail without one.
    pub fn new(client: aws_sdk_sesv2::Client, source: Option<String>) -> Self {
        Self { client, source }
    }
}

fn text(data: &str) -> Result<Content, LambdaError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| LambdaError::Mail(e.to_string()))
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), LambdaError> {
        let source = self
            .source
            .as_deref()
            .ok_or(LambdaError::MissingConfig("SES_SOURCE_EMAIL"))?;

        let message = Message::builder()
            .subject(text(subject)?)
            .body(Body::builder().text(text(body)?).build())
            .build();

        let output = self
            .client
            .send_email()
            .from_email_address(source)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| LambdaError::Mail(e.to_string()))?;

        tracing::info!(
            %to,
            message_id = output.message_id().unwrap_or_default(),
            "Email sent using SES"
        );
        Ok(())
    }
}
