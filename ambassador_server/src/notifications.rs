//! Order-completed notification emails.
//!
//! When an order is settled, the engine publishes an [`OrderCompletedEvent`]. The hook registered here sends two plain
//! text emails: one to the ambassador that referred the buyer, telling them what they earned, and one to the
//! administrator with the order total.
//!
//! Mail is sent from a blocking SMTP transport on tokio's blocking pool. Failures are logged and never reach the
//! buyer's request.
use ambassador_engine::events::{EventHandlers, EventHooks, OrderCompletedEvent};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Message,
    SmtpTransport,
    Transport,
};
use log::*;
use thiserror::Error;

use crate::config::MailConfig;

pub const NOTIFICATION_EVENT_BUFFER_SIZE: usize = 25;
const ORDER_COMPLETED_SUBJECT: &str = "An order has been completed";

#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error("Invalid email address {address}. {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("Could not build the email. {0}")]
    BuildError(String),
    #[error("Could not send the email. {0}")]
    SendError(String),
    #[error("The email task failed. {0}")]
    TaskFailed(String),
}

pub fn ambassador_message(event: &OrderCompletedEvent) -> String {
    format!("You earned ${:.2} from the link #{}", event.ambassador_revenue, event.order.order.code)
}

pub fn admin_message(event: &OrderCompletedEvent) -> String {
    format!("Order #{} with a total of ${:.2} has been completed", event.order.order.id, event.total())
}

#[derive(Debug, Clone)]
pub struct OrderMailer {
    config: MailConfig,
}

impl OrderMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// The ambassador's email, followed by the administrator's.
    pub fn order_completed_messages(&self, event: &OrderCompletedEvent) -> Result<Vec<Message>, MailError> {
        let to_ambassador = self.plain_text_message(&event.ambassador.email, ambassador_message(event))?;
        let to_admin = self.plain_text_message(&self.config.admin_email, admin_message(event))?;
        Ok(vec![to_ambassador, to_admin])
    }

    pub async fn send_order_completed(&self, event: &OrderCompletedEvent) -> Result<(), MailError> {
        let messages = self.order_completed_messages(event)?;
        let transport = self.transport();
        tokio::task::spawn_blocking(move || {
            messages.iter().try_for_each(|m| {
                transport.send(m).map(|_| ()).map_err(|e| MailError::SendError(e.to_string()))
            })
        })
        .await
        .map_err(|e| MailError::TaskFailed(e.to_string()))?
    }

    fn plain_text_message(&self, to: &str, body: String) -> Result<Message, MailError> {
        Message::builder()
            .from(parse_mailbox(&self.config.from_address)?)
            .to(parse_mailbox(to)?)
            .subject(ORDER_COMPLETED_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailError::BuildError(e.to_string()))
    }

    fn transport(&self) -> SmtpTransport {
        let builder = SmtpTransport::builder_dangerous(&self.config.smtp_host).port(self.config.smtp_port);
        let builder = if self.config.smtp_username.is_empty() {
            builder
        } else {
            let credentials =
                Credentials::new(self.config.smtp_username.clone(), self.config.smtp_password.reveal().clone());
            builder.credentials(credentials)
        };
        builder.build()
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress { address: address.to_string(), reason: e.to_string() })
}

/// Registers the notification mailer on the order-completed hook.
pub fn create_notification_event_handlers(config: MailConfig) -> EventHandlers {
    let mut hooks = EventHooks::default();
    let mailer = OrderMailer::new(config);
    hooks.on_order_completed(move |ev| {
        let mailer = mailer.clone();
        Box::pin(async move {
            let order_id = ev.order.order.id;
            match mailer.send_order_completed(&ev).await {
                Ok(()) => info!("📬️ Notifications for order #{order_id} sent to {}", ev.ambassador.email),
                Err(e) => error!("📬️ Could not send the notifications for order #{order_id}. {e}"),
            }
        })
    });
    EventHandlers::new(NOTIFICATION_EVENT_BUFFER_SIZE, hooks)
}
