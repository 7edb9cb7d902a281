//! Email Notification
//!
//! Best-effort transaction emails over SMTP. Dispatch is fire-and-forget:
//! a send runs on a detached blocking task after the ledger mutation has
//! committed, and a failure is only ever logged. The notifier is a no-op
//! when SMTP settings are absent.

use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::domain::Transaction;

/// SMTP connection settings, all-or-nothing from configuration.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// Transaction email dispatcher.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    smtp: Option<SmtpSettings>,
}

impl Notifier {
    pub fn new(smtp: Option<SmtpSettings>) -> Self {
        if smtp.is_none() {
            tracing::info!("SMTP not configured, transaction emails disabled");
        }
        Self { smtp }
    }

    /// No-op notifier for environments without SMTP.
    pub fn disabled() -> Self {
        Self { smtp: None }
    }

    /// Notify the paying side of a completed movement.
    pub fn transfer_dispatched(&self, to: &str, subject: &str, record: &Transaction) {
        let body = format!(
            "Hi {}, \n\n\
             You have transferred \u{20b9}{} to {} on {}. \n\n\
             Thanks & Regards, \n\
             Team SwiftPay.",
            record.from_name(),
            record.amount(),
            record.to_name(),
            record.stamp(),
        );
        self.dispatch(to.to_string(), subject.to_string(), body);
    }

    /// Notify the receiving side of a completed movement.
    pub fn transfer_received(&self, to: &str, subject: &str, record: &Transaction) {
        let body = format!(
            "Hi {}, \n\n\
             You have received \u{20b9}{} from {} on {}. \n\n\
             Thanks & Regards, \n\
             Team SwiftPay.",
            record.to_name(),
            record.amount(),
            record.from_name(),
            record.stamp(),
        );
        self.dispatch(to.to_string(), subject.to_string(), body);
    }

    fn dispatch(&self, to: String, subject: String, body: String) {
        let Some(smtp) = self.smtp.clone() else {
            tracing::debug!(%to, %subject, "Email suppressed (SMTP disabled)");
            return;
        };

        tokio::spawn(async move {
            let outcome = tokio::task::spawn_blocking(move || send_mail(&smtp, &to, &subject, &body))
                .await;
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(reason)) => tracing::warn!("Transaction email failed: {reason}"),
                Err(join_err) => tracing::warn!("Email task failed: {join_err}"),
            }
        });
    }
}

fn send_mail(smtp: &SmtpSettings, to: &str, subject: &str, body: &str) -> Result<(), String> {
    let message = Message::builder()
        .from(smtp.from.parse().map_err(|e| format!("Invalid from address: {e}"))?)
        .to(to.parse().map_err(|e| format!("Invalid to address: {e}"))?)
        .subject(subject)
        .body(body.to_string())
        .map_err(|e| format!("Failed to build email: {e}"))?;

    let mailer = SmtpTransport::relay(&smtp.server)
        .map_err(|e| format!("SMTP relay error: {e}"))?
        .port(smtp.port)
        .credentials(Credentials::new(
            smtp.username.clone(),
            smtp.password.clone(),
        ))
        .build();

    mailer
        .send(&message)
        .map(|_| ())
        .map_err(|e| format!("Failed to send email: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PaymentCategory, TransactionDirection};
    use rust_decimal::Decimal;

    #[test]
    fn test_disabled_notifier_is_inert() {
        let notifier = Notifier::disabled();
        let record = Transaction::success(
            "06-08-26, 10:30:00".to_string(),
            (6381342954, "Anush Raghavender"),
            (7358440894, "Sriman Narayana"),
            Decimal::new(100, 0),
            TransactionDirection::Debited,
            Some(PaymentCategory::Payment),
            None,
        );
        // Must not panic or block without a runtime doing anything.
        notifier.transfer_dispatched("a@example.com", "Payment Transaction", &record);
        notifier.transfer_received("b@example.com", "Payment Transaction", &record);
    }
}
