/**
 * Email Notification Composition
 *
 * Builds the payloads handed to the notification dispatcher. The payload shape
 * (`to`, `subject`, `html`, `type`) is what the email function expects. Every piece
 * of user-provided text is HTML-escaped before it is interpolated.
 */
use serde::{Deserialize, Serialize};

use crate::shared::intercom::submission::Disclosure;

const SIGNATURE: &str = "MonAdresse";

/// Category of an outgoing email
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    ContactRequest,
    ContactResponse,
    Notification,
}

impl EmailKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailKind::ContactRequest => "contact_request",
            EmailKind::ContactResponse => "contact_response",
            EmailKind::Notification => "notification",
        }
    }
}

/// Payload posted to the email function
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailNotification {
    pub to: String,
    pub subject: String,
    pub html: String,
    #[serde(rename = "type")]
    pub kind: EmailKind,
}

/// Escape text for interpolation into HTML
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn sender_label(sender_name: &str) -> String {
    let trimmed = sender_name.trim();
    if trimmed.is_empty() {
        "Un visiteur".to_string()
    } else {
        html_escape(trimmed)
    }
}

/// Contact lines for the details the sender chose to share
fn contact_block(disclosure: &Disclosure) -> String {
    let mut lines = String::new();
    if let Some(phone) = &disclosure.phone {
        lines.push_str(&format!("<p><strong>Téléphone:</strong> {}</p>", html_escape(phone)));
    }
    if let Some(email) = &disclosure.email {
        lines.push_str(&format!("<p><strong>Email:</strong> {}</p>", html_escape(email)));
    }
    if lines.is_empty() {
        "<p style=\"color: #666; font-size: 14px;\">Le visiteur n'a pas partagé ses coordonnées.</p>"
            .to_string()
    } else {
        format!("<hr>{}", lines)
    }
}

/// A visitor rang the recipient's mailbox
pub fn compose_ring(
    to: &str,
    sender_name: &str,
    mailbox_name: &str,
    message: &str,
    disclosure: &Disclosure,
) -> EmailNotification {
    let html = format!(
        "<h2>Quelqu'un sonne à votre interphone</h2>\
         <p><strong>{}</strong> a sonné à votre boîte aux lettres <strong>{}</strong>.</p>\
         <p><strong>Message:</strong></p>\
         <p>{}</p>\
         {}",
        sender_label(sender_name),
        html_escape(mailbox_name),
        html_escape(message),
        contact_block(disclosure),
    );
    EmailNotification {
        to: to.to_string(),
        subject: format!("Sonnerie d'interphone - {}", SIGNATURE),
        html,
        kind: EmailKind::Notification,
    }
}

/// A visitor sent the recipient a contact request
pub fn compose_request(
    to: &str,
    sender_name: &str,
    mailbox_name: &str,
    message: &str,
    disclosure: &Disclosure,
) -> EmailNotification {
    let html = format!(
        "<h2>Nouvelle demande de contact</h2>\
         <p><strong>{}</strong> souhaite vous contacter concernant votre boîte aux lettres <strong>{}</strong>.</p>\
         <p><strong>Message:</strong></p>\
         <p>{}</p>\
         {}\
         <p>Connectez-vous à {} pour répondre à cette demande.</p>",
        sender_label(sender_name),
        html_escape(mailbox_name),
        html_escape(message),
        contact_block(disclosure),
        SIGNATURE,
    );
    EmailNotification {
        to: to.to_string(),
        subject: format!("Nouvelle demande de contact - {}", SIGNATURE),
        html,
        kind: EmailKind::ContactRequest,
    }
}

/// The recipient accepted; the sender learns the recipient's email
pub fn compose_accepted(
    to: &str,
    recipient_name: &str,
    mailbox_name: &str,
    recipient_email: &str,
) -> EmailNotification {
    let name = if recipient_name.trim().is_empty() {
        "Le résident".to_string()
    } else {
        html_escape(recipient_name.trim())
    };
    let email = html_escape(recipient_email);
    let html = format!(
        "<h2>Demande de contact acceptée</h2>\
         <p><strong>{}</strong> a accepté votre demande de contact pour <strong>{}</strong>.</p>\
         <p>Email de contact: <a href=\"mailto:{}\">{}</a></p>\
         <p>Vous pouvez maintenant communiquer directement.</p>",
        name,
        html_escape(mailbox_name),
        email,
        email,
    );
    EmailNotification {
        to: to.to_string(),
        subject: format!("Demande de contact acceptée - {}", SIGNATURE),
        html,
        kind: EmailKind::ContactResponse,
    }
}

/// The recipient declined; no contact detail is included
pub fn compose_declined(to: &str, mailbox_name: &str) -> EmailNotification {
    let html = format!(
        "<h2>Demande de contact refusée</h2>\
         <p>Votre demande de contact pour <strong>{}</strong> a été refusée.</p>",
        html_escape(mailbox_name),
    );
    EmailNotification {
        to: to.to_string(),
        subject: format!("Demande de contact refusée - {}", SIGNATURE),
        html,
        kind: EmailKind::ContactResponse,
    }
}

/// Password reset link
pub fn compose_password_reset(to: &str, reset_link: &str) -> EmailNotification {
    let link = html_escape(reset_link);
    let html = format!(
        "<h2>Réinitialisation du mot de passe</h2>\
         <p>Pour choisir un nouveau mot de passe, suivez ce lien :</p>\
         <p><a href=\"{}\">{}</a></p>\
         <p>Ce lien expire dans une heure. Si vous n'êtes pas à l'origine de cette demande, ignorez cet email.</p>",
        link, link,
    );
    EmailNotification {
        to: to.to_string(),
        subject: format!("Réinitialisation du mot de passe - {}", SIGNATURE),
        html,
        kind: EmailKind::Notification,
    }
}
