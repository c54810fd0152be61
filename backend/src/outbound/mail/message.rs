//! Rendering of the verification email body.

use serde::Serialize;

use crate::domain::ports::VerificationEmail;

pub(crate) const SUBJECT: &str = "Your Sentinela verification code";

/// JSON payload accepted by the mail relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RelayMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl RelayMessage {
    pub(crate) fn verification(sender: &str, email: &VerificationEmail) -> Self {
        Self {
            from: sender.to_owned(),
            to: email.to.as_ref().to_owned(),
            subject: SUBJECT.to_owned(),
            text: plain_body(email),
            html: html_body(email),
        }
    }
}

fn plain_body(email: &VerificationEmail) -> String {
    format!(
        "Hi {name},\n\n\
         Your Sentinela verification code is {code}.\n\n\
         Enter it on the verification screen to activate your account.\n\n\
         If you did not create an account, you can ignore this message.\n",
        name = email.display_name,
        code = email.code.as_str(),
    )
}

fn html_body(email: &VerificationEmail) -> String {
    format!(
        "<p>Hi {name},</p>\
         <p>Your Sentinela verification code is <strong>{code}</strong>.</p>\
         <p>Enter it on the verification screen to activate your account.</p>\
         <p>If you did not create an account, you can ignore this message.</p>",
        name = escape_html(email.display_name.as_ref()),
        code = email.code.as_str(),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
