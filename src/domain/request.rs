use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value::{RecipientType, SendAt};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One addressee of a [`Message`].
pub struct To {
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RecipientType,
}

impl To {
    pub fn new(email: impl Into<String>, name: impl Into<String>, kind: RecipientType) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Named merge field, used for merge vars and `template_content` blocks.
pub struct Variable {
    pub name: String,
    #[serde(rename = "content")]
    pub value: String,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Merge variables that apply to a single recipient.
pub struct RcptMergeVars {
    #[serde(rename = "rcpt")]
    pub email: String,
    pub vars: Vec<Variable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Per-recipient metadata attached to the sent message.
pub struct RecipientMetadata {
    pub rcpt: String,
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// File attachment or inline image. `content` is base64 encoded.
pub struct Attachment {
    #[serde(rename = "type")]
    pub mime_type: String,
    pub name: String,
    pub content: String,
}

impl Attachment {
    pub fn new(
        mime_type: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            mime_type: mime_type.into(),
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// An email to send through `messages/send` or `messages/send-template`.
///
/// Every field is optional on the wire; unset options and empty lists are left
/// out of the request so that account defaults apply.
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<To>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_opens: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_clicks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_text: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_html: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_css: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_strip_qs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_recipients: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_content_link: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_path_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,
    /// `mailchimp` or `handlebars`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_language: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_merge_vars: Vec<Variable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merge_vars: Vec<RcptMergeVars>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subaccount: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub google_analytics_domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_analytics_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipient_metadata: Vec<RecipientMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Attachment>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recipient to [`Message::to`].
    pub fn add_recipient(
        &mut self,
        email: impl Into<String>,
        name: impl Into<String>,
        kind: RecipientType,
    ) -> &mut Self {
        self.to.push(To::new(email, name, kind));
        self
    }

    /// Append a merge variable shared by all recipients.
    pub fn add_global_merge_var(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.global_merge_vars.push(Variable::new(name, value));
        self
    }

    /// Append merge variables for one recipient, see [`convert_map_to_variables_for_recipient`].
    pub fn add_merge_vars<I, K, V>(&mut self, email: impl Into<String>, vars: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.merge_vars
            .push(convert_map_to_variables_for_recipient(email, vars));
        self
    }

    pub fn add_attachment(&mut self, attachment: Attachment) -> &mut Self {
        self.attachments.push(attachment);
        self
    }

    pub fn add_image(&mut self, image: Attachment) -> &mut Self {
        self.images.push(image);
        self
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tags.push(tag.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Call-level options for `messages/send*`, outside of the message itself.
pub struct SendOptions {
    /// Let Mandrill queue the batch and answer immediately (`async`).
    pub async_send: bool,
    /// Dedicated IP pool to send from (`ip_pool`).
    pub ip_pool: Option<String>,
    /// Schedule delivery for later (`send_at`).
    pub send_at: Option<SendAt>,
}

/// Convert a mapping into merge variables, one [`Variable`] per entry.
///
/// Entries keep the iteration order of `vars`: pass an array or `Vec` of pairs
/// for a fixed order, or a `BTreeMap` for key order.
pub fn convert_map_to_variables<I, K, V>(vars: I) -> Vec<Variable>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    vars.into_iter()
        .map(|(name, value)| Variable::new(name, value))
        .collect()
}

/// Convert a mapping into merge variables bound to `email`.
pub fn convert_map_to_variables_for_recipient<I, K, V>(
    email: impl Into<String>,
    vars: I,
) -> RcptMergeVars
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    RcptMergeVars {
        email: email.into(),
        vars: convert_map_to_variables(vars),
    }
}
