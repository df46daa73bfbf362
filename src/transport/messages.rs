use serde::{Deserialize, Serialize};

use crate::domain::{
    ApiError, ApiKey, Message, RecipientResult, SendOptions, SendStatus, TemplateName, Variable,
};

pub const SEND_PATH: &str = "messages/send.json";
pub const SEND_TEMPLATE_PATH: &str = "messages/send-template.json";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contains no recipient results")]
    EmptyResults,
}

#[derive(Debug, Serialize)]
struct SendJsonRequest<'a> {
    key: &'a str,
    message: &'a Message,
    #[serde(flatten)]
    options: SendOptionsJson<'a>,
}

#[derive(Debug, Serialize)]
struct SendTemplateJsonRequest<'a> {
    key: &'a str,
    template_name: &'a str,
    template_content: &'a [Variable],
    message: &'a Message,
    #[serde(flatten)]
    options: SendOptionsJson<'a>,
}

#[derive(Debug, Serialize)]
struct SendOptionsJson<'a> {
    #[serde(rename = "async", skip_serializing_if = "std::ops::Not::not")]
    async_send: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    ip_pool: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_at: Option<&'a str>,
}

impl<'a> From<&'a SendOptions> for SendOptionsJson<'a> {
    fn from(options: &'a SendOptions) -> Self {
        Self {
            async_send: options.async_send,
            ip_pool: options.ip_pool.as_deref(),
            send_at: options.send_at.as_ref().map(|it| it.as_str()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RecipientJsonResult {
    email: String,
    status: String,
    #[serde(default)]
    reject_reason: Option<String>,
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorJsonResponse {
    status: String,
    code: i32,
    name: String,
    message: String,
}

pub fn encode_send_json(
    key: &ApiKey,
    message: &Message,
    options: &SendOptions,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SendJsonRequest {
        key: key.as_str(),
        message,
        options: options.into(),
    })
}

pub fn encode_send_template_json(
    key: &ApiKey,
    template_name: &TemplateName,
    template_content: &[Variable],
    message: &Message,
    options: &SendOptions,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SendTemplateJsonRequest {
        key: key.as_str(),
        template_name: template_name.as_str(),
        template_content,
        message,
        options: options.into(),
    })
}

pub fn decode_send_json_response(json: &str) -> Result<Vec<RecipientResult>, TransportError> {
    let parsed: Vec<RecipientJsonResult> = serde_json::from_str(json)?;
    if parsed.is_empty() {
        return Err(TransportError::EmptyResults);
    }

    Ok(parsed
        .into_iter()
        .map(|value| RecipientResult {
            email: value.email,
            status: SendStatus::from_wire(value.status),
            reject_reason: value.reject_reason,
            id: value.id,
        })
        .collect())
}

pub fn decode_error_json_response(json: &str) -> Result<ApiError, TransportError> {
    let parsed: ErrorJsonResponse = serde_json::from_str(json)?;
    Ok(ApiError {
        status: parsed.status,
        code: parsed.code,
        name: parsed.name,
        message: parsed.message,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::domain::{RecipientType, SendAt, convert_map_to_variables};

    use super::*;

    fn key() -> ApiKey {
        ApiKey::new("APIKEY").unwrap()
    }

    #[test]
    fn encode_send_injects_key_and_message() {
        let mut message = Message::default();
        message.add_recipient("bob@example.com", "Bob", RecipientType::To);

        let body = encode_send_json(&key(), &message, &SendOptions::default()).unwrap();
        let body: Value = serde_json::from_str(&body).unwrap();

        assert_eq!(
            body,
            json!({
                "key": "APIKEY",
                "message": {
                    "to": [{"email": "bob@example.com", "name": "Bob", "type": "to"}]
                }
            })
        );
    }

    #[test]
    fn encode_send_includes_call_options_when_set() {
        let options = SendOptions {
            async_send: true,
            ip_pool: Some("Main Pool".to_owned()),
            send_at: Some(SendAt::new("2026-10-19 08:30:00").unwrap()),
        };

        let body = encode_send_json(&key(), &Message::default(), &options).unwrap();
        let body: Value = serde_json::from_str(&body).unwrap();

        assert_eq!(body[SendAt::FIELD], "2026-10-19 08:30:00");
        assert_eq!(
            body,
            json!({
                "key": "APIKEY",
                "message": {},
                "async": true,
                "ip_pool": "Main Pool",
                "send_at": "2026-10-19 08:30:00"
            })
        );
    }

    #[test]
    fn encode_send_template_includes_template_fields() {
        let template = TemplateName::new("cheese").unwrap();
        let content = convert_map_to_variables([("name", "bob")]);

        let body = encode_send_template_json(
            &key(),
            &template,
            &content,
            &Message::default(),
            &SendOptions::default(),
        )
        .unwrap();
        let body: Value = serde_json::from_str(&body).unwrap();

        assert_eq!(
            body,
            json!({
                "key": "APIKEY",
                "template_name": "cheese",
                "template_content": [{"name": "name", "content": "bob"}],
                "message": {}
            })
        );
    }

    #[test]
    fn decode_success_maps_wire_names() {
        let json = r#"[{"email":"bob@example.com","status":"sent","reject_reason":"hard-bounce","_id":"1"}]"#;

        let results = decode_send_json_response(json).unwrap();
        assert_eq!(
            results,
            vec![RecipientResult {
                email: "bob@example.com".to_owned(),
                status: SendStatus::Sent,
                reject_reason: Some("hard-bounce".to_owned()),
                id: "1".to_owned(),
            }]
        );
    }

    #[test]
    fn decode_success_accepts_null_reject_reason_and_keeps_order() {
        let json = r#"
        [
          {"email":"a@example.com","status":"queued","reject_reason":null,"_id":"a"},
          {"email":"b@example.com","status":"rejected","reject_reason":"unsub","_id":"b"},
          {"email":"c@example.com","status":"scheduled","_id":"c"}
        ]
        "#;

        let results = decode_send_json_response(json).unwrap();
        let ids = results.iter().map(|it| it.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(results[0].reject_reason, None);
        assert_eq!(results[1].status, SendStatus::Rejected);
        assert_eq!(results[2].reject_reason, None);
    }

    #[test]
    fn decode_success_rejects_empty_array() {
        let err = decode_send_json_response("[]").unwrap_err();
        assert!(matches!(err, TransportError::EmptyResults));
    }

    #[test]
    fn decode_success_rejects_error_shaped_body() {
        let json = r#"{"status":"error","code":-1,"name":"Invalid_Key","message":"Invalid API key"}"#;
        let err = decode_send_json_response(json).unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }

    #[test]
    fn decode_error_maps_all_fields() {
        let json = r#"{"status":"error","code":12,"name":"Unknown_Subaccount","message":"No subaccount exists with the id 'customer-123'"}"#;

        let err = decode_error_json_response(json).unwrap();
        assert_eq!(
            err,
            ApiError {
                status: "error".to_owned(),
                code: 12,
                name: "Unknown_Subaccount".to_owned(),
                message: "No subaccount exists with the id 'customer-123'".to_owned(),
            }
        );
    }

    #[test]
    fn decode_error_rejects_malformed_body() {
        let err = decode_error_json_response("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }
}
