//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    Attachment, Message, RcptMergeVars, RecipientMetadata, SendOptions, To, Variable,
    convert_map_to_variables, convert_map_to_variables_for_recipient,
};
pub use response::{ApiError, ApiResult, RecipientResult};
pub use validation::ValidationError;
pub use value::{ApiKey, KnownErrorName, RecipientType, SendAt, SendStatus, TemplateName};

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn api_key_rejects_empty() {
        assert!(matches!(
            ApiKey::new("   "),
            Err(ValidationError::Empty {
                field: ApiKey::FIELD
            })
        ));
    }

    #[test]
    fn api_key_is_trimmed_and_redacted_in_debug() {
        let key = ApiKey::new("  secret-key ").unwrap();
        assert_eq!(key.as_str(), "secret-key");
        assert!(!format!("{key:?}").contains("secret"));
    }

    #[test]
    fn template_name_rejects_empty() {
        assert!(matches!(
            TemplateName::new(""),
            Err(ValidationError::Empty {
                field: TemplateName::FIELD
            })
        ));
        assert_eq!(TemplateName::new(" cheese ").unwrap().as_str(), "cheese");
    }

    #[test]
    fn add_recipient_appends_to_empty_message() {
        let mut message = Message::default();
        message.add_recipient("bob@example.com", "Bob Johnson", RecipientType::To);

        assert_eq!(
            message.to,
            vec![To {
                email: "bob@example.com".to_owned(),
                name: "Bob Johnson".to_owned(),
                kind: RecipientType::To,
            }]
        );
    }

    #[test]
    fn add_recipient_keeps_insertion_order() {
        let mut message = Message::new();
        message
            .add_recipient("a@example.com", "A", RecipientType::To)
            .add_recipient("b@example.com", "B", RecipientType::Bcc);

        let emails = message.to.iter().map(|to| to.email.as_str()).collect::<Vec<_>>();
        assert_eq!(emails, ["a@example.com", "b@example.com"]);
        assert_eq!(message.to[1].kind, RecipientType::Bcc);
    }

    #[test]
    fn recipient_type_display_matches_wire_value() {
        for kind in [RecipientType::To, RecipientType::Cc, RecipientType::Bcc] {
            let wire = serde_json::to_value(kind).unwrap();
            assert_eq!(wire, kind.as_str());
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn convert_map_to_variables_keeps_entry_order() {
        let vars = convert_map_to_variables([("name", "bob"), ("food", "cheese")]);
        assert_eq!(
            vars,
            vec![Variable::new("name", "bob"), Variable::new("food", "cheese")]
        );
    }

    #[test]
    fn convert_map_to_variables_from_btree_map_uses_key_order() {
        let mut map = BTreeMap::new();
        map.insert("name".to_owned(), "bob".to_owned());
        map.insert("food".to_owned(), "cheese".to_owned());

        let vars = convert_map_to_variables(map);
        assert_eq!(
            vars,
            vec![Variable::new("food", "cheese"), Variable::new("name", "bob")]
        );
    }

    #[test]
    fn convert_map_to_variables_survives_json_round_trip() {
        let vars = convert_map_to_variables([("name", "bob"), ("food", "cheese")]);
        let json = serde_json::to_string(&vars).unwrap();
        assert_eq!(
            json,
            r#"[{"name":"name","content":"bob"},{"name":"food","content":"cheese"}]"#
        );

        let back: Vec<Variable> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vars);
    }

    #[test]
    fn convert_map_to_variables_for_recipient_wraps_variables() {
        let map = [("name", "bob"), ("food", "cheese")];
        let target = convert_map_to_variables_for_recipient("bob@example.com", map);
        assert_eq!(
            target,
            RcptMergeVars {
                email: "bob@example.com".to_owned(),
                vars: convert_map_to_variables(map),
            }
        );
    }

    #[test]
    fn empty_message_serializes_to_empty_object() {
        let json = serde_json::to_value(Message::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn message_uses_wire_field_names() {
        let mut message = Message {
            subject: Some("hi".to_owned()),
            track_opens: Some(true),
            ..Default::default()
        };
        message
            .add_recipient("bob@example.com", "Bob", RecipientType::Cc)
            .add_merge_vars("bob@example.com", [("name", "bob")])
            .add_attachment(Attachment::new("text/plain", "a.txt", "aGk="))
            .add_tag("welcome");

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "subject": "hi",
                "to": [{"email": "bob@example.com", "name": "Bob", "type": "cc"}],
                "track_opens": true,
                "merge_vars": [
                    {"rcpt": "bob@example.com", "vars": [{"name": "name", "content": "bob"}]}
                ],
                "tags": ["welcome"],
                "attachments": [{"type": "text/plain", "name": "a.txt", "content": "aGk="}],
            })
        );
    }

    #[test]
    fn global_merge_vars_and_images_are_appended() {
        let mut message = Message::new();
        message
            .add_global_merge_var("company", "Acme")
            .add_image(Attachment::new("image/png", "logo", "iVBORw0KGgo="));

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "global_merge_vars": [{"name": "company", "content": "Acme"}],
                "images": [{"type": "image/png", "name": "logo", "content": "iVBORw0KGgo="}],
            })
        );
    }

    #[test]
    fn send_at_requires_api_format() {
        assert_eq!(
            SendAt::new("2026-10-19 08:30:00").unwrap().as_str(),
            "2026-10-19 08:30:00"
        );
        assert!(SendAt::new("2026-10-19T08:30:00").is_err());
        assert!(SendAt::new("2026-13-19 08:30:00").is_err());
        assert!(SendAt::new("2026-10-19 24:00:00").is_err());
        assert!(SendAt::new("2026-10-19").is_err());
    }

    #[test]
    fn send_status_preserves_unknown_values() {
        assert_eq!(SendStatus::from_wire("sent"), SendStatus::Sent);
        assert!(SendStatus::from_wire("queued").is_accepted());
        assert!(!SendStatus::from_wire("rejected").is_accepted());

        let other = SendStatus::from_wire("deferred");
        assert_eq!(other, SendStatus::Other("deferred".to_owned()));
        assert_eq!(other.as_str(), "deferred");
    }

    #[test]
    fn api_error_known_name_helpers() {
        let err = ApiError {
            status: "error".to_owned(),
            code: -1,
            name: "Invalid_Key".to_owned(),
            message: "Invalid API key".to_owned(),
        };
        assert_eq!(err.known_name(), Some(KnownErrorName::InvalidKey));
        assert!(err.is_auth_error());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Invalid_Key (-1): Invalid API key");

        let unknown = ApiError {
            name: "Something_New".to_owned(),
            ..err
        };
        assert_eq!(unknown.known_name(), None);
        assert!(!unknown.is_auth_error());
    }
}
