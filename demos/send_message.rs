use std::io;

use mandrill::{MandrillClient, Message, RecipientType};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let to = std::env::var("MANDRILL_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MANDRILL_TO environment variable is required",
        )
    })?;
    let from = std::env::var("MANDRILL_FROM").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MANDRILL_FROM environment variable is required",
        )
    })?;

    // Reads MANDRILL_API_KEY and, optionally, MANDRILL_BASE_URL.
    let client = MandrillClient::from_env()?;

    let mut message = Message {
        subject: Some("Hello from the mandrill demo".to_owned()),
        from_email: Some(from),
        text: Some("It works.".to_owned()),
        ..Default::default()
    };
    message.add_recipient(to, "", RecipientType::To);

    match client.messages_send(&message).await? {
        Ok(results) => {
            for result in results {
                println!(
                    "{}: {} (id: {}, reject_reason: {:?})",
                    result.email,
                    result.status.as_str(),
                    result.id,
                    result.reject_reason
                );
            }
        }
        Err(api_error) => eprintln!("Mandrill rejected the call: {api_error}"),
    }

    Ok(())
}
