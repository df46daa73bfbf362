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
    let template = std::env::var("MANDRILL_TEMPLATE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MANDRILL_TEMPLATE environment variable is required",
        )
    })?;
    let name = std::env::var("MANDRILL_NAME").unwrap_or_else(|_| "friend".to_owned());

    let client = MandrillClient::from_env()?;

    let mut message = Message::default();
    message
        .add_recipient(to.clone(), name.clone(), RecipientType::To)
        .add_merge_vars(to, [("NAME", name)]);

    match client
        .messages_send_template(&message, &template, [("main", "Hello from the mandrill demo")])
        .await?
    {
        Ok(results) => println!("{results:?}"),
        Err(api_error) => {
            eprintln!("Mandrill rejected the call: {api_error}");
            if api_error.is_auth_error() {
                eprintln!("check MANDRILL_API_KEY");
            }
        }
    }

    Ok(())
}
