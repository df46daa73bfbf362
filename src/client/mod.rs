//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

use crate::domain::{
    ApiKey, ApiResult, Message, RecipientResult, SendOptions, TemplateName, ValidationError,
    convert_map_to_variables,
};
use crate::transport::{
    SEND_PATH, SEND_TEMPLATE_PATH, TransportError, decode_error_json_response,
    decode_send_json_response, encode_send_json, encode_send_template_json,
};

/// Default Mandrill API root.
pub const DEFAULT_BASE_URL: &str = "https://mandrillapp.com/api/1.0/";

/// Environment variable read by [`MandrillClient::from_env`] for the API key.
pub const API_KEY_ENV: &str = "MANDRILL_API_KEY";
/// Optional environment variable read by [`MandrillClient::from_env`] for the base URL.
pub const BASE_URL_ENV: &str = "MANDRILL_BASE_URL";

/// Boxed error returned by [`HttpTransport`] implementations.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Boxed future returned by [`HttpTransport`] implementations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw HTTP response handed back by a transport.
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Network layer used by [`MandrillClient`].
///
/// The default implementation is backed by `reqwest`. Provide your own through
/// [`MandrillClientBuilder::transport`] to proxy, record or stub requests.
/// Any non-200 status must be returned as a regular [`HttpResponse`]; only
/// failures to complete the exchange belong in the error.
pub trait HttpTransport: Send + Sync {
    /// POST `body` (a JSON document) to `url`.
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;
}

#[derive(Debug, Clone)]
/// [`HttpTransport`] backed by a `reqwest::Client`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`MandrillClient`] when a call could not produce an API outcome.
///
/// Errors reported by Mandrill itself are not part of this type: they are
/// returned as [`crate::ApiError`] values inside the successful result.
pub enum MandrillError {
    /// HTTP client / transport failure (DNS, TLS, connection refused, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Response body could not be parsed as the expected JSON shape.
    #[error("decode error (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: BoxError,
    },

    /// Request payload could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
}

#[derive(Clone)]
/// Builder for [`MandrillClient`].
///
/// Use this when you need to customize the base URL, timeout, user-agent or transport.
pub struct MandrillClientBuilder {
    api_key: ApiKey,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl MandrillClientBuilder {
    /// Create a builder with the default base URL and the reqwest transport.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
            transport: None,
        }
    }

    /// Create a builder from `MANDRILL_API_KEY` and, if set, `MANDRILL_BASE_URL`.
    pub fn from_env() -> Result<Self, MandrillError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MandrillError> {
        let api_key = lookup(API_KEY_ENV).ok_or(MandrillError::MissingEnv(API_KEY_ENV))?;
        let mut builder = Self::new(ApiKey::new(api_key)?);
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            builder = builder.base_url(base_url);
        }
        Ok(builder)
    }

    /// Override the API root, e.g. `https://mandrillapp.com/api/1.0/`.
    ///
    /// A missing trailing slash is added; endpoints are resolved relative to this URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    ///
    /// Ignored when a custom transport is set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    ///
    /// Ignored when a custom transport is set.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the network layer.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build a [`MandrillClient`].
    pub fn build(self) -> Result<MandrillClient, MandrillError> {
        let base_url = normalize_base_url(&self.base_url)?;

        let http: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }

                let client = builder
                    .build()
                    .map_err(|err| MandrillError::Transport(Box::new(err)))?;
                Arc::new(ReqwestTransport::new(client))
            }
        };

        Ok(MandrillClient {
            api_key: self.api_key,
            base_url,
            http,
        })
    }
}

fn normalize_base_url(input: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidBaseUrl {
        input: input.to_owned(),
    };

    let mut url = Url::parse(input.trim()).map_err(|_| invalid())?;
    if url.cannot_be_a_base()
        || !matches!(url.scheme(), "http" | "https")
        || url.fragment().is_some()
    {
        return Err(invalid());
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url.into())
}

/// `url` without userinfo, for logging.
fn redacted(url: &Url) -> Url {
    let mut url = url.clone();
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url
}

#[derive(Clone)]
/// High-level Mandrill client.
///
/// Holds the API key, the API root and the transport. It is cheap to clone and
/// can be shared between tasks; every call is a single request/response exchange.
///
/// Request builders return `Result<ApiResult<T>, MandrillError>`:
/// - `Ok(Ok(value))` when Mandrill answered with HTTP 200,
/// - `Ok(Err(api_error))` when Mandrill answered with an error object,
/// - `Err(_)` when the exchange failed or the body could not be decoded.
pub struct MandrillClient {
    api_key: ApiKey,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl MandrillClient {
    /// Create a client using the default base URL.
    ///
    /// For more customization, use [`MandrillClient::builder`].
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: Arc::new(ReqwestTransport::new(reqwest::Client::new())),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(api_key: ApiKey) -> MandrillClientBuilder {
        MandrillClientBuilder::new(api_key)
    }

    /// Create a client configured from the environment, see [`MandrillClientBuilder::from_env`].
    pub fn from_env() -> Result<Self, MandrillError> {
        MandrillClientBuilder::from_env()?.build()
    }

    /// The API root every endpoint is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON payload to `endpoint` (relative to the base URL) and return the raw response.
    ///
    /// Only transport failures are errors here; the status code is not interpreted.
    pub async fn send(
        &self,
        endpoint: &str,
        payload: String,
    ) -> Result<HttpResponse, MandrillError> {
        let url = self.endpoint_url(endpoint)?;
        let logged = redacted(&url);
        debug!(url = %logged, "sending Mandrill request");

        let response = self
            .http
            .post_json(url.as_str(), payload)
            .await
            .map_err(|err| {
                warn!(url = %logged, error = %err, "Mandrill request failed");
                MandrillError::Transport(err)
            })?;

        debug!(url = %logged, status = response.status, "received Mandrill response");
        Ok(response)
    }

    /// Send a message through `messages/send`.
    ///
    /// Errors:
    /// - [`MandrillError::Transport`] when the request could not be completed,
    /// - [`MandrillError::Decode`] when the body is not the expected JSON.
    pub async fn messages_send(
        &self,
        message: &Message,
    ) -> Result<ApiResult<Vec<RecipientResult>>, MandrillError> {
        self.messages_send_with_options(message, &SendOptions::default())
            .await
    }

    /// Same as [`MandrillClient::messages_send`] with `async`, `ip_pool` and `send_at` options.
    pub async fn messages_send_with_options(
        &self,
        message: &Message,
        options: &SendOptions,
    ) -> Result<ApiResult<Vec<RecipientResult>>, MandrillError> {
        let payload = encode_send_json(&self.api_key, message, options)?;
        let response = self.send(SEND_PATH, payload).await?;
        decode_send_outcome(response)
    }

    /// Send a message rendered from a stored template through `messages/send-template`.
    ///
    /// `contents` fills the template's editable regions; see
    /// [`crate::convert_map_to_variables`] for ordering.
    ///
    /// Errors:
    /// - [`MandrillError::Validation`] for an empty template name,
    /// - [`MandrillError::Transport`] when the request could not be completed,
    /// - [`MandrillError::Decode`] when the body is not the expected JSON.
    pub async fn messages_send_template<I, K, V>(
        &self,
        message: &Message,
        template_name: &str,
        contents: I,
    ) -> Result<ApiResult<Vec<RecipientResult>>, MandrillError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.messages_send_template_with_options(
            message,
            template_name,
            contents,
            &SendOptions::default(),
        )
        .await
    }

    /// Same as [`MandrillClient::messages_send_template`] with call options.
    pub async fn messages_send_template_with_options<I, K, V>(
        &self,
        message: &Message,
        template_name: &str,
        contents: I,
        options: &SendOptions,
    ) -> Result<ApiResult<Vec<RecipientResult>>, MandrillError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let template_name = TemplateName::new(template_name)?;
        let template_content = convert_map_to_variables(contents);

        let payload = encode_send_template_json(
            &self.api_key,
            &template_name,
            &template_content,
            message,
            options,
        )?;
        let response = self.send(SEND_TEMPLATE_PATH, payload).await?;
        decode_send_outcome(response)
    }

    /// Resolve `endpoint` below the base URL, carrying over the base URL's query.
    fn endpoint_url(&self, endpoint: &str) -> Result<Url, ValidationError> {
        let invalid = || ValidationError::InvalidEndpoint {
            input: endpoint.to_owned(),
        };

        let mut base = Url::parse(&self.base_url).map_err(|_| ValidationError::InvalidBaseUrl {
            input: self.base_url.clone(),
        })?;
        let query = base.query().map(str::to_owned);
        base.set_query(None);

        let mut url = base
            .join(endpoint.trim_start_matches('/'))
            .map_err(|_| invalid())?;
        if !url.as_str().starts_with(base.as_str()) {
            return Err(invalid());
        }
        if url.query().is_none() {
            url.set_query(query.as_deref());
        }
        Ok(url)
    }
}

fn decode_send_outcome(
    response: HttpResponse,
) -> Result<ApiResult<Vec<RecipientResult>>, MandrillError> {
    let status = response.status;
    let decode_error = |err: TransportError| {
        warn!(status, error = %err, "could not decode Mandrill response");
        MandrillError::Decode {
            status,
            source: Box::new(err),
        }
    };

    if status == 200 {
        let results = decode_send_json_response(&response.body).map_err(decode_error)?;
        return Ok(Ok(results));
    }

    let api_error = decode_error_json_response(&response.body).map_err(decode_error)?;
    warn!(
        status,
        code = api_error.code,
        name = %api_error.name,
        "Mandrill returned an error"
    );
    Ok(Err(api_error))
}
