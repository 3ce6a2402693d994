//! Typed clients sharing one retried exchange path.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;

use tinta_commerce::cart::CartItem;
use tinta_commerce::config::QuoteOptions;
use tinta_commerce::contact::{CustomerContact, DeliveryMethod};
use tinta_commerce::money::Money;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::retry::{ExchangeTag, RetryPolicy};
use crate::transport::Collaborator;
use crate::wire::{
    decode_response, ApiRequest, ClientePayload, ItemPayload, OrderReceipt, PriceOptions,
    PriceQuote, UploadReceipt,
};

/// Perform one exchange with up to `policy.max_attempts` attempts.
///
/// Every failure mode is retried uniformly; the last error surfaces once
/// attempts are exhausted.
async fn exchange<T: DeserializeOwned>(
    collaborator: &dyn Collaborator,
    policy: &RetryPolicy,
    tag: ExchangeTag,
    request: &ApiRequest,
) -> Result<T, ClientError> {
    let body =
        serde_json::to_string(request).map_err(|e| ClientError::Malformed(e.to_string()))?;

    let mut last_error = ClientError::Transport("no attempt made".to_string());
    for attempt in 1..=policy.max_attempts {
        let outcome = match collaborator.post(body.clone()).await {
            Ok(response_body) => decode_response::<T>(&response_body),
            Err(err) => Err(err),
        };
        match outcome {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::warn!(
                    exchange = tag.name(),
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %err,
                    "collaborator exchange failed"
                );
                last_error = err;
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.delay_after(attempt)).await;
                }
            }
        }
    }
    Err(last_error)
}

/// Client for `getPrice` exchanges.
#[derive(Clone)]
pub struct PricingClient {
    collaborator: Arc<dyn Collaborator>,
    policy: RetryPolicy,
}

impl PricingClient {
    pub fn new(collaborator: Arc<dyn Collaborator>) -> Self {
        Self {
            collaborator,
            policy: ExchangeTag::Pricing.default_policy(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Request a price for the given draft options.
    pub async fn quote(&self, options: &QuoteOptions) -> Result<PriceQuote, ClientError> {
        let request = ApiRequest::GetPrice {
            options: PriceOptions::from(options),
        };
        exchange(
            self.collaborator.as_ref(),
            &self.policy,
            ExchangeTag::Pricing,
            &request,
        )
        .await
    }
}

/// Client for `submitOrder` exchanges.
#[derive(Clone)]
pub struct OrderClient {
    collaborator: Arc<dyn Collaborator>,
    policy: RetryPolicy,
}

impl OrderClient {
    pub fn new(collaborator: Arc<dyn Collaborator>) -> Self {
        Self {
            collaborator,
            policy: ExchangeTag::Order.default_policy(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Submit the order built from checkout data and the cart snapshot.
    pub async fn submit(
        &self,
        contact: &CustomerContact,
        delivery: &DeliveryMethod,
        total: Money,
        items: &[CartItem],
    ) -> Result<OrderReceipt, ClientError> {
        let request = ApiRequest::SubmitOrder {
            cliente: ClientePayload::new(contact, delivery, total),
            items: items.iter().map(ItemPayload::from).collect(),
        };
        exchange(
            self.collaborator.as_ref(),
            &self.policy,
            ExchangeTag::Order,
            &request,
        )
        .await
    }
}

/// Client for `uploadFile` exchanges.
#[derive(Clone)]
pub struct FileUploadClient {
    collaborator: Arc<dyn Collaborator>,
    policy: RetryPolicy,
    max_file_size: usize,
}

impl FileUploadClient {
    pub fn new(collaborator: Arc<dyn Collaborator>) -> Self {
        Self {
            collaborator,
            policy: ExchangeTag::Upload.default_policy(),
            max_file_size: crate::config::DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_file_size(mut self, bytes: usize) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Upload a document, returning its durable handle.
    ///
    /// Oversized payloads are rejected before any network attempt and do
    /// not consume the retry budget.
    pub async fn upload(
        &self,
        bytes: &[u8],
        mime_type: &str,
        file_name: &str,
    ) -> Result<UploadReceipt, ClientError> {
        if bytes.len() > self.max_file_size {
            return Err(ClientError::FileTooLarge {
                size: bytes.len(),
                limit: self.max_file_size,
            });
        }
        let request = ApiRequest::UploadFile {
            file_base64: BASE64.encode(bytes),
            file_type: mime_type.to_string(),
            file_name: file_name.to_string(),
        };
        exchange(
            self.collaborator.as_ref(),
            &self.policy,
            ExchangeTag::Upload,
            &request,
        )
        .await
    }
}

/// Build the three clients from one configuration and collaborator.
pub fn build_clients(
    config: &ClientConfig,
    collaborator: Arc<dyn Collaborator>,
) -> (PricingClient, OrderClient, FileUploadClient) {
    let policy = config.retry_policy();
    (
        PricingClient::new(collaborator.clone()).with_policy(policy.clone()),
        OrderClient::new(collaborator.clone()).with_policy(policy.clone()),
        FileUploadClient::new(collaborator)
            .with_policy(policy)
            .with_max_file_size(config.max_file_size),
    )
}
