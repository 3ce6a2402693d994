//! Wire types for the collaborator endpoint.
//!
//! One endpoint, JSON-bodied POSTs distinguished by an `action` field.
//! Field names follow the collaborator contract exactly, including the
//! Spanish ones (`cantidad`, `rango`, `metodoEntrega`).

use serde::{Deserialize, Serialize};
use tinta_commerce::cart::CartItem;
use tinta_commerce::config::QuoteOptions;
use tinta_commerce::contact::{CustomerContact, DeliveryMethod};
use tinta_commerce::money::{Currency, Money};

use crate::error::ClientError;

/// A request to the collaborator.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ApiRequest {
    #[serde(rename_all = "camelCase")]
    UploadFile {
        file_base64: String,
        file_type: String,
        file_name: String,
    },
    GetPrice {
        options: PriceOptions,
    },
    SubmitOrder {
        cliente: ClientePayload,
        items: Vec<ItemPayload>,
    },
}

/// Options payload of a `getPrice` request.
#[derive(Debug, Clone, Serialize)]
pub struct PriceOptions {
    pub color: String,
    pub paper: String,
    pub size: String,
    pub sides: String,
    #[serde(rename = "pageCount")]
    pub page_count: u32,
    pub cantidad: u32,
    pub rango: String,
}

impl From<&QuoteOptions> for PriceOptions {
    fn from(options: &QuoteOptions) -> Self {
        Self {
            color: options.color.as_str().to_string(),
            paper: options.paper.as_str().to_string(),
            size: options.size.as_str().to_string(),
            sides: options.sides.as_str().to_string(),
            page_count: options.page_count,
            cantidad: options.quantity,
            rango: options.page_range.as_str().to_string(),
        }
    }
}

/// Customer payload of a `submitOrder` request.
#[derive(Debug, Clone, Serialize)]
pub struct ClientePayload {
    pub nombre: String,
    pub email: String,
    pub telefono: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sucursal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(rename = "metodoEntrega")]
    pub metodo_entrega: String,
    pub total: f64,
}

impl ClientePayload {
    /// Build the customer payload from checkout data.
    pub fn new(contact: &CustomerContact, delivery: &DeliveryMethod, total: Money) -> Self {
        let (sucursal, direccion) = match delivery {
            DeliveryMethod::Pickup { branch } => (Some(branch.as_str().to_string()), None),
            DeliveryMethod::Domicilio { address } => (None, Some(address.clone())),
        };
        Self {
            nombre: contact.name.trim().to_string(),
            email: contact.email.trim().to_string(),
            telefono: contact.phone.trim().to_string(),
            sucursal,
            direccion,
            metodo_entrega: delivery.as_str().to_string(),
            total: total.to_decimal(),
        }
    }
}

/// Line item payload of a `submitOrder` request.
#[derive(Debug, Clone, Serialize)]
pub struct ItemPayload {
    pub id: String,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
    pub cantidad: u32,
    #[serde(rename = "pageCount")]
    pub page_count: u32,
    pub color: String,
    pub paper: String,
    pub size: String,
    pub sides: String,
    pub rango: String,
    pub total: f64,
}

impl From<&CartItem> for ItemPayload {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.to_string(),
            file_name: item.file_name.clone(),
            file_id: item.file_id.as_ref().map(|id| id.to_string()),
            cantidad: item.quantity,
            page_count: item.page_count,
            color: item.color.as_str().to_string(),
            paper: item.paper.as_str().to_string(),
            size: item.size.as_str().to_string(),
            sides: item.sides.as_str().to_string(),
            rango: item.page_range.as_str().to_string(),
            total: item.total.to_decimal(),
        }
    }
}

/// Successful `getPrice` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceQuote {
    #[serde(rename = "pagePrice")]
    pub page_price: f64,
    pub total: f64,
}

impl PriceQuote {
    pub fn page_price_money(&self) -> Money {
        Money::from_decimal(self.page_price, Currency::MXN)
    }

    pub fn total_money(&self) -> Money {
        Money::from_decimal(self.total, Currency::MXN)
    }
}

/// Successful `uploadFile` response.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    #[serde(rename = "fileId")]
    pub file_id: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
}

/// Successful `submitOrder` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderReceipt {
    pub folio: String,
}

/// The status probe every response carries.
#[derive(Debug, Deserialize)]
struct StatusProbe {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Decode a raw response body into a typed response.
///
/// An empty body, an unparsable body, and a `status` other than
/// `"success"` are all errors; the caller's retry loop treats them the
/// same as transport failures.
pub fn decode_response<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    if body.trim().is_empty() {
        return Err(ClientError::EmptyBody);
    }
    let probe: StatusProbe =
        serde_json::from_str(body).map_err(|e| ClientError::Malformed(e.to_string()))?;
    if probe.status != "success" {
        return Err(ClientError::Rejected(
            probe
                .message
                .unwrap_or_else(|| "collaborator error".to_string()),
        ));
    }
    serde_json::from_str(body).map_err(|e| ClientError::Malformed(e.to_string()))
}
