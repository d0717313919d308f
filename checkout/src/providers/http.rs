//! HTTP implementation of the booking backend client.
//!
//! A thin request/response wrapper over the booking API. The client never
//! interprets domain rules; it maps transport failures to
//! [`CheckoutError::BackendUnavailable`], structured rejections to
//! [`CheckoutError::BackendRejected`], and hands everything else through.

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, Result};
use crate::providers::{
    BookingBackend, ContactRequest, CreateBookingRequest, CreatedBooking, PaymentConfirmation,
    PaymentOrder, PaymentOrderOutcome, PaymentOrderRequest,
};
use crate::types::BookingId;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

const CREATE_BOOKING: &str = "/api/bookings/create";
const ADD_CONTACT: &str = "/api/bookings/add-users";
const CREATE_PAYMENT: &str = "/api/bookings/create-payment";
const CONFIRM_PAYMENT: &str = "/api/bookings/confirm-payment";

/// Booking backend client over HTTPS with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpBookingBackend {
    client: Client,
    base_url: String,
}

impl HttpBookingBackend {
    /// Create a client for the backend named in the configuration.
    #[must_use]
    pub fn new(config: &CheckoutConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST a JSON body and decode a JSON response.
    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: serde::Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "Calling booking backend");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|error| CheckoutError::BackendUnavailable {
                message: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let rejection = response.json::<RejectionBody>().await.unwrap_or_default();
            tracing::warn!(%url, %status, code = ?rejection.code, "Booking backend rejected request");
            return Err(rejection.into_error(status));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|error| CheckoutError::BackendUnavailable {
                message: format!("unreadable response: {error}"),
            })
    }
}

impl BookingBackend for HttpBookingBackend {
    async fn create_booking(&self, request: CreateBookingRequest) -> Result<CreatedBooking> {
        let envelope: CreateBookingEnvelope = self.post(CREATE_BOOKING, &request).await?;

        match envelope.booking {
            Some(booking) if envelope.success => Ok(CreatedBooking {
                id: booking.id.into_booking_id(),
            }),
            _ => Err(CheckoutError::BackendRejected {
                message: envelope
                    .message
                    .unwrap_or_else(|| "Failed to create booking".to_string()),
                code: None,
            }),
        }
    }

    async fn add_contact(&self, request: ContactRequest) -> Result<()> {
        let envelope: AckEnvelope = self.post(ADD_CONTACT, &request).await?;

        if envelope.success {
            Ok(())
        } else {
            Err(CheckoutError::BackendRejected {
                message: envelope
                    .message
                    .unwrap_or_else(|| "Failed to add user details".to_string()),
                code: None,
            })
        }
    }

    async fn create_payment_order(
        &self,
        request: PaymentOrderRequest,
    ) -> Result<PaymentOrderOutcome> {
        let envelope: PaymentOrderEnvelope = self.post(CREATE_PAYMENT, &request).await?;

        if envelope.order.is_none() && !envelope.email_sent {
            return Err(CheckoutError::BackendRejected {
                message: "Payment order missing from response".to_string(),
                code: None,
            });
        }

        Ok(PaymentOrderOutcome {
            order: envelope.order,
            email_sent: envelope.email_sent,
        })
    }

    async fn confirm_payment(&self, confirmation: PaymentConfirmation) -> Result<()> {
        let envelope: AckEnvelope = self.post(CONFIRM_PAYMENT, &confirmation).await?;

        if envelope.success {
            Ok(())
        } else {
            Err(CheckoutError::BackendRejected {
                message: envelope
                    .message
                    .unwrap_or_else(|| "Payment confirmation was refused".to_string()),
                code: None,
            })
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Response envelopes
// ═══════════════════════════════════════════════════════════════════════

/// Plain `{ success }` acknowledgment.
#[derive(Debug, Deserialize)]
struct AckEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateBookingEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    booking: Option<BookingPayload>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BookingPayload {
    id: RawBookingId,
}

/// The backend issues numeric ids; older deployments sent strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBookingId {
    Number(u64),
    Text(String),
}

impl RawBookingId {
    fn into_booking_id(self) -> BookingId {
        match self {
            Self::Number(id) => BookingId::new(id.to_string()),
            Self::Text(id) => BookingId::new(id),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PaymentOrderEnvelope {
    #[serde(default)]
    order: Option<PaymentOrder>,
    #[serde(default, rename = "emailSent")]
    email_sent: bool,
}

/// Structured error payload on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl RejectionBody {
    fn into_error(self, status: reqwest::StatusCode) -> CheckoutError {
        // The backend runs without its database in some deployments and
        // signals that with a dedicated code; give it a support-facing
        // message instead of the raw payload.
        if self.code.as_deref() == Some("NO_DATABASE") {
            return CheckoutError::BackendRejected {
                message: "Service temporarily unavailable. Please contact support.".to_string(),
                code: self.code,
            };
        }

        match self.message {
            Some(message) => CheckoutError::BackendRejected {
                message,
                code: self.code,
            },
            None => CheckoutError::BackendRejected {
                message: format!("Server error ({status})"),
                code: self.code,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slashes() {
        let config = CheckoutConfig::new(
            "https://tickets.example.com///".to_string(),
            String::new(),
        );
        let backend = HttpBookingBackend::new(&config);
        assert_eq!(
            backend.endpoint(CREATE_BOOKING),
            "https://tickets.example.com/api/bookings/create"
        );
    }

    #[test]
    fn numeric_and_text_booking_ids_both_decode() {
        let numeric: CreateBookingEnvelope =
            serde_json::from_str(r#"{"success":true,"booking":{"id":35}}"#).unwrap();
        assert_eq!(
            numeric.booking.unwrap().id.into_booking_id(),
            BookingId::new("35")
        );

        let text: CreateBookingEnvelope =
            serde_json::from_str(r#"{"success":true,"booking":{"id":"NF35"}}"#).unwrap();
        assert_eq!(
            text.booking.unwrap().id.into_booking_id(),
            BookingId::new("NF35")
        );
    }

    #[test]
    fn payment_envelope_reads_the_bypass_flag() {
        let bypassed: PaymentOrderEnvelope =
            serde_json::from_str(r#"{"emailSent":true}"#).unwrap();
        assert!(bypassed.email_sent);
        assert!(bypassed.order.is_none());

        let ordered: PaymentOrderEnvelope = serde_json::from_str(
            r#"{"order":{"id":"order_1","amount":180000,"currency":"INR"}}"#,
        )
        .unwrap();
        assert!(!ordered.email_sent);
        assert_eq!(ordered.order.unwrap().amount, 180_000);
    }

    #[test]
    fn missing_database_code_gets_the_support_message() {
        let body = RejectionBody {
            message: Some("db down".to_string()),
            code: Some("NO_DATABASE".to_string()),
        };
        let error = body.into_error(reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            error,
            CheckoutError::BackendRejected {
                message: "Service temporarily unavailable. Please contact support.".to_string(),
                code: Some("NO_DATABASE".to_string()),
            }
        );
    }

    #[test]
    fn anonymous_rejection_reports_the_status() {
        let error = RejectionBody::default().into_error(reqwest::StatusCode::BAD_GATEWAY);
        assert!(matches!(
            error,
            CheckoutError::BackendRejected { message, .. } if message.contains("502")
        ));
    }
}
