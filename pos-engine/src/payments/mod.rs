//! Payment processing (simulated processor)
//!
//! Validation runs before the gateway is called. Processing can be cancelled
//! through a `CancellationToken`; a cancelled payment never reaches the
//! order book.

use crate::money::{MONEY_TOLERANCE, round_money, validate_positive_amount};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::PaymentMethod;
use shared::types::{OrderId, Timestamp};
use shared::util::now_millis;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Payment errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("Payment of {amount} does not cover the total {total}")]
    Insufficient { amount: Decimal, total: Decimal },

    #[error("Tendered {tendered} is less than required {amount}")]
    InsufficientTendered { amount: Decimal, tendered: Decimal },

    #[error("Payment declined: {0}")]
    Declined(String),

    #[error("Payment cancelled")]
    Cancelled,

    #[error("A payment for order {0} is already in progress")]
    InProgress(OrderId),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        let code = match &err {
            PaymentError::InvalidAmount => ErrorCode::InvalidAmount,
            PaymentError::Insufficient { .. } | PaymentError::InsufficientTendered { .. } => {
                ErrorCode::PaymentInsufficientAmount
            }
            PaymentError::Declined(_) => ErrorCode::PaymentFailed,
            PaymentError::Cancelled => ErrorCode::PaymentCancelled,
            PaymentError::InProgress(_) => ErrorCode::PaymentInProgress,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Payment requested at the checkout dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub method: PaymentMethod,
    pub amount: Decimal,
    /// Cash handed over by the guest (cash only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tendered: Option<Decimal>,
}

impl PaymentRequest {
    pub fn new(order_id: OrderId, method: PaymentMethod, amount: Decimal) -> Self {
        Self {
            order_id,
            method,
            amount,
            tendered: None,
        }
    }

    pub fn cash(order_id: OrderId, amount: Decimal, tendered: Decimal) -> Self {
        Self {
            order_id,
            method: PaymentMethod::Cash,
            amount,
            tendered: Some(tendered),
        }
    }
}

/// Approved payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub payment_id: String,
    pub order_id: OrderId,
    pub method: PaymentMethod,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tendered: Option<Decimal>,
    /// Change handed back (cash), zero otherwise
    pub change: Decimal,
    pub processed_at: Timestamp,
}

/// Validate a request against the order total and compute the change
pub fn validate_payment(request: &PaymentRequest, order_total: Decimal) -> Result<Decimal, PaymentError> {
    validate_positive_amount(request.amount).map_err(|_| PaymentError::InvalidAmount)?;

    if request.amount < order_total - MONEY_TOLERANCE / Decimal::TWO {
        return Err(PaymentError::Insufficient {
            amount: request.amount,
            total: order_total,
        });
    }

    match (request.method, request.tendered) {
        (PaymentMethod::Cash, Some(tendered)) => {
            if tendered < request.amount {
                return Err(PaymentError::InsufficientTendered {
                    amount: request.amount,
                    tendered,
                });
            }
            Ok(round_money(tendered - request.amount))
        }
        _ => Ok(Decimal::ZERO),
    }
}

/// Payment processor
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Process an already validated request
    async fn process(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError>;
}

fn receipt_for(request: &PaymentRequest) -> PaymentReceipt {
    let change = match (request.method, request.tendered) {
        (PaymentMethod::Cash, Some(tendered)) => round_money(tendered - request.amount),
        _ => Decimal::ZERO,
    };
    PaymentReceipt {
        payment_id: uuid::Uuid::new_v4().to_string(),
        order_id: request.order_id,
        method: request.method,
        amount: request.amount,
        tendered: request.tendered,
        change,
        processed_at: now_millis(),
    }
}

/// Simulated card terminal: waits `delay`, then approves
///
/// Cash never goes through the terminal and is approved at once.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn process(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError> {
        if request.method != PaymentMethod::Cash {
            tracing::debug!(order_id = request.order_id, delay_ms = self.delay.as_millis() as u64, "Processing payment");
            tokio::time::sleep(self.delay).await;
        }
        Ok(receipt_for(request))
    }
}

/// Validate and run a payment through `gateway`
///
/// Returns [`PaymentError::Cancelled`] as soon as `cancel` fires; the
/// gateway future is dropped and its result is never observed.
pub async fn process_payment(
    gateway: &dyn PaymentGateway,
    request: &PaymentRequest,
    order_total: Decimal,
    cancel: &CancellationToken,
) -> Result<PaymentReceipt, PaymentError> {
    validate_payment(request, order_total)?;

    let receipt = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::warn!(order_id = request.order_id, "Payment cancelled");
            return Err(PaymentError::Cancelled);
        }
        result = gateway.process(request) => result?,
    };

    tracing::info!(
        order_id = receipt.order_id,
        payment_id = %receipt.payment_id,
        method = receipt.method.as_str(),
        amount = %receipt.amount,
        change = %receipt.change,
        "Payment approved"
    );
    Ok(receipt)
}
