//! Service tests with stubbed payment gateway and LinkedIn publisher.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Mutex,
};

use async_trait::async_trait;

use crate::server::{
    config::RazorpayConfig,
    error::AppError,
    model::post::Visibility,
    service::{
        gateway::{GatewayOrder, PaymentGateway},
        linkedin::SocialPublisher,
    },
};

mod payment;

/// Gateway that hands out sequential order ids or always fails.
pub struct StubGateway {
    fail: bool,
    orders: AtomicU32,
}

impl StubGateway {
    pub fn new() -> Self {
        Self {
            fail: false,
            orders: AtomicU32::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            orders: AtomicU32::new(0),
        }
    }

    pub fn orders_created(&self) -> u32 {
        self.orders.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    fn key_id(&self) -> &str {
        "rzp_test_key"
    }

    async fn create_order(
        &self,
        _amount_cents: i64,
        _currency: &str,
        _receipt: &str,
    ) -> Result<GatewayOrder, AppError> {
        if self.fail {
            return Err(AppError::Upstream {
                service: "Payment gateway",
                message: "stub failure".to_string(),
            });
        }
        let n = self.orders.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GatewayOrder {
            id: format!("order_stub{}", n),
        })
    }
}

/// Publisher that records published content or always fails.
pub struct StubPublisher {
    fail: bool,
    published: Mutex<Vec<String>>,
}

impl StubPublisher {
    pub fn new() -> Self {
        Self {
            fail: false,
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl SocialPublisher for StubPublisher {
    async fn publish(
        &self,
        _author_urn: &str,
        _access_token: &str,
        content: &str,
        _visibility: Visibility,
    ) -> Result<String, AppError> {
        if self.fail {
            return Err(AppError::Upstream {
                service: "LinkedIn",
                message: "stub failure".to_string(),
            });
        }
        let mut published = self.published.lock().unwrap();
        published.push(content.to_string());
        Ok(format!("urn:li:share:{}", published.len()))
    }
}

pub fn razorpay_config() -> RazorpayConfig {
    RazorpayConfig {
        key_id: "rzp_test_key".to_string(),
        key_secret: "key_secret".to_string(),
        webhook_secret: "webhook_secret".to_string(),
        api_base: "http://localhost".to_string(),
    }
}
