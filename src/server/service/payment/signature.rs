//! HMAC-SHA256 signatures used by the payment gateway.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Payload the gateway signs when a checkout payment succeeds.
pub fn payment_payload(gateway_order_id: &str, gateway_payment_id: &str) -> String {
    format!("{}|{}", gateway_order_id, gateway_payment_id)
}

/// Checks a hex-encoded HMAC-SHA256 `signature` of `payload` in constant time.
pub fn verify(secret: &str, payload: &[u8], signature: &str) -> bool {
    let Ok(provided) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };

    mac.update(payload);
    mac.verify_slice(&provided).is_ok()
}

/// Hex-encoded HMAC-SHA256 of `payload`, as the gateway would produce it.
#[cfg(test)]
pub fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
