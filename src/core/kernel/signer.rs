use base64::engine::general_purpose;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs outbound payloads and verifies inbound ones.
///
/// One codepath serves both directions: the signature transmitted with a
/// request and the signature checked on a response or notification are
/// produced by the same function, so the two sides cannot drift. The bytes
/// passed in are exactly the bytes transmitted as the `request`/`response`
/// field value.
pub trait Signer: Send + Sync {
    /// Compute the signature for a canonical payload.
    fn sign(&self, payload: &str) -> String;

    /// Recompute the signature and compare it against the received one.
    ///
    /// Any mismatch invalidates the entire envelope regardless of how the
    /// payload itself looks.
    fn verify(&self, payload: &str, signature: &str) -> bool;
}

/// HMAC-SHA256 signer keyed with the merchant's shared secret.
///
/// Signatures are the base64 encoding of the raw MAC output.
pub struct HmacSigner {
    secret: Secret<String>,
}

impl HmacSigner {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC-SHA256 accepts keys of any length");
        mac.update(payload.as_bytes());
        mac
    }
}

impl Signer for HmacSigner {
    fn sign(&self, payload: &str) -> String {
        general_purpose::STANDARD.encode(self.mac(payload).finalize().into_bytes())
    }

    fn verify(&self, payload: &str, signature: &str) -> bool {
        let Ok(received) = general_purpose::STANDARD.decode(signature) else {
            return false;
        };
        // Mac::verify_slice is a constant-time comparison.
        self.mac(payload).verify_slice(&received).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> HmacSigner {
        HmacSigner::new(Secret::new(
            "FzhEXw6eeJtI0UNnAWdGDhv4ei9cua5qC2J9lt0tVRvaln7V6LBfFnzdfPFKoVC7".to_string(),
        ))
    }

    #[test]
    fn signing_is_deterministic() {
        let s = signer();
        let payload = r#"{"MerchantId":"18da9ea3-f9ac-4e64-8405-d301f079a658"}"#;
        assert_eq!(s.sign(payload), s.sign(payload));
    }

    #[test]
    fn verify_accepts_own_signature() {
        let s = signer();
        let payload = r#"{"OrderId":"x"}"#;
        let sig = s.sign(payload);
        assert!(s.verify(payload, &sig));
    }

    #[test]
    fn single_byte_tamper_is_detected() {
        let s = signer();
        let payload = r#"{"Amount":"100.00"}"#;
        let sig = s.sign(payload);
        let tampered = payload.replace("100.00", "100.01");
        assert!(!s.verify(&tampered, &sig));
    }

    #[test]
    fn different_secrets_do_not_verify() {
        let s = signer();
        let other = HmacSigner::new(Secret::new("different".to_string()));
        let payload = "{}";
        assert!(!other.verify(payload, &s.sign(payload)));
    }

    #[test]
    fn malformed_base64_signature_is_rejected() {
        assert!(!signer().verify("{}", "not base64 !!!"));
    }
}
