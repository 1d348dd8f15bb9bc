//! Signed session cookie
//!
//! The cookie value is `<session uuid>.<hex ed25519 signature>`. The signing
//! key is derived from the configured secret, so any process started with the
//! same secret accepts the same cookies.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use gate_flow::SessionId;
use sha2::{Digest, Sha256};

/// Name of the session cookie
pub const COOKIE_NAME: &str = "gate_session";

/// Issues and checks session cookies
#[derive(Clone)]
pub struct CookieSigner {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl std::fmt::Debug for CookieSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieSigner")
            .field("verifying_key", &hex::encode(self.verifying_key.as_bytes()))
            .finish_non_exhaustive()
    }
}

impl CookieSigner {
    /// Derive the signing key from `secret`
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"gate-session-cookie:");
        hasher.update(secret);
        let seed: [u8; 32] = hasher.finalize().into();
        let signing_key = SigningKey::from_bytes(&seed);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Cookie value for `id`
    pub fn encode(&self, id: &SessionId) -> String {
        let sig: Signature = self.signing_key.sign(id.0.as_bytes());
        format!("{id}.{}", hex::encode(sig.to_bytes()))
    }

    /// Session id carried by `value`, if the signature checks out
    pub fn decode(&self, value: &str) -> Option<SessionId> {
        let (id, sig) = value.split_once('.')?;
        let id: SessionId = id.parse().ok()?;
        let sig = hex::decode(sig).ok()?;
        let sig = Signature::from_slice(&sig).ok()?;
        self.verifying_key.verify(id.0.as_bytes(), &sig).ok()?;
        Some(id)
    }

    /// Full `Set-Cookie` header value
    pub fn set_cookie(&self, id: &SessionId, secure: bool) -> String {
        let mut header = format!(
            "{COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax",
            self.encode(id)
        );
        if secure {
            header.push_str("; Secure");
        }
        header
    }
}
