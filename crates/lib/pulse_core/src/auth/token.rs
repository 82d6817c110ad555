//! Token codec — mints and verifies signed, expiring JWTs (HS256).
//!
//! Access and refresh tokens are signed with distinct secrets so a leaked
//! refresh secret cannot mint access tokens, and vice versa. Verification
//! checks signature integrity first, then the token kind, then expiry;
//! callers collapse all four failure modes into one generic outcome at the
//! HTTP boundary and keep the distinction for logs only.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::roles::Role;
use crate::config::AuthConfig;

/// Discriminator carried inside every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Identity claim set embedded in a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — principal ID (standard JWT `sub` claim).
    pub sub: String,
    /// Normalized email of the principal.
    pub email: String,
    /// Role at issuance time. Tokens cache the role; the user record
    /// stays the source of truth.
    #[serde(default)]
    pub role: Role,
    /// Membership tier, informational only.
    #[serde(default = "default_membership")]
    pub membership: String,
    /// Token kind discriminator.
    pub kind: TokenKind,
    /// Unique token ID, used as the rotation handle for refresh tokens.
    pub jti: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

fn default_membership() -> String {
    "free".to_string()
}

/// Token verification/issuance failures.
///
/// Surfaced to clients as a single generic "invalid or expired token";
/// the variants exist for internal logging.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("signature invalid")]
    SignatureInvalid,

    #[error("token kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        expected: TokenKind,
        actual: TokenKind,
    },

    #[error("token expired")]
    Expired,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// A freshly minted token together with its decoded claims.
#[derive(Debug, Clone)]
pub struct Issued {
    pub token: String,
    pub claims: Claims,
}

struct KindKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

/// Mints and verifies access/refresh tokens.
///
/// Constructed once from [`AuthConfig`] and shared by reference; the
/// secrets are immutable for the process lifetime.
pub struct TokenCodec {
    access: KindKeys,
    refresh: KindKeys,
}

impl TokenCodec {
    /// Build a codec from validated configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, crate::config::ConfigError> {
        config.validate()?;
        Ok(Self {
            access: KindKeys {
                encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
                decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
                ttl: config.access_ttl,
            },
            refresh: KindKeys {
                encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
                decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
                ttl: config.refresh_ttl,
            },
        })
    }

    fn keys(&self, kind: TokenKind) -> &KindKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Issue a signed token of the given kind for a principal.
    pub fn issue(
        &self,
        sub: &str,
        email: &str,
        role: Role,
        membership: &str,
        kind: TokenKind,
    ) -> Result<Issued, TokenError> {
        self.issue_at(Utc::now(), sub, email, role, membership, kind)
    }

    fn issue_at(
        &self,
        now: DateTime<Utc>,
        sub: &str,
        email: &str,
        role: Role,
        membership: &str,
        kind: TokenKind,
    ) -> Result<Issued, TokenError> {
        let keys = self.keys(kind);
        let claims = Claims {
            sub: sub.to_string(),
            email: email.to_string(),
            role,
            membership: membership.to_string(),
            kind,
            jti: Uuid::now_v7().to_string(),
            iat: now.timestamp(),
            exp: (now + keys.ttl).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok(Issued { token, claims })
    }

    /// Verify a token, returning its claims on success.
    ///
    /// Order: signature, kind, expiry. A refresh token is never accepted
    /// where an access token is expected even when its signature happens
    /// to validate.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        // Expiry is checked manually after the kind so the two failures
        // stay distinguishable in logs.
        let mut validation = Validation::default();
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.keys(expected).decoding, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            },
        )?;

        let claims = data.claims;
        if claims.kind != expected {
            return Err(TokenError::KindMismatch {
                expected,
                actual: claims.kind,
            });
        }
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        let config = AuthConfig::new("access-secret-a", "refresh-secret-b");
        TokenCodec::new(&config).expect("codec")
    }

    #[test]
    fn round_trip_preserves_claims() {
        let codec = codec();
        let issued = codec
            .issue("u-1", "doc@example.com", Role::Doctor, "pro", TokenKind::Access)
            .unwrap();
        let claims = codec.verify(&issued.token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.email, "doc@example.com");
        assert_eq!(claims.role, Role::Doctor);
        assert_eq!(claims.membership, "pro");
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.jti, issued.claims.jti);
    }

    #[test]
    fn refresh_token_rejected_as_access() {
        let codec = codec();
        let issued = codec
            .issue("u-1", "a@b.c", Role::User, "free", TokenKind::Refresh)
            .unwrap();
        // Distinct secrets mean the signature already fails across kinds.
        assert!(matches!(
            codec.verify(&issued.token, TokenKind::Access),
            Err(TokenError::SignatureInvalid)
        ));
    }

    #[test]
    fn access_token_rejected_as_refresh() {
        let codec = codec();
        let issued = codec
            .issue("u-1", "a@b.c", Role::User, "free", TokenKind::Access)
            .unwrap();
        assert!(codec.verify(&issued.token, TokenKind::Refresh).is_err());
    }

    #[test]
    fn kind_claim_checked_even_with_shared_secret() {
        // Same secret for both kinds: the signature validates, so the
        // explicit kind claim has to catch the mismatch.
        let config = AuthConfig::new("shared", "shared");
        let codec = TokenCodec::new(&config).unwrap();
        let issued = codec
            .issue("u-1", "a@b.c", Role::User, "free", TokenKind::Refresh)
            .unwrap();
        assert!(matches!(
            codec.verify(&issued.token, TokenKind::Access),
            Err(TokenError::KindMismatch { .. })
        ));
    }

    #[test]
    fn expired_token_rejected() {
        let codec = codec();
        let past = Utc::now() - Duration::hours(5);
        let issued = codec
            .issue_at(past, "u-1", "a@b.c", Role::User, "free", TokenKind::Access)
            .unwrap();
        assert!(matches!(
            codec.verify(&issued.token, TokenKind::Access),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn tampered_token_rejected() {
        let codec = codec();
        let issued = codec
            .issue("u-1", "a@b.c", Role::Admin, "free", TokenKind::Access)
            .unwrap();
        // Flip one character in each segment of the token.
        for idx in [5, issued.token.len() / 2, issued.token.len() - 2] {
            let mut bytes = issued.token.clone().into_bytes();
            bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == issued.token {
                continue;
            }
            assert!(
                codec.verify(&tampered, TokenKind::Access).is_err(),
                "tampered token accepted (idx {idx})"
            );
            assert!(codec.verify(&tampered, TokenKind::Refresh).is_err());
        }
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = codec();
        assert!(matches!(
            codec.verify("not-a-token", TokenKind::Access),
            Err(TokenError::Malformed)
        ));
    }
}
