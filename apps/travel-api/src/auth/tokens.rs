use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::db::kv::KeyValueStore;
use crate::error::ApiError;

/// Access-token TTL in seconds.
pub const ACCESS_TOKEN_TTL_SECS: u64 = 12 * 60 * 60;

/// Generate an opaque random token with the given prefix and byte length.
pub fn generate_opaque_token(prefix: &str, bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill(&mut buf[..]);
    format!("{}_{}", prefix, URL_SAFE_NO_PAD.encode(&buf))
}

/// Generate a Travel Buddy access token (opaque, `tba_` prefix).
pub fn generate_access_token() -> String {
    generate_opaque_token("tba", 32)
}

/// Data stored alongside an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenData {
    pub username: String,
}

fn access_token_key(token: &str) -> String {
    format!("travel:at:{token}")
}

pub async fn store_access_token(
    kv: &dyn KeyValueStore,
    token: &str,
    data: &AccessTokenData,
) -> Result<(), ApiError> {
    let json = serde_json::to_string(data).map_err(|e| {
        tracing::error!(?e, "failed to encode access token data");
        ApiError::internal("Failed to issue token")
    })?;
    kv.set_ex(&access_token_key(token), &json, ACCESS_TOKEN_TTL_SECS)
        .await
}

/// Resolve a token; `None` when it never existed or has expired.
pub async fn lookup_access_token(
    kv: &dyn KeyValueStore,
    token: &str,
) -> Result<Option<AccessTokenData>, ApiError> {
    let Some(json) = kv.get(&access_token_key(token)).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&json) {
        Ok(data) => Ok(Some(data)),
        Err(e) => {
            tracing::warn!(?e, "discarding unreadable access token data");
            Ok(None)
        }
    }
}

pub async fn delete_access_token(kv: &dyn KeyValueStore, token: &str) -> Result<(), ApiError> {
    kv.del(&access_token_key(token)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::kv::MemoryStore;

    #[test]
    fn tokens_are_prefixed_and_unique() {
        let a = generate_access_token();
        let b = generate_access_token();
        assert!(a.starts_with("tba_"));
        // 32 bytes of URL-safe base64 without padding.
        assert_eq!(a.len(), 4 + 43);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn store_lookup_delete() {
        let kv = MemoryStore::new();
        let token = generate_access_token();
        let data = AccessTokenData {
            username: "alice".into(),
        };

        store_access_token(&kv, &token, &data).await.unwrap();
        let found = lookup_access_token(&kv, &token).await.unwrap().unwrap();
        assert_eq!(found.username, "alice");

        delete_access_token(&kv, &token).await.unwrap();
        assert!(lookup_access_token(&kv, &token).await.unwrap().is_none());
    }
}
