//! User-pool signing key sets.

use std::collections::HashMap;

use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};
use taskmanager_core::auth::AuthError;

/// One published key. Only RSA keys are used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    pub kid: String,
    pub kty: String,
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,
    pub n: String,
    pub e: String,
}

/// The document served at `/.well-known/jwks.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    #[serde(default)]
    pub keys: Option<Vec<Jwk>>,
}

/// Index the set's RSA keys by `kid`. Only a document without `keys` is
/// rejected; an empty set loads and every token then fails its key lookup.
pub fn decoding_keys(set: &JwkSet) -> Result<HashMap<String, DecodingKey>, AuthError> {
    let keys = set
        .keys
        .as_ref()
        .ok_or_else(|| AuthError::KeySetUnavailable("No keys found in response".to_string()))?;

    let mut decoding = HashMap::with_capacity(keys.len());
    for jwk in keys.iter().filter(|k| k.kty == "RSA") {
        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| AuthError::KeySetUnavailable(format!("bad key {}: {e}", jwk.kid)))?;
        decoding.insert(jwk.kid.clone(), key);
    }
    Ok(decoding)
}

/// Download the key set.
pub async fn fetch_jwks(client: &reqwest::Client, url: &str) -> Result<JwkSet, AuthError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AuthError::KeySetUnavailable(format!(
            "{url} returned {}",
            response.status()
        )));
    }

    response
        .json::<JwkSet>()
        .await
        .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))
}
