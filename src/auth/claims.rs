use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of the externally-issued access token. This service only
/// verifies; issuance and refresh live in the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}
