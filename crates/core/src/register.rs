//! Registration request contract.

use serde::Deserialize;
use validator::Validate;

/// Body of `POST /api/register`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new client. Bounded to the column width.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}
