use serenity::all::UserId;

use crate::{
    model::destiny::LinkedAccountDto,
    server::{error::AppError, service::upstream::UpstreamClient},
};

/// Client for the account linking service (`HOST_ACCOUNTS`).
pub struct AccountsClient {
    client: UpstreamClient,
}

impl AccountsClient {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    /// Resolves the bungie name linked to a Discord user.
    ///
    /// # Returns
    /// - `Ok(Some(name))` - Account is linked
    /// - `Ok(None)` - Account exists without a bungie name
    /// - `Err(AppError)` - Request failed, including unknown accounts (404)
    pub async fn linked_bungie_name(&self, user_id: UserId) -> Result<Option<String>, AppError> {
        let account: LinkedAccountDto = self
            .client
            .get(&["accounts", "discord", &user_id.to_string()])
            .await?;

        Ok(account.bungie_name.filter(|name| !name.trim().is_empty()))
    }
}
