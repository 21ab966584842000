use serenity::all::{Client, GatewayIntents, Permissions};
use url::Url;

use crate::server::{
    bot::handler::Handler,
    config::Config,
    error::{config::ConfigError, AppError},
};

const DISCORD_AUTHORIZE_URL: &str = "https://discord.com/oauth2/authorize";
const INVITE_SCOPES: &str = "bot applications.commands";

/// Gateway events the bot subscribes to.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_VOICE_STATES
}

/// Permissions requested when the bot is invited.
///
/// Includes every permission granted to join-to-create channel owners, since Discord only
/// lets the bot grant permissions it holds itself.
pub fn bot_permissions() -> Permissions {
    Permissions::VIEW_CHANNEL
        | Permissions::SEND_MESSAGES
        | Permissions::READ_MESSAGE_HISTORY
        | Permissions::MANAGE_ROLES
        | Permissions::MANAGE_CHANNELS
        | Permissions::CONNECT
        | Permissions::MOVE_MEMBERS
        | Permissions::PRIORITY_SPEAKER
}

/// Builds the OAuth2 URL that adds the bot to a guild.
///
/// # Arguments
/// - `client_id` - Discord application id
///
/// # Returns
/// - `Ok(Url)` - Invite URL with bot and slash command scopes
/// - `Err(AppError::InternalError)` - Authorize URL could not be parsed
pub fn invite_url(client_id: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(DISCORD_AUTHORIZE_URL)
        .map_err(|e| AppError::InternalError(format!("Invalid authorize URL: {}", e)))?;

    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("scope", INVITE_SCOPES)
        .append_pair("permissions", &bot_permissions().bits().to_string());

    Ok(url)
}

/// Prints the invite URL for `--invite`.
///
/// # Returns
/// - `Ok(())` - URL printed to stdout
/// - `Err(AppError::ConfigErr)` - `DISCORD_CLIENT_ID` is not set
pub fn print_invite(config: &Config) -> Result<(), AppError> {
    let client_id = config
        .discord_client_id
        .as_deref()
        .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_CLIENT_ID".to_string()))?;

    println!("{}", invite_url(client_id)?);

    Ok(())
}

/// Builds the Discord client without connecting.
///
/// # Arguments
/// - `config` - Application configuration holding the bot token
/// - `handler` - Event handler wired to the services
///
/// # Returns
/// - `Ok(Client)` - Client ready to be started
/// - `Err(AppError::DiscordErr)` - Client construction failed
pub async fn init_bot(config: &Config, handler: Handler) -> Result<Client, AppError> {
    let client = Client::builder(&config.discord_bot_token, intents())
        .event_handler(handler)
        .await?;

    Ok(client)
}

/// Connects to the gateway and processes events until shutdown.
///
/// Should be called from within a `tokio::spawn` task since it only returns when the
/// connection is closed for good.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
