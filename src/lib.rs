pub mod cli;
pub mod config;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;
pub mod widget;

use cli::Args;
use config::ProviderConfig;
use log::info;
use relay::ChatRelay;
use server::Server;
use server::api::AppState;
use server::auth::StaticTokenAuthenticator;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let provider_config = ProviderConfig::from_args(&args);

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Provider Endpoint: {}", provider_config.endpoint);
    info!("Model: {}", provider_config.model);
    info!("OpenRouter API Key: {}", provider_config.masked_credential());
    info!("Provider Timeout: {:?}", provider_config.timeout);
    info!("Public Rate Limit: {}/s", args.public_rate_limit);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let relay = ChatRelay::new(provider_config)?;
    let auth = Arc::new(StaticTokenAuthenticator::new(args.server_api_key.clone()));
    let state = AppState::new(relay, auth, args.public_rate_limit);

    let server = Server::new(args.server_addr.clone(), state, args);
    server.run().await?;

    Ok(())
}
