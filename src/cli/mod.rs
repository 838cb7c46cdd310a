use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Completion Provider Args ---
    /// API key for the OpenRouter completion provider. Chat requests fail with a configuration error while unset.
    #[arg(long, env = "OPENROUTER_API_KEY")]
    pub openrouter_api_key: Option<String>,

    /// Model identifier forwarded to the provider.
    #[arg(long, env = "AI_MODEL", default_value = "google/gemini-2.0-flash-exp:free")]
    pub ai_model: String,

    /// Value sent in the HTTP-Referer header (used by OpenRouter for attribution).
    #[arg(long, env = "APP_REFERER", default_value = "http://localhost:3000")]
    pub app_referer: String,

    /// Value sent in the X-Title header.
    #[arg(long, env = "APP_TITLE", default_value = "Rately Store Rating System")]
    pub app_title: String,

    /// Optional deadline in seconds for a single provider call. Unset means wait indefinitely.
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS")]
    pub provider_timeout_secs: Option<u64>,

    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:5000")]
    pub server_addr: String,

    /// Bearer token accepted on the authenticated chat route. If unset, that route rejects every caller.
    #[arg(long, env = "SERVER_API_KEY")]
    pub server_api_key: Option<String>,

    /// Requests per second allowed on the public chat route, shared by all callers.
    #[arg(long, env = "PUBLIC_RATE_LIMIT", default_value = "10")]
    pub public_rate_limit: u32,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
