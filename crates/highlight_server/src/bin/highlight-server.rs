use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use anyhow::Context;
use clap::{builder::NonEmptyStringValueParser, Parser};
use doc_datastore::FsDocumentCache;
use highlight_server::{
    mistral::MistralClient, router, tracing::init_tracing_subscriber,
    yt::transcript::YtTranscriptFetcher, HighlightServiceBuilder,
};

#[derive(Parser)]
#[command(
    name = "highlight-server",
    about = "Extracts located highlights from PDF documents and YouTube videos"
)]
struct Cli {
    /// Mistral API key
    #[arg(
        long,
        env = "MISTRAL_API_KEY",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    mistral_api_key: String,

    /// Override for the Mistral API base URL
    #[arg(long, env = "MISTRAL_BASE_URL")]
    mistral_base_url: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Directory holding downloaded documents [default: ~/.kai/pdfs]
    #[arg(long, env = "KAI_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Preferred caption language for video transcripts
    #[arg(long, env = "TRANSCRIPT_LANGUAGE", default_value = "en")]
    transcript_language: String,
}

fn default_cache_dir() -> anyhow::Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".kai").join("pdfs"))
        .context("Could not determine the home directory; pass --cache-dir")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let cache_dir = match cli.cache_dir {
        Some(dir) => dir,
        None => default_cache_dir()?,
    };
    let document_cache = FsDocumentCache::init(&cache_dir).await?;

    let mut mistral = MistralClient::new(cli.mistral_api_key);
    if let Some(base_url) = cli.mistral_base_url {
        mistral = mistral.with_base_url(base_url);
    }

    //XXX: handles both chat and document ingestion; hence cloned
    let service = HighlightServiceBuilder::new()
        .transcript_fetcher(YtTranscriptFetcher::new(
            reqwest::Client::new(),
            cli.transcript_language,
        ))
        .chat_model(mistral.clone())
        .document_provider(mistral)
        .document_cache(document_cache)
        .build();

    let addr = SocketAddr::new(cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(%addr, cache_dir = %cache_dir.display(), "Listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_is_rejected() {
        let result = Cli::try_parse_from(["highlight-server", "--mistral-api-key", ""]);
        assert!(result.is_err(), "An empty API key must abort startup");
    }

    #[test]
    fn test_api_key_with_defaults() {
        let cli = Cli::try_parse_from([
            "highlight-server",
            "--mistral-api-key",
            "sk-test",
            "--port",
            "9000",
        ])
        .unwrap();

        assert_eq!(cli.mistral_api_key, "sk-test");
        assert_eq!(cli.port, 9000);
    }
}
