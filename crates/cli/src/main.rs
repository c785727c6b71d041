//! `propdocs-report` -- print a JSON access/document report.
//!
//! Signs in, loads the session and the user's properties, and prints one
//! report entry per readable property. Pass a property id to report on a
//! single property.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                     | Description                     |
//! |------------------------|----------|-----------------------------|---------------------------------|
//! | `API_BASE_URL`         | no       | `http://localhost:5000/api` | Backend base URL                |
//! | `API_TOKEN`            | no       | --                          | Bearer token; skips login       |
//! | `PROPDOCS_EMAIL`       | no       | --                          | Login email when no token       |
//! | `PROPDOCS_PASSWORD`    | no       | --                          | Login password when no token    |
//! | `REQUEST_TIMEOUT_SECS` | no       | `30`                        | HTTP timeout                    |

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use propdocs_cli::report::build_report;
use propdocs_client::api::PropDocsApi;
use propdocs_client::backend::PropertyBackend;
use propdocs_client::config::ClientConfig;
use propdocs_client::service::load_session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "propdocs_cli=info,propdocs_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let property_filter = std::env::args()
        .nth(1)
        .map(|raw| Uuid::parse_str(&raw).with_context(|| format!("'{raw}' is not a property id")))
        .transpose()?;

    let config = ClientConfig::from_env()?;
    tracing::info!(base_url = %config.base_url, "Starting propdocs-report");

    let api = PropDocsApi::new(&config)?;
    let (api, token) = match config.token.clone() {
        Some(token) => (api, token),
        None => {
            let email = std::env::var("PROPDOCS_EMAIL")
                .context("set API_TOKEN, or PROPDOCS_EMAIL and PROPDOCS_PASSWORD")?;
            let password =
                std::env::var("PROPDOCS_PASSWORD").context("PROPDOCS_PASSWORD is required")?;
            let login = api.login(&email, &password).await?;
            tracing::info!(user_id = %login.user.id, "Signed in");
            (api.with_token(login.token.clone()), login.token)
        }
    };

    let session = load_session(&api, token).await?;
    let properties = match property_filter {
        Some(id) => vec![api.get_property(id).await?],
        None => api.list_properties().await?,
    };
    tracing::info!(count = properties.len(), "Properties loaded");

    let report = build_report(&session, &properties, Utc::now());
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
