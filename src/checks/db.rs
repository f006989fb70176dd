//! Check-scoped database connections
//!
//! Each checker opens its own connection for the duration of one query and
//! releases it immediately afterward. Dropping the returned client ends the
//! spawned driver task, so the connection is released on every exit path.

use std::time::Duration;

use tokio_postgres::NoTls;
use tracing::debug;

use crate::config::PgConfig;
use crate::error::ConductorResult;

/// Open a single connection to the given backend.
///
/// Managed hosts that demand TLS (`sslmode=require` in the connection
/// string) get a rustls connector backed by the native root store.
pub async fn connect(config: &PgConfig) -> ConductorResult<tokio_postgres::Client> {
    debug!("connecting to {}", config.to_display_string());

    let mut pg = tokio_postgres::Config::new();
    pg.host(&config.host)
        .port(config.port)
        .user(&config.user)
        .password(&config.password)
        .dbname(&config.database)
        .connect_timeout(Duration::from_secs(30));

    if config.require_tls {
        let certs = rustls_native_certs::load_native_certs();
        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs.certs {
            root_store.add(cert).ok();
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);
        let (client, connection) = pg.connect(tls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!("tls connection closed with error: {}", e);
            }
        });

        Ok(client)
    } else {
        let (client, connection) = pg.connect(NoTls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!("connection closed with error: {}", e);
            }
        });

        Ok(client)
    }
}
