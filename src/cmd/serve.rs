//! REST server command: `pharmalog serve`.

use anyhow::Result;
use pharmalog::config::Config;
use pharmalog::http::{ServerConfig, start_server};

pub async fn cmd_serve(config: &Config, no_cors: bool) -> Result<()> {
    let server_config = ServerConfig {
        host: config.host.clone(),
        port: config.port,
        paths: config.store_paths(),
        cors: config.toml.server.cors && !no_cors,
        report_group: config.report_group(),
    };
    start_server(server_config).await
}
