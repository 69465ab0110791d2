use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Serves the built workout tracker frontend.
#[derive(Debug, Clone, Parser)]
#[command(name = "server", version)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "WORKOUT_TRACKER_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,

    /// Output directory of `trunk build` in frontend/
    #[arg(long, env = "WORKOUT_TRACKER_DIST", default_value = "frontend/dist")]
    pub dist: PathBuf,

    /// Where server.log is appended
    #[arg(long, env = "WORKOUT_TRACKER_LOG_DIR", default_value = "server/log")]
    pub log_dir: PathBuf,
}

#[test]
fn test_config_defaults_and_flags() {
    let config = ServerConfig::try_parse_from(["server"]).unwrap();
    assert_eq!(config.addr, "0.0.0.0:8080".parse().unwrap());
    assert_eq!(config.dist, PathBuf::from("frontend/dist"));

    let config = ServerConfig::try_parse_from(["server", "--addr", "127.0.0.1:3000", "--dist", "/srv/mapty"]).unwrap();
    assert_eq!(config.addr.port(), 3000);
    assert_eq!(config.dist, PathBuf::from("/srv/mapty"));
}
