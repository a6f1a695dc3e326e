use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

/// Server settings, read from the command line or `CHAT_*` environment
/// variables.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about = "Multi-room WebSocket chat server", long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "CHAT_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "CHAT_PORT", default_value_t = 3030)]
    pub port: u16,

    /// Directory of static files served alongside the chat page
    #[arg(long, env = "CHAT_STATIC_DIR", value_name = "DIR")]
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
