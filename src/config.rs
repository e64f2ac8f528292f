use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Largest accepted upload body, 10 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Server settings, read from the command line or the environment
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "csv-viewer")]
#[command(about = "Upload a CSV file and browse it as an HTML table")]
#[command(version)]
pub struct Config {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "CSV_VIEWER_HOST")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000, env = "CSV_VIEWER_PORT")]
    pub port: u16,

    /// Directory served under /static
    #[arg(long, default_value = "static", env = "CSV_VIEWER_STATIC_DIR")]
    pub static_dir: PathBuf,

    /// Maximum size of an upload request body in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "CSV_VIEWER_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            static_dir: PathBuf::from("static"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
