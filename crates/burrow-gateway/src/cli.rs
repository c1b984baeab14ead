use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "BURROW_GATEWAY_LISTEN_ADDR";
pub const STORE_BACKEND_ENV: &str = "BURROW_STORE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "BURROW_MYSQL_DSN";
pub const SITE_BASE_URL_ENV: &str = "BURROW_SITE_BASE_URL";
pub const REDIRECT_PARAM_ENV: &str = "BURROW_REDIRECT_PARAM";
pub const SPEAKING_URLS_ENV: &str = "BURROW_CREATE_SPEAKING_URLS";
pub const SPEAKING_TEMPLATE_ENV: &str = "BURROW_SPEAKING_URL_TEMPLATE";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_SITE_BASE_URL: &str = "http://127.0.0.1:8080/";
pub const DEFAULT_REDIRECT_PARAM: &str = "key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StoreBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackendArg::InMemory => write!(f, "in-memory"),
            StoreBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "burrow-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORE_BACKEND_ENV,
        value_enum,
        default_value_t = StoreBackendArg::InMemory
    )]
    pub store: StoreBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("store", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(long, env = SITE_BASE_URL_ENV, default_value = DEFAULT_SITE_BASE_URL)]
    pub site_base_url: String,

    #[arg(long, env = REDIRECT_PARAM_ENV, default_value = DEFAULT_REDIRECT_PARAM)]
    pub redirect_param: String,

    #[arg(long, env = SPEAKING_URLS_ENV)]
    pub create_speaking_urls: bool,

    #[arg(long, env = SPEAKING_TEMPLATE_ENV, default_value = "")]
    pub speaking_url_template: String,
}
