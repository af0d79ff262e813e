use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:4000,http://127.0.0.1:4000"
    )]
    pub allowed_origins: Vec<String>,

    /// Directory the static HTML page is served from. Defaults to the directory
    /// containing the running executable.
    #[arg(short, long, env)]
    asset_dir: Option<PathBuf>,

    /// Interval in seconds between SSE keep-alive comments on streaming responses
    #[arg(short, long, env, default_value_t = 15)]
    pub keep_alive_secs: u64,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Parses an explicit argument list instead of the process arguments.
    /// Environment variables still apply, `.env` is not loaded.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Config::parse_from(args)
    }

    pub fn set_asset_dir(mut self, asset_dir: PathBuf) -> Self {
        self.asset_dir = Some(asset_dir);
        self
    }

    /// Returns the application's base directory for static assets.
    ///
    /// Falls back to the executable's directory, then to the current directory.
    pub fn asset_dir(&self) -> PathBuf {
        if let Some(dir) = &self.asset_dir {
            return dir.clone();
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Never shorter than one second; a zero interval would flood the stream.
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs.max(1))
    }

    pub fn server_address(&self) -> String {
        let interface = self.interface.as_deref().unwrap_or("127.0.0.1");
        format!("{interface}:{}", self.port)
    }
}
