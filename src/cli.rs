//! Command-line interface for lang-bridge.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Backend host name.
    pub hostname: Option<String>,
    /// Backend port.
    pub port: Option<u16>,
    /// Backend endpoint path.
    pub path: Option<String>,
    /// Open a secure (`wss://`) channel.
    pub secure: bool,
    /// Use the in-process worker backend instead of a socket.
    pub worker: bool,
    /// Language identifier for the document selector.
    pub language: Option<String>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('H') | Long("hostname") => {
                result.hostname = Some(parser.value()?.parse()?);
            }
            Short('p') | Long("port") => {
                let value: String = parser.value()?.parse()?;
                result.port = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("port", value))?,
                );
            }
            Long("path") => {
                result.path = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("secure") => {
                result.secure = true;
            }
            Short('w') | Long("worker") => {
                result.worker = true;
            }
            Long("language") => {
                result.language = Some(parser.value()?.parse()?);
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"lang-bridge {version}
Transport session manager bridging editor clients to language analysis backends

USAGE:
    lang-bridge [OPTIONS]

OPTIONS:
    -H, --hostname <HOST>   Backend host name [default: localhost]
    -p, --port <PORT>       Backend port [default: 3000]
        --path <PATH>       Backend endpoint path [default: /sampleServer]
    -s, --secure            Open a secure (wss://) channel
    -w, --worker            Use the in-process worker backend
        --language <ID>     Language id for the document selector [default: json]
    -c, --config <FILE>     Path to configuration file (JSON)
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    LANG_BRIDGE_HOSTNAME    Backend host name (overrides config)
    LANG_BRIDGE_PORT        Backend port (overrides config)
    LANG_BRIDGE_PATH        Backend endpoint path (overrides config)
    LANG_BRIDGE_SECURE      Set to 1/true/yes for wss:// (overrides config)
    LANG_BRIDGE_LOG_LEVEL   Log level (overrides config)
    RUST_LOG                Alternative log level setting

EXAMPLES:
    # Connect to a local analysis server
    lang-bridge

    # Connect to a remote server over wss
    lang-bridge -H analysis.example.com -p 443 --path /python -s --language python

    # Run against the built-in worker backend
    lang-bridge --worker
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("lang-bridge {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("lang-bridge")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert!(result.hostname.is_none());
        assert!(result.port.is_none());
        assert!(!result.secure);
        assert!(!result.worker);
    }

    #[test]
    fn test_hostname_port() {
        let result = parse_args_from(args(&["-H", "0.0.0.0", "-p", "8080"])).unwrap();
        assert_eq!(result.hostname, Some("0.0.0.0".to_string()));
        assert_eq!(result.port, Some(8080));
    }

    #[test]
    fn test_long_options() {
        let result =
            parse_args_from(args(&["--hostname", "analysis.local", "--port", "9000"])).unwrap();
        assert_eq!(result.hostname, Some("analysis.local".to_string()));
        assert_eq!(result.port, Some(9000));
    }

    #[test]
    fn test_path_and_secure() {
        let result = parse_args_from(args(&["--path", "/python", "-s"])).unwrap();
        assert_eq!(result.path, Some("/python".to_string()));
        assert!(result.secure);
    }

    #[test]
    fn test_worker_flag() {
        let result = parse_args_from(args(&["--worker"])).unwrap();
        assert!(result.worker);
    }

    #[test]
    fn test_language() {
        let result = parse_args_from(args(&["--language", "python"])).unwrap();
        assert_eq!(result.language, Some("python".to_string()));
    }

    #[test]
    fn test_config_file() {
        let result = parse_args_from(args(&["-c", "/etc/lang-bridge.json"])).unwrap();
        assert_eq!(result.config, Some(PathBuf::from("/etc/lang-bridge.json")));
    }

    #[test]
    fn test_help_flag() {
        let result = parse_args_from(args(&["-h"])).unwrap();
        assert!(result.help);

        let result = parse_args_from(args(&["--help"])).unwrap();
        assert!(result.help);
    }

    #[test]
    fn test_version_flag() {
        let result = parse_args_from(args(&["-V"])).unwrap();
        assert!(result.version);
    }

    #[test]
    fn test_log_level() {
        let result = parse_args_from(args(&["-l", "debug"])).unwrap();
        assert_eq!(result.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_invalid_port() {
        let result = parse_args_from(args(&["-p", "not-a-number"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_unexpected_positional() {
        let result = parse_args_from(args(&["stray"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_combined_options() {
        let result = parse_args_from(args(&[
            "-H",
            "analysis.example.com",
            "-p",
            "443",
            "--path",
            "/python",
            "-s",
            "--language",
            "python",
            "-l",
            "debug",
        ]))
        .unwrap();

        assert_eq!(result.hostname, Some("analysis.example.com".to_string()));
        assert_eq!(result.port, Some(443));
        assert_eq!(result.path, Some("/python".to_string()));
        assert!(result.secure);
        assert_eq!(result.language, Some("python".to_string()));
        assert_eq!(result.log_level, Some("debug".to_string()));
    }
}
