use clap::Parser;
use csvedit_sheet::{parse_delimiter, CsvOptions, RaggedRows};
use std::net::SocketAddr;
use std::path::PathBuf;

/// csvedit-server - edit a CSV file in the browser
#[derive(Parser, Debug, Clone)]
#[command(name = "csvedit-server")]
#[command(author, version, about = "Browser CSV editor", long_about = None)]
pub struct ServerConfig {
    /// CSV file to open at startup
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// Largest accepted upload, in megabytes
    #[arg(long = "max-upload-mb", default_value_t = 16)]
    pub max_upload_mb: usize,

    /// Field delimiter for loaded files (sniffed when omitted)
    #[arg(short, long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Reject files whose rows do not match the header width
    #[arg(long)]
    pub strict: bool,
}

impl ServerConfig {
    /// CSV options for every file loaded into the session
    pub fn csv_options(&self) -> CsvOptions {
        let mut options = CsvOptions::default();
        if let Some(delimiter) = self.delimiter {
            options = options.with_delimiter(delimiter);
        }
        if self.strict {
            options = options.with_ragged(RaggedRows::Reject);
        }
        options
    }

    pub fn upload_limit(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::parse_from(["csvedit-server"]);
        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.upload_limit(), 16 * 1024 * 1024);
        assert!(config.file.is_none());

        let options = config.csv_options();
        assert_eq!(options.delimiter, None);
        assert_eq!(options.ragged, RaggedRows::Pad);
    }

    #[test]
    fn test_flags() {
        let config = ServerConfig::parse_from([
            "csvedit-server",
            "data.csv",
            "--addr",
            "0.0.0.0:8080",
            "-d",
            "semicolon",
            "--strict",
            "--max-upload-mb",
            "2",
        ]);
        assert_eq!(config.file, Some(PathBuf::from("data.csv")));
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.upload_limit(), 2 * 1024 * 1024);

        let options = config.csv_options();
        assert_eq!(options.delimiter, Some(b';'));
        assert_eq!(options.ragged, RaggedRows::Reject);
    }

    #[test]
    fn test_bad_delimiter() {
        let result = ServerConfig::try_parse_from(["csvedit-server", "-d", "ab"]);
        assert!(result.is_err());
    }
}
