use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use seqid::{AllocatorConfig, DEFAULT_MAX_ATTEMPTS};

/// Runtime configuration for the `seqid-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first if present), with defaults suitable for a
/// single-instance deployment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "seqid-server",
    version,
    about = "An HTTP service issuing sequential, human-readable record IDs"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Upper bound, in milliseconds, on a single highest-ID scan.
    ///
    /// When a scan takes longer the store is treated as unavailable and a
    /// non-sequential fallback ID is issued instead.
    ///
    /// Environment variable: `SCAN_TIMEOUT_MS`
    #[arg(long, env = "SCAN_TIMEOUT_MS", default_value_t = 2_000)]
    pub scan_timeout_ms: u64,

    /// Allocate-and-insert attempts per record creation before a conflict is
    /// reported to the caller.
    ///
    /// Environment variable: `MAX_ATTEMPTS`
    #[arg(long, env = "MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub allocator: AllocatorConfig,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.scan_timeout_ms == 0 {
            bail!("SCAN_TIMEOUT_MS must be greater than 0");
        }

        if args.max_attempts == 0 {
            bail!("MAX_ATTEMPTS must be greater than 0");
        }

        Ok(Self {
            server_addr: args.server_addr,
            allocator: AllocatorConfig {
                scan_timeout: Duration::from_millis(args.scan_timeout_ms),
                max_attempts: args.max_attempts,
            },
        })
    }
}
