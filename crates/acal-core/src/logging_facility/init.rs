//! Subscriber setup for the `acal` binary

use serde::Deserialize;
use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output style selected by `--log-profile`, `ACAL_LOG_PROFILE` or `acal.toml`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Readable lines at info level; the default of the `acal` binary
    Standard,
    /// Readable lines at debug level, including workflow state transitions
    Development,
    /// One JSON object per event at info level
    Production,
    /// Nothing is printed; the capture layer owns the subscriber in tests
    Test,
}

impl Profile {
    fn default_filter(self) -> &'static str {
        match self {
            Profile::Development => {
                "acal_core=debug,acal_store=debug,acal_engine=debug,acal_cli=debug"
            }
            Profile::Standard | Profile::Production | Profile::Test => {
                "acal_core=info,acal_store=info,acal_engine=info,acal_cli=info"
            }
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_filter()))
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Profile::Standard),
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!("unknown log profile '{}'", other)),
        }
    }
}

static INSTALLED: Once = Once::new();

/// Install the global subscriber; later calls are ignored
///
/// Everything goes to stderr, leaving stdout to query tables and prompts.
/// `RUST_LOG` replaces the profile's filter when set.
pub fn init(profile: Profile) {
    INSTALLED.call_once(|| match profile {
        Profile::Standard | Profile::Development => tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(profile.filter())
            .init(),
        Profile::Production => tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(profile.filter())
            .init(),
        Profile::Test => tracing_subscriber::registry().init(),
    });
}
