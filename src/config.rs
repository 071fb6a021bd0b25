//! Server configuration
//!
//! Resolved once at startup from the command line and environment:
//! - bind address: first CLI argument, else `127.0.0.1:<port>` where the port
//!   comes from `PORT`, then `NODE_PORT`, then 3000
//! - duplicate-name policy: `CHAT_NAME_POLICY` (`overwrite` | `reject`)

use std::env;
use std::str::FromStr;

use crate::error::ConfigError;

/// Default host when no address argument is given
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port when neither PORT nor NODE_PORT is set
pub const DEFAULT_PORT: u16 = 3000;

/// Channel buffer size for server commands
pub const COMMAND_BUFFER_SIZE: usize = 256;

/// Per-connection outbound buffer size
pub const CONNECTION_BUFFER_SIZE: usize = 32;

const PORT_VARS: [&str; 2] = ["PORT", "NODE_PORT"];
const NAME_POLICY_VAR: &str = "CHAT_NAME_POLICY";

/// What happens when a join uses a name another connection registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// Last join wins the registry entry
    #[default]
    Overwrite,
    /// Second join is refused with `name_taken`
    Reject,
}

impl FromStr for NamePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(NamePolicy::Overwrite),
            "reject" => Ok(NamePolicy::Reject),
            _ => Err(ConfigError::InvalidNamePolicy(s.to_string())),
        }
    }
}

/// Relay server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub addr: String,
    /// Duplicate-name handling
    pub name_policy: NamePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT),
            name_policy: NamePolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Load from process arguments and environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(env::args().nth(1), |key| env::var(key).ok())
    }

    /// Load from an optional address argument and a variable lookup
    pub fn from_sources<F>(addr_arg: Option<String>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = match addr_arg {
            Some(addr) => addr,
            None => {
                let mut port = DEFAULT_PORT;
                for var in PORT_VARS {
                    if let Some(value) = lookup(var) {
                        port = value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                            var,
                            value: value.clone(),
                        })?;
                        break;
                    }
                }
                format!("{}:{}", DEFAULT_HOST, port)
            }
        };

        let name_policy = match lookup(NAME_POLICY_VAR) {
            Some(value) => value.parse()?,
            None => NamePolicy::default(),
        };

        Ok(Self { addr, name_policy })
    }
}
