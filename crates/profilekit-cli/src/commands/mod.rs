//! CLI commands

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod patch;
pub mod update;

use std::path::PathBuf;
use std::time::Duration;

use profilekit_core::{Profile, TypedResource};
use profilekit_kube::{ClientConfig, DynamicAccess, ProfileClient};

use crate::error::Result;
use crate::session;

/// Connection and call settings shared by every command
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    /// Per-call timeout in seconds, 0 disables it
    pub timeout_secs: u64,
    pub conflict_retries: u32,
}

impl ClientOptions {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            conflict_retries: self.conflict_retries,
        }
    }

    /// Open a session and wrap it in a profile client
    pub async fn profile_client(&self) -> Result<ProfileClient<DynamicAccess>> {
        let client = session::connect(self.kubeconfig.as_deref(), self.context.as_deref()).await?;
        let access = DynamicAccess::new(client, Profile::IDENTITY);
        Ok(ProfileClient::with_config(access, self.client_config())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_from_options() {
        let options = ClientOptions {
            timeout_secs: 5,
            conflict_retries: 3,
            ..Default::default()
        };
        let config = options.client_config();
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.conflict_retries, 3);
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let config = ClientOptions::default().client_config();
        assert_eq!(config.timeout, None);
        assert_eq!(config.conflict_retries, 0);
    }
}
