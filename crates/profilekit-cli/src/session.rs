//! Kubernetes session setup
//!
//! Builds the `kube::Client` once per invocation. Nothing is contacted here:
//! the first request happens when a command runs.

use std::path::Path;

use kube::{
    Client, Config,
    config::{KubeConfigOptions, Kubeconfig},
};
use profilekit_kube::KubeError;
use tracing::debug;

/// Build a client from an explicit kubeconfig, a named context, or the environment
///
/// Without `--kubeconfig`, `KUBECONFIG`/`~/.kube/config` is used, falling back
/// to the in-cluster service account.
pub async fn connect(
    kubeconfig: Option<&Path>,
    context: Option<&str>,
) -> Result<Client, KubeError> {
    let options = KubeConfigOptions {
        context: context.map(str::to_string),
        ..Default::default()
    };

    let config = match kubeconfig {
        Some(path) => {
            debug!(path = %path.display(), context, "loading kubeconfig");
            let kubeconfig = Kubeconfig::read_from(path).map_err(invalid_config)?;
            Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(invalid_config)?
        }
        None if context.is_some() => Config::from_kubeconfig(&options)
            .await
            .map_err(invalid_config)?,
        None => Config::infer().await.map_err(invalid_config)?,
    };

    debug!(cluster = %config.cluster_url, "kubernetes session ready");
    Client::try_from(config).map_err(invalid_config)
}

fn invalid_config(err: impl std::fmt::Display) -> KubeError {
    KubeError::InvalidConfig(err.to_string())
}
