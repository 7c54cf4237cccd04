//! Integration tests for CLI commands
//!
//! No cluster is needed: the kubeconfig fixture points at a closed local port,
//! so anything that reaches the network fails with an access error.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const UNREACHABLE_KUBECONFIG: &str = r#"apiVersion: v1
kind: Config
clusters:
- name: local
  cluster:
    server: http://127.0.0.1:1
contexts:
- name: local
  context:
    cluster: local
    user: local
    namespace: kasten-io
current-context: local
users:
- name: local
  user: {}
"#;

const PROFILE: &str = r#"apiVersion: config.kio.kasten.io/v1alpha1
kind: Profile
metadata:
  name: cos1
  namespace: kasten-io
spec:
  type: Location
  locationSpec:
    type: ObjectStore
    credential:
      secretType: AwsAccessKey
      secret:
        apiVersion: v1
        kind: Secret
        name: k10secret-wshlm
        namespace: kasten-io
"#;

/// Scratch directory with a kubeconfig for an unreachable cluster
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("kubeconfig"), UNREACHABLE_KUBECONFIG).unwrap();
        Self { dir }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn kubeconfig(&self) -> PathBuf {
        self.dir.path().join("kubeconfig")
    }

    /// Run profilekit against the sandbox kubeconfig with a short timeout
    fn run(&self, args: &[&str]) -> Output {
        profilekit_with_env(args, &self.kubeconfig())
    }
}

fn profilekit_with_env(args: &[&str], kubeconfig: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_profilekit"))
        .args(args)
        .args(["--timeout", "5"])
        .env("KUBECONFIG", kubeconfig)
        .env_remove("PROFILEKIT_NAMESPACE")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute profilekit")
}

/// Helper to run profilekit without a sandbox
fn profilekit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_profilekit"))
        .args(args)
        .output()
        .expect("Failed to execute profilekit")
}

mod usage {
    use super::*;

    #[test]
    fn test_help_lists_commands() {
        let output = profilekit(&["--help"]);
        assert!(output.status.success());

        let stdout = String::from_utf8_lossy(&output.stdout);
        for command in ["get", "list", "create", "update", "patch", "delete"] {
            assert!(stdout.contains(command), "help should mention {}", command);
        }
    }

    #[test]
    fn test_version() {
        let output = profilekit(&["--version"]);
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("profilekit"));
    }

    #[test]
    fn test_unknown_command_is_usage_error() {
        let output = profilekit(&["frobnicate"]);
        assert!(!output.status.success());
        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_get_requires_name() {
        let output = profilekit(&["get"]);
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("<NAME>"));
    }

    #[test]
    fn test_create_requires_filename() {
        let output = profilekit(&["create"]);
        assert!(!output.status.success());
    }
}

mod documents {
    use super::*;

    #[test]
    fn test_create_missing_file_is_io_error() {
        let sandbox = Sandbox::new();
        let missing = sandbox.dir.path().join("absent.yaml");

        let output = sandbox.run(&["create", "-f", missing.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(8));
        assert!(String::from_utf8_lossy(&output.stderr).contains("IO error"));
    }

    #[test]
    fn test_create_without_name_is_decode_error() {
        let sandbox = Sandbox::new();
        let path = sandbox.write("nameless.yaml", &PROFILE.replace("  name: cos1\n", ""));

        let output = sandbox.run(&["create", "-f", path.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(9));
        assert!(String::from_utf8_lossy(&output.stderr).contains("metadata.name"));
    }

    #[test]
    fn test_create_wrong_kind_is_decode_error() {
        let sandbox = Sandbox::new();
        let path = sandbox.write("policy.yaml", &PROFILE.replace("kind: Profile", "kind: Policy"));

        let output = sandbox.run(&["create", "-f", path.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(9));
    }

    #[test]
    fn test_update_malformed_yaml_is_decode_error() {
        let sandbox = Sandbox::new();
        let path = sandbox.write("broken.yaml", "metadata: [unclosed\n");

        let output = sandbox.run(&["update", "-f", path.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(9));
    }
}

mod remote {
    use super::*;

    /// Exit codes a command may end with once it tries to talk to the cluster
    ///
    /// 6 is the refused connection; 1 covers hosts where the TLS stack can't
    /// be set up at all.
    fn assert_reached_session(output: &Output) {
        let code = output.status.code();
        assert!(
            matches!(code, Some(6) | Some(1)),
            "unexpected exit code {:?}: {}",
            code,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    #[test]
    fn test_get_unreachable_cluster_is_access_error() {
        let sandbox = Sandbox::new();
        let output = sandbox.run(&["get", "cos1"]);
        assert_reached_session(&output);
    }

    #[test]
    fn test_list_unreachable_cluster_is_access_error() {
        let sandbox = Sandbox::new();
        let output = sandbox.run(&["list", "-o", "json"]);
        assert_reached_session(&output);
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_create_valid_document_reaches_cluster() {
        let sandbox = Sandbox::new();
        let path = sandbox.write("cos1.yaml", PROFILE);

        let output = sandbox.run(&["create", "-f", path.to_str().unwrap()]);
        assert_reached_session(&output);
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_unknown_patch_type_is_rejected_locally() {
        let sandbox = Sandbox::new();
        let output = sandbox.run(&["patch", "cos1", "--patch", "{}", "--type", "json"]);
        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("unknown patch type"));
    }

    #[test]
    fn test_missing_kubeconfig_file_is_config_error() {
        let sandbox = Sandbox::new();
        let missing = sandbox.dir.path().join("nope");
        let output = sandbox.run(&["get", "cos1", "--kubeconfig", missing.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(1));
    }
}
