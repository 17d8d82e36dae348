#![allow(dead_code)]

// Test utilities and common setup
pub mod builders;
pub mod mocks;

pub use builders::*;
pub use mocks::*;

/// Kube-config path every integration test sees through `KUBECONFIG`.
pub const TEST_KUBECONFIG: &str = "/tmp/gke-operator-tests/kubeconfig";

/// Point `KUBECONFIG` at a fixed path. All tests set the same value, so
/// running them in parallel is harmless.
pub fn init_test_env() {
    std::env::set_var("KUBECONFIG", TEST_KUBECONFIG);
}
