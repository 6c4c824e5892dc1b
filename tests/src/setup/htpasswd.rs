use std::process::Command;

use proxyup_common::secret::Password;
use proxyup_core::hasher::{CredentialHasher, HashedCredential, Htpasswd};

fn htpasswd_available() -> bool {
    Command::new("htpasswd").arg("-nb").arg("u").arg("p").output().is_ok()
}

/// Runs the real tool when it is installed.
#[tokio::test]
async fn real_htpasswd_output_is_escaped() {
    if !htpasswd_available() {
        eprintln!("Skipping htpasswd test: 'htpasswd' is not installed.");
        return;
    }

    let hasher = Htpasswd::new("htpasswd");
    let raw = hasher
        .hash("admin", &Password::from("secret"))
        .await
        .expect("htpasswd should hash");

    assert!(raw.starts_with("admin:"));
    assert!(!raw.contains('\n'));

    let escaped = HashedCredential::from_raw(&raw);
    assert_eq!(escaped.as_str().replace("$$", "$"), raw);
}
