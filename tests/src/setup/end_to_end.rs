use std::fs;

use proxyup_common::config::Answers;
use proxyup_core::input::{InputCollector, SetupInputs};
use proxyup_core::pipeline::Setup;
use tempfile::TempDir;

use super::utils::{self, FAKE_DIGEST, FakeHtpasswd, Script};

fn collect(cwd: &TempDir, answers: &[&str]) -> SetupInputs {
    let mut script = Script::new(answers);
    let prefilled = Answers::default();
    InputCollector::new(&mut script, &prefilled, cwd.path().to_path_buf())
        .collect()
        .expect("inputs should be collected")
}

/// Blank directory, example.org, admin/secret, a@b.com.
#[tokio::test]
async fn default_directory_scenario() {
    let cwd = TempDir::new().unwrap();
    let inputs = collect(&cwd, &["", "example.org", "", "admin", "secret", "a@b.com"]);
    assert_eq!(inputs.root, cwd.path().join("docker"));

    let cfg = utils::config();
    let hasher = FakeHtpasswd;
    let done = Setup::new(&cfg, &hasher).run(&inputs, false).await.unwrap();

    assert!(cwd.path().join("docker/core/data/dynamic").is_dir());
    assert!(cwd.path().join("docker/apps").is_dir());

    let compose = fs::read_to_string(&done.layout.compose).unwrap();
    let escaped = FAKE_DIGEST.replace('$', "$$");
    let auth_line = format!(
        "      - \"traefik.http.middlewares.traefik-auth.basicauth.users=admin:{escaped}\""
    );
    assert!(compose.lines().any(|l| l == auth_line), "auth line missing:\n{compose}");
    assert!(!compose.contains("example.com"));
    assert!(compose.contains("Host(`traefik.example.org`)"));
    assert!(compose.contains("tls.domains[0].sans=*.example.org"));
    assert!(!compose.contains("USER:PASSWORD"));

    let traefik = fs::read_to_string(&done.layout.traefik).unwrap();
    assert!(traefik.lines().any(|l| l == "      email: a@b.com"));

    let middlewares = fs::read_to_string(&done.layout.middlewares).unwrap();
    let template = fs::read_to_string(utils::bundled_assets().join("middlewares.yml")).unwrap();
    assert_eq!(middlewares, template);

    let acme = fs::metadata(&done.layout.acme).unwrap();
    assert_eq!(acme.len(), 0);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        assert_eq!(acme.permissions().mode() & 0o777, 0o600);
    }
}

#[tokio::test]
async fn only_placeholder_domain_lines_change() {
    let cwd = TempDir::new().unwrap();
    let inputs = collect(&cwd, &["", "example.org", "", "admin", "secret", "a@b.com"]);

    let cfg = utils::config();
    let hasher = FakeHtpasswd;
    let done = Setup::new(&cfg, &hasher).run(&inputs, false).await.unwrap();

    let template = fs::read_to_string(utils::bundled_assets().join("docker-compose.yml")).unwrap();
    let patched = fs::read_to_string(&done.layout.compose).unwrap();

    let template_lines: Vec<&str> = template.lines().collect();
    let patched_lines: Vec<&str> = patched.lines().collect();
    assert_eq!(template_lines.len(), patched_lines.len());

    for (before, after) in template_lines.iter().zip(&patched_lines) {
        if before.contains("basicauth.users") {
            continue;
        }
        assert_eq!(before.replace("example.com", "example.org"), *after);
    }
}

#[tokio::test]
async fn rerun_with_reset_replaces_previous_tree() {
    let cwd = TempDir::new().unwrap();
    let cfg = utils::config();
    let hasher = FakeHtpasswd;

    let first = collect(&cwd, &["", "first.org", "", "admin", "secret", "a@b.com"]);
    let done = Setup::new(&cfg, &hasher).run(&first, false).await.unwrap();
    fs::write(done.layout.apps.join("leftover.txt"), "old").unwrap();

    let second = collect(&cwd, &["", "second.org", "", "admin", "secret", "a@b.com"]);
    assert!(Setup::new(&cfg, &hasher).run(&second, false).await.is_err());

    let done = Setup::new(&cfg, &hasher).run(&second, true).await.unwrap();

    assert!(!done.layout.apps.join("leftover.txt").exists());
    let compose = fs::read_to_string(&done.layout.compose).unwrap();
    assert!(compose.contains("traefik.second.org"));
    assert!(!compose.contains("first.org"));
}

#[tokio::test]
async fn trailing_separators_collapse() {
    let cwd = TempDir::new().unwrap();
    let base = cwd.path().join("stack");
    fs::create_dir_all(&base).unwrap();
    let answer = format!("{}//", base.display());

    let inputs = collect(&cwd, &[answer.as_str(), "example.org", "", "admin", "secret", "a@b.com"]);

    assert_eq!(inputs.root, base.join("docker"));
    assert!(!inputs.root.to_string_lossy().contains("//"));
}
