//! # Setup pipeline
//!
//! Runs hashing, materializing and patching in a fixed order. Each step hands
//! an explicit value to the next one; the first failure aborts the run and
//! nothing is rolled back.

use std::path::Path;

use proxyup_common::config::Config;
use proxyup_common::error::SetupError;
use proxyup_common::{info, success, warn};

use crate::hasher::{self, CredentialHasher, HashedCredential};
use crate::input::SetupInputs;
use crate::layout::{self, Layout, Templates};
use crate::patch::{self, Edit, PatchReport};

/// Compose label carrying the basic-auth users of the Traefik dashboard.
pub const BASIC_AUTH_MARKER: &str = "traefik.http.middlewares.traefik-auth.basicauth.users";

/// Domain the templates ship with.
pub const PLACEHOLDER_DOMAIN: &str = "example.com";

/// Key of the ACME contact line in `traefik.yml`.
pub const EMAIL_MARKER: &str = "email";

/// Edits for `docker-compose.yml`: the auth label first, then the domain.
pub fn compose_edits(credential: &HashedCredential, domain: &str) -> Vec<Edit> {
    vec![
        Edit::line(
            BASIC_AUTH_MARKER,
            format!("      - \"{BASIC_AUTH_MARKER}={credential}\""),
        ),
        Edit::literal(PLACEHOLDER_DOMAIN, domain),
    ]
}

/// Edits for `traefik.yml`.
pub fn traefik_edits(email: &str) -> Vec<Edit> {
    vec![Edit::line(EMAIL_MARKER, format!("      email: {email}"))]
}

/// What a finished run produced.
#[derive(Debug)]
pub struct Completed {
    pub layout: Layout,
    pub credential: HashedCredential,
    pub compose: PatchReport,
    pub traefik: PatchReport,
}

pub struct Setup<'a> {
    templates: Templates,
    hasher: &'a dyn CredentialHasher,
}

impl<'a> Setup<'a> {
    pub fn new(cfg: &Config, hasher: &'a dyn CredentialHasher) -> Self {
        Self {
            templates: Templates::new(&cfg.assets_dir),
            hasher,
        }
    }

    /// Hashes, materializes and patches. `reset` allows removing an existing root.
    pub async fn run(&self, inputs: &SetupInputs, reset: bool) -> Result<Completed, SetupError> {
        let credential: HashedCredential = self.hash(inputs).await?;
        let layout: Layout = self.materialize(&inputs.root, reset)?;
        let (compose, traefik) = self.patch(&layout, &credential, inputs)?;

        success!("Setup complete!");
        Ok(Completed {
            layout,
            credential,
            compose,
            traefik,
        })
    }

    pub async fn hash(&self, inputs: &SetupInputs) -> Result<HashedCredential, SetupError> {
        let credential: HashedCredential =
            hasher::hashed_credential(self.hasher, &inputs.username, &inputs.password)
                .await
                .inspect_err(|e| proxyup_common::error!("{e}"))?;

        info!("Using hashed password: {credential}");
        Ok(credential)
    }

    pub fn materialize(&self, root: &Path, reset: bool) -> Result<Layout, SetupError> {
        info!("Setting up directory...");
        let layout: Layout = layout::materialize(&self.templates, root, reset)?;
        success!("Directory setup complete.");
        Ok(layout)
    }

    pub fn patch(
        &self,
        layout: &Layout,
        credential: &HashedCredential,
        inputs: &SetupInputs,
    ) -> Result<(PatchReport, PatchReport), SetupError> {
        info!("Replacing text in files...");

        let compose_edits: Vec<Edit> = compose_edits(credential, &inputs.domain);
        let compose: PatchReport = patch::patch_file(&layout.compose, &compose_edits)?;
        report_misses(&layout.compose, &compose_edits, &compose);

        let traefik_edits: Vec<Edit> = traefik_edits(&inputs.email);
        let traefik: PatchReport = patch::patch_file(&layout.traefik, &traefik_edits)?;
        report_misses(&layout.traefik, &traefik_edits, &traefik);

        success!("Text replacement complete.");
        Ok((compose, traefik))
    }
}

fn report_misses(path: &Path, edits: &[Edit], report: &PatchReport) {
    for idx in report.misses() {
        let what: &str = match &edits[idx] {
            Edit::Line { marker, .. } => marker.as_str(),
            Edit::Literal { from, .. } => from.as_str(),
        };
        warn!("'{what}' not found in {}, left unchanged", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::tests::ScriptedPrompter;
    use crate::input::InputCollector;
    use async_trait::async_trait;
    use proxyup_common::config::Answers;
    use proxyup_common::error::HashError;
    use proxyup_common::secret::Password;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tracing_subscriber::fmt::MakeWriter;

    struct FixedHasher;

    #[async_trait]
    impl CredentialHasher for FixedHasher {
        async fn hash(&self, username: &str, _password: &Password) -> Result<String, HashError> {
            Ok(format!("{username}:$apr1$salt$digest"))
        }
    }

    struct BrokenHasher;

    #[async_trait]
    impl CredentialHasher for BrokenHasher {
        async fn hash(&self, _username: &str, _password: &Password) -> Result<String, HashError> {
            Err(HashError::MalformedOutput {
                bin: PathBuf::from("htpasswd"),
                reason: "no output".to_string(),
            })
        }
    }

    fn config(dir: &TempDir) -> Config {
        let assets = dir.path().join("external");
        fs::create_dir_all(&assets).unwrap();
        fs::write(
            assets.join(layout::COMPOSE_FILE),
            "services:\n  traefik:\n    labels:\n      - \"traefik.http.middlewares.traefik-auth.basicauth.users=USER:PASSWORD\"\n      - \"traefik.http.routers.traefik.rule=Host(`traefik.example.com`)\"\n",
        )
        .unwrap();
        fs::write(
            assets.join(layout::TRAEFIK_FILE),
            "certificatesResolvers:\n  letsencrypt:\n    acme:\n      email: you@example.com\n",
        )
        .unwrap();
        fs::write(assets.join(layout::MIDDLEWARES_FILE), "http: {}\n").unwrap();

        Config {
            assets_dir: assets,
            ..Config::default()
        }
    }

    fn inputs(root: PathBuf) -> SetupInputs {
        SetupInputs {
            root,
            domain: "example.org".to_string(),
            username: "admin".to_string(),
            password: Password::from("secret"),
            email: "a@b.com".to_string(),
        }
    }

    #[test]
    fn compose_edit_shape() {
        let credential = HashedCredential::from_raw("admin:$x");
        let edits = compose_edits(&credential, "example.org");

        assert_eq!(
            edits[0],
            Edit::line(
                BASIC_AUTH_MARKER,
                "      - \"traefik.http.middlewares.traefik-auth.basicauth.users=admin:$$x\""
            )
        );
        assert_eq!(edits[1], Edit::literal("example.com", "example.org"));
    }

    #[tokio::test]
    async fn run_patches_both_files() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let hasher = FixedHasher;
        let setup = Setup::new(&cfg, &hasher);

        let done = setup
            .run(&inputs(dir.path().join("docker")), false)
            .await
            .unwrap();

        let compose = fs::read_to_string(&done.layout.compose).unwrap();
        assert!(compose.contains(
            "      - \"traefik.http.middlewares.traefik-auth.basicauth.users=admin:$$apr1$$salt$$digest\"\n"
        ));
        assert!(compose.contains("Host(`traefik.example.org`)"));
        assert!(!compose.contains("example.com"));

        let traefik = fs::read_to_string(&done.layout.traefik).unwrap();
        assert!(traefik.contains("      email: a@b.com\n"));
        assert_eq!(done.compose.hits, vec![1, 1]);
        assert_eq!(done.traefik.hits, vec![1]);
    }

    #[tokio::test]
    async fn hash_failure_leaves_disk_untouched() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let hasher = BrokenHasher;
        let setup = Setup::new(&cfg, &hasher);
        let root = dir.path().join("docker");

        let result = setup.run(&inputs(root.clone()), true).await;

        assert!(matches!(result, Err(SetupError::Hash(_))));
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn collected_inputs_feed_the_pipeline() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let base = dir.path().join("stack");
        fs::create_dir_all(&base).unwrap();

        let dir_answer = format!("{}/", base.display());
        let mut prompter = ScriptedPrompter::new(&[
            dir_answer.as_str(),
            "example.org",
            "",
            "admin",
            "secret",
            "a@b.com",
        ]);
        let answers = Answers::default();
        let collected = InputCollector::new(&mut prompter, &answers, dir.path().to_path_buf())
            .collect()
            .unwrap();

        let hasher = FixedHasher;
        let done = Setup::new(&cfg, &hasher).run(&collected, false).await.unwrap();

        assert_eq!(done.layout.root, base.join("docker"));
        assert!(done.layout.dynamic.is_dir());
    }

    #[derive(Clone, Default)]
    struct LogSink(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogSink {
        type Writer = LogSink;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn missing_marker_is_reported() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        fs::write(cfg.assets_dir.join(layout::TRAEFIK_FILE), "api:\n  dashboard: true\n").unwrap();

        let hasher = FixedHasher;
        let setup = Setup::new(&cfg, &hasher);
        let inputs = inputs(dir.path().join("docker"));
        let credential = HashedCredential::from_raw("admin:$x");

        let sink = LogSink::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(sink.clone())
            .finish();

        let (compose, traefik) = tracing::subscriber::with_default(subscriber, || {
            let layout = setup.materialize(&inputs.root, false).unwrap();
            setup.patch(&layout, &credential, &inputs).unwrap()
        });

        assert_eq!(compose.hits, vec![1, 1]);
        assert_eq!(traefik.hits, vec![0]);

        let logs = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        let traefik_path = inputs.root.join("core/data/traefik.yml");
        let warning = logs
            .lines()
            .find(|l| l.contains("WARN"))
            .expect("a warning should be logged");
        assert!(warning.contains("'email' not found in"), "{warning}");
        assert!(warning.contains(&traefik_path.display().to_string()), "{warning}");
        assert_eq!(logs.matches("WARN").count(), 1, "{logs}");
    }
}
