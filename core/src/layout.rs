//! # Directory Materializer
//!
//! Builds the on-disk tree the Traefik + Portainer stack runs from:
//!
//! ```text
//! <root>/apps
//! <root>/core/docker-compose.yml
//! <root>/core/data/traefik.yml
//! <root>/core/data/acme.json
//! <root>/core/data/dynamic/middlewares.yml
//! ```
//!
//! An existing `<root>` is only removed when the caller allows a reset.
//! Every template copy refuses to overwrite, which can only trigger if
//! something raced us between the reset and the copy.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use proxyup_common::error::LayoutError;
use proxyup_common::{info, warn};

pub const COMPOSE_FILE: &str = "docker-compose.yml";
pub const TRAEFIK_FILE: &str = "traefik.yml";
pub const MIDDLEWARES_FILE: &str = "middlewares.yml";
pub const ACME_FILE: &str = "acme.json";

/// Mode Traefik insists on before it will read `acme.json`.
pub const ACME_MODE: u32 = 0o600;

/// The bundled template directory.
#[derive(Clone, Debug)]
pub struct Templates {
    dir: PathBuf,
}

impl Templates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn compose(&self) -> PathBuf {
        self.dir.join(COMPOSE_FILE)
    }

    pub fn traefik(&self) -> PathBuf {
        self.dir.join(TRAEFIK_FILE)
    }

    pub fn middlewares(&self) -> PathBuf {
        self.dir.join(MIDDLEWARES_FILE)
    }

    /// Fails on the first template that is not a regular file.
    pub fn verify(&self) -> Result<(), LayoutError> {
        for path in [self.compose(), self.traefik(), self.middlewares()] {
            if !path.is_file() {
                return Err(LayoutError::MissingTemplate { path });
            }
        }
        Ok(())
    }
}

/// Paths of a materialized tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub core: PathBuf,
    pub apps: PathBuf,
    pub data: PathBuf,
    pub dynamic: PathBuf,
    pub compose: PathBuf,
    pub traefik: PathBuf,
    pub middlewares: PathBuf,
    pub acme: PathBuf,
}

impl Layout {
    pub fn new(root: &Path) -> Self {
        let core: PathBuf = root.join("core");
        let data: PathBuf = core.join("data");
        let dynamic: PathBuf = data.join("dynamic");

        Self {
            root: root.to_path_buf(),
            apps: root.join("apps"),
            compose: core.join(COMPOSE_FILE),
            traefik: data.join(TRAEFIK_FILE),
            middlewares: dynamic.join(MIDDLEWARES_FILE),
            acme: data.join(ACME_FILE),
            core,
            data,
            dynamic,
        }
    }
}

/// Resets `root` (when allowed) and lays the stack out inside it.
pub fn materialize(templates: &Templates, root: &Path, reset: bool) -> Result<Layout, LayoutError> {
    templates.verify()?;

    let layout: Layout = Layout::new(root);
    clear_root(&layout.root, reset)?;

    create_dir(&layout.root)?;

    info!("Creating core directory. This is where the traefik and portainer config files will be stored.");
    create_dir(&layout.core)?;

    info!("Creating apps directory. This is where the configurations or volumes for individual applications may be stored if you wish.");
    create_dir(&layout.apps)?;

    info!("Setting up dynamic directory. This is where the dynamic configuration files will be stored. An example one that ip whitelists has been created for you.");
    create_dir(&layout.dynamic)?;

    copy_template(&templates.middlewares(), &layout.middlewares)?;
    copy_template(&templates.compose(), &layout.compose)?;
    copy_template(&templates.traefik(), &layout.traefik)?;

    create_acme_store(&layout.acme)?;

    Ok(layout)
}

fn clear_root(root: &Path, reset: bool) -> Result<(), LayoutError> {
    match fs::symlink_metadata(root) {
        Ok(_) if !reset => Err(LayoutError::AlreadyExists {
            path: root.to_path_buf(),
        }),
        Ok(meta) => {
            warn!("Docker directory found at {}, deleting...", root.display());
            let removed: io::Result<()> = if meta.is_dir() {
                fs::remove_dir_all(root)
            } else {
                fs::remove_file(root)
            };
            removed.map_err(|e| LayoutError::io("remove", root, e))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LayoutError::io("inspect", root, e)),
    }
}

fn create_dir(path: &Path) -> Result<(), LayoutError> {
    fs::create_dir_all(path).map_err(|e| LayoutError::io("create directory", path, e))
}

fn copy_template(src: &Path, dst: &Path) -> Result<(), LayoutError> {
    let mut source: File = File::open(src).map_err(|e| LayoutError::io("open", src, e))?;
    let mut target: File = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dst)
        .map_err(|e| LayoutError::io("create", dst, e))?;

    io::copy(&mut source, &mut target).map_err(|e| LayoutError::io("copy into", dst, e))?;
    Ok(())
}

/// Creates an empty `acme.json` readable and writable by the owner only.
fn create_acme_store(path: &Path) -> Result<(), LayoutError> {
    let mut options: OpenOptions = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(ACME_MODE);
    }

    let file: File = options
        .open(path)
        .map_err(|e| LayoutError::io("create", path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(ACME_MODE))
            .map_err(|e| LayoutError::io("restrict permissions of", path, e))?;
    }
    #[cfg(not(unix))]
    drop(file);

    Ok(())
}
