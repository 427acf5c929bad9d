use crate::engine::{ExtentStore, StoreInner, WRITE_STRIPES};
use crate::error::{StoreError, StoreErrorExt};
use crate::maintenance;
use parking_lot::RwLock;
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone)]
struct StoreConfig {
    create: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { create: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct StoreBuilder<S: Sealed = NoRoot> {
    state: S,
    config: StoreConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> StoreBuilder<S> {
    #[must_use = "Sets whether the store root should be created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> StoreBuilder<N> {
        StoreBuilder { state, config: self.config }
    }
}

impl StoreBuilder<NoRoot> {
    #[must_use = "Creates a new store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the root directory path for the extent store"]
    pub fn root(self, path: impl Into<PathBuf>) -> StoreBuilder<WithRoot> {
        self.transition(WithRoot(path.into()))
    }
}

impl StoreBuilder<WithRoot> {
    /// Consumes the configuration and initializes the extent store.
    ///
    /// This method performs the following boot sequence:
    /// 1. **Bootstrapping**: Creates the root directory if `create(true)` was set.
    /// 2. **Canonicalization**: Resolves the root path to an absolute, physical
    ///    path on disk so row paths are stable across the process lifetime.
    /// 3. **Self-Healing**: Scans the root for orphaned `.gctmp.` files left
    ///    behind by previous crashes and removes them.
    /// 4. **Index Rebuild**: Loads every persisted row's bounding box into the
    ///    in-memory index so `intersecting` is answerable immediately.
    ///
    /// # Reliability
    ///
    /// The self-healing routine is non-critical; if cleanup fails (e.g., due
    /// to transient file locks), initialization still proceeds with a logged
    /// warning. Undecodable rows are skipped from the index, not fatal.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if:
    /// - The root directory does not exist and `create` is false.
    /// - The process lacks permissions to create or resolve the root directory.
    pub async fn connect(self) -> Result<ExtentStore, StoreError> {
        let root = &self.state.0;

        if self.config.create {
            fs::create_dir_all(root)
                .await
                .context(format!("Failed to bootstrap store root: {}", root.display()))?;
            info!(path = %root.display(), "Bootstrapped extent store root directory");
        }

        let canonical = fs::canonicalize(root)
            .await
            .context(format!("Failed to resolve store root: {}", root.display()))?;

        maintenance::purge_tmp(&canonical).await;
        let index = maintenance::rebuild_index(&canonical).await;

        Ok(ExtentStore {
            inner: Arc::new(StoreInner {
                root: canonical,
                index: RwLock::new(index),
                write_locks: (0..WRITE_STRIPES).map(|_| tokio::sync::Mutex::new(())).collect(),
                tmp_counter: AtomicU64::new(1),
            }),
        })
    }
}
