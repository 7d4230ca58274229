// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export orchestration
//!
//! [`encode`] is the synchronous entry point. With the `runtime` feature,
//! [`ExportPipeline`] runs encoders on the tokio blocking pool and allows
//! at most one in-flight export per [`ExportKind`].

use std::fmt;

use bytes::Bytes;
use massing_core::StoreSnapshot;

use crate::config::ExportConfig;
use crate::document::encode_json;
use crate::error::Result;
use crate::glb::encode_glb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Glb,
    Json,
}

impl ExportKind {
    pub const ALL: [ExportKind; 2] = [ExportKind::Glb, ExportKind::Json];

    pub fn extension(self) -> &'static str {
        match self {
            ExportKind::Glb => "glb",
            ExportKind::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportKind::Glb => "model/gltf-binary",
            ExportKind::Json => "application/json",
        }
    }

    #[cfg(feature = "runtime")]
    fn slot(self) -> usize {
        match self {
            ExportKind::Glb => 0,
            ExportKind::Json => 1,
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportKind::Glb => "GLB",
            ExportKind::Json => "JSON",
        })
    }
}

/// Encoded file ready to be handed to the user
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub kind: ExportKind,
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Bytes,
}

/// Encode a snapshot synchronously
pub fn encode(kind: ExportKind, snapshot: &StoreSnapshot, config: &ExportConfig) -> Result<ExportArtifact> {
    let bytes = match kind {
        ExportKind::Glb => encode_glb(snapshot, config)?,
        ExportKind::Json => encode_json(snapshot, config)?,
    };
    Ok(ExportArtifact {
        kind,
        file_name: config.file_name(kind.extension()),
        mime_type: kind.mime_type(),
        bytes: Bytes::from(bytes),
    })
}

#[cfg(feature = "runtime")]
pub use runtime::{ExportPipeline, PendingExport};

#[cfg(feature = "runtime")]
mod runtime {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    use massing_core::StoreSnapshot;
    use tokio::task::JoinHandle;

    use super::{encode, ExportArtifact, ExportKind};
    use crate::config::ExportConfig;
    use crate::error::{ExportError, Result};

    /// Runs exports off the caller's thread, one per kind at a time
    #[derive(Debug, Clone)]
    pub struct ExportPipeline {
        config: Arc<ExportConfig>,
        in_flight: Arc<[AtomicBool; 2]>,
    }

    /// Clears the in-flight flag on drop, whatever the export outcome
    #[derive(Debug)]
    struct InFlightGuard {
        flags: Arc<[AtomicBool; 2]>,
        kind: ExportKind,
    }

    impl Drop for InFlightGuard {
        fn drop(&mut self) {
            self.flags[self.kind.slot()].store(false, Ordering::Release);
        }
    }

    /// An export that has claimed its slot and is encoding in the background.
    ///
    /// The slot is shared between this handle and the encoding task and is
    /// released once both are gone, so dropping the handle early does not
    /// free it while the encoder still runs.
    #[derive(Debug)]
    pub struct PendingExport {
        handle: JoinHandle<Result<ExportArtifact>>,
        started: Instant,
        guard: Arc<InFlightGuard>,
    }

    impl PendingExport {
        pub fn kind(&self) -> ExportKind {
            self.guard.kind
        }

        /// Wait for the encoder; the slot is released when this returns
        pub async fn finish(self) -> Result<ExportArtifact> {
            let kind = self.kind();
            let result = self.handle.await?;
            match &result {
                Ok(artifact) => tracing::info!(
                    %kind,
                    bytes = artifact.bytes.len(),
                    elapsed_ms = self.started.elapsed().as_millis() as u64,
                    "Export finished"
                ),
                Err(e) => tracing::warn!(%kind, error = %e, "Export failed"),
            }
            result
        }
    }

    impl ExportPipeline {
        pub fn new(config: ExportConfig) -> Self {
            Self {
                config: Arc::new(config),
                in_flight: Arc::new([AtomicBool::new(false), AtomicBool::new(false)]),
            }
        }

        pub fn config(&self) -> &ExportConfig {
            &self.config
        }

        pub fn is_in_flight(&self, kind: ExportKind) -> bool {
            self.in_flight[kind.slot()].load(Ordering::Acquire)
        }

        fn acquire(&self, kind: ExportKind) -> Result<InFlightGuard> {
            self.in_flight[kind.slot()]
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .map_err(|_| {
                    tracing::warn!(%kind, "Export rejected: already in progress");
                    ExportError::InProgress(kind)
                })?;
            Ok(InFlightGuard {
                flags: Arc::clone(&self.in_flight),
                kind,
            })
        }

        /// Claim the slot for `kind` and start encoding the owned snapshot.
        ///
        /// Fails immediately with [`ExportError::InProgress`] when an export
        /// of the same kind has not finished yet. Must be called from within
        /// a tokio runtime.
        pub fn begin(&self, kind: ExportKind, snapshot: StoreSnapshot) -> Result<PendingExport> {
            let guard = self.acquire(kind)?;
            tracing::info!(%kind, blocks = snapshot.blocks.len(), "Export started");

            let guard = Arc::new(guard);
            let task_guard = Arc::clone(&guard);
            let config = Arc::clone(&self.config);
            let handle = tokio::task::spawn_blocking(move || {
                let _slot = task_guard;
                encode(kind, &snapshot, &config)
            });
            Ok(PendingExport {
                handle,
                started: Instant::now(),
                guard,
            })
        }

        /// Encode `snapshot` as `kind` on the blocking pool
        pub async fn export(&self, kind: ExportKind, snapshot: StoreSnapshot) -> Result<ExportArtifact> {
            self.begin(kind, snapshot)?.finish().await
        }
    }

    impl Default for ExportPipeline {
        fn default() -> Self {
            Self::new(ExportConfig::default())
        }
    }
}
