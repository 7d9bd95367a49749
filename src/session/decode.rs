//! Background image decoding.
//!
//! Reading a file and probing its pixel size runs on tokio's blocking pool.
//! Tasks are keyed by section index: starting a decode for an index aborts
//! the one already running there. Every task carries the slot generation it
//! was started for, so the reducer can drop results for slots that were
//! reset or reclaimed in the meantime.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageReader;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::debug;
use crate::document::{Generation, ImageFile, SectionImage};
use crate::utils::mime;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{0}` is not a supported image")]
    Image(PathBuf, #[source] image::ImageError),

    #[error("`{0}` has a zero-sized dimension")]
    Empty(PathBuf),

    #[error("decode task for `{0}` failed")]
    Task(PathBuf),
}

/// A finished decode, successful or not.
#[derive(Debug)]
pub struct Decoded {
    pub index: usize,
    pub generation: Generation,
    pub path: PathBuf,
    pub result: Result<SectionImage, DecodeError>,
}

struct Pending {
    generation: Generation,
    handle: JoinHandle<()>,
}

pub struct Decoder {
    runtime: Runtime,
    tx: mpsc::UnboundedSender<Decoded>,
    rx: mpsc::UnboundedReceiver<Decoded>,
    pending: FxHashMap<usize, Pending>,
}

impl Decoder {
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("postform-decode")
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            runtime,
            tx,
            rx,
            pending: FxHashMap::default(),
        })
    }

    /// Number of decodes not yet collected.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Decode `path` for section `index`, superseding any decode running there.
    pub fn start(&mut self, index: usize, generation: Generation, path: PathBuf) {
        if let Some(old) = self.pending.remove(&index) {
            old.handle.abort();
            debug!("decode"; "superseded decode for section {}", index + 1);
        }

        let tx = self.tx.clone();
        let handle = self.runtime.spawn(async move {
            let task_path = path.clone();
            let result = tokio::task::spawn_blocking(move || read_image(&task_path))
                .await
                .unwrap_or_else(|_| Err(DecodeError::Task(path.clone())));
            // receiver gone means the session ended
            let _ = tx.send(Decoded {
                index,
                generation,
                path,
                result,
            });
        });

        self.pending.insert(index, Pending { generation, handle });
    }

    /// Collect finished decodes without blocking.
    pub fn drain(&mut self) -> Vec<Decoded> {
        let mut done = Vec::new();
        while let Ok(decoded) = self.rx.try_recv() {
            if self
                .pending
                .get(&decoded.index)
                .is_some_and(|p| p.generation == decoded.generation)
            {
                self.pending.remove(&decoded.index);
            }
            done.push(decoded);
        }
        done
    }

    /// Block until every in-flight decode has finished, then collect them.
    pub fn wait(&mut self) -> Vec<Decoded> {
        let handles: Vec<_> = self.pending.drain().map(|(_, p)| p.handle).collect();
        if !handles.is_empty() {
            debug!("decode"; "waiting for {} decode(s)", handles.len());
            self.runtime.block_on(async {
                for handle in handles {
                    let _ = handle.await;
                }
            });
        }
        self.drain()
    }
}

/// Read an image file into a data-URL reference plus its natural size.
pub fn read_image(path: &Path) -> Result<SectionImage, DecodeError> {
    let bytes = fs::read(path).map_err(|e| DecodeError::Io(path.to_path_buf(), e))?;

    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| DecodeError::Io(path.to_path_buf(), e))?;
    let file_type = reader
        .format()
        .map(|f| f.to_mime_type())
        .or_else(|| mime::from_path(path))
        .unwrap_or_default();
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| DecodeError::Image(path.to_path_buf(), e))?;
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty(path.to_path_buf()));
    }

    let last_modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .and_then(|d| u64::try_from(d.as_millis()).ok());

    let file = ImageFile {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        file_type: file_type.to_string(),
        file_size: bytes.len() as u64,
        last_modified,
    };

    Ok(SectionImage {
        reference: format!("data:{file_type};base64,{}", STANDARD.encode(&bytes)),
        file,
        width,
        height,
    })
}
