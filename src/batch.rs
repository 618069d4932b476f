//! A batch of images compressed under one shared settings snapshot.
//!
//! ## Identity
//!
//! Each image gets an [`ImageId`] when added. Ids are never reused within a
//! batch, so a result can always be paired back to the image it came from,
//! even though images are processed in parallel and finish in any order.
//!
//! ## Partial failure
//!
//! [`Batch::process`] runs the transform once per image on the rayon pool.
//! A failing image records a [`TransformError`] in its own status and the
//! rest of the batch carries on: three images with one corrupt source yield
//! two compressed results and one failure.
//!
//! ## Re-running
//!
//! Processing again (e.g. after changing the quality) replaces every item's
//! previous status. Sources are never modified.

use crate::imaging::{
    Dimensions, ImageBackend, TransformError, TransformSettings, calculate_savings, transform,
};
use crate::types::{SourceImage, TransformResult};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::mpsc::Sender;
use tracing::warn;

/// Identifier of an image within a [`Batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ImageId(u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub enum ItemStatus {
    #[default]
    Pending,
    Compressed(TransformResult),
    Failed(TransformError),
}

#[derive(Debug, Clone)]
pub struct BatchItem {
    pub id: ImageId,
    pub source: SourceImage,
    pub status: ItemStatus,
}

impl BatchItem {
    pub fn result(&self) -> Option<&TransformResult> {
        match &self.status {
            ItemStatus::Compressed(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&TransformError> {
        match &self.status {
            ItemStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Percentage saved, `0` until the item has been compressed.
    pub fn savings(&self) -> i64 {
        calculate_savings(
            self.source.original_size(),
            self.result().map(|r| r.byte_length),
        )
    }
}

/// Progress notification sent while a batch is processing.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Compressed {
        id: ImageId,
        name: String,
        original_size: u64,
        compressed_size: u64,
        dimensions: Dimensions,
    },
    Failed {
        id: ImageId,
        name: String,
        error: TransformError,
    },
}

/// Totals over a batch. Byte totals cover compressed items only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub compressed: usize,
    pub failed: usize,
    pub original_bytes: u64,
    pub compressed_bytes: u64,
}

impl BatchSummary {
    pub fn savings(&self) -> i64 {
        if self.compressed == 0 {
            return 0;
        }
        calculate_savings(self.original_bytes, Some(self.compressed_bytes))
    }
}

/// Ordered, keyed collection of images.
#[derive(Debug, Default)]
pub struct Batch {
    next_id: u64,
    items: BTreeMap<ImageId, BatchItem>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image. It starts out [`ItemStatus::Pending`].
    pub fn add(&mut self, source: SourceImage) -> ImageId {
        self.next_id += 1;
        let id = ImageId(self.next_id);
        self.items.insert(
            id,
            BatchItem {
                id,
                source,
                status: ItemStatus::Pending,
            },
        );
        id
    }

    pub fn remove(&mut self, id: ImageId) -> Option<BatchItem> {
        self.items.remove(&id)
    }

    pub fn get(&self, id: ImageId) -> Option<&BatchItem> {
        self.items.get(&id)
    }

    /// Items in the order they were added.
    pub fn items(&self) -> impl Iterator<Item = &BatchItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every image. Ids keep counting up.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Compress every image in parallel and record each outcome.
    ///
    /// Events are sent as each image finishes, in completion order. A closed
    /// receiver is ignored.
    pub fn process<B: ImageBackend>(
        &mut self,
        backend: &B,
        settings: &TransformSettings,
        events: Option<Sender<BatchEvent>>,
    ) -> BatchSummary {
        let outcomes: Vec<(ImageId, ItemStatus)> = self
            .items
            .par_iter()
            .map(|(&id, item)| {
                let outcome = transform(backend, &item.source, settings);
                if let Err(err) = &outcome {
                    warn!(%id, name = item.source.name(), error = %err, "image failed");
                }
                if let Some(tx) = &events {
                    let _ = tx.send(event_for(item, &outcome));
                }
                let status = match outcome {
                    Ok(result) => ItemStatus::Compressed(result),
                    Err(err) => ItemStatus::Failed(err),
                };
                (id, status)
            })
            .collect();

        for (id, status) in outcomes {
            if let Some(item) = self.items.get_mut(&id) {
                item.status = status;
            }
        }

        self.summary()
    }

    pub fn summary(&self) -> BatchSummary {
        self.items().fold(
            BatchSummary {
                total: self.len(),
                ..BatchSummary::default()
            },
            |mut acc, item| {
                match &item.status {
                    ItemStatus::Compressed(result) => {
                        acc.compressed += 1;
                        acc.original_bytes += item.source.original_size();
                        acc.compressed_bytes += result.byte_length;
                    }
                    ItemStatus::Failed(_) => acc.failed += 1,
                    ItemStatus::Pending => {}
                }
                acc
            },
        )
    }
}

fn event_for(item: &BatchItem, outcome: &Result<TransformResult, TransformError>) -> BatchEvent {
    let name = item.source.name().to_string();
    match outcome {
        Ok(result) => BatchEvent::Compressed {
            id: item.id,
            name,
            original_size: item.source.original_size(),
            compressed_size: result.byte_length,
            dimensions: result.dimensions,
        },
        Err(error) => BatchEvent::Failed {
            id: item.id,
            name,
            error: error.clone(),
        },
    }
}
