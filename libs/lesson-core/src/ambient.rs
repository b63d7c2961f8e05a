//! Home-screen tile rotation.
//!
//! Four tiles each show one of a set of images. Every 1000–1500 ms one tile,
//! never the same as last time, switches to a random image. The rotation has
//! no bearing on gameplay and runs as its own task that stops when its handle
//! is dropped.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

pub const TILE_COUNT: usize = 4;

const MIN_DELAY_MS: u64 = 1000;
const DELAY_JITTER_MS: u64 = 500;

/// Which tile changed and what it shows now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileChange {
    pub slot: usize,
    pub image: usize,
}

/// Tile state of the rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRotation {
    tiles: [usize; TILE_COUNT],
    image_count: usize,
    last_slot: Option<usize>,
}

impl TileRotation {
    pub fn new(image_count: usize) -> Self {
        let image_count = image_count.max(1);
        let mut tiles = [0; TILE_COUNT];
        for (slot, tile) in tiles.iter_mut().enumerate() {
            *tile = slot % image_count;
        }
        Self {
            tiles,
            image_count,
            last_slot: None,
        }
    }

    pub fn tiles(&self) -> [usize; TILE_COUNT] {
        self.tiles
    }

    /// Swap the image of one tile other than the last one changed.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TileChange {
        let slot = loop {
            let slot = rng.random_range(0..TILE_COUNT);
            if Some(slot) != self.last_slot {
                break slot;
            }
        };
        let image = rng.random_range(0..self.image_count);

        self.last_slot = Some(slot);
        self.tiles[slot] = image;
        TileChange { slot, image }
    }

    /// Wait before the next change.
    pub fn next_delay<R: Rng + ?Sized>(rng: &mut R) -> Duration {
        Duration::from_millis(MIN_DELAY_MS + rng.random_range(0..DELAY_JITTER_MS))
    }
}

/// Running rotation. Dropping it aborts the task.
#[derive(Debug)]
pub struct RotationHandle {
    tiles: watch::Receiver<[usize; TILE_COUNT]>,
    task: JoinHandle<()>,
}

impl RotationHandle {
    /// Start rotating on the current tokio runtime.
    pub fn spawn(image_count: usize, seed: u64) -> Self {
        let mut rotation = TileRotation::new(image_count);
        let (tx, rx) = watch::channel(rotation.tiles());

        let task = tokio::spawn(async move {
            let mut rng = StdRng::seed_from_u64(seed);
            loop {
                tokio::time::sleep(TileRotation::next_delay(&mut rng)).await;
                let change = rotation.step(&mut rng);
                trace!(slot = change.slot, image = change.image, "tile rotated");
                if tx.send(rotation.tiles()).is_err() {
                    break;
                }
            }
        });

        Self { tiles: rx, task }
    }

    pub fn tiles(&self) -> [usize; TILE_COUNT] {
        *self.tiles.borrow()
    }

    /// Wait for the next change. Returns `false` once the task has stopped.
    pub async fn changed(&mut self) -> bool {
        self.tiles.changed().await.is_ok()
    }
}

impl Drop for RotationHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_changes_the_same_tile_twice_in_a_row() {
        let mut rotation = TileRotation::new(4);
        let mut rng = StdRng::seed_from_u64(11);
        let mut last = None;
        for _ in 0..200 {
            let change = rotation.step(&mut rng);
            assert_ne!(Some(change.slot), last);
            assert!(change.image < 4);
            assert_eq!(rotation.tiles()[change.slot], change.image);
            last = Some(change.slot);
        }
    }

    #[test]
    fn test_delays_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let delay = TileRotation::next_delay(&mut rng);
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay < Duration::from_millis(1500));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_rotation_publishes_changes() {
        let mut handle = RotationHandle::spawn(4, 3);
        assert_eq!(handle.tiles(), [0, 1, 2, 3]);
        assert!(handle.changed().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_handle_stops_the_task() {
        let handle = RotationHandle::spawn(4, 3);
        let mut tiles = handle.tiles.clone();
        drop(handle);
        // The aborted task drops its sender, so no further change arrives.
        assert!(tiles.changed().await.is_err());
    }
}
