//! Entity state table holding one record per known participant
//!
//! The synchronization core only talks to the table through [`EntityStore`],
//! so any container that can create, find and update position records can
//! stand in for [`EntityTable`].

use log::debug;
use shared::{PlayerId, PositionData};

/// Stable index of an entity inside a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerData {
    pub id: PlayerId,
    pub name: String,
}

impl PlayerData {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            name: format!("Player {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub player: PlayerData,
    pub position: PositionData,
}

/// Read-only copy of an entity handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub handle: EntityHandle,
    pub id: PlayerId,
    pub name: String,
    pub position: PositionData,
}

pub trait EntityStore {
    fn create_entity(&mut self, id: PlayerId, position: PositionData) -> EntityHandle;

    /// First entity carrying `id`, if any.
    fn find(&self, id: PlayerId) -> Option<EntityHandle>;

    fn position(&self, handle: EntityHandle) -> Option<PositionData>;

    /// Returns false when `handle` does not refer to a live entity.
    fn set_position(&mut self, handle: EntityHandle, position: PositionData) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<EntitySnapshot>;
}

/// Vec-backed store. Lookups are linear scans; rosters are small.
#[derive(Debug, Default)]
pub struct EntityTable {
    entities: Vec<Entity>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityStore for EntityTable {
    fn create_entity(&mut self, id: PlayerId, position: PositionData) -> EntityHandle {
        let handle = EntityHandle(self.entities.len());
        self.entities.push(Entity {
            player: PlayerData::new(id),
            position,
        });
        debug!("Created entity {:?} for player {}", handle, id);
        handle
    }

    fn find(&self, id: PlayerId) -> Option<EntityHandle> {
        self.entities
            .iter()
            .position(|e| e.player.id == id)
            .map(EntityHandle)
    }

    fn position(&self, handle: EntityHandle) -> Option<PositionData> {
        self.entities.get(handle.0).map(|e| e.position)
    }

    fn set_position(&mut self, handle: EntityHandle, position: PositionData) -> bool {
        match self.entities.get_mut(handle.0) {
            Some(entity) => {
                entity.position = position;
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.entities.len()
    }

    fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.entities
            .iter()
            .enumerate()
            .map(|(index, e)| EntitySnapshot {
                handle: EntityHandle(index),
                id: e.player.id,
                name: e.player.name.clone(),
                position: e.position,
            })
            .collect()
    }
}
