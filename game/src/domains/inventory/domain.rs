use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{PlantId, Room, RoomId, RoomPurpose, Structure, StructureId};

/// Fallback lot moisture when a plant carries no override.
pub const DEFAULT_MOISTURE01: f32 = 0.62;

/// One harvested plant's yield. Immutable once appended to a storage room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestLot {
    pub id: String,
    pub plant: PlantId,
    pub structure: StructureId,
    pub room: RoomId,
    pub strain: String,
    pub fresh_weight_kg: f32,
    pub moisture01: f32,
    pub quality01: f32,
    pub created_at_tick: u64,
}

#[derive(Debug)]
pub enum StorageResolution {
    Resolved { room: Arc<Room> },
    NotFound,
    Ambiguous { candidates: Vec<RoomId> },
}

/// A structure stores harvests in exactly one storage room; zero or several
/// candidates both fail resolution, and the harvest stage degrades to a
/// no-op for that structure.
pub fn resolve_storage(structure: &Structure) -> StorageResolution {
    let mut rooms = structure.rooms_with_purpose(RoomPurpose::Storage);
    match (rooms.next(), rooms.next()) {
        (None, _) => StorageResolution::NotFound,
        (Some(room), None) => StorageResolution::Resolved { room: room.clone() },
        (Some(first), Some(second)) => {
            let mut candidates = vec![first.id, second.id];
            candidates.extend(rooms.map(|room| room.id));
            StorageResolution::Ambiguous { candidates }
        }
    }
}
