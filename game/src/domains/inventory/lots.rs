use crate::model::{PlantId, RoomId, StructureId};

/// Deterministic lot identifier. The same seed, path and tick always hash
/// to the same id; the per-tick lot index keeps ids from colliding when
/// several plants are harvested in one tick.
pub fn derive_lot_id(
    seed: &str,
    structure: StructureId,
    room: RoomId,
    plant: PlantId,
    tick: u64,
    lot_index: u32,
) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(seed.as_bytes());
    for part in [
        structure.0 as u64,
        room.0 as u64,
        plant.0 as u64,
        tick,
        lot_index as u64,
    ] {
        hasher.update(&part.to_le_bytes());
    }
    format!("lot-{}", hex::encode(&hasher.finalize().as_bytes()[..8]))
}
