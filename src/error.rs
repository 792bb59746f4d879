use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("player {0} not found")]
    NotFound(u32),
    #[error("store update failed for player {id}: {reason}")]
    StoreUpdate { id: u32, reason: String },
}
