pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid track select {0}: must be 0 or 2-7")]
    InvalidTrackSelect(u8),
    
    #[error("Invalid track number {0}: must be 1, 2 or 3")]
    InvalidTrack(u8),
}
