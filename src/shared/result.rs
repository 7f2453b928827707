/// Result alias used across lockwarden; errors are `anyhow::Error` so
/// `ScanError` values and I/O failures travel through the same `?` chain.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
