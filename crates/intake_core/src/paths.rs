use std::path::PathBuf;

/// App directory (`~/.protocol_intake`).
pub fn intake_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".protocol_intake")
}

/// Default location of the serialized token cache.
pub fn token_cache_path() -> PathBuf {
    intake_dir().join("token_cache.bin")
}

/// Default directory downloaded workbooks land in.
pub fn download_dir() -> PathBuf {
    intake_dir().join("tmp")
}

/// Make sure the app directory exists.
pub fn ensure_intake_dir() -> std::io::Result<PathBuf> {
    let dir = intake_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
