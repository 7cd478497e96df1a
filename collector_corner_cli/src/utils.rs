use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

pub fn save_json<T: Serialize>(data: &T, path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(data)?.as_bytes())?;
    info!(path = %path.display(), "written");
    Ok(())
}

pub fn save_text(content: &str, path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    info!(path = %path.display(), "written");
    Ok(())
}

pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}
