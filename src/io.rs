use crate::profile_scope;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::KeyboardConfig;
use crate::error::{Error, Result};

/// Saves a configuration snapshot as pretty-printed JSON.
///
/// The snapshot is written to a sibling `.tmp` file and renamed into place,
/// so an interrupted save never truncates an existing snapshot. The
/// `generation` counter is transient and not persisted.
pub fn save_config<P: AsRef<Path>>(path: P, config: &KeyboardConfig) -> Result<()> {
    profile_scope!("save_config");
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let tmp_path = path.with_extension({
        let mut os = path.extension().map(|e| e.to_os_string()).unwrap_or_default();
        os.push(".tmp");
        os
    });
    {
        let file = std::fs::File::create(&tmp_path).map_err(|source| Error::Io {
            path: tmp_path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, config).map_err(|source| Error::Snapshot {
            path: tmp_path.clone(),
            source,
        })?;
        writer.flush().map_err(|source| Error::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    // Rename over the destination so readers only ever see a complete file.
    std::fs::rename(&tmp_path, path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Loads a configuration snapshot saved by [`save_config`].
///
/// Fields absent from the file fall back to their defaults, so snapshots
/// from older builds keep loading. `generation` always starts at zero; the
/// owning store bumps it when the snapshot is installed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<KeyboardConfig> {
    profile_scope!("load_config");
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| Error::Snapshot {
        path: path.to_path_buf(),
        source,
    })
}
