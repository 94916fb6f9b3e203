//! Opening connections with the sqlite-vec extension loaded.

use crate::config::{ExtensionSource, Location};
use crate::error::{Error, Result};
use rusqlite::{Connection, LoadExtensionGuard};
use std::os::raw::c_int;
use std::path::Path;
use std::sync::OnceLock;

static BUNDLED_REGISTRATION: OnceLock<c_int> = OnceLock::new();

/// Open (or create) the database at `location` and load the vector extension.
pub fn open(location: &Location, extension: &ExtensionSource) -> Result<Connection> {
    if matches!(extension, ExtensionSource::Bundled) {
        // Auto-extensions only apply to connections opened afterwards.
        register_bundled()?;
    }

    let conn = match location {
        Location::Memory => Connection::open_in_memory(),
        Location::File(path) => Connection::open(path),
    }
    .map_err(Error::StorageOpen)?;

    if let ExtensionSource::Dynamic { path, entry_point } = extension {
        load_dynamic(&conn, path, entry_point.as_deref())?;
    }

    let version = extension_version(&conn)?;
    tracing::info!(%location, %version, "opened vector store database");
    Ok(conn)
}

/// Version reported by the loaded sqlite-vec extension.
pub fn extension_version(conn: &Connection) -> Result<String> {
    conn.query_row("SELECT vec_version()", [], |row| row.get(0))
        .map_err(|e| Error::ExtensionLoad(format!("sqlite-vec not available: {e}")))
}

fn register_bundled() -> Result<()> {
    let rc = *BUNDLED_REGISTRATION.get_or_init(|| {
        // SAFETY: `sqlite3_vec_init` is the extension entry point exported by the
        // statically linked sqlite-vec library. `sqlite3_auto_extension` expects
        // that entry point behind the generic extension-init pointer type, which
        // is what the transmute produces.
        unsafe {
            rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute(
                sqlite_vec::sqlite3_vec_init as *const (),
            )))
        }
    });
    if rc != rusqlite::ffi::SQLITE_OK {
        return Err(Error::ExtensionLoad(format!(
            "registering bundled sqlite-vec failed with code {rc}"
        )));
    }
    Ok(())
}

fn load_dynamic(conn: &Connection, path: &Path, entry_point: Option<&str>) -> Result<()> {
    tracing::debug!(path = %path.display(), ?entry_point, "loading vector extension");
    // SAFETY: loading a shared library runs its initialisation code inside this
    // process; the path comes from the store configuration. The guard re-disables
    // extension loading when dropped, on success and on failure alike.
    unsafe {
        let _guard = LoadExtensionGuard::new(conn)
            .map_err(|e| Error::ExtensionLoad(format!("cannot enable extension loading: {e}")))?;
        conn.load_extension(path, entry_point)
            .map_err(|e| Error::ExtensionLoad(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_open_in_memory_loads_extension() {
        let conn = open(&Location::Memory, &ExtensionSource::Bundled).unwrap();
        let version = extension_version(&conn).unwrap();
        assert!(version.starts_with('v'), "unexpected version {version}");
    }

    #[test]
    fn test_open_file_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vss.db");
        let location = Location::File(path.clone());
        open(&location, &ExtensionSource::Bundled).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_invalid_path() {
        let dir = tempfile::tempdir().unwrap();
        let location = Location::File(dir.path().join("missing").join("vss.db"));
        let err = open(&location, &ExtensionSource::Bundled).unwrap_err();
        assert!(matches!(err, Error::StorageOpen(_)));
    }

    #[test]
    fn test_missing_dynamic_extension() {
        let extension = ExtensionSource::Dynamic {
            path: PathBuf::from("/nonexistent/vec0"),
            entry_point: None,
        };
        let err = open(&Location::Memory, &extension).unwrap_err();
        assert!(matches!(err, Error::ExtensionLoad(_)));
    }
}
