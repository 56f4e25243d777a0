//! Local filesystem mutations behind the panel's menu actions
//!
//! All operations are synchronous. Names typed by the user are validated
//! before anything touches the disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::error::{ExplorerError, ExplorerResult};

/// The directory new siblings of `path` are created in.
///
/// A directory encloses itself, a file is enclosed by its parent.
/// Returns `None` when `path` does not exist.
pub fn find_enclosing_dir(path: &Path) -> Option<PathBuf> {
    if path.is_dir() {
        return Some(path.to_path_buf());
    }
    if path.is_file() {
        return path.parent().map(Path::to_path_buf);
    }
    None
}

/// Reject names that would escape the target directory or mean nothing.
pub fn validate_name(name: &str) -> ExplorerResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains(std::path::MAIN_SEPARATOR)
        || name.contains('\0');
    if bad {
        return Err(ExplorerError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Create `parent/name` as a directory. An existing entry is left alone.
pub fn create_dir(parent: &Path, name: &str) -> ExplorerResult<PathBuf> {
    validate_name(name)?;
    let path = parent.join(name);
    if path.exists() {
        tracing::debug!("{} already exists, not creating", path.display());
        return Ok(path);
    }
    fs::create_dir(&path)?;
    tracing::info!("Created directory {}", path.display());
    Ok(path)
}

/// Touch `parent/name`: create it empty, or bump the mtime of an existing entry.
pub fn create_file(parent: &Path, name: &str) -> ExplorerResult<PathBuf> {
    validate_name(name)?;
    let path = parent.join(name);
    if !path.is_dir() {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
    }
    filetime::set_file_mtime(&path, FileTime::now())?;
    tracing::info!("Touched {}", path.display());
    Ok(path)
}

/// Rename `old` to `new_name` within its current directory.
///
/// The destination is not checked first, so an existing file with that
/// name is replaced.
pub fn rename(old: &Path, new_name: &str) -> ExplorerResult<PathBuf> {
    validate_name(new_name)?;
    let parent = old
        .parent()
        .ok_or_else(|| ExplorerError::NotFound(old.to_path_buf()))?;
    let new_path = parent.join(new_name);
    fs::rename(old, &new_path)?;
    tracing::info!("Renamed {} -> {}", old.display(), new_path.display());
    Ok(new_path)
}

/// Copy `src` into `dest_dir` under its own basename, never overwriting.
///
/// A symlinked `src` is followed; links inside a copied tree are copied as
/// links. On failure the partial destination is removed.
pub fn copy_into(src: &Path, dest_dir: &Path) -> ExplorerResult<PathBuf> {
    let name = src
        .file_name()
        .ok_or_else(|| ExplorerError::NotFound(src.to_path_buf()))?;
    let file_type = match fs::metadata(src) {
        Ok(meta) => meta.file_type(),
        Err(_) => return Err(ExplorerError::NotFound(src.to_path_buf())),
    };

    let dest = dest_dir.join(name);
    if dest.symlink_metadata().is_ok() {
        tracing::warn!("Destination path '{}' already exists, skipping", dest.display());
        return Err(ExplorerError::DestinationExists(dest));
    }

    // Resolve links on both sides, or `dest_dir -> src` slips through
    if file_type.is_dir() && fs::canonicalize(dest_dir)?.starts_with(fs::canonicalize(src)?) {
        return Err(ExplorerError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot copy {} into itself", src.display()),
        )));
    }

    tracing::info!("Pasting {} -> {}", src.display(), dest.display());
    if let Err(e) = copy_path(src, &dest, file_type) {
        remove_partial(&dest);
        return Err(e.into());
    }
    Ok(dest)
}

/// Copy one entry of the given type, recursing into directories
fn copy_path(src: &Path, dest: &Path, file_type: fs::FileType) -> io::Result<()> {
    if file_type.is_symlink() {
        let target = fs::read_link(src)?;
        std::os::unix::fs::symlink(&target, dest)?;
        return Ok(());
    }
    if file_type.is_dir() {
        fs::create_dir(dest)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_path(&entry.path(), &dest.join(entry.file_name()), entry.file_type()?)?;
        }
    } else {
        fs::copy(src, dest)?;
    }
    // Directories last, so creating children doesn't clobber the mtime
    preserve_attributes(src, dest);
    Ok(())
}

/// Best effort: the data is already in place if this fails.
fn preserve_attributes(src: &Path, dest: &Path) {
    if let Ok(meta) = fs::metadata(src) {
        let mtime = FileTime::from_last_modification_time(&meta);
        let atime = FileTime::from_last_access_time(&meta);
        if let Err(e) = filetime::set_file_times(dest, atime, mtime) {
            tracing::debug!("Could not preserve times on {}: {}", dest.display(), e);
        }
        let _ = fs::set_permissions(dest, meta.permissions());
    }
}

fn remove_partial(dest: &Path) {
    let result = match dest.symlink_metadata() {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(dest),
        Ok(_) => fs::remove_file(dest),
        Err(_) => return,
    };
    if let Err(e) = result {
        tracing::warn!("Failed to clean up partial copy {}: {}", dest.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enclosing_dir_of_dir_is_itself() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_enclosing_dir(dir.path()), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_enclosing_dir_of_file_is_parent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();
        assert_eq!(find_enclosing_dir(&file), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_enclosing_dir_of_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_enclosing_dir(&dir.path().join("ghost")), None);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("notes.md").is_ok());
        assert!(validate_name(".hidden").is_ok());
        for bad in ["", ".", "..", "a/b", "/abs", "trailing/"] {
            assert!(
                matches!(validate_name(bad), Err(ExplorerError::InvalidName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_create_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let created = create_dir(dir.path(), "sub").unwrap();
        assert!(created.is_dir());
        fs::write(created.join("keep"), "x").unwrap();

        create_dir(dir.path(), "sub").unwrap();
        assert!(created.join("keep").exists());
    }

    #[test]
    fn test_create_file_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_file(dir.path(), "new.txt").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"");

        fs::write(&path, "content").unwrap();
        create_file(dir.path(), "new.txt").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_invalid_names_leave_fs_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        assert!(create_file(dir.path(), "x/y").is_err());
        assert!(create_dir(dir.path(), "x/y").is_err());

        let file = dir.path().join("a.txt");
        fs::write(&file, "a").unwrap();
        assert!(matches!(
            rename(&file, "../escape.txt"),
            Err(ExplorerError::InvalidName(_))
        ));

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(file.exists());
    }

    #[test]
    fn test_rename_within_parent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("old.txt");
        fs::write(&file, "data").unwrap();

        let new_path = rename(&file, "new.txt").unwrap();
        assert_eq!(new_path, dir.path().join("new.txt"));
        assert!(!file.exists());
        assert_eq!(fs::read_to_string(new_path).unwrap(), "data");
    }

    #[test]
    fn test_rename_directory_stays_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("inner.txt"), "x").unwrap();

        let new_path = rename(&sub, "renamed").unwrap();
        assert_eq!(new_path, dir.path().join("renamed"));
        assert!(!sub.exists());
        assert!(new_path.join("inner.txt").is_file());
    }

    #[test]
    fn test_create_file_on_existing_directory_bumps_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let past = FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&sub, past).unwrap();

        let touched = create_file(dir.path(), "sub").unwrap();
        assert!(touched.is_dir());
        let meta = fs::metadata(&touched).unwrap();
        assert!(FileTime::from_last_modification_time(&meta) > past);
    }

    #[test]
    fn test_rename_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();

        rename(&a, "b.txt").unwrap();
        assert_eq!(fs::read_to_string(&b).unwrap(), "a");
    }

    #[test]
    fn test_copy_is_byte_identical() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join("blob.bin");
        let bytes: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        fs::write(&src, &bytes).unwrap();

        let dest = copy_into(&src, dest_dir.path()).unwrap();
        assert_eq!(dest, dest_dir.path().join("blob.bin"));
        assert_eq!(fs::read(&dest).unwrap(), bytes);
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join("old.txt");
        fs::write(&src, "old").unwrap();
        let past = FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&src, past).unwrap();

        let dest = copy_into(&src, dest_dir.path()).unwrap();
        let meta = fs::metadata(dest).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), past);
    }

    #[test]
    fn test_copy_refuses_to_overwrite() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join("same.txt");
        let existing = dest_dir.path().join("same.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&existing, "original").unwrap();

        let err = copy_into(&src, dest_dir.path()).unwrap_err();
        assert!(matches!(err, ExplorerError::DestinationExists(ref p) if p == &existing));
        assert_eq!(fs::read_to_string(&existing).unwrap(), "original");
    }

    #[test]
    fn test_copy_directory_recursively() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let tree = src_dir.path().join("tree");
        fs::create_dir_all(tree.join("nested")).unwrap();
        fs::write(tree.join("nested").join("leaf.txt"), "leaf").unwrap();

        let dest = copy_into(&tree, dest_dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(dest.join("nested").join("leaf.txt")).unwrap(),
            "leaf"
        );
    }

    #[test]
    fn test_copy_directory_into_itself_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("tree");
        let inner = tree.join("inner");
        fs::create_dir_all(&inner).unwrap();

        assert!(copy_into(&tree, &inner).is_err());
        assert!(!inner.join("tree").exists());
    }

    #[test]
    fn test_copy_into_symlink_to_itself_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("tree");
        fs::create_dir(&tree).unwrap();
        fs::write(tree.join("a.txt"), "a").unwrap();
        let alias = dir.path().join("alias");
        std::os::unix::fs::symlink(&tree, &alias).unwrap();

        assert!(copy_into(&tree, &alias).is_err());
        let entries: Vec<_> = fs::read_dir(&tree).unwrap().collect();
        assert_eq!(entries.len(), 1, "source tree must be untouched");
    }

    #[test]
    fn test_copy_keeps_inner_symlinks_as_links() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let tree = src_dir.path().join("tree");
        fs::create_dir(&tree).unwrap();
        fs::write(tree.join("a.txt"), "a").unwrap();
        std::os::unix::fs::symlink(&tree, tree.join("loop")).unwrap();

        let dest = copy_into(&tree, dest_dir.path()).unwrap();
        let link = dest.join("loop");
        assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), tree);
        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "a");
    }

    #[test]
    fn test_failed_copy_leaves_no_partial_destination() {
        use std::os::unix::fs::PermissionsExt;

        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let tree = src_dir.path().join("tree");
        let locked = tree.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(tree.join("ok.txt"), "ok").unwrap();
        fs::write(locked.join("secret.txt"), "s").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores directory permissions; nothing to test then
        let readable = fs::read_dir(&locked).is_ok();
        let result = copy_into(&tree, dest_dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        assert!(result.is_err());
        assert!(!dest_dir.path().join("tree").exists());
    }

    #[test]
    fn test_copy_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_into(&dir.path().join("ghost"), dir.path()).unwrap_err();
        assert!(matches!(err, ExplorerError::NotFound(_)));
    }
}
