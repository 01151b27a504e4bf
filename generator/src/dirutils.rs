use std::path::{Path, PathBuf};

use crate::error::GenerateError;

/// `path` with `sub_dir` appended, unless `path` already ends in it.
pub fn force_sub_dir(path: &Path, sub_dir: &str) -> PathBuf {
    if path.file_name().is_some_and(|name| name == sub_dir) {
        path.to_owned()
    } else {
        path.join(sub_dir)
    }
}

fn has_entries(path: &Path) -> bool {
    std::fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_some())
}

pub fn color_tables_exist(rule_set: &Path) -> bool {
    has_entries(&rule_set.join("color_tables"))
}

pub fn layer_rules_exist(rule_set: &Path) -> bool {
    has_entries(&rule_set.join("layer_rules"))
}

/// Write `contents` to `path`, creating parent directories. An existing file is kept unless
/// `force` is set; returns whether the file was written.
pub fn write_file(path: &Path, contents: &str, force: bool) -> Result<bool, GenerateError> {
    if path.exists() && !force {
        log::info!("keeping existing {}", path.display());
        return Ok(false);
    }
    let write_error = |source| GenerateError::Write {
        path: path.to_owned(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, contents).map_err(write_error)?;
    log::debug!("wrote {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forces_sub_directory_once() {
        assert_eq!(
            force_sub_dir(Path::new("/srv/chart"), "rules"),
            Path::new("/srv/chart/rules")
        );
        assert_eq!(
            force_sub_dir(Path::new("/srv/chart/rules"), "rules"),
            Path::new("/srv/chart/rules")
        );
        assert_eq!(
            force_sub_dir(Path::new("/srv/rules-old"), "rules"),
            Path::new("/srv/rules-old/rules")
        );
    }

    #[test]
    fn empty_rule_directories_do_not_count() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!color_tables_exist(dir.path()));

        std::fs::create_dir(dir.path().join("color_tables")).unwrap();
        assert!(!color_tables_exist(dir.path()));

        std::fs::write(dir.path().join("color_tables/DAY_BRIGHT.txt"), "").unwrap();
        assert!(color_tables_exist(dir.path()));
        assert!(!layer_rules_exist(dir.path()));
    }

    #[test]
    fn keeps_existing_files_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/out.map");

        assert!(write_file(&path, "one", false).unwrap());
        assert!(!write_file(&path, "two", false).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one");

        assert!(write_file(&path, "three", true).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "three");
    }
}
