// src/debug/helpers.rs

//! Helper functions for testing.

use crate::common::FPath;
use crate::readers::helpers::path_to_fpath;

use std::fs::File;
#[allow(unused_imports)]
use std::io::Write; // for `NamedTempFile.write_all`

use ::lazy_static::lazy_static;
use ::si_trace_print::dpfo;

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;
#[doc(hidden)]
pub use ::tempfile::TempDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile and TempDir instances default to this name prefix.
/// See <https://github.com/Stebalien/tempfile/issues/183>.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-aplot-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    path_to_fpath(ntf.path())
}

/// Testing helper function to write a `str` to a temporary file.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("NamedTempFile::new() return Err {}", err);
        }
    };
    match ntf.write_all(data.as_bytes()) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }

    ntf
}

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    match ::tempfile::Builder::new()
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempdir()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::new()..tempdir() return Err {}", err);
        }
    }
}

/// Testing helper to write files of `(name, data)` within the passed
/// `TempDir`. Returns the full path of each file.
pub fn create_files_in_tmpdir(
    tmpdir: &TempDir,
    files: &[(&str, &str)],
) -> Vec<FPath> {
    let mut fpaths = Vec::<FPath>::with_capacity(files.len());
    for (name, data) in files.iter() {
        let path = tmpdir.path().join(name);
        dpfo!("File::create({:?})", path);
        let mut file = match File::create(&path) {
            Ok(f) => f,
            Err(err) => panic!("File::create({:?}) Error {:?}", path, err),
        };
        if let Err(err) = file.write_all(data.as_bytes()) {
            panic!("File::write_all({:?}) Error {:?}", path, err);
        }
        fpaths.push(path_to_fpath(path.as_path()));
    }

    fpaths
}

/// Testing helper to create a `TempDir` and files of `(name, data)`.
pub fn create_files_and_tmpdir(files: &[(&str, &str)]) -> (TempDir, Vec<FPath>) {
    let tmpdir = create_temp_dir();
    let fpaths = create_files_in_tmpdir(&tmpdir, files);

    (tmpdir, fpaths)
}

/// Full path of `name` within `tmpdir`. The file need not exist.
pub fn tmpdir_fpath(
    tmpdir: &TempDir,
    name: &str,
) -> FPath {
    path_to_fpath(tmpdir.path().join(name).as_path())
}
