use std::fs::{self, File};

use bintest::BinTest;
use common::{lazy_static::lazy_static, libc};
use tempfile::TempDir;
use testcall::*;

lazy_static! {
    static ref EXECUTABLES: BinTest = BinTest::new();
}

fn fixture() -> TempDir {
    let tempdir = TempDir::new().expect("created tempdir");
    fs::create_dir(tempdir.path().join("test_dir")).expect("created test_dir");
    File::create(tempdir.path().join("test_dir/file1")).expect("created file1");
    File::create(tempdir.path().join("test_dir/file2")).expect("created file2");
    fs::create_dir(tempdir.path().join("test_dir/test_subdir")).expect("created test_subdir");
    tempdir
}

#[test]
fn test_version() {
    let dirstream = TestCall::new(&EXECUTABLES, "dirstream");

    // check for version as remider to keep the tests up to date
    dirstream
        .call_argstr("-dd --version")
        .assert_success()
        .assert_stdout_utf8("dirstream 0.0.0");
}

#[test]
fn list_sync() {
    let mut dirstream = TestCall::new(&EXECUTABLES, "dirstream");
    let tempdir = fixture();
    dirstream.current_dir(&tempdir);
    dirstream
        .call_argstr("-dd list test_dir")
        .assert_success()
        .assert_stdout_utf8("file\tfile1")
        .assert_stdout_utf8("dir\ttest_subdir");
    dirstream
        .call_argstr("list --batch 1 test_dir")
        .assert_success()
        .assert_stdout_utf8("file\tfile2");
}

#[test]
fn list_async() {
    let mut dirstream = TestCall::new(&EXECUTABLES, "dirstream");
    let tempdir = fixture();
    dirstream.current_dir(&tempdir);
    dirstream
        .call_argstr("-dd list --async --batch 2 --workers 2 test_dir")
        .assert_success()
        .assert_stdout_utf8("file\tfile1")
        .assert_stdout_utf8("dir\ttest_subdir");
}

#[test]
fn list_errors() {
    let mut dirstream = TestCall::new(&EXECUTABLES, "dirstream");
    let tempdir = fixture();
    dirstream.current_dir(&tempdir);
    dirstream
        .call_argstr("list non-existing-dir")
        .assert_exitcode(libc::ENOENT);
    dirstream
        .call_argstr("list --async non-existing-dir")
        .assert_exitcode(libc::ENOENT);
    dirstream
        .call_argstr("list test_dir/file1")
        .assert_exitcode(libc::ENOTDIR);
    dirstream
        .call_argstr("list --batch 0 test_dir")
        .assert_failure();
}

#[test]
fn unwritable_logfile() {
    let mut dirstream = TestCall::new(&EXECUTABLES, "dirstream");
    let tempdir = fixture();
    dirstream.current_dir(&tempdir);
    dirstream
        .call_argstr("--logfile no_such_dir/dirstream.log list test_dir")
        .assert_exitcode(libc::ENOENT);
    dirstream
        .call_argstr("--logfile dirstream.log list test_dir")
        .assert_success();
    assert!(tempdir.path().join("dirstream.log").exists());
}
