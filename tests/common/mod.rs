//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;

use git2::{Oid, Repository, Signature, Time};

/// A test git repository builder with deterministic commit timestamps.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_str(&self) -> &str {
        self.dir.path().to_str().expect("temp path is not UTF-8")
    }

    fn signature_at(seconds: i64) -> Signature<'static> {
        Signature::new("test", "test@example.com", &Time::new(seconds, 0))
            .expect("Failed to create signature")
    }

    /// Commit on HEAD with author and committer time set to `seconds`.
    pub fn commit_at(&self, message: &str, seconds: i64) -> Oid {
        let sig = Self::signature_at(seconds);

        std::fs::write(self.path().join("file.txt"), message).expect("Failed to write test file");
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new("file.txt")).expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a lightweight tag pointing at `oid`.
    pub fn tag(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).expect("Failed to find object");
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("Failed to create tag");
    }

    /// Create an annotated tag pointing at `oid`.
    pub fn annotated_tag(&self, name: &str, oid: Oid, message: &str) {
        let object = self.repo.find_object(oid, None).expect("Failed to find object");
        let tagger = Self::signature_at(1_000);
        self.repo
            .tag(name, &object, &tagger, message, false)
            .expect("Failed to create annotated tag");
    }

    /// Create a branch pointing at `oid` without moving HEAD.
    pub fn branch(&self, name: &str, oid: Oid) {
        let commit = self.repo.find_commit(oid).expect("Failed to find commit");
        self.repo
            .branch(name, &commit, false)
            .expect("Failed to create branch");
    }

    /// Commit the tag `name` peels to, or `None` if it does not exist.
    pub fn tag_target(&self, name: &str) -> Option<Oid> {
        self.repo
            .revparse_single(&format!("refs/tags/{}", name))
            .ok()
            .and_then(|o| o.peel_to_commit().ok())
            .map(|c| c.id())
    }
}

/// Five commits on one line with timestamps 100..500 and a mix of tags:
///
/// | commit | time | tags                                                     |
/// |--------|------|----------------------------------------------------------|
/// | C1     | 100  | `first`                                                  |
/// | C2     | 200  | (branch `test-branch`)                                   |
/// | C3     | 300  | `v1.0.0`, annotated `annotated-tag`                      |
/// | C4     | 400  | `release/v1.0.0`                                         |
/// | C5     | 500  | `v1.4.0-alpha.1`, `prefixed/v1.0.0`, `non-semver-tag`, `pre/non-semver` |
pub fn setup_repo() -> (TestRepo, Vec<Oid>) {
    let test_repo = TestRepo::new();
    let messages = [
        "First commit",
        "Second commit",
        "Third commit",
        "Fourth commit",
        "Fifth commit",
    ];
    let commits: Vec<Oid> = messages
        .iter()
        .enumerate()
        .map(|(i, message)| test_repo.commit_at(message, (i as i64 + 1) * 100))
        .collect();

    test_repo.tag("first", commits[0]);
    test_repo.branch("test-branch", commits[1]);
    test_repo.tag("v1.0.0", commits[2]);
    test_repo.annotated_tag("annotated-tag", commits[2], "This is an annotated tag");
    test_repo.tag("release/v1.0.0", commits[3]);
    for name in ["v1.4.0-alpha.1", "prefixed/v1.0.0", "non-semver-tag", "pre/non-semver"] {
        test_repo.tag(name, commits[4]);
    }

    (test_repo, commits)
}
