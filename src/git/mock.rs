use crate::error::{SemverGitError, Result};
use crate::git::{CommitInfo, Identity, Repository, TagAnnotation, TagRef};
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// A tag held by [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub struct MockTag {
    pub name: String,
    pub commit: Oid,
    pub annotation: Option<TagAnnotation>,
}

/// Mock repository for testing without actual git operations
///
/// Commits are stored with their parents so ancestry queries work. Tags are
/// enumerated in insertion order.
pub struct MockRepository {
    commits: HashMap<Oid, CommitInfo>,
    parents: HashMap<Oid, Vec<Oid>>,
    branch_heads: HashMap<String, Oid>,
    head: Option<Oid>,
    tags: RefCell<Vec<MockTag>>,
    pushed: RefCell<Vec<(String, String)>>,
    resolve_calls: Cell<usize>,
    fail_tag_listing: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            parents: HashMap::new(),
            branch_heads: HashMap::new(),
            head: None,
            tags: RefCell::new(Vec::new()),
            pushed: RefCell::new(Vec::new()),
            resolve_calls: Cell::new(0),
            fail_tag_listing: false,
        }
    }

    /// Deterministic object id for test fixtures
    pub fn oid(n: u8) -> Oid {
        Oid::from_bytes(&[n; 20]).expect("20-byte oid")
    }

    /// Add a commit with a committer timestamp; it becomes HEAD
    pub fn add_commit(&mut self, id: Oid, time: i64, parents: &[Oid]) -> CommitInfo {
        let info = CommitInfo {
            id,
            committer: Identity::new("test", "test@example.com", time),
        };
        self.commits.insert(id, info.clone());
        self.parents.insert(id, parents.to_vec());
        self.head = Some(id);
        info
    }

    /// Add a lightweight tag pointing to a commit
    pub fn add_tag(&mut self, name: impl Into<String>, commit: Oid) {
        self.tags.get_mut().push(MockTag {
            name: name.into(),
            commit,
            annotation: None,
        });
    }

    /// Set a branch head
    pub fn set_branch_head(&mut self, branch: impl Into<String>, oid: Oid) {
        self.branch_heads.insert(branch.into(), oid);
    }

    /// Make every subsequent `list_tags` call fail
    pub fn fail_tag_listing(&mut self) {
        self.fail_tag_listing = true;
    }

    pub fn find_tag(&self, name: &str) -> Option<MockTag> {
        self.tags.borrow().iter().find(|t| t.name == name).cloned()
    }

    /// `(remote, tag)` pairs pushed so far
    pub fn pushed(&self) -> Vec<(String, String)> {
        self.pushed.borrow().clone()
    }

    /// Number of `resolve_commit` calls made so far
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.get()
    }

    fn lookup(&self, spec: &str) -> Option<Oid> {
        if spec == "HEAD" {
            return self.head;
        }
        let tag_name = spec.strip_prefix("refs/tags/").unwrap_or(spec);
        if let Some(tag) = self.tags.borrow().iter().find(|t| t.name == tag_name) {
            return Some(tag.commit);
        }
        let branch = spec.strip_prefix("refs/heads/").unwrap_or(spec);
        if let Some(oid) = self.branch_heads.get(branch) {
            return Some(*oid);
        }
        Oid::from_str(spec).ok().filter(|oid| self.commits.contains_key(oid))
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn resolve_commit(&self, spec: &str) -> Result<CommitInfo> {
        self.resolve_calls.set(self.resolve_calls.get() + 1);
        self.lookup(spec)
            .and_then(|oid| self.commits.get(&oid).cloned())
            .ok_or_else(|| {
                SemverGitError::repository(format!("failed to resolve git ref '{}'", spec))
            })
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        if self.fail_tag_listing {
            return Err(SemverGitError::repository("failed to retrieve tags"));
        }
        Ok(self
            .tags
            .borrow()
            .iter()
            .map(|t| TagRef::new(t.name.clone(), t.commit))
            .collect())
    }

    fn create_tag(
        &self,
        name: &str,
        target: Oid,
        annotation: Option<&TagAnnotation>,
    ) -> Result<()> {
        if self.find_tag(name).is_some() {
            return Err(SemverGitError::repository(format!(
                "failed to create tag '{}': tag already exists",
                name
            )));
        }
        if !self.commits.contains_key(&target) {
            return Err(SemverGitError::repository(format!(
                "Cannot find object {}",
                target
            )));
        }
        self.tags.borrow_mut().push(MockTag {
            name: name.to_string(),
            commit: target,
            annotation: annotation.cloned(),
        });
        Ok(())
    }

    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        let mut stack = vec![descendant];
        let mut seen = Vec::new();
        while let Some(oid) = stack.pop() {
            if oid == ancestor {
                return Ok(true);
            }
            if seen.contains(&oid) {
                continue;
            }
            seen.push(oid);
            if let Some(parents) = self.parents.get(&oid) {
                stack.extend(parents.iter().copied());
            }
        }
        Ok(false)
    }

    fn push_tag(&self, remote: &str, tag_name: &str) -> Result<()> {
        if self.find_tag(tag_name).is_none() {
            return Err(SemverGitError::repository(format!(
                "tag '{}' does not exist",
                tag_name
            )));
        }
        self.pushed
            .borrow_mut()
            .push((remote.to_string(), tag_name.to_string()));
        Ok(())
    }
}
