use crate::error::{SemverGitError, Result};
use crate::git::{CommitInfo, Identity, TagAnnotation, TagRef};
use git2::{Commit, Oid, Repository as Git2Repo, Signature, Time};
use std::path::Path;
use tracing::{debug, warn};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            SemverGitError::repository(format!(
                "failed to open repository at '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn commit_info(commit: &Commit<'_>) -> CommitInfo {
        let committer = commit.committer();
        let when = committer.when();

        CommitInfo {
            id: commit.id(),
            committer: Identity {
                name: String::from_utf8_lossy(committer.name_bytes()).into_owned(),
                email: String::from_utf8_lossy(committer.email_bytes()).into_owned(),
                time: when.seconds(),
                offset_minutes: when.offset_minutes(),
            },
        }
    }

    /// Signature for an annotated tag on `target`.
    ///
    /// When `tagger` is the target commit's committer the recorded signature is
    /// reused byte for byte, so empty emails and non-UTF-8 names survive.
    fn tagger_signature(&self, target: Oid, tagger: &Identity) -> Result<Signature<'static>> {
        if let Ok(commit) = self.repo.find_commit(target) {
            let committer = commit.committer();
            if Self::commit_info(&commit).committer == *tagger {
                return Ok(committer.to_owned());
            }
        }
        Ok(Signature::new(
            &tagger.name,
            &tagger.email,
            &Time::new(tagger.time, tagger.offset_minutes),
        )?)
    }
}

impl super::Repository for Git2Repository {
    fn resolve_commit(&self, spec: &str) -> Result<CommitInfo> {
        let object = self.repo.revparse_single(spec).map_err(|e| {
            SemverGitError::repository(format!("failed to resolve git ref '{}': {}", spec, e))
        })?;

        let commit = object.peel_to_commit().map_err(|e| {
            SemverGitError::repository(format!(
                "failed to fetch commit object for '{}': {}",
                spec, e
            ))
        })?;

        Ok(Self::commit_info(&commit))
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        let mut tags = Vec::new();

        self.repo
            .tag_foreach(|oid, name_bytes| {
                match std::str::from_utf8(name_bytes) {
                    Ok(reference) => {
                        let name = reference.strip_prefix("refs/tags/").unwrap_or(reference);
                        tags.push(TagRef {
                            name: name.to_string(),
                            reference: reference.to_string(),
                            target: oid,
                        });
                    }
                    Err(_) => warn!("Skipping tag with OID {} - name is not valid UTF-8", oid),
                }
                true
            })
            .map_err(|e| SemverGitError::repository(format!("failed to retrieve tags: {}", e)))?;

        debug!(count = tags.len(), "enumerated tag references");
        Ok(tags)
    }

    fn create_tag(
        &self,
        name: &str,
        target: Oid,
        annotation: Option<&TagAnnotation>,
    ) -> Result<()> {
        let object = self.repo.find_object(target, None).map_err(|e| {
            SemverGitError::repository(format!("Cannot find object {}: {}", target, e))
        })?;

        let created = match annotation {
            Some(annotation) => {
                let signature = self.tagger_signature(target, &annotation.tagger)?;
                self.repo
                    .tag(name, &object, &signature, &annotation.message, false)
            }
            None => self.repo.tag_lightweight(name, &object, false),
        };

        created.map_err(|e| {
            SemverGitError::repository(format!("failed to create tag '{}': {}", name, e))
        })?;

        Ok(())
    }

    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        if ancestor == descendant {
            return Ok(true);
        }
        Ok(self.repo.graph_descendant_of(descendant, ancestor)?)
    }

    fn push_tag(&self, remote_name: &str, tag_name: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            SemverGitError::repository(format!("No remote named '{}' found", remote_name))
        })?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        // Rejections from the remote arrive here rather than as a push error
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{0}:refs/tags/{0}", tag_name);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    SemverGitError::repository(format!("Network error during push: {}", e))
                } else {
                    SemverGitError::repository(format!(
                        "failed to push tag {} to remote {}: {}",
                        tag_name, remote_name, e
                    ))
                }
            })?;

        Ok(())
    }
}
