//! In-memory version control and scripted prompts for tests

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git::{CommitOptions, PushOptions, RepoStatus, VersionControl};
use crate::prompt::Prompt;
use crate::{Error, Result};

/// How a scripted git call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Plain non-zero exit
    Git,
    /// Push refused by the remote
    Rejected,
    /// Rebase stopped on conflicts
    Conflict,
}

/// State before a commit, restored when it is undone
#[derive(Debug, Clone)]
struct Snapshot {
    status: RepoStatus,
    last_message: String,
    committed_descriptor: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    is_repo: bool,
    current: String,
    default_branch: String,
    local: BTreeSet<String>,
    remote: BTreeSet<String>,
    /// Local branches whose tip matches the remote copy
    in_sync: BTreeSet<String>,
    status: RepoStatus,
    last_message: String,
    commits: usize,
    /// Descriptor contents recorded in HEAD; `None` means no file
    committed_descriptor: Option<String>,
    /// What each commit replaced, newest last
    history: Vec<Snapshot>,
    /// Descriptor contents each branch carries; `None` means no file
    branch_descriptors: HashMap<String, Option<String>>,
    failures: HashMap<String, VecDeque<Failure>>,
    calls: Vec<String>,
}

/// Version control double backed by a temp directory as repository root
pub struct FakeGit {
    root: TempDir,
    descriptor_file: String,
    state: RefCell<State>,
}

impl FakeGit {
    pub fn new() -> Self {
        let state = State {
            is_repo: true,
            default_branch: "main".to_string(),
            last_message: "Initial commit".to_string(),
            ..State::default()
        };
        Self {
            root: tempfile::tempdir().expect("temp dir"),
            descriptor_file: crate::config::DEFAULT_DESCRIPTOR_FILE.to_string(),
            state: RefCell::new(state),
        }
    }

    pub fn not_a_repository(self) -> Self {
        self.state.borrow_mut().is_repo = false;
        self
    }

    /// Current branch; also created locally
    pub fn on(self, branch: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.current = branch.to_string();
            state.local.insert(branch.to_string());
        }
        self
    }

    pub fn default_branch(self, branch: &str) -> Self {
        self.state.borrow_mut().default_branch = branch.to_string();
        self
    }

    pub fn local(self, branches: &[&str]) -> Self {
        self.state
            .borrow_mut()
            .local
            .extend(branches.iter().map(|b| b.to_string()));
        self
    }

    pub fn remote(self, branches: &[&str]) -> Self {
        self.state
            .borrow_mut()
            .remote
            .extend(branches.iter().map(|b| b.to_string()));
        self
    }

    /// Mark a local branch as already matching its remote copy
    pub fn in_sync(self, branch: &str) -> Self {
        self.state.borrow_mut().in_sync.insert(branch.to_string());
        self
    }

    /// Modified tracked file in the working tree
    pub fn with_changes(self) -> Self {
        self.state
            .borrow_mut()
            .status
            .modified
            .push("src/lib.rs".to_string());
        self
    }

    pub fn with_untracked(self) -> Self {
        self.state
            .borrow_mut()
            .status
            .untracked
            .push("notes.txt".to_string());
        self
    }

    /// Committed descriptor naming `branch`
    pub fn with_descriptor(self, branch: &str) -> Self {
        self.with_descriptor_contents(&descriptor_json(branch))
    }

    /// Committed descriptor with raw file contents
    pub fn with_descriptor_contents(self, contents: &str) -> Self {
        self.write_descriptor(Some(contents));
        self.state.borrow_mut().committed_descriptor = Some(contents.to_string());
        self
    }

    /// Descriptor the working tree gets when `branch` is checked out
    pub fn branch_descriptor(self, branch: &str, descriptor_branch: Option<&str>) -> Self {
        self.state.borrow_mut().branch_descriptors.insert(
            branch.to_string(),
            descriptor_branch.map(descriptor_json),
        );
        self
    }

    /// Make the next call of `operation` fail
    ///
    /// `operation` is the journal entry up to the arguments, e.g. `push`,
    /// `push --force`, `branch -D`, `commit --amend`.
    pub fn failing(self, operation: &str, failure: Failure) -> Self {
        self.state
            .borrow_mut()
            .failures
            .entry(operation.to_string())
            .or_default()
            .push_back(failure);
        self
    }

    pub fn current(&self) -> String {
        self.state.borrow().current.clone()
    }

    pub fn has_local(&self, branch: &str) -> bool {
        self.state.borrow().local.contains(branch)
    }

    pub fn has_remote(&self, branch: &str) -> bool {
        self.state.borrow().remote.contains(branch)
    }

    pub fn commits(&self) -> usize {
        self.state.borrow().commits
    }

    pub fn last_message(&self) -> String {
        self.state.borrow().last_message.clone()
    }

    /// Journal of mutating calls, in order
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.root.path().join(&self.descriptor_file)
    }

    /// Raw descriptor file contents, if the file exists
    pub fn descriptor(&self) -> Option<String> {
        std::fs::read_to_string(self.descriptor_path()).ok()
    }

    /// Branch named by the descriptor, if it is valid
    pub fn descriptor_branch(&self) -> Option<String> {
        let content = self.descriptor()?;
        let value: serde_json::Value = serde_json::from_str(&content).ok()?;
        value["branch"].as_str().map(|s| s.to_string())
    }

    fn write_descriptor(&self, contents: Option<&str>) {
        let path = self.descriptor_path();
        match contents {
            Some(contents) => std::fs::write(path, contents).expect("write descriptor"),
            None => {
                let _ = std::fs::remove_file(path);
            }
        }
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }

    /// Journal the call and apply any scripted failure
    fn call(&self, operation: &str, args: &str) -> Result<()> {
        let entry = if args.is_empty() {
            operation.to_string()
        } else {
            format!("{} {}", operation, args)
        };
        self.record(entry.clone());

        let failure = self
            .state
            .borrow_mut()
            .failures
            .get_mut(operation)
            .and_then(|queue| queue.pop_front());

        match failure {
            None => Ok(()),
            Some(Failure::Git) => Err(Error::Git(format!("git {} failed", entry))),
            Some(Failure::Rejected) => Err(Error::PushRejected {
                branch: args.rsplit(' ').next().unwrap_or_default().to_string(),
                reason: "! [rejected] (fetch first)".to_string(),
            }),
            Some(Failure::Conflict) => {
                self.state
                    .borrow_mut()
                    .status
                    .conflicted
                    .push("src/lib.rs".to_string());
                Err(Error::Git(format!("git {} failed: CONFLICT", entry)))
            }
        }
    }

    fn switch_to(&self, branch: &str) {
        let descriptor = {
            let mut state = self.state.borrow_mut();
            state.current = branch.to_string();
            state.branch_descriptors.get(branch).cloned()
        };
        if let Some(contents) = descriptor {
            self.write_descriptor(contents.as_deref());
            self.state.borrow_mut().committed_descriptor = contents;
        }
    }

    /// Stage the descriptor file if it differs from HEAD, unstage it if not
    fn stage_descriptor(&self) {
        let contents = self.descriptor();
        let name = self.descriptor_file.clone();
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let status = &mut state.status;
        for files in [
            &mut status.created,
            &mut status.deleted,
            &mut status.modified,
            &mut status.staged,
        ] {
            files.retain(|file| *file != name);
        }

        let files = match (&state.committed_descriptor, &contents) {
            (None, Some(_)) => &mut status.created,
            (Some(_), None) => &mut status.deleted,
            (Some(old), Some(new)) if old != new => &mut status.modified,
            _ => return,
        };
        files.push(name.clone());
        status.staged.push(name);
    }

    /// Record a commit of the index; the working tree keeps unstaged files
    fn record_commit(&self, message: Option<&str>) {
        let contents = self.descriptor();
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let snapshot = Snapshot {
            status: state.status.clone(),
            last_message: state.last_message.clone(),
            committed_descriptor: state.committed_descriptor.clone(),
        };
        state.history.push(snapshot);

        let staged = std::mem::take(&mut state.status.staged);
        let status = &mut state.status;
        for files in [
            &mut status.created,
            &mut status.deleted,
            &mut status.modified,
            &mut status.renamed,
        ] {
            files.retain(|file| !staged.contains(file));
        }
        state.committed_descriptor = contents;
        if let Some(message) = message {
            state.commits += 1;
            state.last_message = message.to_string();
        }
        let current = state.current.clone();
        state.in_sync.remove(&current);
    }

    /// Go back to the state before the last commit
    ///
    /// With `keep_index` the changes stay staged, otherwise they are only
    /// in the working tree.
    fn restore_commit(&self, keep_index: bool) {
        let mut state = self.state.borrow_mut();
        let Some(snapshot) = state.history.pop() else {
            return;
        };
        state.status = snapshot.status;
        if !keep_index {
            state.status.staged.clear();
        }
        state.last_message = snapshot.last_message;
        state.committed_descriptor = snapshot.committed_descriptor;
    }
}

impl Default for FakeGit {
    fn default() -> Self {
        Self::new()
    }
}

fn descriptor_json(branch: &str) -> String {
    format!(r#"{{"branch":"{}"}}"#, branch)
}

impl VersionControl for FakeGit {
    fn is_repository(&self) -> bool {
        self.state.borrow().is_repo
    }

    fn repository_root(&self) -> Result<PathBuf> {
        Ok(self.root.path().to_path_buf())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.current())
    }

    fn default_branch(&self) -> Result<String> {
        Ok(self.state.borrow().default_branch.clone())
    }

    fn branch_exists_locally(&self, name: &str) -> Result<bool> {
        Ok(self.has_local(name))
    }

    fn branch_exists_remotely(&self, name: &str) -> Result<bool> {
        Ok(self.has_remote(name))
    }

    fn remote_branches(&self) -> Result<Vec<String>> {
        Ok(self.state.borrow().remote.iter().cloned().collect())
    }

    fn is_in_sync_with_remote(&self, name: &str) -> Result<bool> {
        let state = self.state.borrow();
        Ok(state.local.contains(name) && state.remote.contains(name) && state.in_sync.contains(name))
    }

    fn refresh_remote_branches(&self) -> Result<()> {
        self.call("fetch", "--prune")
    }

    fn checkout(&self, name: &str) -> Result<()> {
        self.call("checkout", name)?;
        let from_remote = {
            let state = self.state.borrow();
            !state.local.contains(name) && state.remote.contains(name)
        };
        {
            let mut state = self.state.borrow_mut();
            if from_remote {
                state.local.insert(name.to_string());
                state.in_sync.insert(name.to_string());
            } else if !state.local.contains(name) {
                return Err(Error::Git(format!(
                    "error: pathspec '{}' did not match any file(s) known to git",
                    name
                )));
            }
        }
        self.switch_to(name);
        Ok(())
    }

    fn checkout_new(&self, name: &str) -> Result<()> {
        self.call("checkout -b", name)?;
        {
            let mut state = self.state.borrow_mut();
            if !state.local.insert(name.to_string()) {
                return Err(Error::Git(format!("fatal: a branch named '{}' already exists", name)));
            }
            state.current = name.to_string();
        }
        Ok(())
    }

    fn delete_local_branch(&self, name: &str) -> Result<()> {
        self.call("branch -D", name)?;
        let mut state = self.state.borrow_mut();
        if state.current == name {
            return Err(Error::Git(format!(
                "error: Cannot delete branch '{}' checked out",
                name
            )));
        }
        state.local.remove(name);
        state.in_sync.remove(name);
        Ok(())
    }

    fn rename_current_branch(&self, new_name: &str) -> Result<()> {
        self.call("branch -m", new_name)?;
        let mut state = self.state.borrow_mut();
        let old = std::mem::replace(&mut state.current, new_name.to_string());
        state.local.remove(&old);
        state.in_sync.remove(&old);
        state.local.insert(new_name.to_string());
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        self.call("add", "-A")?;
        {
            let mut state = self.state.borrow_mut();
            let untracked = std::mem::take(&mut state.status.untracked);
            state.status.created.extend(untracked);
            let status = &mut state.status;
            let changed: Vec<String> = [
                &status.created,
                &status.deleted,
                &status.modified,
                &status.renamed,
            ]
            .into_iter()
            .flatten()
            .filter(|file| !status.staged.contains(file))
            .cloned()
            .collect();
            status.staged.extend(changed);
        }
        self.stage_descriptor();
        Ok(())
    }

    fn stage_file(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.call("add", &name)?;
        if name == self.descriptor_file {
            self.stage_descriptor();
        } else {
            self.state.borrow_mut().status.staged.push(name);
        }
        Ok(())
    }

    fn commit(&self, message: &str, options: CommitOptions) -> Result<()> {
        if options.allow_empty {
            self.call("commit", &format!("--allow-empty {}", message))?;
        } else {
            self.call("commit", message)?;
            if self.state.borrow().status.staged.is_empty() {
                return Err(Error::Git(
                    "nothing to commit, working tree clean".to_string(),
                ));
            }
        }
        self.record_commit(Some(message));
        Ok(())
    }

    fn amend_last_commit(&self) -> Result<()> {
        self.call("commit --amend", "")?;
        self.record_commit(None);
        Ok(())
    }

    fn last_commit_message(&self) -> Result<String> {
        Ok(self.last_message())
    }

    fn undo_last_commit(&self) -> Result<()> {
        self.call("reset", "HEAD~")?;
        self.restore_commit(false);
        let mut state = self.state.borrow_mut();
        state.commits = state.commits.saturating_sub(1);
        Ok(())
    }

    fn undo_amend(&self) -> Result<()> {
        self.call("reset", "--soft HEAD@{1}")?;
        self.restore_commit(true);
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str, options: PushOptions) -> Result<()> {
        let operation = if options.force { "push --force" } else { "push" };
        self.call(operation, &format!("{} {}", remote, branch))?;
        let mut state = self.state.borrow_mut();
        state.remote.insert(branch.to_string());
        state.in_sync.insert(branch.to_string());
        Ok(())
    }

    fn pull_rebase(&self, branch: &str) -> Result<()> {
        self.call("pull", &format!("--rebase {}", branch))
    }

    fn abort_rebase(&self) -> Result<()> {
        self.call("rebase --abort", "")?;
        self.state.borrow_mut().status.conflicted.clear();
        Ok(())
    }

    fn status(&self) -> Result<RepoStatus> {
        Ok(self.state.borrow().status.clone())
    }
}

/// One scripted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Confirm(bool),
    Input(String),
    Choose(usize),
}

impl Answer {
    pub fn input(text: &str) -> Self {
        Answer::Input(text.to_string())
    }
}

/// Prompt that replays queued answers and remembers what was asked
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<String>>,
    shown_options: RefCell<Vec<Vec<String>>>,
}

impl ScriptedPrompt {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: RefCell::new(answers.into()),
            asked: RefCell::new(Vec::new()),
            shown_options: RefCell::new(Vec::new()),
        }
    }

    /// Questions asked so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    /// Option lists passed to `choose`
    pub fn shown_options(&self) -> Vec<Vec<String>> {
        self.shown_options.borrow().clone()
    }

    /// Answers nobody asked for
    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self, question: &str) -> Answer {
        self.asked.borrow_mut().push(question.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted answer for {:?}", question))
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, question: &str) -> Result<bool> {
        match self.next(question) {
            Answer::Confirm(answer) => Ok(answer),
            other => panic!("expected confirm answer for {:?}, got {:?}", question, other),
        }
    }

    fn input(&self, question: &str, default: Option<&str>) -> Result<String> {
        match self.next(question) {
            Answer::Input(answer) => crate::prompt::parse_input(&answer, default)
                .ok_or_else(|| Error::Prompt(format!("blank answer for {:?}", question))),
            other => panic!("expected input answer for {:?}, got {:?}", question, other),
        }
    }

    fn choose(&self, question: &str, options: &[String]) -> Result<usize> {
        self.shown_options.borrow_mut().push(options.to_vec());
        match self.next(question) {
            Answer::Choose(index) if index < options.len() => Ok(index),
            other => panic!("invalid choice for {:?}: {:?}", question, other),
        }
    }
}
