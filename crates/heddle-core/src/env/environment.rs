//! TaskEnvironment: one invocation's private view of "process state".

use std::collections::HashMap;
use std::sync::Arc;

use crate::path::AbsolutePath;

use super::process::ProcessStartInfo;

/// Per-invocation environment facade.
///
/// Each concurrently executing task owns exactly one instance: never
/// shared, never pooled, never reused across invocations. Nothing here
/// aliases another invocation's state or the real process state, which is
/// why no cross-task ordering constraint is needed for correctness.
///
/// Not internally synchronized: a task that spawns its own threads must
/// add its own locking. (The `&mut` receivers already force that at
/// compile time for safe Rust callers.)
#[derive(Debug)]
pub struct TaskEnvironment {
    current_directory: AbsolutePath,

    /// Variables visible when the engine constructed this environment.
    /// Shared read-only across environments; never mutated after engine
    /// startup.
    base_vars: Arc<HashMap<String, String>>,

    /// Task-scoped writes; `None` marks a removal.
    overrides: HashMap<String, Option<String>>,
}

impl TaskEnvironment {
    pub fn new(current_directory: AbsolutePath, base_vars: Arc<HashMap<String, String>>) -> Self {
        Self {
            current_directory,
            base_vars,
            overrides: HashMap::new(),
        }
    }

    /// Engine-side convenience: snapshot the real process environment once,
    /// at construction time. Tasks never read it again through this type.
    pub fn from_process_env(current_directory: AbsolutePath) -> Self {
        Self::new(current_directory, Arc::new(std::env::vars().collect()))
    }

    /// The logical working directory of this invocation, independent of the
    /// real OS-level process working directory.
    pub fn current_directory(&self) -> &AbsolutePath {
        &self.current_directory
    }

    /// Resolve an externally-supplied path against the logical directory.
    ///
    /// Empty input means "no path" and yields the empty value instead of
    /// failing (some callers pass optional paths). Rooted input is wrapped
    /// as-is; relative input is combined with `current_directory`. Never
    /// consults the real process working directory.
    pub fn absolute_path(&self, path: &str) -> AbsolutePath {
        if path.is_empty() {
            return AbsolutePath::empty();
        }
        AbsolutePath::resolve_non_empty(path, &self.current_directory)
    }

    /// Read one variable from this task's effective view.
    ///
    /// Reflects the construction-time snapshot plus this instance's own
    /// writes, never live process state queried at call time.
    pub fn var(&self, name: &str) -> Option<&str> {
        match self.overrides.get(name) {
            Some(Some(value)) => Some(value.as_str()),
            Some(None) => None,
            None => self.base_vars.get(name).map(String::as_str),
        }
    }

    /// The full effective view: the snapshot overlaid with this task's
    /// writes.
    pub fn vars(&self) -> HashMap<String, String> {
        let mut all: HashMap<String, String> = (*self.base_vars).clone();
        for (name, value) in &self.overrides {
            match value {
                Some(v) => {
                    all.insert(name.clone(), v.clone());
                }
                None => {
                    all.remove(name);
                }
            }
        }
        all
    }

    /// Write (or with `None`, remove) a variable in this task's view.
    ///
    /// Recorded in the per-instance mapping only; the real process
    /// environment block is never touched, so the change can never become
    /// visible to another invocation.
    pub fn set_var(&mut self, name: impl Into<String>, value: Option<&str>) {
        self.overrides.insert(name.into(), value.map(str::to_owned));
    }

    /// Launch configuration for a child process that must see this task's
    /// directory and variables, and nothing of any sibling task's.
    pub fn process_start_info(&self, program: impl Into<String>) -> ProcessStartInfo {
        ProcessStartInfo::new(program, self.current_directory.clone(), self.vars())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathPlatform;

    fn dir(value: &str) -> AbsolutePath {
        AbsolutePath::new_for_platform(value, PathPlatform::Posix).unwrap()
    }

    fn base(pairs: &[(&str, &str)]) -> Arc<HashMap<String, String>> {
        Arc::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn resolves_relative_paths_against_the_logical_directory() {
        let env = TaskEnvironment::new(dir("/work/proj"), base(&[]));

        assert_eq!(env.absolute_path("out/a.dll").value(), "/work/proj/out/a.dll");
        assert_eq!(env.absolute_path("/abs/a.dll").value(), "/abs/a.dll");
        assert!(env.absolute_path("").is_empty());
    }

    #[test]
    fn reads_come_from_the_snapshot_not_live_process_state() {
        let env = TaskEnvironment::new(dir("/work"), base(&[("CONFIG", "Debug")]));

        assert_eq!(env.var("CONFIG"), Some("Debug"));
        assert_eq!(env.var("MISSING"), None);
    }

    #[test]
    fn writes_overlay_the_snapshot() {
        let mut env = TaskEnvironment::new(dir("/work"), base(&[("CONFIG", "Debug")]));

        env.set_var("CONFIG", Some("Release"));
        env.set_var("EXTRA", Some("1"));

        assert_eq!(env.var("CONFIG"), Some("Release"));
        assert_eq!(env.var("EXTRA"), Some("1"));

        let all = env.vars();
        assert_eq!(all.get("CONFIG").map(String::as_str), Some("Release"));
        assert_eq!(all.get("EXTRA").map(String::as_str), Some("1"));
    }

    #[test]
    fn none_removes_from_the_effective_view() {
        let mut env = TaskEnvironment::new(dir("/work"), base(&[("CONFIG", "Debug")]));

        env.set_var("CONFIG", None);

        assert_eq!(env.var("CONFIG"), None);
        assert!(!env.vars().contains_key("CONFIG"));
    }

    #[test]
    fn writes_never_touch_the_real_process_environment() {
        let name = "HEDDLE_ENV_ISOLATION_PROBE";
        assert!(std::env::var(name).is_err());

        let mut env = TaskEnvironment::new(dir("/work"), base(&[]));
        env.set_var(name, Some("leaked?"));

        assert_eq!(env.var(name), Some("leaked?"));
        assert!(std::env::var(name).is_err());
    }

    #[test]
    fn sibling_environments_do_not_observe_each_other() {
        let shared = base(&[("SHARED", "yes")]);
        let mut a = TaskEnvironment::new(dir("/work/a"), Arc::clone(&shared));
        let b = TaskEnvironment::new(dir("/work/b"), shared);

        a.set_var("X", Some("1"));

        assert_eq!(a.var("X"), Some("1"));
        assert_eq!(b.var("X"), None);
        // The shared snapshot itself is untouched.
        assert_eq!(b.var("SHARED"), Some("yes"));
    }

    #[test]
    fn start_info_carries_directory_and_effective_block() {
        let mut env = TaskEnvironment::new(dir("/work/proj"), base(&[("A", "1"), ("B", "2")]));
        env.set_var("B", None);
        env.set_var("C", Some("3"));

        let info = env.process_start_info("cc").arg("-o").arg("out/a.o");

        assert_eq!(info.working_directory().value(), "/work/proj");
        assert_eq!(info.env().get("A").map(String::as_str), Some("1"));
        assert!(!info.env().contains_key("B"));
        assert_eq!(info.env().get("C").map(String::as_str), Some("3"));
        assert_eq!(info.arg_list(), ["-o", "out/a.o"]);
    }

    #[test]
    fn from_process_env_snapshots_once() {
        // SAFETY 相当の注意: set_var(std) はテストプロセス全体に影響するので
        // 専用のキー名を使う。
        let name = "HEDDLE_SNAPSHOT_PROBE";
        unsafe { std::env::set_var(name, "before") };

        let env = TaskEnvironment::from_process_env(dir("/work"));
        unsafe { std::env::set_var(name, "after") };

        // 構築時のスナップショットを読む（その後の変更は見えない）
        assert_eq!(env.var(name), Some("before"));

        unsafe { std::env::remove_var(name) };
    }
}
