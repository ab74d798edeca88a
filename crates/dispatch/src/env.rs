// crates/dispatch/src/env.rs
use std::ffi::CString;

use crate::error::DispatchError;

/// The environment handed to one invocation of the command.
///
/// Entries are kept as the host delivered them, `KEY=VALUE`, in order, and
/// reach `execve` unmodified. The command's out-of-band completion channel
/// (for example `auth_control_file`) travels in here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Environment {
    entries: Vec<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap raw `KEY=VALUE` strings as received from the host.
    pub fn from_envp<I, S>(envp: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: envp.into_iter().map(Into::into).collect(),
        }
    }

    /// Snapshot of the current process environment. Entries that are not
    /// valid UTF-8 are skipped.
    pub fn from_current() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Set `key` to `value`, replacing an existing entry in place.
    pub fn insert(&mut self, key: &str, value: &str) {
        let entry = format!("{key}={value}");
        match self.position(key) {
            Some(idx) => self.entries[idx] = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key)
            .map(|idx| &self.entries[idx][key.len() + 1..])
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry
                .strip_prefix(key)
                .is_some_and(|rest| rest.starts_with('='))
        })
    }

    /// Build the `envp` array. Done before forking so the children never
    /// allocate.
    pub(crate) fn to_cstrings(&self) -> Result<Vec<CString>, DispatchError> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                CString::new(entry.as_bytes()).map_err(|_| DispatchError::Environment { index })
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Environment::new();
        for (k, v) in iter {
            env.insert(k.as_ref(), v.as_ref());
        }
        env
    }
}
