use std::path::MAIN_SEPARATOR;

/// Maps filesystem-relative paths to object keys.
///
/// The separator to translate is injected rather than read from the host, so
/// Windows-style paths can be normalized (and tested) on any platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNormalizer {
    separator: char,
}

impl KeyNormalizer {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    /// Normalizer for the host's native path separator
    pub fn native() -> Self {
        Self::new(MAIN_SEPARATOR)
    }

    /// Translate native separators in a relative path to `/`
    pub fn to_key_path(&self, relative_path: &str) -> String {
        if self.separator == '/' {
            relative_path.to_string()
        } else {
            relative_path.replace(self.separator, "/")
        }
    }

    /// Join `prefix` and `relative_path` into the remote key.
    ///
    /// Exactly one `/` separates the two parts; case and inner segments are
    /// left untouched. An empty prefix yields the relative key itself.
    pub fn normalize(&self, prefix: &str, relative_path: &str) -> String {
        let prefix = self.to_key_path(prefix);
        let relative = self.to_key_path(relative_path);
        let prefix = prefix.trim_end_matches('/');
        let relative = relative.trim_start_matches('/');

        if prefix.is_empty() {
            relative.to_string()
        } else {
            format!("{prefix}/{relative}")
        }
    }

    /// Prefix used for listing: the configured prefix as a directory, so
    /// sibling prefixes such as `site2/` never match `site`.
    pub fn list_prefix(&self, prefix: &str) -> String {
        let prefix = self.to_key_path(prefix);
        let prefix = prefix.trim_end_matches('/');

        if prefix.is_empty() {
            String::new()
        } else {
            format!("{prefix}/")
        }
    }
}

impl Default for KeyNormalizer {
    fn default() -> Self {
        Self::native()
    }
}
