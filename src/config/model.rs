// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [exec]
/// max_parallel = 4
/// shell = "/bin/bash"
/// echo_output = true
///
/// [discover]
/// marker_file = "main.tf"
/// skip_dirs = [".terraform", ".git"]
///
/// [render]
/// relative_to = "tf"
/// ```
///
/// Every section and key is optional. Command-line flags win over values
/// given here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub exec: ExecSection,

    #[serde(default)]
    pub discover: DiscoverSection,

    #[serde(default)]
    pub render: RenderSection,
}

/// Validated configuration; build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub exec: ExecSection,
    pub discover: DiscoverSection,
    pub render: RenderSection,
}

impl ConfigFile {
    /// Internal constructor used after validation.
    pub(crate) fn new_unchecked(
        exec: ExecSection,
        discover: DiscoverSection,
        render: RenderSection,
    ) -> Self {
        Self {
            exec,
            discover,
            render,
        }
    }
}

/// `[exec]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecSection {
    /// Upper bound on concurrently running actions, if set.
    #[serde(default)]
    pub max_parallel: Option<usize>,

    /// Program used as `<shell> -c <command>`; platform shell when absent.
    #[serde(default)]
    pub shell: Option<String>,

    /// Print each stack's captured output when it finishes.
    #[serde(default = "default_echo_output")]
    pub echo_output: bool,
}

fn default_echo_output() -> bool {
    true
}

impl Default for ExecSection {
    fn default() -> Self {
        Self {
            max_parallel: None,
            shell: None,
            echo_output: default_echo_output(),
        }
    }
}

/// `[discover]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoverSection {
    #[serde(default = "default_marker_file")]
    pub marker_file: String,

    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,
}

fn default_marker_file() -> String {
    "main.tf".to_string()
}

fn default_skip_dirs() -> Vec<String> {
    vec![".terraform".to_string(), ".git".to_string()]
}

impl Default for DiscoverSection {
    fn default() -> Self {
        Self {
            marker_file: default_marker_file(),
            skip_dirs: default_skip_dirs(),
        }
    }
}

/// `[render]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderSection {
    /// Base directory for relative labels.
    #[serde(default)]
    pub relative_to: Option<String>,
}
