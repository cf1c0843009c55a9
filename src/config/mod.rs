//! Generator configuration.
//!
//! [`GenConfig`] gathers everything that stays fixed for one generation run:
//! toolchain locations, the compile and link [`FlagSet`]s, and the project
//! layout. The defaults reproduce the stock `mwcceppc`/`mwldeppc`/`dtk`
//! setup, and an optional `dolgen.toml` overrides any subset of keys.
//!
//! The configuration is passed explicitly into graph construction; there is
//! no process-wide state, so several configurations can be used side by side.
//!
//! ```
//! use dolgen::config::GenConfig;
//!
//! let config = GenConfig::from_toml_str("out_dir = \"dist\"", "inline").expect("parse");
//! assert_eq!(config.link_target(), "dist/main.elf");
//! assert_eq!(config.build_dir, "build");
//! ```

mod error;

pub use error::ConfigError;

use std::collections::HashSet;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::flags::FlagSet;

/// File name looked up in the project directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "dolgen.toml";

/// Locations of the external toolchain programs.
///
/// Values are written into manifest variables as-is, so they may refer to
/// other Ninja variables such as `$builddir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainPaths {
    /// Compiler executable.
    pub compiler: String,
    /// Linker executable.
    pub linker: String,
    /// Image converter executable.
    pub converter: String,
    /// Sub-command passed to the converter before its input and output.
    pub converter_subcommand: String,
}

impl Default for ToolchainPaths {
    fn default() -> Self {
        Self {
            compiler: "$builddir/compiler/mwcceppc.exe".to_owned(),
            linker: "$builddir/compiler/mwldeppc.exe".to_owned(),
            converter: "$builddir/dtk.exe".to_owned(),
            converter_subcommand: "elf2dol".to_owned(),
        }
    }
}

/// Compile and link flag sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageFlags {
    /// Flags passed to every compile step.
    pub cflags: FlagSet,
    /// Flags passed to the link step.
    pub ldflags: FlagSet,
}

impl Default for StageFlags {
    fn default() -> Self {
        Self {
            cflags: [
                "-nodefaults",
                "-nosyspath",
                "-proc gekko",
                "-align powerpc",
                "-enum int",
                "-enc SJIS",
                "-fp hardware",
                "-Cpp_exceptions off",
                "-pragma \"cats off\"",
                "-ipa file",
                "-opt all",
                "-inline auto",
                "-i include",
            ]
            .into_iter()
            .collect(),
            ldflags: [
                "-fp hard",
                "-nodefaults",
                "-mapunused",
                "-listclosure",
                "-lcf $builddir/ldscript.lcf",
            ]
            .into_iter()
            .collect(),
        }
    }
}

/// Complete, immutable description of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    /// Value emitted as `ninja_required_version`.
    pub ninja_required_version: String,
    /// Directory receiving object files; exported as `$builddir`.
    pub build_dir: Utf8PathBuf,
    /// Directory receiving the linked and converted images; exported as `$outdir`.
    pub out_dir: Utf8PathBuf,
    /// Directory scanned recursively for sources, relative to the project.
    pub source_root: Utf8PathBuf,
    /// Recognised source extensions, highest priority first, without dots.
    pub source_extensions: Vec<String>,
    /// File name of the linked executable inside `out_dir`.
    pub link_output: String,
    /// File name of the converted image inside `out_dir`.
    pub image_output: String,
    /// External program locations.
    pub toolchain: ToolchainPaths,
    /// Stage flag sets.
    pub flags: StageFlags,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            ninja_required_version: "1.3".to_owned(),
            build_dir: Utf8PathBuf::from("build"),
            out_dir: Utf8PathBuf::from("out"),
            source_root: Utf8PathBuf::from("src"),
            source_extensions: vec!["c".to_owned(), "cpp".to_owned()],
            link_output: "main.elf".to_owned(),
            image_output: "main.dol".to_owned(),
            toolchain: ToolchainPaths::default(),
            flags: StageFlags::default(),
        }
    }
}

impl GenConfig {
    /// Parse and validate configuration text.
    ///
    /// `origin` names the source of the text in error messages. Leading dots
    /// on extensions are stripped, so `".c"` and `"c"` are equivalent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] when the layout fails validation.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            origin: origin.to_owned(),
            source: Box::new(source),
        })?;
        for ext in &mut config.source_extensions {
            *ext = ext.trim_start_matches('.').to_owned();
        }
        config.validate()?;
        Ok(config)
    }

    /// Read and validate the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when the file is absent,
    /// [`ConfigError::Read`] when it cannot be read, and the errors of
    /// [`GenConfig::from_toml_str`] otherwise.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.as_std_path().exists() {
            return Err(ConfigError::NotFound {
                path: path.to_owned(),
            });
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text, path.as_str())
    }

    /// Resolve the configuration for a project directory.
    ///
    /// An explicit path wins; otherwise `dir/dolgen.toml` is used when it
    /// exists, and the defaults apply when it does not.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`GenConfig::from_path`].
    pub fn discover(dir: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!(config = %path, "loading explicit configuration");
            return Self::from_path(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.as_std_path().is_file() {
            debug!(config = %candidate, "loading project configuration");
            Self::from_path(&candidate)
        } else {
            debug!(dir = %dir, "no {CONFIG_FILE_NAME} found; using defaults");
            Ok(Self::default())
        }
    }

    /// Path of the linked executable, e.g. `out/main.elf`.
    #[must_use]
    pub fn link_target(&self) -> Utf8PathBuf {
        join_slash(&self.out_dir, &self.link_output)
    }

    /// Path of the converted image, e.g. `out/main.dol`.
    #[must_use]
    pub fn image_target(&self) -> Utf8PathBuf {
        join_slash(&self.out_dir, &self.image_output)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::Invalid { reason });

        for (key, value) in [
            ("build_dir", self.build_dir.as_str()),
            ("out_dir", self.out_dir.as_str()),
            ("source_root", self.source_root.as_str()),
            ("link_output", self.link_output.as_str()),
            ("image_output", self.image_output.as_str()),
        ] {
            if value.trim().is_empty() {
                return invalid(format!("`{key}` must not be empty"));
            }
        }
        if self.link_output == self.image_output {
            return invalid(format!(
                "`link_output` and `image_output` are both `{}`",
                self.link_output
            ));
        }
        if self.source_extensions.is_empty() {
            return invalid("`source_extensions` must list at least one extension".to_owned());
        }
        let mut seen = HashSet::new();
        for ext in &self.source_extensions {
            if ext.is_empty() || ext.contains(['/', '\\', '*', '?', '[', ']']) {
                return invalid(format!("`{ext}` is not a usable source extension"));
            }
            if ext == "o" {
                return invalid("`o` is reserved for object files".to_owned());
            }
            if !seen.insert(ext.as_str()) {
                return invalid(format!("source extension `{ext}` is listed twice"));
            }
        }
        Ok(())
    }
}

/// Join two path fragments with `/`, independent of the host separator.
pub(crate) fn join_slash(base: &Utf8Path, rest: &str) -> Utf8PathBuf {
    let base = base.as_str().replace('\\', "/");
    let base = base.trim_end_matches('/');
    if base.is_empty() || base == "." {
        Utf8PathBuf::from(rest)
    } else {
        Utf8PathBuf::from(format!("{base}/{rest}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result, ensure};
    use rstest::rstest;

    #[test]
    fn defaults_match_stock_toolchain_layout() {
        let config = GenConfig::default();
        assert_eq!(config.ninja_required_version, "1.3");
        assert_eq!(config.source_extensions, ["c", "cpp"]);
        assert_eq!(config.link_target(), "out/main.elf");
        assert_eq!(config.image_target(), "out/main.dol");
        assert_eq!(config.flags.cflags.tokens().len(), 13);
        assert_eq!(
            config.flags.ldflags.render(),
            "-fp hard -nodefaults -mapunused -listclosure -lcf $builddir/ldscript.lcf"
        );
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() -> Result<()> {
        let text = concat!(
            "source_extensions = [\".cpp\", \"c\"]\n",
            "[toolchain]\n",
            "converter = \"tools/dtk\"\n",
        );
        let config = GenConfig::from_toml_str(text, "test")?;
        ensure!(config.source_extensions == ["cpp", "c"], "leading dots stripped");
        ensure!(config.toolchain.converter == "tools/dtk", "converter overridden");
        ensure!(
            config.toolchain.compiler == ToolchainPaths::default().compiler,
            "compiler keeps default"
        );
        ensure!(config.flags == StageFlags::default(), "flags keep defaults");
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = GenConfig::from_toml_str("bulid_dir = \"x\"", "typo.toml")
            .expect_err("unknown key should fail");
        assert!(matches!(err, ConfigError::Parse { ref origin, .. } if origin == "typo.toml"));
    }

    #[rstest]
    #[case("source_extensions = []")]
    #[case("source_extensions = [\"c\", \".c\"]")]
    #[case("source_extensions = [\"*\"]")]
    #[case("source_extensions = [\"o\"]")]
    #[case("image_output = \"main.elf\"")]
    #[case("build_dir = \"\"")]
    fn invalid_layouts_are_rejected(#[case] text: &str) {
        let err = GenConfig::from_toml_str(text, "case").expect_err("validation should fail");
        assert!(matches!(err, ConfigError::Invalid { .. }), "unexpected {err:?}");
    }

    #[test]
    fn discover_prefers_project_file_then_defaults() -> Result<()> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        let dir = Utf8Path::from_path(temp.path()).context("utf-8 temp dir")?;

        let defaults = GenConfig::discover(dir, None)?;
        ensure!(defaults == GenConfig::default(), "no file means defaults");

        fs::write(dir.join(CONFIG_FILE_NAME), "build_dir = \"obj\"\n").context("write config")?;
        let loaded = GenConfig::discover(dir, None)?;
        ensure!(loaded.build_dir == "obj", "project file should be honoured");
        Ok(())
    }

    #[test]
    fn explicit_missing_file_is_an_error() -> Result<()> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        let dir = Utf8Path::from_path(temp.path()).context("utf-8 temp dir")?;
        let missing = dir.join("absent.toml");
        let err = GenConfig::discover(dir, Some(&missing)).expect_err("missing file");
        ensure!(matches!(err, ConfigError::NotFound { .. }), "unexpected {err:?}");
        Ok(())
    }

    #[rstest]
    #[case("build", "src/a.o", "build/src/a.o")]
    #[case("build/", "main.elf", "build/main.elf")]
    #[case("out\\win", "main.dol", "out/win/main.dol")]
    #[case(".", "main.elf", "main.elf")]
    fn join_slash_normalises_separators(
        #[case] base: &str,
        #[case] rest: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(join_slash(Utf8Path::new(base), rest), expected);
    }
}
