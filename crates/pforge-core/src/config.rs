//! Toolchain configuration.
//!
//! Locates the four external tools and the runtime files they share.
//! Built once at startup and handed to the orchestrator; stage logic
//! never consults the environment on its own.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming the toolchain root.
pub const ROOT_ENV: &str = "PFORGE_ROOT";

/// Environment variable overriding the native build tool.
pub const NATIVE_BUILD_ENV: &str = "PFORGE_NATIVE_BUILD";

/// Default native build tool, looked up on PATH.
pub const DEFAULT_NATIVE_BUILD: &str = "MSBuild.exe";

/// Locations of every tool and shared file the pipeline needs.
///
/// The default layout under a toolchain root:
///
/// ```text
/// <root>/
/// ├── Compiler/
/// │   ├── PCompiler      # domain compiler (also its data directory)
/// │   ├── zc             # model-checker compiler
/// │   └── PrtGen         # native project generator
/// └── Runtime/
///     ├── SMRuntime.zing # model-checker runtime support file
///     └── ...            # C runtime headers and libraries
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainConfig {
    /// Toolchain root directory.
    pub root: PathBuf,

    /// Domain compiler executable.
    pub domain_compiler: PathBuf,

    /// Model-checker compiler executable.
    pub model_checker: PathBuf,

    /// Native project generator executable.
    pub project_generator: PathBuf,

    /// Native build tool executable.
    pub native_build: PathBuf,

    /// Data directory passed to the domain compiler.
    pub data_dir: PathBuf,

    /// Runtime support file copied next to the model-checker input.
    pub runtime_support_file: PathBuf,

    /// Include directory for the generated native project.
    pub include_dir: PathBuf,

    /// Library directory for the generated native project.
    pub lib_dir: PathBuf,

    /// Ask the project generator to also emit its test harness.
    pub generator_test_harness: bool,
}

impl ToolchainConfig {
    /// Derive the default layout from a toolchain root.
    ///
    /// Performs no I/O; the native build tool is left as the bare default name.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let compiler_dir = root.join("Compiler");
        let runtime_dir = root.join("Runtime");

        Self {
            domain_compiler: compiler_dir.join("PCompiler"),
            model_checker: compiler_dir.join("zc"),
            project_generator: compiler_dir.join("PrtGen"),
            native_build: PathBuf::from(DEFAULT_NATIVE_BUILD),
            data_dir: compiler_dir,
            runtime_support_file: runtime_dir.join("SMRuntime.zing"),
            include_dir: runtime_dir.clone(),
            lib_dir: runtime_dir,
            generator_test_harness: false,
            root,
        }
    }

    /// Resolve the toolchain from an explicit root, the environment, or
    /// the location of the running executable, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Toolchain`] if no root can be determined.
    pub fn discover(explicit_root: Option<&Path>) -> Result<Self> {
        let env_root = std::env::var_os(ROOT_ENV).map(PathBuf::from);
        let exe_root = std::env::current_exe()
            .ok()
            .and_then(|exe| Self::root_near_executable(&exe));

        let root = Self::select_root(explicit_root, env_root, exe_root)?;
        tracing::debug!("Using toolchain root {}", root.display());

        let native_build = match std::env::var_os(NATIVE_BUILD_ENV) {
            Some(tool) => PathBuf::from(tool),
            None => Self::find_native_build(),
        };

        Ok(Self::from_root(root).with_native_build(native_build))
    }

    /// Override the native build tool.
    pub fn with_native_build(mut self, tool: impl Into<PathBuf>) -> Self {
        self.native_build = tool.into();
        self
    }

    /// Override the project generator.
    pub fn with_project_generator(mut self, tool: impl Into<PathBuf>) -> Self {
        self.project_generator = tool.into();
        self
    }

    /// Pick the first available root candidate.
    fn select_root(
        explicit_root: Option<&Path>,
        env_root: Option<PathBuf>,
        exe_root: Option<PathBuf>,
    ) -> Result<PathBuf> {
        explicit_root
            .map(Path::to_path_buf)
            .or(env_root)
            .or(exe_root)
            .ok_or_else(|| {
                Error::Toolchain(format!(
                    "toolchain root not found (use --toolchain-root or set {ROOT_ENV})"
                ))
            })
    }

    /// Treat the executable's grandparent as the root when it holds a
    /// `Compiler/` directory, e.g. `<root>/Scripts/pforge`.
    fn root_near_executable(exe: &Path) -> Option<PathBuf> {
        let root = exe.parent()?.parent()?;
        root.join("Compiler").is_dir().then(|| root.to_path_buf())
    }

    /// Find the native build tool in PATH, falling back to the bare name.
    ///
    /// A missing tool is reported when the stage tries to start it.
    fn find_native_build() -> PathBuf {
        which::which(DEFAULT_NATIVE_BUILD).unwrap_or_else(|_| PathBuf::from(DEFAULT_NATIVE_BUILD))
    }
}
