//! Artifact naming for a pipeline run.
//!
//! Every file a stage produces or consumes is named here, once, so all
//! stages agree on the layout of the output directory:
//!
//! ```text
//! <output>/
//! ├── output.zing        # domain compiler output, model-checker input
//! ├── SMRuntime.zing     # runtime support file (present only during model check)
//! ├── <unit>.dll         # model-checker library
//! ├── <unit>.vcxproj     # generated native project
//! └── Debug/
//!     └── <unit>.exe     # native binary
//! ```

use std::path::{Path, PathBuf};

use crate::pipeline::PipelineRequest;

/// File the domain compiler emits for the model checker.
pub const MODEL_SOURCE_FILE: &str = "output.zing";

/// Name of the runtime support file once copied into the output directory.
pub const SUPPORT_FILE: &str = "SMRuntime.zing";

const LIBRARY_EXTENSION: &str = "dll";
const PROJECT_EXTENSION: &str = "vcxproj";
const EXECUTABLE_EXTENSION: &str = "exe";
const BINARY_SUBDIR: &str = "Debug";

/// Paths of every artifact in one run. Computed once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    /// Where the domain compiler writes its output.
    pub domain_compiler_output_dir: PathBuf,

    /// Model-checker input generated by the domain compiler.
    pub model_checker_source_file: PathBuf,

    /// Runtime support file copied in for the model checker.
    pub model_checker_support_file: PathBuf,

    /// Library produced by the model checker.
    pub model_checker_output_library: PathBuf,

    /// Native project produced by the project generator.
    pub project_file: PathBuf,

    /// Executable produced by the native build.
    pub binary_path: PathBuf,
}

impl ArtifactSet {
    /// Compute the artifact paths for a request.
    ///
    /// Pure: depends only on the output directory and unit name.
    pub fn locate(request: &PipelineRequest) -> Self {
        Self::for_unit(request.output_dir(), request.unit_name())
    }

    fn for_unit(output_dir: &Path, unit: &str) -> Self {
        Self {
            domain_compiler_output_dir: output_dir.to_path_buf(),
            model_checker_source_file: output_dir.join(MODEL_SOURCE_FILE),
            model_checker_support_file: output_dir.join(SUPPORT_FILE),
            model_checker_output_library: output_dir.join(format!("{unit}.{LIBRARY_EXTENSION}")),
            project_file: output_dir.join(format!("{unit}.{PROJECT_EXTENSION}")),
            binary_path: output_dir
                .join(BINARY_SUBDIR)
                .join(format!("{unit}.{EXECUTABLE_EXTENSION}")),
        }
    }
}
