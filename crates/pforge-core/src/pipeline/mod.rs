//! Pipeline orchestration for the P toolchain.
//!
//! # Architecture
//!
//! ```text
//! PipelineRequest ──► ArtifactSet::locate
//!        │
//!        └──► PipelineOrchestrator ──► StageInvoker ──► PCompiler
//!                    │                       ├────────► zc         (--zc)
//!                    ├── MainMachinePattern  ├────────► PrtGen     (--proj)
//!                    │                       └────────► MSBuild    (--cc)
//!                    └── PipelineCallback (progress)
//! ```

mod callback;
mod orchestrator;
mod request;
mod support;

pub use callback::PipelineCallback;
pub use orchestrator::{PipelineOrchestrator, PipelineReport};
pub use request::{EnabledStages, PipelineRequest, Stage};
pub use support::SupportFileGuard;
