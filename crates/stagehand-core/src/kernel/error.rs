//! # Stagehand Kernel Errors
//!
//! Two layers of failure exist during a run:
//!
//! - [`RunError`]: anything that goes wrong between `BeforeExtensions` and
//!   `OnStop`. The kernel never returns these; it dispatches them as an
//!   `ErrorEvent` and the run still succeeds.
//! - [`Error`]: what `run` and the other kernel operations return. During a
//!   run the only way to get one is a failure of the `OnError` stage itself
//!   ([`Error::ErrorStage`]).
use std::error::Error as StdError;
use std::result::Result as StdResult;
use std::sync::Arc;

use crate::config::error::ConfigError;
use crate::container::ContainerError;
use crate::event::EventKind;
use crate::event::error::EventSystemError;
use crate::kernel::constants;
use thiserror::Error as ThisError;

/// Boxed error returned by extension, application and listener behaviors
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Represents a specific stage of a kernel run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum LifecycleStage {
    #[error("BeforeExtensions")]
    BeforeExtensions,
    /// Folding the application's extensions into the registry. It has no
    /// event and cannot fail, so no [`RunError`] ever reports it.
    #[error("MergeExtensions")]
    MergeExtensions,
    #[error("BeforeExtension")]
    BeforeExtension,
    #[error("Extend")]
    Extend,
    #[error("AfterExtension")]
    AfterExtension,
    #[error("AfterExtensions")]
    AfterExtensions,
    #[error("BeforeRun")]
    BeforeRun,
    #[error("Run")]
    Run,
    #[error("AfterRun")]
    AfterRun,
    #[error("OnStop")]
    OnStop,
    #[error("OnError")]
    OnError,
}

impl LifecycleStage {
    /// Stages of a successful run, in execution order. The per-extension
    /// stages repeat once for each registered extension.
    pub const SEQUENCE: [LifecycleStage; 10] = [
        LifecycleStage::BeforeExtensions,
        LifecycleStage::MergeExtensions,
        LifecycleStage::BeforeExtension,
        LifecycleStage::Extend,
        LifecycleStage::AfterExtension,
        LifecycleStage::AfterExtensions,
        LifecycleStage::BeforeRun,
        LifecycleStage::Run,
        LifecycleStage::AfterRun,
        LifecycleStage::OnStop,
    ];

    /// The event dispatched for this stage, if it dispatches one.
    pub fn event_kind(&self) -> Option<EventKind> {
        match self {
            LifecycleStage::BeforeExtensions => Some(constants::BEFORE_EXTENSIONS),
            LifecycleStage::BeforeExtension => Some(constants::BEFORE_EXTENSION),
            LifecycleStage::AfterExtension => Some(constants::AFTER_EXTENSION),
            LifecycleStage::AfterExtensions => Some(constants::AFTER_EXTENSIONS),
            LifecycleStage::BeforeRun => Some(constants::BEFORE_RUN),
            LifecycleStage::AfterRun => Some(constants::AFTER_RUN),
            LifecycleStage::OnStop => Some(constants::ON_STOP),
            LifecycleStage::OnError => Some(constants::ON_ERROR),
            LifecycleStage::MergeExtensions | LifecycleStage::Extend | LifecycleStage::Run => None,
        }
    }

    /// Whether a [`RunError`] can report this stage.
    pub fn can_fail(&self) -> bool {
        !matches!(self, LifecycleStage::MergeExtensions)
    }

    /// Whether the kernel waits for this stage's dispatch to complete.
    pub fn is_blocking(&self) -> bool {
        !matches!(
            self,
            LifecycleStage::AfterExtension | LifecycleStage::AfterExtensions | LifecycleStage::AfterRun
        )
    }
}

/// A failure inside a run, converted into an `OnError` event.
#[derive(Debug, ThisError)]
pub enum RunError {
    #[error("Dispatch failed during {stage}: {source}")]
    Dispatch {
        stage: LifecycleStage,
        #[source]
        source: EventSystemError,
    },

    #[error("Extension '{extension}' failed: {source}")]
    Extension {
        extension: String,
        #[source]
        source: BoxError,
    },

    #[error("Application '{application}' failed: {source}")]
    Application {
        application: String,
        #[source]
        source: BoxError,
    },
}

impl RunError {
    pub(crate) fn dispatch(stage: LifecycleStage) -> impl FnOnce(EventSystemError) -> RunError {
        move |source| RunError::Dispatch { stage, source }
    }

    /// The stage the run was in when it failed.
    pub fn stage(&self) -> LifecycleStage {
        match self {
            RunError::Dispatch { stage, .. } => *stage,
            RunError::Extension { .. } => LifecycleStage::Extend,
            RunError::Application { .. } => LifecycleStage::Run,
        }
    }

    /// The original error raised by the behavior or dispatcher.
    pub fn cause(&self) -> &(dyn StdError + 'static) {
        match self {
            RunError::Dispatch { source, .. } => source,
            RunError::Extension { source, .. } => source.as_ref(),
            RunError::Application { source, .. } => source.as_ref(),
        }
    }
}

/// Kernel error type
#[derive(Debug, ThisError)]
pub enum Error {
    /// Dispatching `OnError` for a run failure itself failed.
    #[error("OnError dispatch failed while handling '{failure}': {source}")]
    ErrorStage {
        failure: Arc<RunError>,
        #[source]
        source: EventSystemError,
    },

    #[error("Event system error: {0}")]
    EventSystem(#[from] EventSystemError),

    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
