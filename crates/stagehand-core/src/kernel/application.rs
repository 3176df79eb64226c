//! The application: the single entry point a kernel runs after its
//! extensions.
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};

use crate::container::Container;
use crate::kernel::error::BoxError;
use crate::kernel::extension::Extension;

/// Object form of an application.
#[async_trait]
pub trait Run: Send + Sync {
    async fn run(&self, container: &Container) -> Result<(), BoxError>;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

type ApplicationFn = Box<dyn Fn(Container) -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// The two shapes an application can take
pub enum ApplicationBehavior {
    Runner(ApplicationFn),
    Instance(Box<dyn Run>),
}

impl fmt::Debug for ApplicationBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationBehavior::Runner(_) => f.write_str("Runner"),
            ApplicationBehavior::Instance(instance) => write!(f, "Instance({})", instance.name()),
        }
    }
}

#[derive(Debug)]
pub struct Application {
    name: String,
    behavior: ApplicationBehavior,
    extensions: Vec<Arc<Extension>>,
}

impl Application {
    /// Wrap an async closure. The kernel awaits the future it returns.
    pub fn runner<F, Fut>(run: F) -> Self
    where
        F: Fn(Container) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        Self::from_behavior(
            "application-runner",
            ApplicationBehavior::Runner(Box::new(move |container| run(container).boxed())),
        )
    }

    /// Wrap a closure that finishes without awaiting anything.
    pub fn sync_runner<F>(run: F) -> Self
    where
        F: Fn(&Container) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self::from_behavior(
            "application-runner",
            ApplicationBehavior::Runner(Box::new(move |container| {
                let result = run(&container);
                Box::pin(async move { result })
            })),
        )
    }

    pub fn instance<R: Run + 'static>(application: R) -> Self {
        let name = application.name().to_string();
        Self::from_behavior(name, ApplicationBehavior::Instance(Box::new(application)))
    }

    fn from_behavior(name: impl Into<String>, behavior: ApplicationBehavior) -> Self {
        Self {
            name: name.into(),
            behavior,
            extensions: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add an extension to merge into the kernel's registry when this
    /// application is run.
    pub fn with_extension(mut self, extension: Arc<Extension>) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn with_extensions(mut self, extensions: impl IntoIterator<Item = Arc<Extension>>) -> Self {
        self.extensions.extend(extensions);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn behavior(&self) -> &ApplicationBehavior {
        &self.behavior
    }

    pub fn extensions(&self) -> &[Arc<Extension>] {
        &self.extensions
    }

    pub async fn run(&self, container: &Container) -> Result<(), BoxError> {
        match &self.behavior {
            ApplicationBehavior::Runner(run) => run(container.clone()).await,
            ApplicationBehavior::Instance(instance) => instance.run(container).await,
        }
    }
}
