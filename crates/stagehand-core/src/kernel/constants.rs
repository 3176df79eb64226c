use crate::container::ServiceKey;
use crate::event::EventKind;
use crate::kernel::extension::Priority;

/// Kernel name used in log lines when no configuration overrides it
pub const KERNEL_NAME: &str = "stagehand";

/// Priority for extensions that must run first
pub const PRIORITY_HIGH: Priority = -255;

/// Priority given to extensions registered without one
pub const PRIORITY_NORMAL: Priority = 0;

/// Priority for extensions that must run last
pub const PRIORITY_LOW: Priority = 255;

/// Key under which the event dispatcher is bound in the container
pub const EVENT_DISPATCHER: ServiceKey = ServiceKey::reserved(1, "AsynchronousEventDispatcher");

/// Before any extension. Blocking, carries a `ContainerEvent`.
pub const BEFORE_EXTENSIONS: EventKind = EventKind::reserved(1, "BeforeExtensions");

/// Before each extension. Blocking, carries an `ExtensionEvent`.
pub const BEFORE_EXTENSION: EventKind = EventKind::reserved(2, "BeforeExtension");

/// After each extension. Non-blocking, carries an `ExtensionEvent`.
pub const AFTER_EXTENSION: EventKind = EventKind::reserved(3, "AfterExtension");

/// After all extensions. Non-blocking, carries a `ContainerEvent`.
pub const AFTER_EXTENSIONS: EventKind = EventKind::reserved(4, "AfterExtensions");

/// Just before the application. Blocking, carries an `ApplicationEvent`.
pub const BEFORE_RUN: EventKind = EventKind::reserved(5, "BeforeRun");

/// After the application. Non-blocking, carries an `ApplicationEvent`.
pub const AFTER_RUN: EventKind = EventKind::reserved(6, "AfterRun");

/// A run failed. Blocking, carries an `ErrorEvent`.
pub const ON_ERROR: EventKind = EventKind::reserved(7, "OnError");

/// The kernel stops. Blocking, carries an `ApplicationEvent`.
pub const ON_STOP: EventKind = EventKind::reserved(8, "OnStop");

/// Every reserved lifecycle kind, in dispatch order of a successful run
/// followed by `ON_ERROR`.
pub const LIFECYCLE_EVENTS: [EventKind; 8] = [
    BEFORE_EXTENSIONS,
    BEFORE_EXTENSION,
    AFTER_EXTENSION,
    AFTER_EXTENSIONS,
    BEFORE_RUN,
    AFTER_RUN,
    ON_STOP,
    ON_ERROR,
];
