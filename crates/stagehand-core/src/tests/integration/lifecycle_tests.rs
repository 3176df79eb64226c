#![cfg(test)]

use std::sync::Arc;

use super::common::{GREETING, GreetingProvider, Greeter, VisitorProvider, journal, read};
use crate::container::Container;
use crate::event::dispatcher::{sync_listener, typed_listener};
use crate::event::gateway::EventGateway;
use crate::event::types::{ApplicationEvent, ErrorEvent, ExtensionEvent};
use crate::kernel::constants::{AFTER_EXTENSIONS, BEFORE_EXTENSION, BEFORE_RUN, ON_ERROR, ON_STOP, PRIORITY_HIGH};
use crate::kernel::error::RunError;
use crate::kernel::{Application, EventDrivenKernel, Extension, Kernel};

#[tokio::test]
async fn test_extensions_prepare_container_for_application() {
    let journal = journal();
    let kernel = EventDrivenKernel::new();

    kernel.add_extension(Arc::new(Extension::instance(VisitorProvider { journal: journal.clone() })));
    kernel.add_extension(Arc::new(
        Extension::instance(GreetingProvider {
            greeting: "hello",
            journal: journal.clone(),
        })
        .with_priority(PRIORITY_HIGH),
    ));

    kernel
        .run(Arc::new(Application::instance(Greeter { journal: journal.clone() })))
        .await
        .unwrap();

    assert_eq!(
        read(&journal),
        vec!["bound greeting", "visitors built", "hello, ada", "hello, grace"]
    );
}

#[tokio::test]
async fn test_missing_service_surfaces_as_error_event() {
    let journal = journal();
    let kernel = EventDrivenKernel::new();
    let observed = journal.clone();

    kernel
        .add_error_listener(typed_listener(move |event: &ErrorEvent| {
            if let RunError::Application { application, source } = event.error.as_ref() {
                observed
                    .lock()
                    .unwrap()
                    .push(format!("{} failed: {}", application, source));
            }
            Ok(())
        }))
        .unwrap();

    // No extensions registered, so the greeting is never bound
    kernel
        .run(Arc::new(Application::instance(Greeter { journal: journal.clone() })))
        .await
        .unwrap();

    let entries = read(&journal);
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("greeter failed:"), "unexpected entry {:?}", entries[0]);
    assert!(entries[0].contains("greeting"));
}

#[tokio::test]
async fn test_listeners_observe_every_blocking_stage() {
    let journal = journal();
    let kernel = EventDrivenKernel::new();

    let before_extension = journal.clone();
    kernel
        .add_listener(
            BEFORE_EXTENSION,
            typed_listener(move |event: &ExtensionEvent| {
                before_extension
                    .lock()
                    .unwrap()
                    .push(format!("before {}", event.extension.name()));
                Ok(())
            }),
        )
        .unwrap();

    for (kind, label) in [(BEFORE_RUN, "before run"), (ON_STOP, "stop")] {
        let journal = journal.clone();
        kernel
            .add_listener(
                kind,
                typed_listener(move |event: &ApplicationEvent| {
                    journal
                        .lock()
                        .unwrap()
                        .push(format!("{} {}", label, event.application.name()));
                    Ok(())
                }),
            )
            .unwrap();
    }

    let application = Application::instance(Greeter { journal: journal.clone() }).with_extensions(vec![
        Arc::new(Extension::instance(GreetingProvider {
            greeting: "hi",
            journal: journal.clone(),
        })),
        Arc::new(Extension::instance(VisitorProvider { journal: journal.clone() })),
    ]);

    kernel.run(Arc::new(application)).await.unwrap();

    assert_eq!(
        read(&journal),
        vec![
            "before greeting-provider",
            "bound greeting",
            "before visitor-provider",
            "before run greeter",
            "visitors built",
            "hi, ada",
            "hi, grace",
            "stop greeter",
        ]
    );
}

#[tokio::test]
async fn test_listener_can_bind_services_before_run() {
    let journal = journal();
    let kernel = EventDrivenKernel::new();

    kernel
        .add_listener(
            BEFORE_RUN,
            sync_listener(|event| {
                event.container().bind_constant(GREETING, "howdy".to_string())?;
                Ok(())
            }),
        )
        .unwrap();

    let application = Application::instance(Greeter { journal: journal.clone() })
        .with_extension(Arc::new(Extension::instance(VisitorProvider { journal: journal.clone() })));
    kernel.run(Arc::new(application)).await.unwrap();

    assert_eq!(read(&journal), vec!["visitors built", "howdy, ada", "howdy, grace"]);
}

#[tokio::test]
async fn test_kernels_over_one_container_share_a_dispatcher() {
    let container = Container::new();
    let first = EventDrivenKernel::with_container(container.clone());
    let second = EventDrivenKernel::with_container(container.clone());
    let journal = journal();

    let done = journal.clone();
    first
        .add_listener(
            AFTER_EXTENSIONS,
            sync_listener(move |_| {
                done.lock().unwrap().push("extensions done".to_string());
                Ok(())
            }),
        )
        .unwrap();

    let first_dispatcher = first.dispatcher().unwrap();
    let second_dispatcher = second.dispatcher().unwrap();
    assert_eq!(
        Arc::as_ptr(&first_dispatcher) as *const (),
        Arc::as_ptr(&second_dispatcher) as *const ()
    );
    assert_eq!(second_dispatcher.listener_count(AFTER_EXTENSIONS), 1);

    let gateway = EventGateway::new(container);
    assert_eq!(gateway.dispatcher().unwrap().listener_count(AFTER_EXTENSIONS), 1);
    assert_eq!(gateway.dispatcher().unwrap().listener_count(ON_ERROR), 0);
}
