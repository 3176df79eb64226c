#![cfg(test)]

use std::fs;
use std::sync::Arc;

use tempfile::tempdir;

use super::common::{journal, read};
use crate::config::KernelConfig;
use crate::container::Container;
use crate::event::dispatcher::sync_listener;
use crate::kernel::constants::{AFTER_RUN, PRIORITY_LOW, PRIORITY_NORMAL};
use crate::kernel::{Application, EventDrivenKernel, Extension, Kernel};

#[tokio::test]
async fn test_loaded_config_drives_kernel() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kernel.json");
    fs::write(
        &path,
        r#"{ "name": "integration", "default_priority": 255, "report_background_failures": false }"#,
    )
    .unwrap();

    let config = KernelConfig::load(&path).unwrap();
    let kernel = EventDrivenKernel::with_config(Container::new(), config);
    assert_eq!(kernel.config().name, "integration");
    assert!(!kernel.config().report_background_failures);

    let journal = journal();
    let unprioritized = journal.clone();
    kernel.add_extension(Arc::new(Extension::runner(move |_| {
        unprioritized.lock().unwrap().push("unprioritized".to_string());
        Ok(())
    })));
    let normal = journal.clone();
    kernel.add_extension(Arc::new(
        Extension::runner(move |_| {
            normal.lock().unwrap().push("normal".to_string());
            Ok(())
        })
        .with_priority(PRIORITY_NORMAL),
    ));

    // A failing non-blocking listener never fails the run
    kernel
        .add_listener(AFTER_RUN, sync_listener(|_| Err("ignored".into())))
        .unwrap();

    kernel.run(Arc::new(Application::sync_runner(|_| Ok(())))).await.unwrap();
    assert_eq!(read(&journal), vec!["normal", "unprioritized"]);
}

#[cfg(feature = "toml-config")]
#[tokio::test]
async fn test_toml_config_sets_default_priority() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kernel.toml");
    fs::write(&path, "default_priority = 255\n").unwrap();

    let kernel = EventDrivenKernel::with_config(Container::new(), KernelConfig::load(&path).unwrap());
    let extension = Arc::new(Extension::runner(|_| Ok(())));
    kernel.add_extension(Arc::clone(&extension));

    assert_eq!(extension.priority(), Some(PRIORITY_LOW));
    assert_eq!(kernel.config().name, "stagehand");
}
