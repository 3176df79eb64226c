mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::debug;

use core_logging::LoggingExtension;
use stagehand_core::event::dispatcher::{sync_listener, typed_listener};
use stagehand_core::event::types::ErrorEvent;
use stagehand_core::kernel::constants::{LIFECYCLE_EVENTS, PRIORITY_HIGH};
use stagehand_core::kernel::error::BoxError;
use stagehand_core::kernel::{Extend, LifecycleStage};
use stagehand_core::{Application, Container, EventDrivenKernel, Extension, Kernel, KernelConfig, KernelError};

use cli::{CliArgs, Commands, ExtensionArg};

/// Demo extension that reports when it is applied.
struct AnnouncingExtension {
    name: String,
}

impl Extend for AnnouncingExtension {
    fn extend(&self, _container: &Container) -> Result<(), BoxError> {
        println!("extension {} applied", self.name);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn print_stages() {
    println!("{:<18} {:<18} {}", "STAGE", "EVENT", "BLOCKING");
    for stage in LifecycleStage::SEQUENCE.iter().chain([LifecycleStage::OnError].iter()) {
        let event = stage.event_kind().map_or_else(|| "-".to_string(), |kind| kind.to_string());
        let blocking = if stage.event_kind().is_none() {
            "-"
        } else if stage.is_blocking() {
            "yes"
        } else {
            "no"
        };
        println!("{:<18} {:<18} {}", stage.to_string(), event, blocking);
    }
}

async fn run_demo(config: KernelConfig, extensions: Vec<ExtensionArg>, fail: bool) -> Result<(), KernelError> {
    let kernel = EventDrivenKernel::with_config(Container::new(), config);

    for kind in LIFECYCLE_EVENTS {
        kernel.add_listener(
            kind,
            sync_listener(move |_| {
                println!("event: {}", kind);
                Ok(())
            }),
        )?;
    }
    kernel.add_error_listener(typed_listener(|event: &ErrorEvent| {
        eprintln!("error: {}", event.error);
        Ok(())
    }))?;

    kernel.add_extension(Arc::new(Extension::instance(LoggingExtension).with_priority(PRIORITY_HIGH)));
    for ExtensionArg { name, priority } in extensions {
        let mut extension = Extension::instance(AnnouncingExtension { name });
        if let Some(priority) = priority {
            extension = extension.with_priority(priority);
        }
        kernel.add_extension(Arc::new(extension));
    }
    debug!("Registered {} extension(s)", kernel.extension_count());

    let application = Application::sync_runner(move |_| {
        if fail {
            return Err("demo failure".into());
        }
        println!("application running");
        Ok(())
    })
    .named("demo");

    kernel.run(Arc::new(application)).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match args.command {
        Commands::Stages => {
            print_stages();
            ExitCode::SUCCESS
        }
        Commands::Run {
            config,
            extensions,
            fail,
        } => {
            let config = match config {
                Some(path) => match KernelConfig::load(&path) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!("Failed to load configuration: {}", e);
                        return ExitCode::FAILURE;
                    }
                },
                None => KernelConfig::default(),
            };

            if let Err(e) = run_demo(config, extensions, fail).await {
                eprintln!("Kernel error: {}", e);
                return ExitCode::FAILURE;
            }
            println!("run complete");
            ExitCode::SUCCESS
        }
    }
}
