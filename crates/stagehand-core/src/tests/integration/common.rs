#![cfg(test)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::container::{Container, ServiceKey};
use crate::kernel::error::BoxError;
use crate::kernel::{Extend, Run};

pub const GREETING: ServiceKey = ServiceKey::reserved(1001, "greeting");
pub const VISITORS: ServiceKey = ServiceKey::reserved(1002, "visitors");

/// Shared record of what the test fixtures did, in order.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn read(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

/// Binds a greeting into the container.
pub struct GreetingProvider {
    pub greeting: &'static str,
    pub journal: Journal,
}

impl Extend for GreetingProvider {
    fn extend(&self, container: &Container) -> Result<(), BoxError> {
        container.bind_constant(GREETING, self.greeting.to_string())?;
        self.journal.lock().unwrap().push(format!("bound {}", GREETING));
        Ok(())
    }

    fn name(&self) -> &str {
        "greeting-provider"
    }
}

/// Binds a lazily built visitor list.
pub struct VisitorProvider {
    pub journal: Journal,
}

impl Extend for VisitorProvider {
    fn extend(&self, container: &Container) -> Result<(), BoxError> {
        let journal = self.journal.clone();
        container.bind_singleton(VISITORS, move |_| {
            journal.lock().unwrap().push("visitors built".to_string());
            Arc::new(vec!["ada".to_string(), "grace".to_string()])
        })?;
        Ok(())
    }

    fn name(&self) -> &str {
        "visitor-provider"
    }
}

/// Greets every visitor with the bound greeting.
pub struct Greeter {
    pub journal: Journal,
}

#[async_trait]
impl Run for Greeter {
    async fn run(&self, container: &Container) -> Result<(), BoxError> {
        let greeting: String = container.get(GREETING)?;
        let visitors: Arc<Vec<String>> = container.get(VISITORS)?;
        tokio::task::yield_now().await;

        let mut journal = self.journal.lock().unwrap();
        for visitor in visitors.iter() {
            journal.push(format!("{}, {}", greeting, visitor));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "greeter"
    }
}
