//! Optional text-generation collaborator.
//!
//! A [`Collaborator`] resolves its generator at most once. Until the first
//! call to [`Collaborator::resolve`] it is `Uninitialized`; afterwards it is
//! either `Ready` with a generator or permanently `Unavailable`, and every
//! later call returns the same outcome without retrying.

mod openai;
pub mod prompt;

pub use openai::OpenAiGenerator;

use crate::config::{GeneratorConfig, Provider};
use crate::error::AugmentError;
use log::{debug, info, warn};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard};

pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, prompt: &str) -> Result<String, AugmentError>;
}

pub enum CollaboratorState {
    Uninitialized,
    Ready(Arc<dyn TextGenerator>),
    Unavailable,
}

type Initializer = Box<dyn Fn() -> Result<Arc<dyn TextGenerator>, AugmentError> + Send + Sync>;

pub struct Collaborator {
    state: Mutex<CollaboratorState>,
    initializer: Initializer,
}

impl Collaborator {
    pub fn new<F>(initializer: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn TextGenerator>, AugmentError> + Send + Sync + 'static,
    {
        Collaborator {
            state: Mutex::new(CollaboratorState::Uninitialized),
            initializer: Box::new(initializer),
        }
    }

    pub fn from_config(config: GeneratorConfig) -> Self {
        Self::new(move || connect(&config))
    }

    pub fn disabled() -> Self {
        Self::new(|| Err(AugmentError::Disabled))
    }

    /// Returns the generator, initializing it on first use.
    ///
    /// Concurrent callers block on the state lock, so the initializer runs at
    /// most once per collaborator.
    pub fn resolve(&self) -> Option<Arc<dyn TextGenerator>> {
        let mut state = self.lock_state();

        if matches!(*state, CollaboratorState::Uninitialized) {
            debug!("Initializing text-generation collaborator");
            *state = match catch_unwind(AssertUnwindSafe(|| (self.initializer)())) {
                Ok(Ok(generator)) => {
                    info!("Text generation enabled via {}", generator.name());
                    CollaboratorState::Ready(generator)
                }
                Ok(Err(e)) => {
                    info!("Text generation unavailable: {}", e);
                    CollaboratorState::Unavailable
                }
                Err(_) => {
                    warn!("Text-generation initializer panicked; disabling augmentation");
                    CollaboratorState::Unavailable
                }
            };
        }

        match &*state {
            CollaboratorState::Ready(generator) => Some(Arc::clone(generator)),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(*self.lock_state(), CollaboratorState::Uninitialized)
    }

    /// Resolves the generator and runs one prompt through it.
    ///
    /// Errors and panics raised by the generator come back as `Err`.
    pub fn generate(&self, prompt: &str) -> Result<String, AugmentError> {
        let generator = self.resolve().ok_or(AugmentError::Disabled)?;
        match catch_unwind(AssertUnwindSafe(|| generator.generate(prompt))) {
            Ok(result) => result,
            Err(_) => Err(AugmentError::Panicked),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CollaboratorState> {
        // A panic while holding the lock leaves a valid state behind
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Selects the generator strategy named by the configuration.
pub fn connect(config: &GeneratorConfig) -> Result<Arc<dyn TextGenerator>, AugmentError> {
    match config.provider {
        Provider::Disabled => Err(AugmentError::Disabled),
        Provider::OpenAi => Ok(Arc::new(OpenAiGenerator::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct Echo;

    impl TextGenerator for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn generate(&self, prompt: &str) -> Result<String, AugmentError> {
            Ok(format!("echo: {prompt}"))
        }
    }

    struct Exploding;

    impl TextGenerator for Exploding {
        fn name(&self) -> &str {
            "exploding"
        }

        fn generate(&self, _prompt: &str) -> Result<String, AugmentError> {
            panic!("generator blew up");
        }
    }

    #[test]
    fn initializes_once_across_threads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let collaborator = Arc::new(Collaborator::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Echo) as Arc<dyn TextGenerator>)
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let collaborator = Arc::clone(&collaborator);
                thread::spawn(move || collaborator.resolve().is_some())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_initialization_is_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let collaborator = Collaborator::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(AugmentError::MissingApiKey)
        });

        assert!(!collaborator.is_resolved());
        assert!(collaborator.resolve().is_none());
        assert!(collaborator.resolve().is_none());
        assert!(collaborator.is_resolved());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_initializer_leaves_collaborator_unavailable() {
        let collaborator = Collaborator::new(|| panic!("no network stack"));
        assert!(collaborator.resolve().is_none());
        assert!(collaborator.is_resolved());
    }

    #[test]
    fn generate_passes_through_and_contains_panics() {
        let echo = Collaborator::new(|| Ok(Arc::new(Echo) as Arc<dyn TextGenerator>));
        assert_eq!(echo.generate("hi").unwrap(), "echo: hi");

        let exploding = Collaborator::new(|| Ok(Arc::new(Exploding) as Arc<dyn TextGenerator>));
        assert!(matches!(exploding.generate("hi"), Err(AugmentError::Panicked)));

        assert!(matches!(
            Collaborator::disabled().generate("hi"),
            Err(AugmentError::Disabled)
        ));
    }

    #[test]
    fn connect_honors_provider_and_key() {
        let disabled = GeneratorConfig::default();
        assert!(matches!(connect(&disabled), Err(AugmentError::Disabled)));

        let keyless = GeneratorConfig {
            provider: Provider::OpenAi,
            ..GeneratorConfig::default()
        };
        assert!(matches!(connect(&keyless), Err(AugmentError::MissingApiKey)));

        let keyed = GeneratorConfig {
            provider: Provider::OpenAi,
            api_key: Some("sk-test".to_string()),
            ..GeneratorConfig::default()
        };
        assert_eq!(connect(&keyed).unwrap().name(), "openai");
    }
}
