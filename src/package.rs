//! Module for the package that hooks the listener into the host.
use crate::{
    error::Result,
    guard,
    host::{AdviseCookie, ServiceProvider, SharedListener, SolutionBuildManager},
    listener::{ListenerConfig, ToolsVersionListener},
};
use std::{cell::RefCell, rc::Rc};

/// Keeps a [`ToolsVersionListener`] advised to the build manager of the
/// host for as long as the package is alive.
pub struct ToolsVersionPackage {
    build_manager: Rc<dyn SolutionBuildManager>,
    listener: Rc<RefCell<ToolsVersionListener>>,
    cookie: Option<AdviseCookie>,
}

impl ToolsVersionPackage {
    /// Resolves the build manager of the host and advises a new listener to it.
    ///
    /// Fails with [`crate::Error::ServiceUnavailable`] if the host does not
    /// provide a build manager.
    pub fn initialize(services: Rc<dyn ServiceProvider>, config: ListenerConfig) -> Result<Self> {
        let build_manager = guard::service(services.build_manager(), "SolutionBuildManager")?;
        let listener = Rc::new(RefCell::new(ToolsVersionListener::new(services, config)));
        let shared: SharedListener = listener.clone();
        let cookie = build_manager.advise_update_solution_events(shared)?;
        tracing::debug!(cookie = cookie.get(), "tools version listener advised");
        Ok(ToolsVersionPackage {
            build_manager,
            listener,
            cookie: Some(cookie),
        })
    }

    pub fn cookie(&self) -> Option<AdviseCookie> {
        self.cookie
    }

    /// The advised listener.
    pub fn listener(&self) -> Rc<RefCell<ToolsVersionListener>> {
        Rc::clone(&self.listener)
    }

    /// Unadvises the listener and reports a failure to do so.
    pub fn dispose(mut self) -> Result<()> {
        self.unadvise()
    }

    fn unadvise(&mut self) -> Result<()> {
        match self.cookie.take() {
            Some(cookie) => self.build_manager.unadvise_update_solution_events(cookie),
            None => Ok(()),
        }
    }
}

impl Drop for ToolsVersionPackage {
    fn drop(&mut self) {
        if let Err(e) = self.unadvise() {
            tracing::warn!("Failed to unadvise the tools version listener: {}", e);
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Unit tests of the private functions and methods
// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        error::Error,
        host::{OutputSink, SolutionInfo, TracingOutput, UpdateSolutionEventHub},
    };

    struct Services {
        hub: Option<Rc<UpdateSolutionEventHub>>,
    }

    impl ServiceProvider for Services {
        fn solution(&self) -> Option<Rc<dyn SolutionInfo>> {
            None
        }

        fn output(&self) -> Option<Rc<dyn OutputSink>> {
            Some(Rc::new(TracingOutput))
        }

        fn build_manager(&self) -> Option<Rc<dyn SolutionBuildManager>> {
            self.hub
                .clone()
                .map(|hub| hub as Rc<dyn SolutionBuildManager>)
        }
    }

    #[test]
    fn test_initialize_advises_and_drop_unadvises() {
        let hub = Rc::new(UpdateSolutionEventHub::new());
        let services = Rc::new(Services {
            hub: Some(hub.clone()),
        });
        let package = ToolsVersionPackage::initialize(services, ListenerConfig::default())
            .expect("Initialization should succeed when a build manager exists.");
        assert_eq!(package.cookie().map(AdviseCookie::get), Some(1));
        assert_eq!(hub.len(), 1);

        drop(package);
        assert!(hub.is_empty(), "Dropping the package should unadvise the listener.");
    }

    #[test]
    fn test_dispose_reports_unadvise_failure() {
        let hub = Rc::new(UpdateSolutionEventHub::new());
        let services = Rc::new(Services {
            hub: Some(hub.clone()),
        });
        let package = ToolsVersionPackage::initialize(services, ListenerConfig::default()).unwrap();
        let cookie = package.cookie().unwrap();
        hub.unadvise_update_solution_events(cookie).unwrap();

        assert!(matches!(package.dispose(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_initialize_without_build_manager() {
        let services = Rc::new(Services { hub: None });
        assert!(matches!(
            ToolsVersionPackage::initialize(services, ListenerConfig::default()),
            Err(Error::ServiceUnavailable(_))
        ));
    }

    #[test]
    fn test_missing_solution_fails_the_build() {
        let hub = Rc::new(UpdateSolutionEventHub::new());
        let services = Rc::new(Services {
            hub: Some(hub.clone()),
        });
        let _package = ToolsVersionPackage::initialize(services, ListenerConfig::default()).unwrap();
        assert!(matches!(hub.start_update(), Err(Error::ServiceUnavailable(_))));
    }
}
