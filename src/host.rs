//! Module containing the contracts of the host that drives the builds.
//!
//! An IDE integration implements [`ServiceProvider`] and friends on top of
//! its own services. Drivers without an IDE can use
//! [`UpdateSolutionEventHub`] as the build manager and [`TracingOutput`]
//! as the output sink.
//!
//! All hooks are invoked sequentially on one thread, with at most one
//! build in flight, which is why the shared handles are `Rc` based.
use crate::{
    error::{Error, Result},
    guard,
};
use std::{
    cell::{Cell, RefCell},
    num::NonZeroU32,
    path::PathBuf,
    rc::Rc,
};

/// Information about a project configuration passed to the project hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfiguration {
    pub project: String,
    pub configuration: String,
    pub solution_configuration: String,
}

/// How a solution update finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub succeeded: bool,
    pub modified: bool,
    pub cancel_command: bool,
}

/// Notifications sent by the build manager during a solution update.
///
/// The project configuration hooks default to doing nothing.
pub trait UpdateSolutionEvents {
    /// Called before the update of the solution begins.
    fn update_solution_begin(&mut self) -> Result<()>;

    /// Called when the update of the solution is done.
    fn update_solution_done(&mut self, outcome: UpdateOutcome) -> Result<()>;

    /// Called when the update of the solution was cancelled.
    fn update_solution_cancel(&mut self) -> Result<()>;

    /// Called right before the build engine is started.
    fn update_solution_start_update(&mut self) -> Result<()>;

    fn on_active_project_cfg_change(&mut self, _project: &str) -> Result<()> {
        Ok(())
    }

    fn update_project_cfg_begin(&mut self, _cfg: &ProjectConfiguration) -> Result<()> {
        Ok(())
    }

    fn update_project_cfg_done(
        &mut self,
        _cfg: &ProjectConfiguration,
        _succeeded: bool,
        _cancelled: bool,
    ) -> Result<()> {
        Ok(())
    }
}

/// Shared handle to a listener registered with a build manager.
pub type SharedListener = Rc<RefCell<dyn UpdateSolutionEvents>>;

/// Yields information about the open solution.
pub trait SolutionInfo {
    /// The directory containing the solution file.
    fn solution_directory(&self) -> Result<PathBuf>;
}

/// The sink receiving text for the build output.
pub trait OutputSink {
    fn output_string(&self, text: &str) -> Result<()>;
}

/// Token identifying a registration with a build manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdviseCookie(NonZeroU32);

impl AdviseCookie {
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

/// The build manager that listeners register with.
pub trait SolutionBuildManager {
    fn advise_update_solution_events(&self, listener: SharedListener) -> Result<AdviseCookie>;

    fn unadvise_update_solution_events(&self, cookie: AdviseCookie) -> Result<()>;
}

/// Resolves the services of the host. `None` means the service is
/// not available.
pub trait ServiceProvider {
    fn solution(&self) -> Option<Rc<dyn SolutionInfo>>;

    fn output(&self) -> Option<Rc<dyn OutputSink>>;

    fn build_manager(&self) -> Option<Rc<dyn SolutionBuildManager>>;
}

/// Output sink that forwards the output to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingOutput;

impl OutputSink for TracingOutput {
    fn output_string(&self, text: &str) -> Result<()> {
        tracing::info!("{}", text.trim_end());
        Ok(())
    }
}

/// An in process build manager that forwards build notifications
/// to the advised listeners in the order they were advised.
///
/// Dispatching stops at the first listener that fails.
#[derive(Default)]
pub struct UpdateSolutionEventHub {
    listeners: RefCell<Vec<(AdviseCookie, SharedListener)>>,
    last_cookie: Cell<u32>,
}

impl UpdateSolutionEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of advised listeners.
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    pub fn begin(&self) -> Result<()> {
        self.dispatch(|l| l.update_solution_begin())
    }

    pub fn start_update(&self) -> Result<()> {
        self.dispatch(|l| l.update_solution_start_update())
    }

    pub fn done(&self, outcome: UpdateOutcome) -> Result<()> {
        self.dispatch(|l| l.update_solution_done(outcome))
    }

    pub fn cancel(&self) -> Result<()> {
        self.dispatch(|l| l.update_solution_cancel())
    }

    pub fn active_project_cfg_change(&self, project: &str) -> Result<()> {
        self.dispatch(|l| l.on_active_project_cfg_change(project))
    }

    pub fn project_cfg_begin(&self, cfg: &ProjectConfiguration) -> Result<()> {
        self.dispatch(|l| l.update_project_cfg_begin(cfg))
    }

    pub fn project_cfg_done(
        &self,
        cfg: &ProjectConfiguration,
        succeeded: bool,
        cancelled: bool,
    ) -> Result<()> {
        self.dispatch(|l| l.update_project_cfg_done(cfg, succeeded, cancelled))
    }

    // The listeners are cloned out first so a listener may
    // advise or unadvise while being notified.
    fn dispatch<F>(&self, mut notify: F) -> Result<()>
    where
        F: FnMut(&mut dyn UpdateSolutionEvents) -> Result<()>,
    {
        let listeners: Vec<SharedListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        listeners
            .iter()
            .try_for_each(|listener| notify(&mut *listener.borrow_mut()))
    }
}

impl SolutionBuildManager for UpdateSolutionEventHub {
    fn advise_update_solution_events(&self, listener: SharedListener) -> Result<AdviseCookie> {
        let next = self
            .last_cookie
            .get()
            .checked_add(1)
            .and_then(NonZeroU32::new)
            .map(AdviseCookie)
            .ok_or_else(|| Error::Host("No more advise cookies available.".to_string()))?;
        self.last_cookie.set(next.get());
        self.listeners.borrow_mut().push((next, listener));
        Ok(next)
    }

    fn unadvise_update_solution_events(&self, cookie: AdviseCookie) -> Result<()> {
        let mut listeners = self.listeners.borrow_mut();
        let position = listeners.iter().position(|(c, _)| *c == cookie);
        guard::if_invalid(position.is_none(), "cookie")?;
        if let Some(index) = position {
            listeners.remove(index);
        }
        Ok(())
    }
}
