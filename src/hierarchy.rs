//! Two-level manager view.
//!
//! The view receives the flat employee collection with `subordinates` already
//! resolved by the server and shows every employee that has at least one
//! direct report. Each manager can be expanded to list those reports; nothing
//! deeper is shown. Relationships are never rebuilt from `managerId` here.

use std::{
    collections::HashMap,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, TryRecvError},
    },
    thread,
};

use tracing::{debug, error, info};

use crate::{
    api::{Api, ApiError},
    models::employee::Employee,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expansion {
    #[default]
    Collapsed,
    Expanded,
}

impl Expansion {
    pub fn toggled(self) -> Self {
        match self {
            Expansion::Collapsed => Expansion::Expanded,
            Expansion::Expanded => Expansion::Collapsed,
        }
    }
}

#[derive(Debug)]
pub enum LoadState {
    Loading,
    Ready(Vec<Employee>),
    /// The fetch failed; kept apart from an empty `Ready` so the two render differently
    Failed(String),
}

/// One line of the rendered view, in display order
#[derive(Debug, PartialEq)]
pub enum Row<'a> {
    Heading,
    Loading,
    Failed(&'a str),
    NoManagers,
    Manager {
        employee: &'a Employee,
        expansion: Expansion,
    },
    Subordinate(&'a Employee),
}

type FetchResult = Result<Vec<Employee>, ApiError>;

struct PendingFetch {
    receiver: Receiver<FetchResult>,
    cancelled: Arc<AtomicBool>,
}

impl PendingFetch {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

pub struct HierarchyView {
    state: LoadState,
    expanded: HashMap<i64, Expansion>,
    pending: Option<PendingFetch>,
}

impl HierarchyView {
    /// Starts loading employees in the background. The view stays in
    /// [`LoadState::Loading`] until [`HierarchyView::poll`] or
    /// [`HierarchyView::wait`] picks up the result.
    pub fn mount<A>(api: Arc<A>) -> Self
    where
        A: Api + Send + Sync + 'static,
    {
        let mut view = Self {
            state: LoadState::Loading,
            expanded: HashMap::new(),
            pending: None,
        };
        view.start_fetch(api);
        view
    }

    /// Builds a view that has already settled with the given fetch result.
    pub fn from_result(result: FetchResult) -> Self {
        let mut view = Self {
            state: LoadState::Loading,
            expanded: HashMap::new(),
            pending: None,
        };
        view.apply(result);
        view
    }

    /// Reloads employees, keeping the expansion of managers that are still managers afterwards.
    pub fn refresh<A>(&mut self, api: Arc<A>)
    where
        A: Api + Send + Sync + 'static,
    {
        self.start_fetch(api);
    }

    fn start_fetch<A>(&mut self, api: Arc<A>)
    where
        A: Api + Send + Sync + 'static,
    {
        if let Some(previous) = self.pending.take() {
            debug!("superseding in-flight employee fetch");
            previous.cancel();
        }

        let (sender, receiver) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let worker_cancelled = Arc::clone(&cancelled);

        thread::spawn(move || {
            let result = api.list_employees();
            if worker_cancelled.load(Ordering::Acquire) {
                debug!("employee fetch finished after the view let go of it, discarding");
                return;
            }
            // The view may be dropped between the check and the send
            let _ = sender.send(result);
        });

        self.state = LoadState::Loading;
        self.pending = Some(PendingFetch {
            receiver,
            cancelled,
        });
    }

    /// Applies a finished fetch without blocking. Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };

        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(ApiError::Interrupted),
        };
        self.pending = None;
        self.apply(result);
        true
    }

    /// Blocks until the in-flight fetch, if any, has finished.
    pub fn wait(&mut self) {
        if let Some(pending) = self.pending.take() {
            let result = pending.receiver.recv().unwrap_or(Err(ApiError::Interrupted));
            self.apply(result);
        }
    }

    fn apply(&mut self, result: FetchResult) {
        match result {
            Ok(employees) => {
                info!(count = employees.len(), "employees loaded");
                self.expanded
                    .retain(|id, _| employees.iter().any(|e| e.id == *id && e.is_manager()));
                self.state = LoadState::Ready(employees);
            }
            Err(e) => {
                error!(error = %e, "failed to load employees");
                self.state = LoadState::Failed(e.to_string());
            }
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// Employees with at least one direct report, in server order.
    pub fn managers(&self) -> Vec<&Employee> {
        match &self.state {
            LoadState::Ready(employees) => employees.iter().filter(|e| e.is_manager()).collect(),
            LoadState::Loading | LoadState::Failed(_) => vec![],
        }
    }

    fn manager(&self, id: i64) -> Option<&Employee> {
        self.managers().into_iter().find(|e| e.id == id)
    }

    pub fn expansion(&self, id: i64) -> Expansion {
        self.expanded.get(&id).copied().unwrap_or_default()
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.expansion(id) == Expansion::Expanded
    }

    /// Flips one manager's disclosure. Returns the new state, or `None` when `id` is not a manager.
    pub fn toggle(&mut self, id: i64) -> Option<Expansion> {
        self.manager(id)?;
        let next = self.expansion(id).toggled();
        self.expanded.insert(id, next);
        debug!(manager_id = id, expansion = ?next, "toggled manager");
        Some(next)
    }

    /// Expands every listed manager, leaving already expanded ones open.
    /// Returns the ids that were not managers.
    pub fn expand(&mut self, ids: &[i64]) -> Vec<i64> {
        let mut ignored = vec![];
        for &id in ids {
            if self.manager(id).is_some() {
                self.expanded.insert(id, Expansion::Expanded);
            } else if !ignored.contains(&id) {
                ignored.push(id);
            }
        }
        ignored
    }

    pub fn rows(&self) -> Vec<Row<'_>> {
        let mut rows = vec![Row::Heading];

        match &self.state {
            LoadState::Loading => rows.push(Row::Loading),
            LoadState::Failed(message) => rows.push(Row::Failed(message)),
            LoadState::Ready(_) => {
                let managers = self.managers();
                if managers.is_empty() {
                    rows.push(Row::NoManagers);
                }
                for manager in managers {
                    let expansion = self.expansion(manager.id);
                    rows.push(Row::Manager {
                        employee: manager,
                        expansion,
                    });
                    if expansion == Expansion::Expanded {
                        rows.extend(manager.subordinates.iter().map(Row::Subordinate));
                    }
                }
            }
        }

        rows
    }
}

impl Drop for HierarchyView {
    fn drop(&mut self) {
        if let Some(pending) = &self.pending {
            pending.cancel();
        }
    }
}

/// Input accepted by the interactive hierarchy loop
#[derive(Debug, PartialEq, Eq)]
pub enum HierarchyCommand {
    Toggle(i64),
    Refresh,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unrecognised input '{0}'. Type a manager id to toggle, 'r' to refresh or 'q' to quit")]
pub struct ParseCommandError(String);

impl FromStr for HierarchyCommand {
    type Err = ParseCommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let mut words = input.split_whitespace();

        match (words.next(), words.next(), words.next()) {
            (Some("q" | "quit" | "exit"), None, None) => Ok(HierarchyCommand::Quit),
            (Some("r" | "refresh"), None, None) => Ok(HierarchyCommand::Refresh),
            (Some("t" | "toggle"), Some(id), None) => id
                .trim_start_matches('#')
                .parse()
                .map(HierarchyCommand::Toggle)
                .map_err(|_| ParseCommandError(input.to_string())),
            (Some(id), None, None) => id
                .trim_start_matches('#')
                .parse()
                .map(HierarchyCommand::Toggle)
                .map_err(|_| ParseCommandError(input.to_string())),
            _ => Err(ParseCommandError(input.to_string())),
        }
    }
}
