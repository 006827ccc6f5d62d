//! Shared protocol state
//!
//! The dispatcher is the only writer. HTTP handlers and other readers get
//! copies, never references, so a reader can never observe a record while
//! it is half written.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use evpanel_protocol::{ParamConfig, RunningState};

/// A record plus the number of times it has been replaced
type Versioned<T> = Cell<(T, u32)>;

/// Running state and parameter config behind critical-section guards
///
/// `const`-constructible so it can live in a `static`.
pub struct SharedState {
    running: Mutex<CriticalSectionRawMutex, Versioned<RunningState>>,
    config: Mutex<CriticalSectionRawMutex, Versioned<ParamConfig>>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    /// Both records at their power-on defaults
    pub const fn new() -> Self {
        Self {
            running: Mutex::new(Cell::new((RunningState::DEFAULT, 0))),
            config: Mutex::new(Cell::new((ParamConfig::DEFAULT, 0))),
        }
    }

    /// Copy of the current running state
    pub fn snapshot_running_state(&self) -> RunningState {
        self.running.lock(|cell| cell.get().0)
    }

    /// Copy of the current running state and its update count
    ///
    /// Compare the count between calls to see whether the main board has
    /// reported since.
    pub fn running_state_versioned(&self) -> (RunningState, u32) {
        self.running.lock(Cell::get)
    }

    /// Number of wholesale running state updates applied
    pub fn running_state_updates(&self) -> u32 {
        self.running.lock(|cell| cell.get().1)
    }

    /// Replace every field of the running state
    pub fn replace_running_state(&self, state: RunningState) {
        self.running.lock(|cell| {
            let (_, updates) = cell.get();
            cell.set((state, updates.wrapping_add(1)));
        });
    }

    /// Copy of the current parameter config
    pub fn snapshot_config(&self) -> ParamConfig {
        self.config.lock(|cell| cell.get().0)
    }

    /// Copy of the current parameter config and its update count
    pub fn config_versioned(&self) -> (ParamConfig, u32) {
        self.config.lock(Cell::get)
    }

    /// Number of parameter config updates applied
    pub fn config_updates(&self) -> u32 {
        self.config.lock(|cell| cell.get().1)
    }

    /// Replace the parameter config
    pub fn replace_config(&self, config: ParamConfig) {
        self.config.lock(|cell| {
            let (_, updates) = cell.get();
            cell.set((config, updates.wrapping_add(1)));
        });
    }
}
