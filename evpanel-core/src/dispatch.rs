//! Function code dispatch
//!
//! Maps each recognized function code to at most one handler. The table
//! has exactly one slot per allow-listed code, so registration cannot fail
//! and lookup is a single index.

use evpanel_protocol::{FunctionCode, ParamConfig, RecordError, RunningState, ALLOW_LIST};

use crate::state::SharedState;

/// Applies a validated frame payload to `S`
pub type Handler<S> = fn(&S, &[u8]) -> Result<(), RecordError>;

/// What happened to a dispatched frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchOutcome {
    /// Handler accepted the payload
    Applied,
    /// Code is recognized but nothing is registered for it
    Unhandled,
    /// Handler refused the payload
    Rejected(RecordError),
}

/// Lookup table from function code to handler
pub struct Dispatcher<S> {
    handlers: [Option<Handler<S>>; ALLOW_LIST.len()],
}

impl<S> Default for Dispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Dispatcher<S> {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            handlers: [None; ALLOW_LIST.len()],
        }
    }

    /// Install `handler` for `code`, returning the one it replaces
    pub fn register(&mut self, code: FunctionCode, handler: Handler<S>) -> Option<Handler<S>> {
        self.handlers[code.index()].replace(handler)
    }

    /// Remove the handler for `code`
    pub fn unregister(&mut self, code: FunctionCode) -> Option<Handler<S>> {
        self.handlers[code.index()].take()
    }

    /// True if `code` has a handler
    pub fn is_handled(&self, code: FunctionCode) -> bool {
        self.handlers[code.index()].is_some()
    }

    /// Run the handler for `code` against `state`
    pub fn dispatch(&self, state: &S, code: FunctionCode, payload: &[u8]) -> DispatchOutcome {
        match self.handlers[code.index()] {
            Some(handler) => match handler(state, payload) {
                Ok(()) => DispatchOutcome::Applied,
                Err(e) => DispatchOutcome::Rejected(e),
            },
            None => DispatchOutcome::Unhandled,
        }
    }
}

impl Dispatcher<SharedState> {
    /// Table with the panel's standard handlers
    ///
    /// - `UPDATE_RUN_INFO_ALL` replaces the running state
    /// - `UPDATE_PARAM_CONFIG` replaces the parameter config
    ///
    /// Card and alarm codes stay unhandled.
    pub fn with_default_handlers() -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register(FunctionCode::UPDATE_RUN_INFO_ALL, apply_running_state);
        dispatcher.register(FunctionCode::UPDATE_PARAM_CONFIG, apply_param_config);
        dispatcher
    }
}

/// Replace the whole running state from a payload
///
/// Rejects any payload that is not exactly one record long.
pub fn apply_running_state(state: &SharedState, payload: &[u8]) -> Result<(), RecordError> {
    let running = RunningState::from_wire(payload)?;
    state.replace_running_state(running);
    Ok(())
}

/// Replace the parameter config from a payload
pub fn apply_param_config(state: &SharedState, payload: &[u8]) -> Result<(), RecordError> {
    let config = ParamConfig::from_wire(payload)?;
    state.replace_config(config);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use evpanel_protocol::{ChargeStatus, NetStatus};

    #[test]
    fn test_running_state_handler_applies() {
        let state = SharedState::new();
        let dispatcher = Dispatcher::with_default_handlers();
        let update = RunningState {
            charge_status: ChargeStatus::Fault,
            power: 0.0,
            voltage: 0.0,
            current: 0.0,
            net_status: NetStatus::Connected,
        };

        let outcome = dispatcher.dispatch(
            &state,
            FunctionCode::UPDATE_RUN_INFO_ALL,
            &update.to_wire(),
        );
        assert_eq!(outcome, DispatchOutcome::Applied);
        assert_eq!(state.snapshot_running_state(), update);
    }

    #[test]
    fn test_length_mismatch_rejected_without_update() {
        let state = SharedState::new();
        let dispatcher = Dispatcher::with_default_handlers();

        let outcome = dispatcher.dispatch(&state, FunctionCode::UPDATE_RUN_INFO_ALL, &[0u8; 32]);
        assert_eq!(
            outcome,
            DispatchOutcome::Rejected(RecordError::LengthMismatch {
                expected: RunningState::WIRE_LEN,
                actual: 32
            })
        );
        assert_eq!(state.running_state_updates(), 0);
    }

    #[test]
    fn test_param_config_handler_applies() {
        let state = SharedState::new();
        let dispatcher = Dispatcher::with_default_handlers();
        let config = ParamConfig {
            max_charge_current: 10,
            ..ParamConfig::DEFAULT
        };

        let outcome =
            dispatcher.dispatch(&state, FunctionCode::UPDATE_PARAM_CONFIG, &config.to_wire());
        assert_eq!(outcome, DispatchOutcome::Applied);
        assert_eq!(state.snapshot_config(), config);
    }

    #[test]
    fn test_reserved_codes_are_noops() {
        let state = SharedState::new();
        let dispatcher = Dispatcher::with_default_handlers();

        for code in [FunctionCode::UPDATE_RFID_CARD, FunctionCode::UPDATE_ALARM_RECORD] {
            assert!(!dispatcher.is_handled(code));
            assert_eq!(
                dispatcher.dispatch(&state, code, &[1, 2, 3]),
                DispatchOutcome::Unhandled
            );
        }
        assert_eq!(state.running_state_updates(), 0);
        assert_eq!(state.config_updates(), 0);
    }

    #[test]
    fn test_custom_handler_registration() {
        fn count_cards(seen: &Cell<usize>, payload: &[u8]) -> Result<(), RecordError> {
            seen.set(seen.get() + payload.len());
            Ok(())
        }

        let seen = Cell::new(0);
        let mut dispatcher = Dispatcher::<Cell<usize>>::new();
        assert!(dispatcher
            .register(FunctionCode::UPDATE_RFID_CARD, count_cards)
            .is_none());

        assert_eq!(
            dispatcher.dispatch(&seen, FunctionCode::UPDATE_RFID_CARD, &[0; 4]),
            DispatchOutcome::Applied
        );
        assert_eq!(seen.get(), 4);

        assert!(dispatcher.unregister(FunctionCode::UPDATE_RFID_CARD).is_some());
        assert_eq!(
            dispatcher.dispatch(&seen, FunctionCode::UPDATE_RFID_CARD, &[0; 4]),
            DispatchOutcome::Unhandled
        );
    }
}
