//! Function-pointer finite state machine for the mixing session.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  StateTable                                              │
//! │  ┌────────────┬───────────┬──────────┬────────────────┐  │
//! │  │ StateId    │ on_enter  │ on_exit  │ on_update      │  │
//! │  ├────────────┼───────────┼──────────┼────────────────┤  │
//! │  │ Idle       │ fn(ctx)   │ —        │ fn(ctx)->Opt   │  │
//! │  │ InProgress │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Opt   │  │
//! │  └────────────┴───────────┴──────────┴────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The service calls [`Fsm::tick`] after every scale reading; `on_update`
//! for the current state may request a transition.  Session start and stop
//! are explicit operator actions and go through [`Fsm::force_transition`].
//! All handlers receive `&mut MixContext`, which holds the session slot,
//! the latest weight and the motor commands.

pub mod context;
pub mod states;

use context::MixContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    InProgress = 1,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 2;

    /// Convert an index back to `StateId`.  Out-of-range indices fall back
    /// to `Idle`.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            1 => Self::InProgress,
            0 => Self::Idle,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut MixContext);

/// Signature for the per-reading update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut MixContext) -> Option<StateId>;

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    current: usize,
    /// Completed transitions since start.
    transitions: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction.
    pub fn start(&mut self, ctx: &mut MixContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Run `on_update` for the current state and follow any transition it
    /// requests.
    pub fn tick(&mut self, ctx: &mut MixContext) {
        if let Some(next_id) = (self.table[self.current].on_update)(ctx) {
            self.force_transition(next_id, ctx);
        }
    }

    /// Transition immediately.  A no-op if already in `next`.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut MixContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    fn transition(&mut self, next_id: StateId, ctx: &mut MixContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transitions += 1;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
