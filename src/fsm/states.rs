//! Concrete state handler functions and table builder.
//!
//! ```text
//!  IDLE ──[start]──▶ IN_PROGRESS
//!    ▲                    │
//!    └──────[stop]────────┘
//! ```
//!
//! Entering `Idle` is what clears a session: the slot, the mirrored weight
//! and the target latch all reset there, and the dosing motors stop.

use super::context::MixContext;
use super::{StateDescriptor, StateId};
use log::{info, warn};

/// Build the state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: InProgress
        StateDescriptor {
            id: StateId::InProgress,
            name: "InProgress",
            on_enter: Some(in_progress_enter),
            on_exit: Some(in_progress_exit),
            on_update: in_progress_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut MixContext) {
    ctx.session = None;
    ctx.live_weight = 0.0;
    ctx.target_reached = false;
    ctx.commands.dosing = false;
    info!("IDLE: no session, dosing motors off");
}

fn idle_update(_ctx: &mut MixContext) -> Option<StateId> {
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  IN_PROGRESS state
// ═══════════════════════════════════════════════════════════════════════════

fn in_progress_enter(ctx: &mut MixContext) {
    ctx.target_reached = false;
    ctx.commands.dosing = ctx.config.motors_follow_session;
    if let Some(session) = &ctx.session {
        info!(
            "IN_PROGRESS: mixing '{}' to {:.1} kg",
            session.recipe_id, session.total_weight_target
        );
    }
}

fn in_progress_exit(ctx: &mut MixContext) {
    ctx.commands.dosing = false;
}

fn in_progress_update(ctx: &mut MixContext) -> Option<StateId> {
    let Some(target) = ctx.session.as_ref().map(|s| s.total_weight_target) else {
        warn!("IN_PROGRESS without a session slot, returning to Idle");
        return Some(StateId::Idle);
    };

    if !ctx.target_reached && ctx.live_weight >= target {
        ctx.target_reached = true;
        info!("IN_PROGRESS: target {:.1} kg reached, awaiting stop", target);
    }
    None
}
