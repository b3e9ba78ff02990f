//! # Resource lifecycle state machine.
//!
//! Every managed resource carries a [`Lifecycle`]: an explicit [`ResourceState`] plus
//! the `loaded` / `playing` / `attempts` facts. All policy lives in one pure function,
//! [`transition`], which maps `(current lifecycle, input)` to the next lifecycle and a
//! list of [`Effect`]s. The reactor performs the effects; the machine never touches a
//! media handle, a timer or the clock, so it is tested without any backend.
//!
//! ```text
//!            Register
//!   Idle ───────────────► Loading ──LoadProgress──► Loaded
//!                            │  │                      │
//!                     Suspend│  └─Stalled──┐   Stalled─┘
//!                            ▼             ▼
//!                       Suspended     StallPending
//!                         (Reload)    (StallRecheck)
//!                            │             │ below threshold → consume attempt
//!                            └──► Loading ◄┘
//!
//!   PlayConfirmed (any live state) ───────────────► Playing (attempts = 0)
//!   Playing ──unrequested Pause──► PausedUnexpected ─┐
//!   PlayRejected / DecodeError ──► Retrying{cause} ──┴─Retry fired─► Loading
//!   any consume with attempts == max ─────────────► Failed
//!   Restart (any state, including Failed) ────────► Loading (attempts = 0)
//! ```

mod input;
mod state;
mod transition;

pub use input::{Deferred, Effect, Input, MediaSignal};
pub use state::{Lifecycle, ResourceState};
pub use transition::{Transition, TransitionRules, transition};
