//! # The transition function.
//!
//! [`transition`] is the single place where retry and backoff policy is decided.
//!
//! ## Rules
//! - Every failure consumes exactly one attempt; the failure that brings `attempts`
//!   to `max_attempts` moves the resource to `Failed` and arms nothing.
//! - A failure arriving while a retry is already armed is coalesced (no extra
//!   attempt); a decode error upgrades the armed retry's cause.
//! - A pause only counts as a failure for autoplay resources the handle reports as
//!   not deliberately paused.
//! - `Failed` arms nothing. It records `LoadProgress` and `PlayConfirmed` as facts
//!   and leaves only through `PlayConfirmed` or `Restart`.
//! - Every `BeginLoad` bumps the epoch: a new load supersedes any play request still
//!   pending, so that request's outcome is stale.
//! - `Restart` works from any state: clears attempts, rewinds, re-issues load
//!   (+play for autoplay).

use std::time::Duration;

use crate::error::FailureKind;
use crate::machine::input::{Deferred, Effect, Input};
use crate::machine::state::{Lifecycle, ResourceState};
use crate::policies::{BackoffPolicy, RetryDecision, RetryPolicy};

/// Policy parameters consulted by [`transition`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransitionRules {
    /// Retry ceiling.
    pub retry: RetryPolicy,
    /// Delay before an armed retry or reload fires.
    pub backoff: BackoffPolicy,
    /// Fixed delay before a stall recheck fires.
    pub stall_recheck: Duration,
}

/// Result of one transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Lifecycle after the input.
    pub next: Lifecycle,
    /// Effects to perform, in order.
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(cur: &Lifecycle) -> Self {
        Self {
            next: cur.clone(),
            effects: Vec::new(),
        }
    }

    /// True when the input changed nothing (ignored or stale).
    pub fn is_noop(&self, prev: &Lifecycle) -> bool {
        self.effects.is_empty() && self.next == *prev
    }
}

/// Computes the next lifecycle and the effects for one input.
pub fn transition(cur: &Lifecycle, input: Input, rules: &TransitionRules) -> Transition {
    if cur.is_failed() {
        return match input {
            Input::Restart => restart(cur),
            Input::LoadProgress => {
                let mut next = cur.clone();
                next.loaded = true;
                Transition {
                    next,
                    effects: Vec::new(),
                }
            }
            // Playback started anyway; record it, nothing is armed.
            Input::PlayConfirmed => {
                let mut next = cur.clone();
                next.playing = true;
                next.attempts = 0;
                next.state = ResourceState::Playing;
                Transition {
                    next,
                    effects: Vec::new(),
                }
            }
            _ => Transition::unchanged(cur),
        };
    }

    let mut t = Transition::unchanged(cur);
    match input {
        Input::Register => {
            if cur.state == ResourceState::Idle {
                t.next.state = ResourceState::Loading;
                reissue(&mut t, cur.autoplay);
            }
        }

        Input::LoadProgress => {
            t.next.loaded = true;
            match cur.state {
                ResourceState::StallPending | ResourceState::Suspended => {
                    t.effects.push(Effect::Disarm);
                    t.next.state = t.next.settled();
                }
                ResourceState::Idle | ResourceState::Loading => {
                    t.next.state = t.next.settled();
                }
                _ => {}
            }
        }

        Input::Stalled => {
            if cur.loaded && cur.playing {
                return t;
            }
            if matches!(
                cur.state,
                ResourceState::Idle
                    | ResourceState::Loading
                    | ResourceState::Loaded
                    | ResourceState::Playing
            ) {
                t.next.state = ResourceState::StallPending;
                t.effects.push(Effect::Arm {
                    action: Deferred::StallRecheck,
                    delay: rules.stall_recheck,
                });
            }
        }

        Input::Suspended => {
            if cur.loaded {
                return t;
            }
            if matches!(
                cur.state,
                ResourceState::Idle | ResourceState::Loading | ResourceState::StallPending
            ) {
                arm_after_failure(
                    &mut t,
                    rules,
                    FailureKind::TransientLoad,
                    Deferred::Reload,
                    ResourceState::Suspended,
                );
            }
        }

        Input::Paused { deliberate } => {
            t.next.playing = false;
            if !cur.autoplay || deliberate {
                if cur.state == ResourceState::Playing {
                    t.next.state = t.next.settled();
                }
                return t;
            }
            if !cur.state.has_armed_retry() {
                arm_after_failure(
                    &mut t,
                    rules,
                    FailureKind::PlaybackRejected,
                    Deferred::Retry,
                    ResourceState::PausedUnexpected,
                );
            }
        }

        Input::DecodeError => decode_failure(&mut t, rules),

        Input::PlayRejected { kind } => {
            t.next.playing = false;
            if kind == FailureKind::DecodeFailure {
                decode_failure(&mut t, rules);
            } else if !cur.state.has_armed_retry() {
                arm_after_failure(
                    &mut t,
                    rules,
                    kind,
                    Deferred::Retry,
                    ResourceState::Retrying { cause: kind },
                );
            }
        }

        Input::PlayConfirmed => {
            if cur.state.is_armed() {
                t.effects.push(Effect::Disarm);
            }
            t.next.playing = true;
            t.next.attempts = 0;
            t.next.state = ResourceState::Playing;
        }

        Input::Fired { action, ready } => fired(&mut t, cur, action, ready, rules),

        Input::Restart => return restart(cur),
    }
    t
}

/// Error signal or decode-classified rejection: the cached asset is suspect.
fn decode_failure(t: &mut Transition, rules: &TransitionRules) {
    t.next.loaded = false;
    t.next.playing = false;
    let cause = FailureKind::DecodeFailure;
    if t.next.state.has_armed_retry() {
        t.next.state = ResourceState::Retrying { cause };
    } else {
        arm_after_failure(t, rules, cause, Deferred::Retry, ResourceState::Retrying { cause });
    }
}

fn fired(
    t: &mut Transition,
    cur: &Lifecycle,
    action: Deferred,
    ready: crate::media::ReadyState,
    rules: &TransitionRules,
) {
    match (action, cur.state) {
        (Deferred::StallRecheck, ResourceState::StallPending) => {
            if ready.has_current_data() {
                t.next.state = t.next.settled();
            } else if consume(t, rules, FailureKind::TransientLoad) {
                t.next.state = ResourceState::Loading;
                reissue(t, cur.autoplay);
            }
        }
        (Deferred::Reload, ResourceState::Suspended) => {
            t.next.state = ResourceState::Loading;
            begin_load(t);
        }
        (Deferred::Retry, ResourceState::Retrying { cause }) => {
            if cause.busts_cache() {
                t.effects.push(Effect::MutateSource);
            }
            t.next.state = ResourceState::Loading;
            reissue(t, cur.autoplay);
        }
        (Deferred::Retry, ResourceState::PausedUnexpected) => {
            t.next.state = ResourceState::Loading;
            reissue(t, cur.autoplay);
        }
        // Superseded: the state moved on before the timer was applied.
        _ => {}
    }
}

fn restart(cur: &Lifecycle) -> Transition {
    let mut next = cur.clone();
    next.attempts = 0;
    next.playing = false;
    next.state = ResourceState::Loading;

    let mut effects = vec![Effect::Disarm, Effect::Rewind];
    let mut t = Transition {
        next,
        effects: Vec::new(),
    };
    reissue(&mut t, cur.autoplay);
    effects.append(&mut t.effects);
    t.effects = effects;
    t
}

fn reissue(t: &mut Transition, autoplay: bool) {
    begin_load(t);
    if autoplay {
        t.effects.push(Effect::RequestPlay);
    }
}

/// Loading again aborts a pending play request; its outcome belongs to the old epoch.
fn begin_load(t: &mut Transition) {
    t.next.epoch = t.next.epoch.wrapping_add(1);
    t.effects.push(Effect::BeginLoad);
}

/// Consumes one attempt and, when allowed, arms `action` in `armed`.
fn arm_after_failure(
    t: &mut Transition,
    rules: &TransitionRules,
    cause: FailureKind,
    action: Deferred,
    armed: ResourceState,
) {
    if consume(t, rules, cause) {
        t.next.state = armed;
        t.effects.push(Effect::Arm {
            action,
            delay: rules.backoff.delay(t.next.attempts),
        });
    }
}

/// Consumes one attempt. Returns `false` (and fails the resource) at the ceiling.
fn consume(t: &mut Transition, rules: &TransitionRules, cause: FailureKind) -> bool {
    let decision = rules.retry.decide(t.next.attempts);
    t.next.attempts = decision.attempts();
    match decision {
        RetryDecision::Retry { .. } => true,
        RetryDecision::Exhausted { .. } => {
            t.next.state = ResourceState::Failed;
            t.next.playing = false;
            t.effects.push(Effect::Disarm);
            t.effects.push(Effect::Exhausted { cause });
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ReadyState;
    use crate::policies::JitterPolicy;

    fn rules() -> TransitionRules {
        TransitionRules {
            retry: RetryPolicy { max_attempts: 3 },
            backoff: BackoffPolicy {
                base: Duration::from_millis(500),
                jitter: JitterPolicy::None,
            },
            stall_recheck: Duration::from_millis(1000),
        }
    }

    fn rejected() -> Input {
        Input::PlayRejected {
            kind: FailureKind::PlaybackRejected,
        }
    }

    fn fire(action: Deferred) -> Input {
        Input::Fired {
            action,
            ready: ReadyState::HaveNothing,
        }
    }

    /// Applies inputs in order, returning the final lifecycle and every effect.
    fn run(start: Lifecycle, inputs: &[Input]) -> (Lifecycle, Vec<Effect>) {
        let r = rules();
        let mut cur = start;
        let mut all = Vec::new();
        for input in inputs {
            let t = transition(&cur, *input, &r);
            all.extend(t.effects);
            cur = t.next;
        }
        (cur, all)
    }

    fn registered(autoplay: bool) -> Lifecycle {
        run(Lifecycle::new(autoplay), &[Input::Register]).0
    }

    #[test]
    fn test_register_autoplay_requests_load_then_play() {
        let t = transition(&Lifecycle::new(true), Input::Register, &rules());
        assert_eq!(t.next.state, ResourceState::Loading);
        assert_eq!(t.effects, vec![Effect::BeginLoad, Effect::RequestPlay]);
    }

    #[test]
    fn test_register_non_autoplay_only_loads() {
        let t = transition(&Lifecycle::new(false), Input::Register, &rules());
        assert_eq!(t.effects, vec![Effect::BeginLoad]);
    }

    #[test]
    fn test_load_progress_marks_loaded() {
        let (lc, _) = run(registered(false), &[Input::LoadProgress]);
        assert!(lc.loaded);
        assert_eq!(lc.state, ResourceState::Loaded);
    }

    #[test]
    fn test_rejection_arms_linear_backoff() {
        let (lc, fx) = run(registered(true), &[rejected()]);
        assert_eq!(lc.attempts, 1);
        assert_eq!(
            lc.state,
            ResourceState::Retrying {
                cause: FailureKind::PlaybackRejected
            }
        );
        assert_eq!(
            fx.last(),
            Some(&Effect::Arm {
                action: Deferred::Retry,
                delay: Duration::from_millis(500)
            })
        );

        let (lc, fx) = run(lc, &[fire(Deferred::Retry), rejected()]);
        assert_eq!(lc.attempts, 2);
        assert_eq!(
            fx.last(),
            Some(&Effect::Arm {
                action: Deferred::Retry,
                delay: Duration::from_millis(1000)
            })
        );
    }

    #[test]
    fn test_three_rejections_fail_with_three_attempts() {
        let (lc, fx) = run(
            registered(true),
            &[
                Input::LoadProgress,
                rejected(),
                fire(Deferred::Retry),
                rejected(),
                fire(Deferred::Retry),
                rejected(),
            ],
        );
        assert_eq!(lc.state, ResourceState::Failed);
        assert_eq!(lc.attempts, 3);
        assert!(!lc.playing);
        assert!(fx.contains(&Effect::Exhausted {
            cause: FailureKind::PlaybackRejected
        }));
    }

    #[test]
    fn test_failed_ignores_further_failures() {
        let (failed, _) = run(
            registered(true),
            &[rejected(), fire(Deferred::Retry), rejected(), fire(Deferred::Retry), rejected()],
        );
        for input in [
            rejected(),
            Input::DecodeError,
            Input::Stalled,
            Input::Suspended,
            Input::Paused { deliberate: false },
            fire(Deferred::Retry),
        ] {
            let t = transition(&failed, input, &rules());
            assert!(t.is_noop(&failed), "{input:?} changed a failed resource");
        }
    }

    #[test]
    fn test_failed_records_confirmed_playback() {
        let (failed, _) = run(
            registered(true),
            &[rejected(), fire(Deferred::Retry), rejected(), fire(Deferred::Retry), rejected()],
        );
        let t = transition(&failed, Input::PlayConfirmed, &rules());
        assert!(t.effects.is_empty());
        assert!(t.next.playing);
        assert_eq!(t.next.attempts, 0);
        assert_eq!(t.next.state, ResourceState::Playing);
        assert_eq!(t.next.epoch, failed.epoch);
    }

    #[test]
    fn test_every_load_supersedes_pending_play() {
        let fresh = registered(true);
        assert_eq!(fresh.epoch, 1);

        let (stalled, _) = run(fresh.clone(), &[Input::Stalled]);
        assert_eq!(stalled.epoch, fresh.epoch);
        let t = transition(&stalled, fire(Deferred::StallRecheck), &rules());
        assert_eq!(t.next.epoch, fresh.epoch + 1);

        // A failure alone issues no load and keeps the pending request current.
        let armed = transition(&t.next, rejected(), &rules()).next;
        assert_eq!(armed.epoch, t.next.epoch);
        let t = transition(&armed, fire(Deferred::Retry), &rules());
        assert_eq!(t.next.epoch, armed.epoch + 1);

        let (suspended, _) = run(registered(false), &[Input::Suspended]);
        let t = transition(&suspended, fire(Deferred::Reload), &rules());
        assert_eq!(t.next.epoch, suspended.epoch + 1);
    }

    #[test]
    fn test_attempts_monotonic_until_success_then_zero() {
        let r = rules();
        let mut cur = registered(true);
        let mut prev = 0;
        for input in [rejected(), fire(Deferred::Retry), rejected(), fire(Deferred::Retry)] {
            cur = transition(&cur, input, &r).next;
            assert!(cur.attempts >= prev);
            prev = cur.attempts;
        }
        cur = transition(&cur, Input::PlayConfirmed, &r).next;
        assert_eq!(cur.attempts, 0);
        assert!(cur.playing);
        assert_eq!(cur.state, ResourceState::Playing);
    }

    #[test]
    fn test_restart_clears_failed() {
        let (failed, _) = run(
            registered(true),
            &[rejected(), fire(Deferred::Retry), rejected(), fire(Deferred::Retry), rejected()],
        );
        let t = transition(&failed, Input::Restart, &rules());
        assert_eq!(t.next.attempts, 0);
        assert_eq!(t.next.state, ResourceState::Loading);
        assert_eq!(t.next.epoch, failed.epoch + 1);
        assert_eq!(
            t.effects,
            vec![
                Effect::Disarm,
                Effect::Rewind,
                Effect::BeginLoad,
                Effect::RequestPlay
            ]
        );
    }

    #[test]
    fn test_restart_non_autoplay_does_not_play() {
        let t = transition(&registered(false), Input::Restart, &rules());
        assert!(!t.effects.contains(&Effect::RequestPlay));
        assert!(t.effects.contains(&Effect::BeginLoad));
    }

    #[test]
    fn test_pause_on_non_autoplay_never_retries() {
        let (playing, _) = run(registered(false), &[Input::LoadProgress, Input::PlayConfirmed]);
        for deliberate in [true, false] {
            let t = transition(&playing, Input::Paused { deliberate }, &rules());
            assert_eq!(t.next.attempts, playing.attempts);
            assert!(t.effects.is_empty());
            assert_eq!(t.next.state, ResourceState::Loaded);
            assert!(!t.next.playing);
        }
    }

    #[test]
    fn test_deliberate_pause_on_autoplay_is_ignored() {
        let (playing, _) = run(registered(true), &[Input::PlayConfirmed]);
        let t = transition(&playing, Input::Paused { deliberate: true }, &rules());
        assert!(t.effects.is_empty());
        assert_eq!(t.next.attempts, 0);
    }

    #[test]
    fn test_unrequested_pause_arms_retry() {
        let (playing, _) = run(registered(true), &[Input::LoadProgress, Input::PlayConfirmed]);
        let t = transition(&playing, Input::Paused { deliberate: false }, &rules());
        assert_eq!(t.next.state, ResourceState::PausedUnexpected);
        assert_eq!(t.next.attempts, 1);
        assert!(!t.next.playing);

        let t = transition(&t.next, fire(Deferred::Retry), &rules());
        assert_eq!(t.effects, vec![Effect::BeginLoad, Effect::RequestPlay]);
    }

    #[test]
    fn test_failure_during_armed_retry_is_coalesced() {
        let (armed, _) = run(registered(true), &[rejected()]);
        let t = transition(&armed, Input::Paused { deliberate: false }, &rules());
        assert_eq!(t.next.attempts, 1);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_decode_error_upgrades_armed_retry() {
        let (armed, _) = run(registered(true), &[rejected()]);
        let t = transition(&armed, Input::DecodeError, &rules());
        assert_eq!(t.next.attempts, 1);
        assert_eq!(
            t.next.state,
            ResourceState::Retrying {
                cause: FailureKind::DecodeFailure
            }
        );
        let t = transition(&t.next, fire(Deferred::Retry), &rules());
        assert_eq!(
            t.effects,
            vec![Effect::MutateSource, Effect::BeginLoad, Effect::RequestPlay]
        );
    }

    #[test]
    fn test_decode_error_clears_facts() {
        let (playing, _) = run(registered(false), &[Input::LoadProgress, Input::PlayConfirmed]);
        let t = transition(&playing, Input::DecodeError, &rules());
        assert!(!t.next.loaded);
        assert!(!t.next.playing);
        let t = transition(&t.next, fire(Deferred::Retry), &rules());
        assert_eq!(t.effects, vec![Effect::MutateSource, Effect::BeginLoad]);
    }

    #[test]
    fn test_suspend_before_load_arms_reload() {
        let (lc, fx) = run(registered(false), &[Input::Suspended]);
        assert_eq!(lc.state, ResourceState::Suspended);
        assert_eq!(lc.attempts, 1);
        assert_eq!(
            fx.last(),
            Some(&Effect::Arm {
                action: Deferred::Reload,
                delay: Duration::from_millis(500)
            })
        );
        let t = transition(&lc, fire(Deferred::Reload), &rules());
        assert_eq!(t.effects, vec![Effect::BeginLoad]);
        assert_eq!(t.next.state, ResourceState::Loading);
    }

    #[test]
    fn test_suspend_after_load_is_ignored() {
        let (loaded, _) = run(registered(false), &[Input::LoadProgress]);
        let t = transition(&loaded, Input::Suspended, &rules());
        assert!(t.is_noop(&loaded));
    }

    #[test]
    fn test_stall_recheck_reloads_below_threshold() {
        let (lc, fx) = run(registered(true), &[Input::Stalled]);
        assert_eq!(lc.state, ResourceState::StallPending);
        assert_eq!(lc.attempts, 0);
        assert_eq!(
            fx.last(),
            Some(&Effect::Arm {
                action: Deferred::StallRecheck,
                delay: Duration::from_millis(1000)
            })
        );

        let t = transition(&lc, fire(Deferred::StallRecheck), &rules());
        assert_eq!(t.next.attempts, 1);
        assert_eq!(t.effects, vec![Effect::BeginLoad, Effect::RequestPlay]);
    }

    #[test]
    fn test_stall_recheck_above_threshold_settles() {
        let (lc, _) = run(registered(false), &[Input::Stalled]);
        let t = transition(
            &lc,
            Input::Fired {
                action: Deferred::StallRecheck,
                ready: ReadyState::HaveFutureData,
            },
            &rules(),
        );
        assert!(t.effects.is_empty());
        assert_eq!(t.next.attempts, 0);
        assert_eq!(t.next.state, ResourceState::Loading);
    }

    #[test]
    fn test_stall_while_playing_loaded_is_ignored() {
        let (lc, _) = run(registered(true), &[Input::LoadProgress, Input::PlayConfirmed]);
        let t = transition(&lc, Input::Stalled, &rules());
        assert!(t.is_noop(&lc));
    }

    #[test]
    fn test_progress_disarms_pending_stall() {
        let (lc, _) = run(registered(false), &[Input::Stalled]);
        let t = transition(&lc, Input::LoadProgress, &rules());
        assert_eq!(t.effects, vec![Effect::Disarm]);
        assert_eq!(t.next.state, ResourceState::Loaded);
    }

    #[test]
    fn test_stale_fire_is_ignored() {
        let (lc, _) = run(registered(true), &[Input::PlayConfirmed]);
        for action in [Deferred::Retry, Deferred::Reload, Deferred::StallRecheck] {
            let t = transition(&lc, fire(action), &rules());
            assert!(t.is_noop(&lc));
        }
    }

    #[test]
    fn test_stall_recheck_can_exhaust() {
        let r = TransitionRules {
            retry: RetryPolicy { max_attempts: 1 },
            ..rules()
        };
        let cur = transition(&registered(false), Input::Stalled, &r).next;
        let t = transition(&cur, fire(Deferred::StallRecheck), &r);
        assert_eq!(t.next.state, ResourceState::Failed);
        assert_eq!(t.next.attempts, 1);
        assert_eq!(
            t.effects,
            vec![
                Effect::Disarm,
                Effect::Exhausted {
                    cause: FailureKind::TransientLoad
                }
            ]
        );
    }

    #[test]
    fn test_failed_still_records_load_progress() {
        let r = TransitionRules {
            retry: RetryPolicy { max_attempts: 1 },
            ..rules()
        };
        let failed = transition(&registered(true), rejected(), &r).next;
        assert!(failed.is_failed());
        let t = transition(&failed, Input::LoadProgress, &r);
        assert!(t.next.loaded);
        assert!(t.next.is_failed());
    }
}
