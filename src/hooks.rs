use gloo_timers::callback::Timeout;
use sail_search::{AbortController, AbortSignal};
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

/// State and controls of a cancelable, low-priority update.
///
/// Starting a transition aborts whatever the previous one kicked off, so the
/// work it triggers can poll `signal` and stop early.
#[derive(Clone)]
pub struct AbortSignallingTransition {
    /// True from `start` until `settle` is emitted for the latest signal.
    pub is_pending: bool,
    /// Signal of the most recent transition, `None` before the first one.
    pub signal: Option<AbortSignal>,
    /// Emit with the id of the signal whose results were committed.
    /// Ids of superseded signals are ignored.
    pub settle: Callback<u64>,
    controller: Rc<RefCell<Option<AbortController>>>,
    pending_handle: UseStateHandle<bool>,
    signal_handle: UseStateHandle<Option<AbortSignal>>,
}

impl AbortSignallingTransition {
    /// Abort the previous transition, issue a fresh signal and run `update`.
    pub fn start(&self, update: impl FnOnce()) {
        let next = AbortController::new();
        let signal = next.signal();
        if let Some(previous) = self.controller.borrow_mut().replace(next) {
            previous.abort();
        }
        self.pending_handle.set(true);
        self.signal_handle.set(Some(signal));
        update();
    }
}

/// Whether settling `settled_id` ends the pending state. Only the latest
/// transition's signal counts; completions from superseded ones are ignored.
pub fn settles(current_id: Option<u64>, settled_id: u64) -> bool {
    current_id == Some(settled_id)
}

/// Custom hook pairing a pending flag with an abort signal per transition.
#[hook]
pub fn use_abort_signalling_transition() -> AbortSignallingTransition {
    let controller = use_mut_ref(|| None::<AbortController>);
    let pending_handle = use_state(|| false);
    let signal_handle = use_state(|| None::<AbortSignal>);

    let settle = {
        let controller = controller.clone();
        let pending_setter = pending_handle.clone();
        Callback::from(move |settled_id: u64| {
            let current_id = controller.borrow().as_ref().map(|c| c.signal().id());
            if settles(current_id, settled_id) {
                pending_setter.set(false);
            }
        })
    };

    // Abort whatever is still running when the owner unmounts.
    {
        let controller = controller.clone();
        use_effect_with((), move |_| {
            move || {
                if let Some(c) = controller.borrow().as_ref() {
                    c.abort();
                }
            }
        });
    }

    AbortSignallingTransition {
        is_pending: *pending_handle,
        signal: (*signal_handle).clone(),
        settle,
        controller,
        pending_handle,
        signal_handle,
    }
}

/// Run `effect` once `deps` has stopped changing for `delay_ms`.
///
/// Every change drops the pending timer, which cancels it. A zero delay runs
/// the effect straight away.
#[hook]
pub fn use_debounced_effect<D, F>(deps: D, delay_ms: u32, effect: F)
where
    D: PartialEq + Clone + 'static,
    F: Fn(&D) + 'static,
{
    let timer = use_mut_ref(|| None::<Timeout>);

    use_effect_with(deps, move |deps| {
        timer.borrow_mut().take();
        if delay_ms == 0 {
            effect(deps);
        } else {
            let deps = deps.clone();
            *timer.borrow_mut() = Some(Timeout::new(delay_ms, move || effect(&deps)));
        }
        || ()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_signal_settles() {
        let latest = AbortController::new();
        let id = latest.signal().id();
        assert!(settles(Some(id), id));
    }

    #[test]
    fn superseded_signal_keeps_pending() {
        let older = AbortController::new();
        let newer = AbortController::new();
        older.abort();
        assert!(!settles(Some(newer.signal().id()), older.signal().id()));
    }

    #[test]
    fn nothing_settles_before_the_first_transition() {
        let stray = AbortController::new();
        assert!(!settles(None, stray.signal().id()));
    }
}
