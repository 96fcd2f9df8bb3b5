//! Cooperative yielding and timing helpers that work in the browser and natively.

#[cfg(not(target_arch = "wasm32"))]
use std::future::Future;
#[cfg(not(target_arch = "wasm32"))]
use std::pin::Pin;
#[cfg(not(target_arch = "wasm32"))]
use std::task::{Context, Poll};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Let the host event loop run (paint, input) before continuing.
///
/// Uses `scheduler.yield()` where the browser has it, otherwise a zero-delay
/// timeout.
#[cfg(target_arch = "wasm32")]
pub async fn yield_now() {
    if let Some(promise) = scheduler_yield_promise() {
        if wasm_bindgen_futures::JsFuture::from(promise).await.is_ok() {
            return;
        }
    }
    gloo_timers::future::TimeoutFuture::new(0).await;
}

#[cfg(target_arch = "wasm32")]
fn scheduler_yield_promise() -> Option<js_sys::Promise> {
    use wasm_bindgen::{JsCast, JsValue};

    let scheduler = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("scheduler")).ok()?;
    if !scheduler.is_object() {
        return None;
    }
    let yield_fn = js_sys::Reflect::get(&scheduler, &JsValue::from_str("yield"))
        .ok()?
        .dyn_into::<js_sys::Function>()
        .ok()?;
    yield_fn.call0(&scheduler).ok()?.dyn_into::<js_sys::Promise>().ok()
}

/// Returns `Pending` once and wakes itself, so other tasks on the executor
/// get a turn.
#[cfg(not(target_arch = "wasm32"))]
pub fn yield_now() -> YieldNow {
    YieldNow { yielded: false }
}

#[cfg(not(target_arch = "wasm32"))]
pub struct YieldNow {
    yielded: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Milliseconds since some fixed point, high resolution where available.
#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Measures elapsed wall time of a filter run.
pub struct Stopwatch {
    #[cfg(target_arch = "wasm32")]
    start: f64,
    #[cfg(not(target_arch = "wasm32"))]
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            #[cfg(target_arch = "wasm32")]
            start: now_ms(),
            #[cfg(not(target_arch = "wasm32"))]
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            now_ms() - self.start
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.start.elapsed().as_secs_f64() * 1000.0
        }
    }
}
