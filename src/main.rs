//! Main module for the sailboat search page using Yew.
//! Wires the search box, the debounced transition and the result list.

use sail_search::{cache, get_sail_data};
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod components;
mod config;
mod hooks;
mod utils;

use components::{AutoComplete, CacheInfo, SearchBar};
use config::{BLURRED_CLASS, SEARCH_DEBOUNCE_MS};
use hooks::{use_abort_signalling_transition, use_debounced_effect};

/// Helper to bump a version counter and trigger a re-render.
fn bump_version(version: &UseStateHandle<usize>) {
    version.set(version.wrapping_add(1));
}

/// The whole page: search box on top, ranked sailboats below.
///
/// `search_term` follows every keystroke; `autocomplete_term` is what the
/// results are computed for and only changes through a transition. While the
/// two differ, or a transition is still running, the page is blurred.
#[function_component(SearchPage)]
fn search_page() -> Html {
    let sail_data = use_memo((), |_| get_sail_data());
    let transition = use_abort_signalling_transition();
    let search_term = use_state(String::new);
    let autocomplete_term = use_state(String::new);
    // Re-render trigger for the cache footer
    let cache_version = use_state(|| 0usize);

    // Commit the typed term once typing pauses
    {
        let transition = transition.clone();
        let autocomplete_term = autocomplete_term.clone();
        use_debounced_effect(
            (*search_term).clone(),
            SEARCH_DEBOUNCE_MS,
            move |term: &String| {
                if *autocomplete_term == *term {
                    return;
                }
                let term = term.clone();
                let committed = autocomplete_term.clone();
                transition.start(move || committed.set(term));
            },
        );
    }

    let oninput = {
        let search_term = search_term.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search_term.set(input.value());
        })
    };

    let on_settled = {
        let settle = transition.settle.clone();
        let cache_version = cache_version.clone();
        Callback::from(move |signal_id: u64| {
            settle.emit(signal_id);
            bump_version(&cache_version);
        })
    };

    let onclear = {
        let cache_version = cache_version.clone();
        Callback::from(move |_: MouseEvent| {
            cache::clear();
            bump_version(&cache_version);
        })
    };

    let sail_data = match &*sail_data {
        Ok(sail_data) => sail_data.clone(),
        Err(e) => {
            return html! {
                <main>
                    <div class="current-error">{ e.to_string() }</div>
                </main>
            };
        }
    };

    // Ensure re-render on cache updates by reading cache_version
    let _ = *cache_version;
    let blurred = transition.is_pending || *search_term != *autocomplete_term;

    html! {
        <main class={classes!(blurred.then_some(BLURRED_CLASS))}>
            <SearchBar search_term={(*search_term).clone()} {oninput} />
            <AutoComplete
                search_term={(*autocomplete_term).clone()}
                sail_data={sail_data}
                abort_signal={transition.signal.clone()}
                {on_settled}
            />
            <CacheInfo cached_searches={cache::len()} {onclear} />
        </main>
    }
}

/// Entry point: installs the panic hook and mounts the page.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<SearchPage>::new().render();
}
