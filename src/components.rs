//! Yew view components for the sailboat search page.
//!
//! Everything here except `AutoComplete` is stateless and renders from props.

use crate::config::MAX_PREVIEWS;
use crate::utils::{
    format_length_ft, format_score, format_year, highlight_segments, result_count_label,
};
use log::debug;
use sail_search::cache::cached_filter_results;
use sail_search::{AbortSignal, SailData, SearchError, SearchResult};
use std::rc::Rc;
use yew::prelude::*;

/// Render `text` with the parts matching `term` wrapped in `<mark>`.
fn render_highlighted(text: &str, term: &str) -> Html {
    highlight_segments(text, term)
        .into_iter()
        .map(|(segment, is_match)| {
            if is_match {
                html! { <mark>{ segment }</mark> }
            } else {
                html! { { segment } }
            }
        })
        .collect::<Html>()
}

#[derive(Properties, PartialEq)]
pub struct SearchBarProps {
    pub search_term: String,
    pub oninput: Callback<InputEvent>,
}

#[function_component(SearchBar)]
pub fn search_bar(props: &SearchBarProps) -> Html {
    html! {
        <div class="search-bar">
            <label for="search">{ "Search sailboats:" }</label>
            <input
                type="search"
                id="search"
                autofocus=true
                autocomplete="off"
                placeholder="Name, designer, builder, year..."
                value={props.search_term.clone()}
                oninput={props.oninput.clone()}
            />
        </div>
    }
}

/// Summary line above the previews.
#[derive(Properties, PartialEq)]
pub struct SailboatResultsProps {
    pub results: Rc<Vec<SearchResult>>,
}

#[function_component(SailboatResults)]
pub fn sailboat_results(props: &SailboatResultsProps) -> Html {
    let total = props.results.len();
    html! {
        <div class="results-summary">
            { result_count_label(total) }
            if total > MAX_PREVIEWS {
                <span class="results-truncated">
                    { format!(" (showing top {})", MAX_PREVIEWS) }
                </span>
            }
        </div>
    }
}

/// Card for a single matched boat.
#[derive(Properties, PartialEq)]
pub struct SailboatPreviewProps {
    pub result: SearchResult,
    pub search_term: String,
}

#[function_component(SailboatPreview)]
pub fn sailboat_preview(props: &SailboatPreviewProps) -> Html {
    let boat = &props.result.item;
    let term = props.search_term.as_str();

    html! {
        <article class="sailboat-preview">
            <header>
                <h3>{ render_highlighted(&boat.name, term) }</h3>
                <span class="match-score">{ format_score(props.result.score) }</span>
            </header>
            <dl>
                <dt>{ "Designer" }</dt>
                <dd>{ render_highlighted(&boat.designer, term) }</dd>
                <dt>{ "Builder" }</dt>
                <dd>{ render_highlighted(&boat.builder, term) }</dd>
                <dt>{ "First built" }</dt>
                <dd>{ format_year(boat.first_built) }</dd>
                <dt>{ "Length" }</dt>
                <dd>{ format_length_ft(boat.loa_ft) }</dd>
                <dt>{ "Rig" }</dt>
                <dd>{ format!("{} · {}", boat.rig, boat.hull) }</dd>
            </dl>
        </article>
    }
}

#[derive(Properties)]
pub struct AutoCompleteProps {
    pub search_term: String,
    pub sail_data: Rc<SailData>,
    pub abort_signal: Option<AbortSignal>,
    /// Emitted with the signal id once results for that signal are on screen.
    pub on_settled: Callback<u64>,
}

// The dataset is shared and never changes, so identity is enough.
impl PartialEq for AutoCompleteProps {
    fn eq(&self, other: &Self) -> bool {
        self.search_term == other.search_term
            && Rc::ptr_eq(&self.sail_data, &other.sail_data)
            && self.abort_signal == other.abort_signal
            && self.on_settled == other.on_settled
    }
}

/// Decide whether a finished scan may replace what is on screen.
///
/// Failed scans and scans whose signal has since been aborted are dropped,
/// including memo hits that resolved after a newer transition started.
pub fn commit_outcome<T>(
    term: &str,
    outcome: Result<T, SearchError>,
    signal: Option<&AbortSignal>,
) -> Option<T> {
    match outcome {
        Ok(_) if signal.is_some_and(AbortSignal::aborted) => {
            debug!("Discarding superseded results for: {}", term);
            None
        }
        Ok(found) => Some(found),
        Err(e) => {
            debug!("{}", e);
            None
        }
    }
}

/// Runs the search for the committed term and shows the ranked results.
///
/// Results from the previous term stay visible until the new scan completes;
/// a scan whose signal was aborted never replaces them.
#[function_component(AutoComplete)]
pub fn auto_complete(props: &AutoCompleteProps) -> Html {
    let results = use_state(|| Rc::new(Vec::<SearchResult>::new()));
    // Term the displayed results belong to, used for highlighting.
    let results_term = use_state(String::new);

    {
        let results = results.clone();
        let results_term = results_term.clone();
        let sail_data = props.sail_data.clone();
        let on_settled = props.on_settled.clone();
        use_effect_with(
            (props.search_term.clone(), props.abort_signal.clone()),
            move |(term, signal)| {
                let term = term.clone();
                let signal = signal.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let outcome = cached_filter_results(&sail_data, &term, signal.as_ref()).await;
                    if let Some(found) = commit_outcome(&term, outcome, signal.as_ref()) {
                        results.set(found);
                        results_term.set(term);
                        if let Some(signal) = signal {
                            on_settled.emit(signal.id());
                        }
                    }
                });
                || ()
            },
        );
    }

    if results.is_empty() {
        return html! {};
    }

    html! {
        <>
            <SailboatResults results={(*results).clone()} />
            { for results.iter().take(MAX_PREVIEWS).map(|result| html! {
                <SailboatPreview
                    key={result.item.id.clone()}
                    result={result.clone()}
                    search_term={(*results_term).clone()}
                />
            }) }
        </>
    }
}

/// Memo size and a button to drop it.
#[derive(Properties, PartialEq)]
pub struct CacheInfoProps {
    pub cached_searches: usize,
    pub onclear: Callback<MouseEvent>,
}

#[function_component(CacheInfo)]
pub fn cache_info(props: &CacheInfoProps) -> Html {
    html! {
        <footer class="cache-info">
            <span class="cache-status">
                { format!("Cached searches: {}", props.cached_searches) }
            </span>
            <button class="btn-secondary small" onclick={props.onclear.clone()}>
                { "Clear Cache" }
            </button>
        </footer>
    }
}
