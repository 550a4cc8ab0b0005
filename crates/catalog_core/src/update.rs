use crate::state::FilterChange;
use crate::{Effect, ListViewState, Msg, Notification};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ListViewState, msg: Msg) -> (ListViewState, Vec<Effect>) {
    // A disposed view holds no subscription and no timer; late messages are dropped.
    if state.is_disposed() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Mounted => {
            if state.mount() {
                let request_id = state.begin_cycle();
                vec![
                    Effect::SubscribePush,
                    Effect::LoadFilterOptions,
                    Effect::ScheduleFetch {
                        request_id,
                        params: state.query(),
                    },
                ]
            } else {
                Vec::new()
            }
        }
        Msg::SearchChanged(text) => on_filter_or_sort_change(&mut state, FilterChange::Search(text)),
        Msg::GenreChanged(genre) => on_filter_or_sort_change(&mut state, FilterChange::Genre(genre)),
        Msg::StatusChanged(status) => {
            on_filter_or_sort_change(&mut state, FilterChange::Status(status))
        }
        Msg::SortToggled(column) => on_filter_or_sort_change(&mut state, FilterChange::Sort(column)),
        Msg::FetchStarted { request_id } => {
            state.mark_in_flight(request_id);
            Vec::new()
        }
        Msg::FetchResolved {
            request_id,
            records,
        } => {
            // Superseded responses never replace the list.
            if state.is_current(request_id) {
                state.resolve(records);
            }
            Vec::new()
        }
        Msg::FetchFailed { request_id, error } => {
            if state.is_current(request_id) {
                state.fail();
                vec![Effect::Notify(Notification::fetch_failed(&error))]
            } else {
                Vec::new()
            }
        }
        Msg::FilterOptionsLoaded(options) => {
            state.set_genre_options(options);
            Vec::new()
        }
        Msg::FilterOptionsFailed(_) => Vec::new(),
        Msg::PushReceived(event) => {
            state.apply_push(&event.record);
            if event.status.is_terminal_success() {
                vec![Effect::Notify(Notification::enriched(&event.record.name))]
            } else {
                Vec::new()
            }
        }
        Msg::Disposed => {
            state.dispose();
            vec![Effect::Shutdown]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn on_filter_or_sort_change(state: &mut ListViewState, change: FilterChange) -> Vec<Effect> {
    if !state.apply_change(change) {
        return Vec::new();
    }
    // Inputs changed before mount are picked up by the initial fetch.
    if !state.is_mounted() {
        return Vec::new();
    }
    let request_id = state.begin_cycle();
    vec![Effect::ScheduleFetch {
        request_id,
        params: state.query(),
    }]
}
