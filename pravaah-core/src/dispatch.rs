use crate::amenities::{AmenityEvent, AmenityState, SearchTicket, ToggleRequest};
use pravaah_api::StationClient;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

pub type EventSender = mpsc::UnboundedSender<AmenityEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<AmenityEvent>;

/// Create a channel pair for delivering completions to a view.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Run a search in the background and post the completion to `tx`.
pub fn spawn_search(client: &StationClient, ticket: SearchTicket, tx: EventSender) -> JoinHandle<()> {
    let client = client.clone();
    tokio::spawn(async move {
        let outcome = client.search_station(&ticket.station_key).await;
        if tx
            .send(AmenityEvent::SearchCompleted {
                seq: ticket.seq,
                outcome,
            })
            .is_err()
        {
            debug!("Search #{} finished after its view closed", ticket.seq);
        }
    })
}

/// Run a visibility update in the background and post the completion to `tx`.
pub fn spawn_toggle(client: &StationClient, request: ToggleRequest, tx: EventSender) -> JoinHandle<()> {
    let client = client.clone();
    tokio::spawn(async move {
        let outcome = client
            .set_amenity_visibility(&request.station_key, &request.vertex_id, request.visible)
            .await
            .map(|_| ());
        if tx
            .send(AmenityEvent::ToggleCompleted { request, outcome })
            .is_err()
        {
            debug!("Toggle finished after its view closed");
        }
    })
}

/// Submit and await one search in place. Returns `false` when the key was rejected.
pub async fn run_search(client: &StationClient, state: &mut AmenityState) -> bool {
    let Some(ticket) = state.submit_search() else {
        return false;
    };
    let outcome = client.search_station(&ticket.station_key).await;
    state.apply_search(ticket.seq, outcome);
    true
}

/// Toggle one amenity of the loaded station in place. Returns `false` when
/// nothing was sent.
pub async fn run_toggle(client: &StationClient, state: &mut AmenityState, vertex_id: &str) -> bool {
    let Some(request) = state.request_toggle(vertex_id) else {
        return false;
    };
    let outcome = client
        .set_amenity_visibility(&request.station_key, &request.vertex_id, request.visible)
        .await
        .map(|_| ());
    state.apply_toggle(&request, outcome);
    true
}
