use pravaah_api::{ApiError, StationRecord};
use tracing::{debug, info, warn};

pub const EMPTY_SEARCH_MESSAGE: &str = "Please enter a station name";
pub const UPDATE_SUCCESS_MESSAGE: &str = "Amenity visibility updated successfully";
pub const SEARCH_FAILED_MESSAGE: &str = "An error occurred while searching";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update amenity visibility";

pub const NO_STATION_TITLE: &str = "No Station Selected";
pub const NO_STATION_HINT: &str = "Search for a station to view and manage its amenities";
pub const NO_AMENITIES_MESSAGE: &str = "No amenities found for this station";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// Outcome of the last visibility update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatus {
    pub kind: StatusKind,
    pub message: String,
}

/// A search the caller must execute. `seq` identifies it when the result comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub station_key: String,
}

/// A visibility write the caller must execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRequest {
    pub station_key: String,
    pub vertex_id: String,
    pub visible: bool,
}

/// Completion of a network call, delivered back to the owning view.
#[derive(Debug)]
pub enum AmenityEvent {
    SearchCompleted {
        seq: u64,
        outcome: Result<StationRecord, ApiError>,
    },
    ToggleCompleted {
        request: ToggleRequest,
        outcome: Result<(), ApiError>,
    },
}

/// One row of the derived amenity list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmenityRow {
    pub id: String,
    pub label: String,
    pub visible: bool,
}

impl AmenityRow {
    pub fn visibility_label(&self) -> &'static str {
        if self.visible { "Visible" } else { "Hidden" }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Searching,
    Loaded,
    Error,
}

/// State of the amenity management view.
///
/// All mutation goes through the methods below; network work is described by
/// the returned [`SearchTicket`] / [`ToggleRequest`] and its completion is fed
/// back through [`AmenityState::apply`].
#[derive(Debug, Default)]
pub struct AmenityState {
    search_key: String,
    result: Option<StationRecord>,
    is_loading: bool,
    last_error: Option<String>,
    last_update_status: Option<UpdateStatus>,
    latest_seq: u64,
}

impl AmenityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    pub fn set_search_key(&mut self, key: impl Into<String>) {
        self.search_key = key.into();
    }

    pub fn search_key_mut(&mut self) -> &mut String {
        &mut self.search_key
    }

    pub fn result(&self) -> Option<&StationRecord> {
        self.result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_update_status(&self) -> Option<&UpdateStatus> {
        self.last_update_status.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Searching
        } else if self.result.is_some() {
            Phase::Loaded
        } else if self.last_error.is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }

    /// Start a search for the current key.
    ///
    /// Returns `None` and sets the validation error when the key is blank.
    /// The key is sent as typed; trimming only decides whether it is blank.
    /// A search already in flight is not cancelled; its result will be
    /// dropped when it arrives.
    pub fn submit_search(&mut self) -> Option<SearchTicket> {
        if self.search_key.trim().is_empty() {
            self.last_error = Some(EMPTY_SEARCH_MESSAGE.to_string());
            return None;
        }

        self.latest_seq += 1;
        self.last_error = None;
        self.is_loading = true;

        debug!("Search #{} issued for '{}'", self.latest_seq, self.search_key);
        Some(SearchTicket {
            seq: self.latest_seq,
            station_key: self.search_key.clone(),
        })
    }

    /// Prepare a visibility flip for a displayed amenity.
    ///
    /// Scoped to the key currently in the search box, as typed. Returns `None`
    /// when no station is loaded or `vertex_id` is not one of its amenities.
    pub fn request_toggle(&self, vertex_id: &str) -> Option<ToggleRequest> {
        let vertex = self
            .result
            .as_ref()?
            .amenities()
            .find(|v| v.id == vertex_id)?;
        let visible = !vertex.visible;

        Some(ToggleRequest {
            station_key: self.search_key.clone(),
            vertex_id: vertex_id.to_string(),
            visible,
        })
    }

    /// Feed a completion back in. Returns `false` if it was stale and ignored.
    pub fn apply(&mut self, event: AmenityEvent) -> bool {
        match event {
            AmenityEvent::SearchCompleted { seq, outcome } => self.apply_search(seq, outcome),
            AmenityEvent::ToggleCompleted { request, outcome } => {
                self.apply_toggle(&request, outcome);
                true
            }
        }
    }

    pub fn apply_search(&mut self, seq: u64, outcome: Result<StationRecord, ApiError>) -> bool {
        if seq != self.latest_seq {
            debug!(
                "Dropping stale search #{} (latest is #{})",
                seq, self.latest_seq
            );
            return false;
        }

        self.is_loading = false;
        match outcome {
            Ok(record) => {
                info!("Loaded station '{}'", record.name);
                self.result = Some(record);
            }
            Err(e) => {
                warn!("Search error: {}", e);
                let message = e.to_string();
                self.last_error = Some(if message.is_empty() {
                    SEARCH_FAILED_MESSAGE.to_string()
                } else {
                    message
                });
                self.result = None;
            }
        }
        true
    }

    /// Apply a write completion to whatever station is loaded now, matching by id.
    pub fn apply_toggle(&mut self, request: &ToggleRequest, outcome: Result<(), ApiError>) {
        match outcome {
            Ok(()) => {
                if let Some(result) = self.result.as_mut()
                    && !result.set_vertex_visibility(&request.vertex_id, request.visible)
                {
                    debug!(
                        "Vertex {} not present in the loaded station",
                        request.vertex_id
                    );
                }
                self.last_update_status = Some(UpdateStatus {
                    kind: StatusKind::Success,
                    message: UPDATE_SUCCESS_MESSAGE.to_string(),
                });
            }
            Err(e) => {
                warn!("Update error for vertex {}: {}", request.vertex_id, e);
                let message = e.to_string();
                self.last_update_status = Some(UpdateStatus {
                    kind: StatusKind::Error,
                    message: if message.is_empty() {
                        UPDATE_FAILED_MESSAGE.to_string()
                    } else {
                        message
                    },
                });
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn dismiss_update_status(&mut self) {
        self.last_update_status = None;
    }

    /// Amenities of the loaded station, recomputed on every call.
    pub fn amenities(&self) -> Vec<AmenityRow> {
        let Some(result) = &self.result else {
            return Vec::new();
        };

        result
            .amenities()
            .map(|v| AmenityRow {
                id: v.id.clone(),
                label: v.display_label(),
                visible: v.visible,
            })
            .collect()
    }

    pub fn title(&self) -> String {
        match &self.result {
            Some(record) => format!("Amenities - {}", record.name),
            None => NO_STATION_TITLE.to_string(),
        }
    }
}
