// Landing page tool catalog and in-app routes

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const DASHBOARD_HEADING: &str = "Welcome to SIH Admin Dashboard";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read tools file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse tools file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No tools defined in {0}")]
    Empty(PathBuf),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Invalid tool URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to open {url}: {source}")]
    Open {
        url: String,
        source: std::io::Error,
    },
}

/// A card on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub is_external: bool,
}

/// Views reachable by in-app navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Amenities,
}

/// What activating a card does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolAction {
    /// Open in the system browser, a separate process with no handle back to us.
    OpenExternal(Url),
    Navigate(Route),
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Amenities => "/amenities",
        }
    }

    pub fn from_path(path: &str) -> Result<Route, CatalogError> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        match normalized {
            "/" | "" => Ok(Route::Dashboard),
            "/amenities" => Ok(Route::Amenities),
            _ => Err(CatalogError::UnknownRoute(path.to_string())),
        }
    }
}

impl ToolDescriptor {
    pub fn new(title: &str, description: &str, url: &str, is_external: bool) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            url: url.to_string(),
            is_external,
        }
    }

    pub fn action(&self) -> Result<ToolAction, CatalogError> {
        if !self.is_external {
            return Route::from_path(&self.url).map(ToolAction::Navigate);
        }

        let url = Url::parse(&self.url).map_err(|e| CatalogError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(ToolAction::OpenExternal(url)),
            other => Err(CatalogError::InvalidUrl {
                url: self.url.clone(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    pub fn call_to_action(&self) -> &'static str {
        if self.is_external {
            "Open Tool"
        } else {
            "View Details"
        }
    }
}

pub fn default_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "SVG Mapper",
            "Create and manage interactive SVG maps with our mapping tool.",
            "https://svg-mapper.pravaah.xyz",
            true,
        ),
        ToolDescriptor::new(
            "SVG Creator",
            "Design and generate custom SVG elements for your projects.",
            "https://svg-creator-pi.vercel.app",
            true,
        ),
        ToolDescriptor::new(
            "3D Mapper",
            "Create and manipulate 3D maps and models.",
            "https://3d-mapper.pravaah.xyz",
            true,
        ),
        ToolDescriptor::new(
            "Database Entry",
            "Manage and edit database records through a user-friendly interface.",
            "https://db.pravaah.xyz",
            true,
        ),
        ToolDescriptor::new(
            "API Backend",
            "Monitor and control API services and endpoints.",
            "https://api.pravaah.xyz",
            true,
        ),
        ToolDescriptor::new(
            "Amenities Availability",
            "Track and manage amenities availability status.",
            Route::Amenities.path(),
            false,
        ),
    ]
}

/// Load a catalog from a JSON array of tool descriptors.
///
/// Every entry must resolve to a valid action.
pub fn load_tools(path: &Path) -> Result<Vec<ToolDescriptor>, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let tools: Vec<ToolDescriptor> =
        serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if tools.is_empty() {
        return Err(CatalogError::Empty(path.to_path_buf()));
    }

    for tool in &tools {
        tool.action()?;
    }

    Ok(tools)
}

/// Case-insensitive lookup by title.
pub fn find_tool<'a>(tools: &'a [ToolDescriptor], title: &str) -> Option<&'a ToolDescriptor> {
    let needle = title.trim();
    tools.iter().find(|t| t.title.eq_ignore_ascii_case(needle))
}

pub fn open_external(url: &Url) -> Result<(), CatalogError> {
    open::that(url.as_str()).map_err(|source| CatalogError::Open {
        url: url.to_string(),
        source,
    })
}
