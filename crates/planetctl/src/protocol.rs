//! Line-delimited JSON spoken between the host and the overlay.
//!
//! The host writes one [`InboundMessage`] per line; the overlay answers every
//! connected client with one [`HostRequest`] per line.

use crate::icon::IconId;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/planet.sock";

pub const OPEN_MENU: &str = "openPlanetMenu";
pub const CLOSE_MENU: &str = "closePlanetMenu";

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Label(String);

crate::impl_string_newtype!(Label);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub icon: IconId,
    pub label: Label,
}

impl MenuItem {
    pub fn new(icon: impl Into<IconId>, label: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            label: Label::new(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MenuPayload {
    pub items: Vec<MenuItem>,
    /// Sub-menu marker. Accepted and kept, not acted on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<bool>,
}

impl MenuPayload {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items, sub: None }
    }

    /// Five-item menu for previewing the overlay by hand.
    pub fn debug_sample() -> Self {
        Self {
            items: vec![
                MenuItem::new("palette", "Paint"),
                MenuItem::new("warehouse", "Garage"),
                MenuItem::new("palette", "Quite long text"),
                MenuItem::new("palette", "Paint"),
                MenuItem::new("warehouse", "Garage"),
            ],
            sub: Some(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "data")]
pub enum InboundMessage {
    #[serde(rename = "openPlanetMenu")]
    OpenPlanetMenu(MenuPayload),
    #[serde(rename = "closePlanetMenu")]
    ClosePlanetMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", content = "data")]
pub enum HostRequest {
    /// The user picked the item at this index.
    #[serde(rename = "planetClick")]
    PlanetClick(usize),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid '{action}' payload: {source}")]
    Payload {
        action: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown action '{0}'")]
    UnknownAction(String),
}

#[derive(Deserialize)]
struct Envelope {
    action: String,
    #[serde(default)]
    data: serde_json::Value,
}

pub fn parse_inbound(line: &str) -> Result<InboundMessage, ProtocolError> {
    let envelope: Envelope = serde_json::from_str(line)?;

    match envelope.action.as_str() {
        OPEN_MENU => serde_json::from_value(envelope.data)
            .map(InboundMessage::OpenPlanetMenu)
            .map_err(|source| ProtocolError::Payload {
                action: envelope.action,
                source,
            }),
        CLOSE_MENU => Ok(InboundMessage::ClosePlanetMenu),
        _ => Err(ProtocolError::UnknownAction(envelope.action)),
    }
}

pub fn parse_request(line: &str) -> Result<HostRequest, ProtocolError> {
    Ok(serde_json::from_str(line)?)
}

/// Serializes `message` as a single newline-terminated line.
pub fn encode_line<T: Serialize>(message: &T) -> Result<String, ProtocolError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}
