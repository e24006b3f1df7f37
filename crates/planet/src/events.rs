use planetctl::protocol::{InboundMessage, MenuPayload};

#[derive(Debug, Clone)]
pub enum AppEvent {
    Open(MenuPayload),
    Hide,
    ConfigReload,
}

impl From<InboundMessage> for AppEvent {
    fn from(message: InboundMessage) -> Self {
        match message {
            InboundMessage::OpenPlanetMenu(payload) => AppEvent::Open(payload),
            InboundMessage::ClosePlanetMenu => AppEvent::Hide,
        }
    }
}
