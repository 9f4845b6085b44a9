use serde::{Deserialize, Serialize};

/// Event channels exposed by the map facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapEventKind {
    DragStart,
    ZoomStart,
    PitchStart,
    RotateStart,
    MouseDown,
    DragEnd,
    ZoomEnd,
    PitchEnd,
    RotateEnd,
    MouseUp,
    /// Style finished loading; layer and filter mutations are safe
    StyleData,
    /// A source reported a data update
    SourceData,
}

impl MapEventKind {
    /// Gestures that mark the user as interacting
    pub const INTERACTION_START: [MapEventKind; 5] = [
        MapEventKind::DragStart,
        MapEventKind::ZoomStart,
        MapEventKind::PitchStart,
        MapEventKind::RotateStart,
        MapEventKind::MouseDown,
    ];

    /// Gestures that end an interaction
    pub const INTERACTION_END: [MapEventKind; 5] = [
        MapEventKind::DragEnd,
        MapEventKind::ZoomEnd,
        MapEventKind::PitchEnd,
        MapEventKind::RotateEnd,
        MapEventKind::MouseUp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapEventKind::DragStart => "dragstart",
            MapEventKind::ZoomStart => "zoomstart",
            MapEventKind::PitchStart => "pitchstart",
            MapEventKind::RotateStart => "rotatestart",
            MapEventKind::MouseDown => "mousedown",
            MapEventKind::DragEnd => "dragend",
            MapEventKind::ZoomEnd => "zoomend",
            MapEventKind::PitchEnd => "pitchend",
            MapEventKind::RotateEnd => "rotateend",
            MapEventKind::MouseUp => "mouseup",
            MapEventKind::StyleData => "styledata",
            MapEventKind::SourceData => "sourcedata",
        }
    }

    pub fn is_interaction_start(&self) -> bool {
        Self::INTERACTION_START.contains(self)
    }

    pub fn is_interaction_end(&self) -> bool {
        Self::INTERACTION_END.contains(self)
    }
}

impl std::fmt::Display for MapEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events emitted by the map facade
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    DragStart,
    ZoomStart,
    PitchStart,
    RotateStart,
    MouseDown,
    DragEnd,
    ZoomEnd,
    PitchEnd,
    RotateEnd,
    MouseUp,
    StyleData,
    SourceData {
        source_id: String,
        is_source_loaded: bool,
    },
}

impl MapEvent {
    /// Builds the payload-free event for a gesture or style channel
    pub fn gesture(kind: MapEventKind) -> Option<MapEvent> {
        Some(match kind {
            MapEventKind::DragStart => MapEvent::DragStart,
            MapEventKind::ZoomStart => MapEvent::ZoomStart,
            MapEventKind::PitchStart => MapEvent::PitchStart,
            MapEventKind::RotateStart => MapEvent::RotateStart,
            MapEventKind::MouseDown => MapEvent::MouseDown,
            MapEventKind::DragEnd => MapEvent::DragEnd,
            MapEventKind::ZoomEnd => MapEvent::ZoomEnd,
            MapEventKind::PitchEnd => MapEvent::PitchEnd,
            MapEventKind::RotateEnd => MapEvent::RotateEnd,
            MapEventKind::MouseUp => MapEvent::MouseUp,
            MapEventKind::StyleData => MapEvent::StyleData,
            MapEventKind::SourceData => return None,
        })
    }

    pub fn source_loaded(source_id: impl Into<String>) -> MapEvent {
        MapEvent::SourceData {
            source_id: source_id.into(),
            is_source_loaded: true,
        }
    }

    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::DragStart => MapEventKind::DragStart,
            MapEvent::ZoomStart => MapEventKind::ZoomStart,
            MapEvent::PitchStart => MapEventKind::PitchStart,
            MapEvent::RotateStart => MapEventKind::RotateStart,
            MapEvent::MouseDown => MapEventKind::MouseDown,
            MapEvent::DragEnd => MapEventKind::DragEnd,
            MapEvent::ZoomEnd => MapEventKind::ZoomEnd,
            MapEvent::PitchEnd => MapEventKind::PitchEnd,
            MapEvent::RotateEnd => MapEventKind::RotateEnd,
            MapEvent::MouseUp => MapEventKind::MouseUp,
            MapEvent::StyleData => MapEventKind::StyleData,
            MapEvent::SourceData { .. } => MapEventKind::SourceData,
        }
    }

    /// True when this event reports `source_id` as fully loaded
    pub fn is_loaded_source(&self, source_id: &str) -> bool {
        matches!(
            self,
            MapEvent::SourceData { source_id: id, is_source_loaded: true } if id == source_id
        )
    }
}
