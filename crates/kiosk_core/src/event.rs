use serde::Deserialize;
use serde_json::Value;

/// A validated scene update as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneUpdateEvent {
    /// `None` marks a speech-only update.
    pub scene_name: Option<String>,
    pub image_links: Vec<String>,
    pub review_texts: Vec<String>,
    pub speech_text: String,
}

impl SceneUpdateEvent {
    pub fn speech_only(text: impl Into<String>) -> Self {
        Self {
            speech_text: text.into(),
            ..Self::default()
        }
    }

    pub fn is_scene_change(&self) -> bool {
        self.scene_name.is_some()
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("malformed event payload: {reason}")]
    Malformed { reason: String },
}

impl EventError {
    fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            EventError::Malformed { reason } => reason,
        }
    }
}

// Wire shape: `{ "map_data": { "name", "image_links", "reviews" } | null, "say" }`.
// Missing or null fields fall back to empty values.
#[derive(Debug, Deserialize)]
struct WirePayload {
    #[serde(default)]
    map_data: Option<WireMapData>,
    #[serde(default)]
    say: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMapData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    image_links: Option<Vec<String>>,
    #[serde(default)]
    reviews: Option<Vec<String>>,
}

/// Parse and validate a raw host payload.
pub fn parse_event(raw: &str) -> Result<SceneUpdateEvent, EventError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| EventError::malformed(err.to_string()))?;

    // serde accepts sequences for structs; the wire format only allows objects.
    let Value::Object(root) = &value else {
        return Err(EventError::malformed("payload root is not an object"));
    };
    match root.get("map_data") {
        None | Some(Value::Null) | Some(Value::Object(_)) => {}
        Some(_) => return Err(EventError::malformed("map_data is not an object")),
    }

    let payload: WirePayload =
        serde_json::from_value(value).map_err(|err| EventError::malformed(err.to_string()))?;

    let speech_text = payload.say.unwrap_or_default();
    let Some(map) = payload.map_data else {
        return Ok(SceneUpdateEvent::speech_only(speech_text));
    };

    let scene_name = map.name.filter(|name| !name.is_empty());
    if scene_name.is_none() {
        return Ok(SceneUpdateEvent::speech_only(speech_text));
    }

    Ok(SceneUpdateEvent {
        scene_name,
        image_links: map.image_links.unwrap_or_default(),
        review_texts: map.reviews.unwrap_or_default(),
        speech_text,
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_event, EventError, SceneUpdateEvent};
    use pretty_assertions::assert_eq;

    #[test]
    fn full_scene_payload_is_parsed() {
        let raw = r#"{
            "map_data": {"name": "Gallery A", "image_links": ["u1", "u2"], "reviews": ["nice"]},
            "say": "Welcome"
        }"#;
        let event = parse_event(raw).unwrap();
        assert_eq!(
            event,
            SceneUpdateEvent {
                scene_name: Some("Gallery A".to_string()),
                image_links: vec!["u1".to_string(), "u2".to_string()],
                review_texts: vec!["nice".to_string()],
                speech_text: "Welcome".to_string(),
            }
        );
        assert!(event.is_scene_change());
    }

    #[test]
    fn null_map_data_is_speech_only() {
        let event = parse_event(r#"{"map_data": null, "say": "Hi"}"#).unwrap();
        assert_eq!(event, SceneUpdateEvent::speech_only("Hi"));
        assert!(!event.is_scene_change());
    }

    #[test]
    fn empty_scene_name_is_speech_only() {
        let raw = r#"{"map_data": {"name": "", "image_links": ["u1"]}, "say": "Hi"}"#;
        let event = parse_event(raw).unwrap();
        assert_eq!(event, SceneUpdateEvent::speech_only("Hi"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let event = parse_event(r#"{"map_data": {"name": "Hall", "reviews": null}}"#).unwrap();
        assert_eq!(event.scene_name.as_deref(), Some("Hall"));
        assert!(event.image_links.is_empty());
        assert!(event.review_texts.is_empty());
        assert_eq!(event.speech_text, "");
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        for raw in [
            "not json",
            "[1, 2]",
            r#""just a string""#,
            r#"{"map_data": 5, "say": "x"}"#,
            r#"{"map_data": ["Hall", [], []], "say": "x"}"#,
            r#"{"map_data": {"name": "Hall", "image_links": "u1"}}"#,
            r#"{"say": 7}"#,
        ] {
            let err = parse_event(raw).unwrap_err();
            assert!(matches!(err, EventError::Malformed { .. }), "{raw}");
            assert!(!err.reason().is_empty());
        }
    }
}
