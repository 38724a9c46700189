use crate::SceneUpdateEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the speech bubble text; an empty text hides the bubble.
    ShowSpeech { text: String },
    /// Start a picture-frame crossfade without waiting for it.
    AdvanceFrame,
    /// Run the full cover / prefetch / apply / reveal pipeline.
    RunSceneChange(SceneUpdateEvent),
    /// The event was rejected and nothing else happens for it.
    EventDropped { reason: DropReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    Busy,
    Malformed(String),
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::Busy => write!(f, "a scene change is still in progress"),
            DropReason::Malformed(reason) => write!(f, "malformed payload ({reason})"),
        }
    }
}
