#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host delivered a raw scene-update payload.
    PayloadReceived(String),
    /// The scene-change pipeline started by the last accepted event has finished.
    SceneFinished,
}
