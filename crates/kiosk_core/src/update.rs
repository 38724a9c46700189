use crate::{parse_event, AppState, DropReason, Effect, Msg, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PayloadReceived(raw) => {
            state.record_received();
            // Busy is a strict block: events are dropped, never queued.
            if state.session() == SessionState::Busy {
                return drop_event(state, DropReason::Busy);
            }
            let event = match parse_event(&raw) {
                Ok(event) => event,
                Err(err) => {
                    return drop_event(state, DropReason::Malformed(err.reason().to_string()));
                }
            };

            match event.scene_name.clone() {
                None => {
                    state.record_processed();
                    vec![
                        Effect::ShowSpeech {
                            text: event.speech_text,
                        },
                        Effect::AdvanceFrame,
                    ]
                }
                Some(name) => {
                    if !state.begin_scene(&name) {
                        return drop_event(state, DropReason::Busy);
                    }
                    vec![Effect::RunSceneChange(event)]
                }
            }
        }
        Msg::SceneFinished => {
            if state.finish_scene() {
                state.record_processed();
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn drop_event(mut state: AppState, reason: DropReason) -> (AppState, Vec<Effect>) {
    state.record_drop(reason.clone());
    (state, vec![Effect::EventDropped { reason }])
}
