mod common;

use std::sync::Arc;
use std::time::Duration;

use common::init_logging;
use kiosk_engine::{ScreenModel, TransitionSequencer, TransitionSettings, UiCommand};
use tokio::time::Instant;

fn settings(panel_count: usize) -> TransitionSettings {
    TransitionSettings {
        panel_count,
        step_delay: Duration::from_millis(200),
        hold_delay: Duration::from_millis(500),
    }
}

fn panel_commands(screen: &ScreenModel) -> Vec<(usize, bool)> {
    screen
        .commands()
        .into_iter()
        .filter_map(|recorded| match recorded.command {
            UiCommand::SetPanelVisible { index, visible } => Some((index, visible)),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn panels_start_hidden() {
    init_logging();
    let screen = Arc::new(ScreenModel::recording());
    let sequencer = TransitionSequencer::new(settings(3), screen.clone());

    assert_eq!(sequencer.visible_panels(), vec![false; 3]);
    assert_eq!(screen.snapshot().panels, vec![false; 3]);
}

#[tokio::test(start_paused = true)]
async fn cover_shows_each_panel_then_holds() {
    init_logging();
    let screen = Arc::new(ScreenModel::recording());
    let sequencer = TransitionSequencer::new(settings(4), screen.clone());

    let started = Instant::now();
    sequencer.cover().await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(4 * 200 + 500), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(4 * 200 + 500 + 20), "{elapsed:?}");
    assert_eq!(sequencer.visible_panels(), vec![true; 4]);
    assert!(screen.snapshot().is_covered());

    let shown: Vec<_> = panel_commands(&screen).into_iter().skip(4).collect();
    assert_eq!(shown, vec![(0, true), (1, true), (2, true), (3, true)]);
}

#[tokio::test(start_paused = true)]
async fn panels_are_spaced_by_step_delay() {
    init_logging();
    let screen = Arc::new(ScreenModel::recording());
    let sequencer = TransitionSequencer::new(settings(3), screen.clone());

    sequencer.cover().await;
    let times: Vec<_> = screen
        .commands()
        .into_iter()
        .filter(|recorded| {
            matches!(
                recorded.command,
                UiCommand::SetPanelVisible { visible: true, .. }
            )
        })
        .map(|recorded| recorded.at)
        .collect();

    assert_eq!(times.len(), 3);
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(200));
    }
}

#[tokio::test(start_paused = true)]
async fn reveal_hides_in_same_order_without_hold() {
    init_logging();
    let screen = Arc::new(ScreenModel::recording());
    let sequencer = TransitionSequencer::new(settings(3), screen.clone());
    sequencer.cover().await;

    let started = Instant::now();
    sequencer.reveal().await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(600), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(620), "{elapsed:?}");
    assert_eq!(sequencer.visible_panels(), vec![false; 3]);

    let hidden: Vec<_> = panel_commands(&screen).into_iter().skip(6).collect();
    assert_eq!(hidden, vec![(0, false), (1, false), (2, false)]);
}

#[tokio::test(start_paused = true)]
async fn zero_panels_only_wait_for_hold() {
    init_logging();
    let screen = Arc::new(ScreenModel::recording());
    let sequencer = TransitionSequencer::new(settings(0), screen.clone());

    let started = Instant::now();
    sequencer.cover().await;
    assert!(started.elapsed() >= Duration::from_millis(500));

    let started = Instant::now();
    sequencer.reveal().await;
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(screen.commands().is_empty());
}
