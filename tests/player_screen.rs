#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use ratatui::backend::TestBackend;
    use tiny_player::audio::controller::PlaybackViewState;
    use tiny_player::audio::PlayerPhase;
    use tiny_player::tui::Tui;
    use tiny_player::types::{format_time, AppResult};
    use tiny_player::ui::player_panel::PlayerSnapshot;
    use tiny_player::ui::ui::Ui;

    fn screen_rows(tui: &Tui<TestBackend>) -> Vec<String> {
        let buffer = tui.terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect_vec()
    }

    #[test]
    fn test_halfway_through_a_track() -> AppResult<()> {
        let view = PlaybackViewState {
            is_playing: true,
            is_buffering: false,
            position_ms: 90_000,
            duration_ms: 180_000,
        };
        assert_eq!(view.progress(), 0.5);
        assert_eq!(format_time(view.position_ms), "1:30");

        let snapshot = PlayerSnapshot {
            view,
            phase: PlayerPhase::Playing,
            track_name: "sample.mp3".into(),
        };
        let mut tui = Tui::headless(TestBackend::new(80, 20))?;
        let mut ui = Ui::new(5_000);
        tui.draw(&mut ui, &snapshot)?;

        let rows = screen_rows(&tui);
        let progress_row = rows
            .iter()
            .find(|row| row.contains("1:30"))
            .ok_or_else(|| anyhow::anyhow!("no progress row"))?;
        assert!(progress_row.contains("3:00"));
        assert!(progress_row.contains('━'));
        assert!(progress_row.contains('─'));
        Ok(())
    }

    #[test]
    fn test_unknown_duration_renders_empty_bar() -> AppResult<()> {
        let snapshot = PlayerSnapshot {
            view: PlaybackViewState::default(),
            phase: PlayerPhase::Unloaded,
            track_name: "missing.ogg".into(),
        };
        assert_eq!(snapshot.view.progress(), 0.0);

        let mut tui = Tui::headless(TestBackend::new(64, 14))?;
        let mut ui = Ui::new(5_000);
        tui.draw(&mut ui, &snapshot)?;

        let rows = screen_rows(&tui);
        assert!(rows.iter().any(|row| row.contains("Audio unavailable")));
        assert!(rows.iter().all(|row| !row.contains('━')));
        Ok(())
    }
}
