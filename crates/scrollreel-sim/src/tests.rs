#[cfg(test)]
mod tests {
    use crate::*;
    use scrollreel_core::Size;
    use scrollreel_engine::{
        ContentSize, DeviceClass, EngineConfig, EngineError, Item, ItemList, Phase,
        ScrollDirection, Snapshot, ViewerStatus,
    };
    use web_time::Duration;

    const SECTION: f32 = 2400.0;
    const TOUCH_SECTION: f32 = 3200.0;

    fn items(key: u64, n: u64) -> ItemList {
        ItemList::new(key, (0..n).map(|i| Item::new(i, format!("Item {i}"))).collect())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn desktop() -> Size {
        Size {
            width: 1280.0,
            height: 800.0,
        }
    }

    fn phone() -> Size {
        Size {
            width: 390.0,
            height: 800.0,
        }
    }

    fn pointer(n: u64) -> Harness {
        Harness::new(EngineConfig::fixed(DeviceClass::Pointer), items(1, n), desktop())
    }

    /// Touch class picked by the default width breakpoint.
    fn touch(n: u64) -> Harness {
        Harness::new(EngineConfig::default(), items(1, n), phone())
    }

    fn section_start(i: usize, height: f32) -> f32 {
        HEADER_HEIGHT + i as f32 * height
    }

    fn assert_well_formed(trace: &[Snapshot]) {
        for s in trace {
            assert!(s.active_index < s.item_count.max(1), "index out of range: {s:?}");
            assert!((0.0..=1.0).contains(&s.scroll_progress), "{s:?}");
            assert!((0.0..=1.0).contains(&s.transition_progress), "{s:?}");
            assert_eq!(
                s.is_programmatic_scroll_locked, s.is_visibility_locked,
                "locks diverged: {s:?}"
            );
            if s.transition_progress > 0.0 {
                assert!(
                    s.is_at_bottom
                        && s.active_index + 1 < s.item_count
                        && s.scroll_direction == ScrollDirection::Down,
                    "pull without a reachable next item: {s:?}"
                );
            }
        }
    }

    #[test]
    fn test_forward_scroll_through_a_section_switches_once() {
        let mut h = pointer(5);
        h.scroll_to(section_start(1, SECTION), 40.0);
        h.idle(ms(300));

        assert_eq!(h.commits(), vec![1]);
        let history = h.history();
        assert_eq!(history.first(), Some(&0));
        assert_eq!(history.last(), Some(&1));
        assert!(history.windows(2).all(|w| w[1] == w[0] || w[1] == w[0] + 1));

        let s = h.snapshot();
        assert!(s.scroll_progress < 0.01);
        assert!(s.is_at_top);
        assert_eq!(s.phase, Phase::Idle);
        assert_well_formed(h.trace());
    }

    #[test]
    fn test_nav_click_locks_for_settle_window() {
        let mut h = pointer(5);
        h.click_nav(3).unwrap();
        let clicked = h.trace().len() - 1;

        let s = h.snapshot();
        assert_eq!(s.active_index, 3);
        assert!(s.is_programmatic_scroll_locked && s.is_visibility_locked);

        // 49 frames of 16ms: still inside the 800ms window.
        for _ in 0..49 {
            h.tick();
            let s = h.snapshot();
            assert!(s.is_programmatic_scroll_locked && s.is_visibility_locked);
            assert_eq!(s.active_index, 3);
        }
        h.tick();
        let s = h.snapshot();
        assert!(!s.is_programmatic_scroll_locked && !s.is_visibility_locked);

        h.idle(ms(500));
        assert!(h.trace()[clicked..].iter().all(|s| s.active_index == 3));
        assert_eq!(h.commits(), vec![3]);
        assert!(!h.is_scrolling());
        assert!((h.page().offset() - (section_start(3, SECTION) - 10.0)).abs() < 0.5);
        assert_well_formed(h.trace());
    }

    #[test]
    fn test_touch_pause_without_lift_discards_pull() {
        let mut h = touch(5);
        assert_eq!(h.viewer().engine().device_class(), DeviceClass::Touch);
        assert_eq!(h.viewer().section_layout()[0].extent, TOUCH_SECTION);

        h.touch_start();
        h.scroll_to(HEADER_HEIGHT + 0.77 * TOUCH_SECTION, 32.0);
        let s = h.snapshot();
        assert_eq!(s.phase, Phase::Pulling);
        assert!((s.transition_progress - 0.9).abs() < 0.01);

        h.idle(ms(200));
        let s = h.snapshot();
        assert_eq!(s.transition_progress, 0.0);
        assert_eq!(s.active_index, 0);
        assert!(h.commits().is_empty());

        // Lifting afterwards has nothing left to commit.
        h.touch_end();
        h.idle(ms(300));
        assert!(h.commits().is_empty());
        assert_well_formed(h.trace());
    }

    #[test]
    fn test_shrinking_list_clamps_and_remeasures() {
        let mut h = pointer(5);
        h.click_nav(4).unwrap();
        h.idle(ms(900));
        assert!(!h.snapshot().is_visibility_locked);
        let generation = h.viewer().engine().geometry().generation();

        h.replace_items(items(1, 2));
        let s = h.snapshot();
        assert_eq!(s.active_index, 1);
        assert_eq!(s.item_count, 2);
        assert!(!s.is_programmatic_scroll_locked && !s.is_visibility_locked);
        assert_eq!(h.viewer().section_layout().len(), 2);
        assert!(h.viewer().engine().geometry().generation() > generation);
        assert!(!h.viewer().engine().is_measure_requested());
        assert_eq!(h.commits(), vec![4, 1]);

        h.idle(ms(300));
        let s = h.snapshot();
        assert_eq!(s.active_index, 1);
        assert!(!s.is_visibility_locked);
        assert!((h.page().offset() - (section_start(1, SECTION) - 10.0)).abs() < 0.5);
        assert_well_formed(h.trace());
    }

    #[test]
    fn test_list_change_mid_transition_releases_locks() {
        let mut h = pointer(5);
        h.click_nav(4).unwrap();
        h.tick();
        h.tick();
        assert!(h.snapshot().is_programmatic_scroll_locked);

        h.replace_items(items(1, 2));
        assert!(!h.snapshot().is_programmatic_scroll_locked);
        assert!(!h.is_scrolling());

        h.idle(ms(1000));
        let s = h.snapshot();
        assert_eq!(s.active_index, 1);
        assert!(!s.is_programmatic_scroll_locked && !s.is_visibility_locked);
        assert_eq!(h.commits(), vec![4, 1]);
        assert_well_formed(h.trace());
    }

    #[test]
    fn test_new_list_starts_from_the_top() {
        let mut h = pointer(5);
        h.click_nav(2).unwrap();
        h.idle(ms(900));

        h.replace_items(items(2, 5));
        h.idle(ms(200));
        let s = h.snapshot();
        assert_eq!(s.active_index, 0);
        assert!(s.is_at_top);
        assert_eq!(h.page().offset(), section_start(0, SECTION) - 10.0);
        assert_eq!(h.commits(), vec![2, 0]);
    }

    #[test]
    fn test_forward_pull_commits_exactly_once() {
        let mut h = pointer(4);
        h.scroll_to(HEADER_HEIGHT + 0.75 * SECTION, 30.0);
        let s = h.snapshot();
        assert_eq!(s.phase, Phase::Pulling);
        assert!((s.transition_progress - 0.75).abs() < 1e-3);

        let highlight = h.viewer().highlight();
        assert!((highlight.offset - (16.0 + 0.75 * 96.0)).abs() < 0.1);

        h.idle(ms(1200));
        assert_eq!(h.commits(), vec![1]);
        let s = h.snapshot();
        assert_eq!(s.active_index, 1);
        assert!(s.is_at_top);
        assert_eq!(h.page().inner_offset(1), 0.0);
        assert!(!s.is_visibility_locked);
        assert!(h.history().iter().all(|&i| i <= 1));
        assert_well_formed(h.trace());
    }

    #[test]
    fn test_previous_arrives_at_content_bottom() {
        let mut h = pointer(4);
        h.click_nav(2).unwrap();
        h.idle(ms(900));

        h.navigate_previous().unwrap();
        let s = h.snapshot();
        assert_eq!(s.active_index, 1);
        assert!(s.is_at_bottom);
        assert_eq!(h.page().inner_offset(1), h.page().content_size(1).max_offset());

        h.idle(ms(900));
        assert!(h.snapshot().is_at_bottom);
        assert_eq!(h.commits(), vec![2, 1]);
    }

    #[test]
    fn test_progress_is_monotonic_within_a_section() {
        let mut h = pointer(3);
        h.scroll_to(1900.0, 20.0);

        let progress: Vec<f32> = h
            .trace()
            .iter()
            .filter(|s| s.active_index == 0)
            .map(|s| s.scroll_progress)
            .collect();
        assert!(progress.len() > 50);
        assert!(progress.windows(2).all(|w| w[1] >= w[0]));
        assert!(progress.last().copied().unwrap_or(0.0) > 0.7);
    }

    #[test]
    fn test_repeated_offset_keeps_direction() {
        let mut h = pointer(3);
        h.scroll_to(1000.0, 50.0);
        assert_eq!(h.snapshot().scroll_direction, ScrollDirection::Down);
        h.scroll_to(600.0, 50.0);
        assert_eq!(h.snapshot().scroll_direction, ScrollDirection::Up);

        h.scroll_event(600.0);
        h.tick();
        assert_eq!(h.snapshot().scroll_direction, ScrollDirection::Up);
    }

    #[test]
    fn test_resize_reclassifies_device() {
        let mut h = Harness::new(EngineConfig::default(), items(1, 3), desktop());
        assert_eq!(h.viewer().engine().device_class(), DeviceClass::Pointer);
        assert_eq!(h.viewer().section_layout()[0].extent, SECTION);

        h.resize(phone());
        assert_eq!(h.viewer().engine().device_class(), DeviceClass::Touch);
        assert_eq!(h.viewer().section_layout()[0].extent, TOUCH_SECTION);
        assert_eq!(h.viewer().section_layout()[2].offset, section_start(2, TOUCH_SECTION));
    }

    #[test]
    fn test_content_resize_keeps_inner_in_range() {
        let mut h = pointer(3);
        h.scroll_to(HEADER_HEIGHT + 0.65 * SECTION, 40.0);
        assert!(h.snapshot().is_at_bottom);
        assert_eq!(h.page().inner_offset(0), 900.0);

        h.resize_content(0, ContentSize::new(1000.0, 600.0));
        assert_eq!(h.page().inner_offset(0), 400.0);
        assert!(h.snapshot().is_at_bottom);
    }

    #[test]
    fn test_content_growth_cancels_pending_pull() {
        let mut h = pointer(4);
        h.scroll_to(HEADER_HEIGHT + 0.75 * SECTION, 30.0);
        assert_eq!(h.snapshot().phase, Phase::Pulling);

        h.resize_content(0, ContentSize::new(20000.0, 600.0));
        let s = h.snapshot();
        assert!(!s.is_at_bottom);
        assert_eq!(s.transition_progress, 0.0);
        assert_eq!(s.phase, Phase::Idle);
        assert_eq!(h.page().inner_offset(0), 900.0);

        h.idle(ms(300));
        assert!(h.commits().is_empty());
        assert_eq!(h.snapshot().active_index, 0);
        assert_well_formed(h.trace());
    }

    #[test]
    fn test_viewport_resize_rederives_pull() {
        let mut h = Harness::new(EngineConfig::default(), items(1, 4), desktop());
        h.scroll_to(HEADER_HEIGHT + 0.75 * SECTION, 30.0);
        assert!((h.snapshot().transition_progress - 0.75).abs() < 1e-3);

        // Same page offset, taller touch sections: less progress, and the
        // pull is measured against the touch zone.
        h.resize(phone());
        let s = h.snapshot();
        assert_eq!(h.viewer().engine().device_class(), DeviceClass::Touch);
        assert!((s.scroll_progress - 0.5625).abs() < 1e-4);
        assert!(s.is_at_bottom);
        assert_eq!(s.phase, Phase::Pulling);
        assert!((s.transition_progress - 0.0625 / 0.3).abs() < 1e-3);

        h.idle(ms(300));
        assert!(h.commits().is_empty());
        assert_well_formed(h.trace());
    }

    #[test]
    fn test_resize_mid_jump_keeps_locked_target() {
        let mut h = pointer(5);
        h.click_nav(3).unwrap();
        let clicked = h.trace().len() - 1;
        let target = section_start(3, SECTION) - 10.0;
        assert_eq!(h.scroll_target(), target);

        for _ in 0..3 {
            h.tick();
        }
        h.resize(phone());
        assert_eq!(h.viewer().section_layout()[0].extent, TOUCH_SECTION);
        assert_eq!(h.scroll_target(), target);

        // 3 + 46 frames: still inside the 800ms window.
        for _ in 0..46 {
            h.tick();
            let s = h.snapshot();
            assert!(s.is_programmatic_scroll_locked && s.is_visibility_locked);
            assert_eq!(s.active_index, 3);
            assert_eq!(h.scroll_target(), target);
        }
        h.tick();
        assert!(!h.snapshot().is_visibility_locked);

        h.idle(ms(300));
        assert!(h.trace()[clicked..].iter().all(|s| s.active_index == 3));
        assert_eq!(h.commits(), vec![3]);
        assert!((h.page().offset() - target).abs() < 0.5);
        assert_well_formed(h.trace());
    }

    #[test]
    fn test_empty_list_is_a_distinct_state() {
        let mut h = Harness::new(EngineConfig::default(), items(1, 0), desktop());
        assert_eq!(h.snapshot().status, ViewerStatus::Empty);
        assert_eq!(h.click_nav(0), Err(EngineError::EmptyList));

        h.scroll_to(500.0, 50.0);
        h.idle(ms(200));
        assert_eq!(h.page().offset(), 0.0);
        assert!(h.commits().is_empty());

        h.replace_items(items(1, 3));
        assert_eq!(h.snapshot().status, ViewerStatus::Ready);
        h.idle(ms(200));
        assert_eq!(h.viewer().section_layout().len(), 3);
    }

    #[test]
    fn test_state_stays_well_formed_over_a_mixed_session() {
        let mut h = pointer(5);
        h.scroll_to(5000.0, 48.0);
        h.idle(ms(200));
        h.scroll_to(1000.0, 64.0);
        h.click_nav(4).unwrap();
        h.idle(ms(300));
        h.scroll_by(-600.0, 40.0);
        h.idle(ms(900));
        h.navigate_previous().unwrap();
        h.replace_items(items(1, 3));
        h.scroll_to(0.0, 80.0);
        h.idle(ms(200));
        h.replace_items(items(2, 0));
        h.idle(ms(200));

        assert_eq!(h.snapshot().status, ViewerStatus::Empty);
        assert!(h.update_count() > 0);
        assert_well_formed(h.trace());
        h.unmount();
    }
}
