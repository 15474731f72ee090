//! Integration tests for the carousel on a simulated host
//!
//! These tests verify the complete rotation protocol including:
//! - Slot swapping and standby preloading
//! - Parking placement per transition mode
//! - Stop/destroy cleanup and reparenting
//! - Live size changes

use anyhow::Result;
use reelswap::carousel::{CarouselEvent, CursorPolicy, RunState, TransitionMode};
use reelswap::surface::sim::{SimContainer, SimHost};
use reelswap::surface::{Point, Size, Slot, Transform};
use reelswap_integration_tests::perf_test::PerfMeasure;
use reelswap_integration_tests::{items, options, Stage, STAGE_ORIGIN, STAGE_SIZE};
use std::time::Duration;

#[test]
fn test_first_transition_right_mode() -> Result<()> {
    let mut stage = Stage::new(options(TransitionMode::Right, items(3)))?;
    stage.carousel.start();

    stage.host.finish(Slot::Zero);
    stage.carousel.pump();
    assert_eq!(stage.carousel.active(), Slot::One);

    stage.host.complete_animation(Slot::One);
    stage.carousel.pump();

    // both slots were filled at mount, so the preload takes the third item
    assert_eq!(stage.src(Slot::Zero).as_deref(), Some("clip-2.mp4"));
    assert_eq!(stage.offset(Slot::Zero), Point::new(STAGE_ORIGIN.top, STAGE_ORIGIN.left + 800.0));
    Ok(())
}

#[test]
fn test_standby_follows_playlist_order() -> Result<()> {
    let n = 5;
    let mut stage = Stage::new(options(TransitionMode::Left, items(n)))?;
    stage.carousel.start();

    for k in 1..=2 * n {
        stage.cycle();
        let expected = format!("clip-{}.mp4", (k + 1) % n);
        assert_eq!(stage.src(stage.carousel.standby()), Some(expected), "after {} transitions", k);
        let active = format!("clip-{}.mp4", k % n);
        assert_eq!(stage.src(stage.carousel.active()), Some(active));
    }

    // after length - 1 transitions the standby has wrapped to the first item
    let mut fresh = Stage::new(options(TransitionMode::Left, items(n)))?;
    fresh.carousel.start();
    for _ in 0..n - 1 {
        fresh.cycle();
    }
    assert_eq!(fresh.src(fresh.carousel.standby()).as_deref(), Some("clip-0.mp4"));
    Ok(())
}

#[test]
fn test_parked_positions_for_every_direction() -> Result<()> {
    let cases = [
        (TransitionMode::Right, Point::new(100.0, 1000.0)),
        (TransitionMode::Left, Point::new(100.0, -600.0)),
        (TransitionMode::Top, Point::new(-350.0, 200.0)),
        (TransitionMode::Bottom, Point::new(550.0, 200.0)),
    ];

    for (mode, parked) in cases {
        let mut stage = Stage::new(options(mode, items(3)))?;
        assert_eq!(stage.offset(Slot::One), parked, "mode {} at mount", mode);

        stage.carousel.start();
        stage.cycle();
        assert_eq!(stage.offset(Slot::Zero), parked, "mode {} after a transition", mode);
        assert_eq!(stage.offset(Slot::One), STAGE_ORIGIN, "mode {} active at rest", mode);
    }
    Ok(())
}

#[test]
fn test_start_stop_leaves_no_subscriptions() -> Result<()> {
    let mut stage = Stage::new(options(TransitionMode::Right, items(3)))?;
    stage.carousel.start();
    stage.carousel.stop();

    for slot in Slot::BOTH {
        let state = stage.host.surface(slot).snapshot();
        assert!(state.paused);
        assert!(state.listening.is_empty());
    }
    let active = stage.host.surface(Slot::Zero).snapshot();
    assert_eq!(active.position, Point::ORIGIN);
    assert_eq!(active.opacity, 1.0);
    assert_eq!(active.transform, Transform::None);

    stage.host.finish(Slot::Zero);
    assert_eq!(stage.carousel.pump(), 0);
    assert_eq!(stage.carousel.active(), Slot::Zero);
    Ok(())
}

#[test]
fn test_restart_resumes_on_current_slot() -> Result<()> {
    let mut stage = Stage::new(options(TransitionMode::Top, items(3)))?;
    stage.carousel.start();
    stage.cycle();
    stage.carousel.stop();
    stage.carousel.start();

    assert_eq!(stage.carousel.state(), RunState::Running);
    assert_eq!(stage.carousel.active(), Slot::One);
    assert!(!stage.host.surface(Slot::One).snapshot().paused);

    stage.cycle();
    assert_eq!(stage.carousel.active(), Slot::Zero);
    Ok(())
}

#[test]
fn test_play_during_playback_does_not_swap() -> Result<()> {
    let mut stage = Stage::new(options(TransitionMode::Bottom, items(3)))?;
    stage.carousel.start();
    stage.host.surface(Slot::Zero).advance_clock(1.0);

    for _ in 0..5 {
        stage.carousel.play();
    }
    assert_eq!(stage.carousel.active(), Slot::Zero);
    assert_eq!(stage.src(Slot::One).as_deref(), Some("clip-1.mp4"));
    assert!(stage.host.surface(Slot::One).snapshot().started.is_empty());
    Ok(())
}

#[test]
fn test_resize_mid_playback() -> Result<()> {
    let mut stage = Stage::new(options(TransitionMode::Right, items(3)))?;
    stage.carousel.start();
    stage.cycle();

    stage.carousel.set_width(640.0);
    stage.carousel.set_height(480.0);

    let viewport = stage.host.viewport.snapshot();
    assert_eq!((viewport.width, viewport.height), (640.0, 480.0));
    for slot in Slot::BOTH {
        let state = stage.host.surface(slot).snapshot();
        assert_eq!((state.width, state.height), (640.0, 480.0));
    }
    assert_eq!(stage.offset(Slot::Zero), Point::new(100.0, 840.0));
    assert_eq!(stage.carousel.active(), Slot::One);
    Ok(())
}

#[test]
fn test_derived_size_follows_container() -> Result<()> {
    let mut opts = options(TransitionMode::Right, items(2));
    opts.width = 0.0;
    opts.height = 0.0;
    let mut stage = Stage::new(opts)?;

    assert_eq!(stage.carousel.size(), STAGE_SIZE);
    assert_eq!(stage.offset(Slot::One), Point::new(100.0, 1224.0));

    stage.host.resize_container(Size::new(1920.0, 1080.0));
    stage.carousel.relayout();
    assert_eq!(stage.host.viewport.snapshot().width, 1920.0);
    assert_eq!(stage.offset(Slot::One), Point::new(100.0, 2120.0));
    Ok(())
}

#[test]
fn test_moved_container_reparks_standby() -> Result<()> {
    let mut stage = Stage::new(options(TransitionMode::Bottom, items(3)))?;
    stage.carousel.start();
    stage.cycle();
    assert_eq!(stage.offset(Slot::Zero), Point::new(550.0, 200.0));

    stage.host.move_container(Point::new(40.0, 10.0));
    stage.carousel.relayout();

    assert_eq!(stage.offset(Slot::Zero), Point::new(490.0, 10.0));
    assert_eq!(stage.offset(Slot::One), Point::new(40.0, 10.0));

    // the next entry lands on the moved viewport
    stage.cycle();
    assert_eq!(stage.offset(Slot::Zero), Point::new(40.0, 10.0));
    assert_eq!(stage.offset(Slot::One), Point::new(490.0, 10.0));
    Ok(())
}

#[test]
fn test_items_added_after_empty_build() -> Result<()> {
    let mut stage = Stage::new(options(TransitionMode::Left, Vec::new()))?;
    for item in items(3) {
        stage.carousel.add(item);
    }
    stage.carousel.start();

    assert_eq!(stage.src(Slot::Zero).as_deref(), Some("clip-0.mp4"));
    assert_eq!(stage.src(Slot::One).as_deref(), Some("clip-1.mp4"));

    stage.cycle();
    assert_eq!(stage.carousel.active(), Slot::One);
    assert_eq!(stage.src(Slot::Zero).as_deref(), Some("clip-2.mp4"));
    Ok(())
}

#[test]
fn test_reparent_running_carousel() -> Result<()> {
    let mut opts = options(TransitionMode::Right, items(3));
    opts.width = 0.0;
    opts.height = 0.0;
    let mut stage = Stage::new(opts)?;
    stage.carousel.start();

    let target = SimContainer::new("#sidebar", Point::new(0.0, 0.0), Size::new(320.0, 180.0));
    stage.carousel.set_container(Box::new(target.clone()));

    assert_eq!(stage.carousel.selector(), "#sidebar");
    assert!(stage.carousel.is_running());
    assert_eq!(stage.host.container.snapshot().viewports, 0);
    assert_eq!(target.snapshot().viewports, 1);

    let viewport = stage.host.viewport.snapshot();
    assert_eq!(viewport.attached_to.as_deref(), Some("#sidebar"));
    assert_eq!((viewport.width, viewport.height), (320.0, 180.0));
    assert_eq!(stage.offset(Slot::One), Point::new(0.0, 320.0));

    let events = stage.log.events();
    assert!(events.contains(&CarouselEvent::Reparented {
        selector: "#sidebar".to_string()
    }));
    assert_eq!(events.last(), Some(&CarouselEvent::Started { active: Slot::Zero }));
    Ok(())
}

#[test]
fn test_destroy_mid_fade() -> Result<()> {
    let mut stage = Stage::new(options(TransitionMode::Fade, items(3)))?;
    stage.carousel.start();
    stage.host.finish(Slot::Zero);
    stage.carousel.pump();
    assert!(stage.carousel.is_transitioning());

    stage.carousel.destroy();

    assert!(!stage.carousel.is_transitioning());
    assert!(!stage.host.complete_animation(Slot::One));
    assert_eq!(stage.host.surface(Slot::One).snapshot().opacity, 1.0);
    assert_eq!(stage.host.surface(Slot::Zero).snapshot().opacity, 0.0);
    assert_eq!(stage.src(Slot::Zero).as_deref(), Some("clip-2.mp4"));
    assert_eq!(stage.log.events().last(), Some(&CarouselEvent::Destroyed));
    Ok(())
}

#[test]
fn test_playlist_edits_between_transitions() -> Result<()> {
    let mut stage = Stage::new(options(TransitionMode::None, items(3)))?;
    stage.carousel.set_cursor_policy(CursorPolicy::Track);
    stage.carousel.start();

    // cursor is at clip-2; inserting before it keeps clip-2 next
    stage.carousel.insert(0, "intro.mp4")?;
    stage.cycle();
    assert_eq!(stage.src(Slot::Zero).as_deref(), Some("clip-2.mp4"));

    // the cursor wrapped before the append, so the new tail waits a full round
    stage.carousel.add("outro.mp4");
    stage.cycle();
    assert_eq!(stage.src(Slot::One).as_deref(), Some("intro.mp4"));
    assert_eq!(stage.carousel.playlist().peek(), Some("clip-0.mp4"));

    assert!(stage.carousel.delete(10).is_err());
    assert_eq!(stage.carousel.len(), 5);
    Ok(())
}

#[test]
fn test_media_error_does_not_stop_rotation() -> Result<()> {
    let mut stage = Stage::new(options(TransitionMode::Right, items(3)))?;
    stage.carousel.start();
    stage.host.fail(Slot::One, reelswap::surface::MediaError::Network);

    assert_eq!(stage.carousel.error(Some(Slot::One)).map(|e| e.code()), Some(2));
    stage.cycle();
    assert_eq!(stage.carousel.active(), Slot::One);
    Ok(())
}

#[test]
fn test_empty_playlist_is_inert() -> Result<()> {
    let mut stage = Stage::new(options(TransitionMode::Right, Vec::new()))?;
    stage.carousel.start();
    stage.carousel.play();
    stage.carousel.advance();

    assert_eq!(stage.carousel.state(), RunState::Stopped);
    assert_eq!(stage.carousel.active(), Slot::Zero);
    assert!(stage.log.events().is_empty());
    assert_eq!(stage.src(Slot::Zero), None);
    Ok(())
}

#[test]
fn test_injected_stale_completion() -> Result<()> {
    let host = SimHost::new("#stage", STAGE_ORIGIN, STAGE_SIZE);
    let mut carousel = host.build(options(TransitionMode::Right, items(3)))?;
    carousel.start();

    host.sender()
        .send(reelswap::SurfaceEvent::animation_end(Slot::One))?;
    carousel.pump();

    assert_eq!(carousel.active(), Slot::Zero);
    assert_eq!(host.surface(Slot::Zero).snapshot().src.as_deref(), Some("clip-0.mp4"));
    Ok(())
}

#[tokio::test]
async fn test_timed_rotation() -> Result<()> {
    let mut stage = Stage::new(options(TransitionMode::Fade, items(4)))?;
    stage.carousel.set_speed(Duration::from_millis(5));
    stage.carousel.start();

    let mut perf = PerfMeasure::new("transition cycle");
    for _ in 0..8 {
        tokio::time::sleep(Duration::from_millis(2)).await;
        perf.start();
        stage.host.finish(stage.carousel.active());
        stage.carousel.pump();
        tokio::time::sleep(stage.carousel.speed()).await;
        stage.host.complete_animation(stage.carousel.active());
        stage.carousel.pump();
        perf.stop();
    }
    perf.report();

    assert_eq!(perf.samples(), 8);
    assert_eq!(stage.carousel.active(), Slot::Zero);
    let completed = stage
        .log
        .events()
        .iter()
        .filter(|e| matches!(e, CarouselEvent::TransitionCompleted { .. }))
        .count();
    assert_eq!(completed, 8);
    Ok(())
}
