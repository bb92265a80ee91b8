use crate::config::VizConfig;
use crate::error::RenderError;
use crate::render::RenderOutcome;
use crate::session::{MemorySink, PlaybackState, Session};
use crate::sim::{SimTime, Simulator};
use image::Rgba;

fn cfg() -> VizConfig {
    VizConfig {
        canvas_px: 32,
        scale: 1,
        ..VizConfig::default()
    }
}

fn session(text: &str) -> Session {
    let mut s = Session::new(cfg()).expect("session");
    s.load_text(text);
    s
}

const THREE: &str = "\
Evaluating f at 1,1
Compiling f
Evaluating g at 2,2
Evaluating f at 3,3
";

#[test]
fn load_discovers_entities_and_creates_surfaces() {
    let s = session(THREE);
    assert_eq!(s.events().len(), 3);
    assert_eq!(s.entities(), ["f", "g"]);
    assert_eq!(s.registry().len(), 2);
    assert!(s.registry().get("f").is_some());
    assert_eq!(s.cursor().position(), 0);
    assert_eq!(s.state(), PlaybackState::Idle);
}

#[test]
fn single_evaluating_line_draws_one_marker() {
    let mut s = session("Evaluating f_1 at 2,3\n");
    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.run(&mut s);

    assert_eq!(s.registry().len(), 1);
    let surface = s.registry().lookup("f_1").expect("surface");
    assert_eq!(surface.pixel(2, 3), Some(Rgba(cfg().active)));
    assert_eq!(s.stats().drawn, 1);
}

#[test]
fn ticks_dispatch_one_event_each_in_source_order() {
    let mut s = session(THREE);
    let mut sim = Simulator::default();
    s.start(&mut sim);
    assert!(s.has_pending_tick());

    let period = cfg().tick_period();
    let mut expected_at = SimTime::ZERO;
    for index in 0..3 {
        assert!(sim.step(&mut s));
        assert_eq!(sim.now(), expected_at);
        assert_eq!(s.cursor().position(), index + 1);
        let d = s.last_dispatch().expect("dispatch");
        assert_eq!(d.index, index);
        assert_eq!(d.result, Ok(RenderOutcome::Drawn));
        expected_at = expected_at.after(period);
    }
    assert_eq!(s.last_dispatch().map(|d| d.line), Some(4));
}

#[test]
fn playback_terminates_without_further_ticks() {
    let mut s = session(THREE);
    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.run(&mut s);

    assert_eq!(s.state(), PlaybackState::Finished);
    assert!(s.cursor().is_terminal());
    assert!(!s.has_pending_tick());
    assert!(sim.is_idle());
    assert!(!sim.step(&mut s));
    assert_eq!(s.stats().dispatched, 3);
    assert_eq!(s.stats().ticks, 3);
}

#[test]
fn empty_trace_is_immediately_terminal() {
    let sink = MemorySink::default();
    let mut s = Session::new(cfg())
        .expect("session")
        .with_sink(Box::new(sink.clone()));
    s.load_text("");
    assert!(s.entities().is_empty());
    assert!(s.registry().is_empty());

    let mut sim = Simulator::default();
    s.start(&mut sim);
    assert_eq!(s.state(), PlaybackState::Finished);
    assert!(sim.is_idle());
    sim.run(&mut s);
    assert_eq!(s.stats().ticks, 0);
    assert!(sink.is_empty());
}

#[test]
fn nan_event_is_skipped_without_touching_pixels() {
    let mut s = session("Evaluating f_1 at x,3\n");
    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.run(&mut s);

    assert_eq!(s.stats().skipped, 1);
    assert_eq!(s.stats().drawn, 0);
    assert!(s.registry().lookup("f_1").expect("surface").is_blank());
    assert_eq!(s.state(), PlaybackState::Finished);
}

#[test]
fn render_failures_do_not_halt_playback() {
    let mut s = session(THREE);
    s.registry_mut().teardown();

    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.run(&mut s);

    assert_eq!(s.state(), PlaybackState::Finished);
    assert_eq!(s.stats().failed, 3);
    assert_eq!(s.stats().dispatched, 3);
    assert_eq!(
        s.last_dispatch().map(|d| d.result.clone()),
        Some(Err(RenderError::UnknownEntity("f".to_string())))
    );
}

#[test]
fn double_start_keeps_a_single_tick_in_flight() {
    let mut s = session(THREE);
    let mut sim = Simulator::default();
    s.start(&mut sim);
    s.start(&mut sim);
    assert_eq!(sim.pending(), 1);

    sim.step(&mut s);
    assert_eq!(sim.pending(), 1);
}

#[test]
fn cancel_stops_scheduling_and_leaves_surfaces_alone() {
    let mut s = session(THREE);
    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.step(&mut s);

    s.cancel(&mut sim);
    assert_eq!(s.state(), PlaybackState::Cancelled);
    assert!(sim.is_idle());

    sim.run(&mut s);
    assert_eq!(s.cursor().position(), 1);
    assert_eq!(s.stats().dispatched, 1);
}

#[test]
fn cancelled_playback_can_resume() {
    let mut s = session(THREE);
    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.step(&mut s);
    s.cancel(&mut sim);

    s.start(&mut sim);
    sim.run(&mut s);
    assert_eq!(s.state(), PlaybackState::Finished);
    assert_eq!(s.stats().dispatched, 3);
}

#[test]
fn stop_tears_down_cursor_and_registry_together() {
    let mut s = session(THREE);
    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.step(&mut s);

    s.stop(&mut sim);
    assert_eq!(s.state(), PlaybackState::Stopped);
    assert!(s.registry().is_empty());
    assert!(s.events().is_empty());
    assert_eq!(s.cursor().position(), 0);
    assert!(sim.is_idle());

    s.start(&mut sim);
    assert_eq!(s.state(), PlaybackState::Stopped);
    assert!(sim.is_idle());
}

#[test]
fn loop_playback_restarts_from_the_beginning() {
    let mut s = Session::new(VizConfig {
        loop_playback: true,
        ..cfg()
    })
    .expect("session");
    s.load_text("Evaluating f at 1,1\nEvaluating f at 2,2\n");

    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.run_until(SimTime::from_millis(45), &mut s);

    assert_eq!(s.stats().ticks, 5);
    assert_eq!(s.stats().dispatched, 5);
    assert_eq!(s.stats().loops, 2);
    assert_eq!(s.cursor().position(), 1);
    assert_eq!(s.state(), PlaybackState::Playing);

    let f = s.registry().lookup("f").expect("surface");
    assert_eq!(f.pixel(1, 1), Some(Rgba(cfg().active)));
    assert_eq!(f.pixel(2, 2), Some(Rgba(cfg().background)));

    s.cancel(&mut sim);
    assert!(sim.is_idle());
}

#[test]
fn seek_replays_prefix_synchronously() {
    let mut s = session("Evaluating f at 1,1\nEvaluating f at 2,2\nRealizing f over 0,4 0,4\n");
    let active = Some(Rgba(cfg().active));
    let bg = Some(Rgba(cfg().background));

    assert_eq!(s.seek(2), 2);
    let f = s.registry().lookup("f").expect("surface");
    assert_eq!(f.pixel(1, 1), active);
    assert_eq!(f.pixel(2, 2), active);

    assert_eq!(s.seek(0), 0);
    assert!(s.registry().lookup("f").expect("surface").is_blank());

    assert_eq!(s.seek(99), 3);
    let f = s.registry().lookup("f").expect("surface");
    assert_eq!(f.pixel(1, 1), bg);
    assert_eq!(f.pixel(4, 4), Some(Rgba(cfg().realized)));
    assert!(s.cursor().is_terminal());
}

#[test]
fn seek_then_play_continues_from_cursor() {
    let mut s = session(THREE);
    s.seek(2);

    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.run(&mut s);
    assert_eq!(s.stats().dispatched, 1);
    assert_eq!(s.last_dispatch().map(|d| d.index), Some(2));
    assert_eq!(s.state(), PlaybackState::Finished);
}

#[test]
fn frames_are_emitted_every_n_ticks_plus_held_final_frame() {
    let sink = MemorySink::default();
    let mut s = Session::new(VizConfig {
        frame_every: Some(1),
        hold_frames: 2,
        ..cfg()
    })
    .expect("session")
    .with_sink(Box::new(sink.clone()));
    s.load_text("Evaluating f at 1,1\nEvaluating f at 2,2\n");

    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.run(&mut s);

    let frames = sink.frames();
    assert_eq!(frames.len(), 4);
    assert_eq!(s.stats().frames, 4);
    assert_eq!(frames[0].dimensions(), (32, 32));

    let active = Rgba(cfg().active);
    assert_eq!(*frames[0].get_pixel(1, 1), active);
    assert_ne!(*frames[0].get_pixel(2, 2), active);
    assert_eq!(*frames[1].get_pixel(2, 2), active);
    assert_eq!(frames[1], frames[3]);
}

#[test]
fn only_final_frame_without_frame_every() {
    let sink = MemorySink::default();
    let mut s = Session::new(cfg())
        .expect("session")
        .with_sink(Box::new(sink.clone()));
    s.load_text(THREE);

    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.run(&mut s);

    assert_eq!(sink.len(), 1);
    // 两个实体并排
    assert_eq!(sink.frames()[0].dimensions(), (32 * 2 + 4, 32));
}

#[test]
fn reload_while_playing_keeps_a_single_tick_chain() {
    let mut s = session(THREE);
    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.step(&mut s);
    assert_eq!(s.state(), PlaybackState::Playing);

    s.load_text("Evaluating h at 0,0\nEvaluating h at 1,1\nEvaluating h at 2,2\nEvaluating h at 3,3\n");
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(!s.has_pending_tick());

    s.start(&mut sim);
    assert_eq!(sim.pending(), 1);

    sim.run(&mut s);
    assert_eq!(s.state(), PlaybackState::Finished);
    assert_eq!(s.stats().dispatched, 4);
    assert_eq!(s.stats().ticks, 4);
    assert_eq!(s.last_dispatch().map(|d| d.index), Some(3));
    assert!(sim.is_idle());
}

#[test]
fn stale_tick_from_before_reload_is_harmless_when_it_fires_first() {
    let mut s = session(THREE);
    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.step(&mut s);

    s.load_text("Evaluating h at 0,0\n");
    // 遗留 tick 在 start 之前触发：会话处于 Idle，不分发任何事件
    assert!(sim.step(&mut s));
    assert_eq!(s.stats().dispatched, 0);
    assert_eq!(s.cursor().position(), 0);

    s.start(&mut sim);
    assert_eq!(sim.pending(), 1);
    sim.run(&mut s);
    assert_eq!(s.stats().dispatched, 1);
    assert_eq!(s.state(), PlaybackState::Finished);
}

#[test]
fn cancel_after_reload_also_drops_the_stale_tick() {
    let mut s = session(THREE);
    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.step(&mut s);

    s.load_text(THREE);
    s.cancel(&mut sim);
    assert!(sim.is_idle());
}

#[test]
fn seek_replay_does_not_count_towards_stats() {
    let mut s = session(THREE);
    s.registry_mut().teardown();

    assert_eq!(s.seek(3), 3);
    assert_eq!(s.stats().dispatched, 0);
    assert_eq!(s.stats().failed, 0);
    assert!(s.last_dispatch().is_none());
}

#[test]
fn start_at_end_of_trace_still_writes_final_frames() {
    let sink = MemorySink::default();
    let mut s = Session::new(VizConfig {
        hold_frames: 2,
        ..cfg()
    })
    .expect("session")
    .with_sink(Box::new(sink.clone()));
    s.load_text(THREE);
    s.seek(3);

    let mut sim = Simulator::default();
    s.start(&mut sim);
    assert_eq!(s.state(), PlaybackState::Finished);
    assert!(sim.is_idle());
    assert_eq!(sink.len(), 3);

    let frame = &sink.frames()[0];
    assert_eq!(*frame.get_pixel(3, 3), Rgba(cfg().active));
}

#[test]
fn restarting_a_finished_session_writes_no_extra_frames() {
    let sink = MemorySink::default();
    let mut s = Session::new(cfg())
        .expect("session")
        .with_sink(Box::new(sink.clone()));
    s.load_text(THREE);

    let mut sim = Simulator::default();
    s.start(&mut sim);
    sim.run(&mut s);
    assert_eq!(sink.len(), 1);

    s.start(&mut sim);
    assert_eq!(s.state(), PlaybackState::Finished);
    assert_eq!(sink.len(), 1);
}
