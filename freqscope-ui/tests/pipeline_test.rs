use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use freqscope_messages::{ClientConfig, ConnectionState, Event};
use freqscope_stream::{MessageError, SchemaError, StreamClient, decode_message};
use freqscope_ui::{ChartBackend, ChartSpec, UiState};
use tungstenite::Message;

// Test helpers to reduce boilerplate

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(usize),
    Destroy(usize),
}

struct LiveChart {
    id: usize,
    spec: ChartSpec,
}

/// Stand-in for the plotting library that tracks live instances.
#[derive(Default, Clone)]
struct FakeCharts {
    calls: Rc<RefCell<Vec<Call>>>,
    live: Rc<RefCell<usize>>,
    next: usize,
}

impl ChartBackend for FakeCharts {
    type Instance = LiveChart;

    fn create(&mut self, spec: ChartSpec) -> LiveChart {
        self.next += 1;
        *self.live.borrow_mut() += 1;
        self.calls.borrow_mut().push(Call::Create(self.next));
        LiveChart {
            id: self.next,
            spec,
        }
    }

    fn destroy(&mut self, chart: LiveChart) {
        *self.live.borrow_mut() -= 1;
        self.calls.borrow_mut().push(Call::Destroy(chart.id));
    }
}

fn setup_state() -> (UiState<FakeCharts>, FakeCharts) {
    let charts = FakeCharts::default();
    (UiState::new(charts.clone()), charts)
}

/// Run one wire message through decode, store and render.
fn deliver(state: &mut UiState<FakeCharts>, json: &str) -> Result<(), MessageError> {
    let snapshot = decode_message(json.as_bytes())?;
    state.handle_event(Event::Snapshot(snapshot));
    Ok(())
}

#[test]
fn test_scenario_a_three_points_from_zero() {
    let (mut state, charts) = setup_state();
    deliver(
        &mut state,
        r#"{"frequencies":[1,2,3],"magnitudes":[0.1,0.2,0.3]}"#,
    )
    .unwrap();

    let trigger = state.trigger();
    let chart = trigger.live().expect("Chart should be drawn");
    assert_eq!(chart.spec.x, vec![1.0, 2.0, 3.0]);
    assert_eq!(chart.spec.y, vec![0.1, 0.2, 0.3]);
    assert_eq!(chart.spec.y_range().unwrap().0, 0.0);
    assert_eq!(*charts.live.borrow(), 1);
}

#[test]
fn test_scenario_b_missing_field_changes_nothing() {
    let (mut state, charts) = setup_state();
    deliver(&mut state, r#"{"frequencies":[9],"magnitudes":[1]}"#).unwrap();
    let calls_before = charts.calls.borrow().clone();

    let err = deliver(&mut state, r#"{"frequencies":[1,2]}"#).unwrap_err();
    assert!(matches!(
        err,
        MessageError::Schema(SchemaError::MissingField("magnitudes"))
    ));

    assert_eq!(*charts.calls.borrow(), calls_before);
    assert_eq!(state.current().unwrap().frequencies(), &[9.0]);
    assert_eq!(state.trigger().live().unwrap().spec.x, vec![9.0]);
}

#[test]
fn test_scenario_d_only_latest_snapshot_is_drawn() {
    let (mut state, charts) = setup_state();
    deliver(&mut state, r#"{"frequencies":[1],"magnitudes":[5]}"#).unwrap();
    deliver(&mut state, r#"{"frequencies":[1,2],"magnitudes":[5,9]}"#).unwrap();

    assert_eq!(
        *charts.calls.borrow(),
        vec![Call::Create(1), Call::Destroy(1), Call::Create(2)]
    );
    assert_eq!(*charts.live.borrow(), 1);
    let trigger = state.trigger();
    let chart = trigger.live().unwrap();
    assert_eq!(chart.spec.points(), vec![[1.0, 5.0], [2.0, 9.0]]);
}

#[test]
fn test_many_snapshots_leave_one_chart_with_the_last() {
    let (mut state, charts) = setup_state();
    for n in 1..=50 {
        let freqs: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        let mags: Vec<String> = (0..n).map(|i| (i * n).to_string()).collect();
        let json = format!(
            r#"{{"frequencies":[{}],"magnitudes":[{}]}}"#,
            freqs.join(","),
            mags.join(",")
        );
        deliver(&mut state, &json).unwrap();
        assert_eq!(*charts.live.borrow(), 1);
    }

    let trigger = state.trigger();
    let chart = trigger.live().unwrap();
    assert_eq!(chart.id, 50);
    assert_eq!(chart.spec.x.len(), 50);
    assert_eq!(chart.spec.y[49], 49.0 * 50.0);
}

#[test]
fn test_empty_snapshot_at_startup_draws_nothing() {
    let (mut state, charts) = setup_state();
    deliver(&mut state, r#"{"frequencies":[],"magnitudes":[]}"#).unwrap();

    assert!(state.current().unwrap().is_empty());
    assert!(state.trigger().live().is_none());
    assert!(charts.calls.borrow().is_empty());
}

#[test]
fn test_connection_events_do_not_touch_chart() {
    let (mut state, charts) = setup_state();
    deliver(&mut state, r#"{"frequencies":[1],"magnitudes":[2]}"#).unwrap();

    state.handle_event(Event::ConnectionChanged(ConnectionState::Closed));
    state.handle_event(Event::ConnectionChanged(ConnectionState::Reconnecting));

    // Stale but present while disconnected.
    assert_eq!(state.connection(), ConnectionState::Reconnecting);
    assert!(state.trigger().live().is_some());
    assert_eq!(charts.calls.borrow().len(), 1);
}

#[test]
fn test_batched_events_build_one_chart_for_newest_snapshot() {
    let (mut state, charts) = setup_state();
    let mut events = Vec::new();
    for n in 1..=10 {
        let snapshot = decode_message(
            format!(r#"{{"frequencies":[1],"magnitudes":[{n}]}}"#).as_bytes(),
        )
        .unwrap();
        events.push(Event::Snapshot(snapshot));
    }
    events.push(Event::ConnectionChanged(ConnectionState::Open));

    state.handle_events(events);

    assert_eq!(state.connection(), ConnectionState::Open);
    assert_eq!(state.trigger().builds(), 1);
    assert_eq!(*charts.calls.borrow(), vec![Call::Create(1)]);
    let trigger = state.trigger();
    assert_eq!(trigger.live().unwrap().spec.y, vec![10.0]);
}

#[test]
fn test_dropping_state_releases_chart() {
    let (mut state, charts) = setup_state();
    deliver(&mut state, r#"{"frequencies":[1],"magnitudes":[2]}"#).unwrap();
    drop(state);
    assert_eq!(*charts.live.borrow(), 0);
}

#[test]
fn test_websocket_stream_to_chart() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("ws://{}", listener.local_addr().unwrap());
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut socket = tungstenite::accept(stream).unwrap();
        socket
            .send(Message::text(r#"{"frequencies":[1],"magnitudes":[5]}"#))
            .unwrap();
        socket
            .send(Message::text(r#"{"frequencies":[1,2],"magnitudes":[5,9]}"#))
            .unwrap();
        // Hold the connection until the client goes away.
        while socket.read().is_ok() {}
    });

    let (event_tx, event_rx) = flume::unbounded::<Event>();
    let config = ClientConfig {
        poll_interval: Duration::from_millis(10),
        ..ClientConfig::with_endpoint(endpoint)
    };
    let mut client = StreamClient::websocket(config, event_tx);
    client.start();

    let (mut state, charts) = setup_state();
    let deadline = Instant::now() + Duration::from_secs(5);
    while state.trigger().builds() < 2 {
        assert!(Instant::now() < deadline, "Chart was never rebuilt");
        if let Ok(event) = event_rx.recv_timeout(Duration::from_millis(50)) {
            state.handle_event(event);
        }
    }

    assert_eq!(state.connection(), ConnectionState::Open);
    assert_eq!(
        *charts.calls.borrow(),
        vec![Call::Create(1), Call::Destroy(1), Call::Create(2)]
    );
    assert_eq!(state.trigger().live().unwrap().spec.x, vec![1.0, 2.0]);

    client.stop();
    server.join().unwrap();
}
