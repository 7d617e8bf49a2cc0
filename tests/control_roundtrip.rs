//! HTTP notifier against the in-process control receiver.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use step_control::app::StepSession;
use step_control::motion::StepDetector;
use step_control::notify::{
    send_action, Dispatch, HttpNotifier, NotificationSink, NotifyError, StatusMessage,
    FORM_CONTENT_TYPE,
};
use step_control::receiver::{serve, EventLog, ReceiverContext};
use step_control::{DataPoint, ServerEndpoint, StepEvent};

struct TestReceiver {
    addr: SocketAddr,
    ctx: Arc<ReceiverContext>,
    dir: PathBuf,
    stop: Option<oneshot::Sender<()>>,
}

impl TestReceiver {
    async fn start(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "step_control_it_{}_{}_{}",
            name,
            std::process::id(),
            step_control::utils::now_millis()
        ));
        let event_log = EventLog::new(dir.join("events.log"), dir.join("logs/perf.log"));
        let ctx = Arc::new(ReceiverContext::new(event_log));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let server_ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            serve(listener, server_ctx, async {
                let _ = stopped.await;
            })
            .await
            .unwrap();
        });

        Self {
            addr,
            ctx,
            dir,
            stop: Some(stop),
        }
    }

    fn endpoint(&self) -> ServerEndpoint {
        ServerEndpoint::new(self.addr.ip().to_string(), self.addr.port().to_string())
    }

    fn event_lines(&self) -> Vec<String> {
        std::fs::read_to_string(self.ctx.event_log().events_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Drop for TestReceiver {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

/// `/control` answering 503 to every request; returns its endpoint and hit counter.
async fn start_busy_server() -> (ServerEndpoint, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let app = Router::new().route(
        "/control",
        post(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (StatusCode::SERVICE_UNAVAILABLE, "busy")
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (ServerEndpoint::new("127.0.0.1", addr.port().to_string()), hits)
}

/// Endpoint on a port nothing listens on.
async fn closed_endpoint() -> ServerEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    ServerEndpoint::new("127.0.0.1", port.to_string())
}

async fn wait_until_idle(notifier: &HttpNotifier) {
    for _ in 0..200 {
        if notifier.in_flight() == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("notifications still in flight");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn play_and_pause_update_the_receiver() {
    let receiver = TestReceiver::start("play_pause").await;
    let client = reqwest::Client::new();
    let endpoint = receiver.endpoint();

    let body = send_action(&client, &endpoint, StepEvent::play(3)).await.unwrap();
    assert_eq!(body, "Action received: play");
    {
        let playback = receiver.ctx.playback();
        assert!(!playback.is_paused());
        assert_eq!(playback.steps(), 3);
        assert!(playback
            .event_message()
            .starts_with("Remote event received 'play' from 127.0.0.1"));
    }

    let body = send_action(&client, &endpoint, StepEvent::pause(4)).await.unwrap();
    assert_eq!(body, "Action received: pause");
    assert!(receiver.ctx.playback().is_paused());
    assert_eq!(receiver.ctx.playback().steps(), 4);

    let lines = receiver.event_lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("play,127.0.0.1,"));
    assert!(lines[1].starts_with("pause,127.0.0.1,"));
}

#[tokio::test]
async fn receiver_rejects_missing_action() {
    let receiver = TestReceiver::start("missing_action").await;
    let response = reqwest::Client::new()
        .post(receiver.endpoint().control_url())
        .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body("steps=5")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(response.text().await.unwrap(), "Missing 'action' parameter");
    assert_eq!(receiver.ctx.playback().steps(), 0);
    assert!(receiver.event_lines().is_empty());
}

#[tokio::test]
async fn unknown_action_is_acknowledged_without_state_change() {
    let receiver = TestReceiver::start("unknown_action").await;
    let response = reqwest::Client::new()
        .post(receiver.endpoint().control_url())
        .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body("action=rewind&steps=9")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "Action received: rewind");
    let playback = receiver.ctx.playback();
    assert!(!playback.is_paused());
    assert_eq!(playback.steps(), 9);
    assert!(playback.event_message().is_empty());
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (endpoint, hits) = start_busy_server().await;
    let err = send_action(&reqwest::Client::new(), &endpoint, StepEvent::play(1))
        .await
        .unwrap_err();
    match err {
        NotifyError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "busy");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let endpoint = closed_endpoint().await;
    let err = send_action(&reqwest::Client::new(), &endpoint, StepEvent::pause(0))
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::Transport(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn notifier_dispatches_without_blocking_and_sets_status() {
    let receiver = TestReceiver::start("notifier").await;
    let status = StatusMessage::new();
    let mut notifier = HttpNotifier::new(Handle::current(), receiver.endpoint(), status.clone());

    assert_eq!(notifier.notify(&StepEvent::play(1)), Dispatch::Sent);
    wait_until_idle(&notifier).await;

    assert_eq!(status.get(), "Sent: play");
    assert_eq!(receiver.ctx.playback().steps(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_sends_are_dropped_without_status_or_retry() {
    let status = StatusMessage::new();
    let closed = closed_endpoint().await;
    let mut notifier = HttpNotifier::new(Handle::current(), closed.clone(), status.clone());
    assert_eq!(notifier.endpoint(), &closed);

    assert_eq!(notifier.notify(&StepEvent::play(1)), Dispatch::Sent);
    wait_until_idle(&notifier).await;
    assert_eq!(notifier.in_flight(), 0);
    assert_eq!(status.get(), "");

    let (busy, hits) = start_busy_server().await;
    notifier.set_endpoint(busy);
    assert_eq!(notifier.notify(&StepEvent::pause(1)), Dispatch::Sent);
    wait_until_idle(&notifier).await;
    assert_eq!(notifier.in_flight(), 0);
    assert_eq!(status.get(), "");
    // 503 只请求一次
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let receiver = TestReceiver::start("after_failure").await;
    notifier.set_endpoint(receiver.endpoint());
    assert_eq!(notifier.notify(&StepEvent::play(2)), Dispatch::Sent);
    wait_until_idle(&notifier).await;
    assert_eq!(status.get(), "Sent: play");
    assert_eq!(receiver.ctx.playback().steps(), 2);
}

#[tokio::test]
async fn unconfigured_notifier_sends_nothing() {
    let status = StatusMessage::new();
    let mut notifier = HttpNotifier::new(Handle::current(), ServerEndpoint::default(), status.clone());

    assert_eq!(notifier.notify(&StepEvent::play(1)), Dispatch::Skipped);
    assert_eq!(notifier.notify(&StepEvent::pause(1)), Dispatch::Skipped);
    assert_eq!(notifier.in_flight(), 0);
    assert_eq!(status.get(), "");

    notifier.set_endpoint(ServerEndpoint::new("10.0.0.1", ""));
    assert_eq!(notifier.notify(&StepEvent::play(2)), Dispatch::Skipped);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn session_drives_receiver_through_a_step() {
    let receiver = TestReceiver::start("session").await;
    let status = StatusMessage::new();
    let notifier = HttpNotifier::new(Handle::current(), receiver.endpoint(), status.clone());
    let mut session = StepSession::new(StepDetector::default(), notifier, status.clone());

    for m in [0.5, 1.5, 0.3] {
        session.handle_sample(&DataPoint::new(0.0, 0.0, m, 0));
        // 逐个等待，保证到达顺序
        wait_until_idle(session.sink()).await;
    }

    assert_eq!(session.detector().step_count(), 1);
    let playback = receiver.ctx.playback();
    assert!(playback.is_paused());
    assert_eq!(playback.steps(), 1);
    assert_eq!(status.get(), "Sent: pause");
}
