//! Connection pump: one live socket driven by a read loop and a write loop.
//!
//! A [`Client`] is transport-agnostic. It takes the two halves of a split socket
//! (a `Sink<String>` and a `Stream<Item = Result<String, E>>`) and exposes a
//! queue-based `send`/`receive` contract on top of them. The WebSocket handler
//! adapts axum's socket into that shape; tests use in-memory channels.
//!
//! Shutdown may be triggered by a read error, a write error or an explicit
//! [`Client::close`]. Only the first trigger counts: it flips the client to
//! closed and stops the other loop. A transport failure stops the writer at
//! once; an explicit close lets it flush what was queued before closing the
//! socket. Once both loops have exited the close callback runs exactly once.

use std::{
    fmt,
    hash::{Hash, Hasher},
    mem,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use futures_util::{Sink, SinkExt, Stream, StreamExt, pin_mut};
use tokio::sync::{Mutex as AsyncMutex, mpsc};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use super::error::ConnectionError;

/// Capacity of both the inbound and the outbound queue of a client.
pub const QUEUE_CAPACITY: usize = 100;

/// Upper bound for writing out the queue after an explicit close.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier used to correlate a connection across log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type CloseCallback = Box<dyn FnOnce() + Send + 'static>;

enum CloseHook {
    Pending(CloseCallback),
    Fired,
}

/// Shared between the client handle and both loops.
///
/// `closing` fires on every shutdown. `abort` fires only when the transport
/// failed or the peer went away, and `closing` is its child.
struct Shutdown {
    id: ConnectionId,
    closed: AtomicBool,
    abort: CancellationToken,
    closing: CancellationToken,
}

impl Shutdown {
    fn new(id: ConnectionId) -> Self {
        let abort = CancellationToken::new();
        let closing = abort.child_token();
        Self {
            id,
            closed: AtomicBool::new(false),
            abort,
            closing,
        }
    }

    /// Stop both loops without flushing the outbound queue.
    ///
    /// Returns `true` only for the caller that actually closed the client.
    fn trigger(&self, cause: &str) -> bool {
        let first = self.mark_closed(cause);
        self.abort.cancel();
        first
    }

    /// Stop reading and let the writer flush the outbound queue.
    fn trigger_flush(&self, cause: &str) -> bool {
        let first = self.mark_closed(cause);
        if first {
            self.closing.cancel();
        }
        first
    }

    fn mark_closed(&self, cause: &str) -> bool {
        let first = self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if first {
            tracing::debug!("Client {} shutting down: {}", self.id, cause);
        }
        first
    }

    fn is_aborted(&self) -> bool {
        self.abort.is_cancelled()
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

struct Inner {
    id: ConnectionId,
    outbound: mpsc::Sender<String>,
    inbound: AsyncMutex<mpsc::Receiver<String>>,
    shutdown: Arc<Shutdown>,
    tracker: TaskTracker,
    on_close: Arc<Mutex<CloseHook>>,
}

/// Handle to a live connection. Cloning is cheap; all clones share one pump.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    /// Start pumping the given socket halves.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<W, R, WE, RE>(writer: W, reader: R) -> Self
    where
        W: Sink<String, Error = WE> + Send + 'static,
        R: Stream<Item = Result<String, RE>> + Send + 'static,
        WE: fmt::Display + Send + 'static,
        RE: fmt::Display + Send + 'static,
    {
        let id = ConnectionId::next();
        let (out_tx, out_rx) = mpsc::channel(QUEUE_CAPACITY);
        let (in_tx, in_rx) = mpsc::channel(QUEUE_CAPACITY);
        let shutdown = Arc::new(Shutdown::new(id));
        let on_close: Arc<Mutex<CloseHook>> =
            Arc::new(Mutex::new(CloseHook::Pending(Box::new(|| {}))));

        let tracker = TaskTracker::new();
        tracker.spawn(read_loop(reader, in_tx, shutdown.clone()));
        tracker.spawn(write_loop(writer, out_rx, shutdown.clone()));
        tracker.close();

        {
            let tracker = tracker.clone();
            let on_close = on_close.clone();
            tokio::spawn(async move {
                tracker.wait().await;
                tracing::debug!("Client {} closed", id);
                fire_close_hook(&on_close);
            });
        }

        tracing::debug!("Client {} started", id);

        Self {
            inner: Arc::new(Inner {
                id,
                outbound: out_tx,
                inbound: AsyncMutex::new(in_rx),
                shutdown,
                tracker,
                on_close,
            }),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.inner.id
    }

    pub fn is_closed(&self) -> bool {
        self.inner.shutdown.is_closed()
    }

    /// Queue a message for the peer.
    ///
    /// Suspends while the outbound queue is full. `Ok` means the message will
    /// be written unless the transport itself fails.
    pub async fn send(&self, message: String) -> Result<(), ConnectionError> {
        if self.is_closed() {
            return Err(ConnectionError::Closed);
        }
        self.inner
            .outbound
            .send(message)
            .await
            .map_err(|_| ConnectionError::Closed)?;
        // an aborted writer discards the queue
        if self.inner.shutdown.is_aborted() {
            return Err(ConnectionError::Closed);
        }
        Ok(())
    }

    /// Take the next message received from the peer.
    ///
    /// Messages that arrived before shutdown are still handed out; after that
    /// every call fails with [`ConnectionError::Closed`].
    pub async fn receive(&self) -> Result<String, ConnectionError> {
        let mut inbound = self.inner.inbound.lock().await;
        inbound.recv().await.ok_or(ConnectionError::Closed)
    }

    /// Replace the close callback.
    ///
    /// If the client has already finished shutting down the callback runs
    /// immediately on the calling thread.
    pub fn on_close<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut hook = self
            .inner
            .on_close
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if matches!(*hook, CloseHook::Fired) {
            drop(hook);
            callback();
        } else {
            *hook = CloseHook::Pending(Box::new(callback));
        }
    }

    /// Request shutdown. Safe to call any number of times.
    ///
    /// Messages already queued by [`Client::send`] are still written, within
    /// a short grace period.
    pub fn close(&self) {
        self.inner.shutdown.trigger_flush("closed by owner");
    }

    /// Wait until both the read and the write loop have exited.
    pub async fn wait(&self) {
        self.inner.tracker.wait().await;
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("id", &self.inner.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Client {}

impl Hash for Client {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

fn fire_close_hook(hook: &Mutex<CloseHook>) {
    let previous = mem::replace(
        &mut *hook.lock().unwrap_or_else(PoisonError::into_inner),
        CloseHook::Fired,
    );
    if let CloseHook::Pending(callback) = previous {
        callback();
    }
}

async fn read_loop<R, E>(reader: R, inbound: mpsc::Sender<String>, shutdown: Arc<Shutdown>)
where
    R: Stream<Item = Result<String, E>>,
    E: fmt::Display,
{
    pin_mut!(reader);

    loop {
        let frame = tokio::select! {
            // closed by the owner: leave the writer to flush
            _ = shutdown.closing.cancelled() => return,
            frame = reader.next() => frame,
        };

        match frame {
            Some(Ok(message)) => {
                tokio::select! {
                    _ = shutdown.closing.cancelled() => return,
                    sent = inbound.send(message) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
            Some(Err(e)) => {
                tracing::warn!("Client {} read error: {}", shutdown.id, e);
                break;
            }
            None => {
                tracing::debug!("Client {} stream ended", shutdown.id);
                break;
            }
        }
    }

    shutdown.trigger("read loop exited");
}

async fn write_loop<W, E>(writer: W, mut outbound: mpsc::Receiver<String>, shutdown: Arc<Shutdown>)
where
    W: Sink<String, Error = E>,
    E: fmt::Display,
{
    pin_mut!(writer);

    let mut healthy = true;
    loop {
        let message = tokio::select! {
            _ = shutdown.closing.cancelled() => break,
            message = outbound.recv() => message,
        };
        let Some(message) = message else {
            tracing::debug!("Client {} outbound queue closed", shutdown.id);
            break;
        };

        let sent = tokio::select! {
            _ = shutdown.abort.cancelled() => break,
            sent = writer.send(message) => sent,
        };
        if let Err(e) = sent {
            tracing::warn!("Client {} write error: {}", shutdown.id, e);
            healthy = false;
            break;
        }
    }

    // No send can enqueue past this point.
    outbound.close();

    if healthy && !shutdown.is_aborted() {
        let flush = async {
            while let Some(message) = outbound.recv().await {
                let sent = tokio::select! {
                    _ = shutdown.abort.cancelled() => break,
                    sent = writer.send(message) => sent,
                };
                if let Err(e) = sent {
                    tracing::warn!("Client {} write error while flushing: {}", shutdown.id, e);
                    break;
                }
            }
        };
        if tokio::time::timeout(FLUSH_TIMEOUT, flush).await.is_err() {
            tracing::debug!("Client {} gave up flushing after {:?}", shutdown.id, FLUSH_TIMEOUT);
        }
    }

    shutdown.trigger("write loop exited");

    // The writer half is owned here, so the socket is closed exactly once.
    if let Err(e) = writer.close().await {
        tracing::debug!("Client {} socket close: {}", shutdown.id, e);
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::AtomicUsize,
        time::Duration,
    };

    use super::*;
    use crate::signaling::testing::{TIMEOUT, test_client};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - Client の送受信（キュー経由の読み書き）
    // - シャットダウンの冪等性と close コールバックが一度だけ呼ばれること
    // - close 後の send / receive が Closed になること
    //
    // 【なぜこのテストが必要か】
    // - Client はシグナリングの全ての入出力が通る土台
    // - 二重 close やコールバックの多重実行はルーム状態を壊す
    // ========================================

    #[tokio::test]
    async fn test_send_writes_to_transport() {
        // テスト項目: send したメッセージがトランスポートに書き込まれる
        // given (前提条件):
        let (client, mut peer) = test_client();

        // when (操作):
        client.send("first".to_string()).await.unwrap();
        client.send("second".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(peer.next_raw().await.as_deref(), Some("first"));
        assert_eq!(peer.next_raw().await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_receive_returns_frames_in_order() {
        // テスト項目: トランスポートから届いた順にメッセージを受信できる
        // given (前提条件):
        let (client, peer) = test_client();

        // when (操作):
        peer.push_raw("one");
        peer.push_raw("two");

        // then (期待する結果):
        assert_eq!(client.receive().await, Ok("one".to_string()));
        assert_eq!(client.receive().await, Ok("two".to_string()));
    }

    #[tokio::test]
    async fn test_send_after_close_fails() {
        // テスト項目: close 後の send は Closed エラーになる
        // given (前提条件):
        let (client, _peer) = test_client();

        // when (操作):
        client.close();

        // then (期待する結果):
        assert!(client.is_closed());
        assert_eq!(
            client.send("late".to_string()).await,
            Err(ConnectionError::Closed)
        );
    }

    #[tokio::test]
    async fn test_receive_drains_then_fails_after_disconnect() {
        // テスト項目: 切断前に届いたメッセージを受信した後は Closed になる
        // given (前提条件):
        let (client, peer) = test_client();
        peer.push_raw("last words");

        // when (操作):
        peer.disconnect();
        tokio::time::timeout(TIMEOUT, client.wait()).await.unwrap();

        // then (期待する結果):
        assert_eq!(client.receive().await, Ok("last words".to_string()));
        assert_eq!(client.receive().await, Err(ConnectionError::Closed));
    }

    #[tokio::test]
    async fn test_wait_returns_after_explicit_close() {
        // テスト項目: 明示的な close で両方のループが終了し wait が戻る
        // given (前提条件):
        let (client, mut peer) = test_client();

        // when (操作):
        client.close();
        client.close();

        // then (期待する結果):
        assert!(tokio::time::timeout(TIMEOUT, client.wait()).await.is_ok());
        // the writer half was closed, so the peer sees the end of the stream
        assert_eq!(peer.next_raw().await, None);
    }

    #[tokio::test]
    async fn test_close_flushes_queued_messages() {
        // テスト項目: close 直前に send したメッセージは close 後も書き込まれる
        for round in 0..50 {
            // given (前提条件):
            let (client, mut peer) = test_client();
            let frame = format!("error-frame-{round}");

            // when (操作):
            client.send(frame.clone()).await.unwrap();
            client.close();
            tokio::time::timeout(TIMEOUT, client.wait()).await.unwrap();

            // then (期待する結果):
            assert_eq!(peer.next_raw().await, Some(frame));
            assert_eq!(peer.next_raw().await, None);
        }
    }

    #[tokio::test]
    async fn test_send_after_peer_disconnect_fails() {
        // テスト項目: 相手が切断した後の send は Ok を返さない
        // given (前提条件):
        let (client, peer) = test_client();

        // when (操作):
        peer.disconnect();
        tokio::time::timeout(TIMEOUT, client.wait()).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            client.send("dropped".to_string()).await,
            Err(ConnectionError::Closed)
        );
    }

    #[tokio::test]
    async fn test_close_callback_fires_once_when_both_loops_fail() {
        // テスト項目: 読み込みと書き込みが同時に失敗しても close コールバックは一度だけ呼ばれる
        // given (前提条件):
        let (client, mut peer) = test_client();
        let calls = Arc::new(AtomicUsize::new(0));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        {
            let calls = calls.clone();
            client.on_close(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                let _ = done_tx.send(());
            });
        }

        // when (操作): 読み込みエラーを流し、同時に書き込み先も閉じる
        peer.fail_read("connection reset");
        peer.break_write();
        let _ = client.send("lost".to_string()).await;
        client.close();

        // then (期待する結果):
        tokio::time::timeout(TIMEOUT, done_rx.recv())
            .await
            .unwrap()
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(client.is_closed());
    }

    #[tokio::test]
    async fn test_on_close_after_shutdown_runs_immediately() {
        // テスト項目: シャットダウン完了後に登録したコールバックは即座に実行される
        // given (前提条件):
        let (client, peer) = test_client();
        peer.disconnect();
        tokio::time::timeout(TIMEOUT, client.wait()).await.unwrap();
        // the supervisor fires the default hook right after the loops finish
        tokio::time::sleep(Duration::from_millis(50)).await;

        // when (操作):
        let called = Arc::new(AtomicBool::new(false));
        {
            let called = called.clone();
            client.on_close(move || called.store(true, Ordering::SeqCst));
        }

        // then (期待する結果):
        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_clients_have_distinct_ids() {
        // テスト項目: クライアントごとに異なる ID が割り当てられる
        // given (前提条件):
        let (a, _peer_a) = test_client();
        let (b, _peer_b) = test_client();

        // when (操作):
        let same = a == b;

        // then (期待する結果):
        assert!(!same);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone(), a);
    }
}
