//! リクエストの取り消しスコープ
//!
//! 非同期リクエストはすべてスコープ経由で実行する。スコープを
//! `cancel()` するか破棄すると、実行中のリクエストは打ち切られ
//! [`AdminError::Cancelled`] で返る。

use crate::error::{AdminError, Result};
use futures_util::future::{abortable, AbortHandle, Aborted};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub struct RequestScope {
    handles: Mutex<HashMap<u64, AbortHandle>>,
    next_slot: AtomicU64,
    cancelled: AtomicBool,
}

/// 実行中の1件（完了・打ち切り・破棄のいずれでも登録を外す）
struct InFlight<'a> {
    scope: &'a RequestScope,
    slot: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.scope.handles.lock().remove(&self.slot);
    }
}

impl RequestScope {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// スコープ内でfutureを実行する
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(AdminError::Cancelled);
        }

        let (fut, handle) = abortable(fut);
        let slot = self.next_slot.fetch_add(1, Ordering::Relaxed);
        self.handles.lock().insert(slot, handle);
        let _in_flight = InFlight { scope: self, slot };

        // 登録直後にcancelされた場合も取りこぼさない
        if self.is_cancelled() {
            return Err(AdminError::Cancelled);
        }

        match fut.await {
            Ok(result) => result,
            Err(Aborted) => Err(AdminError::Cancelled),
        }
    }

    /// 実行中のリクエストをすべて打ち切る（以後のrunも即座に失敗）
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let handles = std::mem::take(&mut *self.handles.lock());
        if !handles.is_empty() {
            tracing::debug!(count = handles.len(), "cancelling in-flight requests");
        }
        for handle in handles.into_values() {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// 完了していないリクエストの数
    pub fn in_flight(&self) -> usize {
        self.handles.lock().len()
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        for (_, handle) in self.handles.get_mut().drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let scope = RequestScope::new();
        let value = scope.run(async { Ok::<_, AdminError>(42) }).await.unwrap();
        assert_eq!(value, 42);

        let err = scope
            .run(async { Err::<(), _>(AdminError::NotFound("cow".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_request() {
        let scope = RequestScope::new();
        let runner = scope.clone();
        let task = tokio::spawn(async move {
            runner
                .run(async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok::<_, AdminError>(())
                })
                .await
        });

        while scope.in_flight() == 0 {
            tokio::task::yield_now().await;
        }
        scope.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(AdminError::Cancelled)));
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_completed_requests_leave_the_scope() {
        let scope = RequestScope::new();
        for _ in 0..5 {
            scope.run(async { Ok::<_, AdminError>(()) }).await.unwrap();
        }
        let _ = scope
            .run(async { Err::<(), _>(AdminError::Transport("refused".into())) })
            .await;
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_in_flight_counts_only_running_requests() {
        let scope = RequestScope::new();
        scope.run(async { Ok::<_, AdminError>(()) }).await.unwrap();

        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let runner = scope.clone();
        let task = tokio::spawn(async move {
            runner
                .run(async {
                    let _ = release_rx.await;
                    Ok::<_, AdminError>(7)
                })
                .await
        });

        while scope.in_flight() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(scope.in_flight(), 1);

        release_tx.send(()).unwrap();
        assert_eq!(task.await.unwrap().unwrap(), 7);
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_scope_rejects_new_requests() {
        let scope = RequestScope::new();
        scope.cancel();
        let result = scope.run(async { Ok::<_, AdminError>(1) }).await;
        assert!(matches!(result, Err(AdminError::Cancelled)));
    }
}
