use async_trait::async_trait;

/// A suspension point called once per step of the lineup generation.
///
/// It lets other tasks run while a long lineup is being generated.
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn throttle(&self);
}

#[async_trait]
impl<T> Throttle for std::sync::Arc<T>
where
    T: Throttle + ?Sized,
{
    async fn throttle(&self) {
        (**self).throttle().await
    }
}

/// Yields to the tokio scheduler.
#[derive(Clone, Copy, Debug, Default)]
pub struct YieldNow;

#[async_trait]
impl Throttle for YieldNow {
    async fn throttle(&self) {
        tokio::task::yield_now().await;
    }
}

/// Never suspends.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoThrottle;

#[async_trait]
impl Throttle for NoThrottle {
    async fn throttle(&self) {}
}

#[cfg(test)]
pub(crate) mod stub {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;

    #[derive(Default)]
    pub(crate) struct CountingThrottle(AtomicUsize);

    impl CountingThrottle {
        pub(crate) fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Throttle for CountingThrottle {
        async fn throttle(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}
