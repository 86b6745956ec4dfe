//! Mutations
//!
//! A mutation wraps exactly one write operation. Success runs local side
//! effects first (token storage and the like), then the declared cache
//! invalidations, then exactly one success notification. Failure produces
//! exactly one error notification - the server's message when it sent one,
//! the fixed fallback otherwise - and the error is still returned to the
//! caller. Nothing is retried.

use super::cache::QueryCache;
use super::invalidation::{InvalidationMap, WriteOp};
use crate::error::Result;
use crate::notify::{NotificationKind, Notifier};
use log::debug;
use std::sync::Arc;

type RunFn<Req, Res> = Box<dyn Fn(&Req) -> Result<Res> + Send + Sync>;
type SideEffect<Res> = Box<dyn Fn(&Res) + Send + Sync>;

/// One write operation wired to notifications and declared invalidation
pub struct Mutation<Req, Res> {
    op: WriteOp,
    run: RunFn<Req, Res>,
    on_success: Vec<SideEffect<Res>>,
    success_message: &'static str,
    error_fallback: &'static str,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
    invalidations: Arc<InvalidationMap>,
}

impl<Req, Res> Mutation<Req, Res> {
    pub fn new(
        op: WriteOp,
        success_message: &'static str,
        error_fallback: &'static str,
        cache: Arc<QueryCache>,
        notifier: Arc<dyn Notifier>,
        invalidations: Arc<InvalidationMap>,
        run: impl Fn(&Req) -> Result<Res> + Send + Sync + 'static,
    ) -> Self {
        Self {
            op,
            run: Box::new(run),
            on_success: Vec::new(),
            success_message,
            error_fallback,
            cache,
            notifier,
            invalidations,
        }
    }

    /// Attach a local side effect, run on success before any notification
    #[must_use]
    pub fn with_side_effect(mut self, effect: impl Fn(&Res) + Send + Sync + 'static) -> Self {
        self.on_success.push(Box::new(effect));
        self
    }

    /// The operation this mutation performs
    #[must_use]
    pub fn op(&self) -> WriteOp {
        self.op
    }

    /// Perform the write
    ///
    /// # Errors
    ///
    /// Returns the write's failure after the error notification fired; the
    /// caller's own error handling still sees the original error.
    pub fn execute(&self, req: &Req) -> Result<Res> {
        match (self.run)(req) {
            Ok(res) => {
                for effect in &self.on_success {
                    effect(&res);
                }
                self.invalidations.apply(self.op, &self.cache);
                self.notifier
                    .notify(NotificationKind::Success, self.success_message);
                debug!("mutation {:?} succeeded", self.op);
                Ok(res)
            }
            Err(err) => {
                let message = err
                    .server_message()
                    .map_or_else(|| self.error_fallback.to_owned(), str::to_owned);
                self.notifier.notify(NotificationKind::Error, &message);
                debug!("mutation {:?} failed: {err}", self.op);
                Err(err)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
