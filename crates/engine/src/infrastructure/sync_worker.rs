//! Outbound replication of progress events.
//!
//! The engine commits locally and then hands each durable event to a
//! [`SyncOutbox`]. Enqueueing never blocks and never fails the caller. A
//! [`SyncWorker`] task drains the queue in order and calls the progress
//! service; failures are logged and the event is dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use skillquest_domain::{ProgressEvent, UserId};

use crate::infrastructure::ports::{
    LevelCompletionRecord, ProgressServiceError, ProgressServicePort, ProgressUpdate,
};

/// A queued event plus a correlation id for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEvent {
    pub id: Uuid,
    pub event: ProgressEvent,
}

/// Sending half of the replication queue.
#[derive(Debug, Clone)]
pub struct SyncOutbox {
    sender: Option<mpsc::UnboundedSender<OutboundEvent>>,
}

impl SyncOutbox {
    /// Create a connected outbox and the receiver a [`SyncWorker`] drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// Outbox for guest sessions: events are discarded.
    pub fn disconnected() -> Self {
        Self { sender: None }
    }

    pub fn is_connected(&self) -> bool {
        self.sender.as_ref().is_some_and(|sender| !sender.is_closed())
    }

    pub fn enqueue(&self, event: ProgressEvent) {
        let Some(sender) = &self.sender else {
            tracing::debug!(
                event_type = event.event_type(),
                "No progress service configured, keeping event local"
            );
            return;
        };

        let outbound = OutboundEvent {
            id: Uuid::new_v4(),
            event,
        };
        let event_id = outbound.id;
        let event_type = outbound.event.event_type();

        match sender.send(outbound) {
            Ok(()) => tracing::debug!(%event_id, event_type, "Queued progress event"),
            Err(_) => tracing::warn!(
                %event_id,
                event_type,
                "Sync worker has stopped, progress event not replicated"
            ),
        }
    }
}

/// Drains the outbox and replicates each event to the progress service.
pub struct SyncWorker {
    receiver: mpsc::UnboundedReceiver<OutboundEvent>,
    service: Arc<dyn ProgressServicePort>,
    user_id: UserId,
}

impl SyncWorker {
    pub fn new(
        receiver: mpsc::UnboundedReceiver<OutboundEvent>,
        service: Arc<dyn ProgressServicePort>,
        user_id: UserId,
    ) -> Self {
        Self {
            receiver,
            service,
            user_id,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Process events until every [`SyncOutbox`] clone has been dropped.
    pub async fn run(mut self) {
        tracing::info!(user_id = %self.user_id, "Progress sync worker started");

        while let Some(outbound) = self.receiver.recv().await {
            let event_type = outbound.event.event_type();
            match self.dispatch(&outbound.event).await {
                Ok(()) => tracing::debug!(
                    event_id = %outbound.id,
                    event_type,
                    "Replicated progress event"
                ),
                Err(e) => tracing::error!(
                    event_id = %outbound.id,
                    event_type,
                    error = %e,
                    "Failed to replicate progress event, local state kept"
                ),
            }
        }

        tracing::info!(user_id = %self.user_id, "Progress sync worker stopped");
    }

    async fn dispatch(&self, event: &ProgressEvent) -> Result<(), ProgressServiceError> {
        match event {
            ProgressEvent::LevelCompleted {
                level_id,
                course_id,
                xp_earned,
            } => {
                let record = LevelCompletionRecord {
                    level_id: level_id.clone(),
                    course_id: course_id.clone(),
                    xp_earned: *xp_earned,
                };
                self.service.complete_level(&self.user_id, &record).await
            }
            ProgressEvent::ProgressUpdated {
                total_xp,
                level,
                current_course,
                current_level,
            } => {
                let update = ProgressUpdate {
                    total_xp: *total_xp,
                    level: *level,
                    current_course: current_course.clone(),
                    current_level: current_level.clone(),
                };
                self.service.update_progress(&self.user_id, &update).await
            }
            ProgressEvent::BadgeEarned { badge } => {
                self.service.earn_badge(&self.user_id, badge).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockProgressServicePort;
    use mockall::Sequence;
    use skillquest_domain::Badge;

    #[tokio::test]
    async fn replicates_events_in_order() {
        let mut service = MockProgressServicePort::new();
        let mut seq = Sequence::new();
        service
            .expect_complete_level()
            .withf(|user, record| user.as_str() == "u-1" && record.level_id.as_str() == "dsa-1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        service
            .expect_update_progress()
            .withf(|_, update| update.total_xp == 100 && update.level == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let (outbox, receiver) = SyncOutbox::channel();
        outbox.enqueue(ProgressEvent::LevelCompleted {
            level_id: "dsa-1".into(),
            course_id: "dsa".into(),
            xp_earned: 100,
        });
        outbox.enqueue(ProgressEvent::ProgressUpdated {
            total_xp: 100,
            level: 1,
            current_course: Some("dsa".into()),
            current_level: Some("dsa-1".into()),
        });
        drop(outbox);

        SyncWorker::new(receiver, Arc::new(service), "u-1".into())
            .run()
            .await;
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_worker() {
        let mut service = MockProgressServicePort::new();
        service
            .expect_earn_badge()
            .times(1)
            .returning(|_, _| Err(ProgressServiceError::status(500, "boom")));
        service
            .expect_update_progress()
            .times(1)
            .returning(|_, _| Ok(()));

        let (outbox, receiver) = SyncOutbox::channel();
        outbox.enqueue(ProgressEvent::BadgeEarned {
            badge: Badge::new("first-steps", "First Steps"),
        });
        outbox.enqueue(ProgressEvent::ProgressUpdated {
            total_xp: 0,
            level: 1,
            current_course: None,
            current_level: None,
        });
        drop(outbox);

        SyncWorker::new(receiver, Arc::new(service), "u-1".into())
            .run()
            .await;
    }

    #[test]
    fn disconnected_outbox_discards_events() {
        let outbox = SyncOutbox::disconnected();
        assert!(!outbox.is_connected());
        outbox.enqueue(ProgressEvent::BadgeEarned {
            badge: Badge::new("b", "B"),
        });
    }

    #[test]
    fn enqueue_after_worker_stopped_does_not_panic() {
        let (outbox, receiver) = SyncOutbox::channel();
        drop(receiver);
        assert!(!outbox.is_connected());
        outbox.enqueue(ProgressEvent::BadgeEarned {
            badge: Badge::new("b", "B"),
        });
    }
}
