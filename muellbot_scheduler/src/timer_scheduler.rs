use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use tokio::{
    sync::RwLock,
    task::{self, JoinHandle},
};
use tokio_util::sync::CancellationToken;

use muellbot_models::reminder::{Reminder, ReminderKey};

use crate::{ReminderFiredHandler, ReminderScheduler, ScheduleRequest};

struct ArmedTimer {
    task: JoinHandle<()>,
    token: CancellationToken,
}

type TimerMap = RwLock<HashMap<ReminderKey, ArmedTimer>>;

/// Timer engine backed by one tokio task per armed reminder. Every map
/// mutation (arm, replace, cancel, claim-before-fire) goes through the
/// write lock, which is the single coordination point that decides the
/// fire/cancel race.
pub struct TimerScheduler {
    timers: Arc<TimerMap>,
    handler: Arc<dyn ReminderFiredHandler>,
}

impl TimerScheduler {
    pub fn new(handler: Arc<dyn ReminderFiredHandler>) -> Self {
        Self {
            timers: Arc::new(RwLock::new(HashMap::new())),
            handler,
        }
    }

    fn arm(&self, reminder: Reminder) -> ArmedTimer {
        let token = CancellationToken::new();
        let task_token = token.child_token();
        let timers = Arc::clone(&self.timers);
        let handler = Arc::clone(&self.handler);
        let delay = fire_delay(reminder.fire_at, Local::now().naive_local());

        log::info!("Arming timer [key = {}, delay = {:?}]", reminder.key, delay);

        let task = task::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    log::info!("Timer cancelled [key = {}]", reminder.key);
                }
                _ = tokio::time::sleep(delay) => {
                    if claim(&timers, &reminder.key, &task_token).await {
                        handler.reminder_fired(reminder).await;
                    }
                }
            }
        });

        ArmedTimer { task, token }
    }
}

#[async_trait]
impl ReminderScheduler for TimerScheduler {
    async fn schedule_reminder(&self, request: ScheduleRequest) -> anyhow::Result<()> {
        let key = request.reminder.key.clone();
        let mut timers = self.timers.write().await;

        if let Some(previous) = timers.remove(&key) {
            previous.token.cancel();
            log::info!("Replacing armed timer [key = {}]", key);
        }

        let timer = self.arm(request.reminder);
        timers.insert(key, timer);
        Ok(())
    }

    async fn cancel_reminder(&self, key: &ReminderKey) -> anyhow::Result<bool> {
        let armed = self.timers.write().await.remove(key);
        match armed {
            Some(timer) => {
                timer.token.cancel();
                let _ = timer.task.await;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// A timer may only fire after removing its own map entry with its token
/// still alive. Replacement and cancellation both cancel the token under
/// the same write lock, so exactly one of firing and cancellation wins and
/// the loser is a no-op.
async fn claim(timers: &TimerMap, key: &ReminderKey, token: &CancellationToken) -> bool {
    let mut timers = timers.write().await;
    if token.is_cancelled() {
        return false;
    }
    timers.remove(key).is_some()
}

/// A fire instant already in the past yields a zero delay: the timer fires
/// as soon as the runtime polls it instead of being skipped.
pub(crate) fn fire_delay(fire_at: NaiveDateTime, now: NaiveDateTime) -> Duration {
    (fire_at - now).to_std().unwrap_or(Duration::ZERO)
}
