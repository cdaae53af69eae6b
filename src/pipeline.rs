//! Typed, priority-ordered message pipeline.
//!
//! Hosts run every rendered message through the render stages and every
//! live-stream message through the stream stages. Stages are registered
//! under a [`StageId`] with an integer priority; execution is in
//! ascending priority order, ties in registration order. Re-registering
//! an id replaces the previous stage, so repeated service `init()` calls
//! stay idempotent.

use crate::model::Message;
use std::sync::{Arc, Mutex};

/// Identifier of a registered pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageId(pub &'static str);

/// A stage invoked once per message prior to display. Receives and
/// returns the message; stages run in sequence over the same value.
pub trait RenderStage: Send + Sync {
    fn process(&self, message: Message) -> Message;
}

/// A stage invoked once per message observed on the live stream.
pub trait StreamStage: Send + Sync {
    fn observe(&self, message: &Message);
}

impl<F> RenderStage for F
where
    F: Fn(Message) -> Message + Send + Sync,
{
    fn process(&self, message: Message) -> Message {
        self(message)
    }
}

impl<F> StreamStage for F
where
    F: Fn(&Message) + Send + Sync,
{
    fn observe(&self, message: &Message) {
        self(message)
    }
}

struct Registration<S> {
    id: StageId,
    priority: i32,
    stage: S,
}

#[derive(Default)]
struct Stages {
    render: Vec<Registration<Arc<dyn RenderStage>>>,
    stream: Vec<Registration<Arc<dyn StreamStage>>>,
}

fn upsert<S>(registrations: &mut Vec<Registration<S>>, id: StageId, priority: i32, stage: S) {
    registrations.retain(|registration| registration.id != id);
    let position = registrations.partition_point(|registration| registration.priority <= priority);
    registrations.insert(position, Registration { id, priority, stage });
}

fn remove<S>(registrations: &mut Vec<Registration<S>>, id: StageId) -> bool {
    let before = registrations.len();
    registrations.retain(|registration| registration.id != id);
    registrations.len() != before
}

/// The shared stage registry. Cheap to share behind an `Arc`; stages are
/// snapshotted out of the lock before running, so a stage may safely
/// re-enter the pipeline.
#[derive(Default)]
pub struct MessagePipeline {
    stages: Mutex<Stages>,
}

impl MessagePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_render(&self, id: StageId, priority: i32, stage: Arc<dyn RenderStage>) {
        let mut stages = self.stages.lock().expect("pipeline poisoned");
        upsert(&mut stages.render, id, priority, stage);
    }

    pub fn register_stream(&self, id: StageId, priority: i32, stage: Arc<dyn StreamStage>) {
        let mut stages = self.stages.lock().expect("pipeline poisoned");
        upsert(&mut stages.stream, id, priority, stage);
    }

    /// Remove a render stage. Returns whether it was registered.
    pub fn unregister_render(&self, id: StageId) -> bool {
        let mut stages = self.stages.lock().expect("pipeline poisoned");
        remove(&mut stages.render, id)
    }

    /// Remove a stream stage. Returns whether it was registered.
    pub fn unregister_stream(&self, id: StageId) -> bool {
        let mut stages = self.stages.lock().expect("pipeline poisoned");
        remove(&mut stages.stream, id)
    }

    pub fn has_render(&self, id: StageId) -> bool {
        let stages = self.stages.lock().expect("pipeline poisoned");
        stages.render.iter().any(|registration| registration.id == id)
    }

    pub fn has_stream(&self, id: StageId) -> bool {
        let stages = self.stages.lock().expect("pipeline poisoned");
        stages.stream.iter().any(|registration| registration.id == id)
    }

    /// Run all render stages over a message, in priority order.
    pub fn run_render(&self, message: Message) -> Message {
        let snapshot: Vec<Arc<dyn RenderStage>> = {
            let stages = self.stages.lock().expect("pipeline poisoned");
            stages.render.iter().map(|registration| Arc::clone(&registration.stage)).collect()
        };

        snapshot
            .into_iter()
            .fold(message, |message, stage| stage.process(message))
    }

    /// Run all stream stages over a message, in priority order.
    pub fn run_stream(&self, message: &Message) {
        let snapshot: Vec<Arc<dyn StreamStage>> = {
            let stages = self.stages.lock().expect("pipeline poisoned");
            stages.stream.iter().map(|registration| Arc::clone(&registration.stage)).collect()
        };

        for stage in snapshot {
            stage.observe(message);
        }
    }
}
