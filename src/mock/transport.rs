use crate::model::{ChannelHandle, Topic};
use crate::transport::{EventSink, Transport, TransportError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// One call observed by [`MockTransport`], in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Subscribe(Topic),
    Unsubscribe(Topic),
}

#[derive(Default)]
struct TransportState {
    calls: Vec<TransportCall>,
    sinks: HashMap<Topic, EventSink>,
    channels: HashMap<ChannelHandle, Topic>,
    failing: HashSet<Topic>,
    fail_unsubscribe: bool,
    auto_ack: bool,
    next_handle: u64,
}

/// A transport that records calls and lets the test play the server side.
///
/// `subscribe` hands back a fresh [`ChannelHandle`] and keeps the sink, so the test
/// can later [`ack`](Self::ack), [`emit`](Self::emit) or [`reject`](Self::reject)
/// on behalf of the server. Nothing is acknowledged unless asked, which makes the
/// window between `Pending` and `Active` easy to test.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<TransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that acknowledges every subscription as soon as it is created.
    pub fn auto_ack() -> Self {
        let transport = Self::new();
        transport.state.lock().unwrap().auto_ack = true;
        transport
    }

    /// Makes every future `subscribe` for `topic` fail.
    pub fn fail_subscribe(&self, topic: &str) {
        self.state.lock().unwrap().failing.insert(Topic::new(topic));
    }

    /// Undoes [`fail_subscribe`](Self::fail_subscribe) for `topic`.
    pub fn restore_subscribe(&self, topic: &str) {
        self.state.lock().unwrap().failing.remove(&Topic::new(topic));
    }

    /// Makes every future `unsubscribe` fail after it has been recorded.
    pub fn fail_unsubscribe(&self, fail: bool) {
        self.state.lock().unwrap().fail_unsubscribe = fail;
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Topics in the order they were unsubscribed.
    pub fn unsubscribed(&self) -> Vec<Topic> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::Unsubscribe(topic) => Some(topic),
                TransportCall::Subscribe(_) => None,
            })
            .collect()
    }

    /// Topics with a channel that has not been unsubscribed, sorted.
    pub fn open_channels(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self
            .state
            .lock()
            .unwrap()
            .channels
            .values()
            .cloned()
            .collect();
        topics.sort();
        topics
    }

    /// The sink from the latest `subscribe` for `topic`, even if since unsubscribed.
    pub fn sink(&self, topic: &str) -> Option<EventSink> {
        self.state
            .lock()
            .unwrap()
            .sinks
            .get(&Topic::new(topic))
            .cloned()
    }

    /// Acknowledges the latest subscription for `topic`.
    pub fn ack(&self, topic: &str) -> bool {
        self.sink(topic).is_some_and(|sink| sink.acknowledge())
    }

    /// Pushes a change event for `topic`.
    pub fn emit(&self, topic: &str) -> bool {
        self.sink(topic).is_some_and(|sink| sink.changed_now())
    }

    pub fn reject(&self, topic: &str, reason: &str) -> bool {
        self.sink(topic).is_some_and(|sink| sink.reject(reason))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn subscribe(
        &self,
        topic: &Topic,
        sink: EventSink,
    ) -> Result<ChannelHandle, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TransportCall::Subscribe(topic.clone()));
        if state.failing.contains(topic) {
            return Err(TransportError::Rejected {
                topic: topic.to_string(),
                reason: "injected failure".into(),
            });
        }

        state.next_handle += 1;
        let handle = ChannelHandle(state.next_handle);
        state.channels.insert(handle, topic.clone());
        if state.auto_ack {
            sink.acknowledge();
        }
        state.sinks.insert(topic.clone(), sink);
        Ok(handle)
    }

    async fn unsubscribe(&self, handle: ChannelHandle) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        let topic = state
            .channels
            .remove(&handle)
            .ok_or_else(|| TransportError::UnknownChannel(handle.to_string()))?;
        state.calls.push(TransportCall::Unsubscribe(topic));
        if state.fail_unsubscribe {
            return Err(TransportError::Disconnected);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
