//! Tag source adapters.
//!
//! The RFID reader itself (protocol decode, upstream acceptance call) runs
//! outside this crate; whatever owns it pushes accepted tag ids into a
//! channel and the kiosk loop drains them through [`TagSource`].

use std::sync::mpsc::{Receiver, Sender, channel};

use crate::history::{TAG_ID_MAX, TagId};
use crate::kiosk::ports::TagSource;

/// Channel-fed tag source. The producing side (reader task, network
/// handler) holds the [`Sender`]; the kiosk loop polls the receiver.
pub struct ChannelTagSource {
    rx: Receiver<TagId>,
}

impl ChannelTagSource {
    /// Create the source plus the sender handed to the reader task.
    pub fn new() -> (Self, Sender<TagId>) {
        let (tx, rx) = channel();
        (Self { rx }, tx)
    }
}

impl TagSource for ChannelTagSource {
    fn poll_tag(&mut self) -> Option<TagId> {
        self.rx.try_recv().ok()
    }
}

/// Host-only source that replays a fixed scan script, one tag per poll.
/// Used by the simulated main loop and integration tests.
#[cfg(not(target_os = "espidf"))]
pub struct ScriptedTagSource {
    tags: std::vec::IntoIter<&'static str>,
}

#[cfg(not(target_os = "espidf"))]
impl ScriptedTagSource {
    pub fn new(tags: Vec<&'static str>) -> Self {
        Self {
            tags: tags.into_iter(),
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl TagSource for ScriptedTagSource {
    fn poll_tag(&mut self) -> Option<TagId> {
        self.tags.next().and_then(|s| {
            if s.len() > TAG_ID_MAX {
                return None;
            }
            let mut id = TagId::new();
            let _ = id.push_str(s);
            Some(id)
        })
    }
}
