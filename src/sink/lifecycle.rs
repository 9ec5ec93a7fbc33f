// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::Error;

/// The lifecycle state of a sink.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SinkState {
    /// The sink accepts messages.
    Open,
    /// The sink has released its destination. This state is terminal.
    Disposed,
}

#[derive(Debug)]
enum Slot<R> {
    Open(R),
    Disposed,
}

/// Owns the resource of a sink while it is open.
///
/// Shared by all sinks so that the open/disposed transitions are implemented once.
#[derive(Debug)]
pub(crate) struct Lifecycle<R> {
    sink: &'static str,
    slot: Slot<R>,
}

impl<R> Lifecycle<R> {
    pub(crate) fn new(sink: &'static str, resource: R) -> Self {
        Self {
            sink,
            slot: Slot::Open(resource),
        }
    }

    pub(crate) fn state(&self) -> SinkState {
        match self.slot {
            Slot::Open(_) => SinkState::Open,
            Slot::Disposed => SinkState::Disposed,
        }
    }

    /// The resource, or a use-after-dispose error.
    pub(crate) fn get(&self) -> Result<&R, Error> {
        match &self.slot {
            Slot::Open(resource) => Ok(resource),
            Slot::Disposed => Err(Error::use_after_dispose(self.sink)),
        }
    }

    /// The resource, or a use-after-dispose error.
    pub(crate) fn get_mut(&mut self) -> Result<&mut R, Error> {
        match &mut self.slot {
            Slot::Open(resource) => Ok(resource),
            Slot::Disposed => Err(Error::use_after_dispose(self.sink)),
        }
    }

    /// Moves to [`SinkState::Disposed`] and hands out the resource for release.
    ///
    /// Returns `None` if already disposed.
    pub(crate) fn dispose(&mut self) -> Option<R> {
        match std::mem::replace(&mut self.slot, Slot::Disposed) {
            Slot::Open(resource) => {
                log::debug!(target: "logsink", "{} disposed", self.sink);
                Some(resource)
            }
            Slot::Disposed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_open_then_disposed() {
        let mut lifecycle = Lifecycle::new("TestSink", 7);
        assert_eq!(lifecycle.state(), SinkState::Open);
        assert_eq!(*lifecycle.get().unwrap(), 7);
        *lifecycle.get_mut().unwrap() += 1;

        assert_eq!(lifecycle.dispose(), Some(8));
        assert_eq!(lifecycle.state(), SinkState::Disposed);

        let err = lifecycle.get().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UseAfterDispose);
        let err = lifecycle.get_mut().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UseAfterDispose);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut lifecycle = Lifecycle::new("TestSink", "resource");
        assert!(lifecycle.dispose().is_some());
        assert!(lifecycle.dispose().is_none());
        assert!(lifecycle.dispose().is_none());
        assert_eq!(lifecycle.state(), SinkState::Disposed);
    }
}
