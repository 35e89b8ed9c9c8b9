// Copyright 2026 The Matrix.org Foundation C.I.C.
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

//! Synchronous change notification (SPEC_FULL.md §4.3, §5).
//!
//! Grounded on `ComposerUpdate` in the teacher's `composer_model.rs`: a
//! value describing what changed after a mutation. Generalized here into
//! explicit event kinds with registrable listeners, since the spec calls
//! for the editor to "publish" events rather than return an update value.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    DocumentChanged,
    SelectionChanged,
}

pub type Listener = Box<dyn FnMut(EditorEvent) + 'static>;

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: EditorEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listener_count", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emit_calls_every_listener_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let log1 = log.clone();
        bus.on(Box::new(move |e| log1.borrow_mut().push(e)));
        bus.emit(EditorEvent::DocumentChanged);
        bus.emit(EditorEvent::SelectionChanged);
        assert_eq!(
            *log.borrow(),
            vec![EditorEvent::DocumentChanged, EditorEvent::SelectionChanged]
        );
    }
}
