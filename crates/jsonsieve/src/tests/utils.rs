use alloc::string::String;
use alloc::vec::Vec;

use crate::error::DecodeError;
use crate::event::{EventConsumer, ValueKind};

/// One recorded engine event, spans captured as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ObjectStart(usize),
    Key(String),
    ObjectEnd(String),
    ArrayStart(usize),
    ArrayEnd(String),
    Primitive(ValueKind, String),
}

/// Consumer that memoizes every event it receives.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

fn text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

impl EventConsumer for Recorder {
    fn on_object_start(&mut self, offset: usize) -> Result<(), DecodeError> {
        self.events.push(Event::ObjectStart(offset));
        Ok(())
    }

    fn on_object_key(&mut self, key: &[u8]) -> Result<(), DecodeError> {
        self.events.push(Event::Key(text(key)));
        Ok(())
    }

    fn on_object_end(&mut self, raw: &[u8]) -> Result<(), DecodeError> {
        self.events.push(Event::ObjectEnd(text(raw)));
        Ok(())
    }

    fn on_array_start(&mut self, offset: usize) -> Result<(), DecodeError> {
        self.events.push(Event::ArrayStart(offset));
        Ok(())
    }

    fn on_array_end(&mut self, raw: &[u8]) -> Result<(), DecodeError> {
        self.events.push(Event::ArrayEnd(text(raw)));
        Ok(())
    }

    fn on_primitive_value(&mut self, kind: ValueKind, raw: &[u8]) -> Result<(), DecodeError> {
        self.events.push(Event::Primitive(kind, text(raw)));
        Ok(())
    }
}
