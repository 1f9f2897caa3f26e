use crate::application::dto::OrderInput;
use crate::error::{OrderError, Result};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Read};
use uuid::Uuid;

/// One line of the replay stream: an order mutation, a provider webhook
/// call or a staff action.
///
/// Webhook field names (`type`, `signature`, `status`) are the provider's
/// wire contract and are parsed verbatim.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    CreateOrder {
        #[serde(flatten)]
        order: OrderInput,
    },
    UpdateOrder {
        #[serde(flatten)]
        order: OrderInput,
    },
    PaymentNotification {
        order_id: Uuid,
        r#type: String,
        #[serde(default)]
        signature: String,
        #[serde(default)]
        status: Option<String>,
    },
    StartPreparation {
        order_id: Uuid,
    },
    FinishPreparation {
        order_id: Uuid,
    },
    Finalize {
        order_id: Uuid,
    },
    Cancel {
        order_id: Uuid,
    },
}

/// Reads events from a JSON-lines source, one document per line.
///
/// Lines are parsed lazily so large replay files are processed without
/// loading the whole stream into memory. A malformed line yields an
/// error without poisoning the rest of the stream; blank lines are
/// skipped.
pub struct EventReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> EventReader<R> {
    /// Creates a new `EventReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Returns an iterator that lazily reads and deserializes events.
    pub fn events(self) -> impl Iterator<Item = Result<Event>> {
        self.reader
            .lines()
            .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
            .map(|line| {
                let line = line.map_err(OrderError::from)?;
                serde_json::from_str(&line).map_err(OrderError::from)
            })
    }
}
